//! RM690B0 AMOLED controller over QSPI
//!
//! Register writes go out as a single-line `0x02` opcode followed by the
//! register in the middle byte of a 24-bit address. Pixel data uses the quad
//! `0x32` opcode: the first chunk targets RAMWR (`0x2C`), later chunks RAMWRC
//! (`0x3C`) so a window can be filled one FIFO-sized transfer at a time.
//!
//! The controller scans the glass landscape (600 x 450). [`Rotation::Deg270`]
//! turns it into the 450 x 600 portrait the pages are laid out for.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::Output;
use esp_hal::spi::DataMode;
use esp_hal::spi::master::{Address, Command, Spi};
use glint_core::bootstrap::{PanelDriver, Rotation};
use log::{debug, info};
use thiserror_no_std::Error;

// ---------------------------------------------------------------------------
// Wire protocol
// ---------------------------------------------------------------------------

/// Opcode for a register write on one data line
const OPCODE_WRITE_REGISTER: u16 = 0x02;

/// Opcode for a pixel write on four data lines
const OPCODE_WRITE_PIXELS: u16 = 0x32;

const CMD_SLPOUT: u8 = 0x11;
const CMD_DISPON: u8 = 0x29;
const CMD_CASET: u8 = 0x2A;
const CMD_RASET: u8 = 0x2B;
const CMD_RAMWR: u8 = 0x2C;
const CMD_TEON: u8 = 0x35;
const CMD_MADCTL: u8 = 0x36;
const CMD_RAMWRC: u8 = 0x3C;
const CMD_COLMOD: u8 = 0x3A;
const CMD_BRIGHTNESS: u8 = 0x51;

const MADCTL_MY: u8 = 0x80;
const MADCTL_MX: u8 = 0x40;
const MADCTL_MV: u8 = 0x20;

/// Largest payload the SPI FIFO takes in one transfer
const CHUNK_BYTES: usize = 64;

// ---------------------------------------------------------------------------
// Panel geometry
// ---------------------------------------------------------------------------

/// Native scan width in pixels
pub const NATIVE_WIDTH_PX: u16 = 600;

/// Native scan height in pixels
pub const NATIVE_HEIGHT_PX: u16 = 450;

/// First visible row of the controller's RAM in native orientation
const NATIVE_ROW_OFFSET: u16 = 16;

/// Power-on sequence: (register, parameters, delay after in ms)
const INIT_SEQUENCE: &[(u8, &[u8], u32)] = &[
    (0xFE, &[0x20], 0), // manufacturer page
    (0x26, &[0x0A], 0),
    (0x24, &[0x80], 0),
    (0x5A, &[0x51], 0),
    (0x5B, &[0x2E], 0),
    (0xFE, &[0x00], 0), // back to the user page
    (CMD_COLMOD, &[0x55], 0), // 16 bpp
    (0xC2, &[0x00], 10),
    (CMD_TEON, &[0x00], 0),
    (CMD_BRIGHTNESS, &[0x00], 0),
    (CMD_SLPOUT, &[], 120),
    (CMD_DISPON, &[], 10),
    (CMD_BRIGHTNESS, &[0xFF], 0),
];

#[derive(Error, Debug, Clone, Copy)]
pub enum PanelError {
    #[error("QSPI transfer failed: {0:?}")]
    Spi(esp_hal::spi::Error),
}

/// RM690B0 driver implementing [`PanelDriver`] and `DrawTarget<Color = Rgb565>`.
pub struct Rm690b0<'d> {
    spi: Spi<'d, Blocking>,
    reset: Output<'d>,
    rotation: Rotation,
}

impl<'d> Rm690b0<'d> {
    /// Wrap a QSPI bus whose CS line is driven by the peripheral.
    pub fn new(spi: Spi<'d, Blocking>, reset: Output<'d>) -> Self {
        Self {
            spi,
            reset,
            rotation: Rotation::Deg0,
        }
    }

    fn write_register(&mut self, register: u8, params: &[u8]) -> Result<(), PanelError> {
        self.spi
            .half_duplex_write(
                DataMode::Single,
                Command::_8Bit(OPCODE_WRITE_REGISTER, DataMode::Single),
                Address::_24Bit(u32::from(register) << 8, DataMode::Single),
                0,
                params,
            )
            .map_err(PanelError::Spi)
    }

    fn write_pixel_bytes(&mut self, first: bool, bytes: &[u8]) -> Result<(), PanelError> {
        let register = if first { CMD_RAMWR } else { CMD_RAMWRC };
        self.spi
            .half_duplex_write(
                DataMode::Quad,
                Command::_8Bit(OPCODE_WRITE_PIXELS, DataMode::Single),
                Address::_24Bit(u32::from(register) << 8, DataMode::Single),
                0,
                bytes,
            )
            .map_err(PanelError::Spi)
    }

    /// Visible-area offset in the current orientation.
    fn offset(&self) -> (u16, u16) {
        if self.rotation.quarter_turns() % 2 == 1 {
            (NATIVE_ROW_OFFSET, 0)
        } else {
            (0, NATIVE_ROW_OFFSET)
        }
    }

    fn set_window(&mut self, area: &Rectangle) -> Result<(), PanelError> {
        let (dx, dy) = self.offset();
        let x0 = area.top_left.x as u16 + dx;
        let y0 = area.top_left.y as u16 + dy;
        let x1 = x0 + area.size.width as u16 - 1;
        let y1 = y0 + area.size.height as u16 - 1;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.write_register(CMD_CASET, &[x0h, x0l, x1h, x1l])?;
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.write_register(CMD_RASET, &[y0h, y0l, y1h, y1l])
    }

    /// Stream colours into the current window in FIFO-sized chunks.
    fn write_pixels<I>(&mut self, colors: I) -> Result<(), PanelError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut chunk = [0u8; CHUNK_BYTES];
        let mut len = 0;
        let mut first = true;

        for color in colors {
            let [high, low] = color.into_storage().to_be_bytes();
            chunk[len] = high;
            chunk[len + 1] = low;
            len += 2;
            if len == CHUNK_BYTES {
                self.write_pixel_bytes(first, &chunk)?;
                first = false;
                len = 0;
            }
        }
        if len > 0 {
            self.write_pixel_bytes(first, &chunk[..len])?;
        }
        Ok(())
    }
}

impl PanelDriver for Rm690b0<'_> {
    type Error = PanelError;

    fn init(&mut self) -> Result<(), Self::Error> {
        let delay = Delay::new();
        self.reset.set_high();
        delay.delay_millis(10);
        self.reset.set_low();
        delay.delay_millis(20);
        self.reset.set_high();
        delay.delay_millis(120);

        for &(register, params, wait_ms) in INIT_SEQUENCE {
            self.write_register(register, params)?;
            if wait_ms > 0 {
                delay.delay_millis(wait_ms);
            }
        }
        info!("RM690B0 initialised");
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error> {
        let madctl = match rotation {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => MADCTL_MX | MADCTL_MV,
            Rotation::Deg180 => MADCTL_MX | MADCTL_MY,
            Rotation::Deg270 => MADCTL_MY | MADCTL_MV,
        };
        self.write_register(CMD_MADCTL, &[madctl])?;
        self.rotation = rotation;
        debug!("MADCTL {:#04x}, size {:?}", madctl, self.size());
        Ok(())
    }
}

impl OriginDimensions for Rm690b0<'_> {
    fn size(&self) -> Size {
        if self.rotation.quarter_turns() % 2 == 1 {
            Size::new(u32::from(NATIVE_HEIGHT_PX), u32::from(NATIVE_WIDTH_PX))
        } else {
            Size::new(u32::from(NATIVE_WIDTH_PX), u32::from(NATIVE_HEIGHT_PX))
        }
    }
}

impl DrawTarget for Rm690b0<'_> {
    type Color = Rgb565;
    type Error = PanelError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.set_window(&Rectangle::new(point, Size::new(1, 1)))?;
                self.write_pixels([color])?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        if area.is_zero_sized() {
            return Ok(());
        }
        if area.intersection(&self.bounding_box()) != *area {
            let pixels = area
                .points()
                .zip(colors)
                .map(|(point, color)| Pixel(point, color));
            return self.draw_iter(pixels);
        }

        self.set_window(area)?;
        let count = area.size.width as usize * area.size.height as usize;
        self.write_pixels(colors.into_iter().take(count))
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        self.set_window(&area)?;
        let count = area.size.width as usize * area.size.height as usize;
        self.write_pixels(core::iter::repeat_n(color, count))
    }
}
