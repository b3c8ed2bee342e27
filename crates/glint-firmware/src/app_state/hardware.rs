//! Hardware initialization for the LilyGo T4-S3
//!
//! The panel hangs off SPI2 in quad mode. Its supply is switched by GPIO9 and
//! must be on before the reset pulse.

use embassy_time::{Duration, Timer};
use esp_hal::Blocking;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::{GPIO9, GPIO10, GPIO11, GPIO12, GPIO13, GPIO14, GPIO15, GPIO16, SPI2};
use esp_hal::spi::Mode;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::time::Rate;
use glint_core::app_state::{AppError, debug_message};
use glint_core::bootstrap::{Rotation, bring_up};
use log::{error, info};

use crate::rm690b0::Rm690b0;

/// QSPI clock for the panel
const PANEL_SPI_MHZ: u32 = 40;

/// Interval between repeated reports of a fatal error
const HALT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Pins wired to the AMOLED panel
pub struct PanelPins {
    pub spi: SPI2<'static>,
    pub sck: GPIO15<'static>,
    pub cs: GPIO11<'static>,
    pub sio0: GPIO14<'static>,
    pub sio1: GPIO10<'static>,
    pub sio2: GPIO16<'static>,
    pub sio3: GPIO12<'static>,
    pub reset: GPIO13<'static>,
    pub power: GPIO9<'static>,
}

/// Create the QSPI bus for the panel. Returns the bus, reset and power pins.
pub fn create_qspi_bus(
    pins: PanelPins,
) -> Result<(Spi<'static, Blocking>, Output<'static>, Output<'static>), AppError> {
    let power = Output::new(pins.power, Level::High, OutputConfig::default());
    let reset = Output::new(pins.reset, Level::High, OutputConfig::default());

    let spi = Spi::new(
        pins.spi,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(PANEL_SPI_MHZ))
            .with_mode(Mode::_0),
    )
    .map_err(|e| AppError::HardwareInit(debug_message(&e)))?
    .with_sck(pins.sck)
    .with_cs(pins.cs)
    .with_sio0(pins.sio0)
    .with_sio1(pins.sio1)
    .with_sio2(pins.sio2)
    .with_sio3(pins.sio3);

    Ok((spi, reset, power))
}

/// Power the panel, run its init sequence and rotate it to portrait.
///
/// The returned power pin has to stay alive as long as the panel is used.
pub fn init_panel(pins: PanelPins) -> Result<(Rm690b0<'static>, Output<'static>), AppError> {
    info!("Initialising AMOLED panel");
    let (spi, reset, power) = create_qspi_bus(pins)?;
    let mut panel = Rm690b0::new(spi, reset);
    bring_up(&mut panel, Rotation::Deg270)?;
    Ok((panel, power))
}

/// Stop here forever, repeating the error so a late-attached probe sees it.
pub async fn halt(err: &AppError) -> ! {
    loop {
        error!("Halted: {}", err);
        Timer::after(HALT_REPORT_INTERVAL).await;
    }
}
