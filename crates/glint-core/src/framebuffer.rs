//! RAM framebuffer between the widget tree and the panel.
//!
//! A full widget-tree redraw lands here first. Only the bounding box of the
//! pixels that actually changed is pushed to the panel on [`FrameBuffer::flush`],
//! so a label tick costs a few hundred pixels of QSPI traffic rather than a
//! whole frame.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Changed region since the last flush, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRegion {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl DirtyRegion {
    fn at(x: usize, y: usize) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x);
        self.bottom = self.bottom.max(y);
    }

    fn width(&self) -> usize {
        self.right - self.left + 1
    }

    fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.left as i32, self.top as i32),
            Size::new(self.width() as u32, self.height() as u32),
        )
    }
}

/// Full-screen `Rgb565` buffer implementing `DrawTarget`.
///
/// 450 x 600 x 2 bytes, heap allocated (PSRAM on the board).
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRegion>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// A black buffer with nothing pending.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
            dirty: None,
        }
    }

    /// Area that the next flush would send, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRegion::to_rectangle)
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        index_of(point.x, point.y).map(|idx| self.pixels[idx])
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] == color {
            return;
        }
        self.pixels[idx] = color;
        match &mut self.dirty {
            Some(region) => region.include(x, y),
            None => self.dirty = Some(DirtyRegion::at(x, y)),
        }
    }

    /// Send the changed region to `display` and forget it.
    ///
    /// Does nothing when no pixel changed since the last flush.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(region) = self.dirty.take() else {
            return Ok(());
        };

        let area = region.to_rectangle();
        trace!(
            "Flushing {}x{} at ({}, {})",
            area.size.width, area.size.height, area.top_left.x, area.top_left.y
        );

        let pixels = &self.pixels;
        let width = region.width();
        let rows = (region.top..=region.bottom).flat_map(move |y| {
            let start = y * WIDTH + region.left;
            pixels[start..start + width].iter().copied()
        });

        display.fill_contiguous(&area, rows)
    }
}

fn index_of(x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    (x < WIDTH && y < HEIGHT).then_some(y * WIDTH + x)
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if index_of(coord.x, coord.y).is_some() {
                self.put(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let mut colors = colors.into_iter();
        for row in 0..area.size.height as i32 {
            for col in 0..area.size.width as i32 {
                let Some(color) = colors.next() else {
                    return Ok(());
                };
                let (x, y) = (area.top_left.x + col, area.top_left.y + row);
                if index_of(x, y).is_some() {
                    self.put(x as usize, y as usize, color);
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        let Some(bottom_right) = visible.bottom_right() else {
            return Ok(());
        };
        for y in visible.top_left.y..=bottom_right.y {
            for x in visible.top_left.x..=bottom_right.x {
                self.put(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.put(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    /// Records every area passed to `fill_contiguous`.
    struct Recorder {
        areas: Vec<Rectangle>,
        pixels: usize,
    }

    impl OriginDimensions for Recorder {
        fn size(&self) -> Size {
            Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
        }
    }

    impl DrawTarget for Recorder {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Ok(())
        }

        fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Self::Color>,
        {
            self.areas.push(*area);
            self.pixels += colors.into_iter().count();
            Ok(())
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            areas: Vec::new(),
            pixels: 0,
        }
    }

    #[test]
    fn flush_sends_only_changed_bounding_box() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(10, 20), Size::new(4, 3)),
            Rgb565::RED,
        )
        .unwrap();
        Pixel(Point::new(30, 25), Rgb565::GREEN).draw(&mut fb).unwrap();

        let mut display = recorder();
        fb.flush(&mut display).unwrap();

        let expected = Rectangle::new(Point::new(10, 20), Size::new(21, 6));
        assert_eq!(display.areas, [expected]);
        assert_eq!(display.pixels, 21 * 6);
        assert_eq!(fb.dirty_area(), None);
    }

    #[test]
    fn unchanged_pixels_do_not_dirty_the_buffer() {
        let mut fb = FrameBuffer::new();
        fb.clear(Rgb565::BLACK).unwrap();
        assert_eq!(fb.dirty_area(), None);

        let mut display = recorder();
        fb.flush(&mut display).unwrap();
        assert!(display.areas.is_empty());
    }

    #[test]
    fn off_screen_drawing_is_clipped() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(440, 590), Size::new(50, 50)),
            Rgb565::WHITE,
        )
        .unwrap();
        Pixel(Point::new(-1, 5), Rgb565::WHITE).draw(&mut fb).unwrap();

        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(440, 590), Size::new(10, 10)))
        );
        assert_eq!(fb.pixel(Point::new(449, 599)), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(Point::new(450, 0)), None);
    }

    #[test]
    fn flushed_pixels_match_buffer_contents() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(1, 1), Rgb565::BLUE).draw(&mut fb).unwrap();
        Pixel(Point::new(2, 2), Rgb565::RED).draw(&mut fb).unwrap();

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        fb.flush(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(Rgb565::BLUE));
        assert_eq!(display.get_pixel(Point::new(2, 2)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Rgb565::BLACK));
    }
}
