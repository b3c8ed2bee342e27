//! Candlestick chart for the stock board
//!
//! The chart is not drawn directly. A render pass creates transient widgets
//! (shadows, bodies, date and axis labels) through a [`ChartCanvas`] and
//! remembers them so the next pass can delete them first.
//!
//! Prices map linearly onto the plot height: the lowest low across the series
//! lands on the bottom row and the highest high on the top row. When every
//! price is equal there is no scale, so everything sits on the vertical
//! mid-line and a single axis label marks it.

pub mod constants;
mod render;

pub use render::{CandleChart, ChartCanvas, ChartSummary, PrimitiveKind, candle_color};

use embedded_graphics::prelude::*;

use constants::{
    AXIS_LABEL_COUNT, CANDLE_GAP_PX, CANDLE_INSET_PX, CHART_HEIGHT_PX, CHART_WIDTH_PX, CHART_X_PX,
    CHART_Y_PX,
};

/// Placement of the plot area and its candles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartGeometry {
    /// Top-left corner of the plot area
    pub origin: Point,
    pub width: u32,
    pub height: u32,
    /// Number of candle slots across the width
    pub slots: u32,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            origin: Point::new(CHART_X_PX, CHART_Y_PX),
            width: CHART_WIDTH_PX,
            height: CHART_HEIGHT_PX,
            slots: crate::quotes::SERIES_LEN as u32,
        }
    }
}

impl ChartGeometry {
    pub fn candle_width(&self) -> u32 {
        (self.width / self.slots.max(1)).saturating_sub(CANDLE_INSET_PX)
    }

    /// Distance between the left edges of neighbouring candles.
    pub fn pitch(&self) -> u32 {
        self.candle_width() + CANDLE_GAP_PX
    }

    /// Left edge of the candle in slot `index` (0 = leftmost).
    pub fn candle_x(&self, index: usize) -> i32 {
        self.origin.x + index as i32 * self.pitch() as i32
    }

    /// Bottom edge of the plot area; the lowest price maps here.
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.height as i32
    }

    pub fn mid_y(&self) -> i32 {
        self.origin.y + self.height as i32 / 2
    }
}

/// Linear price to row mapping for one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub min: f32,
    pub max: f32,
}

impl PriceScale {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    /// Whether prices can be spread over the plot height.
    pub fn is_degenerate(&self) -> bool {
        let range = self.range();
        !(range.is_finite() && range > 0.0)
    }

    /// Screen row of `price`.
    pub fn to_y(&self, geometry: &ChartGeometry, price: f32) -> i32 {
        if self.is_degenerate() {
            return geometry.mid_y();
        }
        let offset = geometry.height as f32 * (price - self.min) / self.range();
        (geometry.bottom() as f32 - offset) as i32
    }

    /// Prices marked on the vertical axis, lowest first.
    pub fn axis_values(&self) -> heapless::Vec<f32, AXIS_LABEL_COUNT> {
        let mut values = heapless::Vec::new();
        if self.is_degenerate() {
            let _ = values.push(self.min);
            return values;
        }
        let step = self.range() / (AXIS_LABEL_COUNT - 1) as f32;
        for index in 0..AXIS_LABEL_COUNT {
            let _ = values.push(self.min + index as f32 * step);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_panel_layout() {
        let geometry = ChartGeometry::default();
        assert_eq!(geometry.candle_width(), 33);
        assert_eq!(geometry.pitch(), 35);
        assert_eq!(geometry.candle_x(9), 62 + 9 * 35);
        assert_eq!(geometry.bottom(), 565);
    }

    #[test]
    fn extremes_map_to_plot_edges() {
        let geometry = ChartGeometry::default();
        let scale = PriceScale::new(180.25, 212.75);
        assert_eq!(scale.to_y(&geometry, 180.25), geometry.bottom());
        assert_eq!(scale.to_y(&geometry, 212.75), geometry.origin.y);

        let mid = scale.to_y(&geometry, (180.25 + 212.75) / 2.0);
        assert!((mid - geometry.mid_y()).abs() <= 1);
    }

    #[test]
    fn axis_spans_min_to_max() {
        let values = PriceScale::new(100.0, 200.0).axis_values();
        assert_eq!(values.as_slice(), &[100.0, 125.0, 150.0, 175.0, 200.0]);
    }

    #[test]
    fn zero_range_collapses_to_mid_line() {
        let geometry = ChartGeometry::default();
        let scale = PriceScale::new(42.0, 42.0);
        assert!(scale.is_degenerate());
        assert_eq!(scale.to_y(&geometry, 42.0), geometry.mid_y());
        assert_eq!(scale.axis_values().as_slice(), &[42.0]);
    }
}
