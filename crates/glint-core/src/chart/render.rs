//! Candle render pass and primitive bookkeeping

use alloc::vec::Vec;
use core::fmt::Write as _;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use super::constants::{
    AXIS_LABEL_OFFSET_X_PX, AXIS_LABEL_OFFSET_Y_PX, DATE_LABEL_OFFSET_X_PX,
    DATE_LABEL_OFFSET_Y_PX, SHADOW_WIDTH_PX,
};
use super::{ChartGeometry, PriceScale};
use crate::display_sink::WidgetId;
use crate::quotes::{OhlcRecord, QuoteSeries};
use crate::ui::styling::{COLOR_BEARISH, COLOR_BULLISH, WHITE};

/// Widget operations a render pass needs.
pub trait ChartCanvas {
    /// Create a filled rectangle.
    fn create_rect(&mut self, bounds: Rectangle, fill: Rgb565) -> WidgetId;

    /// Create a small text label with its top-left corner at `top_left`.
    fn create_label(&mut self, top_left: Point, text: &str, color: Rgb565) -> WidgetId;

    /// Recolour a rectangle or label.
    fn set_fill(&mut self, id: WidgetId, fill: Rgb565);

    /// Delete a widget. Returns `false` if it no longer existed.
    fn delete(&mut self, id: WidgetId) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Shadow,
    Body,
    DateLabel,
    AxisLabel,
}

/// Outcome of one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSummary {
    pub scale: PriceScale,
    /// Whether the most recent candle closed above its open.
    pub latest_bullish: bool,
    pub primitives: usize,
}

/// Renders a [`QuoteSeries`] as candles and owns the widgets it created.
#[derive(Debug, Default)]
pub struct CandleChart {
    geometry: ChartGeometry,
    /// Persistent widget recoloured with the latest candle's colour.
    status: Option<WidgetId>,
    primitives: Vec<(PrimitiveKind, WidgetId)>,
}

impl CandleChart {
    pub fn new(geometry: ChartGeometry) -> Self {
        Self {
            geometry,
            status: None,
            primitives: Vec::new(),
        }
    }

    pub fn with_status_panel(mut self, status: WidgetId) -> Self {
        self.status = Some(status);
        self
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    /// Widgets created by the last render, in creation order.
    pub fn primitives(&self) -> &[(PrimitiveKind, WidgetId)] {
        &self.primitives
    }

    /// Delete every widget of the previous pass.
    pub fn clear<C: ChartCanvas + ?Sized>(&mut self, canvas: &mut C) {
        let count = self.primitives.len();
        for (_, id) in self.primitives.drain(..) {
            canvas.delete(id);
        }
        if count > 0 {
            debug!("Cleared {} chart primitives", count);
        }
    }

    /// Draw all slots of `series`, oldest on the left.
    pub fn render<C: ChartCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        series: &QuoteSeries,
    ) -> ChartSummary {
        self.clear(canvas);

        let scale = PriceScale::new(series.min_low(), series.max_high());
        debug!(
            "Chart scale min {} max {} range {}",
            scale.min,
            scale.max,
            scale.range()
        );

        for (slot, record) in series.chronological().enumerate() {
            self.add_candle(canvas, &scale, slot, record);
        }
        for value in scale.axis_values() {
            self.add_axis_label(canvas, &scale, value);
        }

        let latest_bullish = series.latest().is_bullish();
        if let Some(status) = self.status {
            canvas.set_fill(status, candle_color(latest_bullish));
        }

        info!(
            "Rendered {} candles ({} primitives)",
            series.records().len(),
            self.primitives.len()
        );
        ChartSummary {
            scale,
            latest_bullish,
            primitives: self.primitives.len(),
        }
    }

    fn add_candle<C: ChartCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        scale: &PriceScale,
        slot: usize,
        record: &OhlcRecord,
    ) {
        let geometry = self.geometry;
        let x = geometry.candle_x(slot);
        let candle_width = geometry.candle_width();
        let center = x + candle_width as i32 / 2;
        let color = candle_color(record.is_bullish());

        let high_y = scale.to_y(&geometry, record.high);
        let low_y = scale.to_y(&geometry, record.low);
        let shadow = Rectangle::new(
            Point::new(center - 1, high_y),
            Size::new(SHADOW_WIDTH_PX, span(high_y, low_y)),
        );
        self.track(PrimitiveKind::Shadow, canvas.create_rect(shadow, color));

        let open_y = scale.to_y(&geometry, record.open);
        let close_y = scale.to_y(&geometry, record.close);
        let body = Rectangle::new(
            Point::new(x, open_y.min(close_y)),
            Size::new(candle_width, span(open_y, close_y)),
        );
        self.track(PrimitiveKind::Body, canvas.create_rect(body, color));

        let label_at = Point::new(
            center + DATE_LABEL_OFFSET_X_PX,
            geometry.bottom() + DATE_LABEL_OFFSET_Y_PX,
        );
        let label = canvas.create_label(label_at, record.day_of_month(), WHITE);
        self.track(PrimitiveKind::DateLabel, label);
    }

    fn add_axis_label<C: ChartCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        scale: &PriceScale,
        value: f32,
    ) {
        let mut text = heapless::String::<12>::new();
        let _ = write!(text, "{}", value as i32);

        let at = Point::new(
            self.geometry.origin.x + AXIS_LABEL_OFFSET_X_PX,
            scale.to_y(&self.geometry, value) + AXIS_LABEL_OFFSET_Y_PX,
        );
        let label = canvas.create_label(at, &text, WHITE);
        self.track(PrimitiveKind::AxisLabel, label);
    }

    fn track(&mut self, kind: PrimitiveKind, id: WidgetId) {
        self.primitives.push((kind, id));
    }
}

pub fn candle_color(bullish: bool) -> Rgb565 {
    if bullish { COLOR_BULLISH } else { COLOR_BEARISH }
}

fn span(a: i32, b: i32) -> u32 {
    a.abs_diff(b)
}
