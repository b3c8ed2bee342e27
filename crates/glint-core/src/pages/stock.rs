//! Stock board
//!
//! Summary labels for the most recent trading day, a trend indicator and a
//! ten-candle chart. Data arrives once from [`StockBoard::refresh`]; the chart
//! is redrawn with [`StockBoard::render_chart`].

use alloc::format;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{info, warn};

use super::add_title;
use super::constants::{
    CARD_RADIUS_PX, PAGE_MARGIN_PX, STATUS_PANEL_SIZE_PX, TEXT_ROW_HEIGHT_PX, VALUE_COLUMN_X_PX,
};
use crate::chart::{CandleChart, ChartGeometry, ChartSummary};
use crate::config::QuoteConfig;
use crate::display_sink::{DisplaySink, WidgetId};
use crate::quotes::{QuoteError, QuoteSeries, QuoteSnapshot, QuoteTransport, fetch_daily_series};
use crate::ui::styling::{COLOR_SURFACE, GRAY, LIGHT_GRAY, WHITE};
use crate::ui::{LabelSize, Widget, WidgetTree};

/// Top of the first summary row
const FIRST_ROW_Y_PX: i32 = 80;

/// Placeholder shown until the first successful fetch
const PLACEHOLDER: &str = "--";

/// Summary labels and the trend indicator.
#[derive(Debug, Clone, Copy)]
pub struct StockWidgets {
    pub symbol: WidgetId,
    pub last_refreshed: WidgetId,
    pub date: WidgetId,
    pub open: WidgetId,
    pub high: WidgetId,
    pub low: WidgetId,
    pub close: WidgetId,
    pub volume: WidgetId,
    pub status: WidgetId,
}

impl StockWidgets {
    /// Lay the stock board out into `tree`.
    pub fn build(tree: &mut WidgetTree, geometry: &ChartGeometry) -> Self {
        add_title(tree, "Stocks");

        let symbol = tree.add(Widget::label(
            Point::new(PAGE_MARGIN_PX + 90, 20),
            PLACEHOLDER,
            LabelSize::Large,
            WHITE,
        ));
        let status = tree.add(
            Widget::panel(
                Rectangle::new(
                    Point::new(
                        crate::ui::DISPLAY_WIDTH_PX as i32
                            - PAGE_MARGIN_PX
                            - STATUS_PANEL_SIZE_PX as i32,
                        12,
                    ),
                    Size::new(STATUS_PANEL_SIZE_PX, STATUS_PANEL_SIZE_PX),
                ),
                GRAY,
            )
            .with_radius(8),
        );
        let last_refreshed = tree.add(Widget::label(
            Point::new(PAGE_MARGIN_PX, 50),
            PLACEHOLDER,
            LabelSize::Small,
            LIGHT_GRAY,
        ));

        let mut row = FIRST_ROW_Y_PX;
        let mut value_row = |tree: &mut WidgetTree, caption: &str| {
            tree.add(Widget::label(
                Point::new(PAGE_MARGIN_PX, row + 3),
                caption,
                LabelSize::Small,
                LIGHT_GRAY,
            ));
            let id = tree.add(Widget::label(
                Point::new(VALUE_COLUMN_X_PX, row),
                PLACEHOLDER,
                LabelSize::Medium,
                WHITE,
            ));
            row += TEXT_ROW_HEIGHT_PX;
            id
        };
        let date = value_row(tree, "Date");
        let open = value_row(tree, "Open");
        let high = value_row(tree, "High");
        let low = value_row(tree, "Low");
        let close = value_row(tree, "Close");
        let volume = value_row(tree, "Volume");

        // Card behind the plot, axis labels and dates.
        let frame = Rectangle::new(
            Point::new(PAGE_MARGIN_PX - 5, geometry.origin.y - 20),
            Size::new(
                crate::ui::DISPLAY_WIDTH_PX as u32 - 2 * (PAGE_MARGIN_PX as u32 - 5),
                geometry.height + 45,
            ),
        );
        tree.add(Widget::panel(frame, COLOR_SURFACE).with_radius(CARD_RADIUS_PX));

        Self {
            symbol,
            last_refreshed,
            date,
            open,
            high,
            low,
            close,
            volume,
            status,
        }
    }
}

/// The stock board application state.
#[derive(Debug)]
pub struct StockBoard {
    widgets: StockWidgets,
    series: QuoteSeries,
    snapshot: Option<QuoteSnapshot>,
    chart: CandleChart,
}

impl StockBoard {
    pub fn build(tree: &mut WidgetTree) -> Self {
        let geometry = ChartGeometry::default();
        let widgets = StockWidgets::build(tree, &geometry);
        Self {
            widgets,
            series: QuoteSeries::default(),
            snapshot: None,
            chart: CandleChart::new(geometry).with_status_panel(widgets.status),
        }
    }

    pub fn widgets(&self) -> &StockWidgets {
        &self.widgets
    }

    pub fn series(&self) -> &QuoteSeries {
        &self.series
    }

    /// The last successful fetch, if any.
    pub fn snapshot(&self) -> Option<&QuoteSnapshot> {
        self.snapshot.as_ref()
    }

    /// Fetch once and, on success, update the series and summary labels.
    ///
    /// On failure the error is logged and returned; nothing visible changes.
    pub async fn refresh<T: QuoteTransport, S: DisplaySink + ?Sized>(
        &mut self,
        transport: &mut T,
        config: &QuoteConfig<'_>,
        sink: &mut S,
    ) -> Result<(), QuoteError> {
        match fetch_daily_series(transport, config).await {
            Ok(snapshot) => {
                self.apply(snapshot, sink);
                Ok(())
            }
            Err(err) => {
                warn!("Quote update skipped: {}", err);
                Err(err)
            }
        }
    }

    /// Store a snapshot and publish its newest record.
    pub fn apply<S: DisplaySink + ?Sized>(&mut self, snapshot: QuoteSnapshot, sink: &mut S) {
        self.series.apply(&snapshot.records);

        if let Some(latest) = snapshot.latest() {
            info!(
                "{} {}: open {:.2} high {:.2} low {:.2} close {:.2} volume {}",
                snapshot.symbol,
                latest.date,
                latest.open,
                latest.high,
                latest.low,
                latest.close,
                latest.volume
            );
            let w = &self.widgets;
            sink.set_text_value(w.symbol, &snapshot.symbol);
            sink.set_text_value(w.last_refreshed, &snapshot.last_refreshed);
            sink.set_text_value(w.date, &latest.date);
            sink.set_text_value(w.open, &format!("{:.2}", latest.open));
            sink.set_text_value(w.high, &format!("{:.2}", latest.high));
            sink.set_text_value(w.low, &format!("{:.2}", latest.low));
            sink.set_text_value(w.close, &format!("{:.2}", latest.close));
            sink.set_text_value(w.volume, &latest.volume);
        }

        self.snapshot = Some(snapshot);
    }

    /// Replace the chart with one built from the current series.
    pub fn render_chart(&mut self, tree: &mut WidgetTree) -> ChartSummary {
        self.chart.render(tree, &self.series)
    }

    /// Remove the chart's widgets.
    pub fn clear_chart(&mut self, tree: &mut WidgetTree) {
        self.chart.clear(tree);
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use embassy_futures::block_on;

    use super::*;
    use crate::chart::candle_color;
    use crate::quotes::{HttpResponse, TransportError};

    struct Fixed(Result<HttpResponse, TransportError>);

    impl QuoteTransport for Fixed {
        fn is_connected(&self) -> bool {
            true
        }

        async fn get(&mut self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.0.clone()
        }
    }

    fn body() -> String {
        let days: Vec<String> = (1..=12)
            .map(|day| {
                let base = 100.0 + day as f32;
                format!(
                    r#""2024-03-{day:02}":{{"1. open":"{:.2}","2. high":"{:.2}","3. low":"{:.2}","4. close":"{:.2}","5. volume":"{}"}}"#,
                    base,
                    base + 2.0,
                    base - 2.0,
                    base + 1.0,
                    day * 1000
                )
            })
            .collect();
        format!(
            r#"{{"Meta Data":{{"2. Symbol":"TSLA","3. Last Refreshed":"2024-03-12"}},"Time Series (Daily)":{{{}}}}}"#,
            days.join(",")
        )
    }

    fn labels(tree: &WidgetTree, widgets: &StockWidgets) -> Vec<String> {
        [
            widgets.symbol,
            widgets.last_refreshed,
            widgets.date,
            widgets.open,
            widgets.high,
            widgets.low,
            widgets.close,
            widgets.volume,
        ]
        .iter()
        .map(|id| tree.get(*id).and_then(Widget::text).unwrap_or("").to_string())
        .collect()
    }

    #[test]
    fn successful_refresh_fills_labels_and_series() {
        let mut tree = WidgetTree::new();
        let mut board = StockBoard::build(&mut tree);
        let mut transport = Fixed(Ok(HttpResponse::new(200, body())));

        block_on(board.refresh(&mut transport, &QuoteConfig::default(), &mut tree)).unwrap();

        assert_eq!(
            labels(&tree, board.widgets()),
            ["TSLA", "2024-03-12", "2024-03-12", "112.00", "114.00", "110.00", "113.00", "12000"]
        );
        assert_eq!(board.series().latest().date, "2024-03-12");
        assert_eq!(board.series().records()[9].date, "2024-03-03");
    }

    #[test]
    fn failed_refresh_changes_nothing() {
        let mut tree = WidgetTree::new();
        let mut board = StockBoard::build(&mut tree);
        let mut ok = Fixed(Ok(HttpResponse::new(200, body())));
        block_on(board.refresh(&mut ok, &QuoteConfig::default(), &mut tree)).unwrap();

        let labels_before = labels(&tree, board.widgets());
        let series_before = board.series().clone();

        for failure in [
            Ok(HttpResponse::new(404, "{}")),
            Ok(HttpResponse::new(200, "not json")),
            Err(TransportError::InvalidUtf8),
        ] {
            let mut transport = Fixed(failure);
            let result = block_on(board.refresh(&mut transport, &QuoteConfig::default(), &mut tree));
            assert!(result.is_err());
        }

        assert_eq!(labels(&tree, board.widgets()), labels_before);
        assert_eq!(board.series(), &series_before);
    }

    #[test]
    fn chart_render_colours_status_and_replaces_itself() {
        let mut tree = WidgetTree::new();
        let mut board = StockBoard::build(&mut tree);
        let layout = tree.len();
        let mut transport = Fixed(Ok(HttpResponse::new(200, body())));
        block_on(board.refresh(&mut transport, &QuoteConfig::default(), &mut tree)).unwrap();

        let summary = board.render_chart(&mut tree);
        assert!(summary.latest_bullish);
        assert_eq!(
            tree.get(board.widgets().status).and_then(Widget::color),
            Some(candle_color(true))
        );

        board.render_chart(&mut tree);
        assert_eq!(tree.len(), layout + summary.primitives);

        board.clear_chart(&mut tree);
        assert_eq!(tree.len(), layout);
    }
}
