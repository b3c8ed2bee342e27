//! Constants for the candlestick chart
//!
//! Pixel values are in portrait screen coordinates (450 x 600).

/// Left edge of the plot area in pixels
pub const CHART_X_PX: i32 = 62;

/// Top edge of the plot area in pixels
pub const CHART_Y_PX: i32 = 320;

/// Plot area width in pixels
pub const CHART_WIDTH_PX: u32 = 380;

/// Plot area height in pixels
pub const CHART_HEIGHT_PX: u32 = 245;

/// Horizontal space taken from each candle slot for the gap
pub const CANDLE_INSET_PX: u32 = 5;

/// Gap between neighbouring candles in pixels
pub const CANDLE_GAP_PX: u32 = 2;

/// Width of the high-low shadow bar in pixels
pub const SHADOW_WIDTH_PX: u32 = 5;

/// Distance from the bottom of the plot to the date labels
pub const DATE_LABEL_OFFSET_Y_PX: i32 = 5;

/// Horizontal offset of a date label from its candle centre
pub const DATE_LABEL_OFFSET_X_PX: i32 = -5;

/// Distance from the plot's left edge to the axis labels
pub const AXIS_LABEL_OFFSET_X_PX: i32 = -40;

/// Vertical offset of an axis label from the price it marks
pub const AXIS_LABEL_OFFSET_Y_PX: i32 = -10;

/// Number of price labels on the vertical axis
pub const AXIS_LABEL_COUNT: usize = 5;
