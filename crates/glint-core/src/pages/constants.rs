//! Shared layout constants for the two screens
//!
//! Both screens are 450 x 600 portrait. Cards span the width minus the page
//! margin on each side.

/// Outer margin of every screen in pixels
pub const PAGE_MARGIN_PX: i32 = 15;

/// Height of the title row at the top of a screen
pub const PAGE_HEADER_HEIGHT_PX: u32 = 60;

/// Width of a card (screen width minus both margins)
pub const CARD_WIDTH_PX: u32 = 420;

/// Inner padding of a card in pixels
pub const CARD_PADDING_PX: i32 = 15;

/// Corner radius of cards
pub const CARD_RADIUS_PX: u32 = 12;

/// Vertical gap between cards
pub const CARD_GAP_PX: i32 = 12;

/// Height of the single-control dashboard cards
pub const CARD_HEIGHT_PX: u32 = 110;

/// Height of the washer card with its programme buttons
pub const WASHER_CARD_HEIGHT_PX: u32 = 150;

/// Switch size in pixels
pub const SWITCH_WIDTH_PX: u32 = 60;
pub const SWITCH_HEIGHT_PX: u32 = 30;

/// Height of slider and bar tracks
pub const TRACK_HEIGHT_PX: u32 = 14;

/// Width of slider and bar tracks
pub const TRACK_WIDTH_PX: u32 = 310;

/// Programme button size in pixels
pub const SELECT_BUTTON_WIDTH_PX: u32 = 90;
pub const SELECT_BUTTON_HEIGHT_PX: u32 = 50;

/// Horizontal gap between programme buttons
pub const SELECT_BUTTON_GAP_PX: i32 = 10;

/// Standard text row height for small/medium font in pixels
pub const TEXT_ROW_HEIGHT_PX: i32 = 28;

/// Left edge of the value column on the stock board
pub const VALUE_COLUMN_X_PX: i32 = 110;

/// Size of the stock board's trend indicator
pub const STATUS_PANEL_SIZE_PX: u32 = 36;
