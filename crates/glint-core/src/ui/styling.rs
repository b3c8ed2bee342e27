//! Colour definitions for the glint screens
//!
//! All colours are RGB565, the panel's native 16-bit format.
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

// ============================================================================
// Base Colors
// ============================================================================

/// Screen background. Pure black keeps AMOLED pixels off.
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Card surface - dark gray-blue
pub const COLOR_SURFACE: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 40 >> 3);

/// Border/stroke color - medium gray
pub const COLOR_STROKE: Rgb565 = Rgb565::new(43 >> 3, 55 >> 2, 57 >> 3);

/// Track of sliders, bars and switches in the off position
pub const COLOR_TRACK: Rgb565 = Rgb565::new(60 >> 3, 64 >> 2, 72 >> 3);

/// Accent for filled tracks and switched-on controls - teal
pub const COLOR_ACCENT: Rgb565 = Rgb565::new(95 >> 3, 185 >> 2, 141 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for captions
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Medium gray - for disabled or tertiary text
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

// ============================================================================
// Chart Colors
// ============================================================================

/// Candle colour when the close is above the open
pub const COLOR_BULLISH: Rgb565 = Rgb565::GREEN;

/// Candle colour when the close is at or below the open
pub const COLOR_BEARISH: Rgb565 = Rgb565::RED;
