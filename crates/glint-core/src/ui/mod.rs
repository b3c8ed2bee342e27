//! glint UI layer - a small retained widget tree for the AMOLED panel
//!
//! This module provides:
//! - Touch types shared by the simulator and firmware
//! - Widget kinds (labels, sliders, bars, switches, checkable buttons, panels)
//! - The [`WidgetTree`] store that implements the display sink and chart canvas
//! - The colour palette

pub mod core;
pub mod styling;
pub mod tree;
pub mod widgets;

pub use self::core::{TouchEvent, TouchPoint};
pub use tree::WidgetTree;
pub use widgets::{LabelSize, Widget, WidgetKind};

/// Panel width after rotation into portrait.
pub const DISPLAY_WIDTH_PX: u16 = 450;

/// Panel height after rotation into portrait.
pub const DISPLAY_HEIGHT_PX: u16 = 600;
