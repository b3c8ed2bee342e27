//! Firmware-specific application state extensions
//!
//! Re-exports the hardware-independent app state from `glint_core` and
//! adds ESP32-specific hardware initialization.

mod hardware;

pub use hardware::*;

// Re-export all shared app state types from glint-core
pub use glint_core::app_state::*;
