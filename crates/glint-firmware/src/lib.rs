//! ESP32-S3 firmware-specific modules for glint
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: the RM690B0 AMOLED driver, ESP32 peripheral initialization, Wi-Fi,
//! the HTTPS quote transport and the credentials baked in at build time.

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod https;
pub mod rm690b0;
pub mod secrets;
pub mod wifi;

/// Move a value into a `'static` cell, once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty,$val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}
