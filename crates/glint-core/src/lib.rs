//! Hardware-independent core library for glint
//!
//! This crate contains all platform-agnostic logic for the two AMOLED
//! applications: the smart-home dashboard with its timer-driven tasks and the
//! stock board with its quote fetch and candlestick chart. It also owns the
//! retained widget tree both applications draw through, the cooperative
//! scheduler and the dispatcher pass that ties them together.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod bootstrap;
pub mod chart;
pub mod config;
pub mod dispatcher;
pub mod display_sink;
pub mod framebuffer;
pub mod pages;
pub mod quotes;
pub mod scheduler;
pub mod tasks;
pub mod ui;
