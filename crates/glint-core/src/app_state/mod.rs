//! Application-wide error types for glint

use core::fmt::Write as _;

use thiserror_no_std::Error;

use crate::quotes::QuoteError;
use crate::scheduler::SchedulerError;

/// Capacity of the message carried by string-bearing error variants.
pub const ERROR_MESSAGE_CAPACITY: usize = 64;

/// Fixed-capacity error message.
pub type ErrorMessage = heapless::String<ERROR_MESSAGE_CAPACITY>;

#[derive(Error, Debug)]
pub enum AppError {
    /// The panel could not be brought up. Fatal: the firmware stalls forever.
    #[error("Hardware init failed: {0}")]
    HardwareInit(ErrorMessage),
    #[error("Quote update failed: {0}")]
    Quote(QuoteError),
    #[error("Scheduler error: {0}")]
    Scheduler(SchedulerError),
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        AppError::Quote(err)
    }
}

impl From<SchedulerError> for AppError {
    fn from(err: SchedulerError) -> Self {
        AppError::Scheduler(err)
    }
}

impl AppError {
    /// Whether the device has to stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::HardwareInit(_))
    }
}

/// Copy `value` into a fixed-capacity string, cutting it at the last char
/// boundary that fits.
pub fn truncated<const N: usize>(value: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in value.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Render any `Debug` value into a fixed-capacity string, truncating overflow.
pub fn debug_message<T: core::fmt::Debug, const N: usize>(value: &T) -> heapless::String<N> {
    let mut sink = Truncating::<N>(heapless::String::new());
    let _ = write!(sink, "{:?}", value);
    sink.0
}

/// Render any `Display` value into a fixed-capacity string, truncating overflow.
pub fn display_message<T: core::fmt::Display, const N: usize>(value: &T) -> heapless::String<N> {
    let mut sink = Truncating::<N>(heapless::String::new());
    let _ = write!(sink, "{}", value);
    sink.0
}

struct Truncating<const N: usize>(heapless::String<N>);

impl<const N: usize> core::fmt::Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_cuts_at_char_boundary() {
        let s: heapless::String<5> = truncated("ab°cdef");
        assert_eq!(s.as_str(), "ab°c");
    }

    #[test]
    fn debug_message_truncates_long_values() {
        let s: heapless::String<4> = debug_message(&"longer than four");
        assert_eq!(s.as_str(), "\"lon");
    }

    #[test]
    fn only_hardware_init_is_fatal() {
        assert!(AppError::HardwareInit(truncated("spi")).is_fatal());
        assert!(!AppError::Quote(QuoteError::NetworkUnavailable).is_fatal());
    }
}
