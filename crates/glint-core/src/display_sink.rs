//! The seam between application logic and the widget layer.
//!
//! Periodic tasks and the stock board never touch widgets directly; they write
//! values and read toggles through [`DisplaySink`]. The widget tree implements
//! it for real rendering, and tests can substitute any recording type.

use core::fmt;

/// Handle to a widget in a [`WidgetTree`](crate::ui::WidgetTree).
///
/// The generation makes ids of deleted widgets stale instead of letting them
/// alias whatever widget later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    pub(crate) index: u16,
    pub(crate) generation: u16,
}

impl WidgetId {
    /// Id handed out when the tree is full. Its slot is never allocated.
    pub(crate) const DANGLING: WidgetId = WidgetId::new(u16::MAX, 0);

    pub(crate) const fn new(index: u16, generation: u16) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Capabilities the periodic tasks and the stock board need from the display.
pub trait DisplaySink {
    /// Set the value of a slider or bar, or the text of a label as an integer.
    fn set_numeric_value(&mut self, id: WidgetId, value: i32);

    /// Set the text of a label.
    fn set_text_value(&mut self, id: WidgetId, text: &str);

    /// Whether a switch or checkable button is currently on.
    fn toggle_state(&self, id: WidgetId) -> bool;
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn set_numeric_value(&mut self, id: WidgetId, value: i32) {
        (**self).set_numeric_value(id, value)
    }

    fn set_text_value(&mut self, id: WidgetId, text: &str) {
        (**self).set_text_value(id, text)
    }

    fn toggle_state(&self, id: WidgetId) -> bool {
        (**self).toggle_state(id)
    }
}
