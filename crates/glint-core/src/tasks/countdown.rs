//! Washing-machine programme selector with a once-per-second countdown.
//!
//! Four checkable buttons choose a programme. The first checked button in
//! [`CountdownMode::PRIORITY`] order wins; picking a different programme
//! reloads its duration and unchecking every button cancels the countdown.

use core::fmt::Write as _;

use log::info;

use crate::display_sink::{DisplaySink, WidgetId};

use super::PeriodicTask;

/// Label text for a finished or idle countdown.
pub const IDLE_TIME_TEXT: &str = "00:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownMode {
    None,
    Smart,
    Quick,
    Linen,
    Saver,
}

impl CountdownMode {
    /// Selection order when more than one button is checked.
    pub const PRIORITY: [CountdownMode; 4] = [
        CountdownMode::Smart,
        CountdownMode::Quick,
        CountdownMode::Linen,
        CountdownMode::Saver,
    ];

    /// Programme length in seconds.
    pub const fn duration_secs(self) -> u32 {
        match self {
            CountdownMode::None => 0,
            CountdownMode::Smart => 3600,
            CountdownMode::Quick => 1800,
            CountdownMode::Linen => 2700,
            CountdownMode::Saver => 2400,
        }
    }

    pub const fn caption(self) -> &'static str {
        match self {
            CountdownMode::None => "",
            CountdownMode::Smart => "SMART",
            CountdownMode::Quick => "QUICK",
            CountdownMode::Linen => "LINEN",
            CountdownMode::Saver => "SAVER",
        }
    }
}

/// Format seconds as `MM:SS`. Minutes are not folded into hours.
pub fn format_mm_ss(total_secs: u32) -> heapless::String<8> {
    let mut text = heapless::String::new();
    let _ = write!(text, "{:02}:{:02}", total_secs / 60, total_secs % 60);
    text
}

/// Buttons in [`CountdownMode::PRIORITY`] order plus the time label.
#[derive(Debug, Clone, Copy)]
pub struct CountdownWidgets {
    pub buttons: [WidgetId; 4],
    pub label: WidgetId,
}

#[derive(Debug, Clone)]
pub struct CountdownSelector {
    widgets: CountdownWidgets,
    mode: CountdownMode,
    remaining_secs: u32,
}

impl CountdownSelector {
    pub fn new(widgets: CountdownWidgets) -> Self {
        Self {
            widgets,
            mode: CountdownMode::None,
            remaining_secs: 0,
        }
    }

    pub fn mode(&self) -> CountdownMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    fn selected<S: DisplaySink + ?Sized>(&self, sink: &S) -> CountdownMode {
        CountdownMode::PRIORITY
            .iter()
            .zip(self.widgets.buttons)
            .find(|(_, button)| sink.toggle_state(*button))
            .map(|(mode, _)| *mode)
            .unwrap_or(CountdownMode::None)
    }
}

impl PeriodicTask for CountdownSelector {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn tick<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        let selected = self.selected(sink);
        if selected != self.mode {
            if selected != CountdownMode::None {
                info!("Programme {} selected", selected.caption());
            }
            self.mode = selected;
            self.remaining_secs = selected.duration_secs();
        }

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            let text = format_mm_ss(self.remaining_secs);
            sink.set_text_value(self.widgets.label, &text);
        } else {
            sink.set_text_value(self.widgets.label, IDLE_TIME_TEXT);
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use super::*;
    use crate::ui::{LabelSize, Widget, WidgetTree, styling::WHITE};

    fn setup() -> (WidgetTree, CountdownWidgets, CountdownSelector) {
        let mut tree = WidgetTree::new();
        let buttons = CountdownMode::PRIORITY
            .map(|mode| tree.add(Widget::button(Rectangle::zero(), mode.caption())));
        let label = tree.add(Widget::label(Point::zero(), IDLE_TIME_TEXT, LabelSize::Large, WHITE));
        let widgets = CountdownWidgets { buttons, label };
        (tree, widgets, CountdownSelector::new(widgets))
    }

    fn label_text(tree: &WidgetTree, widgets: &CountdownWidgets) -> heapless::String<8> {
        crate::app_state::truncated(tree.get(widgets.label).and_then(Widget::text).unwrap_or(""))
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(125), "02:05");
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn selecting_a_mode_loads_and_counts_down() {
        let (mut tree, widgets, mut selector) = setup();
        tree.set_checked(widgets.buttons[1], true);

        selector.tick(&mut tree);
        assert_eq!(selector.mode(), CountdownMode::Quick);
        assert_eq!(selector.remaining_secs(), 1799);
        assert_eq!(label_text(&tree, &widgets), "29:59");

        selector.tick(&mut tree);
        assert_eq!(selector.remaining_secs(), 1798);
    }

    #[test]
    fn priority_order_breaks_ties() {
        let (mut tree, widgets, mut selector) = setup();
        tree.set_checked(widgets.buttons[3], true);
        tree.set_checked(widgets.buttons[2], true);

        selector.tick(&mut tree);
        assert_eq!(selector.mode(), CountdownMode::Linen);

        tree.set_checked(widgets.buttons[0], true);
        selector.tick(&mut tree);
        assert_eq!(selector.mode(), CountdownMode::Smart);
        assert_eq!(selector.remaining_secs(), 3599);
    }

    #[test]
    fn deselecting_everything_resets_immediately() {
        let (mut tree, widgets, mut selector) = setup();
        tree.set_checked(widgets.buttons[0], true);
        for _ in 0..10 {
            selector.tick(&mut tree);
        }

        tree.set_checked(widgets.buttons[0], false);
        selector.tick(&mut tree);
        assert_eq!(selector.mode(), CountdownMode::None);
        assert_eq!(selector.remaining_secs(), 0);
        assert_eq!(label_text(&tree, &widgets), IDLE_TIME_TEXT);
    }

    #[test]
    fn finished_countdown_holds_at_zero() {
        let (mut tree, widgets, mut selector) = setup();
        tree.set_checked(widgets.buttons[2], true);
        for _ in 0..CountdownMode::Linen.duration_secs() + 5 {
            selector.tick(&mut tree);
        }
        assert_eq!(selector.mode(), CountdownMode::Linen);
        assert_eq!(selector.remaining_secs(), 0);
        assert_eq!(label_text(&tree, &widgets), IDLE_TIME_TEXT);
    }
}
