//! Value that sweeps back and forth between two bounds while its switch is on.
//!
//! Drives the EV charger bar and the smart-plug wattage. What happens while
//! the switch is off depends on the instance's [`IdleBehavior`].

use crate::display_sink::{DisplaySink, WidgetId};

use super::PeriodicTask;

/// What a sweep does on ticks where its switch is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleBehavior {
    /// Drop to the low bound, head upward again and publish the reset value.
    Reset,
    /// Hold the current value and direction without writing anything.
    Freeze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    pub low: i32,
    pub high: i32,
    pub step: i32,
    pub idle: IdleBehavior,
}

impl SweepConfig {
    pub const fn new(low: i32, high: i32, idle: IdleBehavior) -> Self {
        Self {
            low,
            high,
            step: 1,
            idle,
        }
    }

    pub const fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Sweep {
    name: &'static str,
    config: SweepConfig,
    toggle: WidgetId,
    /// Every widget that mirrors the value (bar and/or label).
    outputs: heapless::Vec<WidgetId, 2>,
    value: i32,
    ascending: bool,
}

impl Sweep {
    pub fn new(name: &'static str, config: SweepConfig, toggle: WidgetId) -> Self {
        Self {
            name,
            config,
            toggle,
            outputs: heapless::Vec::new(),
            value: config.low,
            ascending: true,
        }
    }

    /// Mirror the value onto `widget`. At most two outputs are kept.
    pub fn with_output(mut self, widget: WidgetId) -> Self {
        if self.outputs.push(widget).is_err() {
            log::warn!("{} already has {} outputs", self.name, self.outputs.len());
        }
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    fn advance(&mut self) {
        let SweepConfig { low, high, step, .. } = self.config;
        if self.ascending {
            self.value += step;
            if self.value >= high {
                self.value = high;
                self.ascending = false;
            }
        } else {
            self.value -= step;
            if self.value <= low {
                self.value = low;
                self.ascending = true;
            }
        }
    }

    fn publish<S: DisplaySink + ?Sized>(&self, sink: &mut S) {
        for &widget in &self.outputs {
            sink.set_numeric_value(widget, self.value);
        }
    }
}

impl PeriodicTask for Sweep {
    fn name(&self) -> &'static str {
        self.name
    }

    fn tick<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        if sink.toggle_state(self.toggle) {
            self.advance();
            self.publish(sink);
            return;
        }

        match self.config.idle {
            IdleBehavior::Reset => {
                self.value = self.config.low;
                self.ascending = true;
                self.publish(sink);
            }
            IdleBehavior::Freeze => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use super::*;
    use crate::ui::{LabelSize, Widget, WidgetTree, styling::WHITE};

    fn setup(idle: IdleBehavior, low: i32, high: i32) -> (WidgetTree, WidgetId, WidgetId, Sweep) {
        let mut tree = WidgetTree::new();
        let toggle = tree.add(Widget::switch(Rectangle::zero(), true));
        let label = tree.add(Widget::label(Point::zero(), "", LabelSize::Small, WHITE));
        let sweep = Sweep::new("test", SweepConfig::new(low, high, idle), toggle).with_output(label);
        (tree, toggle, label, sweep)
    }

    #[test]
    fn stays_in_bounds_and_reverses_at_each_bound() {
        let (mut tree, _, _, mut sweep) = setup(IdleBehavior::Freeze, 155, 199);
        let mut reversals = 0;
        let mut previous = sweep.is_ascending();

        for _ in 0..200 {
            sweep.tick(&mut tree);
            assert!((155..=199).contains(&sweep.value()));
            if sweep.is_ascending() != previous {
                assert!(sweep.value() == 155 || sweep.value() == 199);
                reversals += 1;
                previous = sweep.is_ascending();
            }
        }
        // 44 steps up, 44 down, 44 up, 44 down, then part of the way up
        assert_eq!(reversals, 4);
    }

    #[test]
    fn freeze_holds_value_without_writing() {
        let (mut tree, toggle, label, mut sweep) = setup(IdleBehavior::Freeze, 155, 199);
        for _ in 0..3 {
            sweep.tick(&mut tree);
        }
        assert_eq!(tree.get(label).and_then(Widget::text), Some("158"));

        tree.set_checked(toggle, false);
        tree.set_text_value(label, "sentinel");
        sweep.tick(&mut tree);
        assert_eq!(sweep.value(), 158);
        assert_eq!(tree.get(label).and_then(Widget::text), Some("sentinel"));
    }

    #[test]
    fn reset_returns_to_low_and_ascends_again() {
        let (mut tree, toggle, label, mut sweep) = setup(IdleBehavior::Reset, 0, 100);
        for _ in 0..120 {
            sweep.tick(&mut tree);
        }
        assert!(!sweep.is_ascending());

        tree.set_checked(toggle, false);
        sweep.tick(&mut tree);
        assert_eq!(sweep.value(), 0);
        assert!(sweep.is_ascending());
        assert_eq!(tree.get(label).and_then(Widget::text), Some("0"));

        tree.set_checked(toggle, true);
        sweep.tick(&mut tree);
        assert_eq!(sweep.value(), 1);
    }

    #[test]
    fn uneven_step_clamps_at_both_bounds() {
        let mut tree = WidgetTree::new();
        let toggle = tree.add(Widget::switch(Rectangle::zero(), true));
        let config = SweepConfig::new(155, 199, IdleBehavior::Freeze).with_step(10);
        let mut sweep = Sweep::new("plug", config, toggle);

        let values: Vec<i32> = (0..11)
            .map(|_| {
                sweep.tick(&mut tree);
                sweep.value()
            })
            .collect();
        assert_eq!(
            values,
            [165, 175, 185, 195, 199, 189, 179, 169, 159, 155, 165]
        );
    }
}
