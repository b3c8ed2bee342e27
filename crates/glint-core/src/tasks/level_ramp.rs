//! Battery-style level that drains while its switch is on and recharges while
//! it is off.

use crate::display_sink::{DisplaySink, WidgetId};

use super::PeriodicTask;

/// Lowest level the ramp reaches.
pub const LEVEL_MIN: i32 = 0;

/// Highest level the ramp reaches.
pub const LEVEL_MAX: i32 = 100;

#[derive(Debug, Clone)]
pub struct LevelRamp {
    toggle: WidgetId,
    slider: WidgetId,
    label: WidgetId,
    level: i32,
}

impl LevelRamp {
    pub fn new(toggle: WidgetId, slider: WidgetId, label: WidgetId, initial: i32) -> Self {
        Self {
            toggle,
            slider,
            label,
            level: initial.clamp(LEVEL_MIN, LEVEL_MAX),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl PeriodicTask for LevelRamp {
    fn name(&self) -> &'static str {
        "level-ramp"
    }

    fn tick<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        self.level = if sink.toggle_state(self.toggle) {
            (self.level - 1).max(LEVEL_MIN)
        } else {
            (self.level + 1).min(LEVEL_MAX)
        };

        sink.set_numeric_value(self.slider, self.level);
        sink.set_numeric_value(self.label, self.level);
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use super::*;
    use crate::ui::{LabelSize, Widget, WidgetTree, styling::WHITE};

    fn setup(initial: i32) -> (WidgetTree, WidgetId, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let toggle = tree.add(Widget::switch(Rectangle::zero(), false));
        let slider = tree.add(Widget::slider(Rectangle::zero(), LEVEL_MIN, LEVEL_MAX, initial));
        let label = tree.add(Widget::label(Point::zero(), "", LabelSize::Small, WHITE));
        (tree, toggle, slider, label)
    }

    #[test]
    fn moves_one_step_per_tick_by_toggle() {
        let (mut tree, toggle, slider, label) = setup(50);
        let mut ramp = LevelRamp::new(toggle, slider, label, 50);

        ramp.tick(&mut tree);
        assert_eq!(ramp.level(), 51);

        tree.set_checked(toggle, true);
        ramp.tick(&mut tree);
        ramp.tick(&mut tree);
        assert_eq!(ramp.level(), 49);
        assert_eq!(tree.get(slider).and_then(Widget::value), Some(49));
        assert_eq!(tree.get(label).and_then(Widget::text), Some("49"));
    }

    #[test]
    fn saturates_at_both_ends() {
        let (mut tree, toggle, slider, label) = setup(100);
        let mut ramp = LevelRamp::new(toggle, slider, label, 100);
        ramp.tick(&mut tree);
        assert_eq!(ramp.level(), 100);

        tree.set_checked(toggle, true);
        for _ in 0..150 {
            ramp.tick(&mut tree);
            assert!((LEVEL_MIN..=LEVEL_MAX).contains(&ramp.level()));
        }
        assert_eq!(ramp.level(), 0);
        assert_eq!(tree.get(label).and_then(Widget::text), Some("0"));
    }
}
