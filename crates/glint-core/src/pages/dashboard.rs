//! Smart-home dashboard
//!
//! Four appliance cards animated by periodic tasks:
//!
//! | Card | Widgets | Task |
//! |---|---|---|
//! | Vacuum | switch, battery slider, value label | [`LevelRamp`] |
//! | EV charger | switch, charge bar, value label | [`Sweep`] that resets when off |
//! | Smart plug | switch, watt label | [`Sweep`] that freezes when off |
//! | Washer | four programme buttons, time label | [`CountdownSelector`] |

use core::fmt::Write as _;

use embassy_time::Instant;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::info;

use super::constants::{
    CARD_GAP_PX, CARD_HEIGHT_PX, CARD_PADDING_PX, SELECT_BUTTON_GAP_PX, SELECT_BUTTON_HEIGHT_PX,
    SELECT_BUTTON_WIDTH_PX, SWITCH_HEIGHT_PX, SWITCH_WIDTH_PX, TRACK_HEIGHT_PX, TRACK_WIDTH_PX,
    WASHER_CARD_HEIGHT_PX,
};
use super::{add_card, add_title};
use crate::config::DashboardConfig;
use crate::display_sink::WidgetId;
use crate::scheduler::{Scheduler, SchedulerError, TaskHandler};
use crate::tasks::countdown::IDLE_TIME_TEXT;
use crate::tasks::{
    CountdownMode, CountdownSelector, CountdownWidgets, DashboardTask, IdleBehavior, LevelRamp,
    Sweep, SweepConfig,
};
use crate::ui::styling::WHITE;
use crate::ui::{LabelSize, Widget, WidgetTree};

/// Timers the dashboard registers.
pub const DASHBOARD_TIMERS: usize = 4;

/// Top of the first card
const FIRST_CARD_Y_PX: i32 = 70;

/// Offset of the track and value row from a card's top edge
const VALUE_ROW_OFFSET_PX: i32 = 62;

/// Offset of the programme buttons from the washer card's top edge
const BUTTON_ROW_OFFSET_PX: i32 = 70;

/// Every widget the dashboard tasks read or write.
#[derive(Debug, Clone, Copy)]
pub struct DashboardWidgets {
    pub vacuum_switch: WidgetId,
    pub vacuum_slider: WidgetId,
    pub vacuum_label: WidgetId,
    pub ev_switch: WidgetId,
    pub ev_bar: WidgetId,
    pub ev_label: WidgetId,
    pub plug_switch: WidgetId,
    pub plug_label: WidgetId,
    pub washer: CountdownWidgets,
}

impl DashboardWidgets {
    /// Lay the dashboard out into `tree`.
    pub fn build(tree: &mut WidgetTree, config: &DashboardConfig) -> Self {
        add_title(tree, "Home");

        let mut top = FIRST_CARD_Y_PX;
        let vacuum = add_card(tree, top, CARD_HEIGHT_PX, "Vacuum");
        let vacuum_level = i32::from(config.vacuum_initial_level);
        let vacuum_switch = tree.add(Widget::switch(switch_bounds(&vacuum), false));
        let vacuum_slider = tree.add(Widget::slider(
            track_bounds(&vacuum),
            crate::tasks::level_ramp::LEVEL_MIN,
            crate::tasks::level_ramp::LEVEL_MAX,
            vacuum_level,
        ));
        let vacuum_label = tree.add(value_label(&vacuum, vacuum_level));

        top += CARD_HEIGHT_PX as i32 + CARD_GAP_PX;
        let ev = add_card(tree, top, CARD_HEIGHT_PX, "EV Charger");
        let ev_switch = tree.add(Widget::switch(switch_bounds(&ev), false));
        let ev_bar = tree.add(Widget::bar(
            track_bounds(&ev),
            config.ev_low,
            config.ev_high,
            config.ev_low,
        ));
        let ev_label = tree.add(value_label(&ev, config.ev_low));

        top += CARD_HEIGHT_PX as i32 + CARD_GAP_PX;
        let plug = add_card(tree, top, CARD_HEIGHT_PX, "Smart Plug (W)");
        let plug_switch = tree.add(Widget::switch(switch_bounds(&plug), false));
        let mut watts = heapless::String::<12>::new();
        let _ = write!(watts, "{}", config.plug_low_w);
        let plug_label = tree.add(Widget::label(
            plug.top_left + Point::new(CARD_PADDING_PX, VALUE_ROW_OFFSET_PX),
            &watts,
            LabelSize::Large,
            WHITE,
        ));

        top += CARD_HEIGHT_PX as i32 + CARD_GAP_PX;
        let washer = add_card(tree, top, WASHER_CARD_HEIGHT_PX, "Washer");
        let time_label = tree.add(Widget::label(
            Point::new(
                washer.top_left.x + washer.size.width as i32 - CARD_PADDING_PX - 50,
                washer.top_left.y + 12,
            ),
            IDLE_TIME_TEXT,
            LabelSize::Large,
            WHITE,
        ));
        let mut buttons = [time_label; 4];
        for (index, mode) in CountdownMode::PRIORITY.iter().enumerate() {
            let x = washer.top_left.x
                + CARD_PADDING_PX
                + index as i32 * (SELECT_BUTTON_WIDTH_PX as i32 + SELECT_BUTTON_GAP_PX);
            let bounds = Rectangle::new(
                Point::new(x, washer.top_left.y + BUTTON_ROW_OFFSET_PX),
                Size::new(SELECT_BUTTON_WIDTH_PX, SELECT_BUTTON_HEIGHT_PX),
            );
            buttons[index] = tree.add(Widget::button(bounds, mode.caption()));
        }

        Self {
            vacuum_switch,
            vacuum_slider,
            vacuum_label,
            ev_switch,
            ev_bar,
            ev_label,
            plug_switch,
            plug_label,
            washer: CountdownWidgets {
                buttons,
                label: time_label,
            },
        }
    }
}

fn switch_bounds(card: &Rectangle) -> Rectangle {
    let x = card.top_left.x + card.size.width as i32 - CARD_PADDING_PX - SWITCH_WIDTH_PX as i32;
    Rectangle::new(
        Point::new(x, card.top_left.y + 10),
        Size::new(SWITCH_WIDTH_PX, SWITCH_HEIGHT_PX),
    )
}

fn track_bounds(card: &Rectangle) -> Rectangle {
    Rectangle::new(
        card.top_left + Point::new(CARD_PADDING_PX, VALUE_ROW_OFFSET_PX + 10),
        Size::new(TRACK_WIDTH_PX, TRACK_HEIGHT_PX),
    )
}

fn value_label(card: &Rectangle, value: i32) -> Widget {
    let mut text = heapless::String::<12>::new();
    let _ = write!(text, "{}", value);
    let x = card.top_left.x + CARD_PADDING_PX + TRACK_WIDTH_PX as i32 + 15;
    Widget::label(
        Point::new(x, card.top_left.y + VALUE_ROW_OFFSET_PX),
        &text,
        LabelSize::Large,
        WHITE,
    )
}

/// The dashboard application: its widgets and the timers that animate them.
#[derive(Debug)]
pub struct Dashboard {
    widgets: DashboardWidgets,
    scheduler: Scheduler<DashboardTask, DASHBOARD_TIMERS>,
}

impl Dashboard {
    /// Build the layout and register the four periodic tasks, first due one
    /// period after `now`.
    pub fn build(
        tree: &mut WidgetTree,
        config: &DashboardConfig,
        now: Instant,
    ) -> Result<Self, SchedulerError> {
        let widgets = DashboardWidgets::build(tree, config);
        let mut scheduler: Scheduler<DashboardTask, DASHBOARD_TIMERS> = Scheduler::new();

        let ramp = LevelRamp::new(
            widgets.vacuum_switch,
            widgets.vacuum_slider,
            widgets.vacuum_label,
            i32::from(config.vacuum_initial_level),
        );
        scheduler.create_timer(ramp.into(), config.level_period(), now)?;

        let ev = Sweep::new(
            "ev-charger",
            SweepConfig::new(config.ev_low, config.ev_high, IdleBehavior::Reset),
            widgets.ev_switch,
        )
        .with_output(widgets.ev_bar)
        .with_output(widgets.ev_label);
        scheduler.create_timer(ev.into(), config.sweep_period(), now)?;

        let plug = Sweep::new(
            "smart-plug",
            SweepConfig::new(config.plug_low_w, config.plug_high_w, IdleBehavior::Freeze),
            widgets.plug_switch,
        )
        .with_output(widgets.plug_label);
        scheduler.create_timer(plug.into(), config.sweep_period(), now)?;

        let washer = CountdownSelector::new(widgets.washer);
        scheduler.create_timer(washer.into(), config.countdown_period(), now)?;

        info!("Dashboard ready with {} timers", scheduler.len());
        Ok(Self { widgets, scheduler })
    }

    pub fn widgets(&self) -> &DashboardWidgets {
        &self.widgets
    }

    pub fn scheduler(&self) -> &Scheduler<DashboardTask, DASHBOARD_TIMERS> {
        &self.scheduler
    }
}

impl TaskHandler for Dashboard {
    fn run_due(&mut self, now: Instant, tree: &mut WidgetTree) -> usize {
        self.scheduler.handle(now, tree)
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::*;
    use crate::display_sink::DisplaySink;
    use crate::ui::{TouchEvent, TouchPoint};

    fn text(tree: &WidgetTree, id: WidgetId) -> &str {
        tree.get(id).and_then(Widget::text).unwrap_or("")
    }

    fn centre(tree: &WidgetTree, id: WidgetId) -> TouchPoint {
        let centre = tree.get(id).map(|w| w.bounds().center()).unwrap_or_default();
        TouchPoint::new(centre.x as u16, centre.y as u16)
    }

    #[test]
    fn layout_fits_the_screen_and_shows_initial_values() {
        let mut tree = WidgetTree::new();
        let config = DashboardConfig::default();
        let widgets = DashboardWidgets::build(&mut tree, &config);

        let screen = Rectangle::new(Point::zero(), Size::new(450, 600));
        for (_, widget) in tree.iter() {
            let bounds = widget.bounds();
            assert!(screen.contains(bounds.top_left), "{bounds:?} off screen");
            assert!(bounds.bottom_right().is_none_or(|corner| screen.contains(corner)));
        }
        assert_eq!(text(&tree, widgets.vacuum_label), "100");
        assert_eq!(text(&tree, widgets.ev_label), "0");
        assert_eq!(text(&tree, widgets.plug_label), "155");
        assert_eq!(text(&tree, widgets.washer.label), "00:00");
    }

    #[test]
    fn timers_animate_widgets() {
        let mut tree = WidgetTree::new();
        let start = Instant::from_millis(0);
        let mut dashboard = Dashboard::build(&mut tree, &DashboardConfig::default(), start).unwrap();
        let widgets = *dashboard.widgets();

        // Switch the EV charger and plug on by touch, then run one second.
        for switch in [widgets.ev_switch, widgets.plug_switch] {
            let point = centre(&tree, switch);
            assert_eq!(tree.handle_touch(TouchEvent::Press(point)), Some(switch));
        }
        tree.set_checked(widgets.washer.buttons[0], true);

        let mut now = start;
        for _ in 0..10 {
            now += Duration::from_millis(100);
            dashboard.run_due(now, &mut tree);
        }

        assert_eq!(tree.get(widgets.ev_bar).and_then(Widget::value), Some(10));
        assert_eq!(text(&tree, widgets.plug_label), "165");
        assert_eq!(tree.get(widgets.vacuum_slider).and_then(Widget::value), Some(100));
        assert_eq!(text(&tree, widgets.washer.label), "59:59");
        assert!(tree.toggle_state(widgets.ev_switch));
    }
}
