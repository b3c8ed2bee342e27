//! Retained widget store.
//!
//! [`WidgetTree`] owns every widget on screen. Logic writes to it through
//! [`DisplaySink`] and [`ChartCanvas`]; the dispatcher redraws it whenever it
//! is dirty. Deleted slots are recycled with a bumped generation so stale
//! [`WidgetId`]s are rejected instead of hitting the wrong widget.

use alloc::vec::Vec;
use core::fmt::Write as _;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{error, warn};

use crate::chart::ChartCanvas;
use crate::display_sink::{DisplaySink, WidgetId};

use super::core::TouchEvent;
use super::styling::COLOR_BACKGROUND;
use super::widgets::{LabelSize, Widget, WidgetKind};

#[derive(Debug)]
struct Slot {
    generation: u16,
    widget: Option<Widget>,
}

#[derive(Debug)]
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<u16>,
    live: usize,
    dirty: bool,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            dirty: true,
        }
    }

    /// Insert a widget, reusing a freed slot when one is available.
    ///
    /// When every slot is taken the widget is dropped and the returned id
    /// never resolves.
    pub fn add(&mut self, widget: Widget) -> WidgetId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.widget = Some(widget);
            self.live += 1;
            self.dirty = true;
            return WidgetId::new(index, slot.generation);
        }

        let index = match u16::try_from(self.slots.len()) {
            Ok(index) if index < WidgetId::DANGLING.index => index,
            _ => {
                error!("Widget slots exhausted ({}), dropping widget", self.slots.len());
                return WidgetId::DANGLING;
            }
        };
        self.slots.push(Slot {
            generation: 0,
            widget: Some(widget),
        });
        self.live += 1;
        self.dirty = true;
        WidgetId::new(index, 0)
    }

    /// Delete a widget. Returns it, or `None` if the id was unknown or stale.
    pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let widget = slot.widget.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        self.dirty = true;
        Some(widget)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.widget.as_ref())
    }

    fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.widget.as_mut())
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live widgets in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.widget
                .as_ref()
                .map(|widget| (WidgetId::new(index as u16, slot.generation), widget))
        })
    }

    /// Set a switch or checkable button. Returns whether it changed.
    pub fn set_checked(&mut self, id: WidgetId, checked: bool) -> bool {
        let changed = self
            .get_mut(id)
            .map(|widget| widget.set_checked(checked))
            .unwrap_or(false);
        self.dirty |= changed;
        changed
    }

    /// Route a touch to the topmost toggleable widget under the point.
    ///
    /// Returns the id of the widget that flipped, if any.
    pub fn handle_touch(&mut self, event: TouchEvent) -> Option<WidgetId> {
        let TouchEvent::Press(point) = event else {
            return None;
        };
        let point = point.to_point();

        let hit = self.iter().filter(|(_, widget)| {
            widget.is_toggleable() && widget.bounds().contains(point)
        });
        let (id, checked) = hit.last().map(|(id, widget)| (id, widget.is_checked()))?;

        self.set_checked(id, !checked);
        Some(id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Redraw the whole tree: background first, then widgets in slot order.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.clear(COLOR_BACKGROUND)?;
        for (_, widget) in self.iter() {
            widget.draw(display)?;
        }
        Ok(())
    }
}

impl DisplaySink for WidgetTree {
    fn set_numeric_value(&mut self, id: WidgetId, value: i32) {
        let Some(widget) = self.get_mut(id) else {
            warn!("Ignoring value {} for unknown widget {}", value, id);
            return;
        };

        let changed = match widget.kind() {
            WidgetKind::Slider(_) | WidgetKind::Bar(_) => widget.set_value(value),
            WidgetKind::Label(_) => {
                let mut text = heapless::String::<12>::new();
                let _ = write!(text, "{}", value);
                widget.set_text(&text)
            }
            _ => {
                warn!("Widget {} does not take numeric values", id);
                false
            }
        };
        self.dirty |= changed;
    }

    fn set_text_value(&mut self, id: WidgetId, text: &str) {
        let Some(widget) = self.get_mut(id) else {
            warn!("Ignoring text for unknown widget {}", id);
            return;
        };
        if !matches!(widget.kind(), WidgetKind::Label(_)) {
            warn!("Widget {} does not take text", id);
            return;
        }
        let changed = widget.set_text(text);
        self.dirty |= changed;
    }

    fn toggle_state(&self, id: WidgetId) -> bool {
        match self.get(id) {
            Some(widget) => widget.is_checked(),
            None => {
                warn!("Toggle query for unknown widget {}", id);
                false
            }
        }
    }
}

impl ChartCanvas for WidgetTree {
    fn create_rect(&mut self, bounds: Rectangle, fill: Rgb565) -> WidgetId {
        self.add(Widget::panel(bounds, fill))
    }

    fn create_label(&mut self, top_left: Point, text: &str, color: Rgb565) -> WidgetId {
        self.add(Widget::label(top_left, text, LabelSize::Small, color))
    }

    fn set_fill(&mut self, id: WidgetId, fill: Rgb565) {
        match self.get_mut(id) {
            Some(widget) => {
                let changed = widget.set_color(fill);
                self.dirty |= changed;
            }
            None => warn!("Ignoring fill for unknown widget {}", id),
        }
    }

    fn delete(&mut self, id: WidgetId) -> bool {
        self.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::TouchPoint;
    use crate::ui::styling::WHITE;

    fn switch_at(tree: &mut WidgetTree, x: i32, y: i32) -> WidgetId {
        tree.add(Widget::switch(
            Rectangle::new(Point::new(x, y), Size::new(60, 30)),
            false,
        ))
    }

    #[test]
    fn removed_ids_go_stale() {
        let mut tree = WidgetTree::new();
        let first = tree.add(Widget::label(Point::zero(), "a", LabelSize::Small, WHITE));
        assert!(tree.remove(first).is_some());

        let second = tree.add(Widget::label(Point::zero(), "b", LabelSize::Small, WHITE));
        assert_eq!(first.index(), second.index());
        assert!(!tree.contains(first));
        assert!(tree.remove(first).is_none());
        assert_eq!(tree.get(second).and_then(|w| w.text()), Some("b"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn sink_writes_update_widgets_and_dirty_flag() {
        let mut tree = WidgetTree::new();
        let slider = tree.add(Widget::slider(Rectangle::zero(), 0, 100, 50));
        let label = tree.add(Widget::label(Point::zero(), "", LabelSize::Small, WHITE));
        tree.mark_clean();

        tree.set_numeric_value(slider, 49);
        tree.set_numeric_value(label, 49);
        assert!(tree.is_dirty());
        assert_eq!(tree.get(slider).and_then(Widget::value), Some(49));
        assert_eq!(tree.get(label).and_then(Widget::text), Some("49"));

        tree.mark_clean();
        tree.set_text_value(label, "49");
        assert!(!tree.is_dirty());
    }

    #[test]
    fn writes_to_stale_ids_are_ignored() {
        let mut tree = WidgetTree::new();
        let label = tree.add(Widget::label(Point::zero(), "x", LabelSize::Small, WHITE));
        tree.remove(label);
        tree.mark_clean();

        tree.set_text_value(label, "y");
        tree.set_numeric_value(label, 3);
        assert!(!tree.toggle_state(label));
        assert!(!tree.is_dirty());
    }

    #[test]
    fn touch_toggles_topmost_switch() {
        let mut tree = WidgetTree::new();
        let lower = switch_at(&mut tree, 0, 0);
        let upper = switch_at(&mut tree, 10, 0);

        let hit = tree.handle_touch(TouchEvent::Press(TouchPoint::new(20, 10)));
        assert_eq!(hit, Some(upper));
        assert!(tree.toggle_state(upper));
        assert!(!tree.toggle_state(lower));

        assert_eq!(
            tree.handle_touch(TouchEvent::Press(TouchPoint::new(300, 300))),
            None
        );
        assert_eq!(
            tree.handle_touch(TouchEvent::Release(TouchPoint::new(20, 10))),
            None
        );
    }

    #[test]
    fn rewriting_long_label_text_is_not_a_change() {
        let mut tree = WidgetTree::new();
        let label = tree.add(Widget::label(Point::zero(), "", LabelSize::Small, WHITE));
        let long = "Last refreshed 2024-03-15 16:00:00 US/Eastern";

        tree.set_text_value(label, long);
        tree.mark_clean();
        tree.set_text_value(label, long);
        assert!(!tree.is_dirty());
        assert_eq!(
            tree.get(label).and_then(Widget::text).map(str::len),
            Some(crate::ui::widgets::MAX_LABEL_LEN)
        );
    }

    #[test]
    fn full_tree_refuses_new_widgets() {
        let mut tree = WidgetTree::new();
        for _ in 0..u16::MAX {
            tree.add(Widget::switch(Rectangle::zero(), false));
        }
        assert_eq!(tree.len(), u16::MAX as usize);
        tree.mark_clean();

        let overflow = tree.add(Widget::switch(Rectangle::zero(), false));
        assert!(!tree.contains(overflow));
        assert_eq!(tree.len(), u16::MAX as usize);
        assert!(!tree.is_dirty());

        let first = tree.iter().next().map(|(id, _)| id);
        assert!(first.is_some_and(|id| tree.remove(id).is_some()));
        let reused = tree.add(Widget::switch(Rectangle::zero(), false));
        assert!(tree.contains(reused));
    }
}
