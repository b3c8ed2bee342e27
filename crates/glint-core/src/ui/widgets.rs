//! Widget kinds stored in the [`WidgetTree`](super::WidgetTree).
//!
//! Each widget is a plain value: its bounds plus kind-specific state. Drawing
//! is stateless so the tree can redraw everything into a framebuffer and let
//! the framebuffer work out which pixels actually changed.

use embedded_graphics::mono_font::{
    MonoFont, MonoTextStyle,
    ascii::{FONT_6X10, FONT_9X15, FONT_10X20},
};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::styling::{COLOR_ACCENT, COLOR_STROKE, COLOR_SURFACE, COLOR_TRACK, WHITE};

/// Maximum characters a label or button caption can hold
pub const MAX_LABEL_LEN: usize = 32;

pub type LabelText = heapless::String<MAX_LABEL_LEN>;

/// Corner radius of buttons and cards
const BUTTON_RADIUS_PX: u32 = 8;

/// Knob overhang of a slider beyond its track, per side
const SLIDER_KNOB_OVERHANG_PX: u32 = 3;

/// Gap between a switch's knob and its track edge
const SWITCH_KNOB_INSET_PX: u32 = 3;

/// Font size for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSize {
    /// 6x10 font
    Small,
    /// 9x15 font
    Medium,
    /// 10x20 font
    Large,
}

impl LabelSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            LabelSize::Small => &FONT_6X10,
            LabelSize::Medium => &FONT_9X15,
            LabelSize::Large => &FONT_10X20,
        }
    }

    /// Bounding size of `chars` characters in this font.
    pub fn text_size(self, chars: usize) -> Size {
        let font = self.font();
        Size::new(
            font.character_size.width * chars as u32,
            font.character_size.height,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: LabelText,
    color: Rgb565,
    size: LabelSize,
}

/// Integer value within an inclusive range, shared by sliders and bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    value: i32,
    min: i32,
    max: i32,
}

impl Level {
    pub fn new(min: i32, max: i32, value: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Store `value` clamped to the range. Returns whether it changed.
    fn set(&mut self, value: i32) -> bool {
        let value = value.clamp(self.min, self.max);
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Position of the value within the range, 0.0..=1.0
    fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span == 0 {
            return 0.0;
        }
        (self.value - self.min) as f32 / span as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectButton {
    caption: LabelText,
    checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    fill: Rgb565,
    radius: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Label(Label),
    Slider(Level),
    Bar(Level),
    Switch(bool),
    Button(SelectButton),
    Panel(Panel),
}

/// A widget: bounds plus kind-specific state
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    bounds: Rectangle,
    kind: WidgetKind,
}

impl Widget {
    /// Text label anchored at its top-left corner. Over-long text is truncated.
    pub fn label(top_left: Point, text: &str, size: LabelSize, color: Rgb565) -> Self {
        let text: LabelText = crate::app_state::truncated(text);
        let bounds = Rectangle::new(top_left, size.text_size(text.chars().count()));
        Self {
            bounds,
            kind: WidgetKind::Label(Label { text, color, size }),
        }
    }

    /// Draggable-looking level indicator with a knob.
    pub fn slider(bounds: Rectangle, min: i32, max: i32, value: i32) -> Self {
        Self {
            bounds,
            kind: WidgetKind::Slider(Level::new(min, max, value)),
        }
    }

    /// Plain fill bar.
    pub fn bar(bounds: Rectangle, min: i32, max: i32, value: i32) -> Self {
        Self {
            bounds,
            kind: WidgetKind::Bar(Level::new(min, max, value)),
        }
    }

    /// On/off switch.
    pub fn switch(bounds: Rectangle, checked: bool) -> Self {
        Self {
            bounds,
            kind: WidgetKind::Switch(checked),
        }
    }

    /// Checkable button that stays pressed until touched again.
    pub fn button(bounds: Rectangle, caption: &str) -> Self {
        Self {
            bounds,
            kind: WidgetKind::Button(SelectButton {
                caption: crate::app_state::truncated(caption),
                checked: false,
            }),
        }
    }

    /// Filled rectangle.
    pub fn panel(bounds: Rectangle, fill: Rgb565) -> Self {
        Self {
            bounds,
            kind: WidgetKind::Panel(Panel { fill, radius: 0 }),
        }
    }

    /// Round the corners of a panel. No effect on other kinds.
    pub fn with_radius(mut self, radius: u32) -> Self {
        if let WidgetKind::Panel(panel) = &mut self.kind {
            panel.radius = radius;
        }
        self
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    /// Whether a touch flips this widget's checked state.
    pub fn is_toggleable(&self) -> bool {
        matches!(self.kind, WidgetKind::Switch(_) | WidgetKind::Button(_))
    }

    pub fn is_checked(&self) -> bool {
        match &self.kind {
            WidgetKind::Switch(checked) => *checked,
            WidgetKind::Button(button) => button.checked,
            _ => false,
        }
    }

    /// Returns whether the state changed. Non-toggleable widgets never change.
    pub fn set_checked(&mut self, checked: bool) -> bool {
        let slot = match &mut self.kind {
            WidgetKind::Switch(state) => state,
            WidgetKind::Button(button) => &mut button.checked,
            _ => return false,
        };
        let changed = *slot != checked;
        *slot = checked;
        changed
    }

    pub fn value(&self) -> Option<i32> {
        match &self.kind {
            WidgetKind::Slider(level) | WidgetKind::Bar(level) => Some(level.value()),
            _ => None,
        }
    }

    /// Returns whether anything changed.
    pub fn set_value(&mut self, value: i32) -> bool {
        match &mut self.kind {
            WidgetKind::Slider(level) | WidgetKind::Bar(level) => level.set(value),
            _ => false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Label(label) => Some(label.text.as_str()),
            WidgetKind::Button(button) => Some(button.caption.as_str()),
            _ => None,
        }
    }

    /// Replace a label's text, resizing its bounds. Returns whether it changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        let WidgetKind::Label(label) = &mut self.kind else {
            return false;
        };
        let text: LabelText = crate::app_state::truncated(text);
        if label.text == text {
            return false;
        }
        label.text = text;
        self.bounds.size = label.size.text_size(label.text.chars().count());
        true
    }

    /// Fill colour of a panel or text colour of a label.
    pub fn color(&self) -> Option<Rgb565> {
        match &self.kind {
            WidgetKind::Panel(panel) => Some(panel.fill),
            WidgetKind::Label(label) => Some(label.color),
            _ => None,
        }
    }

    /// Change a panel's fill colour or a label's text colour.
    pub fn set_color(&mut self, color: Rgb565) -> bool {
        let slot = match &mut self.kind {
            WidgetKind::Panel(panel) => &mut panel.fill,
            WidgetKind::Label(label) => &mut label.color,
            _ => return false,
        };
        let changed = *slot != color;
        *slot = color;
        changed
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        match &self.kind {
            WidgetKind::Label(label) => {
                let style = MonoTextStyle::new(label.size.font(), label.color);
                Text::with_baseline(&label.text, self.bounds.top_left, style, Baseline::Top)
                    .draw(display)?;
            }
            WidgetKind::Slider(level) => {
                let fill_end = self.draw_track(level, display)?;
                let diameter = self.bounds.size.height + 2 * SLIDER_KNOB_OVERHANG_PX;
                let center = Point::new(fill_end, self.bounds.center().y);
                Circle::with_center(center, diameter)
                    .into_styled(PrimitiveStyle::with_fill(WHITE))
                    .draw(display)?;
            }
            WidgetKind::Bar(level) => {
                self.draw_track(level, display)?;
            }
            WidgetKind::Switch(checked) => {
                let height = self.bounds.size.height;
                let track = if *checked { COLOR_ACCENT } else { COLOR_TRACK };
                RoundedRectangle::with_equal_corners(self.bounds, Size::new(height / 2, height / 2))
                    .into_styled(PrimitiveStyle::with_fill(track))
                    .draw(display)?;

                let diameter = height.saturating_sub(2 * SWITCH_KNOB_INSET_PX);
                let radius = (height / 2) as i32;
                let knob_x = if *checked {
                    self.bounds.top_left.x + self.bounds.size.width as i32 - radius
                } else {
                    self.bounds.top_left.x + radius
                };
                Circle::with_center(Point::new(knob_x, self.bounds.center().y), diameter)
                    .into_styled(PrimitiveStyle::with_fill(WHITE))
                    .draw(display)?;
            }
            WidgetKind::Button(button) => {
                let fill = if button.checked {
                    COLOR_ACCENT
                } else {
                    COLOR_SURFACE
                };
                let style = PrimitiveStyleBuilder::new()
                    .fill_color(fill)
                    .stroke_color(COLOR_STROKE)
                    .stroke_width(1)
                    .build();
                RoundedRectangle::with_equal_corners(
                    self.bounds,
                    Size::new(BUTTON_RADIUS_PX, BUTTON_RADIUS_PX),
                )
                .into_styled(style)
                .draw(display)?;

                let text_style = TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Middle)
                    .build();
                Text::with_text_style(
                    &button.caption,
                    self.bounds.center(),
                    MonoTextStyle::new(&FONT_9X15, WHITE),
                    text_style,
                )
                .draw(display)?;
            }
            WidgetKind::Panel(panel) => {
                let style = PrimitiveStyle::with_fill(panel.fill);
                if panel.radius == 0 {
                    self.bounds.into_styled(style).draw(display)?;
                } else {
                    RoundedRectangle::with_equal_corners(
                        self.bounds,
                        Size::new(panel.radius, panel.radius),
                    )
                    .into_styled(style)
                    .draw(display)?;
                }
            }
        }
        Ok(())
    }

    /// Draw the track and its filled part; returns the x of the fill's end.
    fn draw_track<D: DrawTarget<Color = Rgb565>>(
        &self,
        level: &Level,
        display: &mut D,
    ) -> Result<i32, D::Error> {
        let height = self.bounds.size.height;
        let corners = Size::new(height / 2, height / 2);
        RoundedRectangle::with_equal_corners(self.bounds, corners)
            .into_styled(PrimitiveStyle::with_fill(COLOR_TRACK))
            .draw(display)?;

        let filled_width = (self.bounds.size.width as f32 * level.fraction()) as u32;
        if filled_width > 0 {
            let filled = Rectangle::new(self.bounds.top_left, Size::new(filled_width, height));
            RoundedRectangle::with_equal_corners(filled, corners)
                .into_styled(PrimitiveStyle::with_fill(COLOR_ACCENT))
                .draw(display)?;
        }
        Ok(self.bounds.top_left.x + filled_width as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_clamps_into_range() {
        let mut slider = Widget::slider(Rectangle::zero(), 0, 100, 150);
        assert_eq!(slider.value(), Some(100));
        assert!(slider.set_value(-5));
        assert_eq!(slider.value(), Some(0));
        assert!(!slider.set_value(0));
    }

    #[test]
    fn label_bounds_follow_text() {
        let mut label = Widget::label(Point::new(10, 10), "42", LabelSize::Large, WHITE);
        assert_eq!(label.bounds().size, Size::new(20, 20));
        assert!(label.set_text("100"));
        assert_eq!(label.bounds().size, Size::new(30, 20));
        assert!(!label.set_text("100"));
    }

    #[test]
    fn only_switches_and_buttons_toggle() {
        let mut button = Widget::button(Rectangle::zero(), "SMART");
        assert!(button.is_toggleable());
        assert!(button.set_checked(true));
        assert!(button.is_checked());

        let mut bar = Widget::bar(Rectangle::zero(), 0, 10, 5);
        assert!(!bar.is_toggleable());
        assert!(!bar.set_checked(true));
        assert!(!bar.is_checked());
    }
}
