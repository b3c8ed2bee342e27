//! The two screens: the smart-home dashboard and the stock board.
//!
//! Each page builds its widgets into a [`WidgetTree`](crate::ui::WidgetTree)
//! once, keeps the ids it needs and from then on only writes values.

pub mod constants;
pub mod dashboard;
pub mod stock;

pub use dashboard::{Dashboard, DashboardWidgets};
pub use stock::{StockBoard, StockWidgets};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::styling::{COLOR_SURFACE, LIGHT_GRAY, WHITE};
use crate::ui::{LabelSize, Widget, WidgetTree};

use constants::{CARD_RADIUS_PX, CARD_WIDTH_PX, PAGE_MARGIN_PX};

/// Add a screen title in the header row.
fn add_title(tree: &mut WidgetTree, text: &str) {
    tree.add(Widget::label(
        Point::new(PAGE_MARGIN_PX, 20),
        text,
        LabelSize::Large,
        WHITE,
    ));
}

/// Add a card background and its caption. Returns the card's bounds.
fn add_card(tree: &mut WidgetTree, top: i32, height: u32, caption: &str) -> Rectangle {
    let bounds = Rectangle::new(
        Point::new(PAGE_MARGIN_PX, top),
        Size::new(CARD_WIDTH_PX, height),
    );
    tree.add(Widget::panel(bounds, COLOR_SURFACE).with_radius(CARD_RADIUS_PX));
    tree.add(Widget::label(
        bounds.top_left + Point::new(constants::CARD_PADDING_PX, 12),
        caption,
        LabelSize::Medium,
        LIGHT_GRAY,
    ));
    bounds
}
