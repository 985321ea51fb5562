mod cluster;
mod drawer;
mod edge;
mod node;
mod palette;

use egui::{Align2, Color32, Pos2, Shape, Vec2};

pub use self::drawer::{DrawContext, Drawer};
pub use self::palette::{link_color, node_radius, risk_color, truncate_label, PATH_COLOR};

/// Text to be laid out by the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub pos: Pos2,
    pub anchor: Align2,
    pub text: String,
    /// Font size in points
    pub size: f32,
    pub color: Color32,
}

/// One element of a rendered frame, in widget-local screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Shape(Shape),
    Text(TextItem),
}

impl DrawItem {
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            DrawItem::Shape(s) => s.translate(delta),
            DrawItem::Text(t) => t.pos += delta,
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            DrawItem::Text(t) => Some(t),
            DrawItem::Shape(_) => None,
        }
    }
}

impl From<Shape> for DrawItem {
    fn from(s: Shape) -> Self {
        DrawItem::Shape(s)
    }
}

impl From<TextItem> for DrawItem {
    fn from(t: TextItem) -> Self {
        DrawItem::Text(t)
    }
}
