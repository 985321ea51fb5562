use std::f32::consts::TAU;

use egui::{epaint::CircleShape, Align2, Pos2, Shape, Stroke, Vec2};

use crate::elements::Entity;

use super::{
    palette::{
        dim, glyph, node_radius, risk_color, truncate_label, GLYPH_COLOR, HOVER_COLOR,
        LABEL_COLOR, NODE_STROKE_COLOR, PATH_COLOR, SEARCH_COLOR, SELECTION_COLOR,
    },
    DrawContext, DrawItem, TextItem,
};

const RING_SEGMENTS: usize = 32;

/// Disc, rings and glyph of one entity, drawn at canvas position `pos`.
pub(super) fn node_shapes(ctx: &DrawContext, e: &Entity, pos: Pos2) -> Vec<DrawItem> {
    let center = ctx.viewport.canvas_to_screen_pos(pos);
    let radius = ctx.viewport.canvas_to_screen_size(node_radius(e.kind));
    let ring_gap = ctx.viewport.canvas_to_screen_size(5.);

    let on_path = ctx.path.contains_node(&e.id);
    let selected = ctx.selection.contains(&e.id);
    let dimmed = !on_path && ctx.is_dimmed_entity(e);
    let fade = |c| if dimmed { dim(c) } else { c };

    let stroke = if on_path {
        Stroke::new(3., PATH_COLOR)
    } else if selected {
        Stroke::new(3., SELECTION_COLOR)
    } else {
        Stroke::new(1.5, fade(NODE_STROKE_COLOR))
    };

    let mut res: Vec<DrawItem> = Vec::with_capacity(4);
    res.push(
        Shape::Circle(CircleShape {
            center,
            radius,
            fill: fade(risk_color(e.risk_level)),
            stroke,
        })
        .into(),
    );

    if selected && !on_path {
        res.push(
            Shape::circle_stroke(center, radius + ring_gap, Stroke::new(1.5, SELECTION_COLOR))
                .into(),
        );
    }

    if ctx.is_hovered_entity(&e.id) {
        res.push(
            Shape::circle_stroke(center, radius + ring_gap / 2., Stroke::new(1., HOVER_COLOR))
                .into(),
        );
    }

    if e.matches_search(ctx.search) {
        res.extend(
            dashed_ring(center, radius + ring_gap * 2., Stroke::new(2., SEARCH_COLOR))
                .into_iter()
                .map(DrawItem::from),
        );
    }

    res.push(
        TextItem {
            pos: center,
            anchor: Align2::CENTER_CENTER,
            text: glyph(e.kind).to_string(),
            size: radius.max(1.),
            color: fade(GLYPH_COLOR),
        }
        .into(),
    );

    res
}

/// Label below the node, if it has one.
pub(super) fn node_label(ctx: &DrawContext, e: &Entity, pos: Pos2) -> Option<DrawItem> {
    if e.label.is_empty() {
        return None;
    }
    let center = ctx.viewport.canvas_to_screen_pos(pos);
    let radius = ctx.viewport.canvas_to_screen_size(node_radius(e.kind));
    let dimmed = !ctx.path.contains_node(&e.id) && ctx.is_dimmed_entity(e);

    Some(
        TextItem {
            pos: center + Vec2::new(0., radius + 4.),
            anchor: Align2::CENTER_TOP,
            text: truncate_label(&e.label, ctx.style.label_max_chars),
            size: (11. * ctx.viewport.zoom).clamp(8., 16.),
            color: if dimmed { dim(LABEL_COLOR) } else { LABEL_COLOR },
        }
        .into(),
    )
}

fn dashed_ring(center: Pos2, radius: f32, stroke: Stroke) -> Vec<Shape> {
    let points: Vec<Pos2> = (0..=RING_SEGMENTS)
        .map(|i| center + Vec2::angled(i as f32 * TAU / RING_SEGMENTS as f32) * radius)
        .collect();
    Shape::dashed_line(&points, stroke, 6., 4.)
}
