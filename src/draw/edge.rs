use std::f32::consts::PI;

use egui::{Shape, Stroke, Vec2};

use crate::elements::Link;

use super::{
    palette::{dim, link_color, HOVER_COLOR, PATH_COLOR},
    DrawContext, DrawItem,
};

const TIP_ANGLE: f32 = PI / 6.;
const TIP_SIZE: f32 = 10.;

/// Straight line between the endpoints, with an arrowhead at the midpoint for directional
/// kinds.
pub(super) fn link_shapes(ctx: &DrawContext, l: &Link) -> Vec<DrawItem> {
    let (Some(start), Some(end)) = (
        ctx.snapshot.position(&l.source_id),
        ctx.snapshot.position(&l.target_id),
    ) else {
        return Vec::new();
    };
    let start = ctx.viewport.canvas_to_screen_pos(start);
    let end = ctx.viewport.canvas_to_screen_pos(end);

    let on_path = ctx.path.contains_link(&l.id);
    let color = if on_path {
        PATH_COLOR
    } else if ctx.is_hovered_link(&l.id) {
        HOVER_COLOR
    } else if ctx.is_dimmed_link(l) {
        dim(link_color(l.kind))
    } else {
        link_color(l.kind)
    };

    let style = ctx.style;
    let mut width = l.weight.min(style.link_weight_cap) * style.link_width_per_weight;
    if on_path {
        width += 2.;
    }
    let stroke = Stroke::new(ctx.viewport.canvas_to_screen_size(width).max(1.), color);

    let mut res = vec![Shape::line_segment([start, end], stroke).into()];

    let delta = end - start;
    if l.kind.is_directional() && delta.length() > f32::EPSILON {
        let tip_dir = delta.normalized();
        let size = ctx.viewport.canvas_to_screen_size(TIP_SIZE);
        let tip = start + delta / 2. + tip_dir * size / 2.;
        let arrow_tip_dir_1 = rotate_vector(tip_dir, TIP_ANGLE) * size;
        let arrow_tip_dir_2 = rotate_vector(tip_dir, -TIP_ANGLE) * size;
        res.push(
            Shape::convex_polygon(
                vec![tip, tip - arrow_tip_dir_1, tip - arrow_tip_dir_2],
                color,
                Stroke::NONE,
            )
            .into(),
        );
    }

    res
}

fn rotate_vector(vec: Vec2, angle: f32) -> Vec2 {
    let cos = angle.cos();
    let sin = angle.sin();
    Vec2::new(cos * vec.x - sin * vec.y, sin * vec.x + cos * vec.y)
}
