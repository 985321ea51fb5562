use egui::{Align2, Pos2, Rect, Shape, Stroke, Vec2};

use crate::elements::Cluster;

use super::{DrawContext, DrawItem, TextItem};

/// Padded dashed box around the visible members of a cluster, with its name on top.
/// Nothing is drawn for clusters with fewer than two visible members.
pub(super) fn cluster_box(ctx: &DrawContext, c: &Cluster) -> Vec<DrawItem> {
    let members: Vec<Pos2> = ctx
        .graph
        .entities()
        .filter(|e| e.cluster_id == Some(c.id))
        .filter_map(|e| ctx.snapshot.position(&e.id))
        .map(|p| ctx.viewport.canvas_to_screen_pos(p))
        .collect();
    if members.len() < 2 {
        return Vec::new();
    }

    let padding = ctx.viewport.canvas_to_screen_size(ctx.style.cluster_box_padding);
    let rect = Rect::from_points(&members).expand(padding);
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];

    let mut res: Vec<DrawItem> = vec![Shape::rect_filled(rect, 6., c.color.gamma_multiply(0.08)).into()];
    res.extend(
        Shape::dashed_line(&outline, Stroke::new(1.5, c.color), 8., 5.)
            .into_iter()
            .map(DrawItem::from),
    );
    res.push(
        TextItem {
            pos: rect.left_top() + Vec2::new(4., -4.),
            anchor: Align2::LEFT_BOTTOM,
            text: c.name.clone(),
            size: 12.,
            color: c.color,
        }
        .into(),
    );
    res
}
