use std::collections::{BTreeMap, HashMap};

use egui::{Pos2, Rect, Vec2};

use crate::{
    elements::ClusterId,
    graph::VisibleGraph,
    layouts::{Body, LayoutSnapshot},
};

use super::ForceSettings;

/// Advances the layout by one tick.
///
/// Only entities of `g` that have a row in `prev` take part. The `pinned` entity keeps its
/// position and a zero velocity but still exerts forces on the others.
pub fn step(
    prev: &LayoutSnapshot,
    g: &VisibleGraph,
    settings: &ForceSettings,
    canvas: Rect,
    pinned: Option<&str>,
) -> LayoutSnapshot {
    let ids: Vec<&str> = g
        .entities()
        .map(|e| e.id.as_str())
        .filter(|id| prev.contains(id))
        .collect();
    if ids.is_empty() {
        return LayoutSnapshot::default();
    }

    let bodies: Vec<Body> = ids
        .iter()
        .filter_map(|id| prev.body(id).copied())
        .collect();
    let positions: Vec<Pos2> = bodies.iter().map(|b| b.pos).collect();
    let mut disp = vec![Vec2::ZERO; ids.len()];

    compute_repulsion(&positions, &mut disp, settings.k_repulse);
    compute_springs(g, &ids, &positions, &mut disp, settings);
    compute_cluster_cohesion(g, &ids, &positions, &mut disp, settings.cluster_k);
    compute_center_gravity(&positions, &mut disp, canvas.center(), settings.center_k);

    let bounds = clamp_bounds(canvas, settings.margin);
    let mut next = LayoutSnapshot::default();
    for (i, id) in ids.iter().enumerate() {
        let body = if pinned == Some(*id) {
            Body {
                pos: bodies[i].pos,
                vel: Vec2::ZERO,
            }
        } else {
            integrate(bodies[i], disp[i], settings, bounds)
        };
        next.insert(*id, body);
    }
    next
}

/// Pairwise inverse-square repulsion, distance floored at 1.
pub(crate) fn compute_repulsion(positions: &[Pos2], disp: &mut [Vec2], k_repulse: f32) {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[i] - positions[j];
            let len = delta.length();
            let dir = if len > f32::EPSILON {
                delta / len
            } else {
                // coincident points, push apart along a direction fixed by the pair
                Vec2::angled((i * 31 + j) as f32)
            };
            let distance = len.max(1.0);
            let force = k_repulse / (distance * distance);
            disp[i] += dir * force;
            disp[j] -= dir * force;
        }
    }
}

/// Hooke springs along every visible link toward the weight-dependent ideal distance.
pub(crate) fn compute_springs(
    g: &VisibleGraph,
    ids: &[&str],
    positions: &[Pos2],
    disp: &mut [Vec2],
    settings: &ForceSettings,
) {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    for l in g.links() {
        let (Some(&s), Some(&t)) = (
            index.get(l.source_id.as_str()),
            index.get(l.target_id.as_str()),
        ) else {
            continue;
        };
        if s == t {
            continue;
        }
        let delta = positions[t] - positions[s];
        let distance = delta.length();
        if distance <= f32::EPSILON {
            continue;
        }
        let force = settings.spring_k * (distance - settings.ideal_distance(l.weight));
        let dir = delta / distance;
        disp[s] += dir * force;
        disp[t] -= dir * force;
    }
}

/// Pulls clustered entities toward the centroid of the visible members of their cluster.
pub(crate) fn compute_cluster_cohesion(
    g: &VisibleGraph,
    ids: &[&str],
    positions: &[Pos2],
    disp: &mut [Vec2],
    cluster_k: f32,
) {
    let clusters: Vec<Option<ClusterId>> = ids
        .iter()
        .map(|id| g.entity(id).and_then(|e| e.cluster_id))
        .collect();

    let mut sums: BTreeMap<ClusterId, (Vec2, f32)> = BTreeMap::new();
    for (c, p) in clusters.iter().zip(positions) {
        if let Some(c) = c {
            let entry = sums.entry(*c).or_insert((Vec2::ZERO, 0.));
            entry.0 += p.to_vec2();
            entry.1 += 1.;
        }
    }

    for (i, c) in clusters.iter().enumerate() {
        let Some((sum, count)) = c.and_then(|c| sums.get(&c)) else {
            continue;
        };
        let centroid = (*sum / *count).to_pos2();
        disp[i] += (centroid - positions[i]) * cluster_k;
    }
}

/// Weak pull toward the canvas center.
pub(crate) fn compute_center_gravity(
    positions: &[Pos2],
    disp: &mut [Vec2],
    center: Pos2,
    center_k: f32,
) {
    for (d, p) in disp.iter_mut().zip(positions) {
        *d += (center - *p) * center_k;
    }
}

pub(crate) fn integrate(body: Body, force: Vec2, settings: &ForceSettings, bounds: Rect) -> Body {
    let mut vel = (body.vel + force) * settings.damping;
    if vel.length() > settings.max_speed {
        vel = vel.normalized() * settings.max_speed;
    }
    let pos = body.pos + vel;
    if !pos.x.is_finite() || !pos.y.is_finite() || !vel.x.is_finite() || !vel.y.is_finite() {
        return Body {
            pos: body.pos,
            vel: Vec2::ZERO,
        };
    }
    Body {
        pos: clamp_to(bounds, pos),
        vel,
    }
}

/// Canvas shrunk by `margin`, collapsed to its center when the margin does not fit.
pub(crate) fn clamp_bounds(canvas: Rect, margin: f32) -> Rect {
    let shrunk = canvas.shrink(margin.max(0.));
    if shrunk.min.x <= shrunk.max.x && shrunk.min.y <= shrunk.max.y {
        shrunk
    } else {
        Rect::from_center_size(canvas.center(), Vec2::ZERO)
    }
}

pub(crate) fn clamp_to(bounds: Rect, p: Pos2) -> Pos2 {
    Pos2::new(
        p.x.max(bounds.min.x).min(bounds.max.x),
        p.y.max(bounds.min.y).min(bounds.max.y),
    )
}
