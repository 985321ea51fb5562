use egui::{Pos2, Rect, Vec2};
use rand::Rng;

use crate::{elements::ClusterId, graph::VisibleGraph};

use super::{
    force_directed::{clamp_bounds, clamp_to, ForceSettings},
    snapshot::{Body, LayoutSnapshot},
};

/// Canvas-relative anchor points new cluster members are spawned around.
const CLUSTER_ANCHORS: [(f32, f32); 6] = [
    (0.3, 0.3),
    (0.7, 0.3),
    (0.5, 0.7),
    (0.2, 0.7),
    (0.8, 0.7),
    (0.5, 0.2),
];

/// Spawn point of a cluster on the canvas.
pub fn cluster_anchor(cluster_id: ClusterId, canvas: Rect) -> Pos2 {
    let (fx, fy) = CLUSTER_ANCHORS[cluster_id as usize % CLUSTER_ANCHORS.len()];
    canvas.min + Vec2::new(canvas.width() * fx, canvas.height() * fy)
}

/// Builds the layout rows of `g`.
///
/// Entities with a row in `prev` keep it, rows of entities outside `g` are dropped, new
/// clustered entities are placed around their cluster anchor and new unclustered ones
/// anywhere inside the margin.
pub fn seed<R: Rng + ?Sized>(
    prev: &LayoutSnapshot,
    g: &VisibleGraph,
    settings: &ForceSettings,
    rng: &mut R,
) -> LayoutSnapshot {
    let canvas = settings.canvas_rect();
    let bounds = clamp_bounds(canvas, settings.margin);
    let jitter = settings.seed_jitter.max(0.);

    let mut next = LayoutSnapshot::default();
    let mut spawned = 0usize;
    for e in g.entities() {
        if let Some(body) = prev.body(&e.id) {
            next.insert(e.id.clone(), *body);
            continue;
        }

        let pos = match e.cluster_id {
            Some(c) => {
                let offset = Vec2::new(
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                );
                clamp_to(bounds, cluster_anchor(c, canvas) + offset)
            }
            None => Pos2::new(
                rng.random_range(bounds.min.x..=bounds.max.x),
                rng.random_range(bounds.min.y..=bounds.max.y),
            ),
        };
        next.insert(
            e.id.clone(),
            Body {
                pos,
                vel: Vec2::ZERO,
            },
        );
        spawned += 1;
    }

    log::debug!(
        "seeded layout: {} retained, {} spawned, {} dropped",
        next.len() - spawned,
        spawned,
        prev.iter().filter(|(id, _)| !g.contains(id)).count()
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        elements::{Entity, EntityKind},
        filter::Subgraph,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn graph(ids: &[(&str, Option<ClusterId>)]) -> VisibleGraph {
        VisibleGraph::from_subgraph(Subgraph {
            entities: ids
                .iter()
                .map(|(id, c)| {
                    let e = Entity::new(*id, EntityKind::Person, *id);
                    match c {
                        Some(c) => e.with_cluster(*c),
                        None => e,
                    }
                })
                .collect(),
            links: vec![],
        })
    }

    #[test]
    fn retains_known_rows_and_drops_excluded() {
        let settings = ForceSettings::default();
        let mut prev = LayoutSnapshot::default();
        prev.place("A", Pos2::new(1., 2.));
        prev.place("gone", Pos2::new(3., 4.));
        let g = graph(&[("A", None), ("B", Some(1))]);

        let next = seed(&prev, &g, &settings, &mut StdRng::seed_from_u64(7));
        assert_eq!(next.position("A"), Some(Pos2::new(1., 2.)));
        assert!(next.contains("B"));
        assert!(!next.contains("gone"));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn clustered_entities_spawn_near_their_anchor() {
        let settings = ForceSettings::default();
        let g = graph(&[("A", Some(0)), ("B", Some(0)), ("C", Some(4))]);
        let next = seed(
            &LayoutSnapshot::default(),
            &g,
            &settings,
            &mut StdRng::seed_from_u64(1),
        );
        let anchor = cluster_anchor(0, settings.canvas_rect());
        for id in ["A", "B"] {
            let p = next.position(id).unwrap();
            assert!((p - anchor).x.abs() <= settings.seed_jitter);
            assert!((p - anchor).y.abs() <= settings.seed_jitter);
        }
    }

    #[test]
    fn anchors_wrap_around_the_table() {
        let canvas = ForceSettings::default().canvas_rect();
        assert_eq!(cluster_anchor(1, canvas), cluster_anchor(7, canvas));
        let first = cluster_anchor(0, canvas);
        assert!((first - Pos2::new(300., 210.)).length() < 1e-3, "{first:?}");
    }

    #[test]
    fn same_seed_same_layout() {
        let settings = ForceSettings::default();
        let g = graph(&[("A", None), ("B", Some(2)), ("C", None)]);
        let a = seed(
            &LayoutSnapshot::default(),
            &g,
            &settings,
            &mut StdRng::seed_from_u64(42),
        );
        let b = seed(
            &LayoutSnapshot::default(),
            &g,
            &settings,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn unclustered_entities_spawn_inside_margin() {
        let settings = ForceSettings::default();
        let g = graph(&[("A", None), ("B", None), ("C", None), ("D", None)]);
        let next = seed(
            &LayoutSnapshot::default(),
            &g,
            &settings,
            &mut StdRng::seed_from_u64(3),
        );
        let inner = settings.canvas_rect().shrink(settings.margin);
        assert!(next.iter().all(|(_, b)| inner.contains(b.pos)));
    }
}
