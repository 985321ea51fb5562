use std::collections::BTreeMap;

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::elements::EntityId;

/// Layout row of a single visible entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Pos2,
    pub vel: Vec2,
}

/// Positions and velocities of the visible entities at one point of the simulation.
///
/// A snapshot is produced by seeding or by one simulation step and is never shared mutably
/// between the two writers: the step function builds a fresh snapshot from the previous one,
/// and the interaction controller only overrides the row of the node it drags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    bodies: BTreeMap<EntityId, Body>,
}

impl LayoutSnapshot {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn position(&self, id: &str) -> Option<Pos2> {
        self.bodies.get(id).map(|b| b.pos)
    }

    pub fn velocity(&self, id: &str) -> Option<Vec2> {
        self.bodies.get(id).map(|b| b.vel)
    }

    /// Rows in ascending entity id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Body)> {
        self.bodies.iter().map(|(id, b)| (id.as_str(), b))
    }

    pub fn insert(&mut self, id: impl Into<EntityId>, body: Body) {
        self.bodies.insert(id.into(), body);
    }

    /// Places an entity at rest at `pos`.
    pub fn place(&mut self, id: impl Into<EntityId>, pos: Pos2) {
        self.insert(
            id,
            Body {
                pos,
                vel: Vec2::ZERO,
            },
        );
    }

    /// Overrides the row of an existing entity with `pos` and zero velocity.
    /// Returns `false` if the entity has no row.
    pub fn pin(&mut self, id: &str, pos: Pos2) -> bool {
        match self.bodies.get_mut(id) {
            Some(b) => {
                b.pos = pos;
                b.vel = Vec2::ZERO;
                true
            }
            None => false,
        }
    }

    /// Mean distance moved by the rows present in both snapshots.
    pub fn average_displacement(&self, prev: &LayoutSnapshot) -> Option<f32> {
        let (sum, count) = self
            .bodies
            .iter()
            .filter_map(|(id, b)| prev.bodies.get(id).map(|p| (b.pos - p.pos).length()))
            .fold((0.0, 0usize), |(s, c), d| (s + d, c + 1));
        (count > 0).then(|| sum / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_zeroes_velocity() {
        let mut s = LayoutSnapshot::default();
        s.insert(
            "A",
            Body {
                pos: Pos2::new(1., 1.),
                vel: Vec2::new(3., -2.),
            },
        );
        assert!(s.pin("A", Pos2::new(5., 6.)));
        assert_eq!(s.velocity("A"), Some(Vec2::ZERO));
        assert_eq!(s.position("A"), Some(Pos2::new(5., 6.)));
        assert!(!s.pin("missing", Pos2::ZERO));
    }

    #[test]
    fn displacement_only_counts_shared_rows() {
        let mut a = LayoutSnapshot::default();
        a.place("A", Pos2::new(0., 0.));
        a.place("B", Pos2::new(0., 0.));
        let mut b = LayoutSnapshot::default();
        b.place("A", Pos2::new(3., 4.));
        b.place("C", Pos2::new(100., 0.));
        assert_eq!(b.average_displacement(&a), Some(5.0));
        assert_eq!(LayoutSnapshot::default().average_displacement(&a), None);
    }
}
