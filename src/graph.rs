use std::collections::{HashMap, HashSet};

use egui::Pos2;
use petgraph::{
    stable_graph::{EdgeIndex, NodeIndex, StableGraph},
    Directed,
};

use crate::{
    elements::{Entity, EntityId, Link, LinkId},
    filter::Subgraph,
    layouts::LayoutSnapshot,
    metadata::Viewport,
};

/// The visible subgraph stored in a [`petgraph::stable_graph::StableGraph`].
///
/// Entities and links are inserted in ascending id order, so every iteration over the graph
/// is deterministic regardless of the order the filter produced them in.
#[derive(Debug, Clone, Default)]
pub struct VisibleGraph {
    g: StableGraph<Entity, Link, Directed>,
    nodes: HashMap<EntityId, NodeIndex>,
    edges: HashMap<LinkId, EdgeIndex>,
}

impl From<Subgraph> for VisibleGraph {
    fn from(s: Subgraph) -> Self {
        Self::from_subgraph(s)
    }
}

impl VisibleGraph {
    pub fn from_subgraph(s: Subgraph) -> Self {
        let Subgraph {
            mut entities,
            mut links,
        } = s;
        entities.sort_by(|a, b| a.id.cmp(&b.id));
        links.sort_by(|a, b| a.id.cmp(&b.id));

        let mut g = StableGraph::with_capacity(entities.len(), links.len());
        let mut nodes = HashMap::with_capacity(entities.len());
        for e in entities {
            let id = e.id.clone();
            let idx = g.add_node(e);
            nodes.insert(id, idx);
        }

        let mut edges = HashMap::with_capacity(links.len());
        for l in links {
            let (Some(&start), Some(&end)) = (nodes.get(&l.source_id), nodes.get(&l.target_id))
            else {
                // the filter guarantees closure; a dangling link here is a caller bug
                log::warn!("dropping link `{}` with an endpoint outside the graph", l.id);
                continue;
            };
            let id = l.id.clone();
            let idx = g.add_edge(start, end, l);
            edges.insert(id, idx);
        }

        Self { g, nodes, edges }
    }

    pub fn g(&self) -> &StableGraph<Entity, Link, Directed> {
        &self.g
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.g.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.nodes.get(id).and_then(|&idx| self.g.node_weight(idx))
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.edges.get(id).and_then(|&idx| self.g.edge_weight(idx))
    }

    /// Entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.g.node_weights()
    }

    /// Links in ascending id order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.g.edge_weights()
    }

    /// Entities sharing a link with `id`, in either direction.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.g.neighbors_undirected(idx))
            .filter_map(move |n| self.g.node_weight(n).map(|e| e.id.as_str()))
    }

    /// Whether `id` shares a link with any member of `set`.
    pub fn is_adjacent_to_any(&self, id: &str, set: &HashSet<EntityId>) -> bool {
        self.neighbors(id).any(|n| set.contains(n))
    }

    /// Links joining `a` and `b` in either direction.
    pub fn links_between<'a>(&'a self, a: &str, b: &str) -> impl Iterator<Item = &'a Link> + 'a {
        let a = self.nodes.get(a).copied();
        let b = self.nodes.get(b).copied();
        a.zip(b).into_iter().flat_map(move |(a, b)| {
            self.g
                .edges_connecting(a, b)
                .chain(self.g.edges_connecting(b, a))
                .map(|e| e.weight())
        })
    }

    /// Finds the node closest to `screen_pos` whose center lies within `radius` screen units.
    /// Can be optimized by using a spatial index like quad-tree if needed.
    pub fn node_by_screen_pos(
        &self,
        snapshot: &LayoutSnapshot,
        viewport: &Viewport,
        screen_pos: Pos2,
        radius: f32,
    ) -> Option<&Entity> {
        self.entities()
            .filter_map(|e| {
                let pos = snapshot.position(&e.id)?;
                let d = viewport.canvas_to_screen_pos(pos).distance(screen_pos);
                (d <= radius).then_some((e, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    /// Finds the link whose segment passes within `tolerance` screen units of `screen_pos`.
    pub fn link_by_screen_pos(
        &self,
        snapshot: &LayoutSnapshot,
        viewport: &Viewport,
        screen_pos: Pos2,
        tolerance: f32,
    ) -> Option<&Link> {
        self.links()
            .filter_map(|l| {
                let a = viewport.canvas_to_screen_pos(snapshot.position(&l.source_id)?);
                let b = viewport.canvas_to_screen_pos(snapshot.position(&l.target_id)?);
                let d = distance_to_segment(screen_pos, a, b);
                (d <= tolerance).then_some((l, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| l)
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
