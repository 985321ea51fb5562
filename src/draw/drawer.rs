use std::collections::HashSet;

use crate::{
    elements::{Cluster, Entity, EntityId, Link},
    graph::VisibleGraph,
    interaction::HoverTarget,
    layouts::LayoutSnapshot,
    metadata::Viewport,
    path::PathHighlight,
    settings::SettingsStyle,
};

use super::{cluster, edge, node, DrawItem};

/// Contains all the data about the current frame which is needed to render it.
pub struct DrawContext<'a> {
    pub graph: &'a VisibleGraph,
    pub clusters: &'a [Cluster],
    pub snapshot: &'a LayoutSnapshot,
    pub viewport: &'a Viewport,
    pub selection: &'a HashSet<EntityId>,
    pub hovered: Option<&'a HoverTarget>,
    pub path: &'a PathHighlight,
    pub search: &'a str,
    pub style: &'a SettingsStyle,
}

impl DrawContext<'_> {
    pub(super) fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Whether an entity is faded out because a selection exists elsewhere.
    pub(super) fn is_dimmed_entity(&self, e: &Entity) -> bool {
        self.has_selection()
            && !self.selection.contains(&e.id)
            && !self.graph.is_adjacent_to_any(&e.id, self.selection)
    }

    pub(super) fn is_dimmed_link(&self, l: &Link) -> bool {
        self.has_selection()
            && !self.selection.contains(&l.source_id)
            && !self.selection.contains(&l.target_id)
    }

    pub(super) fn is_hovered_entity(&self, id: &str) -> bool {
        matches!(self.hovered, Some(HoverTarget::Entity(h)) if h == id)
    }

    pub(super) fn is_hovered_link(&self, id: &str) -> bool {
        matches!(self.hovered, Some(HoverTarget::Link(h)) if h == id)
    }
}

/// Turns a [`DrawContext`] into draw items ordered back to front.
pub struct Drawer<'a> {
    ctx: &'a DrawContext<'a>,
    items: Vec<DrawItem>,
    delayed: Vec<DrawItem>,
}

impl<'a> Drawer<'a> {
    pub fn new(ctx: &'a DrawContext<'a>) -> Self {
        Drawer {
            ctx,
            items: Vec::new(),
            delayed: Vec::new(),
        }
    }

    pub fn draw(mut self) -> Vec<DrawItem> {
        if self.ctx.graph.is_empty() {
            return Vec::new();
        }

        if self.ctx.style.show_cluster_boxes {
            self.draw_clusters();
        }
        self.draw_links();
        self.draw_nodes();
        self.draw_postponed();
        self.items
    }

    fn draw_clusters(&mut self) {
        for c in self.ctx.clusters {
            self.items.extend(cluster::cluster_box(self.ctx, c));
        }
    }

    fn draw_links(&mut self) {
        let mut on_path = Vec::new();
        for l in self.ctx.graph.links() {
            if self.ctx.path.contains_link(&l.id) {
                on_path.push(l);
                continue;
            }
            self.items.extend(edge::link_shapes(self.ctx, l));
        }
        for l in on_path {
            self.items.extend(edge::link_shapes(self.ctx, l));
        }
    }

    fn draw_nodes(&mut self) {
        for e in self.ctx.graph.entities() {
            let Some(pos) = self.ctx.snapshot.position(&e.id) else {
                continue;
            };
            self.items.extend(node::node_shapes(self.ctx, e, pos));
            if self.ctx.style.labels_visible {
                self.delayed.extend(node::node_label(self.ctx, e, pos));
            }
        }
    }

    fn draw_postponed(&mut self) {
        self.items.append(&mut self.delayed);
    }
}
