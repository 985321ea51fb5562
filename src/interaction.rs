use std::collections::HashSet;

use egui::{Modifiers, Pos2, Vec2};

use crate::{
    draw::node_radius,
    elements::{EntityId, LinkId},
    events::{
        Event, PayloadEntitySelected, PayloadHoverChanged, PayloadNodeDragEnd,
        PayloadNodeDragStart, PayloadPan, PayloadPathFound, PayloadZoom,
    },
    graph::VisibleGraph,
    layouts::LayoutSnapshot,
    metadata::Viewport,
    path::{shortest_path, PathHighlight},
    settings::{SettingsInteraction, SettingsNavigation, ZoomAnchor},
};

/// A pan that travels less than this many screen units counts as a click on empty canvas.
const PAN_CLICK_TOLERANCE: f32 = 2.;

/// State the controller returns to once a gesture ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RestState {
    #[default]
    Idle,
    PickingPathStart,
    PickingPathEnd { start: EntityId },
}

impl From<RestState> for InteractionState {
    fn from(r: RestState) -> Self {
        match r {
            RestState::Idle => InteractionState::Idle,
            RestState::PickingPathStart => InteractionState::PickingPathStart,
            RestState::PickingPathEnd { start } => InteractionState::PickingPathEnd { start },
        }
    }
}

/// The single interaction mode of the graph view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        /// Screen position of the pointer-down
        origin: Pos2,
        last: Pos2,
        resume: RestState,
    },
    DraggingNode {
        id: EntityId,
        /// Screen position of the pointer-down
        origin: Pos2,
        /// Canvas position the node is held at
        pos: Pos2,
        resume: RestState,
    },
    PickingPathStart,
    PickingPathEnd {
        start: EntityId,
    },
}

impl InteractionState {
    /// The resting part of the state, or `None` while a gesture is in progress.
    fn rest(&self) -> Option<RestState> {
        match self {
            InteractionState::Idle => Some(RestState::Idle),
            InteractionState::PickingPathStart => Some(RestState::PickingPathStart),
            InteractionState::PickingPathEnd { start } => Some(RestState::PickingPathEnd {
                start: start.clone(),
            }),
            InteractionState::Panning { .. } | InteractionState::DraggingNode { .. } => None,
        }
    }

    pub fn is_path_mode(&self) -> bool {
        match self {
            InteractionState::PickingPathStart | InteractionState::PickingPathEnd { .. } => true,
            InteractionState::Panning { resume, .. }
            | InteractionState::DraggingNode { resume, .. } => *resume != RestState::Idle,
            InteractionState::Idle => false,
        }
    }
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    Entity(EntityId),
    Link(LinkId),
}

/// Turns pointer input into selection, hover, path, drag and viewport changes.
///
/// All positions passed in are widget-local screen coordinates.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    selection: HashSet<EntityId>,
    hovered: Option<HoverTarget>,
    path: Vec<EntityId>,
    path_highlight: PathHighlight,
    viewport: Viewport,
    settings_interaction: SettingsInteraction,
    settings_navigation: SettingsNavigation,
    events: Vec<Event>,
}

impl InteractionController {
    pub fn new(interaction: SettingsInteraction, navigation: SettingsNavigation) -> Self {
        Self {
            settings_interaction: interaction,
            settings_navigation: navigation,
            ..Default::default()
        }
    }

    pub fn set_settings(&mut self, interaction: SettingsInteraction, navigation: SettingsNavigation) {
        self.settings_interaction = interaction;
        self.settings_navigation = navigation;
        self.viewport.zoom = self.settings_navigation.clamp_zoom(self.viewport.zoom);
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> &HashSet<EntityId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    pub fn path(&self) -> &[EntityId] {
        &self.path
    }

    pub fn path_highlight(&self) -> &PathHighlight {
        &self.path_highlight
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport.size = size;
    }

    pub fn is_path_mode(&self) -> bool {
        self.state.is_path_mode()
    }

    /// Entity held by an active drag and the canvas position it is held at.
    pub fn dragged(&self) -> Option<(&str, Pos2)> {
        match &self.state {
            InteractionState::DraggingNode { id, pos, .. }
                if self.settings_interaction.dragging_enabled =>
            {
                Some((id.as_str(), *pos))
            }
            _ => None,
        }
    }

    /// Overrides the dragged entity's layout row.
    pub fn apply_drag(&self, snapshot: &mut LayoutSnapshot) {
        if let Some((id, pos)) = self.dragged() {
            snapshot.pin(id, pos);
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, g: &VisibleGraph, snapshot: &LayoutSnapshot) {
        let Some(resume) = self.state.rest() else {
            log::warn!("pointer down while a gesture is in progress, ignoring");
            return;
        };

        let hit = g
            .node_by_screen_pos(
                snapshot,
                &self.viewport,
                pos,
                self.settings_interaction.hit_radius,
            )
            .map(|e| e.id.clone());

        self.state = match hit {
            Some(id) => {
                let node_pos = snapshot
                    .position(&id)
                    .unwrap_or_else(|| self.viewport.screen_to_canvas_pos(pos));
                if self.settings_interaction.dragging_enabled {
                    self.events
                        .push(Event::NodeDragStart(PayloadNodeDragStart { id: id.clone() }));
                }
                InteractionState::DraggingNode {
                    id,
                    origin: pos,
                    pos: node_pos,
                    resume,
                }
            }
            None => InteractionState::Panning {
                origin: pos,
                last: pos,
                resume,
            },
        };
    }

    /// Continues the active gesture, or updates hover when there is none.
    pub fn pointer_move(&mut self, pos: Pos2, g: &VisibleGraph, snapshot: &mut LayoutSnapshot) {
        let dragging_enabled = self.settings_interaction.dragging_enabled;
        match &mut self.state {
            InteractionState::Panning { last, .. } => {
                let diff = pos - *last;
                *last = pos;
                self.set_pan(self.viewport.pan + diff);
            }
            InteractionState::DraggingNode { id, pos: held, .. } => {
                if dragging_enabled {
                    *held = self.viewport.screen_to_canvas_pos(pos);
                    snapshot.pin(id, *held);
                }
            }
            InteractionState::Idle
            | InteractionState::PickingPathStart
            | InteractionState::PickingPathEnd { .. } => self.update_hover(pos, g, snapshot),
        }
    }

    /// Ends the active gesture. A gesture that barely moved is handled as a click.
    pub fn pointer_up(&mut self, pos: Pos2, modifiers: Modifiers, g: &VisibleGraph) {
        match std::mem::take(&mut self.state) {
            InteractionState::Panning { origin, resume, .. } => {
                let was_idle = resume == RestState::Idle;
                self.state = resume.into();
                if was_idle && (pos - origin).length() < PAN_CLICK_TOLERANCE {
                    self.clear_selection();
                }
            }
            InteractionState::DraggingNode {
                id,
                origin,
                pos: held,
                resume,
            } => {
                if self.settings_interaction.dragging_enabled {
                    self.events.push(Event::NodeDragEnd(PayloadNodeDragEnd {
                        id: id.clone(),
                        pos: [held.x, held.y],
                    }));
                }
                self.state = resume.into();
                if (pos - origin).length() < self.settings_interaction.hit_radius {
                    self.click_entity(id, modifiers, g);
                }
            }
            rest => self.state = rest,
        }
    }

    /// Zooms by one step per notch: `delta > 0` zooms in, `delta < 0` zooms out.
    pub fn wheel(&mut self, delta: f32, cursor: Option<Pos2>) {
        if delta == 0. || !delta.is_finite() {
            return;
        }
        let nav = &self.settings_navigation;
        let factor = if delta > 0. {
            1. + nav.zoom_step
        } else {
            1. - nav.zoom_step
        };
        let new_zoom = nav.clamp_zoom(self.viewport.zoom * factor);
        let anchor = match nav.zoom_anchor {
            ZoomAnchor::Cursor => cursor.unwrap_or(self.viewport.screen_rect().center()),
            ZoomAnchor::Center => self.viewport.screen_rect().center(),
        };

        let diff = new_zoom - self.viewport.zoom;
        if diff == 0. {
            return;
        }
        self.viewport.zoom_around(anchor, new_zoom);
        self.events
            .push(Event::Zoom(PayloadZoom { diff, new_zoom }));
    }

    pub fn pointer_leave(&mut self) {
        self.reset();
        self.set_hover(None);
    }

    /// Abandons the gesture in progress and returns to its resting state.
    pub fn reset(&mut self) {
        match std::mem::take(&mut self.state) {
            InteractionState::Panning { resume, .. } => self.state = resume.into(),
            InteractionState::DraggingNode {
                id, pos, resume, ..
            } => {
                if self.settings_interaction.dragging_enabled {
                    self.events.push(Event::NodeDragEnd(PayloadNodeDragEnd {
                        id,
                        pos: [pos.x, pos.y],
                    }));
                }
                self.state = resume.into();
            }
            rest => self.state = rest,
        }
    }

    /// Enters or leaves shortest-path picking. Entering clears the previous path.
    pub fn set_path_mode(&mut self, on: bool) {
        self.reset();
        self.clear_path();
        self.state = if on {
            InteractionState::PickingPathStart
        } else {
            InteractionState::Idle
        };
        log::debug!("path mode {}", if on { "on" } else { "off" });
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.path_highlight = PathHighlight::default();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.events
            .push(Event::EntitySelected(PayloadEntitySelected { id: None }));
    }

    /// Drops selection, hover, drag and path state referring to entities outside `g`.
    pub fn prune_to(&mut self, g: &VisibleGraph) {
        let before = self.selection.len();
        self.selection.retain(|id| g.contains(id));
        if before > 0 && self.selection.is_empty() {
            self.events
                .push(Event::EntitySelected(PayloadEntitySelected { id: None }));
        }

        let hover_gone = match &self.hovered {
            Some(HoverTarget::Entity(id)) => !g.contains(id),
            Some(HoverTarget::Link(id)) => g.link(id).is_none(),
            None => false,
        };
        if hover_gone {
            self.set_hover(None);
        }

        let gone = |id: &str| !g.contains(id);
        let resume_gone = |r: &RestState| matches!(r, RestState::PickingPathEnd { start } if gone(start.as_str()));
        let state_gone = match &self.state {
            InteractionState::DraggingNode { id, resume, .. } => {
                gone(id.as_str()) || resume_gone(resume)
            }
            InteractionState::Panning { resume, .. } => resume_gone(resume),
            InteractionState::PickingPathEnd { start } => gone(start.as_str()),
            InteractionState::Idle | InteractionState::PickingPathStart => false,
        };
        if state_gone {
            let path_mode = self.state.is_path_mode();
            self.reset();
            if path_mode {
                self.state = InteractionState::PickingPathStart;
            }
        }

        if self.path.iter().any(|id| gone(id.as_str())) {
            self.clear_path();
        } else {
            self.path_highlight = PathHighlight::from_path(&self.path, g);
        }
    }

    /// Resets the view so that all positioned entities fit the widget.
    pub fn fit_to_screen(&mut self, g: &VisibleGraph, snapshot: &LayoutSnapshot) {
        let nav = &self.settings_navigation;
        let points = snapshot
            .iter()
            .filter_map(|(id, b)| g.entity(id).map(|e| (b.pos, node_radius(e.kind))));
        self.viewport.fit(
            points,
            nav.fit_to_screen_padding,
            nav.zoom_min.min(nav.zoom_max),
            nav.zoom_max.max(nav.zoom_min),
        );
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn click_entity(&mut self, id: EntityId, modifiers: Modifiers, g: &VisibleGraph) {
        match std::mem::take(&mut self.state) {
            InteractionState::PickingPathStart => {
                self.state = InteractionState::PickingPathEnd { start: id };
            }
            InteractionState::PickingPathEnd { start } => {
                self.path = shortest_path(g.links(), &start, &id);
                self.path_highlight = PathHighlight::from_path(&self.path, g);
                log::debug!(
                    "path {start} -> {id}: {} hops",
                    self.path.len().saturating_sub(1)
                );
                self.events.push(Event::PathFound(PayloadPathFound {
                    start,
                    end: id,
                    path: self.path.clone(),
                }));
                self.state = InteractionState::Idle;
            }
            rest => {
                self.state = rest;
                let toggle = self.settings_interaction.multi_select_enabled
                    && (modifiers.shift || modifiers.command);
                self.select(id, toggle);
            }
        }
    }

    fn select(&mut self, id: EntityId, toggle: bool) {
        if toggle {
            if self.selection.remove(&id) {
                if self.selection.is_empty() {
                    self.events
                        .push(Event::EntitySelected(PayloadEntitySelected { id: None }));
                }
            } else {
                self.selection.insert(id.clone());
                self.events
                    .push(Event::EntitySelected(PayloadEntitySelected { id: Some(id) }));
            }
            return;
        }

        if self.selection.len() == 1 && self.selection.contains(&id) {
            self.clear_selection();
            return;
        }

        self.selection.clear();
        self.selection.insert(id.clone());
        self.events
            .push(Event::EntitySelected(PayloadEntitySelected { id: Some(id) }));
    }

    fn update_hover(&mut self, pos: Pos2, g: &VisibleGraph, snapshot: &LayoutSnapshot) {
        let si = &self.settings_interaction;
        let target = g
            .node_by_screen_pos(snapshot, &self.viewport, pos, si.hit_radius)
            .map(|e| HoverTarget::Entity(e.id.clone()))
            .or_else(|| {
                g.link_by_screen_pos(snapshot, &self.viewport, pos, si.link_hit_tolerance)
                    .map(|l| HoverTarget::Link(l.id.clone()))
            });
        self.set_hover(target);
    }

    fn set_hover(&mut self, target: Option<HoverTarget>) {
        if self.hovered == target {
            return;
        }
        let (entity, link) = match &target {
            Some(HoverTarget::Entity(id)) => (Some(id.clone()), None),
            Some(HoverTarget::Link(id)) => (None, Some(id.clone())),
            None => (None, None),
        };
        self.hovered = target;
        self.events
            .push(Event::HoverChanged(PayloadHoverChanged { entity, link }));
    }

    fn set_pan(&mut self, new_pan: Vec2) {
        let diff = new_pan - self.viewport.pan;
        if diff == Vec2::ZERO {
            return;
        }
        self.viewport.pan = new_pan;
        self.events.push(Event::Pan(PayloadPan {
            diff: diff.into(),
            new_pan: new_pan.into(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        elements::{Entity, EntityKind, Link, LinkKind},
        filter::Subgraph,
    };

    fn graph() -> VisibleGraph {
        VisibleGraph::from_subgraph(Subgraph {
            entities: ["A", "B", "C", "D"]
                .into_iter()
                .map(|id| Entity::new(id, EntityKind::Person, id))
                .collect(),
            links: vec![
                Link::new("L1", "A", "B", LinkKind::Call, 1.0),
                Link::new("L2", "B", "C", LinkKind::Sms, 1.0),
            ],
        })
    }

    fn snapshot() -> LayoutSnapshot {
        let mut s = LayoutSnapshot::default();
        s.place("A", Pos2::new(100., 100.));
        s.place("B", Pos2::new(300., 100.));
        s.place("C", Pos2::new(500., 100.));
        s.place("D", Pos2::new(300., 400.));
        s
    }

    fn click(c: &mut InteractionController, g: &VisibleGraph, s: &LayoutSnapshot, at: Pos2) {
        c.pointer_down(at, g, s);
        c.pointer_up(at, Modifiers::NONE, g);
    }

    fn shift_click(c: &mut InteractionController, g: &VisibleGraph, s: &LayoutSnapshot, at: Pos2) {
        c.pointer_down(at, g, s);
        c.pointer_up(at, Modifiers::SHIFT, g);
    }

    fn selected(c: &InteractionController) -> Vec<&str> {
        let mut v: Vec<_> = c.selection().iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }

    const A: Pos2 = Pos2::new(100., 100.);
    const B: Pos2 = Pos2::new(300., 100.);
    const C: Pos2 = Pos2::new(500., 100.);
    const EMPTY: Pos2 = Pos2::new(700., 600.);

    #[test]
    fn plain_click_replaces_and_clears_selection() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();

        click(&mut c, &g, &s, A);
        assert_eq!(selected(&c), vec!["A"]);
        click(&mut c, &g, &s, B + Vec2::new(5., 5.));
        assert_eq!(selected(&c), vec!["B"]);
        click(&mut c, &g, &s, B);
        assert!(selected(&c).is_empty());

        let events = c.drain_events();
        assert_eq!(
            events.last(),
            Some(&Event::EntitySelected(PayloadEntitySelected { id: None }))
        );
    }

    #[test]
    fn modifier_click_toggles_membership() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();

        shift_click(&mut c, &g, &s, A);
        shift_click(&mut c, &g, &s, B);
        assert_eq!(selected(&c), vec!["A", "B"]);
        shift_click(&mut c, &g, &s, A);
        assert_eq!(selected(&c), vec!["B"]);
    }

    #[test]
    fn click_on_empty_canvas_clears_selection() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        click(&mut c, &g, &s, A);
        click(&mut c, &g, &s, EMPTY);
        assert!(c.selection().is_empty());
        assert_eq!(c.state(), &InteractionState::Idle);
    }

    #[test]
    fn drag_moves_only_the_dragged_node() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();

        c.pointer_down(A, &g, &s);
        c.pointer_move(Pos2::new(150., 220.), &g, &mut s);
        assert_eq!(c.dragged(), Some(("A", Pos2::new(150., 220.))));
        assert_eq!(s.position("A"), Some(Pos2::new(150., 220.)));
        assert_eq!(s.velocity("A"), Some(Vec2::ZERO));
        assert_eq!(s.position("B"), snapshot().position("B"));

        c.pointer_up(Pos2::new(150., 220.), Modifiers::NONE, &g);
        assert!(c.dragged().is_none());
        // moved farther than the hit radius, so not a click
        assert!(c.selection().is_empty());

        let events = c.drain_events();
        assert!(matches!(events.first(), Some(Event::NodeDragStart(p)) if p.id == "A"));
        assert!(matches!(events.last(), Some(Event::NodeDragEnd(p)) if p.pos == [150., 220.]));
    }

    #[test]
    fn drag_respects_zoom_and_pan() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();
        c.viewport.zoom = 2.;
        c.viewport.pan = Vec2::new(-100., 0.);

        // A is drawn at (100, 200)
        c.pointer_down(Pos2::new(100., 200.), &g, &s);
        c.pointer_move(Pos2::new(300., 200.), &g, &mut s);
        assert_eq!(s.position("A"), Some(Pos2::new(200., 100.)));
    }

    #[test]
    fn disabled_dragging_still_clicks() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::new(
            SettingsInteraction::default().with_dragging_enabled(false),
            SettingsNavigation::default(),
        );
        c.pointer_down(A, &g, &s);
        c.pointer_move(A + Vec2::new(3., 0.), &g, &mut s);
        assert_eq!(s.position("A"), Some(A));
        c.pointer_up(A + Vec2::new(3., 0.), Modifiers::NONE, &g);
        assert_eq!(selected(&c), vec!["A"]);
    }

    #[test]
    fn panning_moves_viewport() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();
        c.pointer_down(EMPTY, &g, &s);
        c.pointer_move(EMPTY + Vec2::new(10., 5.), &g, &mut s);
        c.pointer_move(EMPTY + Vec2::new(30., 5.), &g, &mut s);
        c.pointer_up(EMPTY + Vec2::new(30., 5.), Modifiers::NONE, &g);
        assert_eq!(c.viewport().pan, Vec2::new(30., 5.));
        assert_eq!(s, snapshot());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = InteractionController::default();
        for _ in 0..100 {
            c.wheel(1., None);
        }
        assert_eq!(c.viewport().zoom, 3.0);
        for _ in 0..100 {
            c.wheel(-1., None);
        }
        assert_eq!(c.viewport().zoom, 0.3);
    }

    #[test]
    fn cursor_anchored_zoom_keeps_point_under_cursor() {
        let mut c = InteractionController::default();
        let cursor = Pos2::new(120., 480.);
        let before = c.viewport().screen_to_canvas_pos(cursor);
        c.wheel(1., Some(cursor));
        c.wheel(1., Some(cursor));
        let after = c.viewport().screen_to_canvas_pos(cursor);
        assert!((before - after).length() < 1e-3);
        assert!((c.viewport().zoom - 1.21).abs() < 1e-5);
    }

    #[test]
    fn center_anchored_zoom_keeps_center() {
        let mut c = InteractionController::new(
            SettingsInteraction::default(),
            SettingsNavigation::default().with_zoom_anchor(ZoomAnchor::Center),
        );
        let center = c.viewport().screen_rect().center();
        let before = c.viewport().screen_to_canvas_pos(center);
        c.wheel(-1., Some(Pos2::new(10., 10.)));
        let after = c.viewport().screen_to_canvas_pos(center);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn path_mode_flow() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        c.set_path_mode(true);
        assert_eq!(c.state(), &InteractionState::PickingPathStart);

        click(&mut c, &g, &s, A);
        assert_eq!(
            c.state(),
            &InteractionState::PickingPathEnd {
                start: "A".to_string()
            }
        );
        click(&mut c, &g, &s, C);
        assert_eq!(c.state(), &InteractionState::Idle);
        assert_eq!(c.path(), ["A", "B", "C"]);
        assert!(c.path_highlight().contains_link("L1"));
        assert!(c.path_highlight().contains_link("L2"));
        assert!(c.selection().is_empty());
        assert!(c
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::PathFound(p) if p.path.len() == 3)));
    }

    #[test]
    fn unreachable_path_is_empty() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        c.set_path_mode(true);
        click(&mut c, &g, &s, A);
        click(&mut c, &g, &s, Pos2::new(300., 400.));
        assert!(c.path().is_empty());
        assert_eq!(c.state(), &InteractionState::Idle);
    }

    #[test]
    fn panning_in_path_mode_keeps_picking() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();
        click(&mut c, &g, &s, A);
        c.set_path_mode(true);
        c.pointer_down(EMPTY, &g, &s);
        c.pointer_move(EMPTY + Vec2::new(1., 0.), &g, &mut s);
        c.pointer_up(EMPTY, Modifiers::NONE, &g);
        assert_eq!(c.state(), &InteractionState::PickingPathStart);
        // empty-canvas click only clears selection outside path mode
        assert_eq!(selected(&c), vec!["A"]);
    }

    #[test]
    fn mode_switch_mid_drag_cancels_drag() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();
        c.pointer_down(A, &g, &s);
        c.pointer_move(A + Vec2::new(50., 0.), &g, &mut s);
        c.set_path_mode(true);
        assert!(c.dragged().is_none());
        assert_eq!(c.state(), &InteractionState::PickingPathStart);

        // the stale release is not treated as a click
        c.pointer_up(A, Modifiers::NONE, &g);
        assert_eq!(c.state(), &InteractionState::PickingPathStart);
    }

    #[test]
    fn hover_prefers_nodes_then_links() {
        let g = graph();
        let mut s = snapshot();
        let mut c = InteractionController::default();
        c.pointer_move(B + Vec2::new(2., 2.), &g, &mut s);
        assert_eq!(c.hovered(), Some(&HoverTarget::Entity("B".to_string())));
        c.pointer_move(Pos2::new(200., 103.), &g, &mut s);
        assert_eq!(c.hovered(), Some(&HoverTarget::Link("L1".to_string())));
        c.pointer_leave();
        assert!(c.hovered().is_none());
    }

    #[test]
    fn pointer_leave_resets_gesture() {
        let g = graph();
        let s = snapshot();
        let mut c = InteractionController::default();
        c.pointer_down(EMPTY, &g, &s);
        c.pointer_leave();
        assert_eq!(c.state(), &InteractionState::Idle);
    }

    #[test]
    fn prune_drops_invisible_state() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        shift_click(&mut c, &g, &s, A);
        shift_click(&mut c, &g, &s, B);
        c.set_path_mode(true);
        click(&mut c, &g, &s, A);
        click(&mut c, &g, &s, B);
        assert_eq!(c.path().len(), 2);

        let smaller = VisibleGraph::from_subgraph(Subgraph {
            entities: vec![Entity::new("B", EntityKind::Person, "B")],
            links: vec![],
        });
        c.prune_to(&smaller);
        assert_eq!(selected(&c), vec!["B"]);
        assert!(c.path().is_empty());
        assert!(c.path_highlight().is_empty());
    }

    #[test]
    fn prune_cancels_drag_of_hidden_node() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        c.pointer_down(A, &g, &s);
        c.prune_to(&VisibleGraph::default());
        assert!(c.dragged().is_none());
        assert_eq!(c.state(), &InteractionState::Idle);
    }

    #[test]
    fn fit_to_screen_centers_graph() {
        let (g, s) = (graph(), snapshot());
        let mut c = InteractionController::default();
        c.fit_to_screen(&g, &s);
        let vp = c.viewport();
        for (_, b) in s.iter() {
            assert!(vp.screen_rect().contains(vp.canvas_to_screen_pos(b.pos)));
        }
    }
}
