use egui::{Modifiers, Pos2, Vec2};
use instant::Instant;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    dataset::Dataset,
    draw::{DrawContext, DrawItem, Drawer},
    elements::{Cluster, ClusterId, Entity, Link, Pattern},
    events::Event,
    export::{ExportState, ExportedFrame},
    filter::{visible_subgraph, Filter},
    graph::VisibleGraph,
    interaction::{HoverTarget, InteractionController},
    layouts::{force_directed::ForceSimulation, seed, LayoutSnapshot},
    settings::Settings,
};

/// Timings of the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMetrics {
    pub steps: u32,
    pub step_ms: f32,
    pub draw_ms: f32,
}

/// Details of the element under the pointer, for tooltips.
#[derive(Debug, Clone)]
pub enum HoverDetails<'a> {
    Entity {
        entity: &'a Entity,
        cluster: Option<&'a Cluster>,
        /// Suspicious patterns the entity takes part in.
        patterns: Vec<&'a Pattern>,
    },
    Link {
        link: &'a Link,
        source: Option<&'a Entity>,
        target: Option<&'a Entity>,
    },
}

/// Owns everything needed to animate and render the case network frame by frame.
#[derive(Debug)]
pub struct AnimationDriver {
    dataset: Dataset,
    filter: Filter,
    graph: VisibleGraph,
    snapshot: LayoutSnapshot,
    simulation: ForceSimulation,
    controller: InteractionController,
    settings: Settings,
    search: String,
    rng: StdRng,
    running: bool,
    first_frame_pending: bool,
    metrics: FrameMetrics,
    export: ExportState,
}

impl AnimationDriver {
    pub fn new(dataset: Dataset, settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut driver = Self {
            dataset,
            filter: Filter::default(),
            graph: VisibleGraph::default(),
            snapshot: LayoutSnapshot::default(),
            simulation: ForceSimulation::new(settings.layout.clone()),
            controller: InteractionController::new(
                settings.interaction.clone(),
                settings.navigation.clone(),
            ),
            settings,
            search: String::new(),
            rng,
            running: true,
            first_frame_pending: true,
            metrics: FrameMetrics::default(),
            export: ExportState::default(),
        };
        driver.refresh();
        driver
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn graph(&self) -> &VisibleGraph {
        &self.graph
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.refresh();
    }

    pub fn set_cluster_scope(&mut self, scope: Option<ClusterId>) {
        let filter = self.filter.clone().with_cluster_scope(scope);
        self.set_filter(filter);
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.snapshot = LayoutSnapshot::default();
        self.first_frame_pending = true;
        self.refresh();
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.simulation.set_settings(settings.layout.clone());
        self.controller
            .set_settings(settings.interaction.clone(), settings.navigation.clone());
        self.settings = settings;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Grants the simulation a fresh tick budget without moving anything.
    pub fn rerun_simulation(&mut self) {
        self.simulation.restart();
    }

    /// Discards every position and lays the visible graph out from scratch.
    pub fn relayout(&mut self) {
        self.controller.reset();
        self.snapshot = LayoutSnapshot::default();
        self.reseed();
    }

    pub fn set_path_mode(&mut self, on: bool) {
        self.controller.set_path_mode(on);
    }

    pub fn clear_path(&mut self) {
        self.controller.clear_path();
    }

    pub fn fit_to_screen(&mut self) {
        self.controller.fit_to_screen(&self.graph, &self.snapshot);
    }

    /// Stops the animation. Subsequent frames render nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("animation stopped");
        }
        self.running = false;
        self.controller.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the next frame may differ from the last one without new input.
    pub fn needs_repaint(&self) -> bool {
        self.running && (!self.simulation.is_resting() || self.controller.dragged().is_some())
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.controller.pointer_down(pos, &self.graph, &self.snapshot);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.controller
            .pointer_move(pos, &self.graph, &mut self.snapshot);
    }

    pub fn pointer_up(&mut self, pos: Pos2, modifiers: Modifiers) {
        self.controller.pointer_up(pos, modifiers, &self.graph);
    }

    pub fn wheel(&mut self, delta: f32, cursor: Option<Pos2>) {
        self.controller.wheel(delta, cursor);
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    /// Abandons the current gesture, e.g. when the pointer was released outside the widget.
    pub fn reset_gesture(&mut self) {
        self.controller.reset();
    }

    /// Captures the next rendered frame; collect it with [`Self::take_exported_frame`].
    pub fn request_export(&mut self) {
        self.export.request();
    }

    pub fn take_exported_frame(&mut self) -> Option<ExportedFrame> {
        self.export.take_frame()
    }

    pub(crate) fn export_mut(&mut self) -> &mut ExportState {
        &mut self.export
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.controller.drain_events()
    }

    pub fn hover_details(&self) -> Option<HoverDetails<'_>> {
        match self.controller.hovered()? {
            HoverTarget::Entity(id) => {
                let entity = self.graph.entity(id)?;
                let cluster = entity.cluster_id.and_then(|c| self.dataset.cluster(c));
                let patterns = self.dataset.patterns_for(id).collect();
                Some(HoverDetails::Entity {
                    entity,
                    cluster,
                    patterns,
                })
            }
            HoverTarget::Link(id) => {
                let link = self.graph.link(id)?;
                Some(HoverDetails::Link {
                    link,
                    source: self.graph.entity(&link.source_id),
                    target: self.graph.entity(&link.target_id),
                })
            }
        }
    }

    /// Advances the layout and renders one frame for a widget of `size`.
    pub fn frame(&mut self, size: Vec2) -> Vec<DrawItem> {
        if !self.running {
            return Vec::new();
        }
        self.controller.set_viewport_size(size);

        let start = Instant::now();
        let mut steps = 0;
        while steps < self.settings.steps_per_frame {
            let pinned = self.controller.dragged().map(|(id, _)| id);
            let Some(next) = self.simulation.tick(&self.snapshot, &self.graph, pinned) else {
                break;
            };
            self.snapshot = next;
            steps += 1;
        }
        self.controller.apply_drag(&mut self.snapshot);
        let step_ms = start.elapsed().as_secs_f32() * 1000.;

        if self.first_frame_pending && !self.graph.is_empty() {
            if self.settings.navigation.fit_on_first_frame {
                self.fit_to_screen();
            }
            self.first_frame_pending = false;
        }

        let start = Instant::now();
        let ctx = DrawContext {
            graph: &self.graph,
            clusters: self.dataset.clusters(),
            snapshot: &self.snapshot,
            viewport: self.controller.viewport(),
            selection: self.controller.selection(),
            hovered: self.controller.hovered(),
            path: self.controller.path_highlight(),
            search: &self.search,
            style: &self.settings.style,
        };
        let items = Drawer::new(&ctx).draw();

        self.metrics = FrameMetrics {
            steps,
            step_ms,
            draw_ms: start.elapsed().as_secs_f32() * 1000.,
        };
        items
    }

    /// Recomputes the visible subgraph and re-seeds the layout.
    fn refresh(&mut self) {
        let subgraph = visible_subgraph(self.dataset.entities(), self.dataset.links(), &self.filter);
        self.graph = VisibleGraph::from_subgraph(subgraph);
        log::debug!(
            "visible subgraph: {} entities, {} links",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.controller.prune_to(&self.graph);
        self.reseed();
    }

    fn reseed(&mut self) {
        self.snapshot = seed(
            &self.snapshot,
            &self.graph,
            self.simulation.settings(),
            &mut self.rng,
        );
        self.controller.apply_drag(&mut self.snapshot);
        self.simulation.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        elements::{EntityKind, LinkKind, RiskLevel},
        settings::SettingsNavigation,
    };
    use egui::Color32;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Entity::new("A", EntityKind::Person, "Alpha")
                    .with_risk(RiskLevel::Critical)
                    .with_cluster(1),
                Entity::new("B", EntityKind::Phone, "Bravo")
                    .with_risk(RiskLevel::High)
                    .with_cluster(1),
                Entity::new("C", EntityKind::Account, "Charlie").with_risk(RiskLevel::Low),
                Entity::new("D", EntityKind::Vehicle, "Delta").with_risk(RiskLevel::Low),
            ],
            vec![
                Link::new("L1", "A", "B", LinkKind::Call, 4.0),
                Link::new("L2", "B", "C", LinkKind::Transfer, 2.0),
            ],
            vec![Cluster::new(1, "Ring", Color32::RED)],
            vec![Pattern {
                id: "P1".to_string(),
                severity: RiskLevel::High,
                description: "Burner rotation".to_string(),
                entity_ids: vec!["A".to_string(), "B".to_string()],
                evidence: vec!["L1".to_string()],
            }],
        )
        .unwrap()
    }

    fn settings() -> Settings {
        Settings::default()
            .with_seed(Some(11))
            .with_navigation(SettingsNavigation::default().with_fit_on_first_frame(false))
    }

    #[test]
    fn frame_renders_until_stopped() {
        let mut d = AnimationDriver::new(dataset(), settings());
        assert!(!d.frame(Vec2::new(800., 600.)).is_empty());
        assert!(d.needs_repaint());
        d.stop();
        assert!(d.frame(Vec2::new(800., 600.)).is_empty());
        assert!(!d.needs_repaint());
    }

    #[test]
    fn steps_per_frame_bounds_work() {
        let mut d = AnimationDriver::new(dataset(), settings().with_steps_per_frame(4));
        d.frame(Vec2::new(800., 600.));
        assert_eq!(d.simulation().step_count(), 4);
        assert_eq!(d.metrics().steps, 4);
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = AnimationDriver::new(dataset(), settings());
        let mut b = AnimationDriver::new(dataset(), settings());
        for _ in 0..10 {
            a.frame(Vec2::new(800., 600.));
            b.frame(Vec2::new(800., 600.));
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn filter_change_reseeds_and_prunes() {
        let mut d = AnimationDriver::new(dataset(), settings());
        d.frame(Vec2::new(800., 600.));
        let a_before = d.snapshot().position("A");

        let b = d.snapshot().position("B").unwrap();
        let screen = d.controller().viewport().canvas_to_screen_pos(b);
        d.pointer_down(screen);
        d.pointer_up(screen, Modifiers::NONE);
        assert!(d.controller().is_selected("B"));

        d.set_filter(Filter::default().with_min_risk(RiskLevel::Critical));
        assert_eq!(d.graph().node_count(), 1);
        assert_eq!(d.snapshot().len(), 1);
        assert_eq!(d.snapshot().position("A"), a_before);
        assert!(d.controller().selection().is_empty());
        assert_eq!(d.simulation().ticks_left(), d.settings().layout.tick_budget);
    }

    #[test]
    fn cluster_scope_shows_one_hop_contacts() {
        let mut d = AnimationDriver::new(dataset(), settings());
        d.set_cluster_scope(Some(1));
        let mut ids: Vec<_> = d.graph().entities().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn dragged_node_follows_pointer_across_frames() {
        let mut d = AnimationDriver::new(dataset(), settings());
        d.frame(Vec2::new(800., 600.));
        let a = d.snapshot().position("A").unwrap();
        let screen = d.controller().viewport().canvas_to_screen_pos(a);
        let target = screen + Vec2::new(40., 30.);

        d.pointer_down(screen);
        d.pointer_move(target);
        for _ in 0..5 {
            d.frame(Vec2::new(800., 600.));
        }
        let expected = d.controller().viewport().screen_to_canvas_pos(target);
        assert_eq!(d.snapshot().position("A"), Some(expected));
        assert_eq!(d.snapshot().velocity("A"), Some(Vec2::ZERO));
        assert!(d.needs_repaint());
    }

    #[test]
    fn hover_details_describe_entities() {
        let mut d = AnimationDriver::new(dataset(), settings());
        d.frame(Vec2::new(800., 600.));
        let a = d.snapshot().position("A").unwrap();
        d.pointer_move(d.controller().viewport().canvas_to_screen_pos(a));
        match d.hover_details() {
            Some(HoverDetails::Entity {
                entity,
                cluster,
                patterns,
            }) => {
                assert_eq!(entity.id, "A");
                assert_eq!(cluster.map(|c| c.name.as_str()), Some("Ring"));
                let ids: Vec<_> = patterns.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, ["P1"]);
            }
            other => panic!("unexpected hover {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_is_a_noop() {
        let mut d = AnimationDriver::new(Dataset::default(), settings());
        assert!(d.frame(Vec2::new(800., 600.)).is_empty());
        assert!(d.snapshot().is_empty());
    }
}
