use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Parameters of the force simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceSettings {
    pub is_running: bool,
    /// Size of the layout canvas, in canvas units, with its top-left corner at the origin.
    pub canvas: Vec2,
    /// Nodes are clamped to stay this far inside the canvas bounds.
    pub margin: f32,
    /// Repulsion constant: every pair is pushed apart with `k_repulse / distance²`.
    pub k_repulse: f32,
    /// Spring constant along links.
    pub spring_k: f32,
    /// Ideal length of the heaviest links.
    pub base_spacing: f32,
    /// Weights above this value no longer shorten the ideal length.
    pub max_weight_span: f32,
    /// Canvas units added to the ideal length per unit of weight below `max_weight_span`.
    pub weight_spacing: f32,
    /// Pull toward the centroid of the visible members of the same cluster.
    pub cluster_k: f32,
    /// Pull toward the canvas center.
    pub center_k: f32,
    /// Velocity multiplier applied every tick, below 1.
    pub damping: f32,
    /// Per-tick speed cap.
    pub max_speed: f32,
    /// Ticks simulated after each seed or explicit re-run before the layout comes to rest.
    pub tick_budget: u32,
    /// Random offset applied around cluster anchors when seeding.
    pub seed_jitter: f32,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            is_running: true,
            canvas: Vec2::new(1000., 700.),
            margin: 40.,
            k_repulse: 2000.,
            spring_k: 0.02,
            base_spacing: 100.,
            max_weight_span: 10.,
            weight_spacing: 8.,
            cluster_k: 0.005,
            center_k: 0.001,
            damping: 0.85,
            max_speed: 40.,
            tick_budget: 300,
            seed_jitter: 60.,
        }
    }
}

impl ForceSettings {
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.canvas)
    }

    /// Target length of a link: heavier relationships are kept closer.
    pub fn ideal_distance(&self, weight: f32) -> f32 {
        let span = self.max_weight_span.max(0.);
        self.base_spacing + (span - weight.min(span)) * self.weight_spacing
    }

    pub fn with_tick_budget(mut self, tick_budget: u32) -> Self {
        self.tick_budget = tick_budget;
        self
    }

    pub fn with_canvas(mut self, canvas: Vec2) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_running(mut self, is_running: bool) -> Self {
        self.is_running = is_running;
        self
    }
}
