use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct Bounds {
    min: Pos2,
    max: Pos2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Pos2::new(f32::MAX, f32::MAX),
            max: Pos2::new(f32::MIN, f32::MIN),
        }
    }
}

impl Bounds {
    fn compute_next(&mut self, loc: Pos2, size: f32) {
        if loc.x - size < self.min.x {
            self.min.x = loc.x - size;
        }
        if loc.x + size > self.max.x {
            self.max.x = loc.x + size;
        }
        if loc.y - size < self.min.y {
            self.min.y = loc.y - size;
        }
        if loc.y + size > self.max.y {
            self.max.y = loc.y + size;
        }
    }

    fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }
}

/// Current view transform between layout canvas coordinates and widget-local screen
/// coordinates: `screen = canvas * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom factor
    pub zoom: f32,
    /// Current pan offset
    pub pan: Vec2,
    /// Size of the widget the graph is shown in
    pub size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.,
            pan: Vec2::ZERO,
            size: Vec2::new(1000., 700.),
        }
    }
}

impl Viewport {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn canvas_to_screen_pos(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn canvas_to_screen_size(&self, size: f32) -> f32 {
        size * self.zoom
    }

    pub fn screen_to_canvas_pos(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    /// Widget-local rectangle.
    pub fn screen_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }

    /// Sets the zoom to `new_zoom`, compensating with pan so the screen point `anchor`
    /// keeps showing the same canvas point.
    pub fn zoom_around(&mut self, anchor: Pos2, new_zoom: f32) {
        let graph_anchor = (anchor.to_vec2() - self.pan) / self.zoom;
        let pan_delta = graph_anchor * self.zoom - graph_anchor * new_zoom;
        self.pan += pan_delta;
        self.zoom = new_zoom;
    }

    /// Centers the given canvas points (each with its radius) in the widget, zooming so they
    /// fit with `padding` relative margin. The zoom is clamped to `[zoom_min, zoom_max]`.
    pub fn fit(
        &mut self,
        points: impl IntoIterator<Item = (Pos2, f32)>,
        padding: f32,
        zoom_min: f32,
        zoom_max: f32,
    ) {
        let mut bounds = Bounds::default();
        for (loc, size) in points {
            bounds.compute_next(loc, size);
        }
        let (min, max) = if bounds.is_valid() {
            (bounds.min, bounds.max)
        } else {
            (Pos2::new(-0.5, -0.5), Pos2::new(0.5, 0.5))
        };

        let mut diag: Vec2 = max - min;
        if !diag.x.is_finite() || !diag.y.is_finite() || diag.x <= 0.0 || diag.y <= 0.0 {
            diag = Vec2::new(1., 1.);
        }
        let graph_size = diag * (1. + padding);
        let (width, height) = (graph_size.x.max(1e-3), graph_size.y.max(1e-3));
        let zoom_x = (self.size.x / width).abs();
        let zoom_y = (self.size.y / height).abs();
        let mut new_zoom = zoom_x.min(zoom_y);
        if !new_zoom.is_finite() || new_zoom <= 0.0 {
            new_zoom = 1.0;
        }
        new_zoom = new_zoom.max(zoom_min.min(zoom_max)).min(zoom_max.max(zoom_min));

        let graph_center = (min.to_vec2() + max.to_vec2()) / 2.0;
        self.zoom = new_zoom;
        self.pan = self.screen_rect().center().to_vec2() - graph_center * new_zoom;
    }
}
