use serde::{Deserialize, Serialize};

use crate::layouts::force_directed::ForceSettings;

/// Pointer interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsInteraction {
    /// Nodes whose center lies within this many screen units of the pointer can be picked.
    /// Also the movement threshold below which a drag counts as a click.
    pub hit_radius: f32,

    /// Links passing within this many screen units of the pointer are hovered.
    pub link_hit_tolerance: f32,

    /// Node dragging
    pub dragging_enabled: bool,

    /// Modifier-click toggles selection membership instead of replacing it
    pub multi_select_enabled: bool,
}

impl Default for SettingsInteraction {
    fn default() -> Self {
        Self {
            hit_radius: 25.,
            link_hit_tolerance: 6.,
            dragging_enabled: true,
            multi_select_enabled: true,
        }
    }
}

impl SettingsInteraction {
    pub fn with_hit_radius(mut self, hit_radius: f32) -> Self {
        self.hit_radius = hit_radius;
        self
    }

    pub fn with_dragging_enabled(mut self, enabled: bool) -> Self {
        self.dragging_enabled = enabled;
        self
    }

    pub fn with_multi_select_enabled(mut self, enabled: bool) -> Self {
        self.multi_select_enabled = enabled;
        self
    }
}

/// Point the wheel zoom is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomAnchor {
    /// The canvas point under the cursor stays in place.
    #[default]
    Cursor,
    /// The center of the widget stays in place.
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsNavigation {
    /// Zoom step per wheel notch, relative
    pub zoom_step: f32,

    pub zoom_min: f32,
    pub zoom_max: f32,

    pub zoom_anchor: ZoomAnchor,

    /// Padding around the graph when fitting to screen, relative to its size
    pub fit_to_screen_padding: f32,

    /// Fit the graph to the widget on the first frame
    pub fit_on_first_frame: bool,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            zoom_min: 0.3,
            zoom_max: 3.0,
            zoom_anchor: ZoomAnchor::Cursor,
            fit_to_screen_padding: 0.1,
            fit_on_first_frame: true,
        }
    }
}

impl SettingsNavigation {
    pub fn with_zoom_step(mut self, zoom_step: f32) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    pub fn with_zoom_range(mut self, zoom_min: f32, zoom_max: f32) -> Self {
        self.zoom_min = zoom_min;
        self.zoom_max = zoom_max;
        self
    }

    pub fn with_zoom_anchor(mut self, zoom_anchor: ZoomAnchor) -> Self {
        self.zoom_anchor = zoom_anchor;
        self
    }

    pub fn with_fit_on_first_frame(mut self, fit: bool) -> Self {
        self.fit_on_first_frame = fit;
        self
    }

    /// Clamps a zoom factor to the configured range, tolerating an inverted range.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        let (lo, hi) = if self.zoom_min <= self.zoom_max {
            (self.zoom_min, self.zoom_max)
        } else {
            (self.zoom_max, self.zoom_min)
        };
        zoom.max(lo).min(hi)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStyle {
    /// Dashed boxes around clusters with at least two visible members
    pub show_cluster_boxes: bool,

    /// Node labels below the nodes
    pub labels_visible: bool,

    /// Labels longer than this are truncated with an ellipsis
    pub label_max_chars: usize,

    /// Canvas units between the outermost cluster members and the box edge
    pub cluster_box_padding: f32,

    /// Link width is `min(weight, link_weight_cap) * link_width_per_weight`
    pub link_width_per_weight: f32,
    pub link_weight_cap: f32,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            show_cluster_boxes: true,
            labels_visible: true,
            label_max_chars: 15,
            cluster_box_padding: 30.,
            link_width_per_weight: 0.5,
            link_weight_cap: 8.,
        }
    }
}

impl SettingsStyle {
    pub fn with_cluster_boxes(mut self, show: bool) -> Self {
        self.show_cluster_boxes = show;
        self
    }

    pub fn with_labels_visible(mut self, visible: bool) -> Self {
        self.labels_visible = visible;
        self
    }

    pub fn with_label_max_chars(mut self, label_max_chars: usize) -> Self {
        self.label_max_chars = label_max_chars;
        self
    }
}

/// All settings of the graph engine. Every field falls back to its default, so partial
/// config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interaction: SettingsInteraction,
    pub navigation: SettingsNavigation,
    pub style: SettingsStyle,
    pub layout: ForceSettings,
    /// Upper bound of simulation ticks per rendered frame
    pub steps_per_frame: u32,
    /// Seed of the layout RNG; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interaction: SettingsInteraction::default(),
            navigation: SettingsNavigation::default(),
            style: SettingsStyle::default(),
            layout: ForceSettings::default(),
            steps_per_frame: 1,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_steps_per_frame(mut self, steps_per_frame: u32) -> Self {
        self.steps_per_frame = steps_per_frame;
        self
    }

    pub fn with_layout(mut self, layout: ForceSettings) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_interaction(mut self, interaction: SettingsInteraction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_navigation(mut self, navigation: SettingsNavigation) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_style(mut self, style: SettingsStyle) -> Self {
        self.style = style;
        self
    }
}
