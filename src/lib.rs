mod dataset;
mod draw;
mod driver;
mod elements;
mod export;
mod filter;
mod graph;
mod graph_view;
mod interaction;
mod metadata;
mod path;
mod settings;

pub mod events;
pub mod layouts;

pub use self::dataset::{Dataset, DatasetError, DatasetSummary};
pub use self::draw::{
    link_color, node_radius, risk_color, truncate_label, DrawContext, DrawItem, Drawer, TextItem,
    PATH_COLOR,
};
pub use self::driver::{AnimationDriver, FrameMetrics, HoverDetails};
pub use self::elements::{
    AttributeValue, Attributes, Cluster, ClusterId, Entity, EntityId, EntityKind, Link, LinkId,
    LinkKind, Pattern, RiskLevel, UnknownVariant,
};
pub use self::export::{ExportError, ExportState, ExportedFrame};
pub use self::filter::{visible_subgraph, Filter, Subgraph};
pub use self::graph::VisibleGraph;
pub use self::graph_view::GraphView;
pub use self::interaction::{HoverTarget, InteractionController, InteractionState, RestState};
pub use self::metadata::Viewport;
pub use self::path::{shortest_path, PathHighlight};
pub use self::settings::{
    Settings, SettingsInteraction, SettingsNavigation, SettingsStyle, ZoomAnchor,
};
