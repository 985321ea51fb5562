pub mod force_directed;

mod seed;
mod snapshot;

pub use seed::{cluster_anchor, seed};
pub use snapshot::{Body, LayoutSnapshot};
