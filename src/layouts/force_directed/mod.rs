mod core;
mod simulation;
mod state;

pub(crate) use self::core::{clamp_bounds, clamp_to};
pub use self::core::step;
pub use simulation::ForceSimulation;
pub use state::ForceSettings;
