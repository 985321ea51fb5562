mod attributes;
mod cluster;
mod entity;
mod link;
mod pattern;

pub use self::attributes::{AttributeValue, Attributes};
pub use self::cluster::{Cluster, ClusterId};
pub use self::entity::{Entity, EntityId, EntityKind, RiskLevel};
pub use self::link::{Link, LinkId, LinkKind};
pub use self::pattern::Pattern;

/// Returned when a closed enumeration receives a value outside of its set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub enumeration: &'static str,
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.enumeration, self.value)
    }
}

impl std::error::Error for UnknownVariant {}
