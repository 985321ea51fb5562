use serde::{Deserialize, Serialize};

use super::{EntityId, RiskLevel};

/// Suspicious-pattern annotation produced by analysts or upstream tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub severity: RiskLevel,
    pub description: String,
    pub entity_ids: Vec<EntityId>,
    pub evidence: Vec<String>,
}
