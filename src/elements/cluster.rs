use std::collections::BTreeSet;

use egui::Color32;
use serde::{Deserialize, Serialize};

use super::{EntityId, RiskLevel};

pub type ClusterId = u32;

/// Externally assigned group of entities sharing a visual and risk context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub color: Color32,
    pub risk_level: RiskLevel,
    pub description: String,
    /// Informational copy of the membership. The entities' `cluster_id` is authoritative.
    pub member_ids: BTreeSet<EntityId>,
}

impl Cluster {
    pub fn new(id: ClusterId, name: impl Into<String>, color: Color32) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            risk_level: RiskLevel::Unknown,
            description: String::new(),
            member_ids: BTreeSet::new(),
        }
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.member_ids = members.into_iter().map(Into::into).collect();
        self
    }
}
