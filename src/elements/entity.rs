use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Attributes, ClusterId, UnknownVariant};

pub type EntityId = String;

/// Closed set of things an investigation graph node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Person,
    Phone,
    Account,
    Address,
    Organization,
    CryptoAsset,
    Vehicle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Person,
        EntityKind::Phone,
        EntityKind::Account,
        EntityKind::Address,
        EntityKind::Organization,
        EntityKind::CryptoAsset,
        EntityKind::Vehicle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Phone => "phone",
            EntityKind::Account => "account",
            EntityKind::Address => "address",
            EntityKind::Organization => "organization",
            EntityKind::CryptoAsset => "crypto-asset",
            EntityKind::Vehicle => "vehicle",
        }
    }
}

impl FromStr for EntityKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                enumeration: "entity kind",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk assessment of an entity or cluster.
///
/// Ordered by severity: `Unknown < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Unknown,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Critical and high risk entities are the ones flagged in case summaries.
    pub fn is_high(self) -> bool {
        self >= RiskLevel::High
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                enumeration: "risk level",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the investigation graph.
///
/// Entities are read-only once loaded. Their on-canvas position and velocity are owned by
/// [`crate::LayoutSnapshot`], not by the entity itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub label: String,
    pub sub_label: String,
    pub risk_level: RiskLevel,
    pub cluster_id: Option<ClusterId>,
    pub attributes: Attributes,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            sub_label: String::new(),
            risk_level: RiskLevel::Unknown,
            cluster_id: None,
            attributes: Attributes::default(),
        }
    }

    pub fn with_sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = sub_label.into();
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_cluster(mut self, cluster_id: ClusterId) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Case-insensitive match of the query against id, label and sub label.
    /// An empty or blank query matches nothing.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        let query = query.to_lowercase();
        [&self.id, &self.label, &self.sub_label]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_wire_names() {
        assert_eq!("crypto-asset".parse::<EntityKind>(), Ok(EntityKind::CryptoAsset));
        let err = "satellite".parse::<EntityKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown entity kind `satellite`");
    }

    #[test]
    fn risk_levels_are_ordered_by_severity() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Low > RiskLevel::Unknown);
        assert!(RiskLevel::High.is_high());
        assert!(!RiskLevel::Medium.is_high());
    }

    #[test]
    fn search_is_case_insensitive_and_ignores_blank_queries() {
        let e = Entity::new("E7", EntityKind::Person, "Somchai K.").with_sub_label("Coordinator");
        assert!(e.matches_search("somchai"));
        assert!(e.matches_search("COORD"));
        assert!(e.matches_search("e7"));
        assert!(!e.matches_search("   "));
        assert!(!e.matches_search("dealer"));
    }
}
