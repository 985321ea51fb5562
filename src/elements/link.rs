use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Attributes, EntityId, UnknownVariant};

pub type LinkId = String;

/// Closed set of relationship kinds between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Call,
    Sms,
    Transfer,
    Meeting,
    Family,
    Business,
    Criminal,
}

impl LinkKind {
    pub const ALL: [LinkKind; 7] = [
        LinkKind::Call,
        LinkKind::Sms,
        LinkKind::Transfer,
        LinkKind::Meeting,
        LinkKind::Family,
        LinkKind::Business,
        LinkKind::Criminal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Call => "call",
            LinkKind::Sms => "sms",
            LinkKind::Transfer => "transfer",
            LinkKind::Meeting => "meeting",
            LinkKind::Family => "family",
            LinkKind::Business => "business",
            LinkKind::Criminal => "criminal",
        }
    }

    /// Whether the source to target direction is meaningful and drawn with an arrowhead.
    pub fn is_directional(self) -> bool {
        matches!(self, LinkKind::Call | LinkKind::Transfer)
    }
}

impl FromStr for LinkKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                enumeration: "link kind",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub kind: LinkKind,
    /// Positive strength of the relationship. Heavier links are drawn thicker and kept shorter.
    pub weight: f32,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub attributes: Attributes,
}

impl Link {
    pub fn new(
        id: impl Into<LinkId>,
        source_id: impl Into<EntityId>,
        target_id: impl Into<EntityId>,
        kind: LinkKind,
        weight: f32,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            weight,
            first_seen: None,
            last_seen: None,
            attributes: Attributes::default(),
        }
    }

    pub fn with_timespan(mut self, first_seen: impl Into<String>, last_seen: impl Into<String>) -> Self {
        self.first_seen = Some(first_seen.into());
        self.last_seen = Some(last_seen.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn touches(&self, entity_id: &str) -> bool {
        self.source_id == entity_id || self.target_id == entity_id
    }

    /// Returns the endpoint opposite to `entity_id`, if the link touches it.
    pub fn other_end(&self, entity_id: &str) -> Option<&str> {
        if self.source_id == entity_id {
            Some(&self.target_id)
        } else if self.target_id == entity_id {
            Some(&self.source_id)
        } else {
            None
        }
    }

    /// Whether the link joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }
}
