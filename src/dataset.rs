use std::collections::{BTreeSet, HashMap, HashSet};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::elements::{
    Attributes, Cluster, ClusterId, Entity, EntityId, EntityKind, Link, LinkId, LinkKind, Pattern,
    RiskLevel, UnknownVariant,
};

/// Rejection of a case dataset. Every variant names the offending record.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{record}: {source}")]
    UnknownVariant {
        record: String,
        #[source]
        source: UnknownVariant,
    },

    #[error("duplicate entity id `{0}`")]
    DuplicateEntity(EntityId),

    #[error("duplicate link id `{0}`")]
    DuplicateLink(LinkId),

    #[error("duplicate cluster id {0}")]
    DuplicateCluster(ClusterId),

    #[error("link `{link_id}` references missing entity `{entity_id}`")]
    MissingEndpoint { link_id: LinkId, entity_id: EntityId },

    #[error("entity `{entity_id}` references unknown cluster {cluster_id}")]
    UnknownCluster {
        entity_id: EntityId,
        cluster_id: ClusterId,
    },

    #[error("{record}: missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    #[error("link `{link_id}` has invalid weight {weight}, expected a positive number")]
    InvalidWeight { link_id: LinkId, weight: f32 },

    #[error("link `{link_id}` was last seen ({last_seen}) before it was first seen ({first_seen})")]
    InvalidTimespan {
        link_id: LinkId,
        first_seen: String,
        last_seen: String,
    },

    #[error("cluster {cluster_id} member list disagrees with entity assignments for {entities:?}")]
    MembershipMismatch {
        cluster_id: ClusterId,
        entities: Vec<EntityId>,
    },

    #[error("cluster {cluster_id} has invalid color `{color}`")]
    InvalidColor { cluster_id: ClusterId, color: String },

    #[error("pattern `{pattern_id}` references missing entity `{entity_id}`")]
    PatternEntity {
        pattern_id: String,
        entity_id: EntityId,
    },
}

/// Headline numbers of a case network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_entities: usize,
    pub total_links: usize,
    pub total_clusters: usize,
    pub high_risk_count: usize,
}

/// Validated, read-only case network.
///
/// A `Dataset` can only be obtained through validation, so every link endpoint, cluster
/// reference and pattern entity resolves.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entities: Vec<Entity>,
    links: Vec<Link>,
    clusters: Vec<Cluster>,
    patterns: Vec<Pattern>,
    entity_index: HashMap<EntityId, usize>,
}

impl Dataset {
    /// Validates the records and builds the dataset.
    ///
    /// Cluster member lists that are empty are derived from the entities' assignments.
    ///
    /// # Errors
    /// Returns the first [`DatasetError`] found; nothing is coerced or dropped.
    pub fn new(
        entities: Vec<Entity>,
        links: Vec<Link>,
        mut clusters: Vec<Cluster>,
        patterns: Vec<Pattern>,
    ) -> Result<Self, DatasetError> {
        let mut entity_index = HashMap::with_capacity(entities.len());
        for (i, e) in entities.iter().enumerate() {
            if entity_index.insert(e.id.clone(), i).is_some() {
                return Err(DatasetError::DuplicateEntity(e.id.clone()));
            }
        }

        let mut cluster_ids = HashSet::with_capacity(clusters.len());
        for c in &clusters {
            if !cluster_ids.insert(c.id) {
                return Err(DatasetError::DuplicateCluster(c.id));
            }
        }

        for e in &entities {
            if let Some(cluster_id) = e.cluster_id {
                if !cluster_ids.contains(&cluster_id) {
                    return Err(DatasetError::UnknownCluster {
                        entity_id: e.id.clone(),
                        cluster_id,
                    });
                }
            }
        }

        let mut link_ids = HashSet::with_capacity(links.len());
        for l in &links {
            if !link_ids.insert(l.id.as_str()) {
                return Err(DatasetError::DuplicateLink(l.id.clone()));
            }
            validate_link(l, &entity_index)?;
        }

        for c in &mut clusters {
            let assigned: BTreeSet<EntityId> = entities
                .iter()
                .filter(|e| e.cluster_id == Some(c.id))
                .map(|e| e.id.clone())
                .collect();
            if c.member_ids.is_empty() {
                c.member_ids = assigned;
                continue;
            }
            if c.member_ids != assigned {
                return Err(DatasetError::MembershipMismatch {
                    cluster_id: c.id,
                    entities: c
                        .member_ids
                        .symmetric_difference(&assigned)
                        .cloned()
                        .collect(),
                });
            }
        }

        for p in &patterns {
            if let Some(missing) = p.entity_ids.iter().find(|id| !entity_index.contains_key(*id)) {
                return Err(DatasetError::PatternEntity {
                    pattern_id: p.id.clone(),
                    entity_id: missing.clone(),
                });
            }
        }

        log::info!(
            "loaded case network: {} entities, {} links, {} clusters, {} patterns",
            entities.len(),
            links.len(),
            clusters.len(),
            patterns.len()
        );

        Ok(Self {
            entities,
            links,
            clusters,
            patterns,
            entity_index,
        })
    }

    /// Parses and validates a network document as served by the case backend.
    ///
    /// # Errors
    /// Malformed JSON, unknown enumeration values and every check of [`Dataset::new`].
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        raw.into_dataset()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entity_index.get(id).map(|&i| &self.entities[i])
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Patterns mentioning the entity.
    pub fn patterns_for<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.entity_ids.iter().any(|id| id == entity_id))
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            total_entities: self.entities.len(),
            total_links: self.links.len(),
            total_clusters: self.clusters.len(),
            high_risk_count: self
                .entities
                .iter()
                .filter(|e| e.risk_level.is_high())
                .count(),
        }
    }
}

fn validate_link(l: &Link, entity_index: &HashMap<EntityId, usize>) -> Result<(), DatasetError> {
    for endpoint in [&l.source_id, &l.target_id] {
        if !entity_index.contains_key(endpoint) {
            return Err(DatasetError::MissingEndpoint {
                link_id: l.id.clone(),
                entity_id: endpoint.clone(),
            });
        }
    }

    if !(l.weight.is_finite() && l.weight > 0.0) {
        return Err(DatasetError::InvalidWeight {
            link_id: l.id.clone(),
            weight: l.weight,
        });
    }

    // ISO-8601 strings of the same zone order lexicographically
    if let (Some(first), Some(last)) = (&l.first_seen, &l.last_seen) {
        if first > last {
            return Err(DatasetError::InvalidTimespan {
                link_id: l.id.clone(),
                first_seen: first.clone(),
                last_seen: last.clone(),
            });
        }
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    id: EntityId,
    #[serde(alias = "type")]
    kind: String,
    label: String,
    #[serde(default)]
    sub_label: Option<String>,
    #[serde(alias = "risk", default)]
    risk_level: Option<String>,
    #[serde(default)]
    cluster_id: Option<ClusterId>,
    #[serde(alias = "metadata", default)]
    attributes: Attributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLink {
    id: LinkId,
    #[serde(alias = "source")]
    source_id: EntityId,
    #[serde(alias = "target")]
    target_id: EntityId,
    #[serde(alias = "type")]
    kind: String,
    #[serde(default)]
    weight: Option<f32>,
    #[serde(default)]
    first_seen: Option<String>,
    #[serde(default)]
    last_seen: Option<String>,
    #[serde(alias = "metadata", default)]
    attributes: Attributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCluster {
    id: ClusterId,
    name: String,
    color: String,
    #[serde(alias = "risk", default)]
    risk_level: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(alias = "entities", default)]
    member_ids: Vec<EntityId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPattern {
    id: String,
    severity: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "entities", default)]
    entity_ids: Vec<EntityId>,
    #[serde(default)]
    evidence: Vec<String>,
}

#[derive(Deserialize)]
struct RawDataset {
    entities: Vec<RawEntity>,
    links: Vec<RawLink>,
    #[serde(default)]
    clusters: Vec<RawCluster>,
    #[serde(default)]
    patterns: Vec<RawPattern>,
}

fn parse_risk(raw: Option<&str>, record: impl FnOnce() -> String) -> Result<RiskLevel, DatasetError> {
    match raw {
        None => Err(DatasetError::MissingField {
            record: record(),
            field: "risk",
        }),
        Some(s) => s.parse().map_err(|source| DatasetError::UnknownVariant {
            record: record(),
            source,
        }),
    }
}

impl RawDataset {
    fn into_dataset(self) -> Result<Dataset, DatasetError> {
        let entities = self
            .entities
            .into_iter()
            .map(|raw| {
                let kind: EntityKind =
                    raw.kind.parse().map_err(|source| DatasetError::UnknownVariant {
                        record: format!("entity `{}`", raw.id),
                        source,
                    })?;
                let risk_level =
                    parse_risk(raw.risk_level.as_deref(), || format!("entity `{}`", raw.id))?;
                Ok(Entity {
                    id: raw.id,
                    kind,
                    label: raw.label,
                    sub_label: raw.sub_label.unwrap_or_default(),
                    risk_level,
                    cluster_id: raw.cluster_id,
                    attributes: raw.attributes,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let links = self
            .links
            .into_iter()
            .map(|raw| {
                let kind: LinkKind =
                    raw.kind.parse().map_err(|source| DatasetError::UnknownVariant {
                        record: format!("link `{}`", raw.id),
                        source,
                    })?;
                let weight = raw.weight.ok_or_else(|| DatasetError::MissingField {
                    record: format!("link `{}`", raw.id),
                    field: "weight",
                })?;
                Ok(Link {
                    id: raw.id,
                    source_id: raw.source_id,
                    target_id: raw.target_id,
                    kind,
                    weight,
                    first_seen: raw.first_seen,
                    last_seen: raw.last_seen,
                    attributes: raw.attributes,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let clusters = self
            .clusters
            .into_iter()
            .map(|raw| {
                let color =
                    Color32::from_hex(&raw.color).map_err(|_| DatasetError::InvalidColor {
                        cluster_id: raw.id,
                        color: raw.color.clone(),
                    })?;
                let risk_level =
                    parse_risk(raw.risk_level.as_deref(), || format!("cluster {}", raw.id))?;
                Ok(Cluster {
                    id: raw.id,
                    name: raw.name,
                    color,
                    risk_level,
                    description: raw.description.unwrap_or_default(),
                    member_ids: raw.member_ids.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let patterns = self
            .patterns
            .into_iter()
            .map(|raw| {
                let severity = parse_risk(Some(&raw.severity), || format!("pattern `{}`", raw.id))?;
                Ok(Pattern {
                    id: raw.id,
                    severity,
                    description: raw.description,
                    entity_ids: raw.entity_ids,
                    evidence: raw.evidence,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        Dataset::new(entities, links, clusters, patterns)
    }
}
