use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::elements::{ClusterId, Entity, EntityKind, Link, RiskLevel};

/// Predicates deciding which part of the case network is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub risk_levels: BTreeSet<RiskLevel>,
    pub kinds: BTreeSet<EntityKind>,
    /// When set, only the cluster and its immediate external contacts are shown.
    pub cluster_scope: Option<ClusterId>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            risk_levels: RiskLevel::ALL.into_iter().collect(),
            kinds: EntityKind::ALL.into_iter().collect(),
            cluster_scope: None,
        }
    }
}

impl Filter {
    /// Keeps only entities at or above `min` severity.
    pub fn with_min_risk(mut self, min: RiskLevel) -> Self {
        self.risk_levels = RiskLevel::ALL.into_iter().filter(|r| *r >= min).collect();
        self
    }

    pub fn with_risk_levels(mut self, levels: impl IntoIterator<Item = RiskLevel>) -> Self {
        self.risk_levels = levels.into_iter().collect();
        self
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn with_cluster_scope(mut self, cluster_scope: Option<ClusterId>) -> Self {
        self.cluster_scope = cluster_scope;
        self
    }

    fn admits(&self, e: &Entity) -> bool {
        self.risk_levels.contains(&e.risk_level) && self.kinds.contains(&e.kind)
    }
}

/// Entities and links passing a [`Filter`]. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    pub entities: Vec<Entity>,
    pub links: Vec<Link>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Derives the visible subgraph.
///
/// An entity is visible when its risk level and kind pass the filter and, if a cluster scope
/// is set, it either belongs to that cluster or shares a link with a member of it. A link is
/// visible when both of its endpoints are.
pub fn visible_subgraph(entities: &[Entity], links: &[Link], filter: &Filter) -> Subgraph {
    let in_scope: Option<HashSet<&str>> = filter.cluster_scope.map(|scope| {
        let members: HashSet<&str> = entities
            .iter()
            .filter(|e| e.cluster_id == Some(scope))
            .map(|e| e.id.as_str())
            .collect();

        let mut reachable = members.clone();
        for l in links {
            if members.contains(l.source_id.as_str()) {
                reachable.insert(l.target_id.as_str());
            }
            if members.contains(l.target_id.as_str()) {
                reachable.insert(l.source_id.as_str());
            }
        }
        reachable
    });

    let visible: Vec<Entity> = entities
        .iter()
        .filter(|e| filter.admits(e))
        .filter(|e| in_scope.as_ref().is_none_or(|s| s.contains(e.id.as_str())))
        .cloned()
        .collect();

    let ids: HashSet<&str> = visible.iter().map(|e| e.id.as_str()).collect();
    let links = links
        .iter()
        .filter(|l| ids.contains(l.source_id.as_str()) && ids.contains(l.target_id.as_str()))
        .cloned()
        .collect();

    Subgraph {
        entities: visible,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::LinkKind;

    fn dataset() -> (Vec<Entity>, Vec<Link>) {
        let entities = vec![
            Entity::new("boss", EntityKind::Person, "Boss")
                .with_risk(RiskLevel::Critical)
                .with_cluster(1),
            Entity::new("phone", EntityKind::Phone, "081")
                .with_risk(RiskLevel::High)
                .with_cluster(1),
            Entity::new("dealer", EntityKind::Person, "Dealer")
                .with_risk(RiskLevel::Medium)
                .with_cluster(2),
            Entity::new("bank", EntityKind::Account, "KBank")
                .with_risk(RiskLevel::Low),
            Entity::new("car", EntityKind::Vehicle, "Truck").with_risk(RiskLevel::Low),
        ];
        let links = vec![
            Link::new("L1", "boss", "phone", LinkKind::Call, 5.0),
            Link::new("L2", "phone", "dealer", LinkKind::Sms, 2.0),
            Link::new("L3", "dealer", "bank", LinkKind::Transfer, 1.0),
            Link::new("L4", "bank", "car", LinkKind::Business, 1.0),
        ];
        (entities, links)
    }

    fn ids(s: &Subgraph) -> BTreeSet<&str> {
        s.entities.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn default_filter_shows_everything() {
        let (entities, links) = dataset();
        let s = visible_subgraph(&entities, &links, &Filter::default());
        assert_eq!(s.entities.len(), 5);
        assert_eq!(s.links.len(), 4);
    }

    #[test]
    fn risk_filter_drops_dangling_links() {
        let (entities, links) = dataset();
        let s = visible_subgraph(
            &entities,
            &links,
            &Filter::default().with_min_risk(RiskLevel::High),
        );
        assert_eq!(ids(&s), BTreeSet::from(["boss", "phone"]));
        let link_ids: Vec<_> = s.links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(link_ids, vec!["L1"]);
    }

    #[test]
    fn cluster_scope_includes_one_hop_contacts() {
        let (entities, links) = dataset();
        let s = visible_subgraph(
            &entities,
            &links,
            &Filter::default().with_cluster_scope(Some(1)),
        );
        assert_eq!(ids(&s), BTreeSet::from(["boss", "phone", "dealer"]));
    }

    #[test]
    fn cluster_scope_still_honours_kind_filter() {
        let (entities, links) = dataset();
        let s = visible_subgraph(
            &entities,
            &links,
            &Filter::default()
                .with_cluster_scope(Some(2))
                .with_kinds([EntityKind::Person, EntityKind::Account]),
        );
        assert_eq!(ids(&s), BTreeSet::from(["dealer", "bank"]));
        assert_eq!(s.links.len(), 1);
    }

    #[test]
    fn empty_filter_yields_empty_subgraph() {
        let (entities, links) = dataset();
        let s = visible_subgraph(&entities, &links, &Filter::default().with_kinds([]));
        assert!(s.is_empty());
        assert!(s.links.is_empty());
    }
}
