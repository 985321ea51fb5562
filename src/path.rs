use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graphmap::UnGraphMap;

use crate::{
    elements::{EntityId, Link, LinkId},
    graph::VisibleGraph,
};

/// Finds a shortest path between two entities, ignoring link direction.
///
/// Returns the entity ids from `start` to `end` inclusive, `[start]` when both are the same
/// entity, and an empty vector when they are not connected. Links are visited in ascending id
/// order, so among several shortest paths the one through the lowest link ids wins.
pub fn shortest_path<'a>(
    links: impl IntoIterator<Item = &'a Link>,
    start: &str,
    end: &str,
) -> Vec<EntityId> {
    if start == end {
        return vec![start.to_string()];
    }

    let mut sorted: Vec<&Link> = links.into_iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut adjacency: UnGraphMap<&str, ()> = UnGraphMap::new();
    for l in sorted {
        adjacency.add_edge(l.source_id.as_str(), l.target_id.as_str(), ());
    }
    if !adjacency.contains_node(start) || !adjacency.contains_node(end) {
        return Vec::new();
    }

    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if node == end {
            break;
        }
        for next in adjacency.neighbors(node) {
            if visited.insert(next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }

    if !visited.contains(end) {
        return Vec::new();
    }

    let mut path = vec![end.to_string()];
    let mut cursor = end;
    while let Some(&prev) = parent.get(cursor) {
        path.push(prev.to_string());
        cursor = prev;
    }
    path.reverse();
    path
}

/// Entities and links of a found path, as highlighted by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHighlight {
    pub nodes: HashSet<EntityId>,
    pub links: HashSet<LinkId>,
}

impl PathHighlight {
    /// Collects the path entities and every link joining two consecutive path entities.
    pub fn from_path(path: &[EntityId], g: &VisibleGraph) -> Self {
        let nodes = path.iter().cloned().collect();
        let links = path
            .windows(2)
            .flat_map(|w| g.links_between(&w[0], &w[1]))
            .map(|l| l.id.clone())
            .collect();
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_link(&self, id: &str) -> bool {
        self.links.contains(id)
    }
}
