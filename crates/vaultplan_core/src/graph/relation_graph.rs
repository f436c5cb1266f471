//! Directed multi-kind relation graph over task ids.
//!
//! # Responsibility
//! - Store `dependsOn` and `partOf` edges between task ids on a petgraph
//!   `DiGraph`, keyed by id through a `NodeIndex` map.
//! - Answer neighbor queries and leaf-first (post-order) walks per kind.
//!
//! # Invariants
//! - Direction is always explicit: `Out` follows edges leaving a node, `In`
//!   follows edges entering it. For `partOf` (child -> parent), children are
//!   `In` neighbors.
//! - An identical `(kind, from, to)` triple is stored once.
//! - Self-loops and cycles are accepted; [`RelationGraph::cycle_members`]
//!   lets callers report them.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{
    DfsPostOrder, EdgeRef, IntoNeighbors, IntoNodeIdentifiers, Reversed, VisitMap, Visitable,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Closed set of relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// `from` cannot proceed until `to` is resolved.
    DependsOn,
    /// `from` is a sub-part of `to`.
    PartOf,
}

/// Edge orientation relative to the queried node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
}

impl Direction {
    fn as_petgraph(self) -> petgraph::Direction {
        match self {
            Direction::Out => petgraph::Direction::Outgoing,
            Direction::In => petgraph::Direction::Incoming,
        }
    }
}

/// One stored relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub kind: RelationKind,
    pub from: String,
    pub to: String,
}

/// The underlying graph: node weights are task ids, edge weights are kinds.
pub type RelationDiGraph = DiGraph<String, RelationKind>;

/// Relation graph with O(1) id lookup. Node indices follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    graph: RelationDiGraph,
    node_index: HashMap<String, NodeIndex>,
    edge_set: HashSet<(RelationKind, NodeIndex, NodeIndex)>,
    edges: Vec<RelationEdge>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node without edges. Returns its index.
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.to_string());
        self.node_index.insert(id.to_string(), index);
        index
    }

    /// Adds one edge. Returns `false` when the same edge already exists.
    pub fn add_edge(&mut self, kind: RelationKind, from: &str, to: &str) -> bool {
        let from_index = self.add_node(from);
        let to_index = self.add_node(to);
        if !self.edge_set.insert((kind, from_index, to_index)) {
            return false;
        }
        self.graph.add_edge(from_index, to_index, kind);
        self.edges.push(RelationEdge {
            kind,
            from: from.to_string(),
            to: to.to_string(),
        });
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edges(&self) -> &[RelationEdge] {
        &self.edges
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .map(move |index| self.graph[index].as_str())
    }

    /// Neighbors of `id` in edge insertion order; empty for unknown ids.
    pub fn neighbors(&self, id: &str, kind: RelationKind, direction: Direction) -> Vec<&str> {
        match self.node_index.get(id) {
            Some(&index) => self
                .adjacent(kind, direction, index)
                .into_iter()
                .map(|node| self.graph[node].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn degree(&self, id: &str, kind: RelationKind, direction: Direction) -> usize {
        self.node_index
            .get(id)
            .map(|&index| {
                self.graph
                    .edges_directed(index, direction.as_petgraph())
                    .filter(|edge| *edge.weight() == kind)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Visits every node once, each only after everything reachable from it
    /// in `direction` (leaf-first). Roots follow node insertion order; a
    /// back-edge closing a cycle is ignored.
    pub fn walk_post_order_all(
        &self,
        kind: RelationKind,
        direction: Direction,
    ) -> impl Iterator<Item = &str> + '_ {
        let layer = self.layer(kind);
        let order = match direction {
            Direction::Out => post_order(&layer),
            Direction::In => post_order(Reversed(&layer)),
        };
        order
            .into_iter()
            .map(move |index| self.graph[index].as_str())
    }

    /// Ids that can reach themselves through `kind` edges, sorted.
    pub fn cycle_members(&self, kind: RelationKind) -> Vec<String> {
        let layer = self.layer(kind);
        let mut members: Vec<String> = tarjan_scc(&layer)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .map(|&node| layer.contains_edge(node, node))
                        .unwrap_or(false)
            })
            .flatten()
            .map(|index| self.graph[index].clone())
            .collect();
        members.sort();
        members
    }

    /// Copy of the graph holding only `kind` edges. Node indices are kept.
    fn layer(&self, kind: RelationKind) -> RelationDiGraph {
        self.graph.filter_map(
            |_, id| Some(id.clone()),
            |_, edge_kind| (*edge_kind == kind).then_some(*edge_kind),
        )
    }

    fn adjacent(&self, kind: RelationKind, direction: Direction, index: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields the newest edge first.
        let mut nodes: Vec<NodeIndex> = self
            .graph
            .edges_directed(index, direction.as_petgraph())
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| match direction {
                Direction::Out => edge.target(),
                Direction::In => edge.source(),
            })
            .collect();
        nodes.reverse();
        nodes
    }
}

/// Leaf-first order over every node, restarting from each undiscovered node
/// in index order.
fn post_order<G>(graph: G) -> Vec<NodeIndex>
where
    G: IntoNeighbors<NodeId = NodeIndex> + IntoNodeIdentifiers + Visitable,
{
    let mut dfs = DfsPostOrder::empty(graph);
    let mut order = Vec::new();
    for root in graph.node_identifiers() {
        if dfs.discovered.is_visited(&root) {
            continue;
        }
        dfs.move_to(root);
        while let Some(node) = dfs.next(graph) {
            order.push(node);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::{Direction, RelationGraph, RelationKind};

    #[test]
    fn duplicate_edges_are_stored_once_but_kinds_are_independent() {
        let mut graph = RelationGraph::new();
        assert!(graph.add_edge(RelationKind::DependsOn, "a", "b"));
        assert!(!graph.add_edge(RelationKind::DependsOn, "a", "b"));
        assert!(graph.add_edge(RelationKind::PartOf, "a", "b"));

        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.degree("a", RelationKind::DependsOn, Direction::Out), 1);
        assert_eq!(graph.degree("b", RelationKind::PartOf, Direction::In), 1);
    }

    #[test]
    fn unknown_ids_have_no_neighbors() {
        let graph = RelationGraph::new();
        assert!(graph
            .neighbors("ghost", RelationKind::PartOf, Direction::In)
            .is_empty());
        assert_eq!(graph.degree("ghost", RelationKind::PartOf, Direction::Out), 0);
    }

    #[test]
    fn post_order_survives_self_loops() {
        let mut graph = RelationGraph::new();
        graph.add_edge(RelationKind::DependsOn, "a", "a");
        graph.add_edge(RelationKind::DependsOn, "a", "b");
        let order: Vec<&str> = graph
            .walk_post_order_all(RelationKind::DependsOn, Direction::Out)
            .collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(graph.cycle_members(RelationKind::DependsOn), vec!["a"]);
    }

    #[test]
    fn long_acyclic_chain_has_no_cycle_members() {
        let mut graph = RelationGraph::new();
        for step in 1..8_000 {
            graph.add_edge(
                RelationKind::DependsOn,
                &format!("t{step}"),
                &format!("t{}", step - 1),
            );
        }
        assert!(graph.cycle_members(RelationKind::DependsOn).is_empty());
        let first = graph
            .walk_post_order_all(RelationKind::DependsOn, Direction::Out)
            .next();
        assert_eq!(first, Some("t0"));
    }

    #[test]
    fn cycle_members_cover_every_strongly_connected_ring() {
        let mut graph = RelationGraph::new();
        graph.add_edge(RelationKind::DependsOn, "a", "b");
        graph.add_edge(RelationKind::DependsOn, "b", "c");
        graph.add_edge(RelationKind::DependsOn, "c", "a");
        graph.add_edge(RelationKind::DependsOn, "c", "d");
        graph.add_edge(RelationKind::PartOf, "d", "a");

        assert_eq!(
            graph.cycle_members(RelationKind::DependsOn),
            vec!["a", "b", "c"]
        );
        assert!(graph.cycle_members(RelationKind::PartOf).is_empty());
    }

    #[test]
    fn neighbors_follow_edge_insertion_order_in_both_directions() {
        let mut graph = RelationGraph::new();
        graph.add_edge(RelationKind::PartOf, "c1", "p");
        graph.add_edge(RelationKind::PartOf, "c2", "p");
        graph.add_edge(RelationKind::PartOf, "c3", "p");
        graph.add_edge(RelationKind::DependsOn, "c1", "x");
        graph.add_edge(RelationKind::DependsOn, "c1", "y");

        assert_eq!(
            graph.neighbors("p", RelationKind::PartOf, Direction::In),
            vec!["c1", "c2", "c3"]
        );
        assert_eq!(
            graph.neighbors("c1", RelationKind::DependsOn, Direction::Out),
            vec!["x", "y"]
        );
        let parents_last: Vec<&str> = graph
            .walk_post_order_all(RelationKind::PartOf, Direction::In)
            .collect();
        let parent_position = parents_last.iter().position(|id| *id == "p");
        let child_position = parents_last.iter().position(|id| *id == "c3");
        assert!(child_position < parent_position);
    }
}
