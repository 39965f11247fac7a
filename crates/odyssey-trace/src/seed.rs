//! Seed inputs and reproducible random input generation.
//!
//! A seed is what a generator consumes: a flat sequence, a sequence with an
//! injected search target, an array-encoded tree, or a `{nodes, edges}` graph.
//! The JSON forms are accepted interchangeably:
//!
//! ```text
//! [5, 3, 8, 1]                         Sequence
//! {"array": [5, 3, 8], "target": 8}    Targeted
//! {"array": [1, null, 3]}              Tree
//! {"nodes": [0, 1, 2], "edges": [[0, 1], [1, 2]]}
//! ```

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::error::{Error, Result};

/// Longest sequence a generator will simulate over.
pub const MAX_SEQUENCE_LEN: usize = 64;

/// Tree slots available to tree generators (five complete levels).
pub const MAX_TREE_NODES: usize = 31;

/// Largest graph a generator will traverse.
pub const MAX_GRAPH_NODES: usize = 16;

/// An undirected graph seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSeed {
    pub nodes: Vec<usize>,
    pub edges: Vec<(usize, usize)>,
}

impl Default for GraphSeed {
    /// The six-node sample graph used when no graph is supplied.
    fn default() -> Self {
        Self::heap_shaped(6)
    }
}

impl GraphSeed {
    /// Nodes `0..n`, each node `i > 0` linked to its binary-heap parent `(i - 1) / 2`.
    pub fn heap_shaped(n: usize) -> Self {
        Self {
            nodes: (0..n).collect(),
            edges: (1..n).map(|i| ((i - 1) / 2, i)).collect(),
        }
    }

    /// Check node uniqueness, bounds and edge endpoints.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.len() > MAX_GRAPH_NODES {
            return Err(Error::InvalidGraph(format!(
                "{} nodes exceeds limit of {}",
                self.nodes.len(),
                MAX_GRAPH_NODES
            )));
        }
        let ids: BTreeSet<usize> = self.nodes.iter().copied().collect();
        if ids.len() != self.nodes.len() {
            return Err(Error::InvalidGraph("duplicate node id".to_string()));
        }
        for &(from, to) in &self.edges {
            if !ids.contains(&from) || !ids.contains(&to) {
                return Err(Error::InvalidGraph(format!(
                    "edge ({from}, {to}) references a missing node"
                )));
            }
            if from == to {
                return Err(Error::InvalidGraph(format!("self loop on node {from}")));
            }
        }
        Ok(())
    }

    /// Undirected neighbors of `node`, ascending and deduplicated.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let set: BTreeSet<usize> = self
            .edges
            .iter()
            .filter_map(|&(from, to)| {
                if from == node {
                    Some(to)
                } else if to == node {
                    Some(from)
                } else {
                    None
                }
            })
            .collect();
        set.into_iter().collect()
    }

    /// Position of `node` in the node list.
    pub fn position(&self, node: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }
}

/// Input handed to a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    /// A flat numeric sequence.
    Sequence(Vec<i64>),
    /// A graph given as node ids and undirected edges.
    Graph(GraphSeed),
    /// A sequence with an explicit search target.
    Targeted { array: Vec<i64>, target: i64 },
    /// An array-encoded complete binary tree with holes.
    Tree { array: Vec<Option<i64>> },
}

impl From<Vec<i64>> for Seed {
    fn from(values: Vec<i64>) -> Self {
        Seed::Sequence(values)
    }
}

impl From<GraphSeed> for Seed {
    fn from(graph: GraphSeed) -> Self {
        Seed::Graph(graph)
    }
}

impl Seed {
    /// A sequence with an injected search target.
    pub fn with_target(array: Vec<i64>, target: i64) -> Self {
        Seed::Targeted { array, target }
    }

    /// Short name of the seed's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Seed::Sequence(_) => "sequence",
            Seed::Graph(_) => "graph",
            Seed::Targeted { .. } => "targeted sequence",
            Seed::Tree { .. } => "tree",
        }
    }

    /// The injected search target, if any.
    pub fn target(&self) -> Option<i64> {
        match self {
            Seed::Targeted { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// A private working copy of the seed as a flat sequence.
    ///
    /// A hole-free tree array is accepted as a sequence; graphs are not.
    pub fn sequence(&self, algorithm: &'static str) -> Result<Vec<i64>> {
        let values = match self {
            Seed::Sequence(values) | Seed::Targeted { array: values, .. } => values.clone(),
            Seed::Tree { array } => array
                .iter()
                .copied()
                .collect::<Option<Vec<i64>>>()
                .ok_or_else(|| self.mismatch(algorithm, "sequence"))?,
            Seed::Graph(_) => return Err(self.mismatch(algorithm, "sequence")),
        };
        if values.len() > MAX_SEQUENCE_LEN {
            return Err(Error::SeedTooLarge {
                algorithm,
                len: values.len(),
                max: MAX_SEQUENCE_LEN,
            });
        }
        Ok(values)
    }

    /// A private working copy of the seed as an array-encoded tree.
    pub fn tree(&self, algorithm: &'static str) -> Result<Vec<Option<i64>>> {
        let nodes: Vec<Option<i64>> = match self {
            Seed::Sequence(values) | Seed::Targeted { array: values, .. } => {
                values.iter().copied().map(Some).collect()
            }
            Seed::Tree { array } => array.clone(),
            Seed::Graph(_) => return Err(self.mismatch(algorithm, "tree")),
        };
        if nodes.len() > MAX_TREE_NODES {
            return Err(Error::SeedTooLarge {
                algorithm,
                len: nodes.len(),
                max: MAX_TREE_NODES,
            });
        }
        Ok(nodes)
    }

    /// A validated graph; a raw sequence of length `n` becomes a heap-shaped graph over `0..n`.
    pub fn graph(&self, algorithm: &'static str) -> Result<GraphSeed> {
        let graph = match self {
            Seed::Graph(graph) => graph.clone(),
            Seed::Sequence(values) | Seed::Targeted { array: values, .. } => {
                if values.len() > MAX_GRAPH_NODES {
                    return Err(Error::SeedTooLarge {
                        algorithm,
                        len: values.len(),
                        max: MAX_GRAPH_NODES,
                    });
                }
                GraphSeed::heap_shaped(values.len())
            }
            Seed::Tree { .. } => return Err(self.mismatch(algorithm, "graph")),
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Flat preview of the seed, used by the unsupported-algorithm fallback.
    pub fn preview(&self) -> Vec<i64> {
        match self {
            Seed::Sequence(values) | Seed::Targeted { array: values, .. } => values.clone(),
            Seed::Tree { array } => array.iter().flatten().copied().collect(),
            Seed::Graph(graph) => graph
                .nodes
                .iter()
                .map(|&n| i64::try_from(n).unwrap_or(i64::MAX))
                .collect(),
        }
    }

    fn mismatch(&self, algorithm: &'static str, expected: &'static str) -> Error {
        Error::InvalidSeed {
            algorithm,
            expected,
            found: self.shape(),
        }
    }
}

/// Deterministic index into `values` derived from the values themselves.
///
/// Stands in for "pick a random element" so the same seed always selects the
/// same element. Returns 0 for an empty slice.
pub fn derive_index(values: &[i64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let sum = values
        .iter()
        .fold(0u64, |acc, v| acc.wrapping_add(v.unsigned_abs()));
    (sum % values.len() as u64) as usize
}

/// Configuration for generating fresh inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// RNG seed for reproducible inputs
    pub seed: u64,
    /// Number of values (or graph nodes) to generate
    pub size: usize,
    /// Largest value in a generated sequence
    pub max_value: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            size: 10,
            max_value: 100,
        }
    }
}

impl SeedConfig {
    /// A deterministic RNG for this configuration.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the input size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

/// `size` values drawn uniformly from `1..=max`.
pub fn random_sequence<R: Rng + ?Sized>(rng: &mut R, size: usize, max: i64) -> Vec<i64> {
    let max = max.max(1);
    (0..size.min(MAX_SEQUENCE_LEN))
        .map(|_| rng.gen_range(1..=max))
        .collect()
}

/// Random undirected graph of 3–10 nodes, each linking to one or two others.
pub fn random_graph<R: Rng + ?Sized>(rng: &mut R, node_count: usize) -> GraphSeed {
    let count = node_count.clamp(3, 10);
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for i in 0..count {
        let links = rng.gen_range(1..=2);
        for _ in 0..links {
            let other = rng.gen_range(0..count);
            if other == i {
                continue;
            }
            let edge = (i.min(other), i.max(other));
            if !edges.contains(&edge) {
                edges.push(edge);
            }
        }
    }

    GraphSeed {
        nodes: (0..count).collect(),
        edges,
    }
}

/// A fresh seed suited to a category's generators.
pub fn random_seed<R: Rng + ?Sized>(category: Category, config: &SeedConfig, rng: &mut R) -> Seed {
    match category {
        Category::Graphs => Seed::Graph(random_graph(rng, config.size)),
        Category::Trees => Seed::Sequence(random_sequence(rng, config.size.min(15), 99)),
        Category::Hashing => Seed::Sequence(random_sequence(rng, config.size, 999)),
        _ => Seed::Sequence(random_sequence(rng, config.size, config.max_value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_forms_are_interchangeable() {
        let seq: Seed = serde_json::from_str("[5, 3, 8]").unwrap();
        assert_eq!(seq, Seed::Sequence(vec![5, 3, 8]));

        let targeted: Seed = serde_json::from_str(r#"{"array": [10], "target": 10}"#).unwrap();
        assert_eq!(targeted.target(), Some(10));

        let tree: Seed = serde_json::from_str(r#"{"array": [1, null, 3]}"#).unwrap();
        assert_eq!(tree.tree("inorder-traversal").unwrap(), vec![Some(1), None, Some(3)]);

        let graph: Seed =
            serde_json::from_str(r#"{"nodes": [0, 1, 2], "edges": [[0, 1], [1, 2]]}"#).unwrap();
        assert_eq!(graph.graph("graph-bfs").unwrap().edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn graph_seed_is_not_a_sequence() {
        let seed = Seed::Graph(GraphSeed::default());
        let err = seed.sequence("bubble").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSeed { expected: "sequence", found: "graph", .. }
        ));
    }

    #[test]
    fn tree_with_holes_is_not_a_sequence() {
        let seed = Seed::Tree { array: vec![Some(1), None] };
        assert!(seed.sequence("bubble").is_err());

        let full = Seed::Tree { array: vec![Some(1), Some(2)] };
        assert_eq!(full.sequence("bubble").unwrap(), vec![1, 2]);
    }

    #[test]
    fn oversized_sequence_is_rejected() {
        let seed = Seed::Sequence(vec![1; MAX_SEQUENCE_LEN + 1]);
        assert!(matches!(seed.sequence("bubble"), Err(Error::SeedTooLarge { .. })));
    }

    #[test]
    fn raw_sequence_becomes_heap_shaped_graph() {
        let graph = Seed::Sequence(vec![9, 9, 9, 9]).graph("graph-bfs").unwrap();
        assert_eq!(graph.nodes, vec![0, 1, 2, 3]);
        assert_eq!(graph.edges, vec![(0, 1), (0, 2), (1, 3)]);
    }

    #[test]
    fn default_graph_matches_sample() {
        let graph = GraphSeed::default();
        assert_eq!(graph.edges, vec![(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)]);
    }

    #[test]
    fn graph_validation_catches_dangling_edges() {
        let graph = GraphSeed {
            nodes: vec![0, 1],
            edges: vec![(0, 7)],
        };
        assert!(matches!(graph.validate(), Err(Error::InvalidGraph(_))));

        let looped = GraphSeed {
            nodes: vec![0, 1],
            edges: vec![(1, 1)],
        };
        assert!(looped.validate().is_err());
    }

    #[test]
    fn neighbors_are_sorted_and_undirected() {
        let graph = GraphSeed {
            nodes: vec![0, 1, 2, 3],
            edges: vec![(3, 0), (0, 1), (2, 0)],
        };
        assert_eq!(graph.neighbors(0), vec![1, 2, 3]);
        assert_eq!(graph.neighbors(3), vec![0]);
    }

    #[test]
    fn derived_index_is_stable_and_in_range() {
        let values = [4, -7, 12];
        let idx = derive_index(&values);
        assert_eq!(idx, derive_index(&values));
        assert!(idx < values.len());
        assert_eq!(derive_index(&[]), 0);
    }

    #[test]
    fn same_config_same_inputs() {
        let config = SeedConfig::default();
        let a = random_seed(Category::Sorting, &config, &mut config.rng());
        let b = random_seed(Category::Sorting, &config, &mut config.rng());
        assert_eq!(a, b);

        match a {
            Seed::Sequence(values) => {
                assert_eq!(values.len(), 10);
                assert!(values.iter().all(|v| (1..=100).contains(v)));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn random_graphs_are_valid() {
        let mut rng = SeedConfig::default().with_seed(7).rng();
        for size in [1, 3, 6, 20] {
            let graph = random_graph(&mut rng, size);
            assert!((3..=10).contains(&graph.nodes.len()));
            graph.validate().unwrap();
            assert!(graph.edges.iter().all(|&(a, b)| a < b));
        }
    }

    #[test]
    fn tree_category_caps_size() {
        let config = SeedConfig::default().with_size(20);
        let seed = random_seed(Category::Trees, &config, &mut config.rng());
        assert!(seed.tree("bst-impl").unwrap().len() <= 15);
    }
}
