//! Algorithm catalog: categories, descriptors and the visualization selector.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Algorithm family. Determines both the seed shape and the rendering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sorting,
    Searching,
    Arrays,
    Trees,
    Graphs,
    LinkedLists,
    Stacks,
    Queues,
    Hashing,
    Strings,
    DynamicProgramming,
    Greedy,
    BitManipulation,
    Advanced,
    Backtracking,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 15] = [
        Category::Sorting,
        Category::Searching,
        Category::Arrays,
        Category::Trees,
        Category::Graphs,
        Category::LinkedLists,
        Category::Stacks,
        Category::Queues,
        Category::Hashing,
        Category::Strings,
        Category::DynamicProgramming,
        Category::Greedy,
        Category::BitManipulation,
        Category::Advanced,
        Category::Backtracking,
    ];

    /// Kebab-case name used by the content API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sorting => "sorting",
            Category::Searching => "searching",
            Category::Arrays => "arrays",
            Category::Trees => "trees",
            Category::Graphs => "graphs",
            Category::LinkedLists => "linked-lists",
            Category::Stacks => "stacks",
            Category::Queues => "queues",
            Category::Hashing => "hashing",
            Category::Strings => "strings",
            Category::DynamicProgramming => "dynamic-programming",
            Category::Greedy => "greedy",
            Category::BitManipulation => "bit-manipulation",
            Category::Advanced => "advanced",
            Category::Backtracking => "backtracking",
        }
    }

    /// How snapshots of this category are rendered.
    pub fn visualization(&self) -> VisualizationType {
        match self {
            Category::Trees => VisualizationType::Tree,
            Category::Graphs => VisualizationType::Graph,
            Category::LinkedLists => VisualizationType::LinkedList,
            Category::Stacks => VisualizationType::Stack,
            Category::Queues => VisualizationType::Queue,
            Category::Hashing => VisualizationType::HashTable,
            _ => VisualizationType::Array,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Rendering strategy tag handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Array,
    Tree,
    Graph,
    #[serde(rename = "linkedlist")]
    LinkedList,
    Stack,
    Queue,
    #[serde(rename = "hashtable")]
    HashTable,
}

impl VisualizationType {
    /// Derive the tag purely from a category name; unknown names render as arrays.
    pub fn for_category(category: &str) -> Self {
        category
            .parse::<Category>()
            .map(|c| c.visualization())
            .unwrap_or(VisualizationType::Array)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationType::Array => "array",
            VisualizationType::Tree => "tree",
            VisualizationType::Graph => "graph",
            VisualizationType::LinkedList => "linkedlist",
            VisualizationType::Stack => "stack",
            VisualizationType::Queue => "queue",
            VisualizationType::HashTable => "hashtable",
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asymptotic cost of an algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}

impl Complexity {
    pub fn new(time: &str, space: &str) -> Self {
        Self {
            time: time.to_string(),
            space: space.to_string(),
        }
    }
}

/// One entry of the content API's algorithm list.
///
/// `category` stays a plain string so descriptors for families this crate
/// does not know still load; use [`AlgorithmDescriptor::visualization`] to
/// pick a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub description: String,
    /// Reference implementations keyed by language name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub code: BTreeMap<String, String>,
}

impl AlgorithmDescriptor {
    /// Renderer tag for this descriptor's category.
    pub fn visualization(&self) -> VisualizationType {
        VisualizationType::for_category(&self.category)
    }
}

/// A queryable list of algorithm descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    algorithms: Vec<AlgorithmDescriptor>,
}

impl Catalog {
    pub fn new(algorithms: Vec<AlgorithmDescriptor>) -> Self {
        Self { algorithms }
    }

    /// Parse the content API's JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Descriptor with the given id.
    pub fn get(&self, id: &str) -> Option<&AlgorithmDescriptor> {
        self.algorithms.iter().find(|a| a.id == id)
    }

    /// Descriptors whose category matches `category` exactly.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a AlgorithmDescriptor> {
        self.algorithms.iter().filter(move |a| a.category == category)
    }

    /// Distinct category names in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for algorithm in &self.algorithms {
            if !seen.contains(&algorithm.category.as_str()) {
                seen.push(&algorithm.category);
            }
        }
        seen
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmDescriptor> {
        self.algorithms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert!(matches!("sortin".parse::<Category>(), Err(Error::UnknownCategory(_))));
    }

    #[test]
    fn visualization_selector() {
        assert_eq!(VisualizationType::for_category("trees"), VisualizationType::Tree);
        assert_eq!(VisualizationType::for_category("linked-lists"), VisualizationType::LinkedList);
        assert_eq!(VisualizationType::for_category("hashing"), VisualizationType::HashTable);
        assert_eq!(VisualizationType::for_category("backtracking"), VisualizationType::Array);
        assert_eq!(VisualizationType::for_category("quantum"), VisualizationType::Array);
        assert_eq!(
            serde_json::to_string(&VisualizationType::HashTable).unwrap(),
            "\"hashtable\""
        );
    }

    #[test]
    fn catalog_from_content_api_json() {
        let json = r#"[
            {"id": "bubble", "name": "Bubble Sort", "category": "sorting",
             "complexity": {"time": "O(n^2)", "space": "O(1)"},
             "description": "Repeatedly swaps adjacent elements.",
             "code": {"python": "def bubble(a): ..."}},
            {"id": "graph-bfs", "name": "BFS", "category": "graphs",
             "complexity": {"time": "O(V+E)", "space": "O(V)"}, "description": ""},
            {"id": "mystery", "name": "Mystery", "category": "unlisted"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("bubble").unwrap().code["python"], "def bubble(a): ...");
        assert_eq!(catalog.in_category("graphs").count(), 1);
        assert_eq!(catalog.categories(), vec!["sorting", "graphs", "unlisted"]);
        assert_eq!(catalog.get("mystery").unwrap().visualization(), VisualizationType::Array);
        assert!(catalog.get("missing").is_none());
    }
}
