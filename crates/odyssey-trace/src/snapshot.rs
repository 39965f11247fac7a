//! Snapshot model: one immutable, self-contained capture of algorithm state.
//!
//! A snapshot carries exactly one primary [`View`], any number of named
//! [`Highlights`], a free-form annotation block and a narrative message.
//! Highlights are presentation-only; nothing downstream branches on them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One slot of a linear view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CellRepr", into = "CellRepr")]
pub enum Cell {
    /// An unoccupied slot (spare capacity, removed element).
    Empty,
    /// An integer value.
    Int(i64),
    /// An unreachable / not-yet-computed value in a DP table.
    Infinite,
    /// A character of a string or expression.
    Char(char),
}

impl Cell {
    /// The integer value, if this cell holds one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<char> for Cell {
    fn from(value: char) -> Self {
        Cell::Char(value)
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cell::Empty, Cell::Int)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "_"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Infinite => write!(f, "∞"),
            Cell::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Wire form of a cell: a number, a one-character string, `"∞"` or `null`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Int(i64),
    Text(String),
    Empty(()),
}

impl From<Cell> for CellRepr {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellRepr::Empty(()),
            Cell::Int(v) => CellRepr::Int(v),
            Cell::Infinite => CellRepr::Text("∞".to_string()),
            Cell::Char(c) => CellRepr::Text(c.to_string()),
        }
    }
}

impl TryFrom<CellRepr> for Cell {
    type Error = String;

    fn try_from(repr: CellRepr) -> Result<Self, Self::Error> {
        match repr {
            CellRepr::Empty(()) => Ok(Cell::Empty),
            CellRepr::Int(v) => Ok(Cell::Int(v)),
            CellRepr::Text(text) if text == "∞" => Ok(Cell::Infinite),
            CellRepr::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Cell::Char(c)),
                    _ => Err(format!("cell text must be one character, got {text:?}")),
                }
            }
        }
    }
}

/// Flavor of a list-like view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// LIFO, index 0 is the bottom.
    Stack,
    /// FIFO, index 0 is the front unless `front` says otherwise.
    Queue,
    /// Singly linked list in traversal order.
    Singly,
    /// Doubly linked list in traversal order.
    Doubly,
}

/// Explicit head/cursor markers of a list-like view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
}

impl Markers {
    /// Markers for a stack whose top is the last of `len` items.
    pub fn stack_top(len: usize) -> Self {
        Self {
            top: len.checked_sub(1),
            ..Self::default()
        }
    }

    /// Markers for a queue spanning `len` items from index 0.
    pub fn queue_ends(len: usize) -> Self {
        Self {
            front: (len > 0).then_some(0),
            rear: len.checked_sub(1),
            ..Self::default()
        }
    }

    /// Markers with only a head pointer.
    pub fn head(head: usize) -> Self {
        Self {
            head: Some(head),
            ..Self::default()
        }
    }
}

/// Tag of a [`View`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Array,
    Tree,
    Graph,
    List,
    Buckets,
}

/// The primary data view of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Linear sequence of values.
    Array { cells: Vec<Cell> },
    /// Complete binary tree; children of `i` live at `2i+1` and `2i+2`.
    Tree { nodes: Vec<Option<i64>> },
    /// Node-id set and undirected edge list, with optional per-node labels.
    Graph {
        nodes: Vec<usize>,
        edges: Vec<(usize, usize)>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        labels: Vec<Cell>,
    },
    /// Stack, queue or linked list with explicit markers.
    List {
        list: ListKind,
        items: Vec<Cell>,
        #[serde(default)]
        markers: Markers,
    },
    /// Hash table: ordered buckets, each an ordered chain of keys.
    Buckets { buckets: Vec<Vec<i64>> },
}

impl View {
    /// Array view of integer values.
    pub fn array(values: &[i64]) -> Self {
        View::Array {
            cells: values.iter().copied().map(Cell::Int).collect(),
        }
    }

    /// Array view of arbitrary cells.
    pub fn cells(cells: Vec<Cell>) -> Self {
        View::Array { cells }
    }

    /// Tree view over an array-encoded complete binary tree.
    pub fn tree(nodes: Vec<Option<i64>>) -> Self {
        View::Tree { nodes }
    }

    /// Graph view without labels.
    pub fn graph(nodes: Vec<usize>, edges: Vec<(usize, usize)>) -> Self {
        View::Graph {
            nodes,
            edges,
            labels: Vec::new(),
        }
    }

    /// List-like view of integer values.
    pub fn list(list: ListKind, values: &[i64], markers: Markers) -> Self {
        View::List {
            list,
            items: values.iter().copied().map(Cell::Int).collect(),
            markers,
        }
    }

    /// Bucketed hash table view.
    pub fn buckets(buckets: Vec<Vec<i64>>) -> Self {
        View::Buckets { buckets }
    }

    /// The variant tag.
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Array { .. } => ViewKind::Array,
            View::Tree { .. } => ViewKind::Tree,
            View::Graph { .. } => ViewKind::Graph,
            View::List { .. } => ViewKind::List,
            View::Buckets { .. } => ViewKind::Buckets,
        }
    }

    /// Number of addressable positions (cells, tree slots, nodes, items or buckets).
    pub fn len(&self) -> usize {
        match self {
            View::Array { cells } => cells.len(),
            View::Tree { nodes } => nodes.len(),
            View::Graph { nodes, .. } => nodes.len(),
            View::List { items, .. } => items.len(),
            View::Buckets { buckets } => buckets.len(),
        }
    }

    /// Whether the view has no addressable positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer contents of an array or list view, if every cell is an integer.
    pub fn int_values(&self) -> Option<Vec<i64>> {
        match self {
            View::Array { cells } | View::List { items: cells, .. } => {
                cells.iter().map(Cell::as_int).collect()
            }
            _ => None,
        }
    }
}

/// Named highlight sets with fixed presentation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Positions being compared.
    Comparing,
    /// Positions just written, swapped or removed.
    Swapping,
    /// Positions in final sorted order.
    Sorted,
    /// Positions of a hit or of a completed result; present-but-empty means "not found".
    Found,
    /// Nodes already visited by a traversal.
    Visited,
    /// Positions inside a sliding window or active range.
    Window,
    /// Positions held by named pointers.
    Pointers,
    /// Ordered traversal frontier (BFS queue, DFS stack).
    Frontier,
    /// The node or slot being processed.
    Current,
}

/// The highlight block of a snapshot.
///
/// A set that was never marked is absent, which is distinct from a set that
/// was marked empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Highlights(BTreeMap<Highlight, Vec<usize>>);

impl Highlights {
    /// Set (or replace) a highlight set.
    pub fn insert(&mut self, kind: Highlight, indices: Vec<usize>) {
        self.0.insert(kind, indices);
    }

    /// The set for `kind`, if it was marked.
    pub fn get(&self, kind: Highlight) -> Option<&[usize]> {
        self.0.get(&kind).map(Vec::as_slice)
    }

    /// The set for `kind`, empty if it was never marked.
    pub fn indices(&self, kind: Highlight) -> &[usize] {
        self.get(kind).unwrap_or(&[])
    }

    /// Whether `kind` was marked, even if empty.
    pub fn contains(&self, kind: Highlight) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate marked sets in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Highlight, &[usize])> {
        self.0.iter().map(|(kind, set)| (*kind, set.as_slice()))
    }
}

/// One annotation value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
    List(Vec<i64>),
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<Vec<i64>> for Scalar {
    fn from(value: Vec<i64>) -> Self {
        Scalar::List(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Text(text) => write!(f, "{text}"),
            Scalar::List(values) => write!(f, "{}", join(values, ", ")),
        }
    }
}

/// A point-in-time capture of algorithm state plus its narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub view: View,
    #[serde(default, skip_serializing_if = "Highlights::is_empty")]
    pub highlights: Highlights,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Scalar>,
    pub message: String,
    /// Line of the reference pseudo-code this step corresponds to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Snapshot {
    pub fn new(view: View, message: impl Into<String>) -> Self {
        Self {
            view,
            highlights: Highlights::default(),
            annotations: BTreeMap::new(),
            message: message.into(),
            line: None,
        }
    }

    /// Mark a highlight set.
    #[must_use]
    pub fn mark(mut self, kind: Highlight, indices: impl IntoIterator<Item = usize>) -> Self {
        self.highlights.insert(kind, indices.into_iter().collect());
        self
    }

    /// Attach an annotation field.
    #[must_use]
    pub fn annotate(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.annotations.insert(name.to_string(), value.into());
        self
    }

    /// Attach the pseudo-code line marker.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// The indices of a highlight set, empty if unmarked.
    pub fn highlighted(&self, kind: Highlight) -> &[usize] {
        self.highlights.indices(kind)
    }

    pub fn annotation(&self, name: &str) -> Option<&Scalar> {
        self.annotations.get(name)
    }
}

/// Join displayable values with a separator.
pub(crate) fn join<T: fmt::Display>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}
