//! Terminal rendering of snapshots.

use std::fmt::Write as _;

use odyssey_trace::{Cell, Highlight, ListKind, Markers, Snapshot, View};

/// Turns a snapshot into something a user can look at.
///
/// Renderers only read the snapshot.
pub trait Render {
    /// Render one snapshot, message included.
    fn render(&self, snapshot: &Snapshot) -> String;
}

/// Plain-text renderer for terminals.
///
/// Linear views print a row of values with a marker row underneath; trees
/// print one line per level; graphs and hash tables print one line per node
/// or bucket. Each highlighted position gets the tag of its most specific
/// highlight.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    /// Print the annotation block under the message
    pub annotations: bool,
}

impl TextRenderer {
    /// A renderer that also prints annotations.
    pub fn new() -> Self {
        Self { annotations: true }
    }
}

/// Single-character tag per highlight, most specific first.
const TAGS: [(Highlight, char); 9] = [
    (Highlight::Found, '!'),
    (Highlight::Swapping, '*'),
    (Highlight::Comparing, '?'),
    (Highlight::Current, '>'),
    (Highlight::Pointers, '^'),
    (Highlight::Window, '='),
    (Highlight::Frontier, '+'),
    (Highlight::Visited, '.'),
    (Highlight::Sorted, '#'),
];

fn tag(snapshot: &Snapshot, position: usize) -> Option<char> {
    TAGS.iter()
        .find(|(kind, _)| snapshot.highlighted(*kind).contains(&position))
        .map(|&(_, c)| c)
}

fn tagged(value: impl std::fmt::Display, tag: Option<char>) -> String {
    match tag {
        Some(c) => format!("{value}{c}"),
        None => value.to_string(),
    }
}

/// Values on one row, tags on the row below, columns aligned.
fn row(out: &mut String, cells: &[String], tags: &[Option<char>], separator: &str) {
    let widths: Vec<usize> = cells.iter().map(|c| c.chars().count().max(1)).collect();
    let values: Vec<String> = cells
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:>w$}"))
        .collect();
    let _ = writeln!(out, "{}", values.join(separator));

    if tags.iter().any(Option::is_some) {
        let marks: Vec<String> = tags
            .iter()
            .zip(&widths)
            .map(|(t, &w)| format!("{:>w$}", t.map(String::from).unwrap_or_default()))
            .collect();
        let _ = writeln!(out, "{}", marks.join(" ".repeat(separator.chars().count()).as_str()).trim_end());
    }
}

fn render_array(out: &mut String, snapshot: &Snapshot, cells: &[Cell]) {
    if cells.is_empty() {
        out.push_str("(empty)\n");
        return;
    }
    let values: Vec<String> = cells.iter().map(Cell::to_string).collect();
    let tags: Vec<Option<char>> = (0..cells.len()).map(|i| tag(snapshot, i)).collect();
    row(out, &values, &tags, " ");
}

fn render_tree(out: &mut String, snapshot: &Snapshot, nodes: &[Option<i64>]) {
    if nodes.iter().all(Option::is_none) {
        out.push_str("(empty tree)\n");
        return;
    }
    let mut start = 0;
    let mut width = 1;
    let mut level = 0;
    while start < nodes.len() {
        let end = (start + width).min(nodes.len());
        let line: Vec<String> = (start..end)
            .map(|i| match nodes[i] {
                Some(v) => tagged(v, tag(snapshot, i)),
                None => "_".to_string(),
            })
            .collect();
        let _ = writeln!(out, "L{level}: {}", line.join(" "));
        start = end;
        width *= 2;
        level += 1;
    }
}

fn render_graph(
    out: &mut String,
    snapshot: &Snapshot,
    nodes: &[usize],
    edges: &[(usize, usize)],
    labels: &[Cell],
) {
    for (position, node) in nodes.iter().enumerate() {
        let mut neighbors: Vec<usize> = edges
            .iter()
            .filter_map(|&(a, b)| match (a == *node, b == *node) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect();
        neighbors.sort_unstable();
        let adjacency = neighbors
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let label = labels
            .get(position)
            .map(|l| format!(" [{l}]"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{}{label} -> {{{adjacency}}}",
            tagged(node, tag(snapshot, position))
        );
    }
}

fn marker_names(markers: &Markers) -> Vec<String> {
    [
        ("head", markers.head),
        ("top", markers.top),
        ("front", markers.front),
        ("rear", markers.rear),
        ("current", markers.current),
        ("prev", markers.prev),
        ("next", markers.next),
    ]
    .into_iter()
    .filter_map(|(name, at)| at.map(|i| format!("{name}={i}")))
    .collect()
}

fn render_list(out: &mut String, snapshot: &Snapshot, list: ListKind, items: &[Cell], markers: &Markers) {
    let values: Vec<String> = items.iter().map(Cell::to_string).collect();
    let tags: Vec<Option<char>> = (0..items.len()).map(|i| tag(snapshot, i)).collect();
    let (open, separator, close) = match list {
        ListKind::Stack => ("bottom |", " ", "| top"),
        ListKind::Queue => ("front |", " ", "| rear"),
        ListKind::Singly => ("", " -> ", "-> null"),
        ListKind::Doubly => ("null <-", " <-> ", "-> null"),
    };
    if items.is_empty() {
        let _ = writeln!(out, "{open} (empty) {close}");
    } else {
        if !open.is_empty() {
            let _ = writeln!(out, "{open}");
        }
        row(out, &values, &tags, separator);
        let _ = writeln!(out, "{close}");
    }
    let names = marker_names(markers);
    if !names.is_empty() {
        let _ = writeln!(out, "({})", names.join(", "));
    }
}

fn render_buckets(out: &mut String, snapshot: &Snapshot, buckets: &[Vec<i64>]) {
    for (index, chain) in buckets.iter().enumerate() {
        let chain = if chain.is_empty() {
            "-".to_string()
        } else {
            chain.iter().map(i64::to_string).collect::<Vec<_>>().join(" -> ")
        };
        let _ = writeln!(out, "{}: {chain}", tagged(index, tag(snapshot, index)));
    }
}

impl Render for TextRenderer {
    fn render(&self, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        match &snapshot.view {
            View::Array { cells } => render_array(&mut out, snapshot, cells),
            View::Tree { nodes } => render_tree(&mut out, snapshot, nodes),
            View::Graph { nodes, edges, labels } => render_graph(&mut out, snapshot, nodes, edges, labels),
            View::List { list, items, markers } => render_list(&mut out, snapshot, *list, items, markers),
            View::Buckets { buckets } => render_buckets(&mut out, snapshot, buckets),
        }
        out.push_str(&snapshot.message);
        out.push('\n');
        if self.annotations && !snapshot.annotations.is_empty() {
            let pairs: Vec<String> = snapshot
                .annotations
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            let _ = writeln!(out, "  {}", pairs.join("  "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odyssey_trace::{Registry, Seed};

    #[test]
    fn array_rows_carry_tags() {
        let snapshot = Snapshot::new(View::array(&[5, 3, 8]), "Comparing 5 and 3")
            .mark(Highlight::Comparing, [0, 1]);
        let text = TextRenderer::new().render(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "5 3 8");
        assert_eq!(lines[1], "? ?");
        assert_eq!(lines[2], "Comparing 5 and 3");
    }

    #[test]
    fn found_wins_over_comparing() {
        let snapshot = Snapshot::new(View::array(&[10]), "Found")
            .mark(Highlight::Comparing, [0])
            .mark(Highlight::Found, [0]);
        let text = TextRenderer::new().render(&snapshot);
        assert_eq!(text.lines().nth(1), Some("!"));
    }

    #[test]
    fn tree_prints_levels() {
        let snapshot = Snapshot::new(View::tree(vec![Some(1), Some(2), None, Some(4)]), "tree")
            .mark(Highlight::Current, [1]);
        let text = TextRenderer::new().render(&snapshot);
        assert!(text.starts_with("L0: 1\nL1: 2> _\nL2: 4\n"));
    }

    #[test]
    fn graph_lists_neighbors() {
        let snapshot = Snapshot::new(View::graph(vec![0, 1, 2], vec![(0, 1), (0, 2)]), "graph")
            .mark(Highlight::Visited, [0]);
        let text = TextRenderer::new().render(&snapshot);
        assert!(text.contains("0. -> {1, 2}"));
        assert!(text.contains("2 -> {0}"));
    }

    #[test]
    fn buckets_show_chains() {
        let snapshot = Snapshot::new(View::buckets(vec![vec![7, 14], vec![]]), "table");
        let text = TextRenderer::new().render(&snapshot);
        assert!(text.contains("0: 7 -> 14"));
        assert!(text.contains("1: -"));
    }

    #[test]
    fn stack_shows_markers() {
        let snapshot = Snapshot::new(
            View::list(ListKind::Stack, &[1, 2], Markers::stack_top(2)),
            "push",
        );
        let text = TextRenderer::new().render(&snapshot);
        assert!(text.contains("bottom |"));
        assert!(text.contains("(top=1)"));
    }

    #[test]
    fn annotations_can_be_hidden() {
        let snapshot = Snapshot::new(View::array(&[1]), "sum").annotate("sum", 1i64);
        assert!(TextRenderer::new().render(&snapshot).contains("sum=1"));
        assert!(!TextRenderer::default().render(&snapshot).contains("sum=1"));
    }

    #[test]
    fn every_generator_renders() {
        let registry = Registry::standard();
        let seed = Seed::from(vec![34, 7, 23, 32, 5, 62]);
        let renderer = TextRenderer::new();
        for id in registry.ids() {
            let trace = registry.generate(id, &seed).unwrap();
            for step in trace.iter() {
                assert!(renderer.render(step).contains(&step.message), "{id}");
            }
        }
    }
}
