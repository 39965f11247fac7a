//! Graph traversals and orderings.
//!
//! Highlight indices are positions in the graph's node list, not node ids.
//! Neighbors are always explored in ascending id order so traversals are
//! reproducible.

use std::collections::VecDeque;

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::{GraphSeed, Seed};
use crate::snapshot::{join, Cell, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

use super::as_value;

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Graphs;
    registry.insert(Entry::new("graph-bfs", "Breadth-First Search", c, ("O(V + E)", "O(V)"), bfs));
    registry.insert(Entry::new("graph-dfs", "Depth-First Search", c, ("O(V + E)", "O(V)"), dfs));
    registry.insert(Entry::new("dijkstra", "Dijkstra's Algorithm", c, ("O(V²)", "O(V)"), dijkstra));
    registry.insert(Entry::new(
        "topological-sort",
        "Topological Sort",
        c,
        ("O(V + E)", "O(V)"),
        topological_sort,
    ));
}

/// Read-only view of a validated graph seed.
struct Graph {
    seed: GraphSeed,
}

impl Graph {
    fn new(seed: GraphSeed) -> Self {
        Self { seed }
    }

    fn view(&self) -> View {
        View::graph(self.seed.nodes.clone(), self.seed.edges.clone())
    }

    fn labelled(&self, labels: Vec<Cell>) -> View {
        View::Graph {
            nodes: self.seed.nodes.clone(),
            edges: self.seed.edges.clone(),
            labels,
        }
    }

    fn start(&self) -> Option<usize> {
        self.seed.nodes.first().copied()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.seed.neighbors(node)
    }

    /// Node-list positions of `nodes`, in the given order.
    fn positions<'a>(&'a self, nodes: impl IntoIterator<Item = &'a usize> + 'a) -> Vec<usize> {
        nodes
            .into_iter()
            .filter_map(|&n| self.seed.position(n))
            .collect()
    }

    fn at(&self, node: usize) -> Vec<usize> {
        self.seed.position(node).into_iter().collect()
    }

    fn empty_trace(&self, mut rec: Recorder) -> Result<Trace> {
        rec.emit(
            Snapshot::new(self.view(), "Graph is empty: nothing to traverse")
                .mark(Highlight::Found, [])
                .at_line(1),
        );
        rec.finish()
    }
}

fn bfs(seed: &Seed) -> Result<Trace> {
    let graph = Graph::new(seed.graph("graph-bfs")?);
    let mut rec = Recorder::new("graph-bfs");
    let Some(start) = graph.start() else {
        return graph.empty_trace(rec);
    };

    let mut queue = VecDeque::from([start]);
    let mut visited = vec![start];
    let mut order = Vec::new();

    rec.emit(
        Snapshot::new(graph.view(), format!("BFS Start: Start at node {start}"))
            .mark(Highlight::Visited, graph.positions(&visited))
            .mark(Highlight::Frontier, graph.positions(&queue))
            .mark(Highlight::Current, graph.at(start))
            .at_line(1),
    );

    while let Some(current) = queue.pop_front() {
        order.push(current);
        rec.emit(
            Snapshot::new(graph.view(), format!("Visit node {current}"))
                .mark(Highlight::Visited, graph.positions(&visited))
                .mark(Highlight::Frontier, graph.positions(&queue))
                .mark(Highlight::Current, graph.at(current))
                .at_line(2),
        );

        for neighbor in graph.neighbors(current) {
            if visited.contains(&neighbor) {
                continue;
            }
            visited.push(neighbor);
            queue.push_back(neighbor);
            rec.emit(
                Snapshot::new(
                    graph.view(),
                    format!("Node {current} has unvisited neighbor {neighbor}. Add to queue."),
                )
                .mark(Highlight::Visited, graph.positions(&visited))
                .mark(Highlight::Frontier, graph.positions(&queue))
                .mark(Highlight::Current, graph.at(neighbor))
                .at_line(3),
            );
        }
    }

    rec.emit(
        Snapshot::new(
            graph.view(),
            format!("BFS Complete! Traversal: [{}]", join(&order, " → ")),
        )
        .mark(Highlight::Visited, graph.positions(&visited))
        .mark(Highlight::Frontier, [])
        .annotate("order", order.iter().map(|&n| as_value(n)).collect::<Vec<_>>())
        .at_line(5),
    );
    rec.finish()
}

fn dfs(seed: &Seed) -> Result<Trace> {
    let graph = Graph::new(seed.graph("graph-dfs")?);
    let mut rec = Recorder::new("graph-dfs");
    let Some(start) = graph.start() else {
        return graph.empty_trace(rec);
    };
    let mut visited = Vec::new();
    let mut path = Vec::new();

    rec.emit(
        Snapshot::new(graph.view(), format!("DFS Start: Start at node {start}"))
            .mark(Highlight::Visited, [])
            .mark(Highlight::Current, graph.at(start))
            .at_line(1),
    );

    visit(&graph, start, &mut visited, &mut path, &mut rec);

    rec.emit(
        Snapshot::new(
            graph.view(),
            format!("DFS Complete! Traversal: [{}]", join(&visited, " → ")),
        )
        .mark(Highlight::Visited, graph.positions(&visited))
        .annotate("order", visited.iter().map(|&n| as_value(n)).collect::<Vec<_>>())
        .at_line(5),
    );
    rec.finish()
}

/// Recursive step of DFS. `path` is the recursion stack, shown as the frontier.
fn visit(
    graph: &Graph,
    node: usize,
    visited: &mut Vec<usize>,
    path: &mut Vec<usize>,
    rec: &mut Recorder,
) {
    visited.push(node);
    path.push(node);
    rec.emit(
        Snapshot::new(graph.view(), format!("Visit node {node}"))
            .mark(Highlight::Visited, graph.positions(visited.iter()))
            .mark(Highlight::Frontier, graph.positions(path.iter()))
            .mark(Highlight::Current, graph.at(node))
            .at_line(2),
    );

    for neighbor in graph.neighbors(node) {
        if visited.contains(&neighbor) {
            continue;
        }
        rec.emit(
            Snapshot::new(graph.view(), format!("Explore neighbor {neighbor} of {node}"))
                .mark(Highlight::Visited, graph.positions(visited.iter()))
                .mark(Highlight::Frontier, graph.positions(path.iter()))
                .mark(Highlight::Current, graph.at(neighbor))
                .at_line(3),
        );
        visit(graph, neighbor, visited, path, rec);
    }
    path.pop();
}

fn distance_labels(dist: &[Option<i64>]) -> Vec<Cell> {
    dist.iter().map(|d| d.map_or(Cell::Infinite, Cell::Int)).collect()
}

fn show_distances(dist: &[Option<i64>]) -> String {
    join(&distance_labels(dist), ", ")
}

/// Unit-weight shortest paths from the first node. Distances are the node labels.
fn dijkstra(seed: &Seed) -> Result<Trace> {
    let graph = Graph::new(seed.graph("dijkstra")?);
    let mut rec = Recorder::new("dijkstra");
    let Some(source) = graph.start() else {
        return graph.empty_trace(rec);
    };
    let nodes = &graph.seed.nodes;
    let mut dist: Vec<Option<i64>> = vec![None; nodes.len()];
    dist[0] = Some(0);
    let mut done = vec![false; nodes.len()];

    rec.emit(
        Snapshot::new(
            graph.labelled(distance_labels(&dist)),
            format!(
                "Dijkstra from node {source}. Initial distances: [{}]",
                show_distances(&dist)
            ),
        )
        .mark(Highlight::Current, [0])
        .at_line(1),
    );

    loop {
        // Closest unfinished node; ties go to the earlier position.
        let next = (0..nodes.len())
            .filter(|&i| !done[i])
            .filter_map(|i| dist[i].map(|d| (d, i)))
            .min();
        let Some((d, u)) = next else {
            break;
        };
        done[u] = true;

        let mut updated = Vec::new();
        for neighbor in graph.neighbors(nodes[u]) {
            let Some(v) = graph.seed.position(neighbor) else {
                continue;
            };
            if done[v] {
                continue;
            }
            let candidate = d + 1;
            if dist[v].map_or(true, |current| candidate < current) {
                dist[v] = Some(candidate);
                updated.push(v);
            }
        }

        let finished: Vec<usize> = (0..nodes.len()).filter(|&i| done[i]).collect();
        rec.emit(
            Snapshot::new(
                graph.labelled(distance_labels(&dist)),
                format!(
                    "Process node {}. Update neighbors. Dist: [{}]",
                    nodes[u],
                    show_distances(&dist)
                ),
            )
            .mark(Highlight::Visited, finished)
            .mark(Highlight::Current, [u])
            .mark(Highlight::Swapping, updated)
            .at_line(4),
        );
    }

    let reached: Vec<usize> = (0..nodes.len()).filter(|&i| dist[i].is_some()).collect();
    rec.emit(
        Snapshot::new(
            graph.labelled(distance_labels(&dist)),
            format!("Dijkstra Complete! Shortest distances from {source}: [{}]", show_distances(&dist)),
        )
        .mark(Highlight::Visited, reached)
        .at_line(7),
    );
    rec.finish()
}

/// Kahn's algorithm, reading each edge `(a, b)` as `a → b`.
/// In-degrees are the node labels.
fn topological_sort(seed: &Seed) -> Result<Trace> {
    let graph = Graph::new(seed.graph("topological-sort")?);
    let nodes = &graph.seed.nodes;
    let mut rec = Recorder::new("topological-sort");

    let mut indegree = vec![0i64; nodes.len()];
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for &(from, to) in &graph.seed.edges {
        if let (Some(a), Some(b)) = (graph.seed.position(from), graph.seed.position(to)) {
            out[a].push(b);
            indegree[b] += 1;
        }
    }
    for targets in &mut out {
        targets.sort_unstable();
        targets.dedup();
    }
    let degree_labels = |indegree: &[i64]| -> Vec<Cell> { indegree.iter().copied().map(Cell::Int).collect() };

    rec.emit(
        Snapshot::new(
            graph.labelled(degree_labels(&indegree)),
            "Topological Sort: order tasks with dependencies (labels show in-degree)",
        )
        .at_line(1),
    );

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    rec.emit(
        Snapshot::new(
            graph.labelled(degree_labels(&indegree)),
            format!(
                "Nodes with no dependencies: [{}]",
                join(&queue.iter().map(|&i| nodes[i]).collect::<Vec<_>>(), ", ")
            ),
        )
        .mark(Highlight::Frontier, queue.iter().copied())
        .at_line(2),
    );

    let mut order: Vec<usize> = Vec::new();
    while let Some(u) = queue.pop_front() {
        order.push(u);
        let mut released = Vec::new();
        for &v in &out[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
                released.push(v);
            }
        }
        rec.emit(
            Snapshot::new(
                graph.labelled(degree_labels(&indegree)),
                format!(
                    "Take node {}, remove its outgoing edges. Order: [{}]",
                    nodes[u],
                    join(&order.iter().map(|&i| nodes[i]).collect::<Vec<_>>(), " → ")
                ),
            )
            .mark(Highlight::Visited, order.iter().copied())
            .mark(Highlight::Frontier, queue.iter().copied())
            .mark(Highlight::Current, [u])
            .mark(Highlight::Swapping, released)
            .at_line(4),
        );
    }

    let ids: Vec<i64> = order.iter().map(|&i| as_value(nodes[i])).collect();
    let snap = if order.len() == nodes.len() {
        Snapshot::new(
            graph.labelled(degree_labels(&indegree)),
            format!("Topological Order: [{}]", join(&ids, " → ")),
        )
        .mark(Highlight::Found, order.iter().copied())
    } else {
        Snapshot::new(
            graph.labelled(degree_labels(&indegree)),
            format!("Cycle detected: only {} of {} nodes ordered", order.len(), nodes.len()),
        )
        .mark(Highlight::Found, [])
    };
    rec.emit(snap.annotate("order", ids).at_line(7));
    rec.finish()
}
