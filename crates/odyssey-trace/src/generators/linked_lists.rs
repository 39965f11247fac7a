//! Singly and doubly linked lists.
//!
//! Views list the nodes in traversal order from the head, so index 0 is
//! always the head node unless a marker says otherwise.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Highlight, ListKind, Markers, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::LinkedLists;
    registry.insert(Entry::new("singly-linked-list", "Singly Linked List", c, ("O(n)", "O(n)"), singly_build));
    registry.insert(Entry::new(
        "singly-linked-list-insert-head",
        "Singly Linked List: Insert at Head",
        c,
        ("O(1)", "O(1)"),
        singly_insert_head,
    ));
    registry.insert(Entry::new(
        "singly-linked-list-insert-position",
        "Singly Linked List: Insert at Position",
        c,
        ("O(n)", "O(1)"),
        singly_insert_position,
    ));
    registry.insert(Entry::new("reverse-linked-list", "Reverse Linked List", c, ("O(n)", "O(1)"), reverse));
    registry.insert(Entry::new("detect-cycle", "Detect Cycle (Floyd)", c, ("O(n)", "O(1)"), detect_cycle));
    registry.insert(Entry::new("doubly-linked-list", "Doubly Linked List", c, ("O(n)", "O(n)"), doubly_build));
    registry.insert(Entry::new(
        "doubly-linked-list-insert-head",
        "Doubly Linked List: Insert at Head",
        c,
        ("O(1)", "O(1)"),
        doubly_insert_head,
    ));
    registry.insert(Entry::new(
        "doubly-linked-list-insert-position",
        "Doubly Linked List: Insert at Position",
        c,
        ("O(n)", "O(1)"),
        doubly_insert_position,
    ));
    registry.insert(Entry::new(
        "doubly-reverse-linked-list",
        "Reverse Doubly Linked List",
        c,
        ("O(n)", "O(1)"),
        doubly_reverse,
    ));
}

fn arrow(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Doubly => " ⇄ ",
        _ => " → ",
    }
}

/// `a → b → c → null`.
fn render_chain(kind: ListKind, values: &[i64]) -> String {
    if values.is_empty() {
        return "null".to_string();
    }
    format!("{}{}null", join(values, arrow(kind)), arrow(kind))
}

fn view(kind: ListKind, values: &[i64], markers: Markers) -> View {
    View::list(kind, values, markers)
}

fn headed(kind: ListKind, values: &[i64]) -> View {
    let markers = if values.is_empty() {
        Markers::default()
    } else {
        Markers::head(0)
    };
    view(kind, values, markers)
}

fn build(seed: &Seed, kind: ListKind, algorithm: &'static str, limit: usize) -> Result<Trace> {
    let mut elements = seed.sequence(algorithm)?;
    elements.truncate(limit);
    let mut nodes = Vec::with_capacity(elements.len());
    let mut rec = Recorder::new(algorithm);

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Building list from {} elements", elements.len()),
        )
        .at_line(1),
    );

    for value in elements {
        nodes.push(value);
        rec.emit(
            Snapshot::new(
                headed(kind, &nodes),
                format!("Insert {value} at tail. List: {}", render_chain(kind, &nodes)),
            )
            .mark(Highlight::Swapping, [nodes.len() - 1])
            .at_line(3),
        );
    }

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Final list: {}", render_chain(kind, &nodes)),
        )
        .mark(Highlight::Found, 0..nodes.len())
        .at_line(5),
    );
    rec.finish()
}

fn singly_build(seed: &Seed) -> Result<Trace> {
    build(seed, ListKind::Singly, "singly-linked-list", 6)
}

fn doubly_build(seed: &Seed) -> Result<Trace> {
    build(seed, ListKind::Doubly, "doubly-linked-list", 5)
}

fn insert_head(seed: &Seed, kind: ListKind, algorithm: &'static str, default: i64) -> Result<Trace> {
    let mut nodes = seed.sequence(algorithm)?;
    nodes.truncate(4);
    let value = seed.target().unwrap_or(default);
    let mut rec = Recorder::new(algorithm);

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Initial list: {}", render_chain(kind, &nodes)),
        )
        .at_line(1),
    );

    let old_head = nodes.first().copied();
    nodes.insert(0, value);
    let pointing = match old_head {
        Some(h) => format!("Created new node {value}, pointing its next to current head ({h})"),
        None => format!("Created new node {value}; the list was empty so next is null"),
    };
    // Head still refers to the old first node until it is updated.
    let stale_head = if old_head.is_some() {
        Markers::head(1)
    } else {
        Markers::default()
    };
    rec.emit(
        Snapshot::new(view(kind, &nodes, stale_head), pointing)
            .mark(Highlight::Swapping, [0])
            .at_line(2),
    );

    let relink = match (kind, old_head) {
        (ListKind::Doubly, Some(h)) => format!("Update head to {value} and set {h}.prev to the new node"),
        _ => format!("Update head to point to {value}"),
    };
    rec.emit(
        Snapshot::new(
            view(
                kind,
                &nodes,
                Markers {
                    next: old_head.map(|_| 1),
                    ..Markers::head(0)
                },
            ),
            relink,
        )
        .mark(Highlight::Swapping, [0])
        .at_line(3),
    );

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Insertion complete: {}", render_chain(kind, &nodes)),
        )
        .mark(Highlight::Found, 0..nodes.len())
        .at_line(4),
    );
    rec.finish()
}

fn singly_insert_head(seed: &Seed) -> Result<Trace> {
    insert_head(seed, ListKind::Singly, "singly-linked-list-insert-head", 99)
}

fn doubly_insert_head(seed: &Seed) -> Result<Trace> {
    insert_head(seed, ListKind::Doubly, "doubly-linked-list-insert-head", 88)
}

/// Insert at position 2 (or the tail of a shorter list).
fn insert_position(
    seed: &Seed,
    kind: ListKind,
    algorithm: &'static str,
    default: i64,
) -> Result<Trace> {
    let mut nodes = seed.sequence(algorithm)?;
    nodes.truncate(4);
    let value = seed.target().unwrap_or(default);
    let pos = nodes.len().min(2);
    let mut rec = Recorder::new(algorithm);

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Insert {value} at position {pos}"),
        )
        .at_line(1),
    );

    for i in 0..pos {
        rec.emit(
            Snapshot::new(
                view(
                    kind,
                    &nodes,
                    Markers {
                        current: Some(i),
                        ..Markers::head(0)
                    },
                ),
                format!("Traversing... currently at node {i} (value: {})", nodes[i]),
            )
            .mark(Highlight::Current, [i])
            .at_line(2),
        );
    }

    let before = pos.checked_sub(1).map(|i| nodes[i]);
    let after = nodes.get(pos).copied();
    nodes.insert(pos, value);

    let link = arrow(kind).trim();
    let show = |v: Option<i64>| v.map_or_else(|| "null".to_string(), |v| v.to_string());
    let message = match before {
        Some(_) => format!(
            "Update pointers: {} {link} {value} {link} {}",
            show(before),
            show(after)
        ),
        None => format!("New node {value} becomes the head {link} {}", show(after)),
    };
    rec.emit(
        Snapshot::new(
            view(
                kind,
                &nodes,
                Markers {
                    prev: pos.checked_sub(1),
                    next: after.map(|_| pos + 1),
                    ..Markers::head(0)
                },
            ),
            message,
        )
        .mark(Highlight::Swapping, [pos])
        .at_line(3),
    );

    rec.emit(
        Snapshot::new(
            headed(kind, &nodes),
            format!("Insertion complete: {}", render_chain(kind, &nodes)),
        )
        .mark(Highlight::Found, 0..nodes.len())
        .at_line(4),
    );
    rec.finish()
}

fn singly_insert_position(seed: &Seed) -> Result<Trace> {
    insert_position(seed, ListKind::Singly, "singly-linked-list-insert-position", 55)
}

fn doubly_insert_position(seed: &Seed) -> Result<Trace> {
    insert_position(seed, ListKind::Doubly, "doubly-linked-list-insert-position", 77)
}

/// Three-pointer in-place reversal.
///
/// While links are being flipped the view keeps the original node order and
/// the markers show `prev`, `current` and `next`; the final step shows the new
/// traversal order.
fn reverse(seed: &Seed) -> Result<Trace> {
    let mut nodes = seed.sequence("reverse-linked-list")?;
    nodes.truncate(6);
    let n = nodes.len();
    let mut rec = Recorder::new("reverse-linked-list");

    rec.emit(
        Snapshot::new(
            headed(ListKind::Singly, &nodes),
            format!("Reverse list: {}", render_chain(ListKind::Singly, &nodes)),
        )
        .at_line(1),
    );

    let mut prev: Option<usize> = None;
    for current in 0..n {
        let next = (current + 1 < n).then_some(current + 1);
        let target = prev.map_or_else(|| "null".to_string(), |p| nodes[p].to_string());
        rec.emit(
            Snapshot::new(
                view(
                    ListKind::Singly,
                    &nodes,
                    Markers {
                        prev,
                        current: Some(current),
                        next,
                        ..Markers::default()
                    },
                ),
                format!("Point {}.next at {target}, then advance", nodes[current]),
            )
            .mark(Highlight::Current, [current])
            .mark(Highlight::Found, 0..=current)
            .at_line(3),
        );
        prev = Some(current);
    }

    nodes.reverse();
    rec.emit(
        Snapshot::new(
            headed(ListKind::Singly, &nodes),
            format!("Reversed: {}", render_chain(ListKind::Singly, &nodes)),
        )
        .mark(Highlight::Sorted, 0..n)
        .at_line(6),
    );
    rec.finish()
}

/// Floyd's tortoise and hare over up to eight nodes.
///
/// A seed target `t` in range links the tail back to node `t`; otherwise the
/// list is acyclic.
fn detect_cycle(seed: &Seed) -> Result<Trace> {
    let mut nodes = seed.sequence("detect-cycle")?;
    nodes.truncate(8);
    let n = nodes.len();
    let cycle_to = seed
        .target()
        .and_then(super::as_index)
        .filter(|&t| t < n);
    let next = |i: usize| -> Option<usize> {
        if i + 1 < n {
            Some(i + 1)
        } else {
            cycle_to
        }
    };
    let mut rec = Recorder::new("detect-cycle");

    let intro = match cycle_to {
        Some(t) => format!("Floyd's cycle detection: tail links back to node {t}. Slow moves 1, fast moves 2"),
        None => "Floyd's cycle detection: slow moves 1, fast moves 2".to_string(),
    };
    rec.emit(
        Snapshot::new(headed(ListKind::Singly, &nodes), intro)
            .annotate("cycle_to", cycle_to.map_or(-1, super::as_value))
            .at_line(1),
    );

    if n == 0 {
        rec.emit(
            Snapshot::new(headed(ListKind::Singly, &nodes), "Empty list has no cycle")
                .mark(Highlight::Found, [])
                .at_line(5),
        );
        return rec.finish();
    }

    let (mut slow, mut fast) = (0usize, 0usize);
    let mut step = 0;
    loop {
        let Some(fast_next) = next(fast).and_then(next) else {
            rec.emit(
                Snapshot::new(
                    headed(ListKind::Singly, &nodes),
                    "No cycle detected - fast reached end",
                )
                .mark(Highlight::Found, [])
                .at_line(5),
            );
            break;
        };
        // fast advanced, so slow has a successor
        slow = next(slow).unwrap_or(slow);
        fast = fast_next;
        step += 1;
        rec.emit(
            Snapshot::new(
                view(
                    ListKind::Singly,
                    &nodes,
                    Markers {
                        current: Some(slow),
                        next: Some(fast),
                        ..Markers::head(0)
                    },
                ),
                format!("Step {step}: slow at {slow}, fast at {fast}"),
            )
            .mark(Highlight::Pointers, [slow, fast])
            .annotate("slow", slow)
            .annotate("fast", fast)
            .at_line(3),
        );
        if slow == fast {
            rec.emit(
                Snapshot::new(
                    headed(ListKind::Singly, &nodes),
                    format!("Cycle detected: slow and fast meet at node {slow}"),
                )
                .mark(Highlight::Found, [slow])
                .at_line(4),
            );
            break;
        }
    }
    rec.finish()
}

/// Swap `prev` and `next` on every node of a doubly linked list.
fn doubly_reverse(seed: &Seed) -> Result<Trace> {
    let mut nodes = seed.sequence("doubly-reverse-linked-list")?;
    nodes.truncate(5);
    let n = nodes.len();
    let mut rec = Recorder::new("doubly-reverse-linked-list");

    rec.emit(
        Snapshot::new(
            headed(ListKind::Doubly, &nodes),
            "Reverse DLL: swap prev and next for each node",
        )
        .at_line(1),
    );

    for i in 0..n {
        rec.emit(
            Snapshot::new(
                view(
                    ListKind::Doubly,
                    &nodes,
                    Markers {
                        prev: i.checked_sub(1),
                        current: Some(i),
                        next: (i + 1 < n).then_some(i + 1),
                        ..Markers::default()
                    },
                ),
                format!("Swapping prev and next pointers for node {}", nodes[i]),
            )
            .mark(Highlight::Current, [i])
            .mark(Highlight::Found, 0..i)
            .at_line(2),
        );
    }

    nodes.reverse();
    rec.emit(
        Snapshot::new(
            headed(ListKind::Doubly, &nodes),
            format!("DLL reversal complete: {}", render_chain(ListKind::Doubly, &nodes)),
        )
        .mark(Highlight::Sorted, 0..n)
        .at_line(3),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(trace: &Trace) -> Vec<i64> {
        trace.last().view.int_values().unwrap()
    }

    #[test]
    fn build_appends_in_order() {
        let trace = singly_build(&Seed::from(vec![3, 1, 4, 1, 5, 9, 2])).unwrap();
        assert_eq!(values(&trace), vec![3, 1, 4, 1, 5, 9]);
        assert_eq!(trace.last().message, "Final list: 3 → 1 → 4 → 1 → 5 → 9 → null");

        let trace = doubly_build(&Seed::from(vec![1, 2])).unwrap();
        assert_eq!(trace.last().message, "Final list: 1 ⇄ 2 ⇄ null");
    }

    #[test]
    fn insert_head_defaults() {
        let trace = singly_insert_head(&Seed::from(vec![1, 2])).unwrap();
        assert_eq!(values(&trace), vec![99, 1, 2]);
        let trace = doubly_insert_head(&Seed::from(vec![1, 2])).unwrap();
        assert_eq!(values(&trace), vec![88, 1, 2]);
    }

    #[test]
    fn insert_head_into_empty_list() {
        let trace = singly_insert_head(&Seed::from(vec![])).unwrap();
        assert_eq!(values(&trace), vec![99]);
    }

    #[test]
    fn insert_position_defaults() {
        let trace = singly_insert_position(&Seed::from(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(values(&trace), vec![1, 2, 55, 3, 4]);
        assert!(trace
            .iter()
            .any(|s| s.message == "Update pointers: 2 → 55 → 3"));

        let trace = doubly_insert_position(&Seed::from(vec![1])).unwrap();
        assert_eq!(values(&trace), vec![1, 77]);
    }

    #[test]
    fn reverse_flips_order() {
        let trace = reverse(&Seed::from(vec![1, 2, 3])).unwrap();
        assert_eq!(values(&trace), vec![3, 2, 1]);
        assert_eq!(trace.len(), 5);
        let trace = doubly_reverse(&Seed::from(vec![1, 2, 3])).unwrap();
        assert_eq!(values(&trace), vec![3, 2, 1]);
    }

    #[test]
    fn acyclic_list_reaches_end() {
        let trace = detect_cycle(&Seed::from(vec![1, 2, 3, 4, 5])).unwrap();
        assert_eq!(trace.last().message, "No cycle detected - fast reached end");
        assert_eq!(trace.last().highlights.get(Highlight::Found), Some(&[][..]));
    }

    #[test]
    fn cycle_is_detected() {
        let trace = detect_cycle(&Seed::with_target(vec![1, 2, 3, 4, 5], 1)).unwrap();
        assert!(trace.last().message.starts_with("Cycle detected"));
        assert_eq!(trace.last().highlighted(Highlight::Found).len(), 1);
    }

    #[test]
    fn single_node_self_cycle() {
        let trace = detect_cycle(&Seed::with_target(vec![7], 0)).unwrap();
        assert_eq!(trace.last().message, "Cycle detected: slow and fast meet at node 0");
    }
}
