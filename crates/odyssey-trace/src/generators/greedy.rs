//! Greedy choices on fixed demonstration inputs.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Greedy;
    registry.insert(Entry::new(
        "interval-scheduling",
        "Interval Scheduling",
        c,
        ("O(n log n)", "O(1)"),
        interval_scheduling,
    ));
    registry.insert(Entry::new("huffman-coding", "Huffman Coding", c, ("O(n log n)", "O(n)"), huffman));
}

const INTERVALS: [(i64, i64); 6] = [(1, 3), (2, 4), (3, 5), (0, 6), (5, 7), (6, 8)];
const FREQUENCIES: [(char, i64); 6] = [('a', 5), ('b', 9), ('c', 12), ('d', 13), ('e', 16), ('f', 45)];

fn describe(intervals: &[(i64, i64)]) -> String {
    let shown: Vec<String> = intervals.iter().map(|(s, e)| format!("[{s},{e}]")).collect();
    shown.join(", ")
}

/// Earliest-finish-time selection. The view holds end times in sorted order.
fn interval_scheduling(_seed: &Seed) -> Result<Trace> {
    let mut intervals = INTERVALS.to_vec();
    let mut rec = Recorder::new("interval-scheduling");

    rec.emit(
        Snapshot::new(
            View::array(&intervals.iter().map(|&(_, e)| e).collect::<Vec<_>>()),
            format!("Intervals: {}", describe(&intervals)),
        )
        .annotate("intervals", describe(&intervals))
        .at_line(1),
    );

    intervals.sort_by_key(|&(_, end)| end);
    let ends: Vec<i64> = intervals.iter().map(|&(_, e)| e).collect();
    rec.emit(
        Snapshot::new(View::array(&ends), "Sort intervals by end time")
            .mark(Highlight::Sorted, 0..ends.len())
            .annotate("intervals", describe(&intervals))
            .at_line(2),
    );

    let mut selected: Vec<usize> = Vec::new();
    let mut last_end = i64::MIN;
    for (i, &(start, end)) in intervals.iter().enumerate() {
        let message = if start >= last_end {
            selected.push(i);
            last_end = end;
            format!("Select [{start},{end}]: starts at or after {}", previous_end(&intervals, &selected))
        } else {
            format!("Skip [{start},{end}]: overlaps, starts before {last_end}")
        };
        rec.emit(
            Snapshot::new(View::array(&ends), message)
                .mark(Highlight::Current, [i])
                .mark(Highlight::Found, selected.iter().copied())
                .annotate("last_end", last_end)
                .at_line(if selected.last() == Some(&i) { 4 } else { 5 }),
        );
    }

    let chosen: Vec<(i64, i64)> = selected.iter().map(|&i| intervals[i]).collect();
    rec.emit(
        Snapshot::new(
            View::array(&ends),
            format!("Selected {} intervals: {}", chosen.len(), describe(&chosen)),
        )
        .mark(Highlight::Found, selected.iter().copied())
        .annotate("count", chosen.len())
        .at_line(7),
    );
    rec.finish()
}

/// End of the interval selected before the newest one, for narration.
fn previous_end(intervals: &[(i64, i64)], selected: &[usize]) -> String {
    match selected.len().checked_sub(2) {
        Some(i) => intervals[selected[i]].1.to_string(),
        None => "the beginning".to_string(),
    }
}

struct HuffmanNode {
    weight: i64,
    symbol: Option<char>,
    children: Option<(usize, usize)>,
}

/// Merge the two lightest nodes until one remains. The view is the sorted
/// weights still waiting in the queue; ties go to the older node.
fn huffman(_seed: &Seed) -> Result<Trace> {
    let mut nodes: Vec<HuffmanNode> = FREQUENCIES
        .iter()
        .map(|&(symbol, weight)| HuffmanNode {
            weight,
            symbol: Some(symbol),
            children: None,
        })
        .collect();
    let mut queue: Vec<usize> = (0..nodes.len()).collect();
    let mut rec = Recorder::new("huffman-coding");

    let weights = |queue: &[usize], nodes: &[HuffmanNode]| -> Vec<i64> {
        queue.iter().map(|&id| nodes[id].weight).collect()
    };

    rec.emit(
        Snapshot::new(
            View::array(&weights(&queue, &nodes)),
            format!(
                "Huffman: frequencies [{}]",
                join(&weights(&queue, &nodes), ", ")
            ),
        )
        .at_line(1),
    );

    while queue.len() > 1 {
        queue.sort_by_key(|&id| (nodes[id].weight, id));
        rec.emit(
            Snapshot::new(
                View::array(&weights(&queue, &nodes)),
                format!(
                    "Take the two smallest: {} and {}",
                    nodes[queue[0]].weight, nodes[queue[1]].weight
                ),
            )
            .mark(Highlight::Comparing, [0, 1])
            .at_line(3),
        );

        let left = queue.remove(0);
        let right = queue.remove(0);
        let weight = nodes[left].weight + nodes[right].weight;
        let id = nodes.len();
        nodes.push(HuffmanNode {
            weight,
            symbol: None,
            children: Some((left, right)),
        });
        queue.push(id);
        queue.sort_by_key(|&id| (nodes[id].weight, id));

        let at = queue.iter().position(|&q| q == id).unwrap_or(0);
        rec.emit(
            Snapshot::new(
                View::array(&weights(&queue, &nodes)),
                format!(
                    "Combine {} + {} = {weight}",
                    nodes[left].weight, nodes[right].weight
                ),
            )
            .mark(Highlight::Swapping, [at])
            .at_line(4),
        );
    }

    let mut codes = Vec::new();
    if let Some(&root) = queue.first() {
        assign_codes(&nodes, root, &mut String::new(), &mut codes);
    }
    codes.sort();
    let table: Vec<String> = codes.iter().map(|(s, code)| format!("{s}:{code}")).collect();
    let total = queue.first().map_or(0, |&root| nodes[root].weight);
    rec.emit(
        Snapshot::new(
            View::array(&weights(&queue, &nodes)),
            format!("Huffman tree built! Root weight: {total}"),
        )
        .mark(Highlight::Found, 0..queue.len())
        .annotate("codes", table.join(" "))
        .at_line(6),
    );
    rec.finish()
}

/// Left edges read 0, right edges read 1. A lone leaf gets code "0".
fn assign_codes(nodes: &[HuffmanNode], at: usize, prefix: &mut String, out: &mut Vec<(char, String)>) {
    let node = &nodes[at];
    match (node.symbol, node.children) {
        (Some(symbol), _) => {
            let code = if prefix.is_empty() { "0".to_string() } else { prefix.clone() };
            out.push((symbol, code));
        }
        (None, Some((left, right))) => {
            prefix.push('0');
            assign_codes(nodes, left, prefix, out);
            prefix.pop();
            prefix.push('1');
            assign_codes(nodes, right, prefix, out);
            prefix.pop();
        }
        (None, None) => {}
    }
}
