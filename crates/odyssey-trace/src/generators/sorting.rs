//! Comparison sorts.

use super::sorted_terminal;
use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Sorting;
    registry.insert(Entry::new("bubble", "Bubble Sort", c, ("O(n²)", "O(1)"), bubble));
    registry.insert(Entry::new("selection", "Selection Sort", c, ("O(n²)", "O(1)"), selection));
    registry.insert(Entry::new("insertion", "Insertion Sort", c, ("O(n²)", "O(1)"), insertion));
    registry.insert(Entry::new("quick", "Quick Sort", c, ("O(n log n)", "O(log n)"), quick));
    registry.insert(Entry::new("merge", "Merge Sort", c, ("O(n log n)", "O(n)"), merge));
    registry.insert(Entry::new("heap", "Heap Sort", c, ("O(n log n)", "O(1)"), heap));
}

fn bubble(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("bubble")?;
    let mut rec = Recorder::new("bubble");
    let n = values.len();

    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Comparing {} and {}", values[j], values[j + 1]),
                )
                .mark(Highlight::Comparing, [j, j + 1])
                .mark(Highlight::Sorted, n - i..n)
                .at_line(3),
            );
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                rec.emit(
                    Snapshot::new(
                        View::array(&values),
                        format!("Swapped {} and {}", values[j + 1], values[j]),
                    )
                    .mark(Highlight::Swapping, [j, j + 1])
                    .mark(Highlight::Sorted, n - i..n)
                    .at_line(4),
                );
            }
        }
    }

    rec.emit(sorted_terminal(&values, 6));
    rec.finish()
}

fn selection(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("selection")?;
    let mut rec = Recorder::new("selection");
    let n = values.len();

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Finding minimum: comparing {} and {}", values[min], values[j]),
                )
                .mark(Highlight::Comparing, [min, j])
                .mark(Highlight::Sorted, 0..i)
                .annotate("min_index", min)
                .at_line(4),
            );
            if values[j] < values[min] {
                min = j;
            }
        }
        if min != i {
            values.swap(i, min);
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Swapped {} into position {}", values[i], i),
                )
                .mark(Highlight::Swapping, [i, min])
                .mark(Highlight::Sorted, 0..i)
                .at_line(7),
            );
        }
    }

    rec.emit(sorted_terminal(&values, 9));
    rec.finish()
}

fn insertion(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("insertion")?;
    let mut rec = Recorder::new("insertion");
    let n = values.len();

    for i in 1..n {
        let key = values[i];
        let mut j = i;
        while j > 0 && values[j - 1] > key {
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Comparing {} with key {}", values[j - 1], key),
                )
                .mark(Highlight::Comparing, [j - 1, j])
                .mark(Highlight::Sorted, 0..i)
                .annotate("key", key)
                .at_line(4),
            );
            values[j] = values[j - 1];
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Shifted {} to the right", values[j]),
                )
                .mark(Highlight::Swapping, [j - 1, j])
                .mark(Highlight::Sorted, 0..i)
                .annotate("key", key)
                .at_line(5),
            );
            j -= 1;
        }
        if j != i {
            values[j] = key;
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Inserted key {key} at position {j}"),
                )
                .mark(Highlight::Swapping, [j])
                .mark(Highlight::Sorted, 0..=i)
                .at_line(7),
            );
        }
    }

    rec.emit(sorted_terminal(&values, 8));
    rec.finish()
}

fn quick(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("quick")?;
    let mut rec = Recorder::new("quick");
    if values.len() > 1 {
        let high = values.len() - 1;
        quick_sort(&mut values, 0, high, &mut rec);
    }
    rec.emit(sorted_terminal(&values, 12));
    rec.finish()
}

fn quick_sort(values: &mut [i64], low: usize, high: usize, rec: &mut Recorder) {
    if low >= high {
        return;
    }
    let pivot = partition(values, low, high, rec);
    if pivot > low {
        quick_sort(values, low, pivot - 1, rec);
    }
    quick_sort(values, pivot + 1, high, rec);
}

/// Lomuto partition around `values[high]`; returns the pivot's final index.
fn partition(values: &mut [i64], low: usize, high: usize, rec: &mut Recorder) -> usize {
    let pivot = values[high];
    rec.emit(
        Snapshot::new(View::array(values), format!("Pivot selected: {pivot}"))
            .mark(Highlight::Current, [high])
            .mark(Highlight::Window, low..=high)
            .at_line(2),
    );

    let mut store = low;
    for j in low..high {
        rec.emit(
            Snapshot::new(
                View::array(values),
                format!("Comparing {} with pivot {}", values[j], pivot),
            )
            .mark(Highlight::Comparing, [j, high])
            .mark(Highlight::Window, low..=high)
            .at_line(5),
        );
        if values[j] < pivot {
            if store != j {
                values.swap(store, j);
                rec.emit(
                    Snapshot::new(
                        View::array(values),
                        format!("Swapped {} and {}", values[store], values[j]),
                    )
                    .mark(Highlight::Swapping, [store, j])
                    .mark(Highlight::Window, low..=high)
                    .at_line(7),
                );
            }
            store += 1;
        }
    }

    values.swap(store, high);
    rec.emit(
        Snapshot::new(
            View::array(values),
            format!("Placed pivot {pivot} at position {store}"),
        )
        .mark(Highlight::Swapping, [store, high])
        .mark(Highlight::Found, [store])
        .at_line(10),
    );
    store
}

fn merge(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("merge")?;
    let mut rec = Recorder::new("merge");
    if values.len() > 1 {
        let end = values.len() - 1;
        merge_sort(&mut values, 0, end, &mut rec);
    }
    rec.emit(sorted_terminal(&values, 15));
    rec.finish()
}

fn merge_sort(values: &mut [i64], start: usize, end: usize, rec: &mut Recorder) {
    if start >= end {
        return;
    }
    let mid = (start + end) / 2;
    rec.emit(
        Snapshot::new(
            View::array(values),
            format!("Divide: splitting [{start}..{end}] at index {mid}"),
        )
        .mark(Highlight::Window, start..=end)
        .mark(Highlight::Current, [mid])
        .at_line(2),
    );

    merge_sort(values, start, mid, rec);
    merge_sort(values, mid + 1, end, rec);
    merge_runs(values, start, mid, end, rec);
}

fn merge_runs(values: &mut [i64], start: usize, mid: usize, end: usize, rec: &mut Recorder) {
    let left = values[start..=mid].to_vec();
    let right = values[mid + 1..=end].to_vec();
    rec.emit(
        Snapshot::new(
            View::array(values),
            format!(
                "Conquer: merging [{start}..{mid}] and [{}..{end}]",
                mid + 1
            ),
        )
        .mark(Highlight::Window, start..=end)
        .at_line(5),
    );

    let (mut i, mut j, mut k) = (0, 0, start);
    while i < left.len() && j < right.len() {
        let (a, b) = (left[i], right[j]);
        if a <= b {
            values[k] = a;
            i += 1;
        } else {
            values[k] = b;
            j += 1;
        }
        rec.emit(
            Snapshot::new(
                View::array(values),
                format!(
                    "Comparing {a} and {b}. {} goes to position {k}.",
                    a.min(b)
                ),
            )
            .mark(Highlight::Swapping, [k])
            .mark(Highlight::Window, start..=end)
            .annotate("left", a)
            .annotate("right", b)
            .at_line(7),
        );
        k += 1;
    }
    for &v in left[i..].iter().chain(&right[j..]) {
        values[k] = v;
        rec.emit(
            Snapshot::new(
                View::array(values),
                format!("Copying remaining {v} to position {k}."),
            )
            .mark(Highlight::Swapping, [k])
            .mark(Highlight::Window, start..=end)
            .at_line(11),
        );
        k += 1;
    }

    rec.emit(
        Snapshot::new(
            View::array(values),
            format!("Merged segment [{start}..{end}] is now sorted."),
        )
        .mark(Highlight::Found, start..=end)
        .at_line(14),
    );
}

fn heap(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("heap")?;
    let mut rec = Recorder::new("heap");
    let n = values.len();

    for i in (0..n / 2).rev() {
        heapify(&mut values, n, i, &mut rec);
    }

    for end in (1..n).rev() {
        values.swap(0, end);
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Moved {} to sorted position {}", values[end], end),
            )
            .mark(Highlight::Swapping, [0, end])
            .mark(Highlight::Sorted, end..n)
            .at_line(8),
        );
        heapify(&mut values, end, 0, &mut rec);
    }

    rec.emit(sorted_terminal(&values, 10));
    rec.finish()
}

/// Sift `values[root]` down within the max-heap prefix `values[..size]`.
fn heapify(values: &mut [i64], size: usize, root: usize, rec: &mut Recorder) {
    let mut largest = root;
    let (left, right) = (2 * root + 1, 2 * root + 2);
    if left < size && values[left] > values[largest] {
        largest = left;
    }
    if right < size && values[right] > values[largest] {
        largest = right;
    }
    if largest != root {
        values.swap(root, largest);
        rec.emit(
            Snapshot::new(
                View::array(values),
                format!(
                    "Heapify: swapped {} and {}",
                    values[largest], values[root]
                ),
            )
            .mark(Highlight::Swapping, [root, largest])
            .mark(Highlight::Sorted, size..values.len())
            .at_line(5),
        );
        heapify(values, size, largest, rec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_values(trace: &Trace) -> Vec<i64> {
        trace.last().view.int_values().unwrap()
    }

    #[test]
    fn bubble_scenario() {
        let trace = bubble(&Seed::from(vec![5, 3, 8, 1])).unwrap();
        let first = trace.first();
        assert_eq!(first.highlighted(Highlight::Comparing), &[0, 1]);
        assert!(first.message.contains("Comparing 5 and 3"));
        assert_eq!(first.line, Some(3));

        assert_eq!(final_values(&trace), vec![1, 3, 5, 8]);
        assert_eq!(trace.last().highlighted(Highlight::Sorted), &[0, 1, 2, 3]);
    }

    #[test]
    fn bubble_swap_shows_post_mutation_state() {
        let trace = bubble(&Seed::from(vec![5, 3])).unwrap();
        let swap = &trace.steps()[1];
        assert_eq!(swap.view, View::array(&[3, 5]));
        assert_eq!(swap.highlighted(Highlight::Swapping), &[0, 1]);
    }

    #[test]
    fn every_sort_sorts() {
        let input = vec![9, -2, 7, 7, 0, 15, 3, -2, 11];
        let mut expected = input.clone();
        expected.sort();
        for generate in [bubble, selection, insertion, quick, merge, heap] {
            let trace = generate(&Seed::from(input.clone())).unwrap();
            assert_eq!(final_values(&trace), expected);
            assert_eq!(
                trace.last().highlighted(Highlight::Sorted),
                (0..input.len()).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn degenerate_inputs_still_produce_a_trace() {
        for generate in [bubble, selection, insertion, quick, merge, heap] {
            for input in [vec![], vec![4], vec![1, 2, 3]] {
                let trace = generate(&Seed::from(input.clone())).unwrap();
                assert!(!trace.is_empty());
                assert_eq!(final_values(&trace), input);
            }
        }
    }

    #[test]
    fn presorted_bubble_never_swaps() {
        let trace = bubble(&Seed::from(vec![1, 2, 3, 4])).unwrap();
        assert!(trace
            .iter()
            .all(|s| !s.highlights.contains(Highlight::Swapping)));
        assert_eq!(trace.len(), 6 + 1);
    }

    #[test]
    fn equal_keys_never_swap() {
        let trace = bubble(&Seed::from(vec![2, 2, 2])).unwrap();
        assert!(trace
            .iter()
            .all(|s| !s.highlights.contains(Highlight::Swapping)));
    }

    #[test]
    fn quick_places_pivots() {
        let trace = quick(&Seed::from(vec![3, 1, 2])).unwrap();
        assert_eq!(trace.first().message, "Pivot selected: 2");
        assert!(trace.iter().any(|s| s.message == "Placed pivot 2 at position 1"));
    }

    #[test]
    fn merge_narrates_divide_and_conquer() {
        let trace = merge(&Seed::from(vec![4, 1, 3, 2])).unwrap();
        assert!(trace.first().message.starts_with("Divide: splitting [0..3]"));
        assert!(trace.iter().any(|s| s.message.starts_with("Conquer:")));
        assert!(trace
            .iter()
            .any(|s| s.message == "Merged segment [0..3] is now sorted."));
    }

    #[test]
    fn merge_shows_every_placement() {
        let trace = merge(&Seed::from(vec![4, 1, 3, 2])).unwrap();
        let tail = trace
            .iter()
            .find(|s| s.message == "Copying remaining 4 to position 3.")
            .unwrap();
        assert_eq!(tail.view, View::array(&[1, 2, 3, 4]));
        assert_eq!(tail.highlighted(Highlight::Swapping), &[3]);

        // Two merges of two and one of four.
        let placements = trace
            .iter()
            .filter(|s| s.highlights.contains(Highlight::Swapping))
            .count();
        assert_eq!(placements, 8);
    }

    #[test]
    fn generation_is_deterministic() {
        let seed = Seed::from(vec![8, 3, 5, 1, 9, 2]);
        for generate in [bubble, selection, insertion, quick, merge, heap] {
            assert_eq!(generate(&seed).unwrap(), generate(&seed).unwrap());
        }
    }
}
