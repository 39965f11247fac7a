//! Searches over a sequence.
//!
//! The ordered searches sort their working copy first. Without an explicit
//! target they look for an element chosen from the seed's own values.

use super::pick_target;
use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Searching;
    registry.insert(Entry::new("linear-search", "Linear Search", c, ("O(n)", "O(1)"), linear_search));
    registry.insert(Entry::new("binary-search", "Binary Search", c, ("O(log n)", "O(1)"), binary_search));
    registry.insert(Entry::new("jump-search", "Jump Search", c, ("O(√n)", "O(1)"), jump_search));
    registry.insert(Entry::new(
        "interpolation-search",
        "Interpolation Search",
        c,
        ("O(log log n)", "O(1)"),
        interpolation_search,
    ));
}

fn found(values: &[i64], target: i64, index: usize, line: u32) -> Snapshot {
    Snapshot::new(View::array(values), format!("Found {target} at index {index}!"))
        .mark(Highlight::Found, [index])
        .annotate("target", target)
        .at_line(line)
}

/// Terminal step of a miss, with an explicit empty `found` set.
fn not_found(values: &[i64], target: Option<i64>, line: u32) -> Snapshot {
    let snap = match target {
        Some(t) => Snapshot::new(View::array(values), format!("{t} not found in array"))
            .annotate("target", t),
        None => Snapshot::new(View::array(values), "Array is empty, nothing to search"),
    };
    snap.mark(Highlight::Found, []).at_line(line)
}

fn linear_search(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("linear-search")?;
    let mut rec = Recorder::new("linear-search");
    let Some(target) = pick_target(seed, &values) else {
        rec.emit(not_found(&values, None, 5));
        return rec.finish();
    };

    for (i, &v) in values.iter().enumerate() {
        let relation = if v == target { "=" } else { "≠" };
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Checking index {i}: {v} {relation} {target}"),
            )
            .mark(Highlight::Comparing, [i])
            .annotate("target", target)
            .at_line(2),
        );
        if v == target {
            rec.emit(found(&values, target, i, 3));
            return rec.finish();
        }
    }

    rec.emit(not_found(&values, Some(target), 5));
    rec.finish()
}

fn sorted_copy(seed: &Seed, algorithm: &'static str) -> Result<Vec<i64>> {
    let mut values = seed.sequence(algorithm)?;
    values.sort_unstable();
    Ok(values)
}

fn binary_search(seed: &Seed) -> Result<Trace> {
    let values = sorted_copy(seed, "binary-search")?;
    let mut rec = Recorder::new("binary-search");
    let Some(target) = pick_target(seed, &values) else {
        rec.emit(not_found(&values, None, 10));
        return rec.finish();
    };

    let (mut low, mut high) = (0usize, values.len());
    while low < high {
        let mid = (low + high - 1) / 2;
        let right = high - 1;
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!(
                    "Searching in range [{low}, {right}], mid = {mid}, arr[mid] = {}",
                    values[mid]
                ),
            )
            .mark(Highlight::Comparing, [mid])
            .mark(Highlight::Window, low..=right)
            .annotate("target", target)
            .annotate("mid", mid)
            .at_line(3),
        );

        if values[mid] == target {
            rec.emit(found(&values, target, mid, 4));
            return rec.finish();
        }
        if values[mid] < target {
            low = mid + 1;
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("{} < {target}, search right half", values[mid]),
                )
                .mark(Highlight::Window, low..high)
                .annotate("target", target)
                .at_line(6),
            );
        } else {
            high = mid;
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("{} > {target}, search left half", values[mid]),
                )
                .mark(Highlight::Window, low..high)
                .annotate("target", target)
                .at_line(8),
            );
        }
    }

    rec.emit(not_found(&values, Some(target), 10));
    rec.finish()
}

fn jump_search(seed: &Seed) -> Result<Trace> {
    let values = sorted_copy(seed, "jump-search")?;
    let mut rec = Recorder::new("jump-search");
    let n = values.len();
    let Some(target) = pick_target(seed, &values) else {
        rec.emit(not_found(&values, None, 9));
        return rec.finish();
    };
    if values.is_empty() {
        rec.emit(not_found(&values, Some(target), 9));
        return rec.finish();
    }

    let step = (n as f64).sqrt().floor().max(1.0) as usize;
    rec.emit(
        Snapshot::new(View::array(&values), format!("Jump size = √{n} = {step}"))
            .annotate("target", target)
            .annotate("jump", step)
            .at_line(1),
    );

    let (mut prev, mut curr) = (0, 0);
    while values[curr] < target {
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Jumping: arr[{curr}] = {} < {target}", values[curr]),
            )
            .mark(Highlight::Comparing, [curr])
            .mark(Highlight::Window, prev..=curr)
            .annotate("target", target)
            .at_line(3),
        );
        if curr == n - 1 {
            break;
        }
        prev = curr;
        curr = (curr + step).min(n - 1);
    }

    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("Linear search from {prev} to {curr}"),
        )
        .mark(Highlight::Window, prev..=curr)
        .annotate("target", target)
        .at_line(5),
    );

    for i in prev..=curr {
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Checking arr[{i}] = {}", values[i]),
            )
            .mark(Highlight::Comparing, [i])
            .mark(Highlight::Window, prev..=curr)
            .annotate("target", target)
            .at_line(6),
        );
        if values[i] == target {
            rec.emit(found(&values, target, i, 7));
            return rec.finish();
        }
        if values[i] > target {
            break;
        }
    }

    rec.emit(not_found(&values, Some(target), 9));
    rec.finish()
}

fn interpolation_search(seed: &Seed) -> Result<Trace> {
    let values = sorted_copy(seed, "interpolation-search")?;
    let mut rec = Recorder::new("interpolation-search");
    let Some(target) = pick_target(seed, &values) else {
        rec.emit(not_found(&values, None, 8));
        return rec.finish();
    };
    if values.is_empty() {
        rec.emit(not_found(&values, Some(target), 8));
        return rec.finish();
    }

    let (mut low, mut high) = (0usize, values.len() - 1);
    while low <= high && target >= values[low] && target <= values[high] {
        let pos = if values[high] == values[low] {
            low
        } else {
            let offset = (i128::from(target) - i128::from(values[low])) * (high - low) as i128
                / (i128::from(values[high]) - i128::from(values[low]));
            low + offset as usize
        };
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Interpolated position = {pos}, arr[{pos}] = {}", values[pos]),
            )
            .mark(Highlight::Comparing, [pos])
            .mark(Highlight::Window, low..=high)
            .annotate("target", target)
            .at_line(3),
        );

        if values[pos] == target {
            rec.emit(found(&values, target, pos, 4));
            return rec.finish();
        }
        if values[pos] < target {
            low = pos + 1;
        } else if pos == 0 {
            break;
        } else {
            high = pos - 1;
        }
    }

    rec.emit(not_found(&values, Some(target), 8));
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_search_single_hit() {
        let trace = linear_search(&Seed::with_target(vec![10], 10)).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].highlighted(Highlight::Comparing), &[0]);
        assert_eq!(trace.steps()[1].highlighted(Highlight::Found), &[0]);
    }

    #[test]
    fn linear_search_miss_ends_with_empty_found() {
        let trace = linear_search(&Seed::with_target(vec![1, 2, 3], 9)).unwrap();
        assert_eq!(trace.len(), 4);
        let last = trace.last();
        assert_eq!(last.highlights.get(Highlight::Found), Some(&[][..]));
        assert_eq!(last.message, "9 not found in array");
    }

    #[test]
    fn empty_seed_is_a_miss() {
        for generate in [linear_search, binary_search, jump_search, interpolation_search] {
            let trace = generate(&Seed::from(vec![])).unwrap();
            assert_eq!(trace.len(), 1);
            assert!(trace.last().highlights.contains(Highlight::Found));
            assert!(trace.last().highlighted(Highlight::Found).is_empty());
        }
    }

    #[test]
    fn explicit_target_over_empty_array() {
        for generate in [linear_search, binary_search, jump_search, interpolation_search] {
            let trace = generate(&Seed::with_target(vec![], 5)).unwrap();
            assert_eq!(trace.last().message, "5 not found in array");
        }
    }

    #[test]
    fn implicit_target_is_always_found() {
        let seed = Seed::from(vec![40, 10, 70, 20, 90, 30, 60]);
        for generate in [linear_search, binary_search, jump_search, interpolation_search] {
            let trace = generate(&seed).unwrap();
            assert_eq!(trace.last().highlighted(Highlight::Found).len(), 1);
            assert!(trace.last().message.starts_with("Found"));
        }
    }

    #[test]
    fn explicit_miss_terminates_for_ordered_searches() {
        for target in [-5, 25, 1000] {
            let seed = Seed::with_target(vec![10, 20, 30, 40, 50], target);
            for generate in [binary_search, jump_search, interpolation_search] {
                let trace = generate(&seed).unwrap();
                assert_eq!(trace.last().highlights.get(Highlight::Found), Some(&[][..]));
            }
        }
    }

    #[test]
    fn binary_search_uses_floor_mid() {
        let trace = binary_search(&Seed::with_target(vec![1, 2, 3, 4], 4)).unwrap();
        assert_eq!(trace.first().highlighted(Highlight::Comparing), &[1]);
        assert_eq!(
            trace.first().message,
            "Searching in range [0, 3], mid = 1, arr[mid] = 2"
        );
    }

    #[test]
    fn binary_search_finds_every_element() {
        let values = vec![3, 8, 15, 21, 42, 57];
        for &target in &values {
            let trace = binary_search(&Seed::with_target(values.clone(), target)).unwrap();
            let hit = trace.last().highlighted(Highlight::Found)[0];
            assert_eq!(values[hit], target);
        }
    }

    #[test]
    fn jump_search_announces_jump_size() {
        let trace = jump_search(&Seed::with_target((1..=9).collect(), 8)).unwrap();
        assert_eq!(trace.first().message, "Jump size = √9 = 3");
        assert_eq!(trace.last().highlighted(Highlight::Found), &[7]);
    }

    #[test]
    fn interpolation_handles_flat_ranges() {
        let trace = interpolation_search(&Seed::with_target(vec![5, 5, 5], 5)).unwrap();
        assert_eq!(trace.last().highlighted(Highlight::Found), &[0]);
    }
}
