//! Array techniques: prefix sums, windows, pointers and raw array mutation.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{Cell, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

use super::saturate;

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Arrays;
    registry.insert(Entry::new("prefix-sum", "Prefix Sum", c, ("O(n)", "O(n)"), prefix_sum));
    registry.insert(Entry::new("sliding-window", "Sliding Window", c, ("O(n)", "O(1)"), sliding_window));
    registry.insert(Entry::new("two-pointers", "Two Pointers", c, ("O(n log n)", "O(1)"), two_pointers));
    registry.insert(Entry::new("kadanes", "Kadane's Algorithm", c, ("O(n)", "O(1)"), kadanes));
    registry.insert(Entry::new("dynamic-array", "Dynamic Array", c, ("O(1) amortized", "O(n)"), dynamic_array));
    registry.insert(Entry::new("array-insert", "Array Insertion", c, ("O(n)", "O(1)"), array_insert));
    registry.insert(Entry::new("array-delete", "Array Deletion", c, ("O(n)", "O(1)"), array_delete));
}

fn prefix_sum(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("prefix-sum")?;
    let mut rec = Recorder::new("prefix-sum");
    let mut prefix = vec![0i64];

    rec.emit(
        Snapshot::new(
            View::array(&values),
            "Building prefix sum array. Start with prefix[0] = 0",
        )
        .annotate("prefix", prefix.clone())
        .at_line(1),
    );

    for (i, &v) in values.iter().enumerate() {
        let next = prefix[i].saturating_add(v);
        prefix.push(next);
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!(
                    "prefix[{}] = prefix[{i}] + arr[{i}] = {} + {v} = {next}",
                    i + 1,
                    prefix[i]
                ),
            )
            .mark(Highlight::Current, [i])
            .annotate("prefix", prefix.clone())
            .at_line(3),
        );
    }

    // Demonstration query over [2, min(5, n - 1)].
    let (l, r) = (2, values.len().saturating_sub(1).min(5));
    if values.len() > l && r >= l {
        let sum = prefix[r + 1].saturating_sub(prefix[l]);
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!(
                    "Range sum [{l}, {r}] = prefix[{}] - prefix[{l}] = {} - {} = {sum}",
                    r + 1,
                    prefix[r + 1],
                    prefix[l]
                ),
            )
            .mark(Highlight::Window, l..=r)
            .annotate("prefix", prefix.clone())
            .annotate("range_sum", sum)
            .at_line(6),
        );
    }

    rec.finish()
}

fn sliding_window(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("sliding-window")?;
    let mut rec = Recorder::new("sliding-window");
    let k = values.len().min(3);

    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("Sliding window of size k = {k}"),
        )
        .annotate("k", k)
        .at_line(1),
    );
    if k == 0 {
        rec.emit(
            Snapshot::new(View::array(&values), "Array is empty, no window to slide")
                .mark(Highlight::Found, [])
                .at_line(7),
        );
        return rec.finish();
    }

    // Window sums are exact in i128; annotations saturate.
    let mut sum = 0i128;
    for i in 0..k {
        sum += i128::from(values[i]);
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Building window: adding {}, sum = {sum}", values[i]),
            )
            .mark(Highlight::Window, 0..=i)
            .annotate("window_sum", saturate(sum))
            .at_line(3),
        );
    }

    let mut best = sum;
    let mut best_start = 0;
    for i in k..values.len() {
        let removed = values[i - k];
        sum = sum - i128::from(removed) + i128::from(values[i]);
        if sum > best {
            best = sum;
            best_start = i + 1 - k;
        }
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!("Slide: remove {removed}, add {}, sum = {sum}", values[i]),
            )
            .mark(Highlight::Window, i + 1 - k..=i)
            .mark(Highlight::Swapping, [i - k])
            .mark(Highlight::Current, [i])
            .annotate("window_sum", saturate(sum))
            .annotate("max_sum", saturate(best))
            .at_line(5),
        );
    }

    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("Maximum sum of window size {k} = {best}"),
        )
        .mark(Highlight::Found, best_start..best_start + k)
        .annotate("max_sum", saturate(best))
        .at_line(7),
    );
    rec.finish()
}

/// Pair search on the sorted copy. The default target is the sum of the
/// smallest and largest values, saturated to `i64`.
fn two_pointers(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("two-pointers")?;
    values.sort_unstable();
    let mut rec = Recorder::new("two-pointers");

    let target = seed.target().or_else(|| match values.as_slice() {
        [first, .., last] => Some(first.saturating_add(*last)),
        _ => None,
    });
    let Some(target) = target else {
        rec.emit(
            Snapshot::new(View::array(&values), "Need at least two values to form a pair")
                .mark(Highlight::Found, [])
                .at_line(10),
        );
        return rec.finish();
    };

    let (mut left, mut right) = (0, values.len().saturating_sub(1));
    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("Two pointers: find pair that sums to {target}"),
        )
        .mark(Highlight::Pointers, [left, right])
        .annotate("target", target)
        .at_line(1),
    );

    while left < right {
        let sum = i128::from(values[left]) + i128::from(values[right]);
        rec.emit(
            Snapshot::new(
                View::array(&values),
                format!(
                    "arr[{left}] + arr[{right}] = {} + {} = {sum}",
                    values[left], values[right]
                ),
            )
            .mark(Highlight::Comparing, [left, right])
            .mark(Highlight::Pointers, [left, right])
            .annotate("target", target)
            .at_line(3),
        );

        if sum == i128::from(target) {
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("Found! {} + {} = {target}", values[left], values[right]),
                )
                .mark(Highlight::Found, [left, right])
                .annotate("target", target)
                .at_line(4),
            );
            return rec.finish();
        }
        let below = sum < i128::from(target);
        let message = if below {
            left += 1;
            format!("{sum} < {target}, move left pointer right")
        } else {
            right -= 1;
            format!("{sum} > {target}, move right pointer left")
        };
        rec.emit(
            Snapshot::new(View::array(&values), message)
                .mark(Highlight::Pointers, [left, right])
                .annotate("target", target)
                .at_line(if below { 6 } else { 8 }),
        );
    }

    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("No pair sums to {target}"),
        )
        .mark(Highlight::Found, [])
        .annotate("target", target)
        .at_line(10),
    );
    rec.finish()
}

/// Maximum subarray. Every third value (from index 0) is replaced with
/// `-floor(v / 2)` so positive seeds still show resets.
fn kadanes(seed: &Seed) -> Result<Trace> {
    let values: Vec<i64> = seed
        .sequence("kadanes")?
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i % 3 == 0 { -v.div_euclid(2) } else { v })
        .collect();
    let mut rec = Recorder::new("kadanes");

    let Some(&first) = values.first() else {
        rec.emit(
            Snapshot::new(View::array(&values), "Array is empty, no subarray")
                .mark(Highlight::Found, [])
                .at_line(7),
        );
        return rec.finish();
    };

    let (mut best, mut current) = (first, first);
    let (mut best_start, mut best_end, mut start) = (0, 0, 0);
    rec.emit(
        Snapshot::new(
            View::array(&values),
            format!("Initialize: maxSum = currentSum = {first}"),
        )
        .mark(Highlight::Current, [0])
        .annotate("current_sum", current)
        .annotate("max_sum", best)
        .at_line(1),
    );

    for (i, &v) in values.iter().enumerate().skip(1) {
        let (message, line) = if v > current.saturating_add(v) {
            let previous = current;
            current = v;
            start = i;
            (
                format!("Reset: {v} > {previous} + {v}, start new subarray"),
                3,
            )
        } else {
            let previous = current;
            current = current.saturating_add(v);
            (format!("Extend: currentSum = {previous} + {v} = {current}"), 4)
        };
        rec.emit(
            Snapshot::new(View::array(&values), message)
                .mark(Highlight::Current, [i])
                .mark(Highlight::Window, start..=i)
                .annotate("current_sum", current)
                .annotate("max_sum", best)
                .at_line(line),
        );

        if current > best {
            best = current;
            best_start = start;
            best_end = i;
            rec.emit(
                Snapshot::new(
                    View::array(&values),
                    format!("New max! maxSum = {best} from index {best_start} to {best_end}"),
                )
                .mark(Highlight::Found, best_start..=best_end)
                .annotate("current_sum", current)
                .annotate("max_sum", best)
                .at_line(5),
            );
        }
    }

    rec.emit(
        Snapshot::new(View::array(&values), format!("Maximum subarray sum = {best}"))
            .mark(Highlight::Found, best_start..=best_end)
            .annotate("max_sum", best)
            .at_line(7),
    );
    rec.finish()
}

/// Append every seed value to a growable array that starts at capacity 2
/// and doubles when full.
fn dynamic_array(seed: &Seed) -> Result<Trace> {
    let inputs = seed.sequence("dynamic-array")?;
    let mut rec = Recorder::new("dynamic-array");
    let mut slots = vec![Cell::Empty; 2];
    let mut size = 0;

    rec.emit(
        Snapshot::new(
            View::cells(slots.clone()),
            format!("Init Dynamic Array. Capacity: {}, Size: {size}", slots.len()),
        )
        .annotate("capacity", slots.len())
        .annotate("size", size)
        .at_line(1),
    );

    for value in inputs {
        if size == slots.len() {
            let old = slots.len();
            rec.emit(
                Snapshot::new(
                    View::cells(slots.clone()),
                    format!("Array full (Size {size} == Cap {old}). Triggering resize"),
                )
                .annotate("capacity", old)
                .annotate("size", size)
                .at_line(2),
            );

            let mut grown = vec![Cell::Empty; old * 2];
            rec.emit(
                Snapshot::new(
                    View::cells(grown.clone()),
                    format!("Created new array of capacity {} (double of {old})", grown.len()),
                )
                .annotate("capacity", grown.len())
                .at_line(3),
            );
            for i in 0..size {
                grown[i] = slots[i];
                rec.emit(
                    Snapshot::new(
                        View::cells(grown.clone()),
                        format!("Copied element {} to new array", slots[i]),
                    )
                    .mark(Highlight::Swapping, [i])
                    .annotate("capacity", grown.len())
                    .at_line(3),
                );
            }
            slots = grown;
        }

        slots[size] = Cell::Int(value);
        size += 1;
        rec.emit(
            Snapshot::new(
                View::cells(slots.clone()),
                format!(
                    "Inserted {value} at index {}. Size: {size}/{}",
                    size - 1,
                    slots.len()
                ),
            )
            .mark(Highlight::Swapping, [size - 1])
            .annotate("capacity", slots.len())
            .annotate("size", size)
            .at_line(4),
        );
    }

    rec.finish()
}

/// Insert into a fixed-capacity array by shifting the tail right.
///
/// Uses the seed (or `[10, 20, 30, 40]`) plus one spare slot; inserts the
/// seed's target (or 25) at index 1.
fn array_insert(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("array-insert")?;
    if values.is_empty() {
        values = vec![10, 20, 30, 40];
    }
    let insert = seed.target().unwrap_or(25);
    let at = 1.min(values.len());
    let size = values.len();
    let mut slots: Vec<Cell> = values.iter().copied().map(Cell::Int).collect();
    slots.push(Cell::Empty);
    let mut rec = Recorder::new("array-insert");

    rec.emit(
        Snapshot::new(
            View::cells(slots.clone()),
            format!("Static Array Insert: add {insert} at index {at}. Current Size: {size}"),
        )
        .mark(Highlight::Current, [at])
        .at_line(1),
    );

    for i in (at..size).rev() {
        slots[i + 1] = slots[i];
        slots[i] = Cell::Empty;
        rec.emit(
            Snapshot::new(
                View::cells(slots.clone()),
                format!("Shift right: moved {} from index {i} to {}", slots[i + 1], i + 1),
            )
            .mark(Highlight::Swapping, [i, i + 1])
            .at_line(2),
        );
    }

    slots[at] = Cell::Int(insert);
    rec.emit(
        Snapshot::new(
            View::cells(slots),
            format!("Inserted {insert} at index {at}. Time Complexity: O(n) due to shifting."),
        )
        .mark(Highlight::Found, [at])
        .at_line(3),
    );
    rec.finish()
}

/// Delete index 1 from a fixed-capacity array by shifting the tail left.
///
/// Uses the seed, or `[10, 20, 30, 40, 50]` when the seed is empty.
fn array_delete(seed: &Seed) -> Result<Trace> {
    let mut values = seed.sequence("array-delete")?;
    if values.is_empty() {
        values = vec![10, 20, 30, 40, 50];
    }
    let mut size = values.len();
    let at = 1.min(size - 1);
    let mut slots: Vec<Cell> = values.iter().copied().map(Cell::Int).collect();
    let mut rec = Recorder::new("array-delete");

    rec.emit(
        Snapshot::new(
            View::cells(slots.clone()),
            format!("Static Array Delete: remove element at index {at} ({})", slots[at]),
        )
        .mark(Highlight::Comparing, [at])
        .at_line(1),
    );

    slots[at] = Cell::Empty;
    rec.emit(
        Snapshot::new(
            View::cells(slots.clone()),
            "Element removed logically. Now must shift left to fill gap.",
        )
        .mark(Highlight::Swapping, [at])
        .at_line(2),
    );

    for i in at..size - 1 {
        slots[i] = slots[i + 1];
        slots[i + 1] = Cell::Empty;
        rec.emit(
            Snapshot::new(
                View::cells(slots.clone()),
                format!("Shift left: moved {} from index {} to {i}", slots[i], i + 1),
            )
            .mark(Highlight::Swapping, [i, i + 1])
            .at_line(3),
        );
    }

    size -= 1;
    rec.emit(
        Snapshot::new(
            View::cells(slots),
            format!("Deletion complete. Size is now {size}. Time Complexity: O(n)."),
        )
        .annotate("size", size)
        .at_line(4),
    );
    rec.finish()
}
