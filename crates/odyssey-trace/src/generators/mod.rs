//! Built-in generators, one module per algorithm family.
//!
//! Every generator follows the same contract: take a private working copy of
//! the seed, run the reference algorithm, and emit one snapshot per meaningful
//! transition into a [`Recorder`](crate::trace::Recorder). State-changing
//! steps show the state *after* the change, with the changed positions in
//! [`Highlight::Swapping`](crate::snapshot::Highlight::Swapping).
//!
//! Comparisons are strict throughout: equal keys are never swapped, and merge
//! takes from the left run on ties, so every sort here is stable where the
//! underlying algorithm allows it.

mod advanced;
mod arrays;
mod backtracking;
mod bits;
mod dp;
mod graphs;
mod greedy;
mod hashing;
mod linked_lists;
mod queues;
mod searching;
mod sorting;
mod stacks;
mod strings;
mod trees;

use crate::registry::Registry;
use crate::seed::{derive_index, Seed};
use crate::snapshot::{Highlight, Snapshot, View};

/// Register every family's generators.
pub(crate) fn register_all(registry: &mut Registry) {
    sorting::register(registry);
    searching::register(registry);
    arrays::register(registry);
    dp::register(registry);
    backtracking::register(registry);
    stacks::register(registry);
    queues::register(registry);
    linked_lists::register(registry);
    strings::register(registry);
    greedy::register(registry);
    bits::register(registry);
    advanced::register(registry);
    graphs::register(registry);
    trees::register(registry);
    hashing::register(registry);
}

/// Terminal step of a sort: every position is in its final place.
fn sorted_terminal(values: &[i64], line: u32) -> Snapshot {
    Snapshot::new(View::array(values), "Array is sorted!")
        .mark(Highlight::Sorted, 0..values.len())
        .at_line(line)
}

/// The seed's explicit target, or one of `values` chosen from the values themselves.
fn pick_target(seed: &Seed, values: &[i64]) -> Option<i64> {
    seed.target()
        .or_else(|| values.get(derive_index(values)).copied())
}

/// `value` as an index, if non-negative.
fn as_index(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}

/// Value of `index` as an `i64`, saturating.
fn as_value(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Clamp a wide intermediate sum back into the `i64` range.
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
