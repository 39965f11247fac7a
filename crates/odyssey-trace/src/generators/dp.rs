//! Dynamic programming tables.
//!
//! Knapsack, LCS and coin change run on fixed demonstration inputs; the seed
//! only selects them.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{Cell, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::DynamicProgramming;
    registry.insert(Entry::new("knapsack-01", "0/1 Knapsack", c, ("O(nW)", "O(W)"), knapsack));
    registry.insert(Entry::new("lis", "Longest Increasing Subsequence", c, ("O(n log n)", "O(n)"), lis));
    registry.insert(Entry::new("fibonacci", "Fibonacci", c, ("O(n)", "O(n)"), fibonacci));
    registry.insert(Entry::new("lcs", "Longest Common Subsequence", c, ("O(mn)", "O(mn)"), lcs));
    registry.insert(Entry::new("coin-change", "Coin Change", c, ("O(n·amount)", "O(amount)"), coin_change));
}

const KNAPSACK_WEIGHTS: [usize; 4] = [2, 3, 4, 5];
const KNAPSACK_VALUES: [i64; 4] = [3, 4, 5, 6];
const KNAPSACK_CAPACITY: usize = 5;

fn knapsack(_seed: &Seed) -> Result<Trace> {
    let mut rec = Recorder::new("knapsack-01");
    let mut dp = vec![0i64; KNAPSACK_CAPACITY + 1];

    rec.emit(
        Snapshot::new(
            View::array(&dp),
            format!(
                "Knapsack: capacity={KNAPSACK_CAPACITY}, items={}. Initialize DP array with zeros.",
                KNAPSACK_WEIGHTS.len()
            ),
        )
        .annotate("capacity", KNAPSACK_CAPACITY)
        .at_line(1),
    );

    for (item, (&weight, &value)) in KNAPSACK_WEIGHTS.iter().zip(&KNAPSACK_VALUES).enumerate() {
        for w in (weight..=KNAPSACK_CAPACITY).rev() {
            let old = dp[w];
            let candidate = dp[w - weight] + value;
            if candidate > old {
                dp[w] = candidate;
                rec.emit(
                    Snapshot::new(
                        View::array(&dp),
                        format!(
                            "Item {item} (w={weight}, v={value}): dp[{w}] = max({old}, dp[{}]+{value}) = {candidate}",
                            w - weight
                        ),
                    )
                    .mark(Highlight::Swapping, [w])
                    .mark(Highlight::Comparing, [w - weight])
                    .annotate("item", item)
                    .at_line(4),
                );
            }
        }
    }

    rec.emit(
        Snapshot::new(
            View::array(&dp),
            format!("Maximum value = {}", dp[KNAPSACK_CAPACITY]),
        )
        .mark(Highlight::Found, [KNAPSACK_CAPACITY])
        .at_line(7),
    );
    rec.finish()
}

/// Patience-style LIS with predecessor links, so the final step can mark one
/// longest subsequence.
fn lis(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("lis")?;
    let mut rec = Recorder::new("lis");
    let mut tails: Vec<i64> = Vec::new();
    let mut tail_index: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; values.len()];

    rec.emit(
        Snapshot::new(View::array(&values), "Finding Longest Increasing Subsequence")
            .annotate("tails", tails.clone())
            .at_line(1),
    );

    for (i, &num) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| t < num);
        parent[i] = slot.checked_sub(1).map(|s| tail_index[s]);
        let (message, line) = if slot == tails.len() {
            tails.push(num);
            tail_index.push(i);
            (format!("Extend LIS: append {num}, length = {}", tails.len()), 4)
        } else {
            tails[slot] = num;
            tail_index[slot] = i;
            (format!("Replace tails[{slot}] with {num}"), 6)
        };
        rec.emit(
            Snapshot::new(View::array(&values), message)
                .mark(Highlight::Current, [i])
                .annotate("tails", tails.clone())
                .at_line(line),
        );
    }

    let mut members = Vec::with_capacity(tails.len());
    let mut cursor = tail_index.last().copied();
    while let Some(i) = cursor {
        members.push(i);
        cursor = parent[i];
    }
    members.reverse();

    rec.emit(
        Snapshot::new(View::array(&values), format!("LIS length = {}", tails.len()))
            .mark(Highlight::Found, members)
            .annotate("tails", tails.clone())
            .at_line(8),
    );
    rec.finish()
}

/// Bottom-up Fibonacci up to `n`: the seed's target, or 7.
fn fibonacci(seed: &Seed) -> Result<Trace> {
    let n = seed
        .target()
        .and_then(|t| usize::try_from(t).ok())
        .unwrap_or(7)
        .clamp(1, 40);
    let mut rec = Recorder::new("fibonacci");
    let mut dp = vec![0i64; n + 1];
    dp[1] = 1;

    rec.emit(
        Snapshot::new(
            View::array(&dp),
            format!("Calculate Fib({n}). Base cases: dp[0]=0, dp[1]=1"),
        )
        .mark(Highlight::Current, [0, 1])
        .at_line(1),
    );

    for i in 2..=n {
        dp[i] = dp[i - 1] + dp[i - 2];
        rec.emit(
            Snapshot::new(
                View::array(&dp),
                format!(
                    "dp[{i}] = dp[{}] + dp[{}] = {} + {} = {}",
                    i - 1,
                    i - 2,
                    dp[i - 1],
                    dp[i - 2],
                    dp[i]
                ),
            )
            .mark(Highlight::Comparing, [i - 1, i - 2])
            .mark(Highlight::Swapping, [i])
            .at_line(2),
        );
    }

    rec.emit(
        Snapshot::new(View::array(&dp), format!("Fib({n}) = {}", dp[n]))
            .mark(Highlight::Found, [n])
            .at_line(3),
    );
    rec.finish()
}

const LCS_LEFT: &str = "ACADB";
const LCS_RIGHT: &str = "CBDA";

/// LCS table flattened row-major into an `(m+1) x (n+1)` array view.
fn lcs(_seed: &Seed) -> Result<Trace> {
    let a: Vec<char> = LCS_LEFT.chars().collect();
    let b: Vec<char> = LCS_RIGHT.chars().collect();
    let (m, n) = (a.len(), b.len());
    let width = n + 1;
    let mut dp = vec![0i64; (m + 1) * width];
    let mut rec = Recorder::new("lcs");

    rec.emit(
        Snapshot::new(
            View::array(&dp),
            format!(
                "LCS of \"{LCS_LEFT}\" vs \"{LCS_RIGHT}\". Initialize {}x{} table with 0s.",
                m + 1,
                n + 1
            ),
        )
        .annotate("rows", m + 1)
        .annotate("cols", width)
        .at_line(1),
    );

    for i in 1..=m {
        for j in 1..=n {
            let at = i * width + j;
            let (diag, top, left) = (dp[at - width - 1], dp[at - width], dp[at - 1]);
            let snap = if a[i - 1] == b[j - 1] {
                dp[at] = diag + 1;
                Snapshot::new(
                    View::array(&dp),
                    format!(
                        "Match '{}'. dp[{i}][{j}] = 1 + dp[{}][{}] ({diag}) = {}",
                        a[i - 1],
                        i - 1,
                        j - 1,
                        dp[at]
                    ),
                )
                .mark(Highlight::Found, [at])
                .at_line(2)
            } else {
                dp[at] = top.max(left);
                Snapshot::new(
                    View::array(&dp),
                    format!("Mismatch. max(top:{top}, left:{left}) = {}", dp[at]),
                )
                .mark(Highlight::Comparing, [at - width, at - 1])
                .at_line(3)
            };
            rec.emit(
                snap.mark(Highlight::Current, [at])
                    .annotate("rows", m + 1)
                    .annotate("cols", width),
            );
        }
    }

    // Walk back from the bottom-right corner to recover one LCS.
    let (mut i, mut j) = (m, n);
    let mut path = Vec::new();
    let mut common = Vec::new();
    while i > 0 && j > 0 {
        let at = i * width + j;
        if a[i - 1] == b[j - 1] {
            path.push(at);
            common.push(a[i - 1]);
            i -= 1;
            j -= 1;
        } else if dp[at - width] >= dp[at - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    path.reverse();
    common.reverse();
    let common: String = common.into_iter().collect();

    rec.emit(
        Snapshot::new(
            View::array(&dp),
            format!("LCS length = {} (\"{common}\")", dp[m * width + n]),
        )
        .mark(Highlight::Found, path)
        .annotate("lcs", common)
        .annotate("rows", m + 1)
        .annotate("cols", width)
        .at_line(4),
    );
    rec.finish()
}

const COINS: [usize; 3] = [1, 2, 5];
const COIN_AMOUNT: usize = 11;

fn coin_change(_seed: &Seed) -> Result<Trace> {
    let mut rec = Recorder::new("coin-change");
    let mut dp: Vec<Option<i64>> = vec![None; COIN_AMOUNT + 1];
    dp[0] = Some(0);
    let cells = |dp: &[Option<i64>]| -> Vec<Cell> {
        dp.iter()
            .map(|v| v.map_or(Cell::Infinite, Cell::Int))
            .collect()
    };

    rec.emit(
        Snapshot::new(
            View::cells(cells(&dp)),
            format!("Coin Change: coins=[1,2,5], amount={COIN_AMOUNT}"),
        )
        .annotate("amount", COIN_AMOUNT)
        .at_line(1),
    );

    for coin in COINS {
        for i in coin..=COIN_AMOUNT {
            let Some(prev) = dp[i - coin] else { continue };
            if dp[i].map_or(true, |cur| prev + 1 < cur) {
                dp[i] = Some(prev + 1);
                rec.emit(
                    Snapshot::new(
                        View::cells(cells(&dp)),
                        format!("Coin {coin}: dp[{i}] = dp[{}] + 1 = {}", i - coin, prev + 1),
                    )
                    .mark(Highlight::Swapping, [i])
                    .mark(Highlight::Comparing, [i - coin])
                    .annotate("coin", coin)
                    .at_line(4),
                );
            }
        }
    }

    let message = match dp[COIN_AMOUNT] {
        Some(count) => format!("Minimum coins for {COIN_AMOUNT} = {count}"),
        None => format!("Amount {COIN_AMOUNT} cannot be made"),
    };
    rec.emit(
        Snapshot::new(View::cells(cells(&dp)), message)
            .mark(Highlight::Found, [COIN_AMOUNT])
            .at_line(7),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn knapsack_best_value() {
        let trace = knapsack(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.last().message, "Maximum value = 7");
        assert_eq!(trace.last().view, View::array(&[0, 0, 3, 4, 5, 7]));
    }

    #[test]
    fn lis_marks_a_longest_subsequence() {
        let values = vec![10, 9, 2, 5, 3, 7, 101, 18];
        let trace = lis(&Seed::from(values.clone())).unwrap();
        assert_eq!(trace.last().message, "LIS length = 4");
        let members = trace.last().highlighted(Highlight::Found);
        assert_eq!(members.len(), 4);
        let picked: Vec<i64> = members.iter().map(|&i| values[i]).collect();
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn lis_on_empty_input() {
        let trace = lis(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.last().message, "LIS length = 0");
    }

    #[test]
    fn fibonacci_default_and_target() {
        let trace = fibonacci(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.last().message, "Fib(7) = 13");

        let trace = fibonacci(&Seed::with_target(vec![], 10)).unwrap();
        assert_eq!(trace.last().message, "Fib(10) = 55");
    }

    #[test]
    fn lcs_recovers_subsequence() {
        let trace = lcs(&Seed::from(vec![])).unwrap();
        // header + 5x4 cells + traceback
        assert_eq!(trace.len(), 22);
        assert!(trace.last().message.starts_with("LCS length = 2"));
        match trace.last().annotation("lcs") {
            Some(Scalar::Text(common)) => assert_eq!(common.len(), 2),
            other => panic!("missing lcs annotation: {other:?}"),
        }
    }

    #[test]
    fn coin_change_starts_with_infinity() {
        let trace = coin_change(&Seed::from(vec![])).unwrap();
        let View::Array { cells } = &trace.first().view else {
            panic!("expected array view");
        };
        assert_eq!(cells[0], Cell::Int(0));
        assert!(cells[1..].iter().all(|c| *c == Cell::Infinite));
        assert_eq!(trace.last().message, "Minimum coins for 11 = 3");
    }
}
