//! Backtracking searches over small boards and sets.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

/// Items taken from the seed for permutations and subsets.
const MAX_ITEMS: usize = 4;

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Backtracking;
    registry.insert(Entry::new("n-queens", "N-Queens", c, ("O(n!)", "O(n²)"), n_queens));
    registry.insert(Entry::new("permutations", "Permutations", c, ("O(n·n!)", "O(n)"), permutations));
    registry.insert(Entry::new("subsets", "Subsets", c, ("O(n·2ⁿ)", "O(n)"), subsets));
}

struct Board {
    n: usize,
    queens: Vec<Option<usize>>,
}

impl Board {
    fn new(n: usize) -> Self {
        Self {
            n,
            queens: vec![None; n],
        }
    }

    /// Flattened row-major grid, 1 where a queen stands.
    fn cells(&self) -> Vec<i64> {
        let mut grid = vec![0; self.n * self.n];
        for (row, col) in self.placed() {
            grid[row * self.n + col] = 1;
        }
        grid
    }

    fn placed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.queens
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| (row, c)))
    }

    fn queen_cells(&self) -> Vec<usize> {
        self.placed().map(|(r, c)| r * self.n + c).collect()
    }

    fn is_safe(&self, row: usize, col: usize) -> bool {
        self.placed()
            .filter(|&(r, _)| r < row)
            .all(|(r, c)| c != col && row - r != col.abs_diff(c))
    }

    fn snapshot(&self, message: String) -> Snapshot {
        Snapshot::new(View::array(&self.cells()), message).annotate("board_size", self.n)
    }
}

/// N-Queens on an `n x n` board; `n` is the seed's target or 4.
fn n_queens(seed: &Seed) -> Result<Trace> {
    let n = seed
        .target()
        .and_then(|t| usize::try_from(t).ok())
        .unwrap_or(4)
        .clamp(1, 8);
    let mut board = Board::new(n);
    let mut rec = Recorder::new("n-queens");

    rec.emit(
        board
            .snapshot(format!("N-Queens: place {n} queens on {n}x{n} board"))
            .at_line(1),
    );

    if place_queen(&mut board, 0, &mut rec) {
        let queens = board.queen_cells();
        rec.emit(
            board
                .snapshot("Solution found!".to_string())
                .mark(Highlight::Found, queens)
                .at_line(8),
        );
    } else {
        rec.emit(
            board
                .snapshot(format!("No solution for {n} queens"))
                .mark(Highlight::Found, [])
                .at_line(8),
        );
    }
    rec.finish()
}

fn place_queen(board: &mut Board, row: usize, rec: &mut Recorder) -> bool {
    if row == board.n {
        return true;
    }
    for col in 0..board.n {
        rec.emit(
            board
                .snapshot(format!("Try placing queen at ({row}, {col})"))
                .mark(Highlight::Comparing, [row * board.n + col])
                .at_line(3),
        );
        if !board.is_safe(row, col) {
            continue;
        }

        board.queens[row] = Some(col);
        let queens = board.queen_cells();
        rec.emit(
            board
                .snapshot(format!("Place queen at ({row}, {col})"))
                .mark(Highlight::Found, queens)
                .at_line(4),
        );
        if place_queen(board, row + 1, rec) {
            return true;
        }

        board.queens[row] = None;
        rec.emit(
            board
                .snapshot(format!("Backtrack: remove queen from ({row}, {col})"))
                .mark(Highlight::Swapping, [row * board.n + col])
                .at_line(6),
        );
    }
    false
}

/// Swap-based permutations of the first four seed values.
fn permutations(seed: &Seed) -> Result<Trace> {
    let mut items = seed.sequence("permutations")?;
    items.truncate(MAX_ITEMS);
    let mut rec = Recorder::new("permutations");
    let mut count = 0;

    rec.emit(
        Snapshot::new(
            View::array(&items),
            format!("Generate permutations of [{}]", join(&items, ",")),
        )
        .at_line(1),
    );
    permute(&mut items, 0, &mut count, &mut rec);
    rec.emit(
        Snapshot::new(View::array(&items), format!("Total permutations: {count}"))
            .annotate("count", count)
            .at_line(9),
    );
    rec.finish()
}

fn permute(items: &mut [i64], start: usize, count: &mut usize, rec: &mut Recorder) {
    if start == items.len() {
        *count += 1;
        rec.emit(
            Snapshot::new(
                View::array(items),
                format!("Permutation {count}: [{}]", join(items, ",")),
            )
            .mark(Highlight::Found, 0..items.len())
            .annotate("count", *count)
            .at_line(3),
        );
        return;
    }
    for i in start..items.len() {
        if i != start {
            items.swap(start, i);
            rec.emit(
                Snapshot::new(View::array(items), format!("Swap positions {start} and {i}"))
                    .mark(Highlight::Swapping, [start, i])
                    .at_line(5),
            );
        }
        permute(items, start + 1, count, rec);
        if i != start {
            items.swap(start, i);
            rec.emit(
                Snapshot::new(
                    View::array(items),
                    format!("Backtrack: swap back {start} and {i}"),
                )
                .mark(Highlight::Swapping, [start, i])
                .at_line(7),
            );
        }
    }
}

/// Include/exclude enumeration of subsets of the first four seed values.
fn subsets(seed: &Seed) -> Result<Trace> {
    let mut items = seed.sequence("subsets")?;
    items.truncate(MAX_ITEMS);
    let mut rec = Recorder::new("subsets");
    let mut chosen = Vec::new();
    let mut count = 0;

    rec.emit(
        Snapshot::new(
            View::array(&items),
            format!("Generate subsets of [{}]", join(&items, ",")),
        )
        .at_line(1),
    );
    extend_subset(&items, 0, &mut chosen, &mut count, &mut rec);
    rec.emit(
        Snapshot::new(View::array(&items), format!("Total subsets: {count}"))
            .annotate("count", count)
            .at_line(9),
    );
    rec.finish()
}

fn extend_subset(
    items: &[i64],
    start: usize,
    chosen: &mut Vec<usize>,
    count: &mut usize,
    rec: &mut Recorder,
) {
    *count += 1;
    let picked: Vec<i64> = chosen.iter().map(|&i| items[i]).collect();
    rec.emit(
        Snapshot::new(
            View::array(items),
            format!("Subset {count}: [{}]", join(&picked, ",")),
        )
        .mark(Highlight::Found, chosen.iter().copied())
        .annotate("count", *count)
        .annotate("subset", picked)
        .at_line(3),
    );

    for i in start..items.len() {
        chosen.push(i);
        rec.emit(
            Snapshot::new(View::array(items), format!("Include {}", items[i]))
                .mark(Highlight::Current, [i])
                .mark(Highlight::Found, chosen.iter().copied())
                .at_line(5),
        );
        extend_subset(items, i + 1, chosen, count, rec);
        chosen.pop();
        rec.emit(
            Snapshot::new(
                View::array(items),
                format!("Exclude {} (backtrack)", items[i]),
            )
            .mark(Highlight::Swapping, [i])
            .mark(Highlight::Found, chosen.iter().copied())
            .at_line(7),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn four_queens_solution() {
        let trace = n_queens(&Seed::from(vec![])).unwrap();
        let last = trace.last();
        assert_eq!(last.message, "Solution found!");
        // (0,1) (1,3) (2,0) (3,2)
        assert_eq!(last.highlighted(Highlight::Found), &[1, 7, 8, 14]);
        assert_eq!(last.view.int_values().unwrap().iter().sum::<i64>(), 4);
    }

    #[test]
    fn three_queens_has_no_solution() {
        let trace = n_queens(&Seed::with_target(vec![], 3)).unwrap();
        assert_eq!(trace.last().message, "No solution for 3 queens");
        assert_eq!(trace.last().highlights.get(Highlight::Found), Some(&[][..]));
    }

    #[test]
    fn permutations_of_three() {
        let trace = permutations(&Seed::from(vec![1, 2, 3])).unwrap();
        assert_eq!(trace.last().message, "Total permutations: 6");
        // swaps are undone, so the final order matches the input
        assert_eq!(trace.last().view, View::array(&[1, 2, 3]));
    }

    #[test]
    fn permutations_cap_at_four_items() {
        let trace = permutations(&Seed::from(vec![1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(trace.last().annotation("count"), Some(&Scalar::Int(24)));
    }

    #[test]
    fn subsets_enumerate_power_set() {
        let trace = subsets(&Seed::from(vec![7, 7, 9])).unwrap();
        assert_eq!(trace.last().message, "Total subsets: 8");
        assert!(trace.iter().any(|s| s.message == "Subset 8: [9]"));
    }

    #[test]
    fn empty_seed_has_one_of_each() {
        let perms = permutations(&Seed::from(vec![])).unwrap();
        assert_eq!(perms.last().message, "Total permutations: 1");
        let sets = subsets(&Seed::from(vec![])).unwrap();
        assert_eq!(sets.last().message, "Total subsets: 1");
    }
}
