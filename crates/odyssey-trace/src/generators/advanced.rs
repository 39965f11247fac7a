//! Disjoint-set union and a sum segment tree.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

use super::{as_value, saturate};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Advanced;
    registry.insert(Entry::new("dsu", "Disjoint Set Union", c, ("O(α(n))", "O(n)"), dsu));
    registry.insert(Entry::new("segment-tree", "Segment Tree", c, ("O(log n)", "O(n)"), segment_tree));
}

const DSU_MAX: usize = 6;
const UNIONS: [(usize, usize); 3] = [(0, 1), (1, 2), (3, 4)];
const FIND_TARGET: usize = 2;
const SEGMENT_MAX: usize = 8;

/// Union by rank with path compression.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<i64>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn view(&self) -> View {
        let parents: Vec<i64> = self.parent.iter().map(|&p| as_value(p)).collect();
        View::array(&parents)
    }

    /// Root of `x`, plus the nodes walked on the way. Every walked node is
    /// re-pointed directly at the root.
    fn find(&mut self, x: usize) -> (usize, Vec<usize>) {
        let mut path = vec![x];
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
            path.push(root);
        }
        for &node in &path {
            self.parent[node] = root;
        }
        (root, path)
    }

    /// Attach the shallower root under the deeper one. Returns the root that
    /// moved, or `None` if `x` and `y` were already connected.
    fn union(&mut self, x: usize, y: usize) -> Option<(usize, usize)> {
        let (rx, _) = self.find(x);
        let (ry, _) = self.find(y);
        if rx == ry {
            return None;
        }
        let (child, parent) = if self.rank[rx] < self.rank[ry] {
            (rx, ry)
        } else {
            (ry, rx)
        };
        self.parent[child] = parent;
        if self.rank[rx] == self.rank[ry] {
            self.rank[parent] += 1;
        }
        Some((child, parent))
    }

    fn components(&mut self) -> usize {
        let n = self.parent.len();
        (0..n).filter(|&i| self.find(i).0 == i).count()
    }
}

/// Union-find over the first six seed positions. The view is the parent array.
fn dsu(seed: &Seed) -> Result<Trace> {
    let n = seed.sequence("dsu")?.len().min(DSU_MAX);
    let mut set = DisjointSet::new(n);
    let mut rec = Recorder::new("dsu");

    rec.emit(
        Snapshot::new(
            set.view(),
            format!("Union-Find: {n} elements, each is its own parent"),
        )
        .annotate("rank", set.rank.clone())
        .at_line(1),
    );

    for (x, y) in UNIONS {
        if x >= n || y >= n {
            rec.emit(
                Snapshot::new(
                    set.view(),
                    format!("Union({x}, {y}) skipped: only {n} elements"),
                )
                .at_line(2),
            );
            continue;
        }
        let snap = match set.union(x, y) {
            Some((child, parent)) => Snapshot::new(
                set.view(),
                format!("Union({x}, {y}): parent[{child}] = {parent}"),
            )
            .mark(Highlight::Comparing, [x, y])
            .mark(Highlight::Swapping, [child]),
            None => Snapshot::new(
                set.view(),
                format!("Union({x}, {y}): already in the same set"),
            )
            .mark(Highlight::Comparing, [x, y]),
        };
        rec.emit(snap.annotate("rank", set.rank.clone()).at_line(3));
    }

    if FIND_TARGET < n {
        rec.emit(
            Snapshot::new(
                set.view(),
                format!("Find({FIND_TARGET}) with path compression"),
            )
            .mark(Highlight::Current, [FIND_TARGET])
            .at_line(5),
        );
        let (root, path) = set.find(FIND_TARGET);
        rec.emit(
            Snapshot::new(
                set.view(),
                format!(
                    "Find({FIND_TARGET}) = {root}, path [{}] now points at the root",
                    join(&path, " → ")
                ),
            )
            .mark(Highlight::Visited, path)
            .mark(Highlight::Found, [root])
            .at_line(6),
        );
    }

    let components = set.components();
    let roots: Vec<usize> = (0..n).filter(|&i| set.parent[i] == i).collect();
    rec.emit(
        Snapshot::new(
            set.view(),
            format!("DSU complete! {components} component(s)"),
        )
        .mark(Highlight::Found, roots)
        .annotate("components", components)
        .annotate("rank", set.rank.clone())
        .at_line(7),
    );
    rec.finish()
}

/// Bottom-up sum tree over `2n` slots: leaves at `n..2n`, node `i` sums
/// `2i` and `2i + 1`. Slot 0 is unused, so the view shows slots `1..2n`.
/// Sums are kept in `i128` and saturated only for display.
struct SegmentTree {
    n: usize,
    slots: Vec<i128>,
}

impl SegmentTree {
    fn with_leaves(values: &[i64]) -> Self {
        let n = values.len();
        let mut slots = vec![0; n];
        slots.extend(values.iter().map(|&v| i128::from(v)));
        Self { n, slots }
    }

    fn view(&self) -> View {
        let shown: Vec<i64> = self.slots.iter().skip(1).map(|&v| saturate(v)).collect();
        View::array(&shown)
    }

    /// View position of slot `i`.
    fn cell(i: usize) -> usize {
        i - 1
    }
}

/// Build over the first eight seed values, then answer a sum query on `[1, 3]`.
fn segment_tree(seed: &Seed) -> Result<Trace> {
    let mut nums = seed.sequence("segment-tree")?;
    nums.truncate(SEGMENT_MAX);
    let mut tree = SegmentTree::with_leaves(&nums);
    let n = tree.n;
    let mut rec = Recorder::new("segment-tree");

    rec.emit(
        Snapshot::new(
            View::array(&nums),
            format!("Segment Tree: build for range sum queries over [{}]", join(&nums, ", ")),
        )
        .at_line(1),
    );

    if n == 0 {
        rec.emit(
            Snapshot::new(tree.view(), "Nothing to build: the input is empty")
                .mark(Highlight::Found, [])
                .at_line(7),
        );
        return rec.finish();
    }

    rec.emit(
        Snapshot::new(tree.view(), format!("Place {n} leaves at slots {n}..{}", 2 * n - 1))
            .mark(Highlight::Swapping, (n..2 * n).map(SegmentTree::cell))
            .at_line(2),
    );

    for i in (1..n).rev() {
        tree.slots[i] = tree.slots[2 * i] + tree.slots[2 * i + 1];
        rec.emit(
            Snapshot::new(
                tree.view(),
                format!(
                    "tree[{i}] = tree[{}] + tree[{}] = {}",
                    2 * i,
                    2 * i + 1,
                    tree.slots[i]
                ),
            )
            .mark(Highlight::Comparing, [SegmentTree::cell(2 * i), SegmentTree::cell(2 * i + 1)])
            .mark(Highlight::Swapping, [SegmentTree::cell(i)])
            .at_line(3),
        );
    }

    let root = if n > 1 { 1 } else { n };
    rec.emit(
        Snapshot::new(
            tree.view(),
            format!("Tree built. Root = {} (total sum)", tree.slots[root]),
        )
        .mark(Highlight::Found, [SegmentTree::cell(root)])
        .at_line(4),
    );

    let (l, r) = (1, 3.min(n - 1));
    if l <= r {
        let mut sum = 0i128;
        let mut used = Vec::new();
        let (mut lo, mut hi) = (l + n, r + 1 + n);
        while lo < hi {
            if lo & 1 == 1 {
                sum += tree.slots[lo];
                used.push(SegmentTree::cell(lo));
                lo += 1;
            }
            if hi & 1 == 1 {
                hi -= 1;
                sum += tree.slots[hi];
                used.push(SegmentTree::cell(hi));
            }
            lo >>= 1;
            hi >>= 1;
            rec.emit(
                Snapshot::new(tree.view(), format!("Query sum[{l}..{r}]: running sum = {sum}"))
                    .mark(Highlight::Visited, used.iter().copied())
                    .annotate("sum", saturate(sum))
                    .at_line(5),
            );
        }
        rec.emit(
            Snapshot::new(
                tree.view(),
                format!("Query sum[{l}..{r}] = {sum} using {} node(s)", used.len()),
            )
            .mark(Highlight::Found, used)
            .annotate("sum", saturate(sum))
            .at_line(6),
        );
    }

    rec.emit(
        Snapshot::new(tree.view(), "Segment Tree: O(log n) query, O(log n) update")
            .mark(Highlight::Sorted, 0..tree.view().len())
            .at_line(7),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn dsu_unions_by_rank() {
        let trace = dsu(&Seed::from(vec![1, 2, 3, 4, 5, 6, 7])).unwrap();
        assert_eq!(trace.last().view, View::array(&[0, 0, 0, 3, 3, 5]));
        assert_eq!(trace.last().message, "DSU complete! 3 component(s)");
        assert_eq!(trace.last().highlighted(Highlight::Found), &[0, 3, 5]);
    }

    #[test]
    fn dsu_skips_out_of_range_unions() {
        let trace = dsu(&Seed::from(vec![1, 2])).unwrap();
        assert!(trace.iter().any(|s| s.message == "Union(1, 2) skipped: only 2 elements"));
        assert_eq!(trace.last().annotation("components"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn segment_tree_sums_range() {
        let trace = segment_tree(&Seed::from(vec![5, 3, 8, 1, 9, 2])).unwrap();
        let answer = trace
            .iter()
            .find(|s| s.message.starts_with("Query sum[1..3] ="))
            .unwrap();
        assert_eq!(answer.annotation("sum"), Some(&Scalar::Int(12)));
        assert!(trace.iter().any(|s| s.message == "Tree built. Root = 28 (total sum)"));
    }

    #[test]
    fn segment_tree_sums_extreme_values() {
        let trace = segment_tree(&Seed::from(vec![i64::MAX, i64::MAX, i64::MIN])).unwrap();
        let root = format!("Tree built. Root = {} (total sum)", i64::MAX - 1);
        assert!(trace.iter().any(|s| s.message == root));
        let answer = trace
            .iter()
            .find(|s| s.message.starts_with("Query sum[1..2] ="))
            .unwrap();
        assert_eq!(answer.annotation("sum"), Some(&Scalar::Int(-1)));

        // Internal sums past i64 are shown clamped.
        let trace = segment_tree(&Seed::from(vec![i64::MAX, i64::MAX])).unwrap();
        assert_eq!(trace.last().view, View::array(&[i64::MAX, i64::MAX, i64::MAX]));
    }

    #[test]
    fn segment_tree_tiny_inputs() {
        let empty = segment_tree(&Seed::from(vec![])).unwrap();
        assert_eq!(empty.len(), 2);

        let single = segment_tree(&Seed::from(vec![7])).unwrap();
        assert!(single.iter().any(|s| s.message == "Tree built. Root = 7 (total sum)"));
        assert!(!single.iter().any(|s| s.message.starts_with("Query")));
    }
}
