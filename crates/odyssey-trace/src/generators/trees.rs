//! Binary tree traversals and search trees.
//!
//! Trees are array-encoded: children of slot `i` live at `2i + 1` and `2i + 2`,
//! and `None` is a hole. A hole's subtree is never visited even if the array
//! holds values under it.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::{Seed, MAX_TREE_NODES};
use crate::snapshot::{join, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Trees;
    registry.insert(Entry::new("inorder-traversal", "Inorder Traversal", c, ("O(n)", "O(h)"), inorder));
    registry.insert(Entry::new("preorder-traversal", "Preorder Traversal", c, ("O(n)", "O(h)"), preorder));
    registry.insert(Entry::new("postorder-traversal", "Postorder Traversal", c, ("O(n)", "O(h)"), postorder));
    registry.insert(Entry::new(
        "level-order-traversal",
        "Level Order Traversal",
        c,
        ("O(n)", "O(w)"),
        level_order,
    ));
    registry.insert(Entry::new("bst-impl", "Binary Search Tree", c, ("O(h)", "O(n)"), bst));
    registry.insert(Entry::new("tree-height", "Tree Height", c, ("O(n)", "O(h)"), tree_height));
    registry.insert(Entry::new("avl-tree", "AVL Tree", c, ("O(log n)", "O(n)"), avl));
}

/// Values inserted by the search-tree generators.
const MAX_INSERTS: usize = 10;

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

fn value_at(nodes: &[Option<i64>], i: usize) -> Option<i64> {
    nodes.get(i).copied().flatten()
}

#[derive(Clone, Copy)]
enum Order {
    In,
    Pre,
    Post,
}

impl Order {
    fn id(self) -> &'static str {
        match self {
            Order::In => "inorder-traversal",
            Order::Pre => "preorder-traversal",
            Order::Post => "postorder-traversal",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Order::In => "Inorder",
            Order::Pre => "Preorder",
            Order::Post => "Postorder",
        }
    }

    fn rule(self) -> &'static str {
        match self {
            Order::In => "Left -> Root -> Right",
            Order::Pre => "Root -> Left -> Right",
            Order::Post => "Left -> Right -> Root",
        }
    }
}

/// Accumulated state of a depth-first traversal.
struct Walk<'a> {
    nodes: &'a [Option<i64>],
    order: Order,
    visited: Vec<usize>,
    values: Vec<i64>,
}

impl Walk<'_> {
    fn traverse(&mut self, i: usize, rec: &mut Recorder) {
        if value_at(self.nodes, i).is_none() {
            return;
        }
        if matches!(self.order, Order::Pre) {
            self.visit(i, rec);
        }
        self.traverse(left(i), rec);
        if matches!(self.order, Order::In) {
            self.visit(i, rec);
        }
        self.traverse(right(i), rec);
        if matches!(self.order, Order::Post) {
            self.visit(i, rec);
        }
    }

    fn visit(&mut self, i: usize, rec: &mut Recorder) {
        let Some(value) = value_at(self.nodes, i) else {
            return;
        };
        self.visited.push(i);
        self.values.push(value);
        rec.emit(
            Snapshot::new(View::tree(self.nodes.to_vec()), format!("Visit Node {value}"))
                .mark(Highlight::Visited, self.visited.iter().copied())
                .mark(Highlight::Current, [i])
                .annotate("order", self.values.clone())
                .at_line(2),
        );
    }
}

fn depth_first(seed: &Seed, order: Order) -> Result<Trace> {
    let nodes = seed.tree(order.id())?;
    let mut rec = Recorder::new(order.id());

    rec.emit(
        Snapshot::new(
            View::tree(nodes.clone()),
            format!("{} Traversal: {}", order.title(), order.rule()),
        )
        .at_line(1),
    );

    let mut walk = Walk {
        nodes: &nodes,
        order,
        visited: Vec::new(),
        values: Vec::new(),
    };
    walk.traverse(0, &mut rec);

    rec.emit(
        Snapshot::new(
            View::tree(nodes.clone()),
            format!("{} complete: [{}]", order.title(), join(&walk.values, ", ")),
        )
        .mark(Highlight::Visited, walk.visited.iter().copied())
        .annotate("order", walk.values.clone())
        .at_line(4),
    );
    rec.finish()
}

fn inorder(seed: &Seed) -> Result<Trace> {
    depth_first(seed, Order::In)
}

fn preorder(seed: &Seed) -> Result<Trace> {
    depth_first(seed, Order::Pre)
}

fn postorder(seed: &Seed) -> Result<Trace> {
    depth_first(seed, Order::Post)
}

/// Breadth-first over present nodes; the queue is the frontier.
fn level_order(seed: &Seed) -> Result<Trace> {
    let nodes = seed.tree("level-order-traversal")?;
    let mut rec = Recorder::new("level-order-traversal");

    rec.emit(
        Snapshot::new(
            View::tree(nodes.clone()),
            "Level Order (BFS): Visit nodes level by level",
        )
        .at_line(1),
    );

    let mut queue: VecDeque<usize> = VecDeque::new();
    if value_at(&nodes, 0).is_some() {
        queue.push_back(0);
    }
    let mut visited = Vec::new();
    let mut values = Vec::new();

    while let Some(i) = queue.pop_front() {
        let Some(value) = value_at(&nodes, i) else {
            continue;
        };
        visited.push(i);
        values.push(value);
        for child in [left(i), right(i)] {
            if value_at(&nodes, child).is_some() {
                queue.push_back(child);
            }
        }
        rec.emit(
            Snapshot::new(View::tree(nodes.clone()), format!("Visit node {value}"))
                .mark(Highlight::Visited, visited.iter().copied())
                .mark(Highlight::Current, [i])
                .mark(Highlight::Frontier, queue.iter().copied())
                .annotate("order", values.clone())
                .at_line(3),
        );
    }

    rec.emit(
        Snapshot::new(
            View::tree(nodes.clone()),
            format!("Level order complete: [{}]", join(&values, ", ")),
        )
        .mark(Highlight::Visited, visited)
        .mark(Highlight::Frontier, [])
        .annotate("order", values)
        .at_line(5),
    );
    rec.finish()
}

/// Present values of a tree or sequence seed, capped for insertion demos.
fn insert_values(seed: &Seed, algorithm: &'static str) -> Result<Vec<i64>> {
    let values: Vec<i64> = seed.tree(algorithm)?.into_iter().flatten().collect();
    Ok(values.into_iter().take(MAX_INSERTS).collect())
}

/// Unbalanced BST laid out directly in 31 array slots. Equal keys go right.
fn bst(seed: &Seed) -> Result<Trace> {
    let values = insert_values(seed, "bst-impl")?;
    let mut slots: Vec<Option<i64>> = vec![None; MAX_TREE_NODES];
    let mut rec = Recorder::new("bst-impl");

    rec.emit(
        Snapshot::new(
            View::tree(slots.clone()),
            format!("Building BST from [{}]", join(&values, ", ")),
        )
        .at_line(1),
    );

    for value in values {
        let mut at = 0;
        loop {
            let Some(slot) = slots.get(at).copied() else {
                rec.emit(
                    Snapshot::new(
                        View::tree(slots.clone()),
                        format!("No room for {value}: the tree is too deep, skipped"),
                    )
                    .at_line(4),
                );
                break;
            };
            let Some(existing) = slot else {
                slots[at] = Some(value);
                rec.emit(
                    Snapshot::new(
                        View::tree(slots.clone()),
                        format!("Inserted {value} at index {at}"),
                    )
                    .mark(Highlight::Swapping, [at])
                    .at_line(3),
                );
                break;
            };
            let (side, next) = if value < existing {
                ("left", left(at))
            } else {
                ("right", right(at))
            };
            rec.emit(
                Snapshot::new(
                    View::tree(slots.clone()),
                    format!("{value} vs {existing}: go {side}"),
                )
                .mark(Highlight::Comparing, [at])
                .at_line(2),
            );
            at = next;
        }
    }

    let occupied: Vec<usize> = (0..slots.len()).filter(|&i| slots[i].is_some()).collect();
    let mut sorted = Vec::new();
    collect_inorder(&slots, 0, &mut sorted);
    rec.emit(
        Snapshot::new(
            View::tree(slots.clone()),
            format!("BST built! Inorder: [{}]", join(&sorted, ", ")),
        )
        .mark(Highlight::Found, occupied)
        .annotate("inorder", sorted)
        .at_line(5),
    );
    rec.finish()
}

fn collect_inorder(nodes: &[Option<i64>], i: usize, out: &mut Vec<i64>) {
    let Some(value) = value_at(nodes, i) else {
        return;
    };
    collect_inorder(nodes, left(i), out);
    out.push(value);
    collect_inorder(nodes, right(i), out);
}

/// Height by post-order recursion; an empty tree has height 0.
fn tree_height(seed: &Seed) -> Result<Trace> {
    let nodes = seed.tree("tree-height")?;
    let mut rec = Recorder::new("tree-height");
    let count = nodes.iter().flatten().count();

    rec.emit(
        Snapshot::new(
            View::tree(nodes.clone()),
            format!("Tree Height Calculation. Nodes: {count}"),
        )
        .at_line(1),
    );

    let mut done = Vec::new();
    let height = measure(&nodes, 0, &mut done, &mut rec);

    rec.emit(
        Snapshot::new(View::tree(nodes.clone()), format!("Tree height = {height}"))
            .mark(Highlight::Visited, done)
            .mark(Highlight::Found, value_at(&nodes, 0).map(|_| 0))
            .annotate("height", height)
            .at_line(5),
    );
    rec.finish()
}

fn measure(nodes: &[Option<i64>], i: usize, done: &mut Vec<usize>, rec: &mut Recorder) -> i64 {
    let Some(value) = value_at(nodes, i) else {
        return 0;
    };
    let lh = measure(nodes, left(i), done, rec);
    let rh = measure(nodes, right(i), done, rec);
    let height = 1 + lh.max(rh);
    done.push(i);
    rec.emit(
        Snapshot::new(
            View::tree(nodes.to_vec()),
            format!("height({value}) = 1 + max({lh}, {rh}) = {height}"),
        )
        .mark(Highlight::Visited, done.iter().copied())
        .mark(Highlight::Current, [i])
        .annotate("height", height)
        .at_line(3),
    );
    height
}

struct AvlNode {
    value: i64,
    left: Option<usize>,
    right: Option<usize>,
    height: i64,
}

/// Arena-backed AVL tree.
struct Avl {
    nodes: Vec<AvlNode>,
    root: Option<usize>,
}

impl Avl {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    fn height(&self, at: Option<usize>) -> i64 {
        at.map_or(0, |i| self.nodes[i].height)
    }

    fn balance(&self, i: usize) -> i64 {
        self.height(self.nodes[i].left) - self.height(self.nodes[i].right)
    }

    fn refresh(&mut self, i: usize) {
        let node = &self.nodes[i];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self.nodes[i].height = height;
    }

    fn rotate_right(&mut self, y: usize) -> usize {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        self.nodes[y].left = self.nodes[x].right;
        self.nodes[x].right = Some(y);
        self.refresh(y);
        self.refresh(x);
        x
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        self.nodes[x].right = self.nodes[y].left;
        self.nodes[y].left = Some(x);
        self.refresh(x);
        self.refresh(y);
        y
    }

    /// Breadth-first layout into the array encoding, plus each node's slot.
    fn layout(&self) -> (Vec<Option<i64>>, Vec<Option<usize>>) {
        let mut slots = vec![None; MAX_TREE_NODES];
        let mut slot_of = vec![None; self.nodes.len()];
        let mut queue: VecDeque<(usize, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, at)) = queue.pop_front() {
            if at >= MAX_TREE_NODES {
                continue;
            }
            slots[at] = Some(self.nodes[id].value);
            slot_of[id] = Some(at);
            if let Some(l) = self.nodes[id].left {
                queue.push_back((l, left(at)));
            }
            if let Some(r) = self.nodes[id].right {
                queue.push_back((r, right(at)));
            }
        }
        (slots, slot_of)
    }

    fn snapshot(&self, message: String, focus: usize) -> Snapshot {
        let (slots, slot_of) = self.layout();
        let focus: Vec<usize> = slot_of.get(focus).copied().flatten().into_iter().collect();
        Snapshot::new(View::tree(slots), message).mark(Highlight::Current, focus)
    }

    /// Insert below `at`, returning the new subtree root. Rotations are
    /// recorded against the tree as it stands before the rotation.
    fn insert(&mut self, at: Option<usize>, value: i64, rec: &mut Recorder) -> usize {
        let Some(i) = at else {
            self.nodes.push(AvlNode {
                value,
                left: None,
                right: None,
                height: 1,
            });
            return self.nodes.len() - 1;
        };
        match value.cmp(&self.nodes[i].value) {
            Ordering::Less => {
                let child = self.insert(self.nodes[i].left, value, rec);
                self.nodes[i].left = Some(child);
            }
            Ordering::Greater => {
                let child = self.insert(self.nodes[i].right, value, rec);
                self.nodes[i].right = Some(child);
            }
            Ordering::Equal => return i,
        }
        self.refresh(i);

        let balance = self.balance(i);
        let pivot = self.nodes[i].value;
        if balance > 1 {
            let Some(l) = self.nodes[i].left else {
                return i;
            };
            let child = self.nodes[l].value;
            let message = if value < child {
                format!("Imbalance at {pivot} (Bal: {balance}). Performing Right Rotate.")
            } else {
                format!("Imbalance at {pivot} (Bal: {balance}). Left Rotate {child}, then Right Rotate.")
            };
            rec.emit(self.snapshot(message, i).annotate("balance", balance).at_line(4));
            if value > child {
                let rotated = self.rotate_left(l);
                self.nodes[i].left = Some(rotated);
            }
            return self.rotate_right(i);
        }
        if balance < -1 {
            let Some(r) = self.nodes[i].right else {
                return i;
            };
            let child = self.nodes[r].value;
            let message = if value > child {
                format!("Imbalance at {pivot} (Bal: {balance}). Performing Left Rotate.")
            } else {
                format!("Imbalance at {pivot} (Bal: {balance}). Right Rotate {child}, then Left Rotate.")
            };
            rec.emit(self.snapshot(message, i).annotate("balance", balance).at_line(4));
            if value < child {
                let rotated = self.rotate_right(r);
                self.nodes[i].right = Some(rotated);
            }
            return self.rotate_left(i);
        }
        i
    }
}

/// Self-balancing inserts of up to ten seed values. Duplicates are ignored.
fn avl(seed: &Seed) -> Result<Trace> {
    let values = insert_values(seed, "avl-tree")?;
    let mut tree = Avl::new();
    let mut rec = Recorder::new("avl-tree");

    rec.emit(
        Snapshot::new(
            View::tree(vec![None; MAX_TREE_NODES]),
            format!("AVL Tree Insertion: [{}]", join(&values, ", ")),
        )
        .at_line(1),
    );

    for value in values {
        let before = tree.nodes.len();
        let root = tree.insert(tree.root, value, &mut rec);
        tree.root = Some(root);
        if tree.nodes.len() == before {
            rec.emit(tree.snapshot(format!("{value} already present, skipped"), root).at_line(2));
            continue;
        }
        let (slots, slot_of) = tree.layout();
        let placed: Vec<usize> = slot_of[before].into_iter().collect();
        rec.emit(
            Snapshot::new(View::tree(slots), format!("Inserted {value}. Tree balanced."))
                .mark(Highlight::Swapping, placed)
                .annotate("height", tree.height(tree.root))
                .at_line(2),
        );
    }

    let (slots, _) = tree.layout();
    let occupied: Vec<usize> = (0..slots.len()).filter(|&i| slots[i].is_some()).collect();
    rec.emit(
        Snapshot::new(
            View::tree(slots),
            format!("AVL tree complete. Height: {}", tree.height(tree.root)),
        )
        .mark(Highlight::Found, occupied)
        .annotate("height", tree.height(tree.root))
        .at_line(6),
    );
    rec.finish()
}
