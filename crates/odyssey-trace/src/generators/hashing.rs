//! Hash tables: open addressing with linear probing, and separate chaining.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Hashing;
    registry.insert(Entry::new("linear-probing", "Linear Probing", c, ("O(1) avg", "O(n)"), linear_probing));
    registry.insert(Entry::new("hash-table", "Hash Table (Chaining)", c, ("O(1) avg", "O(n)"), chaining));
}

const TABLE_SIZE: usize = 7;
const PROBING_KEYS: usize = 6;
const CHAINING_KEYS: usize = 10;

/// `|key mod size|`, with the remainder truncated toward zero.
fn bucket_of(key: i64) -> usize {
    ((key % TABLE_SIZE as i64).unsigned_abs()) as usize
}

fn probe_view(table: &[Option<i64>]) -> View {
    View::buckets(table.iter().map(|slot| slot.iter().copied().collect()).collect())
}

fn linear_probing(seed: &Seed) -> Result<Trace> {
    let mut keys = seed.sequence("linear-probing")?;
    keys.truncate(PROBING_KEYS);
    let mut table: Vec<Option<i64>> = vec![None; TABLE_SIZE];
    let mut rec = Recorder::new("linear-probing");

    rec.emit(
        Snapshot::new(
            probe_view(&table),
            format!("Linear Probing Hash Table. Size: {TABLE_SIZE}"),
        )
        .at_line(1),
    );

    for key in keys {
        let home = bucket_of(key);
        rec.emit(
            Snapshot::new(
                probe_view(&table),
                format!("Attempting to insert {key} at index {home} ({key} % {TABLE_SIZE})"),
            )
            .mark(Highlight::Current, [home])
            .annotate("key", key)
            .annotate("hash", home)
            .at_line(2),
        );

        let mut at = home;
        let mut probes = 0;
        while table[at].is_some() && probes < TABLE_SIZE {
            probes += 1;
            let taken = at;
            at = (at + 1) % TABLE_SIZE;
            rec.emit(
                Snapshot::new(
                    probe_view(&table),
                    format!("Collision at index {taken}! Probing next index: {at}"),
                )
                .mark(Highlight::Comparing, [taken])
                .mark(Highlight::Current, [at])
                .annotate("key", key)
                .annotate("probes", probes)
                .at_line(3),
            );
        }

        if table[at].is_none() {
            table[at] = Some(key);
            rec.emit(
                Snapshot::new(probe_view(&table), format!("Inserted {key} at index {at}"))
                    .mark(Highlight::Swapping, [at])
                    .annotate("key", key)
                    .annotate("probes", probes)
                    .at_line(4),
            );
        } else {
            rec.emit(
                Snapshot::new(
                    probe_view(&table),
                    format!("Table full, cannot insert {key}"),
                )
                .mark(Highlight::Found, [])
                .annotate("key", key)
                .at_line(5),
            );
        }
    }

    let filled: Vec<usize> = (0..TABLE_SIZE).filter(|&i| table[i].is_some()).collect();
    rec.emit(
        Snapshot::new(probe_view(&table), "Linear Probing insertion complete.")
            .mark(Highlight::Found, filled.iter().copied())
            .annotate("size", filled.len())
            .at_line(6),
    );
    rec.finish()
}

fn chaining(seed: &Seed) -> Result<Trace> {
    let mut keys = seed.sequence("hash-table")?;
    keys.truncate(CHAINING_KEYS);
    let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); TABLE_SIZE];
    let mut rec = Recorder::new("hash-table");

    rec.emit(
        Snapshot::new(
            View::buckets(buckets.clone()),
            "Building Hash Table (Chaining)",
        )
        .at_line(1),
    );

    for key in &keys {
        let hash = bucket_of(*key);
        buckets[hash].push(*key);
        rec.emit(
            Snapshot::new(
                View::buckets(buckets.clone()),
                format!("Insert key {key} → Hash: {key} % {TABLE_SIZE} = {hash}"),
            )
            .mark(Highlight::Swapping, [hash])
            .annotate("key", *key)
            .annotate("chain_length", buckets[hash].len())
            .at_line(3),
        );
    }

    let longest = buckets.iter().map(Vec::len).max().unwrap_or(0);
    let crowded: Vec<usize> = (0..TABLE_SIZE)
        .filter(|&i| longest > 0 && buckets[i].len() == longest)
        .collect();
    rec.emit(
        Snapshot::new(
            View::buckets(buckets),
            format!(
                "Hash table built: {} keys in {TABLE_SIZE} buckets, longest chain {longest}",
                keys.len()
            ),
        )
        .mark(Highlight::Found, crowded)
        .annotate("load_factor", format!("{}/{TABLE_SIZE}", keys.len()))
        .at_line(5),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_keys_hash_like_truncated_remainder() {
        assert_eq!(bucket_of(-3), 3);
        assert_eq!(bucket_of(15), 1);
    }

    #[test]
    fn probing_resolves_collisions() {
        let trace = linear_probing(&Seed::from(vec![10, 3, 17])).unwrap();
        // 10 and 3 and 17 all hash to 3
        assert_eq!(
            trace.last().view,
            View::buckets(vec![
                vec![],
                vec![],
                vec![],
                vec![10],
                vec![3],
                vec![17],
                vec![]
            ])
        );
        assert_eq!(
            trace.iter().filter(|s| s.message.starts_with("Collision")).count(),
            3
        );
    }

    #[test]
    fn probing_wraps_around() {
        let trace = linear_probing(&Seed::from(vec![6, 13])).unwrap();
        assert!(trace.iter().any(|s| s.message == "Inserted 13 at index 0"));
    }

    #[test]
    fn chaining_keeps_insertion_order() {
        let trace = chaining(&Seed::from(vec![7, 14, 1, 21])).unwrap();
        let View::Buckets { buckets } = &trace.last().view else {
            panic!("expected buckets view");
        };
        assert_eq!(buckets[0], vec![7, 14, 21]);
        assert_eq!(buckets[1], vec![1]);
        assert_eq!(trace.last().highlighted(Highlight::Found), &[0]);
    }

    #[test]
    fn chaining_caps_keys() {
        let trace = chaining(&Seed::from((1..=20).collect::<Vec<_>>())).unwrap();
        // intro + ten inserts + summary
        assert_eq!(trace.len(), 12);
    }
}
