//! Bit manipulation. Views show one binary digit per cell, most significant first.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::BitManipulation;
    registry.insert(Entry::new("bit-basics", "Bit Manipulation Basics", c, ("O(1)", "O(1)"), bit_basics));
    registry.insert(Entry::new("xor-tricks", "XOR Tricks", c, ("O(n)", "O(1)"), xor_tricks));
}

const DEFAULT_NUMBER: i64 = 42;
const XOR_VALUES: [i64; 5] = [2, 3, 2, 4, 3];

/// Fixed-width binary digits of a non-negative value.
struct Bits {
    width: usize,
}

impl Bits {
    /// Wide enough for every value derived from `n` below (at least one byte).
    fn for_value(n: i64) -> Self {
        let widest = (n | 0b111).max(0);
        let used = 64 - widest.leading_zeros() as usize;
        Self { width: used.max(8) }
    }

    fn digits(&self, value: i64) -> Vec<i64> {
        (0..self.width).rev().map(|k| (value >> k) & 1).collect()
    }

    fn view(&self, value: i64) -> View {
        View::array(&self.digits(value))
    }

    /// Cell index of bit `k`.
    fn cell(&self, k: usize) -> usize {
        self.width - 1 - k
    }

    fn set_cells(&self, value: i64) -> Vec<usize> {
        (0..self.width)
            .filter(|&k| (value >> k) & 1 == 1)
            .map(|k| self.cell(k))
            .collect()
    }

    fn binary(&self, value: i64) -> String {
        format!("{value:0width$b}", width = self.width)
    }
}

/// Set, clear, toggle and test single bits of the first positive seed value
/// (or 42), then count set bits with Kernighan's trick.
fn bit_basics(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("bit-basics")?;
    let num = values
        .first()
        .copied()
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_NUMBER);
    let bits = Bits::for_value(num);
    let mut rec = Recorder::new("bit-basics");

    rec.emit(
        Snapshot::new(
            bits.view(num),
            format!("Bit operations on {num} (binary: {})", bits.binary(num)),
        )
        .mark(Highlight::Found, bits.set_cells(num))
        .annotate("value", num)
        .at_line(1),
    );

    let set = num | 1;
    rec.emit(
        Snapshot::new(bits.view(set), format!("Set bit 0: {num} | 1 = {set}"))
            .mark(Highlight::Swapping, [bits.cell(0)])
            .annotate("value", set)
            .at_line(2),
    );

    let cleared = num & !(1 << 1);
    rec.emit(
        Snapshot::new(bits.view(cleared), format!("Clear bit 1: {num} & ~2 = {cleared}"))
            .mark(Highlight::Swapping, [bits.cell(1)])
            .annotate("value", cleared)
            .at_line(3),
    );

    let toggled = num ^ (1 << 2);
    rec.emit(
        Snapshot::new(bits.view(toggled), format!("Toggle bit 2: {num} ^ 4 = {toggled}"))
            .mark(Highlight::Swapping, [bits.cell(2)])
            .annotate("value", toggled)
            .at_line(4),
    );

    let bit3 = (num >> 3) & 1;
    rec.emit(
        Snapshot::new(bits.view(num), format!("Check bit 3: ({num} >> 3) & 1 = {bit3}"))
            .mark(Highlight::Comparing, [bits.cell(3)])
            .annotate("value", num)
            .at_line(5),
    );

    let power_of_two = num & (num - 1) == 0;
    rec.emit(
        Snapshot::new(
            bits.view(num & (num - 1)),
            format!(
                "Power of two? {num} & {} = {} → {}",
                num - 1,
                num & (num - 1),
                if power_of_two { "yes" } else { "no" }
            ),
        )
        .annotate("value", num & (num - 1))
        .at_line(6),
    );

    let mut rest = num;
    let mut count: i64 = 0;
    while rest != 0 {
        let lowest = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        count += 1;
        rec.emit(
            Snapshot::new(
                bits.view(rest),
                format!("n & (n - 1) clears bit {lowest}: {}, count = {count}", bits.binary(rest)),
            )
            .mark(Highlight::Swapping, [bits.cell(lowest)])
            .annotate("count", count)
            .at_line(7),
        );
    }

    rec.emit(
        Snapshot::new(
            bits.view(num),
            format!("Count bits: {num} has {count} set bits"),
        )
        .mark(Highlight::Found, bits.set_cells(num))
        .annotate("count", count)
        .at_line(8),
    );
    rec.finish()
}

/// XOR every value together; paired values cancel, leaving the single one.
fn xor_tricks(_seed: &Seed) -> Result<Trace> {
    let nums = XOR_VALUES;
    let mut rec = Recorder::new("xor-tricks");

    rec.emit(
        Snapshot::new(
            View::array(&nums),
            format!("Find single number using XOR: [{}]", join(&nums, ", ")),
        )
        .at_line(1),
    );

    let mut xor = 0;
    for (i, &value) in nums.iter().enumerate() {
        xor ^= value;
        rec.emit(
            Snapshot::new(View::array(&nums), format!("XOR with {value}: result = {xor}"))
                .mark(Highlight::Current, [i])
                .mark(Highlight::Visited, 0..=i)
                .annotate("xor", xor)
                .at_line(3),
        );
    }

    let single: Vec<usize> = nums
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == xor)
        .map(|(i, _)| i)
        .collect();
    rec.emit(
        Snapshot::new(
            View::array(&nums),
            format!("Single number = {xor} (XOR of pairs = 0)"),
        )
        .mark(Highlight::Found, single)
        .annotate("xor", xor)
        .at_line(5),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn default_number_is_forty_two() {
        let trace = bit_basics(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.first().message, "Bit operations on 42 (binary: 00101010)");
        assert_eq!(trace.first().view, View::array(&[0, 0, 1, 0, 1, 0, 1, 0]));
        assert_eq!(trace.last().message, "Count bits: 42 has 3 set bits");
    }

    #[test]
    fn single_bit_operations() {
        let trace = bit_basics(&Seed::from(vec![42])).unwrap();
        let messages: Vec<&str> = trace.iter().map(|s| s.message.as_str()).collect();
        assert!(messages.contains(&"Set bit 0: 42 | 1 = 43"));
        assert!(messages.contains(&"Clear bit 1: 42 & ~2 = 40"));
        assert!(messages.contains(&"Toggle bit 2: 42 ^ 4 = 46"));
        assert!(messages.contains(&"Check bit 3: (42 >> 3) & 1 = 1"));
    }

    #[test]
    fn wide_values_grow_the_view() {
        let trace = bit_basics(&Seed::from(vec![1000])).unwrap();
        assert_eq!(trace.first().view.len(), 10);
        assert_eq!(trace.last().annotation("count"), Some(&Scalar::Int(6)));
    }

    #[test]
    fn power_of_two_detected() {
        let trace = bit_basics(&Seed::from(vec![64])).unwrap();
        assert!(trace.iter().any(|s| s.message == "Power of two? 64 & 63 = 0 → yes"));
    }

    #[test]
    fn xor_finds_single_number() {
        let trace = xor_tricks(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.last().message, "Single number = 4 (XOR of pairs = 0)");
        assert_eq!(trace.last().highlighted(Highlight::Found), &[3]);
    }
}
