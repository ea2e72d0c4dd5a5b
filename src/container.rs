//! The tagged chunk container: variant choice, conversions, and the
//! pairwise dispatch for set algebra.
//!
//! Every mutation funnels through `normalize`, which re-shapes the
//! container when a strictly smaller representation exists: arrays past
//! the cutoff become bitsets, bitsets at or below it become arrays, and
//! run containers fall back to the cheaper of the two once runs stop
//! being strictly smallest. Runs are only ever *introduced* by the
//! explicit `optimize` call (or by ranged construction of a fresh chunk);
//! ordinary mutations never pay for the run scan.

use crate::array::ArrayContainer;
use crate::bitset::{BitsetContainer, BITSET_BYTES};
use crate::iter::ContainerIter;
use crate::runs::{interval_sweep, Interval, RunContainer};

/// Maximum cardinality stored as a sorted array; one past it promotes to
/// a dense bitset, and a bitset at or below it demotes back.
pub(crate) const DEFAULT_MAX_SIZE: usize = 4096;

/// Storage for the low 16 bits of the elements sharing one high key.
#[derive(Clone, Debug)]
pub(crate) enum Container {
    Array(ArrayContainer),
    Bitset(BitsetContainer),
    Runs(RunContainer),
}

/// Adapt a sorted value slice into the interval stream the sweep expects.
fn unit_intervals(values: &[u16]) -> impl Iterator<Item = (u32, u32)> + '_ {
    values.iter().map(|&v| (u32::from(v), u32::from(v) + 1))
}

/// Intervals of consecutive values in a sorted slice.
fn runs_from_sorted(values: &[u16]) -> Vec<Interval> {
    let mut out: Vec<Interval> = Vec::new();
    for &v in values {
        match out.last_mut() {
            Some(run) if u32::from(v) == run.end() => run.length += 1,
            _ => out.push(Interval::new(v, 0)),
        }
    }
    out
}

impl Container {
    pub fn new() -> Self {
        Container::Array(ArrayContainer::new())
    }

    /// Fresh container covering exactly `[lo, hi)`.
    pub fn with_range(lo: u16, hi: u32) -> Self {
        Container::Runs(RunContainer::with_range(lo, hi))
    }

    pub fn cardinality(&self) -> u32 {
        match self {
            Container::Array(a) => a.len() as u32,
            Container::Bitset(b) => b.cardinality(),
            Container::Runs(r) => r.cardinality(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    pub fn contains(&self, value: u16) -> bool {
        match self {
            Container::Array(a) => a.contains(value),
            Container::Bitset(b) => b.contains(value),
            Container::Runs(r) => r.contains(value),
        }
    }

    pub fn insert(&mut self, value: u16) -> bool {
        let inserted = match self {
            Container::Array(a) => {
                if a.len() >= DEFAULT_MAX_SIZE && !a.contains(value) {
                    let mut bits = BitsetContainer::from_sorted(a.values());
                    bits.insert(value);
                    *self = Container::Bitset(bits);
                    true
                } else {
                    a.insert(value)
                }
            }
            Container::Bitset(b) => b.insert(value),
            Container::Runs(r) => r.insert(value),
        };
        if inserted && matches!(self, Container::Runs(_)) {
            self.normalize();
        }
        inserted
    }

    pub fn remove(&mut self, value: u16) -> bool {
        let removed = match self {
            Container::Array(a) => a.remove(value),
            Container::Bitset(b) => b.remove(value),
            Container::Runs(r) => r.remove(value),
        };
        if removed {
            self.normalize();
        }
        removed
    }

    /// Insert every value in `[lo, hi)` with `hi <= 65536`.
    pub fn insert_range(&mut self, lo: u32, hi: u32) {
        if lo >= hi {
            return;
        }
        match self {
            Container::Array(a) => a.insert_range(lo as u16, hi),
            Container::Bitset(b) => b.insert_range(lo, hi),
            Container::Runs(r) => r.insert_range(lo, hi),
        }
        self.normalize();
    }

    /// Remove every value in `[lo, hi)` with `hi <= 65536`.
    pub fn remove_range(&mut self, lo: u32, hi: u32) {
        if lo >= hi {
            return;
        }
        match self {
            Container::Array(a) => a.remove_range(lo as u16, hi),
            Container::Bitset(b) => b.remove_range(lo, hi),
            Container::Runs(r) => r.remove_range(lo, hi),
        }
        self.normalize();
    }

    /// Number of stored values `<= value`.
    pub fn rank(&self, value: u16) -> u32 {
        match self {
            Container::Array(a) => a.rank(value),
            Container::Bitset(b) => b.rank(value),
            Container::Runs(r) => r.rank(value),
        }
    }

    /// The `k`-th smallest stored value (0-based).
    pub fn select(&self, k: u32) -> Option<u16> {
        match self {
            Container::Array(a) => a.select(k),
            Container::Bitset(b) => b.select(k),
            Container::Runs(r) => r.select(k),
        }
    }

    pub fn min(&self) -> Option<u16> {
        match self {
            Container::Array(a) => a.min(),
            Container::Bitset(b) => b.min(),
            Container::Runs(r) => r.min(),
        }
    }

    pub fn max(&self) -> Option<u16> {
        match self {
            Container::Array(a) => a.max(),
            Container::Bitset(b) => b.max(),
            Container::Runs(r) => r.max(),
        }
    }

    pub fn num_runs(&self) -> usize {
        match self {
            Container::Array(a) => a.num_runs(),
            Container::Bitset(b) => b.num_runs(),
            Container::Runs(r) => r.num_runs(),
        }
    }

    /// Serialized payload size in bytes.
    pub fn payload_bytes(&self) -> usize {
        match self {
            Container::Array(a) => 2 * a.len(),
            Container::Bitset(_) => BITSET_BYTES,
            Container::Runs(r) => 2 + 4 * r.num_runs(),
        }
    }

    /// Re-shape after a mutation. Never introduces runs.
    pub fn normalize(&mut self) {
        match self {
            Container::Array(a) => {
                if a.len() > DEFAULT_MAX_SIZE {
                    *self = Container::Bitset(BitsetContainer::from_sorted(a.values()));
                }
            }
            Container::Bitset(b) => {
                if (b.cardinality() as usize) <= DEFAULT_MAX_SIZE {
                    *self = Container::Array(ArrayContainer::from_sorted(b.to_array_values()));
                }
            }
            Container::Runs(r) => {
                let card = r.cardinality() as usize;
                let alt_bytes = if card <= DEFAULT_MAX_SIZE {
                    2 * card
                } else {
                    BITSET_BYTES
                };
                if 2 + 4 * r.num_runs() >= alt_bytes {
                    *self = if card <= DEFAULT_MAX_SIZE {
                        Container::Array(ArrayContainer::from_sorted(r.to_sorted_values()))
                    } else {
                        Container::Bitset(r.to_bitset())
                    };
                }
            }
        }
    }

    /// Convert to a run container when that is strictly the smallest form.
    pub fn optimize(&mut self) {
        let run_bytes = 2 + 4 * self.num_runs();
        if run_bytes >= self.payload_bytes() {
            return;
        }
        let intervals = match self {
            Container::Runs(_) => return,
            Container::Array(a) => runs_from_sorted(a.values()),
            Container::Bitset(b) => {
                let mut out = Vec::new();
                let words = b.words();
                let mut pos = 0u32;
                while pos < 65536 {
                    // next set bit at or after pos
                    let mut w = (pos >> 6) as usize;
                    let mut bits = words[w] & (!0u64 << (pos & 63));
                    while bits == 0 {
                        w += 1;
                        if w == words.len() {
                            break;
                        }
                        bits = words[w];
                    }
                    if bits == 0 {
                        break;
                    }
                    let start = (w as u32) * 64 + bits.trailing_zeros();
                    // next clear bit after start
                    let mut w = (start >> 6) as usize;
                    let mut clear = !words[w] & (!0u64 << (start & 63));
                    while clear == 0 {
                        w += 1;
                        if w == words.len() {
                            break;
                        }
                        clear = !words[w];
                    }
                    let end = if clear == 0 {
                        65536
                    } else {
                        (w as u32) * 64 + clear.trailing_zeros()
                    };
                    out.push(Interval::new(start as u16, (end - start - 1) as u16));
                    pos = end + 1;
                }
                out
            }
        };
        *self = Container::Runs(RunContainer::from_intervals(intervals));
    }

    pub fn or(&self, other: &Container) -> Container {
        use Container::*;
        let mut out = match (self, other) {
            (Array(a), Array(b)) => {
                if a.len() + b.len() <= DEFAULT_MAX_SIZE {
                    Array(a.union(b))
                } else {
                    let mut bits = BitsetContainer::from_sorted(a.values());
                    bits.insert_all(b.values());
                    Bitset(bits)
                }
            }
            (Array(a), Bitset(b)) | (Bitset(b), Array(a)) => {
                let mut bits = b.clone();
                bits.insert_all(a.values());
                Bitset(bits)
            }
            (Bitset(a), Bitset(b)) => Bitset(a.or(b)),
            (Runs(a), Runs(b)) => Runs(RunContainer::from_intervals(interval_sweep(
                a.intervals(),
                b.intervals(),
                |x, y| x | y,
            ))),
            (Runs(r), Array(a)) | (Array(a), Runs(r)) => Runs(RunContainer::from_intervals(
                interval_sweep(r.intervals(), unit_intervals(a.values()), |x, y| x | y),
            )),
            (Runs(r), Bitset(b)) | (Bitset(b), Runs(r)) => {
                let mut bits = b.clone();
                for (lo, hi) in r.intervals() {
                    bits.insert_range(lo, hi);
                }
                Bitset(bits)
            }
        };
        out.normalize();
        out
    }

    pub fn and(&self, other: &Container) -> Container {
        use Container::*;
        let mut out = match (self, other) {
            (Array(a), Array(b)) => Array(a.intersect(b)),
            (Array(a), Bitset(b)) | (Bitset(b), Array(a)) => {
                let mut kept = a.clone();
                kept.retain(|v| b.contains(v));
                Array(kept)
            }
            (Bitset(a), Bitset(b)) => Bitset(a.and(b)),
            (Runs(a), Runs(b)) => Runs(RunContainer::from_intervals(interval_sweep(
                a.intervals(),
                b.intervals(),
                |x, y| x & y,
            ))),
            (Runs(r), Array(a)) | (Array(a), Runs(r)) => {
                let mut kept = a.clone();
                kept.retain(|v| r.contains(v));
                Array(kept)
            }
            (Runs(r), Bitset(b)) | (Bitset(b), Runs(r)) => {
                let mut bits = BitsetContainer::new();
                for (lo, hi) in r.intervals() {
                    bits.copy_range_from(b, lo, hi);
                }
                Bitset(bits)
            }
        };
        out.normalize();
        out
    }

    pub fn xor(&self, other: &Container) -> Container {
        use Container::*;
        let mut out = match (self, other) {
            (Array(a), Array(b)) => {
                if a.len() + b.len() <= DEFAULT_MAX_SIZE {
                    Array(a.xor(b))
                } else {
                    let mut bits = BitsetContainer::from_sorted(a.values());
                    for &v in b.values() {
                        bits.flip(v);
                    }
                    Bitset(bits)
                }
            }
            (Array(a), Bitset(b)) | (Bitset(b), Array(a)) => {
                let mut bits = b.clone();
                for &v in a.values() {
                    bits.flip(v);
                }
                Bitset(bits)
            }
            (Bitset(a), Bitset(b)) => Bitset(a.xor(b)),
            (Runs(a), Runs(b)) => Runs(RunContainer::from_intervals(interval_sweep(
                a.intervals(),
                b.intervals(),
                |x, y| x ^ y,
            ))),
            (Runs(r), Array(a)) | (Array(a), Runs(r)) => Runs(RunContainer::from_intervals(
                interval_sweep(r.intervals(), unit_intervals(a.values()), |x, y| x ^ y),
            )),
            (Runs(r), Bitset(b)) | (Bitset(b), Runs(r)) => {
                let mut bits = b.clone();
                for (lo, hi) in r.intervals() {
                    bits.flip_range(lo, hi);
                }
                Bitset(bits)
            }
        };
        out.normalize();
        out
    }

    pub fn and_not(&self, other: &Container) -> Container {
        use Container::*;
        let mut out = match (self, other) {
            (Array(a), Array(b)) => Array(a.difference(b)),
            (Array(a), Bitset(b)) => {
                let mut kept = a.clone();
                kept.retain(|v| !b.contains(v));
                Array(kept)
            }
            (Array(a), Runs(r)) => {
                let mut kept = a.clone();
                kept.retain(|v| !r.contains(v));
                Array(kept)
            }
            (Bitset(a), Array(b)) => {
                let mut bits = a.clone();
                for &v in b.values() {
                    bits.remove(v);
                }
                Bitset(bits)
            }
            (Bitset(a), Bitset(b)) => Bitset(a.and_not(b)),
            (Bitset(a), Runs(r)) => {
                let mut bits = a.clone();
                for (lo, hi) in r.intervals() {
                    bits.remove_range(lo, hi);
                }
                Bitset(bits)
            }
            (Runs(a), Runs(b)) => Runs(RunContainer::from_intervals(interval_sweep(
                a.intervals(),
                b.intervals(),
                |x, y| x && !y,
            ))),
            (Runs(r), Array(a)) => Runs(RunContainer::from_intervals(interval_sweep(
                r.intervals(),
                unit_intervals(a.values()),
                |x, y| x && !y,
            ))),
            (Runs(r), Bitset(b)) => {
                let mut bits = r.to_bitset();
                bits.and_not_assign(b);
                Bitset(bits)
            }
        };
        out.normalize();
        out
    }

    pub fn or_assign(&mut self, other: &Container) {
        let lhs = std::mem::take(self);
        *self = match (lhs, other) {
            (Container::Bitset(mut a), Container::Bitset(b)) => {
                a.or_assign(b);
                Container::Bitset(a)
            }
            (Container::Bitset(mut a), Container::Array(b)) => {
                a.insert_all(b.values());
                Container::Bitset(a)
            }
            (lhs, other) => lhs.or(other),
        };
    }

    pub fn and_assign(&mut self, other: &Container) {
        let lhs = std::mem::take(self);
        *self = match (lhs, other) {
            (Container::Bitset(mut a), Container::Bitset(b)) => {
                a.and_assign(b);
                let mut c = Container::Bitset(a);
                c.normalize();
                c
            }
            (Container::Array(mut a), Container::Bitset(b)) => {
                a.retain(|v| b.contains(v));
                Container::Array(a)
            }
            (lhs, other) => lhs.and(other),
        };
    }

    pub fn xor_assign(&mut self, other: &Container) {
        let lhs = std::mem::take(self);
        *self = match (lhs, other) {
            (Container::Bitset(mut a), Container::Bitset(b)) => {
                a.xor_assign(b);
                let mut c = Container::Bitset(a);
                c.normalize();
                c
            }
            (Container::Bitset(mut a), Container::Array(b)) => {
                for &v in b.values() {
                    a.flip(v);
                }
                let mut c = Container::Bitset(a);
                c.normalize();
                c
            }
            (lhs, other) => lhs.xor(other),
        };
    }

    pub fn and_not_assign(&mut self, other: &Container) {
        let lhs = std::mem::take(self);
        *self = match (lhs, other) {
            (Container::Bitset(mut a), Container::Bitset(b)) => {
                a.and_not_assign(b);
                let mut c = Container::Bitset(a);
                c.normalize();
                c
            }
            (Container::Bitset(mut a), Container::Array(b)) => {
                for &v in b.values() {
                    a.remove(v);
                }
                let mut c = Container::Bitset(a);
                c.normalize();
                c
            }
            (Container::Array(mut a), Container::Bitset(b)) => {
                a.retain(|v| !b.contains(v));
                Container::Array(a)
            }
            (Container::Array(mut a), Container::Runs(r)) => {
                a.retain(|v| !r.contains(v));
                Container::Array(a)
            }
            (lhs, other) => lhs.and_not(other),
        };
    }

    pub fn intersects(&self, other: &Container) -> bool {
        use Container::*;
        match (self, other) {
            (Array(a), Array(b)) => a.intersects(b),
            (Array(a), Bitset(b)) | (Bitset(b), Array(a)) => {
                a.values().iter().any(|&v| b.contains(v))
            }
            (Bitset(a), Bitset(b)) => a.intersects(b),
            (Runs(a), Runs(b)) => a.intersects(b),
            (Runs(r), Array(a)) | (Array(a), Runs(r)) => {
                a.values().iter().any(|&v| r.contains(v))
            }
            (Runs(r), Bitset(b)) | (Bitset(b), Runs(r)) => {
                r.intervals().any(|(lo, hi)| b.range_intersects(lo, hi))
            }
        }
    }

    /// Split into the two chunk-local parts of `self` shifted up by `off`.
    /// The first part keeps the current chunk position, the second spills
    /// into the next one. `off` must be nonzero.
    pub fn add_offset(&self, off: u16) -> (Option<Container>, Option<Container>) {
        debug_assert!(off != 0);
        let off32 = u32::from(off);
        let (lo, hi) = match self {
            Container::Array(a) => {
                let split = a
                    .values()
                    .partition_point(|&v| u32::from(v) + off32 < 65536);
                let lo: Vec<u16> = a.values()[..split]
                    .iter()
                    .map(|&v| v + off)
                    .collect();
                let hi: Vec<u16> = a.values()[split..]
                    .iter()
                    .map(|&v| (u32::from(v) + off32 - 65536) as u16)
                    .collect();
                (
                    Container::Array(ArrayContainer::from_sorted(lo)),
                    Container::Array(ArrayContainer::from_sorted(hi)),
                )
            }
            Container::Bitset(b) => {
                let mut lo = Box::new([0u64; 1024]);
                let mut hi = Box::new([0u64; 1024]);
                let word_off = usize::from(off >> 6);
                let bit_off = u32::from(off & 63);
                for (i, &w) in b.words().iter().enumerate() {
                    if w == 0 {
                        continue;
                    }
                    let dst = i + word_off;
                    if dst < 1024 {
                        lo[dst] |= w << bit_off;
                    } else {
                        hi[dst - 1024] |= w << bit_off;
                    }
                    if bit_off != 0 {
                        let carry = w >> (64 - bit_off);
                        if dst + 1 < 1024 {
                            lo[dst + 1] |= carry;
                        } else {
                            hi[dst + 1 - 1024] |= carry;
                        }
                    }
                }
                (
                    Container::Bitset(BitsetContainer::from_words(lo)),
                    Container::Bitset(BitsetContainer::from_words(hi)),
                )
            }
            Container::Runs(r) => {
                let mut lo = Vec::new();
                let mut hi = Vec::new();
                for (s, e) in r.intervals() {
                    let (ns, ne) = (s + off32, e + off32);
                    if ne <= 65536 {
                        lo.push(Interval::new(ns as u16, (ne - ns - 1) as u16));
                    } else if ns >= 65536 {
                        hi.push(Interval::new(
                            (ns - 65536) as u16,
                            (ne - ns - 1) as u16,
                        ));
                    } else {
                        lo.push(Interval::new(ns as u16, (65536 - ns - 1) as u16));
                        hi.push(Interval::new(0, (ne - 65536 - 1) as u16));
                    }
                }
                (
                    Container::Runs(RunContainer::from_intervals(lo)),
                    Container::Runs(RunContainer::from_intervals(hi)),
                )
            }
        };
        (Self::nonempty_part(lo), Self::nonempty_part(hi))
    }

    fn nonempty_part(mut c: Container) -> Option<Container> {
        if c.is_empty() {
            return None;
        }
        c.normalize();
        Some(c)
    }

    pub fn iter(&self) -> ContainerIter<'_> {
        ContainerIter::new(self)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Set equality: same-variant containers compare structurally, mixed
/// variants compare element by element.
impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        use Container::*;
        match (self, other) {
            (Array(a), Array(b)) => a == b,
            (Bitset(a), Bitset(b)) => a.words()[..] == b.words()[..],
            (Runs(a), Runs(b)) => a == b,
            _ => self.cardinality() == other.cardinality() && self.iter().eq(other.iter()),
        }
    }
}

impl Eq for Container {}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_of(range: std::ops::Range<u32>) -> Container {
        Container::Array(ArrayContainer::from_sorted(
            range.map(|v| v as u16).collect(),
        ))
    }

    #[test]
    fn test_insert_promotes_past_cutoff() {
        let mut c = array_of(0..4096);
        assert!(!c.insert(0));
        assert!(matches!(c, Container::Array(_)));
        assert!(c.insert(5000));
        assert!(matches!(c, Container::Bitset(_)));
        assert_eq!(c.cardinality(), 4097);
        assert!(c.contains(5000));
    }

    #[test]
    fn test_remove_demotes_at_cutoff() {
        let mut c = array_of(0..4096);
        c.insert(4096);
        assert!(matches!(c, Container::Bitset(_)));
        assert!(c.remove(4096));
        assert!(matches!(c, Container::Array(_)));
        assert_eq!(c.cardinality(), 4096);
    }

    #[test]
    fn test_or_materializes_bitset_for_large_arrays() {
        let a = Container::Array(ArrayContainer::from_sorted(
            (0..4000u32).map(|v| (2 * v) as u16).collect(),
        ));
        let b = Container::Array(ArrayContainer::from_sorted(
            (0..4000u32).map(|v| (2 * v + 1) as u16).collect(),
        ));
        let or = a.or(&b);
        assert!(matches!(or, Container::Bitset(_)));
        assert_eq!(or.cardinality(), 8000);
        // intersect of the disjoint halves is empty
        assert_eq!(a.and(&b).cardinality(), 0);
        // xor of identical inputs is empty
        assert_eq!(a.xor(&a).cardinality(), 0);
    }

    #[test]
    fn test_mixed_variant_algebra() {
        let mut bits = BitsetContainer::new();
        bits.insert_range(0, 5000);
        let b = Container::Bitset(bits);
        let r = Container::with_range(4000, 6000);
        let a = array_of(4990..5010);

        assert_eq!(b.and(&r).cardinality(), 1000);
        assert_eq!(b.or(&r).cardinality(), 6000);
        assert_eq!(b.xor(&r).cardinality(), 5000);
        assert_eq!(b.and_not(&r).cardinality(), 4000);
        assert_eq!(r.and_not(&b).cardinality(), 1000);
        assert_eq!(a.and(&b).cardinality(), 10);
        assert_eq!(a.and_not(&b).cardinality(), 10);
        assert_eq!(r.and(&a).cardinality(), 20);
        assert!(b.intersects(&r));
        assert!(r.intersects(&a));
    }

    #[test]
    fn test_optimize_prefers_strictly_smaller_runs() {
        // 100 consecutive values: run form is 6 bytes, array form 200
        let mut c = array_of(0..100);
        c.optimize();
        assert!(matches!(c, Container::Runs(_)));
        assert_eq!(c.cardinality(), 100);

        // alternating bits compress terribly as runs
        let mut c = Container::Array(ArrayContainer::from_sorted(
            (0..100u32).map(|v| (2 * v) as u16).collect(),
        ));
        c.optimize();
        assert!(matches!(c, Container::Array(_)));
    }

    #[test]
    fn test_optimize_full_bitset() {
        let mut bits = BitsetContainer::new();
        bits.insert_range(0, 65536);
        let mut c = Container::Bitset(bits);
        c.optimize();
        match &c {
            Container::Runs(r) => assert_eq!(r.runs(), &[Interval::new(0, 65535)]),
            other => panic!("expected runs, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_converts_stale_runs() {
        let mut c = Container::with_range(0, 10);
        c.remove(2);
        // two runs over nine values still beat the array form
        assert!(matches!(c, Container::Runs(_)));
        c.remove(5);
        c.remove(7);
        // four runs over seven values no longer do
        assert!(matches!(c, Container::Array(_)));
        assert_eq!(c.cardinality(), 7);
    }

    #[test]
    fn test_set_equality_across_variants() {
        let a = array_of(10..20);
        let r = Container::with_range(10, 20);
        assert_eq!(a, r);
        let mut bits = BitsetContainer::new();
        bits.insert_range(10, 20);
        assert_eq!(Container::Bitset(bits), a);
        assert_ne!(a, array_of(10..21));
    }

    #[test]
    fn test_add_offset_splits() {
        let c = array_of(0..10);
        let (lo, hi) = c.add_offset(65530);
        let lo = lo.unwrap();
        let hi = hi.unwrap();
        assert_eq!(lo.cardinality(), 6);
        assert_eq!(hi.cardinality(), 4);
        assert!(lo.contains(65530) && lo.contains(65535));
        assert!(hi.contains(0) && hi.contains(3));

        let r = Container::with_range(100, 200);
        let (lo, hi) = r.add_offset(50);
        assert_eq!(lo.unwrap().cardinality(), 100);
        assert!(hi.is_none());
    }
}
