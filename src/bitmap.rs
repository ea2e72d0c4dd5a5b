//! The 32-bit bitmap façade.
//!
//! Translates element and range operations on the full `u32` universe into
//! chunk-level operations: the top 16 bits of an element pick the chunk,
//! the bottom 16 bits live inside its container. Range upper bounds are
//! carried as `u64` so that the exclusive bound 2^32 stays representable;
//! they are validated and clamped here and nowhere else.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};
use std::sync::Arc;

use crate::chunks::ChunkArray;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::iter::{Iter, ManyIter, ReverseIter};

/// One past the largest element; the legal ceiling for range upper bounds.
pub const MAX_RANGE_END: u64 = 1 << 32;

pub(crate) fn split(value: u32) -> (u16, u16) {
    ((value >> 16) as u16, value as u16)
}

pub(crate) fn join(high: u16, low: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

/// A compressed set of 32-bit integers.
///
/// The universe is partitioned into 65,536 chunks by high key; each chunk
/// stores its members in whichever of three container representations is
/// smallest (sorted array, dense bitset, run list). Cloning is cheap:
/// containers are shared between the clone and the original and copied
/// lazily on first mutation of either side.
#[derive(Clone, Default)]
pub struct ChunkedBitmap {
    pub(crate) chunks: ChunkArray,
}

impl ChunkedBitmap {
    /// Create an empty bitmap.
    pub fn new() -> Self {
        Self {
            chunks: ChunkArray::new(),
        }
    }

    /// Bitmap containing exactly the given values.
    pub fn of(values: &[u32]) -> Self {
        values.iter().copied().collect()
    }

    /// Add `value`, returning true if it was absent.
    pub fn insert(&mut self, value: u32) -> bool {
        let (high, low) = split(value);
        match self.chunks.search(high) {
            Ok(i) => self.chunks.container_mut(i).insert(low),
            Err(i) => {
                let mut container = Container::new();
                container.insert(low);
                self.chunks.insert_at(i, high, Arc::new(container));
                true
            }
        }
    }

    /// Remove `value`, returning true if it was present.
    pub fn remove(&mut self, value: u32) -> bool {
        let (high, low) = split(value);
        match self.chunks.search(high) {
            Ok(i) => {
                let removed = self.chunks.container_mut(i).remove(low);
                if removed && self.chunks.container_at(i).is_empty() {
                    self.chunks.remove_at(i);
                }
                removed
            }
            Err(_) => false,
        }
    }

    /// Membership test.
    pub fn contains(&self, value: u32) -> bool {
        let (high, low) = split(value);
        self.chunks.get(high).map_or(false, |c| c.contains(low))
    }

    /// Number of stored elements.
    pub fn cardinality(&self) -> u64 {
        self.chunks
            .iter()
            .map(|(_, c)| u64::from(c.cardinality()))
            .sum()
    }

    /// True if no element is stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Smallest stored element.
    pub fn min(&self) -> Option<u32> {
        self.chunks
            .iter()
            .next()
            .and_then(|(k, c)| c.min().map(|low| join(k, low)))
    }

    /// Largest stored element.
    pub fn max(&self) -> Option<u32> {
        self.chunks
            .iter()
            .last()
            .and_then(|(k, c)| c.max().map(|low| join(k, low)))
    }

    /// Validate `[lo, hi)` against the universe; `None` means the range is
    /// empty. A bound past 2^32 is an error, an inverted range is not.
    fn check_range(lo: u64, hi: u64) -> Result<Option<(u32, u64)>> {
        if hi > MAX_RANGE_END {
            return Err(Error::InvalidRange(hi));
        }
        if lo >= hi {
            return Ok(None);
        }
        Ok(Some((lo as u32, hi)))
    }

    /// Per-chunk bounds of `[lo, hi)` for high key `high`.
    fn chunk_bounds(lo: u32, hi: u64, high: u16) -> (u32, u32) {
        let (high_lo, _) = split(lo);
        let high_hi = ((hi - 1) >> 16) as u16;
        let chunk_lo = if high == high_lo {
            u32::from(lo as u16)
        } else {
            0
        };
        let chunk_hi = if high == high_hi {
            u32::from((hi - 1) as u16) + 1
        } else {
            1 << 16
        };
        (chunk_lo, chunk_hi)
    }

    /// Add every value in `[lo, hi)`.
    pub fn insert_range(&mut self, lo: u64, hi: u64) -> Result<()> {
        let Some((lo, hi)) = Self::check_range(lo, hi)? else {
            return Ok(());
        };
        let high_lo = (lo >> 16) as u16;
        let high_hi = ((hi - 1) >> 16) as u16;
        for high in high_lo..=high_hi {
            let (chunk_lo, chunk_hi) = Self::chunk_bounds(lo, hi, high);
            match self.chunks.search(high) {
                Ok(i) => self.chunks.container_mut(i).insert_range(chunk_lo, chunk_hi),
                Err(i) => {
                    let mut fresh = Container::with_range(chunk_lo as u16, chunk_hi);
                    fresh.normalize();
                    self.chunks.insert_at(i, high, Arc::new(fresh));
                }
            }
        }
        Ok(())
    }

    /// Remove every value in `[lo, hi)`.
    pub fn remove_range(&mut self, lo: u64, hi: u64) -> Result<()> {
        let Some((lo, hi)) = Self::check_range(lo, hi)? else {
            return Ok(());
        };
        let high_lo = (lo >> 16) as u16;
        let high_hi = ((hi - 1) >> 16) as u16;
        for high in high_lo..=high_hi {
            let (chunk_lo, chunk_hi) = Self::chunk_bounds(lo, hi, high);
            let Ok(i) = self.chunks.search(high) else {
                continue;
            };
            if chunk_lo == 0 && chunk_hi == 1 << 16 {
                self.chunks.remove_at(i);
                continue;
            }
            self.chunks.container_mut(i).remove_range(chunk_lo, chunk_hi);
            if self.chunks.container_at(i).is_empty() {
                self.chunks.remove_at(i);
            }
        }
        Ok(())
    }

    /// Toggle every value in `[lo, hi)`.
    pub fn flip_range(&mut self, lo: u64, hi: u64) -> Result<()> {
        let Some((lo, hi)) = Self::check_range(lo, hi)? else {
            return Ok(());
        };
        let high_lo = (lo >> 16) as u16;
        let high_hi = ((hi - 1) >> 16) as u16;
        for high in high_lo..=high_hi {
            let (chunk_lo, chunk_hi) = Self::chunk_bounds(lo, hi, high);
            let range = Container::with_range(chunk_lo as u16, chunk_hi);
            match self.chunks.search(high) {
                Ok(i) => {
                    let flipped = self.chunks.container_at(i).xor(&range);
                    if flipped.is_empty() {
                        self.chunks.remove_at(i);
                    } else {
                        self.chunks.set_at(i, flipped);
                    }
                }
                Err(i) => {
                    let mut fresh = range;
                    fresh.normalize();
                    self.chunks.insert_at(i, high, Arc::new(fresh));
                }
            }
        }
        Ok(())
    }

    /// Number of stored elements `<= value`.
    pub fn rank(&self, value: u32) -> u64 {
        let (high, low) = split(value);
        let mut rank = 0u64;
        for (k, c) in self.chunks.iter() {
            if k > high {
                break;
            }
            if k == high {
                rank += u64::from(c.rank(low));
                break;
            }
            rank += u64::from(c.cardinality());
        }
        rank
    }

    /// The `k`-th smallest stored element (0-based).
    pub fn select(&self, k: u32) -> Result<u32> {
        let mut remaining = k;
        for (key, c) in self.chunks.iter() {
            let card = c.cardinality();
            if remaining < card {
                if let Some(low) = c.select(remaining) {
                    return Ok(join(key, low));
                }
                break;
            }
            remaining -= card;
        }
        Err(Error::InvalidSelection(u64::from(k)))
    }

    /// New bitmap holding the intersection.
    pub fn and(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.and_with(other);
        out
    }

    /// New bitmap holding the union.
    pub fn or(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.or_with(other);
        out
    }

    /// New bitmap holding the symmetric difference.
    pub fn xor(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.xor_with(other);
        out
    }

    /// New bitmap holding the elements of `self` not in `other`.
    pub fn and_not(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.and_not_with(other);
        out
    }

    /// Intersect in place.
    pub fn and_with(&mut self, other: &Self) {
        self.chunks.and_with(&other.chunks);
    }

    /// Union in place.
    pub fn or_with(&mut self, other: &Self) {
        self.chunks.or_with(&other.chunks);
    }

    /// Symmetric difference in place.
    pub fn xor_with(&mut self, other: &Self) {
        self.chunks.xor_with(&other.chunks);
    }

    /// Difference in place.
    pub fn and_not_with(&mut self, other: &Self) {
        self.chunks.and_not_with(&other.chunks);
    }

    /// True if the two bitmaps share at least one element.
    pub fn intersects(&self, other: &Self) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.chunks.len() && j < other.chunks.len() {
            let (lk, rk) = (self.chunks.key_at(i), other.chunks.key_at(j));
            if lk < rk {
                i += 1;
            } else if lk > rk {
                j += 1;
            } else {
                if self
                    .chunks
                    .container_at(i)
                    .intersects(other.chunks.container_at(j))
                {
                    return true;
                }
                i += 1;
                j += 1;
            }
        }
        false
    }

    /// Cardinality of the intersection, without keeping it.
    pub fn and_cardinality(&self, other: &Self) -> u64 {
        let (mut i, mut j) = (0, 0);
        let mut total = 0u64;
        while i < self.chunks.len() && j < other.chunks.len() {
            let (lk, rk) = (self.chunks.key_at(i), other.chunks.key_at(j));
            if lk < rk {
                i += 1;
            } else if lk > rk {
                j += 1;
            } else {
                let and = self
                    .chunks
                    .container_at(i)
                    .and(other.chunks.container_at(j));
                total += u64::from(and.cardinality());
                i += 1;
                j += 1;
            }
        }
        total
    }

    /// Cardinality of the union, without keeping it.
    pub fn or_cardinality(&self, other: &Self) -> u64 {
        self.cardinality() + other.cardinality() - self.and_cardinality(other)
    }

    /// True if the two bitmaps share no element.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        !self.intersects(other)
    }

    /// True if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        let mut j = 0;
        for (k, c) in self.chunks.iter() {
            while j < other.chunks.len() && other.chunks.key_at(j) < k {
                j += 1;
            }
            if j == other.chunks.len() || other.chunks.key_at(j) != k {
                return false;
            }
            let and = c.and(other.chunks.container_at(j));
            if and.cardinality() != c.cardinality() {
                return false;
            }
        }
        true
    }

    /// True if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// New bitmap in which every element `x` becomes `x + delta`. Elements
    /// whose shifted value leaves the 32-bit universe are dropped, never
    /// wrapped.
    pub fn add_offset(&self, delta: i64) -> Self {
        let mut out = ChunkedBitmap::new();
        if delta <= -(MAX_RANGE_END as i64) || delta >= MAX_RANGE_END as i64 {
            return out;
        }
        let off = delta.rem_euclid(1 << 16) as u16;
        let chunk_shift = (delta - i64::from(off)) >> 16;
        for (key, c) in self.chunks.iter() {
            let base = i64::from(key) + chunk_shift;
            if off == 0 {
                if (0..=65535).contains(&base) {
                    out.chunks.append(base as u16, Arc::clone(c));
                }
                continue;
            }
            let (lo_part, hi_part) = c.add_offset(off);
            if let Some(part) = lo_part {
                if (0..=65535).contains(&base) {
                    out.chunks.append_or(base as u16, part);
                }
            }
            if let Some(part) = hi_part {
                if (0..=65535).contains(&(base + 1)) {
                    out.chunks.append_or((base + 1) as u16, part);
                }
            }
        }
        out
    }

    /// Convert each container to a run container when that is strictly
    /// smaller. The only way runs are introduced for existing chunks.
    pub fn run_optimize(&mut self) {
        for i in 0..self.chunks.len() {
            // decide on the shared container first so untouched chunks
            // are not deep-copied
            let c = self.chunks.container_at(i);
            if 2 + 4 * c.num_runs() < c.payload_bytes() {
                self.chunks.container_mut(i).optimize();
            }
        }
    }

    /// Container counts, value counts, and portable byte sizes.
    pub fn stats(&self) -> Statistics {
        let mut stats = Statistics::default();
        for (_, c) in self.chunks.iter() {
            stats.cardinality += u64::from(c.cardinality());
            stats.containers += 1;
            let bytes = c.payload_bytes() as u64;
            match c.as_ref() {
                Container::Array(a) => {
                    stats.array_containers += 1;
                    stats.array_values += a.len() as u64;
                    stats.array_bytes += bytes;
                }
                Container::Bitset(b) => {
                    stats.bitset_containers += 1;
                    stats.bitset_values += u64::from(b.cardinality());
                    stats.bitset_bytes += bytes;
                }
                Container::Runs(r) => {
                    stats.run_containers += 1;
                    stats.run_values += u64::from(r.cardinality());
                    stats.run_bytes += bytes;
                }
            }
        }
        stats
    }

    /// All elements, ascending.
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Ascending iterator.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.chunks)
    }

    /// Descending iterator.
    pub fn reverse_iter(&self) -> ReverseIter<'_> {
        ReverseIter::new(&self.chunks)
    }

    /// Batched ascending iterator.
    pub fn many_iter(&self) -> ManyIter<'_> {
        ManyIter::new(&self.chunks)
    }
}

/// Per-variant container statistics with portable byte counts (sizes as
/// serialized, independent of the host word size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Total number of stored elements.
    pub cardinality: u64,
    /// Total number of containers.
    pub containers: u32,
    /// Number of array containers.
    pub array_containers: u32,
    /// Values stored in array containers.
    pub array_values: u64,
    /// Serialized bytes of array containers.
    pub array_bytes: u64,
    /// Number of bitset containers.
    pub bitset_containers: u32,
    /// Values stored in bitset containers.
    pub bitset_values: u64,
    /// Serialized bytes of bitset containers.
    pub bitset_bytes: u64,
    /// Number of run containers.
    pub run_containers: u32,
    /// Values stored in run containers.
    pub run_values: u64,
    /// Serialized bytes of run containers.
    pub run_bytes: u64,
}

impl PartialEq for ChunkedBitmap {
    fn eq(&self, other: &Self) -> bool {
        if self.chunks.len() != other.chunks.len() {
            return false;
        }
        self.chunks
            .iter()
            .zip(other.chunks.iter())
            .all(|((lk, lc), (rk, rc))| lk == rk && lc == rc)
    }
}

impl Eq for ChunkedBitmap {}

impl fmt::Debug for ChunkedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedBitmap")
            .field("cardinality", &self.cardinality())
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

impl fmt::Display for ChunkedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<u32> for ChunkedBitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut bitmap = ChunkedBitmap::new();
        bitmap.extend(iter);
        bitmap
    }
}

impl Extend<u32> for ChunkedBitmap {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a ChunkedBitmap {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl BitAnd for &ChunkedBitmap {
    type Output = ChunkedBitmap;

    fn bitand(self, rhs: Self) -> ChunkedBitmap {
        self.and(rhs)
    }
}

impl BitAndAssign<&ChunkedBitmap> for ChunkedBitmap {
    fn bitand_assign(&mut self, rhs: &ChunkedBitmap) {
        self.and_with(rhs);
    }
}

impl BitOr for &ChunkedBitmap {
    type Output = ChunkedBitmap;

    fn bitor(self, rhs: Self) -> ChunkedBitmap {
        self.or(rhs)
    }
}

impl BitOrAssign<&ChunkedBitmap> for ChunkedBitmap {
    fn bitor_assign(&mut self, rhs: &ChunkedBitmap) {
        self.or_with(rhs);
    }
}

impl BitXor for &ChunkedBitmap {
    type Output = ChunkedBitmap;

    fn bitxor(self, rhs: Self) -> ChunkedBitmap {
        self.xor(rhs)
    }
}

impl BitXorAssign<&ChunkedBitmap> for ChunkedBitmap {
    fn bitxor_assign(&mut self, rhs: &ChunkedBitmap) {
        self.xor_with(rhs);
    }
}

impl Sub for &ChunkedBitmap {
    type Output = ChunkedBitmap;

    fn sub(self, rhs: Self) -> ChunkedBitmap {
        self.and_not(rhs)
    }
}

impl SubAssign<&ChunkedBitmap> for ChunkedBitmap {
    fn sub_assign(&mut self, rhs: &ChunkedBitmap) {
        self.and_not_with(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_cardinality() {
        let mut b = ChunkedBitmap::new();
        assert!(b.insert(1));
        assert!(b.insert(70_000));
        assert!(!b.insert(1));
        assert!(b.contains(1));
        assert!(b.contains(70_000));
        assert!(!b.contains(2));
        assert_eq!(b.cardinality(), 2);
        assert!(b.remove(1));
        assert!(!b.remove(1));
        assert_eq!(b.cardinality(), 1);
        assert_eq!(b.chunks.len(), 1);
    }

    #[test]
    fn test_clone_shares_then_diverges() {
        let mut a = ChunkedBitmap::of(&[1, 2, 3]);
        let b = a.clone();
        a.insert(4);
        assert_eq!(a.cardinality(), 4);
        assert_eq!(b.cardinality(), 3);
        assert!(!b.contains(4));
    }

    #[test]
    fn test_range_bounds_validation() {
        let mut b = ChunkedBitmap::new();
        assert!(matches!(
            b.insert_range(0, MAX_RANGE_END + 1),
            Err(Error::InvalidRange(_))
        ));
        // inverted range is empty, not an error
        b.insert_range(10, 5).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_insert_range_spans_chunks() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(65_530, 65_542).unwrap();
        assert_eq!(b.cardinality(), 12);
        assert_eq!(b.chunks.len(), 2);
        assert!(b.contains(65_535) && b.contains(65_536));
        assert_eq!(b.min(), Some(65_530));
        assert_eq!(b.max(), Some(65_541));
    }

    #[test]
    fn test_remove_range_trims_and_drops_chunks() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 200_000).unwrap();
        b.remove_range(100, 150_000).unwrap();
        assert_eq!(b.cardinality(), 100 + 50_000);
        assert!(b.contains(99) && !b.contains(100));
        assert!(!b.contains(149_999) && b.contains(150_000));
    }

    #[test]
    fn test_flip_present_and_absent_chunks() {
        let mut b = ChunkedBitmap::of(&[0]);
        b.flip_range(1, 2).unwrap();
        assert_eq!(b.to_vec(), vec![0, 1]);
        b.flip_range(0, 2).unwrap();
        assert!(b.is_empty());
        assert_eq!(b.chunks.len(), 0);
    }

    #[test]
    fn test_rank_select_roundtrip() {
        let mut b = ChunkedBitmap::new();
        for k in 0..10u32 {
            b.insert(k * 100_000);
        }
        assert_eq!(b.rank(0), 1);
        assert_eq!(b.rank(99_999), 1);
        assert_eq!(b.rank(100_000), 2);
        assert_eq!(b.rank(u32::MAX), 10);
        for k in 0..10u32 {
            let v = b.select(k).unwrap();
            assert_eq!(v, k * 100_000);
            assert_eq!(b.rank(v), u64::from(k) + 1);
        }
        assert!(matches!(b.select(10), Err(Error::InvalidSelection(10))));
    }

    #[test]
    fn test_set_algebra_chunkwise() {
        let a = ChunkedBitmap::of(&[1, 2, 70_000, 200_000]);
        let b = ChunkedBitmap::of(&[2, 3, 70_000, 300_000]);
        assert_eq!((&a | &b).to_vec(), vec![1, 2, 3, 70_000, 200_000, 300_000]);
        assert_eq!((&a & &b).to_vec(), vec![2, 70_000]);
        assert_eq!((&a ^ &b).to_vec(), vec![1, 3, 200_000, 300_000]);
        assert_eq!((&a - &b).to_vec(), vec![1, 200_000]);
        assert_eq!(a.and_cardinality(&b), 2);
        assert_eq!(a.or_cardinality(&b), 6);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&ChunkedBitmap::of(&[5, 400_000])));
    }

    #[test]
    fn test_subset_superset() {
        let a = ChunkedBitmap::of(&[1, 70_000]);
        let b = ChunkedBitmap::of(&[1, 2, 70_000, 80_000]);
        assert!(a.is_subset(&b));
        assert!(b.is_superset(&a));
        assert!(!b.is_subset(&a));
        assert!(ChunkedBitmap::new().is_subset(&a));
    }

    #[test]
    fn test_add_offset_drops_out_of_universe() {
        let b = ChunkedBitmap::of(&[0, 1, 65_535, 65_536, 4_294_967_295]);
        let shifted = b.add_offset(2);
        assert_eq!(shifted.to_vec(), vec![2, 3, 65_537, 65_538]);
        let back = shifted.add_offset(-2);
        assert_eq!(back.to_vec(), vec![0, 1, 65_535, 65_536]);
        let neg = b.add_offset(-1);
        assert_eq!(neg.to_vec(), vec![0, 65_534, 65_535, 4_294_967_294]);
        assert!(b.add_offset(i64::from(u32::MAX) + 1).is_empty());
        assert_eq!(b.add_offset(0).to_vec(), b.to_vec());
    }

    #[test]
    fn test_add_offset_whole_chunk_shift() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 1 << 17).unwrap();
        let shifted = b.add_offset(1 << 16);
        assert_eq!(shifted.cardinality(), 1 << 17);
        assert_eq!(shifted.min(), Some(1 << 16));
        assert_eq!(shifted.max(), Some((3 << 16) - 1));
    }

    #[test]
    fn test_equality_ignores_representation() {
        let mut a = ChunkedBitmap::new();
        a.insert_range(0, 100).unwrap();
        let mut b = ChunkedBitmap::new();
        for v in 0..100 {
            b.insert(v);
        }
        assert_eq!(a, b);
        b.run_optimize();
        assert_eq!(a, b);
        b.insert(100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_matches_set_notation() {
        let b = ChunkedBitmap::of(&[3, 1, 2]);
        assert_eq!(b.to_string(), "{1,2,3}");
        assert_eq!(ChunkedBitmap::new().to_string(), "{}");
    }

    #[test]
    fn test_stats_by_variant() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 1 << 17).unwrap();
        b.insert(300_000);
        b.run_optimize();
        let stats = b.stats();
        assert_eq!(stats.cardinality, (1 << 17) + 1);
        assert_eq!(stats.containers, 3);
        assert_eq!(stats.run_containers, 2);
        assert_eq!(stats.run_values, 1 << 17);
        assert_eq!(stats.run_bytes, 12);
        assert_eq!(stats.array_containers, 1);
        assert_eq!(stats.array_values, 1);
        assert_eq!(stats.array_bytes, 2);
    }
}
