//! Portable serialization of a bitmap.
//!
//! # Format
//!
//! Everything is little-endian. Two header forms, told apart by a 32-bit
//! cookie:
//!
//! - no-runs form: u32 cookie `0x00003B3B`, then u32 chunk count `n`;
//! - has-runs form: a u32 whose low 16 bits are `0x3B30` and whose high 16
//!   bits are `n - 1`, followed by `ceil(n / 8)` bytes marking (one bit
//!   per chunk, LSB first) which chunks are run containers.
//!
//! After the header come `n` descriptors, each a `(high key, cardinality
//! - 1)` pair of u16s. The no-runs form with `n >= 4` then carries `n` u32
//! offsets of each chunk's payload relative to the first payload byte.
//! Payloads follow in chunk order:
//!
//! - array: `cardinality` u16 values, strictly ascending;
//! - bitset: 1024 u64 words;
//! - runs: u16 run count, then that many `(start, length - 1)` u16 pairs.
//!
//! Validation is eager: a bad cookie, truncated buffer, unsorted keys or
//! values, an offset table that disagrees with the payloads, a popcount or
//! run-sum that contradicts the descriptor, or a denormalized run list all
//! reject the buffer before any bitmap is returned.

use std::io::Write;
use std::sync::Arc;

use crate::array::ArrayContainer;
use crate::bitmap::ChunkedBitmap;
use crate::bitset::{BitsetContainer, BITSET_WORDS};
use crate::container::{Container, DEFAULT_MAX_SIZE};
use crate::error::{Error, Result};
use crate::runs::{Interval, RunContainer};

/// Cookie of the no-runs form.
const COOKIE_NO_RUNS: u32 = 0x0000_3B3B;
/// Low 16 bits of the has-runs cookie.
const COOKIE_RUNS: u32 = 0x3B30;
/// Minimum chunk count for which the no-runs form carries an offset table.
const NO_OFFSET_THRESHOLD: usize = 4;

impl ChunkedBitmap {
    /// Exact size of [`ChunkedBitmap::to_bytes`] output, so callers can
    /// pre-size buffers.
    pub fn serialized_size(&self) -> usize {
        let n = self.chunks.len();
        let has_runs = self.has_run_containers();
        let mut size = if has_runs { 4 + (n + 7) / 8 } else { 8 };
        size += 4 * n;
        if !has_runs && n >= NO_OFFSET_THRESHOLD {
            size += 4 * n;
        }
        size + self
            .chunks
            .iter()
            .map(|(_, c)| c.payload_bytes())
            .sum::<usize>()
    }

    fn has_run_containers(&self) -> bool {
        self.chunks
            .iter()
            .any(|(_, c)| matches!(c.as_ref(), Container::Runs(_)))
    }

    /// Serialize to the portable byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.chunks.len();
        let has_runs = self.has_run_containers();
        let mut out = Vec::with_capacity(self.serialized_size());

        if has_runs {
            let cookie = ((n as u32 - 1) << 16) | COOKIE_RUNS;
            out.extend_from_slice(&cookie.to_le_bytes());
            let mut flags = vec![0u8; (n + 7) / 8];
            for (i, (_, c)) in self.chunks.iter().enumerate() {
                if matches!(c.as_ref(), Container::Runs(_)) {
                    flags[i / 8] |= 1 << (i % 8);
                }
            }
            out.extend_from_slice(&flags);
        } else {
            out.extend_from_slice(&COOKIE_NO_RUNS.to_le_bytes());
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }

        for (key, c) in self.chunks.iter() {
            out.extend_from_slice(&key.to_le_bytes());
            out.extend_from_slice(&((c.cardinality() - 1) as u16).to_le_bytes());
        }

        if !has_runs && n >= NO_OFFSET_THRESHOLD {
            let mut offset = 0u32;
            for (_, c) in self.chunks.iter() {
                out.extend_from_slice(&offset.to_le_bytes());
                offset += c.payload_bytes() as u32;
            }
        }

        for (_, c) in self.chunks.iter() {
            match c.as_ref() {
                Container::Array(a) => {
                    for &v in a.values() {
                        out.extend_from_slice(&v.to_le_bytes());
                    }
                }
                Container::Bitset(b) => {
                    for &word in b.words().iter() {
                        out.extend_from_slice(&word.to_le_bytes());
                    }
                }
                Container::Runs(r) => {
                    out.extend_from_slice(&(r.num_runs() as u16).to_le_bytes());
                    for run in r.runs() {
                        out.extend_from_slice(&run.start.to_le_bytes());
                        out.extend_from_slice(&run.length.to_le_bytes());
                    }
                }
            }
        }

        out
    }

    /// Serialize into a writer, returning the number of bytes written.
    pub fn write_into<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let bytes = self.to_bytes();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Deserialize a buffer produced by [`ChunkedBitmap::to_bytes`] (or by
    /// any writer of the same layout). The whole buffer is validated
    /// before a bitmap is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut off = 0usize;

        let mut take = |n: usize| -> Result<&[u8]> {
            if off + n > bytes.len() {
                return Err(Error::InvalidEncoding(
                    "unexpected end of input".to_string(),
                ));
            }
            let slice = &bytes[off..off + n];
            off += n;
            Ok(slice)
        };

        let cookie = u32::from_le_bytes(take(4)?.try_into().unwrap());
        let (n, run_flags) = if cookie & 0xFFFF == COOKIE_RUNS {
            let n = (cookie >> 16) as usize + 1;
            let flags = take((n + 7) / 8)?.to_vec();
            if n % 8 != 0 && flags[n / 8] >> (n % 8) != 0 {
                return Err(Error::InvalidEncoding(
                    "run marker bits past the chunk count".to_string(),
                ));
            }
            (n, Some(flags))
        } else if cookie == COOKIE_NO_RUNS {
            let n = u32::from_le_bytes(take(4)?.try_into().unwrap()) as usize;
            if n > 1 << 16 {
                return Err(Error::InvalidEncoding(format!(
                    "chunk count {n} exceeds the number of chunks"
                )));
            }
            (n, None)
        } else {
            return Err(Error::InvalidEncoding(format!(
                "unknown cookie {cookie:#010x}"
            )));
        };

        let mut keys = Vec::with_capacity(n);
        let mut cards = Vec::with_capacity(n);
        for _ in 0..n {
            let key = u16::from_le_bytes(take(2)?.try_into().unwrap());
            let card = u32::from(u16::from_le_bytes(take(2)?.try_into().unwrap())) + 1;
            if keys.last().map_or(false, |&prev| prev >= key) {
                return Err(Error::InvalidEncoding(
                    "chunk keys not strictly ascending".to_string(),
                ));
            }
            keys.push(key);
            cards.push(card);
        }

        let offsets = if run_flags.is_none() && n >= NO_OFFSET_THRESHOLD {
            let mut offsets = Vec::with_capacity(n);
            for _ in 0..n {
                offsets.push(u32::from_le_bytes(take(4)?.try_into().unwrap()));
            }
            Some(offsets)
        } else {
            None
        };

        let mut bitmap = ChunkedBitmap::new();
        let mut payload_pos = 0u32;
        for i in 0..n {
            if let Some(offsets) = &offsets {
                if offsets[i] != payload_pos {
                    return Err(Error::InvalidEncoding(format!(
                        "offset table entry {i} disagrees with the payload"
                    )));
                }
            }
            let is_run = run_flags
                .as_ref()
                .map_or(false, |flags| flags[i / 8] & (1 << (i % 8)) != 0);
            let card = cards[i];

            let container = if is_run {
                let count = usize::from(u16::from_le_bytes(take(2)?.try_into().unwrap()));
                if count == 0 {
                    return Err(Error::InvalidEncoding("empty run list".to_string()));
                }
                let mut runs: Vec<Interval> = Vec::with_capacity(count);
                let mut total = 0u32;
                for _ in 0..count {
                    let start = u16::from_le_bytes(take(2)?.try_into().unwrap());
                    let length = u16::from_le_bytes(take(2)?.try_into().unwrap());
                    let run = Interval::new(start, length);
                    if u32::from(start) + u32::from(length) > 0xFFFF {
                        return Err(Error::InvalidEncoding(
                            "run overflows the chunk".to_string(),
                        ));
                    }
                    if let Some(prev) = runs.last() {
                        if u32::from(start) <= prev.end() {
                            return Err(Error::InvalidEncoding(
                                "run list not normalized".to_string(),
                            ));
                        }
                    }
                    total += run.run_len();
                    runs.push(run);
                }
                if total != card {
                    return Err(Error::InvalidEncoding(format!(
                        "run lengths sum to {total}, descriptor says {card}"
                    )));
                }
                payload_pos += 2 + 4 * count as u32;
                Container::Runs(RunContainer::from_intervals(runs))
            } else if card as usize <= DEFAULT_MAX_SIZE {
                let raw = take(2 * card as usize)?;
                let mut values = Vec::with_capacity(card as usize);
                for pair in raw.chunks_exact(2) {
                    let v = u16::from_le_bytes(pair.try_into().unwrap());
                    if values.last().map_or(false, |&prev| prev >= v) {
                        return Err(Error::InvalidEncoding(
                            "array values not strictly ascending".to_string(),
                        ));
                    }
                    values.push(v);
                }
                payload_pos += 2 * card;
                Container::Array(ArrayContainer::from_sorted(values))
            } else {
                let raw = take(8 * BITSET_WORDS)?;
                let mut words = Box::new([0u64; BITSET_WORDS]);
                for (w, chunk) in words.iter_mut().zip(raw.chunks_exact(8)) {
                    *w = u64::from_le_bytes(chunk.try_into().unwrap());
                }
                let bits = BitsetContainer::from_words(words);
                if bits.cardinality() != card {
                    return Err(Error::InvalidEncoding(format!(
                        "bitset popcount {} disagrees with descriptor {card}",
                        bits.cardinality()
                    )));
                }
                payload_pos += 8 * BITSET_WORDS as u32;
                Container::Bitset(bits)
            };
            bitmap.chunks.append(keys[i], Arc::new(container));
        }

        if off != bytes.len() {
            return Err(Error::InvalidEncoding(
                "trailing bytes after the last payload".to_string(),
            ));
        }
        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(bitmap: &ChunkedBitmap) -> ChunkedBitmap {
        let bytes = bitmap.to_bytes();
        assert_eq!(bytes.len(), bitmap.serialized_size());
        ChunkedBitmap::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_roundtrip_empty() {
        let b = ChunkedBitmap::new();
        assert_eq!(roundtrip(&b), b);
        assert_eq!(b.serialized_size(), 8);
    }

    #[test]
    fn test_roundtrip_arrays_without_offsets() {
        // three chunks stay below the offset threshold
        let b = ChunkedBitmap::of(&[1, 2, 70_000, 140_000]);
        let bytes = b.to_bytes();
        assert_eq!(&bytes[..4], &COOKIE_NO_RUNS.to_le_bytes());
        assert_eq!(bytes.len(), 8 + 3 * 4 + 2 * 4);
        assert_eq!(ChunkedBitmap::from_bytes(&bytes).unwrap(), b);
    }

    #[test]
    fn test_roundtrip_arrays_with_offsets() {
        let b = ChunkedBitmap::of(&[1, 70_000, 140_000, 210_000, 280_000]);
        let bytes = b.to_bytes();
        // header + descriptors + offset table + payloads
        assert_eq!(bytes.len(), 8 + 5 * 4 + 5 * 4 + 5 * 2);
        assert_eq!(ChunkedBitmap::from_bytes(&bytes).unwrap(), b);
    }

    #[test]
    fn test_roundtrip_mixed_variants() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 100_000).unwrap();
        b.run_optimize();
        for v in 0..5000u32 {
            b.insert(200_000 + 2 * v);
        }
        b.insert(4_000_000_000);
        let restored = roundtrip(&b);
        assert_eq!(restored, b);
        // representations survive byte-exactly
        assert_eq!(restored.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_runs_cookie_layout() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 1 << 17).unwrap();
        let bytes = b.to_bytes();
        let cookie = u32::from_le_bytes(bytes[..4].try_into().unwrap());
        assert_eq!(cookie & 0xFFFF, COOKIE_RUNS);
        assert_eq!(cookie >> 16, 1); // two chunks
        assert_eq!(bytes[4], 0b11); // both are runs
        assert_eq!(bytes.len(), 4 + 1 + 2 * 4 + 2 * 6);
        assert_eq!(ChunkedBitmap::from_bytes(&bytes).unwrap(), b);
    }

    #[test]
    fn test_rejects_unknown_cookie() {
        let err = ChunkedBitmap::from_bytes(&0xDEAD_BEEFu32.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[test]
    fn test_rejects_truncation_anywhere() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 100_000).unwrap();
        b.run_optimize();
        b.insert(300_000);
        let bytes = b.to_bytes();
        for cut in 0..bytes.len() {
            assert!(
                ChunkedBitmap::from_bytes(&bytes[..cut]).is_err(),
                "truncation at {cut} must fail"
            );
        }
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = ChunkedBitmap::of(&[1, 2, 3]).to_bytes();
        bytes.push(0);
        assert!(ChunkedBitmap::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_unsorted_keys() {
        let b = ChunkedBitmap::of(&[1, 70_000]);
        let mut bytes = b.to_bytes();
        // swap the two descriptors
        let (d0, d1) = (8, 12);
        for k in 0..4 {
            bytes.swap(d0 + k, d1 + k);
        }
        assert!(ChunkedBitmap::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_bad_offset_table() {
        let b = ChunkedBitmap::of(&[1, 70_000, 140_000, 210_000]);
        let mut bytes = b.to_bytes();
        // corrupt the second offset entry
        let table = 8 + 4 * 4;
        bytes[table + 4] ^= 1;
        assert!(ChunkedBitmap::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_cardinality_mismatch() {
        let mut b = ChunkedBitmap::new();
        b.insert_range(0, 1 << 17).unwrap();
        let mut bytes = b.to_bytes();
        // first descriptor's cardinality-1 field lives after the run flags
        bytes[4 + 1 + 2] ^= 1;
        assert!(ChunkedBitmap::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_denormalized_runs() {
        let mut b = ChunkedBitmap::new();
        b.insert(10);
        b.insert_range(100, 200).unwrap();
        // one run chunk: force two adjacent runs through the raw layout
        b.run_optimize();
        let mut bytes = b.to_bytes();
        // payload = run count, then pairs; make the second run touch the
        // first by rewriting it as [10, 10] + [11, ...]
        let payload = 4 + 1 + 4;
        assert_eq!(
            u16::from_le_bytes(bytes[payload..payload + 2].try_into().unwrap()),
            2
        );
        bytes[payload + 2..payload + 6].copy_from_slice(&[10, 0, 0, 0]);
        bytes[payload + 6..payload + 10].copy_from_slice(&[11, 0, 99, 0]);
        assert!(ChunkedBitmap::from_bytes(&bytes).is_err());
    }
}
