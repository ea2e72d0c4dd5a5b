//! # Compressed Bitmaps
//!
//! *Hybrid chunked containers for integer sets of any density.*
//!
//! ## Intuition First
//!
//! Imagine a filing cabinet with 65,536 drawers, one per 16-bit prefix of
//! the 32-bit universe. A drawer with a handful of documents gets a thin
//! folder (a sorted array). A drawer stuffed with documents gets a fixed
//! grid of pigeonholes (a dense bitset). A drawer holding long unbroken
//! spans gets a note that just says "everything from here to there" (run
//! lengths). The cabinet keeps swapping each drawer to whichever storage
//! is smallest, and set operations open only the drawers both cabinets
//! actually use.
//!
//! ## The Problem
//!
//! Uncompressed bitsets spend one bit per possible value: 512 MiB for the
//! full 32-bit universe, no matter how few elements are present. Sorted
//! vectors are compact when sparse but make union and intersection linear
//! in the total size. Real workloads (inverted indexes, column filters,
//! OLAP predicates) mix sparse, dense, and clustered regions in the same
//! set.
//!
//! ## Historical Context
//!
//! ```text
//! 1987  Fraenkel     Bit-vector compression for information retrieval
//! 2001  Wu           Byte-aligned bitmap codes (BBC) in commercial DBs
//! 2006  Wu-Otoo      Word-aligned hybrid (WAH) run-length bitmaps
//! 2010  Colantonio   Concise: WAH with literal-word piggybacking
//! 2016  Chambi-Lemire Two-level chunked containers ("roaring")
//! 2018  Lemire       Run containers and galloping intersections
//! ```
//!
//! The chunked-container insight is that compression should follow the
//! *local* density of the set: a single representation chosen globally is
//! always wrong somewhere.
//!
//! ## Design
//!
//! - Elements are split as `(x >> 16, x & 0xFFFF)`: the high key selects a
//!   chunk, the low key lives in the chunk's container.
//! - Containers switch representation after every mutation so that the
//!   stored form is never larger than the best alternative (arrays up to
//!   4096 values, bitsets above, runs only via `run_optimize`).
//! - Set algebra dispatches on the pair of representations; all nine
//!   ordered pairs have specialized paths.
//! - The serialized layout is little-endian and byte-stable, with a
//!   cookie distinguishing run-free from run-carrying bitmaps.
//!
//! ## Complexity Analysis
//!
//! - **Membership**: one binary search over at most 65,536 keys plus an
//!   O(1) or O(log n) container probe.
//! - **Union/intersection**: linear in the number of *containers*, with
//!   per-container costs proportional to the smaller representation.
//! - **Space**: 2 bytes per sparse value, 8 KiB per dense chunk, 4 bytes
//!   per run, whichever is least.
//!
//! ## What Could Go Wrong
//!
//! 1. **Boundary arithmetic**: the exclusive bounds 2^16 and 2^32 do not
//!    fit in `u16`/`u32`. Range ends are carried one integer width up and
//!    clamped only at the façade.
//! 2. **Representation drift**: every mutation must leave the container in
//!    the cheapest representation, or equality, size reporting, and the
//!    serialized form silently degrade.
//!
//! ## References
//!
//! - Chambi, S., Lemire, D., Kaser, O., & Godin, R. (2016). "Better
//!   bitmap performance with Roaring bitmaps."
//! - Lemire, D., et al. (2018). "Roaring bitmaps: Implementation of an
//!   optimized software library."
//! - Wu, K., Otoo, E., & Shoshani, A. (2006). "Optimizing bitmap indices
//!   with efficient compression."

#![warn(missing_docs)]
#![warn(clippy::all)]

mod array;
mod bitset;
mod chunks;
mod container;
mod runs;
mod serialize;

pub mod bitmap;
pub mod error;
pub mod iter;

pub use bitmap::{ChunkedBitmap, Statistics, MAX_RANGE_END};
pub use error::{Error, Result};
pub use iter::{Iter, ManyIter, ReverseIter};
