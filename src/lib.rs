//! A library implementing a gap buffer.
//!
//! # What is a gap buffer?
//!
//! A gap buffer is a data structure for representing a sequence of items, similar to a [`Vec<T>`].
//! It keeps one contiguous run of unused slots (the gap) inside an otherwise packed allocation.
//! Insertions and removals near the gap only need to write into it or extend it, while a plain
//! vector has to shift its entire tail on every edit. Moving the gap to a new position costs one
//! memmove proportional to the distance moved, so a burst of edits around the same position is
//! cheap after the first one. This makes the structure a classic backing store for text editors
//! and other workloads where edits cluster around a slowly moving point.
//!
//! The trade-off is that a far jump of the edit position costs O(distance), and random single
//! edits scattered over the sequence degrade to the same O(n) as a vector. For workloads without
//! edit locality, prefer [`Vec<T>`] or a tree-based sequence.
//!
//! [`Vec<T>`]: https://doc.rust-lang.org/std/vec/struct.Vec.html
//!
//! The main type is [`GapBuffer`], with [`Cursor`]/[`CursorMut`] providing positioned views that
//! stay meaningful while the gap moves underneath them.
#![deny(missing_docs)]

mod error;
mod raw;

#[macro_use]
pub mod buffer;
pub mod cursor;

#[doc(inline)]
pub use buffer::{GapBuffer, IntoIter, Iter, IterMut};

#[doc(inline)]
pub use cursor::{Cursor, CursorMut};

pub use error::{Error, Result};

/// The capacity a buffer starts out with when no capacity is requested, and the floor any
/// reallocation grows to.
pub const DEFAULT_CAPACITY: usize = 8;

/// The slot granularity of the backing storage. Every capacity is a multiple of this, which
/// batches reallocations for runs of small insertions.
pub const CAPACITY_ALIGNMENT: usize = 8;

/// Rounds `n` up to the next multiple of [`CAPACITY_ALIGNMENT`], or `None` on overflow.
pub(crate) fn round_up_to_alignment(n: usize) -> Option<usize> {
    let mask = CAPACITY_ALIGNMENT - 1;
    n.checked_add(mask).map(|padded| padded & !mask)
}
