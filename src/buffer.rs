//! A sequence container built around a movable gap.
//!
//! # Terminology
//!
//! * Gap
//!
//! A contiguous run of vacant slots inside the backing storage. Edits at the gap's position only
//! write into it or extend it; the gap is relocated, not reallocated, to absorb most edits.
//!
//! * Zone A / Zone B
//!
//! The live-element regions physically before and after the gap. Zone A holds logical elements
//! `[0, gap_start)` in place; zone B holds `[gap_start, len)` displaced right by the gap width.
//!
//! * Logical offset
//!
//! An element's position in the conceptual sequence, independent of its physical slot. The
//! translation is a single comparison: offsets below `gap_start` map to themselves, the rest map
//! past the gap.
//!
//! * Relocation
//!
//! Moving the gap to a new logical offset by shifting the run of elements between the old and new
//! positions across it. Only that run moves, so the cost is O(distance), not O(len).
//!
//! # Invariants
//!
//! After every public operation returns:
//!
//! 1. `gap_start + gap_size <= capacity`.
//! 2. `len + gap_size == capacity`; the gap accounts for every vacant slot.
//! 3. `capacity` is a multiple of [`CAPACITY_ALIGNMENT`](crate::CAPACITY_ALIGNMENT).
//! 4. Slots outside the gap hold live elements; slots inside it hold nothing.
//!
//! # Growth
//!
//! Reallocation is triggered only by an insertion larger than the gap. The new capacity adds
//! the larger of one fifth of the old capacity and the actual shortfall, rounded up to the slot
//! alignment, so a burst of insertions is paid for by a single reallocation sized to the burst.
//! [`GapBuffer::reserve`] performs the same rebuild early; capacity is never voluntarily
//! reduced.
//!
//! # Performance
//!
//! | Operation | Cost |
//! | --- | --- |
//! | [`Index`][GapBuffer::get] | O(1) |
//! | [`Insert at gap`][GapBuffer::insert] | O(1) amortized |
//! | [`Insert at distance d from gap`][GapBuffer::insert] | O(d) amortized |
//! | [`Remove at gap`][GapBuffer::remove] | O(1) |
//! | [`Remove at distance d from gap`][GapBuffer::remove] | O(d) |
//! | [`Push back`][GapBuffer::push_back] | O(1) amortized* |
//! | [`Iterate`][GapBuffer::iter] | O(len) |
//!
//! *O(1) once the gap sits at the end, as it does after any append.

use crate::cursor::{Cursor, CursorMut};
use crate::error::{Error, Result};
use crate::raw::RawBuffer;
use crate::{round_up_to_alignment, DEFAULT_CAPACITY};
use std::cmp;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::{self, FromIterator, FusedIterator};
use std::mem::{self, ManuallyDrop};
use std::ops::{Index, IndexMut, Range};
use std::ptr;

/// The divisor applied to the old capacity when sizing a reallocation: grow by at least a fifth.
const GROWTH_DIVISOR: usize = 5;

/// Construct a gap buffer.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate libgap;
/// let buffer = gap_buffer![1, 2, 3];
/// assert_eq!(buffer.len(), 3);
/// assert_eq!(buffer.get(1), Some(&2));
/// ```
#[macro_export]
macro_rules! gap_buffer {
    () => { $crate::buffer::GapBuffer::new() };

    ( $($x:expr),* ) => {{
        let mut l = $crate::buffer::GapBuffer::new();
        $(
            l.push_back($x);
        )*
            l
    }};

    ( $($x:expr ,)* ) => {{
        let mut l = $crate::buffer::GapBuffer::new();
        $(
            l.push_back($x);
        )*
            l
    }};
}

/// A contiguous, growable sequence of elements of type `T` with a movable gap.
///
/// Elements are addressed by logical offset, exactly as in a `Vec<T>`; the gap's position is an
/// implementation detail that only shows up in the cost model. Edits clustered around one
/// position run in amortized O(1) after the gap has moved there once.
///
/// # Examples
///
/// ```
/// use libgap::GapBuffer;
///
/// let mut buffer: GapBuffer<char> = "hello".chars().collect();
/// buffer.insert(0, 'o');
/// buffer.push_back('!');
/// assert_eq!(buffer.iter().collect::<String>(), "ohello!");
///
/// buffer.remove_range(0..2);
/// assert_eq!(buffer.iter().collect::<String>(), "ello!");
/// ```
///
/// Direct access to the backing storage is deliberately not offered; every access goes through
/// the logical-to-physical translation so the gap can move freely.
pub struct GapBuffer<T> {
    data: RawBuffer<T>,
    gap_start: usize,
    gap_size: usize,
}

impl<T> GapBuffer<T> {
    /// Creates an empty buffer with [`DEFAULT_CAPACITY`] slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgap::GapBuffer;
    ///
    /// let buffer: GapBuffer<i32> = GapBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        GapBuffer::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty buffer with at least `capacity` slots, rounded up to the slot alignment.
    ///
    /// Panics if the capacity overflows or the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        let rounded = round_up_to_alignment(capacity).expect("capacity overflow");
        let data = RawBuffer::try_allocate(rounded).expect("gap buffer allocation failed");
        GapBuffer {
            data,
            gap_start: 0,
            gap_size: rounded,
        }
    }

    /// Creates a buffer holding `len` default-constructed elements.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut buffer = GapBuffer::with_capacity(len);
        for _ in 0..len {
            buffer.data.write(buffer.gap_start, T::default());
            buffer.gap_start += 1;
            buffer.gap_size -= 1;
        }
        buffer
    }

    /// Creates a buffer holding `len` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgap::GapBuffer;
    ///
    /// let buffer = GapBuffer::from_elem('a', 3);
    /// assert_eq!(buffer.iter().collect::<String>(), "aaa");
    /// ```
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        let mut buffer = GapBuffer::with_capacity(len);
        for _ in 0..len {
            buffer.data.write(buffer.gap_start, value.clone());
            buffer.gap_start += 1;
            buffer.gap_size -= 1;
        }
        buffer
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.capacity() - self.gap_size
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the backing storage, live and vacant alike.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the current width of the gap, i.e. how many elements can be inserted at its
    /// position before a reallocation.
    pub fn gap_len(&self) -> usize {
        self.gap_size
    }

    /// Returns the largest capacity a buffer of this element type can have.
    pub fn max_capacity(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            usize::max_value()
        } else {
            isize::max_value() as usize / mem::size_of::<T>()
        }
    }

    /// Translates a logical offset to its physical slot. Offsets in zone A map to themselves,
    /// offsets in zone B are displaced past the gap.
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_size
        }
    }

    /// Gets a reference to the element at logical offset `index`.
    ///
    /// Returns `None` if the offset is out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            unsafe { Some(self.data.slot_ref(self.physical(index))) }
        } else {
            None
        }
    }

    /// Gets a mutable reference to the element at logical offset `index`.
    ///
    /// Returns `None` if the offset is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let slot = self.physical(index);
            unsafe { Some(&mut *self.data.slot_ptr_mut(slot)) }
        } else {
            None
        }
    }

    /// Gets a reference to the element at logical offset `index`, reporting an
    /// [`Error::IndexOutOfRange`] instead of panicking on a bad offset.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.get(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Gets a mutable reference to the element at logical offset `index`, reporting an
    /// [`Error::IndexOutOfRange`] instead of panicking on a bad offset.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Gets a reference to the first element, or `None` if the buffer is empty.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Gets a reference to the last element, or `None` if the buffer is empty.
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.get(self.len() - 1)
        }
    }

    /// Gets a mutable reference to the first element, or `None` if the buffer is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Gets a mutable reference to the last element, or `None` if the buffer is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            None
        } else {
            let end = self.len() - 1;
            self.get_mut(end)
        }
    }

    /// Moves the gap so that it starts at logical offset `offset`, shifting only the run of
    /// elements between the old and new positions. No-op if the gap is already there.
    fn relocate_gap(&mut self, offset: usize) {
        debug_assert!(offset <= self.len());
        if offset == self.gap_start {
            return;
        }
        unsafe {
            if offset > self.gap_start {
                // The prefix of zone B up to the target slides left into the gap.
                let count = offset - self.gap_start;
                self.data
                    .shift(self.gap_start + self.gap_size, self.gap_start, count);
            } else {
                // The suffix of zone A from the target slides right to the gap's end.
                let count = self.gap_start - offset;
                self.data.shift(offset, offset + self.gap_size, count);
            }
        }
        self.gap_start = offset;
    }

    /// Inserts `element` before logical offset `index`. `index == len` appends.
    ///
    /// Panics if `index > len` or if a required reallocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate libgap;
    /// let mut buffer = gap_buffer![1, 3];
    /// buffer.insert(1, 2);
    /// assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, element: T) {
        self.insert_many(index, iter::once(element));
    }

    /// Inserts every element of `iterable` before logical offset `index`, in order, and returns
    /// the offset of the first inserted element (i.e. `index`).
    ///
    /// Panics if `index > len` or if a required reallocation fails. Use
    /// [`try_insert_many`](GapBuffer::try_insert_many) to surface allocation failure instead.
    pub fn insert_many<I>(&mut self, index: usize, iterable: I) -> usize
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.try_insert_many(index, iterable)
            .expect("gap buffer reallocation failed")
    }

    /// Inserts every element of `iterable` before logical offset `index`, reporting reallocation
    /// failures instead of panicking.
    ///
    /// When the elements fit the gap this never fails. When they do not, the buffer is rebuilt
    /// at a larger capacity; on failure the buffer is unchanged and nothing is leaked.
    ///
    /// Panics if `index > len`, which is a contract breach rather than a recoverable error.
    pub fn try_insert_many<I>(&mut self, index: usize, iterable: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        assert!(
            index <= self.len(),
            "insert index {} out of bounds for gap buffer of length {}",
            index,
            self.len()
        );
        let mut items = iterable.into_iter();
        let count = items.len();
        if count <= self.gap_size {
            self.relocate_gap(index);
            for _ in 0..count {
                let item = match items.next() {
                    Some(item) => item,
                    None => break,
                };
                self.data.write(self.gap_start, item);
                self.gap_start += 1;
                self.gap_size -= 1;
            }
            Ok(index)
        } else {
            self.grow_and_insert(index, &mut items, count)
        }
    }

    /// The reallocating insert path: builds a fresh arena sized for the shortfall, fills in the
    /// new elements, then moves both zones across. The old buffer is not touched until the new
    /// elements exist, so a failure here leaves `self` unchanged.
    fn grow_and_insert(
        &mut self,
        index: usize,
        items: &mut impl ExactSizeIterator<Item = T>,
        count: usize,
    ) -> Result<usize> {
        let old_len = self.len();
        let old_capacity = self.capacity();
        let max = self.max_capacity();
        let overflow = Error::CapacityExceeded {
            requested: old_len.saturating_add(count),
            max,
        };

        let deficit = count - self.gap_size;
        let incremental = old_capacity / GROWTH_DIVISOR;
        let delta = round_up_to_alignment(cmp::max(incremental, deficit)).ok_or(overflow)?;
        let new_capacity = cmp::max(
            old_capacity.checked_add(delta).ok_or(overflow)?,
            DEFAULT_CAPACITY,
        );
        if new_capacity > max {
            return Err(overflow);
        }

        let mut fresh = RawBuffer::try_allocate(new_capacity)?;
        let filled = {
            let mut guard = FillGuard {
                arena: &mut fresh,
                start: index,
                filled: 0,
            };
            for _ in 0..count {
                let item = match items.next() {
                    Some(item) => item,
                    None => break,
                };
                guard.arena.write(guard.start + guard.filled, item);
                guard.filled += 1;
            }
            let filled = guard.filled;
            mem::forget(guard);
            filled
        };

        self.relocate_gap(index);
        let tail_start = self.gap_start + self.gap_size;
        unsafe {
            self.data.move_range_to(0..self.gap_start, &mut fresh, 0);
            self.data
                .move_range_to(tail_start..old_capacity, &mut fresh, index + filled);
        }
        self.data = fresh;
        self.gap_start = old_len + filled;
        self.gap_size = new_capacity - self.gap_start;
        Ok(index)
    }

    /// Inserts `count` clones of `value` before logical offset `index`.
    pub fn insert_copies(&mut self, index: usize, count: usize, value: T)
    where
        T: Clone,
    {
        self.insert_many(index, (0..count).map(|_| value.clone()));
    }

    /// Appends an element to the end of the buffer.
    pub fn push_back(&mut self, element: T) {
        let end = self.len();
        self.insert(end, element);
    }

    /// Removes and returns the last element, or `None` if the buffer is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            let end = self.len() - 1;
            Some(self.remove(end))
        }
    }

    /// Removes and returns the element at logical offset `index`.
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len(),
            "remove index {} out of bounds for gap buffer of length {}",
            index,
            self.len()
        );
        self.relocate_gap(index);
        let slot = self.gap_start + self.gap_size;
        self.gap_size += 1;
        unsafe { self.data.read(slot) }
    }

    /// Removes the elements in `range`, dropping each one immediately so owned resources are
    /// released before the slots become gap space. Returns the offset of the removal point.
    ///
    /// Panics if the range is malformed or reaches past the end.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate libgap;
    /// let mut buffer = gap_buffer![1, 2, 3, 4, 5];
    /// buffer.remove_range(1..4);
    /// assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), [1, 5]);
    /// ```
    pub fn remove_range(&mut self, range: Range<usize>) -> usize {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "range {}..{} out of bounds for gap buffer of length {}",
            range.start,
            range.end,
            self.len()
        );
        let count = range.end - range.start;
        self.relocate_gap(range.start);
        for _ in 0..count {
            // Extend the gap over the slot before destroying it, so a panicking Drop cannot
            // cause the element to be destroyed twice.
            let slot = self.gap_start + self.gap_size;
            self.gap_size += 1;
            unsafe { self.data.drop_slot(slot) };
        }
        range.start
    }

    /// Removes the elements in `range` and inserts the elements of `iterable` at the same
    /// offset. Returns the offset of the splice point.
    pub fn replace_range<I>(&mut self, range: Range<usize>, iterable: I) -> usize
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let at = self.remove_range(range);
        self.insert_many(at, iterable)
    }

    /// Appends every element of `iterable` to the end of the buffer.
    pub fn append<I>(&mut self, iterable: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let end = self.len();
        self.insert_many(end, iterable);
    }

    /// Replaces the entire contents with the elements of `iterable`.
    ///
    /// The replacement is built to completion first and then swapped in, so a failure while
    /// building it leaves the buffer untouched.
    pub fn assign<I>(&mut self, iterable: I)
    where
        I: IntoIterator<Item = T>,
    {
        let replacement: GapBuffer<T> = iterable.into_iter().collect();
        *self = replacement;
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        let len = self.len();
        self.remove_range(0..len);
    }

    /// Shortens the buffer to at most `new_len` elements, removing the tail. No-op if the buffer
    /// is already short enough.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len();
        if new_len < len {
            self.remove_range(new_len..len);
        }
    }

    /// Resizes the buffer to exactly `new_len` elements, either removing the tail or appending
    /// clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
        } else {
            self.insert_copies(len, new_len - len, value);
        }
    }

    /// Ensures the capacity is at least `new_capacity`, rebuilding the storage early if needed.
    ///
    /// Panics on failure; use [`try_reserve`](GapBuffer::try_reserve) to recover instead.
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity)
            .expect("gap buffer reallocation failed")
    }

    /// Ensures the capacity is at least `new_capacity`, reporting failure instead of panicking.
    ///
    /// No-op when the capacity is already sufficient. Fails with
    /// [`Error::CapacityExceeded`] when the rounded-up request is not representable for the
    /// element type, and with [`Error::AllocationFailed`] when the allocator refuses; the buffer
    /// is unchanged in either case.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgap::GapBuffer;
    ///
    /// let mut buffer: GapBuffer<u8> = (0..10).collect();
    /// buffer.try_reserve(100).unwrap();
    /// assert!(buffer.capacity() >= 100);
    /// assert_eq!(buffer.len(), 10);
    /// ```
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if self.capacity() >= new_capacity {
            return Ok(());
        }
        let max = self.max_capacity();
        let exceeded = Error::CapacityExceeded {
            requested: new_capacity,
            max,
        };
        let rounded = round_up_to_alignment(new_capacity).ok_or(exceeded)?;
        if rounded > max {
            return Err(exceeded);
        }

        let mut fresh = RawBuffer::try_allocate(rounded)?;
        let len = self.len();
        let capacity = self.capacity();
        let tail_start = self.gap_start + self.gap_size;
        unsafe {
            self.data.move_range_to(0..self.gap_start, &mut fresh, 0);
            self.data
                .move_range_to(tail_start..capacity, &mut fresh, self.gap_start);
        }
        self.data = fresh;
        self.gap_start = len;
        self.gap_size = rounded - len;
        Ok(())
    }

    /// Does nothing. Capacity is never voluntarily reduced below what growth produced: the
    /// workloads this structure targets re-grow shortly after shrinking, so handing memory back
    /// only to reallocate it is a deliberate non-feature.
    pub fn shrink_to_fit(&mut self) {}

    /// Exchanges the complete contents and storage of two buffers in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Clones the elements in `range` into a new buffer.
    ///
    /// Panics if the range is malformed or reaches past the end.
    pub fn slice(&self, range: Range<usize>) -> GapBuffer<T>
    where
        T: Clone,
    {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "range {}..{} out of bounds for gap buffer of length {}",
            range.start,
            range.end,
            self.len()
        );
        self.iter()
            .skip(range.start)
            .take(range.end - range.start)
            .cloned()
            .collect()
    }

    /// Creates an iterator over the elements in logical order.
    ///
    /// The iterator is double-ended; `iter().rev()` walks the sequence back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Creates a mutable iterator over the elements in logical order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len();
        IterMut {
            buffer: self,
            front: 0,
            back: len,
        }
    }

    /// Creates a read-only cursor positioned at logical offset `offset`.
    ///
    /// Panics if `offset > len`.
    pub fn cursor(&self, offset: usize) -> Cursor<'_, T> {
        Cursor::new(self, offset)
    }

    /// Creates an editing cursor positioned at logical offset `offset`.
    ///
    /// Panics if `offset > len`.
    pub fn cursor_mut(&mut self, offset: usize) -> CursorMut<'_, T> {
        CursorMut::new(self, offset)
    }

    #[cfg(test)]
    fn assert_invariants(&self) -> bool {
        let capacity = self.capacity();
        self.gap_start + self.gap_size <= capacity
            && self.len() + self.gap_size == capacity
            && capacity % crate::CAPACITY_ALIGNMENT == 0
    }
}

/// Destroys the elements already written into a half-built arena if filling it unwinds.
struct FillGuard<'a, T> {
    arena: &'a mut RawBuffer<T>,
    start: usize,
    filled: usize,
}

impl<'a, T> Drop for FillGuard<'a, T> {
    fn drop(&mut self) {
        unsafe { self.arena.drop_range(self.start..self.start + self.filled) }
    }
}

impl<T> Drop for GapBuffer<T> {
    fn drop(&mut self) {
        let tail_start = self.gap_start + self.gap_size;
        let capacity = self.capacity();
        unsafe {
            self.data.drop_range(0..self.gap_start);
            self.data.drop_range(tail_start..capacity);
        }
    }
}

impl<T> Default for GapBuffer<T> {
    fn default() -> Self {
        GapBuffer::new()
    }
}

impl<T: Clone> Clone for GapBuffer<T> {
    /// Deep-copies the logical sequence. The clone gets its own freshly sized gap at the end;
    /// the original's gap position does not carry over.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: Debug> Debug for GapBuffer<T> {
    fn fmt(&self, fmt: &mut Formatter) -> std::result::Result<(), fmt::Error> {
        fmt.write_str("[")?;
        let mut first = true;
        for item in self.iter() {
            if first {
                first = false;
            } else {
                fmt.write_str(", ")?;
            }
            item.fmt(fmt)?;
        }
        fmt.write_str("]")?;
        Ok(())
    }
}

impl<T> Index<usize> for GapBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
            .expect("index out of bounds for gap buffer")
    }
}

impl<T> IndexMut<usize> for GapBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
            .expect("index out of bounds for gap buffer")
    }
}

impl<T: PartialEq> PartialEq for GapBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for GapBuffer<T> {}

impl<T: PartialOrd> PartialOrd for GapBuffer<T> {
    /// Lexicographic: the first mismatching pair decides; a strict prefix is less.
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for GapBuffer<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for GapBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T> FromIterator<T> for GapBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        let items = iterable.into_iter();
        let (lower, _) = items.size_hint();
        let mut buffer = GapBuffer::with_capacity(cmp::max(lower, DEFAULT_CAPACITY));
        for item in items {
            buffer.push_back(item);
        }
        buffer
    }
}

impl<T> Extend<T> for GapBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for item in iterable {
            self.push_back(item);
        }
    }
}

impl<T> From<Vec<T>> for GapBuffer<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for GapBuffer<T> {
    fn from(items: &[T]) -> Self {
        items.iter().cloned().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for GapBuffer<T> {
    fn from(items: [T; N]) -> Self {
        Vec::from(items).into_iter().collect()
    }
}

/// An iterator over a buffer, obtained by the [`GapBuffer::iter`] method.
///
/// Every step re-resolves its logical offset through the buffer's current translation, so the
/// iterator is oblivious to where the gap happens to sit.
pub struct Iter<'a, T> {
    buffer: &'a GapBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            None
        } else {
            let result = self.buffer.get(self.front);
            self.front += 1;
            result
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            self.buffer.get(self.back)
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a GapBuffer<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// A mutable iterator over a buffer, obtained by the [`GapBuffer::iter_mut`] method.
pub struct IterMut<'a, T> {
    buffer: &'a mut GapBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            None
        } else {
            let slot = self.buffer.physical(self.front);
            self.front += 1;
            unsafe { Some(&mut *self.buffer.data.slot_ptr_mut(slot)) }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            let slot = self.buffer.physical(self.back);
            unsafe { Some(&mut *self.buffer.data.slot_ptr_mut(slot)) }
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

impl<'a, T> IntoIterator for &'a mut GapBuffer<T> {
    type IntoIter = IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// A consuming iterator over a buffer, obtained by the `into_iter` method.
pub struct IntoIter<T> {
    data: RawBuffer<T>,
    gap_start: usize,
    gap_size: usize,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_size
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            None
        } else {
            let slot = self.physical(self.front);
            self.front += 1;
            unsafe { Some(self.data.read(slot)) }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            let slot = self.physical(self.back);
            unsafe { Some(self.data.read(slot)) }
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for index in self.front..self.back {
            let slot = self.physical(index);
            unsafe { self.data.drop_slot(slot) };
        }
    }
}

impl<T> IntoIterator for GapBuffer<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> IntoIter<T> {
        // The buffer's own Drop must not run; the consuming iterator takes over ownership of
        // both the arena and the liveness bookkeeping.
        let buffer = ManuallyDrop::new(self);
        let gap_start = buffer.gap_start;
        let gap_size = buffer.gap_size;
        let data = unsafe { ptr::read(&buffer.data) };
        let len = data.capacity() - gap_size;
        IntoIter {
            data,
            gap_start,
            gap_size,
            front: 0,
            back: len,
        }
    }
}

#[allow(clippy::cognitive_complexity)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::CAPACITY_ALIGNMENT;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;
    use std::collections::hash_map::DefaultHasher;
    use std::rc::Rc;

    fn chars(buffer: &GapBuffer<char>) -> String {
        buffer.iter().collect()
    }

    #[test]
    fn empty() {
        let mut empty: GapBuffer<usize> = GapBuffer::new();

        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.capacity(), DEFAULT_CAPACITY);
        assert_eq!(empty.gap_len(), DEFAULT_CAPACITY);

        assert_eq!(empty.front(), None);
        assert_eq!(empty.back(), None);
        assert_eq!(empty.front_mut(), None);
        assert_eq!(empty.back_mut(), None);
        assert_eq!(empty.get(0), None);
        assert_eq!(empty.pop_back(), None);

        assert_eq!(empty.iter().count(), 0);
        assert_eq!(empty.iter_mut().count(), 0);
        assert_eq!(empty.into_iter().count(), 0);
    }

    #[test]
    fn zero_capacity_grows_on_demand() {
        let mut buffer: GapBuffer<u32> = GapBuffer::with_capacity(0);
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.assert_invariants());

        buffer.push_back(7);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn build_then_erase_prefix() {
        let mut buffer: GapBuffer<char> = "hello, world".chars().collect();
        assert_eq!(buffer.len(), 12);

        buffer.remove_range(0..2);
        assert_eq!(chars(&buffer), "llo, world");
        assert_eq!(buffer.len(), 10);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn insert_single_then_copies() {
        let mut buffer: GapBuffer<char> = GapBuffer::new();
        buffer.insert(0, 'd');
        assert_eq!(chars(&buffer), "d");
        assert_eq!(buffer.len(), 1);

        buffer.insert_copies(1, 5, 'e');
        assert_eq!(chars(&buffer), "deeeee");
        assert_eq!(buffer.len(), 6);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn reserve_is_early_and_idempotent() {
        let mut buffer: GapBuffer<u32> = (0..10).collect();
        let content: Vec<u32> = buffer.iter().cloned().collect();

        buffer.reserve(100);
        assert!(buffer.capacity() >= 100);
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), content);
        assert!(buffer.assert_invariants());

        // A request at or below the current capacity changes nothing.
        let capacity = buffer.capacity();
        buffer.reserve(50);
        assert_eq!(buffer.capacity(), capacity);
        buffer.reserve(0);
        assert_eq!(buffer.capacity(), capacity);
        assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), content);
    }

    #[test]
    fn resize_ladder() {
        let mut buffer: GapBuffer<char> = "1234567890".chars().collect();

        buffer.resize(3, 'x');
        assert_eq!(chars(&buffer), "123");
        assert_eq!(buffer.len(), 3);

        buffer.resize(10, 'x');
        assert_eq!(chars(&buffer), "123xxxxxxx");
        assert_eq!(buffer.len(), 10);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn erase_middle_then_insert_front() {
        let mut buffer: GapBuffer<char> = ('a'..='i').collect();
        assert_eq!(buffer.len(), 9);

        buffer.remove_range(3..6);
        assert_eq!(chars(&buffer), "abcghi");

        buffer.insert_many(0, vec!['x', 'y', 'z']);
        assert_eq!(chars(&buffer), "xyzabcghi");
        assert_eq!(buffer.len(), 9);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn relocation_in_both_directions() {
        let mut buffer: GapBuffer<u32> = (0..10).collect();

        // Gap sits at the back after construction; edit the front, then the back, then the
        // middle, forcing a relocation each way.
        buffer.insert(0, 100);
        assert_eq!(buffer[0], 100);
        let end = buffer.len();
        buffer.insert(end, 200);
        assert_eq!(*buffer.back().unwrap(), 200);
        buffer.insert(6, 300);

        let expected = vec![100, 0, 1, 2, 3, 4, 300, 5, 6, 7, 8, 9, 200];
        assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), expected);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn size_and_gap_algebra() {
        let mut buffer: GapBuffer<u32> = GapBuffer::new();
        for step in 0..100 {
            buffer.insert(step / 2, step as u32);
            assert_eq!(buffer.len() + buffer.gap_len(), buffer.capacity());
            assert_eq!(buffer.capacity() % CAPACITY_ALIGNMENT, 0);
        }
        for step in 0..50 {
            buffer.remove(step % buffer.len());
            assert_eq!(buffer.len() + buffer.gap_len(), buffer.capacity());
            assert_eq!(buffer.capacity() % CAPACITY_ALIGNMENT, 0);
        }
    }

    #[test]
    fn checked_access() {
        let buffer: GapBuffer<u32> = (0..4).collect();
        assert_eq!(buffer.at(3), Ok(&3));
        assert_eq!(
            buffer.at(4),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        );

        let mut buffer = buffer;
        *buffer.at_mut(0).unwrap() = 9;
        assert_eq!(buffer[0], 9);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn subscript_out_of_bounds_panics() {
        let buffer: GapBuffer<u32> = (0..4).collect();
        let _ = buffer[4];
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn malformed_range_panics() {
        let mut buffer: GapBuffer<u32> = (0..4).collect();
        buffer.remove_range(3..2);
    }

    #[test]
    fn reserve_past_max_capacity_fails_cleanly() {
        let mut buffer: GapBuffer<u64> = (0..4).collect();
        let content: Vec<u64> = buffer.iter().cloned().collect();
        let result = buffer.try_reserve(usize::max_value());
        match result {
            Err(Error::CapacityExceeded { requested, .. }) => {
                assert_eq!(requested, usize::max_value())
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
        // Strong guarantee: nothing changed.
        assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), content);
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn lexicographic_ordering() {
        let abc = gap_buffer!['a', 'b', 'c'];
        let abd = gap_buffer!['a', 'b', 'd'];
        let ab = gap_buffer!['a', 'b'];
        let abc_again: GapBuffer<char> = "abc".chars().collect();

        assert!(abc < abd);
        assert!(abd > abc);
        assert!(ab < abc);
        assert!(ab <= abc);
        assert_eq!(abc, abc_again);
        assert_ne!(abc, ab);
        assert!(abc >= abc_again);
    }

    #[test]
    fn ordering_ignores_gap_position() {
        // Same logical content, different gap positions.
        let mut left: GapBuffer<u32> = (0..8).collect();
        let mut right: GapBuffer<u32> = (0..8).collect();
        left.insert(0, 99);
        left.remove(0);
        right.insert(8, 99);
        right.remove(8);
        assert_eq!(left, right);
        assert_eq!(left.cmp(&right), cmp::Ordering::Equal);
    }

    #[test]
    fn clone_is_independent() {
        let mut original: GapBuffer<String> =
            vec!["a".to_string(), "b".to_string()].into_iter().collect();
        let copy = original.clone();

        original.push_back("c".to_string());
        original[0].push('!');

        assert_eq!(copy.len(), 2);
        assert_eq!(copy[0], "a");
        assert_eq!(original[0], "a!");
    }

    #[test]
    fn iteration_round_trip() {
        let items: Vec<u32> = (0..20).collect();
        let mut buffer: GapBuffer<u32> = items.iter().cloned().collect();
        // Park the gap in the middle so both zones are non-empty.
        buffer.insert(10, 999);
        buffer.remove(10);

        assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), items);
        assert_eq!(
            buffer.iter().rev().cloned().collect::<Vec<_>>(),
            items.iter().rev().cloned().collect::<Vec<_>>()
        );

        let mut forward = buffer.iter();
        assert_eq!(forward.size_hint(), (20, Some(20)));
        forward.next();
        forward.next_back();
        assert_eq!(forward.size_hint(), (18, Some(18)));
    }

    #[test]
    fn mutable_iteration() {
        let mut buffer: GapBuffer<u32> = (0..10).collect();
        buffer.insert(5, 999);
        buffer.remove(5);

        for item in buffer.iter_mut() {
            *item *= 2;
        }
        assert_eq!(
            buffer.iter().cloned().collect::<Vec<_>>(),
            (0..10).map(|x| x * 2).collect::<Vec<_>>()
        );

        for item in buffer.iter_mut().rev().take(3) {
            *item = 0;
        }
        assert_eq!(buffer[9], 0);
        assert_eq!(buffer[7], 0);
        assert_eq!(buffer[6], 12);
    }

    #[test]
    fn consuming_iteration() {
        let buffer: GapBuffer<String> = vec!["x", "y", "z"]
            .into_iter()
            .map(String::from)
            .collect();
        let collected: Vec<String> = buffer.into_iter().collect();
        assert_eq!(collected, ["x", "y", "z"]);

        let buffer: GapBuffer<u32> = (0..6).collect();
        let reversed: Vec<u32> = buffer.into_iter().rev().collect();
        assert_eq!(reversed, [5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn drop_accounting() {
        let tracker = Rc::new(());

        let mut buffer: GapBuffer<Rc<()>> = GapBuffer::new();
        for _ in 0..10 {
            buffer.push_back(tracker.clone());
        }
        assert_eq!(Rc::strong_count(&tracker), 11);

        // Erased elements are released immediately, not parked in the gap.
        buffer.remove_range(2..7);
        assert_eq!(Rc::strong_count(&tracker), 6);

        // A partially consumed into_iter drops the remainder.
        let mut items = buffer.into_iter();
        items.next();
        drop(items);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn growth_releases_nothing() {
        let tracker = Rc::new(());
        let mut buffer: GapBuffer<Rc<()>> = GapBuffer::with_capacity(0);
        for _ in 0..100 {
            buffer.push_back(tracker.clone());
        }
        assert_eq!(Rc::strong_count(&tracker), 101);
        drop(buffer);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn assign_and_replace() {
        let mut buffer: GapBuffer<char> = "abcdef".chars().collect();

        buffer.replace_range(2..4, vec!['x', 'y', 'z']);
        assert_eq!(chars(&buffer), "abxyzef");

        buffer.assign("pq".chars().collect::<Vec<_>>());
        assert_eq!(chars(&buffer), "pq");

        buffer.append(vec!['r', 's']);
        assert_eq!(chars(&buffer), "pqrs");

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn slice_clones_a_subrange() {
        let buffer: GapBuffer<char> = "abcdef".chars().collect();
        let middle = buffer.slice(2..5);
        assert_eq!(chars(&middle), "cde");
        assert_eq!(chars(&buffer), "abcdef");

        let empty = buffer.slice(3..3);
        assert!(empty.is_empty());
    }

    #[test]
    fn swap_exchanges_everything() {
        let mut left: GapBuffer<char> = "abc".chars().collect();
        let mut right: GapBuffer<char> = "xyz".chars().collect();
        left.swap(&mut right);
        assert_eq!(chars(&left), "xyz");
        assert_eq!(chars(&right), "abc");
    }

    #[test]
    fn shrink_to_fit_is_a_noop() {
        let mut buffer: GapBuffer<u32> = (0..10).collect();
        buffer.reserve(100);
        let capacity = buffer.capacity();
        buffer.truncate(1);
        buffer.shrink_to_fit();
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn constructors() {
        let defaults: GapBuffer<u32> = GapBuffer::with_len(5);
        assert_eq!(defaults.iter().cloned().collect::<Vec<_>>(), [0; 5]);

        let filled = GapBuffer::from_elem(7u32, 3);
        assert_eq!(filled.iter().cloned().collect::<Vec<_>>(), [7, 7, 7]);

        let from_vec = GapBuffer::from(vec![1, 2, 3]);
        let from_slice = GapBuffer::from(&[1, 2, 3][..]);
        let from_array = GapBuffer::from([1, 2, 3]);
        assert_eq!(from_vec, from_slice);
        assert_eq!(from_slice, from_array);

        let empty: GapBuffer<u32> = gap_buffer![];
        assert!(empty.is_empty());
        let trailing_comma = gap_buffer![1, 2, 3,];
        assert_eq!(trailing_comma, from_vec);
    }

    #[test]
    fn equal_buffers_hash_equally() {
        fn hash_of<T: Hash>(value: &T) -> u64 {
            let mut state = DefaultHasher::new();
            value.hash(&mut state);
            state.finish()
        }

        let mut left: GapBuffer<u32> = (0..10).collect();
        let right: GapBuffer<u32> = (0..10).collect();
        left.insert(3, 99);
        left.remove(3);
        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
    }

    #[test]
    fn zero_sized_elements() {
        let mut buffer: GapBuffer<()> = GapBuffer::new();
        for _ in 0..100 {
            buffer.push_back(());
        }
        assert_eq!(buffer.len(), 100);
        buffer.remove_range(10..60);
        assert_eq!(buffer.len(), 50);
        assert_eq!(buffer.iter().count(), 50);
        assert_eq!(buffer.pop_back(), Some(()));
        assert!(buffer.assert_invariants());
    }

    #[test]
    fn debug_renders_logical_order() {
        let mut buffer: GapBuffer<u32> = (1..4).collect();
        buffer.insert(0, 0);
        assert_eq!(format!("{:?}", buffer), "[0, 1, 2, 3]");
    }

    #[derive(Arbitrary, Debug)]
    enum Action {
        PushBack(u64),
        PopBack,
        Insert(usize, u64),
        InsertMany(usize, Vec<u64>),
        Remove(usize),
        RemoveRange(usize, usize),
        Truncate(usize),
        Reserve(usize),
    }

    proptest! {
        #[test]
        fn matches_vec_model(actions: Vec<Action>) {
            let mut model: Vec<u64> = Vec::new();
            let mut buffer: GapBuffer<u64> = GapBuffer::new();

            for action in &actions {
                match action {
                    Action::PushBack(item) => {
                        model.push(*item);
                        buffer.push_back(*item);
                    }
                    Action::PopBack => {
                        assert_eq!(buffer.pop_back(), model.pop());
                    }
                    Action::Insert(index, item) => {
                        let index = index % (1 + model.len());
                        model.insert(index, *item);
                        buffer.insert(index, *item);
                    }
                    Action::InsertMany(index, items) => {
                        let index = index % (1 + model.len());
                        for (offset, item) in items.iter().enumerate() {
                            model.insert(index + offset, *item);
                        }
                        buffer.insert_many(index, items.iter().cloned());
                    }
                    Action::Remove(index) => {
                        if !model.is_empty() {
                            let index = index % model.len();
                            assert_eq!(buffer.remove(index), model.remove(index));
                        }
                    }
                    Action::RemoveRange(start, end) => {
                        let start = start % (1 + model.len());
                        let end = end % (1 + model.len());
                        let (start, end) = (start.min(end), start.max(end));
                        model.drain(start..end);
                        buffer.remove_range(start..end);
                    }
                    Action::Truncate(new_len) => {
                        let new_len = new_len % (1 + model.len());
                        model.truncate(new_len);
                        buffer.truncate(new_len);
                    }
                    Action::Reserve(capacity) => {
                        let capacity = capacity % 1024;
                        buffer.try_reserve(capacity).unwrap();
                        assert!(buffer.capacity() >= capacity);
                    }
                }
                assert!(buffer.assert_invariants());
                assert_eq!(buffer.len(), model.len());
            }

            assert_eq!(buffer.iter().cloned().collect::<Vec<_>>(), model);
            assert_eq!(
                buffer.iter().rev().cloned().collect::<Vec<_>>(),
                model.iter().rev().cloned().collect::<Vec<_>>()
            );
        }
    }
}
