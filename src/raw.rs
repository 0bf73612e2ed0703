//! The arena behind a gap buffer.
//!
//! A single owned block of element slots with explicit per-slot construction and destruction.
//! The arena tracks nothing about which slots are live; that bookkeeping belongs entirely to the
//! container, and dropping an arena only releases the allocation. No raw pointer to the block
//! ever leaves this crate.

use crate::error::{Error, Result};
use std::mem::MaybeUninit;
use std::ops::Range;
use std::ptr;

/// A fixed-capacity block of possibly-uninitialized element slots.
pub(crate) struct RawBuffer<T> {
    slots: Box<[MaybeUninit<T>]>,
}

impl<T> RawBuffer<T> {
    /// Allocates an arena of exactly `capacity` slots, all vacant.
    pub fn try_allocate(capacity: usize) -> Result<Self> {
        let mut slots: Vec<MaybeUninit<T>> = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed { capacity })?;
        // MaybeUninit slots are valid in any bit pattern.
        unsafe { slots.set_len(capacity) };
        Ok(RawBuffer {
            slots: slots.into_boxed_slice(),
        })
    }

    /// Returns the number of slots in the arena.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Constructs `value` in the slot at `index`. The slot must be vacant, otherwise the previous
    /// occupant is leaked.
    pub fn write(&mut self, index: usize, value: T) {
        self.slots[index] = MaybeUninit::new(value);
    }

    /// Moves the element out of the slot at `index`, leaving the slot vacant.
    ///
    /// # Safety
    ///
    /// The slot must hold a live element, and no further use may be made of it until it is
    /// written again.
    pub unsafe fn read(&self, index: usize) -> T {
        self.slots[index].as_ptr().read()
    }

    /// Returns a reference to the element in the slot at `index`.
    ///
    /// # Safety
    ///
    /// The slot must hold a live element.
    pub unsafe fn slot_ref(&self, index: usize) -> &T {
        &*self.slots[index].as_ptr()
    }

    /// Returns a raw mutable pointer to the slot at `index`.
    pub fn slot_ptr_mut(&mut self, index: usize) -> *mut T {
        self.slots[index].as_mut_ptr()
    }

    /// Destroys the element in the slot at `index`, leaving the slot vacant.
    ///
    /// # Safety
    ///
    /// The slot must hold a live element.
    pub unsafe fn drop_slot(&mut self, index: usize) {
        ptr::drop_in_place(self.slots[index].as_mut_ptr());
    }

    /// Destroys every element in `range`, leaving the slots vacant.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must hold a live element.
    pub unsafe fn drop_range(&mut self, range: Range<usize>) {
        for index in range {
            self.drop_slot(index);
        }
    }

    /// Shifts `count` slots starting at `src` to start at `dst` instead. The regions may
    /// overlap; this has memmove semantics, not slot-by-slot assignment.
    ///
    /// # Safety
    ///
    /// Both regions must lie within the arena. The shifted slots must hold live elements, which
    /// afterwards live only at the destination.
    pub unsafe fn shift(&mut self, src: usize, dst: usize, count: usize) {
        debug_assert!(src + count <= self.capacity());
        debug_assert!(dst + count <= self.capacity());
        let base = self.slots.as_mut_ptr();
        ptr::copy(base.add(src), base.add(dst), count);
    }

    /// Moves the elements in `range` into `dest` starting at slot `at`.
    ///
    /// # Safety
    ///
    /// The source slots must hold live elements and the destination region must lie within
    /// `dest` and be vacant. Afterwards the elements live only in `dest`; the source slots must
    /// be treated as vacant.
    pub unsafe fn move_range_to(&self, range: Range<usize>, dest: &mut RawBuffer<T>, at: usize) {
        let count = range.end - range.start;
        debug_assert!(range.end <= self.capacity());
        debug_assert!(at + count <= dest.capacity());
        ptr::copy_nonoverlapping(
            self.slots.as_ptr().add(range.start),
            dest.slots.as_mut_ptr().add(at),
            count,
        );
    }
}
