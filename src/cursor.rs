//! Positioned views into a gap buffer.
//!
//! A cursor pairs a buffer reference with a logical offset in `[0, len]`. The offset `len` is a
//! valid past-the-end position: a cursor there has no element under it, but insertions through
//! it append. Because cursors address logical offsets, they stay meaningful while the gap moves
//! underneath them; a cursor never dangles into the gap.
//!
//! [`Cursor`] is a read-only view and is freely copyable. [`CursorMut`] borrows the buffer
//! exclusively and is the convenient way to express an edit session: park it at the edit point,
//! then push and pop around it without repeating the offset at every call.
//!
//! Cursors from different buffers have no meaningful order or distance; asking for one is a
//! contract breach and panics. Equality is the exception and simply answers `false`, so cursors
//! can live in collections without care.

use crate::buffer::GapBuffer;
use std::cmp::Ordering;
use std::ptr;

/// A read-only position in a [`GapBuffer`].
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate libgap;
/// let buffer = gap_buffer!['a', 'b', 'c'];
/// let mut cursor = buffer.cursor(0);
/// cursor.advance();
/// assert_eq!(cursor.get(), Some(&'b'));
/// assert_eq!(cursor.index(), 1);
/// ```
#[derive(Debug)]
pub struct Cursor<'a, T> {
    buffer: &'a GapBuffer<T>,
    offset: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(buffer: &'a GapBuffer<T>, offset: usize) -> Self {
        assert!(
            offset <= buffer.len(),
            "cursor offset {} out of bounds for gap buffer of length {}",
            offset,
            buffer.len()
        );
        Cursor { buffer, offset }
    }

    /// Returns the logical offset the cursor is positioned at.
    pub fn index(&self) -> usize {
        self.offset
    }

    /// Returns a reference to the element under the cursor, or `None` at the past-the-end
    /// position.
    pub fn get(&self) -> Option<&'a T> {
        self.buffer.get(self.offset)
    }

    /// Repositions the cursor to logical offset `offset`.
    ///
    /// Panics if `offset > len`.
    pub fn seek(&mut self, offset: usize) {
        assert!(
            offset <= self.buffer.len(),
            "cursor offset {} out of bounds for gap buffer of length {}",
            offset,
            self.buffer.len()
        );
        self.offset = offset;
    }

    /// Moves the cursor one position toward the end, stopping at the past-the-end position.
    pub fn advance(&mut self) {
        if self.offset < self.buffer.len() {
            self.offset += 1;
        }
    }

    /// Moves the cursor one position toward the front, stopping at offset zero.
    pub fn retreat(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
        }
    }

    /// Returns the signed number of positions from this cursor to `other`; positive when `other`
    /// is closer to the end.
    ///
    /// Panics if the cursors view different buffers.
    pub fn distance_to(&self, other: &Cursor<'a, T>) -> isize {
        assert!(
            ptr::eq(self.buffer, other.buffer),
            "cursors into different gap buffers have no distance"
        );
        other.offset as isize - self.offset as isize
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    /// Cursors are equal when they view the same buffer and sit at the same offset. Cursors into
    /// different buffers are unequal, not incomparable.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.buffer, other.buffer) && self.offset == other.offset
    }
}

impl<'a, T> PartialOrd for Cursor<'a, T> {
    /// Orders two positions in the same buffer by offset.
    ///
    /// Panics if the cursors view different buffers.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        assert!(
            ptr::eq(self.buffer, other.buffer),
            "cursors into different gap buffers have no order"
        );
        self.offset.partial_cmp(&other.offset)
    }
}

/// An editing position in a [`GapBuffer`].
///
/// Edits made through the cursor keep it pointing at the same element: pushing before it shifts
/// its offset along, popping before it pulls the offset back.
///
/// # Examples
///
/// ```
/// use libgap::GapBuffer;
///
/// let mut buffer: GapBuffer<char> = "helo".chars().collect();
/// let mut cursor = buffer.cursor_mut(3);
/// cursor.push_before('l');
/// assert_eq!(buffer.iter().collect::<String>(), "hello");
/// ```
pub struct CursorMut<'a, T> {
    buffer: &'a mut GapBuffer<T>,
    offset: usize,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(buffer: &'a mut GapBuffer<T>, offset: usize) -> Self {
        assert!(
            offset <= buffer.len(),
            "cursor offset {} out of bounds for gap buffer of length {}",
            offset,
            buffer.len()
        );
        CursorMut { buffer, offset }
    }

    /// Returns the logical offset the cursor is positioned at.
    pub fn index(&self) -> usize {
        self.offset
    }

    /// Returns the length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a reference to the element under the cursor, or `None` at the past-the-end
    /// position.
    pub fn get(&self) -> Option<&T> {
        self.buffer.get(self.offset)
    }

    /// Returns a mutable reference to the element under the cursor, or `None` at the
    /// past-the-end position.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.buffer.get_mut(self.offset)
    }

    /// Repositions the cursor to logical offset `offset`.
    ///
    /// Panics if `offset > len`.
    pub fn seek(&mut self, offset: usize) {
        assert!(
            offset <= self.buffer.len(),
            "cursor offset {} out of bounds for gap buffer of length {}",
            offset,
            self.buffer.len()
        );
        self.offset = offset;
    }

    /// Moves the cursor one position toward the end, stopping at the past-the-end position.
    pub fn advance(&mut self) {
        if self.offset < self.buffer.len() {
            self.offset += 1;
        }
    }

    /// Moves the cursor one position toward the front, stopping at offset zero.
    pub fn retreat(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
        }
    }

    /// Inserts `element` just before the cursor. The cursor keeps pointing at the same element,
    /// so repeated calls type a run of elements in order.
    pub fn push_before(&mut self, element: T) {
        self.buffer.insert(self.offset, element);
        self.offset += 1;
    }

    /// Inserts `element` at the cursor, displacing the element under it toward the end. The
    /// cursor points at the new element afterwards.
    pub fn push_after(&mut self, element: T) {
        self.buffer.insert(self.offset, element);
    }

    /// Removes and returns the element just before the cursor, like backspace. Returns `None`
    /// at offset zero.
    pub fn pop_before(&mut self) -> Option<T> {
        if self.offset == 0 {
            None
        } else {
            self.offset -= 1;
            Some(self.buffer.remove(self.offset))
        }
    }

    /// Removes and returns the element under the cursor, like forward delete. Returns `None` at
    /// the past-the-end position.
    pub fn pop_after(&mut self) -> Option<T> {
        if self.offset == self.buffer.len() {
            None
        } else {
            Some(self.buffer.remove(self.offset))
        }
    }
}
