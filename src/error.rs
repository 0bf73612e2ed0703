//! Errors reported by gap buffer operations.
//!
//! Only recoverable conditions are represented here. Contract breaches such as malformed ranges
//! or comparing cursors from different buffers are programmer errors and panic instead.

use thiserror::Error;

/// A recoverable failure from a gap buffer operation. The buffer is left in its prior valid
/// state whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A checked element access named a position at or past the end of the sequence.
    #[error("index {index} out of range for gap buffer of length {len}")]
    IndexOutOfRange {
        /// The requested logical index.
        index: usize,
        /// The buffer's length at the time of the access.
        len: usize,
    },

    /// A capacity request exceeded the largest capacity representable for the element type.
    #[error("requested capacity {requested} exceeds the maximum of {max}")]
    CapacityExceeded {
        /// The capacity that was asked for.
        requested: usize,
        /// The largest capacity the buffer can represent.
        max: usize,
    },

    /// The underlying allocator could not provide storage. Nothing was leaked and the buffer is
    /// unchanged.
    #[error("failed to allocate backing storage for {capacity} slots")]
    AllocationFailed {
        /// The slot count of the failed allocation.
        capacity: usize,
    },
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
