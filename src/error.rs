use thiserror::Error;

/// Error types for `GrowVec` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum GrowVecError {
    /// Index is beyond the current vector length
    #[error("Index out of range: index {index} is beyond vector length {length}")]
    IndexOutOfRange {
        /// Index that was accessed
        index: usize,
        /// Current length of the vector
        length: usize,
    },
    /// Cursor position lies outside the range accepted by the operation
    #[error("Invalid iterator: position {position} is outside the live range of length {length}")]
    InvalidIterator {
        /// Position held by the cursor
        position: isize,
        /// Current length of the vector
        length: usize,
    },
    /// Cursor was taken before a reallocation or a shift of the vector
    #[error("Stale iterator: cursor generation {cursor} does not match vector generation {current}")]
    StaleIterator {
        /// Generation recorded in the cursor
        cursor: u64,
        /// Current generation of the vector
        current: u64,
    },
    /// Insert or emplace offset is past the end of the vector
    #[error("Invalid offset: offset {offset} is beyond vector length {length}")]
    InvalidOffset {
        /// Offset that was requested
        offset: usize,
        /// Current length of the vector
        length: usize,
    },
    /// End of a source range precedes its beginning
    #[error("Invalid range: end {end} precedes begin {begin}")]
    InvalidRange {
        /// Position of the first cursor
        begin: isize,
        /// Position of the second cursor
        end: isize,
    },
    /// Element access on an empty vector
    #[error("Operation on empty container")]
    EmptyContainer,
    /// The allocator could not provide the requested slots
    #[error("Out of memory: allocator could not provide {requested} slots")]
    OutOfMemory {
        /// Number of element slots requested
        requested: usize,
    },
    /// Slot arithmetic does not fit the address space
    #[error("Capacity overflow: {current} + {additional} slots exceeds the addressable size")]
    CapacityOverflow {
        /// Capacity before the request
        current: usize,
        /// Slots requested on top of it
        additional: usize,
    },
    /// Requested capacity cannot hold the live elements
    #[error("Capacity below length: capacity {capacity} cannot hold {length} live elements")]
    CapacityBelowLength {
        /// Capacity that was requested
        capacity: usize,
        /// Current length of the vector
        length: usize,
    },
    /// Invalid configuration parameter
    #[error("Invalid configuration: {parameter} = {value}")]
    InvalidConfiguration {
        /// Description of the invalid parameter
        parameter: &'static str,
        /// Provided value
        value: usize,
    },
}

pub type Result<T> = core::result::Result<T, GrowVecError>;
