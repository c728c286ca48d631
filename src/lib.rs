#![no_std]
#![warn(unsafe_op_in_unsafe_fn)]

//! `GrowVec`: a contiguous growable array with a pluggable allocator.
//!
//! `GrowVec<T, A>` keeps its elements in one block obtained from an
//! [`Allocator`]. The allocator hands out raw storage and also starts and
//! ends the life of every element (`construct`/`destroy`), so an instrumented
//! allocator sees the full lifecycle of the container's contents.
//!
//! Capacity grows geometrically through a [`GrowthPolicy`] (factor 3/2,
//! rounded up to an even slot count by default), giving amortized O(1)
//! `push_back`. Explicit capacity changes (`reserve`, `shrink_to_fit`,
//! `grow_by_one`, `shrink_by_one`) allocate exactly what is asked for.
//!
//! # Performance Characteristics
//!
//! - `push_back()`, `emplace_back()`: amortized O(1)
//! - `pop_back()`, `at()`, indexing, cursor dereference: O(1)
//! - `insert()`, `emplace()`, `erase()`: O(n) for the shifted tail
//! - `reserve()`, `shrink_to_fit()`: O(n), one allocation and a bitwise move
//! - `take()`: O(1), no allocation
//!
//! A vector created with `new()` does not allocate until the first element
//! arrives.
//!
//! ## `no_std` Compatibility
//!
//! The crate only needs `core` and `alloc`. Enable the optional `std` feature
//! to have `GrowVecError` implement `std::error::Error`:
//! ```toml
//! [dependencies]
//! growvec = { version = "0.1", features = ["std"] }
//! ```
//!
//! # Failure Model
//!
//! Every fallible operation returns [`Result`] with a [`GrowVecError`]. A
//! failed allocation leaves the vector exactly as it was:
//!
//! ```
//! # use growvec::{GrowVec, GrowVecError};
//! let mut vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
//!
//! assert_eq!(vec.at(5), Err(GrowVecError::IndexOutOfRange { index: 5, length: 3 }));
//! assert_eq!(
//!     vec.insert(&9, 4, 1),
//!     Err(GrowVecError::InvalidOffset { offset: 4, length: 3 })
//! );
//! assert_eq!(vec, [1, 2, 3]);
//! ```
//!
//! # Cursors
//!
//! A [`Cursor`] is a random-access position that does not borrow the vector.
//! Reallocation and shifting operations start a new generation; with the
//! default `safe` feature, using a cursor from an older generation is
//! reported instead of reading a moved element:
//!
//! ```
//! # use growvec::{GrowVec, GrowVecError};
//! let mut vec = GrowVec::from_slice(&[10, 20, 30]).unwrap();
//!
//! let second = vec.begin() + 1;
//! assert_eq!(second.get(&vec), Ok(&20));
//! assert_eq!(second.get_offset(&vec, 1), Ok(&30));
//! assert_eq!(vec.end() - vec.begin(), 3);
//!
//! let first = vec.insert(&15, 1, 1).unwrap();
//! assert_eq!(first.get(&vec), Ok(&15));
//! assert!(matches!(second.get(&vec), Err(GrowVecError::StaleIterator { .. })));
//! ```
//!
//! Reverse walks go from `rbegin()` (the last element) down to `rend()`
//! (one before the first):
//!
//! ```
//! # use growvec::GrowVec;
//! let vec = GrowVec::from_slice(&['a', 'b', 'c']).unwrap();
//!
//! let mut cursor = vec.rbegin();
//! let mut seen = String::new();
//! while cursor != vec.rend() {
//!     seen.push(*cursor.get(&vec).unwrap());
//!     cursor = cursor.retreat();
//! }
//! assert_eq!(seen, "cba");
//! ```
//!
//! # Growth
//!
//! ```
//! # use growvec::{GrowVec, GrowthPolicy};
//! let mut vec = GrowVec::new();
//! let mut capacities = Vec::new();
//! for i in 0..20 {
//!     vec.push_back(i).unwrap();
//!     if capacities.last() != Some(&vec.capacity()) {
//!         capacities.push(vec.capacity());
//!     }
//! }
//! assert_eq!(capacities, [2, 4, 6, 10, 16, 24]);
//!
//! let doubling = GrowthPolicy::geometric(2, 1).unwrap();
//! let mut vec = GrowVec::new().with_growth_policy(doubling);
//! vec.extend_from_slice(&[1, 2, 3]).unwrap();
//! vec.push_back(4).unwrap();
//! vec.push_back(5).unwrap();
//! assert_eq!(vec.capacity(), 8);
//! ```
//!
//! # Iterator Support
//!
//! ```
//! # use growvec::GrowVec;
//! let mut vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
//!
//! for item in &mut vec {
//!     *item *= 10;
//! }
//! let reversed: Vec<_> = vec.iter_rev().copied().collect();
//! assert_eq!(reversed, [30, 20, 10]);
//!
//! let owned: Vec<i32> = vec.into_iter().collect();
//! assert_eq!(owned, [10, 20, 30]);
//! ```

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod allocator;
mod buffer;
mod cursor;
mod error;
mod growth;
mod iter;
mod vector;

// Re-export public types and traits
pub use allocator::{Allocator, Global};
pub use cursor::Cursor;
pub use error::{GrowVecError, Result};
pub use growth::GrowthPolicy;
pub use iter::{IntoIter, Iter, RevIter};
pub use vector::GrowVec;
