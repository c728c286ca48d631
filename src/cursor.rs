use core::ops::{Add, Sub};

use crate::allocator::Allocator;
use crate::error::Result;
use crate::vector::GrowVec;

/// Random-access position in a `GrowVec`.
///
/// A cursor is a plain `(position, generation)` pair: it borrows nothing, so
/// the vector stays mutable while cursors exist. Any reallocation or shift
/// of the vector (insert, emplace, erase, rotate, capacity change) starts a
/// new generation; with the `safe` feature, resolving a cursor from an older
/// generation fails with `GrowVecError::StaleIterator`.
///
/// Positions are signed so that `rend()`, one before the first element, is
/// representable. Arithmetic wraps and never fails; only resolving a cursor
/// against a vector is checked.
///
/// Cursors order by position, then generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    position: isize,
    generation: u64,
}

impl Cursor {
    pub(crate) const fn new(position: isize, generation: u64) -> Self {
        Self {
            position,
            generation,
        }
    }

    #[must_use]
    pub const fn position(self) -> isize {
        self.position
    }

    pub(crate) const fn generation(self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn advance(self) -> Self {
        self.offset(1)
    }

    #[must_use]
    pub const fn retreat(self) -> Self {
        self.offset(-1)
    }

    #[must_use]
    pub const fn offset(self, delta: isize) -> Self {
        Self::new(self.position.wrapping_add(delta), self.generation)
    }

    /// Number of steps from `origin` to `self`.
    #[must_use]
    pub const fn distance_from(self, origin: Cursor) -> isize {
        self.position.wrapping_sub(origin.position)
    }

    /// Dereferences the cursor.
    ///
    /// # Errors
    ///
    /// `GrowVecError::InvalidIterator` if the position is outside
    /// `[begin, end)`, and `GrowVecError::StaleIterator` (with the `safe`
    /// feature) if the vector changed shape since the cursor was taken.
    pub fn get<T, A: Allocator>(self, vec: &GrowVec<T, A>) -> Result<&T> {
        vec.element_at(self, 0)
    }

    /// Mutable variant of [`Cursor::get`].
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::get`].
    pub fn get_mut<T, A: Allocator>(self, vec: &mut GrowVec<T, A>) -> Result<&mut T> {
        vec.element_at_mut(self, 0)
    }

    /// Element `k` steps away from the cursor, like `it[k]`.
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::get`], checked for the shifted position.
    pub fn get_offset<T, A: Allocator>(self, vec: &GrowVec<T, A>, k: isize) -> Result<&T> {
        vec.element_at(self, k)
    }
}

impl Add<isize> for Cursor {
    type Output = Cursor;

    fn add(self, rhs: isize) -> Cursor {
        self.offset(rhs)
    }
}

impl Sub<isize> for Cursor {
    type Output = Cursor;

    fn sub(self, rhs: isize) -> Cursor {
        self.offset(rhs.wrapping_neg())
    }
}

impl Sub for Cursor {
    type Output = isize;

    fn sub(self, rhs: Cursor) -> isize {
        self.distance_from(rhs)
    }
}
