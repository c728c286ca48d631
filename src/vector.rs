use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr::{self, NonNull};
use core::slice;

use crate::allocator::{Allocator, Global};
use crate::buffer::RawBuffer;
use crate::cursor::Cursor;
use crate::error::{GrowVecError, Result};
use crate::growth::GrowthPolicy;
use crate::iter::{IntoIter, Iter, RevIter};

/// A contiguous growable array with allocator-aware element lifecycle.
///
/// Slots `[0, len)` hold live elements, slots `[len, capacity)` are raw
/// storage. Capacity grows geometrically through the vector's
/// [`GrowthPolicy`], so `push_back` is amortized O(1).
pub struct GrowVec<T, A: Allocator = Global> {
    buf: RawBuffer<T, A>,
    len: usize,
    growth: GrowthPolicy,
}

impl<T> GrowVec<T, Global> {
    /// Creates an empty vector without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty vector with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates a vector of `len` default-constructed elements,
    /// with `capacity == len`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn with_len(len: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::with_len_in(len, Global)
    }

    /// Creates a vector of `len` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn filled(len: usize, value: &T) -> Result<Self>
    where
        T: Clone,
    {
        Self::filled_in(len, value, Global)
    }

    /// Creates a vector of `len` elements produced by successive calls to
    /// `generator`, in index order.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn from_fn<F>(len: usize, generator: F) -> Result<Self>
    where
        F: FnMut() -> T,
    {
        Self::from_fn_in(len, generator, Global)
    }

    /// Creates a vector holding copies of `items`, with `capacity == items.len()`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn from_slice(items: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_slice_in(items, Global)
    }

    /// Creates a vector holding copies of the elements of `source` in
    /// `[begin, end)`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::InvalidRange` if `end` precedes `begin`, and
    /// the cursor errors of [`GrowVec::index_of`] if either cursor does not
    /// resolve in `source`.
    pub fn from_range<B: Allocator>(source: &GrowVec<T, B>, begin: Cursor, end: Cursor) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_range_in(source, begin, end, Global)
    }

    /// Collects an iterator, growing as needed.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails.
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::try_from_iter_in(iter, Global)
    }
}

impl<T, A: Allocator> GrowVec<T, A> {
    /// Creates an empty vector using `alloc`, without allocating.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::new_in(alloc),
            len: 0,
            growth: GrowthPolicy::DEFAULT,
        }
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            buf: RawBuffer::allocate_in(capacity, alloc)?,
            len: 0,
            growth: GrowthPolicy::DEFAULT,
        })
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn with_len_in(len: usize, alloc: A) -> Result<Self>
    where
        T: Default,
    {
        Self::build_in(len, alloc, |_| T::default())
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn filled_in(len: usize, value: &T, alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::build_in(len, alloc, |_| value.clone())
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn from_fn_in<F>(len: usize, mut generator: F, alloc: A) -> Result<Self>
    where
        F: FnMut() -> T,
    {
        Self::build_in(len, alloc, |_| generator())
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn from_slice_in(items: &[T], alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::build_in(items.len(), alloc, |i| items[i].clone())
    }

    /// # Errors
    ///
    /// Same as [`GrowVec::from_range`].
    pub fn from_range_in<B: Allocator>(
        source: &GrowVec<T, B>,
        begin: Cursor,
        end: Cursor,
        alloc: A,
    ) -> Result<Self>
    where
        T: Clone,
    {
        let first = source.resolve(begin, true)?;
        let last = source.resolve(end, true)?;
        if last < first {
            return Err(GrowVecError::InvalidRange {
                begin: begin.position(),
                end: end.position(),
            });
        }
        Self::from_slice_in(&source.as_slice()[first..last], alloc)
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let mut vec = Self::with_capacity_in(iter.size_hint().0, alloc)?;
        for item in iter {
            vec.push_back(item)?;
        }
        Ok(vec)
    }

    // Exactly `len` slots; a panicking `make` drops the partial vector,
    // which destroys what was built and releases the block.
    fn build_in(len: usize, alloc: A, mut make: impl FnMut(usize) -> T) -> Result<Self> {
        let mut vec = Self::with_capacity_in(len, alloc)?;
        while vec.len < len {
            let value = make(vec.len);
            // SAFETY: `vec.len < capacity` and the slot is raw.
            unsafe { vec.buf.construct(vec.len, value) };
            vec.len += 1;
        }
        Ok(vec)
    }

    /// Replaces the growth policy used when the vector runs out of capacity.
    #[must_use]
    pub fn with_growth_policy(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    #[must_use]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live and the pointer is aligned and
        // non-null even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Pointer to the first slot. Dangling when `capacity() == 0`.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns the element at `index`, whether or not the `safe` feature
    /// is enabled.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::IndexOutOfRange` if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.as_slice().get(index).ok_or(GrowVecError::IndexOutOfRange {
            index,
            length: self.len,
        })
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::IndexOutOfRange` if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let length = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(GrowVecError::IndexOutOfRange { index, length })
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(GrowVecError::EmptyContainer)
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(GrowVecError::EmptyContainer)
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(GrowVecError::EmptyContainer)
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(GrowVecError::EmptyContainer)
    }

    // ---------------------------------------------------------------------
    // Cursors

    fn cursor_for(&self, index: usize) -> Cursor {
        Cursor::new(
            isize::try_from(index).unwrap_or(isize::MAX),
            self.buf.generation(),
        )
    }

    /// Cursor at the first element.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.cursor_for(0)
    }

    /// Cursor one past the last element.
    #[must_use]
    pub fn end(&self) -> Cursor {
        self.cursor_for(self.len)
    }

    /// Cursor at the last element, the start of a reverse walk.
    #[must_use]
    pub fn rbegin(&self) -> Cursor {
        self.end().retreat()
    }

    /// Cursor one before the first element, the end of a reverse walk.
    #[must_use]
    pub fn rend(&self) -> Cursor {
        self.begin().retreat()
    }

    /// Converts a cursor into an index in `[0, len()]`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::InvalidIterator` if the position lies outside
    /// `[begin, end]`, and `GrowVecError::StaleIterator` (with the `safe`
    /// feature) if the cursor predates the last reallocation or shift.
    pub fn index_of(&self, cursor: Cursor) -> Result<usize> {
        self.resolve(cursor, true)
    }

    #[cfg(feature = "safe")]
    fn check_generation(&self, cursor: Cursor) -> Result<()> {
        if cursor.generation() == self.buf.generation() {
            return Ok(());
        }
        Err(GrowVecError::StaleIterator {
            cursor: cursor.generation(),
            current: self.buf.generation(),
        })
    }

    #[cfg(not(feature = "safe"))]
    #[inline(always)]
    fn check_generation(&self, _cursor: Cursor) -> Result<()> {
        Ok(())
    }

    pub(crate) fn resolve(&self, cursor: Cursor, allow_end: bool) -> Result<usize> {
        self.check_generation(cursor)?;
        match usize::try_from(cursor.position()) {
            Ok(index) if index < self.len || (allow_end && index == self.len) => Ok(index),
            _ => Err(GrowVecError::InvalidIterator {
                position: cursor.position(),
                length: self.len,
            }),
        }
    }

    pub(crate) fn element_at(&self, cursor: Cursor, k: isize) -> Result<&T> {
        let index = self.resolve(cursor.offset(k), false)?;
        Ok(&self.as_slice()[index])
    }

    pub(crate) fn element_at_mut(&mut self, cursor: Cursor, k: isize) -> Result<&mut T> {
        let index = self.resolve(cursor.offset(k), false)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    // ---------------------------------------------------------------------
    // Capacity

    // Grows through the growth policy until `extra` more elements fit.
    fn ensure_fit(&mut self, extra: usize) -> Result<()> {
        let capacity = self.buf.capacity();
        let required = self
            .len
            .checked_add(extra)
            .ok_or(GrowVecError::CapacityOverflow {
                current: self.len,
                additional: extra,
            })?;
        if required <= capacity {
            return Ok(());
        }
        let new_capacity = self.growth.next_capacity(capacity, required - capacity)?;
        // SAFETY: slots [0, len) are live and `len < new_capacity`.
        unsafe { self.buf.reallocate(self.len, new_capacity) }
    }

    /// Reallocates to exactly `new_capacity` slots, keeping every element.
    ///
    /// Does nothing if `new_capacity == capacity()`. On failure the vector is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::CapacityBelowLength` if `new_capacity < len()`
    /// (no element is ever dropped by `reserve`; use [`GrowVec::truncate`]
    /// first), and `GrowVecError::OutOfMemory` if the new block cannot be
    /// allocated.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == self.buf.capacity() {
            return Ok(());
        }
        if new_capacity < self.len {
            return Err(GrowVecError::CapacityBelowLength {
                capacity: new_capacity,
                length: self.len,
            });
        }
        // SAFETY: slots [0, len) are live and `len <= new_capacity`.
        unsafe { self.buf.reallocate(self.len, new_capacity) }
    }

    /// Reallocates to exactly `len()` slots if there is slack.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the new block cannot be
    /// allocated.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.reserve(self.len)
    }

    /// Adds one slot of capacity.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::CapacityOverflow` or `GrowVecError::OutOfMemory`.
    pub fn grow_by_one(&mut self) -> Result<()> {
        let capacity = self.buf.capacity();
        let target = capacity
            .checked_add(1)
            .ok_or(GrowVecError::CapacityOverflow {
                current: capacity,
                additional: 1,
            })?;
        self.reserve(target)
    }

    /// Removes one slot of capacity, destroying the last element if every
    /// slot is live. Does nothing when there is no capacity.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the smaller block cannot be
    /// allocated; no element is destroyed in that case.
    pub fn shrink_by_one(&mut self) -> Result<()> {
        let capacity = self.buf.capacity();
        if capacity == 0 {
            return Ok(());
        }
        if self.len < capacity {
            return self.reserve(capacity - 1);
        }

        let last = capacity - 1;
        // SAFETY: slot `last` is live. The copy is only used once the
        // smaller block exists; on failure the slot still owns the value.
        let mut evicted = ManuallyDrop::new(unsafe { ptr::read(self.buf.as_ptr().add(last)) });
        // SAFETY: slots [0, last) are live and fit in `last` slots.
        unsafe { self.buf.reallocate(last, last) }?;
        self.len = last;
        // SAFETY: the evicted value left the vector and is not used again.
        unsafe { self.buf.allocator().destroy(NonNull::from(&mut *evicted)) };
        Ok(())
    }

    /// Resizes to `new_len`, default-constructing new elements or
    /// destroying trailing ones. Growing reserves exactly `new_len` slots.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails.
    pub fn resize(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Like [`GrowVec::resize`], constructing new elements with `generator`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails.
    pub fn resize_with<F>(&mut self, new_len: usize, mut generator: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.buf.capacity() {
            self.reserve(new_len)?;
        }
        while self.len < new_len {
            let value = generator();
            // SAFETY: `len < new_len <= capacity` and the slot is raw.
            unsafe { self.buf.construct(self.len, value) };
            self.len += 1;
        }
        Ok(())
    }

    /// Destroys the elements past `new_len`. Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = mem::replace(&mut self.len, new_len);
        // SAFETY: slots [new_len, old_len) were live and are now past `len`.
        unsafe { self.buf.destroy_range(new_len, old_len) };
    }

    /// Destroys every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    // ---------------------------------------------------------------------
    // Back of the vector

    /// Appends `value`, growing through the growth policy if needed.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails; `value` is
    /// dropped and the vector is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.ensure_fit(1)?;
        // SAFETY: `len < capacity` after `ensure_fit` and the slot is raw.
        unsafe { self.buf.construct(self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Chaining form of [`GrowVec::push_back`].
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::push_back`].
    pub fn append(&mut self, value: T) -> Result<&mut Self> {
        self.push_back(value)?;
        Ok(self)
    }

    /// Appends the value returned by `constructor`, called only once room
    /// has been made.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails; `constructor`
    /// is not called.
    pub fn emplace_back<F>(&mut self, constructor: F) -> Result<()>
    where
        F: FnOnce() -> T,
    {
        self.ensure_fit(1)?;
        let value = constructor();
        // SAFETY: as in `push_back`.
        unsafe { self.buf.construct(self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Appends copies of `items`, growing at most once.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if growing fails.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.ensure_fit(items.len())?;
        for item in items {
            let value = item.clone();
            // SAFETY: room for every item was made above.
            unsafe { self.buf.construct(self.len, value) };
            self.len += 1;
        }
        Ok(())
    }

    /// Destroys the last element. Does nothing on an empty vector; never
    /// changes capacity.
    pub fn pop_back(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now past `len`.
        unsafe { self.buf.destroy(self.len) };
    }

    // ---------------------------------------------------------------------
    // Insertion
    //
    // Every insertion returns a cursor to the FIRST inserted element, or to
    // the requested position when nothing is inserted.

    /// Inserts `count` copies of `value` before `offset`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::InvalidOffset` if `offset > len()` and
    /// `GrowVecError::OutOfMemory` if growing fails; the vector is unchanged
    /// in both cases.
    pub fn insert(&mut self, value: &T, offset: usize, count: usize) -> Result<Cursor>
    where
        T: Clone,
    {
        self.splice_with(offset, count, |_| value.clone())
    }

    /// Cursor form of [`GrowVec::insert`].
    ///
    /// # Errors
    ///
    /// Cursor errors of [`GrowVec::index_of`], then those of [`GrowVec::insert`].
    pub fn insert_at(&mut self, value: &T, position: Cursor, count: usize) -> Result<Cursor>
    where
        T: Clone,
    {
        let offset = self.resolve(position, true)?;
        self.insert(value, offset, count)
    }

    /// Inserts copies of `items` before `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::insert`].
    pub fn insert_slice(&mut self, items: &[T], offset: usize) -> Result<Cursor>
    where
        T: Clone,
    {
        self.splice_with(offset, items.len(), |i| items[i].clone())
    }

    /// Cursor form of [`GrowVec::insert_slice`].
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::insert_at`].
    pub fn insert_slice_at(&mut self, items: &[T], position: Cursor) -> Result<Cursor>
    where
        T: Clone,
    {
        let offset = self.resolve(position, true)?;
        self.insert_slice(items, offset)
    }

    /// Inserts `count` elements before `offset`, each built in place by a
    /// call to `constructor`.
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::insert`]; `constructor` is not called on error.
    pub fn emplace<F>(&mut self, offset: usize, count: usize, mut constructor: F) -> Result<Cursor>
    where
        F: FnMut() -> T,
    {
        self.splice_with(offset, count, |_| constructor())
    }

    /// Cursor form of [`GrowVec::emplace`].
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::insert_at`].
    pub fn emplace_at<F>(&mut self, position: Cursor, count: usize, constructor: F) -> Result<Cursor>
    where
        F: FnMut() -> T,
    {
        let offset = self.resolve(position, true)?;
        self.emplace(offset, count, constructor)
    }

    fn splice_with(
        &mut self,
        offset: usize,
        count: usize,
        mut make: impl FnMut(usize) -> T,
    ) -> Result<Cursor> {
        if offset > self.len {
            return Err(GrowVecError::InvalidOffset {
                offset,
                length: self.len,
            });
        }
        if count == 0 {
            return Ok(self.cursor_for(offset));
        }
        self.ensure_fit(count)?;

        let tail = self.len - offset;
        let base = self.buf.as_ptr();
        // SAFETY: `len + count <= capacity`; the tail moves into raw slots
        // and the vacated range is treated as raw from here on.
        unsafe { ptr::copy(base.add(offset), base.add(offset + count), tail) };
        self.len = offset;

        let mut guard = SpliceGuard {
            vec: self,
            offset,
            count,
            tail,
            filled: 0,
        };
        while guard.filled < count {
            let value = make(guard.filled);
            // SAFETY: the slot lies in the vacated range and is raw.
            unsafe { guard.vec.buf.construct(offset + guard.filled, value) };
            guard.filled += 1;
        }
        drop(guard);

        Ok(self.cursor_for(offset))
    }

    // ---------------------------------------------------------------------
    // Removal

    /// Removes the element at `offset`, shifting the tail left. Returns a
    /// cursor to the element that followed it.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::IndexOutOfRange` if `offset >= len()`.
    pub fn erase(&mut self, offset: usize) -> Result<Cursor> {
        if offset >= self.len {
            return Err(GrowVecError::IndexOutOfRange {
                index: offset,
                length: self.len,
            });
        }
        self.erase_span(offset, offset + 1);
        Ok(self.cursor_for(offset))
    }

    /// Removes the elements in `[begin, end)`, shifting the tail left.
    /// Returns a cursor to the element that followed the range.
    ///
    /// # Errors
    ///
    /// Cursor errors of [`GrowVec::index_of`] for either cursor, and
    /// `GrowVecError::InvalidRange` if `end` precedes `begin`.
    pub fn erase_range(&mut self, begin: Cursor, end: Cursor) -> Result<Cursor> {
        let first = self.resolve(begin, true)?;
        let last = self.resolve(end, true)?;
        if last < first {
            return Err(GrowVecError::InvalidRange {
                begin: begin.position(),
                end: end.position(),
            });
        }
        self.erase_span(first, last);
        Ok(self.cursor_for(first))
    }

    fn erase_span(&mut self, first: usize, last: usize) {
        let old_len = self.len;
        let tail = old_len - last;
        // A panicking destructor leaks the tail instead of exposing
        // destroyed slots.
        self.len = first;
        // SAFETY: slots [first, last) are live and past `len` now.
        unsafe { self.buf.destroy_range(first, last) };
        let base = self.buf.as_ptr();
        // SAFETY: the tail is live and moves into the destroyed range.
        unsafe { ptr::copy(base.add(last), base.add(first), tail) };
        self.len = first + tail;
        self.buf.bump_generation();
    }

    // ---------------------------------------------------------------------
    // Overwriting

    /// Replaces the element at `offset`, destroying the old one through the
    /// allocator.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::IndexOutOfRange` if `offset >= len()`.
    pub fn replace(&mut self, value: T, offset: usize) -> Result<Cursor> {
        if offset >= self.len {
            return Err(GrowVecError::IndexOutOfRange {
                index: offset,
                length: self.len,
            });
        }
        // SAFETY: the slot is live. Its value is moved out before the new
        // one is constructed, so a panicking destructor finds the slot
        // already refilled and the old value owned only by `old`.
        unsafe {
            let mut old = ManuallyDrop::new(ptr::read(self.buf.as_ptr().add(offset)));
            self.buf.construct(offset, value);
            self.buf.allocator().destroy(NonNull::from(&mut *old));
        }
        Ok(self.cursor_for(offset))
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn replace_front(&mut self, value: T) -> Result<Cursor> {
        if self.len == 0 {
            return Err(GrowVecError::EmptyContainer);
        }
        self.replace(value, 0)
    }

    /// # Errors
    ///
    /// Returns `GrowVecError::EmptyContainer` if the vector is empty.
    pub fn replace_back(&mut self, value: T) -> Result<Cursor> {
        if self.len == 0 {
            return Err(GrowVecError::EmptyContainer);
        }
        self.replace(value, self.len - 1)
    }

    /// Overwrites `count` elements starting at `offset` with copies of
    /// `value`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::IndexOutOfRange` if the range does not lie
    /// within `[0, len())`; nothing is written in that case.
    pub fn assign(&mut self, value: &T, offset: usize, count: usize) -> Result<()>
    where
        T: Clone,
    {
        let targets = self.live_range_mut(offset, count)?;
        for slot in targets {
            slot.clone_from(value);
        }
        Ok(())
    }

    /// Overwrites the elements starting at `offset` with copies of `items`.
    ///
    /// # Errors
    ///
    /// Same as [`GrowVec::assign`].
    pub fn assign_slice(&mut self, items: &[T], offset: usize) -> Result<()>
    where
        T: Clone,
    {
        self.live_range_mut(offset, items.len())?
            .clone_from_slice(items);
        Ok(())
    }

    fn live_range_mut(&mut self, offset: usize, count: usize) -> Result<&mut [T]> {
        let length = self.len;
        match offset.checked_add(count) {
            Some(end) if end <= length => Ok(&mut self.as_mut_slice()[offset..end]),
            _ => Err(GrowVecError::IndexOutOfRange {
                index: offset.saturating_add(count).saturating_sub(1).max(offset),
                length,
            }),
        }
    }

    /// Rotates the elements `steps` places towards the front.
    pub fn rotate_left(&mut self, steps: usize) {
        if self.len == 0 {
            return;
        }
        let steps = steps % self.len;
        self.as_mut_slice().rotate_left(steps);
        self.buf.bump_generation();
    }

    /// Rotates the elements `steps` places towards the back.
    pub fn rotate_right(&mut self, steps: usize) {
        if self.len == 0 {
            return;
        }
        let steps = steps % self.len;
        self.as_mut_slice().rotate_right(steps);
        self.buf.bump_generation();
    }

    // ---------------------------------------------------------------------
    // Ownership

    /// Moves the buffer out in O(1), leaving this vector empty with no
    /// storage.
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        Self {
            buf: self.buf.take(),
            len: mem::replace(&mut self.len, 0),
            growth: self.growth,
        }
    }

    /// Deep copy into a block of exactly `len()` slots.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the block cannot be allocated.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        A: Clone,
    {
        let items = self.as_slice();
        Ok(Self::build_in(items.len(), self.allocator().clone(), |i| items[i].clone())?
            .with_growth_policy(self.growth))
    }

    // ---------------------------------------------------------------------
    // Iteration

    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Iterates from the last element to the first.
    #[must_use]
    pub fn iter_rev(&self) -> RevIter<'_, T> {
        RevIter::new(self.as_slice())
    }
}

// Restores a contiguous live region after `splice_with`, whether every
// element was constructed or a constructor panicked part way.
struct SpliceGuard<'a, T, A: Allocator> {
    vec: &'a mut GrowVec<T, A>,
    offset: usize,
    count: usize,
    tail: usize,
    filled: usize,
}

impl<T, A: Allocator> Drop for SpliceGuard<'_, T, A> {
    fn drop(&mut self) {
        if self.filled < self.count {
            let base = self.vec.buf.as_ptr();
            // SAFETY: the tail is live at `offset + count` and moves down
            // next to the last constructed element.
            unsafe {
                ptr::copy(
                    base.add(self.offset + self.count),
                    base.add(self.offset + self.filled),
                    self.tail,
                );
            }
        }
        self.vec.len = self.offset + self.filled + self.tail;
        self.vec.buf.bump_generation();
    }
}

impl<T, A: Allocator> Drop for GrowVec<T, A> {
    fn drop(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: slots [0, len) are live; the buffer releases the block
        // when it is dropped right after.
        unsafe { self.buf.destroy_range(0, len) };
    }
}

impl<T> Default for GrowVec<T, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for GrowVec<T, A> {
    /// # Panics
    ///
    /// Panics if the allocator cannot provide the copy's block.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(vec) => vec,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, A: Allocator> Deref for GrowVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for GrowVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

#[cfg(feature = "safe")]
#[inline]
fn check_index(index: usize, length: usize) {
    if index >= length {
        panic!("{}", GrowVecError::IndexOutOfRange { index, length });
    }
}

#[cfg(not(feature = "safe"))]
#[inline(always)]
fn check_index(_index: usize, _length: usize) {}

impl<T, A: Allocator> Index<usize> for GrowVec<T, A> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len()`; with the `safe` feature the message is
    /// the `IndexOutOfRange` error text.
    fn index(&self, index: usize) -> &T {
        check_index(index, self.len);
        &self.as_slice()[index]
    }
}

impl<T, A: Allocator> IndexMut<usize> for GrowVec<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        check_index(index, self.len);
        &mut self.as_mut_slice()[index]
    }
}

impl<T, U, A: Allocator, B: Allocator> PartialEq<GrowVec<U, B>> for GrowVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &GrowVec<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for GrowVec<T, A> {}

impl<T, U, A: Allocator> PartialEq<[U]> for GrowVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator> PartialEq<&[U]> for GrowVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for GrowVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for GrowVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// `[capacity] [length]` on the first line, then one element per line.
impl<T: fmt::Display, A: Allocator> fmt::Display for GrowVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] [{}]", self.capacity(), self.len)?;
        for item in self.iter() {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a GrowVec<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut GrowVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for GrowVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the buffer is moved out once.
        let buf = unsafe { ptr::read(&this.buf) };
        IntoIter::new(buf, this.len)
    }
}
