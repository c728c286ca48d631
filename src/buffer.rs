use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::allocator::Allocator;
use crate::error::Result;

/// Owned block of `capacity` element slots obtained from an allocator.
///
/// The buffer never tracks which slots are live: its owner does, and must
/// destroy live elements before the buffer is released. Dropping the buffer
/// releases the block without touching any slot.
///
/// Every reallocation bumps `generation`, so cursors taken against an older
/// block can be recognized.
pub(crate) struct RawBuffer<T, A: Allocator> {
    ptr: NonNull<T>,
    capacity: usize,
    generation: u64,
    alloc: A,
    _owns: PhantomData<T>,
}

impl<T, A: Allocator> RawBuffer<T, A> {
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            generation: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Allocates a block of exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Propagates the allocator's `OutOfMemory` or `CapacityOverflow`.
    pub(crate) fn allocate_in(capacity: usize, alloc: A) -> Result<Self> {
        let mut buffer = Self::new_in(alloc);
        if capacity > 0 {
            buffer.ptr = buffer.alloc.allocate::<T>(capacity)?;
            buffer.capacity = capacity;
        }
        Ok(buffer)
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks every outstanding cursor as stale without reallocating.
    #[inline]
    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// # Safety
    ///
    /// `index` must be at most `capacity`.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index <= self.capacity);
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(index)) }
    }

    /// Constructs `value` in slot `index` through the allocator.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must hold no live value.
    #[inline]
    pub(crate) unsafe fn construct(&self, index: usize, value: T) {
        debug_assert!(index < self.capacity);
        unsafe { self.alloc.construct(self.slot(index), value) }
    }

    /// Destroys the value in slot `index` through the allocator.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must hold a live value that is not
    /// used afterwards.
    #[inline]
    pub(crate) unsafe fn destroy(&self, index: usize) {
        debug_assert!(index < self.capacity);
        unsafe { self.alloc.destroy(self.slot(index)) }
    }

    /// Destroys the values in slots `[start, end)`, lowest index first.
    ///
    /// # Safety
    ///
    /// Every slot in the range must hold a live value not used afterwards.
    pub(crate) unsafe fn destroy_range(&self, start: usize, end: usize) {
        for index in start..end {
            unsafe { self.destroy(index) };
        }
    }

    /// Moves the first `live` elements into a new block of exactly
    /// `new_capacity` slots and releases the old block.
    ///
    /// Relocation is a bitwise move and cannot fail, so the only failure
    /// point is the allocation of the new block. On failure the buffer and
    /// its elements are left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the allocator's `OutOfMemory` or `CapacityOverflow`.
    ///
    /// # Safety
    ///
    /// Slots `[0, live)` must hold live values, `live <= new_capacity` and
    /// `live <= capacity`.
    pub(crate) unsafe fn reallocate(&mut self, live: usize, new_capacity: usize) -> Result<()> {
        debug_assert!(live <= new_capacity && live <= self.capacity);
        if new_capacity == self.capacity {
            return Ok(());
        }

        let new_ptr = if new_capacity == 0 {
            NonNull::dangling()
        } else {
            self.alloc.allocate::<T>(new_capacity)?
        };

        // SAFETY: both blocks hold at least `live` slots and are distinct
        // allocations.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), live) };
        self.release();
        self.ptr = new_ptr;
        self.capacity = new_capacity;
        self.bump_generation();
        Ok(())
    }

    /// Gives the block to the caller and leaves this buffer empty.
    pub(crate) fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new_in(self.alloc.clone());
        core::mem::replace(self, empty)
    }

    fn release(&mut self) {
        if self.capacity > 0 {
            // SAFETY: `ptr` was obtained from `allocate::<T>(capacity)`.
            unsafe { self.alloc.deallocate(self.ptr, self.capacity) };
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }
}

// SAFETY: the buffer uniquely owns its block, like `Box<[T]>`.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}
