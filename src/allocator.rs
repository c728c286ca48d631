use core::alloc::Layout;
use core::ptr::{self, NonNull};

use crate::error::{GrowVecError, Result};

/// Storage and element lifecycle primitives consumed by `GrowVec`.
///
/// `allocate`/`deallocate` hand out raw slots; `construct`/`destroy` start and
/// end the life of one element in a slot. The default `construct` and
/// `destroy` write and drop in place.
///
/// # Safety
///
/// A block returned by `allocate::<T>(count)` must be valid for reads and
/// writes of `count` values of `T`, properly aligned, and must stay valid
/// until it is passed to `deallocate::<T>` with the same `count`.
/// `deallocate` must not unwind.
///
/// `destroy` unwinds when the element's `Drop` panics. `GrowVec` only calls
/// it on values it has already detached from its live range, so a panicking
/// destructor leaks at worst and never exposes a dropped element.
pub unsafe trait Allocator {
    /// Requests storage for `count` values of `T`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::OutOfMemory` if the request cannot be satisfied
    /// and `GrowVecError::CapacityOverflow` if it exceeds the addressable size.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>>;

    /// Releases a block obtained from `allocate`.
    ///
    /// # Safety
    ///
    /// `storage` must come from `allocate::<T>(count)` on this allocator and
    /// must not be used afterwards.
    unsafe fn deallocate<T>(&self, storage: NonNull<T>, count: usize);

    /// Moves `value` into the uninitialized `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must point into a live block of this allocator and hold no
    /// live value.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { slot.as_ptr().write(value) }
    }

    /// Ends the life of the value in `slot`, leaving it uninitialized.
    /// Unwinds if the value's destructor panics.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not used afterwards.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}

unsafe impl<A: Allocator> Allocator for &A {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        (**self).allocate(count)
    }

    unsafe fn deallocate<T>(&self, storage: NonNull<T>, count: usize) {
        unsafe { (**self).deallocate(storage, count) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { (**self).construct(slot, value) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { (**self).destroy(slot) }
    }
}

/// The global heap, through `alloc::alloc`.
///
/// Zero-sized requests (no slots, or a zero-sized `T`) never reach the heap
/// and are served with a dangling, well-aligned pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

pub(crate) fn array_layout<T>(count: usize) -> Result<Layout> {
    Layout::array::<T>(count).map_err(|_| GrowVecError::CapacityOverflow {
        current: 0,
        additional: count,
    })
}

unsafe impl Allocator for Global {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(GrowVecError::OutOfMemory { requested: count })
    }

    unsafe fn deallocate<T>(&self, storage: NonNull<T>, count: usize) {
        let Ok(layout) = array_layout::<T>(count) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        // SAFETY: the caller guarantees `storage` came from `allocate::<T>(count)`,
        // which used this exact layout.
        unsafe { alloc::alloc::dealloc(storage.as_ptr().cast::<u8>(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_round_trip() {
        let storage = Global.allocate::<u64>(4).unwrap();
        unsafe {
            for i in 0..4 {
                Global.construct(NonNull::new_unchecked(storage.as_ptr().add(i)), i as u64 * 10);
            }
            assert_eq!(*storage.as_ptr().add(3), 30);
            Global.deallocate(storage, 4);
        }
    }

    #[test]
    fn test_global_zero_sized_requests() {
        let empty = Global.allocate::<u32>(0).unwrap();
        assert_eq!(empty, NonNull::dangling());
        unsafe { Global.deallocate(empty, 0) };

        let units = Global.allocate::<()>(1000).unwrap();
        unsafe { Global.deallocate(units, 1000) };
    }

    #[test]
    fn test_global_layout_overflow() {
        assert_eq!(
            Global.allocate::<u64>(usize::MAX).unwrap_err(),
            GrowVecError::CapacityOverflow {
                current: 0,
                additional: usize::MAX
            }
        );
    }

    #[test]
    fn test_destroy_runs_drop() {
        use alloc::rc::Rc;

        let tracker = Rc::new(());
        let storage = Global.allocate::<Rc<()>>(1).unwrap();
        unsafe {
            Global.construct(storage, Rc::clone(&tracker));
            assert_eq!(Rc::strong_count(&tracker), 2);
            Global.destroy(storage);
            Global.deallocate(storage, 1);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }
}
