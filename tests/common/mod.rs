#![allow(dead_code)]

use std::cell::Cell;
use std::ptr::NonNull;

use growvec::{Allocator, Global, GrowVecError, Result};

/// Heap allocator that counts every lifecycle call and can be told to refuse
/// allocations after a number of successes.
#[derive(Default)]
pub struct TrackingAllocator {
    pub allocations: Cell<usize>,
    pub deallocations: Cell<usize>,
    pub slots_allocated: Cell<usize>,
    pub constructions: Cell<usize>,
    pub destructions: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `successes` more allocations, then fails every request.
    pub fn fail_after(&self, successes: usize) {
        self.fail_after.set(Some(successes));
    }

    pub fn live_blocks(&self) -> usize {
        self.allocations.get() - self.deallocations.get()
    }

    pub fn live_elements(&self) -> usize {
        self.constructions.get() - self.destructions.get()
    }
}

fn bump(counter: &Cell<usize>, by: usize) {
    counter.set(counter.get() + by);
}

unsafe impl Allocator for TrackingAllocator {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        match self.fail_after.get() {
            Some(0) => return Err(GrowVecError::OutOfMemory { requested: count }),
            Some(left) => self.fail_after.set(Some(left - 1)),
            None => {}
        }
        let storage = Global.allocate(count)?;
        bump(&self.allocations, 1);
        bump(&self.slots_allocated, count);
        Ok(storage)
    }

    unsafe fn deallocate<T>(&self, storage: NonNull<T>, count: usize) {
        bump(&self.deallocations, 1);
        unsafe { Global.deallocate(storage, count) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        bump(&self.constructions, 1);
        unsafe { Global.construct(slot, value) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        bump(&self.destructions, 1);
        unsafe { Global.destroy(slot) }
    }
}

/// Element type whose clones and drops are counted.
#[derive(Debug, PartialEq)]
pub struct Counted<'a> {
    pub value: u32,
    drops: &'a Cell<usize>,
}

impl<'a> Counted<'a> {
    pub fn new(value: u32, drops: &'a Cell<usize>) -> Self {
        Self { value, drops }
    }
}

impl Clone for Counted<'_> {
    fn clone(&self) -> Self {
        Self::new(self.value, self.drops)
    }
}

impl Drop for Counted<'_> {
    fn drop(&mut self) {
        bump(self.drops, 1);
    }
}
