mod common;

use common::TrackingAllocator;
use growvec::{GrowVec, GrowVecError, GrowthPolicy};

#[test]
fn test_reserve_grows_exactly() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::from_slice_in(&[1, 2, 3], &tracker).unwrap();

    vec.reserve(11).unwrap();

    assert_eq!(vec.capacity(), 11);
    assert_eq!(vec, [1, 2, 3]);
    assert_eq!(tracker.live_blocks(), 1);
}

#[test]
fn test_reserve_same_capacity_does_nothing() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::from_slice_in(&[1, 2], &tracker).unwrap();

    vec.reserve(2).unwrap();

    assert_eq!(tracker.allocations.get(), 1);
}

#[test]
fn test_reserve_below_length_is_rejected() {
    let mut vec = GrowVec::from_slice(&[1, 2, 3, 4]).unwrap();
    assert_eq!(
        vec.reserve(2).unwrap_err(),
        GrowVecError::CapacityBelowLength {
            capacity: 2,
            length: 4
        }
    );
    assert_eq!(vec, [1, 2, 3, 4]);
    assert_eq!(vec.capacity(), 4);
}

#[test]
fn test_reserve_shrinks_to_length() {
    let mut vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
    vec.reserve(20).unwrap();
    vec.reserve(5).unwrap();
    assert_eq!(vec.capacity(), 5);
    assert_eq!(vec, [1, 2, 3]);
}

#[test]
fn test_reserve_failure_keeps_state() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::from_slice_in(&[4, 5, 6], &tracker).unwrap();
    tracker.fail_after(0);

    assert_eq!(
        vec.reserve(100).unwrap_err(),
        GrowVecError::OutOfMemory { requested: 100 }
    );
    assert_eq!(vec, [4, 5, 6]);
    assert_eq!(vec.capacity(), 3);
}

#[test]
fn test_shrink_to_fit_is_idempotent() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::new_in(&tracker);
    for i in 0..5 {
        vec.push_back(i).unwrap();
    }
    assert_eq!(vec.capacity(), 6);

    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 5);
    let allocations = tracker.allocations.get();

    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 5);
    assert_eq!(tracker.allocations.get(), allocations);
}

#[test]
fn test_shrink_to_fit_on_empty_releases_block() {
    let tracker = TrackingAllocator::new();
    let mut vec: GrowVec<u64, _> = GrowVec::with_capacity_in(8, &tracker).unwrap();

    vec.shrink_to_fit().unwrap();

    assert_eq!(vec.capacity(), 0);
    assert_eq!(tracker.live_blocks(), 0);
}

#[test]
fn test_resize_up_and_down() {
    let mut vec = GrowVec::from_slice(&[1, 2]).unwrap();

    vec.resize(5).unwrap();
    assert_eq!(vec, [1, 2, 0, 0, 0]);
    assert_eq!(vec.capacity(), 5);

    vec.resize(1).unwrap();
    assert_eq!(vec, [1]);
    assert_eq!(vec.capacity(), 5);

    vec.resize_with(3, || 7).unwrap();
    assert_eq!(vec, [1, 7, 7]);
    assert_eq!(vec.capacity(), 5);
}

#[test]
fn test_grow_and_shrink_by_one() {
    let mut vec = GrowVec::from_slice(&[1, 2]).unwrap();

    vec.grow_by_one().unwrap();
    assert_eq!(vec.capacity(), 3);
    assert_eq!(vec.len(), 2);

    vec.shrink_by_one().unwrap();
    assert_eq!(vec.capacity(), 2);
    assert_eq!(vec, [1, 2]);

    // Full vector: the last element goes with the slot.
    vec.shrink_by_one().unwrap();
    assert_eq!(vec.capacity(), 1);
    assert_eq!(vec, [1]);

    vec.shrink_by_one().unwrap();
    vec.shrink_by_one().unwrap();
    assert_eq!(vec.capacity(), 0);
    assert!(vec.is_empty());
}

#[test]
fn test_shrink_by_one_failure_keeps_last_element() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::with_capacity_in(3, &tracker).unwrap();
    vec.extend_from_slice(&[1, 2, 3]).unwrap();
    tracker.fail_after(0);

    assert_eq!(
        vec.shrink_by_one().unwrap_err(),
        GrowVecError::OutOfMemory { requested: 2 }
    );
    assert_eq!(vec, [1, 2, 3]);
    assert_eq!(vec.capacity(), 3);
    assert_eq!(tracker.live_elements(), 3);
}

#[test]
fn test_shrink_by_one_on_full_vector_destroys_through_allocator() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::from_slice_in(&[1, 2, 3], &tracker).unwrap();

    vec.shrink_by_one().unwrap();

    assert_eq!(vec, [1, 2]);
    assert_eq!(vec.capacity(), 2);
    assert_eq!(tracker.destructions.get(), 1);
    assert_eq!(tracker.live_elements(), 2);
    assert_eq!(tracker.live_blocks(), 1);
}

#[test]
fn test_growth_sequence_from_empty() {
    let mut vec = GrowVec::new();
    let mut capacities = Vec::new();
    for i in 0..60 {
        vec.push_back(i).unwrap();
        if capacities.last() != Some(&vec.capacity()) {
            capacities.push(vec.capacity());
        }
    }
    assert_eq!(capacities, [2, 4, 6, 10, 16, 24, 36, 54, 82]);
}

#[test]
fn test_push_back_is_amortized() {
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::new_in(&tracker);
    let count = 10_000;

    for i in 0..count {
        vec.push_back(i).unwrap();
    }

    assert_eq!(vec.len(), count);
    assert!(tracker.slots_allocated.get() <= 6 * count);
    assert!(tracker.allocations.get() <= 40);
    assert_eq!(tracker.live_blocks(), 1);
}

#[test]
fn test_custom_growth_policy() {
    let tracker = TrackingAllocator::new();
    let policy = GrowthPolicy::geometric(2, 1).unwrap();
    let mut vec = GrowVec::new_in(&tracker).with_growth_policy(policy);

    for i in 0..100 {
        vec.push_back(i).unwrap();
    }

    assert_eq!(vec.capacity(), 128);
    assert_eq!(tracker.allocations.get(), 7);
}

#[test]
fn test_growth_is_at_least_the_request() {
    let mut vec = GrowVec::from_slice(&[0; 4]).unwrap();
    vec.extend_from_slice(&[1; 101]).unwrap();
    assert_eq!(vec.len(), 105);
    assert_eq!(vec.capacity(), 106);
}

#[test]
fn test_zero_sized_elements() {
    let mut vec = GrowVec::new();
    for _ in 0..1000 {
        vec.push_back(()).unwrap();
    }
    vec.insert(&(), 500, 3).unwrap();
    vec.erase(0).unwrap();
    assert_eq!(vec.len(), 1002);
    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 1002);
}
