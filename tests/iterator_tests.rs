mod common;

use std::cell::Cell;

use common::{Counted, TrackingAllocator};
use growvec::GrowVec;

#[test]
fn test_iter_forward() {
    let vec = GrowVec::from_slice(&["a", "b", "c"]).unwrap();
    let collected: Vec<_> = vec.iter().copied().collect();
    assert_eq!(collected, ["a", "b", "c"]);
}

#[test]
fn test_iter_exact_size() {
    let vec = GrowVec::from_slice(&[1, 2, 3, 4]).unwrap();
    let mut iter = vec.iter();

    assert_eq!(iter.len(), 4);
    iter.next();
    iter.next_back();
    assert_eq!(iter.size_hint(), (2, Some(2)));
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next_back(), Some(&3));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_iter_clone_is_independent() {
    let vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
    let mut iter = vec.iter();
    iter.next();
    let copy = iter.clone();
    assert_eq!(iter.count(), 2);
    assert_eq!(copy.sum::<i32>(), 5);
}

#[test]
fn test_iter_rev() {
    let vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
    let reversed: Vec<_> = vec.iter_rev().collect();
    assert_eq!(reversed, [&3, &2, &1]);
    assert_eq!(vec.iter_rev().len(), 3);

    let empty: GrowVec<u8> = GrowVec::new();
    assert_eq!(empty.iter_rev().next(), None);
}

#[test]
fn test_for_loops() {
    let mut vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();

    for item in &mut vec {
        *item += 1;
    }
    let mut total = 0;
    for item in &vec {
        total += item;
    }

    assert_eq!(total, 9);
    assert_eq!(vec, [2, 3, 4]);
}

#[test]
fn test_into_iter_yields_owned() {
    let vec = GrowVec::from_slice(&[String::from("x"), String::from("y")]).unwrap();
    let owned: Vec<String> = vec.into_iter().collect();
    assert_eq!(owned, ["x", "y"]);
}

#[test]
fn test_into_iter_from_both_ends() {
    let vec = GrowVec::from_slice(&[1, 2, 3, 4, 5]).unwrap();
    let mut iter = vec.into_iter();

    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next_back(), Some(5));
    assert_eq!(iter.collect::<Vec<_>>(), [2, 3, 4]);
}

#[test]
fn test_into_iter_destroys_rest_through_allocator() {
    let drops = Cell::new(0);
    let tracker = TrackingAllocator::new();
    let mut vec = GrowVec::new_in(&tracker);
    for value in 0..4 {
        vec.push_back(Counted::new(value, &drops)).unwrap();
    }

    let mut iter = vec.into_iter();
    let first = iter.next().unwrap();
    assert_eq!(first.value, 0);
    drop(iter);

    assert_eq!(drops.get(), 3);
    assert_eq!(tracker.destructions.get(), 3);
    assert_eq!(tracker.live_blocks(), 0);
    drop(first);
    assert_eq!(drops.get(), 4);
}

#[test]
fn test_iter_mut() {
    let mut vec = GrowVec::from_slice(&[1, 2, 3]).unwrap();
    vec.iter_mut().for_each(|item| *item *= 3);
    assert_eq!(vec, [3, 6, 9]);
}
