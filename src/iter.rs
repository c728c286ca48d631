use core::iter::FusedIterator;
use core::ptr;

use crate::allocator::Allocator;
use crate::buffer::RawBuffer;

/// Iterator over the elements of a `GrowVec`
pub struct Iter<'a, T> {
    items: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Self {
            items,
            front: 0,
            back: items.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.items.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.items.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Reverse iterator over the elements of a `GrowVec`, from `back` to `front`
pub struct RevIter<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> RevIter<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Self {
            inner: Iter::new(items),
        }
    }
}

impl<T> Clone for RevIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for RevIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for RevIter<'_, T> {}

impl<T> FusedIterator for RevIter<'_, T> {}

/// Owning iterator over the elements of a `GrowVec`.
///
/// Elements not yielded are destroyed through the allocator when the
/// iterator is dropped, then the block is released.
pub struct IntoIter<T, A: Allocator> {
    buf: RawBuffer<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(crate) fn new(buf: RawBuffer<T, A>, len: usize) -> Self {
        Self {
            buf,
            front: 0,
            back: len,
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: slots [front, back) are live; the slot is not read again.
        let item = unsafe { ptr::read(self.buf.as_ptr().add(self.front)) };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.back)) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let (front, back) = (self.front, self.back);
        self.front = back;
        // SAFETY: slots [front, back) were never yielded.
        unsafe { self.buf.destroy_range(front, back) };
    }
}
