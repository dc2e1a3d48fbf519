use crate::utilities::memory::buffer::Buffer;
use crate::utilities::memory::buffer_pool::BufferPool;
use crate::utilities::memory::unmanaged_mempool::UnmanagedMemoryPool;

use std::ops::{Index, IndexMut};

/// Container supporting list-like behaviors built on top of unmanaged buffers.
///
/// Be very careful when using this type. It has sacrificed a lot upon the altar of performance:
/// copies share the same backing memory, and nothing is returned to the pool unless
/// [`QuickList::dispose`] is called.
#[repr(C)]
pub struct QuickList<T> {
    /// Backing memory containing the elements of the list.
    /// Indices from 0 to count-1 hold actual data. All other data is undefined.
    pub span: Buffer<T>,
    /// Number of elements in the list.
    pub count: i32,
}

impl<T: Copy> QuickList<T> {
    /// Creates a new list with minimum capacity from a pool.
    #[inline(always)]
    pub fn with_capacity(minimum_initial_count: i32, pool: &mut impl UnmanagedMemoryPool) -> Self {
        Self {
            span: pool.take_at_least::<T>(minimum_initial_count),
            count: 0,
        }
    }

    /// Gets the capacity of the backing span.
    #[inline(always)]
    pub fn capacity(&self) -> i32 {
        self.span.len()
    }

    /// Returns true if this list's backing memory is allocated.
    #[inline(always)]
    pub fn allocated(&self) -> bool {
        self.span.allocated()
    }

    /// Resizes the list's backing array for the given size.
    #[inline(always)]
    pub fn resize(&mut self, new_size: i32, pool: &mut impl UnmanagedMemoryPool) {
        let target_size = BufferPool::get_capacity_for_count::<T>(new_size.max(self.count));
        if target_size != self.span.len() {
            pool.resize_to_at_least(&mut self.span, target_size, self.count);
        }
    }

    /// Returns the resources associated with the list to pools and resets it to the unallocated state.
    #[inline(always)]
    pub fn dispose(&mut self, pool: &mut impl UnmanagedMemoryPool) {
        pool.return_buffer(&mut self.span);
        self.count = 0;
    }

    /// Ensures that the list has enough room to hold the specified number of elements.
    /// Creates the backing span if the list was never allocated.
    #[inline(always)]
    pub fn ensure_capacity(&mut self, count: i32, pool: &mut impl UnmanagedMemoryPool) {
        if self.span.allocated() {
            if count > self.span.len() {
                self.resize(count, pool);
            }
        } else {
            debug_assert!(self.count == 0, "An unallocated list cannot hold elements.");
            self.span = pool.take_at_least(count);
        }
    }

    /// Gets a reference to the element at the given index.
    #[inline(always)]
    pub fn get(&self, index: i32) -> &T {
        debug_assert!(index >= 0 && index < self.count, "Index out of bounds");
        &self.span[index]
    }

    /// Gets a mutable reference to the element at the given index.
    #[inline(always)]
    pub fn get_mut(&mut self, index: i32) -> &mut T {
        debug_assert!(index >= 0 && index < self.count, "Index out of bounds");
        &mut self.span[index]
    }

    /// Adds an element to the list without checking capacity.
    #[inline(always)]
    pub fn add_unsafely(&mut self, element: T) {
        debug_assert!(self.count < self.span.len(), "Adding would exceed capacity");
        self.span[self.count] = element;
        self.count += 1;
    }

    /// Adds an element to the list, resizing if necessary.
    #[inline(always)]
    pub fn add(&mut self, element: T, pool: &mut impl UnmanagedMemoryPool) {
        self.ensure_capacity(self.count + 1, pool);
        self.add_unsafely(element);
    }

    /// Removes an element at a specific index by swapping with the last element.
    #[inline(always)]
    pub fn fast_remove_at(&mut self, index: i32) {
        debug_assert!(index >= 0 && index < self.count, "Index out of bounds");
        self.count -= 1;
        if index < self.count {
            self.span[index] = self.span[self.count];
        }
    }

    /// Clears the list.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Gets the number of elements in the list.
    #[inline(always)]
    pub fn len(&self) -> i32 {
        self.count
    }

    /// Returns true if the list is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocates and returns a slot in the list without checking capacity.
    #[inline(always)]
    pub fn allocate_unsafely(&mut self) -> &mut T {
        debug_assert!(self.count < self.span.len(), "Allocating would exceed capacity");
        let index = self.count;
        self.count += 1;
        &mut self.span[index]
    }

    /// Views the live elements of the list.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.span.as_slice(self.count)
    }

    /// Views the live elements of the list mutably.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.span.as_mut_slice(self.count)
    }
}

impl<T: Copy> Index<i32> for QuickList<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: i32) -> &Self::Output {
        self.get(index)
    }
}

impl<T: Copy> IndexMut<i32> for QuickList<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: i32) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T> Default for QuickList<T> {
    fn default() -> Self {
        Self {
            span: Buffer::default(),
            count: 0,
        }
    }
}

impl<T> Clone for QuickList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QuickList<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_on_demand_from_unallocated() {
        let mut pool = BufferPool::new(1024);
        let mut list = QuickList::<i32>::default();
        assert!(!list.allocated());
        for i in 0..20 {
            list.add(i, &mut pool);
        }
        assert_eq!(list.len(), 20);
        assert!(list.capacity() >= 20);
        assert_eq!(list[19], 19);
        list.dispose(&mut pool);
        assert!(!list.allocated());
        assert_eq!(pool.outstanding_buffer_count(), 0);
    }

    #[test]
    fn fast_remove_swaps_last_into_slot() {
        let mut pool = BufferPool::new(1024);
        let mut list = QuickList::<i32>::with_capacity(4, &mut pool);
        for i in 0..4 {
            list.add_unsafely(i);
        }
        list.fast_remove_at(1);
        assert_eq!(list.as_slice(), &[0, 3, 2]);
        list.fast_remove_at(2);
        assert_eq!(list.as_slice(), &[0, 3]);
        list.dispose(&mut pool);
    }

    #[test]
    fn allocate_unsafely_hands_out_the_next_slot() {
        let mut pool = BufferPool::new(1024);
        let mut list = QuickList::<(i32, bool)>::default();
        list.ensure_capacity(2, &mut pool);
        *list.allocate_unsafely() = (7, true);
        assert_eq!(list.len(), 1);
        assert_eq!(*list.get(0), (7, true));
        list.dispose(&mut pool);
    }
}
