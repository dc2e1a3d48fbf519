use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, copy_nonoverlapping, write_bytes};

/// Represents a span of unmanaged memory taken from a pool.
///
/// Buffers are plain views: copying one does not copy the memory it points at, and
/// dropping one does not return it. Memory goes back to its pool through
/// [`UnmanagedMemoryPool::return_buffer`](super::UnmanagedMemoryPool::return_buffer).
pub struct Buffer<T> {
    memory: *mut T,
    length: i32,
    id: i32,
    /// PhantomData is used to indicate that the Buffer<T> struct is logically owning data of type T.
    _marker: PhantomData<T>,
}

impl<T> Clone for Buffer<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Buffer<T> {}

impl<T> Default for Buffer<T> {
    #[inline(always)]
    fn default() -> Self {
        Self {
            memory: ptr::null_mut(),
            length: 0,
            id: -1,
            _marker: PhantomData,
        }
    }
}

impl<T> Buffer<T> {
    /// Creates a new buffer.
    ///
    /// # Safety
    /// `memory` must point to at least `length` elements of `T` that stay valid for as long
    /// as the buffer (or any copy of it) is used.
    #[inline(always)]
    pub unsafe fn new(memory: *mut T, length: i32, id: i32) -> Self {
        Self {
            memory,
            length,
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the length of the buffer in typed elements.
    #[inline(always)]
    pub fn len(&self) -> i32 {
        self.length
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Gets the id of the buffer as assigned by the pool that owns it.
    #[inline(always)]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Gets whether the buffer references non-null memory.
    #[inline(always)]
    pub fn allocated(&self) -> bool {
        !self.memory.is_null()
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.memory
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.memory
    }

    /// Shrinks the visible length of the buffer without touching the allocation.
    #[inline(always)]
    pub(crate) fn set_len(&mut self, length: i32) {
        self.length = length;
    }

    /// Gets a raw pointer to an element without creating a reference to it.
    ///
    /// # Safety
    /// `index` must be within the buffer.
    #[inline(always)]
    pub unsafe fn element_ptr(&self, index: i32) -> *mut T {
        debug_assert!(index >= 0 && index < self.length, "Index out of bounds.");
        self.memory.add(index as usize)
    }

    /// Zeroes out the buffer's memory.
    #[inline]
    pub fn clear(&mut self, start: i32, count: i32) {
        debug_assert!(
            start >= 0 && start + count <= self.length,
            "Clear region out of bounds."
        );
        if count > 0 {
            unsafe {
                write_bytes::<T>(self.memory.add(start as usize), 0, count as usize);
            }
        }
    }

    /// Copies buffer data into another buffer.
    #[inline]
    pub fn copy_to(&self, source_start: i32, target: &mut Buffer<T>, target_start: i32, count: i32)
    where
        T: Copy,
    {
        debug_assert!(
            source_start + count <= self.length,
            "Source region out of bounds"
        );
        debug_assert!(
            target_start + count <= target.length,
            "Target region out of bounds"
        );
        if count > 0 {
            unsafe {
                copy_nonoverlapping::<T>(
                    self.memory.add(source_start as usize),
                    target.memory.add(target_start as usize),
                    count as usize,
                );
            }
        }
    }

    /// Views the first `count` elements as a slice.
    #[inline]
    pub fn as_slice(&self, count: i32) -> &[T] {
        debug_assert!(count <= self.length);
        if count <= 0 || !self.allocated() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.memory, count as usize) }
    }

    /// Views the first `count` elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self, count: i32) -> &mut [T] {
        debug_assert!(count <= self.length);
        if count <= 0 || !self.allocated() {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.memory, count as usize) }
    }

    /// Reinterprets the buffer as another element type with the largest capacity that fits in the allocation.
    #[inline]
    pub(crate) fn cast<TCast>(self) -> Buffer<TCast> {
        let byte_count = self.length as usize * std::mem::size_of::<T>();
        let new_length = byte_count / std::mem::size_of::<TCast>().max(1);
        debug_assert!(
            self.memory.is_null() || (self.memory as usize) % std::mem::align_of::<TCast>() == 0,
            "Reinterpreted memory must satisfy the target type's alignment."
        );
        Buffer {
            memory: self.memory as *mut TCast,
            length: new_length as i32,
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> Index<i32> for Buffer<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: i32) -> &Self::Output {
        debug_assert!(index >= 0 && index < self.length, "Index out of bounds.");
        unsafe { &*self.memory.add(index as usize) }
    }
}

impl<T> IndexMut<i32> for Buffer<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: i32) -> &mut Self::Output {
        debug_assert!(index >= 0 && index < self.length, "Index out of bounds.");
        unsafe { &mut *self.memory.add(index as usize) }
    }
}
