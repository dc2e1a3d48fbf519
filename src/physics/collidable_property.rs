// Convenience collection that stores extra properties about bodies and statics,
// indexed by the body or static handle.
// This is built for use cases relying on random access like the narrow phase.

use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::handles::{BodyHandle, StaticHandle};
use crate::utilities::memory::buffer::Buffer;
use crate::utilities::memory::buffer_pool::BufferPool;
use crate::utilities::memory::unmanaged_mempool::UnmanagedMemoryPool;

/// Convenience collection that stores extra properties about bodies and statics,
/// indexed by the body or static handle.
///
/// This stores separate buffers for body data and static data since body handles
/// and static handles occupy independent namespaces. It is quite barebones: it doesn't try
/// to stop invalid accesses, and slots that were never written hold whatever the pool left there.
pub struct CollidableProperty<T> {
    body_data: Buffer<T>,
    static_data: Buffer<T>,
}

impl<T> Default for CollidableProperty<T> {
    fn default() -> Self {
        Self {
            body_data: Buffer::default(),
            static_data: Buffer::default(),
        }
    }
}

impl<T: Copy> CollidableProperty<T> {
    /// Constructs a new collection with initial capacity.
    pub fn with_capacity(
        body_handle_capacity: i32,
        static_handle_capacity: i32,
        pool: &mut impl UnmanagedMemoryPool,
    ) -> Self {
        Self {
            body_data: pool.take_at_least(body_handle_capacity),
            static_data: pool.take_at_least(static_handle_capacity),
        }
    }

    /// Gets a reference to the properties associated with a body handle.
    #[inline(always)]
    pub fn get_body(&self, body_handle: BodyHandle) -> &T {
        &self.body_data[body_handle.0]
    }

    /// Gets a reference to the properties associated with a static handle.
    #[inline(always)]
    pub fn get_static(&self, static_handle: StaticHandle) -> &T {
        &self.static_data[static_handle.0]
    }

    /// Gets a reference to the properties associated with a collidable reference.
    #[inline(always)]
    pub fn get(&self, collidable: CollidableReference) -> &T {
        if collidable.is_static() {
            self.get_static(collidable.static_handle())
        } else {
            self.get_body(collidable.body_handle())
        }
    }

    /// Gets a mutable reference to the properties associated with a collidable reference.
    /// The slot must already exist; use [`CollidableProperty::allocate`] for handles that may be new.
    #[inline(always)]
    pub fn get_mut(&mut self, collidable: CollidableReference) -> &mut T {
        if collidable.is_static() {
            &mut self.static_data[collidable.raw_handle_value()]
        } else {
            &mut self.body_data[collidable.raw_handle_value()]
        }
    }

    #[inline(always)]
    fn ensure_slot(data: &mut Buffer<T>, handle: i32, pool: &mut impl UnmanagedMemoryPool) {
        if handle >= data.len() {
            let target_count = BufferPool::get_capacity_for_count::<T>(handle + 1);
            debug_assert!(target_count > data.len());
            let copy_count = data.len();
            pool.resize_to_at_least(data, target_count, copy_count);
        }
    }

    /// Ensures there is space for a given collidable and returns a mutable reference to its slot.
    #[inline(always)]
    pub fn allocate(
        &mut self,
        collidable: CollidableReference,
        pool: &mut impl UnmanagedMemoryPool,
    ) -> &mut T {
        let handle = collidable.raw_handle_value();
        let data = if collidable.is_static() {
            &mut self.static_data
        } else {
            &mut self.body_data
        };
        Self::ensure_slot(data, handle, pool);
        &mut data[handle]
    }

    /// Returns all held resources.
    pub fn dispose(&mut self, pool: &mut impl UnmanagedMemoryPool) {
        if self.body_data.allocated() {
            pool.return_buffer(&mut self.body_data);
        }
        if self.static_data.allocated() {
            pool.return_buffer(&mut self.static_data);
        }
    }
}
