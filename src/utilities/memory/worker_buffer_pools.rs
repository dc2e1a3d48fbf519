use crate::utilities::memory::buffer_pool::BufferPool;
use crate::utilities::memory::unmanaged_mempool::UnmanagedMemoryPool;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;

/// Collection of pools used by worker threads.
///
/// Each worker owns the pool at its index exclusively for the duration of a dispatch, so
/// pools are padded out to separate cache lines to keep workers from contending.
pub struct WorkerBufferPools {
    pools: Box<[CachePadded<UnsafeCell<BufferPool>>]>,
    default_block_capacity: usize,
}

// A worker only touches the pool at its own index; see `get_pool_unchecked`.
unsafe impl Sync for WorkerBufferPools {}

impl WorkerBufferPools {
    /// Creates a new set of worker pools.
    ///
    /// # Arguments
    ///
    /// * `worker_count` - Number of workers to allocate pools for.
    /// * `default_block_capacity` - Default block capacity in thread pools.
    pub fn new(worker_count: usize, default_block_capacity: usize) -> Self {
        let pools = (0..worker_count)
            .map(|_| CachePadded::new(UnsafeCell::new(BufferPool::new(default_block_capacity))))
            .collect();
        Self {
            pools,
            default_block_capacity,
        }
    }

    /// Gets the number of worker pools.
    pub fn worker_count(&self) -> usize {
        self.pools.len()
    }

    /// Gets the default block capacity used by the worker pools.
    pub fn default_block_capacity(&self) -> usize {
        self.default_block_capacity
    }

    /// Gets the pool associated with this worker.
    pub fn get_pool(&mut self, worker_index: usize) -> &mut BufferPool {
        self.pools[worker_index].get_mut()
    }

    /// Gets the pool associated with this worker through a shared reference.
    ///
    /// # Safety
    ///
    /// The caller must guarantee no other reference to this worker's pool is live, which
    /// holds when every thread in a dispatch uses only its own distinct worker index.
    #[allow(clippy::mut_from_ref)]
    #[inline(always)]
    pub unsafe fn get_pool_unchecked(&self, worker_index: usize) -> &mut BufferPool {
        &mut *self.pools[worker_index].get()
    }

    /// Clears all allocations from worker pools. Pools can still be used after being cleared.
    ///
    /// This does not take any locks; exclusive access is enforced by `&mut self`.
    pub fn clear(&mut self) {
        for pool in self.pools.iter_mut() {
            pool.get_mut().clear();
        }
    }

    /// Gets the number of buffers taken from any worker pool and not yet returned.
    pub fn outstanding_buffer_count(&mut self) -> i32 {
        self.pools
            .iter_mut()
            .map(|pool| pool.get_mut().outstanding_buffer_count())
            .sum()
    }

    /// Gets the total number of bytes allocated from native memory by all worker pools. Includes memory that is not currently in use.
    pub fn get_total_allocated_byte_count(&mut self) -> u64 {
        self.pools
            .iter_mut()
            .map(|pool| pool.get_mut().get_total_allocated_byte_count())
            .sum()
    }
}
