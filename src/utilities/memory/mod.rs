//! Memory management utilities for the contact event bookkeeping.
//!
//! Everything the event system keeps across frames lives in buffers taken from these
//! pools, so steady-state stepping never touches the global allocator.

pub mod buffer;
pub mod buffer_pool;
pub mod unmanaged_mempool;
pub mod worker_buffer_pools;

pub use buffer::Buffer;
pub use buffer_pool::BufferPool;
pub use unmanaged_mempool::UnmanagedMemoryPool;
pub use worker_buffer_pools::WorkerBufferPools;
