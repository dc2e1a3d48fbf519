use crate::utilities::memory::buffer::Buffer;
use crate::utilities::memory::unmanaged_mempool::UnmanagedMemoryPool;
use log::trace;
use std::alloc::{self, Layout};
#[cfg(debug_assertions)]
use std::collections::HashSet;
use std::ptr::NonNull;

/// Largest power of two (in bytes) a single buffer taken from a [`BufferPool`] may span.
pub const MAXIMUM_SPAN_SIZE_POWER: usize = 30;

struct PowerPool {
    blocks: Vec<NonNull<u8>>,
    /// Slots that were returned and can be handed out again before new ones are claimed.
    free_slots: Vec<i32>,
    next_slot: i32,
    #[cfg(debug_assertions)]
    outstanding_ids: HashSet<i32>,
    suballocations_per_block_shift: u32,
    suballocations_per_block_mask: i32,
    power: usize,
    suballocation_size: usize,
    block_size: usize,
}

impl PowerPool {
    const ID_POWER_SHIFT: i32 = 26;
    const BLOCK_ALIGNMENT: usize = 128;

    fn new(power: usize, minimum_block_size: usize) -> Self {
        let suballocation_size = 1usize << power;
        let block_size = suballocation_size.max(minimum_block_size);
        let suballocations_per_block = block_size / suballocation_size;
        let suballocations_per_block_shift = suballocations_per_block.trailing_zeros();
        Self {
            blocks: Vec::new(),
            free_slots: Vec::new(),
            next_slot: 0,
            #[cfg(debug_assertions)]
            outstanding_ids: HashSet::new(),
            suballocations_per_block_shift,
            suballocations_per_block_mask: (1 << suballocations_per_block_shift) - 1,
            power,
            suballocation_size,
            block_size,
        }
    }

    #[inline(always)]
    fn layout(&self) -> Layout {
        // Block sizes are powers of two no larger than 2^30 and the alignment is a power of two,
        // so this can't fail.
        match Layout::from_size_align(self.block_size, Self::BLOCK_ALIGNMENT) {
            Ok(layout) => layout,
            Err(_) => unreachable!("Block layouts are always valid."),
        }
    }

    fn allocate_block(&mut self) {
        let layout = self.layout();
        let memory = unsafe { alloc::alloc(layout) };
        let Some(block) = NonNull::new(memory) else {
            alloc::handle_alloc_error(layout);
        };
        trace!(
            "buffer pool allocated block {} for power {} ({} bytes)",
            self.blocks.len(),
            self.power,
            self.block_size
        );
        self.blocks.push(block);
    }

    fn take(&mut self) -> Buffer<u8> {
        let slot = match self.free_slots.pop() {
            Some(slot) => slot,
            None => {
                let slot = self.next_slot;
                self.next_slot += 1;
                slot
            }
        };
        debug_assert!(slot < (1 << Self::ID_POWER_SHIFT), "Too many outstanding buffers.");
        let block_index = (slot >> self.suballocations_per_block_shift) as usize;
        while self.blocks.len() <= block_index {
            self.allocate_block();
        }
        let index_in_block = (slot & self.suballocations_per_block_mask) as usize;
        let id = ((self.power as i32) << Self::ID_POWER_SHIFT) | slot;
        #[cfg(debug_assertions)]
        {
            debug_assert!(
                self.outstanding_ids.insert(slot),
                "A slot should not be handed out twice."
            );
        }
        unsafe {
            let memory = self.blocks[block_index]
                .as_ptr()
                .add(index_in_block * self.suballocation_size);
            Buffer::new(memory, self.suballocation_size as i32, id)
        }
    }

    fn return_slot(&mut self, slot: i32) {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.outstanding_ids.remove(&slot),
                "This buffer id must have been taken from the pool previously."
            );
        }
        self.free_slots.push(slot);
    }

    fn outstanding_count(&self) -> i32 {
        self.next_slot - self.free_slots.len() as i32
    }

    fn clear(&mut self) {
        let layout = self.layout();
        for block in self.blocks.drain(..) {
            unsafe { alloc::dealloc(block.as_ptr(), layout) };
        }
        self.free_slots.clear();
        self.next_slot = 0;
        #[cfg(debug_assertions)]
        self.outstanding_ids.clear();
    }
}

/// Unmanaged memory pool that suballocates from memory blocks pulled from the global allocator.
///
/// Requests are rounded up to the next power of two in bytes and served from a per-power
/// pool, so returning and retaking buffers of similar sizes never touches the allocator.
pub struct BufferPool {
    pools: Vec<PowerPool>,
    minimum_block_allocation_size: usize,
}

// Blocks are exclusively owned by the pool; nothing in the pool is tied to a thread.
unsafe impl Send for BufferPool {}

impl BufferPool {
    /// Block size used when none is specified.
    pub const DEFAULT_MINIMUM_BLOCK_ALLOCATION_SIZE: usize = 131072;

    /// Creates a new buffer pool.
    ///
    /// `minimum_block_allocation_size` is the smallest allocation the pool will request from
    /// the global allocator and must be a power of two.
    pub fn new(minimum_block_allocation_size: usize) -> Self {
        debug_assert!(
            minimum_block_allocation_size.is_power_of_two(),
            "Block allocation size must be a power of 2."
        );
        let pools = (0..=MAXIMUM_SPAN_SIZE_POWER)
            .map(|power| PowerPool::new(power, minimum_block_allocation_size))
            .collect();
        Self {
            pools,
            minimum_block_allocation_size,
        }
    }

    pub fn minimum_block_allocation_size(&self) -> usize {
        self.minimum_block_allocation_size
    }

    #[inline(always)]
    fn power_for_byte_count(byte_count: usize) -> usize {
        let power = byte_count.max(1).next_power_of_two().trailing_zeros() as usize;
        assert!(
            power <= MAXIMUM_SPAN_SIZE_POWER,
            "Requested span exceeds the maximum span size."
        );
        power
    }

    /// Gets the capacity of a buffer that would be returned by the pool if a given
    /// element count was requested from take_at_least.
    #[inline(always)]
    pub fn get_capacity_for_count<T>(count: i32) -> i32 {
        let element_size = std::mem::size_of::<T>().max(1);
        let power = Self::power_for_byte_count(count.max(1) as usize * element_size);
        ((1usize << power) / element_size) as i32
    }

    /// Gets the number of buffers currently taken from the pool and not yet returned.
    pub fn outstanding_buffer_count(&self) -> i32 {
        self.pools.iter().map(PowerPool::outstanding_count).sum()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MINIMUM_BLOCK_ALLOCATION_SIZE)
    }
}

impl UnmanagedMemoryPool for BufferPool {
    #[inline]
    fn take_at_least<T: Copy>(&mut self, count: i32) -> Buffer<T> {
        debug_assert!(
            std::mem::align_of::<T>() <= PowerPool::BLOCK_ALIGNMENT,
            "Pool blocks cannot satisfy alignments above the block alignment."
        );
        let power =
            Self::power_for_byte_count(count.max(1) as usize * std::mem::size_of::<T>().max(1));
        self.pools[power].take().cast::<T>()
    }

    #[inline]
    fn take<T: Copy>(&mut self, count: i32) -> Buffer<T> {
        let mut buffer = self.take_at_least::<T>(count);
        buffer.set_len(count);
        buffer
    }

    #[inline]
    fn return_buffer<T>(&mut self, buffer: &mut Buffer<T>) {
        debug_assert!(buffer.allocated(), "Cannot return an unallocated buffer.");
        let id = buffer.id();
        let power = (id >> PowerPool::ID_POWER_SHIFT) as usize;
        let slot = id & ((1 << PowerPool::ID_POWER_SHIFT) - 1);
        self.pools[power].return_slot(slot);
        *buffer = Buffer::default();
    }

    fn resize_to_at_least<T: Copy>(&mut self, buffer: &mut Buffer<T>, target_size: i32, copy_count: i32) {
        let target_capacity = Self::get_capacity_for_count::<T>(target_size);
        if !buffer.allocated() {
            debug_assert!(copy_count == 0, "Nothing to copy out of an unallocated buffer.");
            *buffer = self.take_at_least(target_size);
        } else if buffer.len() != target_capacity {
            let mut new_buffer = self.take_at_least::<T>(target_size);
            buffer.copy_to(0, &mut new_buffer, 0, copy_count.min(buffer.len()));
            self.return_buffer(buffer);
            *buffer = new_buffer;
        }
    }

    fn clear(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    fn get_total_allocated_byte_count(&self) -> u64 {
        self.pools
            .iter()
            .map(|pool| pool.blocks.len() as u64 * pool.block_size as u64)
            .sum()
    }
}

impl Drop for BufferPool {
    fn drop(&mut self) {
        self.clear();
    }
}
