use super::error::ContactEventsError;
use crate::utilities::ThreadDispatcher;

/// Sizing knobs for [`ContactEvents`](super::ContactEvents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEventsConfig {
    /// Number of listeners to allocate space for initially.
    pub initial_listener_capacity: usize,
    /// Number of narrow phase workers that may report manifolds. Worker indices passed to
    /// `handle_manifold` must be below this.
    pub worker_count: usize,
    /// Smallest capacity a worker's pending pair buffer grows to the first time it is used in a step.
    pub pending_add_minimum_capacity: i32,
    /// Smallest capacity a listener's previous collision list grows to when it first gets a pair.
    pub previous_collision_minimum_capacity: i32,
    /// Number of body and static handles the listener lookup table starts out covering.
    pub initial_handle_capacity: i32,
    /// Smallest block the internal pools request from the allocator. Must be a power of two.
    pub minimum_block_allocation_size: usize,
}

impl Default for ContactEventsConfig {
    fn default() -> Self {
        Self {
            initial_listener_capacity: 64,
            worker_count: 1,
            pending_add_minimum_capacity: 64,
            previous_collision_minimum_capacity: 8,
            initial_handle_capacity: 64,
            minimum_block_allocation_size: 16384,
        }
    }
}

impl ContactEventsConfig {
    /// Default configuration with one worker per dispatcher thread.
    pub fn for_dispatcher(thread_dispatcher: &dyn ThreadDispatcher) -> Self {
        Self::default().with_worker_count(thread_dispatcher.thread_count())
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_initial_listener_capacity(mut self, capacity: usize) -> Self {
        self.initial_listener_capacity = capacity;
        self
    }

    pub fn with_pending_add_minimum_capacity(mut self, capacity: i32) -> Self {
        self.pending_add_minimum_capacity = capacity;
        self
    }

    pub fn with_previous_collision_minimum_capacity(mut self, capacity: i32) -> Self {
        self.previous_collision_minimum_capacity = capacity;
        self
    }

    pub fn with_initial_handle_capacity(mut self, capacity: i32) -> Self {
        self.initial_handle_capacity = capacity;
        self
    }

    pub fn with_minimum_block_allocation_size(mut self, size: usize) -> Self {
        self.minimum_block_allocation_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), ContactEventsError> {
        if self.worker_count == 0 {
            return Err(ContactEventsError::InvalidWorkerCount);
        }
        let capacities = [
            ("pending_add_minimum_capacity", self.pending_add_minimum_capacity),
            (
                "previous_collision_minimum_capacity",
                self.previous_collision_minimum_capacity,
            ),
            ("initial_handle_capacity", self.initial_handle_capacity),
        ];
        for (name, value) in capacities {
            if value <= 0 {
                return Err(ContactEventsError::InvalidCapacity {
                    name,
                    value: value as i64,
                });
            }
        }
        if !self.minimum_block_allocation_size.is_power_of_two() {
            return Err(ContactEventsError::InvalidBlockSize(
                self.minimum_block_allocation_size,
            ));
        }
        Ok(())
    }
}
