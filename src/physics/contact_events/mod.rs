//! Watches a set of bodies and statics for contact changes and reports events.
//!
//! A step goes through three stages:
//!
//! 1. [`ContactEvents::set_freshness_for_current_activity_status`] runs before collision
//!    detection and decides which tracked pairs must receive a manifold to stay alive.
//! 2. The narrow phase feeds every manifold through [`ContactEvents::handle_manifold`], possibly
//!    from many workers at once. Existing pairs are updated in place; new pairs are parked in the
//!    reporting worker's pending buffer.
//! 3. [`ContactEvents::flush`] ends the pairs that went stale and merges the pending pairs.

mod config;
mod error;
mod flush;
mod freshness;
mod handler;
mod listener_registry;
mod previous_collision;
mod reconciler;

pub use config::ContactEventsConfig;
pub use error::ContactEventsError;
pub use handler::ContactEventHandler;
pub use previous_collision::{PendingWorkerAdd, PreviousCollision, FEATURE_ID_CAPACITY};

use crate::physics::bodies::BodyStates;
use crate::physics::collidable_property::CollidableProperty;
use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::timestepper::TimestepperStages;
use crate::utilities::collections::{IndexSet, QuickList};
use crate::utilities::memory::{BufferPool, WorkerBufferPools};
use crossbeam_utils::CachePadded;
use log::warn;
use std::cell::UnsafeCell;
use std::sync::Arc;

pub(crate) struct Listener {
    pub source: CollidableReference,
    pub handler: Arc<dyn ContactEventHandler>,
    /// Allocated lazily when the first pair is merged in and returned once the last pair ends.
    pub previous_collisions: QuickList<PreviousCollision>,
}

/// State owned by a single narrow phase worker during collision detection.
#[derive(Default)]
pub(crate) struct WorkerSlot {
    pub pending_adds: QuickList<PendingWorkerAdd>,
    /// Set whenever the worker reports a manifold; lets the flush tell an empty step from no step.
    pub handled_manifold: bool,
}

/// Turns raw narrow phase manifolds into contact events for registered collidables.
pub struct ContactEvents {
    config: ContactEventsConfig,
    pool: BufferPool,
    worker_pools: WorkerBufferPools,
    /// Handle to listener index. Only meaningful for handles whose listener flag is set.
    listener_indices: CollidableProperty<i32>,
    static_listener_flags: IndexSet,
    body_listener_flags: IndexSet,
    listeners: Vec<Listener>,
    workers: Box<[CachePadded<UnsafeCell<WorkerSlot>>]>,
    /// Set by the freshness scan, cleared by the flush.
    step_started: bool,
}

// Shared access from worker threads only happens through `handle_manifold`, whose contract
// partitions every write by worker index and by (source, other) pair.
unsafe impl Send for ContactEvents {}
unsafe impl Sync for ContactEvents {}

impl ContactEvents {
    /// Creates a new contact events stream.
    pub fn new(config: ContactEventsConfig) -> Result<Self, ContactEventsError> {
        config.validate()?;
        let mut pool = BufferPool::new(config.minimum_block_allocation_size);
        let listener_indices = CollidableProperty::with_capacity(
            config.initial_handle_capacity,
            config.initial_handle_capacity,
            &mut pool,
        );
        let static_listener_flags = IndexSet::new(&mut pool, config.initial_handle_capacity);
        let body_listener_flags = IndexSet::new(&mut pool, config.initial_handle_capacity);
        let workers = (0..config.worker_count)
            .map(|_| CachePadded::new(UnsafeCell::new(WorkerSlot::default())))
            .collect();
        Ok(Self {
            worker_pools: WorkerBufferPools::new(
                config.worker_count,
                config.minimum_block_allocation_size,
            ),
            config,
            pool,
            listener_indices,
            static_listener_flags,
            body_listener_flags,
            listeners: Vec::with_capacity(config.initial_listener_capacity),
            workers,
            step_started: false,
        })
    }

    pub fn config(&self) -> &ContactEventsConfig {
        &self.config
    }

    /// Gets the number of workers that may report manifolds.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    #[inline(always)]
    fn listener_for(&self, source: CollidableReference) -> Option<&Listener> {
        if self.is_listener(source) {
            Some(&self.listeners[*self.listener_indices.get(source) as usize])
        } else {
            None
        }
    }

    /// Gets the number of pairs a listener has in its store. Pairs discovered this step aren't
    /// counted until the flush merges them.
    pub fn tracked_pair_count(&self, source: CollidableReference) -> usize {
        self.listener_for(source)
            .map_or(0, |listener| listener.previous_collisions.len() as usize)
    }

    /// Gets the stored state of the pair between a listener and another collidable, if it is tracked.
    pub fn previous_collision(
        &self,
        source: CollidableReference,
        other: CollidableReference,
    ) -> Option<PreviousCollision> {
        self.listener_for(source)?
            .previous_collisions
            .as_slice()
            .iter()
            .find(|collision| collision.collidable == other)
            .copied()
    }

    /// Whether a listener has a pair with another collidable in its store.
    pub fn is_tracking(&self, source: CollidableReference, other: CollidableReference) -> bool {
        self.previous_collision(source, other).is_some()
    }

    /// Gets the number of new pairs waiting in worker buffers for the next flush.
    ///
    /// Must not be called while collision detection is reporting manifolds.
    pub fn pending_add_count(&self) -> usize {
        self.workers
            .iter()
            // No worker is writing; see `handle_manifold`'s contract.
            .map(|slot| unsafe { (*slot.get()).pending_adds.len() as usize })
            .sum()
    }

    /// Whether every worker's pending buffer was drained and returned to its pool.
    fn pending_adds_drained(&mut self) -> bool {
        self.workers
            .iter_mut()
            .all(|slot| !slot.get_mut().pending_adds.allocated())
    }
}

impl TimestepperStages for ContactEvents {
    fn before_collision_detection(&mut self, _dt: f32, bodies: &dyn BodyStates) {
        self.set_freshness_for_current_activity_status(bodies);
    }

    fn collisions_detected(&mut self, _dt: f32) {
        self.flush();
    }
}

impl Drop for ContactEvents {
    fn drop(&mut self) {
        for (worker_index, slot) in self.workers.iter_mut().enumerate() {
            let pending_adds = &mut slot.get_mut().pending_adds;
            if pending_adds.allocated() {
                warn!(
                    "contact events dropped with {} unflushed pair(s) on worker {}",
                    pending_adds.len(),
                    worker_index
                );
                pending_adds.dispose(self.worker_pools.get_pool(worker_index));
            }
        }
        for listener in self.listeners.iter_mut() {
            if listener.previous_collisions.allocated() {
                listener.previous_collisions.dispose(&mut self.pool);
            }
        }
        if self.static_listener_flags.flags.allocated() {
            self.static_listener_flags.dispose(&mut self.pool);
        }
        if self.body_listener_flags.flags.allocated() {
            self.body_listener_flags.dispose(&mut self.pool);
        }
        self.listener_indices.dispose(&mut self.pool);
        debug_assert!(
            std::thread::panicking() || self.pool.outstanding_buffer_count() == 0,
            "Every buffer taken by the contact events should have been returned."
        );
    }
}
