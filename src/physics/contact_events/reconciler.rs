use super::{ContactEvents, PendingWorkerAdd, PreviousCollision};
use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::collision_detection::collidable_pair::CollidablePair;
use crate::physics::collision_detection::contact_manifold::ContactManifold;
use std::ptr;

impl ContactEvents {
    /// Reports a manifold produced by collision detection. Both members of the pair are checked
    /// for listeners.
    ///
    /// # Safety
    /// May be called from many threads at once, provided that:
    /// - `worker_index` is below the configured worker count and is used by at most one thread at a time,
    /// - no two concurrent calls report the same pair,
    /// - nothing else touches these contact events until the calls complete.
    ///
    /// The narrow phase's pair partitioning provides the first two guarantees.
    #[inline(always)]
    pub unsafe fn handle_manifold<M: ContactManifold>(
        &self,
        worker_index: usize,
        pair: CollidablePair,
        manifold: &M,
    ) {
        debug_assert!(
            worker_index < self.workers.len(),
            "Worker index must be below the configured worker count."
        );
        (*self.workers[worker_index].get()).handled_manifold = true;
        self.handle_manifold_for_collidable(worker_index, pair.a, pair.b, pair, manifold);
        self.handle_manifold_for_collidable(worker_index, pair.b, pair.a, pair, manifold);
    }

    /// Reports a manifold from a single thread.
    pub fn handle_manifold_exclusive<M: ContactManifold>(
        &mut self,
        worker_index: usize,
        pair: CollidablePair,
        manifold: &M,
    ) {
        assert!(
            worker_index < self.workers.len(),
            "Worker index {} is out of range for {} worker(s).",
            worker_index,
            self.workers.len()
        );
        // Exclusive access rules out any concurrent call.
        unsafe { self.handle_manifold(worker_index, pair, manifold) }
    }

    unsafe fn handle_manifold_for_collidable<M: ContactManifold>(
        &self,
        worker_index: usize,
        source: CollidableReference,
        other: CollidableReference,
        pair: CollidablePair,
        manifold: &M,
    ) {
        // The source is the collidable a handler may be attached to; the call is repeated for both orders of the pair.
        if !self.is_listener(source) {
            return;
        }
        let listener_index = *self.listener_indices.get(source);
        let listener = &self.listeners[listener_index as usize];
        let handler = &*listener.handler;
        let dyn_manifold: &dyn ContactManifold = manifold;
        let previous_collisions = listener.previous_collisions;

        let mut is_touching = false;
        for previous_index in 0..previous_collisions.count {
            let collision_ptr = previous_collisions.span.element_ptr(previous_index);
            // Other workers may be scanning this list for their own pairs; only the identity field is shared.
            if ptr::addr_of!((*collision_ptr).collidable).read() != other {
                continue;
            }
            let previous = collision_ptr.read();
            // Bit i is set when the previous contact i still exists.
            let mut previous_contacts_still_exist = 0u32;
            for contact_index in 0..manifold.count() {
                let feature_id = manifold.get_feature_id(contact_index);
                match previous.find_feature_id(feature_id) {
                    Some(slot) => previous_contacts_still_exist |= 1 << slot,
                    None => {
                        let contact = manifold.get_contact(contact_index);
                        handler.on_contact_added(
                            source,
                            pair,
                            dyn_manifold,
                            contact.offset,
                            contact.normal,
                            contact.depth,
                            feature_id,
                            contact_index,
                            worker_index,
                        );
                    }
                }
                if manifold.get_depth(contact_index) >= 0.0 {
                    is_touching = true;
                }
            }
            if previous_contacts_still_exist != (1u32 << previous.contact_count) - 1 {
                for (slot, &feature_id) in previous.feature_ids().iter().enumerate() {
                    if previous_contacts_still_exist & (1 << slot) == 0 {
                        handler.on_contact_removed(source, pair, dyn_manifold, feature_id, worker_index);
                    }
                }
            }
            if !previous.was_touching && is_touching {
                handler.on_started_touching(source, pair, dyn_manifold, worker_index);
            } else if previous.was_touching && !is_touching {
                handler.on_stopped_touching(source, pair, dyn_manifold, worker_index);
            }
            if is_touching {
                handler.on_touching(source, pair, dyn_manifold, worker_index);
            }
            let mut updated = previous;
            updated.update(manifold, is_touching);
            write_update(collision_ptr, &updated);
            handler.on_pair_updated(source, pair, dyn_manifold, worker_index);
            return;
        }

        // First time this pair shows up. The listener's list is shared between workers, so the
        // pair waits in this worker's buffer until the flush.
        let mut collision = PreviousCollision::new(other);
        handler.on_pair_created(source, pair, dyn_manifold, worker_index);
        for contact_index in 0..manifold.count() {
            let contact = manifold.get_contact(contact_index);
            handler.on_contact_added(
                source,
                pair,
                dyn_manifold,
                contact.offset,
                contact.normal,
                contact.depth,
                contact.feature_id,
                contact_index,
                worker_index,
            );
            if contact.depth >= 0.0 {
                is_touching = true;
            }
        }
        if is_touching {
            handler.on_started_touching(source, pair, dyn_manifold, worker_index);
            handler.on_touching(source, pair, dyn_manifold, worker_index);
        }
        collision.update(manifold, is_touching);

        let pending_adds = &mut (*self.workers[worker_index].get()).pending_adds;
        // Creates the buffer if this is the worker's first new pair of the step.
        pending_adds.ensure_capacity(
            (pending_adds.count + 1).max(self.config.pending_add_minimum_capacity),
            self.worker_pools.get_pool_unchecked(worker_index),
        );
        pending_adds.add_unsafely(PendingWorkerAdd {
            listener_index,
            collision,
        });
        handler.on_pair_updated(source, pair, dyn_manifold, worker_index);
    }
}

/// Writes everything but the identity of a stored pair, which other workers may be reading.
#[inline(always)]
unsafe fn write_update(target: *mut PreviousCollision, updated: &PreviousCollision) {
    ptr::addr_of_mut!((*target).fresh).write(updated.fresh);
    ptr::addr_of_mut!((*target).was_touching).write(updated.was_touching);
    ptr::addr_of_mut!((*target).contact_count).write(updated.contact_count);
    ptr::addr_of_mut!((*target).feature_ids).write(updated.feature_ids);
}
