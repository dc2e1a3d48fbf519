use super::ContactEvents;
use crate::physics::collision_detection::collidable_pair::CollidablePair;
use crate::physics::collision_detection::contact_manifold::EmptyManifold;
use log::trace;
use std::mem;

impl ContactEvents {
    /// Ends stale pairs and merges the pairs discovered during collision detection into the listeners.
    ///
    /// Must run once after collision detection of every step, with no manifold reports in flight.
    /// Calling it again without a freshness scan or a reported manifold in between does nothing.
    pub fn flush(&mut self) {
        let step_started = mem::take(&mut self.step_started);
        let mut manifolds_handled = false;
        for slot in self.workers.iter_mut() {
            manifolds_handled |= mem::take(&mut slot.get_mut().handled_manifold);
        }
        if !step_started && !manifolds_handled {
            debug_assert!(self.pending_adds_drained());
            trace!("contact events flush skipped, nothing happened since the last one");
            return;
        }

        // Stale pairs should have received a manifold this step but didn't.
        let mut ended_pair_count = 0;
        for listener in self.listeners.iter_mut() {
            let source = listener.source;
            let previous_collisions = &mut listener.previous_collisions;
            // Reverse order; entries are removed during iteration.
            for index in (0..previous_collisions.count).rev() {
                let collision = *previous_collisions.get(index);
                if collision.fresh {
                    previous_collisions.get_mut(index).fresh = false;
                    continue;
                }
                // Sorted to match the order the narrow phase reports pairs in.
                let pair = CollidablePair::sorted(source, collision.collidable);
                if collision.contact_count > 0 {
                    for &feature_id in collision.feature_ids() {
                        listener
                            .handler
                            .on_contact_removed(source, pair, &EmptyManifold, feature_id, 0);
                    }
                    if collision.was_touching {
                        listener
                            .handler
                            .on_stopped_touching(source, pair, &EmptyManifold, 0);
                    }
                }
                listener.handler.on_pair_ended(source, pair);
                previous_collisions.fast_remove_at(index);
                if previous_collisions.is_empty() {
                    previous_collisions.dispose(&mut self.pool);
                }
                ended_pair_count += 1;
            }
        }

        let mut merged_pair_count = 0;
        for (worker_index, slot) in self.workers.iter_mut().enumerate() {
            let pending_adds = &mut slot.get_mut().pending_adds;
            for add in pending_adds.as_slice() {
                debug_assert!(
                    (add.listener_index as usize) < self.listeners.len(),
                    "Pending pairs must belong to a listener that is still registered."
                );
                let collisions = &mut self.listeners[add.listener_index as usize].previous_collisions;
                // Creates the list if the listener had no pairs.
                collisions.ensure_capacity(
                    (collisions.count + 1).max(self.config.previous_collision_minimum_capacity),
                    &mut self.pool,
                );
                collisions.add_unsafely(add.collision);
            }
            merged_pair_count += pending_adds.len();
            // Unallocated buffers signal the next step that this one was flushed.
            if pending_adds.allocated() {
                pending_adds.dispose(self.worker_pools.get_pool(worker_index));
            }
        }
        trace!(
            "contact events flush ended {} pair(s), merged {} new pair(s)",
            ended_pair_count,
            merged_pair_count
        );
    }
}
