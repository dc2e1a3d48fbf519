use super::ContactEvents;
use crate::physics::bodies::BodyStates;
use log::error;

impl ContactEvents {
    /// Prepares every tracked pair for the upcoming collision detection pass.
    ///
    /// Any pair left stale after collision detection is ended by the next flush. Pairs updated by
    /// `handle_manifold` become fresh, but pairs involving only sleeping or static collidables are
    /// never visited by the narrow phase, so they are marked fresh here up front.
    ///
    /// Must run before collision detection of every step.
    pub fn set_freshness_for_current_activity_status<B: BodyStates + ?Sized>(&mut self, bodies: &B) {
        if !self.pending_adds_drained() {
            error!("contact events pending pairs were not flushed before the next step began");
            debug_assert!(
                false,
                "Flush must run after every collision detection pass before the next step begins."
            );
        }
        for listener in self.listeners.iter_mut() {
            let source = listener.source;
            // Active bodies get visited by collision detection, so all of their pairs should receive an update.
            let source_expects_updates = !source.is_static() && bodies.is_active(source.body_handle());
            let previous_collisions = listener.previous_collisions.as_mut_slice();
            if source_expects_updates {
                for collision in previous_collisions {
                    collision.fresh = false;
                }
            } else {
                // Static or sleeping source; only an awake opposing body can still produce a manifold.
                for collision in previous_collisions {
                    let other = collision.collidable;
                    collision.fresh = other.is_static() || !bodies.is_active(other.body_handle());
                }
            }
        }
        self.step_started = true;
    }
}
