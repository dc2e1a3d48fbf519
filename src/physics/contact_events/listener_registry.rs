use super::{ContactEventHandler, ContactEvents, ContactEventsError, Listener};
use crate::physics::bodies::BodyStates;
use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::handles::{BodyHandle, StaticHandle};
use crate::utilities::collections::QuickList;
use log::debug;
use std::sync::Arc;

impl ContactEvents {
    /// Begins listening for events related to the given collidable.
    ///
    /// The collidable must not already be registered; use [`ContactEvents::try_register`] for a checked version.
    pub fn register(&mut self, collidable: CollidableReference, handler: Arc<dyn ContactEventHandler>) {
        debug_assert!(
            !self.is_listener(collidable),
            "Should only try to register listeners that weren't previously registered"
        );
        let handle = collidable.raw_handle_value();
        if collidable.is_static() {
            self.static_listener_flags.add(handle, &mut self.pool);
        } else {
            self.body_listener_flags.add(handle, &mut self.pool);
        }
        let listener_index = self.listeners.len() as i32;
        // The previous collision list stays unallocated until a pair actually exists.
        self.listeners.push(Listener {
            source: collidable,
            handler,
            previous_collisions: QuickList::default(),
        });
        *self.listener_indices.allocate(collidable, &mut self.pool) = listener_index;
        debug!("registered contact listener {} for {}", listener_index, collidable);
    }

    /// Begins listening for events related to the given collidable, failing if it already is.
    pub fn try_register(
        &mut self,
        collidable: CollidableReference,
        handler: Arc<dyn ContactEventHandler>,
    ) -> Result<(), ContactEventsError> {
        if self.is_listener(collidable) {
            return Err(ContactEventsError::AlreadyRegistered(collidable));
        }
        self.register(collidable, handler);
        Ok(())
    }

    /// Begins listening for events related to the given body.
    pub fn register_body<B: BodyStates + ?Sized>(
        &mut self,
        body: BodyHandle,
        bodies: &B,
        handler: Arc<dyn ContactEventHandler>,
    ) {
        self.register(bodies.collidable_reference(body), handler);
    }

    /// Begins listening for events related to the given static.
    pub fn register_static(&mut self, static_handle: StaticHandle, handler: Arc<dyn ContactEventHandler>) {
        self.register(CollidableReference::from_static(static_handle), handler);
    }

    /// Stops listening for events related to the given collidable.
    ///
    /// The collidable must be registered. Must not be called while collision detection is still
    /// reporting manifolds. Between collision detection and the flush it is fine: new pairs the
    /// collidable discovered are discarded, and pairs of the listener moved into its slot follow it.
    pub fn unregister(&mut self, collidable: CollidableReference) {
        debug_assert!(
            self.is_listener(collidable),
            "Should only try to unregister listeners that actually exist."
        );
        let handle = collidable.raw_handle_value();
        if collidable.is_static() {
            self.static_listener_flags.remove(handle);
        } else {
            self.body_listener_flags.remove(handle);
        }
        let index = *self.listener_indices.get(collidable) as usize;
        let last_index = self.listeners.len() - 1;
        let mut removed = self.listeners.swap_remove(index);
        if removed.previous_collisions.allocated() {
            removed.previous_collisions.dispose(&mut self.pool);
        }
        if index < self.listeners.len() {
            let moved_source = self.listeners[index].source;
            *self.listener_indices.get_mut(moved_source) = index as i32;
        }
        self.retarget_pending_adds(index as i32, last_index as i32);
        debug!("unregistered contact listener {} for {}", index, collidable);
    }

    /// Stops listening for events related to the given collidable, failing if it isn't registered.
    pub fn try_unregister(&mut self, collidable: CollidableReference) -> Result<(), ContactEventsError> {
        if !self.is_listener(collidable) {
            return Err(ContactEventsError::NotRegistered(collidable));
        }
        self.unregister(collidable);
        Ok(())
    }

    /// Stops listening for events related to the given body.
    pub fn unregister_body<B: BodyStates + ?Sized>(&mut self, body: BodyHandle, bodies: &B) {
        self.unregister(bodies.collidable_reference(body));
    }

    /// Stops listening for events related to the given static.
    pub fn unregister_static(&mut self, static_handle: StaticHandle) {
        self.unregister(CollidableReference::from_static(static_handle));
    }

    /// Checks if a collidable is registered as a listener.
    #[inline(always)]
    pub fn is_listener(&self, collidable: CollidableReference) -> bool {
        let handle = collidable.raw_handle_value();
        if collidable.is_static() {
            self.static_listener_flags.contains(handle)
        } else {
            self.body_listener_flags.contains(handle)
        }
    }

    /// Gets the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drops pending pairs owned by the listener removed from `removed_index` and points pairs of
    /// the listener that moved there from `moved_from_index` at its new slot.
    fn retarget_pending_adds(&mut self, removed_index: i32, moved_from_index: i32) {
        for slot in self.workers.iter_mut() {
            let pending_adds = &mut slot.get_mut().pending_adds;
            // Reverse order; entries are removed during iteration.
            for add_index in (0..pending_adds.count).rev() {
                let owner = pending_adds.get(add_index).listener_index;
                if owner == removed_index {
                    pending_adds.fast_remove_at(add_index);
                } else if owner == moved_from_index {
                    pending_adds.get_mut(add_index).listener_index = removed_index;
                }
            }
        }
    }
}
