use super::collidable_pair::CollidablePair;
use super::contact_manifold::ContactManifold;
use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::contact_events::ContactEvents;

/// Defines handlers for narrow phase events. Called from every narrow phase worker concurrently.
pub trait NarrowPhaseCallbacks: Sync {
    /// Chooses whether to allow contact generation to proceed for two overlapping collidables.
    fn allow_contact_generation(
        &self,
        worker_index: usize,
        a: CollidableReference,
        b: CollidableReference,
        speculative_margin: &mut f32,
    ) -> bool;

    /// Provides a notification that a manifold has been created for a pair.
    /// Offers an opportunity to change the manifold's details.
    /// Returns true if a constraint should be created for the manifold, false otherwise.
    fn configure_contact_manifold<M: ContactManifold>(
        &self,
        worker_index: usize,
        pair: CollidablePair,
        manifold: &mut M,
    ) -> bool;
}

/// Narrow phase callbacks that feed every configured manifold into a [`ContactEvents`] stream.
pub struct ContactEventCallbacks<'a> {
    events: &'a ContactEvents,
}

impl<'a> ContactEventCallbacks<'a> {
    /// Creates callbacks reporting into `events`.
    ///
    /// # Safety
    /// The callbacks forward to [`ContactEvents::handle_manifold`]; the narrow phase driving them
    /// must uphold its contract for every `configure_contact_manifold` call.
    pub unsafe fn new(events: &'a ContactEvents) -> Self {
        Self { events }
    }
}

impl NarrowPhaseCallbacks for ContactEventCallbacks<'_> {
    #[inline(always)]
    fn allow_contact_generation(
        &self,
        _worker_index: usize,
        a: CollidableReference,
        b: CollidableReference,
        _speculative_margin: &mut f32,
    ) -> bool {
        // Two statics never collide; everything else may produce events.
        !(a.is_static() && b.is_static())
    }

    #[inline(always)]
    fn configure_contact_manifold<M: ContactManifold>(
        &self,
        worker_index: usize,
        pair: CollidablePair,
        manifold: &mut M,
    ) -> bool {
        // Construction required the caller to uphold handle_manifold's contract.
        unsafe { self.events.handle_manifold(worker_index, pair, &*manifold) };
        true
    }
}
