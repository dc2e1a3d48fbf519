use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::collision_detection::collidable_pair::CollidablePair;
use crate::physics::collision_detection::contact_manifold::ContactManifold;
use glam::Vec3;

/// Receives contact events for a registered collidable.
///
/// Every method has an empty default so handlers only implement what they care about.
/// Apart from `on_pair_ended`, events are raised from inside collision detection and may arrive
/// on any worker thread concurrently for different pairs; `worker_index` identifies the worker
/// that produced the event. Events raised by the flush report worker 0.
///
/// For a single pair in a single step, events arrive in the order contact added, contact removed,
/// started or stopped touching, touching, pair updated. A brand new pair reports pair created
/// before its contacts.
pub trait ContactEventHandler: Send + Sync {
    /// Fires when a contact with a feature id that wasn't present last step shows up.
    #[allow(clippy::too_many_arguments)]
    fn on_contact_added(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _contact_offset: Vec3,
        _contact_normal: Vec3,
        _depth: f32,
        _feature_id: i32,
        _contact_index: i32,
        _worker_index: usize,
    ) {
    }

    /// Fires when a contact that existed last step is no longer present.
    fn on_contact_removed(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _removed_feature_id: i32,
        _worker_index: usize,
    ) {
    }

    /// Fires the first time a pair has a contact with nonnegative depth after having none.
    fn on_started_touching(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _worker_index: usize,
    ) {
    }

    /// Fires every step a pair has at least one contact with nonnegative depth.
    fn on_touching(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _worker_index: usize,
    ) {
    }

    /// Fires when a touching pair stops having any contact with nonnegative depth.
    fn on_stopped_touching(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _worker_index: usize,
    ) {
    }

    /// Fires when a pair is observed for the first time.
    fn on_pair_created(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _worker_index: usize,
    ) {
    }

    /// Fires for every manifold update of a pair, after all other events for that update.
    fn on_pair_updated(
        &self,
        _event_source: CollidableReference,
        _pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _worker_index: usize,
    ) {
    }

    /// Fires from the flush when a pair stops being reported by the narrow phase.
    ///
    /// Like every other event, `event_source` is the listener's own collidable; the opposing
    /// collidable is the other member of `pair`.
    fn on_pair_ended(&self, _event_source: CollidableReference, _pair: CollidablePair) {}
}
