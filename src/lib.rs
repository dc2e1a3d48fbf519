//! Contact event reconciliation for a multithreaded narrow phase.
//!
//! Collidables registered with [`ContactEvents`] receive pair and contact lifecycle events
//! through a [`ContactEventHandler`], derived from the raw manifolds collision detection produces
//! every step.

pub mod physics;
pub mod utilities;

pub use physics::bodies::{Bodies, BodyMemoryLocation, BodyStates};
pub use physics::collidables::collidable_reference::{CollidableMobility, CollidableReference};
pub use physics::collision_detection::collidable_pair::CollidablePair;
pub use physics::collision_detection::contact_manifold::{
    Contact, ContactManifold, ConvexContact, ConvexContactManifold, EmptyManifold,
    NonconvexContactManifold,
};
pub use physics::contact_events::{
    ContactEventHandler, ContactEvents, ContactEventsConfig, ContactEventsError,
};
pub use physics::handles::{BodyHandle, StaticHandle};
