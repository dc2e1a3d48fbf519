pub mod bodies;
pub mod collidable_property;
pub mod collidables;
pub mod collision_detection;
pub mod contact_events;
pub mod default_timestepper;
pub mod handles;
pub mod timestepper;
