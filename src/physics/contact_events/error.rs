use crate::physics::collidables::collidable_reference::CollidableReference;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEventsError {
    #[error("Collidable {0} is already registered for contact events")]
    AlreadyRegistered(CollidableReference),
    #[error("Collidable {0} is not registered for contact events")]
    NotRegistered(CollidableReference),
    #[error("Contact events need at least one worker")]
    InvalidWorkerCount,
    #[error("Capacity `{name}` must be positive, got {value}")]
    InvalidCapacity { name: &'static str, value: i64 },
    #[error("Minimum block allocation size {0} is not a power of two")]
    InvalidBlockSize(usize),
}
