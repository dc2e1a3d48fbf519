use crate::physics::collidables::collidable_reference::{CollidableMobility, CollidableReference};
use crate::physics::handles::BodyHandle;

/// Location of a body in the simulation's body sets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyMemoryLocation {
    /// Index of the set owning the body reference. 0 = awake, >0 = sleeping island.
    pub set_index: i32,
}

impl BodyMemoryLocation {
    pub const ACTIVE_SET: i32 = 0;

    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.set_index == Self::ACTIVE_SET
    }
}

/// Activity and mobility queries the contact events need from whatever owns the bodies.
pub trait BodyStates {
    /// Gets where the body currently lives.
    fn location(&self, handle: BodyHandle) -> BodyMemoryLocation;

    /// Gets whether the body is dynamic or kinematic.
    fn mobility(&self, handle: BodyHandle) -> CollidableMobility;

    /// Whether the body is in the active set and will be visited by collision detection this step.
    #[inline(always)]
    fn is_active(&self, handle: BodyHandle) -> bool {
        self.location(handle).is_active()
    }

    /// Gets the collidable reference for the body's current mobility.
    #[inline(always)]
    fn collidable_reference(&self, handle: BodyHandle) -> CollidableReference {
        CollidableReference::from_body(self.mobility(handle), handle)
    }
}

#[derive(Debug, Clone, Copy)]
struct BodySlot {
    location: BodyMemoryLocation,
    mobility: CollidableMobility,
}

/// Minimal handle-indexed body bookkeeping: mobility plus which set each body lives in.
///
/// Handles are handed out densely and never reused.
#[derive(Debug, Default)]
pub struct Bodies {
    handle_to_slot: Vec<BodySlot>,
}

impl Bodies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an awake body.
    pub fn add(&mut self, mobility: CollidableMobility) -> BodyHandle {
        debug_assert!(
            mobility != CollidableMobility::Static,
            "Bodies must be dynamic or kinematic."
        );
        let handle = BodyHandle(self.handle_to_slot.len() as i32);
        self.handle_to_slot.push(BodySlot {
            location: BodyMemoryLocation::default(),
            mobility,
        });
        handle
    }

    /// Gets the number of bodies ever added.
    pub fn count(&self) -> usize {
        self.handle_to_slot.len()
    }

    #[inline(always)]
    fn slot(&self, handle: BodyHandle) -> &BodySlot {
        debug_assert!(
            handle.0 >= 0 && (handle.0 as usize) < self.handle_to_slot.len(),
            "Body handle must exist."
        );
        &self.handle_to_slot[handle.0 as usize]
    }

    #[inline(always)]
    fn slot_mut(&mut self, handle: BodyHandle) -> &mut BodySlot {
        debug_assert!(
            handle.0 >= 0 && (handle.0 as usize) < self.handle_to_slot.len(),
            "Body handle must exist."
        );
        &mut self.handle_to_slot[handle.0 as usize]
    }

    /// Moves a body into an inactive island set.
    pub fn sleep(&mut self, handle: BodyHandle, island_set_index: i32) {
        debug_assert!(island_set_index > 0, "Sleeping islands live in sets above 0.");
        self.slot_mut(handle).location.set_index = island_set_index;
    }

    /// Moves a body back into the active set.
    pub fn awaken(&mut self, handle: BodyHandle) {
        self.slot_mut(handle).location.set_index = BodyMemoryLocation::ACTIVE_SET;
    }

    pub fn set_mobility(&mut self, handle: BodyHandle, mobility: CollidableMobility) {
        debug_assert!(
            mobility != CollidableMobility::Static,
            "Bodies must be dynamic or kinematic."
        );
        self.slot_mut(handle).mobility = mobility;
    }
}

impl BodyStates for Bodies {
    #[inline(always)]
    fn location(&self, handle: BodyHandle) -> BodyMemoryLocation {
        self.slot(handle).location
    }

    #[inline(always)]
    fn mobility(&self, handle: BodyHandle) -> CollidableMobility {
        self.slot(handle).mobility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeping_moves_bodies_out_of_the_active_set() {
        let mut bodies = Bodies::new();
        let a = bodies.add(CollidableMobility::Dynamic);
        let b = bodies.add(CollidableMobility::Kinematic);
        assert!(bodies.is_active(a));
        bodies.sleep(a, 2);
        assert!(!bodies.is_active(a));
        assert_eq!(bodies.location(a).set_index, 2);
        bodies.awaken(a);
        assert!(bodies.is_active(a));
        assert_eq!(
            bodies.collidable_reference(b),
            CollidableReference::from_body(CollidableMobility::Kinematic, b)
        );
    }
}
