use crate::physics::handles::{BodyHandle, StaticHandle};
use std::fmt;

/// Represents how a collidable can interact and move.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollidableMobility {
    /// Marks a collidable as owned by a dynamic body.
    Dynamic = 0,
    /// Marks a collidable as owned by a kinematic body.
    Kinematic = 1,
    /// Marks the collidable as an independent immobile collidable.
    Static = 2,
}

/// Uses a bitpacked representation to refer to a body or static collidable.
///
/// The top two bits hold the mobility and the rest hold the handle, so two references are
/// the same collidable exactly when their packed values are equal.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CollidableReference {
    /// Bitpacked representation of the collidable reference.
    pub packed: u32,
}

const _: () = {
    assert!(std::mem::size_of::<CollidableReference>() == 4);
};

impl CollidableReference {
    /// Gets the mobility state of the owner of this collidable.
    #[inline(always)]
    pub fn mobility(&self) -> CollidableMobility {
        match self.packed >> 30 {
            0 => CollidableMobility::Dynamic,
            1 => CollidableMobility::Kinematic,
            _ => CollidableMobility::Static,
        }
    }

    /// Whether the collidable belongs to a static rather than a body.
    #[inline(always)]
    pub fn is_static(&self) -> bool {
        self.mobility() == CollidableMobility::Static
    }

    /// Gets the body handle of the owner of the collidable referred to by this instance.
    #[inline(always)]
    pub fn body_handle(&self) -> BodyHandle {
        debug_assert!(
            !self.is_static(),
            "Extracting a body handle from a collidable reference requires that the collidable is owned by a body."
        );
        BodyHandle(self.raw_handle_value())
    }

    /// Gets the static handle of the owner of the collidable referred to by this instance.
    #[inline(always)]
    pub fn static_handle(&self) -> StaticHandle {
        debug_assert!(
            self.is_static(),
            "Extracting a static handle from a collidable reference requires that the collidable is owned by a static."
        );
        StaticHandle(self.raw_handle_value())
    }

    /// Gets the integer value of the handle of the owner of the collidable.
    #[inline(always)]
    pub fn raw_handle_value(&self) -> i32 {
        (self.packed & 0x3FFF_FFFF) as i32
    }

    #[inline(always)]
    fn from_raw(mobility: CollidableMobility, handle: i32) -> Self {
        debug_assert!(
            (0..(1 << 30)).contains(&handle),
            "Do you actually have more than 2^30 collidables?"
        );
        Self {
            packed: ((mobility as u32) << 30) | (handle as u32),
        }
    }

    /// Creates a collidable reference for a body.
    #[inline(always)]
    pub fn from_body(mobility: CollidableMobility, handle: BodyHandle) -> Self {
        debug_assert!(
            mobility != CollidableMobility::Static,
            "Creating a collidable reference associated with a body requires a body-related mobility."
        );
        Self::from_raw(mobility, handle.0)
    }

    /// Creates a collidable reference for a static.
    #[inline(always)]
    pub fn from_static(handle: StaticHandle) -> Self {
        Self::from_raw(CollidableMobility::Static, handle.0)
    }
}

impl From<StaticHandle> for CollidableReference {
    fn from(handle: StaticHandle) -> Self {
        Self::from_static(handle)
    }
}

impl fmt::Display for CollidableReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}[{}]", self.mobility(), self.raw_handle_value())
    }
}
