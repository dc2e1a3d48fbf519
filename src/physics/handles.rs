use std::fmt;

/// Unique identifier of a body. Stays valid while the body moves between active and sleeping sets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct BodyHandle(pub i32);

/// Unique identifier of a static. Statics have their own handle space, separate from bodies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct StaticHandle(pub i32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BodyHandle<{}>", self.0)
    }
}

impl fmt::Display for StaticHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StaticHandle<{}>", self.0)
    }
}

impl From<BodyHandle> for i32 {
    #[inline(always)]
    fn from(handle: BodyHandle) -> Self {
        handle.0
    }
}

impl From<StaticHandle> for i32 {
    #[inline(always)]
    fn from(handle: StaticHandle) -> Self {
        handle.0
    }
}
