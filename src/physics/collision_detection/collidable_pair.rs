use crate::physics::collidables::collidable_reference::{CollidableMobility, CollidableReference};
use std::fmt;

/// Pair of collidables as reported by the narrow phase.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CollidablePair {
    pub a: CollidableReference,
    pub b: CollidableReference,
}

const _: () = {
    assert!(std::mem::size_of::<CollidablePair>() == 8);
};

impl CollidablePair {
    #[inline(always)]
    pub fn new(a: CollidableReference, b: CollidableReference) -> Self {
        Self { a, b }
    }

    /// Creates a pair ordered the same way the narrow phase orders the pairs it reports.
    #[inline(always)]
    pub fn sorted(a: CollidableReference, b: CollidableReference) -> Self {
        let (_, _, a, b) = sort_collidable_references_for_pair(a, b);
        Self { a, b }
    }

    /// Gets the member of the pair that isn't `source`.
    #[inline(always)]
    pub fn other(&self, source: CollidableReference) -> CollidableReference {
        debug_assert!(source == self.a || source == self.b, "Source must be in the pair.");
        if source == self.a {
            self.b
        } else {
            self.a
        }
    }
}

impl fmt::Display for CollidablePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.a, self.b)
    }
}

/// Sorts references to guarantee that two collidables in the same pair will always be in the same order.
///
/// Statics always end up in slot B; two bodies are ordered by ascending handle.
#[inline(always)]
pub fn sort_collidable_references_for_pair(
    a: CollidableReference,
    b: CollidableReference,
) -> (
    CollidableMobility,
    CollidableMobility,
    CollidableReference,
    CollidableReference,
) {
    let a_mobility = a.mobility();
    let b_mobility = b.mobility();
    if (a_mobility != CollidableMobility::Static
        && b_mobility != CollidableMobility::Static
        && a.body_handle().0 > b.body_handle().0)
        || a_mobility == CollidableMobility::Static
    {
        (b_mobility, a_mobility, b, a)
    } else {
        (a_mobility, b_mobility, a, b)
    }
}
