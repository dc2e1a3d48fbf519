use crate::physics::collidables::collidable_reference::CollidableReference;
use crate::physics::collision_detection::contact_manifold::{
    ContactManifold, MAXIMUM_MANIFOLD_CONTACT_COUNT,
};

/// Number of feature ids remembered per pair. Matches the widest manifold the narrow phase can produce;
/// widening the manifolds widens this storage with them.
pub const FEATURE_ID_CAPACITY: usize = MAXIMUM_MANIFOLD_CONTACT_COUNT;

// Contact matching tracks surviving feature ids in a u32 bitmask.
const _: () = {
    assert!(FEATURE_ID_CAPACITY <= 32);
};

/// What a listener remembers about one opposing collidable between frames.
///
/// No positions, normals, or depths are kept; feature ids are enough to tell whether a contact in
/// the current frame maps onto a contact from the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviousCollision {
    /// The other collidable in the pair.
    pub collidable: CollidableReference,
    /// Whether the pair was updated (or exempted from needing an update) since the last flush.
    pub fresh: bool,
    /// Whether the last known manifold had any contact with nonnegative depth.
    pub was_touching: bool,
    pub contact_count: i32,
    /// Identifiers of the features that produced the last known contacts. Only the first
    /// `contact_count` are meaningful and their order carries no information.
    pub feature_ids: [i32; FEATURE_ID_CAPACITY],
}

impl PreviousCollision {
    #[inline(always)]
    pub fn new(collidable: CollidableReference) -> Self {
        Self {
            collidable,
            ..Self::default()
        }
    }

    /// Gets the feature ids of the last known contacts.
    #[inline(always)]
    pub fn feature_ids(&self) -> &[i32] {
        &self.feature_ids[..self.contact_count as usize]
    }

    /// Gets the slot holding a feature id, if the id was present in the last known contacts.
    #[inline(always)]
    pub fn find_feature_id(&self, feature_id: i32) -> Option<usize> {
        self.feature_ids().iter().position(|&id| id == feature_id)
    }

    /// Overwrites the remembered state with the given manifold and marks the pair fresh.
    #[inline(always)]
    pub fn update<M: ContactManifold + ?Sized>(&mut self, manifold: &M, is_touching: bool) {
        let count = manifold.count();
        debug_assert!(
            count as usize <= FEATURE_ID_CAPACITY,
            "Manifolds are assumed to hold at most FEATURE_ID_CAPACITY contacts; widen the feature id storage if the narrow phase changed."
        );
        for contact_index in 0..count {
            self.feature_ids[contact_index as usize] = manifold.get_feature_id(contact_index);
        }
        self.contact_count = count;
        self.fresh = true;
        self.was_touching = is_touching;
    }
}

/// New pair discovered by a worker, held until the flush merges it into its listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingWorkerAdd {
    pub listener_index: i32,
    pub collision: PreviousCollision,
}
