use glam::Vec3;

/// Information about a single contact.
/// This type contains a field for the normal; it can be used to represent contacts within nonconvex contact manifolds or convex manifolds.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contact {
    /// Offset from the position of collidable A to the contact position.
    pub offset: Vec3,
    /// Penetration depth between the two collidables at this contact. Negative values represent separation.
    pub depth: f32,
    /// Surface basis of the contact. Points from collidable B to collidable A.
    pub normal: Vec3,
    /// Id of the features involved in the collision that generated this contact.
    pub feature_id: i32,
}

/// Information about a single contact in a convex collidable pair.
/// Convex collidable pairs share one surface basis across the manifold.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvexContact {
    /// Offset from the position of collidable A to the contact position.
    pub offset: Vec3,
    /// Penetration depth between the two collidables at this contact. Negative values represent separation.
    pub depth: f32,
    /// Id of the features involved in the collision that generated this contact.
    pub feature_id: i32,
}

/// Read access to a contact manifold produced by the narrow phase.
///
/// The trait is object safe so event handlers can receive any manifold type as `&dyn ContactManifold`.
pub trait ContactManifold {
    /// Gets the number of contacts in the manifold.
    fn count(&self) -> i32;

    /// Gets whether the contact manifold was created by a pair of convex objects.
    fn convex(&self) -> bool;

    /// Gets the feature id associated with a requested contact.
    fn get_feature_id(&self, contact_index: i32) -> i32;

    /// Gets the depth associated with a requested contact.
    fn get_depth(&self, contact_index: i32) -> f32;

    /// Gets a contact's normal. Points from collidable B to collidable A.
    fn get_normal(&self, contact_index: i32) -> Vec3;

    /// Gets the offset from collidable A to the requested contact.
    fn get_offset(&self, contact_index: i32) -> Vec3;

    /// Gets a copy of a contact's data.
    fn get_contact(&self, contact_index: i32) -> Contact;
}

/// Contact capacity of both manifold types.
pub const MAXIMUM_MANIFOLD_CONTACT_COUNT: usize = 4;

#[inline(always)]
fn validate_index(contact_index: i32, count: i32) {
    debug_assert!(
        contact_index >= 0 && contact_index < count,
        "Contact index must be within the contact count."
    );
}

/// Contains the data associated with a nonconvex contact manifold.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NonconvexContactManifold {
    /// Offset from collidable A to collidable B.
    pub offset_b: Vec3,
    pub count: i32,
    pub contacts: [Contact; MAXIMUM_MANIFOLD_CONTACT_COUNT],
}

impl NonconvexContactManifold {
    /// The maximum number of contacts that can exist within a nonconvex manifold.
    pub const MAXIMUM_CONTACT_COUNT: i32 = MAXIMUM_MANIFOLD_CONTACT_COUNT as i32;

    pub fn new(offset_b: Vec3) -> Self {
        Self {
            offset_b,
            ..Self::default()
        }
    }

    /// Appends a contact to the manifold.
    #[inline(always)]
    pub fn add(&mut self, contact: Contact) {
        debug_assert!(
            self.count < Self::MAXIMUM_CONTACT_COUNT,
            "Nonconvex manifolds hold at most four contacts."
        );
        self.contacts[self.count as usize] = contact;
        self.count += 1;
    }

    /// Quickly removes a contact at the given index by swapping with the last.
    pub fn fast_remove_at(&mut self, index: i32) {
        validate_index(index, self.count);
        self.count -= 1;
        if index < self.count {
            self.contacts[index as usize] = self.contacts[self.count as usize];
        }
    }
}

impl ContactManifold for NonconvexContactManifold {
    #[inline(always)]
    fn count(&self) -> i32 {
        self.count
    }

    #[inline(always)]
    fn convex(&self) -> bool {
        false
    }

    #[inline(always)]
    fn get_feature_id(&self, contact_index: i32) -> i32 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].feature_id
    }

    #[inline(always)]
    fn get_depth(&self, contact_index: i32) -> f32 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].depth
    }

    #[inline(always)]
    fn get_normal(&self, contact_index: i32) -> Vec3 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].normal
    }

    #[inline(always)]
    fn get_offset(&self, contact_index: i32) -> Vec3 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].offset
    }

    #[inline(always)]
    fn get_contact(&self, contact_index: i32) -> Contact {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize]
    }
}

/// Contains the data associated with a convex contact manifold.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexContactManifold {
    /// Offset from collidable A to collidable B.
    pub offset_b: Vec3,
    pub count: i32,
    /// Surface normal shared by all contacts. Points from collidable B to collidable A.
    pub normal: Vec3,
    pub contacts: [ConvexContact; MAXIMUM_MANIFOLD_CONTACT_COUNT],
}

impl ConvexContactManifold {
    /// The maximum number of contacts that can exist within a convex manifold.
    pub const MAXIMUM_CONTACT_COUNT: i32 = MAXIMUM_MANIFOLD_CONTACT_COUNT as i32;

    pub fn new(offset_b: Vec3, normal: Vec3) -> Self {
        Self {
            offset_b,
            normal,
            ..Self::default()
        }
    }

    /// Appends a contact sharing the manifold's normal.
    #[inline(always)]
    pub fn add(&mut self, contact: ConvexContact) {
        debug_assert!(
            self.count < Self::MAXIMUM_CONTACT_COUNT,
            "Convex manifolds hold at most four contacts."
        );
        self.contacts[self.count as usize] = contact;
        self.count += 1;
    }

    /// Quickly removes a contact at the given index by swapping with the last.
    pub fn fast_remove_at(&mut self, index: i32) {
        validate_index(index, self.count);
        self.count -= 1;
        if index < self.count {
            self.contacts[index as usize] = self.contacts[self.count as usize];
        }
    }
}

impl ContactManifold for ConvexContactManifold {
    #[inline(always)]
    fn count(&self) -> i32 {
        self.count
    }

    #[inline(always)]
    fn convex(&self) -> bool {
        true
    }

    #[inline(always)]
    fn get_feature_id(&self, contact_index: i32) -> i32 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].feature_id
    }

    #[inline(always)]
    fn get_depth(&self, contact_index: i32) -> f32 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].depth
    }

    #[inline(always)]
    fn get_normal(&self, _contact_index: i32) -> Vec3 {
        self.normal
    }

    #[inline(always)]
    fn get_offset(&self, contact_index: i32) -> Vec3 {
        validate_index(contact_index, self.count);
        self.contacts[contact_index as usize].offset
    }

    #[inline(always)]
    fn get_contact(&self, contact_index: i32) -> Contact {
        validate_index(contact_index, self.count);
        let contact = &self.contacts[contact_index as usize];
        Contact {
            offset: contact.offset,
            depth: contact.depth,
            normal: self.normal,
            feature_id: contact.feature_id,
        }
    }
}

/// Manifold with no contacts, handed to events that fire without a narrow phase result,
/// like the removals reported when a pair stops being updated.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyManifold;

impl ContactManifold for EmptyManifold {
    #[inline(always)]
    fn count(&self) -> i32 {
        0
    }

    #[inline(always)]
    fn convex(&self) -> bool {
        true
    }

    fn get_feature_id(&self, _contact_index: i32) -> i32 {
        unreachable!("An empty manifold has no contacts.")
    }

    fn get_depth(&self, _contact_index: i32) -> f32 {
        unreachable!("An empty manifold has no contacts.")
    }

    fn get_normal(&self, _contact_index: i32) -> Vec3 {
        unreachable!("An empty manifold has no contacts.")
    }

    fn get_offset(&self, _contact_index: i32) -> Vec3 {
        unreachable!("An empty manifold has no contacts.")
    }

    fn get_contact(&self, _contact_index: i32) -> Contact {
        unreachable!("An empty manifold has no contacts.")
    }
}
