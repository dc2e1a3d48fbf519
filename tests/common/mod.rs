#![allow(dead_code)]

use bepu_contact_events::{
    Bodies, BodyStates, CollidableMobility, CollidablePair, CollidableReference,
    ContactEventHandler, ContactEvents, ContactManifold, ConvexContact, ConvexContactManifold,
};
use glam::Vec3;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    PairCreated,
    PairUpdated,
    PairEnded,
    ContactAdded { feature_id: i32, depth: f32 },
    ContactRemoved { feature_id: i32 },
    StartedTouching,
    Touching,
    StoppedTouching,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub source: CollidableReference,
    pub pair: CollidablePair,
    pub kind: EventKind,
    pub worker_index: usize,
}

/// Handler that records every event it receives.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn record(&self, source: CollidableReference, pair: CollidablePair, kind: EventKind, worker_index: usize) {
        self.events.lock().unwrap().push(Event {
            source,
            pair,
            kind,
            worker_index,
        });
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Removes everything recorded so far and returns only the event kinds.
    pub fn drain_kinds(&self) -> Vec<EventKind> {
        self.drain().into_iter().map(|event| event.kind).collect()
    }
}

impl ContactEventHandler for Recorder {
    fn on_contact_added(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        _contact_offset: Vec3,
        _contact_normal: Vec3,
        depth: f32,
        feature_id: i32,
        _contact_index: i32,
        worker_index: usize,
    ) {
        self.record(
            event_source,
            pair,
            EventKind::ContactAdded { feature_id, depth },
            worker_index,
        );
    }

    fn on_contact_removed(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        removed_feature_id: i32,
        worker_index: usize,
    ) {
        self.record(
            event_source,
            pair,
            EventKind::ContactRemoved {
                feature_id: removed_feature_id,
            },
            worker_index,
        );
    }

    fn on_started_touching(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        worker_index: usize,
    ) {
        self.record(event_source, pair, EventKind::StartedTouching, worker_index);
    }

    fn on_touching(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        worker_index: usize,
    ) {
        self.record(event_source, pair, EventKind::Touching, worker_index);
    }

    fn on_stopped_touching(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        worker_index: usize,
    ) {
        self.record(event_source, pair, EventKind::StoppedTouching, worker_index);
    }

    fn on_pair_created(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        worker_index: usize,
    ) {
        self.record(event_source, pair, EventKind::PairCreated, worker_index);
    }

    fn on_pair_updated(
        &self,
        event_source: CollidableReference,
        pair: CollidablePair,
        _contact_manifold: &dyn ContactManifold,
        worker_index: usize,
    ) {
        self.record(event_source, pair, EventKind::PairUpdated, worker_index);
    }

    fn on_pair_ended(&self, event_source: CollidableReference, pair: CollidablePair) {
        self.record(event_source, pair, EventKind::PairEnded, 0);
    }
}

/// Adds an awake body and returns its collidable.
pub fn add_body(bodies: &mut Bodies, mobility: CollidableMobility) -> CollidableReference {
    let handle = bodies.add(mobility);
    bodies.collidable_reference(handle)
}

/// Builds a convex manifold from `(feature_id, depth)` pairs.
pub fn manifold(contacts: &[(i32, f32)]) -> ConvexContactManifold {
    let mut manifold = ConvexContactManifold::new(Vec3::ZERO, Vec3::Y);
    for &(feature_id, depth) in contacts {
        manifold.add(ConvexContact {
            offset: Vec3::new(feature_id as f32, 0.0, 0.0),
            depth,
            feature_id,
        });
    }
    manifold
}

/// Runs one single-threaded step: freshness scan, the given manifolds, flush.
pub fn step(events: &mut ContactEvents, bodies: &Bodies, manifolds: &[(CollidablePair, ConvexContactManifold)]) {
    events.set_freshness_for_current_activity_status(bodies);
    for (pair, manifold) in manifolds {
        events.handle_manifold_exclusive(0, *pair, manifold);
    }
    events.flush();
}

pub fn count(events: &[EventKind], kind: EventKind) -> usize {
    events.iter().filter(|&&event| event == kind).count()
}

pub fn count_matching(events: &[EventKind], predicate: impl Fn(&EventKind) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}
