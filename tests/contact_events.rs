mod common;

use bepu_contact_events::{
    Bodies, BodyStates, CollidableMobility, CollidablePair, CollidableReference, ContactEvents,
    ContactEventsConfig, ContactEventsError, StaticHandle,
};
use common::{add_body, count, count_matching, manifold, step, EventKind, Recorder};
use std::sync::Arc;

fn new_events() -> ContactEvents {
    ContactEvents::new(ContactEventsConfig::default()).unwrap()
}

#[test]
fn three_step_body_against_static() {
    let mut bodies = Bodies::new();
    let body_handle = bodies.add(CollidableMobility::Dynamic);
    let body = bodies.collidable_reference(body_handle);
    let ground = CollidableReference::from_static(StaticHandle(0));
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register_body(body_handle, &bodies, recorder.clone());
    let pair = CollidablePair::sorted(body, ground);
    let contacts = manifold(&[(10, 0.1), (11, -0.05)]);

    step(&mut events, &bodies, &[(pair, contacts)]);
    assert_eq!(
        recorder.drain_kinds(),
        [
            EventKind::PairCreated,
            EventKind::ContactAdded {
                feature_id: 10,
                depth: 0.1
            },
            EventKind::ContactAdded {
                feature_id: 11,
                depth: -0.05
            },
            EventKind::StartedTouching,
            EventKind::Touching,
            EventKind::PairUpdated,
        ]
    );

    step(&mut events, &bodies, &[(pair, contacts)]);
    assert_eq!(recorder.drain_kinds(), [EventKind::Touching, EventKind::PairUpdated]);

    step(&mut events, &bodies, &[]);
    let ended = recorder.drain();
    assert_eq!(
        ended.iter().map(|event| event.kind).collect::<Vec<_>>(),
        [
            EventKind::ContactRemoved { feature_id: 10 },
            EventKind::ContactRemoved { feature_id: 11 },
            EventKind::StoppedTouching,
            EventKind::PairEnded,
        ]
    );
    for event in &ended {
        assert_eq!(event.source, body);
        assert_eq!(event.pair, pair);
        assert_eq!(event.worker_index, 0);
    }
    assert_eq!(events.tracked_pair_count(body), 0);
}

#[test]
fn continuing_contact_never_ends() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Dynamic);
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());
    events.register(b, recorder.clone());
    let pair = CollidablePair::sorted(a, b);

    for _ in 0..10 {
        step(&mut events, &bodies, &[(pair, manifold(&[(4, 0.02)]))]);
    }
    let kinds = recorder.drain_kinds();
    assert_eq!(count(&kinds, EventKind::PairEnded), 0);
    assert_eq!(count(&kinds, EventKind::StoppedTouching), 0);
    // Both sides listen, so each sees the pair created once and touching every step.
    assert_eq!(count(&kinds, EventKind::PairCreated), 2);
    assert_eq!(count(&kinds, EventKind::Touching), 20);
    assert!(events.is_tracking(a, b));
    assert!(events.is_tracking(b, a));
}

#[test]
fn sleeping_pairs_are_not_ended() {
    let mut bodies = Bodies::new();
    let a_handle = bodies.add(CollidableMobility::Dynamic);
    let b_handle = bodies.add(CollidableMobility::Dynamic);
    let a = bodies.collidable_reference(a_handle);
    let b = bodies.collidable_reference(b_handle);
    let ground = CollidableReference::from_static(StaticHandle(3));
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());
    events.register(b, recorder.clone());
    events.register(ground, recorder.clone());
    let bodies_pair = CollidablePair::sorted(a, b);
    let ground_pair = CollidablePair::sorted(b, ground);

    step(
        &mut events,
        &bodies,
        &[
            (bodies_pair, manifold(&[(1, 0.01)])),
            (ground_pair, manifold(&[(2, 0.01)])),
        ],
    );
    recorder.drain();

    // The island falls asleep; the narrow phase stops reporting its pairs.
    bodies.sleep(a_handle, 1);
    bodies.sleep(b_handle, 1);
    for _ in 0..5 {
        step(&mut events, &bodies, &[]);
    }
    assert!(recorder.drain().is_empty());
    assert!(events.is_tracking(a, b));
    assert!(events.is_tracking(b, a));
    assert!(events.is_tracking(b, ground));
    assert!(events.is_tracking(ground, b));

    // Once awake, pairs that stop being reported end normally.
    bodies.awaken(a_handle);
    bodies.awaken(b_handle);
    step(&mut events, &bodies, &[(ground_pair, manifold(&[(2, 0.01)]))]);
    let kinds = recorder.drain_kinds();
    assert_eq!(count(&kinds, EventKind::PairEnded), 2);
    assert!(!events.is_tracking(a, b));
    assert!(events.is_tracking(ground, b));
}

#[test]
fn vanished_pair_ends_exactly_once() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Kinematic);
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());
    let pair = CollidablePair::sorted(a, b);

    step(&mut events, &bodies, &[(pair, manifold(&[(1, 0.3), (2, 0.1), (3, -0.1)]))]);
    recorder.drain();

    step(&mut events, &bodies, &[]);
    let kinds = recorder.drain_kinds();
    assert_eq!(
        count_matching(&kinds, |kind| matches!(kind, EventKind::ContactRemoved { .. })),
        3
    );
    for feature_id in 1..=3 {
        assert_eq!(count(&kinds, EventKind::ContactRemoved { feature_id }), 1);
    }
    assert_eq!(count(&kinds, EventKind::StoppedTouching), 1);
    assert_eq!(count(&kinds, EventKind::PairEnded), 1);
    assert_eq!(kinds.last(), Some(&EventKind::PairEnded));

    for _ in 0..3 {
        step(&mut events, &bodies, &[]);
    }
    assert!(recorder.drain().is_empty());
}

#[test]
fn separated_pair_ends_without_stopping() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Dynamic);
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());
    let pair = CollidablePair::sorted(a, b);

    // Speculative contacts only, then a manifold with no contacts at all.
    step(&mut events, &bodies, &[(pair, manifold(&[(1, -0.2)]))]);
    step(&mut events, &bodies, &[(pair, manifold(&[]))]);
    recorder.drain();
    step(&mut events, &bodies, &[]);
    assert_eq!(recorder.drain_kinds(), [EventKind::PairEnded]);
}

#[test]
fn feature_ids_are_diffed() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let ground = CollidableReference::from_static(StaticHandle(0));
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());
    let pair = CollidablePair::sorted(a, ground);

    step(&mut events, &bodies, &[(pair, manifold(&[(1, 0.1), (2, 0.1)]))]);
    recorder.drain();
    step(&mut events, &bodies, &[(pair, manifold(&[(2, 0.1), (3, 0.1)]))]);
    assert_eq!(
        recorder.drain_kinds(),
        [
            EventKind::ContactAdded {
                feature_id: 3,
                depth: 0.1
            },
            EventKind::ContactRemoved { feature_id: 1 },
            EventKind::Touching,
            EventKind::PairUpdated,
        ]
    );
    assert_eq!(events.previous_collision(a, ground).unwrap().feature_ids(), &[2, 3]);
}

#[test]
fn repeated_flushes_do_not_end_pairs_twice() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Dynamic);
    let c = add_body(&mut bodies, CollidableMobility::Dynamic);
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());

    step(
        &mut events,
        &bodies,
        &[
            (CollidablePair::sorted(a, b), manifold(&[(1, 0.1)])),
            (CollidablePair::sorted(a, c), manifold(&[(1, 0.1)])),
        ],
    );
    events.flush();
    events.flush();
    assert_eq!(events.tracked_pair_count(a), 2);

    // Only b keeps touching; c ends once no matter how many flushes follow.
    step(&mut events, &bodies, &[(CollidablePair::sorted(a, b), manifold(&[(1, 0.1)]))]);
    events.flush();
    events.flush();
    let ended: Vec<_> = recorder
        .drain()
        .into_iter()
        .filter(|event| event.kind == EventKind::PairEnded)
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].pair, CollidablePair::sorted(a, c));
    assert!(events.is_tracking(a, b));
}

#[test]
fn new_pairs_only_appear_after_flush() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Dynamic);
    let recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, recorder.clone());

    events.set_freshness_for_current_activity_status(&bodies);
    events.handle_manifold_exclusive(0, CollidablePair::sorted(a, b), &manifold(&[(5, 0.1)]));
    assert!(events.is_listener(a));
    assert!(!events.is_tracking(a, b));
    assert_eq!(events.previous_collision(a, b), None);
    assert_eq!(events.tracked_pair_count(a), 0);
    assert_eq!(events.pending_add_count(), 1);

    events.flush();
    assert!(events.is_tracking(a, b));
    assert_eq!(events.tracked_pair_count(a), 1);
    assert_eq!(events.pending_add_count(), 0);
}

#[test]
fn unregistered_listener_stops_receiving_events() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let b = add_body(&mut bodies, CollidableMobility::Dynamic);
    let a_recorder = Arc::new(Recorder::default());
    let b_recorder = Arc::new(Recorder::default());
    let mut events = new_events();
    events.register(a, a_recorder.clone());
    events.register(b, b_recorder.clone());
    let pair = CollidablePair::sorted(a, b);

    step(&mut events, &bodies, &[(pair, manifold(&[(1, 0.1)]))]);
    a_recorder.drain();
    b_recorder.drain();

    events.unregister(a);
    assert_eq!(events.try_unregister(a), Err(ContactEventsError::NotRegistered(a)));
    step(&mut events, &bodies, &[(pair, manifold(&[(1, 0.1)]))]);
    assert!(a_recorder.drain().is_empty());
    // b moved into a's old listener slot and must still be found.
    assert_eq!(b_recorder.drain_kinds(), [EventKind::Touching, EventKind::PairUpdated]);
    assert!(events.is_tracking(b, a));

    // Registering again starts from scratch.
    events.register(a, a_recorder.clone());
    step(&mut events, &bodies, &[(pair, manifold(&[(1, 0.1)]))]);
    assert_eq!(count(&a_recorder.drain_kinds(), EventKind::PairCreated), 1);
}
