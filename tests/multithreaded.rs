mod common;

use bepu_contact_events::physics::collision_detection::narrow_phase_callbacks::{
    ContactEventCallbacks, NarrowPhaseCallbacks,
};
use bepu_contact_events::physics::default_timestepper::DefaultTimestepper;
use bepu_contact_events::physics::timestepper::Timestepper;
use bepu_contact_events::utilities::{ScopedThreadDispatcher, ThreadDispatcher};
use bepu_contact_events::{
    Bodies, CollidableMobility, CollidablePair, CollidableReference, ContactEvents,
    ContactEventsConfig, StaticHandle,
};
use common::{add_body, count, manifold, EventKind, Recorder};
use std::collections::HashSet;
use std::sync::Arc;

const WORKER_COUNT: usize = 4;
const BODY_COUNT: usize = 64;

struct Scene {
    bodies: Bodies,
    body_refs: Vec<CollidableReference>,
    ground: CollidableReference,
    recorder: Arc<Recorder>,
    events: ContactEvents,
    dispatcher: ScopedThreadDispatcher,
}

impl Scene {
    fn new() -> Self {
        let dispatcher = ScopedThreadDispatcher::new(WORKER_COUNT);
        let mut events = ContactEvents::new(ContactEventsConfig::for_dispatcher(&dispatcher)).unwrap();
        let mut bodies = Bodies::new();
        let body_refs: Vec<_> = (0..BODY_COUNT)
            .map(|_| add_body(&mut bodies, CollidableMobility::Dynamic))
            .collect();
        let ground = CollidableReference::from_static(StaticHandle(0));
        let recorder = Arc::new(Recorder::default());
        events.register(ground, recorder.clone());
        for &body in &body_refs {
            events.register(body, recorder.clone());
        }
        Self {
            bodies,
            body_refs,
            ground,
            recorder,
            events,
            dispatcher,
        }
    }

    /// Steps the scene with every body whose index passes `touching` resting on the ground.
    /// Each worker handles an interleaved slice of the bodies.
    fn step(
        &mut self,
        touching: impl Fn(usize) -> bool + Sync,
        check_before_flush: impl FnOnce(&ContactEvents),
    ) {
        let bodies = &self.bodies;
        let body_refs = &self.body_refs;
        let ground = self.ground;
        let dispatcher = &self.dispatcher;
        let mut timestepper = DefaultTimestepper::default();
        timestepper.timestep(&mut self.events, bodies, 1.0 / 60.0, |events, _dt| {
            let callbacks = unsafe { ContactEventCallbacks::new(events) };
            dispatcher.dispatch_workers(
                &|worker_index| {
                    for body_index in (worker_index..BODY_COUNT).step_by(WORKER_COUNT) {
                        if !touching(body_index) {
                            continue;
                        }
                        let pair = CollidablePair::sorted(body_refs[body_index], ground);
                        let mut margin = 0.1;
                        if !callbacks.allow_contact_generation(worker_index, pair.a, pair.b, &mut margin) {
                            continue;
                        }
                        let mut contacts = manifold(&[(body_index as i32, 0.05)]);
                        assert!(callbacks.configure_contact_manifold(worker_index, pair, &mut contacts));
                    }
                },
                usize::MAX,
            );
            check_before_flush(events);
        });
    }
}

#[test]
fn workers_discover_pairs_concurrently() {
    let mut scene = Scene::new();
    let ground = scene.ground;
    scene.step(
        |_| true,
        |events| {
            // Nothing is visible in the store until the flush merges the worker buffers.
            assert_eq!(events.tracked_pair_count(ground), 0);
            assert_eq!(events.pending_add_count(), 2 * BODY_COUNT);
        },
    );
    let created = scene.recorder.drain();
    assert_eq!(
        created
            .iter()
            .filter(|event| event.kind == EventKind::PairCreated)
            .count(),
        2 * BODY_COUNT
    );
    let workers: HashSet<_> = created.iter().map(|event| event.worker_index).collect();
    assert_eq!(workers.len(), WORKER_COUNT);
    assert_eq!(scene.events.tracked_pair_count(ground), BODY_COUNT);
    for &body in &scene.body_refs {
        assert!(scene.events.is_tracking(body, ground));
        assert!(scene.events.is_tracking(ground, body));
    }
    assert_eq!(scene.events.pending_add_count(), 0);
}

#[test]
fn concurrent_updates_and_ends() {
    let mut scene = Scene::new();
    let ground = scene.ground;
    scene.step(|_| true, |_| {});
    scene.recorder.drain();

    scene.step(|_| true, |events| assert_eq!(events.pending_add_count(), 0));
    let kinds = scene.recorder.drain_kinds();
    assert_eq!(count(&kinds, EventKind::PairCreated), 0);
    assert_eq!(count(&kinds, EventKind::Touching), 2 * BODY_COUNT);
    assert_eq!(count(&kinds, EventKind::PairUpdated), 2 * BODY_COUNT);

    // Odd bodies lift off the ground.
    scene.step(|body_index| body_index % 2 == 0, |_| {});
    let ended: Vec<_> = scene
        .recorder
        .drain()
        .into_iter()
        .filter(|event| event.kind == EventKind::PairEnded)
        .collect();
    assert_eq!(ended.len(), BODY_COUNT);
    assert_eq!(scene.events.tracked_pair_count(ground), BODY_COUNT / 2);
    for (body_index, &body) in scene.body_refs.iter().enumerate() {
        assert_eq!(scene.events.is_tracking(ground, body), body_index % 2 == 0);
    }
}

#[test]
fn raw_threads_share_one_listener() {
    let mut bodies = Bodies::new();
    let a = add_body(&mut bodies, CollidableMobility::Dynamic);
    let others: Vec<_> = (0..8)
        .map(|_| add_body(&mut bodies, CollidableMobility::Kinematic))
        .collect();
    let recorder = Arc::new(Recorder::default());
    let mut events = ContactEvents::new(ContactEventsConfig::default().with_worker_count(2)).unwrap();
    events.register(a, recorder.clone());

    events.set_freshness_for_current_activity_status(&bodies);
    {
        let events = &events;
        let others = &others;
        crossbeam_utils::thread::scope(|scope| {
            for worker_index in 0..2 {
                scope.spawn(move |_| {
                    for other in others.iter().skip(worker_index).step_by(2) {
                        let contacts = manifold(&[(1, 0.1)]);
                        // Each worker reports a disjoint set of pairs under its own index.
                        let pair = CollidablePair::sorted(a, *other);
                        unsafe { events.handle_manifold(worker_index, pair, &contacts) };
                    }
                });
            }
        })
        .unwrap();
    }
    events.flush();
    assert_eq!(events.tracked_pair_count(a), others.len());
    assert_eq!(count(&recorder.drain_kinds(), EventKind::PairCreated), others.len());
}
