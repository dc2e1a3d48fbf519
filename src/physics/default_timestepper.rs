// Updates the simulation in the order of:
// before collision detection stages -> collision detection -> collisions detected stages.

use crate::physics::bodies::BodyStates;
use crate::physics::timestepper::{Timestepper, TimestepperStageHandler, TimestepperStages};

/// Default timestepper that executes:
/// BeforeCollisionDetection -> CollisionDetection -> CollisionsDetected.
#[derive(Default)]
pub struct DefaultTimestepper {
    /// Fires after the registered stages prepared for collision detection and before it runs.
    pub before_collision_detection: Option<TimestepperStageHandler>,
    /// Fires after all collisions have been identified and the registered stages processed them.
    pub collisions_detected: Option<TimestepperStageHandler>,
}

impl Timestepper for DefaultTimestepper {
    fn timestep<S, F>(&mut self, stages: &mut S, bodies: &dyn BodyStates, dt: f32, collision_detection: F)
    where
        S: TimestepperStages + Sync,
        F: FnOnce(&S, f32),
    {
        stages.before_collision_detection(dt, bodies);
        if let Some(handler) = self.before_collision_detection.as_mut() {
            handler(dt);
        }

        collision_detection(stages, dt);

        stages.collisions_detected(dt);
        if let Some(handler) = self.collisions_detected.as_mut() {
            handler(dt);
        }
    }
}
