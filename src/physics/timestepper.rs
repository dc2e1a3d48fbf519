use crate::physics::bodies::BodyStates;

/// Callback invoked at a fixed point of a timestep, given the step's duration.
pub type TimestepperStageHandler = Box<dyn FnMut(f32) + Send>;

/// Systems that need to run at the collision detection boundaries of every step.
pub trait TimestepperStages {
    /// Runs after body activity is settled for the step and before any manifold is generated.
    fn before_collision_detection(&mut self, dt: f32, bodies: &dyn BodyStates);

    /// Runs once every manifold of the step has been reported.
    fn collisions_detected(&mut self, dt: f32);
}

/// Defines a type capable of updating the simulation state for a given elapsed time.
pub trait Timestepper {
    /// Performs one timestep of the given length.
    ///
    /// `collision_detection` stands in for the narrow phase; it receives shared access to the
    /// stages so it can report manifolds, possibly from many threads.
    fn timestep<S, F>(&mut self, stages: &mut S, bodies: &dyn BodyStates, dt: f32, collision_detection: F)
    where
        S: TimestepperStages + Sync,
        F: FnOnce(&S, f32);
}
