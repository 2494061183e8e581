//! Equipment interfaces
//!
//! The core does not own the actuator, sensing or perception equipment, it
//! only talks to them through the traits defined here. Concrete
//! implementations (a physics simulator bridge, real motor drivers, a point
//! cloud pipeline) live outside this crate.

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by equipment collaborators.
///
/// These are surfaced by the collaborator and propagated by the core, which
/// never retries or masks them.
#[derive(Debug, thiserror::Error)]
pub enum EqptError {
    #[error("Wheel velocity demand rejected: {0}")]
    DemandRejected(String),

    #[error("Sensor read failed: {0}")]
    SensorReadFailed(String),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The downstream wheel actuator.
pub trait WheelActuator {
    /// Command the left and right wheel velocities.
    ///
    /// The values are already shaped and unit-converted by the formation
    /// controller, see `form_ctrl::DriveUnits` for the unit selection.
    fn set_wheel_velocities(&mut self, left: f64, right: f64) -> Result<(), EqptError>;
}

/// Pose and velocity read-back from the actuator or simulator.
pub trait PoseSensor {
    /// Read the current pose as `[x_m, y_m, theta_rad]`.
    fn read_pose(&mut self) -> Result<[f64; 3], EqptError>;

    /// Read the current velocity as `[vx_ms, vy_ms, turn_rate_rads]`.
    fn read_velocity(&mut self) -> Result<[f64; 3], EqptError>;
}

/// The perception collaborator, consumed only by the learned controller.
pub trait Perception {
    /// Get the current observation vector.
    fn get_observation(&mut self) -> Vec<f64>;
}

/// An opaque learned control policy.
///
/// When attached to a robot this substitutes the analytic control law
/// entirely, the output only passes through actuator shaping.
pub trait LearnedController {
    /// Map an observation to raw `[left, right]` wheel speeds.
    ///
    /// Units: meters/second
    fn compute_cmd(&self, observation: &[f64]) -> [f64; 2];
}
