//! Planar kinematic state of a differential-drive robot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::wrap_to_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planar state of a single robot.
///
/// As well as the pose and velocity this carries the feedback-linearised
/// point, a point offset ahead of the wheel axle by the constant `c` (half
/// the axle length). The velocity of that point is a linear function of the
/// wheel speeds, which is what makes the nonholonomic robot controllable
/// with linear techniques.
///
/// `(xp_m, yp_m)` is only valid after a call to [`KinState::transform`] with
/// an unchanged pose.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct KinState {
    /// Position along the world x axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Position along the world y axis.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Heading, measured from the world x axis.
    ///
    /// Units: radians
    pub theta_rad: f64,

    /// Velocity along the world x axis.
    ///
    /// Units: meters/second
    pub vx_ms: f64,

    /// Velocity along the world y axis.
    ///
    /// Units: meters/second
    pub vy_ms: f64,

    /// Feedback-linearised point, x component.
    ///
    /// Units: meters
    pub xp_m: f64,

    /// Feedback-linearised point, y component.
    ///
    /// Units: meters
    pub yp_m: f64,

    /// Velocity of the feedback-linearised point, x component.
    ///
    /// Units: meters/second
    pub vxp_ms: f64,

    /// Velocity of the feedback-linearised point, y component.
    ///
    /// Units: meters/second
    pub vyp_ms: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised when manipulating a kinematic state.
#[derive(Debug, thiserror::Error)]
pub enum KinError {
    #[error("Expected a pose of 3 elements (x, y, theta), found {0}")]
    BadPoseArity(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl KinState {
    /// Create a new state at the given pose, with zero velocities.
    pub fn new(x_m: f64, y_m: f64, theta_rad: f64) -> Self {
        KinState {
            x_m,
            y_m,
            theta_rad,
            ..KinState::default()
        }
    }

    /// Set the pose from an explicit `[x, y, theta]` slice.
    ///
    /// A slice of any other length is a configuration error.
    pub fn set_pose(&mut self, pose: &[f64]) -> Result<(), KinError> {
        if pose.len() != 3 {
            return Err(KinError::BadPoseArity(pose.len()));
        }

        self.x_m = pose[0];
        self.y_m = pose[1];
        self.theta_rad = pose[2];

        Ok(())
    }

    /// Recompute the feedback-linearised point from the current pose.
    ///
    /// `c_m` is the axle-to-point offset, half the axle length. This must be
    /// called after any pose mutation and before the control law reads the
    /// transformed coordinates. Calling it twice with an unchanged pose
    /// yields an identical point.
    pub fn transform(&mut self, c_m: f64) {
        self.xp_m = self.x_m + c_m * self.theta_rad.cos();
        self.yp_m = self.y_m + c_m * self.theta_rad.sin();
    }

    /// Advance the pose one step under the given wheel speeds.
    ///
    /// `wheel_speeds_ms` are the linear speeds of the left and right wheels,
    /// `axle_m` the distance between them. This is the unicycle kinematic
    /// update and is a pure function of the current state and the command.
    pub fn integrate(&mut self, wheel_speeds_ms: [f64; 2], axle_m: f64, dt_s: f64) {
        let speed_ms = 0.5 * (wheel_speeds_ms[0] + wheel_speeds_ms[1]);
        let turn_rate_rads = (wheel_speeds_ms[1] - wheel_speeds_ms[0]) / axle_m;

        self.vx_ms = speed_ms * self.theta_rad.cos();
        self.vy_ms = speed_ms * self.theta_rad.sin();

        self.x_m += self.vx_ms * dt_s;
        self.y_m += self.vy_ms * dt_s;
        self.theta_rad = wrap_to_pi(self.theta_rad + turn_rate_rads * dt_s);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
