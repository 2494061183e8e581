//! Parameters structure for FormCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Unit expected by the downstream wheel actuator.
///
/// Selected by which actuator interface is active, not by the control law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveUnits {
    /// Linear wheel speed in meters/second (kinematic integration).
    LinearMs,

    /// Angular shaft speed in radians/second (live motor drivers).
    AngularRads,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for formation control.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Params {
    /// Consensus gain applied to every neighbour error term.
    pub k4: f64,

    /// Maximum linear speed of a wheel.
    ///
    /// Units: meters/second
    pub wheel_max_speed_ms: f64,

    /// Enables the acceleration limiting stage.
    pub limit_max_acc: bool,

    /// Maximum wheel acceleration when acceleration limiting is enabled.
    ///
    /// Units: meters/second^2
    pub acc_max_mss: f64,

    /// Radius of the wheels, used to convert linear wheel speed into
    /// angular shaft speed.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,

    /// The unit in which demands are emitted to the actuator.
    pub drive_units: DriveUnits,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Params {
            k4: 1.0,
            wheel_max_speed_ms: 0.5,
            limit_max_acc: false,
            acc_max_mss: 0.5,
            wheel_radius_m: 0.0976,
            drive_units: DriveUnits::LinearMs,
        }
    }
}
