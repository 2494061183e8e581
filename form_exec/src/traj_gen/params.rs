//! Parameters structure for TrajGen

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory generation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Params {
    /// Radius of the circular desired trajectory.
    ///
    /// Units: meters
    pub circ_radius_m: f64,

    /// Angular rate of the circular desired trajectory.
    ///
    /// Units: radians/second
    pub circ_rate_rads: f64,

    /// Desired speed magnitude below which the desired heading is held at
    /// its previous value. At near-zero speed the heading direction is
    /// ill-defined, so the previous heading is retained by policy.
    ///
    /// Units: meters/second
    pub heading_hold_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Params {
            circ_radius_m: 2.0,
            circ_rate_rads: 0.2,
            heading_hold_speed_ms: 1.0e-3,
        }
    }
}
