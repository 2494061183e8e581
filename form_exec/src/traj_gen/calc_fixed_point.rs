//! Fixed-point trajectory calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::kin::KinState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajGen {

    /// Perform the fixed-point trajectory calculations.
    ///
    /// The desired state is pinned at the anchor position with all
    /// velocities (plain and transformed) exactly zero. This is the
    /// terminal, steady-state reference.
    pub(crate) fn calc_fixed_point(&self, input: &InputData) -> KinState {
        let mut desired = input.prev;

        desired.x_m = input.anchor.x_m;
        desired.y_m = input.anchor.y_m;
        desired.theta_rad = 0.0;

        desired.vx_ms = 0.0;
        desired.vy_ms = 0.0;
        desired.vxp_ms = 0.0;
        desired.vyp_ms = 0.0;

        desired
    }
}
