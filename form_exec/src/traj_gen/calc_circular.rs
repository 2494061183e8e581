//! Circular trajectory calculations (legacy, time-parameterised)

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::kin::KinState;
use util::maths::to_polar;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajGen {

    /// Perform the circular trajectory calculations.
    ///
    /// The desired position follows a circle of the parameterised radius and
    /// angular rate, displaced by the polar offset (rho0, theta0) of the
    /// robot's anchor. The heading points along the desired velocity, and
    /// the transformed desired velocity picks up the rotational feed-through
    /// into the offset point.
    pub(crate) fn calc_circular(&self, input: &InputData) -> KinState {
        let t_s = input.t_s;
        let radius_m = self.params.circ_radius_m;
        let omega_rads = self.params.circ_rate_rads;

        let (rho0_m, theta0_rad) = to_polar(input.anchor.x_m, input.anchor.y_m);

        let mut desired = input.prev;

        desired.x_m = radius_m * (omega_rads * t_s).cos()
            + rho0_m * (omega_rads * t_s + theta0_rad).cos();
        desired.y_m = radius_m * (omega_rads * t_s).sin()
            + rho0_m * (omega_rads * t_s + theta0_rad).sin();

        desired.vx_ms = -(radius_m * omega_rads * (omega_rads * t_s).sin()
            + rho0_m * omega_rads * (omega_rads * t_s + theta0_rad).sin());
        desired.vy_ms = radius_m * omega_rads * (omega_rads * t_s).cos()
            + rho0_m * omega_rads * (omega_rads * t_s + theta0_rad).cos();

        desired.theta_rad = desired.vy_ms.atan2(desired.vx_ms);

        let c_m = input.axle_m / 2.0;
        desired.vxp_ms = desired.vx_ms - c_m * desired.theta_rad.sin() * omega_rads;
        desired.vyp_ms = desired.vy_ms + c_m * desired.theta_rad.cos() * omega_rads;

        desired
    }
}
