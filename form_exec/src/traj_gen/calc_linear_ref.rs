//! Linear-reference trajectory calculations

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

    /// Perform the linear-reference trajectory calculations.
    ///
    /// The desired state is the scene-level reference state displaced by the
    /// robot's fixed polar offset (rho0, theta0), rotated with the reference
    /// heading. The desired velocity combines the reference translational
    /// speed and its rotational rate.
    ///
    /// When the desired speed magnitude is below the heading-hold threshold
    /// the previous heading is retained: at near-zero speed the direction of
    /// travel is ill-defined and must not be recomputed.
    pub(crate) fn calc_linear_ref(
        &self,
        input: &InputData,
        report: &mut StatusReport,
    ) -> Result<KinState, TrajGenError> {
        let rs = input.ref_signal.ok_or(TrajGenError::NoReferenceSignal)?;

        let (rho0_m, theta0_rad) = to_polar(input.anchor.x_m, input.anchor.y_m);

        let mut desired = input.prev;

        desired.x_m = rs.x_m + rho0_m * (rs.theta_rad + theta0_rad).cos();
        desired.y_m = rs.y_m + rho0_m * (rs.theta_rad + theta0_rad).sin();

        desired.vx_ms = rs.s_dot_ms * rs.theta_rad.cos()
            - rho0_m * rs.theta_dot_rads * (rs.theta_rad + theta0_rad).sin();
        desired.vy_ms = rs.s_dot_ms * rs.theta_rad.sin()
            + rho0_m * rs.theta_dot_rads * (rs.theta_rad + theta0_rad).cos();

        let speed_ms = (desired.vx_ms.powi(2) + desired.vy_ms.powi(2)).sqrt();
        if speed_ms > self.params.heading_hold_speed_ms {
            desired.theta_rad = desired.vy_ms.atan2(desired.vx_ms);
        }
        else {
            report.heading_held = true;
        }

        let c_m = input.axle_m / 2.0;
        desired.vxp_ms = desired.vx_ms - c_m * desired.theta_rad.sin() * rs.theta_dot_rads;
        desired.vyp_ms = desired.vy_ms + c_m * desired.theta_rad.cos() * rs.theta_dot_rads;

        Ok(desired)
    }
}
