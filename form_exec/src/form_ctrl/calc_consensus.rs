//! Consensus control law calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::robot::Role;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Design constant of the feedback-linearisation inversion matrix.
const KK: f64 = 1.0;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FormCtrl {

    /// Perform the feedback-linearisation consensus calculations.
    ///
    /// Works entirely in the transformed (primed) coordinates. Three
    /// contributions per axis:
    ///
    /// - consensus: drive the relative position error towards the relative
    ///   desired offset for every neighbour (maintains the formation shape),
    /// - self tracking: drive towards the own absolute desired position,
    ///   active only for a leader (K1 = 1). A follower has K1 = 0 because
    ///   absolute reference position information is withheld from it,
    /// - feedforward of the desired transformed velocity (K2 = 1 for both
    ///   roles).
    ///
    /// The transformed velocity demand is then inverted into wheel speeds
    /// through the heading-parameterised matrix M.
    pub(crate) fn calc_consensus(&self, input: &InputData) -> [f64; 2] {
        let (k1, k2) = match input.role {
            Some(Role::Leader) => (1.0, 1.0),
            _ => (0.0, 1.0),
        };
        let k4 = self.params.k4;

        let xi = &input.self_actual;
        let xid = &input.self_desired;

        // Velocity demand in the transformed space
        let mut vxp_ms = 0.0;
        let mut vyp_ms = 0.0;

        for (nbr, nbr_desired) in input.neighbours.iter() {
            vxp_ms += -k4 * ((xi.xp_m - nbr.xp_m) - (xid.xp_m - nbr_desired.xp_m));
            vyp_ms += -k4 * ((xi.yp_m - nbr.yp_m) - (xid.yp_m - nbr_desired.yp_m));
        }

        vxp_ms += -k1 * (xi.xp_m - xid.xp_m);
        vyp_ms += -k1 * (xi.yp_m - xid.yp_m);

        vxp_ms += k2 * xid.vxp_ms;
        vyp_ms += k2 * xid.vyp_ms;

        // Invert the kinematics of the offset point: M maps the transformed
        // velocity demand into (left, right) wheel speeds
        let theta_rad = xi.theta_rad;
        let m11 = KK * theta_rad.sin() + theta_rad.cos();
        let m12 = -KK * theta_rad.cos() + theta_rad.sin();
        let m21 = -KK * theta_rad.sin() + theta_rad.cos();
        let m22 = KK * theta_rad.cos() + theta_rad.sin();

        [
            m11 * vxp_ms + m12 * vyp_ms,
            m21 * vxp_ms + m22 * vyp_ms,
        ]
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
