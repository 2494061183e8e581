//! Implementations for the TrajGen state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{Params, TrajGenError};
use crate::kin::KinState;
use crate::robot::DynamicsMode;
use crate::scene::RefSignal;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory generation module state
#[derive(Default)]
pub struct TrajGen {
    pub(crate) params: Params,
}

/// Input data to trajectory generation.
#[derive(Clone, Copy)]
pub struct InputData {
    /// The robot's dynamics mode.
    pub mode: DynamicsMode,

    /// Global simulation time.
    ///
    /// Units: seconds
    pub t_s: f64,

    /// The robot's axle length, fixing the feedback-linearisation offset.
    ///
    /// Units: meters
    pub axle_m: f64,

    /// The robot's anchor (initial desired) state.
    pub anchor: KinState,

    /// The desired state produced on the previous cycle.
    pub prev: KinState,

    /// Scene-level reference signal, required by the linear-reference mode.
    pub ref_signal: Option<RefSignal>,
}

/// Output of trajectory generation.
#[derive(Clone, Copy, Debug)]
pub struct OutputData {
    /// The desired state for the current cycle.
    pub desired: KinState,
}

/// Status report for TrajGen processing.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusReport {
    /// True if the desired heading was held at its previous value because
    /// the desired speed was below the heading-hold threshold.
    pub heading_held: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrajGen {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = TrajGenError;

    /// Initialise the TrajGen module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Generate the desired state for the current cycle.
    ///
    /// The open-loop test-signal modes have no desired trajectory, for them
    /// the previous desired state is passed through unchanged.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut report = StatusReport::default();

        let desired = match input_data.mode {
            DynamicsMode::FixedPoint => self.calc_fixed_point(input_data),
            DynamicsMode::Circular => self.calc_circular(input_data),
            DynamicsMode::LinearRef => self.calc_linear_ref(input_data, &mut report)?,
            DynamicsMode::Step
            | DynamicsMode::StepSequence
            | DynamicsMode::SineWave => input_data.prev,
        };

        Ok((OutputData { desired }, report))
    }
}

impl TrajGen {
    /// Build a TrajGen with explicit parameters, bypassing the parameter
    /// file. Useful for embedding and tests.
    pub fn with_params(params: Params) -> Self {
        TrajGen { params }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use util::module::State as _;

    const PI: f64 = std::f64::consts::PI;

    fn input(mode: DynamicsMode, t_s: f64) -> InputData {
        InputData {
            mode,
            t_s,
            axle_m: 0.331,
            anchor: KinState::new(3.0, 0.0, PI / 4.0),
            prev: KinState::default(),
            ref_signal: None,
        }
    }

    #[test]
    fn test_fixed_point_velocities_are_zero() {
        let mut tg = TrajGen::default();

        for &t_s in &[0.0, 0.5, 17.3, 1.0e4] {
            let (out, _) = tg.proc(&input(DynamicsMode::FixedPoint, t_s)).unwrap();

            assert_eq!(out.desired.x_m, 3.0);
            assert_eq!(out.desired.y_m, 0.0);
            assert_eq!(out.desired.vx_ms, 0.0);
            assert_eq!(out.desired.vy_ms, 0.0);
            assert_eq!(out.desired.vxp_ms, 0.0);
            assert_eq!(out.desired.vyp_ms, 0.0);
        }
    }

    #[test]
    fn test_circular_velocity_is_tangent() {
        let mut tg = TrajGen::default();

        // The desired velocity must match the numerical derivative of the
        // desired position
        let dt = 1.0e-6;
        let (out_a, _) = tg.proc(&input(DynamicsMode::Circular, 2.0)).unwrap();
        let (out_b, _) = tg.proc(&input(DynamicsMode::Circular, 2.0 + dt)).unwrap();

        let vx_num = (out_b.desired.x_m - out_a.desired.x_m) / dt;
        let vy_num = (out_b.desired.y_m - out_a.desired.y_m) / dt;

        assert!((vx_num - out_a.desired.vx_ms).abs() < 1.0e-4);
        assert!((vy_num - out_a.desired.vy_ms).abs() < 1.0e-4);

        // Heading points along the velocity
        let head = out_a.desired.vy_ms.atan2(out_a.desired.vx_ms);
        assert_eq!(out_a.desired.theta_rad, head);
    }

    #[test]
    fn test_linear_ref_without_signal_is_an_error() {
        let mut tg = TrajGen::default();

        assert!(matches!(
            tg.proc(&input(DynamicsMode::LinearRef, 0.0)),
            Err(TrajGenError::NoReferenceSignal)
        ));
    }

    #[test]
    fn test_linear_ref_heading_hold() {
        let mut tg = TrajGen::default();

        let mut inp = input(DynamicsMode::LinearRef, 1.0);
        inp.prev.theta_rad = 0.321;
        inp.ref_signal = Some(RefSignal {
            x_m: 1.0,
            y_m: 2.0,
            theta_rad: 0.0,
            s_dot_ms: 0.0,
            theta_dot_rads: 0.0,
        });

        // Zero reference speed: heading must be retained from the previous
        // desired state
        let (out, report) = tg.proc(&inp).unwrap();
        assert_eq!(out.desired.theta_rad, 0.321);
        assert!(report.heading_held);

        // Nonzero reference speed: heading follows the velocity direction
        inp.ref_signal = Some(RefSignal {
            x_m: 1.0,
            y_m: 2.0,
            theta_rad: PI / 2.0,
            s_dot_ms: 0.3,
            theta_dot_rads: 0.0,
        });
        let (out, report) = tg.proc(&inp).unwrap();
        assert!((out.desired.theta_rad - PI / 2.0).abs() < 1.0e-9);
        assert!(!report.heading_held);
    }

    #[test]
    fn test_open_loop_modes_pass_the_reference_through() {
        let mut tg = TrajGen::default();

        let mut inp = input(DynamicsMode::Step, 3.0);
        inp.prev = KinState::new(-1.0, 4.0, 0.2);

        let (out, _) = tg.proc(&inp).unwrap();
        assert_eq!(out.desired.x_m, -1.0);
        assert_eq!(out.desired.y_m, 4.0);
    }
}
