//! Implementations for the FormCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{DriveUnits, FormCtrlError, Params};
use crate::eqpt::LearnedController;
use crate::kin::KinState;
use crate::robot::{DynamicsMode, Role};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Formation control module state
#[derive(Default)]
pub struct FormCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// Baseline wheel speeds of the acceleration limiter. Carries the
    /// previous shaped output between cycles.
    pub(crate) wheel_baseline_ms: [f64; 2],

    /// Optional learned control policy, overriding the analytic law.
    learned: Option<Box<dyn LearnedController>>,
}

/// Input data to formation control.
///
/// All states are snapshots taken at the start of the tick, so the output
/// never depends on whether a sibling robot has already been advanced
/// within the same tick.
#[derive(Clone)]
pub struct InputData {
    /// The robot's dynamics mode.
    pub mode: DynamicsMode,

    /// The robot's formation role.
    pub role: Option<Role>,

    /// Global simulation time.
    ///
    /// Units: seconds
    pub t_s: f64,

    /// Simulation step size.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Amplitude pair for the open-loop test-signal modes.
    pub amplitude: [f64; 2],

    /// The robot's own actual state (transformed coordinates valid).
    pub self_actual: KinState,

    /// The robot's own desired state (transformed coordinates valid).
    pub self_desired: KinState,

    /// Actual and desired state of every neighbour.
    pub neighbours: Vec<(KinState, KinState)>,

    /// Perception observation, present only when a perception source is
    /// attached to the robot.
    pub observation: Option<Vec<f64>>,
}

/// Shaped wheel speed demand emitted to the actuator.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WheelCmd {
    /// Left wheel demand, in the unit given by `units`.
    pub left: f64,

    /// Right wheel demand, in the unit given by `units`.
    pub right: f64,

    /// The unit of the demand.
    pub units: DriveUnits,
}

/// Output of formation control.
#[derive(Clone, Copy, Debug)]
pub struct OutputData {
    /// Shaped linear wheel speeds, used for kinematic integration.
    ///
    /// Units: meters/second
    pub wheel_speeds_ms: [f64; 2],

    /// The demand to pass to the actuator, unit-converted.
    pub demand: WheelCmd,
}

/// Status report for FormCtrl processing.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StatusReport {
    /// True if the ratio-preserving saturation engaged this cycle.
    pub speed_limited: bool,

    /// The common scale factor applied by the saturation stage.
    pub alpha: f64,

    /// Per-wheel flags raised when the acceleration limiter clamped the
    /// demand.
    pub acc_limited: [bool; 2],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        StatusReport {
            speed_limited: false,
            alpha: 1.0,
            acc_limited: [false; 2],
        }
    }
}

impl State for FormCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = FormCtrlError;

    /// Initialise the FormCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Perform cyclic processing of formation control.
    ///
    /// A learned controller, if attached, overrides the analytic law
    /// entirely; only the actuator shaping stage applies to its output.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        let raw_ms = match self.learned {
            Some(ref policy) => {
                let obs = input_data
                    .observation
                    .as_ref()
                    .ok_or(FormCtrlError::NoObservation)?;
                policy.compute_cmd(obs)
            }
            None => {
                if input_data.mode.is_formation() {
                    self.calc_consensus(input_data)
                }
                else {
                    self.calc_test_signal(input_data)
                }
            }
        };

        let output = self.shape(raw_ms, input_data.dt_s);

        trace!(
            "FormCtrl raw: ({:.3}, {:.3}) m/s, shaped: ({:.3}, {:.3}) {:?}",
            raw_ms[0],
            raw_ms[1],
            output.demand.left,
            output.demand.right,
            output.demand.units
        );

        Ok((output, self.report))
    }
}

impl FormCtrl {
    /// Build a FormCtrl with explicit parameters, bypassing the parameter
    /// file. Useful for embedding and tests.
    pub fn with_params(params: Params) -> Self {
        FormCtrl {
            params,
            ..FormCtrl::default()
        }
    }

    /// Attach a learned control policy.
    pub fn set_learned_controller(&mut self, policy: Box<dyn LearnedController>) {
        self.learned = Some(policy);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use util::module::State as _;

    fn base_input(role: Role) -> InputData {
        let mut actual = KinState::new(0.5, -0.2, 0.3);
        actual.transform(0.1655);
        let mut desired = KinState::new(1.0, 1.0, 0.0);
        desired.transform(0.1655);

        InputData {
            mode: DynamicsMode::FixedPoint,
            role: Some(role),
            t_s: 0.0,
            dt_s: 0.01,
            amplitude: [0.0; 2],
            self_actual: actual,
            self_desired: desired,
            neighbours: vec![],
            observation: None,
        }
    }

    /// The decentralisation constraint: with no neighbours a follower's
    /// command reduces to the velocity feedforward, so perturbing its own
    /// desired absolute position must not change the output. For a leader
    /// it must.
    #[test]
    fn test_follower_ignores_own_desired_position() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        let input = base_input(Role::Follower);
        let (nominal, _) = ctrl.proc(&input).unwrap();

        let mut perturbed = input.clone();
        perturbed.self_desired.xp_m += 1.7;
        perturbed.self_desired.yp_m -= 0.9;
        let (shifted, _) = ctrl.proc(&perturbed).unwrap();

        assert_eq!(nominal.wheel_speeds_ms, shifted.wheel_speeds_ms);
    }

    #[test]
    fn test_leader_tracks_own_desired_position() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        let input = base_input(Role::Leader);
        let (nominal, _) = ctrl.proc(&input).unwrap();

        let mut perturbed = input.clone();
        perturbed.self_desired.xp_m += 0.05;
        let (shifted, _) = ctrl.proc(&perturbed).unwrap();

        assert_ne!(nominal.wheel_speeds_ms, shifted.wheel_speeds_ms);
    }

    /// A robot sitting exactly on its formation slot with a stationary
    /// reference needs no command.
    #[test]
    fn test_zero_error_zero_command() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        let mut input = base_input(Role::Leader);
        input.self_actual = input.self_desired;

        let mut nbr_actual = KinState::new(-1.0, 0.0, 0.0);
        nbr_actual.transform(0.1655);
        // Neighbour is also exactly on its slot
        input.neighbours = vec![(nbr_actual, nbr_actual)];

        let (out, report) = ctrl.proc(&input).unwrap();
        assert!(out.wheel_speeds_ms[0].abs() < 1.0e-12);
        assert!(out.wheel_speeds_ms[1].abs() < 1.0e-12);
        assert!(!report.speed_limited);
    }

    struct ConstantPolicy;

    impl LearnedController for ConstantPolicy {
        fn compute_cmd(&self, _observation: &[f64]) -> [f64; 2] {
            [0.2, 0.1]
        }
    }

    #[test]
    fn test_learned_controller_overrides_law() {
        let mut ctrl = FormCtrl::with_params(Params::default());
        ctrl.set_learned_controller(Box::new(ConstantPolicy));

        // Without an observation the learned branch must fail
        let input = base_input(Role::Leader);
        assert!(matches!(ctrl.proc(&input), Err(FormCtrlError::NoObservation)));

        let mut input = base_input(Role::Leader);
        input.observation = Some(vec![0.0; 16]);
        let (out, _) = ctrl.proc(&input).unwrap();
        assert_eq!(out.wheel_speeds_ms, [0.2, 0.1]);
    }
}
