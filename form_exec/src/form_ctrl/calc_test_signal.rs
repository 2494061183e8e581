//! Open-loop test signal calculations
//!
//! These modes drive the wheels with deterministic functions of elapsed
//! time and a per-robot amplitude pair. They are not part of the formation
//! behaviour, they are kept for actuator characterisation runs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::robot::DynamicsMode;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Start time of every test signal.
///
/// Units: seconds
const SIGNAL_START_S: f64 = 1.0;

/// Angular frequency of the sine wave signal.
///
/// Units: radians/second
const SINE_RATE_RADS: f64 = 0.3;

/// Amplitude multiplier of the sine wave signal.
const SINE_AMP: f64 = 2.0;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FormCtrl {

    /// Perform the test signal calculations for the open-loop modes.
    pub(crate) fn calc_test_signal(&self, input: &InputData) -> [f64; 2] {
        let t_s = input.t_s;
        let amp = input.amplitude;

        match input.mode {
            DynamicsMode::Step => {
                if t_s < SIGNAL_START_S {
                    [0.0; 2]
                }
                else {
                    amp
                }
            }

            DynamicsMode::StepSequence => {
                if t_s < 1.0 {
                    [0.0; 2]
                }
                else if t_s < 4.0 {
                    amp
                }
                else if t_s < 7.0 {
                    [-amp[0], -amp[1]]
                }
                else {
                    amp
                }
            }

            DynamicsMode::SineWave => {
                if t_s < SIGNAL_START_S {
                    [0.0; 2]
                }
                else {
                    let signal = SINE_AMP
                        * SINE_RATE_RADS
                        * (SINE_RATE_RADS * (t_s - SIGNAL_START_S)).sin();
                    [signal * amp[0], signal * amp[1]]
                }
            }

            // Formation modes never reach this branch, see FormCtrl::proc
            _ => [0.0; 2],
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin::KinState;

    fn input(mode: DynamicsMode, t_s: f64) -> InputData {
        InputData {
            mode,
            role: None,
            t_s,
            dt_s: 0.01,
            amplitude: [0.3, 0.2],
            self_actual: KinState::default(),
            self_desired: KinState::default(),
            neighbours: vec![],
            observation: None,
        }
    }

    #[test]
    fn test_step_timing() {
        let ctrl = FormCtrl::with_params(Params::default());

        assert_eq!(ctrl.calc_test_signal(&input(DynamicsMode::Step, 0.5)), [0.0; 2]);
        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::Step, 1.5)),
            [0.3, 0.2]
        );
    }

    #[test]
    fn test_step_sequence_sign_pattern() {
        let ctrl = FormCtrl::with_params(Params::default());

        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::StepSequence, 0.2)),
            [0.0; 2]
        );
        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::StepSequence, 2.0)),
            [0.3, 0.2]
        );
        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::StepSequence, 5.0)),
            [-0.3, -0.2]
        );
        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::StepSequence, 8.0)),
            [0.3, 0.2]
        );
    }

    #[test]
    fn test_sine_wave_starts_at_zero() {
        let ctrl = FormCtrl::with_params(Params::default());

        assert_eq!(
            ctrl.calc_test_signal(&input(DynamicsMode::SineWave, 0.9)),
            [0.0; 2]
        );

        // At exactly the start time the sine is zero
        let at_start = ctrl.calc_test_signal(&input(DynamicsMode::SineWave, 1.0));
        assert!(at_start[0].abs() < 1.0e-12);

        // A quarter period later it peaks at amp * rate * amplitude
        let quarter_s = 1.0 + std::f64::consts::FRAC_PI_2 / SINE_RATE_RADS;
        let at_peak = ctrl.calc_test_signal(&input(DynamicsMode::SineWave, quarter_s));
        assert!((at_peak[0] - SINE_AMP * SINE_RATE_RADS * 0.3).abs() < 1.0e-9);
    }
}
