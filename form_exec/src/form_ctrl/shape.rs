//! Actuator shaping calculations
//!
//! Shapes the raw wheel speeds from the control law into demands the
//! actuator can execute: ratio-preserving saturation, optional acceleration
//! limiting and unit conversion.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FormCtrl {

    /// Shape a raw wheel speed pair into the output demand.
    ///
    /// Status report flags are raised for every stage that engages.
    pub(crate) fn shape(&mut self, raw_ms: [f64; 2], dt_s: f64) -> OutputData {
        let saturated_ms = self.saturate(raw_ms);
        let limited_ms = self.limit_acceleration(saturated_ms, dt_s);

        let demand = match self.params.drive_units {
            DriveUnits::LinearMs => WheelCmd {
                left: limited_ms[0],
                right: limited_ms[1],
                units: DriveUnits::LinearMs,
            },
            DriveUnits::AngularRads => WheelCmd {
                left: limited_ms[0] / self.params.wheel_radius_m,
                right: limited_ms[1] / self.params.wheel_radius_m,
                units: DriveUnits::AngularRads,
            },
        };

        OutputData {
            wheel_speeds_ms: limited_ms,
            demand,
        }
    }

    /// Saturate the wheel speeds to the wheel speed limit.
    ///
    /// When either wheel exceeds the limit both are scaled by the common
    /// factor `alpha = vm / max(|v1|, |v2|)`. Scaling both by the
    /// larger-magnitude wheel preserves the commanded speed ratio, and with
    /// it the commanded curvature; clamping each wheel independently would
    /// distort the turn.
    fn saturate(&mut self, raw_ms: [f64; 2]) -> [f64; 2] {
        let vm_ms = self.params.wheel_max_speed_ms;
        let peak_ms = raw_ms[0].abs().max(raw_ms[1].abs());

        let alpha = if peak_ms > vm_ms {
            vm_ms / peak_ms
        }
        else {
            1.0
        };

        self.report.alpha = alpha;
        self.report.speed_limited = alpha < 1.0;

        [alpha * raw_ms[0], alpha * raw_ms[1]]
    }

    /// Limit the per-cycle change of each wheel speed.
    ///
    /// Disabled by default. When enabled the change against the stored
    /// baseline is clamped to `acc_max * dt` and the shaped output becomes
    /// the baseline for the next cycle.
    fn limit_acceleration(&mut self, speeds_ms: [f64; 2], dt_s: f64) -> [f64; 2] {
        if !self.params.limit_max_acc {
            self.wheel_baseline_ms = speeds_ms;
            return speeds_ms;
        }

        let dv_max_ms = self.params.acc_max_mss * dt_s;
        let mut limited_ms = [0.0; 2];

        for i in 0..2 {
            let dv_ms = speeds_ms[i] - self.wheel_baseline_ms[i];
            let dv_clamped_ms = clamp(&dv_ms, &-dv_max_ms, &dv_max_ms);

            self.report.acc_limited[i] = dv_clamped_ms != dv_ms;
            limited_ms[i] = self.wheel_baseline_ms[i] + dv_clamped_ms;
        }

        self.wheel_baseline_ms = limited_ms;

        limited_ms
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_saturation_boundary_case() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        // (0.6, 0.3) against vm = 0.5: alpha = 0.5/0.6
        let out = ctrl.shape([0.6, 0.3], 0.01);
        assert!((out.wheel_speeds_ms[0] - 0.5).abs() < 1.0e-12);
        assert!((out.wheel_speeds_ms[1] - 0.25).abs() < 1.0e-12);
        assert!(ctrl.report.speed_limited);
        assert!((ctrl.report.alpha - 0.5 / 0.6).abs() < 1.0e-12);
    }

    #[test]
    fn test_saturation_preserves_ratio() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        let raw = [-1.3, 0.8];
        let out = ctrl.shape(raw, 0.01);
        let shaped = out.wheel_speeds_ms;

        let peak = shaped[0].abs().max(shaped[1].abs());
        assert!((peak - 0.5).abs() < 1.0e-12);
        assert!((shaped[0] / shaped[1] - raw[0] / raw[1]).abs() < 1.0e-12);
    }

    #[test]
    fn test_no_saturation_below_limit() {
        let mut ctrl = FormCtrl::with_params(Params::default());

        let out = ctrl.shape([0.2, -0.4], 0.01);
        assert_eq!(out.wheel_speeds_ms, [0.2, -0.4]);
        assert!(!ctrl.report.speed_limited);
        assert_eq!(ctrl.report.alpha, 1.0);
    }

    #[test]
    fn test_acceleration_limit_clamps_step() {
        let mut params = Params::default();
        params.limit_max_acc = true;
        params.acc_max_mss = 0.5;
        let mut ctrl = FormCtrl::with_params(params);

        // From a standing start a 0.4 m/s demand must be reached in
        // 0.5 * 0.01 = 0.005 m/s increments
        let out = ctrl.shape([0.4, -0.4], 0.01);
        assert!((out.wheel_speeds_ms[0] - 0.005).abs() < 1.0e-12);
        assert!((out.wheel_speeds_ms[1] + 0.005).abs() < 1.0e-12);
        assert_eq!(ctrl.report.acc_limited, [true, true]);

        // The shaped output is the new baseline
        let out = ctrl.shape([0.4, -0.4], 0.01);
        assert!((out.wheel_speeds_ms[0] - 0.01).abs() < 1.0e-12);

        // A small demand change passes through unclamped
        let out = ctrl.shape([0.012, -0.008], 0.01);
        assert!((out.wheel_speeds_ms[0] - 0.012).abs() < 1.0e-12);
        assert!(!ctrl.report.acc_limited[0]);
    }

    #[test]
    fn test_angular_unit_conversion() {
        let mut params = Params::default();
        params.drive_units = DriveUnits::AngularRads;
        params.wheel_radius_m = 0.0976;
        let mut ctrl = FormCtrl::with_params(params);

        let out = ctrl.shape([0.3, 0.3], 0.01);

        // Integration still sees linear speed
        assert_eq!(out.wheel_speeds_ms, [0.3, 0.3]);

        // The actuator demand is in shaft radians/second
        assert_eq!(out.demand.units, DriveUnits::AngularRads);
        assert!((out.demand.left - 0.3 / 0.0976).abs() < 1.0e-12);
    }
}
