//! Kinematic state-update calculations
//!
//! The model is the classic kinematic bicycle with the reference point on
//! the rear axle. Velocity direction differs from the body heading by the
//! slip angle `beta`, a static geometric function of the steering angle with
//! an effective wheelbase factor of 0.5.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::{BikeModel, ControlCommand, StatusReport, VehicleState};
use util::maths::{clamp, wrap_to_pi};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BikeModel {
    /// Compute the next vehicle state under the given command.
    ///
    /// All demands are clamped to the configured limits, with the
    /// corresponding flags set in the status report. Note the evaluation
    /// order: the slip angle is derived from the pre-update steering angle,
    /// the position update uses the new speed but the old heading.
    pub(crate) fn calc_kinematics(
        &self,
        state: &VehicleState,
        cmd: &ControlCommand,
        report: &mut StatusReport,
    ) -> VehicleState {
        let dt_s = self.params.dt_s;

        // Clamp the commanded acceleration
        let accel_ms2 = clamp(
            &cmd.accel_ms2,
            &-self.params.max_accel_ms2,
            &self.params.max_accel_ms2,
        );
        report.accel_limited = accel_ms2 != cmd.accel_ms2;

        // Update the steering angle
        let steering_rad = clamp(
            &(state.steering_rad + cmd.steering_rate_rads * dt_s),
            &-self.params.max_steering_rad,
            &self.params.max_steering_rad,
        );
        report.steering_limited =
            steering_rad != state.steering_rad + cmd.steering_rate_rads * dt_s;

        // Update the speed. The zero floor enforces the no-reverse constraint.
        let speed_unclamped_ms = state.speed_ms + accel_ms2 * dt_s;
        let speed_ms = clamp(&speed_unclamped_ms, &0.0, &self.params.max_speed_ms);
        report.speed_limited = speed_ms != speed_unclamped_ms;

        // Compute the slip angle from the pre-update steering angle
        let beta_rad = (0.5 * state.steering_rad.tan()).atan();

        // Update the position using the new speed and the old heading
        let x_m = state.x_m + speed_ms * (state.heading_rad + beta_rad).cos() * dt_s;
        let y_m = state.y_m + speed_ms * (state.heading_rad + beta_rad).sin() * dt_s;

        // Update the heading and wrap it back into (-pi, pi]
        let heading_rad = wrap_to_pi(
            state.heading_rad
                + (speed_ms / self.params.body_length_m) * beta_rad.sin() * dt_s,
        );

        VehicleState {
            x_m,
            y_m,
            heading_rad,
            speed_ms,
            steering_rad,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::bike_model::Params;
    use util::module::State;

    const PI: f64 = std::f64::consts::PI;

    fn model() -> BikeModel {
        BikeModel::with_params(Params::default()).unwrap()
    }

    #[test]
    fn test_limits_never_exceeded() {
        let mut model = model();
        let params = model.params().clone();

        // Hammer the model with extreme commands in both directions and check
        // the state invariants hold on every step
        let extreme_cmds = [
            ControlCommand { accel_ms2: 1e6, steering_rate_rads: 1e6 },
            ControlCommand { accel_ms2: -1e6, steering_rate_rads: -1e6 },
            ControlCommand { accel_ms2: 1e6, steering_rate_rads: -1e6 },
        ];

        for cmd in extreme_cmds.iter() {
            for _ in 0..200 {
                let (state, report) = model.proc(cmd).unwrap();

                assert!(state.speed_ms >= 0.0);
                assert!(state.speed_ms <= params.max_speed_ms);
                assert!(state.steering_rad.abs() <= params.max_steering_rad);
                assert!(report.accel_limited);
            }
        }
    }

    #[test]
    fn test_heading_always_wrapped() {
        let mut model = model();

        // Start near pi and keep turning left, the heading must never leave
        // (-pi, pi]
        model.state.heading_rad = 3.0;
        model.state.speed_ms = 5.0;
        model.state.steering_rad = model.params().max_steering_rad;

        let cmd = ControlCommand { accel_ms2: 0.0, steering_rate_rads: 0.0 };

        for _ in 0..1000 {
            let (state, _) = model.proc(&cmd).unwrap();
            assert!(state.heading_rad > -PI && state.heading_rad <= PI);
        }
    }

    #[test]
    fn test_stationary_uncommanded_stays_put() {
        let mut model = model();

        let cmd = ControlCommand::default();
        let (state, report) = model.proc(&cmd).unwrap();

        assert_eq!(state, VehicleState::default());
        assert!(!report.accel_limited);
        assert!(!report.speed_limited);
        assert!(!report.steering_limited);
    }

    #[test]
    fn test_no_reverse() {
        let mut model = model();

        // Braking a stationary vehicle must leave it stationary, not reverse
        let cmd = ControlCommand { accel_ms2: -2.0, steering_rate_rads: 0.0 };
        let (state, report) = model.proc(&cmd).unwrap();

        assert_eq!(state.speed_ms, 0.0);
        assert_eq!(state.x_m, 0.0);
        assert_eq!(state.y_m, 0.0);
        assert!(report.speed_limited);
    }

    #[test]
    fn test_slip_angle_uses_previous_steering() {
        let mut model = model();
        model.state.speed_ms = 1.0;

        // On the first step the pre-update steering angle is zero, so the
        // slip angle is zero and the vehicle moves straight along +x even
        // though the steering command is large
        let cmd = ControlCommand { accel_ms2: 0.0, steering_rate_rads: 5.0 };
        let (state, _) = model.proc(&cmd).unwrap();

        assert!(state.steering_rad > 0.0);
        assert_eq!(state.heading_rad, 0.0);
        assert_eq!(state.y_m, 0.0);
        assert!((state.x_m - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_straight_line_integration() {
        let mut model = model();

        // Constant 1 m/s^2 for 10 steps of 0.1 s: speed ends at 1 m/s and the
        // position is the discrete-sum of v' * dt
        let cmd = ControlCommand { accel_ms2: 1.0, steering_rate_rads: 0.0 };

        let mut expected_x_m = 0.0;
        for i in 1..=10 {
            let (state, _) = model.proc(&cmd).unwrap();
            expected_x_m += (i as f64 * 0.1) * 0.1;
            assert!((state.x_m - expected_x_m).abs() < 1e-12);
            assert_eq!(state.y_m, 0.0);
        }

        assert!((model.state().speed_ms - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trail_bounded() {
        let mut model = model();
        model.state.speed_ms = 1.0;

        let cmd = ControlCommand::default();
        for _ in 0..(crate::bike_model::TRAIL_CAPACITY + 100) {
            model.proc(&cmd).unwrap();
        }

        assert_eq!(model.trail().len(), crate::bike_model::TRAIL_CAPACITY);

        // The oldest retained position is from cycle 101, i.e. further along
        // +x than the very first position
        let oldest = model.trail().front().unwrap();
        assert!(oldest[0] > 0.1);
    }
}
