//! Implementations for the controller structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{Controller, Params, TargetCtrlError};
use crate::bike_model::{ControlCommand, VehicleState};
use crate::target::CircleTarget;
use util::maths::{clamp, wrap_to_pi};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Proportional gain on the heading error.
const HEADING_GAIN: f64 = 2.0;

/// Gain on the speed-proportional braking used inside the target.
const BRAKE_GAIN: f64 = 2.0;

/// Gain on the pull toward the target boundary in the approach zone.
const APPROACH_GAIN: f64 = 0.5;

/// Gain on the speed damping in the approach zone.
const APPROACH_SPEED_DAMPING: f64 = 0.5;

/// The approach zone extends out to this multiple of the target radius.
const APPROACH_ZONE_FACTOR: f64 = 3.0;

/// Gain on the distance-proportional speed-up outside the approach zone.
const FAR_SPEED_GAIN: f64 = 0.1;

/// Fixed cap on the acceleration demand outside the approach zone.
///
/// Units: meters/second^2
const FAR_ACCEL_LIMIT_MS2: f64 = 2.0;

/// Heading errors above this magnitude count as a sharp turn.
///
/// Units: radians
const SHARP_TURN_THRESHOLD_RAD: f64 = std::f64::consts::FRAC_PI_4;

/// Acceleration cap applied while a sharp turn is required, to avoid
/// high-speed sharp turns.
///
/// Units: meters/second^2
const SHARP_TURN_ACCEL_LIMIT_MS2: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional controller that drives the vehicle into the target circle
/// and holds it there.
pub struct TargetCtrl {
    params: Params,
}

/// Pass-through controller for externally driven input.
///
/// Ignores the state and target and returns whatever command was last set,
/// either directly or from a drive script.
#[derive(Default)]
pub struct ManualCtrl {
    cmd: ControlCommand,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetCtrl {
    /// Create a new controller from the given parameters.
    pub fn new(params: Params) -> Result<Self, TargetCtrlError> {
        params.validate()?;

        Ok(Self { params })
    }
}

impl Controller for TargetCtrl {
    /// Compute the command driving the vehicle toward the target.
    ///
    /// Steering rate is proportional to the heading error, normalized into
    /// (-pi, pi) so the controller never acts on an unwrapped error. The
    /// acceleration is chosen from three mutually exclusive distance bands
    /// (inside the target, approach zone, far), with an override capping
    /// acceleration while a sharp turn is required.
    fn compute(&self, state: &VehicleState, target: &CircleTarget) -> ControlCommand {
        // Distance and bearing to the target centre. At zero distance
        // atan2(0, 0) = 0 is the desired-heading tie-break.
        let dx_m = target.x_m() - state.x_m;
        let dy_m = target.y_m() - state.y_m;
        let distance_m = (dx_m.powi(2) + dy_m.powi(2)).sqrt();

        let desired_heading_rad = dy_m.atan2(dx_m);
        let heading_error_rad = wrap_to_pi(desired_heading_rad - state.heading_rad);

        // Proportional steering law
        let steering_rate_rads = clamp(
            &(HEADING_GAIN * heading_error_rad),
            &-self.params.max_steering_rate_rads,
            &self.params.max_steering_rate_rads,
        );

        // Distance-banded acceleration law
        let mut accel_ms2 = if distance_m <= target.radius_m() {
            // Inside the target, brake proportional to the current speed
            -BRAKE_GAIN * state.speed_ms
        }
        else if distance_m < APPROACH_ZONE_FACTOR * target.radius_m() {
            // Approach zone, blend a pull toward the boundary with speed
            // damping
            APPROACH_GAIN * (distance_m - target.radius_m())
                - APPROACH_SPEED_DAMPING * state.speed_ms
        }
        else {
            // Far from the target, capped distance-proportional speed-up
            FAR_ACCEL_LIMIT_MS2.min(FAR_SPEED_GAIN * distance_m)
        };

        // Don't accelerate hard into a sharp turn
        if heading_error_rad.abs() > SHARP_TURN_THRESHOLD_RAD {
            accel_ms2 = accel_ms2.min(SHARP_TURN_ACCEL_LIMIT_MS2);
        }

        ControlCommand {
            accel_ms2: clamp(
                &accel_ms2,
                &-self.params.max_accel_ms2,
                &self.params.max_accel_ms2,
            ),
            steering_rate_rads,
        }
    }
}

impl ManualCtrl {
    /// Create a new manual controller with a zero command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command to be returned by subsequent `compute` calls.
    pub fn set_command(&mut self, cmd: ControlCommand) {
        self.cmd = cmd;
    }
}

impl Controller for ManualCtrl {
    /// Return the externally set command verbatim.
    fn compute(&self, _state: &VehicleState, _target: &CircleTarget) -> ControlCommand {
        self.cmd
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Point2;

    fn ctrl() -> TargetCtrl {
        TargetCtrl::new(Params::default()).unwrap()
    }

    fn target(x_m: f64, y_m: f64, radius_m: f64) -> CircleTarget {
        CircleTarget::new(Point2::new(x_m, y_m), radius_m).unwrap()
    }

    #[test]
    fn test_compute_is_pure() {
        let ctrl = ctrl();
        let target = target(7.3, -2.1, 1.5);
        let state = VehicleState {
            x_m: 1.0,
            y_m: 2.0,
            heading_rad: 0.7,
            speed_ms: 3.0,
            steering_rad: 0.1,
        };

        let first = ctrl.compute(&state, &target);
        let second = ctrl.compute(&state, &target);

        // Bit-identical repeat
        assert_eq!(first, second);
    }

    #[test]
    fn test_stationary_at_centre() {
        let ctrl = ctrl();
        let target = target(0.0, 0.0, 1.0);
        let state = VehicleState::default();

        let cmd = ctrl.compute(&state, &target);

        // Brake term is zero at zero speed, steering finite with the
        // atan2(0, 0) = 0 tie-break
        assert_eq!(cmd.accel_ms2, 0.0);
        assert_eq!(cmd.steering_rate_rads, 0.0);
    }

    #[test]
    fn test_brakes_inside_target() {
        let ctrl = ctrl();
        let target = target(0.0, 0.0, 2.0);
        let state = VehicleState {
            x_m: 1.0,
            y_m: 0.0,
            heading_rad: 0.0,
            speed_ms: 0.5,
            steering_rad: 0.0,
        };

        let cmd = ctrl.compute(&state, &target);
        assert_eq!(cmd.accel_ms2, -1.0);
    }

    #[test]
    fn test_approach_zone_blend() {
        let ctrl = ctrl();
        let target = target(0.0, 0.0, 2.0);

        // 4 m out with radius 2: inside the approach zone (2 < 4 < 6),
        // heading straight at the target
        let state = VehicleState {
            x_m: -4.0,
            y_m: 0.0,
            heading_rad: 0.0,
            speed_ms: 1.0,
            steering_rad: 0.0,
        };

        let cmd = ctrl.compute(&state, &target);

        // 0.5 * (4 - 2) - 0.5 * 1 = 0.5
        assert!((cmd.accel_ms2 - 0.5).abs() < 1e-12);
        assert_eq!(cmd.steering_rate_rads, 0.0);
    }

    #[test]
    fn test_far_band_capped() {
        let ctrl = ctrl();
        let target = target(100.0, 0.0, 1.0);
        let state = VehicleState::default();

        // 0.1 * 100 = 10, capped to the fixed 2.0 limit
        let cmd = ctrl.compute(&state, &target);
        assert_eq!(cmd.accel_ms2, 2.0);

        // Closer in but still outside the approach zone the linear law
        // applies directly
        let state = VehicleState { x_m: 85.0, ..state };
        let cmd = ctrl.compute(&state, &target);
        assert!((cmd.accel_ms2 - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sharp_turn_caps_accel() {
        let ctrl = ctrl();
        let target = target(100.0, 0.0, 1.0);

        // Facing directly away from the target: heading error is pi
        let state = VehicleState {
            heading_rad: std::f64::consts::PI,
            ..VehicleState::default()
        };

        let cmd = ctrl.compute(&state, &target);
        assert_eq!(cmd.accel_ms2, SHARP_TURN_ACCEL_LIMIT_MS2);

        // Steering rate saturates at the configured limit
        assert_eq!(
            cmd.steering_rate_rads.abs(),
            Params::default().max_steering_rate_rads
        );
    }

    #[test]
    fn test_heading_error_wrapped() {
        let ctrl = ctrl();

        // Target due west, vehicle heading just south of west: the raw error
        // is close to 2*pi, wrapped it is small, so the steering demand must
        // be small rather than saturated
        let target = target(-100.0, 0.0, 1.0);
        let state = VehicleState {
            heading_rad: -3.1,
            ..VehicleState::default()
        };

        let cmd = ctrl.compute(&state, &target);
        assert!(cmd.steering_rate_rads.abs() < 0.2);
    }

    #[test]
    fn test_manual_ctrl_pass_through() {
        let mut ctrl = ManualCtrl::new();
        let target = target(0.0, 0.0, 1.0);
        let state = VehicleState::default();

        assert_eq!(ctrl.compute(&state, &target), ControlCommand::default());

        let cmd = ControlCommand {
            accel_ms2: 1.25,
            steering_rate_rads: -0.5,
        };
        ctrl.set_command(cmd);

        assert_eq!(ctrl.compute(&state, &target), cmd);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Params {
            max_accel_ms2: 0.0,
            ..Params::default()
        };
        assert!(TargetCtrl::new(params).is_err());

        let params = Params {
            max_steering_rate_rads: -1.0,
            ..Params::default()
        };
        assert!(TargetCtrl::new(params).is_err());
    }
}
