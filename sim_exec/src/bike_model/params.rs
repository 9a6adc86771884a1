//! Parameters structure for BikeModel

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use super::BikeModelError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the kinematic bicycle model.
#[derive(Clone, Debug, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----

    /// Distance between the rear and front axle reference points.
    ///
    /// Units: meters
    pub body_length_m: f64,

    /// Radius of the wheels, used for visualisation geometry only.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,

    // ---- CAPABILITIES ----

    /// Maximum acceleration magnitude (applies to both speeding up and
    /// braking).
    ///
    /// Units: meters/second^2
    pub max_accel_ms2: f64,

    /// Maximum vehicle speed. The model cannot reverse so the minimum speed
    /// is always zero.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Maximum steering angle magnitude (both clockwise and counter
    /// clockwise).
    ///
    /// Units: radians
    pub max_steering_rad: f64,

    // ---- TIMING ----

    /// Integration time step.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Verify that the parameters describe a physically meaningful vehicle.
    ///
    /// Configuration errors fail fast here rather than being clamped at run
    /// time.
    pub fn validate(&self) -> Result<(), BikeModelError> {
        if self.body_length_m <= 0.0 {
            return Err(BikeModelError::InvalidParam(format!(
                "body_length_m must be positive, found {}",
                self.body_length_m
            )));
        }
        if self.wheel_radius_m <= 0.0 {
            return Err(BikeModelError::InvalidParam(format!(
                "wheel_radius_m must be positive, found {}",
                self.wheel_radius_m
            )));
        }
        if self.max_accel_ms2 <= 0.0 {
            return Err(BikeModelError::InvalidParam(format!(
                "max_accel_ms2 must be positive, found {}",
                self.max_accel_ms2
            )));
        }
        if self.max_speed_ms < 0.0 {
            return Err(BikeModelError::InvalidParam(format!(
                "max_speed_ms must be non-negative, found {}",
                self.max_speed_ms
            )));
        }
        if self.max_steering_rad <= 0.0 || self.max_steering_rad >= FRAC_PI_2 {
            return Err(BikeModelError::InvalidParam(format!(
                "max_steering_rad must be in (0, pi/2), found {}",
                self.max_steering_rad
            )));
        }
        if self.dt_s <= 0.0 {
            return Err(BikeModelError::InvalidParam(format!(
                "dt_s must be positive, found {}",
                self.dt_s
            )));
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            body_length_m: 1.5,
            wheel_radius_m: 0.25,
            max_accel_ms2: 2.0,
            max_speed_ms: 10.0,
            max_steering_rad: FRAC_PI_4,
            dt_s: 0.1,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = Params::default();
        params.body_length_m = 0.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.wheel_radius_m = -0.25;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.max_accel_ms2 = 0.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.max_speed_ms = -1.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.max_steering_rad = FRAC_PI_2;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.dt_s = 0.0;
        assert!(params.validate().is_err());
    }
}
