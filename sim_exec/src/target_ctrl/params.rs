//! Parameters structure for TargetCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::TargetCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the target controller.
///
/// These are actuation limits only, the control-law gains are fixed (see
/// the constants in `state.rs`).
#[derive(Clone, Debug, Deserialize)]
pub struct Params {
    /// Maximum acceleration magnitude the controller will demand.
    ///
    /// Units: meters/second^2
    pub max_accel_ms2: f64,

    /// Maximum steering rate magnitude the controller will demand.
    ///
    /// Units: radians/second
    pub max_steering_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Verify that the limits are usable.
    pub fn validate(&self) -> Result<(), TargetCtrlError> {
        if self.max_accel_ms2 <= 0.0 {
            return Err(TargetCtrlError::InvalidParam(format!(
                "max_accel_ms2 must be positive, found {}",
                self.max_accel_ms2
            )));
        }
        if self.max_steering_rate_rads <= 0.0 {
            return Err(TargetCtrlError::InvalidParam(format!(
                "max_steering_rate_rads must be positive, found {}",
                self.max_steering_rate_rads
            )));
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_accel_ms2: 2.0,
            max_steering_rate_rads: 1.0,
        }
    }
}
