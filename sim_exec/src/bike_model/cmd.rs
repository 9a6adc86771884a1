//! Commands passed into BikeModel

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The actuation command applied to the model for one cycle.
///
/// Commands are transient, a fresh one is produced by the controller each
/// cycle. Both members may be arbitrary reals, the model clamps them to its
/// configured limits during application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ControlCommand {
    /// The demanded acceleration of the vehicle body.
    ///
    /// Units: meters/second^2
    pub accel_ms2: f64,

    /// The demanded rate of change of the steering angle.
    ///
    /// Units: radians/second
    pub steering_rate_rads: f64,
}
