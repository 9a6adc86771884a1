//! Kinematic bicycle model module

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod kinematics;
mod params;
mod shape;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use shape::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of past positions kept in the trail history. Once the
/// capacity is exceeded the oldest position is evicted.
pub const TRAIL_CAPACITY: usize = 500;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during BikeModel operation.
#[derive(Debug, thiserror::Error)]
pub enum BikeModelError {
    #[error("Failed to load the model parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid model parameter: {0}")]
    InvalidParam(String),

    #[error("Failed to initialise the model archives: {0}")]
    ArchInitError(String),
}
