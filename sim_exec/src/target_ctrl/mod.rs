//! Target navigation controllers
//!
//! Controllers map the current vehicle state and the target geometry into an
//! actuation command, once per cycle. They hold configuration only, never
//! simulation state, so `compute` is a pure function of its inputs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

use crate::bike_model::{ControlCommand, VehicleState};
use crate::target::CircleTarget;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Capability shared by all controllers.
///
/// A flat interface with a single required operation, implemented by the
/// proportional target controller and the manual pass-through controller.
pub trait Controller {
    /// Compute the actuation command for the current cycle.
    fn compute(&self, state: &VehicleState, target: &CircleTarget) -> ControlCommand;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when constructing a controller.
#[derive(Debug, thiserror::Error)]
pub enum TargetCtrlError {
    #[error("Failed to load the controller parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid controller parameter: {0}")]
    InvalidParam(String),
}
