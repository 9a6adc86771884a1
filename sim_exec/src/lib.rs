//! Library for the simulation executable.
//!
//! All modules used by `sim_exec` live here so that integration tests can
//! drive the full simulation loop without going through the binary.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod bike_model;
pub mod data_store;
pub mod drive_script;
pub mod target;
pub mod target_ctrl;
