//! # Data Store

use log::info;

use crate::{
    bike_model::{self, BikeModel, ControlCommand, VehicleState},
    target::CircleTarget,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
///
/// Everything mutable in the simulation lives here, owned by the driver
/// loop. There are no module-level globals.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    // BikeModel
    pub bike_model: BikeModel,
    pub bike_model_cmd: ControlCommand,
    pub vehicle_state: VehicleState,
    pub bike_model_status_rpt: bike_model::StatusReport,

    // Target
    pub target: CircleTarget,
    pub distance_to_target_m: f64,
    pub target_reached: bool,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, sets
    /// the 1Hz cycle flag and advances the simulation clock.
    pub fn cycle_start(&mut self, dt_s: f64, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u64) == 0;

        self.bike_model_cmd = ControlCommand::default();
        self.bike_model_status_rpt = bike_model::StatusReport::default();

        // Simulation time is derived from the cycle count, not the wall
        // clock, so runs are reproducible
        self.sim_time_s = self.num_cycles as f64 * dt_s;
    }

    /// Mark the target as reached.
    pub fn set_target_reached(&mut self) {
        if !self.target_reached {
            info!(
                "Target reached after {:.1} s, final distance to centre {:.2} m",
                self.sim_time_s, self.distance_to_target_m
            );
            self.target_reached = true;
        }
    }
}
