//! Implementations for the BikeModel state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Point2;
use serde::Serialize;
use std::collections::VecDeque;

// Internal
use super::{BikeModelError, ControlCommand, Params, TRAIL_CAPACITY};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic bicycle model module state.
///
/// Owns the sole mutable vehicle state of the simulation. The state is only
/// ever advanced through `proc`, one time step per call.
#[derive(Default)]
pub struct BikeModel {
    pub(crate) params: Params,

    pub(crate) state: VehicleState,
    arch_state: Archiver,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    /// Past rear-axle positions for trail rendering, oldest first.
    history: VecDeque<Point2<f64>>,
}

/// The vehicle state vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct VehicleState {
    /// X position of the rear axle.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Y position of the rear axle.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Heading of the vehicle body, always in (-pi, pi].
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Speed of the vehicle body, always in [0, max_speed_ms].
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Steering angle, always in [-max_steering_rad, max_steering_rad].
    ///
    /// Units: radians
    pub steering_rad: f64,
}

/// Status report for BikeModel processing.
///
/// Saturation of a command is nominal behaviour, not an error, so it is
/// reported through these flags rather than raised.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// True if the commanded acceleration was clamped this cycle.
    pub accel_limited: bool,

    /// True if the speed hit either the zero floor or the maximum this cycle.
    pub speed_limited: bool,

    /// True if the steering angle hit its limit this cycle.
    pub steering_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for BikeModel {
    type InitData = &'static str;
    type InitError = BikeModelError;

    type InputData = ControlCommand;
    type OutputData = VehicleState;
    type StatusReport = StatusReport;
    type ProcError = BikeModelError;

    /// Initialise the BikeModel module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(BikeModelError::ParamLoadError(e)),
        };

        // Reject invalid configurations before the first cycle
        self.params.validate()?;

        // Create the arch folder for bike_model
        let mut arch_path = session.arch_root.clone();
        arch_path.push("bike_model");
        std::fs::create_dir_all(arch_path)
            .map_err(|e| BikeModelError::ArchInitError(e.to_string()))?;

        // Initialise the archivers
        self.arch_state = Archiver::from_path(session, "bike_model/state.csv")
            .map_err(|e| BikeModelError::ArchInitError(e.to_string()))?;
        self.arch_report = Archiver::from_path(session, "bike_model/status_report.csv")
            .map_err(|e| BikeModelError::ArchInitError(e.to_string()))?;

        Ok(())
    }

    /// Perform cyclic processing of the bicycle model.
    ///
    /// Advances the vehicle state by one time step under the given command.
    /// This function is total over all finite command values: out of range
    /// demands are clamped, never raised.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        // Advance the state
        let mut report = self.report;
        let new_state = self.calc_kinematics(&self.state, input_data, &mut report);

        self.state = new_state;
        self.report = report;

        // Append the new position to the trail, evicting the oldest entry
        // once over capacity
        self.history.push_back(Point2::new(new_state.x_m, new_state.y_m));
        if self.history.len() > TRAIL_CAPACITY {
            self.history.pop_front();
        }

        trace!(
            "BikeModel state:\n    pos: ({:.3}, {:.3}) m\n    heading: {:.3} rad\
             \n    speed: {:.3} m/s\n    steering: {:.3} rad",
            self.state.x_m,
            self.state.y_m,
            self.state.heading_rad,
            self.state.speed_ms,
            self.state.steering_rad
        );

        Ok((self.state, self.report))
    }
}

impl Archived for BikeModel {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_state.serialise(self.state)?;
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

impl BikeModel {
    /// Build a model directly from a parameter set.
    ///
    /// Used where no session exists (tests, embedding); no archives are
    /// created. Invalid parameters are rejected exactly as in `init`.
    pub fn with_params(params: Params) -> Result<Self, BikeModelError> {
        params.validate()?;

        Ok(Self {
            params,
            ..Self::default()
        })
    }

    /// Get a copy of the current vehicle state.
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Get the model's parameter set.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Get the integration time step in seconds.
    pub fn dt_s(&self) -> f64 {
        self.params.dt_s
    }

    /// Get the trail of past positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Point2<f64>> {
        &self.history
    }
}
