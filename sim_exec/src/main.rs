//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Command computation (target controller or drive script)
//!         - Bicycle model processing
//!         - Archiving and telemetry
//!         - Completion check
//!         - Cycle management
//!
//! # Modules
//!
//! All cyclic modules (e.g. `bike_model`) shall meet the following
//! requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use sim_lib::{
    bike_model::VehicleState,
    data_store::DataStore,
    drive_script::{DriveScript, PendingCommand},
    target::CircleTarget,
    target_ctrl::{Controller, ManualCtrl, TargetCtrl},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::env;
use std::fs::File;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::{Archived, Archiver},
    logger::{logger_init, LevelFilter},
    module::State,
    raise_error,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Speed below which the vehicle counts as stationary for the completion
/// check.
///
/// Units: meters/second
const COMPLETION_SPEED_MS: f64 = 0.1;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "sim_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Bicycle Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE COMMAND SOURCE ----

    // The command source determines whether the vehicle is driven by the
    // target controller or by a scripted command sequence.
    let mut cmd_source = CmdSource::None;

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut target = CircleTarget::default();

    match args.len() {
        // No arguments: drive to the default target
        1 => (),

        // Single argument: a target literal. A malformed literal is a
        // recoverable error, warn and fall back to the default target.
        2 => match args[1].parse::<CircleTarget>() {
            Ok(t) => target = t,
            Err(e) => warn!(
                "Invalid target '{}': {}. Using default target.",
                args[1], e
            ),
        },

        // `--script <path>`: manual control from a drive script
        3 if args[1] == "--script" => {
            info!("Loading drive script from \"{}\"", &args[2]);

            let script = DriveScript::new(&args[2])
                .wrap_err("Failed to load drive script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                script.get_duration(),
                script.get_num_cmds()
            );

            cmd_source = CmdSource::Script(script, ManualCtrl::new());
        }

        _ => {
            return Err(eyre!(
                "Expected either no argument, a target literal 'x,y,radius', \
                 or '--script <path>'"
            ))
        }
    }

    // If no script was given use the target controller
    if let CmdSource::None = cmd_source {
        let ctrl_params = util::params::load("target_ctrl.toml")
            .wrap_err("Could not load TargetCtrl params")?;

        cmd_source = CmdSource::Target(
            TargetCtrl::new(ctrl_params)
                .wrap_err("Failed to initialise TargetCtrl")?,
        );

        info!("Driving to target: {}", target);
    }

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    ds.target = target;

    // ---- INITIALISE MODULES ----

    ds.bike_model.init("bike_model.toml", &session)
        .wrap_err("Failed to initialise BikeModel")?;
    info!("BikeModel init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE TELEMETRY ----

    let mut sim_arch_path = session.arch_root.clone();
    sim_arch_path.push("sim");
    std::fs::create_dir_all(sim_arch_path)
        .wrap_err("Failed to create the sim archive directory")?;

    let mut telem_arch = Archiver::from_path(&session, "sim/telemetry.csv")
        .map_err(|e| eyre!("Failed to initialise the telemetry archive: {}", e))?;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let dt_s = ds.bike_model.dt_s();

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(dt_s, CYCLE_FREQUENCY_HZ);

        // ---- COMMAND COMPUTATION ----

        match cmd_source {
            // If no source no point in continuing so break
            CmdSource::None => raise_error!("No command source present"),

            CmdSource::Target(ref ctrl) => {
                ds.bike_model_cmd = ctrl.compute(&ds.vehicle_state, &ds.target);
            }

            CmdSource::Script(ref mut script, ref mut manual) => {
                match script.pending(ds.sim_time_s) {
                    PendingCommand::Some(cmd) => manual.set_command(cmd),
                    PendingCommand::None => (),
                    // Exit if end of script reached
                    PendingCommand::EndOfScript => {
                        info!("End of drive script reached, stopping");
                        break;
                    }
                }

                ds.bike_model_cmd = manual.compute(&ds.vehicle_state, &ds.target);
            }
        }

        // ---- MODEL PROCESSING ----

        match ds.bike_model.proc(&ds.bike_model_cmd) {
            Ok((o, r)) => {
                ds.vehicle_state = o;
                ds.bike_model_status_rpt = r;
            }
            Err(e) => {
                // The model is total over finite commands so this shouldn't
                // happen, warn and continue with the previous state.
                warn!("Error during BikeModel processing: {}", e)
            }
        };

        ds.distance_to_target_m = ds
            .target
            .distance_to_centre(ds.vehicle_state.x_m, ds.vehicle_state.y_m);

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.bike_model.write() {
            warn!("Could not write BikeModel archives: {}", e);
        }

        if let Err(e) = telem_arch.serialise(TelemetryRecord {
            time_s: ds.sim_time_s,
            accel_ms2: ds.bike_model_cmd.accel_ms2,
            steering_rate_rads: ds.bike_model_cmd.steering_rate_rads,
            distance_to_target_m: ds.distance_to_target_m,
        }) {
            warn!("Could not write the telemetry archive: {}", e);
        }

        // ---- STATUS ----

        if ds.is_1_hz_cycle {
            info!(
                "[{:6.1} s] pos ({:6.2}, {:6.2}) m, speed {:.2} m/s, \
                 distance to target {:.2} m",
                ds.sim_time_s,
                ds.vehicle_state.x_m,
                ds.vehicle_state.y_m,
                ds.vehicle_state.speed_ms,
                ds.distance_to_target_m
            );
        }

        // ---- COMPLETION CHECK ----

        // The completion condition is a driver-level predicate, the model
        // never self-terminates. Scripted runs play to the end of the script
        // instead.
        if let CmdSource::Target(_) = cmd_source {
            if ds.target.contains(ds.vehicle_state.x_m, ds.vehicle_state.y_m)
                && ds.vehicle_state.speed_ms < COMPLETION_SPEED_MS
            {
                ds.set_target_reached();
                break;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Write the run summary into the session directory
    let mut summary_path = session.session_root.clone();
    summary_path.push("run_summary.json");

    let summary_file = File::create(summary_path)
        .wrap_err("Failed to create the run summary file")?;

    serde_json::to_writer_pretty(
        summary_file,
        &RunSummary {
            num_cycles: ds.num_cycles,
            sim_time_s: ds.sim_time_s,
            final_state: ds.vehicle_state,
            target: ds.target,
            distance_to_target_m: ds.distance_to_target_m,
            target_reached: ds.target_reached,
        },
    )
    .wrap_err("Failed to write the run summary")?;

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the commands driving the vehicle.
enum CmdSource {
    None,
    Target(TargetCtrl),
    Script(DriveScript, ManualCtrl),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One row of the per-cycle telemetry archive.
#[derive(Serialize)]
struct TelemetryRecord {
    time_s: f64,
    accel_ms2: f64,
    steering_rate_rads: f64,
    distance_to_target_m: f64,
}

/// Summary of the run written at shutdown.
#[derive(Serialize)]
struct RunSummary {
    num_cycles: u64,
    sim_time_s: f64,
    final_state: VehicleState,
    target: CircleTarget,
    distance_to_target_m: f64,
    target_reached: bool,
}
