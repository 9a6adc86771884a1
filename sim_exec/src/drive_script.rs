//! # Drive script module
//!
//! This module provides an interpreter for drive scripts, allowing
//! predefined command sequences to be played through the manual controller.
//!
//! A script is a series of `time : accel, steering_rate;` lines, with the
//! time in seconds from the start of the simulation. Playback is keyed to
//! simulation time rather than wall time so that scripted runs are
//! reproducible.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::bike_model::ControlCommand;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct ScriptedCommand {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to apply
    cmd: ControlCommand,
}

/// A drive script interpreter.
///
/// After initialising with the path to the script use `.pending` each cycle
/// to acquire the command that should be applied now, if any.
pub struct DriveScript {
    _script_path: PathBuf,
    cmds: VecDeque<ScriptedCommand>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error(
        "Script contains an invalid command at {0} s: '{1}'. \
        Should be 'accel, steering_rate'")]
    InvalidCommand(f64, String),
}

/// The result of polling the script for pending commands.
pub enum PendingCommand {
    /// No new command is due, keep applying the previous one.
    None,

    /// A new command is due now.
    Some(ControlCommand),

    /// All scripted commands have been played.
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveScript {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.to_string_lossy().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        Self::from_string(path, &script)
    }

    /// Parse a script from its text content.
    fn from_string(path: PathBuf, script: &str) -> Result<Self, ScriptError> {
        // Empty queue of commands
        let mut cmd_queue: VecDeque<ScriptedCommand> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        let mut num_caps = 0;

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            // Parse the command from the payload, a pair of comma separated
            // numbers.
            let payload = cap.get(3).unwrap().as_str();
            let cmd = match Self::parse_command(payload) {
                Some(c) => c,
                None => return Err(ScriptError::InvalidCommand(
                    exec_time_s, payload.trim().to_string()
                ))
            };

            // Build command from the match
            cmd_queue.push_back(ScriptedCommand {
                exec_time_s,
                cmd
            });

            num_caps += 1;
        }

        if num_caps == 0 {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(DriveScript {
            _script_path: path,
            cmds: cmd_queue
        })
    }

    /// Return the command pending at the given simulation time, or `None` if
    /// no new command is due yet.
    ///
    /// If several commands have fallen due since the last poll the most
    /// recent one wins.
    pub fn pending(&mut self, sim_time_s: f64) -> PendingCommand {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingCommand::EndOfScript
        }

        let mut latest: Option<ControlCommand> = None;

        // Peek items from the queue, if the head's exec time is lower than
        // the current time pop it, and keep popping until the exec times are
        // larger than the current time.
        while
            !self.cmds.is_empty()
            &&
            self.cmds.front().unwrap().exec_time_s <= sim_time_s
        {
            latest = Some(self.cmds.pop_front().unwrap().cmd);
        }

        match latest {
            Some(cmd) => PendingCommand::Some(cmd),
            None => PendingCommand::None
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }

    /// Parse an `accel, steering_rate` payload.
    fn parse_command(payload: &str) -> Option<ControlCommand> {
        let fields: Vec<&str> = payload.split(',').collect();

        if fields.len() != 2 {
            return None;
        }

        let accel_ms2: f64 = fields[0].trim().parse().ok()?;
        let steering_rate_rads: f64 = fields[1].trim().parse().ok()?;

        Some(ControlCommand {
            accel_ms2,
            steering_rate_rads,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = "\
        0.0: 1.0, 0.0;\n\
        2.0: 1.0, 0.5;\n\
        4.5: 0.0, -0.5;\n\
        6.0: -2.0, 0.0;\n";

    fn script() -> DriveScript {
        DriveScript::from_string(PathBuf::from("test.txt"), SCRIPT).unwrap()
    }

    #[test]
    fn test_parse() {
        let script = script();
        assert_eq!(script.get_num_cmds(), 4);
        assert_eq!(script.get_duration(), 6.0);
    }

    #[test]
    fn test_parse_errors() {
        // No commands at all
        assert!(matches!(
            DriveScript::from_string(PathBuf::from("t"), "just a comment\n"),
            Err(ScriptError::ScriptEmpty)
        ));

        // Bad payload
        assert!(matches!(
            DriveScript::from_string(PathBuf::from("t"), "1.0: fast, left;\n"),
            Err(ScriptError::InvalidCommand(_, _))
        ));

        // Wrong payload arity
        assert!(matches!(
            DriveScript::from_string(PathBuf::from("t"), "1.0: 0.5;\n"),
            Err(ScriptError::InvalidCommand(_, _))
        ));
    }

    #[test]
    fn test_playback_deterministic() {
        let mut script = script();

        // First command is due immediately
        match script.pending(0.0) {
            PendingCommand::Some(cmd) => assert_eq!(cmd.accel_ms2, 1.0),
            _ => panic!("expected a command at t=0"),
        }

        // Nothing new before the next exec time
        assert!(matches!(script.pending(1.9), PendingCommand::None));

        // Polling past several commands yields the most recent one
        match script.pending(5.0) {
            PendingCommand::Some(cmd) => {
                assert_eq!(cmd.steering_rate_rads, -0.5)
            }
            _ => panic!("expected a command at t=5"),
        }

        match script.pending(10.0) {
            PendingCommand::Some(cmd) => assert_eq!(cmd.accel_ms2, -2.0),
            _ => panic!("expected a command at t=10"),
        }

        // Queue drained
        assert!(matches!(script.pending(11.0), PendingCommand::EndOfScript));
    }
}
