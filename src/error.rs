//! Fatal error conditions of a conversion run.
//!
//! Non-fatal anomalies (illegal positions, near-even evaluations) never show up
//! here; they are collected in [`crate::summary::RunSummary`] instead.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input list of positions could not be opened or read.
    #[error("cannot read input {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PGN output file could not be created or written.
    #[error("cannot write output {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The engine process failed to launch or to complete the UCI handshake.
    #[error("failed to start engine {}: {reason}", path.display())]
    EngineStartup { path: PathBuf, reason: String },

    /// The engine died, closed its pipes or answered something unusable.
    #[error("engine communication failed: {0}")]
    EngineCommunication(String),

    /// The engine stayed silent for longer than the configured bound.
    #[error("engine did not answer within {0:?}")]
    EngineTimeout(Duration),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
