//! External analysis engine.
//!
//! The conversion pipeline only needs "analyse this FEN", which is what
//! [`Analyser`] captures. [`UciEngine`] provides it over a UCI child process;
//! tests plug in scripted analysers instead.

pub mod info;
pub mod process;

use std::path::PathBuf;
use std::time::Duration;

use shakmaty::uci::UciMove;

use crate::error::Result;
use crate::wdl::Score;

pub use process::UciEngine;

pub const DEFAULT_ENGINE: &str = "stockfish";
pub const DEFAULT_MOVETIME: Duration = Duration::from_millis(1000);
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

/// How to launch and drive the engine process.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
    pub threads: Option<usize>,
    pub hash_mb: Option<u32>,
    /// Additional UCI options (`Name=Value`, or just `Name` for buttons).
    pub options: Vec<String>,
    /// Search time per position.
    pub movetime: Duration,
    /// Bound on every wait for engine output beyond the search itself.
    pub io_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ENGINE),
            args: Vec::new(),
            threads: None,
            hash_mb: None,
            options: Vec::new(),
            movetime: DEFAULT_MOVETIME,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

/// What the engine reported for one position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisResult {
    /// Principal variation, starting with the best move.
    pub pv: Vec<UciMove>,
    /// Evaluation relative to the side to move, if the engine sent one.
    pub score: Option<Score>,
    /// Depth the score belongs to.
    pub depth: u32,
}

pub trait Analyser {
    fn analyse(&mut self, fen: &str) -> Result<AnalysisResult>;
}

impl<A: Analyser + ?Sized> Analyser for &mut A {
    fn analyse(&mut self, fen: &str) -> Result<AnalysisResult> { (**self).analyse(fen) }
}
