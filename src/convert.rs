//! The conversion pipeline: position record in, PGN game out.

use std::io::{self, BufRead, Write};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::board::BoardState;
use crate::engine::Analyser;
use crate::error::Result;
use crate::input::PositionRecord;
use crate::pgn::GameRecord;
use crate::summary::{is_ill_posed, RunSummary};
use crate::wdl::{white_expectation, WdlModel};

pub const TITLE_PROMPT: &str = "Title (Event tag): ";

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// `Event` tag for every game; empty omits the tag.
    pub title: String,
    /// Attach `p=<White expectation>` after the engine line.
    pub annotate: bool,
    pub wdl_model: WdlModel,
    pub progress: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { title: String::new(), annotate: true, wdl_model: WdlModel::default(), progress: true }
    }
}

/// Drives one analyser over a sequence of positions, strictly in order.
pub struct Converter<A: Analyser> {
    analyser: A,
    opts: ConvertOptions,
}

impl<A: Analyser> Converter<A> {
    pub fn new(analyser: A, opts: ConvertOptions) -> Self { Self { analyser, opts } }

    /// Analyse one record and build its game.
    ///
    /// Legality problems only land in `summary`; the record still yields a
    /// game with its own round number. Positions that cannot be played at
    /// all are emitted without an engine line.
    pub fn convert_position(&mut self, record: &PositionRecord, summary: &mut RunSummary) -> Result<GameRecord> {
        let seq = record.seq;
        let board = BoardState::parse(&record.text);
        if let Some(defect) = board.defect() {
            warn!("position {seq}: {defect}");
            summary.record_invalid(seq);
        }

        let mut game = GameRecord::new(&self.opts.title, seq);
        let fen = match board.fen() {
            Some(fen) => fen,
            None => {
                warn!("position {seq}: emitting an empty game for {:?}", board.text());
                return Ok(game);
            }
        };
        game.set_start(&fen, board.turn(), board.fullmoves());
        if board.position().is_none() {
            info!("position {seq}: not playable, skipping analysis");
            return Ok(game);
        }

        let analysis = self.analyser.analyse(&fen)?;
        let replay = board.replay(&analysis.pv)?;
        game.set_moves(replay.sans);

        if self.opts.annotate {
            match analysis.score {
                Some(score) => {
                    let p = white_expectation(score, board.turn(), self.opts.wdl_model, analysis.depth);
                    game.set_comment(format!("p={p:.2}"));
                    if is_ill_posed(p) { summary.record_ill_posed(seq); }
                }
                None => warn!("position {seq}: engine sent no score, game left unannotated"),
            }
        }
        Ok(game)
    }

    /// Convert every record and write the games to `out`, each followed by a blank line.
    pub fn run<I, W>(&mut self, records: I, total: usize, out: &mut W, summary: &mut RunSummary) -> Result<()>
    where
        I: IntoIterator<Item = Result<PositionRecord>>,
        W: Write,
    {
        let bar = if self.opts.progress { ProgressBar::new(total as u64) } else { ProgressBar::hidden() };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({per_sec}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        for record in records {
            let record = record?;
            let game = self.convert_position(&record, summary)?;
            write!(out, "{game}\n\n")?;
            summary.games += 1;
            bar.inc(1);
        }
        bar.finish();
        out.flush()?;
        Ok(())
    }
}

/// Ask for the `Event` title on `output` and read one line from `input`.
///
/// Only the line ending is removed; end of input gives an empty title.
pub fn read_title<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    output.write_all(TITLE_PROMPT.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.ends_with('\n') { line.pop(); }
    if line.ends_with('\r') { line.pop(); }
    Ok(line)
}
