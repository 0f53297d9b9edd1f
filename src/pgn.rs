//! Minimal PGN game model and export format.

use std::fmt;

use shakmaty::san::SanPlus;
use shakmaty::Color;

use crate::board::STARTING_FEN;

pub const RESULT_UNKNOWN: &str = "*";
/// Movetext lines are wrapped at this width.
pub const PGN_COLUMNS: usize = 80;

/// One exported game: a position plus the engine line played out from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    headers: Vec<(String, String)>,
    start_turn: Color,
    start_fullmove: u32,
    moves: Vec<SanPlus>,
    comment: Option<String>,
}

impl GameRecord {
    /// Game with `Event` (omitted for an empty title), `Round` and an unset `Result`.
    pub fn new(title: &str, round: usize) -> Self {
        let mut headers = Vec::with_capacity(5);
        if !title.is_empty() {
            headers.push(("Event".to_string(), title.to_string()));
        }
        headers.push(("Round".to_string(), round.to_string()));
        headers.push(("Result".to_string(), RESULT_UNKNOWN.to_string()));
        Self { headers, start_turn: Color::White, start_fullmove: 1, moves: Vec::new(), comment: None }
    }

    /// Record a non-standard starting position in `SetUp`/`FEN` headers.
    pub fn set_start(&mut self, fen: &str, turn: Color, fullmove: u32) {
        self.start_turn = turn;
        self.start_fullmove = fullmove.max(1);
        if fen != STARTING_FEN {
            self.headers.push(("SetUp".to_string(), "1".to_string()));
            self.headers.push(("FEN".to_string(), fen.to_string()));
        }
    }

    pub fn set_moves(&mut self, moves: Vec<SanPlus>) { self.moves = moves; }

    /// Comment after the last move (or before the result when there are no moves).
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        let c: String = comment.into();
        self.comment = Some(c.replace('}', "").trim().to_string());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn movetext(&self) -> String {
        let mut w = Movetext::new(PGN_COLUMNS);
        if self.moves.is_empty() {
            if let Some(c) = &self.comment { w.token(&format!("{{ {c} }} ")); }
        }
        let mut fullmove = self.start_fullmove;
        let mut turn = self.start_turn;
        for (i, san) in self.moves.iter().enumerate() {
            match turn {
                Color::White => w.token(&format!("{fullmove}. ")),
                Color::Black if i == 0 => w.token(&format!("{fullmove}... ")),
                Color::Black => {}
            }
            w.token(&format!("{san} "));
            if i + 1 == self.moves.len() {
                if let Some(c) = &self.comment { w.token(&format!("{{ {c} }} ")); }
            }
            if turn == Color::Black { fullmove += 1; }
            turn = !turn;
        }
        w.token(&format!("{} ", self.header("Result").unwrap_or(RESULT_UNKNOWN)));
        w.finish()
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            writeln!(f, "[{} \"{}\"]", name, escape_tag(value))?;
        }
        writeln!(f)?;
        f.write_str(&self.movetext())
    }
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Line-wrapping accumulator for movetext tokens (each token carries its own trailing space).
struct Movetext {
    columns: usize,
    lines: Vec<String>,
    current: String,
}

impl Movetext {
    fn new(columns: usize) -> Self { Self { columns, lines: Vec::new(), current: String::new() } }

    fn token(&mut self, tok: &str) {
        if self.columns.saturating_sub(self.current.len()) < tok.len() { self.flush(); }
        self.current.push_str(tok);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(self.current.trim_end().to_string());
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.lines.join("\n")
    }
}
