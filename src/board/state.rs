use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position, PositionError};

use crate::error::{ConvertError, Result};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Why a record did not pass the legality check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Defect {
    /// The text is not FEN at all.
    Unparseable(String),
    /// The FEN parses but describes a position that is not legal.
    Illegal(String),
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::Unparseable(e) => write!(f, "unparseable FEN: {e}"),
            Defect::Illegal(e) => write!(f, "{e}"),
        }
    }
}

/// A parsed input position.
///
/// Illegal positions are kept: whenever shakmaty can still build a playable
/// board (bad castling rights, bogus en passant square, too much material,
/// impossible check) the position is analysed and replayed like any other.
/// Only boards that cannot be built at all (missing kings, pawns on the back
/// rank, ...) end up without a `position`.
#[derive(Clone, Debug)]
pub struct BoardState {
    text: String,
    fen: Option<Fen>,
    position: Option<Chess>,
    defect: Option<Defect>,
}

impl BoardState {
    pub fn parse(text: &str) -> Self {
        // Fields may be separated by any run of whitespace.
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let fen: Fen = match text.parse() {
            Ok(f) => f,
            Err(e) => {
                let defect = Defect::Unparseable(format!("{e}"));
                return Self { text, fen: None, position: None, defect: Some(defect) };
            }
        };
        let (position, defect) = match fen.clone().into_position::<Chess>(CastlingMode::Standard) {
            Ok(pos) => (Some(pos), None),
            Err(err) => {
                let defect = Defect::Illegal(err.to_string());
                let lenient = err
                    .ignore_invalid_castling_rights()
                    .or_else(PositionError::ignore_invalid_ep_square)
                    .or_else(PositionError::ignore_too_much_material)
                    .or_else(PositionError::ignore_impossible_check)
                    .ok();
                (lenient, Some(defect))
            }
        };
        Self { text, fen: Some(fen), position, defect }
    }

    pub fn is_valid(&self) -> bool { self.defect.is_none() }

    pub fn defect(&self) -> Option<&Defect> { self.defect.as_ref() }

    /// Playable board, if one could be built.
    pub fn position(&self) -> Option<&Chess> { self.position.as_ref() }

    /// Input text with whitespace runs collapsed.
    pub fn text(&self) -> &str { &self.text }

    /// FEN to hand to the engine and to record in the game headers.
    ///
    /// Normalised through the playable board when there is one, otherwise the
    /// parsed FEN as written.
    pub fn fen(&self) -> Option<String> {
        match (&self.position, &self.fen) {
            (Some(pos), _) => Some(Fen::from_position(pos, EnPassantMode::Legal).to_string()),
            (None, Some(fen)) => Some(fen.to_string()),
            (None, None) => None,
        }
    }

    pub fn turn(&self) -> Color {
        match (&self.position, &self.fen) {
            (Some(pos), _) => pos.turn(),
            (None, Some(fen)) => fen.as_setup().turn,
            (None, None) => Color::White,
        }
    }

    pub fn fullmoves(&self) -> u32 {
        match (&self.position, &self.fen) {
            (Some(pos), _) => pos.fullmoves().get(),
            (None, Some(fen)) => fen.as_setup().fullmoves.get(),
            (None, None) => 1,
        }
    }

    /// Play the engine line from this position, producing SAN for each move.
    ///
    /// An illegal move in the line means the engine answered about some other
    /// position or garbled its output, so it is reported as a communication
    /// failure.
    pub fn replay(&self, pv: &[UciMove]) -> Result<Replay> {
        let mut pos = self.position.clone().ok_or_else(|| {
            ConvertError::EngineCommunication(format!("cannot replay a line on unplayable position {}", self.text))
        })?;
        let mut sans = Vec::with_capacity(pv.len());
        for uci in pv {
            let m = uci.to_move(&pos).map_err(|_| {
                ConvertError::EngineCommunication(format!(
                    "illegal move {uci} in engine line for {}",
                    Fen::from_position(&pos, EnPassantMode::Legal)
                ))
            })?;
            sans.push(SanPlus::from_move_and_play_unchecked(&mut pos, m));
        }
        Ok(Replay { sans, end: pos })
    }
}

/// Result of [`BoardState::replay`].
#[derive(Clone, Debug)]
pub struct Replay {
    pub sans: Vec<SanPlus>,
    pub end: Chess,
}
