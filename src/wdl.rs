//! Win/draw/loss estimates derived from engine scores.
//!
//! Stockfish publishes the logistic curve it uses to turn an internal
//! evaluation into per-mille win rates, and refits it for every release.
//! Each `sf*` model below reproduces one of those fits; `lichess` is the
//! single-parameter curve lichess uses for its win-percentage graphs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Engine evaluation relative to the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawns.
    Cp(i32),
    /// Mate in n moves; negative or zero when the side to move gets mated.
    Mate(i32),
}

/// Per-mille win/draw/loss counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wdl {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Wdl {
    pub fn new(wins: u32, draws: u32, losses: u32) -> Self { Self { wins, draws, losses } }

    pub fn total(&self) -> u32 { self.wins + self.draws + self.losses }

    /// Expected score in `[0, 1]`, counting a draw as half a point.
    pub fn expectation(&self) -> f64 {
        let total = self.total();
        if total == 0 { return 0.5; }
        (self.wins as f64 + 0.5 * self.draws as f64) / total as f64
    }

    /// Same estimate from the opponent's point of view.
    pub fn flip(self) -> Self { Self { wins: self.losses, draws: self.draws, losses: self.wins } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WdlModel {
    Sf16_1,
    #[default]
    Sf16,
    Sf15_1,
    Sf15,
    Sf14,
    Sf12,
    Lichess,
}

impl WdlModel {
    pub const ALL: [WdlModel; 7] = [
        WdlModel::Sf16_1,
        WdlModel::Sf16,
        WdlModel::Sf15_1,
        WdlModel::Sf15,
        WdlModel::Sf14,
        WdlModel::Sf12,
        WdlModel::Lichess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WdlModel::Sf16_1 => "sf16.1",
            WdlModel::Sf16 => "sf16",
            WdlModel::Sf15_1 => "sf15.1",
            WdlModel::Sf15 => "sf15",
            WdlModel::Sf14 => "sf14",
            WdlModel::Sf12 => "sf12",
            WdlModel::Lichess => "lichess",
        }
    }

    fn curve(self) -> Option<Curve> {
        let c = match self {
            WdlModel::Sf16_1 => Curve {
                a: [-1.06249702, 7.42016937, 0.89425629, 348.60356174],
                b: [-5.33122190, 39.57831533, -90.84473771, 123.40620748],
                clamp: 4000.0,
                pawn_value: Some(356.0),
                ply_phase: false,
            },
            WdlModel::Sf16 => Curve {
                a: [0.38036525, -2.82015070, 23.17882135, 307.36768407],
                b: [-2.29434733, 13.27689788, -14.26828904, 63.45318330],
                clamp: 4000.0,
                pawn_value: Some(328.0),
                ply_phase: true,
            },
            WdlModel::Sf15_1 => Curve {
                a: [-0.58270499, 2.68512549, 15.24638015, 344.49745382],
                b: [-2.65734562, 15.96509799, -20.69040836, 73.61029937],
                clamp: 4000.0,
                pawn_value: Some(361.0),
                ply_phase: true,
            },
            WdlModel::Sf15 => Curve {
                a: [-1.17202460e-1, 5.94729104e-1, 1.12065546e+1, 1.22606222e+2],
                b: [-1.79066759, 11.30759193, -17.43677612, 36.47147479],
                clamp: 2000.0,
                pawn_value: None,
                ply_phase: true,
            },
            WdlModel::Sf14 => Curve {
                a: [-3.68389304, 30.07065921, -60.52878723, 149.53378557],
                b: [-2.01818570, 15.85685038, -29.83452023, 47.59078827],
                clamp: 2000.0,
                pawn_value: None,
                ply_phase: true,
            },
            WdlModel::Sf12 => Curve {
                a: [-8.24404295, 64.23892342, -95.73056462, 153.86478679],
                b: [-3.37154371, 28.44489198, -56.67657415, 72.05858751],
                clamp: 1000.0,
                pawn_value: None,
                ply_phase: true,
            },
            WdlModel::Lichess => return None,
        };
        Some(c)
    }
}

impl fmt::Display for WdlModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for WdlModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sf" => Ok(WdlModel::Sf16_1),
            "lichess" => Ok(WdlModel::Lichess),
            other => WdlModel::ALL
                .iter()
                .copied()
                .find(|m| m.name() == other)
                .ok_or_else(|| format!("unknown WDL model '{s}' (expected sf, sf16.1, sf16, sf15.1, sf15, sf14, sf12 or lichess)")),
        }
    }
}

/// Third-order polynomial fit in the game phase `m`, as published by Stockfish.
struct Curve {
    a: [f64; 4],
    b: [f64; 4],
    clamp: f64,
    /// Internal units per pawn; `None` when the score is already in centipawns.
    pawn_value: Option<f64>,
    /// Fits up to sf16 use ply/64 as the phase; sf16.1 uses a move count in [8, 120] over 32.
    ply_phase: bool,
}

impl Curve {
    fn wins(&self, cp: i32, ply: u32) -> u32 {
        let m = if self.ply_phase {
            (ply.min(240) as f64) / 64.0
        } else {
            (ply as f64 / 2.0 + 1.0).clamp(8.0, 120.0) / 32.0
        };
        let poly = |k: &[f64; 4]| ((k[0] * m + k[1]) * m + k[2]) * m + k[3];
        let a = poly(&self.a);
        let b = poly(&self.b);
        let x = match self.pawn_value {
            Some(pv) => cp as f64 * pv / 100.0,
            None => cp as f64,
        }
        .clamp(-self.clamp, self.clamp);
        (0.5 + 1000.0 / (1.0 + ((a - x) / b).exp())).floor() as u32
    }
}

fn lichess_wins(cp: i32) -> u32 {
    (1000.0 / (1.0 + (-0.00368208 * cp as f64).exp())).round() as u32
}

impl Score {
    /// Win/draw/loss estimate for the side to move after a search of `ply` plies.
    pub fn wdl(self, model: WdlModel, ply: u32) -> Wdl {
        match (self, model.curve()) {
            (Score::Cp(cp), Some(curve)) => {
                let wins = curve.wins(cp, ply);
                let losses = curve.wins(cp.saturating_neg(), ply);
                Wdl::new(wins, 1000u32.saturating_sub(wins + losses), losses)
            }
            (Score::Cp(cp), None) => {
                let wins = lichess_wins(cp.clamp(-1000, 1000));
                Wdl::new(wins, 0, 1000 - wins)
            }
            (Score::Mate(n), Some(_)) => {
                if n > 0 { Wdl::new(1000, 0, 0) } else { Wdl::new(0, 0, 1000) }
            }
            (Score::Mate(n), None) => {
                // A mate counts as a large but finite advantage, shrinking with distance.
                let cp = (21 - n.unsigned_abs().min(10) as i32) * 100;
                let wins = lichess_wins(cp);
                if n > 0 { Wdl::new(wins, 0, 1000 - wins) } else { Wdl::new(1000 - wins, 0, wins) }
            }
        }
    }
}

/// White's expected score for a side-to-move relative `score`.
pub fn white_expectation(score: Score, turn: Color, model: WdlModel, ply: u32) -> f64 {
    let wdl = score.wdl(model, ply);
    match turn {
        Color::White => wdl.expectation(),
        Color::Black => wdl.flip().expectation(),
    }
}
