use serde::{Deserialize, Serialize};

/// Inclusive band of White win expectation in which a position is flagged as
/// possibly ill-posed.
pub const ILL_POSED_BAND: (f64, f64) = (0.45, 0.55);

pub fn is_ill_posed(expectation: f64) -> bool {
    (ILL_POSED_BAND.0..=ILL_POSED_BAND.1).contains(&expectation)
}

/// Non-fatal anomalies gathered over a run, by sequence number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records that failed the legality check (or did not parse at all).
    pub invalid: Vec<usize>,
    /// Records whose evaluation sits too close to an even game.
    pub ill_posed: Vec<usize>,
    /// Number of games written.
    pub games: usize,
}

impl RunSummary {
    pub fn record_invalid(&mut self, seq: usize) { push_ordered(&mut self.invalid, seq); }

    pub fn record_ill_posed(&mut self, seq: usize) { push_ordered(&mut self.ill_posed, seq); }

    /// Lines for the end-of-run report; empty lists produce no line.
    pub fn report_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.invalid.is_empty() {
            out.push(format!("Invalid positions: {}", join(&self.invalid)));
        }
        if !self.ill_posed.is_empty() {
            out.push(format!("Possibly ill-posed positions: {}", join(&self.ill_posed)));
        }
        out
    }
}

fn push_ordered(list: &mut Vec<usize>, seq: usize) {
    debug_assert!(list.last().map_or(true, |&last| last < seq), "sequence numbers must increase");
    list.push(seq);
}

fn join(seqs: &[usize]) -> String {
    seqs.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
}
