use shakmaty::uci::UciMove;

use crate::wdl::Score;

use super::AnalysisResult;

/// Keys that may follow a `pv` in an `info` line and therefore end it.
const INFO_KEYS: &[&str] = &[
    "depth", "seldepth", "time", "nodes", "pv", "multipv", "score", "currmove", "currmovenumber",
    "hashfull", "nps", "tbhits", "sbhits", "cpuload", "string", "refutation", "currline", "wdl",
];

/// Latest search state reported by the engine for the main line.
///
/// Later `info` lines overwrite earlier fields one by one, so a `currmove`
/// line carrying only a depth still advances the depth.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfoSnapshot {
    pub depth: Option<u32>,
    pub score: Option<Score>,
    pub pv: Vec<UciMove>,
}

impl InfoSnapshot {
    pub fn update_from_line(&mut self, line: &str) {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some("info") { return; }
        let mut depth = None;
        let mut score = None;
        let mut pv: Option<Vec<UciMove>> = None;
        while let Some(tok) = tokens.next() {
            match tok {
                "string" => break,
                "multipv" => {
                    if tokens.next().and_then(|s| s.parse::<u32>().ok()).is_some_and(|n| n > 1) { return; }
                }
                "depth" => { depth = tokens.next().and_then(|s| s.parse::<u32>().ok()); }
                "score" => {
                    let kind = tokens.next();
                    let value = tokens.next().and_then(|s| s.parse::<i32>().ok());
                    score = match (kind, value) {
                        (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                        (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                        _ => None,
                    };
                }
                "pv" => {
                    let mut moves = Vec::new();
                    while let Some(next) = tokens.peek() {
                        if INFO_KEYS.contains(next) { break; }
                        match next.parse::<UciMove>() {
                            Ok(m) => { moves.push(m); tokens.next(); }
                            Err(_) => break,
                        }
                    }
                    pv = Some(moves);
                }
                _ => {}
            }
        }
        if let Some(d) = depth { self.depth = Some(d); }
        if let Some(s) = score { self.score = Some(s); }
        if let Some(p) = pv { self.pv = p; }
    }

    /// Close the search with the `bestmove` payload (the text after `bestmove`).
    pub fn finish(self, bestmove: &str) -> AnalysisResult {
        let best = bestmove
            .split_whitespace()
            .next()
            .filter(|m| *m != "(none)" && *m != "0000")
            .and_then(|m| m.parse::<UciMove>().ok());
        let pv = match (self.pv.is_empty(), best) {
            (true, Some(m)) => vec![m],
            _ => self.pv,
        };
        AnalysisResult { pv, score: self.score, depth: self.depth.unwrap_or(0) }
    }
}
