use fenpgn::engine::{AnalysisResult, Analyser};
use fenpgn::error::Result;
use fenpgn::input::PositionRecord;
use fenpgn::summary::RunSummary;
use fenpgn::wdl::{Score, WdlModel};
use fenpgn::{ConvertError, ConvertOptions, Converter};
use pretty_assertions::assert_eq;

/// Answers every query with the same line and score, remembering what it was asked.
struct Scripted {
    pv: Vec<&'static str>,
    score: Option<Score>,
    depth: u32,
    asked: Vec<String>,
}

impl Scripted {
    fn new(pv: &[&'static str], score: Option<Score>) -> Self {
        Self { pv: pv.to_vec(), score, depth: 20, asked: Vec::new() }
    }
}

impl Analyser for Scripted {
    fn analyse(&mut self, fen: &str) -> Result<AnalysisResult> {
        self.asked.push(fen.to_string());
        Ok(AnalysisResult {
            pv: self.pv.iter().map(|m| m.parse().unwrap()).collect(),
            score: self.score,
            depth: self.depth,
        })
    }
}

fn opts(title: &str, annotate: bool) -> ConvertOptions {
    ConvertOptions { title: title.to_string(), annotate, wdl_model: WdlModel::Sf16, progress: false }
}

fn records(lines: &[&str]) -> Vec<Result<PositionRecord>> {
    lines.iter().enumerate().map(|(i, l)| Ok(PositionRecord::new(i + 1, *l))).collect()
}

fn convert(lines: &[&str], analyser: &mut Scripted, opts: ConvertOptions) -> (String, RunSummary) {
    let mut out = Vec::new();
    let mut summary = RunSummary::default();
    Converter::new(analyser, opts).run(records(lines), lines.len(), &mut out, &mut summary).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

const BARE_KINGS: &str = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
const EMPTY_BOARD: &str = "8/8/8/8/8/8/8/8 w - - 0 1";

#[test]
fn two_line_example_with_title() {
    let mut engine = Scripted::new(&["e1d1", "e8d8"], Some(Score::Cp(0)));
    let (pgn, summary) = convert(&[BARE_KINGS, EMPTY_BOARD], &mut engine, opts("Test", true));
    let expected = "[Event \"Test\"]\n[Round \"1\"]\n[Result \"*\"]\n[SetUp \"1\"]\n\
                    [FEN \"4k3/8/8/8/8/8/8/4K3 w - - 0 1\"]\n\n1. Kd1 Kd8 { p=0.50 } *\n\n\
                    [Event \"Test\"]\n[Round \"2\"]\n[Result \"*\"]\n[SetUp \"1\"]\n\
                    [FEN \"8/8/8/8/8/8/8/8 w - - 0 1\"]\n\n*\n\n";
    assert_eq!(pgn, expected);
    assert_eq!(summary.invalid, vec![2]);
    assert_eq!(summary.ill_posed, vec![1]);
    assert_eq!(summary.games, 2);
    assert_eq!(summary.report_lines()[0], "Invalid positions: 2");
    // The kingless board is never sent to the engine.
    assert_eq!(engine.asked, vec![BARE_KINGS.to_string()]);
}

#[test]
fn one_game_per_line_in_round_order() {
    let lines = [BARE_KINGS, "garbage", "", EMPTY_BOARD, "4k3/8/8/8/8/8/8/4K3 b - - 3 40"];
    let mut engine = Scripted::new(&[], Some(Score::Cp(250)));
    let (pgn, summary) = convert(&lines, &mut engine, opts("", true));
    let rounds: Vec<String> = pgn
        .lines()
        .filter_map(|l| l.strip_prefix("[Round \"").and_then(|r| r.strip_suffix("\"]")))
        .map(str::to_string)
        .collect();
    assert_eq!(rounds, ["1", "2", "3", "4", "5"]);
    assert_eq!(summary.invalid, vec![2, 3, 4]);
    assert!(!pgn.contains("[Event"));
}

#[test]
fn illegal_but_playable_position_is_flagged_and_still_analysed() {
    // Castling rights without rooks: invalid, yet a board can be built.
    let mut engine = Scripted::new(&["e1d1"], Some(Score::Cp(0)));
    let (pgn, summary) = convert(&["4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1"], &mut engine, opts("", true));
    assert_eq!(summary.invalid, vec![1]);
    assert_eq!(summary.ill_posed, vec![1]);
    assert_eq!(engine.asked, vec![BARE_KINGS.to_string()]);
    assert!(pgn.contains("[FEN \"4k3/8/8/8/8/8/8/4K3 w - - 0 1\"]"), "{pgn}");
    assert!(pgn.ends_with("1. Kd1 { p=0.50 } *\n\n"), "{pgn}");
}

#[test]
fn title_is_copied_verbatim() {
    let mut engine = Scripted::new(&["e1e2"], Some(Score::Cp(10)));
    let (pgn, _) = convert(&[BARE_KINGS, BARE_KINGS, BARE_KINGS], &mut engine, opts("Book \"X\", ch. 2", true));
    assert_eq!(pgn.matches("[Event \"Book \\\"X\\\", ch. 2\"]\n").count(), 3);
}

#[test]
fn no_annotation_means_no_comments_and_no_ill_posed() {
    let mut engine = Scripted::new(&["e1d1"], Some(Score::Cp(0)));
    let (pgn, summary) = convert(&[BARE_KINGS, BARE_KINGS], &mut engine, opts("", false));
    assert!(!pgn.contains('{'));
    assert!(summary.ill_posed.is_empty());
}

#[test]
fn expectation_is_from_whites_point_of_view() {
    let mut engine = Scripted::new(&["e8d8"], Some(Score::Cp(100)));
    let (pgn, summary) = convert(&["4k3/8/8/8/8/8/8/4K3 b - - 0 7"], &mut engine, opts("", true));
    assert!(pgn.contains("7... Kd8 { p=0.22 } *"), "{pgn}");
    assert!(summary.ill_posed.is_empty());
}

#[test]
fn decisive_scores_are_not_ill_posed() {
    let mut engine = Scripted::new(&["a1a8"], Some(Score::Mate(1)));
    let (pgn, summary) = convert(&["6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"], &mut engine, opts("", true));
    assert!(pgn.contains("1. Ra8# { p=1.00 } *"), "{pgn}");
    assert!(summary.ill_posed.is_empty());
}

#[test]
fn missing_score_leaves_game_unannotated() {
    let mut engine = Scripted::new(&["e1d1"], None);
    let (pgn, summary) = convert(&[BARE_KINGS], &mut engine, opts("", true));
    assert!(pgn.contains("1. Kd1 *"));
    assert!(summary.ill_posed.is_empty());
}

#[test]
fn illegal_engine_line_aborts_the_run() {
    let mut engine = Scripted::new(&["e1e5"], Some(Score::Cp(0)));
    let mut out = Vec::new();
    let mut summary = RunSummary::default();
    let err = Converter::new(&mut engine, opts("", true))
        .run(records(&[BARE_KINGS]), 1, &mut out, &mut summary)
        .unwrap_err();
    assert!(matches!(err, ConvertError::EngineCommunication(_)));
    assert!(out.is_empty());
}
