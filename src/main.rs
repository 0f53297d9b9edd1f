use anyhow::{Context, Result};
use clap::Parser;
use fenpgn::convert::read_title;
use fenpgn::engine::{EngineConfig, UciEngine, DEFAULT_ENGINE};
use fenpgn::input::PositionSource;
use fenpgn::summary::RunSummary;
use fenpgn::wdl::WdlModel;
use fenpgn::{ConvertError, ConvertOptions, Converter};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extend a list of FEN positions by engine main lines and write them as PGN", long_about = None)]
struct Args {
    /// Text file with one FEN position per line
    input: PathBuf,

    /// PGN file to write (overwritten)
    output: PathBuf,

    /// UCI engine executable
    #[arg(long, default_value = DEFAULT_ENGINE)]
    engine: PathBuf,

    /// Extra command line argument for the engine (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Analysis time per position in milliseconds
    #[arg(long, default_value_t = 1000)]
    movetime_ms: u64,

    /// Do not add the win probability comment after the engine line
    #[arg(long)]
    no_prob: bool,

    /// WDL model used for the win probability (must match the engine)
    #[arg(long, default_value_t = WdlModel::Sf16)]
    wdl_model: WdlModel,

    /// Engine Threads option
    #[arg(long)]
    threads: Option<usize>,

    /// Engine Hash option in MB
    #[arg(long)]
    hash_mb: Option<u32>,

    /// Additional UCI option as Name=Value (repeatable)
    #[arg(long = "option")]
    options: Vec<String>,

    /// How long to wait for engine output beyond the analysis time, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    io_timeout_ms: u64,

    /// Event tag for every game; skips the interactive prompt
    #[arg(long)]
    title: Option<String>,

    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let source = PositionSource::open(&args.input)?;
    let total = source.total();

    let title = match args.title.clone() {
        Some(t) => t,
        None => read_title(io::stdin().lock(), io::stdout()).context("reading title")?,
    };

    let engine_cfg = EngineConfig {
        path: args.engine.clone(),
        args: args.engine_args.clone(),
        threads: args.threads,
        hash_mb: args.hash_mb,
        options: args.options.clone(),
        movetime: Duration::from_millis(args.movetime_ms),
        io_timeout: Duration::from_millis(args.io_timeout_ms),
    };
    let opts = ConvertOptions {
        title,
        annotate: !args.no_prob,
        wdl_model: args.wdl_model,
        progress: !args.no_progress,
    };

    let mut summary = RunSummary::default();
    {
        let mut engine = UciEngine::spawn(&engine_cfg)?;
        // Only truncate the output once the engine is known to work.
        let out_file = File::create(&args.output)
            .map_err(|source| ConvertError::OutputUnwritable { path: args.output.clone(), source })?;
        let mut out = BufWriter::new(out_file);
        info!("analysing {} positions from {} with {}", total, source.path().display(), engine.name());
        let mut converter = Converter::new(&mut engine, opts);
        converter
            .run(source.records(), total, &mut out, &mut summary)
            .with_context(|| format!("writing {}", args.output.display()))?;
    }

    for line in summary.report_lines() {
        println!("{}", line);
    }

    if let Some(path) = args.summary_json.as_deref() {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
