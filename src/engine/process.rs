use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::{ConvertError, Result};

use super::info::InfoSnapshot;
use super::{AnalysisResult, Analyser, EngineConfig};

pub const ENGINE_QUIT_TIMEOUT: Duration = Duration::from_millis(300);
pub const ENGINE_QUIT_POLL_INTERVAL: Duration = Duration::from_millis(10);
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A running UCI engine.
///
/// The process lives as long as this value: dropping it sends `quit` and,
/// if the engine lingers, kills it.
pub struct UciEngine {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    rx: Receiver<String>,
    opt_names: HashSet<String>,
    name: String,
    movetime: Duration,
    io_timeout: Duration,
}

impl UciEngine {
    pub fn spawn(cfg: &EngineConfig) -> Result<Self> {
        let startup = |reason: String| ConvertError::EngineStartup { path: cfg.path.clone(), reason };
        let mut child = Command::new(&cfg.path)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| startup(e.to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| startup("no stdin".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| startup("no stdout".into()))?;
        let (tx, rx) = mpsc::channel::<String>();
        std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(l) => {
                        if tx.send(l).is_err() { break; }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut engine = Self {
            child,
            stdin: BufWriter::new(stdin),
            rx,
            opt_names: HashSet::new(),
            name: cfg.path.display().to_string(),
            movetime: cfg.movetime,
            io_timeout: cfg.io_timeout,
        };
        engine.initialize(cfg).map_err(|e| startup(e.to_string()))?;
        info!("engine '{}' ready ({} options)", engine.name, engine.opt_names.len());
        Ok(engine)
    }

    fn initialize(&mut self, cfg: &EngineConfig) -> Result<()> {
        self.write_line("uci")?;
        loop {
            let line = self.recv_line(self.io_timeout)?;
            if let Some(rest) = line.strip_prefix("id name ") {
                self.name = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("option ") {
                if let Some(name) = parse_option_name(rest) { self.opt_names.insert(name); }
            } else if line.trim() == "uciok" {
                break;
            }
        }
        if let Some(t) = cfg.threads {
            self.set_option_if_available("Threads", &t.to_string())?;
        }
        if let Some(h) = cfg.hash_mb {
            self.set_option_if_available("Hash", &h.to_string())?;
        }
        for opt in &cfg.options {
            match opt.split_once('=') {
                Some((name, value)) => self.set_option_if_available(name.trim(), value.trim())?,
                // Button options carry no value.
                None => self.write_line(&format!("setoption name {}", opt.trim()))?,
            }
        }
        self.sync_ready()?;
        self.write_line("ucinewgame")?;
        self.sync_ready()
    }

    /// Engine name as announced by `id name`, or the executable path.
    pub fn name(&self) -> &str { &self.name }

    pub fn sync_ready(&mut self) -> Result<()> {
        self.write_line("isready")?;
        loop {
            let line = self.recv_line(self.io_timeout)?;
            if line.trim() == "readyok" { return Ok(()); }
        }
    }

    pub fn recv_line(&self, timeout: Duration) -> Result<String> {
        match self.rx.recv_timeout(timeout) {
            Ok(line) => {
                debug!("{} >> {}", self.name, line);
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(ConvertError::EngineTimeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ConvertError::EngineCommunication(format!("{}: engine exited unexpectedly", self.name)))
            }
        }
    }

    pub fn set_option_if_available(&mut self, name: &str, value: &str) -> Result<()> {
        if self.opt_names.is_empty() || self.opt_names.contains(name) {
            self.write_line(&format!("setoption name {} value {}", name, value))?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, msg: &str) -> Result<()> {
        debug!("{} << {}", self.name, msg);
        let name = &self.name;
        let broken = |e: std::io::Error| ConvertError::EngineCommunication(format!("{name}: write failed: {e}"));
        self.stdin.write_all(msg.as_bytes()).map_err(broken)?;
        self.stdin.write_all(b"\n").map_err(broken)?;
        self.stdin.flush().map_err(broken)
    }
}

impl Analyser for UciEngine {
    /// Search `fen` for the configured movetime.
    ///
    /// The engine gets `io_timeout` of slack past the movetime; after that it
    /// is told to `stop`, and if `bestmove` still does not arrive within
    /// another `io_timeout` the run fails.
    fn analyse(&mut self, fen: &str) -> Result<AnalysisResult> {
        self.write_line(&format!("position fen {fen}"))?;
        self.write_line(&format!("go movetime {}", self.movetime.as_millis()))?;

        let mut deadline = deadline_after(self.movetime.saturating_add(self.io_timeout));
        let mut stop_sent = false;
        let mut snapshot = InfoSnapshot::default();
        loop {
            let now = Instant::now();
            if now >= deadline {
                if stop_sent {
                    let waited = self.movetime.saturating_add(self.io_timeout.saturating_mul(2));
                    return Err(ConvertError::EngineTimeout(waited));
                }
                self.write_line("stop")?;
                stop_sent = true;
                deadline = deadline_after(self.io_timeout);
                continue;
            }
            let line = match self.recv_line(deadline - now) {
                Ok(line) => line,
                Err(ConvertError::EngineTimeout(_)) => continue,
                Err(e) => return Err(e),
            };
            if line.starts_with("info") {
                snapshot.update_from_line(&line);
            } else if let Some(rest) = line.strip_prefix("bestmove") {
                return Ok(snapshot.finish(rest));
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.write_line("quit");
        let deadline = Instant::now() + ENGINE_QUIT_TIMEOUT;
        while Instant::now() < deadline {
            if let Ok(Some(_)) = self.child.try_wait() { return; }
            std::thread::sleep(ENGINE_QUIT_POLL_INTERVAL);
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// `now + after`, or a year from now when that is not representable.
fn deadline_after(after: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(after).unwrap_or_else(|| now + FAR_FUTURE)
}

pub fn parse_option_name(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace().peekable();
    while let Some(tok) = tokens.next() {
        if tok == "name" {
            let mut parts = Vec::new();
            while let Some(next) = tokens.next_if(|t| *t != "type") {
                parts.push(next);
            }
            if !parts.is_empty() { return Some(parts.join(" ")); }
        }
    }
    None
}
