//! Scripted UCI engines for driver and CLI tests.

#![allow(dead_code)] // not every test file uses every helper

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fenpgn::engine::EngineConfig;

pub const BARE_KINGS: &str = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
pub const EMPTY_BOARD: &str = "8/8/8/8/8/8/8/8 w - - 0 1";

/// Answers every search with `Kd1 Kd8` at score 0 and logs what it receives to `$1`.
pub const KING_SHUFFLER: &str = r#"
log="$1"
while IFS= read -r line; do
  echo "$line" >> "$log"
  case "$line" in
    uci)
      echo "id name FakeFish 1"
      echo "option name Hash type spin default 16 min 1 max 1024"
      echo "option name Threads type spin default 1 min 1 max 8"
      echo "option name Clear Hash type button"
      echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      echo "info string searching"
      echo "info depth 1 score cp 12 pv e1e2"
      echo "info depth 14 seldepth 16 multipv 1 score cp 0 nodes 4000 pv e1d1 e8d8"
      echo "bestmove e1d1 ponder e8d8" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Completes the handshake, then never answers a search, not even after `stop`.
pub const SILENT: &str = r#"
while IFS= read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Completes the handshake, then dies as soon as it is asked to search.
pub const CRASHING: &str = r#"
while IFS= read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) exit 3 ;;
  esac
done
"#;

/// Exits before saying anything.
pub const MUTE: &str = "exit 0\n";

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Engine config running `script` through `/bin/sh`, with the log file as `$1`.
pub fn sh_engine(script: &Path, log: &Path) -> EngineConfig {
    EngineConfig {
        path: PathBuf::from("/bin/sh"),
        args: vec![script.display().to_string(), log.display().to_string()],
        movetime: Duration::from_millis(20),
        io_timeout: Duration::from_secs(5),
        ..EngineConfig::default()
    }
}
