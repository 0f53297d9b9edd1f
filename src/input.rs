//! Position list loading (one FEN per line).

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// One input line together with its 1-based position in the file.
///
/// The sequence number doubles as the PGN `Round` of the emitted game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    pub seq: usize,
    pub text: String,
}

impl PositionRecord {
    pub fn new(seq: usize, text: impl Into<String>) -> Self {
        Self { seq, text: text.into() }
    }
}

/// An input file that has already been counted and rewound.
pub struct PositionSource {
    path: PathBuf,
    reader: BufReader<File>,
    total: usize,
}

impl PositionSource {
    pub fn open(path: &Path) -> Result<Self> {
        let unreadable = |source| ConvertError::InputUnreadable { path: path.to_path_buf(), source };
        let file = File::open(path).map_err(unreadable)?;
        let mut reader = BufReader::new(file);
        let mut total = 0usize;
        for line in (&mut reader).lines() {
            line.map_err(unreadable)?;
            total += 1;
        }
        reader.seek(SeekFrom::Start(0)).map_err(unreadable)?;
        Ok(Self { path: path.to_path_buf(), reader, total })
    }

    /// Number of records, known before the first one is read.
    pub fn total(&self) -> usize { self.total }

    pub fn path(&self) -> &Path { &self.path }

    /// Second pass over the file, in order, numbering from 1.
    pub fn records(self) -> impl Iterator<Item = Result<PositionRecord>> {
        let path = self.path;
        self.reader.lines().enumerate().map(move |(i, line)| {
            let mut text = line.map_err(|source| ConvertError::InputUnreadable { path: path.clone(), source })?;
            if text.ends_with('\r') { text.pop(); }
            Ok(PositionRecord::new(i + 1, text))
        })
    }
}
