//! Line buffer — the text shown on screen, one entry per line.
//!
//! Read-only from the editor's point of view: lines are appended while
//! loading and never changed afterwards. Line terminators (`\n`, `\r\n`) are
//! not stored.
//!
//! # Loading
//!
//! [`LineBuffer::load`] reads a file lazily, line by line. By default only
//! the first line is kept ([`LoadMode::FirstLine`]); [`LoadMode::AllLines`]
//! keeps every line. A missing or unreadable file is an error for the
//! caller to report; the editor itself runs fine on an empty buffer.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// How much of a file [`LineBuffer::load`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LoadMode {
    /// Only the first line.
    #[default]
    FirstLine,
    /// Every line, in file order.
    AllLines,
}

/// A file could not be loaded.
#[derive(Debug, Error)]
#[error("cannot read {}: {source}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Ordered, append-only sequence of text lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// An empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Load a file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be opened, or a line that
    /// is kept cannot be read (I/O failure or invalid UTF-8).
    pub fn load(path: &Path, mode: LoadMode) -> Result<Self, LoadError> {
        let wrap = |source| LoadError {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(wrap)?;
        let buf = Self::from_reader(BufReader::new(file), mode).map_err(wrap)?;

        debug!(path = %path.display(), ?mode, lines = buf.len(), "loaded file");
        Ok(buf)
    }

    /// Read lines from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns the first read error among the lines that are kept.
    pub fn from_reader(reader: impl BufRead, mode: LoadMode) -> io::Result<Self> {
        let limit = match mode {
            LoadMode::FirstLine => 1,
            LoadMode::AllLines => usize::MAX,
        };

        let mut buf = Self::new();
        for line in reader.lines().take(limit) {
            buf.push(line?);
        }
        Ok(buf)
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The line at `index`, if any.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LineBuffer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}
