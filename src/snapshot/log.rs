//! Reading JSON-lines snapshot logs, either whole or incrementally.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::Snapshot;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read snapshot log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid snapshot: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a complete log. Blank lines are skipped, any other bad line fails.
pub fn parse_log(contents: &str) -> Result<Vec<Snapshot>, LogError> {
    let mut snapshots = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if let Some(snapshot) = parse_line(idx + 1, line)? {
            snapshots.push(snapshot);
        }
    }
    Ok(snapshots)
}

pub fn read_log(path: &Path) -> Result<Vec<Snapshot>, LogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshots = parse_log(&contents)?;
    tracing::debug!(path = %path.display(), count = snapshots.len(), "read snapshot log");
    Ok(snapshots)
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<Snapshot>, LogError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| LogError::Parse {
            line: line_no,
            source,
        })
}

/// Result of one [`LogTail::poll`]: the snapshots completed since the last
/// poll, plus the lines that failed to parse.
#[derive(Debug, Default)]
pub struct TailBatch {
    pub snapshots: Vec<Snapshot>,
    pub errors: Vec<LogError>,
    /// The log shrank since the last poll and was reread from the start;
    /// `snapshots` belong to the new log only.
    pub restarted: bool,
}

/// Follows a log that the collector is still appending to.
///
/// Bytes after the last newline are held back until the line is complete, so
/// a record caught mid-write is never parsed.
#[derive(Debug)]
pub struct LogTail {
    path: PathBuf,
    offset: u64,
    pending: Vec<u8>,
    lines_read: usize,
}

impl LogTail {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: 0,
            pending: Vec::new(),
            lines_read: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll(&mut self) -> Result<TailBatch, LogError> {
        let (chunk, restarted) = match self.read_new_bytes() {
            Ok(read) => read,
            // Collector has not created the file yet.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TailBatch::default()),
            Err(source) => {
                return Err(LogError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.pending.extend_from_slice(&chunk);

        let mut batch = TailBatch {
            restarted,
            ..TailBatch::default()
        };
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(batch);
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        let text = String::from_utf8_lossy(&complete);

        for line in text.lines() {
            self.lines_read += 1;
            match parse_line(self.lines_read, line) {
                Ok(Some(snapshot)) => batch.snapshots.push(snapshot),
                Ok(None) => {}
                Err(e) => batch.errors.push(e),
            }
        }
        Ok(batch)
    }

    /// New bytes since the last read, and whether the file was restarted.
    fn read_new_bytes(&mut self) -> io::Result<(Vec<u8>, bool)> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        let restarted = len < self.offset;
        if restarted {
            // Truncated or replaced: start over.
            tracing::warn!(path = %self.path.display(), "snapshot log shrank, rereading from start");
            self.offset = 0;
            self.pending.clear();
            self.lines_read = 0;
        }
        file.seek(SeekFrom::Start(self.offset))?;
        let mut chunk = Vec::new();
        file.read_to_end(&mut chunk)?;
        self.offset += chunk.len() as u64;
        Ok((chunk, restarted))
    }
}
