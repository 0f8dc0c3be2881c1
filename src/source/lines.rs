//! Newline-delimited JSON job source.

use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::job::Job;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct WireJob {
    tube: String,
    #[serde(default)]
    body: String,
}

/// Reads jobs from an async line stream such as stdin.
pub struct LineSource<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Next job, or `None` at end of input.
    ///
    /// Cancel safe: a job is only lost if cancelled after its line was read.
    pub async fn next_job(&mut self) -> Result<Option<Job>, SourceError> {
        while let Some(text) = self.lines.next_line().await? {
            self.line += 1;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            let wire: WireJob = serde_json::from_str(text).map_err(|source| SourceError::Decode {
                line: self.line,
                source,
            })?;
            return Ok(Some(Job::new(wire.tube, wire.body)));
        }
        Ok(None)
    }

    /// Lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R> std::fmt::Debug for LineSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource").field("line", &self.line).finish()
    }
}
