//! Writing rendered exports to disk or stdout.

use crate::error::{CliError, Result};
use hrops_export::{ExportResponse, ResponseSink};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where a response ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Written {
    /// File path, or `None` when the body went to stdout.
    pub path: Option<PathBuf>,
    pub content_type: &'static str,
    pub bytes: usize,
}

/// Sink that writes attachments into a directory.
///
/// Inline responses (the HTML preview) go to stdout unless a directory was
/// given, in which case they are saved as `<filename>.html`. Write failures
/// are held until [`FileSink::finish`].
#[derive(Debug)]
pub struct FileSink<W: Write> {
    dir: Option<PathBuf>,
    inline_name: String,
    stdout: W,
    written: Vec<Written>,
    error: Option<CliError>,
}

impl FileSink<std::io::Stdout> {
    pub fn new(dir: Option<PathBuf>, filename: &str) -> Self {
        Self::with_stdout(dir, filename, std::io::stdout())
    }
}

impl<W: Write> FileSink<W> {
    pub fn with_stdout(dir: Option<PathBuf>, filename: &str, stdout: W) -> Self {
        Self {
            dir,
            inline_name: format!("{}.html", filename),
            stdout,
            written: Vec::new(),
            error: None,
        }
    }

    /// Everything written, or the first failure.
    pub fn finish(self) -> Result<Vec<Written>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.written),
        }
    }

    fn write(&mut self, response: &ExportResponse) -> Result<Option<PathBuf>> {
        let name = match (&response.attachment, &self.dir) {
            (Some(name), _) => name.clone(),
            (None, Some(_)) => self.inline_name.clone(),
            (None, None) => {
                self.stdout
                    .write_all(&response.body)
                    .and_then(|()| self.stdout.flush())
                    .map_err(|source| CliError::Write {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })?;
                return Ok(None);
            }
        };

        let dir = self.dir.as_deref().unwrap_or(Path::new("."));
        let path = dir.join(name);
        std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::write(&path, &response.body))
            .map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path))
    }
}

impl<W: Write> ResponseSink for FileSink<W> {
    fn send(&mut self, response: ExportResponse) {
        if self.error.is_some() {
            return;
        }
        match self.write(&response) {
            Ok(path) => {
                if let Some(path) = &path {
                    info!(path = %path.display(), bytes = response.body.len(), "Wrote export");
                }
                self.written.push(Written {
                    path,
                    content_type: response.content_type,
                    bytes: response.body.len(),
                });
            }
            Err(err) => self.error = Some(err),
        }
    }
}
