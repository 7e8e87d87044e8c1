//! Newline-delimited wordlist files.

use std::fs::File;
use std::path::{Path, PathBuf};

use apihawk_application::{DiscoveryError, DiscoveryResult, PayloadSource, Payloads, normalize_line};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Payload source reading one payload per line from a file.
///
/// The file is opened on every call to [`PayloadSource::payloads`] and read
/// lazily through `tokio::fs`, so large wordlists never sit in memory and
/// reads stay off the async workers. Lines are
/// split on `\n`; a trailing `\r` is trimmed along with other whitespace and
/// bytes that are not valid UTF-8 are replaced. Reading stops at the first
/// I/O error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWordlist {
    path: PathBuf,
}

impl FileWordlist {
    /// Creates a source for the wordlist at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the wordlist.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> DiscoveryResult<File> {
        let not_found = |source| DiscoveryError::WordlistNotFound {
            path: self.path.clone(),
            source,
        };
        let file = File::open(&self.path).map_err(not_found)?;
        if file.metadata().map_err(not_found)?.is_dir() {
            return Err(not_found(std::io::ErrorKind::IsADirectory.into()));
        }
        Ok(file)
    }
}

impl PayloadSource for FileWordlist {
    fn payloads(&self) -> DiscoveryResult<Payloads<'_>> {
        let lines = BufReader::new(tokio::fs::File::from_std(self.open()?)).split(b'\n');
        Ok(futures::stream::unfold(lines, |mut lines| async move {
            while let Ok(Some(line)) = lines.next_segment().await {
                if let Some(payload) = normalize_line(&String::from_utf8_lossy(&line)) {
                    return Some((payload, lines));
                }
            }
            None
        })
        .boxed())
    }
}
