//! Payload source port

use futures::StreamExt;
use futures::stream::BoxStream;

use crate::DiscoveryResult;

/// A lazy stream of candidate payloads.
pub type Payloads<'a> = BoxStream<'a, String>;

/// Port for anything that yields fuzzing payloads.
///
/// Every call to [`PayloadSource::payloads`] starts from the beginning, so a
/// source can be read more than once.
pub trait PayloadSource: Send + Sync {
    /// Opens the source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DiscoveryError::WordlistNotFound`] if the backing
    /// wordlist cannot be opened.
    fn payloads(&self) -> DiscoveryResult<Payloads<'_>>;
}

/// Trims a wordlist line, dropping it if nothing is left.
#[must_use]
pub fn normalize_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Payloads already held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlinePayloads {
    items: Vec<String>,
}

impl InlinePayloads {
    /// Creates a source from raw lines; they are normalized on read.
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl PayloadSource for InlinePayloads {
    fn payloads(&self) -> DiscoveryResult<Payloads<'_>> {
        let items = self.items.iter().filter_map(|item| normalize_line(item));
        Ok(futures::stream::iter(items).boxed())
    }
}
