//! Corpus construction from named source texts.
//!
//! [`CorpusBuilder`] drives one [`TextSegmenter`] across every source in
//! order. The segmenter is not reset between sources, so a line or page may
//! straddle two texts; the trailing partial line and page are flushed once,
//! after the last source.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Capacity;
use crate::corpus::Corpus;
use crate::error::BookCipherError;
use crate::segmenter::TextSegmenter;

/// Byte-order mark tolerated at the start of a source text.
const BOM: char = '\u{feff}';

/// Supplies the full text of a named source.
pub trait SourceProvider {
    /// Returns the complete decoded text of `source`.
    fn read_source(&self, source: &Path) -> Result<String, BookCipherError>;
}

/// Reads sources as UTF-8 files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSources;

impl SourceProvider for FsSources {
    fn read_source(&self, source: &Path) -> Result<String, BookCipherError> {
        let mut text =
            fs::read_to_string(source).map_err(|e| BookCipherError::io(source, e))?;
        if text.starts_with(BOM) {
            text.replace_range(..BOM.len_utf8(), "");
        }
        Ok(text)
    }
}

/// In-memory sources keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    texts: HashMap<PathBuf, String>,
}

impl MemorySources {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `text` under `source`, replacing any previous text.
    pub fn insert(&mut self, source: impl Into<PathBuf>, text: impl Into<String>) {
        self.texts.insert(source.into(), text.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(source, text);
        self
    }
}

impl SourceProvider for MemorySources {
    fn read_source(&self, source: &Path) -> Result<String, BookCipherError> {
        self.texts
            .get(source)
            .map(|text| text.strip_prefix(BOM).unwrap_or(text).to_string())
            .ok_or_else(|| {
                BookCipherError::io(
                    source,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "source not registered"),
                )
            })
    }
}

/// Builds a [`Corpus`] by segmenting sources in argument order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusBuilder {
    capacity: Capacity,
}

impl CorpusBuilder {
    /// Creates a builder with the given capacities.
    ///
    /// # Errors
    /// Returns [`BookCipherError::InvalidCapacity`] if either capacity is zero.
    pub fn new(capacity: Capacity) -> Result<Self, BookCipherError> {
        capacity.validate()?;
        Ok(CorpusBuilder { capacity })
    }

    /// Returns the capacities used for segmentation.
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Reads every source through `provider` and segments them as one stream.
    ///
    /// # Errors
    /// Propagates the first source that cannot be read; nothing is retried.
    pub fn build<P, S>(&self, provider: &P, sources: &[S]) -> Result<Corpus, BookCipherError>
    where
        P: SourceProvider + ?Sized,
        S: AsRef<Path>,
    {
        let mut segmenter = TextSegmenter::new(self.capacity)?;
        for source in sources {
            let source = source.as_ref();
            let text = provider.read_source(source)?;
            segmenter.feed_text(&text);
            debug!(
                source = %source.display(),
                bytes = text.len(),
                pages_completed = segmenter.pages_completed(),
                "segmented source"
            );
        }
        let corpus = segmenter.finish();
        info!(
            sources = sources.len(),
            pages = corpus.num_pages(),
            chars = corpus.char_count(),
            "built corpus"
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Coordinate;

    fn builder() -> CorpusBuilder {
        CorpusBuilder::new(Capacity::new(4, 2).unwrap()).unwrap()
    }

    #[test]
    fn test_sources_are_concatenated_without_reset() {
        let provider = MemorySources::new().with("a", "ab").with("b", "cd");
        let corpus = builder().build(&provider, &["a", "b"]).unwrap();
        // "ab " + "cd " = 6 chars: the first line spans both sources.
        let page = corpus.page(1).unwrap();
        assert_eq!(page.line(1).unwrap().to_string(), "ab c");
        assert_eq!(page.line(2).unwrap().to_string(), "d ");
        assert_eq!(corpus.num_pages(), 1);
    }

    #[test]
    fn test_source_order_matters() {
        let provider = MemorySources::new().with("a", "ab").with("b", "cd");
        let forward = builder().build(&provider, &["a", "b"]).unwrap();
        let backward = builder().build(&provider, &["b", "a"]).unwrap();
        assert_eq!(forward.char_at(&Coordinate::new(1, 1, 0)), Some('a'));
        assert_eq!(backward.char_at(&Coordinate::new(1, 1, 0)), Some('c'));
    }

    #[test]
    fn test_missing_source_propagates() {
        let provider = MemorySources::new().with("a", "ab");
        let result = builder().build(&provider, &["a", "missing"]);
        assert!(matches!(result, Err(BookCipherError::Io { .. })));
    }

    #[test]
    fn test_bom_is_stripped() {
        let provider = MemorySources::new().with("a", "\u{feff}xy");
        let corpus = builder().build(&provider, &["a"]).unwrap();
        assert_eq!(corpus.char_at(&Coordinate::new(1, 1, 0)), Some('x'));
    }

    #[test]
    fn test_fs_sources_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        fs::write(&path, "\u{feff}Call me Ishmael.\n").unwrap();
        let text = FsSources.read_source(&path).unwrap();
        assert_eq!(text, "Call me Ishmael.\n");
    }

    #[test]
    fn test_fs_sources_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsSources.read_source(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(BookCipherError::Io { .. })));
    }

    #[test]
    fn test_no_sources_builds_empty_corpus() {
        let sources: [&str; 0] = [];
        let corpus = builder().build(&MemorySources::new(), &sources).unwrap();
        assert!(corpus.is_empty());
    }
}
