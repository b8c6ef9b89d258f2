//! Loading and persisting codebooks.
//!
//! A [`CodebookStore`] returns a previously persisted codebook verbatim when
//! one exists. Otherwise it builds the corpus from the reference texts,
//! derives the requested codebook, persists it and returns it.
//!
//! Two kinds exist:
//! - forward: [`ForwardIndex`], used by encode;
//! - reverse: the [`Corpus`] itself, used by decode.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::builder::{CorpusBuilder, FsSources, SourceProvider};
use crate::config::CodebookConfig;
use crate::corpus::{Corpus, CorpusDocument};
use crate::error::BookCipherError;
use crate::index::ForwardIndex;

/// Byte-level access to persisted codebooks.
pub trait Storage {
    /// Returns `true` if something is stored at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads everything stored at `path`.
    fn read_all(&self, path: &Path) -> Result<Vec<u8>, BookCipherError>;

    /// Replaces whatever is stored at `path` with `bytes`.
    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<(), BookCipherError>;
}

/// Stores codebooks as files, creating parent directories on write.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>, BookCipherError> {
        fs::read(path).map_err(|e| BookCipherError::io(path, e))
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<(), BookCipherError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BookCipherError::io(parent, e))?;
        }
        fs::write(path, bytes).map_err(|e| BookCipherError::io(path, e))
    }
}

/// Keeps codebooks in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes stored at `path`.
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>, BookCipherError> {
        self.files.get(path).cloned().ok_or_else(|| {
            BookCipherError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "nothing stored"),
            )
        })
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<(), BookCipherError> {
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Either kind of codebook returned by [`CodebookStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codebook {
    /// Character → coordinates, for encoding.
    Forward(ForwardIndex),
    /// The corpus itself, for decoding.
    Reverse(Corpus),
}

impl Codebook {
    /// Returns the forward index, if this is one.
    pub fn into_forward(self) -> Option<ForwardIndex> {
        match self {
            Codebook::Forward(index) => Some(index),
            Codebook::Reverse(_) => None,
        }
    }

    /// Returns the corpus, if this is a reverse codebook.
    pub fn into_reverse(self) -> Option<Corpus> {
        match self {
            Codebook::Reverse(corpus) => Some(corpus),
            Codebook::Forward(_) => None,
        }
    }
}

/// Loads codebooks from storage or builds and persists them.
///
/// Without the corpus cache, every load that misses storage segments the
/// sources again from scratch, so loading the forward and then the reverse
/// codebook reads the sources twice.
#[derive(Debug)]
pub struct CodebookStore<S = FsStorage, P = FsSources> {
    storage: S,
    provider: P,
    builder: CorpusBuilder,
    cache_corpus: bool,
    cached: Option<(Vec<PathBuf>, Corpus)>,
}

impl CodebookStore<FsStorage, FsSources> {
    /// Creates a filesystem-backed store using the config's capacities and
    /// cache setting.
    pub fn from_config(config: &CodebookConfig) -> Result<Self, BookCipherError> {
        let builder = CorpusBuilder::new(config.capacity)?;
        Ok(CodebookStore::new(FsStorage, FsSources, builder).with_corpus_cache(config.cache_corpus))
    }
}

impl<S: Storage, P: SourceProvider> CodebookStore<S, P> {
    /// Creates a store over `storage` that reads sources through `provider`.
    pub fn new(storage: S, provider: P, builder: CorpusBuilder) -> Self {
        CodebookStore {
            storage,
            provider,
            builder,
            cache_corpus: false,
            cached: None,
        }
    }

    /// Keeps the last built corpus and reuses it for later builds from the
    /// same source list.
    pub fn with_corpus_cache(mut self, enabled: bool) -> Self {
        self.cache_corpus = enabled;
        if !enabled {
            self.cached = None;
        }
        self
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the codebook at `path`, or builds it from `sources`.
    ///
    /// With `reverse` the corpus is persisted and returned; otherwise the
    /// forward index derived from it is. `sources` are not read when a
    /// codebook already exists at `path`.
    ///
    /// # Errors
    /// Propagates unreadable sources or storage, and malformed codebooks.
    pub fn load<N: AsRef<Path>>(
        &mut self,
        path: &Path,
        sources: &[N],
        reverse: bool,
    ) -> Result<Codebook, BookCipherError> {
        if reverse {
            self.load_reverse(path, sources).map(Codebook::Reverse)
        } else {
            self.load_forward(path, sources).map(Codebook::Forward)
        }
    }

    /// Loads or builds the forward codebook.
    pub fn load_forward<N: AsRef<Path>>(
        &mut self,
        path: &Path,
        sources: &[N],
    ) -> Result<ForwardIndex, BookCipherError> {
        if self.storage.exists(path) {
            let bytes = self.storage.read_all(path)?;
            let index: ForwardIndex = serde_json::from_slice(&bytes)?;
            info!(path = %path.display(), chars = index.len(), "loaded forward codebook");
            return Ok(index);
        }
        let corpus = self.build_corpus(sources)?;
        let index = ForwardIndex::build(&corpus);
        self.persist(path, &index)?;
        info!(
            path = %path.display(),
            chars = index.len(),
            coordinates = index.total_coordinates(),
            "built forward codebook"
        );
        Ok(index)
    }

    /// Loads or builds the reverse codebook.
    pub fn load_reverse<N: AsRef<Path>>(
        &mut self,
        path: &Path,
        sources: &[N],
    ) -> Result<Corpus, BookCipherError> {
        if self.storage.exists(path) {
            let bytes = self.storage.read_all(path)?;
            let document: CorpusDocument = serde_json::from_slice(&bytes)?;
            let corpus = Corpus::try_from(document)?;
            info!(path = %path.display(), pages = corpus.num_pages(), "loaded reverse codebook");
            return Ok(corpus);
        }
        let corpus = self.build_corpus(sources)?;
        self.persist(path, &corpus)?;
        info!(path = %path.display(), pages = corpus.num_pages(), "built reverse codebook");
        Ok(corpus)
    }

    fn build_corpus<N: AsRef<Path>>(&mut self, sources: &[N]) -> Result<Corpus, BookCipherError> {
        let key: Vec<PathBuf> = sources.iter().map(|s| s.as_ref().to_path_buf()).collect();
        if let Some((cached_sources, corpus)) = &self.cached {
            if *cached_sources == key {
                debug!("reusing cached corpus");
                return Ok(corpus.clone());
            }
        }
        let corpus = self.builder.build(&self.provider, sources)?;
        if self.cache_corpus {
            self.cached = Some((key, corpus.clone()));
        }
        Ok(corpus)
    }

    fn persist<T: Serialize>(&mut self, path: &Path, value: &T) -> Result<(), BookCipherError> {
        let bytes = serde_json::to_vec(value)?;
        self.storage.write_all(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "persisted codebook");
        Ok(())
    }
}
