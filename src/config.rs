//! Codebook configuration.
//!
//! Holds the segmentation capacities, the reference texts and the storage
//! locations of both codebooks. Configuration files are JSON; every field is
//! optional and falls back to the reference setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BookCipherError;

/// Default number of characters per line.
pub const LINE_CAPACITY: usize = 128;

/// Default number of lines per page.
pub const PAGE_CAPACITY: usize = 64;

/// Fixed segmentation capacities for lines and pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacity {
    /// Characters per line.
    pub line: usize,
    /// Lines per page.
    pub page: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity {
            line: LINE_CAPACITY,
            page: PAGE_CAPACITY,
        }
    }
}

impl Capacity {
    /// Creates a capacity pair.
    ///
    /// # Errors
    /// Returns [`BookCipherError::InvalidCapacity`] if either value is zero.
    pub fn new(line: usize, page: usize) -> Result<Self, BookCipherError> {
        let capacity = Capacity { line, page };
        capacity.validate()?;
        Ok(capacity)
    }

    /// Checks that both capacities are non-zero.
    pub fn validate(&self) -> Result<(), BookCipherError> {
        if self.line == 0 || self.page == 0 {
            return Err(BookCipherError::InvalidCapacity);
        }
        Ok(())
    }
}

/// Where the codebooks live and what they are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodebookConfig {
    /// Reference texts, concatenated in this order.
    pub sources: Vec<PathBuf>,
    /// Forward codebook (character → coordinates).
    pub codebook_path: PathBuf,
    /// Reverse codebook (the corpus itself).
    pub reverse_codebook_path: PathBuf,
    /// Segmentation capacities.
    pub capacity: Capacity,
    /// Reuse one built corpus for both codebooks within a process.
    pub cache_corpus: bool,
    /// Seed for coordinate selection; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for CodebookConfig {
    fn default() -> Self {
        CodebookConfig {
            sources: vec![
                PathBuf::from("books/War_and_Peace.txt"),
                PathBuf::from("books/Moby_Dick.txt"),
                PathBuf::from("books/Dracula.txt"),
            ],
            codebook_path: PathBuf::from("code_books/dmdwp.txt"),
            reverse_codebook_path: PathBuf::from("code_books/dmdwp_r.txt"),
            capacity: Capacity::default(),
            cache_corpus: false,
            seed: None,
        }
    }
}

impl CodebookConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, a serialization error
    /// if it is not valid JSON, or [`BookCipherError::InvalidCapacity`].
    pub fn from_file(path: &Path) -> Result<Self, BookCipherError> {
        let text = fs::read_to_string(path).map_err(|e| BookCipherError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, BookCipherError> {
        let config: CodebookConfig = serde_json::from_str(text)?;
        config.capacity.validate()?;
        Ok(config)
    }
}
