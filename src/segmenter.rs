//! Text cleaning and fixed-capacity segmentation.
//!
//! Characters are accumulated into lines of exactly `capacity.line`
//! characters; full lines are accumulated into pages of exactly
//! `capacity.page` lines. Line numbering restarts on every page. Whatever is
//! left in the buffers when input ends is flushed by [`TextSegmenter::finish`].

use std::mem;

use crate::config::Capacity;
use crate::corpus::{Corpus, Line, Page};
use crate::error::BookCipherError;

/// Cleans one raw source line.
///
/// Strips surrounding whitespace, removes every `-`, then appends a single
/// space so that source line breaks become spaces in the corpus. Returns
/// `None` for lines that are blank after cleaning.
///
/// # Examples
///
/// ```
/// use bookcipher::segmenter::clean_line;
///
/// assert_eq!(clean_line("  well-known\n").as_deref(), Some("wellknown "));
/// assert_eq!(clean_line(" -- ").as_deref(), None);
/// ```
pub fn clean_line(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim().replace('-', "");
    cleaned.push(' ');
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Incremental builder of a [`Corpus`] from a character stream.
///
/// State (the partial line, the partial page and the finished pages) lives
/// in the segmenter, so feeding several texts one after another continues
/// the same page and line.
#[derive(Debug)]
pub struct TextSegmenter {
    capacity: Capacity,
    line_buf: Vec<char>,
    page_buf: Vec<Line>,
    corpus: Corpus,
}

impl TextSegmenter {
    /// Creates an empty segmenter.
    ///
    /// # Errors
    /// Returns [`BookCipherError::InvalidCapacity`] if either capacity is zero.
    pub fn new(capacity: Capacity) -> Result<Self, BookCipherError> {
        capacity.validate()?;
        Ok(TextSegmenter {
            capacity,
            line_buf: Vec::with_capacity(capacity.line),
            page_buf: Vec::with_capacity(capacity.page),
            corpus: Corpus::default(),
        })
    }

    /// Appends one already-cleaned character.
    pub fn feed(&mut self, c: char) {
        self.line_buf.push(c);
        if self.line_buf.len() == self.capacity.line {
            self.flush_line();
        }
    }

    /// Cleans a raw source line and feeds its characters. Blank lines are
    /// skipped entirely.
    pub fn feed_line(&mut self, raw: &str) {
        if let Some(cleaned) = clean_line(raw) {
            cleaned.chars().for_each(|c| self.feed(c));
        }
    }

    /// Feeds every line of a source text. `\n`, `\r\n` and a lone `\r` all
    /// end a line.
    pub fn feed_text(&mut self, text: &str) {
        text.split(['\n', '\r']).for_each(|line| self.feed_line(line));
    }

    /// Number of completed pages so far.
    pub fn pages_completed(&self) -> usize {
        self.corpus.num_pages()
    }

    /// Flushes a non-empty partial line and page and returns the corpus.
    pub fn finish(mut self) -> Corpus {
        if !self.line_buf.is_empty() {
            self.flush_line();
        }
        if !self.page_buf.is_empty() {
            self.flush_page();
        }
        self.corpus
    }

    fn flush_line(&mut self) {
        let chars = mem::replace(&mut self.line_buf, Vec::with_capacity(self.capacity.line));
        self.page_buf.push(Line::from(chars));
        if self.page_buf.len() == self.capacity.page {
            self.flush_page();
        }
    }

    fn flush_page(&mut self) {
        let lines = mem::replace(&mut self.page_buf, Vec::with_capacity(self.capacity.page));
        self.corpus.push_page(Page::from(lines));
    }
}
