//! Paginated corpus model and coordinates.
//!
//! A [`Corpus`] is the page → line → character structure built from the
//! reference texts. Pages and lines are numbered from 1, positions within a
//! line from 0. A [`Coordinate`] names exactly one character occurrence and
//! is written as `"{page}-{line}-{position}"`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::BookCipherError;

/// Persisted shape of a reverse codebook: page → line → line text.
pub type CorpusDocument = BTreeMap<usize, BTreeMap<usize, String>>;

/// Location of a single character occurrence inside a [`Corpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    /// Page number, starting at 1.
    pub page: usize,
    /// Line number within the page, starting at 1.
    pub line: usize,
    /// Character position within the line, starting at 0.
    pub position: usize,
}

impl Coordinate {
    /// Creates a coordinate from its three components.
    pub fn new(page: usize, line: usize, position: usize) -> Self {
        Coordinate {
            page,
            line,
            position,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.page, self.line, self.position)
    }
}

impl FromStr for Coordinate {
    type Err = BookCipherError;

    /// Parses exactly three dash-separated decimal fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BookCipherError::MalformedCoordinate(s.to_string());
        let mut fields = s.split('-').map(|field| {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            field.parse::<usize>().map_err(|_| malformed())
        });
        let page = fields.next().ok_or_else(malformed)??;
        let line = fields.next().ok_or_else(malformed)??;
        let position = fields.next().ok_or_else(malformed)??;
        if fields.next().is_some() {
            return Err(malformed());
        }
        Ok(Coordinate::new(page, line, position))
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// One line of the corpus: at most `line` capacity characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chars: Vec<char>,
}

impl Line {
    /// Returns the number of characters in the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if the line holds no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns the character at `position`, if any.
    pub fn get(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    /// Returns the characters of the line in position order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl From<Vec<char>> for Line {
    fn from(chars: Vec<char>) -> Self {
        Line { chars }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line {
            chars: text.chars().collect(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One page of the corpus: at most `page` capacity lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    lines: Vec<Line>,
}

impl Page {
    /// Returns the number of lines on the page.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the page holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns line `number` (1-based).
    pub fn line(&self, number: usize) -> Option<&Line> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Iterates `(line_number, line)` in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &Line)> {
        self.lines.iter().enumerate().map(|(i, line)| (i + 1, line))
    }
}

impl From<Vec<Line>> for Page {
    fn from(lines: Vec<Line>) -> Self {
        Page { lines }
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.lines())
    }
}

/// The full paginated character structure, also used as the reverse index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pages: Vec<Page>,
}

impl Corpus {
    /// Returns the number of pages.
    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if no text was segmented into the corpus.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns page `number` (1-based).
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Iterates `(page_number, page)` in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = (usize, &Page)> {
        self.pages.iter().enumerate().map(|(i, page)| (i + 1, page))
    }

    /// Returns the character stored at `coordinate`, if it exists.
    pub fn char_at(&self, coordinate: &Coordinate) -> Option<char> {
        self.page(coordinate.page)?
            .line(coordinate.line)?
            .get(coordinate.position)
    }

    /// Returns the character at `coordinate` or a lookup error.
    pub fn lookup(&self, coordinate: &Coordinate) -> Result<char, BookCipherError> {
        self.char_at(coordinate)
            .ok_or_else(|| BookCipherError::CoordinateNotFound(coordinate.to_string()))
    }

    /// Iterates every character with its coordinate in traversal order:
    /// page ascending, then line, then position.
    pub fn occurrences(&self) -> impl Iterator<Item = (Coordinate, char)> + '_ {
        self.pages().flat_map(|(page_no, page)| {
            page.lines().flat_map(move |(line_no, line)| {
                line.chars()
                    .iter()
                    .enumerate()
                    .map(move |(pos, &c)| (Coordinate::new(page_no, line_no, pos), c))
            })
        })
    }

    /// Total number of characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .map(Line::len)
            .sum()
    }

    pub(crate) fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }
}

impl From<Vec<Page>> for Corpus {
    fn from(pages: Vec<Page>) -> Self {
        Corpus { pages }
    }
}

impl Serialize for Corpus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.pages())
    }
}

impl TryFrom<CorpusDocument> for Corpus {
    type Error = BookCipherError;

    /// Rebuilds a corpus from its persisted form, requiring pages and lines
    /// to be numbered contiguously from 1.
    fn try_from(document: CorpusDocument) -> Result<Self, Self::Error> {
        let mut pages = Vec::with_capacity(document.len());
        for (expected_page, (page_no, lines)) in (1..).zip(document) {
            if page_no != expected_page {
                return Err(BookCipherError::InvalidCorpus(format!(
                    "expected page {} but found page {}",
                    expected_page, page_no
                )));
            }
            let mut page_lines = Vec::with_capacity(lines.len());
            for (expected_line, (line_no, text)) in (1..).zip(lines) {
                if line_no != expected_line {
                    return Err(BookCipherError::InvalidCorpus(format!(
                        "page {}: expected line {} but found line {}",
                        page_no, expected_line, line_no
                    )));
                }
                page_lines.push(Line::from(text.as_str()));
            }
            pages.push(Page::from(page_lines));
        }
        Ok(Corpus::from(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Corpus {
        Corpus::from(vec![
            Page::from(vec![Line::from("ab c"), Line::from("d ef")]),
            Page::from(vec![Line::from(" ")]),
        ])
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(12, 3, 0).to_string(), "12-3-0");
    }

    #[test]
    fn test_coordinate_parse() {
        let coord: Coordinate = "7-64-127".parse().unwrap();
        assert_eq!(coord, Coordinate::new(7, 64, 127));
    }

    #[test]
    fn test_coordinate_parse_rejects_malformed() {
        for text in ["", "1-2", "1-2-3-4", "1--3", "a-2-3", "+1-2-3", " 1-2-3"] {
            assert!(
                matches!(
                    text.parse::<Coordinate>(),
                    Err(BookCipherError::MalformedCoordinate(_))
                ),
                "'{}' should not parse",
                text
            );
        }
    }

    #[test]
    fn test_lookup_uses_one_based_pages_and_lines() {
        let corpus = sample();
        assert_eq!(corpus.char_at(&Coordinate::new(1, 1, 0)), Some('a'));
        assert_eq!(corpus.char_at(&Coordinate::new(1, 2, 3)), Some('f'));
        assert_eq!(corpus.char_at(&Coordinate::new(2, 1, 0)), Some(' '));
        assert_eq!(corpus.char_at(&Coordinate::new(0, 1, 0)), None);
        assert_eq!(corpus.char_at(&Coordinate::new(1, 0, 0)), None);
        assert_eq!(corpus.char_at(&Coordinate::new(1, 1, 4)), None);
        assert_eq!(corpus.char_at(&Coordinate::new(3, 1, 0)), None);
    }

    #[test]
    fn test_lookup_error_names_coordinate() {
        let err = sample().lookup(&Coordinate::new(9, 9, 9)).unwrap_err();
        assert!(matches!(err, BookCipherError::CoordinateNotFound(ref c) if c == "9-9-9"));
    }

    #[test]
    fn test_occurrences_traversal_order() {
        let coords: Vec<String> = sample()
            .occurrences()
            .map(|(coord, _)| coord.to_string())
            .collect();
        assert_eq!(
            coords,
            vec!["1-1-0", "1-1-1", "1-1-2", "1-1-3", "1-2-0", "1-2-1", "1-2-2", "1-2-3", "2-1-0"]
        );
        assert_eq!(sample().char_count(), 9);
    }

    #[test]
    fn test_serialize_reverse_document() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"1":{"1":"ab c","2":"d ef"},"2":{"1":" "}}"#);
    }

    #[test]
    fn test_document_round_trip() {
        let json = serde_json::to_string(&sample()).unwrap();
        let document: CorpusDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(Corpus::try_from(document).unwrap(), sample());
    }

    #[test]
    fn test_document_with_page_gap_is_rejected() {
        let document: CorpusDocument =
            serde_json::from_str(r#"{"1":{"1":"ab"},"3":{"1":"cd"}}"#).unwrap();
        assert!(matches!(
            Corpus::try_from(document),
            Err(BookCipherError::InvalidCorpus(_))
        ));
    }

    #[test]
    fn test_document_with_line_gap_is_rejected() {
        let document: CorpusDocument =
            serde_json::from_str(r#"{"1":{"2":"ab"}}"#).unwrap();
        assert!(matches!(
            Corpus::try_from(document),
            Err(BookCipherError::InvalidCorpus(_))
        ));
    }

    #[test]
    fn test_coordinate_serde_as_string() {
        let coord = Coordinate::new(3, 2, 1);
        assert_eq!(serde_json::to_string(&coord).unwrap(), "\"3-2-1\"");
        let back: Coordinate = serde_json::from_str("\"3-2-1\"").unwrap();
        assert_eq!(back, coord);
        assert!(serde_json::from_str::<Coordinate>("\"3-2\"").is_err());
    }
}
