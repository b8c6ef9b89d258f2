//! Book cipher encode and decode.
//!
//! Encoding replaces every character of the message with a randomly chosen,
//! not yet used coordinate of that character. Decoding extracts every
//! `page-line-position` pattern from the input and looks it up in the corpus.
//!
//! Tokens are joined with `-`, the same character that separates the three
//! fields of a coordinate, so decoding relies on the fixed three-field shape
//! rather than on splitting.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::corpus::{Coordinate, Corpus};
use crate::error::BookCipherError;
use crate::index::ForwardIndex;
use crate::random::{MersenneTwister, RandomSource};

/// Separator placed between encoded tokens.
pub const TOKEN_SEPARATOR: &str = "-";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+-[0-9]+-[0-9]+").expect("valid token pattern"));

/// Encoder/decoder driven by a substitutable random source.
///
/// # Examples
///
/// ```
/// use bookcipher::corpus::{Corpus, Line, Page};
/// use bookcipher::index::ForwardIndex;
/// use bookcipher::random::MersenneTwister;
/// use bookcipher::CipherEngine;
///
/// let corpus = Corpus::from(vec![Page::from(vec![Line::from("hello world ")])]);
/// let mut index = ForwardIndex::build(&corpus);
/// let mut engine = CipherEngine::new(MersenneTwister::with_seed(1));
///
/// let tokens = engine.encode(&mut index, "low");
/// assert_eq!(engine.decode(&corpus, &tokens).unwrap(), "low");
/// ```
#[derive(Debug)]
pub struct CipherEngine<R = MersenneTwister> {
    rng: R,
}

impl CipherEngine<MersenneTwister> {
    /// Creates an engine backed by a clock-seeded Mersenne Twister.
    pub fn from_entropy() -> Self {
        CipherEngine::new(MersenneTwister::from_entropy())
    }

    /// Creates an engine backed by a Mersenne Twister with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        CipherEngine::new(MersenneTwister::with_seed(seed))
    }
}

impl<R: RandomSource> CipherEngine<R> {
    /// Creates an engine drawing from `rng`.
    pub fn new(rng: R) -> Self {
        CipherEngine { rng }
    }

    /// Encodes `message` into coordinates, consuming them from `index`.
    ///
    /// Characters with no remaining coordinate are skipped without error.
    pub fn encode_coordinates(
        &mut self,
        index: &mut ForwardIndex,
        message: &str,
    ) -> Vec<Coordinate> {
        let mut coordinates = Vec::with_capacity(message.len());
        for c in message.chars() {
            match index.take_random(c, &mut self.rng) {
                Some(coordinate) => coordinates.push(coordinate),
                None => trace!(character = ?c, "no coordinate left, skipping"),
            }
        }
        coordinates
    }

    /// Encodes `message` into a `-`-joined token string.
    ///
    /// Consumption is cumulative: a coordinate handed out here is never
    /// handed out again by the same `index`.
    pub fn encode(&mut self, index: &mut ForwardIndex, message: &str) -> String {
        self.encode_coordinates(index, message)
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join(TOKEN_SEPARATOR)
    }

    /// Returns the random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R> CipherEngine<R> {
    /// Decodes `text` against `corpus`; see [`decode`].
    pub fn decode(&self, corpus: &Corpus, text: &str) -> Result<String, BookCipherError> {
        decode(corpus, text)
    }
}

/// Iterates every `digits-digits-digits` token in `text`, leftmost first,
/// without overlap. Anything else is ignored.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Decodes every coordinate token in `text` against `corpus`.
///
/// Input without any token decodes to an empty string. Only ASCII digits
/// form a token.
///
/// # Errors
/// Returns [`BookCipherError::CoordinateNotFound`] for the first token
/// naming a page, line or position outside the corpus. No partial output
/// is returned.
pub fn decode(corpus: &Corpus, text: &str) -> Result<String, BookCipherError> {
    tokens(text)
        .map(|token| {
            let coordinate: Coordinate = token
                .parse()
                .map_err(|_| BookCipherError::CoordinateNotFound(token.to_string()))?;
            corpus.lookup(&coordinate)
        })
        .collect()
}
