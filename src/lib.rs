//! Book cipher codebook engine.
//!
//! Plaintext characters are encoded as coordinates `page-line-position`
//! pointing into a fixed corpus of reference texts; decoding looks the
//! coordinates back up. Every coordinate handed out by a loaded index is
//! used at most once.
//!
//! This crate has no cryptographic strength and does not try to: it is a
//! faithful classical book cipher.
//!
//! # Architecture
//!
//! ```text
//! TextSegmenter   (chars → fixed-capacity lines → fixed-capacity pages)
//!     ↑ driven across sources by
//! CorpusBuilder   (reference texts → Corpus, also the reverse index)
//!     ↓
//! ForwardIndex    (char → coordinates, in corpus order)
//!     ↓
//! CipherEngine    (encode with a RandomSource / decode against a Corpus)
//!
//! CodebookStore   (load persisted codebooks, or build + persist them)
//! ```
//!
//! # Examples
//!
//! ```
//! use bookcipher::builder::{CorpusBuilder, MemorySources};
//! use bookcipher::config::Capacity;
//! use bookcipher::{cipher, CipherEngine, ForwardIndex};
//!
//! let sources = MemorySources::new().with("moby.txt", "Call me Ishmael.\n");
//! let builder = CorpusBuilder::new(Capacity::default()).unwrap();
//! let corpus = builder.build(&sources, &["moby.txt"]).unwrap();
//!
//! let mut index = ForwardIndex::build(&corpus);
//! let mut engine = CipherEngine::with_seed(2024);
//! let tokens = engine.encode(&mut index, "meal");
//!
//! assert_eq!(cipher::decode(&corpus, &tokens).unwrap(), "meal");
//! ```

#![deny(clippy::all)]

pub mod builder;
pub mod cipher;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod menu;
pub mod random;
pub mod segmenter;
pub mod store;

pub use cipher::CipherEngine;
pub use config::{Capacity, CodebookConfig};
pub use corpus::{Coordinate, Corpus};
pub use error::BookCipherError;
pub use index::ForwardIndex;
pub use store::{Codebook, CodebookStore};
