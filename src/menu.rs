//! Interactive encrypt/decrypt menu.
//!
//! The forward codebook is loaded on the first encryption and kept for the
//! rest of the session, so coordinates consumed by one encryption are never
//! handed out by a later one. The reverse codebook is loaded on the first
//! decryption.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::warn;

use crate::builder::SourceProvider;
use crate::cipher::{self, CipherEngine};
use crate::config::CodebookConfig;
use crate::corpus::Corpus;
use crate::error::BookCipherError;
use crate::index::ForwardIndex;
use crate::random::RandomSource;
use crate::store::{CodebookStore, Storage};

const MENU: &str = "1). Encrypt\n2). Decrypt\n3). Quit\n\n";
const SELECTION_PROMPT: &str = "Make a selection [1,2,3]: ";
const MESSAGE_PROMPT: &str = "Please enter your secret message: ";
const CIPHER_PROMPT: &str = "Please enter your cipher text: ";

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Encode a message.
    Encrypt,
    /// Decode a token string.
    Decrypt,
    /// Leave the loop.
    Quit,
}

impl MenuChoice {
    /// Parses a typed selection.
    ///
    /// # Errors
    /// Returns [`BookCipherError::InvalidSelection`]; `numeric` tells a
    /// number outside 1–3 apart from text that is not a number.
    pub fn parse(input: &str) -> Result<Self, BookCipherError> {
        let trimmed = input.trim();
        let invalid = |numeric| BookCipherError::InvalidSelection {
            input: trimmed.to_string(),
            numeric,
        };
        match trimmed.parse::<i64>() {
            Ok(1) => Ok(MenuChoice::Encrypt),
            Ok(2) => Ok(MenuChoice::Decrypt),
            Ok(3) => Ok(MenuChoice::Quit),
            Ok(_) => Err(invalid(true)),
            // Out of range for i64 but still a whole number.
            Err(_) => Err(invalid(is_integer(trimmed))),
        }
    }
}

/// Codebooks and cipher engine shared by every menu action.
#[derive(Debug)]
pub struct Session<S, P, R> {
    config: CodebookConfig,
    store: CodebookStore<S, P>,
    engine: CipherEngine<R>,
    index: Option<ForwardIndex>,
    corpus: Option<Corpus>,
}

impl<S: Storage, P: SourceProvider, R: RandomSource> Session<S, P, R> {
    /// Creates a session; nothing is loaded until first use.
    pub fn new(
        config: CodebookConfig,
        store: CodebookStore<S, P>,
        engine: CipherEngine<R>,
    ) -> Self {
        Session {
            config,
            store,
            engine,
            index: None,
            corpus: None,
        }
    }

    /// Encodes `message` with the session's forward codebook.
    pub fn encrypt(&mut self, message: &str) -> Result<String, BookCipherError> {
        let index = match self.index.take() {
            Some(index) => index,
            None => self
                .store
                .load_forward(&self.config.codebook_path, self.config.sources.as_slice())?,
        };
        let index = self.index.insert(index);
        Ok(self.engine.encode(index, message))
    }

    /// Decodes `text` with the session's reverse codebook.
    pub fn decrypt(&mut self, text: &str) -> Result<String, BookCipherError> {
        let corpus = match self.corpus.take() {
            Some(corpus) => corpus,
            None => self
                .store
                .load_reverse(&self.config.reverse_codebook_path, self.config.sources.as_slice())?,
        };
        cipher::decode(self.corpus.insert(corpus), text)
    }

    /// Runs the menu loop until the user quits or input ends.
    ///
    /// Invalid selections and unknown coordinates are reported and the loop
    /// continues; unreadable sources or codebooks end the loop with an error.
    pub fn run<I: BufRead, O: Write>(
        &mut self,
        mut input: I,
        mut output: O,
    ) -> Result<(), BookCipherError> {
        loop {
            write_out(&mut output, format_args!("{}{}", MENU, SELECTION_PROMPT))?;
            let Some(selection) = read_line(&mut input)? else {
                return Ok(());
            };
            let choice = match MenuChoice::parse(&selection) {
                Ok(choice) => choice,
                Err(err) => {
                    write_out(&mut output, format_args!("{}\n", err))?;
                    continue;
                }
            };
            let prompt = match choice {
                MenuChoice::Encrypt => MESSAGE_PROMPT,
                MenuChoice::Decrypt => CIPHER_PROMPT,
                MenuChoice::Quit => return Ok(()),
            };
            write_out(&mut output, format_args!("{}", prompt))?;
            let Some(text) = read_line(&mut input)? else {
                return Ok(());
            };
            let result = if choice == MenuChoice::Encrypt {
                self.encrypt(&text)
            } else {
                self.decrypt(&text)
            };
            match result {
                Ok(result) => write_out(&mut output, format_args!("{}\n", result))?,
                Err(err @ BookCipherError::CoordinateNotFound(_)) => {
                    warn!(error = %err, "decryption failed");
                    write_out(&mut output, format_args!("{}\n", err))?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>, BookCipherError> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| BookCipherError::io(Path::new("<stdin>"), e))?;
    if read == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

fn write_out<O: Write>(
    output: &mut O,
    args: std::fmt::Arguments<'_>,
) -> Result<(), BookCipherError> {
    output
        .write_fmt(args)
        .and_then(|()| output.flush())
        .map_err(|e| BookCipherError::io(Path::new("<stdout>"), e))
}
