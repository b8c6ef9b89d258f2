//! Interactive book cipher.
//!
//! Logging goes to stderr and is configured with `RUST_LOG`
//! (e.g. `RUST_LOG=bookcipher=debug`); the default level is `warn`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bookcipher::menu::Session;
use bookcipher::{BookCipherError, CipherEngine, CodebookConfig, CodebookStore};

/// Encode and decode messages as coordinates into reference books
#[derive(Parser, Debug)]
#[command(name = "bookcipher", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reference text, in order (repeatable; replaces configured sources)
    #[arg(short, long = "source", value_name = "FILE")]
    sources: Vec<PathBuf>,

    /// Forward codebook location
    #[arg(long, value_name = "FILE")]
    codebook: Option<PathBuf>,

    /// Reverse codebook location
    #[arg(long, value_name = "FILE")]
    reverse_codebook: Option<PathBuf>,

    /// Seed for coordinate selection
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Build the corpus once and reuse it for both codebooks
    #[arg(long)]
    cache_corpus: bool,
}

impl Cli {
    fn into_config(self) -> Result<CodebookConfig, BookCipherError> {
        let mut config = match &self.config {
            Some(path) => CodebookConfig::from_file(path)?,
            None => CodebookConfig::default(),
        };
        if !self.sources.is_empty() {
            config.sources = self.sources;
        }
        if let Some(path) = self.codebook {
            config.codebook_path = path;
        }
        if let Some(path) = self.reverse_codebook {
            config.reverse_codebook_path = path;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.cache_corpus |= self.cache_corpus;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(console_layer).init();
}

fn run(cli: Cli) -> Result<(), BookCipherError> {
    let config = cli.into_config()?;
    let store = CodebookStore::from_config(&config)?;
    let engine = match config.seed {
        Some(seed) => CipherEngine::with_seed(seed),
        None => CipherEngine::from_entropy(),
    };
    tracing::debug!(seed = ?config.seed, "starting session");
    let mut session = Session::new(config, store, engine);
    session.run(io::stdin().lock(), io::stdout().lock())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "bookcipher failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
