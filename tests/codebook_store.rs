//! Codebook persistence against the real filesystem.
//!
//! Each test works in its own temporary directory holding the reference
//! texts and the `code_books/` output directory.

use std::fs;
use std::path::{Path, PathBuf};

use bookcipher::builder::{CorpusBuilder, FsSources};
use bookcipher::store::FsStorage;
use bookcipher::{
    cipher, BookCipherError, Capacity, CipherEngine, Codebook, CodebookConfig, CodebookStore,
    Coordinate, ForwardIndex,
};
use tempfile::TempDir;

struct Library {
    dir: TempDir,
    sources: Vec<PathBuf>,
}

impl Library {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let books = dir.path().join("books");
        fs::create_dir_all(&books).unwrap();
        let texts = [
            ("moby.txt", "\u{feff}Call me Ishmael.\nSome years ago--never mind how long\n"),
            ("dracula.txt", "\n3 May. Bistritz.\r\nLeft Munich at 8:35 P.M.\r\n"),
        ];
        let sources = texts
            .iter()
            .map(|(name, text)| {
                let path = books.join(name);
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        Library { dir, sources }
    }

    fn codebook(&self, name: &str) -> PathBuf {
        self.dir.path().join("code_books").join(name)
    }

    fn store(&self) -> CodebookStore {
        let builder = CorpusBuilder::new(Capacity::new(16, 2).unwrap()).unwrap();
        CodebookStore::new(FsStorage, FsSources, builder)
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn forward_codebook_is_written_as_char_to_coordinate_lists() {
    let library = Library::new();
    let path = library.codebook("forward.json");
    let index = library.store().load_forward(&path, &library.sources).unwrap();

    let json = read_json(&path);
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), index.len());
    // "Call me Ishmael. " starts the corpus; the BOM is not part of it.
    assert_eq!(object["C"][0], "1-1-0");
    assert!(object.keys().all(|k| k.chars().count() == 1));
    assert!(!object.contains_key("\u{feff}"));
    assert!(!object.contains_key("-"));
}

#[test]
fn reverse_codebook_is_written_as_nested_pages() {
    let library = Library::new();
    let path = library.codebook("reverse.json");
    let corpus = library.store().load_reverse(&path, &library.sources).unwrap();

    let json = read_json(&path);
    assert_eq!(json["1"]["1"], "Call me Ishmael.");
    assert_eq!(json["1"]["2"], " Some years agon");
    assert_eq!(json.as_object().unwrap().len(), corpus.num_pages());
}

#[test]
fn sources_span_line_boundaries() {
    let library = Library::new();
    let corpus = library
        .store()
        .load_reverse(&library.codebook("r.json"), &library.sources)
        .unwrap();
    // "...how long " from moby runs straight into "3 May. " from dracula.
    let text: String = corpus.occurrences().map(|(_, c)| c).collect();
    assert!(text.contains("how long 3 May. Bistritz. Left Munich at 8:35 P.M. "));
    assert!(text.starts_with("Call me Ishmael. Some years agonever mind"));
}

#[test]
fn persisted_codebooks_are_reused_without_sources() {
    let library = Library::new();
    let forward = library.codebook("forward.json");
    let reverse = library.codebook("reverse.json");
    let built_index = library.store().load_forward(&forward, &library.sources).unwrap();
    let built_corpus = library.store().load_reverse(&reverse, &library.sources).unwrap();

    for source in &library.sources {
        fs::remove_file(source).unwrap();
    }

    let mut store = library.store();
    let loaded = store.load(&forward, &library.sources, false).unwrap();
    assert_eq!(loaded, Codebook::Forward(built_index));
    let loaded = store.load(&reverse, &library.sources, true).unwrap();
    assert_eq!(loaded, Codebook::Reverse(built_corpus));
}

#[test]
fn missing_source_is_an_io_error() {
    let library = Library::new();
    let mut sources = library.sources.clone();
    sources.push(library.dir.path().join("books").join("absent.txt"));
    let result = library.store().load_forward(&library.codebook("f.json"), &sources);
    match result {
        Err(BookCipherError::Io { path, .. }) => assert!(path.ends_with("absent.txt")),
        other => panic!("expected I/O error, got {:?}", other),
    }
    assert!(!library.codebook("f.json").exists());
}

#[test]
fn encode_with_loaded_forward_and_decode_with_loaded_reverse() {
    let library = Library::new();
    let forward = library.codebook("forward.json");
    let reverse = library.codebook("reverse.json");
    // Build both, then reload from disk to exercise the persisted forms.
    library.store().load_forward(&forward, &library.sources).unwrap();
    library.store().load_reverse(&reverse, &library.sources).unwrap();

    let mut store = library.store();
    let mut index = store.load_forward(&forward, &library.sources).unwrap();
    let corpus = store.load_reverse(&reverse, &library.sources).unwrap();

    let mut engine = CipherEngine::with_seed(1851);
    let tokens = engine.encode(&mut index, "Meet in Munich at 8");
    assert_eq!(cipher::decode(&corpus, &tokens).unwrap(), "Meet in Munich at 8");

    // Consumption lives in memory only; the file still has every coordinate.
    let on_disk: ForwardIndex = serde_json::from_slice(&fs::read(&forward).unwrap()).unwrap();
    assert_eq!(on_disk.remaining('M'), index.remaining('M') + 2);
}

#[test]
fn reverse_codebook_with_gap_is_rejected() {
    let library = Library::new();
    let path = library.codebook("broken.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"1":{"1":"abc"},"2":{"2":"def"}}"#).unwrap();
    let result = library.store().load_reverse(&path, &library.sources);
    assert!(matches!(result, Err(BookCipherError::InvalidCorpus(_))));
}

#[test]
fn store_from_config_uses_configured_capacity() {
    let library = Library::new();
    let config = CodebookConfig {
        sources: library.sources.clone(),
        codebook_path: library.codebook("f.json"),
        reverse_codebook_path: library.codebook("r.json"),
        capacity: Capacity::new(8, 1).unwrap(),
        cache_corpus: true,
        seed: None,
    };
    let mut store = CodebookStore::from_config(&config).unwrap();
    let corpus = store
        .load_reverse(&config.reverse_codebook_path, &config.sources)
        .unwrap();
    assert_eq!(corpus.page(1).unwrap().len(), 1);
    assert_eq!(corpus.page(1).unwrap().line(1).unwrap().to_string(), "Call me ");
    assert_eq!(corpus.char_at(&Coordinate::new(2, 1, 0)), Some('I'));
}
