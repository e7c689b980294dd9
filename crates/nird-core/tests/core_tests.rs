use std::fs;
use std::io::Write;
use tempfile::TempDir;

use nird_core::config::{BoostPolicy, Config};
use nird_core::ingest::{ChunkingConfig, Ingestor};
use nird_core::{Chunk, Dataset, Error};

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let ingestor = Ingestor::default();
    let chunks = ingestor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].chunk_id, 0);
    assert_eq!(chunks[0].source_title, "a");
    assert!(chunks[0].source_url.starts_with("file://"));
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let ingestor = Ingestor::default();
    let chunks = ingestor
        .process_directory_limited(dir, 1)
        .expect("process limited");

    let mut sources = std::collections::HashSet::new();
    for c in &chunks { sources.insert(c.source_url.clone()); }
    assert_eq!(sources.len(), 1, "limited to one source document");
}

#[test]
fn chunk_ids_are_sequential_across_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "premier paragraphe\n\nsecond paragraphe").unwrap();
    fs::write(dir.join("b.txt"), "troisième paragraphe").unwrap();

    let chunks = Ingestor::new(ChunkingConfig { chunk_size: 500, chunk_overlap: 50 })
        .process_directory(dir)
        .expect("process");
    let ids: Vec<i64> = chunks.iter().map(|c| c.chunk_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(chunks[2].source_title, "b");
}

#[test]
fn missing_data_directory_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = Ingestor::default().process_directory(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn dataset_export_then_load() {
    let tmp = TempDir::new().unwrap();
    let mut chunk = Chunk::new(3, "Le reconditionnement Linux", "https://x", "A");
    chunk.token_count = 4;
    let dataset = Dataset::from_chunks(vec![chunk]);

    let path = dataset.export(&tmp.path().join("out"), "chunks.json").expect("export");
    let loaded = Dataset::load(&path).expect("load");

    assert_eq!(loaded, dataset);
    assert_eq!(loaded.metadata.total_chunks, 1);
    assert_eq!(loaded.metadata.total_tokens, 4);
    assert_eq!(loaded.metadata.sources, vec!["https://x".to_string()]);
}

#[test]
fn dataset_load_missing_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = Dataset::load(&tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn dataset_load_malformed_file_is_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Dataset::load(&path).unwrap_err(), Error::Parse { .. }));
}

#[test]
fn config_layers_toml_over_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[engine]\nthreshold = 0.2\nboost_policy = \"chunk_aware\"\n\n[data]\ndataset_path = \"corpus.json\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[server]\nport = 9100\n").unwrap();

    let config = Config::load_for_env(tmp.path(), "test").expect("config");
    let settings = config.settings();
    assert_eq!(settings.engine.threshold, 0.2);
    assert_eq!(settings.engine.boost, 0.18, "untouched keys keep their defaults");
    assert_eq!(settings.engine.boost_policy, BoostPolicy::ChunkAware);
    assert_eq!(settings.server.port, 9100);
    assert_eq!(config.dataset_path(), tmp.path().join("corpus.json"));
    let port: u16 = config.get("server.port").expect("get");
    assert_eq!(port, 9100);
}

#[test]
fn config_rejects_invalid_values() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[chunking]\nchunk_size = 10\nchunk_overlap = 10\n").unwrap();
    assert!(Config::load_for_env(tmp.path(), "dev").is_err());
}
