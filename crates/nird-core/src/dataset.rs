//! Chunk dataset persisted as JSON: `{ "metadata": {...}, "chunks": [...] }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Chunk;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    pub export_date: Option<String>,
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub metadata: DatasetMetadata,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

/// Aggregate figures over a dataset, as served by `/data/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub total_characters: usize,
    pub unique_sources: usize,
    pub export_date: Option<String>,
    pub average_chunk_size: usize,
    pub average_tokens_per_chunk: usize,
}

impl Dataset {
    /// Wrap freshly ingested chunks, stamping the metadata with the current time.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let sources: BTreeSet<&str> = chunks.iter().map(|c| c.source_url.as_str()).collect();
        let metadata = DatasetMetadata {
            export_date: Some(chrono::Local::now().to_rfc3339()),
            total_chunks: chunks.len(),
            total_tokens: chunks.iter().map(|c| c.token_count).sum(),
            sources: sources.into_iter().map(str::to_string).collect(),
        };
        Self { metadata, chunks }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(format!("dataset {}", path.display())),
            _ => Error::io(path, e),
        })?;
        let dataset: Dataset =
            serde_json::from_str(&raw).map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;
        tracing::info!(path = %path.display(), chunks = dataset.chunks.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Write the dataset as pretty JSON under `dir`, creating it if needed.
    pub fn export(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| Error::Parse { path: path.clone(), source })?;
        fs::write(&path, json).map_err(|e| Error::io(&path, e))?;
        tracing::info!(path = %path.display(), chunks = self.chunks.len(), "dataset exported");
        Ok(path)
    }

    pub fn stats(&self) -> DatasetStats {
        let total_chunks = self.chunks.len();
        let total_tokens: usize = self.chunks.iter().map(|c| c.token_count).sum();
        let total_characters: usize = self.chunks.iter().map(|c| c.text.chars().count()).sum();
        let unique_sources = self
            .chunks
            .iter()
            .map(|c| c.source_url.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let (average_chunk_size, average_tokens_per_chunk) = if total_chunks > 0 {
            (total_characters / total_chunks, total_tokens / total_chunks)
        } else {
            (0, 0)
        };
        DatasetStats {
            total_chunks,
            total_tokens,
            total_characters,
            unique_sources,
            export_date: self.metadata.export_date.clone(),
            average_chunk_size,
            average_tokens_per_chunk,
        }
    }
}
