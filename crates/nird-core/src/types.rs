//! Domain types shared by the dataset loader, the retrieval engine and the
//! HTTP/CLI front ends.

use serde::{Deserialize, Serialize};

pub type ChunkId = i64;

/// Identifier reported when no chunk cleared the acceptance threshold.
pub const FALLBACK_CHUNK_ID: ChunkId = -1;

/// A passage of the corpus, produced by ingestion and never mutated afterwards.
///
/// - `chunk_id`: unique within the corpus
/// - `text`: the passage content
/// - `source_url`/`source_title`: provenance of the page the passage came from
/// - `token_count`: rough token estimate written by the exporter, statistics only
///
/// Every field except `chunk_id` falls back to its default when absent from
/// the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub source_title: String,
    #[serde(default)]
    pub token_count: usize,
}

impl Chunk {
    pub fn new(
        chunk_id: ChunkId,
        text: impl Into<String>,
        source_url: impl Into<String>,
        source_title: impl Into<String>,
    ) -> Self {
        Self {
            chunk_id,
            text: text.into(),
            source_url: source_url.into(),
            source_title: source_title.into(),
            token_count: 0,
        }
    }
}

/// Outcome of a single retrieval.
///
/// `NoMatch` is a terminal branch of its own so that "nothing relevant" is
/// never confused with a genuine low-scoring match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryResult<'a> {
    Match { chunk: &'a Chunk, score: f64 },
    NoMatch,
}

impl<'a> QueryResult<'a> {
    pub fn chunk(&self) -> Option<&'a Chunk> {
        match self {
            QueryResult::Match { chunk, .. } => Some(chunk),
            QueryResult::NoMatch => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            QueryResult::Match { score, .. } => Some(*score),
            QueryResult::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, QueryResult::Match { .. })
    }
}

/// Response payload returned to callers for every question.
///
/// Field names follow the public API contract (`contexte`, `confiance`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub contexte: String,
    pub confiance: f64,
    pub chunk_id: ChunkId,
    pub source_url: String,
    pub source_title: String,
    pub timestamp: String,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        self.chunk_id == FALLBACK_CHUNK_ID
    }
}
