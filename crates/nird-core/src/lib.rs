//! nird-core
//!
//! Domain types, dataset I/O, local ingestion and configuration shared by the
//! retrieval engine (`nird-text`) and the front ends (`nird-cli`).

#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod traits;
pub mod types;

pub use dataset::{Dataset, DatasetMetadata, DatasetStats};
pub use error::{Error, Result};
pub use traits::Retriever;
pub use types::{Answer, Chunk, ChunkId, QueryResult, FALLBACK_CHUNK_ID};
