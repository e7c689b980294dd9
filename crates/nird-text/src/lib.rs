//! nird-text
//!
//! Lexical retrieval engine: term-frequency vectorization, cosine scoring with
//! keyword boosting over an in-memory index, and answer shaping. See `index`
//! and `answer`, and the example under `examples/` for CLI-like usage.

pub mod answer;
pub mod index;
pub mod similarity;
pub mod vectorize;

pub use answer::{truncate_context, AnswerEngine, Fallback};
pub use index::{IndexBuilder, SimilarityIndex, StrongTerms};
pub use similarity::cosine_similarity;
pub use vectorize::{vectorize, TermVector, Vectorizer};
