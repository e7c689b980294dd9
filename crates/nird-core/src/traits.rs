use crate::types::{Chunk, QueryResult};

/// A read-only retrieval engine over a fixed corpus.
///
/// Implementations are built once and shared across concurrent queries, so
/// `retrieve` takes `&self` and must not mutate anything.
pub trait Retriever: Send + Sync {
    fn retrieve<'a>(&'a self, question: &str) -> QueryResult<'a>;
    fn chunks(&self) -> &[Chunk];

    fn len(&self) -> usize {
        self.chunks().len()
    }

    fn is_empty(&self) -> bool {
        self.chunks().is_empty()
    }
}
