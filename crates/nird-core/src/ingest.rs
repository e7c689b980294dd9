use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ChunkingSettings;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId};

/// Chunk sizes are expressed in estimated tokens (words / 0.75).
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::from(&ChunkingSettings::default())
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(s: &ChunkingSettings) -> Self {
        Self { chunk_size: s.chunk_size, chunk_overlap: s.chunk_overlap }
    }
}

/// Turns a directory of `.txt` files into corpus chunks.
#[derive(Default)]
pub struct Ingestor {
    chunking_config: ChunkingConfig,
}

impl Ingestor {
    pub fn new(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        self.process_directory_with(data_dir, None, |_, _, _| {})
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<Chunk>> {
        self.process_directory_with(data_dir, Some(limit), |_, _, _| {})
    }

    /// Walk `data_dir` in sorted order; `on_file(index, total, path)` is called before each file.
    pub fn process_directory_with<F>(&self, data_dir: &Path, limit: Option<usize>, mut on_file: F) -> Result<Vec<Chunk>>
    where
        F: FnMut(usize, usize, &Path),
    {
        if !data_dir.is_dir() {
            return Err(Error::NotFound(format!("data directory {}", data_dir.display())));
        }
        let mut files = self.list_txt_files(data_dir);
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        if let Some(limit) = limit {
            if files.len() > limit { files.truncate(limit); tracing::info!(limit, "limited to first files"); }
        }
        let mut all_chunks = Vec::new();
        let mut next_id: ChunkId = 0;
        for (file_index, file_path) in files.iter().enumerate() {
            on_file(file_index, files.len(), file_path);
            tracing::debug!(file = %file_path.display(), "processing {}/{}", file_index + 1, files.len());
            let content = self.read_file_content(file_path)?;
            all_chunks.extend(self.chunk_content(&content, file_path, &mut next_id));
        }
        tracing::info!(files = files.len(), chunks = all_chunks.len(), "ingestion complete");
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).map_err(|e| Error::io(file_path, e))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    fn chunk_content(&self, content: &str, file_path: &Path, next_id: &mut ChunkId) -> Vec<Chunk> {
        let source_url = format!("file://{}", file_path.display());
        let source_title = file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let mut chunks = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim(); if paragraph.is_empty() { continue; }
            let pieces = if count_tokens(paragraph) <= self.chunking_config.chunk_size {
                vec![paragraph.to_string()]
            } else {
                self.split_paragraph_with_overlap(paragraph)
            };
            for text in pieces {
                let token_count = count_tokens(&text);
                chunks.push(Chunk { chunk_id: *next_id, text, source_url: source_url.clone(), source_title: source_title.clone(), token_count });
                *next_id += 1;
            }
        }
        chunks
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = ((self.chunking_config.chunk_size as f32 * 0.75) as usize).max(1);
        let overlap_words = ((self.chunking_config.chunk_overlap as f32 * 0.75) as usize).min(words_per_chunk - 1);
        let mut chunks = Vec::new(); let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort(); txt_files
    }
}

/// Rough token estimate used for chunk sizing and dataset statistics.
pub fn count_tokens(text: &str) -> usize { let word_count = text.split_whitespace().count(); (word_count as f32 / 0.75) as usize }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_paragraph_is_split_with_overlap() {
        let ingestor = Ingestor::new(ChunkingConfig { chunk_size: 8, chunk_overlap: 4 });
        // 6 words per window, 3 words of overlap
        let paragraph = (0..12).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let pieces = ingestor.split_paragraph_with_overlap(&paragraph);
        assert_eq!(pieces[0], "w0 w1 w2 w3 w4 w5");
        assert_eq!(pieces[1], "w3 w4 w5 w6 w7 w8");
        assert_eq!(pieces.last().map(String::as_str), Some("w6 w7 w8 w9 w10 w11"));
    }

    #[test]
    fn overlap_never_stalls_the_window() {
        let ingestor = Ingestor::new(ChunkingConfig { chunk_size: 5, chunk_overlap: 4 });
        let paragraph = "a b c d e f g h";
        let pieces = ingestor.split_paragraph_with_overlap(paragraph);
        assert!(pieces.len() < 8 * 2);
        assert_eq!(pieces.last().map(|p| p.ends_with('h')), Some(true));
    }

    #[test]
    fn token_estimate() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("un deux trois"), 4);
    }
}
