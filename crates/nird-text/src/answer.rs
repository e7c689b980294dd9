//! Turns a retrieval outcome into the public answer payload.

use chrono::{DateTime, Local};

use nird_core::config::{FallbackSettings, Settings, DEFAULT_MAX_CONTEXT_CHARS};
use nird_core::error::{Error, Result};
use nird_core::traits::Retriever;
use nird_core::types::{Answer, Chunk, QueryResult, FALLBACK_CHUNK_ID};

use crate::index::{IndexBuilder, SimilarityIndex};

pub const ELLIPSIS: &str = "...";

/// Static answer served when no chunk clears the acceptance threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
	pub text: String,
	pub source_url: String,
	pub source_title: String,
}

impl Default for Fallback {
	fn default() -> Self { Self::from(&FallbackSettings::default()) }
}

impl From<&FallbackSettings> for Fallback {
	fn from(s: &FallbackSettings) -> Self {
		Self { text: s.text.clone(), source_url: s.source_url.clone(), source_title: s.source_title.clone() }
	}
}

/// Trim `text`; past `max_chars` characters, cut at the last whitespace of the
/// prefix so no word is split, then append an ellipsis.
pub fn truncate_context(text: &str, max_chars: usize) -> String {
	let text = text.trim();
	let Some((cut, _)) = text.char_indices().nth(max_chars) else {
		return text.to_string();
	};
	let prefix = &text[..cut];
	let kept = match prefix.rfind(char::is_whitespace) {
		Some(i) => &prefix[..i],
		None => prefix,
	};
	format!("{kept}{ELLIPSIS}")
}

/// Reported confidence: three decimals, applied after every comparison.
pub fn round_confidence(score: f64) -> f64 { (score * 1000.0).round() / 1000.0 }

/// ISO-8601 local timestamp with microseconds.
pub fn format_timestamp(at: DateTime<Local>) -> String { at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string() }

/// Retrieval plus result shaping: the complete question -> answer path.
pub struct AnswerEngine<R: Retriever = SimilarityIndex> {
	retriever: R,
	max_context_chars: usize,
	fallback: Fallback,
}

impl AnswerEngine<SimilarityIndex> {
	/// Build the index over `chunks` with every knob taken from `settings`.
	pub fn from_settings(chunks: Vec<Chunk>, settings: &Settings) -> Self {
		let index = IndexBuilder::from_settings(&settings.engine).build(chunks);
		Self::new(index)
			.with_max_context_chars(settings.engine.max_context_chars)
			.with_fallback(Fallback::from(&settings.fallback))
	}
}

impl<R: Retriever> AnswerEngine<R> {
	pub fn new(retriever: R) -> Self {
		Self { retriever, max_context_chars: DEFAULT_MAX_CONTEXT_CHARS, fallback: Fallback::default() }
	}

	pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self { self.max_context_chars = max_context_chars; self }

	pub fn with_fallback(mut self, fallback: Fallback) -> Self { self.fallback = fallback; self }

	pub fn retriever(&self) -> &R { &self.retriever }

	pub fn fallback(&self) -> &Fallback { &self.fallback }

	pub fn answer(&self, question: &str) -> Result<Answer> { self.answer_at(question, Local::now()) }

	/// Answer `question` (trimmed), stamping the payload with `at`.
	pub fn answer_at(&self, question: &str, at: DateTime<Local>) -> Result<Answer> {
		let question = question.trim();
		if question.is_empty() { return Err(Error::EmptyQuestion); }
		Ok(self.shape(question, self.retriever.retrieve(question), format_timestamp(at)))
	}

	fn shape(&self, question: &str, result: QueryResult<'_>, timestamp: String) -> Answer {
		match result {
			QueryResult::Match { chunk, score } => Answer {
				question: question.to_string(),
				contexte: truncate_context(&chunk.text, self.max_context_chars),
				confiance: round_confidence(score),
				chunk_id: chunk.chunk_id,
				source_url: chunk.source_url.clone(),
				source_title: chunk.source_title.clone(),
				timestamp,
			},
			QueryResult::NoMatch => Answer {
				question: question.to_string(),
				contexte: self.fallback.text.clone(),
				confiance: 0.0,
				chunk_id: FALLBACK_CHUNK_ID,
				source_url: self.fallback.source_url.clone(),
				source_title: self.fallback.source_title.clone(),
				timestamp,
			},
		}
	}
}
