use nird_core::config::{BoostPolicy, EngineSettings, DEFAULT_BOOST, DEFAULT_STRONG_TERMS, DEFAULT_THRESHOLD};
use nird_core::traits::Retriever;
use nird_core::types::{Chunk, QueryResult};

use crate::similarity::cosine_similarity;
use crate::vectorize::{TermVector, Vectorizer};

/// Topic keywords that raise scores when they appear in the question.
#[derive(Debug, Clone, PartialEq)]
pub struct StrongTerms {
	terms: Vec<String>,
	bonus: f64,
}

impl Default for StrongTerms {
	fn default() -> Self { Self::new(DEFAULT_STRONG_TERMS.iter().copied(), DEFAULT_BOOST) }
}

impl StrongTerms {
	/// Terms are lowercased and deduplicated, first occurrence kept.
	pub fn new<I, S>(terms: I, bonus: f64) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut out: Vec<String> = Vec::new();
		for t in terms {
			let t = t.as_ref().trim().to_lowercase();
			if !t.is_empty() && !out.contains(&t) { out.push(t); }
		}
		Self { terms: out, bonus }
	}

	pub fn none() -> Self { Self { terms: Vec::new(), bonus: 0.0 } }

	pub fn bonus(&self) -> f64 { self.bonus }

	pub fn terms(&self) -> &[String] { &self.terms }

	/// Keywords found as substrings of the lowercased raw question.
	pub fn matching<'s>(&'s self, question: &str) -> Vec<&'s str> {
		let lowered = question.to_lowercase();
		self.terms.iter().filter(|t| lowered.contains(t.as_str())).map(String::as_str).collect()
	}

	/// Add one `bonus` to `score` per matching keyword, one keyword at a time.
	pub fn apply(&self, score: f64, matches: usize) -> f64 { (0..matches).fold(score, |s, _| s + self.bonus) }

	/// Total bonus a question earns on a zero-scored candidate.
	pub fn boost_for(&self, question: &str) -> f64 { self.apply(0.0, self.matching(question).len()) }
}

/// Index configuration; defaults reproduce the production tuning.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
	vectorizer: Vectorizer,
	strong_terms: StrongTerms,
	threshold: f64,
	boost_policy: BoostPolicy,
}

impl Default for IndexBuilder {
	fn default() -> Self {
		Self {
			vectorizer: Vectorizer::default(),
			strong_terms: StrongTerms::default(),
			threshold: DEFAULT_THRESHOLD,
			boost_policy: BoostPolicy::default(),
		}
	}
}

impl IndexBuilder {
	pub fn from_settings(settings: &EngineSettings) -> Self {
		let vectorizer = match &settings.stopwords {
			Some(words) => Vectorizer::with_stopwords(words),
			None => Vectorizer::default(),
		};
		Self {
			vectorizer,
			strong_terms: StrongTerms::new(&settings.strong_terms, settings.boost),
			threshold: settings.threshold,
			boost_policy: settings.boost_policy,
		}
	}

	pub fn vectorizer(mut self, vectorizer: Vectorizer) -> Self { self.vectorizer = vectorizer; self }

	pub fn strong_terms(mut self, strong_terms: StrongTerms) -> Self { self.strong_terms = strong_terms; self }

	pub fn threshold(mut self, threshold: f64) -> Self { self.threshold = threshold; self }

	pub fn boost_policy(mut self, policy: BoostPolicy) -> Self { self.boost_policy = policy; self }

	/// Vectorize every chunk once, in corpus order.
	pub fn build(self, chunks: Vec<Chunk>) -> SimilarityIndex {
		let vectors: Vec<TermVector> = chunks.iter().map(|c| self.vectorizer.vectorize(&c.text)).collect();
		let terms: usize = vectors.iter().map(TermVector::len).sum();
		tracing::info!(chunks = chunks.len(), terms, threshold = self.threshold, "similarity index built");
		SimilarityIndex {
			chunks,
			vectors,
			vectorizer: self.vectorizer,
			strong_terms: self.strong_terms,
			threshold: self.threshold,
			boost_policy: self.boost_policy,
		}
	}
}

/// Immutable in-memory index: one term vector per chunk, built at startup.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
	chunks: Vec<Chunk>,
	vectors: Vec<TermVector>,
	vectorizer: Vectorizer,
	strong_terms: StrongTerms,
	threshold: f64,
	boost_policy: BoostPolicy,
}

impl SimilarityIndex {
	pub fn builder() -> IndexBuilder { IndexBuilder::default() }

	/// Build with the default vectorizer, keywords and threshold.
	pub fn build(chunks: Vec<Chunk>) -> Self { IndexBuilder::default().build(chunks) }

	pub fn threshold(&self) -> f64 { self.threshold }

	pub fn strong_terms(&self) -> &StrongTerms { &self.strong_terms }

	pub fn vectorizer(&self) -> &Vectorizer { &self.vectorizer }

	pub fn entries(&self) -> impl Iterator<Item = (&Chunk, &TermVector)> { self.chunks.iter().zip(self.vectors.iter()) }

	/// Final score of every entry for `question`, in corpus order.
	pub fn scores(&self, question: &str) -> Vec<f64> { self.scores_with(question, &self.strong_terms) }

	pub fn scores_with(&self, question: &str, strong_terms: &StrongTerms) -> Vec<f64> {
		let query = self.vectorizer.vectorize(question);
		let matched = strong_terms.matching(question);
		self.vectors
			.iter()
			.map(|vector| {
				let raw = cosine_similarity(&query, vector);
				let hits = match self.boost_policy {
					BoostPolicy::Uniform => matched.len(),
					BoostPolicy::ChunkAware => matched.iter().filter(|m| vector.terms().any(|t| t.contains(**m))).count(),
				};
				strong_terms.apply(raw, hits)
			})
			.collect()
	}

	pub fn query(&self, question: &str) -> QueryResult<'_> { self.query_with(question, &self.strong_terms) }

	/// Best chunk for `question` scored against an explicit keyword set.
	pub fn query_with(&self, question: &str, strong_terms: &StrongTerms) -> QueryResult<'_> {
		let best = select_best(self.scores_with(question, strong_terms));
		match best {
			Some((i, score)) if score > self.threshold => {
				tracing::debug!(chunk_id = self.chunks[i].chunk_id, score, "match");
				QueryResult::Match { chunk: &self.chunks[i], score }
			}
			_ => {
				tracing::debug!(best = best.map(|(_, s)| s), threshold = self.threshold, "no match");
				QueryResult::NoMatch
			}
		}
	}
}

impl Retriever for SimilarityIndex {
	fn retrieve<'a>(&'a self, question: &str) -> QueryResult<'a> { self.query(question) }

	fn chunks(&self) -> &[Chunk] { &self.chunks }
}

/// Index and score of the maximum; strict comparison so the first maximum wins.
pub(crate) fn select_best<I: IntoIterator<Item = f64>>(scores: I) -> Option<(usize, f64)> {
	let mut best: Option<(usize, f64)> = None;
	for (i, score) in scores.into_iter().enumerate() {
		if best.map_or(true, |(_, b)| score > b) { best = Some((i, score)); }
	}
	best
}
