//! Text normalization into sparse term-frequency vectors.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Maximal runs of Unicode word characters (letters, digits, underscore).
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static word regex"));

/// Terms must be strictly longer than this many characters.
pub const MAX_DROPPED_TERM_CHARS: usize = 2;

pub const FRENCH_STOPWORDS: &[&str] = &[
	"le","la","les","de","du","des","un","une","et","ou","à","au","aux","en","dans",
	"sur","pour","par","avec","sans","sous","chez","ce","cette","ces","son","sa","ses",
	"mon","ma","mes","ton","ta","tes","je","tu","il","elle","nous","vous","ils","elles",
	"qui","que","quoi","dont","où","quand","comment","mais","est","sont","pas","plus","très",
];

static DEFAULT_VECTORIZER: LazyLock<Vectorizer> = LazyLock::new(Vectorizer::default);

/// Sparse mapping from normalized term to occurrence count (always >= 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector {
	counts: HashMap<String, u32>,
}

impl TermVector {
	pub fn get(&self, term: &str) -> u32 { self.counts.get(term).copied().unwrap_or(0) }

	pub fn contains(&self, term: &str) -> bool { self.counts.contains_key(term) }

	pub fn len(&self) -> usize { self.counts.len() }

	pub fn is_empty(&self) -> bool { self.counts.is_empty() }

	pub fn terms(&self) -> impl Iterator<Item = &str> { self.counts.keys().map(String::as_str) }

	pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> { self.counts.iter().map(|(t, &c)| (t.as_str(), c)) }

	/// Sum of squared counts. Integer arithmetic keeps it independent of map order.
	pub fn squared_norm(&self) -> u64 { self.counts.values().map(|&c| u64::from(c) * u64::from(c)).sum() }

	pub fn norm(&self) -> f64 { (self.squared_norm() as f64).sqrt() }
}

impl<S: Into<String>> FromIterator<S> for TermVector {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut counts = HashMap::new();
		for term in iter { *counts.entry(term.into()).or_insert(0) += 1; }
		Self { counts }
	}
}

/// Lowercases, tokenizes and filters text. Owns its stopword set.
#[derive(Debug, Clone)]
pub struct Vectorizer {
	stopwords: HashSet<String>,
}

impl Default for Vectorizer {
	fn default() -> Self { Self::with_stopwords(FRENCH_STOPWORDS.iter().copied()) }
}

impl Vectorizer {
	pub fn with_stopwords<I, S>(stopwords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { stopwords: stopwords.into_iter().map(|s| s.as_ref().to_lowercase()).collect() }
	}

	pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

	/// Normalized tokens in text order, duplicates kept.
	pub fn tokens<'t>(&'t self, lowered: &'t str) -> impl Iterator<Item = &'t str> + 't {
		WORD_RE
			.find_iter(lowered)
			.map(|m| m.as_str())
			.filter(move |t| !self.is_stopword(t) && t.chars().count() > MAX_DROPPED_TERM_CHARS)
	}

	pub fn vectorize(&self, text: &str) -> TermVector {
		let lowered = text.to_lowercase();
		self.tokens(&lowered).collect()
	}
}

/// Vectorize with the built-in French stopword list.
pub fn vectorize(text: &str) -> TermVector { DEFAULT_VECTORIZER.vectorize(text) }
