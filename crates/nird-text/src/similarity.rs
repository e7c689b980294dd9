use crate::vectorize::TermVector;

/// Cosine similarity of two term-frequency vectors, in `[0, 1]`.
///
/// Disjoint vectors score exactly 0.0, as does any pair with a zero norm.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
	let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
	let mut dot: u64 = 0;
	let mut shared = false;
	for (term, count) in small.iter() {
		let other = large.get(term);
		if other > 0 { dot += u64::from(count) * u64::from(other); shared = true; }
	}
	if !shared { return 0.0; }
	let denominator = a.norm() * b.norm();
	if denominator == 0.0 { 0.0 } else { dot as f64 / denominator }
}
