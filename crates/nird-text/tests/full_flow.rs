use nird_core::config::Settings;
use nird_core::{Chunk, Dataset, QueryResult, Retriever};
use nird_text::{cosine_similarity, vectorize, AnswerEngine, SimilarityIndex, StrongTerms};

fn corpus() -> Vec<Chunk> {
    vec![
        Chunk::new(10, "Les établissements scolaires adoptent Linux pour prolonger la vie des ordinateurs", "https://a", "Linux"),
        Chunk::new(11, "Tchap est la messagerie instantanée de l'État pour les agents publics", "https://b", "Tchap"),
        Chunk::new(12, "Le reconditionnement des ordinateurs lutte contre l'obsolescence programmée", "https://c", "Reconditionnement"),
    ]
}

#[test]
fn end_to_end_reconditionnement_scenario() {
    let index = SimilarityIndex::build(vec![Chunk::new(
        1,
        "Le reconditionnement Linux est un pilier du numérique durable",
        "https://x",
        "A",
    )]);
    let engine = AnswerEngine::new(index);
    let answer = engine.answer("Comment faire du reconditionnement ?").expect("answer");

    assert_eq!(answer.chunk_id, 1);
    assert!(answer.confiance > 0.12);
    // cosine 1/sqrt(10) + one keyword bonus
    assert_eq!(answer.confiance, 0.496);
    assert_eq!(answer.source_url, "https://x");
    assert_eq!(answer.source_title, "A");
    assert_eq!(answer.contexte, "Le reconditionnement Linux est un pilier du numérique durable");
}

#[test]
fn query_is_deterministic() {
    let index = SimilarityIndex::build(corpus());
    let question = "Pourquoi la messagerie Tchap pour les agents ?";
    let first = index.query(question);
    for _ in 0..20 {
        let again = index.query(question);
        assert_eq!(again.chunk().map(|c| c.chunk_id), first.chunk().map(|c| c.chunk_id));
        assert_eq!(again.score().map(f64::to_bits), first.score().map(f64::to_bits));
    }
    assert_eq!(first.chunk().map(|c| c.chunk_id), Some(11));
}

#[test]
fn threshold_is_strict() {
    let chunks = vec![Chunk::new(1, "ordinateurs recyclés écoles", "", "")];
    let raw = cosine_similarity(&vectorize("ordinateurs"), &vectorize(&chunks[0].text));
    assert_eq!(SimilarityIndex::build(vec![]).threshold(), 0.12);

    let at_threshold = SimilarityIndex::builder().strong_terms(StrongTerms::none()).threshold(raw).build(chunks.clone());
    assert_eq!(at_threshold.query("ordinateurs"), QueryResult::NoMatch);

    let just_below = SimilarityIndex::builder().strong_terms(StrongTerms::none()).threshold(raw - 1e-4).build(chunks);
    assert!(just_below.query("ordinateurs").is_match());
}

#[test]
fn ties_keep_first_chunk_in_corpus_order() {
    let chunks = vec![
        Chunk::new(7, "forge logicielle communs numériques", "", ""),
        Chunk::new(3, "forge logicielle communs numériques", "", ""),
    ];
    let index = SimilarityIndex::build(chunks);
    let result = index.query("la forge des communs");
    assert_eq!(result.chunk().map(|c| c.chunk_id), Some(7));
}

#[test]
fn boost_shifts_every_candidate_uniformly() {
    let plain = SimilarityIndex::builder().strong_terms(StrongTerms::none()).build(corpus());
    let boosted = SimilarityIndex::build(corpus());
    let question = "ordinateurs linux";

    let base = plain.scores(question);
    let with_bonus = boosted.scores(question);
    for (b, w) in base.iter().zip(&with_bonus) {
        assert!((w - b - 0.18).abs() < 1e-12, "base={b} boosted={w}");
    }
    assert_eq!(plain.query(question).chunk().map(|c| c.chunk_id), boosted.query(question).chunk().map(|c| c.chunk_id));
}

#[test]
fn boost_can_flip_no_match_into_match() {
    let chunks = vec![Chunk::new(5, "ateliers de réparation", "", "")];
    let question = "pourquoi primtux";
    let plain = SimilarityIndex::builder().strong_terms(StrongTerms::none()).build(chunks.clone());
    assert_eq!(plain.query(question), QueryResult::NoMatch);

    let index = SimilarityIndex::build(chunks);
    let result = index.query(question);
    assert_eq!(result.chunk().map(|c| c.chunk_id), Some(5));
    assert!((result.score().unwrap_or_default() - 0.18).abs() < 1e-12);
}

#[test]
fn explicit_keyword_set_overrides_index_defaults() {
    let index = SimilarityIndex::build(vec![Chunk::new(5, "ateliers de réparation", "", "")]);
    let custom = StrongTerms::new(["pourquoi"], 0.5);
    let result = index.query_with("pourquoi pas", &custom);
    assert_eq!(result.score(), Some(0.5));
}

#[test]
fn empty_question_and_empty_corpus_never_match() {
    assert!(vectorize("").is_empty());
    let index = SimilarityIndex::build(corpus());
    assert_eq!(index.query(""), QueryResult::NoMatch);
    assert_eq!(index.query("comment est-ce que"), QueryResult::NoMatch);

    let empty = SimilarityIndex::build(vec![]);
    assert!(empty.is_empty());
    assert_eq!(empty.query("linux reconditionnement nird"), QueryResult::NoMatch);
}

#[test]
fn engine_from_settings_uses_configured_fallback() {
    let mut settings = Settings::default();
    settings.fallback.text = "Rien trouvé.".to_string();
    settings.engine.threshold = 0.9;
    let engine = AnswerEngine::from_settings(corpus(), &settings);
    let answer = engine.answer("Tchap").expect("answer");
    assert!(answer.is_fallback());
    assert_eq!(answer.contexte, "Rien trouvé.");
    assert_eq!(engine.retriever().len(), 3);
}

#[test]
fn dataset_file_to_answer() {
    let tmp = tempfile::TempDir::new().expect("tmp");
    let path = Dataset::from_chunks(corpus()).export(tmp.path(), "chunks.json").expect("export");
    let dataset = Dataset::load(&path).expect("load");
    let engine = AnswerEngine::from_settings(dataset.chunks, &Settings::default());
    let answer = engine.answer("obsolescence programmée des ordinateurs").expect("answer");
    assert_eq!(answer.chunk_id, 12);
    assert!(!answer.timestamp.is_empty());
}
