use std::env;
use std::path::{Path, PathBuf};

use nird_core::Dataset;
use nird_text::{AnswerEngine, SimilarityIndex};

// Answer one question against a dataset file and print the scored result.
// Usage:
//   cargo run -p nird-text --example ask -- "your question" [--dataset ../data/output/chunks.json]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut question = String::new();
    let mut dataset: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dataset" => {
                if i + 1 >= args.len() { eprintln!("--dataset requires a path"); std::process::exit(2); }
                dataset = Some(PathBuf::from(&args[i + 1]));
                i += 2; continue;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown flag: {}", s); std::process::exit(2);
            }
            s => {
                if question.is_empty() { question = s.to_string(); }
                i += 1; continue;
            }
        }
    }

    if question.trim().is_empty() {
        eprintln!("Missing <question> argument");
        std::process::exit(1);
    }

    // Resolve dataset path precedence: flag > NIRD_DATASET > workspace-relative fallback
    let dataset = if let Some(p) = dataset {
        p
    } else if let Ok(env_path) = env::var("NIRD_DATASET") {
        PathBuf::from(env_path)
    } else {
        let base = Path::new(env!("CARGO_MANIFEST_DIR"))
            .ancestors().nth(2)
            .unwrap_or(Path::new("."));
        base.join("larousse_tokens.json")
    };

    let chunks = Dataset::load(&dataset)?.chunks;
    let index = SimilarityIndex::build(chunks);
    for (position, score) in index.scores(&question).iter().enumerate().filter(|(_, s)| **s > 0.0).take(10) {
        println!("  #{position:<4} score={score:.3}");
    }

    let answer = AnswerEngine::new(index).answer(&question)?;
    println!("\nchunk_id={} confiance={:.3} source={}", answer.chunk_id, answer.confiance, answer.source_url);
    println!("{}", answer.contexte);
    Ok(())
}
