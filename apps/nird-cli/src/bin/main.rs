use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use nird_cli::{dataset_path, load_config, load_dataset, logging};
use nird_core::config::Config;
use nird_core::ingest::{ChunkingConfig, Ingestor};
use nird_core::Dataset;
use nird_text::AnswerEngine;

const DEFAULT_EXPORT_FILE: &str = "chunks.json";

#[derive(Parser)]
#[command(name = "nird", version, about = "Semantic search over the NIRD chunk corpus")]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding config.toml (defaults to the working directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Dataset file, overrides data.dataset_path
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a question with the best-matching chunk
    Ask {
        question: String,
        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },
    /// Chunk a directory of .txt files into a dataset file
    Ingest {
        /// Source directory, defaults to data.raw_txt_dir
        dir: Option<PathBuf>,
        /// Output file, defaults to <data.export_dir>/chunks.json
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only process the first N files
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },
    /// Print dataset statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, false);
    let config = load_config(cli.config_dir.as_deref()).inspect_err(|e| eprintln!("Error loading config: {}", e))?;

    match cli.command {
        Command::Ask { question, json } => {
            if question.trim().is_empty() { bail!("Question vide"); }
            let dataset = load_dataset(&dataset_path(&config, cli.dataset.as_deref()))?;
            let engine = AnswerEngine::from_settings(dataset.chunks, config.settings());
            let answer = engine.answer(&question)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                let origin = if answer.is_fallback() { "fallback" } else { "match" };
                println!("🔍 {}", answer.question);
                println!("   {} chunk_id={} confiance={:.3}", origin, answer.chunk_id, answer.confiance);
                println!("   source: {} ({})", answer.source_title, answer.source_url);
                println!("\n{}", answer.contexte);
            }
        }
        Command::Ingest { dir, output, limit, chunk_size, chunk_overlap } => {
            ingest(&config, dir, output, limit, chunk_size, chunk_overlap)?;
        }
        Command::Stats => {
            let dataset = load_dataset(&dataset_path(&config, cli.dataset.as_deref()))?;
            println!("{}", serde_json::to_string_pretty(&dataset.stats())?);
        }
    }
    Ok(())
}

fn ingest(
    config: &Config,
    dir: Option<PathBuf>,
    output: Option<PathBuf>,
    limit: Option<usize>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
) -> anyhow::Result<()> {
    let settings = config.settings();
    let data_dir = dir.unwrap_or_else(|| config.resolve(&settings.data.raw_txt_dir));
    let mut chunking = ChunkingConfig::from(&settings.chunking);
    if let Some(size) = chunk_size { chunking.chunk_size = size; }
    if let Some(overlap) = chunk_overlap { chunking.chunk_overlap = overlap; }
    if chunking.chunk_size == 0 || chunking.chunk_overlap >= chunking.chunk_size {
        bail!("--chunk-overlap ({}) must be smaller than --chunk-size ({})", chunking.chunk_overlap, chunking.chunk_size);
    }

    let (out_dir, file_name) = match output {
        Some(path) => split_output(&path)?,
        None => (config.resolve(&settings.data.export_dir), DEFAULT_EXPORT_FILE.to_string()),
    };

    println!("NIRD ingest\n===========");
    println!("Data directory: {}", data_dir.display());
    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?.progress_chars("#>-"));
    let chunks = Ingestor::new(chunking).process_directory_with(&data_dir, limit, |i, total, path| {
        pb.set_length(total as u64);
        pb.set_position(i as u64 + 1);
        pb.set_message(path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
    })?;
    pb.finish_and_clear();

    if chunks.is_empty() { bail!("No chunks produced from {}", data_dir.display()); }
    let dataset = Dataset::from_chunks(chunks);
    let written = dataset.export(&out_dir, &file_name)?;
    println!("✅ {} chunks, {} tokens, {} sources", dataset.metadata.total_chunks, dataset.metadata.total_tokens, dataset.metadata.sources.len());
    println!("📦 Written to {}", written.display());
    Ok(())
}

fn split_output(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("--output must name a file")?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((dir, file_name))
}
