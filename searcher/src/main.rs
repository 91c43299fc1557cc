use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use retrieval::{Engine, EngineConfig, Hit, ModelKind};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Query a directory of text files with classical retrieval models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory of documents (overrides the config file)
    #[arg(long)]
    docs: Option<PathBuf>,
    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the probabilistic relevance priors
    #[arg(long)]
    seed: Option<u64>,
    /// Latent topics for LSI
    #[arg(long)]
    topics: Option<usize>,
    /// Keyword graph for proximal-node search: a JSON object mapping each keyword to
    /// the document file names it links, e.g. {"oxygen": ["plants.txt"]}.
    /// See data/concept_graph.json
    #[arg(long)]
    graph: Option<PathBuf>,
}

impl CorpusArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(docs) = &self.docs {
            config.documents_dir = docs.clone();
        }
        if self.seed.is_some() {
            config.prior_seed = self.seed;
        }
        if let Some(topics) = self.topics {
            config.lsi_topics = topics;
        }
        if self.graph.is_some() {
            config.concept_graph = self.graph.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the ranked documents
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Retrieval model
        #[arg(long, default_value = "vector")]
        model: ModelKind,
        /// Maximum number of results
        #[arg(long)]
        top_n: Option<usize>,
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
        query: String,
    },
    /// Summarize the corpus and its term statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// How many of the most widespread terms to list
        #[arg(long, default_value_t = 10)]
        top_terms: usize,
    },
    /// List the available models
    Models,
    /// Read queries from stdin until `exit`
    Shell {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value = "vector")]
        model: ModelKind,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    model: ModelKind,
    took_s: f64,
    total_hits: usize,
    results: &'a [Hit],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, model, top_n, json, query } => {
            let engine = Engine::new(corpus.engine_config()?)?;
            let start = Instant::now();
            let hits = engine.search(model, &query, top_n)?;
            if json {
                let out = SearchOutput {
                    query: &query,
                    model,
                    took_s: start.elapsed().as_secs_f64(),
                    total_hits: hits.len(),
                    results: &hits,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_hits(&mut io::stdout().lock(), model, &query, &hits)?;
            }
            Ok(())
        }
        Commands::Stats { corpus, top_terms } => stats(&corpus.engine_config()?, top_terms),
        Commands::Models => {
            for kind in ModelKind::ALL {
                println!("{:<16} {}", kind.name(), kind.description());
            }
            Ok(())
        }
        Commands::Shell { corpus, model } => shell(Engine::new(corpus.engine_config()?)?, model),
    }
}

fn print_hits<W: Write>(out: &mut W, model: ModelKind, query: &str, hits: &[Hit]) -> Result<()> {
    writeln!(out, "Top {} results for '{}' ({})", hits.len(), query, model)?;
    for (rank, hit) in hits.iter().enumerate() {
        if model.is_scored() {
            writeln!(out, "{}. {} (Score: {:.4})", rank + 1, hit.doc_id, hit.score)?;
        } else {
            writeln!(out, "{}. {}", rank + 1, hit.doc_id)?;
        }
        if let Some(snippet) = &hit.snippet {
            writeln!(out, "   {}", snippet.trim())?;
        }
    }
    Ok(())
}

fn stats(config: &EngineConfig, top_terms: usize) -> Result<()> {
    let engine = Engine::new(config.clone())?;
    let snapshot = engine.snapshot();
    let corpus = snapshot.corpus();
    let stats = snapshot.stats();

    println!("documents: {}", corpus.len());
    println!("distinct terms: {}", stats.index.len());
    for (idx, doc) in corpus.iter() {
        let f = stats.features[idx];
        println!(
            "  {:<24} words={:<6} unique={:<6} avg_len={:.2}",
            doc.id(),
            f.word_count,
            f.unique_words,
            f.avg_word_len
        );
    }

    let mut by_df: Vec<(&str, u32)> = stats.df.iter().map(|(t, &n)| (t.as_str(), n)).collect();
    by_df.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    println!("most widespread terms:");
    for (term, df) in by_df.into_iter().take(top_terms) {
        println!("  {:<20} df={}", term, df);
    }
    Ok(())
}

fn shell(engine: Engine, mut model: ModelKind) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "model: {model}  (:model NAME, :refresh, exit)")?;
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input == ":refresh" {
            let snapshot = engine.refresh();
            writeln!(out, "reloaded {} documents", snapshot.corpus().len())?;
            continue;
        }
        if let Some(name) = input.strip_prefix(":model") {
            match name.trim().parse::<ModelKind>() {
                Ok(kind) => {
                    model = kind;
                    writeln!(out, "model: {model}")?;
                }
                Err(e) => writeln!(out, "{e}")?,
            }
            continue;
        }
        if input.is_empty() {
            continue;
        }
        match engine.search(model, input, None) {
            Ok(hits) => print_hits(&mut out, model, input, &hits)?,
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                writeln!(out, "error: {e}")?;
            }
        }
    }
    Ok(())
}
