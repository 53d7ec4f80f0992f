use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use vsm_core::persist::{load_snapshot, save_snapshot, IndexPaths};
use vsm_core::{build_index, build_index_parallel, export_postings, search, InvertedIndex, PostingsWriter, SearchOptions, DEFAULT_TOP_K};

mod corpus;

use corpus::read_corpus;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a vector-space inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every file in a corpus directory and save a snapshot
    Build {
        /// Corpus directory; each regular file is one document
        #[arg(long)]
        corpus: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Shard documents across threads while building
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Rank documents for a free-text query
    Search {
        /// Snapshot directory written by `build`
        #[arg(long, required_unless_present = "corpus", conflicts_with = "corpus")]
        index: Option<PathBuf>,
        /// Build an in-memory index from this directory instead of loading a snapshot
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long, short)]
        query: String,
        /// Number of results
        #[arg(long, short, default_value_t = DEFAULT_TOP_K)]
        k: usize,
        /// Disable Soundex expansion of unknown query terms
        #[arg(long, default_value_t = false)]
        no_fallback: bool,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the postings dump of a snapshot
    Export {
        #[arg(long)]
        index: PathBuf,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, output, parallel } => build(&corpus, &output, parallel),
        Commands::Search { index, corpus, query, k, no_fallback, json } => {
            let index = match (index, corpus) {
                (Some(dir), _) => load_snapshot(&IndexPaths::new(dir))?.0,
                (None, Some(dir)) => index_corpus(&dir, false)?,
                (None, None) => bail!("either --index or --corpus is required"),
            };
            let options = SearchOptions { top_k: k, phonetic_fallback: !no_fallback };
            run_search(&index, &query, &options, json)
        }
        Commands::Export { index, out } => export(&index, out.as_deref()),
    }
}

fn index_corpus(corpus: &Path, parallel: bool) -> Result<InvertedIndex> {
    let docs = read_corpus(corpus)?;
    tracing::info!(corpus = %corpus.display(), num_docs = docs.len(), parallel, "read corpus");
    let index = if parallel { build_index_parallel(&docs)? } else { build_index(docs)? };
    Ok(index)
}

fn build(corpus: &Path, output: &Path, parallel: bool) -> Result<()> {
    let index = index_corpus(corpus, parallel)?;
    let paths = IndexPaths::new(output);
    let meta = save_snapshot(&paths, &index)?;
    tracing::info!(output = %output.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "index build complete");
    Ok(())
}

fn run_search(index: &InvertedIndex, query: &str, options: &SearchOptions, json: bool) -> Result<()> {
    let hits = search(index, query, options);
    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    println!("Top results for: {query}");
    if hits.is_empty() {
        println!("(no matches)");
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>3}. {:<32} {:.6}", rank + 1, hit.doc_id, hit.score);
    }
    Ok(())
}

fn export(index_dir: &Path, out: Option<&Path>) -> Result<()> {
    let (index, _) = load_snapshot(&IndexPaths::new(index_dir))?;
    match out {
        Some(path) => {
            let mut writer = PostingsWriter::new(BufWriter::new(File::create(path)?));
            export_postings(&index, &mut writer)?;
            tracing::info!(out = %path.display(), num_terms = index.num_terms(), "postings exported");
        }
        None => {
            let mut writer = PostingsWriter::new(BufWriter::new(io::stdout().lock()));
            export_postings(&index, &mut writer)?;
        }
    }
    Ok(())
}
