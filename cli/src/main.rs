use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use keyword_core::persist::{self, IndexPaths};
use keyword_core::scoring::{DEFAULT_B, DEFAULT_K1};
use keyword_core::source::{load_documents, load_stopwords};
use keyword_core::{Bm25Params, DocId, Document, Searcher, Tokenizer, DEFAULT_SEARCH_LIMIT};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

const MISSING_INDEX: &str = "Index file not found. Please build the index first.";

#[derive(Parser)]
#[command(name = "keyword-search")]
#[command(about = "Keyword search over a movie collection with TF-IDF and BM25", long_about = None)]
struct Cli {
    /// Movie collection: JSON object with a `movies` array
    #[arg(long, global = true, env = "KEYWORD_SEARCH_MOVIES", default_value = "data/movies.json")]
    movies: PathBuf,
    /// Stopword list, one word per line
    #[arg(long, global = true, env = "KEYWORD_SEARCH_STOPWORDS", default_value = "data/stopwords.txt")]
    stopwords: PathBuf,
    /// Directory holding the index snapshot
    #[arg(long, global = true, env = "KEYWORD_SEARCH_CACHE", default_value = "cache")]
    cache_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchMode {
    /// Walk the postings of each query token
    Index,
    /// Match query tokens inside title tokens
    Title,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index from the movie collection and save it
    Build,
    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands answered from a previously built index.
#[derive(Subcommand)]
enum QueryCommand {
    /// Unranked keyword search over postings, or title substrings with --mode title
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = SearchMode::Index)]
        mode: SearchMode,
    },
    /// Rank movies with BM25
    #[command(name = "bm25search")]
    Bm25Search {
        query: String,
        #[arg(default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Term frequency of a term in a document
    Tf { doc_id: DocId, term: String },
    /// Inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF score of a term in a document
    #[command(name = "tfidf")]
    TfIdf { doc_id: DocId, term: String },
    /// BM25 IDF score of a term
    #[command(name = "bm25idf")]
    Bm25Idf { term: String },
    /// BM25 TF score of a term in a document
    #[command(name = "bm25tf")]
    Bm25Tf {
        doc_id: DocId,
        term: String,
        #[arg(default_value_t = DEFAULT_K1)]
        k1: f64,
        #[arg(default_value_t = DEFAULT_B)]
        b: f64,
    },
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let missing = err
                .chain()
                .any(|cause| cause.downcast_ref::<keyword_core::Error>().is_some_and(|e| e.is_missing_index()));
            if missing {
                println!("{MISSING_INDEX}");
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Loaded once and shared by indexing and every query.
    let stopwords = load_stopwords(&cli.stopwords)
        .with_context(|| format!("reading stopwords from {}", cli.stopwords.display()))?;
    let tokenizer = Tokenizer::new(stopwords);
    let paths = IndexPaths::new(&cli.cache_dir);

    match cli.command {
        Commands::Build => build(&cli.movies, &paths, tokenizer),
        Commands::Query(command) => query(&open(&paths, tokenizer)?, command),
    }
}

fn query(searcher: &Searcher, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Search { query, mode } => {
            let results = match mode {
                SearchMode::Index => searcher.keyword_search(&query),
                SearchMode::Title => searcher.title_search(&query),
            };
            println!("Searching for: {query}");
            print_titles(&results);
        }
        QueryCommand::Bm25Search { query, limit } => {
            let hits = searcher.bm25_search(&query, limit, Bm25Params::default())?;
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. ({}) {} - Score: {:.2}", i + 1, hit.document.id, hit.document.title, hit.score);
            }
        }
        QueryCommand::Tf { doc_id, term } => {
            let tf = searcher.get_tf(doc_id, &term)?;
            println!("Term frequency of '{term}' in document {doc_id}: {tf}");
        }
        QueryCommand::Idf { term } => {
            let idf = searcher.get_idf(&term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
        }
        QueryCommand::TfIdf { doc_id, term } => {
            let tfidf = searcher.get_tfidf(doc_id, &term)?;
            println!("TF-IDF score of '{term}' in document {doc_id}: {tfidf:.2}");
        }
        QueryCommand::Bm25Idf { term } => {
            let idf = searcher.get_bm25_idf(&term)?;
            println!("BM25 IDF score of '{term}': {idf:.2}");
        }
        QueryCommand::Bm25Tf { doc_id, term, k1, b } => {
            let tf = searcher.get_bm25_tf(doc_id, &term, Bm25Params { k1, b })?;
            println!("BM25 TF score of '{term}' in document {doc_id}: {tf:.2}");
        }
    }
    Ok(())
}

fn build(movies: &Path, paths: &IndexPaths, tokenizer: Tokenizer) -> Result<()> {
    let documents = load_documents(movies).with_context(|| format!("reading movies from {}", movies.display()))?;
    let searcher = Searcher::build(documents, tokenizer).context("building index")?;
    let header = persist::save(paths, searcher.index())
        .with_context(|| format!("saving index to {}", paths.root.display()))?;
    tracing::info!(num_docs = header.num_docs, created_at = %header.created_at, "index build complete");
    println!(
        "Indexed {} documents ({} terms) into {}",
        searcher.index().num_docs(),
        searcher.index().num_terms(),
        paths.snapshot().display()
    );
    Ok(())
}

fn open(paths: &IndexPaths, tokenizer: Tokenizer) -> Result<Searcher> {
    let (header, index) = persist::load_with_header(paths)?;
    tracing::debug!(version = header.version, created_at = %header.created_at, num_docs = header.num_docs, "opened index");
    Ok(Searcher::new(index, tokenizer))
}

fn print_titles(results: &[&Document]) {
    for (i, doc) in results.iter().enumerate() {
        println!("{}. {}", i + 1, doc.title);
    }
}
