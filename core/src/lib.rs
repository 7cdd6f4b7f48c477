//! Inverted-index keyword search over a fixed document collection, with TF-IDF and BM25 scoring.

pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod scoring;
pub mod shared;
pub mod source;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::{DocId, Document, InvertedIndex};
pub use query::{SearchHit, Searcher, DEFAULT_SEARCH_LIMIT};
pub use scoring::Bm25Params;
pub use shared::SharedSearcher;
pub use tokenizer::{Stopwords, Tokenizer};
