use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static! {
    // ASCII punctuation, matched one character at a time and deleted.
    static ref PUNCT: Regex = Regex::new(r"[[:punct:]]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Tokens excluded from the index. Matched after punctuation removal, before stemming.
#[derive(Debug, Clone, Default)]
pub struct Stopwords(HashSet<String>);

impl Stopwords {
    /// One stopword per line; surrounding whitespace is ignored and blank lines are skipped.
    pub fn from_text(text: &str) -> Self {
        text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
    }

    pub fn contains(&self, token: &str) -> bool { self.0.contains(token) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<S: Into<String>> FromIterator<S> for Stopwords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Text normalization pipeline shared by indexing and querying.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: Stopwords,
}

impl Tokenizer {
    pub fn new(stopwords: Stopwords) -> Self { Self { stopwords } }

    /// Lowercase, trim, delete punctuation, split on whitespace, drop stopwords, stem.
    ///
    /// Punctuation is deleted rather than replaced, so `"rock-n-roll"` becomes the single
    /// token `"rocknroll"`. Order and duplicates are preserved.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = PUNCT.replace_all(lowered.trim(), "");
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(token))
            .map(|token| STEMMER.stem(token).into_owned())
            .collect()
    }

    /// Normalize a lookup term, requiring that it yields exactly one token.
    pub fn single_token(&self, term: &str) -> Result<String> {
        let mut tokens = self.tokenize(term);
        if tokens.len() != 1 {
            return Err(Error::InvalidTerm { term: term.to_string(), tokens });
        }
        Ok(tokens.remove(0))
    }
}
