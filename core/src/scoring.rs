//! TF-IDF and BM25 scoring.
//!
//! The free functions are the bare formulas. The `Searcher` methods below normalize a raw
//! term first and require it to reduce to exactly one token.

use crate::error::Result;
use crate::index::DocId;
use crate::query::Searcher;

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f64,
    /// Document length normalization: 0 disables it, 1 applies it fully.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self { Self { k1: DEFAULT_K1, b: DEFAULT_B } }
}

/// `ln((N + 1) / (df + 1))`
pub fn idf(num_docs: usize, doc_freq: usize) -> f64 {
    ((num_docs as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln()
}

/// `ln((N - df + 0.5) / (df + 0.5) + 1)`; finite and positive for `df <= N`.
pub fn bm25_idf(num_docs: usize, doc_freq: usize) -> f64 {
    let n = num_docs as f64;
    let df = doc_freq as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Saturating, length-normalized term frequency.
pub fn bm25_tf(tf: u32, doc_len: u32, avg_doc_len: f64, params: Bm25Params) -> f64 {
    // Zero tf short-circuits so a corpus of empty documents never divides by zero.
    if tf == 0 {
        return 0.0;
    }
    let tf = tf as f64;
    let length_norm = 1.0 - params.b + params.b * (doc_len as f64 / avg_doc_len);
    tf * (params.k1 + 1.0) / (tf + params.k1 * length_norm)
}

impl Searcher {
    pub fn get_idf(&self, term: &str) -> Result<f64> {
        let token = self.tokenizer().single_token(term)?;
        Ok(idf(self.index().num_docs(), self.index().doc_freq(&token)))
    }

    pub fn get_tfidf(&self, doc_id: DocId, term: &str) -> Result<f64> {
        let tf = self.get_tf(doc_id, term)?;
        let idf = self.get_idf(term)?;
        Ok(tf as f64 * idf)
    }

    pub fn get_bm25_idf(&self, term: &str) -> Result<f64> {
        let token = self.tokenizer().single_token(term)?;
        Ok(self.token_bm25_idf(&token))
    }

    pub fn get_bm25_tf(&self, doc_id: DocId, term: &str, params: Bm25Params) -> Result<f64> {
        let token = self.tokenizer().single_token(term)?;
        self.token_bm25_tf(doc_id, &token, params)
    }

    /// One term's contribution to a document's BM25 score.
    pub fn bm25_term_score(&self, doc_id: DocId, term: &str, params: Bm25Params) -> Result<f64> {
        let token = self.tokenizer().single_token(term)?;
        Ok(self.token_bm25_tf(doc_id, &token, params)? * self.token_bm25_idf(&token))
    }

    pub(crate) fn token_bm25_idf(&self, token: &str) -> f64 {
        bm25_idf(self.index().num_docs(), self.index().doc_freq(token))
    }

    pub(crate) fn token_bm25_tf(&self, doc_id: DocId, token: &str, params: Bm25Params) -> Result<f64> {
        let index = self.index();
        let tf = index.term_frequency(doc_id, token)?;
        let doc_len = index.doc_length(doc_id)?;
        Ok(bm25_tf(tf, doc_len, index.avg_doc_length(), params))
    }
}
