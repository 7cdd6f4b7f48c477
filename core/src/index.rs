use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub description: String,
}

impl Document {
    /// Text that gets indexed: title and description joined by a single space.
    pub fn indexed_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Inverted index over a fixed corpus. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, BTreeSet<DocId>>, // sorted by doc_id
    pub(crate) term_frequencies: HashMap<DocId, HashMap<String, u32>>,
    pub(crate) doc_lengths: HashMap<DocId, u32>,
    /// Corpus in input order.
    pub(crate) documents: Vec<Document>,
    positions: HashMap<DocId, usize>,
    total_tokens: u64,
}

impl InvertedIndex {
    /// Index every document in input order.
    ///
    /// Fails on an empty collection (the average document length would be undefined)
    /// and on duplicate ids.
    pub fn build<I>(documents: I, tokenizer: &Tokenizer) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut postings: HashMap<String, BTreeSet<DocId>> = HashMap::new();
        let mut term_frequencies: HashMap<DocId, HashMap<String, u32>> = HashMap::new();
        let mut doc_lengths: HashMap<DocId, u32> = HashMap::new();
        let mut docs: Vec<Document> = Vec::new();
        let mut positions: HashMap<DocId, usize> = HashMap::new();
        let mut total_tokens = 0u64;

        for doc in documents {
            if positions.contains_key(&doc.id) {
                return Err(Error::DuplicateDocument(doc.id));
            }
            let tokens = tokenizer.tokenize(&doc.indexed_text());
            let counts = term_frequencies.entry(doc.id).or_default();
            for token in &tokens {
                *counts.entry(token.clone()).or_insert(0) += 1;
                postings.entry(token.clone()).or_default().insert(doc.id);
            }
            doc_lengths.insert(doc.id, tokens.len() as u32);
            total_tokens += tokens.len() as u64;
            positions.insert(doc.id, docs.len());
            docs.push(doc);
        }

        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        tracing::info!(num_docs = docs.len(), num_terms = postings.len(), total_tokens, "built inverted index");
        Ok(Self { postings, term_frequencies, doc_lengths, documents: docs, positions, total_tokens })
    }

    /// Reassemble an index from its persisted mappings, checking that they agree with each other.
    pub(crate) fn from_parts(
        postings: HashMap<String, BTreeSet<DocId>>,
        term_frequencies: HashMap<DocId, HashMap<String, u32>>,
        doc_lengths: HashMap<DocId, u32>,
        documents: Vec<Document>,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut positions = HashMap::with_capacity(documents.len());
        for (pos, doc) in documents.iter().enumerate() {
            if positions.insert(doc.id, pos).is_some() {
                return Err(Error::DuplicateDocument(doc.id));
            }
        }
        let total_tokens = doc_lengths.values().map(|&l| l as u64).sum();
        let index = Self { postings, term_frequencies, doc_lengths, documents, positions, total_tokens };
        index.check_consistency().map_err(Error::CorruptSnapshot)?;
        Ok(index)
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.term_frequencies.len() != self.documents.len() || self.doc_lengths.len() != self.documents.len() {
            return Err("mapping sizes disagree with the document map".into());
        }
        for doc in &self.documents {
            let counts = self
                .term_frequencies
                .get(&doc.id)
                .ok_or_else(|| format!("document {} has no term frequencies", doc.id))?;
            let length = self
                .doc_lengths
                .get(&doc.id)
                .ok_or_else(|| format!("document {} has no length", doc.id))?;
            let sum: u64 = counts.values().map(|&c| c as u64).sum();
            if sum != *length as u64 {
                return Err(format!("document {} length {} != token count {}", doc.id, length, sum));
            }
            for (token, &count) in counts {
                let listed = self.postings.get(token).is_some_and(|ids| ids.contains(&doc.id));
                if count == 0 || !listed {
                    return Err(format!("token {token:?} in document {} missing from postings", doc.id));
                }
            }
        }
        for (token, ids) in &self.postings {
            for id in ids {
                let counted = self.term_frequencies.get(id).and_then(|c| c.get(token)).is_some();
                if !counted {
                    return Err(format!("postings for {token:?} list document {id} without a count"));
                }
            }
        }
        Ok(())
    }

    pub fn num_docs(&self) -> usize { self.documents.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Corpus in the order it was indexed.
    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.positions.get(&doc_id).map(|&pos| &self.documents[pos])
    }

    /// Ids of documents containing an already-normalized token.
    pub fn postings(&self, token: &str) -> Option<&BTreeSet<DocId>> { self.postings.get(token) }

    pub fn doc_freq(&self, token: &str) -> usize { self.postings.get(token).map_or(0, BTreeSet::len) }

    /// Occurrences of a normalized token in a document; 0 if the document lacks it.
    pub fn term_frequency(&self, doc_id: DocId, token: &str) -> Result<u32> {
        let counts = self.term_frequencies.get(&doc_id).ok_or(Error::UnknownDocument(doc_id))?;
        Ok(counts.get(token).copied().unwrap_or(0))
    }

    pub fn doc_length(&self, doc_id: DocId) -> Result<u32> {
        self.doc_lengths.get(&doc_id).copied().ok_or(Error::UnknownDocument(doc_id))
    }

    pub fn avg_doc_length(&self) -> f64 {
        if self.documents.is_empty() {
            return 0.0;
        }
        self.total_tokens as f64 / self.documents.len() as f64
    }
}
