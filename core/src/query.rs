use crate::error::Result;
use crate::index::{DocId, Document, InvertedIndex};
use crate::scoring::Bm25Params;
use crate::tokenizer::Tokenizer;
use std::cmp::Ordering;

/// Default number of results for ranked and exact retrieval.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// An index paired with the tokenizer that built it, so raw query text is normalized
/// the same way as the corpus.
#[derive(Debug, Clone)]
pub struct Searcher {
    index: InvertedIndex,
    tokenizer: Tokenizer,
}

impl Searcher {
    pub fn new(index: InvertedIndex, tokenizer: Tokenizer) -> Self { Self { index, tokenizer } }

    pub fn build<I>(documents: I, tokenizer: Tokenizer) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let index = InvertedIndex::build(documents, &tokenizer)?;
        Ok(Self { index, tokenizer })
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    /// Ascending ids of documents containing `term`, which must normalize to one token.
    pub fn get_documents(&self, term: &str) -> Result<Vec<DocId>> {
        let token = self.tokenizer.single_token(term)?;
        Ok(self.index.postings(&token).map(|ids| ids.iter().copied().collect()).unwrap_or_default())
    }

    pub fn get_tf(&self, doc_id: DocId, term: &str) -> Result<u32> {
        let token = self.tokenizer.single_token(term)?;
        self.index.term_frequency(doc_id, &token)
    }

    /// BM25 over every document, highest score first. Equal scores keep corpus order.
    pub fn bm25_search(&self, query: &str, limit: usize, params: Bm25Params) -> Result<Vec<SearchHit<'_>>> {
        let tokens = self.tokenizer.tokenize(query);
        let idfs: Vec<f64> = tokens.iter().map(|t| self.token_bm25_idf(t)).collect();

        let mut hits = Vec::with_capacity(self.index.num_docs());
        for document in self.index.documents() {
            let mut score = 0.0;
            for (token, idf) in tokens.iter().zip(&idfs) {
                score += self.token_bm25_tf(document.id, token, params)? * idf;
            }
            hits.push(SearchHit { document, score });
        }
        // stable: ties stay in insertion order
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(limit);
        tracing::debug!(query, tokens = tokens.len(), returned = hits.len(), "bm25 search");
        Ok(hits)
    }

    /// Unranked postings walk: the full postings of each query token in turn, duplicates
    /// kept. No further tokens are read once [`DEFAULT_SEARCH_LIMIT`] ids have been
    /// collected, so a single long postings list is returned whole.
    pub fn keyword_search(&self, query: &str) -> Vec<&Document> {
        let mut ids: Vec<DocId> = Vec::new();
        for token in self.tokenizer.tokenize(query) {
            if ids.len() >= DEFAULT_SEARCH_LIMIT {
                break;
            }
            if let Some(postings) = self.index.postings(&token) {
                ids.extend(postings.iter().copied());
            }
        }
        ids.into_iter().filter_map(|id| self.index.document(id)).collect()
    }

    /// Legacy mode: matches query tokens as substrings of title tokens without consulting postings.
    pub fn title_search(&self, query: &str) -> Vec<&Document> {
        title_search(self.index.documents(), &self.tokenizer, query, DEFAULT_SEARCH_LIMIT)
    }
}

/// First `limit` documents, in corpus order, where some query token is a substring of
/// some title token.
pub fn title_search<'a>(documents: &'a [Document], tokenizer: &Tokenizer, query: &str, limit: usize) -> Vec<&'a Document> {
    let query_tokens = tokenizer.tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }
    documents
        .iter()
        .filter(|doc| {
            let title_tokens = tokenizer.tokenize(&doc.title);
            query_tokens.iter().any(|q| title_tokens.iter().any(|t| t.contains(q.as_str())))
        })
        .take(limit)
        .collect()
}
