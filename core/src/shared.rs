use crate::query::Searcher;
use parking_lot::RwLock;
use std::sync::Arc;

/// A searcher that many readers can query while a rebuild swaps in its replacement.
///
/// The searcher itself is never mutated. Readers take an `Arc` snapshot and keep a
/// consistent view even if `replace` runs while they are still scoring.
#[derive(Debug, Clone)]
pub struct SharedSearcher {
    inner: Arc<RwLock<Arc<Searcher>>>,
}

impl SharedSearcher {
    pub fn new(searcher: Searcher) -> Self {
        Self { inner: Arc::new(RwLock::new(Arc::new(searcher))) }
    }

    pub fn current(&self) -> Arc<Searcher> { self.inner.read().clone() }

    /// Install a freshly built or loaded searcher, returning the one it replaced.
    pub fn replace(&self, searcher: Searcher) -> Arc<Searcher> {
        tracing::info!(num_docs = searcher.index().num_docs(), "swapping active index");
        std::mem::replace(&mut *self.inner.write(), Arc::new(searcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Document;
    use crate::scoring::Bm25Params;
    use crate::tokenizer::Tokenizer;
    use std::thread;

    fn searcher(titles: &[&str]) -> Searcher {
        let docs = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Document { id: i as u32 + 1, title: t.to_string(), description: String::new() });
        Searcher::build(docs, Tokenizer::default()).unwrap()
    }

    #[test]
    fn readers_keep_their_snapshot_across_replace() {
        let shared = SharedSearcher::new(searcher(&["alien", "aliens"]));
        let held = shared.current();
        let prev = shared.replace(searcher(&["heat"]));

        assert!(Arc::ptr_eq(&held, &prev));
        assert_eq!(held.index().num_docs(), 2);
        assert_eq!(shared.current().index().num_docs(), 1);
        assert_eq!(held.get_documents("alien").unwrap(), vec![1, 2]);
    }

    #[test]
    fn concurrent_readers_see_whole_indexes() {
        let shared = SharedSearcher::new(searcher(&["cat", "dog"]));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let s = shared.current();
                        let n = s.index().num_docs();
                        let hits = s.bm25_search("cat", usize::MAX, Bm25Params::default()).unwrap();
                        assert_eq!(hits.len(), n);
                    }
                })
            })
            .collect();
        for i in 0..20 {
            let titles: Vec<String> = (0..=i).map(|j| format!("cat{j}")).collect();
            let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
            shared.replace(searcher(&refs));
        }
        for r in readers {
            r.join().unwrap();
        }
    }
}
