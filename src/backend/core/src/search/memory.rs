//! In-memory inverted index.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{IndexedContent, SearchHit, SearchIndex, SearchQuery};
use crate::error::Result;

const TITLE_WEIGHT: f64 = 2.0;
const BODY_WEIGHT: f64 = 1.0;
const SNIPPET_CHARS: usize = 160;

type Key = (String, String);

#[derive(Debug, Default)]
struct Inner {
    /// Record and the distinct tokens it was indexed under.
    records: HashMap<Key, (IndexedContent, Vec<String>)>,
    /// Token to per-record weight. Ordered so prefix lookups are range scans.
    postings: BTreeMap<String, HashMap<Key, f64>>,
}

impl Inner {
    fn remove(&mut self, key: &Key) -> bool {
        let Some((_, tokens)) = self.records.remove(key) else {
            return false;
        };
        for token in tokens {
            if let Some(postings) = self.postings.get_mut(&token) {
                postings.remove(key);
                if postings.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
        true
    }

    /// Weight of each record holding a token that starts with `term`.
    fn prefix_matches(&self, term: &str) -> HashMap<&Key, f64> {
        let mut matches: HashMap<&Key, f64> = HashMap::new();
        for (_, postings) in self
            .postings
            .range(term.to_string()..)
            .take_while(|(token, _)| token.starts_with(term))
        {
            for (key, weight) in postings {
                *matches.entry(key).or_default() += weight;
            }
        }
        matches
    }
}

/// Lowercased alphanumeric words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

/// Index kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    inner: RwLock<Inner>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn index(&self, content: IndexedContent) -> Result<()> {
        let key = (content.content_type.clone(), content.id.clone());

        let mut weights: HashMap<String, f64> = HashMap::new();
        for token in tokenize(&content.title) {
            *weights.entry(token).or_default() += TITLE_WEIGHT;
        }
        for token in tokenize(&content.body) {
            *weights.entry(token).or_default() += BODY_WEIGHT;
        }

        let mut inner = self.inner.write();
        inner.remove(&key);

        let tokens: Vec<String> = weights.keys().cloned().collect();
        for (token, weight) in weights {
            inner
                .postings
                .entry(token)
                .or_default()
                .insert(key.clone(), weight);
        }
        inner.records.insert(key, (content, tokens));
        Ok(())
    }

    async fn remove(&self, content_type: &str, id: &str) -> Result<bool> {
        let key = (content_type.to_string(), id.to_string());
        Ok(self.inner.write().remove(&key))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let terms = tokenize(&query.text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.inner.read();

        // Every term must match; scores add up across terms.
        let mut scored: Option<HashMap<&Key, f64>> = None;
        for term in &terms {
            let matches = inner.prefix_matches(term);
            scored = Some(match scored {
                None => matches,
                Some(previous) => previous
                    .into_iter()
                    .filter_map(|(key, score)| matches.get(key).map(|w| (key, score + w)))
                    .collect(),
            });
        }

        let mut ranked: Vec<(&Key, f64)> = scored
            .unwrap_or_default()
            .into_iter()
            .filter(|((content_type, _), _)| {
                query.types.is_empty() || query.types.iter().any(|t| t == content_type)
            })
            .collect();

        ranked.sort_by(|(a_key, a_score), (b_key, b_score)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a_key.1.cmp(&b_key.1))
                .then_with(|| a_key.0.cmp(&b_key.0))
        });

        Ok(ranked
            .into_iter()
            .take(query.limit)
            .filter_map(|(key, score)| {
                inner.records.get(key).map(|(content, _)| SearchHit {
                    id: content.id.clone(),
                    content_type: content.content_type.clone(),
                    title: content.title.clone(),
                    snippet: snippet(&content.body),
                    url: content.url.clone(),
                    score,
                    data: async_graphql::Json(content.data.clone()),
                })
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.inner.read().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(id: &str, title: &str, body: &str) -> IndexedContent {
        IndexedContent {
            id: id.into(),
            content_type: "product".into(),
            title: title.into(),
            body: body.into(),
            url: Some(format!("/products/{}", id)),
            data: json!({ "id": id }),
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery {
            text: text.into(),
            types: Vec::new(),
            limit: 20,
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Hello, World! v2.0"), vec!["hello", "world", "v2", "0"]);
    }

    #[tokio::test]
    async fn test_prefix_and_all_terms() {
        let index = MemoryIndex::new();
        index.index(content("p1", "Launch Tracker", "Track product launches")).await.unwrap();
        index.index(content("p2", "Review Board", "Collect reviews")).await.unwrap();

        let hits = index.search(&query("launch")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");
        // title "launch" (2.0) + body "launches" (1.0)
        assert_eq!(hits[0].score, 3.0);

        assert!(index.search(&query("launch reviews")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reindex_replaces_tokens() {
        let index = MemoryIndex::new();
        index.index(content("p1", "Old Name", "")).await.unwrap();
        index.index(content("p1", "New Name", "")).await.unwrap();

        assert_eq!(index.len(), 1);
        assert!(index.search(&query("old")).await.unwrap().is_empty());
        assert_eq!(index.search(&query("new")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ties_break_on_id() {
        let index = MemoryIndex::new();
        index.index(content("b", "Same", "")).await.unwrap();
        index.index(content("a", "Same", "")).await.unwrap();

        let ids: Vec<_> = index
            .search(&query("same"))
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let index = MemoryIndex::new();
        index.index(content("p1", "Gone Soon", "")).await.unwrap();
        assert!(index.remove("product", "p1").await.unwrap());
        assert!(!index.remove("product", "p1").await.unwrap());
        assert!(index.is_empty());
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(400);
        assert_eq!(snippet(&long).chars().count(), SNIPPET_CHARS + 1);
        assert_eq!(snippet("  short  "), "short");
    }
}
