//! Full-text search over indexed platform content.
//!
//! Aspects register the content types they contribute, then push their
//! records into the index on every create and update and pull them on delete.
//! Queries rank matches by term weight, titles counting double.

pub mod memory;
pub mod schema;

use async_graphql::SimpleObject;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub use memory::MemoryIndex;

use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::observability::metrics;
use crate::repository::Entity;

/// Results returned when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound on results per query.
pub const MAX_SEARCH_LIMIT: usize = 100;

// ═══════════════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════════════

/// A kind of searchable content contributed by an aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SearchType {
    /// Type key, e.g. `product`.
    pub name: String,
    /// Display label, e.g. `Products`.
    pub label: String,
    /// Route pattern a hit of this type links to.
    pub route: String,
    /// Aspect that registered the type.
    pub aspect: String,
}

impl SearchType {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        route: impl Into<String>,
        aspect: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            route: route.into(),
            aspect: aspect.into(),
        }
    }
}

/// One record as the index sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedContent {
    pub id: String,
    pub content_type: String,
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    /// Plain object form of the record.
    pub data: Value,
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    #[graphql(name = "type")]
    pub content_type: String,
    pub title: String,
    pub snippet: String,
    pub url: Option<String>,
    pub score: f64,
    pub data: async_graphql::Json<Value>,
}

/// Parsed query handed to an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Restrict to these types; empty means every type.
    pub types: Vec<String>,
    pub limit: usize,
}

/// Records that can be pushed into the search index.
pub trait Indexable: Entity {
    /// Search type key the record is indexed under.
    const SEARCH_TYPE: &'static str;

    fn search_title(&self) -> String;

    fn search_body(&self) -> String;

    fn search_url(&self) -> Option<String> {
        None
    }

    fn to_indexed(&self) -> Result<IndexedContent> {
        Ok(IndexedContent {
            id: self.id().to_string(),
            content_type: Self::SEARCH_TYPE.to_string(),
            title: self.search_title(),
            body: self.search_body(),
            url: self.search_url(),
            data: Value::Object(self.to_document()?),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Index Backend
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
pub trait SearchIndex: Send + Sync + 'static {
    /// Add or replace a record.
    async fn index(&self, content: IndexedContent) -> Result<()>;

    /// Drop a record. Returns whether it was indexed.
    async fn remove(&self, content_type: &str, id: &str) -> Result<bool>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;

    /// Number of indexed records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Search operations shared by every aspect.
#[derive(Clone)]
pub struct SearchService {
    index: Arc<dyn SearchIndex>,
    types: Arc<DashMap<String, SearchType>>,
}

impl SearchService {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self {
            index,
            types: Arc::new(DashMap::new()),
        }
    }

    /// Service over a fresh in-memory index.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryIndex::new()))
    }

    /// Register a searchable type. Names are unique.
    pub fn register_search_type(&self, search_type: SearchType) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.types.entry(search_type.name.clone()) {
            Entry::Occupied(existing) => Err(LaunchpadError::duplicate(
                "SearchType",
                existing.key().as_str(),
            )),
            Entry::Vacant(slot) => {
                tracing::debug!(search_type = %search_type.name, aspect = %search_type.aspect, "Search type registered");
                slot.insert(search_type);
                Ok(())
            }
        }
    }

    /// Registered types ordered by name.
    pub fn search_types(&self) -> Vec<SearchType> {
        let mut types: Vec<SearchType> = self.types.iter().map(|t| t.value().clone()).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    fn ensure_registered(&self, content_type: &str) -> Result<()> {
        if self.types.contains_key(content_type) {
            Ok(())
        } else {
            Err(LaunchpadError::new(
                ErrorCode::UnknownSearchType,
                format!("Unknown search type: {}", content_type),
            ))
        }
    }

    /// Push content into the index under a registered type.
    pub async fn index_content(&self, content: IndexedContent) -> Result<()> {
        self.ensure_registered(&content.content_type)?;
        self.index.index(content).await
    }

    /// Index a record under its own search type.
    pub async fn index_entity<E: Indexable>(&self, entity: &E) -> Result<()> {
        self.index_content(entity.to_indexed()?).await
    }

    pub async fn remove_content(&self, content_type: &str, id: &str) -> Result<bool> {
        self.ensure_registered(content_type)?;
        self.index.remove(content_type, id).await
    }

    /// Rank indexed content against `text`.
    ///
    /// Blank text yields no hits. Unknown types in `types` are rejected.
    pub async fn search(
        &self,
        text: &str,
        types: Option<Vec<String>>,
        limit: Option<i32>,
    ) -> Result<Vec<SearchHit>> {
        let types = types.unwrap_or_default();
        for content_type in &types {
            self.ensure_registered(content_type)?;
        }

        let limit = match limit {
            None => DEFAULT_SEARCH_LIMIT,
            Some(l) if l < 1 => {
                return Err(LaunchpadError::new(
                    ErrorCode::InvalidInput,
                    "Limit must be at least 1",
                ))
            }
            Some(l) => (l as usize).min(MAX_SEARCH_LIMIT),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .index
            .search(&SearchQuery {
                text: text.to_string(),
                types,
                limit,
            })
            .await?;

        metrics::record_search_query(hits.len());
        Ok(hits)
    }

    pub fn indexed_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(content_type: &str, id: &str, title: &str, body: &str) -> IndexedContent {
        IndexedContent {
            id: id.into(),
            content_type: content_type.into(),
            title: title.into(),
            body: body.into(),
            url: None,
            data: json!({ "id": id }),
        }
    }

    fn service() -> SearchService {
        let service = SearchService::in_memory();
        service
            .register_search_type(SearchType::new("product", "Products", "/products/:productId", "products"))
            .unwrap();
        service
            .register_search_type(SearchType::new("forum", "Forums", "/forums/:forumId", "forums"))
            .unwrap();
        service
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let service = service();
        let err = service
            .register_search_type(SearchType::new("product", "Again", "/x", "other"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);

        let names: Vec<_> = service.search_types().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["forum", "product"]);
    }

    #[tokio::test]
    async fn test_unknown_type_rejected() {
        let service = service();
        let err = service
            .index_content(content("widget", "w1", "Widget", ""))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownSearchType);

        let err = service
            .search("anything", Some(vec!["widget".into()]), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownSearchType);
    }

    #[tokio::test]
    async fn test_index_search_remove() {
        let service = service();
        service
            .index_content(content("product", "p1", "Rustacean Radar", "Track crates"))
            .await
            .unwrap();
        service
            .index_content(content("forum", "f1", "General", "Talk about rustacean things"))
            .await
            .unwrap();

        let hits = service.search("rustacean", None, None).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "p1", "title matches outrank body matches");

        let hits = service
            .search("rustacean", Some(vec!["forum".into()]), None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        assert!(service.remove_content("product", "p1").await.unwrap());
        let hits = service.search("radar", None, None).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_and_bad_limit() {
        let service = service();
        assert!(service.search("   ", None, None).await.unwrap().is_empty());
        assert_eq!(
            service.search("x", None, Some(0)).await.unwrap_err().code(),
            ErrorCode::InvalidInput
        );
    }
}
