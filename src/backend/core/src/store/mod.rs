//! Document store abstraction.
//!
//! Repositories talk to collections of JSON documents through the
//! [`DocumentStore`] trait. Each document carries a string `id` assigned by the
//! domain layer and an `_id` assigned by the store; `_id` never leaves the
//! repository layer.

pub mod filter;
pub mod iso;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

pub use filter::{Condition, Filter, FindQuery, Sort, SortDirection};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::error::Result;

/// A stored document: a JSON object keyed by camelCase field names.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Internal identifier field added by the store.
pub const STORE_ID_FIELD: &str = "_id";

/// Collection-oriented persistence.
///
/// Operations are single-document atomic at most. There are no transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// Insert a document and return it with its `_id`.
    ///
    /// Fails with `DuplicateRecord` when a document with the same `id` exists,
    /// or when another document already holds the value of one of the
    /// `unique` fields. Both checks are atomic with the write.
    async fn insert_unique(
        &self,
        collection: &str,
        doc: Document,
        unique: &[&str],
    ) -> Result<Document>;

    async fn insert(&self, collection: &str, doc: Document) -> Result<Document> {
        self.insert_unique(collection, doc, &[]).await
    }

    /// Documents matching the query, ordered and windowed.
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>>;

    /// Replace the document with the given `id`, keeping its `_id`, but only
    /// while the current document matches `expected`.
    ///
    /// Returns `None` if no document has that `id` or it no longer matches.
    /// `unique` fields are checked as in [`insert_unique`](Self::insert_unique).
    async fn replace_where(
        &self,
        collection: &str,
        id: &str,
        doc: Document,
        expected: &Filter,
        unique: &[&str],
    ) -> Result<Option<Document>>;

    /// Returns the stored document, or `None` if no document has that `id`.
    async fn replace(&self, collection: &str, id: &str, doc: Document) -> Result<Option<Document>> {
        self.replace_where(collection, id, doc, &Filter::new(), &[]).await
    }

    /// Remove the document with the given `id` and return it.
    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Remove every matching document and return how many went.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let query = FindQuery::new(filter.clone()).limit(1);
        Ok(self.find(collection, &query).await?.into_iter().next())
    }
}

/// Shared handle to whichever backend is configured.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Build the configured store backend.
pub async fn connect(config: &DatabaseConfig) -> Result<SharedStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(config).await?;
            store.migrate().await?;
            tracing::info!("Connected to PostgreSQL document store");
            Ok(Arc::new(store))
        }
    }
}
