//! Generic entity repository over a document store collection.
//!
//! Entities convert to and from documents through serde. The store's internal
//! `_id` is stripped before a document reaches the domain layer, and dates stay
//! in their fixed-width ISO form.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::pagination::OffsetPagination;
use crate::store::{Document, Filter, FindQuery, SharedStore, Sort, STORE_ID_FIELD};

/// A domain record persisted in one collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection holding this entity's documents.
    const COLLECTION: &'static str;

    /// Human-readable type name used in error messages.
    const NAME: &'static str;

    /// Date field lists are ordered by, newest first.
    const SORT_FIELD: &'static str = "createdAt";

    /// Fields no two records of the collection may share.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    /// Build the entity from a stored document.
    fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(to_plain(doc)))?)
    }

    /// Plain document for this entity, with camelCase fields and ISO dates.
    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(LaunchpadError::with_internal(
                ErrorCode::SerializationError,
                "Failed to serialize record",
                format!("{} serialized to a non-object: {}", Self::NAME, other),
            )),
        }
    }
}

/// Strip store-internal fields from a document.
pub fn to_plain(mut doc: Document) -> Document {
    doc.remove(STORE_ID_FIELD);
    doc
}

/// A fresh random identifier for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Typed access to one collection.
pub struct Repository<E> {
    store: SharedStore,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        E::COLLECTION
    }

    /// Insert a new record. A missing or empty `id` is replaced with a UUID v4.
    pub async fn insert(&self, entity: &E) -> Result<E> {
        let mut doc = entity.to_document()?;
        let has_id = doc
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            doc.insert("id".to_string(), Value::String(new_id()));
        }

        let stored = self
            .store
            .insert_unique(E::COLLECTION, doc, E::UNIQUE_FIELDS)
            .await?;
        E::from_document(stored)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        self.find_one(Filter::by_id(id)).await
    }

    /// Fetch a record or fail with `NotFound`.
    pub async fn get(&self, id: &str) -> Result<E> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| LaunchpadError::not_found(E::NAME, id))
    }

    /// Replace a stored record with the given state.
    pub async fn replace(&self, entity: &E) -> Result<E> {
        self.replace_if(entity, Filter::new())
            .await?
            .ok_or_else(|| LaunchpadError::not_found(E::NAME, entity.id()))
    }

    /// Replace a stored record only while it still matches `expected`.
    ///
    /// `None` means the record is gone or has moved on; the caller decides
    /// which error that is.
    pub async fn replace_if(&self, entity: &E, expected: Filter) -> Result<Option<E>> {
        let doc = entity.to_document()?;
        self.store
            .replace_where(E::COLLECTION, entity.id(), doc, &expected, E::UNIQUE_FIELDS)
            .await?
            .map(E::from_document)
            .transpose()
    }

    /// Remove a record and return what was removed.
    pub async fn delete(&self, id: &str) -> Result<E> {
        let removed = self
            .store
            .delete(E::COLLECTION, id)
            .await?
            .ok_or_else(|| LaunchpadError::not_found(E::NAME, id))?;
        E::from_document(removed)
    }

    pub async fn delete_where(&self, filter: &Filter) -> Result<u64> {
        self.store.delete_many(E::COLLECTION, filter).await
    }

    /// Matching records, newest first by the entity's sort field, windowed.
    pub async fn find(&self, filter: Filter, page: OffsetPagination) -> Result<Vec<E>> {
        let query = FindQuery::new(filter)
            .sort(Sort::descending(E::SORT_FIELD))
            .skip(page.offset())
            .limit(page.limit());
        self.load(&query).await
    }

    /// Every matching record, newest first. Used for cascades and aggregates.
    pub async fn find_all(&self, filter: Filter) -> Result<Vec<E>> {
        let query = FindQuery::new(filter).sort(Sort::descending(E::SORT_FIELD));
        self.load(&query).await
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<E>> {
        self.store
            .find_one(E::COLLECTION, &filter)
            .await?
            .map(E::from_document)
            .transpose()
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        self.store.count(E::COLLECTION, filter).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.count(&Filter::new()).await? == 0)
    }

    async fn load(&self, query: &FindQuery) -> Result<Vec<E>> {
        self.store
            .find(E::COLLECTION, query)
            .await?
            .into_iter()
            .map(E::from_document)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{DateTime, Duration, Utc};
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: String,
        text: String,
        #[serde(with = "crate::store::iso")]
        created_at: DateTime<Utc>,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";
        const NAME: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, minutes: i64) -> Note {
        Note {
            id: id.to_string(),
            text: format!("note {}", id),
            created_at: crate::store::iso::truncate(Utc::now()) + Duration::minutes(minutes),
        }
    }

    fn repo() -> Repository<Note> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_insert_generates_missing_id() {
        let repo = repo();
        let stored = repo.insert(&note("", 0)).await.unwrap();

        assert_eq!(stored.id.len(), 36);
        assert_eq!(repo.get(&stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_documents_are_plain() {
        let repo = repo();
        let stored = repo.insert(&note("n1", 0)).await.unwrap();
        let doc = stored.to_document().unwrap();

        assert!(!doc.contains_key(STORE_ID_FIELD));
        assert!(doc.contains_key("createdAt"));
        assert!(doc["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let repo = repo();

        assert!(repo.get("missing").await.unwrap_err().is_not_found());
        assert!(repo.delete("missing").await.unwrap_err().is_not_found());
        assert!(repo.replace(&note("missing", 0)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_is_newest_first_and_windowed() {
        let repo = repo();
        for (id, minutes) in [("a", 0), ("b", 2), ("c", 1), ("d", 3)] {
            repo.insert(&note(id, minutes)).await.unwrap();
        }

        let all: Vec<_> = repo
            .find(Filter::new(), OffsetPagination::default())
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(all, vec!["d", "b", "c", "a"]);

        let window: Vec<_> = repo
            .find(Filter::new(), OffsetPagination::new(1, 2))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(window, vec!["b", "c"]);
        assert!(!repo.is_empty().await.unwrap());
    }
}
