//! Process-local document store.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Document, DocumentStore, Filter, FindQuery, STORE_ID_FIELD};
use crate::error::{LaunchpadError, Result};

/// Collections held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_store_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:024x}", n)
    }

    /// Number of collections that have ever received a document.
    pub fn collection_count(&self) -> usize {
        self.collections.read().len()
    }
}

fn doc_id(doc: &Document) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// First `unique` field whose value another document already holds.
fn taken_field<'a>(docs: &[Document], doc: &Document, unique: &[&'a str]) -> Option<&'a str> {
    let id = doc_id(doc);
    unique.iter().copied().find(|field| match doc.get(*field) {
        None | Some(Value::Null) => false,
        Some(value) => docs
            .iter()
            .any(|d| doc_id(d) != id && d.get(*field) == Some(value)),
    })
}

fn duplicate_value(collection: &str, doc: &Document, field: &str) -> LaunchpadError {
    let value = match doc.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    LaunchpadError::duplicate(collection, format!("{}={}", field, value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_unique(
        &self,
        collection: &str,
        mut doc: Document,
        unique: &[&str],
    ) -> Result<Document> {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(id) = doc_id(&doc) {
            if docs.iter().any(|d| doc_id(d) == Some(id)) {
                return Err(LaunchpadError::duplicate(collection, id));
            }
        }
        if let Some(field) = taken_field(docs, &doc, unique) {
            return Err(duplicate_value(collection, &doc, field));
        }

        doc.insert(STORE_ID_FIELD.to_string(), Value::String(self.next_store_id()));
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>> {
        let collections = self.collections.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|d| query.filter.matches(d))
            .cloned()
            .collect();
        drop(collections);

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn replace_where(
        &self,
        collection: &str,
        id: &str,
        mut doc: Document,
        expected: &Filter,
        unique: &[&str],
    ) -> Result<Option<Document>> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = docs
            .iter()
            .position(|d| doc_id(d) == Some(id) && expected.matches(d))
        else {
            return Ok(None);
        };
        if let Some(field) = taken_field(docs, &doc, unique) {
            return Err(duplicate_value(collection, &doc, field));
        }

        let slot = &mut docs[index];
        if let Some(store_id) = slot.get(STORE_ID_FIELD).cloned() {
            doc.insert(STORE_ID_FIELD.to_string(), store_id);
        }
        *slot = doc.clone();
        Ok(Some(doc))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };

        Ok(docs
            .iter()
            .position(|d| doc_id(d) == Some(id))
            .map(|index| docs.remove(index)))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::Sort;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_store_id() {
        let store = MemoryStore::new();
        let stored = store
            .insert("forums", doc(json!({"id": "f1", "title": "General"})))
            .await
            .unwrap();

        let store_id = stored[STORE_ID_FIELD].as_str().unwrap();
        assert_eq!(store_id.len(), 24);
        assert_eq!(store.collection_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store.insert("forums", doc(json!({"id": "f1"}))).await.unwrap();

        let err = store.insert("forums", doc(json!({"id": "f1"}))).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
    }

    #[tokio::test]
    async fn test_replace_keeps_store_id() {
        let store = MemoryStore::new();
        let stored = store.insert("forums", doc(json!({"id": "f1", "title": "Old"}))).await.unwrap();

        let replaced = store
            .replace("forums", "f1", doc(json!({"id": "f1", "title": "New"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced["title"], "New");
        assert_eq!(replaced[STORE_ID_FIELD], stored[STORE_ID_FIELD]);
        assert!(store.replace("forums", "missing", Document::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_fields_rejected_on_insert_and_replace() {
        let store = MemoryStore::new();
        let unique = ["slug"];
        store
            .insert_unique("categories", doc(json!({"id": "c1", "slug": "tools"})), &unique)
            .await
            .unwrap();
        store
            .insert_unique("categories", doc(json!({"id": "c2", "slug": "games"})), &unique)
            .await
            .unwrap();

        let err = store
            .insert_unique("categories", doc(json!({"id": "c3", "slug": "tools"})), &unique)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);

        let err = store
            .replace_where(
                "categories",
                "c2",
                doc(json!({"id": "c2", "slug": "tools"})),
                &Filter::new(),
                &unique,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);

        // Keeping its own value is not a clash.
        let kept = store
            .replace_where(
                "categories",
                "c1",
                doc(json!({"id": "c1", "slug": "tools", "name": "Tools"})),
                &Filter::new(),
                &unique,
            )
            .await
            .unwrap();
        assert!(kept.is_some());
    }

    #[tokio::test]
    async fn test_replace_where_requires_expected_state() {
        let store = MemoryStore::new();
        store
            .insert("launches", doc(json!({"id": "l1", "status": "upcoming"})))
            .await
            .unwrap();
        let upcoming = Filter::new().eq("status", "upcoming");

        let first = store
            .replace_where(
                "launches",
                "l1",
                doc(json!({"id": "l1", "status": "live"})),
                &upcoming,
                &[],
            )
            .await
            .unwrap();
        assert_eq!(first.unwrap()["status"], "live");

        let second = store
            .replace_where(
                "launches",
                "l1",
                doc(json!({"id": "l1", "status": "live"})),
                &upcoming,
                &[],
            )
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_find_sort_skip_limit() {
        let store = MemoryStore::new();
        for (id, day) in [("a", 1), ("b", 3), ("c", 2), ("d", 4)] {
            store
                .insert(
                    "launches",
                    doc(json!({"id": id, "launchDate": format!("2024-01-0{}T00:00:00.000Z", day)})),
                )
                .await
                .unwrap();
        }

        let query = FindQuery::new(Filter::new())
            .sort(Sort::descending("launchDate"))
            .skip(1)
            .limit(2);
        let page = store.find("launches", &query).await.unwrap();
        let ids: Vec<_> = page.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_and_delete_many() {
        let store = MemoryStore::new();
        for (id, topic) in [("p1", "t1"), ("p2", "t1"), ("p3", "t2")] {
            store.insert("forum_posts", doc(json!({"id": id, "topicId": topic}))).await.unwrap();
        }

        let removed = store.delete("forum_posts", "p3").await.unwrap().unwrap();
        assert_eq!(removed["id"], "p3");
        assert!(store.delete("forum_posts", "p3").await.unwrap().is_none());

        let gone = store
            .delete_many("forum_posts", &Filter::new().eq("topicId", "t1"))
            .await
            .unwrap();
        assert_eq!(gone, 2);
        assert_eq!(store.count("forum_posts", &Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find("nothing", &FindQuery::default()).await.unwrap().is_empty());
        assert_eq!(store.count("nothing", &Filter::new()).await.unwrap(), 0);
        assert!(store.find_one("nothing", &Filter::by_id("x")).await.unwrap().is_none());
    }
}
