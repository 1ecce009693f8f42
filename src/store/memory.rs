use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::collection::Collection;
use crate::store::{Document, DocumentStore, ObjectId, StoreError};

/// In-memory document store.
///
/// Default backend for local development and the backend the test suite runs
/// against. Documents keep insertion order per collection, which is the
/// "store order" the list operation exposes.
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { collections: RwLock::new(HashMap::new()) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn doc_id(doc: &Document) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Equality match against a string-typed filter value. Only string fields can
/// match; everything else compares unequal by design (see `DocumentStore`).
fn matches(doc: &Document, filter: &HashMap<String, String>) -> bool {
    filter.iter().all(|(key, expected)| {
        matches!(doc.get(key), Some(Value::String(actual)) if actual == expected)
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &HashMap<String, String>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let docs = match collections.get(&collection) {
            Some(docs) => docs,
            None => return Ok(vec![]),
        };
        Ok(docs.iter().filter(|doc| matches(doc, filter)).cloned().collect())
    }

    async fn insert(
        &self,
        collection: Collection,
        mut payload: Document,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        // Assign an id unless the client supplied one; a supplied id must be
        // canonical, same as the Postgres backend
        let id = match payload.get("id") {
            Some(Value::String(raw)) => ObjectId::parse(raw)
                .ok_or_else(|| StoreError::Rejected(format!("malformed id: {}", raw)))?,
            Some(other) => return Err(StoreError::Rejected(format!("malformed id: {}", other))),
            None => {
                let id = ObjectId::generate();
                payload.insert("id".to_string(), Value::String(id.to_string()));
                id
            }
        };
        if docs.iter().any(|doc| doc_id(doc) == Some(id.as_str())) {
            return Err(StoreError::Rejected(format!("duplicate id: {}", id)));
        }

        docs.push(payload.clone());
        Ok(payload)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        payload: Document,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let doc = docs
            .iter_mut()
            .find(|doc| doc_id(doc) == Some(id.as_str()))
            .ok_or(StoreError::NotFound)?;

        // Partial merge; the id column is not writable
        for (key, value) in payload {
            if key == "id" {
                continue;
            }
            doc.insert(key, value);
        }
        Ok(doc.clone())
    }

    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let position = docs
            .iter()
            .position(|doc| doc_id(doc) == Some(id.as_str()))
            .ok_or(StoreError::NotFound)?;
        docs.remove(position);
        Ok(())
    }
}
