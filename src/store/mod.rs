//! Document store abstraction.
//!
//! The core never talks to a database directly; it goes through the narrow
//! [`DocumentStore`] trait, constructed once at startup and injected into the
//! handlers. Two backends exist: an in-memory store (local development and the
//! test suite) and a Postgres JSONB store.

pub mod memory;
pub mod object_id;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::collection::Collection;

pub use memory::MemoryStore;
pub use object_id::ObjectId;
pub use postgres::PostgresStore;

/// A record as the store sees it: an opaque string-keyed map. The core passes
/// fields through unmodified and enforces no schema - a deliberate, bounded
/// escape hatch, not an oversight.
pub type Document = serde_json::Map<String, Value>;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// The store rejected the payload or query shape (constraint violation,
    /// duplicate id, malformed filter). The message is client-visible on the
    /// generic routes.
    #[error("{0}")]
    Rejected(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// The four operations the core needs from a document store.
///
/// `filter` is equality-match only and string-typed as it comes off the query
/// string: values are compared as strings with no coercion, so a filter
/// against a non-string field never matches. Known limitation, kept on
/// purpose to preserve the behavior of the service this replaces.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List records matching every `filter` entry, in store order.
    async fn find(
        &self,
        collection: Collection,
        filter: &HashMap<String, String>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert `payload` unmodified and return the stored record, including
    /// the assigned `id`.
    async fn insert(&self, collection: Collection, payload: Document)
        -> Result<Document, StoreError>;

    /// Apply `payload` as a partial update to the record with `id` and return
    /// the updated record.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        payload: Document,
    ) -> Result<Document, StoreError>;

    /// Remove the record with `id`. `NotFound` if no record matches.
    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<(), StoreError>;
}
