use std::collections::HashMap;
use std::sync::Arc;

use crate::collection::Collection;
use crate::error::ApiError;
use crate::store::{Document, DocumentStore, ObjectId, StoreError};

/// Generic CRUD dispatcher for the allow-listed collections.
///
/// Every method takes a [`Collection`] that already passed the gate - the
/// stringly-typed path parameter never reaches this layer. For update and
/// delete the external id is decoded *before* any store call, so a malformed
/// id is a well-typed 400 rather than an ambiguous store fault.
pub struct CollectionService {
    store: Arc<dyn DocumentStore>,
}

impl CollectionService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List records matching the equality filter, in store order.
    pub async fn list(
        &self,
        collection: Collection,
        filter: &HashMap<String, String>,
    ) -> Result<Vec<Document>, ApiError> {
        self.store.find(collection, filter).await.map_err(echo_store_error)
    }

    /// Insert the payload unmodified; returns the stored record including
    /// the assigned id.
    pub async fn create(
        &self,
        collection: Collection,
        payload: Document,
    ) -> Result<Document, ApiError> {
        self.store.insert(collection, payload).await.map_err(echo_store_error)
    }

    /// Partial update by external id. Fails with 400 before touching the
    /// store when the id is malformed.
    pub async fn update(
        &self,
        collection: Collection,
        raw_id: &str,
        payload: Document,
    ) -> Result<Document, ApiError> {
        let id = ObjectId::parse(raw_id).ok_or_else(ApiError::invalid_identifier)?;
        self.store.update_by_id(collection, &id, payload).await.map_err(echo_store_error)
    }

    /// Delete by external id, with the same id pre-check as update.
    pub async fn delete(&self, collection: Collection, raw_id: &str) -> Result<(), ApiError> {
        let id = ObjectId::parse(raw_id).ok_or_else(ApiError::invalid_identifier)?;
        self.store.delete_by_id(collection, &id).await.map_err(echo_store_error)
    }
}

/// Generic-route policy: surface the store's own message as a 400. Accepted
/// information-disclosure tradeoff given the closed collection allow-list.
fn echo_store_error(err: StoreError) -> ApiError {
    ApiError::bad_request(err.to_string())
}
