use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::collection::Collection;
use crate::error::ApiError;
use crate::service::CollectionService;
use crate::store::Document;
use crate::AppState;

/// The allow-list gate. Runs before anything else in every generic handler;
/// an unknown name is a 404 and the store is never consulted.
fn gate(name: &str) -> Result<Collection, ApiError> {
    Collection::from_name(name)
        .ok_or_else(|| ApiError::not_found(format!("collection '{}' is not permitted", name)))
}

/// Request bodies for create/update must be a single JSON object.
fn require_object(payload: Value) -> Result<Document, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("expected a JSON object")),
    }
}

/// GET /collections/:name - list records; the query string is an
/// equality-match filter passed through to the store as-is.
pub async fn list(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(filter): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let collection = gate(&name)?;
    let records = CollectionService::new(state.store.clone()).list(collection, &filter).await?;
    Ok(Json(Value::Array(records.into_iter().map(Value::Object).collect())))
}

/// POST /collections/:name - create a record from the request body
pub async fn create(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let collection = gate(&name)?;
    let payload = require_object(payload)?;

    let created = CollectionService::new(state.store.clone()).create(collection, payload).await?;
    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}

/// PUT /collections/:name/:id - partial update by id
pub async fn update(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let collection = gate(&name)?;
    let payload = require_object(payload)?;

    let updated =
        CollectionService::new(state.store.clone()).update(collection, &id, payload).await?;
    Ok(Json(Value::Object(updated)))
}

/// DELETE /collections/:name/:id - remove a record by id
pub async fn delete(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let collection = gate(&name)?;

    CollectionService::new(state.store.clone()).delete(collection, &id).await?;
    Ok(Json(json!({ "message": "record deleted" })))
}
