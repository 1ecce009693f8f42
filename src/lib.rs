use std::sync::Arc;

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod collection;
pub mod config;
pub mod error;
pub mod handlers;
pub mod reports;
pub mod service;
pub mod store;

use store::DocumentStore;

/// Shared application state: the injected store handle. Constructed once in
/// `main` (or by a test) and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(report_routes())
        .merge(collection_routes())
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Fixed reporting endpoints over the vehicles collection
fn report_routes() -> Router<AppState> {
    use handlers::reports;

    Router::new()
        .route("/resources/completed", get(reports::completed))
        .route("/resources/open", get(reports::open))
        .route("/resources/daily-summary", get(reports::daily_summary))
}

/// Generic CRUD endpoints, gated by the collection allow-list
fn collection_routes() -> Router<AppState> {
    use handlers::collections;

    Router::new()
        .route("/collections/:name", get(collections::list).post(collections::create))
        .route("/collections/:name/:id", put(collections::update).delete(collections::delete))
}
