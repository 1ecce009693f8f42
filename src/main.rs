use std::sync::Arc;

use parklot_api::config::{AppConfig, StoreBackend};
use parklot_api::store::{DocumentStore, MemoryStore, PostgresStore};
use parklot_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, PARKLOT_STORE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = parklot_api::config::config();
    tracing::info!("starting parklot-api in {:?} mode", config.environment);

    let store = build_store(config).await;
    let app = app(AppState { store });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("parklot-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

async fn build_store(config: &AppConfig) -> Arc<dyn DocumentStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory document store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .as_deref()
                .unwrap_or_else(|| panic!("DATABASE_URL is required for the postgres store"));
            let store = PostgresStore::connect(url, config.store.max_connections)
                .await
                .unwrap_or_else(|e| panic!("failed to connect document store: {}", e));
            Arc::new(store)
        }
    }
}
