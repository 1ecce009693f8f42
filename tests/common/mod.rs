use std::sync::Arc;

use anyhow::{Context, Result};

use parklot_api::store::MemoryStore;
use parklot_api::{app, AppState};

pub struct TestServer {
    pub base_url: String,
}

/// Boot the router in-process on an ephemeral port, backed by a fresh
/// in-memory store. Each test gets its own server, so tests never share
/// records and need no ordering.
pub async fn spawn_server() -> Result<TestServer> {
    let state = AppState { store: Arc::new(MemoryStore::new()) };
    let router = app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr().context("failed to read listener addr")?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server exited: {}", e);
        }
    });

    Ok(TestServer { base_url: format!("http://{}", addr) })
}
