use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::info;

use crate::collection::Collection;
use crate::store::{Document, DocumentStore, ObjectId, StoreError};

/// Postgres-backed document store.
///
/// One table per allow-listed collection, each `(id CHAR(24), doc JSONB)`.
/// Queries are built at runtime; table names come from [`Collection::as_str`]
/// only, never from request data, so quoting them into the SQL is safe.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let store = Self { pool };
        store.ensure_tables().await?;
        info!("connected document store pool ({} max connections)", max_connections);
        Ok(store)
    }

    async fn ensure_tables(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id CHAR(24) PRIMARY KEY, doc JSONB NOT NULL)",
                collection.as_str()
            );
            sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        Ok(())
    }
}

/// Rebuild the API-facing document: the stored JSONB plus the id column.
fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let id: String = row.try_get("id").map_err(|e| StoreError::Backend(e.to_string()))?;
    let doc: Value = row.try_get("doc").map_err(|e| StoreError::Backend(e.to_string()))?;

    match doc {
        Value::Object(mut map) => {
            map.insert("id".to_string(), Value::String(id.trim_end().to_string()));
            Ok(map)
        }
        other => Err(StoreError::Backend(format!("unexpected document shape: {}", other))),
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        // Constraint violations and the like: the store rejected the payload
        sqlx::Error::Database(db) => StoreError::Rejected(db.message().to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &HashMap<String, String>,
    ) -> Result<Vec<Document>, StoreError> {
        // Deterministic bind order for the filter entries
        let entries: Vec<(&String, &String)> = filter.iter().collect();

        let mut sql = format!("SELECT id, doc FROM \"{}\"", collection.as_str());
        for (i, _) in entries.iter().enumerate() {
            let clause = if i == 0 { " WHERE" } else { " AND" };
            sql.push_str(&format!("{} doc->>(${}::text) = ${}", clause, i * 2 + 1, i * 2 + 2));
        }

        let mut query = sqlx::query(&sql);
        for (key, value) in &entries {
            query = query.bind(key.as_str()).bind(value.as_str());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx)?;
        rows.iter().map(row_to_document).collect()
    }

    async fn insert(
        &self,
        collection: Collection,
        mut payload: Document,
    ) -> Result<Document, StoreError> {
        let id = match payload.remove("id") {
            Some(Value::String(raw)) => {
                ObjectId::parse(&raw).ok_or_else(|| StoreError::Rejected(format!("malformed id: {}", raw)))?
            }
            Some(other) => return Err(StoreError::Rejected(format!("malformed id: {}", other))),
            None => ObjectId::generate(),
        };

        let sql = format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2) RETURNING id, doc",
            collection.as_str()
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(Value::Object(payload))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row_to_document(&row)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        mut payload: Document,
    ) -> Result<Document, StoreError> {
        // The id column is not writable
        payload.remove("id");

        let sql = format!(
            "UPDATE \"{}\" SET doc = doc || $2 WHERE id = $1 RETURNING id, doc",
            collection.as_str()
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(Value::Object(payload))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or(StoreError::NotFound)?;

        row_to_document(&row)
    }

    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", collection.as_str());
        let result =
            sqlx::query(&sql).bind(id.as_str()).execute(&self.pool).await.map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
