mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn crud_round_trip_on_vehicles() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/collections/vehicles", server.base_url))
        .json(&json!({ "plate": "ABC1234", "status": "open" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created = res.json::<Value>().await?;
    let id = created.get("id").and_then(Value::as_str).expect("created record has an id");
    assert_eq!(id.len(), 24, "store-assigned id should be canonical: {}", id);
    assert_eq!(created.get("plate"), Some(&json!("ABC1234")));

    // List includes it
    let res = client.get(format!("{}/collections/vehicles", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = res.json::<Value>().await?;
    let listed = listed.as_array().expect("list returns an array");
    assert_eq!(listed.len(), 1);

    // Update is partial
    let res = client
        .put(format!("{}/collections/vehicles/{}", server.base_url, id))
        .json(&json!({ "status": "closed", "amountPaid": 42.5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated.get("plate"), Some(&json!("ABC1234")), "untouched field survives");
    assert_eq!(updated.get("status"), Some(&json!("closed")));

    // Delete, then delete again: success then store-reported not-found
    let res = client
        .delete(format!("{}/collections/vehicles/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body.get("message").is_some(), "delete returns a confirmation: {}", body);

    let res = client
        .delete(format!("{}/collections/vehicles/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body.get("error"), Some(&json!("record not found")));

    Ok(())
}

#[tokio::test]
async fn list_applies_equality_filter_from_query_string() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for (plate, status) in [("AAA0001", "open"), ("BBB0002", "closed"), ("CCC0003", "open")] {
        let res = client
            .post(format!("{}/collections/vehicles", server.base_url))
            .json(&json!({ "plate": plate, "status": status }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/collections/vehicles?status=open", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let records = body.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.get("status") == Some(&json!("open"))));

    Ok(())
}

#[tokio::test]
async fn unknown_collection_is_rejected_with_404() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/collections/unknownThing", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert!(body.get("error").is_some(), "expected error body: {}", body);

    // The gate also guards writes
    let res = client
        .post(format!("{}/collections/unknownThing", server.base_url))
        .json(&json!({ "x": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn malformed_id_is_rejected_with_400() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/collections/vehicles/not-an-id", server.base_url))
        .json(&json!({ "status": "closed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body.get("error"), Some(&json!("invalid identifier")));

    let res = client
        .delete(format!("{}/collections/services/XYZ", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn create_rejects_non_object_payload() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/collections/services", server.base_url))
        .json(&json!(["not", "an", "object"]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
