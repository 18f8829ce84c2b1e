//! Tests for the in-memory bucket — gateway contract behavior.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use docmapper_core::{
    aggregate::Aggregate,
    criteria::Criteria,
    error::AggregateStoreError,
    gateway::{StoreGateway, StoreGatewayBuilder, StoredDocument},
    statement::QueryStatement,
};
use docmapper_memory::InMemoryBucket;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: String,
    name: String,
}

impl Aggregate for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn type_tag() -> Option<&'static str> {
        Some("user")
    }
}

fn user_doc(id: &str, name: &str, age: u32) -> StoredDocument {
    StoredDocument::new(
        id,
        0,
        json!({ "type": "user", "content": { "name": name, "age": age } }),
    )
}

#[tokio::test]
async fn upsert_then_get_returns_the_document() {
    let bucket = InMemoryBucket::new("app");
    bucket.upsert(user_doc("u1", "Ann", 30)).await.unwrap();

    let document = bucket.get("u1").await.unwrap();
    assert_eq!(document.id, "u1");
    assert_eq!(document.expiration, 0);
    assert_eq!(document.body["content"]["name"], json!("Ann"));
}

#[tokio::test]
async fn get_absent_is_not_found() {
    let bucket = InMemoryBucket::new("app");

    let err = bucket.get("nope").await.unwrap_err();
    assert!(matches!(err, AggregateStoreError::NotFound(id) if id == "nope"));
}

#[tokio::test]
async fn upsert_replaces_an_existing_document() {
    let bucket = InMemoryBucket::new("app");
    bucket.upsert(user_doc("u1", "Ann", 30)).await.unwrap();
    bucket.upsert(user_doc("u1", "Bea", 41)).await.unwrap();

    let document = bucket.get("u1").await.unwrap();
    assert_eq!(document.body["content"]["name"], json!("Bea"));
}

#[tokio::test]
async fn exists_tracks_the_document_lifecycle() {
    let bucket = InMemoryBucket::new("app");
    assert!(!bucket.exists("u1").await.unwrap());

    bucket.upsert(user_doc("u1", "Ann", 30)).await.unwrap();
    assert!(bucket.exists("u1").await.unwrap());

    bucket.remove("u1").await.unwrap();
    assert!(!bucket.exists("u1").await.unwrap());
}

#[tokio::test]
async fn remove_absent_is_not_found() {
    let bucket = InMemoryBucket::new("app");

    let err = bucket.remove("nope").await.unwrap_err();
    assert!(matches!(err, AggregateStoreError::NotFound(_)));
}

#[tokio::test]
async fn query_filters_by_type_and_criteria_in_key_order() {
    let bucket = InMemoryBucket::new("app");
    bucket.upsert(user_doc("u2", "Bea", 30)).await.unwrap();
    bucket.upsert(user_doc("u1", "Ann", 30)).await.unwrap();
    bucket.upsert(user_doc("u3", "Cyd", 41)).await.unwrap();
    bucket
        .upsert(StoredDocument::new(
            "o1",
            0,
            json!({ "type": "order", "content": { "age": 30 } }),
        ))
        .await
        .unwrap();

    let statement =
        QueryStatement::for_criteria::<User>(bucket.bucket(), &Criteria::new().eq("age", 30))
            .unwrap();
    let rows = bucket.query(statement).await.unwrap();

    let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2"]);
    assert_eq!(rows[0].content, json!({ "name": "Ann", "age": 30 }));
}

#[tokio::test]
async fn query_missing_skips_null_valued_fields() {
    let bucket = InMemoryBucket::new("app");
    bucket
        .upsert(StoredDocument::new(
            "u1",
            0,
            json!({ "type": "user", "content": { "name": "Ann" } }),
        ))
        .await
        .unwrap();
    bucket
        .upsert(StoredDocument::new(
            "u2",
            0,
            json!({ "type": "user", "content": { "name": "Bea", "nickname": null } }),
        ))
        .await
        .unwrap();

    let statement =
        QueryStatement::for_criteria::<User>(bucket.bucket(), &Criteria::new().missing("nickname"))
            .unwrap();
    let rows = bucket.query(statement).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "u1");
}

#[tokio::test]
async fn expired_entries_read_as_absent() {
    let bucket = InMemoryBucket::new("app");
    bucket
        .upsert(StoredDocument::new(
            "s1",
            1,
            json!({ "type": "session", "content": {} }),
        ))
        .await
        .unwrap();
    assert!(bucket.exists("s1").await.unwrap());

    std::thread::sleep(Duration::from_millis(1100));

    assert!(!bucket.exists("s1").await.unwrap());
    assert!(matches!(
        bucket.get("s1").await.unwrap_err(),
        AggregateStoreError::NotFound(_)
    ));
}

#[tokio::test]
async fn clones_share_the_same_keyspace() {
    let bucket = InMemoryBucket::new("app");
    let clone = bucket.clone();
    bucket.upsert(user_doc("u1", "Ann", 30)).await.unwrap();

    assert!(clone.exists("u1").await.unwrap());
}

#[tokio::test]
async fn builder_produces_an_empty_bucket() {
    let bucket = InMemoryBucket::builder("app").build().await.unwrap();

    assert_eq!(bucket.bucket(), "app");
    assert!(!bucket.exists("u1").await.unwrap());
}

#[tokio::test]
async fn close_releases_the_bucket() {
    let bucket = InMemoryBucket::new("app");

    bucket
        .close(Duration::from_secs(10))
        .await
        .unwrap();
}
