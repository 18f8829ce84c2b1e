//! In-memory bucket implementation of the store gateway.
//!
//! Documents live in a single flat keyspace behind an async-aware
//! read-write lock, mirroring the bucket model of document stores that key
//! every document in one namespace and discriminate by type tag.

use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;
use tracing::trace;

use docmapper_core::{
    envelope::CONTENT_KEY,
    error::{AggregateStoreError, AggregateStoreResult},
    gateway::{QueryRow, StoreGateway, StoreGatewayBuilder, StoredDocument},
    statement::QueryStatement,
};

use crate::evaluator::StatementEvaluator;

#[derive(Debug, Clone)]
struct Entry {
    expiration: u64,
    deadline: Option<SystemTime>,
    body: Value,
}

impl Entry {
    fn is_expired(&self, now: SystemTime) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

type BucketMap = BTreeMap<String, Entry>;

/// Thread-safe in-memory store gateway.
///
/// The bucket is cloneable and uses `Arc`-wrapped internal state: multiple
/// clones of the same instance share the same underlying data, so a clone
/// can be handed to each manager or task.
///
/// Upserts replace unconditionally. A nonzero expiration becomes a deadline
/// at upsert time; expired entries read as absent everywhere (get, exists,
/// remove, query) and are purged lazily on the next write to their key.
/// Query results come back in key order — the keyspace's own iteration
/// order, deterministic for tests.
///
/// # Example
///
/// ```ignore
/// use docmapper_memory::InMemoryBucket;
/// use docmapper::gateway::{StoreGateway, StoredDocument};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bucket = InMemoryBucket::new("app");
///
///     bucket.upsert(StoredDocument::new("u1", 0, json!({ "name": "Ann" }))).await?;
///     assert!(bucket.exists("u1").await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryBucket {
    name: String,
    entries: Arc<RwLock<BucketMap>>,
}

impl InMemoryBucket {
    /// Creates a new empty bucket with the given keyspace name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Arc::new(RwLock::new(BucketMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryBucket`.
    pub fn builder(name: &str) -> InMemoryBucketBuilder {
        InMemoryBucketBuilder { name: name.to_string() }
    }
}

#[async_trait]
impl StoreGateway for InMemoryBucket {
    fn bucket(&self) -> &str {
        &self.name
    }

    async fn get(&self, id: &str) -> AggregateStoreResult<StoredDocument> {
        let entries = self.entries.read().await;

        match entries.get(id) {
            Some(entry) if !entry.is_expired(SystemTime::now()) => Ok(StoredDocument::new(
                id,
                entry.expiration,
                entry.body.clone(),
            )),
            _ => Err(AggregateStoreError::NotFound(id.to_string())),
        }
    }

    async fn upsert(&self, document: StoredDocument) -> AggregateStoreResult<()> {
        let deadline = (document.expiration > 0)
            .then(|| SystemTime::now() + Duration::from_secs(document.expiration));

        let mut entries = self.entries.write().await;
        entries.insert(
            document.id,
            Entry {
                expiration: document.expiration,
                deadline,
                body: document.body,
            },
        );

        Ok(())
    }

    async fn remove(&self, id: &str) -> AggregateStoreResult<()> {
        let mut entries = self.entries.write().await;

        match entries.remove(id) {
            Some(entry) if !entry.is_expired(SystemTime::now()) => Ok(()),
            _ => Err(AggregateStoreError::NotFound(id.to_string())),
        }
    }

    async fn exists(&self, id: &str) -> AggregateStoreResult<bool> {
        let entries = self.entries.read().await;

        Ok(entries
            .get(id)
            .is_some_and(|entry| !entry.is_expired(SystemTime::now())))
    }

    async fn query(&self, statement: QueryStatement) -> AggregateStoreResult<Vec<QueryRow>> {
        trace!(statement = statement.text(), "evaluating statement");

        let evaluator = StatementEvaluator::new(&statement);
        let now = SystemTime::now();
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .filter(|(_, entry)| evaluator.matches(&entry.body))
            .map(|(id, entry)| QueryRow {
                id: id.clone(),
                content: entry
                    .body
                    .get(CONTENT_KEY)
                    .cloned()
                    .unwrap_or(Value::Null),
            })
            .collect())
    }
}

/// Builder for constructing [`InMemoryBucket`] instances.
pub struct InMemoryBucketBuilder {
    name: String,
}

#[async_trait]
impl StoreGatewayBuilder for InMemoryBucketBuilder {
    type Gateway = InMemoryBucket;

    /// Builds and returns a new empty [`InMemoryBucket`].
    ///
    /// This always succeeds.
    async fn build(self) -> AggregateStoreResult<Self::Gateway> {
        Ok(InMemoryBucket::new(self.name))
    }
}
