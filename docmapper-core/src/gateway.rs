//! Store gateway abstraction: the document-store client boundary.
//!
//! The mapping layer talks to the underlying document store exclusively
//! through [`StoreGateway`]: a thin request/response contract of one store
//! round trip per call (get, upsert, remove, exists, query) plus a scoped
//! `close`. The real driver implements this trait; the `docmapper-memory`
//! crate provides an in-memory implementation for development and tests.
//!
//! All concurrency control, timeouts, and retry policy belong to the
//! implementation — the mapper performs a single call and surfaces the
//! result unchanged.

use async_trait::async_trait;
use serde_json::Value;
use std::{any::Any, fmt::Debug, time::Duration};

use crate::{error::AggregateStoreResult, statement::QueryStatement};

/// A document as stored: storage key, expiration policy, and body.
///
/// The body is either the tagged envelope or a bare field map, as produced
/// by the envelope codec. Expiration is in seconds; `0` never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// The document's storage key (the aggregate identifier).
    pub id: String,
    /// Expiration in seconds, passed through verbatim to the store; `0`
    /// means the document never expires.
    pub expiration: u64,
    /// The document body.
    pub body: Value,
}

impl StoredDocument {
    /// Creates a stored document from its parts.
    pub fn new(id: impl Into<String>, expiration: u64, body: Value) -> Self {
        Self { id: id.into(), expiration, body }
    }
}

/// One result row of a criteria query: the row's storage key and its
/// `content` payload.
///
/// Rows are consumed by the decode step only and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    /// Storage key of the matched document, taken from store metadata.
    pub id: String,
    /// The matched document's `content` payload.
    pub content: Value,
}

/// Abstract interface to a document-store keyspace.
///
/// Implementations must be safe for concurrent use (`Send + Sync`); the
/// mapper holds one handle per manager and issues a single awaited round
/// trip per operation.
///
/// # Error handling
///
/// `get` and `remove` fail with
/// [`AggregateStoreError::NotFound`](crate::error::AggregateStoreError::NotFound)
/// when the key is absent. Implementations should map their driver errors
/// onto the gateway variant and document anything beyond that.
#[async_trait]
pub trait StoreGateway: Send + Sync + Debug {
    /// Name of the keyspace this gateway is bound to, used as the statement
    /// FROM source.
    fn bucket(&self) -> &str;

    /// Fetches the document stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no document exists under the key.
    async fn get(&self, id: &str) -> AggregateStoreResult<StoredDocument>;

    /// Creates or replaces the document under its key.
    ///
    /// Upsert semantics: an existing document is overwritten entirely,
    /// including its expiration.
    async fn upsert(&self, document: StoredDocument) -> AggregateStoreResult<()>;

    /// Removes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no document exists under the key.
    async fn remove(&self, id: &str) -> AggregateStoreResult<()>;

    /// Returns whether a document exists under `id`, in one round trip.
    async fn exists(&self, id: &str) -> AggregateStoreResult<bool>;

    /// Executes a compiled statement and returns the matching rows in the
    /// store's own order.
    async fn query(&self, statement: QueryStatement) -> AggregateStoreResult<Vec<QueryRow>>;

    /// Releases the underlying connection, waiting up to `timeout` for
    /// outstanding operations.
    ///
    /// The default implementation is a no-op for gateways with nothing to
    /// release.
    async fn close(self, timeout: Duration) -> AggregateStoreResult<()>
    where
        Self: Sized,
    {
        let _ = timeout;
        Ok(())
    }
}

#[async_trait]
impl<G> StoreGateway for &G
where
    G: StoreGateway,
{
    fn bucket(&self) -> &str {
        (*self).bucket()
    }

    async fn get(&self, id: &str) -> AggregateStoreResult<StoredDocument> {
        (*self).get(id).await
    }

    async fn upsert(&self, document: StoredDocument) -> AggregateStoreResult<()> {
        (*self).upsert(document).await
    }

    async fn remove(&self, id: &str) -> AggregateStoreResult<()> {
        (*self).remove(id).await
    }

    async fn exists(&self, id: &str) -> AggregateStoreResult<bool> {
        (*self).exists(id).await
    }

    async fn query(&self, statement: QueryStatement) -> AggregateStoreResult<Vec<QueryRow>> {
        (*self).query(statement).await
    }
}

/// Object-safe mirror of [`StoreGateway`] for runtime gateway selection.
#[async_trait]
pub trait DynStoreGateway: Send + Sync + Debug {
    fn bucket(&self) -> &str;
    async fn get(&self, id: &str) -> AggregateStoreResult<StoredDocument>;
    async fn upsert(&self, document: StoredDocument) -> AggregateStoreResult<()>;
    async fn remove(&self, id: &str) -> AggregateStoreResult<()>;
    async fn exists(&self, id: &str) -> AggregateStoreResult<bool>;
    async fn query(&self, statement: QueryStatement) -> AggregateStoreResult<Vec<QueryRow>>;
    async fn close_boxed(self: Box<Self>, timeout: Duration) -> AggregateStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<G: StoreGateway + 'static> DynStoreGateway for G {
    fn bucket(&self) -> &str {
        StoreGateway::bucket(self)
    }

    async fn get(&self, id: &str) -> AggregateStoreResult<StoredDocument> {
        StoreGateway::get(self, id).await
    }

    async fn upsert(&self, document: StoredDocument) -> AggregateStoreResult<()> {
        StoreGateway::upsert(self, document).await
    }

    async fn remove(&self, id: &str) -> AggregateStoreResult<()> {
        StoreGateway::remove(self, id).await
    }

    async fn exists(&self, id: &str) -> AggregateStoreResult<bool> {
        StoreGateway::exists(self, id).await
    }

    async fn query(&self, statement: QueryStatement) -> AggregateStoreResult<Vec<QueryRow>> {
        StoreGateway::query(self, statement).await
    }

    async fn close_boxed(self: Box<Self>, timeout: Duration) -> AggregateStoreResult<()> {
        (*self).close(timeout).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Factory trait for constructing gateway instances.
#[async_trait]
pub trait StoreGatewayBuilder {
    type Gateway: StoreGateway;

    async fn build(self) -> AggregateStoreResult<Self::Gateway>;
}
