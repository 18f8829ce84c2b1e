//! Manager façade: the save/find/query/delete protocol over a store gateway.
//!
//! This module provides the primary API of the mapping layer. It exposes two
//! manager types:
//!
//! - [`AggregateManager`] - Typed manager bound to a specific gateway implementation
//! - [`DynAggregateManager`] - Dynamic dispatch manager for runtime gateway selection
//!
//! # Example
//!
//! ```ignore
//! use docmapper::manager::AggregateManager;
//!
//! let manager = AggregateManager::new(gateway);
//! manager.save(&user).await?;
//! let found: User = manager.find("u1").await?;
//! ```

use std::time::Duration;
use tracing::{debug, trace};

use crate::{
    aggregate::Aggregate,
    criteria::Criteria,
    envelope,
    error::AggregateStoreResult,
    gateway::{DynStoreGateway, QueryRow, StoreGateway, StoredDocument},
    metadata::TypeMetadata,
    statement::QueryStatement,
};

/// How long a closing manager waits for outstanding operations by default.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A strongly-typed aggregate manager bound to a specific gateway.
///
/// The manager is stateless beyond the gateway handle it acquires at
/// construction: no per-call mutable state, no locking, no caching, no
/// retries. Every operation is a single gateway round trip (two for
/// [`find_optional`](Self::find_optional)) and every failure surfaces
/// immediately to the caller.
///
/// Release the handle with [`close`](Self::close) on shutdown.
#[derive(Debug)]
pub struct AggregateManager<G: StoreGateway> {
    gateway: G,
}

impl<G: StoreGateway> AggregateManager<G> {
    /// Creates a manager over the given gateway handle.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Persists an aggregate, overwriting any document under the same key.
    ///
    /// Resolves the type's metadata, encodes the body (stripping the
    /// identifier), and upserts `{id, expiration, body}`. There is no
    /// optimistic-concurrency check and no separate insert/update path.
    ///
    /// # Errors
    ///
    /// Serialization errors from encoding; gateway errors from the upsert.
    pub async fn save<A: Aggregate>(&self, aggregate: &A) -> AggregateStoreResult<()> {
        let metadata = TypeMetadata::of::<A>();
        let body = envelope::encode(aggregate)?;

        debug!(id = %aggregate.id(), tag = ?metadata.type_tag, "saving aggregate");
        self.gateway
            .upsert(StoredDocument::new(
                aggregate.id(),
                metadata.expiration_seconds,
                body,
            ))
            .await
    }

    /// Fetches the aggregate stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the key is absent (propagated, not recovered);
    /// serialization errors when the stored body does not match `A`.
    pub async fn find<A: Aggregate>(&self, id: &str) -> AggregateStoreResult<A> {
        let document = self.gateway.get(id).await?;
        envelope::decode(document.body, &document.id)
    }

    /// Fetches the aggregate stored under `id`, or `None` when absent.
    ///
    /// Probes existence first and then delegates to [`find`](Self::find):
    /// two store round trips, not atomic. A concurrent delete between the
    /// two calls can still surface as a `NotFound` error from the second
    /// call, which the caller must handle.
    pub async fn find_optional<A: Aggregate>(&self, id: &str) -> AggregateStoreResult<Option<A>> {
        if !self.gateway.exists(id).await? {
            return Ok(None);
        }

        Ok(Some(self.find(id).await?))
    }

    /// Returns whether a document exists under `id`, in one round trip.
    pub async fn exists(&self, id: &str) -> AggregateStoreResult<bool> {
        self.gateway.exists(id).await
    }

    /// Removes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Absence behavior is the gateway's: a store that fails removal of a
    /// missing key surfaces `NotFound` here unchanged.
    pub async fn delete(&self, id: &str) -> AggregateStoreResult<()> {
        debug!(id, "deleting aggregate");
        self.gateway.remove(id).await
    }

    /// Finds every aggregate of type `A` matching the criteria.
    ///
    /// Compiles the criteria into one parameterized statement (always
    /// filtered by the type tag), executes it, and decodes each row's
    /// content with the row's storage key as identifier. Results keep the
    /// store's row order; an empty criteria list returns the whole tagged
    /// collection.
    ///
    /// # Errors
    ///
    /// A configuration error when `A` declares no type tag; gateway and
    /// serialization errors from execution and decoding.
    pub async fn find_all_by_criteria<A: Aggregate>(
        &self,
        criteria: &Criteria,
    ) -> AggregateStoreResult<Vec<A>> {
        let statement = QueryStatement::for_criteria::<A>(self.gateway.bucket(), criteria)?;
        trace!(statement = statement.text(), "criteria query");

        let rows = self.gateway.query(statement).await?;
        decode_rows(rows)
    }

    /// Releases the gateway handle, waiting up to
    /// [`DEFAULT_CLOSE_TIMEOUT`] for outstanding operations.
    pub async fn close(self) -> AggregateStoreResult<()> {
        self.close_with_timeout(DEFAULT_CLOSE_TIMEOUT).await
    }

    /// Releases the gateway handle with an explicit timeout.
    pub async fn close_with_timeout(self, timeout: Duration) -> AggregateStoreResult<()> {
        self.gateway.close(timeout).await
    }
}

/// An aggregate manager over a boxed gateway trait object.
#[derive(Debug)]
pub struct DynAggregateManager {
    gateway: Box<dyn DynStoreGateway>,
}

impl DynAggregateManager {
    /// Creates a manager over the given boxed gateway.
    pub fn new(gateway: Box<dyn DynStoreGateway>) -> Self {
        Self { gateway }
    }

    /// Persists an aggregate, overwriting any document under the same key.
    pub async fn save<A: Aggregate>(&self, aggregate: &A) -> AggregateStoreResult<()> {
        let metadata = TypeMetadata::of::<A>();
        let body = envelope::encode(aggregate)?;

        debug!(id = %aggregate.id(), tag = ?metadata.type_tag, "saving aggregate");
        self.gateway
            .upsert(StoredDocument::new(
                aggregate.id(),
                metadata.expiration_seconds,
                body,
            ))
            .await
    }

    /// Fetches the aggregate stored under `id`.
    pub async fn find<A: Aggregate>(&self, id: &str) -> AggregateStoreResult<A> {
        let document = self.gateway.get(id).await?;
        envelope::decode(document.body, &document.id)
    }

    /// Fetches the aggregate stored under `id`, or `None` when absent.
    pub async fn find_optional<A: Aggregate>(&self, id: &str) -> AggregateStoreResult<Option<A>> {
        if !self.gateway.exists(id).await? {
            return Ok(None);
        }

        Ok(Some(self.find(id).await?))
    }

    /// Returns whether a document exists under `id`.
    pub async fn exists(&self, id: &str) -> AggregateStoreResult<bool> {
        self.gateway.exists(id).await
    }

    /// Removes the document stored under `id`.
    pub async fn delete(&self, id: &str) -> AggregateStoreResult<()> {
        debug!(id, "deleting aggregate");
        self.gateway.remove(id).await
    }

    /// Finds every aggregate of type `A` matching the criteria.
    pub async fn find_all_by_criteria<A: Aggregate>(
        &self,
        criteria: &Criteria,
    ) -> AggregateStoreResult<Vec<A>> {
        let statement = QueryStatement::for_criteria::<A>(self.gateway.bucket(), criteria)?;
        trace!(statement = statement.text(), "criteria query");

        let rows = self.gateway.query(statement).await?;
        decode_rows(rows)
    }

    /// Releases the gateway handle, waiting up to
    /// [`DEFAULT_CLOSE_TIMEOUT`] for outstanding operations.
    pub async fn close(self) -> AggregateStoreResult<()> {
        self.close_with_timeout(DEFAULT_CLOSE_TIMEOUT).await
    }

    /// Releases the gateway handle with an explicit timeout.
    pub async fn close_with_timeout(self, timeout: Duration) -> AggregateStoreResult<()> {
        self.gateway.close_boxed(timeout).await
    }
}

fn decode_rows<A: Aggregate>(rows: Vec<QueryRow>) -> AggregateStoreResult<Vec<A>> {
    rows.into_iter()
        .map(|row| envelope::decode_content(row.content, &row.id))
        .collect()
}

/// Conversion trait for turning a typed manager into a dynamic one.
pub trait IntoDynAggregateManager {
    /// Converts this manager into a [`DynAggregateManager`].
    fn into_dyn(self) -> DynAggregateManager;
}

impl<G: StoreGateway + 'static> IntoDynAggregateManager for AggregateManager<G> {
    fn into_dyn(self) -> DynAggregateManager {
        DynAggregateManager::new(Box::new(self.gateway))
    }
}

impl IntoDynAggregateManager for DynAggregateManager {
    fn into_dyn(self) -> DynAggregateManager {
        self
    }
}
