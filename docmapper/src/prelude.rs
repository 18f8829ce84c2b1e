//! Convenient re-exports of commonly used types from docmapper.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docmapper::prelude::*;
//! ```
//!
//! This provides access to:
//! - The aggregate trait and its derive macro
//! - The manager façade and its dynamic twin
//! - Criteria and statement construction
//! - The store gateway contract
//! - Error types and the queryable timestamp

pub use docmapper_core::{
    aggregate::Aggregate,
    criteria::{Criteria, Criterion},
    error::{AggregateStoreError, AggregateStoreResult},
    gateway::{DynStoreGateway, QueryRow, StoreGateway, StoreGatewayBuilder, StoredDocument},
    manager::{AggregateManager, DynAggregateManager, IntoDynAggregateManager},
    metadata::TypeMetadata,
    statement::{Predicate, QueryStatement},
    time::QueryableDateTime,
};

pub use docmapper_macros::Aggregate;
