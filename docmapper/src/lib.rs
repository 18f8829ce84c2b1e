//! Main docmapper crate providing a unified interface for aggregate storage.
//!
//! This crate is the primary entry point for users of the docmapper
//! framework. It re-exports the core types and functionality from the
//! sub-crates and provides convenient access to the bundled in-memory
//! gateway.
//!
//! # Features
//!
//! - **Typed persistence** - Define entities with Serde, save and fetch them by key
//! - **Declarative metadata** - A document-type tag and expiration per entity type, via trait or derive
//! - **Frozen storage envelope** - Tagged `{type, content}` or bare field-map bodies, interop-safe
//! - **Criteria queries** - Parameterized, injection-safe filters with distinct missing-field semantics
//!
//! # Quick Start
//!
//! ```ignore
//! use docmapper::{prelude::*, memory::InMemoryBucket};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Aggregate)]
//! #[aggregate(tag = "user")]
//! pub struct User {
//!     pub id: String,
//!     pub name: String,
//!     pub age: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = AggregateManager::new(InMemoryBucket::new("app"));
//!
//!     let user = User {
//!         id: "u1".to_string(),
//!         name: "Ann".to_string(),
//!         age: 30,
//!     };
//!
//!     // Upsert: stored as { "type": "user", "content": { "name": "Ann", "age": 30 } }
//!     manager.save(&user).await.unwrap();
//!
//!     // Fetch by key
//!     let found: User = manager.find("u1").await.unwrap();
//!     assert_eq!(found.name, "Ann");
//!
//!     // Criteria query: type = $type AND content.age = $age
//!     let thirty: Vec<User> = manager
//!         .find_all_by_criteria(&Criteria::new().eq("age", 30))
//!         .await
//!         .unwrap();
//!     assert_eq!(thirty.len(), 1);
//!
//!     // Scoped teardown
//!     manager.close().await.unwrap();
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the gateway type is not known at compile time, convert a typed
//! manager into a dynamically dispatched one with
//! [`IntoDynAggregateManager::into_dyn`](manager::IntoDynAggregateManager):
//!
//! ```ignore
//! use docmapper::{prelude::*, memory::InMemoryBucket};
//!
//! let manager = AggregateManager::new(InMemoryBucket::new("app")).into_dyn();
//! manager.save(&user).await?;
//! ```

pub mod prelude;

pub use docmapper_core::{
    aggregate, criteria, envelope, error, gateway, manager, metadata, statement, time,
};

pub use docmapper_macros::Aggregate;

/// In-memory gateway implementations.
pub mod memory {
    pub use docmapper_memory::{InMemoryBucket, InMemoryBucketBuilder};
}
