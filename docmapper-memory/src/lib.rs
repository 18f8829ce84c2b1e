//! In-memory store gateway for docmapper.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreGateway` trait with bucket semantics: one flat keyspace of
//! documents addressed by their storage key. It is intended for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Upsert semantics** - Create-or-replace, matching the gateway contract
//! - **Expiration** - Nonzero expirations become deadlines; expired entries read as absent
//! - **Query support** - Compiled statements are evaluated structurally, no query engine needed
//!
//! # Quick Start
//!
//! ```ignore
//! use docmapper::{manager::AggregateManager, memory::InMemoryBucket};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = AggregateManager::new(InMemoryBucket::new("app"));
//!
//!     manager.save(&user).await?;
//!     let found: User = manager.find("u1").await?;
//!
//!     manager.close().await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmapper_memory;

pub mod bucket;
pub mod evaluator;

pub use bucket::{InMemoryBucket, InMemoryBucketBuilder};
