//! A typed aggregate mapping layer between application entities and a
//! schemaless JSON document store.
//!
//! This crate is the core of the docmapper project and provides:
//!
//! - **Aggregate contract** ([`aggregate`]) - The trait every storable entity implements
//! - **Metadata resolution** ([`metadata`]) - Per-type document tag and expiration policy
//! - **Envelope codec** ([`envelope`]) - Conversion between entities and stored document bodies
//! - **Criteria and statements** ([`criteria`], [`statement`]) - Parameterized query construction
//! - **Store gateway abstraction** ([`gateway`]) - The document-store client boundary
//! - **Manager façade** ([`manager`]) - save / find / query / delete over a gateway
//! - **Error handling** ([`error`]) - Error and result types
//! - **Queryable timestamps** ([`time`]) - Epoch-redundant timestamp value type
//!
//! # Example
//!
//! ```ignore
//! use docmapper::aggregate::Aggregate;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! impl Aggregate for User {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!
//!     fn set_id(&mut self, id: String) {
//!         self.id = id;
//!     }
//!
//!     fn type_tag() -> Option<&'static str> {
//!         Some("user")
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmapper_core;

pub mod aggregate;
pub mod criteria;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod metadata;
pub mod statement;
pub mod time;
