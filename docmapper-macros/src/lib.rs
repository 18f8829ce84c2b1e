//! Procedural macros for the docmapper project.
//!
//! This crate provides compile-time code generation for the docmapper
//! framework, currently the `#[derive(Aggregate)]` macro.

#[allow(unused_extern_crates)]
extern crate self as docmapper_macros;

mod aggregate;

use proc_macro::TokenStream;

/// Derives the `Aggregate` trait for a struct with named fields.
///
/// Storage metadata is declared with struct-level attributes; both halves
/// are optional and fall back to the trait defaults (no tag, no expiration):
///
/// ```ignore
/// use docmapper::Aggregate;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Aggregate)]
/// #[aggregate(tag = "user", expiration = 3600)]
/// pub struct User {
///     pub id: String,
///     pub name: String,
/// }
/// ```
///
/// The identifier field is the one marked `#[aggregate(id)]`, or by default
/// the field named `id`; it must be a `String`.
#[proc_macro_derive(Aggregate, attributes(aggregate))]
pub fn derive_aggregate(input: TokenStream) -> TokenStream {
    aggregate::derive_aggregate(input)
}
