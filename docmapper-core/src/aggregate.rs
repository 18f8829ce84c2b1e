//! Core trait for storable aggregates.
//!
//! Every entity persisted through the mapping layer implements [`Aggregate`]:
//! a unique string identifier (gettable and settable) plus the per-type
//! storage metadata declared through the two static methods. The metadata
//! methods have defaults, so a plain entity with nothing declared stores as
//! an untagged, never-expiring document.

use serde::{Serialize, de::DeserializeOwned};

/// Capability every storable aggregate must provide.
///
/// The identifier is the document's storage key. It is never part of the
/// stored content payload: the envelope codec strips it before encoding and
/// restores it from the key after decoding.
///
/// # Declaring storage metadata
///
/// `type_tag` and `expiration_seconds` are per-type declarations, identical
/// for every instance. They can be written by hand or generated with
/// `#[derive(Aggregate)]` from the `docmapper-macros` crate.
///
/// # Example
///
/// ```ignore
/// use docmapper::aggregate::Aggregate;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     pub id: String,
///     pub name: String,
/// }
///
/// impl Aggregate for User {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = id;
///     }
///
///     fn type_tag() -> Option<&'static str> {
///         Some("user")
///     }
/// }
/// ```
pub trait Aggregate: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns this aggregate's unique identifier.
    fn id(&self) -> &str;

    /// Replaces this aggregate's identifier.
    ///
    /// Called by upstream code assigning storage keys; the decode path
    /// restores the identifier from the document key instead of the body.
    fn set_id(&mut self, id: String);

    /// Serialized name of the identifier field.
    ///
    /// The envelope codec strips this field before encoding and restores it
    /// from the storage key after decoding. Override only when the
    /// identifier field is not named `id`.
    fn id_field() -> &'static str {
        crate::envelope::ID_KEY
    }

    /// The document-type tag stored alongside this type's content.
    ///
    /// `None` (the default) skips the tagged envelope entirely: the field
    /// map becomes the top-level document body.
    fn type_tag() -> Option<&'static str> {
        None
    }

    /// Document expiration in seconds, passed through verbatim to the store.
    ///
    /// The default `0` means the document never expires.
    fn expiration_seconds() -> u64 {
        0
    }
}
