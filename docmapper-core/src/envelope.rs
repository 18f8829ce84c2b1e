//! Envelope codec: conversion between aggregates and stored document bodies.
//!
//! A stored body takes one of two physical shapes, chosen by the aggregate
//! type's tag declaration and frozen for interop with existing stored data:
//!
//! ```text
//! { "type": "<tag>", "content": { ...entity fields, no id... } }   // tagged
//! { ...entity fields, no id... }                                    // untagged
//! ```
//!
//! The identifier never travels inside the body. It is the document's storage
//! key: stripped before encoding, restored from the key after decoding.

use serde_json::{Map, Value, from_value, to_value};

use crate::{
    aggregate::Aggregate,
    error::{AggregateStoreError, AggregateStoreResult},
};

/// Default field name of the aggregate identifier, removed from every
/// stored body. Types with a differently-named identifier override
/// [`Aggregate::id_field`].
pub const ID_KEY: &str = "id";

/// Envelope field carrying the document-type tag.
pub const TYPE_KEY: &str = "type";

/// Envelope field carrying the aggregate's field map.
pub const CONTENT_KEY: &str = "content";

/// Encodes an aggregate into its stored body.
///
/// The aggregate is serialized to a JSON object map, the identifier field is
/// removed, and the map is wrapped as `{type, content}` when the type
/// declares a tag. Without a tag the map itself is the body.
///
/// # Errors
///
/// Returns a serialization error if the aggregate does not serialize to a
/// JSON object.
pub fn encode<A: Aggregate>(aggregate: &A) -> AggregateStoreResult<Value> {
    let mut fields = to_object(to_value(aggregate)?)?;
    fields.remove(A::id_field());

    match A::type_tag() {
        Some(tag) => {
            let mut body = Map::new();
            body.insert(TYPE_KEY.to_string(), Value::String(tag.to_string()));
            body.insert(CONTENT_KEY.to_string(), Value::Object(fields));
            Ok(Value::Object(body))
        }
        None => Ok(Value::Object(fields)),
    }
}

/// Decodes a stored body into an aggregate, restoring the identifier from
/// the document's storage key.
///
/// If `A` declares a type tag the field map is read from the body's
/// `content`; otherwise the body itself is the field map.
///
/// # Errors
///
/// Returns a serialization error when the body's shape does not match the
/// target type's branch or fields (e.g. a tag is declared but the body has
/// no `content` object).
pub fn decode<A: Aggregate>(body: Value, id: &str) -> AggregateStoreResult<A> {
    let content = match A::type_tag() {
        Some(tag) => {
            let mut envelope = to_object(body)?;
            match envelope.remove(CONTENT_KEY) {
                Some(content) => content,
                None => {
                    return Err(AggregateStoreError::Serialization(format!(
                        "body for tagged type '{tag}' has no '{CONTENT_KEY}' field"
                    )));
                }
            }
        }
        None => body,
    };

    decode_content(content, id)
}

/// Decodes a bare field map (already unwrapped from any envelope) into an
/// aggregate with the given identifier.
///
/// Used for query rows, which expose the `content` payload directly. Any
/// identifier found inside the map is discarded; the storage key wins.
pub fn decode_content<A: Aggregate>(content: Value, id: &str) -> AggregateStoreResult<A> {
    let mut fields = to_object(content)?;
    fields.remove(A::id_field());
    fields.insert(A::id_field().to_string(), Value::String(id.to_string()));

    Ok(from_value(Value::Object(fields))?)
}

fn to_object(value: Value) -> AggregateStoreResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AggregateStoreError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: String,
        name: String,
        age: u32,
        nickname: Option<String>,
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

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        id: String,
        value: i64,
    }

    impl Aggregate for Counter {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn ann() -> User {
        User {
            id: "u1".to_string(),
            name: "Ann".to_string(),
            age: 30,
            nickname: None,
        }
    }

    #[test]
    fn tagged_body_wraps_content_and_strips_id() {
        let body = encode(&ann()).unwrap();

        assert_eq!(
            body,
            json!({
                "type": "user",
                "content": { "name": "Ann", "age": 30, "nickname": null }
            })
        );
    }

    #[test]
    fn untagged_body_is_the_bare_field_map() {
        let counter = Counter { id: "c1".to_string(), value: 7 };
        let body = encode(&counter).unwrap();

        assert_eq!(body, json!({ "value": 7 }));
        assert!(body.get(TYPE_KEY).is_none());
        assert!(body.get(CONTENT_KEY).is_none());
    }

    #[test]
    fn round_trip_restores_fields_with_external_id() {
        let user = ann();
        let body = encode(&user).unwrap();
        let decoded: User = decode(body, "u1").unwrap();

        assert_eq!(decoded, user);
    }

    #[test]
    fn round_trip_untagged() {
        let counter = Counter { id: "c1".to_string(), value: 7 };
        let body = encode(&counter).unwrap();
        let decoded: Counter = decode(body, "c1").unwrap();

        assert_eq!(decoded, counter);
    }

    #[test]
    fn decode_id_comes_from_the_key_not_the_body() {
        let body = json!({
            "type": "user",
            "content": { "id": "stale", "name": "Ann", "age": 30, "nickname": null }
        });
        let decoded: User = decode(body, "u1").unwrap();

        assert_eq!(decoded.id, "u1");
    }

    #[test]
    fn decode_tagged_without_content_fails() {
        let err = decode::<User>(json!({ "name": "Ann", "age": 30 }), "u1").unwrap_err();

        assert!(matches!(err, AggregateStoreError::Serialization(_)));
    }

    #[test]
    fn decode_wrong_field_types_fails() {
        let body = json!({
            "type": "user",
            "content": { "name": "Ann", "age": "thirty", "nickname": null }
        });
        let err = decode::<User>(body, "u1").unwrap_err();

        assert!(matches!(err, AggregateStoreError::Serialization(_)));
    }

    #[test]
    fn encode_non_object_fails() {
        // A bare string serializes to a JSON string, not an object.
        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct Bare(String);

        impl Aggregate for Bare {
            fn id(&self) -> &str {
                &self.0
            }

            fn set_id(&mut self, id: String) {
                self.0 = id;
            }
        }

        let err = encode(&Bare("x".to_string())).unwrap_err();
        assert!(matches!(err, AggregateStoreError::Serialization(_)));
    }
}
