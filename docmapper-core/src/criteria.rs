//! Field criteria for building filtered queries.
//!
//! A [`Criteria`] is an ordered list of `(field, criterion)` pairs collected
//! by the caller. Each criterion either expects a field to equal a given JSON
//! value or to be structurally missing from the stored content. Absence is a
//! dedicated marker, not a null value: `eq("f", Value::Null)` and
//! `missing("f")` compile to different predicates and match different
//! documents.

use serde_json::Value;

/// A single requested field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// The field must equal this JSON value. `Value::Null` means the field
    /// was explicitly written as null.
    Value(Value),
    /// The field must be absent from the stored content — never written,
    /// as opposed to written as null.
    Missing,
}

/// An ordered collection of field criteria.
///
/// Field names are passed through to the statement builder literally; no
/// schema validation is performed beyond path-dotting them under the
/// content envelope.
///
/// # Example
///
/// ```ignore
/// use docmapper::criteria::Criteria;
///
/// let criteria = Criteria::new()
///     .eq("age", 30)
///     .missing("nickname");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Criterion)>,
}

impl Criteria {
    /// Creates an empty criteria list.
    ///
    /// An empty list compiles to a type-only filter matching the whole
    /// tagged collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality criterion for `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push((field.into(), Criterion::Value(value.into())));
        self
    }

    /// Adds a structural-absence criterion for `field`.
    pub fn missing(mut self, field: impl Into<String>) -> Self {
        self.entries.push((field.into(), Criterion::Missing));
        self
    }

    /// Returns true when no criteria have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of criteria in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates the criteria in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.entries
            .iter()
            .map(|(field, criterion)| (field.as_str(), criterion))
    }
}
