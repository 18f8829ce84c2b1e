//! Compilation of field criteria into parameterized store queries.
//!
//! A [`QueryStatement`] is the single unit handed to the store gateway: the
//! rendered statement text, the named parameter set, and the structural
//! predicate list the text was rendered from. Gateways speaking a textual
//! query language send `text` + `params` over the wire; gateways without a
//! text engine (like the in-memory bucket) evaluate `predicates` + `params`
//! directly. Both views describe the same filter.
//!
//! Injection safety: criterion values never enter the statement text. Every
//! present value is bound under a named parameter and the text only ever
//! references the placeholder. Field names are passed through literally,
//! path-dotted under the content envelope, exactly as callers wrote them.

use serde_json::{Map, Value};

use crate::{
    aggregate::Aggregate,
    criteria::{Criteria, Criterion},
    envelope::{CONTENT_KEY, TYPE_KEY},
    error::{AggregateStoreError, AggregateStoreResult},
};

/// One structural filter condition of a compiled statement.
///
/// Conditions are AND-joined in order. `Eq` compares the value at `path`
/// with the named parameter; `Missing` matches only when `path` is absent
/// from the document — a field explicitly written as null is present and
/// does not match.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `path = $param`
    Eq { path: String, param: String },
    /// `path IS MISSING`
    Missing { path: String },
}

/// A parameterized, injection-safe query against one tagged collection.
///
/// Produced by [`QueryStatement::for_criteria`]; consumed by
/// [`StoreGateway::query`](crate::gateway::StoreGateway::query).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStatement {
    text: String,
    params: Map<String, Value>,
    predicates: Vec<Predicate>,
}

impl QueryStatement {
    /// Compiles a criteria list into a statement filtering the collection of
    /// aggregate type `A` inside `bucket`.
    ///
    /// The filter always starts with `type = $type`; each present-value
    /// criterion adds a parameter under the field's name and an AND-joined
    /// equality on `content.<field>`, and each [`Criterion::Missing`] adds an
    /// AND-joined `IS MISSING` with no parameter. An empty criteria list
    /// yields the type-only filter, selecting the whole tagged collection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `A` declares no type tag —
    /// criteria queries are only meaningful on tagged collections.
    pub fn for_criteria<A: Aggregate>(
        bucket: &str,
        criteria: &Criteria,
    ) -> AggregateStoreResult<Self> {
        let tag = A::type_tag().ok_or_else(|| {
            AggregateStoreError::Configuration(format!(
                "criteria query requires a type tag, but {} declares none",
                std::any::type_name::<A>()
            ))
        })?;

        let mut params = Map::new();
        params.insert(TYPE_KEY.to_string(), Value::String(tag.to_string()));

        let mut predicates = vec![Predicate::Eq {
            path: TYPE_KEY.to_string(),
            param: TYPE_KEY.to_string(),
        }];

        for (field, criterion) in criteria.iter() {
            let path = format!("{CONTENT_KEY}.{field}");
            match criterion {
                Criterion::Value(value) => {
                    params.insert(field.to_string(), value.clone());
                    predicates.push(Predicate::Eq { path, param: field.to_string() });
                }
                Criterion::Missing => {
                    predicates.push(Predicate::Missing { path });
                }
            }
        }

        Ok(Self {
            text: render(bucket, &predicates),
            params,
            predicates,
        })
    }

    /// The rendered statement text with named placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The named parameter set bound to the statement.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// The AND-joined structural predicates the text was rendered from.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// Renders the SELECT of the storage key and content payload, filtered by
/// the AND-joined predicates.
fn render(bucket: &str, predicates: &[Predicate]) -> String {
    let filter = predicates
        .iter()
        .map(|predicate| match predicate {
            Predicate::Eq { path, param } => format!("{path} = ${param}"),
            Predicate::Missing { path } => format!("{path} IS MISSING"),
        })
        .collect::<Vec<_>>()
        .join(" AND ");

    format!(
        "SELECT meta().id AS id, {CONTENT_KEY} FROM {} WHERE {filter}",
        escape_identifier(bucket)
    )
}

/// Quotes a keyspace identifier, doubling any embedded backtick.
fn escape_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct User {
        id: String,
        name: String,
        age: u32,
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

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Untagged {
        id: String,
    }

    impl Aggregate for Untagged {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    #[test]
    fn compiles_the_documented_scenario() {
        let criteria = Criteria::new().eq("age", 30).missing("nickname");
        let statement = QueryStatement::for_criteria::<User>("app", &criteria).unwrap();

        assert_eq!(
            statement.text(),
            "SELECT meta().id AS id, content FROM `app` \
             WHERE type = $type AND content.age = $age AND content.nickname IS MISSING"
        );
        assert_eq!(statement.params().len(), 2);
        assert_eq!(statement.params()["type"], json!("user"));
        assert_eq!(statement.params()["age"], json!(30));
    }

    #[test]
    fn binds_one_parameter_per_present_criterion_plus_type() {
        let criteria = Criteria::new()
            .eq("name", "Ann")
            .eq("age", 30)
            .eq("active", true);
        let statement = QueryStatement::for_criteria::<User>("app", &criteria).unwrap();

        assert_eq!(statement.params().len(), 4);
        assert_eq!(statement.predicates().len(), 4);
        assert_eq!(statement.text().matches(" AND ").count(), 3);
    }

    #[test]
    fn missing_criterion_binds_no_parameter() {
        let criteria = Criteria::new().missing("nickname");
        let statement = QueryStatement::for_criteria::<User>("app", &criteria).unwrap();

        assert_eq!(statement.params().len(), 1);
        assert_eq!(
            statement.predicates()[1],
            Predicate::Missing { path: "content.nickname".to_string() }
        );
        assert!(!statement.text().contains("$nickname"));
    }

    #[test]
    fn empty_criteria_filters_on_type_only() {
        let statement = QueryStatement::for_criteria::<User>("app", &Criteria::new()).unwrap();

        assert_eq!(
            statement.text(),
            "SELECT meta().id AS id, content FROM `app` WHERE type = $type"
        );
        assert_eq!(statement.params().len(), 1);
    }

    #[test]
    fn values_never_enter_the_statement_text() {
        let hostile = "x\" OR 1=1; DROP `app` --";
        let criteria = Criteria::new().eq("name", hostile);
        let statement = QueryStatement::for_criteria::<User>("app", &criteria).unwrap();

        assert!(!statement.text().contains(hostile));
        assert_eq!(statement.params()["name"], json!(hostile));
    }

    #[test]
    fn untagged_type_is_a_configuration_error() {
        let err = QueryStatement::for_criteria::<Untagged>("app", &Criteria::new()).unwrap_err();

        assert!(matches!(err, AggregateStoreError::Configuration(_)));
    }

    #[test]
    fn field_names_pass_through_literally() {
        let criteria = Criteria::new().eq("profile.city", "Brno");
        let statement = QueryStatement::for_criteria::<User>("app", &criteria).unwrap();

        assert!(
            statement
                .text()
                .contains("content.profile.city = $profile.city")
        );
    }
}
