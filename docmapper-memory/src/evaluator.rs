//! Structural evaluation of compiled statements against stored bodies.
//!
//! The in-memory bucket has no textual query engine, so it evaluates the
//! structural half of a [`QueryStatement`]: the AND-joined predicate list
//! with values resolved from the named parameter set.

use serde_json::Value;

use docmapper_core::statement::{Predicate, QueryStatement};

/// Evaluates one compiled statement against document bodies.
pub(crate) struct StatementEvaluator<'a> {
    statement: &'a QueryStatement,
}

impl<'a> StatementEvaluator<'a> {
    pub fn new(statement: &'a QueryStatement) -> Self {
        Self { statement }
    }

    /// Returns whether every predicate of the statement holds for `body`.
    ///
    /// `Eq` requires the dotted path to be present and equal to the bound
    /// parameter (a null parameter matches a field written as null).
    /// `Missing` holds only when the path is absent — a field explicitly
    /// written as null is present and does not match.
    pub fn matches(&self, body: &Value) -> bool {
        self.statement
            .predicates()
            .iter()
            .all(|predicate| match predicate {
                Predicate::Eq { path, param } => {
                    match (lookup(body, path), self.statement.params().get(param)) {
                        (Some(field_value), Some(expected)) => field_value == expected,
                        _ => false,
                    }
                }
                Predicate::Missing { path } => lookup(body, path).is_none(),
            })
    }
}

/// Walks a dotted path through nested JSON objects.
///
/// Returns `None` as soon as a segment is absent or the current value is
/// not an object; an explicit null at the final segment is `Some(Null)`.
fn lookup<'v>(body: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(body, |value, segment| value.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmapper_core::{aggregate::Aggregate, criteria::Criteria, statement::QueryStatement};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct User {
        id: String,
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

    fn statement(criteria: &Criteria) -> QueryStatement {
        QueryStatement::for_criteria::<User>("app", criteria).unwrap()
    }

    #[test]
    fn matches_on_type_and_field_equality() {
        let statement = statement(&Criteria::new().eq("age", 30));
        let evaluator = StatementEvaluator::new(&statement);

        assert!(evaluator.matches(&json!({ "type": "user", "content": { "age": 30 } })));
        assert!(!evaluator.matches(&json!({ "type": "user", "content": { "age": 31 } })));
        assert!(!evaluator.matches(&json!({ "type": "order", "content": { "age": 30 } })));
    }

    #[test]
    fn missing_does_not_match_explicit_null() {
        let statement = statement(&Criteria::new().missing("nickname"));
        let evaluator = StatementEvaluator::new(&statement);

        assert!(evaluator.matches(&json!({ "type": "user", "content": { "age": 30 } })));
        assert!(!evaluator.matches(&json!({ "type": "user", "content": { "nickname": null } })));
    }

    #[test]
    fn null_parameter_matches_null_field_but_not_absence() {
        let statement = statement(&Criteria::new().eq("nickname", Value::Null));
        let evaluator = StatementEvaluator::new(&statement);

        assert!(evaluator.matches(&json!({ "type": "user", "content": { "nickname": null } })));
        assert!(!evaluator.matches(&json!({ "type": "user", "content": {} })));
    }

    #[test]
    fn dotted_paths_walk_nested_objects() {
        let statement = statement(&Criteria::new().eq("address.city", "Brno"));
        let evaluator = StatementEvaluator::new(&statement);

        assert!(evaluator.matches(&json!({
            "type": "user",
            "content": { "address": { "city": "Brno" } }
        })));
        assert!(!evaluator.matches(&json!({
            "type": "user",
            "content": { "address": "Brno" }
        })));
    }
}
