//! Native filter clauses of the search engine.
//!
//! Every clause kind is a plain variant carrying its field name and value.
//! The field-keyed JSON objects the engine expects (`{"term": {"<field>":
//! <value>}}`) only exist once a clause is rendered with [`Clause::to_json`]
//! or serialized.

use crate::value::Value;
use serde::{Serialize, Serializer};
use serde_json::{Map, json};

/// Search field that covers every indexed field
pub const ALL_FIELDS: &str = "_all";

/// How a boolean clause combines its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl Occur {
    pub fn key(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

/// Bound operator of a range clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Lt,
    Gt,
    Lte,
    Gte,
}

impl RangeBound {
    pub fn key(&self) -> &'static str {
        match self {
            RangeBound::Lt => "lt",
            RangeBound::Gt => "gt",
            RangeBound::Lte => "lte",
            RangeBound::Gte => "gte",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    MatchAll,
    Bool { occur: Occur, clauses: Vec<Clause> },
    Not(Box<Clause>),
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Range { field: String, bound: RangeBound, value: Value },
    /// Matches documents that do not have the field at all
    Missing { field: String },
    /// Glob match with `*` and `?`, the closest the engine offers to `=~`
    Wildcard { field: String, pattern: String },
    MatchPhrase { field: String, text: String },
}

impl Clause {
    pub fn must(clauses: Vec<Clause>) -> Self {
        Clause::Bool {
            occur: Occur::Must,
            clauses,
        }
    }

    pub fn should(clauses: Vec<Clause>) -> Self {
        Clause::Bool {
            occur: Occur::Should,
            clauses,
        }
    }

    pub fn must_not(clauses: Vec<Clause>) -> Self {
        Clause::Bool {
            occur: Occur::MustNot,
            clauses,
        }
    }

    pub fn negate(self) -> Self {
        Clause::Not(Box::new(self))
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Clause::MatchAll)
    }

    /// Render the clause in the engine's filter DSL
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Clause::MatchAll => json!({ "match_all": {} }),
            Clause::Bool { occur, clauses } => {
                let children: Vec<_> = clauses.iter().map(Clause::to_json).collect();
                json!({ "bool": keyed(occur.key(), children.into()) })
            }
            Clause::Not(inner) => json!({ "not": inner.to_json() }),
            Clause::Term { field, value } => json!({ "term": keyed(field, value.to_json()) }),
            Clause::Terms { field, values } => {
                let values: Vec<_> = values.iter().map(Value::to_json).collect();
                json!({ "terms": keyed(field, values.into()) })
            }
            Clause::Range {
                field,
                bound,
                value,
            } => {
                let bounds = keyed(bound.key(), value.to_json());
                json!({ "range": keyed(field, bounds) })
            }
            Clause::Missing { field } => json!({ "missing": { "field": field } }),
            Clause::Wildcard { field, pattern } => {
                json!({ "query": { "wildcard": keyed(field, pattern.as_str().into()) } })
            }
            Clause::MatchPhrase { field, text } => {
                json!({ "query": { "match_phrase": keyed(field, text.as_str().into()) } })
            }
        }
    }
}

fn keyed(key: &str, value: serde_json::Value) -> serde_json::Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    serde_json::Value::Object(map)
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
