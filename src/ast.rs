//! Filter expression AST as produced by the upstream query parser.
//!
//! Nodes are decoded from JSON objects tagged by `"type"`:
//!
//! ```text
//! {"type": "BinaryExpression", "operator": "==",
//!  "left": {"type": "Field", "name": "status"},
//!  "right": {"type": "NumberLiteral", "value": 200}}
//! ```
//!
//! Operators stay as raw strings here; the compiler decides which ones it
//! understands.

use crate::duration::serde_duration;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

/// Errors that can occur when decoding an AST document
#[derive(Debug, Error)]
pub enum AstError {
    #[error("Invalid AST document: {0}")]
    Syntax(String),

    #[error("Unsupported filter node: {0}")]
    UnsupportedNode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    NullLiteral,
    BooleanLiteral {
        value: bool,
    },
    NumberLiteral {
        value: Number,
    },
    StringLiteral {
        value: String,
    },
    MomentLiteral {
        value: DateTime<Utc>,
    },
    DurationLiteral {
        #[serde(with = "serde_duration")]
        value: TimeDelta,
    },
    FilterLiteral {
        ast: Box<Node>,
    },
    ArrayLiteral {
        elements: Vec<Node>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
    },
    Field {
        name: String,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ExpressionFilterTerm {
        expression: Box<Node>,
    },
    FulltextFilterTerm {
        text: String,
    },
}

impl Node {
    pub fn null() -> Self {
        Node::NullLiteral
    }

    pub fn boolean(value: bool) -> Self {
        Node::BooleanLiteral { value }
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Node::NumberLiteral {
            value: value.into(),
        }
    }

    /// Float literal, or `None` for NaN and infinities which have no JSON form
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(|value| Node::NumberLiteral { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::StringLiteral {
            value: value.into(),
        }
    }

    pub fn moment(value: DateTime<Utc>) -> Self {
        Node::MomentLiteral { value }
    }

    pub fn duration(value: TimeDelta) -> Self {
        Node::DurationLiteral { value }
    }

    pub fn filter(ast: Node) -> Self {
        Node::FilterLiteral { ast: Box::new(ast) }
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Node::ArrayLiteral { elements }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Node::Field { name: name.into() }
    }

    pub fn member(object: Node, property: Node) -> Self {
        Node::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
        }
    }

    pub fn unary(operator: impl Into<String>, argument: Node) -> Self {
        Node::UnaryExpression {
            operator: operator.into(),
            argument: Box::new(argument),
        }
    }

    pub fn binary(operator: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Node, right: Node) -> Self {
        Node::binary("AND", left, right)
    }

    pub fn or(left: Node, right: Node) -> Self {
        Node::binary("OR", left, right)
    }

    pub fn not(argument: Node) -> Self {
        Node::unary("NOT", argument)
    }

    pub fn expression(expression: Node) -> Self {
        Node::ExpressionFilterTerm {
            expression: Box::new(expression),
        }
    }

    pub fn fulltext(text: impl Into<String>) -> Self {
        Node::FulltextFilterTerm { text: text.into() }
    }

    /// Whether the node names a document field rather than a value
    pub fn is_field_reference(&self) -> bool {
        matches!(self, Node::Field { .. } | Node::MemberExpression { .. })
    }

    /// Tag of the node as it appears in the `"type"` key
    pub fn kind(&self) -> &'static str {
        match self {
            Node::NullLiteral => "NullLiteral",
            Node::BooleanLiteral { .. } => "BooleanLiteral",
            Node::NumberLiteral { .. } => "NumberLiteral",
            Node::StringLiteral { .. } => "StringLiteral",
            Node::MomentLiteral { .. } => "MomentLiteral",
            Node::DurationLiteral { .. } => "DurationLiteral",
            Node::FilterLiteral { .. } => "FilterLiteral",
            Node::ArrayLiteral { .. } => "ArrayLiteral",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::Field { .. } => "Field",
            Node::MemberExpression { .. } => "MemberExpression",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::ExpressionFilterTerm { .. } => "ExpressionFilterTerm",
            Node::FulltextFilterTerm { .. } => "FulltextFilterTerm",
        }
    }
}

/// Decode an AST document.
///
/// Strict JSON is tried first. Input that is not valid JSON is re-read as
/// JSON5 so hand-written documents may carry comments, unquoted keys and
/// trailing commas.
pub fn parse_ast(input: &str) -> Result<Node, AstError> {
    let document: serde_json::Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(strict) if strict.is_syntax() || strict.is_eof() => json5::from_str(input)
            .map_err(|lenient| AstError::Syntax(format!("{strict} (as JSON5: {lenient})")))?,
        Err(other) => return Err(AstError::Syntax(other.to_string())),
    };

    serde_json::from_value(document).map_err(AstError::UnsupportedNode)
}
