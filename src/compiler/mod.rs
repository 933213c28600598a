//! Compiles filter expression ASTs into the search engine's filter DSL.
//!
//! The compiler walks the tree depth-first. Literals become operand values,
//! field references become field names, and every boolean or comparison node
//! becomes a [`Clause`]:
//!
//! ```text
//! status >= 200 AND status < 300
//!   => {"bool": {"must": [{"range": {"status": {"gte": 200}}},
//!                         {"range": {"status": {"lt": 300}}}]}}
//! ```
//!
//! # Known gaps
//!
//! - `=~` and `!~` compile to wildcard queries. Only glob syntax (`*`, `?`)
//!   is honored; regular expression syntax is passed through verbatim.
//! - `=~`, `!~` and `in` expect the field on the left and are never inverted.
//! - The skip field applies to `==`, `!=`, range operators and `in`, but not
//!   to `=~`/`!~`.

mod builders;
pub mod error;
mod operands;
pub mod operator;

use crate::ast::Node;
use crate::clause::Clause;
use crate::duration::canonical_duration;
use crate::value::Value;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

pub use error::CompileError;
pub use operator::{BinaryOperator, UnaryOperator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Field constrained outside the filter (usually the time field).
    /// Comparisons on it compile to match-all.
    pub skip_field: Option<String>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_field(mut self, field: impl Into<String>) -> Self {
        self.skip_field = Some(field.into());
        self
    }
}

/// Output of a top-level compilation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationResult {
    pub filter: Clause,
    /// One entry per field reference visited, in visit order
    pub filtered_fields: Vec<String>,
    /// Resolved field paths whose comparison compiled to match-all because
    /// they named the skip field
    #[serde(skip)]
    pub skipped_fields: Vec<String>,
}

/// A field together with how often the filter referenced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUsage {
    pub field: String,
    pub count: usize,
}

impl CompilationResult {
    /// Whether the filter compared against `field` anywhere
    pub fn references(&self, field: &str) -> bool {
        self.filtered_fields.iter().any(|f| f == field)
    }

    /// Whether any comparison was dropped in favor of match-all
    pub fn skip_applied(&self) -> bool {
        !self.skipped_fields.is_empty()
    }

    /// Distinct fields with reference counts, in first-seen order
    pub fn field_usage(&self) -> Vec<FieldUsage> {
        let mut usage: Vec<FieldUsage> = Vec::new();
        for field in &self.filtered_fields {
            match usage.iter_mut().find(|u| &u.field == field) {
                Some(existing) => existing.count += 1,
                None => usage.push(FieldUsage {
                    field: field.clone(),
                    count: 1,
                }),
            }
        }
        usage
    }
}

/// What visiting a node produced
#[derive(Debug, Clone, PartialEq)]
enum Compiled {
    Value(Value),
    Filter(Clause),
}

impl Compiled {
    fn into_filter(self, context: impl FnOnce() -> String) -> Result<Clause, CompileError> {
        match self {
            Compiled::Filter(clause) => Ok(clause),
            Compiled::Value(_) => Err(CompileError::ExpectedFilter(context())),
        }
    }

    fn into_value(self, operator: impl std::fmt::Display) -> Result<Value, CompileError> {
        match self {
            Compiled::Value(value) => Ok(value),
            Compiled::Filter(_) => Err(CompileError::ExpectedValue(operator.to_string())),
        }
    }
}

/// Filter compiler configured once and reusable across calls.
///
/// `compile` only reads the configuration, so a compiler can be shared
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    options: CompileOptions,
}

impl FilterCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a filter AST into a filter clause plus the fields it references
    pub fn compile(&self, root: &Node) -> Result<CompilationResult, CompileError> {
        let mut walk = Walk {
            skip_field: self.options.skip_field.as_deref(),
            filtered_fields: Vec::new(),
            skipped_fields: Vec::new(),
        };
        let filter = walk
            .visit(root)?
            .into_filter(|| "the top-level node".to_string())?;

        Ok(CompilationResult {
            filter,
            filtered_fields: walk.filtered_fields,
            skipped_fields: walk.skipped_fields,
        })
    }
}

/// State of a single compilation
struct Walk<'a> {
    skip_field: Option<&'a str>,
    filtered_fields: Vec<String>,
    skipped_fields: Vec<String>,
}

impl Walk<'_> {
    fn visit(&mut self, node: &Node) -> Result<Compiled, CompileError> {
        match node {
            Node::NullLiteral => Ok(Compiled::Value(Value::Null)),
            Node::BooleanLiteral { value } => Ok(Compiled::Value(Value::Bool(*value))),
            Node::NumberLiteral { value } => Ok(Compiled::Value(Value::Number(value.clone()))),
            Node::StringLiteral { value } => Ok(Compiled::Value(Value::String(value.clone()))),
            Node::MomentLiteral { value } => Ok(Compiled::Value(Value::String(
                value.to_rfc3339_opts(SecondsFormat::Millis, true),
            ))),
            Node::DurationLiteral { value } => {
                Ok(Compiled::Value(Value::String(canonical_duration(value))))
            }
            Node::FilterLiteral { ast } => self.visit(ast),
            Node::ArrayLiteral { elements } => {
                let values = elements
                    .iter()
                    .map(|e| self.visit(e)?.into_value("array element"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Compiled::Value(Value::Array(values)))
            }
            Node::UnaryExpression { operator, argument } => {
                let operator: UnaryOperator = operator.parse()?;
                self.visit_unary(operator, argument).map(Compiled::Filter)
            }
            Node::Field { name } => {
                self.filtered_fields.push(name.clone());
                Ok(Compiled::Value(Value::String(name.clone())))
            }
            Node::MemberExpression { object, property } => {
                let object = self.visit(object)?.into_value("member expression")?;
                let property = self.visit(property)?.into_value("member expression")?;
                Ok(Compiled::Value(Value::String(format!("{object}.{property}"))))
            }
            Node::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let operator: BinaryOperator = operator.parse()?;
                self.visit_binary(operator, left, right)
                    .map(Compiled::Filter)
            }
            Node::ExpressionFilterTerm { expression } => self.visit(expression),
            Node::FulltextFilterTerm { text } => {
                Ok(Compiled::Filter(builders::fulltext(text)))
            }
        }
    }

    fn visit_filter(&mut self, node: &Node, operator: &str) -> Result<Clause, CompileError> {
        self.visit(node)?
            .into_filter(|| format!("the \"{operator}\" operator"))
    }

    fn visit_unary(
        &mut self,
        operator: UnaryOperator,
        argument: &Node,
    ) -> Result<Clause, CompileError> {
        match operator {
            UnaryOperator::Not => {
                let inner = self.visit_filter(argument, "NOT")?;
                Ok(Clause::must_not(vec![inner]))
            }
        }
    }

    fn visit_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Node,
        right: &Node,
    ) -> Result<Clause, CompileError> {
        match operator {
            BinaryOperator::And => {
                let left = self.visit_filter(left, "AND")?;
                let right = self.visit_filter(right, "AND")?;
                Ok(Clause::must(vec![left, right]))
            }
            BinaryOperator::Or => {
                let left = self.visit_filter(left, "OR")?;
                let right = self.visit_filter(right, "OR")?;
                Ok(Clause::should(vec![left, right]))
            }
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::LtEq
            | BinaryOperator::GtEq => {
                let comparison = self.resolve_comparison(operator, left, right)?;
                if self.skip(&comparison.field) {
                    return Ok(Clause::MatchAll);
                }
                builders::comparison(comparison)
            }
            BinaryOperator::Matches | BinaryOperator::NotMatches => {
                let (field, value) = self.resolve_left_field(operator, left, right)?;
                builders::wildcard(operator, field, value)
            }
            BinaryOperator::In => {
                let (field, value) = self.resolve_left_field(operator, left, right)?;
                if self.skip(&field) {
                    return Ok(Clause::MatchAll);
                }
                builders::terms(operator, field, value)
            }
        }
    }

    /// Checks `field` against the skip field and records a hit
    fn skip(&mut self, field: &str) -> bool {
        let hit = self.skip_field == Some(field);
        if hit {
            self.skipped_fields.push(field.to_string());
        }
        hit
    }
}
