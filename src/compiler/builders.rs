use super::error::CompileError;
use super::operands::Comparison;
use super::operator::BinaryOperator;
use crate::clause::{ALL_FIELDS, Clause};
use crate::value::Value;

/// Clause for `==`, `!=` and the range operators once the field is known.
///
/// Null never reaches a term clause: the engine does not index explicit
/// nulls, so equality with null means the field is missing.
pub(super) fn comparison(cmp: Comparison) -> Result<Clause, CompileError> {
    let Comparison {
        field,
        value,
        operator,
    } = cmp;

    if let Value::Array(_) = value {
        return Err(CompileError::ExpectedScalar(operator.to_string()));
    }

    match operator {
        BinaryOperator::Eq => Ok(equality(field, value)),
        BinaryOperator::NotEq => Ok(equality(field, value).negate()),
        _ => {
            let bound = operator
                .range_bound()
                .ok_or_else(|| CompileError::InvalidOperator(operator.to_string()))?;
            if value.is_null() {
                return Err(CompileError::NullComparison {
                    operator: operator.to_string(),
                    field,
                });
            }
            Ok(Clause::Range {
                field,
                bound,
                value,
            })
        }
    }
}

fn equality(field: String, value: Value) -> Clause {
    if value.is_null() {
        Clause::Missing { field }
    } else {
        Clause::Term { field, value }
    }
}

/// `=~` / `!~` as a wildcard query. The pattern is used verbatim, so only
/// `*` and `?` have special meaning.
pub(super) fn wildcard(
    operator: BinaryOperator,
    field: String,
    pattern: Value,
) -> Result<Clause, CompileError> {
    let Value::String(pattern) = pattern else {
        return Err(CompileError::ExpectedPattern(operator.to_string()));
    };

    let clause = Clause::Wildcard { field, pattern };
    match operator {
        BinaryOperator::NotMatches => Ok(clause.negate()),
        _ => Ok(clause),
    }
}

pub(super) fn terms(
    operator: BinaryOperator,
    field: String,
    values: Value,
) -> Result<Clause, CompileError> {
    match values {
        Value::Array(values) => Ok(Clause::Terms { field, values }),
        _ => Err(CompileError::ExpectedArray(operator.to_string())),
    }
}

pub(super) fn fulltext(text: &str) -> Clause {
    Clause::MatchPhrase {
        field: ALL_FIELDS.to_string(),
        text: text.to_string(),
    }
}
