use super::error::CompileError;
use crate::clause::RangeBound;
use std::fmt;
use std::str::FromStr;

/// Binary operators understood by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// Glob-style wildcard match (`*`, `?`); not a regular expression
    Matches,
    NotMatches,
    In,
}

impl FromStr for BinaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(BinaryOperator::And),
            "OR" => Ok(BinaryOperator::Or),
            "==" => Ok(BinaryOperator::Eq),
            "!=" => Ok(BinaryOperator::NotEq),
            "<" => Ok(BinaryOperator::Lt),
            ">" => Ok(BinaryOperator::Gt),
            "<=" => Ok(BinaryOperator::LtEq),
            ">=" => Ok(BinaryOperator::GtEq),
            "=~" => Ok(BinaryOperator::Matches),
            "!~" => Ok(BinaryOperator::NotMatches),
            "in" => Ok(BinaryOperator::In),
            _ => Err(CompileError::InvalidOperator(s.to_string())),
        }
    }
}

impl BinaryOperator {
    /// The operator token as written in filter expressions
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Matches => "=~",
            BinaryOperator::NotMatches => "!~",
            BinaryOperator::In => "in",
        }
    }

    /// Operator to use once the operands of a comparison are swapped so the
    /// field ends up on the left.
    ///
    /// Only the comparison operators have an inverse; everything else
    /// returns `None`.
    pub fn inverse(&self) -> Option<Self> {
        match self {
            BinaryOperator::Eq => Some(BinaryOperator::Eq),
            BinaryOperator::NotEq => Some(BinaryOperator::NotEq),
            BinaryOperator::Lt => Some(BinaryOperator::Gt),
            BinaryOperator::Gt => Some(BinaryOperator::Lt),
            BinaryOperator::LtEq => Some(BinaryOperator::GtEq),
            BinaryOperator::GtEq => Some(BinaryOperator::LtEq),
            _ => None,
        }
    }

    pub fn range_bound(&self) -> Option<RangeBound> {
        match self {
            BinaryOperator::Lt => Some(RangeBound::Lt),
            BinaryOperator::Gt => Some(RangeBound::Gt),
            BinaryOperator::LtEq => Some(RangeBound::Lte),
            BinaryOperator::GtEq => Some(RangeBound::Gte),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators understood by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

impl FromStr for UnaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT" => Ok(UnaryOperator::Not),
            _ => Err(CompileError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => f.write_str("NOT"),
        }
    }
}
