use super::error::CompileError;
use super::operator::BinaryOperator;
use super::Walk;
use crate::ast::Node;
use crate::value::Value;

/// A comparison normalized so the field is on the left
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Comparison {
    pub field: String,
    pub value: Value,
    pub operator: BinaryOperator,
}

impl Walk<'_> {
    /// Work out which operand is the field for `==`, `!=`, `<`, `>`, `<=`
    /// and `>=`.
    ///
    /// When the field is on the right the operands are swapped and the
    /// operator inverted, so `5 < x` becomes `x > 5`. The field operand is
    /// always visited first.
    pub(super) fn resolve_comparison(
        &mut self,
        operator: BinaryOperator,
        left: &Node,
        right: &Node,
    ) -> Result<Comparison, CompileError> {
        let (field_node, value_node, operator) = if left.is_field_reference() {
            (left, right, operator)
        } else if right.is_field_reference() {
            let inverted = operator
                .inverse()
                .ok_or_else(|| CompileError::InvalidOperator(operator.to_string()))?;
            (right, left, inverted)
        } else {
            return Err(CompileError::MissingFieldOperand(operator.to_string()));
        };

        let field = self.field_name(field_node, operator)?;
        let value = self.visit(value_node)?.into_value(operator)?;
        Ok(Comparison {
            field,
            value,
            operator,
        })
    }

    /// Operands of `=~`, `!~` and `in`, which only accept the field on the
    /// left and are never inverted
    pub(super) fn resolve_left_field(
        &mut self,
        operator: BinaryOperator,
        left: &Node,
        right: &Node,
    ) -> Result<(String, Value), CompileError> {
        if !left.is_field_reference() {
            return Err(CompileError::LeftFieldOperand(operator.to_string()));
        }
        let field = self.field_name(left, operator)?;
        let value = self.visit(right)?.into_value(operator)?;
        Ok((field, value))
    }

    fn field_name(
        &mut self,
        node: &Node,
        operator: BinaryOperator,
    ) -> Result<String, CompileError> {
        match self.visit(node)?.into_value(operator)? {
            Value::String(name) => Ok(name),
            _ => Err(CompileError::MissingFieldOperand(operator.to_string())),
        }
    }
}
