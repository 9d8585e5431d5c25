//! Operator overload tables consulted by the binder.
//!
//! Lookup is a linear scan and the first exact match wins. The tables keep
//! the historical entries as they are, including the mixed int/float
//! arithmetic rows that are typed `int` and the duplicated float equality
//! rows.

use crate::lexer::TokenType;
use crate::value::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Power,
    Equals,
    NotEquals,
    LogicalAnd,
    LogicalOr,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryOperator {
    pub token_type: TokenType,
    pub kind: UnaryOperatorKind,
    pub operand_type: ValueType,
    pub result_type: ValueType,
}

impl UnaryOperator {
    const fn new(token_type: TokenType, kind: UnaryOperatorKind, operand_type: ValueType) -> Self {
        Self {
            token_type,
            kind,
            operand_type,
            result_type: operand_type,
        }
    }

    pub fn bind(token_type: TokenType, operand_type: ValueType) -> Option<&'static UnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.token_type == token_type && op.operand_type == operand_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperator {
    pub token_type: TokenType,
    pub kind: BinaryOperatorKind,
    pub left_type: ValueType,
    pub right_type: ValueType,
    pub result_type: ValueType,
}

impl BinaryOperator {
    const fn new(
        token_type: TokenType,
        kind: BinaryOperatorKind,
        left_type: ValueType,
        right_type: ValueType,
        result_type: ValueType,
    ) -> Self {
        Self {
            token_type,
            kind,
            left_type,
            right_type,
            result_type,
        }
    }

    /// Both operands and the result share one type.
    const fn same(token_type: TokenType, kind: BinaryOperatorKind, ty: ValueType) -> Self {
        Self::new(token_type, kind, ty, ty, ty)
    }

    /// Both operands share one type; the result may differ.
    const fn operands(
        token_type: TokenType,
        kind: BinaryOperatorKind,
        operand_type: ValueType,
        result_type: ValueType,
    ) -> Self {
        Self::new(token_type, kind, operand_type, operand_type, result_type)
    }

    pub fn bind(
        token_type: TokenType,
        left_type: ValueType,
        right_type: ValueType,
    ) -> Option<&'static BinaryOperator> {
        BINARY_OPERATORS.iter().find(|op| {
            op.token_type == token_type && op.left_type == left_type && op.right_type == right_type
        })
    }
}

use self::BinaryOperatorKind as B;
use self::UnaryOperatorKind as U;
use crate::lexer::TokenType as T;
use crate::value::ValueType::{Bool, Float, Int};

pub static UNARY_OPERATORS: &[UnaryOperator] = &[
    UnaryOperator::new(T::Bang, U::LogicalNegation, Bool),
    UnaryOperator::new(T::Plus, U::Identity, Int),
    UnaryOperator::new(T::Minus, U::Negation, Int),
    UnaryOperator::new(T::Plus, U::Identity, Float),
    UnaryOperator::new(T::Minus, U::Negation, Float),
];

pub static BINARY_OPERATORS: &[BinaryOperator] = &[
    // int arithmetic
    BinaryOperator::same(T::Plus, B::Addition, Int),
    BinaryOperator::same(T::Minus, B::Subtraction, Int),
    BinaryOperator::same(T::Star, B::Multiplication, Int),
    BinaryOperator::same(T::Slash, B::Division, Int),
    BinaryOperator::same(T::Percent, B::Modulo, Int),
    BinaryOperator::same(T::Caret, B::Power, Int),
    // float arithmetic
    BinaryOperator::same(T::Plus, B::Addition, Float),
    BinaryOperator::same(T::Minus, B::Subtraction, Float),
    BinaryOperator::same(T::Star, B::Multiplication, Float),
    BinaryOperator::same(T::Slash, B::Division, Float),
    BinaryOperator::same(T::Percent, B::Modulo, Float),
    BinaryOperator::same(T::Caret, B::Power, Float),
    // float with int, typed int
    BinaryOperator::new(T::Plus, B::Addition, Float, Int, Int),
    BinaryOperator::new(T::Minus, B::Subtraction, Float, Int, Int),
    BinaryOperator::new(T::Star, B::Multiplication, Float, Int, Int),
    BinaryOperator::new(T::Slash, B::Division, Float, Int, Int),
    BinaryOperator::new(T::Percent, B::Modulo, Float, Int, Int),
    BinaryOperator::new(T::Caret, B::Power, Float, Int, Int),
    // int with float, typed int
    BinaryOperator::new(T::Plus, B::Addition, Int, Float, Int),
    BinaryOperator::new(T::Minus, B::Subtraction, Int, Float, Int),
    BinaryOperator::new(T::Star, B::Multiplication, Int, Float, Int),
    BinaryOperator::new(T::Slash, B::Division, Int, Float, Int),
    BinaryOperator::new(T::Percent, B::Modulo, Int, Float, Int),
    BinaryOperator::new(T::Caret, B::Power, Int, Float, Int),
    // int comparisons and logic
    BinaryOperator::operands(T::EqualEqual, B::Equals, Int, Bool),
    BinaryOperator::operands(T::BangEqual, B::NotEquals, Int, Bool),
    BinaryOperator::operands(T::And, B::LogicalAnd, Int, Bool),
    BinaryOperator::operands(T::Or, B::LogicalOr, Int, Bool),
    BinaryOperator::operands(T::Less, B::Less, Int, Bool),
    BinaryOperator::operands(T::LessEqual, B::LessOrEquals, Int, Bool),
    BinaryOperator::operands(T::Greater, B::Greater, Int, Bool),
    BinaryOperator::operands(T::GreaterEqual, B::GreaterOrEquals, Int, Bool),
    // bool logic
    BinaryOperator::same(T::And, B::LogicalAnd, Bool),
    BinaryOperator::same(T::Or, B::LogicalOr, Bool),
    BinaryOperator::same(T::EqualEqual, B::Equals, Bool),
    BinaryOperator::same(T::BangEqual, B::NotEquals, Bool),
    // bool with int
    BinaryOperator::new(T::And, B::LogicalAnd, Bool, Int, Bool),
    BinaryOperator::new(T::Or, B::LogicalOr, Bool, Int, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Bool, Int, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Bool, Int, Bool),
    // int with bool
    BinaryOperator::new(T::And, B::LogicalAnd, Int, Bool, Bool),
    BinaryOperator::new(T::Or, B::LogicalOr, Int, Bool, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Int, Bool, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Int, Bool, Bool),
    // float comparisons
    BinaryOperator::operands(T::EqualEqual, B::Equals, Float, Bool),
    BinaryOperator::operands(T::BangEqual, B::NotEquals, Float, Bool),
    BinaryOperator::operands(T::EqualEqual, B::Equals, Float, Bool),
    BinaryOperator::operands(T::BangEqual, B::NotEquals, Float, Bool),
    BinaryOperator::operands(T::Less, B::Less, Float, Bool),
    BinaryOperator::operands(T::LessEqual, B::LessOrEquals, Float, Bool),
    BinaryOperator::operands(T::Greater, B::Greater, Float, Bool),
    BinaryOperator::operands(T::GreaterEqual, B::GreaterOrEquals, Float, Bool),
    // bool with float
    BinaryOperator::new(T::And, B::LogicalAnd, Bool, Float, Bool),
    BinaryOperator::new(T::Or, B::LogicalOr, Bool, Float, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Bool, Float, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Bool, Float, Bool),
    // float with bool
    BinaryOperator::new(T::And, B::LogicalAnd, Float, Bool, Bool),
    BinaryOperator::new(T::Or, B::LogicalOr, Float, Bool, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Float, Bool, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Float, Bool, Bool),
    // int with float comparisons
    BinaryOperator::new(T::And, B::LogicalAnd, Int, Float, Bool),
    BinaryOperator::new(T::Or, B::LogicalOr, Int, Float, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Int, Float, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Int, Float, Bool),
    BinaryOperator::new(T::Less, B::Less, Int, Float, Bool),
    BinaryOperator::new(T::LessEqual, B::LessOrEquals, Int, Float, Bool),
    BinaryOperator::new(T::Greater, B::Greater, Int, Float, Bool),
    BinaryOperator::new(T::GreaterEqual, B::GreaterOrEquals, Int, Float, Bool),
    // float with int comparisons
    BinaryOperator::new(T::EqualEqual, B::Equals, Float, Int, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Float, Int, Bool),
    BinaryOperator::new(T::EqualEqual, B::Equals, Float, Int, Bool),
    BinaryOperator::new(T::BangEqual, B::NotEquals, Float, Int, Bool),
    BinaryOperator::new(T::Less, B::Less, Float, Int, Bool),
    BinaryOperator::new(T::LessEqual, B::LessOrEquals, Float, Int, Bool),
    BinaryOperator::new(T::Greater, B::Greater, Float, Int, Bool),
    BinaryOperator::new(T::GreaterEqual, B::GreaterOrEquals, Float, Int, Bool),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_arithmetic_is_typed_int() {
        let op = BinaryOperator::bind(T::Plus, Float, Int).map(|op| op.result_type);
        assert_eq!(op, Some(Int));
        let op = BinaryOperator::bind(T::Slash, Int, Float).map(|op| op.result_type);
        assert_eq!(op, Some(Int));
    }

    #[test]
    fn missing_combinations() {
        assert!(BinaryOperator::bind(T::Star, Int, Bool).is_none());
        assert!(BinaryOperator::bind(T::And, Float, Float).is_none());
        assert!(BinaryOperator::bind(T::And, Float, Int).is_none());
        assert!(UnaryOperator::bind(T::Plus, Bool).is_none());
        assert!(UnaryOperator::bind(T::Bang, Int).is_none());
    }

    #[test]
    fn first_match_wins() {
        let first = BinaryOperator::bind(T::EqualEqual, Float, Float);
        assert!(std::ptr::eq(first.unwrap(), &BINARY_OPERATORS[44]));
    }
}
