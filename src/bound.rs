use crate::ast::AggregateFunction;
use crate::diagnostic::DiagnosticBag;
use crate::lexer::Token;
use crate::operators::{BinaryOperator, UnaryOperator};
use crate::symbols::VariableSymbol;
use crate::value::{Value, ValueType};
use std::sync::Arc;

/// Typed mirror of the parse tree, produced by the binder.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpression {
    Literal(Value),
    Variable(VariableSymbol),
    Assignment {
        variable: VariableSymbol,
        expression: Box<BoundExpression>,
    },
    Unary {
        operator: &'static UnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        left: Box<BoundExpression>,
        operator: &'static BinaryOperator,
        right: Box<BoundExpression>,
    },
    /// Aggregate call over raw numeric tokens. Has no static type.
    Aggregate {
        function: AggregateFunction,
        arguments: Vec<Token>,
    },
}

impl BoundExpression {
    /// Static type, or `None` for an aggregate call.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            BoundExpression::Literal(value) => Some(value.value_type()),
            BoundExpression::Variable(variable) => Some(variable.value_type),
            BoundExpression::Assignment { expression, .. } => expression.value_type(),
            BoundExpression::Unary { operator, .. } => Some(operator.result_type),
            BoundExpression::Binary { operator, .. } => Some(operator.result_type),
            BoundExpression::Aggregate { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    Block(Vec<BoundStatement>),
    Expression(BoundExpression),
    VariableDeclaration {
        variable: VariableSymbol,
        initializer: BoundExpression,
    },
    If {
        condition: BoundExpression,
        then_statement: Box<BoundStatement>,
        else_statement: Option<Box<BoundStatement>>,
    },
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
    },
    For {
        variable: VariableSymbol,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: Box<BoundStatement>,
    },
}

/// Result of binding one submission on top of its predecessors.
#[derive(Debug)]
pub struct BoundGlobalScope {
    pub previous: Option<Arc<BoundGlobalScope>>,
    /// Diagnostics of every submission in the chain, oldest first.
    pub diagnostics: DiagnosticBag,
    /// Variables this submission declared at its top level.
    pub variables: Vec<VariableSymbol>,
    pub statement: BoundStatement,
}
