use crate::ast::AggregateFunction;
use crate::bound::{BoundExpression, BoundStatement};
use crate::lexer::Token;
use crate::operators::{BinaryOperatorKind, UnaryOperatorKind};
use crate::symbols::{VariableStore, VariableSymbol};
use crate::value::Value;

/// Tree-walking evaluator over a bound statement.
///
/// Arithmetic is carried out in `f64` whatever the operands' static types,
/// so `5 / 2` is `2.5` and `+1` is `1.0`. Relational operators compare in
/// `f32`; equality compares values including their variant.
pub struct Evaluator<'a> {
    root: &'a BoundStatement,
    variables: &'a mut VariableStore,
    last_value: Option<Value>,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a BoundStatement, variables: &'a mut VariableStore) -> Self {
        Self {
            root,
            variables,
            last_value: None,
        }
    }

    /// Runs the statement and returns the value of the last expression
    /// statement or declaration executed, if any.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(mut self) -> Option<Value> {
        let root = self.root;
        self.execute_statement(root);
        self.last_value
    }

    fn execute_statement(&mut self, statement: &BoundStatement) {
        match statement {
            BoundStatement::Block(statements) => {
                for statement in statements {
                    self.execute_statement(statement);
                }
            }
            BoundStatement::Expression(expression) => {
                self.last_value = Some(self.evaluate_expression(expression));
            }
            BoundStatement::VariableDeclaration {
                variable,
                initializer,
            } => {
                let value = self.evaluate_expression(initializer);
                self.variables.insert(variable.clone(), value);
                self.last_value = Some(value);
            }
            BoundStatement::If {
                condition,
                then_statement,
                else_statement,
            } => {
                if self.evaluate_expression(condition).is_truthy() {
                    self.execute_statement(then_statement);
                } else if let Some(else_statement) = else_statement {
                    self.execute_statement(else_statement);
                }
            }
            BoundStatement::While { condition, body } => {
                while self.evaluate_expression(condition).is_truthy() {
                    self.execute_statement(body);
                }
            }
            BoundStatement::For {
                variable,
                lower_bound,
                upper_bound,
                body,
            } => {
                let lower = self.evaluate_expression(lower_bound).as_i32();
                let upper = self.evaluate_expression(upper_bound).as_i32();

                for i in lower..=upper {
                    self.variables.insert(variable.clone(), Value::Int(i));
                    self.execute_statement(body);
                }
            }
        }
    }

    fn evaluate_expression(&mut self, expression: &BoundExpression) -> Value {
        match expression {
            BoundExpression::Literal(value) => *value,
            BoundExpression::Variable(variable) => self.read(variable),
            BoundExpression::Assignment {
                variable,
                expression,
            } => {
                let value = self.evaluate_expression(expression);
                self.variables.insert(variable.clone(), value);
                value
            }
            BoundExpression::Unary { operator, operand } => {
                let operand = self.evaluate_expression(operand);
                match operator.kind {
                    UnaryOperatorKind::Identity => Value::Float(operand.as_f64()),
                    UnaryOperatorKind::Negation => Value::Float(-operand.as_f64()),
                    UnaryOperatorKind::LogicalNegation => Value::Bool(!operand.is_truthy()),
                }
            }
            BoundExpression::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate_expression(left);
                let right = self.evaluate_expression(right);
                binary(operator.kind, left, right)
            }
            BoundExpression::Aggregate {
                function,
                arguments,
            } => Value::Float(aggregate(*function, arguments)),
        }
    }

    /// A declared symbol with no stored value reads as its type's default.
    fn read(&self, variable: &VariableSymbol) -> Value {
        self.variables
            .get(variable)
            .copied()
            .unwrap_or_else(|| variable.value_type.default_value())
    }
}

fn binary(kind: BinaryOperatorKind, left: Value, right: Value) -> Value {
    use BinaryOperatorKind::*;

    match kind {
        Addition => Value::Float(left.as_f64() + right.as_f64()),
        Subtraction => Value::Float(left.as_f64() - right.as_f64()),
        Multiplication => Value::Float(left.as_f64() * right.as_f64()),
        Division => Value::Float(left.as_f64() / right.as_f64()),
        // Truncated remainder, sign follows the dividend
        Modulo => Value::Float(left.as_f64() % right.as_f64()),
        Power => Value::Float(left.as_f64().powf(right.as_f64())),
        LogicalAnd => Value::Bool(left.is_truthy() && right.is_truthy()),
        LogicalOr => Value::Bool(left.is_truthy() || right.is_truthy()),
        Equals => Value::Bool(left == right),
        NotEquals => Value::Bool(left != right),
        Less => Value::Bool(left.as_f32() < right.as_f32()),
        LessOrEquals => Value::Bool(left.as_f32() <= right.as_f32()),
        Greater => Value::Bool(left.as_f32() > right.as_f32()),
        GreaterOrEquals => Value::Bool(left.as_f32() >= right.as_f32()),
    }
}

/// Folds the argument tokens, re-reading each one from its source text.
/// An argument whose text does not parse counts as 0.
fn aggregate(function: AggregateFunction, arguments: &[Token]) -> f64 {
    let numbers = arguments
        .iter()
        .map(|token| token.text().parse::<f64>().unwrap_or(0.0));

    match function {
        AggregateFunction::Avg => {
            let (sum, count) = numbers.fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            sum / count as f64
        }
        AggregateFunction::Min => {
            let mut min = 0.0;
            let mut seeded = false;
            for n in numbers {
                if !seeded || n < min {
                    min = n;
                    seeded = true;
                }
            }
            min
        }
        AggregateFunction::Max => {
            // Starts from 0 rather than the first argument
            let mut max = 0.0;
            for n in numbers {
                if n > max {
                    max = n;
                }
            }
            max
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenType;

    fn numbers(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let token_type = if text.contains('.') {
                    TokenType::Float
                } else {
                    TokenType::Integer
                };
                Token::new(token_type, text.to_string(), i * 4, None)
            })
            .collect()
    }

    #[test]
    fn max_never_drops_below_zero() {
        // Built by hand: the grammar has no negative number literals
        let arguments = numbers(&["-3", "-1.5"]);
        assert_eq!(aggregate(AggregateFunction::Max, &arguments), 0.0);
        assert_eq!(aggregate(AggregateFunction::Min, &arguments), -3.0);
    }

    #[test]
    fn min_seeds_from_first_argument() {
        let arguments = numbers(&["4", "7", "5"]);
        assert_eq!(aggregate(AggregateFunction::Min, &arguments), 4.0);
    }

    #[test]
    fn avg_of_nothing_is_nan() {
        assert!(aggregate(AggregateFunction::Avg, &[]).is_nan());
    }

    #[test]
    fn equality_is_variant_sensitive() {
        assert_eq!(
            binary(BinaryOperatorKind::Equals, Value::Int(1), Value::Float(1.0)),
            Value::Bool(false)
        );
        assert_eq!(
            binary(BinaryOperatorKind::Less, Value::Int(1), Value::Float(1.5)),
            Value::Bool(true)
        );
    }
}
