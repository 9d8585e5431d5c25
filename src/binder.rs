use crate::ast::{CompilationUnit, Expression, Statement};
use crate::bound::{BoundExpression, BoundGlobalScope, BoundStatement};
use crate::diagnostic::DiagnosticBag;
use crate::lexer::TokenType;
use crate::operators::{BinaryOperator, UnaryOperator};
use crate::scope::BoundScope;
use crate::symbols::VariableSymbol;
use crate::text::Span;
use crate::value::{Value, ValueType};
use std::sync::Arc;

/// Binds `unit` on top of the chain of earlier submissions.
///
/// Each earlier submission contributes one scope layer holding the variables
/// it declared, oldest outermost. The unit itself is bound in a fresh layer
/// beneath them, so it may shadow anything declared before.
#[tracing::instrument(level = "debug", skip_all)]
pub fn bind_global_scope(
    previous: Option<Arc<BoundGlobalScope>>,
    unit: &CompilationUnit,
) -> BoundGlobalScope {
    let parent = create_parent_scopes(previous.as_ref());
    let mut binder = Binder::new(parent);
    let statement = binder.bind_statement(&unit.statement);
    let variables = binder.scope.declared_variables();

    let mut diagnostics = binder.diagnostics;
    if let Some(previous) = &previous {
        diagnostics.prepend(&previous.diagnostics);
    }

    tracing::debug!(
        variables = variables.len(),
        diagnostics = diagnostics.len(),
        "bound submission"
    );

    BoundGlobalScope {
        previous,
        diagnostics,
        variables,
        statement,
    }
}

fn create_parent_scopes(previous: Option<&Arc<BoundGlobalScope>>) -> Option<BoundScope> {
    let mut chain = Vec::new();
    let mut current = previous;
    while let Some(scope) = current {
        chain.push(scope);
        current = scope.previous.as_ref();
    }

    let mut parent: Option<BoundScope> = None;
    for global in chain.into_iter().rev() {
        let mut scope = match parent.take() {
            Some(outer) => BoundScope::with_parent(outer),
            None => BoundScope::new(),
        };
        for variable in &global.variables {
            scope.try_declare(variable.clone());
        }
        parent = Some(scope);
    }
    parent
}

pub struct Binder {
    scope: BoundScope,
    diagnostics: DiagnosticBag,
}

impl Binder {
    pub fn new(parent: Option<BoundScope>) -> Self {
        let scope = match parent {
            Some(parent) => BoundScope::with_parent(parent),
            None => BoundScope::new(),
        };
        Self {
            scope,
            diagnostics: DiagnosticBag::new(),
        }
    }

    fn push_scope(&mut self) {
        let parent = std::mem::take(&mut self.scope);
        self.scope = BoundScope::with_parent(parent);
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.scope.take_parent() {
            self.scope = parent;
        }
    }

    pub fn bind_statement(&mut self, statement: &Statement) -> BoundStatement {
        match statement {
            Statement::Block { statements, .. } => {
                self.push_scope();
                let statements = statements.iter().map(|s| self.bind_statement(s)).collect();
                self.pop_scope();
                BoundStatement::Block(statements)
            }
            Statement::Expression { expression } => {
                BoundStatement::Expression(self.bind_expression(expression))
            }
            Statement::VariableDeclaration {
                keyword,
                identifier,
                initializer,
                ..
            } => {
                let name = identifier.text();
                let is_read_only = keyword.token_type == TokenType::Let;
                let bound_initializer = self.bind_expression(initializer);
                // An untyped initializer is reported; the symbol still needs a type
                let value_type = self
                    .static_type(&bound_initializer, initializer.span())
                    .unwrap_or(ValueType::Float);

                let variable = VariableSymbol::new(name, is_read_only, value_type);
                if !self.scope.try_declare(variable.clone()) {
                    self.diagnostics
                        .report_variable_already_declared(identifier.span(), name);
                }

                BoundStatement::VariableDeclaration {
                    variable,
                    initializer: bound_initializer,
                }
            }
            Statement::If {
                condition,
                then_statement,
                else_clause,
                ..
            } => {
                let condition = self.bind_condition(condition, ValueType::Bool);
                let then_statement = Box::new(self.bind_statement(then_statement));
                let else_statement = else_clause
                    .as_ref()
                    .map(|clause| Box::new(self.bind_statement(&clause.statement)));

                BoundStatement::If {
                    condition,
                    then_statement,
                    else_statement,
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                let condition = self.bind_condition(condition, ValueType::Bool);
                let body = Box::new(self.bind_statement(body));
                BoundStatement::While { condition, body }
            }
            Statement::For {
                identifier,
                lower_bound,
                upper_bound,
                body,
                ..
            } => {
                // Bounds are bound outside the loop variable's scope
                let lower_bound = self.bind_condition(lower_bound, ValueType::Int);
                let upper_bound = self.bind_condition(upper_bound, ValueType::Int);

                self.push_scope();
                let name = identifier.text();
                let variable = VariableSymbol::new(name, true, ValueType::Int);
                if !self.scope.try_declare(variable.clone()) {
                    self.diagnostics
                        .report_variable_already_declared(identifier.span(), name);
                }
                let body = Box::new(self.bind_statement(body));
                self.pop_scope();

                BoundStatement::For {
                    variable,
                    lower_bound,
                    upper_bound,
                    body,
                }
            }
        }
    }

    /// Binds an expression that must have `target` type, reporting a
    /// conversion error otherwise. The bound expression is returned either way.
    fn bind_condition(&mut self, expression: &Expression, target: ValueType) -> BoundExpression {
        let bound = self.bind_expression(expression);
        if let Some(actual) = self.static_type(&bound, expression.span()) {
            if actual != target {
                self.diagnostics
                    .report_cannot_convert(expression.span(), actual, target);
            }
        }
        bound
    }

    /// Static type of `bound`, reporting an aggregate call used where a type
    /// is required.
    fn static_type(&mut self, bound: &BoundExpression, span: Span) -> Option<ValueType> {
        let value_type = bound.value_type();
        if let BoundExpression::Aggregate { function, .. } = bound {
            self.diagnostics.report_untyped_expression(span, *function);
        }
        value_type
    }

    pub fn bind_expression(&mut self, expression: &Expression) -> BoundExpression {
        match expression {
            Expression::Literal { value, .. } => {
                BoundExpression::Literal(value.unwrap_or(Value::Int(0)))
            }
            Expression::FloatLiteral { literal } => {
                // -1 marks a float literal whose value never materialised
                BoundExpression::Literal(literal.value.unwrap_or(Value::Float(-1.0)))
            }
            Expression::Bracketed { expression, .. } => self.bind_expression(expression),
            Expression::Name { identifier } => {
                let name = identifier.text();
                // Placeholder from recovery; already reported by the parser
                if name.is_empty() {
                    return BoundExpression::Literal(Value::Int(0));
                }

                match self.scope.try_lookup(name) {
                    Some(variable) => BoundExpression::Variable(variable.clone()),
                    None => {
                        self.diagnostics
                            .report_undefined_variable(identifier.span(), name);
                        BoundExpression::Literal(Value::Int(0))
                    }
                }
            }
            Expression::Assignment {
                identifier,
                expression,
                ..
            } => self.bind_assignment(identifier.text(), identifier.span(), expression),
            Expression::Unary { operator, operand } => {
                let bound_operand = self.bind_expression(operand);
                let Some(operand_type) = self.static_type(&bound_operand, operand.span()) else {
                    return bound_operand;
                };

                match UnaryOperator::bind(operator.token_type, operand_type) {
                    Some(op) => BoundExpression::Unary {
                        operator: op,
                        operand: Box::new(bound_operand),
                    },
                    None => {
                        self.diagnostics.report_undefined_unary_operator(
                            operator.span(),
                            operator.text(),
                            operand_type,
                        );
                        bound_operand
                    }
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let bound_left = self.bind_expression(left);
                let bound_right = self.bind_expression(right);
                let left_type = self.static_type(&bound_left, left.span());
                let right_type = self.static_type(&bound_right, right.span());
                let (Some(left_type), Some(right_type)) = (left_type, right_type) else {
                    return bound_left;
                };

                match BinaryOperator::bind(operator.token_type, left_type, right_type) {
                    Some(op) => BoundExpression::Binary {
                        left: Box::new(bound_left),
                        operator: op,
                        right: Box::new(bound_right),
                    },
                    None => {
                        self.diagnostics.report_undefined_binary_operator(
                            operator.span(),
                            operator.text(),
                            left_type,
                            right_type,
                        );
                        bound_left
                    }
                }
            }
            Expression::Aggregate {
                function,
                arguments,
                ..
            } => BoundExpression::Aggregate {
                function: *function,
                arguments: arguments.clone(),
            },
        }
    }

    fn bind_assignment(&mut self, name: &str, name_span: Span, expression: &Expression) -> BoundExpression {
        let bound_expression = self.bind_expression(expression);

        let Some(variable) = self.scope.try_lookup(name).cloned() else {
            self.diagnostics.report_undefined_variable(name_span, name);
            return bound_expression;
        };

        if variable.is_read_only {
            self.diagnostics.report_cannot_assign(name_span, name);
        }

        let Some(value_type) = self.static_type(&bound_expression, expression.span()) else {
            return bound_expression;
        };

        if value_type != variable.value_type {
            self.diagnostics
                .report_cannot_convert(expression.span(), value_type, variable.value_type);
            return bound_expression;
        }

        BoundExpression::Assignment {
            variable,
            expression: Box::new(bound_expression),
        }
    }
}
