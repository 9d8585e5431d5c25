use crate::lexer::Token;
use crate::text::Span;
use crate::value::Value;
use std::fmt;

/// Untyped parse tree. Nodes own their tokens, including any placeholder
/// tokens the parser synthesized during recovery, so every node has a span.
/// Spans are derived from the first and last child rather than stored.

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub statement: Statement,
    pub end_of_file: Token,
}

impl CompilationUnit {
    pub fn span(&self) -> Span {
        Span::cover(self.statement.span(), self.end_of_file.span())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AggregateFunction::Avg => write!(f, "avg"),
            AggregateFunction::Min => write!(f, "min"),
            AggregateFunction::Max => write!(f, "max"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseClause {
    pub keyword: Token,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block {
        open_brace: Token,
        statements: Vec<Statement>,
        close_brace: Token,
    },
    Expression {
        expression: Expression,
    },
    VariableDeclaration {
        keyword: Token,
        identifier: Token,
        equals: Token,
        initializer: Expression,
    },
    If {
        keyword: Token,
        condition: Expression,
        then_statement: Box<Statement>,
        else_clause: Option<ElseClause>,
    },
    While {
        keyword: Token,
        condition: Expression,
        body: Box<Statement>,
    },
    For {
        keyword: Token,
        identifier: Token,
        equals: Token,
        lower_bound: Expression,
        to_keyword: Token,
        upper_bound: Expression,
        body: Box<Statement>,
    },
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Block {
                open_brace,
                close_brace,
                ..
            } => Span::cover(open_brace.span(), close_brace.span()),
            Statement::Expression { expression } => expression.span(),
            Statement::VariableDeclaration {
                keyword,
                initializer,
                ..
            } => Span::cover(keyword.span(), initializer.span()),
            Statement::If {
                keyword,
                then_statement,
                else_clause,
                ..
            } => {
                let last = match else_clause {
                    Some(clause) => clause.statement.span(),
                    None => then_statement.span(),
                };
                Span::cover(keyword.span(), last)
            }
            Statement::While { keyword, body, .. } | Statement::For { keyword, body, .. } => {
                Span::cover(keyword.span(), body.span())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Statement::Block { .. } => "BlockStatement",
            Statement::Expression { .. } => "ExpressionStatement",
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::If { .. } => "IfStatement",
            Statement::While { .. } => "WhileStatement",
            Statement::For { .. } => "ForStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer or boolean literal. `value` is `None` when the literal token
    /// was synthesized by recovery.
    Literal {
        literal: Token,
        value: Option<Value>,
    },
    FloatLiteral {
        literal: Token,
    },
    Bracketed {
        open: Token,
        expression: Box<Expression>,
        close: Token,
    },
    Unary {
        operator: Token,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    Name {
        identifier: Token,
    },
    Assignment {
        identifier: Token,
        equals: Token,
        expression: Box<Expression>,
    },
    /// `avg(...)`, `min(...)` or `max(...)` over raw numeric tokens.
    Aggregate {
        function: AggregateFunction,
        keyword: Token,
        open: Token,
        arguments: Vec<Token>,
        close: Token,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal { literal, .. } | Expression::FloatLiteral { literal } => {
                literal.span()
            }
            Expression::Bracketed { open, close, .. } => Span::cover(open.span(), close.span()),
            Expression::Unary { operator, operand } => Span::cover(operator.span(), operand.span()),
            Expression::Binary { left, right, .. } => Span::cover(left.span(), right.span()),
            Expression::Name { identifier } => identifier.span(),
            Expression::Assignment {
                identifier,
                expression,
                ..
            } => Span::cover(identifier.span(), expression.span()),
            Expression::Aggregate { keyword, close, .. } => {
                Span::cover(keyword.span(), close.span())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Expression::Literal { .. } => "LiteralExpression",
            Expression::FloatLiteral { .. } => "FloatExpression",
            Expression::Bracketed { .. } => "BracketedExpression",
            Expression::Unary { .. } => "UnaryExpression",
            Expression::Binary { .. } => "BinaryExpression",
            Expression::Name { .. } => "NameExpression",
            Expression::Assignment { .. } => "AssignmentExpression",
            Expression::Aggregate { .. } => "AggregateExpression",
        }
    }
}

/// One entry of a flattened tree walk: either a node or a token.
#[derive(Debug, Clone, Copy)]
enum TreeItem<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
    Token(&'a Token),
}

impl<'a> TreeItem<'a> {
    fn children(self) -> Vec<TreeItem<'a>> {
        use TreeItem as T;
        match self {
            T::Token(_) => Vec::new(),
            T::Statement(statement) => match statement {
                Statement::Block {
                    open_brace,
                    statements,
                    close_brace,
                } => {
                    let mut items = vec![T::Token(open_brace)];
                    items.extend(statements.iter().map(T::Statement));
                    items.push(T::Token(close_brace));
                    items
                }
                Statement::Expression { expression } => vec![T::Expression(expression)],
                Statement::VariableDeclaration {
                    keyword,
                    identifier,
                    equals,
                    initializer,
                } => vec![
                    T::Token(keyword),
                    T::Token(identifier),
                    T::Token(equals),
                    T::Expression(initializer),
                ],
                Statement::If {
                    keyword,
                    condition,
                    then_statement,
                    else_clause,
                } => {
                    let mut items = vec![
                        T::Token(keyword),
                        T::Expression(condition),
                        T::Statement(then_statement),
                    ];
                    if let Some(clause) = else_clause {
                        items.push(T::Token(&clause.keyword));
                        items.push(T::Statement(&clause.statement));
                    }
                    items
                }
                Statement::While {
                    keyword,
                    condition,
                    body,
                } => vec![
                    T::Token(keyword),
                    T::Expression(condition),
                    T::Statement(body),
                ],
                Statement::For {
                    keyword,
                    identifier,
                    equals,
                    lower_bound,
                    to_keyword,
                    upper_bound,
                    body,
                } => vec![
                    T::Token(keyword),
                    T::Token(identifier),
                    T::Token(equals),
                    T::Expression(lower_bound),
                    T::Token(to_keyword),
                    T::Expression(upper_bound),
                    T::Statement(body),
                ],
            },
            T::Expression(expression) => match expression {
                Expression::Literal { literal, .. } | Expression::FloatLiteral { literal } => {
                    vec![T::Token(literal)]
                }
                Expression::Bracketed {
                    open,
                    expression,
                    close,
                } => vec![T::Token(open), T::Expression(expression), T::Token(close)],
                Expression::Unary { operator, operand } => {
                    vec![T::Token(operator), T::Expression(operand)]
                }
                Expression::Binary {
                    left,
                    operator,
                    right,
                } => vec![
                    T::Expression(left),
                    T::Token(operator),
                    T::Expression(right),
                ],
                Expression::Name { identifier } => vec![T::Token(identifier)],
                Expression::Assignment {
                    identifier,
                    equals,
                    expression,
                } => vec![
                    T::Token(identifier),
                    T::Token(equals),
                    T::Expression(expression),
                ],
                Expression::Aggregate {
                    keyword,
                    open,
                    arguments,
                    close,
                    ..
                } => {
                    let mut items = vec![T::Token(keyword), T::Token(open)];
                    items.extend(arguments.iter().map(T::Token));
                    items.push(T::Token(close));
                    items
                }
            },
        }
    }

    fn label(self) -> String {
        match self {
            TreeItem::Statement(statement) => statement.name().to_string(),
            TreeItem::Expression(expression) => expression.name().to_string(),
            TreeItem::Token(token) => match &token.value {
                Some(value) => format!("{:?} {}", token.token_type, value),
                None if token.is_missing() => format!("{:?} <missing>", token.token_type),
                None => format!("{:?}", token.token_type),
            },
        }
    }
}

fn write_item(
    f: &mut fmt::Formatter,
    item: TreeItem,
    indent: &str,
    is_last: bool,
) -> fmt::Result {
    let marker = if is_last { "└──" } else { "├──" };
    writeln!(f, "{}{}{}", indent, marker, item.label())?;

    let child_indent = format!("{}{}", indent, if is_last { "   " } else { "│  " });
    let children = item.children();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        write_item(f, child, &child_indent, i + 1 == count)?;
    }
    Ok(())
}

/// Renders the tree for the REPL's `#showTree` mode.
impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "CompilationUnit")?;
        write_item(f, TreeItem::Statement(&self.statement), "", false)?;
        write_item(f, TreeItem::Token(&self.end_of_file), "", true)
    }
}
