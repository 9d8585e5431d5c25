use crate::ast::{AggregateFunction, CompilationUnit, ElseClause, Expression, Statement};
use crate::diagnostic::DiagnosticBag;
use crate::lexer::{Token, TokenType};
use crate::value::Value;

/// Recursive-descent parser over a pre-lexed token array.
///
/// The parser never fails: a missing required token is reported and replaced
/// by a placeholder of the expected kind, so the tree keeps its shape and
/// later stages run on it unchanged.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: DiagnosticBag,
}

impl Parser {
    /// Whitespace and bad tokens are dropped here. The token array always
    /// ends with `Eof`.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !matches!(t.token_type, TokenType::Whitespace | TokenType::Bad))
            .collect();

        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let position = tokens.last().map(|t| t.span().end).unwrap_or(0);
            tokens.push(Token::new(TokenType::Eof, String::new(), position, None));
        }

        Self {
            tokens,
            current: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn parse_compilation_unit(mut self) -> (CompilationUnit, DiagnosticBag) {
        let statement = self.statement();
        let end_of_file = self.consume(TokenType::Eof);
        (
            CompilationUnit {
                statement,
                end_of_file,
            },
            self.diagnostics,
        )
    }

    fn statement(&mut self) -> Statement {
        match self.peek().token_type {
            TokenType::LeftBrace => self.block_statement(),
            TokenType::Let | TokenType::Var => self.variable_declaration(),
            TokenType::If => self.if_statement(),
            TokenType::While => self.while_statement(),
            TokenType::For => self.for_statement(),
            _ => Statement::Expression {
                expression: self.expression(),
            },
        }
    }

    fn block_statement(&mut self) -> Statement {
        let open_brace = self.consume(TokenType::LeftBrace);
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            let start = self.current;
            statements.push(self.statement());

            // A statement made only of placeholders consumed nothing; skip
            // the offending token so the loop always makes progress.
            if self.current == start {
                self.advance();
            }
        }

        let close_brace = self.consume(TokenType::RightBrace);
        Statement::Block {
            open_brace,
            statements,
            close_brace,
        }
    }

    fn variable_declaration(&mut self) -> Statement {
        let expected = if self.check(TokenType::Let) {
            TokenType::Let
        } else {
            TokenType::Var
        };
        let keyword = self.consume(expected);
        let identifier = self.consume(TokenType::Identifier);
        let equals = self.consume(TokenType::Equal);
        let initializer = self.expression();

        Statement::VariableDeclaration {
            keyword,
            identifier,
            equals,
            initializer,
        }
    }

    fn if_statement(&mut self) -> Statement {
        let keyword = self.consume(TokenType::If);
        let condition = self.expression();
        let then_statement = Box::new(self.block_statement());

        let else_clause = if self.check(TokenType::Else) {
            let keyword = self.advance();
            let statement = Box::new(self.block_statement());
            Some(ElseClause { keyword, statement })
        } else {
            None
        };

        Statement::If {
            keyword,
            condition,
            then_statement,
            else_clause,
        }
    }

    fn while_statement(&mut self) -> Statement {
        let keyword = self.consume(TokenType::While);
        let condition = self.expression();
        let body = Box::new(self.statement());
        Statement::While {
            keyword,
            condition,
            body,
        }
    }

    fn for_statement(&mut self) -> Statement {
        let keyword = self.consume(TokenType::For);
        let identifier = self.consume(TokenType::Identifier);
        let equals = self.consume(TokenType::Equal);
        let lower_bound = self.expression();
        let to_keyword = self.consume(TokenType::To);
        let upper_bound = self.expression();
        let body = Box::new(self.statement());

        Statement::For {
            keyword,
            identifier,
            equals,
            lower_bound,
            to_keyword,
            upper_bound,
            body,
        }
    }

    fn expression(&mut self) -> Expression {
        self.assignment()
    }

    fn assignment(&mut self) -> Expression {
        if self.peek_at(0).token_type == TokenType::Identifier
            && self.peek_at(1).token_type == TokenType::Equal
        {
            let identifier = self.advance();
            let equals = self.advance();
            // Right-associative: a = b = 1
            let expression = Box::new(self.assignment());
            return Expression::Assignment {
                identifier,
                equals,
                expression,
            };
        }

        self.binary(0)
    }

    fn binary(&mut self, parent_precedence: u8) -> Expression {
        let unary_precedence = self.peek().token_type.unary_precedence();

        let mut left = if unary_precedence != 0 && unary_precedence >= parent_precedence {
            let operator = self.advance();
            let operand = Box::new(self.binary(unary_precedence));
            Expression::Unary { operator, operand }
        } else {
            self.primary()
        };

        loop {
            let precedence = self.peek().token_type.binary_precedence();
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }

            let operator = self.advance();
            let right = Box::new(self.binary(precedence));
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right,
            };
        }

        left
    }

    fn primary(&mut self) -> Expression {
        match self.peek().token_type {
            TokenType::LeftParen => {
                let open = self.advance();
                let expression = Box::new(self.expression());
                let close = self.consume(TokenType::RightParen);
                Expression::Bracketed {
                    open,
                    expression,
                    close,
                }
            }
            TokenType::True | TokenType::False => {
                let literal = self.advance();
                let value = Some(Value::Bool(literal.token_type == TokenType::True));
                Expression::Literal { literal, value }
            }
            TokenType::Avg => self.aggregate(AggregateFunction::Avg),
            TokenType::Min => self.aggregate(AggregateFunction::Min),
            TokenType::Max => self.aggregate(AggregateFunction::Max),
            TokenType::Identifier => Expression::Name {
                identifier: self.advance(),
            },
            TokenType::Float => Expression::FloatLiteral {
                literal: self.advance(),
            },
            _ => {
                let literal = self.consume(TokenType::Integer);
                let value = literal.value;
                Expression::Literal { literal, value }
            }
        }
    }

    fn aggregate(&mut self, function: AggregateFunction) -> Expression {
        let keyword = self.advance();
        let open = self.consume(TokenType::LeftParen);

        let mut arguments = Vec::new();
        while self.is_aggregate_argument() {
            let token = self.advance();
            if token.token_type != TokenType::Comma {
                arguments.push(token);
            }
        }

        // Commas alone do not make an argument
        if arguments.is_empty() {
            self.consume(TokenType::Integer);
        }

        let close = self.consume(TokenType::RightParen);
        Expression::Aggregate {
            function,
            keyword,
            open,
            arguments,
            close,
        }
    }

    fn is_aggregate_argument(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::Integer | TokenType::Float | TokenType::Comma
        )
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.current += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Out-of-range lookahead clamps to the trailing `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    /// Takes a token of the given kind, or reports the mismatch and returns a
    /// zero-width placeholder at the current position without advancing.
    fn consume(&mut self, token_type: TokenType) -> Token {
        if self.check(token_type) {
            return self.advance();
        }

        let actual = self.peek();
        let span = actual.span();
        let (actual_type, position) = (actual.token_type, actual.position);
        self.diagnostics
            .report_unexpected_token(span, actual_type, token_type);
        Token::missing(token_type, position)
    }
}
