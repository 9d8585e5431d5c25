//! Static facts about tokens: fixed spellings, operator precedence and the
//! operator sets the parser recognises.

use crate::lexer::TokenType;
use std::fmt;

/// Every token kind, in declaration order.
pub const ALL_TOKEN_TYPES: &[TokenType] = &[
    TokenType::LeftParen,
    TokenType::RightParen,
    TokenType::LeftBrace,
    TokenType::RightBrace,
    TokenType::Comma,
    TokenType::Minus,
    TokenType::Plus,
    TokenType::Slash,
    TokenType::Star,
    TokenType::Percent,
    TokenType::Caret,
    TokenType::Bang,
    TokenType::BangEqual,
    TokenType::Equal,
    TokenType::EqualEqual,
    TokenType::Greater,
    TokenType::GreaterEqual,
    TokenType::Less,
    TokenType::LessEqual,
    TokenType::And,
    TokenType::Or,
    TokenType::Identifier,
    TokenType::Integer,
    TokenType::Float,
    TokenType::True,
    TokenType::False,
    TokenType::Let,
    TokenType::Var,
    TokenType::If,
    TokenType::Else,
    TokenType::While,
    TokenType::For,
    TokenType::To,
    TokenType::Avg,
    TokenType::Min,
    TokenType::Max,
    TokenType::Whitespace,
    TokenType::Bad,
    TokenType::Eof,
];

impl TokenType {
    /// Canonical spelling for kinds with fixed text.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::LeftBrace => "{",
            TokenType::RightBrace => "}",
            TokenType::Comma => ",",
            TokenType::Minus => "-",
            TokenType::Plus => "+",
            TokenType::Slash => "/",
            TokenType::Star => "*",
            TokenType::Percent => "%",
            TokenType::Caret => "^",
            TokenType::Bang => "!",
            TokenType::BangEqual => "!=",
            TokenType::Equal => "=",
            TokenType::EqualEqual => "==",
            TokenType::Greater => ">",
            TokenType::GreaterEqual => ">=",
            TokenType::Less => "<",
            TokenType::LessEqual => "<=",
            TokenType::And => "&&",
            TokenType::Or => "||",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::Let => "let",
            TokenType::Var => "var",
            TokenType::If => "if",
            TokenType::Else => "else",
            TokenType::While => "while",
            TokenType::For => "for",
            TokenType::To => "to",
            TokenType::Avg => "avg",
            TokenType::Min => "min",
            TokenType::Max => "max",
            TokenType::Identifier
            | TokenType::Integer
            | TokenType::Float
            | TokenType::Whitespace
            | TokenType::Bad
            | TokenType::Eof => return None,
        };
        Some(text)
    }

    /// Binding power of a prefix operator, or 0 if the kind is not one.
    pub fn unary_precedence(self) -> u8 {
        match self {
            TokenType::Plus | TokenType::Minus | TokenType::Bang => 7,
            _ => 0,
        }
    }

    /// Binding power of an infix operator, or 0 if the kind is not one.
    pub fn binary_precedence(self) -> u8 {
        match self {
            TokenType::Caret => 6,
            TokenType::Star | TokenType::Slash | TokenType::Percent => 5,
            TokenType::Plus | TokenType::Minus => 4,
            TokenType::EqualEqual
            | TokenType::BangEqual
            | TokenType::Less
            | TokenType::LessEqual
            | TokenType::Greater
            | TokenType::GreaterEqual => 3,
            TokenType::And => 2,
            TokenType::Or => 1,
            _ => 0,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::True
                | TokenType::False
                | TokenType::Let
                | TokenType::Var
                | TokenType::If
                | TokenType::Else
                | TokenType::While
                | TokenType::For
                | TokenType::To
                | TokenType::Avg
                | TokenType::Min
                | TokenType::Max
        )
    }
}

pub fn unary_operator_types() -> impl Iterator<Item = TokenType> {
    ALL_TOKEN_TYPES
        .iter()
        .copied()
        .filter(|t| t.unary_precedence() > 0)
}

pub fn binary_operator_types() -> impl Iterator<Item = TokenType> {
    ALL_TOKEN_TYPES
        .iter()
        .copied()
        .filter(|t| t.binary_precedence() > 0)
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenType::Identifier => "identifier",
            TokenType::Integer => "integer",
            TokenType::Float => "float",
            TokenType::Whitespace => "whitespace",
            TokenType::Bad => "bad token",
            TokenType::Eof => "end of file",
            other => return write!(f, "'{}'", other.text().unwrap_or_default()),
        };
        write!(f, "{}", name)
    }
}
