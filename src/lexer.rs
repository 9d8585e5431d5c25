use crate::diagnostic::DiagnosticBag;
use crate::text::{SourceText, Span};
use crate::value::{Value, ValueType};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Minus,
    Plus,
    Slash,
    Star,
    Percent,
    Caret,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,

    // Literals
    Identifier,
    Integer,
    Float,

    // Keywords
    True,
    False,
    Let,
    Var,
    If,
    Else,
    While,
    For,
    To,
    Avg,
    Min,
    Max,

    // Special
    Whitespace,
    Bad,
    Eof,
}

/// Source text of a token. `Missing` marks a token the parser synthesized
/// while recovering from an error; it has no text and zero width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: Lexeme,
    pub position: usize,
    pub value: Option<Value>,
}

impl Token {
    pub fn new(token_type: TokenType, text: String, position: usize, value: Option<Value>) -> Self {
        Self {
            token_type,
            lexeme: Lexeme::Text(text),
            position,
            value,
        }
    }

    pub fn missing(token_type: TokenType, position: usize) -> Self {
        Self {
            token_type,
            lexeme: Lexeme::Missing,
            position,
            value: None,
        }
    }

    pub fn text(&self) -> &str {
        match &self.lexeme {
            Lexeme::Text(text) => text,
            Lexeme::Missing => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        self.lexeme == Lexeme::Missing
    }

    pub fn span(&self) -> Span {
        Span::with_length(self.position, self.text().chars().count())
    }
}

/// Turns source text into tokens one call at a time.
///
/// Whitespace and unrecognised characters still produce tokens (`Whitespace`
/// and `Bad`) so callers see every character accounted for; the parser drops
/// them. Once the input is exhausted every call returns an `Eof` token
/// without advancing.
pub struct Lexer<'a> {
    source: &'a SourceText,
    start: usize,
    current: usize,
    keywords: HashMap<&'static str, TokenType>,
    diagnostics: DiagnosticBag,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("true", TokenType::True);
        keywords.insert("false", TokenType::False);
        keywords.insert("let", TokenType::Let);
        keywords.insert("var", TokenType::Var);
        keywords.insert("if", TokenType::If);
        keywords.insert("else", TokenType::Else);
        keywords.insert("while", TokenType::While);
        keywords.insert("for", TokenType::For);
        keywords.insert("to", TokenType::To);
        keywords.insert("avg", TokenType::Avg);
        keywords.insert("min", TokenType::Min);
        keywords.insert("max", TokenType::Max);
        // Word spellings of operators
        keywords.insert("and", TokenType::And);
        keywords.insert("or", TokenType::Or);
        keywords.insert("mod", TokenType::Percent);
        keywords.insert("is", TokenType::EqualEqual);
        keywords.insert("isnot", TokenType::BangEqual);

        Self {
            source,
            start: 0,
            current: 0,
            keywords,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Lexes the whole input, returning every token up to and including `Eof`.
    pub fn scan_tokens(mut self) -> (Vec<Token>, DiagnosticBag) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.token_type == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tracing::trace!(count = tokens.len(), "lexed tokens");
        (tokens, self.diagnostics)
    }

    pub fn next_token(&mut self) -> Token {
        self.start = self.current;

        if self.is_at_end() {
            return Token::new(TokenType::Eof, String::new(), self.current, None);
        }

        let c = self.advance();
        let mut value = None;

        let token_type = match c {
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            ',' => TokenType::Comma,
            '-' => TokenType::Minus,
            '+' => TokenType::Plus,
            '/' => TokenType::Slash,
            '*' => TokenType::Star,
            '%' => TokenType::Percent,
            '^' => TokenType::Caret,
            '!' => {
                if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                }
            }
            '=' => {
                if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                }
            }
            // No single '&' or '|' operator exists
            '&' => {
                if self.match_char('&') {
                    TokenType::And
                } else {
                    self.diagnostics.report_invalid_character(self.start, c);
                    TokenType::Bad
                }
            }
            '|' => {
                if self.match_char('|') {
                    TokenType::Or
                } else {
                    self.diagnostics.report_invalid_character(self.start, c);
                    TokenType::Bad
                }
            }
            c if c.is_whitespace() => self.whitespace(),
            c if c.is_ascii_digit() => {
                let (token_type, number) = self.number();
                value = Some(number);
                token_type
            }
            c if c.is_alphabetic() => self.identifier(),
            _ => {
                self.diagnostics.report_invalid_character(self.start, c);
                TokenType::Bad
            }
        };

        let text = self.source.slice(Span::new(self.start, self.current));
        Token::new(token_type, text, self.start, value)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source.char_at(self.current);
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn peek(&self) -> char {
        self.source.char_at(self.current)
    }

    fn whitespace(&mut self) -> TokenType {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.current += 1;
        }
        TokenType::Whitespace
    }

    fn number(&mut self) -> (TokenType, Value) {
        // Every contiguous digit and '.' belongs to the literal; "1.2.3" is
        // one (invalid) float rather than two tokens.
        while self.peek().is_ascii_digit() || self.peek() == '.' {
            self.current += 1;
        }

        let span = Span::new(self.start, self.current);
        let text = self.source.slice(span);

        if text.contains('.') {
            match text.parse::<f64>() {
                Ok(number) => (TokenType::Float, Value::Float(number)),
                Err(_) => {
                    self.diagnostics
                        .report_invalid_number(span, text, ValueType::Float);
                    (TokenType::Float, Value::Float(0.0))
                }
            }
        } else {
            match text.parse::<i32>() {
                Ok(number) => (TokenType::Integer, Value::Int(number)),
                Err(_) => {
                    self.diagnostics
                        .report_invalid_number(span, text, ValueType::Int);
                    (TokenType::Integer, Value::Int(0))
                }
            }
        }
    }

    fn identifier(&mut self) -> TokenType {
        while self.peek().is_alphabetic() {
            self.current += 1;
        }

        let text = self
            .source
            .slice(Span::new(self.start, self.current))
            .to_lowercase();
        self.keywords
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier)
    }
}
