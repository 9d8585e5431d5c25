use crate::ast::AggregateFunction;
use crate::lexer::TokenType;
use crate::text::{SourceText, Span};
use crate::value::ValueType;
use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io;
use thiserror::Error;

/// Which pipeline stage reported a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

impl Phase {
    fn title(self) -> &'static str {
        match self {
            Phase::Lexical => "Lexical Error",
            Phase::Syntax => "Syntax Error",
            Phase::Semantic => "Semantic Error",
        }
    }

    fn color(self) -> Color {
        match self {
            Phase::Lexical => Color::Red,
            Phase::Syntax => Color::Yellow,
            Phase::Semantic => Color::Magenta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticKind {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("the number {text} is not a valid {expected}")]
    InvalidNumber { text: String, expected: ValueType },

    #[error("unexpected token {actual}, expected {expected}")]
    UnexpectedToken {
        actual: TokenType,
        expected: TokenType,
    },

    #[error("variable '{0}' does not exist")]
    UndefinedVariable(String),

    #[error("unary operator '{operator}' is not defined for type {operand}")]
    UndefinedUnaryOperator { operator: String, operand: ValueType },

    #[error("binary operator '{operator}' is not defined for types {left} and {right}")]
    UndefinedBinaryOperator {
        operator: String,
        left: ValueType,
        right: ValueType,
    },

    #[error("variable '{0}' is already declared")]
    VariableAlreadyDeclared(String),

    #[error("variable '{0}' is read-only and cannot be assigned to")]
    CannotAssign(String),

    #[error("cannot convert type {from} to type {to}")]
    CannotConvert { from: ValueType, to: ValueType },

    #[error("{0}() has no static type and cannot be used as an operand")]
    UntypedExpression(AggregateFunction),
}

impl DiagnosticKind {
    pub fn phase(&self) -> Phase {
        match self {
            DiagnosticKind::InvalidCharacter(_) | DiagnosticKind::InvalidNumber { .. } => {
                Phase::Lexical
            }
            DiagnosticKind::UnexpectedToken { .. } => Phase::Syntax,
            _ => Phase::Semantic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(span: Span, kind: DiagnosticKind) -> Self {
        Self { span, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Prints the diagnostic with a source excerpt to stderr.
    pub fn report(&self, source: &SourceText, filename: Option<&str>) -> io::Result<()> {
        let filename = filename.unwrap_or("<repl>");
        let text = source.to_string();
        self.build_report(source, filename, true)
            .eprint((filename, Source::from(text)))
    }

    /// Renders the diagnostic without colors, for tests and logs.
    pub fn render(&self, source: &SourceText, filename: Option<&str>) -> String {
        let filename = filename.unwrap_or("<repl>");
        let text = source.to_string();
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self
            .build_report(source, filename, false)
            .write((filename, Source::from(text)), &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    fn build_report<'a>(
        &self,
        source: &SourceText,
        filename: &'a str,
        color: bool,
    ) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
        let phase = self.kind.phase();
        let (line, column) = source.line_column(self.span.start);
        let message = self.message();

        // Zero-width spans (missing tokens) still get a visible caret
        let start = self.span.start.min(source.len());
        let end = self.span.end.max(start + 1).min(source.len()).max(start);

        let title = if color {
            format!("{}", phase.title().fg(phase.color()))
        } else {
            phase.title().to_string()
        };

        Report::build(ReportKind::Error, filename, start)
            .with_config(Config::default().with_color(color))
            .with_message(format!("{} at ({}, {}): {}", title, line, column, message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(message)
                    .with_color(phase.color()),
            )
            .finish()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Diagnostic {}

/// Ordered collection of diagnostics gathered by one pipeline stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Puts `earlier` ahead of everything already in the bag.
    pub fn prepend(&mut self, earlier: &DiagnosticBag) {
        let mut combined = earlier.diagnostics.clone();
        combined.append(&mut self.diagnostics);
        self.diagnostics = combined;
    }

    fn report(&mut self, span: Span, kind: DiagnosticKind) {
        tracing::trace!(%span, %kind, "diagnostic");
        self.diagnostics.push(Diagnostic::new(span, kind));
    }

    pub fn report_invalid_character(&mut self, position: usize, character: char) {
        self.report(
            Span::single(position),
            DiagnosticKind::InvalidCharacter(character),
        );
    }

    pub fn report_invalid_number(&mut self, span: Span, text: String, expected: ValueType) {
        self.report(span, DiagnosticKind::InvalidNumber { text, expected });
    }

    pub fn report_unexpected_token(&mut self, span: Span, actual: TokenType, expected: TokenType) {
        self.report(span, DiagnosticKind::UnexpectedToken { actual, expected });
    }

    pub fn report_undefined_variable(&mut self, span: Span, name: &str) {
        self.report(span, DiagnosticKind::UndefinedVariable(name.to_string()));
    }

    pub fn report_undefined_unary_operator(&mut self, span: Span, operator: &str, operand: ValueType) {
        self.report(
            span,
            DiagnosticKind::UndefinedUnaryOperator {
                operator: operator.to_string(),
                operand,
            },
        );
    }

    pub fn report_undefined_binary_operator(
        &mut self,
        span: Span,
        operator: &str,
        left: ValueType,
        right: ValueType,
    ) {
        self.report(
            span,
            DiagnosticKind::UndefinedBinaryOperator {
                operator: operator.to_string(),
                left,
                right,
            },
        );
    }

    pub fn report_variable_already_declared(&mut self, span: Span, name: &str) {
        self.report(span, DiagnosticKind::VariableAlreadyDeclared(name.to_string()));
    }

    pub fn report_cannot_assign(&mut self, span: Span, name: &str) {
        self.report(span, DiagnosticKind::CannotAssign(name.to_string()));
    }

    pub fn report_cannot_convert(&mut self, span: Span, from: ValueType, to: ValueType) {
        self.report(span, DiagnosticKind::CannotConvert { from, to });
    }

    pub fn report_untyped_expression(&mut self, span: Span, function: AggregateFunction) {
        self.report(span, DiagnosticKind::UntypedExpression(function));
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_keeps_earlier_diagnostics_first() {
        let mut earlier = DiagnosticBag::new();
        earlier.report_invalid_character(0, '$');
        let mut bag = DiagnosticBag::new();
        bag.report_undefined_variable(Span::new(2, 3), "x");
        bag.prepend(&earlier);

        let kinds: Vec<_> = bag.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::InvalidCharacter('$'),
                DiagnosticKind::UndefinedVariable("x".to_string()),
            ]
        );
    }

    #[test]
    fn render_includes_position_and_message() {
        let source = SourceText::from("1 +\nfoo");
        let diagnostic = Diagnostic::new(
            Span::new(4, 7),
            DiagnosticKind::UndefinedVariable("foo".to_string()),
        );
        let rendered = diagnostic.render(&source, Some("test.coda"));
        assert!(rendered.contains("Semantic Error at (2, 1)"));
        assert!(rendered.contains("variable 'foo' does not exist"));
    }

    #[test]
    fn phases() {
        assert_eq!(DiagnosticKind::InvalidCharacter('@').phase(), Phase::Lexical);
        assert_eq!(
            DiagnosticKind::UnexpectedToken {
                actual: TokenType::Eof,
                expected: TokenType::RightBrace
            }
            .phase(),
            Phase::Syntax
        );
    }
}
