use coda::compilation::SyntaxTree;
use coda::diagnostic::DiagnosticKind;
use coda::lexer::{Lexer, TokenType};
use coda::syntax_facts::ALL_TOKEN_TYPES;
use coda::text::{SourceText, Span};
use coda::value::{Value, ValueType};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn fixed_tokens() -> Vec<(TokenType, String)> {
    ALL_TOKEN_TYPES
        .iter()
        .filter_map(|&t| t.text().map(|text| (t, text.to_string())))
        .collect()
}

fn dynamic_tokens() -> Vec<(TokenType, String)> {
    [
        (TokenType::Identifier, "a"),
        (TokenType::Identifier, "abc"),
        (TokenType::Integer, "1"),
        (TokenType::Integer, "123"),
        (TokenType::Float, "1.5"),
        (TokenType::And, "and"),
        (TokenType::Or, "or"),
        (TokenType::Percent, "mod"),
        (TokenType::EqualEqual, "is"),
        (TokenType::BangEqual, "isnot"),
    ]
    .iter()
    .map(|(t, text)| (*t, text.to_string()))
    .collect()
}

fn tokens() -> Vec<(TokenType, String)> {
    let mut tokens = fixed_tokens();
    tokens.extend(dynamic_tokens());
    tokens
}

fn separators() -> Vec<(TokenType, String)> {
    [" ", "  ", "\r", "\n", "\r\n"]
        .iter()
        .map(|text| (TokenType::Whitespace, text.to_string()))
        .collect()
}

fn requires_separator(first: &(TokenType, String), second: &(TokenType, String)) -> bool {
    let (t1, text1) = first;
    let (t2, text2) = second;

    let ends_with_letter = text1.chars().last().map_or(false, char::is_alphabetic);
    let starts_with_letter = text2.chars().next().map_or(false, char::is_alphabetic);
    if ends_with_letter && starts_with_letter {
        return true;
    }

    let is_number = |t: &TokenType| matches!(t, TokenType::Integer | TokenType::Float);
    if is_number(t1) && is_number(t2) {
        return true;
    }

    let takes_equals = matches!(
        t1,
        TokenType::Bang | TokenType::Equal | TokenType::Less | TokenType::Greater
    );
    takes_equals && matches!(t2, TokenType::Equal | TokenType::EqualEqual)
}

fn lex(text: &str) -> Vec<(TokenType, String)> {
    SyntaxTree::parse_tokens(text)
        .into_iter()
        .map(|t| (t.token_type, t.text().to_string()))
        .collect()
}

#[test]
fn every_fixed_text_kind_is_covered() {
    let tested: HashSet<TokenType> = tokens()
        .into_iter()
        .chain(separators())
        .map(|(t, _)| t)
        .collect();

    let untested: Vec<_> = ALL_TOKEN_TYPES
        .iter()
        .filter(|t| !matches!(t, TokenType::Bad | TokenType::Eof))
        .filter(|t| !tested.contains(t))
        .collect();

    assert!(untested.is_empty(), "untested token kinds: {:?}", untested);
}

#[test]
fn lexes_single_tokens() {
    for token in tokens().into_iter().chain(separators()) {
        assert_eq!(lex(&token.1), vec![token.clone()], "lexing {:?}", token.1);
    }
}

#[test]
fn lexes_token_pairs() {
    for first in tokens() {
        for second in tokens() {
            if requires_separator(&first, &second) {
                continue;
            }
            let text = format!("{}{}", first.1, second.1);
            assert_eq!(lex(&text), vec![first.clone(), second.clone()], "lexing {:?}", text);
        }
    }
}

#[test]
fn lexes_token_pairs_with_separators() {
    for first in tokens() {
        for second in tokens() {
            for separator in separators() {
                let text = format!("{}{}{}", first.1, separator.1, second.1);
                assert_eq!(
                    lex(&text),
                    vec![first.clone(), separator.clone(), second.clone()],
                    "lexing {:?}",
                    text
                );
            }
        }
    }
}

#[test]
fn keywords_are_case_insensitive_and_keep_their_text() {
    let tokens = SyntaxTree::parse_tokens("TRUE And IsNot");
    let kinds: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
    assert_eq!(
        kinds,
        vec![
            TokenType::True,
            TokenType::Whitespace,
            TokenType::And,
            TokenType::Whitespace,
            TokenType::BangEqual,
        ]
    );
    assert_eq!(tokens[2].text(), "And");
    assert_eq!(tokens[2].span(), Span::new(5, 8));
}

#[test]
fn numbers_carry_values() {
    let tokens = SyntaxTree::parse_tokens("42 2.5");
    assert_eq!(tokens[0].value, Some(Value::Int(42)));
    assert_eq!(tokens[2].value, Some(Value::Float(2.5)));
}

#[test]
fn invalid_numbers_are_still_emitted() {
    let source = SourceText::from("1.2.3 4294967296");
    let (tokens, diagnostics) = Lexer::new(&source).scan_tokens();

    assert_eq!(tokens[0].token_type, TokenType::Float);
    assert_eq!(tokens[0].text(), "1.2.3");
    assert_eq!(tokens[0].value, Some(Value::Float(0.0)));
    assert_eq!(tokens[2].token_type, TokenType::Integer);
    assert_eq!(tokens[2].value, Some(Value::Int(0)));

    let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::InvalidNumber {
                text: "1.2.3".to_string(),
                expected: ValueType::Float,
            },
            DiagnosticKind::InvalidNumber {
                text: "4294967296".to_string(),
                expected: ValueType::Int,
            },
        ]
    );
    assert_eq!(diagnostics.iter().next().map(|d| d.span), Some(Span::new(0, 5)));
}

#[test]
fn lone_ampersand_and_pipe_are_invalid() {
    let source = SourceText::from("1 & 2 | $");
    let (tokens, diagnostics) = Lexer::new(&source).scan_tokens();

    let bad: Vec<_> = tokens
        .iter()
        .filter(|t| t.token_type == TokenType::Bad)
        .map(|t| t.position)
        .collect();
    assert_eq!(bad, vec![2, 6, 8]);

    let reported: Vec<_> = diagnostics.iter().map(|d| (d.span, d.kind.clone())).collect();
    assert_eq!(
        reported,
        vec![
            (Span::new(2, 3), DiagnosticKind::InvalidCharacter('&')),
            (Span::new(6, 7), DiagnosticKind::InvalidCharacter('|')),
            (Span::new(8, 9), DiagnosticKind::InvalidCharacter('$')),
        ]
    );
}

#[test]
fn end_of_file_is_reproducible() {
    let source = SourceText::from("x");
    let mut lexer = Lexer::new(&source);

    assert_eq!(lexer.next_token().token_type, TokenType::Identifier);
    for _ in 0..3 {
        let token = lexer.next_token();
        assert_eq!(token.token_type, TokenType::Eof);
        assert_eq!(token.position, 1);
        assert_eq!(token.span(), Span::new(1, 1));
    }
}

#[test]
fn non_ascii_letters_form_identifiers() {
    assert_eq!(
        lex("größe"),
        vec![(TokenType::Identifier, "größe".to_string())]
    );
}
