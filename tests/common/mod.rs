// Shared helpers for the integration tests.

#![allow(dead_code)]

use coda::text::Span;

/// Test input with `[` `]` markers around the spans diagnostics should cover.
/// The markers are stripped from `text`; spans index into the stripped text.
#[derive(Debug)]
pub struct AnnotatedText {
    pub text: String,
    pub spans: Vec<Span>,
}

impl AnnotatedText {
    pub fn parse(text: &str) -> Self {
        let text = unindent(text);

        let mut stripped = String::new();
        let mut spans = Vec::new();
        let mut starts = Vec::new();
        let mut position = 0;

        for c in text.chars() {
            match c {
                '[' => starts.push(position),
                ']' => {
                    let start = starts.pop().expect("too many ']' in annotated text");
                    spans.push(Span::new(start, position));
                }
                _ => {
                    position += 1;
                    stripped.push(c);
                }
            }
        }

        assert!(starts.is_empty(), "missing ']' in annotated text");
        Self {
            text: stripped,
            spans,
        }
    }
}

/// Strips the common indentation and any leading or trailing blank lines.
pub fn unindent(text: &str) -> String {
    unindent_lines(text).join("\n")
}

pub fn unindent_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    let indentation = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    for line in &mut lines {
        if line.trim().is_empty() {
            line.clear();
        } else {
            *line = line[indentation..].to_string();
        }
    }

    while lines.first().map_or(false, |l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }

    lines
}
