use coda::compilation::{Compilation, SyntaxTree};
use coda::repl::Repl;
use coda::symbols::VariableStore;
use coda::value::Value;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;

fn submit(previous: Option<&Arc<Compilation>>, text: &str) -> Arc<Compilation> {
    let tree = SyntaxTree::parse(text);
    Arc::new(match previous {
        Some(previous) => previous.continue_with(tree),
        None => Compilation::new(tree),
    })
}

#[test]
fn later_submissions_read_earlier_variables() {
    let mut variables = VariableStore::new();

    let first = submit(None, "var x = 10");
    assert_eq!(first.evaluate(&mut variables).value, Some(Value::Int(10)));

    let second = submit(Some(&first), "x * 2");
    let result = second.evaluate(&mut variables);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.value, Some(Value::Float(20.0)));

    let third = submit(Some(&second), "x = 3");
    assert_eq!(third.evaluate(&mut variables).value, Some(Value::Int(3)));

    let fourth = submit(Some(&third), "x");
    assert_eq!(fourth.evaluate(&mut variables).value, Some(Value::Int(3)));
}

#[test]
fn redeclaring_shadows_for_later_submissions_only() {
    let mut variables = VariableStore::new();

    let first = submit(None, "var x = 10");
    first.evaluate(&mut variables);
    let second = submit(Some(&first), "var x = true");
    assert_eq!(second.evaluate(&mut variables).value, Some(Value::Bool(true)));

    let after_second = submit(Some(&second), "x");
    assert_eq!(after_second.evaluate(&mut variables).value, Some(Value::Bool(true)));

    // A branch from the first submission still sees the int
    let branch = submit(Some(&first), "x");
    assert_eq!(branch.evaluate(&mut variables).value, Some(Value::Int(10)));
    assert_eq!(variables.len(), 2);
}

#[test]
fn chain_links_back_to_the_first_submission() {
    let first = submit(None, "1");
    let second = submit(Some(&first), "2");
    let third = submit(Some(&second), "3");

    let mut texts = Vec::new();
    let mut current = Some(&third);
    while let Some(compilation) = current {
        texts.push(compilation.syntax_tree().text.to_string());
        current = compilation.previous();
    }
    assert_eq!(texts, vec!["3", "2", "1"]);
}

#[test]
fn syntax_diagnostics_come_before_binding_diagnostics() {
    let compilation = submit(None, "{ y + 1");
    let result = compilation.evaluate(&mut VariableStore::new());
    let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "unexpected token end of file, expected '}'",
            "variable 'y' does not exist",
        ]
    );
}

#[test]
fn global_scope_is_bound_once() {
    let compilation = submit(None, "var x = 1 + 2");
    let first = compilation.global_scope();
    let second = compilation.global_scope();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.variables.len(), 1);
}

#[test]
fn concurrent_callers_observe_one_global_scope() {
    let first = submit(None, "var a = 1");
    let compilation = submit(Some(&first), "var b = a + 1");

    let shared = &compilation;
    let scopes: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || shared.global_scope()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    for scope in &scopes[1..] {
        assert!(Arc::ptr_eq(&scopes[0], scope));
    }
    let previous = scopes[0].previous.as_ref().unwrap();
    assert!(Arc::ptr_eq(previous, &first.global_scope()));
}

fn strip_ansi(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1B' {
            // Skip to the final byte of the escape sequence
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn run_repl(input: &str) -> Vec<String> {
    let mut output = Vec::new();
    Repl::new()
        .run(Cursor::new(input), &mut output)
        .unwrap();
    let output = strip_ansi(&String::from_utf8(output).unwrap());

    output
        .split(|c| c == '\n' || c == '»' || c == '·')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn repl_prints_values_and_keeps_variables() {
    let lines = run_repl("var x = 10\nx * 2\nx = 4\nx\n");
    assert_eq!(lines, vec!["10", "20.0", "4", "4"]);
}

#[test]
fn repl_continues_incomplete_submissions() {
    let lines = run_repl("{\nvar x = 1\n}\n");
    assert_eq!(lines, vec!["1"]);
}

#[test]
fn repl_blank_line_submits_pending_text() {
    // The unfinished bracket is reported on stderr and nothing is printed
    let lines = run_repl("(1 +\n\n2\n");
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn repl_meta_commands() {
    let lines = run_repl("var x = 1\n#reset\n#SHOWTREE\n#bogus\n#exit\nx\n");
    assert_eq!(
        lines,
        vec![
            "1",
            "Session reset",
            "Parse tree display on",
            "Unknown command: #bogus",
        ]
    );
}

#[test]
fn repl_failed_submission_is_not_chained() {
    let lines = run_repl("var x = true + 1\nvar x = 2\nx\n");
    assert_eq!(lines, vec!["2", "2"]);
}
