use crate::compilation::{Compilation, SyntaxTree};
use crate::symbols::VariableStore;
use std::io;

/// Runs `source` as a single submission, printing its value or its
/// diagnostics. Returns whether it ran without diagnostics.
pub fn run(source: &str, filename: Option<&str>) -> io::Result<bool> {
    let syntax_tree = SyntaxTree::parse(source);
    let compilation = Compilation::new(syntax_tree);
    let mut variables = VariableStore::new();

    let result = compilation.evaluate(&mut variables);
    if !result.diagnostics.is_empty() {
        let text = &compilation.syntax_tree().text;
        for diagnostic in &result.diagnostics {
            diagnostic.report(text, filename)?;
        }
        return Ok(false);
    }

    if let Some(value) = result.value {
        println!("{}", value);
    }
    Ok(true)
}
