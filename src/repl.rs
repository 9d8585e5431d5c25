use crate::compilation::{Compilation, SyntaxTree};
use crate::symbols::VariableStore;
use ariadne::{Color, Fmt};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const PROMPT: &str = "» ";
const CONTINUATION_PROMPT: &str = "· ";

/// Interactive session state. Each successful submission becomes the
/// `previous` compilation of the next, so its variables stay visible.
#[derive(Default)]
pub struct Repl {
    show_tree: bool,
    previous: Option<Arc<Compilation>>,
    variables: VariableStore,
}

enum MetaCommand {
    ShowTree,
    Clear,
    Reset,
    Exit,
    Unknown,
}

impl MetaCommand {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "#showtree" => MetaCommand::ShowTree,
            "#clear" => MetaCommand::Clear,
            "#reset" => MetaCommand::Reset,
            "#exit" => MetaCommand::Exit,
            _ => MetaCommand::Unknown,
        }
    }
}

pub fn start(show_tree: bool) -> io::Result<()> {
    println!("coda {}", env!("CARGO_PKG_VERSION"));
    println!("Type #exit or press Ctrl+D to quit; #showTree, #clear and #reset are also available");
    println!();

    let mut repl = Repl {
        show_tree,
        ..Repl::default()
    };
    let stdin = io::stdin();
    repl.run(stdin.lock(), io::stdout())
}

impl Repl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads submissions from `input` until end of input or `#exit`.
    ///
    /// A submission spans several lines while it still has parse errors; a
    /// blank line submits whatever has been typed so far.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut text = String::new();

        loop {
            let prompt = if text.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };
            write!(output, "{}", prompt.fg(Color::Green))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']);
            let is_blank = line.trim().is_empty();

            if text.is_empty() {
                if is_blank {
                    continue;
                }
                if line.trim_start().starts_with('#') {
                    match MetaCommand::parse(line) {
                        MetaCommand::ShowTree => {
                            self.show_tree = !self.show_tree;
                            let state = if self.show_tree { "on" } else { "off" };
                            writeln!(output, "Parse tree display {}", state)?;
                        }
                        MetaCommand::Clear => write!(output, "\x1B[2J\x1B[1;1H")?,
                        MetaCommand::Reset => {
                            self.reset();
                            writeln!(output, "Session reset")?;
                        }
                        MetaCommand::Exit => break,
                        MetaCommand::Unknown => {
                            writeln!(output, "Unknown command: {}", line.trim())?;
                        }
                    }
                    continue;
                }
            }

            text.push_str(line);
            text.push('\n');

            let syntax_tree = SyntaxTree::parse(&text);
            if !is_blank && !syntax_tree.diagnostics.is_empty() {
                continue;
            }

            self.submit(syntax_tree, &mut output)?;
            text.clear();
        }

        Ok(())
    }

    /// Drops every compilation and variable from the session.
    pub fn reset(&mut self) {
        self.previous = None;
        self.variables.clear();
    }

    fn submit<W: Write>(&mut self, syntax_tree: SyntaxTree, output: &mut W) -> io::Result<()> {
        let compilation = match &self.previous {
            Some(previous) => previous.continue_with(syntax_tree),
            None => Compilation::new(syntax_tree),
        };

        if self.show_tree {
            write!(output, "{}", compilation.syntax_tree().root)?;
        }

        let result = compilation.evaluate(&mut self.variables);
        if result.diagnostics.is_empty() {
            if let Some(value) = result.value {
                writeln!(output, "{}", value.to_string().fg(Color::Magenta))?;
            }
            self.previous = Some(Arc::new(compilation));
        } else {
            output.flush()?;
            let source = &compilation.syntax_tree().text;
            for diagnostic in &result.diagnostics {
                diagnostic.report(source, None)?;
            }
        }

        Ok(())
    }
}
