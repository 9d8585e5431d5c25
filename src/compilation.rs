use crate::ast::CompilationUnit;
use crate::binder::bind_global_scope;
use crate::bound::BoundGlobalScope;
use crate::diagnostic::DiagnosticBag;
use crate::evaluator::Evaluator;
use crate::lexer::{Lexer, Token, TokenType};
use crate::parser::Parser;
use crate::symbols::VariableStore;
use crate::text::SourceText;
use crate::value::Value;
use std::sync::{Arc, OnceLock};

/// Parsed form of one submission, with its lexical and syntax diagnostics.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub text: SourceText,
    pub diagnostics: DiagnosticBag,
    pub root: CompilationUnit,
}

impl SyntaxTree {
    #[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn parse(text: &str) -> SyntaxTree {
        let text = SourceText::from(text);
        let (tokens, mut diagnostics) = Lexer::new(&text).scan_tokens();
        let (root, parse_diagnostics) = Parser::new(tokens).parse_compilation_unit();
        diagnostics.extend(parse_diagnostics);

        tracing::debug!(diagnostics = diagnostics.len(), "parsed submission");
        SyntaxTree {
            text,
            diagnostics,
            root,
        }
    }

    /// Every token in `text` before the end of input, whitespace and bad
    /// tokens included.
    pub fn parse_tokens(text: &str) -> Vec<Token> {
        let text = SourceText::from(text);
        let mut lexer = Lexer::new(&text);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.token_type == TokenType::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub diagnostics: DiagnosticBag,
    pub value: Option<Value>,
}

/// One submission, optionally chained onto the submission before it.
///
/// Binding happens on first use of [`Compilation::global_scope`]. Concurrent
/// callers may each bind, but only the first result stored is kept and every
/// caller sees that one.
#[derive(Debug)]
pub struct Compilation {
    previous: Option<Arc<Compilation>>,
    syntax_tree: SyntaxTree,
    global_scope: OnceLock<Arc<BoundGlobalScope>>,
}

impl Compilation {
    pub fn new(syntax_tree: SyntaxTree) -> Self {
        Self {
            previous: None,
            syntax_tree,
            global_scope: OnceLock::new(),
        }
    }

    /// A new submission that sees every variable declared so far.
    pub fn continue_with(self: &Arc<Self>, syntax_tree: SyntaxTree) -> Compilation {
        Compilation {
            previous: Some(Arc::clone(self)),
            syntax_tree,
            global_scope: OnceLock::new(),
        }
    }

    pub fn previous(&self) -> Option<&Arc<Compilation>> {
        self.previous.as_ref()
    }

    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.syntax_tree
    }

    pub fn global_scope(&self) -> Arc<BoundGlobalScope> {
        if let Some(scope) = self.global_scope.get() {
            return Arc::clone(scope);
        }

        let previous = self.previous.as_ref().map(|p| p.global_scope());
        let scope = Arc::new(bind_global_scope(previous, &self.syntax_tree.root));

        let stored = self.global_scope.get_or_init(|| Arc::clone(&scope));
        if !Arc::ptr_eq(stored, &scope) {
            tracing::trace!("discarding global scope bound by a losing caller");
        }
        Arc::clone(stored)
    }

    /// Binds (if needed) and runs the submission against `variables`.
    ///
    /// Nothing is evaluated if the submission has any diagnostics.
    pub fn evaluate(&self, variables: &mut VariableStore) -> EvaluationResult {
        let global_scope = self.global_scope();

        let mut diagnostics = self.syntax_tree.diagnostics.clone();
        diagnostics.extend(global_scope.diagnostics.clone());
        if !diagnostics.is_empty() {
            return EvaluationResult {
                diagnostics,
                value: None,
            };
        }

        let value = Evaluator::new(&global_scope.statement, variables).evaluate();
        EvaluationResult { diagnostics, value }
    }
}
