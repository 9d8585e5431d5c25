// Coda Language Library
//
// Core pipeline of the coda expression language: lexer, recursive-descent
// parser, binder and tree-walking evaluator, plus the incremental
// compilation chain used by the REPL.

// Public modules
pub mod ast;
pub mod binder;
pub mod bound;
pub mod compilation;
pub mod diagnostic;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod scope;
pub mod symbols;
pub mod syntax_facts;
pub mod text;
pub mod value;

// Re-export commonly used items
pub use ast::{AggregateFunction, CompilationUnit, Expression, Statement};
pub use compilation::{Compilation, EvaluationResult, SyntaxTree};
pub use diagnostic::{Diagnostic, DiagnosticBag, DiagnosticKind};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::Parser;
pub use symbols::{VariableStore, VariableSymbol};
pub use text::{SourceText, Span};
pub use value::{Value, ValueType};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
