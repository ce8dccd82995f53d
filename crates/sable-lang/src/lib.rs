pub mod builtins;
pub mod error;
pub mod runtime;
pub mod sink;
pub mod syntax;

pub use error::{Error, ErrorCode, RuntimeError, RuntimeErrorKind, SableError};
pub use runtime::environment::Environment;
pub use runtime::interpreter::{Interpreter, InterpreterConfig};
pub use runtime::value::Value;
pub use sink::{CaptureSink, LogNoteSink, NoteSink, StdoutSink, TextSink};
pub use syntax::ast::Program;
pub use syntax::token::{Token, TokenKind};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Lex and parse source text. Every lexical error is reported before any
/// parsing happens; parse errors are collected with statement-level recovery.
pub fn compile(source: &str) -> Result<Program, Vec<Error>> {
    let tokens = syntax::lexer::Lexer::new(source).tokenize()?;
    syntax::parser::Parser::new(tokens).parse()
}

/// Compile and evaluate `source` with a default interpreter (stdout text,
/// logged notes).
pub fn run(source: &str) -> Result<Value, SableError> {
    let program = compile(source).map_err(SableError::Compile)?;
    Ok(Interpreter::new().evaluate(&program)?)
}
