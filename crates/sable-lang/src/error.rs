use thiserror::Error as ThisError;

/// Error codes prefixed by phase: L = lexer, P = parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // unterminated string literal
    L003, // invalid escape sequence
    L004, // integer literal out of range

    // Parser
    P001, // unexpected token
    P002, // missing expected token
    P003, // unknown collection operation
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::L003 => "L003",
            Self::L004 => "L004",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A front-end (lex / parse) diagnostic.
#[derive(Debug, Clone, ThisError)]
#[error("[{code}] {line}:{column} — {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// Category of a runtime fault. Every kind is fatal to the running evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Unresolved identifier or function name.
    NameError,
    /// Invalid operand types, invalid cast, wrong-shape container.
    TypeError,
    /// Too many or too few call arguments.
    ArityError,
    /// Shape mismatch, empty statistic, missing element, bad rotate/shift amount.
    ValueError,
    /// No `case` of a `match` accepted the scrutinee.
    NoMatchError,
    /// A function name declared twice in the same scope.
    DeclarationError,
    /// Call depth exceeded the configured limit.
    RecursionLimit,
}

impl RuntimeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameError        => "NameError",
            Self::TypeError        => "TypeError",
            Self::ArityError       => "ArityError",
            Self::ValueError       => "ValueError",
            Self::NoMatchError     => "NoMatchError",
            Self::DeclarationError => "DeclarationError",
            Self::RecursionLimit   => "RecursionLimit",
        }
    }
}

impl std::fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("[{kind}] line {line} — {message}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self { kind, line, message: message.into() }
    }

    pub fn name(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::NameError, line, message)
    }

    pub fn type_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::TypeError, line, message)
    }

    pub fn arity(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::ArityError, line, message)
    }

    pub fn value(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::ValueError, line, message)
    }

    pub fn no_match(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::NoMatchError, line, message)
    }

    pub fn declaration(line: usize, message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::DeclarationError, line, message)
    }

    pub fn recursion_limit(line: usize, depth: usize) -> Self {
        Self::new(
            RuntimeErrorKind::RecursionLimit,
            line,
            format!("maximum call depth of {depth} exceeded"),
        )
    }
}

/// Anything `sable_lang::run` can fail with.
#[derive(Debug, ThisError)]
pub enum SableError {
    #[error("compilation failed with {} error(s)", .0.len())]
    Compile(Vec<Error>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
