#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(String),
    StringLit(String),

    // Keywords
    Let,
    Func,
    If,
    Else,
    While,
    Match,
    Case,
    Return,
    And,
    Or,
    Not,

    // Type keywords. `Func` doubles as the function type in type position
    TInt,
    TFloat,
    TBool,
    TString,
    TArray,
    TList,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    Eq,         // =
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    Arrow,      // ->
    FatArrow,   // =>
    Underscore, // _

    // Punctuation
    Colon,      // :
    Comma,      // ,
    Semicolon,  // ;
    Dot,        // .
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    Eof,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Bool(_) | Self::StringLit(_))
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Star | Self::Slash | Self::Percent)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::EqEq | Self::BangEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }

    pub fn is_assign_op(&self) -> bool {
        matches!(self, Self::Eq | Self::PlusEq | Self::MinusEq | Self::StarEq | Self::SlashEq)
    }

    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Self::TInt | Self::TFloat | Self::TBool | Self::TString | Self::TArray | Self::TList
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Let | Self::Func | Self::If | Self::Else | Self::While | Self::Match
            | Self::Case | Self::Return | Self::And | Self::Or | Self::Not
        )
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
/// Type names accept either a lower- or upper-case first letter so that
/// `let x: int` and the cast `Int(x)` share one token.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "let"                 => TokenKind::Let,
        "func" | "Func"       => TokenKind::Func,
        "if"                  => TokenKind::If,
        "else"                => TokenKind::Else,
        "while"               => TokenKind::While,
        "match"               => TokenKind::Match,
        "case"                => TokenKind::Case,
        "return"              => TokenKind::Return,
        "and"                 => TokenKind::And,
        "or"                  => TokenKind::Or,
        "not"                 => TokenKind::Not,
        "true"                => TokenKind::Bool(true),
        "false"               => TokenKind::Bool(false),
        "int" | "Int"         => TokenKind::TInt,
        "float" | "Float"     => TokenKind::TFloat,
        "bool" | "Bool"       => TokenKind::TBool,
        "string" | "String"   => TokenKind::TString,
        "array" | "Array"     => TokenKind::TArray,
        "list" | "List"       => TokenKind::TList,
        "_"                   => TokenKind::Underscore,
        _                     => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
