//! Token kinds, positions, and the lexeme classifier
//!
//! The classifier is a set of pure functions mapping a raw lexeme to a
//! [`TokenKind`]. The [`Lexer`](super::lexer::Lexer) decides *where* a lexeme
//! ends; these functions decide *what* it is.
//!
//! Reserved words are recognized case-insensitively through a direct
//! [`FxHashMap`] lookup on the ASCII-lowercased lexeme, while the token keeps
//! the spelling used in the source for diagnostics.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

/// Source position of a lexeme (both fields 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The closed set of token kinds handed to the parser.
///
/// Comments and whitespace never reach the parser, so they have no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Name,
    Number,
    String,

    // Binary operators
    And,
    Or,
    Lt,     // <
    Gt,     // >
    Le,     // <=
    Ge,     // >=
    Ne,     // ~=
    Eq,     // ==
    Concat, // ..
    Plus,   // +
    Minus,  // -
    Times,  // *
    Divide, // /
    Power,  // ^

    // Unary
    Not,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Assign,   // =

    // Keywords
    Do,
    End,
    While,
    If,
    Then,
    Else,
    ElseIf,
    For,
    Local,
    Function,
    Return,
    Break,

    // Separators
    Comma,     // ,
    Semicolon, // ;

    EndOfInput,
}

impl TokenKind {
    /// Binary operators accepted by the `BinOp` production.
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Or
                | TokenKind::And
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
                | TokenKind::Ne
                | TokenKind::Eq
                | TokenKind::Concat
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Times
                | TokenKind::Divide
                | TokenKind::Power
        )
    }

    /// Kinds after which a `+`/`-` is a binary operator rather than a sign.
    pub fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Name
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::RParen
                | TokenKind::RBracket
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A classified lexeme and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn end_of_input(location: SourceLocation) -> Self {
        Self::new(TokenKind::EndOfInput, "", location)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    [
        ("and", TokenKind::And),
        ("break", TokenKind::Break),
        ("do", TokenKind::Do),
        ("else", TokenKind::Else),
        ("elseif", TokenKind::ElseIf),
        ("end", TokenKind::End),
        ("for", TokenKind::For),
        ("function", TokenKind::Function),
        ("if", TokenKind::If),
        ("local", TokenKind::Local),
        ("not", TokenKind::Not),
        ("or", TokenKind::Or),
        ("return", TokenKind::Return),
        ("then", TokenKind::Then),
        ("while", TokenKind::While),
    ]
    .into_iter()
    .collect()
});

/// Reserved-word lookup. Case-insensitive over ASCII.
pub fn keyword(lexeme: &str) -> Option<TokenKind> {
    // Longest keyword is "function"
    if lexeme.len() > 8 {
        return None;
    }
    KEYWORDS.get(lexeme.to_ascii_lowercase().as_str()).copied()
}

/// Two- and one-character operators, including `=`.
pub fn operator(lexeme: &str) -> Option<TokenKind> {
    let kind = match lexeme {
        "==" => TokenKind::Eq,
        "~=" => TokenKind::Ne,
        "<=" => TokenKind::Le,
        ">=" => TokenKind::Ge,
        ".." => TokenKind::Concat,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Times,
        "/" => TokenKind::Divide,
        "^" => TokenKind::Power,
        "<" => TokenKind::Lt,
        ">" => TokenKind::Gt,
        "=" => TokenKind::Assign,
        _ => return None,
    };
    Some(kind)
}

pub fn delimiter(byte: u8) -> Option<TokenKind> {
    let kind = match byte {
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'[' => TokenKind::LBracket,
        b']' => TokenKind::RBracket,
        b',' => TokenKind::Comma,
        b';' => TokenKind::Semicolon,
        _ => return None,
    };
    Some(kind)
}

pub fn is_identifier(lexeme: &str) -> bool {
    let mut bytes = lexeme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {
            bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => false,
    }
}

/// Optional sign, digits, then at most one `.` followed by digits.
pub fn is_number(lexeme: &str) -> bool {
    let digits = lexeme
        .strip_prefix(|c| c == '+' || c == '-')
        .unwrap_or(lexeme);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };
    let all_digits =
        |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    all_digits(integer) && fraction.map_or(true, all_digits)
}

pub fn is_string(lexeme: &str) -> bool {
    let bytes = lexeme.as_bytes();
    bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
}

/// Classify a complete lexeme.
///
/// Checks run in the lexer's category order so overlapping shapes resolve
/// the same way: string, number, keyword, identifier, operator, delimiter.
pub fn classify(lexeme: &str) -> Option<TokenKind> {
    if is_string(lexeme) {
        return Some(TokenKind::String);
    }
    if is_number(lexeme) {
        return Some(TokenKind::Number);
    }
    if let Some(kind) = keyword(lexeme) {
        return Some(kind);
    }
    if is_identifier(lexeme) {
        return Some(TokenKind::Name);
    }
    if let Some(kind) = operator(lexeme) {
        return Some(kind);
    }
    match lexeme.as_bytes() {
        [byte] => delimiter(*byte),
        _ => None,
    }
}
