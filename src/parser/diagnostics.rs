//! Diagnostics and the per-unit analysis result
//!
//! A [`Diagnostic`] is the recorded, presentation-ready form of a
//! [`SyntaxError`]: message, position, and (for mismatches) the expected kind
//! and the lexeme actually found.

use crate::parser::parse::SyntaxError;
use crate::parser::token::{SourceLocation, TokenKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    TrailingInput,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "Lexical"),
            DiagnosticKind::Syntax => write!(f, "Syntax"),
            DiagnosticKind::TrailingInput => write!(f, "Trailing input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: SourceLocation,
    pub expected: Option<TokenKind>,
    /// Lexeme of the offending token, empty at end of input
    pub found: Option<String>,
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn position(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at line {}, position {}: {}",
            self.kind, self.location.line, self.location.column, self.message
        )
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        let (kind, expected, found) = match err {
            SyntaxError::Unexpected { expected, found } => (
                DiagnosticKind::Syntax,
                Some(*expected),
                Some(found.lexeme.clone()),
            ),
            SyntaxError::Lex(_) => (DiagnosticKind::Lexical, None, None),
            SyntaxError::TrailingInput { found } => (
                DiagnosticKind::TrailingInput,
                None,
                Some(found.lexeme.clone()),
            ),
            SyntaxError::NestingTooDeep { .. } => {
                (DiagnosticKind::Syntax, None, None)
            }
        };

        Diagnostic {
            kind,
            message: err.to_string(),
            location: err.location(),
            expected,
            found,
        }
    }
}

/// Outcome of analyzing one source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Accepted,
    /// Diagnostics in the order they were raised; never empty
    Rejected(Vec<Diagnostic>),
}

impl Analysis {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Analysis::Accepted)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Analysis::Accepted => &[],
            Analysis::Rejected(diagnostics) => diagnostics,
        }
    }
}
