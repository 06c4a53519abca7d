//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the syntax error type, lookahead helpers, and the main
//! [`Parser::analyze`] entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a predictive recursive descent validator with a single
//! token of lookahead:
//! - This module: Parser struct, lookahead slot, and coordination
//! - `statements`: `Block` and the statement productions
//! - `expressions`: expression productions
//! - `recovery`: error policy and panic-mode synchronization
//!
//! Tokens are pulled from the [`Lexer`] one at a time and dropped once
//! consumed. No tree is built; a successful walk of the derivation is the
//! result.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::diagnostics::{Analysis, Diagnostic};
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::recovery::Mode;
use crate::parser::token::{SourceLocation, Token, TokenKind};
use log::info;

/// Default bound on nested blocks and parenthesized expressions
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Syntax error type
///
/// Lexical errors are wrapped so that the grammar methods see a single
/// failure type and recovery treats both the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: TokenKind, found: Token },

    #[error("{}", .0.kind)]
    Lex(#[from] LexError),

    #[error("unexpected {found} after the end of the chunk")]
    TrailingInput { found: Token },

    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl SyntaxError {
    pub fn location(&self) -> SourceLocation {
        match self {
            SyntaxError::Unexpected { found, .. }
            | SyntaxError::TrailingInput { found } => found.location,
            SyntaxError::Lex(err) => err.location,
            SyntaxError::NestingTooDeep { location, .. } => *location,
        }
    }

    /// Fatal errors end the analysis even in recovery mode.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyntaxError::NestingTooDeep { .. })
    }
}

/// Knobs for a single analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn recover() -> Self {
        Self {
            mode: Mode::Recover,
            ..Self::default()
        }
    }
}

/// Recursive descent validator for Lua Simples
pub struct Parser<'src> {
    pub(crate) lexer: Lexer<'src>,
    /// Lookahead slot: the next unconsumed token
    pub(crate) current: Token,
    pub(crate) options: Options,
    pub(crate) depth: usize,
    /// Block-opening statements entered but not yet closed by `end`
    pub(crate) open_blocks: usize,
    /// `while`/`for` headers entered but not yet past their `do`
    pub(crate) open_headers: usize,
    /// Lexical errors met while refilling the lookahead after another error
    pub(crate) deferred: Vec<LexError>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: Options) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: Token::end_of_input(SourceLocation::new(1, 1)),
            options,
            depth: 0,
            open_blocks: 0,
            open_headers: 0,
            deferred: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Validate the whole source unit.
    pub fn analyze(mut self) -> Analysis {
        info!("Beginning analysis in {} mode", self.options.mode);

        if let Err(err) = self.chunk() {
            // Strict analysis reports the first error only
            if self.options.mode == Mode::Strict {
                self.deferred.clear();
            }
            self.record(&err);
        }

        info!(
            "Analysis finished with {} diagnostic(s)",
            self.diagnostics.len()
        );

        if self.diagnostics.is_empty() {
            Analysis::Accepted
        } else {
            Analysis::Rejected(self.diagnostics)
        }
    }

    /// `Chunk := Block EndOfInput`
    fn chunk(&mut self) -> Result<(), SyntaxError> {
        if let Err(err) = self.bump() {
            self.recover(err, 0, 0)?;
        }

        loop {
            self.block()?;

            if self.check(TokenKind::EndOfInput) {
                return Ok(());
            }

            // A stray `end`, `else` or `elseif` closes nothing
            let err = SyntaxError::TrailingInput {
                found: self.current.clone(),
            };
            self.recover_trailing(err)?;
        }
    }

    // ===== Helper methods =====

    /// Refill the lookahead slot from the lexer.
    ///
    /// On a lexical error the slot is still refilled with the next good
    /// token, so recovery always has something to look at.
    pub(crate) fn bump(&mut self) -> Result<(), SyntaxError> {
        match self.lexer.next_token() {
            Ok(token) => {
                self.current = token;
                Ok(())
            }
            Err(err) => {
                self.refill();
                Err(SyntaxError::Lex(err))
            }
        }
    }

    fn refill(&mut self) {
        loop {
            match self.lexer.next_token() {
                Ok(token) => {
                    self.current = token;
                    return;
                }
                Err(err) => self.deferred.push(err),
            }
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    /// Consume the lookahead if it has the given kind.
    pub(crate) fn accept(
        &mut self,
        kind: TokenKind,
    ) -> Result<bool, SyntaxError> {
        if self.check(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Match the lookahead against `expected` and consume it.
    pub(crate) fn expect(
        &mut self,
        expected: TokenKind,
    ) -> Result<Token, SyntaxError> {
        if self.check(expected) {
            let token = self.current.clone();
            self.bump()?;
            Ok(token)
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn unexpected(&self, expected: TokenKind) -> SyntaxError {
        SyntaxError::Unexpected {
            expected,
            found: self.current.clone(),
        }
    }

    /// Tokens that end a `Block`
    pub(crate) fn at_block_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::EndOfInput
        )
    }

    /// Run `f` one nesting level deeper, failing past `max_depth`.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= self.options.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                limit: self.options.max_depth,
                location: self.current.location,
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Validate `source` with a fresh parser.
pub fn analyze(source: &str, options: &Options) -> Analysis {
    Parser::new(source, *options).analyze()
}
