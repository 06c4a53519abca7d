//! Error policy and panic-mode recovery
//!
//! Grammar methods only ever return errors. Whether an error ends the
//! analysis or is recorded and skipped over is decided here, in
//! [`Parser::recover`], according to the selected [`Mode`].
//!
//! # Panic mode
//!
//! In [`Mode::Recover`] the `Block` loop hands each failed statement to
//! `recover`, which records a diagnostic and discards tokens until the
//! lookahead is a member of the active [`SyncSet`]:
//!
//! - after a simple statement: `;`, `end`, `else`, `elseif`
//! - after a block-opening statement whose `end` was never matched: `end`
//!   only, and that `end` is consumed as the closer of the broken construct
//!
//! Skipped `if`/`do`/`function` openers are matched against their own `end`
//! so an inner `end` is never mistaken for a resumption point. The `do` that
//! ends the header of a failed `while` or `for` belongs to that construct and
//! opens nothing. End of input belongs to every set, so skipping always
//! terminates.

use crate::parser::diagnostics::Diagnostic;
use crate::parser::parse::{Parser, SyntaxError};
use crate::parser::token::TokenKind;
use log::{debug, trace};
use serde::Deserialize;
use std::fmt;

/// Error-handling strategy for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Stop at the first error
    #[default]
    Strict,
    /// Record each error, resynchronize, and keep going
    Recover,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => write!(f, "strict"),
            Mode::Recover => write!(f, "recover"),
        }
    }
}

/// Token kinds at which skipping stops. `EndOfInput` is always a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSet(&'static [TokenKind]);

impl SyncSet {
    /// Statement boundaries and block closers
    pub const STATEMENT: SyncSet = SyncSet(&[
        TokenKind::Semicolon,
        TokenKind::End,
        TokenKind::Else,
        TokenKind::ElseIf,
    ]);

    /// Closer of a construct left open by the failed statement
    pub const OPEN_CONSTRUCT: SyncSet = SyncSet(&[TokenKind::End]);

    pub fn contains(&self, kind: TokenKind) -> bool {
        kind == TokenKind::EndOfInput || self.0.contains(&kind)
    }
}

impl Parser<'_> {
    /// Apply the error policy to a failed statement.
    ///
    /// `unclosed` counts the block-opening constructs the statement entered
    /// without reaching their `end`; `headers` counts the `while`/`for`
    /// headers among them still waiting for their `do`.
    pub(crate) fn recover(
        &mut self,
        err: SyntaxError,
        unclosed: usize,
        headers: usize,
    ) -> Result<(), SyntaxError> {
        if self.options.mode == Mode::Strict || err.is_fatal() {
            return Err(err);
        }

        self.record(&err);
        self.synchronize(unclosed, headers);
        Ok(())
    }

    /// Stray block closer after the top-level block: record it and skip it.
    pub(crate) fn recover_trailing(
        &mut self,
        err: SyntaxError,
    ) -> Result<(), SyntaxError> {
        if self.options.mode == Mode::Strict {
            return Err(err);
        }

        self.record(&err);
        self.skip();
        Ok(())
    }

    /// Record a diagnostic, followed by any lexical errors queued behind it.
    pub(crate) fn record(&mut self, err: &SyntaxError) {
        let diagnostic = Diagnostic::from(err);
        debug!("Recording diagnostic: {}", diagnostic);
        self.diagnostics.push(diagnostic);

        for lex_err in std::mem::take(&mut self.deferred) {
            let diagnostic = Diagnostic::from(&SyntaxError::Lex(lex_err));
            debug!("Recording diagnostic: {}", diagnostic);
            self.diagnostics.push(diagnostic);
        }
    }

    /// Discard tokens until the active sync set is reached.
    ///
    /// Returns the number of tokens discarded.
    pub(crate) fn synchronize(
        &mut self,
        unclosed: usize,
        headers: usize,
    ) -> usize {
        let mut unclosed = unclosed;
        let mut headers = headers.min(unclosed);
        let mut nesting = 0usize;
        let mut skipped = 0;

        loop {
            let sync = if unclosed > 0 {
                SyncSet::OPEN_CONSTRUCT
            } else {
                SyncSet::STATEMENT
            };
            let kind = self.current.kind;

            if kind == TokenKind::EndOfInput {
                break;
            }

            if nesting == 0 && sync.contains(kind) {
                if unclosed == 0 {
                    break;
                }
                // `end` of the construct that failed
                self.skip();
                skipped += 1;
                unclosed -= 1;
                if unclosed == 0 {
                    break;
                }
                continue;
            }

            match kind {
                // Header `do` of the failed construct
                TokenKind::Do if nesting == 0 && headers > 0 => headers -= 1,
                TokenKind::If | TokenKind::Do | TokenKind::Function => {
                    nesting += 1
                }
                TokenKind::End => nesting = nesting.saturating_sub(1),
                _ => {}
            }

            self.skip();
            skipped += 1;
        }

        debug!(
            "Resynchronized on {} at {} after skipping {} token(s)",
            self.current, self.current.location, skipped
        );
        skipped
    }

    /// Drop the lookahead token, recording any lexical error behind it.
    fn skip(&mut self) {
        trace!(
            "Skipping unexpected token {} at {}",
            self.current,
            self.current.location
        );
        if let Err(err) = self.bump() {
            self.record(&err);
        }
    }
}
