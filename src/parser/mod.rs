//! Lua Simples syntax checker
//!
//! This module validates source text against the grammar of the teaching
//! subset:
//! - [`token`]: Token kinds and the lexeme classifier
//! - [`lexer`]: Tokenization (source text → tokens, one at a time)
//! - [`parse`]: The recursive descent validator and its lookahead slot
//! - [`recovery`]: Strict and recovering error policies, panic-mode skipping
//! - [`diagnostics`]: Recorded errors and the per-unit [`Analysis`]
//!
//! # Supported Lua Subset
//!
//! - Statements: assignment, `local`, `function`, `do`, `while`, `if`/`elseif`/`else`,
//!   numeric `for`, `return`, `break`
//! - Expressions: numbers, strings, names with `[...]` indexing, parentheses,
//!   `not`, unary `-`, and fourteen binary operators with no precedence
//! - No tables, calls, method syntax, `repeat`, or generic `for`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over a pull-model lexer. No external parser
//! generator dependencies. Nothing is retained once a token is consumed.

pub mod diagnostics;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod recovery;
mod statements;
pub mod token;

pub use diagnostics::{Analysis, Diagnostic, DiagnosticKind};
pub use lexer::{LexError, LexErrorKind, Lexer};
pub use parse::{analyze, Options, Parser, SyntaxError};
pub use recovery::{Mode, SyncSet};
pub use token::{SourceLocation, Token, TokenKind};
