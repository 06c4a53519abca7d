//! # Introduction
//!
//! Lua Simples checks whether source text is well formed under the grammar of
//! a small teaching subset of Lua. It is a front end only: no tree is built,
//! no names are resolved, nothing is executed.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer ⇄ Parser → Analysis (Accepted | Rejected(diagnostics))
//! ```
//!
//! 1. [`parser`]: the pull-model lexer, the recursive descent validator,
//!    and the strict/recovering error policies.
//! 2. [`driver`]: loads named source units under a size limit, analyzes each
//!    with a fresh parser, and renders reports and token dumps.
//! 3. [`config`]: layered settings (embedded defaults, project file, explicit
//!    file, command-line overrides).
//!
//! ## Quick use
//!
//! ```
//! use lua_simples::parser::{analyze, Options};
//!
//! assert!(analyze("local x = 1", &Options::strict()).is_accepted());
//! assert!(!analyze("if x then y = 1", &Options::strict()).is_accepted());
//! ```

pub mod config;
pub mod driver;
pub mod parser;
