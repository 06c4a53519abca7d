//! Source acquisition and reporting
//!
//! The driver loads named source units, runs a fresh analysis over each one,
//! and renders the outcome. It owns everything outside the core: file I/O, the
//! input size bound, and presentation.

use crate::parser::{analyze, Analysis, Lexer, Options};
use log::info;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

/// Driver error type
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is {size} bytes, over the {limit}-byte limit")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// One named piece of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub text: String,
}

impl SourceUnit {
    /// Wrap in-memory text, enforcing the size bound.
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        max_bytes: usize,
    ) -> Result<Self, DriverError> {
        let name = name.into();
        let text = text.into();

        if text.len() > max_bytes {
            return Err(DriverError::TooLarge {
                name,
                size: text.len(),
                limit: max_bytes,
            });
        }

        Ok(Self { name, text })
    }

    /// Read a file, refusing it before analysis if it exceeds `max_bytes`.
    pub fn load(path: &Path, max_bytes: usize) -> Result<Self, DriverError> {
        let io_err = |source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = fs::metadata(path).map_err(io_err)?.len();
        let name = path.display().to_string();
        if size > max_bytes as u64 {
            return Err(DriverError::TooLarge {
                name,
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit: max_bytes,
            });
        }

        let bytes = fs::read(path).map_err(io_err)?;
        // Bytes are single characters to the lexer; keep them all
        let text = String::from_utf8(bytes).unwrap_or_else(|err| {
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        });

        Self::new(name, text, max_bytes)
    }
}

/// Outcome for one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub name: String,
    pub analysis: Analysis,
}

/// Outcomes for a batch of units, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub units: Vec<UnitReport>,
}

impl Report {
    pub fn accepted(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.analysis.is_accepted())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.units.len() - self.accepted()
    }

    pub fn all_accepted(&self) -> bool {
        self.rejected() == 0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            match &unit.analysis {
                Analysis::Accepted => {
                    writeln!(f, "Parsing successful for {}!", unit.name)?
                }
                Analysis::Rejected(diagnostics) => {
                    writeln!(
                        f,
                        "Parsing failed for {} ({} error(s)):",
                        unit.name,
                        diagnostics.len()
                    )?;
                    for diagnostic in diagnostics {
                        writeln!(f, "  {}", diagnostic)?;
                    }
                }
            }
        }

        if self.units.len() > 1 {
            writeln!(
                f,
                "{} unit(s) checked: {} accepted, {} rejected",
                self.units.len(),
                self.accepted(),
                self.rejected()
            )?;
        }
        Ok(())
    }
}

/// Analyze each unit independently, in order.
pub fn check_units(units: &[SourceUnit], options: &Options) -> Report {
    let units = units
        .iter()
        .map(|unit| {
            info!("Checking {} ({} bytes)", unit.name, unit.text.len());
            UnitReport {
                name: unit.name.clone(),
                analysis: analyze(&unit.text, options),
            }
        })
        .collect();

    Report { units }
}

/// Render the token stream of `text`, one token or lexical error per line.
pub fn dump_tokens(text: &str) -> String {
    let mut out = String::new();

    for item in Lexer::new(text) {
        // Writing to a String cannot fail
        let _ = match item {
            Ok(token) => writeln!(
                out,
                "<{}, {}> {}",
                token.lexeme, token.kind, token.location
            ),
            Err(err) => writeln!(out, "{}", err),
        };
    }

    out
}
