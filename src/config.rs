//! Configuration loading
//!
//! `defaults/lua-simples.default.toml` is embedded into the binary so the
//! documented defaults and runtime behavior never drift apart. User files and
//! command-line overrides are layered on top through [`Loader`] before being
//! deserialized into [`Settings`].

use crate::parser::{Mode, Options};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use log::debug;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lua-simples.default.toml");

/// Name of the optional per-project configuration file
pub const PROJECT_FILE: &str = "lua-simples.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisSettings {
    pub mode: Mode,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputSettings {
    pub max_source_bytes: usize,
}

impl Settings {
    /// Parser options derived from the analysis section
    pub fn options(&self) -> Options {
        Options {
            mode: self.analysis.mode,
            max_depth: self.analysis.max_depth,
        }
    }
}

/// Builds [`Settings`] from the embedded defaults plus any layers added on
/// top, later layers winning.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer `lua-simples.toml` from `dir` if one exists there.
    pub fn with_project_file(self, dir: impl AsRef<Path>) -> Self {
        self.layer(dir.as_ref().join(PROJECT_FILE), false)
    }

    /// Layer an explicitly named file, which must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    fn layer(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Result<Self, ConfigError> {
        self.builder = self
            .builder
            .set_override("analysis.mode", mode.to_string())?;
        Ok(self)
    }

    pub fn max_depth(mut self, depth: usize) -> Result<Self, ConfigError> {
        let depth = i64::try_from(depth).unwrap_or(i64::MAX);
        self.builder = self.builder.set_override("analysis.max_depth", depth)?;
        Ok(self)
    }

    /// Merge every layer and check the result.
    pub fn build(self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.builder.build()?.try_deserialize()?;

        if settings.analysis.max_depth == 0 {
            return Err(ConfigError::Message(
                "analysis.max_depth must be at least 1".to_string(),
            ));
        }
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
