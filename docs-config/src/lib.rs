//! Shared configuration loader for the docs toolchain.
//!
//! `defaults/docs.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DocsConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use docs_babel::formats::MarkdownOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/docs.default.toml");

/// Top-level configuration consumed by docs applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    pub convert: ConvertConfig,
}

/// Pipeline-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub markdown: MarkdownConfig,
    pub pdf: PdfConfig,
}

/// Mirrors the knobs exposed by the HTML → Markdown transducer.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub ignore_links: bool,
    pub ignore_images: bool,
    pub protect_links: bool,
    pub body_width: usize,
}

impl From<&MarkdownConfig> for MarkdownOptions {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownOptions {
            ignore_links: config.ignore_links,
            ignore_images: config.ignore_images,
            protect_links: config.protect_links,
            body_width: config.body_width,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub highlight: bool,
    /// Default stylesheet path when none is given on the command line
    pub css: Option<String>,
    /// Chrome/Chromium binary override
    pub chrome: Option<String>,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DocsConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
