//! Pipeline registry for discovery and selection
//!
//! This module provides a centralized registry for the available conversion pipelines.
//! Pipelines are registered and retrieved by name (`docx-to-md`, `md-to-pdf`).

use crate::error::ConvertError;
use crate::pipeline::{Conversion, ConversionRequest};
use std::collections::HashMap;

/// A complete conversion from one input file to one output file.
pub trait Pipeline {
    /// Subcommand-style name of the pipeline
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Accepted input extensions, without the dot
    fn input_extensions(&self) -> &[&str];

    /// Extension of the derived output path, without the dot
    fn output_extension(&self) -> &str;

    /// Label the shell prefixes this pipeline's warnings with
    fn warning_source(&self) -> &str {
        self.name()
    }

    fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConvertError>;
}

/// Registry of conversion pipelines
///
/// # Examples
///
/// ```ignore
/// let registry = PipelineRegistry::default();
/// let pipeline = registry.get("docx-to-md")?;
/// let conversion = pipeline.convert(&ConversionRequest::new("report.docx"))?;
/// ```
pub struct PipelineRegistry {
    pipelines: HashMap<String, Box<dyn Pipeline>>,
}

impl PipelineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        PipelineRegistry {
            pipelines: HashMap::new(),
        }
    }

    /// Register a pipeline
    ///
    /// If a pipeline with the same name already exists, it will be replaced.
    pub fn register<P: Pipeline + 'static>(&mut self, pipeline: P) {
        self.pipelines
            .insert(pipeline.name().to_string(), Box::new(pipeline));
    }

    /// Get a pipeline by name
    pub fn get(&self, name: &str) -> Result<&dyn Pipeline, ConvertError> {
        self.pipelines
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| ConvertError::PipelineNotFound(name.to_string()))
    }

    /// List all registered pipeline names (sorted)
    pub fn list_pipelines(&self) -> Vec<String> {
        let mut names: Vec<_> = self.pipelines.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in pipelines
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::pipeline::DocxToMarkdown::default());
        #[cfg(feature = "native-export")]
        registry.register(crate::pipeline::MarkdownToPdf::default());
        registry
    }
}

impl Default for PipelineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
