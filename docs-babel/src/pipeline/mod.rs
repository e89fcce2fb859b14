//! Conversion pipelines
//!
//! A pipeline owns its transducers and runs one request from input path to written output.
//! Validation happens before any transducer runs; the first fatal error stops the pipeline.
//!
//!     docx_to_md.rs    DOCX → HTML → Markdown
//!     md_to_pdf.rs     Markdown → HTML document + stylesheet → PDF

mod docx_to_md;
mod md_to_pdf;

pub use docx_to_md::DocxToMarkdown;
pub use md_to_pdf::MarkdownToPdf;

use crate::format::ConversionWarning;
use std::path::PathBuf;

/// One conversion to run: input path, optional explicit output, optional stylesheet.
///
/// Paths are used as given; the shell is expected to have made them absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Only read by pipelines that render with a stylesheet
    pub css: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            css: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_css(mut self, css: impl Into<PathBuf>) -> Self {
        self.css = Some(css.into());
        self
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Where the artifact was written
    pub output: PathBuf,
    /// Non-fatal findings, in the order they were reported
    pub warnings: Vec<ConversionWarning>,
}
