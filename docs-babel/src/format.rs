//! Transducer traits
//!
//! This module defines the seams between a pipeline and the converters it delegates to.
//! Each trait has one job and one input/output pair; pipelines hold them as boxed trait
//! objects so any stage can be replaced (tests use in-memory fakes for the renderer).

use crate::error::ConvertError;
use crate::stylesheet::Stylesheet;
use std::fmt;
use url::Url;

/// Serialized output produced by a pipeline.
pub enum SerializedDocument {
    /// UTF-8 text output (e.g., markdown)
    Text(String),
    /// Binary output (e.g., PDF)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }
}

/// Severity tag of a [`ConversionWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    Warning,
    Error,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Warning => write!(f, "warning"),
            WarningKind::Error => write!(f, "error"),
        }
    }
}

/// A non-fatal finding reported while reading a source document.
///
/// Displays as `<kind>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl ConversionWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// HTML produced from a DOCX file, plus the warnings collected on the way.
#[derive(Debug, Clone, Default)]
pub struct DocxHtml {
    pub html: String,
    pub warnings: Vec<ConversionWarning>,
}

/// DOCX bytes → HTML
pub trait DocxReader {
    fn read_docx(&self, bytes: &[u8]) -> Result<DocxHtml, ConvertError>;
}

/// HTML → Markdown text
pub trait HtmlToMarkdown {
    fn html_to_markdown(&self, html: &str) -> Result<String, ConvertError>;
}

/// Markdown text → HTML5 fragment
pub trait MarkdownToHtml {
    fn markdown_to_html(&self, source: &str) -> Result<String, ConvertError>;
}

/// Complete HTML document → PDF bytes
///
/// `base_url` is where relative references (images, links) are resolved from. Every entry in
/// `stylesheets` is applied to the document; callers decide how many they pass.
pub trait PdfRenderer {
    fn render_pdf(
        &self,
        html: &str,
        base_url: &Url,
        stylesheets: &[Stylesheet],
    ) -> Result<Vec<u8>, ConvertError>;
}
