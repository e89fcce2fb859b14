//! DOCX → Markdown pipeline

use super::{Conversion, ConversionRequest};
use crate::error::{ConvertError, FileRole};
use crate::format::{DocxHtml, DocxReader, HtmlToMarkdown, SerializedDocument};
use crate::formats::{DocxFormat, HtmlMarkdownFormat, MarkdownOptions};
use crate::paths::{has_extension, require_existing, resolve_output_path, write_output};
use crate::registry::Pipeline;
use std::fs;
use tracing::{debug, info};

const INPUT_EXTENSIONS: &[&str] = &["docx"];

/// Reads a `.docx` file and writes it back as Markdown.
pub struct DocxToMarkdown {
    reader: Box<dyn DocxReader>,
    writer: Box<dyn HtmlToMarkdown>,
}

impl DocxToMarkdown {
    pub fn new(options: MarkdownOptions) -> Self {
        Self::with_transducers(
            Box::new(DocxFormat),
            Box::new(HtmlMarkdownFormat::new(options)),
        )
    }

    pub fn with_transducers(
        reader: Box<dyn DocxReader>,
        writer: Box<dyn HtmlToMarkdown>,
    ) -> Self {
        Self { reader, writer }
    }
}

impl Default for DocxToMarkdown {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}

impl Pipeline for DocxToMarkdown {
    fn name(&self) -> &str {
        "docx-to-md"
    }

    fn description(&self) -> &str {
        "Convert a Word document to Markdown"
    }

    fn input_extensions(&self) -> &[&str] {
        INPUT_EXTENSIONS
    }

    fn output_extension(&self) -> &str {
        "md"
    }

    fn warning_source(&self) -> &str {
        "docx-parser"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConvertError> {
        let input = request.input.as_path();
        require_existing(input, FileRole::Input)?;
        if !has_extension(input, INPUT_EXTENSIONS) {
            return Err(ConvertError::InvalidFormat(
                "Input must be a .docx file".to_string(),
            ));
        }

        let bytes = fs::read(input).map_err(|e| ConvertError::io(input, e))?;
        let DocxHtml { html, warnings } = self.reader.read_docx(&bytes)?;
        debug!(input = %input.display(), html_bytes = html.len(), "DOCX read");

        let markdown = self.writer.html_to_markdown(&html)?;

        let output = resolve_output_path(input, request.output.as_deref(), self.output_extension())?;
        write_output(&output, SerializedDocument::Text(markdown))?;
        info!(output = %output.display(), warnings = warnings.len(), "markdown written");

        Ok(Conversion { output, warnings })
    }
}
