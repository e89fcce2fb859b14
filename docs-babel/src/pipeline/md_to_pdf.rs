//! Markdown → PDF pipeline

use super::{Conversion, ConversionRequest};
use crate::error::{ConvertError, FileRole};
use crate::format::{MarkdownToHtml, PdfRenderer, SerializedDocument};
use crate::formats::html::html_escape;
use crate::formats::MarkdownFormat;
use crate::paths::{has_extension, require_existing, resolve_output_path, write_output};
use crate::registry::Pipeline;
use crate::stylesheet::Stylesheet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const INPUT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Renders a Markdown file to PDF with exactly one stylesheet.
pub struct MarkdownToPdf {
    markdown: Box<dyn MarkdownToHtml>,
    renderer: Box<dyn PdfRenderer>,
}

impl MarkdownToPdf {
    /// Default transducers: comrak with highlighting, headless Chrome from the environment.
    #[cfg(feature = "native-export")]
    pub fn new() -> Self {
        Self::with_transducers(
            Box::new(MarkdownFormat::new()),
            Box::new(crate::formats::ChromeRenderer::new()),
        )
    }

    /// Default Markdown transducer with a caller-provided renderer.
    pub fn with_renderer(renderer: Box<dyn PdfRenderer>) -> Self {
        Self::with_transducers(Box::new(MarkdownFormat::new()), renderer)
    }

    pub fn with_transducers(
        markdown: Box<dyn MarkdownToHtml>,
        renderer: Box<dyn PdfRenderer>,
    ) -> Self {
        Self { markdown, renderer }
    }
}

#[cfg(feature = "native-export")]
impl Default for MarkdownToPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline for MarkdownToPdf {
    fn name(&self) -> &str {
        "md-to-pdf"
    }

    fn description(&self) -> &str {
        "Render Markdown to PDF through headless Chrome"
    }

    fn input_extensions(&self) -> &[&str] {
        INPUT_EXTENSIONS
    }

    fn output_extension(&self) -> &str {
        "pdf"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConvertError> {
        let input = request.input.as_path();
        require_existing(input, FileRole::Input)?;
        if !has_extension(input, INPUT_EXTENSIONS) {
            return Err(ConvertError::InvalidFormat(
                "Input must be a .md or .markdown file".to_string(),
            ));
        }
        // Checked before any HTML is generated.
        let stylesheet = Stylesheet::select(request.css.as_deref())?;

        let source = fs::read_to_string(input).map_err(|e| ConvertError::io(input, e))?;
        let fragment = self.markdown.markdown_to_html(&source)?;
        let title = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let document = document_shell(&title, &fragment);
        debug!(
            input = %input.display(),
            default_css = stylesheet.is_default(),
            "HTML document assembled"
        );

        let output = resolve_output_path(input, request.output.as_deref(), self.output_extension())?;
        let base_url = base_url_for(input)?;
        let pdf = self
            .renderer
            .render_pdf(&document, &base_url, std::slice::from_ref(&stylesheet))?;
        write_output(&output, SerializedDocument::Binary(pdf))?;
        info!(output = %output.display(), "PDF written");

        Ok(Conversion {
            output,
            warnings: Vec::new(),
        })
    }
}

/// Standalone HTML document around a rendered fragment.
///
/// The renderer adds `<base>` and the stylesheet to the head.
pub fn document_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        html_escape(title)
    )
}

/// `file://` URL of the directory containing `input`, with a trailing slash.
fn base_url_for(input: &Path) -> Result<Url, ConvertError> {
    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let absolute = std::path::absolute(dir).map_err(|e| ConvertError::io(dir, e))?;
    Url::from_directory_path(&absolute).map_err(|_| {
        ConvertError::Render(format!(
            "cannot build a file URL for {}",
            absolute.display()
        ))
    })
}
