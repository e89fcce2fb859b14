//! Markdown → HTML
//!
//! Renders a Markdown source into an HTML fragment (no `<html>`/`<head>` wrapper; the
//! md-to-pdf pipeline builds the document shell around it).
//!
//! # Library Choice
//!
//! We use `comrak` with its bundled `syntect` adapter:
//! - CommonMark list semantics out of the box
//! - GFM tables and strikethrough, footnotes and description lists as extensions
//! - Heading anchors (`header_ids`) for in-document links
//! - Smart punctuation: curly quotes, `--` → en dash, `---` → em dash
//! - Fenced code highlighted with inline `style` attributes, so no extra stylesheet is needed
//!
//! Raw HTML in the source is passed through unchanged.

use crate::error::ConvertError;
use crate::format::MarkdownToHtml;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{markdown_to_html_with_plugins, ComrakOptions, ComrakPlugins};
use tracing::debug;

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Default [`MarkdownToHtml`] implementation.
#[derive(Debug, Clone)]
pub struct MarkdownFormat {
    highlight: bool,
}

impl Default for MarkdownFormat {
    fn default() -> Self {
        Self { highlight: true }
    }
}

impl MarkdownFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable syntax highlighting of fenced code blocks.
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

impl MarkdownToHtml for MarkdownFormat {
    fn markdown_to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        let options = default_comrak_options();
        let adapter = SyntectAdapter::new(Some(HIGHLIGHT_THEME));
        let mut plugins = ComrakPlugins::default();
        if self.highlight {
            plugins.render.codefence_syntax_highlighter = Some(&adapter);
        }

        let html = markdown_to_html_with_plugins(markdown, &options, &plugins);
        debug!(bytes = html.len(), highlight = self.highlight, "markdown rendered");
        Ok(html)
    }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    options.extension.header_ids = Some(String::new());
    options.parse.smart = true;
    options.render.unsafe_ = true;
    options
}
