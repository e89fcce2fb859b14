//! HTML → Markdown
//!
//! This module flattens an HTML tree into Markdown text. It is the second stage of the
//! docx-to-md pipeline, fed by the HTML the DOCX reader produces.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for parsing, so malformed markup is
//! repaired the way a browser would before we walk it. The DOM is then mapped onto a `comrak`
//! AST and printed with `format_commonmark` (see ./writer.rs), which owns escaping, list
//! markers, table layout and line wrapping.
//!
//! # Element Mapping Table
//!
//! | HTML                         | Markdown                         | Notes                                  |
//! |------------------------------|----------------------------------|----------------------------------------|
//! | `h1`…`h6`                    | `#`…`######`                     | breaks inside become spaces            |
//! | `p`, `div`, `section`        | paragraph                        | blank line between blocks              |
//! | `strong`/`b`, `em`/`i`       | `**x**`, `*x*`                   | surrounding spaces moved outside       |
//! | `code`                       | `` `x` ``                        |                                        |
//! | `s`/`del`/`strike`           | `~x~`                            |                                        |
//! | `sup`/`sub`                  | `<sup>x</sup>`, `<sub>x</sub>`   | kept as inline HTML                    |
//! | `a href`                     | `[x](href)` / `[x](<href>)`      | `<>` form when links are protected     |
//! | `img`                        | `![alt](src)`                    | alt text only when images are ignored  |
//! | `ul`/`ol` + `li`             | `* x` / `1.  x`                  | nested lists indented under the marker |
//! | `pre`                        | fenced code block                | `language-*` class → info string       |
//! | `blockquote`                 | `> x`                            |                                        |
//! | `table`                      | pipe table                       | first row is the header                |
//! | `hr`                         | `-----`                          |                                        |
//! | `br`                         | hard break (`\` at line end)     |                                        |
//!
//! `head`, `script`, `style` and `template` contents are dropped.

mod dom;
mod writer;

pub(crate) use dom::{append, create_element, create_text, html_escape, serialize_children, tag_name};

use crate::error::ConvertError;
use crate::format::HtmlToMarkdown;
use tracing::debug;

/// Knobs of the HTML → Markdown transducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Drop link targets and keep the link text
    pub ignore_links: bool,
    /// Drop images and keep their alt text
    pub ignore_images: bool,
    /// Write link targets as `<href>` so wrapping never splits them
    pub protect_links: bool,
    /// Wrap paragraphs at this column; 0 disables wrapping
    pub body_width: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            ignore_links: false,
            ignore_images: false,
            protect_links: true,
            body_width: 0,
        }
    }
}

/// Default [`HtmlToMarkdown`] implementation.
#[derive(Debug, Clone, Default)]
pub struct HtmlMarkdownFormat {
    options: MarkdownOptions,
}

impl HtmlMarkdownFormat {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }
}

impl HtmlToMarkdown for HtmlMarkdownFormat {
    fn html_to_markdown(&self, html: &str) -> Result<String, ConvertError> {
        let dom = dom::parse_html(html);
        let markdown = writer::write_markdown(&dom.document, &self.options)?;
        debug!(bytes = markdown.len(), "HTML converted to markdown");
        Ok(markdown)
    }
}
