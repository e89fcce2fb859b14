//! DOCX → HTML
//!
//! Reads a WordprocessingML package and produces semantic HTML: headings, paragraphs,
//! inline formatting, links, lists, tables and embedded images. Presentation (fonts,
//! colours, spacing) is dropped on purpose; the HTML only carries structure.
//!
//! # Library Choice
//!
//! The container is opened with `zip` and each XML part is parsed with `roxmltree`, a
//! read-only tree that is cheap to walk with namespace-aware lookups. Output nodes are
//! built as an `markup5ever_rcdom` tree and serialized with `html5ever`, the same way the
//! HTML side of this crate handles markup.
//!
//!     package.rs   ZIP entries, styles, numbering, relationships, media
//!     body.rs      w:body walk → RcDom
//!
//! # Warnings
//!
//! Anything that loses information without being fatal (an unknown paragraph style, an
//! image type browsers will not show, a dangling relationship) is reported as a
//! [`ConversionWarning`](crate::format::ConversionWarning). Each distinct warning is
//! reported once, in the order it was first seen.

mod body;
mod package;

use crate::error::ConvertError;
use crate::format::{DocxHtml, DocxReader};
use crate::formats::html::serialize_children;
use body::BodyConverter;
use package::{wml, DocxPackage};
use tracing::debug;

/// Default [`DocxReader`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxFormat;

impl DocxFormat {
    pub fn new() -> Self {
        Self
    }
}

impl DocxReader for DocxFormat {
    fn read_docx(&self, bytes: &[u8]) -> Result<DocxHtml, ConvertError> {
        let package = DocxPackage::open(bytes)?;
        let document = roxmltree::Document::parse(&package.document)
            .map_err(|e| ConvertError::Docx(format!("word/document.xml: {e}")))?;
        let body = wml(document.root_element(), "body").ok_or_else(|| {
            ConvertError::Docx("word/document.xml has no w:body element".to_string())
        })?;

        let (container, warnings) = BodyConverter::new(&package).convert(body);
        let html = serialize_children(&container)?;
        debug!(
            bytes = html.len(),
            warnings = warnings.len(),
            "DOCX converted to HTML"
        );
        Ok(DocxHtml { html, warnings })
    }
}
