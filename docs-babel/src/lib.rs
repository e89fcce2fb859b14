//! Document conversion pipelines: DOCX → Markdown and Markdown → PDF
//!
//!     This crate powers the `docs` command line tool. It is a pure lib: no code here prints to
//!     stdout/stderr or reads process arguments. Non-fatal findings are returned as data
//!     ([`ConversionWarning`]) and the shell decides how to show them.
//!
//! Architecture
//!
//!     Each conversion is a linear pipeline of two transducers with an HTML intermediate:
//!
//!     - docx-to-md:  DOCX bytes → [`DocxReader`] → HTML → [`HtmlToMarkdown`] → Markdown text
//!     - md-to-pdf:   Markdown text → [`MarkdownToHtml`] → HTML fragment → document shell
//!                    → [`PdfRenderer`] (+ one stylesheet) → PDF bytes
//!
//!     The transducer traits live in ./format.rs. Every trait has a default implementation in
//!     ./formats, and pipelines accept boxed trait objects so tests can swap any stage.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError
//!     ├── format.rs               # Transducer traits, warnings, serialized output
//!     ├── registry.rs             # PipelineRegistry for discovery and selection
//!     ├── paths.rs                # Extension checks, output path derivation, writing
//!     ├── stylesheet.rs           # Default / user stylesheet selection
//!     ├── formats
//!     │   ├── docx                # zip + roxmltree → HTML
//!     │   ├── html                # html5ever DOM → comrak AST → Markdown
//!     │   ├── markdown            # comrak Markdown → HTML
//!     │   └── pdf                 # headless Chrome HTML → PDF
//!     └── pipeline
//!         ├── docx_to_md.rs
//!         └── md_to_pdf.rs
//!
//! Library Choices
//!
//!     We never write a format parser when a crate does the job: comrak for Markdown, html5ever
//!     for HTML, roxmltree over the zip container for WordprocessingML. PDF layout is left to a
//!     browser engine; we only assemble the document and the stylesheet it is printed with.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod paths;
pub mod pipeline;
pub mod registry;
pub mod stylesheet;

pub use error::{ConvertError, FileRole};
pub use format::{
    ConversionWarning, DocxHtml, DocxReader, HtmlToMarkdown, MarkdownToHtml, PdfRenderer,
    SerializedDocument, WarningKind,
};
pub use pipeline::{Conversion, ConversionRequest, DocxToMarkdown, MarkdownToPdf};
pub use registry::{Pipeline, PipelineRegistry};
pub use stylesheet::{default_css, Stylesheet};
