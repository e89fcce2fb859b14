//! Format implementations
//!
//! Default implementations of the transducer traits in [`crate::format`].

pub mod docx;
pub mod html;
pub mod markdown;
#[cfg(feature = "native-export")]
pub mod pdf;

pub use docx::DocxFormat;
pub use html::{HtmlMarkdownFormat, MarkdownOptions};
pub use markdown::MarkdownFormat;
#[cfg(feature = "native-export")]
pub use pdf::ChromeRenderer;
