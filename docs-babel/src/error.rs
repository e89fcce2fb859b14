//! Error types for conversion pipelines

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which file a [`ConvertError::FileNotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Input,
    Stylesheet,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Input => write!(f, "Input"),
            FileRole::Stylesheet => write!(f, "CSS"),
        }
    }
}

/// Fatal errors raised by a pipeline or one of its transducers.
///
/// Non-fatal findings are not errors; see [`crate::ConversionWarning`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input or stylesheet path does not exist
    #[error("{role} file not found: {}", path.display())]
    FileNotFound { role: FileRole, path: PathBuf },

    /// Input extension does not match what the pipeline accepts
    #[error("{0}")]
    InvalidFormat(String),

    /// The DOCX container or one of its XML parts could not be read
    #[error("Invalid DOCX: {0}")]
    Docx(String),

    /// HTML could not be turned into Markdown
    #[error("Markdown conversion failed: {0}")]
    Markdown(String),

    /// The HTML → PDF renderer failed
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// Reading the input or writing the output failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Pipeline not found in registry
    #[error("Pipeline '{0}' not found")]
    PipelineNotFound(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
