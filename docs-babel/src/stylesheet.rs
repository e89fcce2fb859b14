//! Stylesheet selection for PDF export
//!
//! Exactly one stylesheet is applied per Markdown → PDF conversion: the user file when one is
//! given, otherwise the built-in print stylesheet. The two are never merged.

use crate::error::{ConvertError, FileRole};
use crate::paths::require_existing;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CSS: &str = include_str!("../css/default.css");

/// The built-in print stylesheet (A4 page, sans-serif body, bordered tables).
pub fn default_css() -> &'static str {
    DEFAULT_CSS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    /// Built-in print rules
    Default,
    /// Contents of a user-supplied CSS file
    User { path: PathBuf, text: String },
}

impl Stylesheet {
    /// Select the stylesheet for a conversion.
    ///
    /// A given path must exist; its contents replace the default entirely.
    pub fn select(css_path: Option<&Path>) -> Result<Self, ConvertError> {
        match css_path {
            None => Ok(Stylesheet::Default),
            Some(path) => {
                require_existing(path, FileRole::Stylesheet)?;
                let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
                Ok(Stylesheet::User {
                    path: path.to_path_buf(),
                    text,
                })
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Stylesheet::Default => DEFAULT_CSS,
            Stylesheet::User { text, .. } => text,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Stylesheet::Default)
    }
}
