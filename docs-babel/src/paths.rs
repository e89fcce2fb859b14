//! Path conventions shared by the pipelines
//!
//! Input validation (existence, extension), default output path derivation and writing the
//! final artifact. Resolution of user-typed paths (`~`, relative) belongs to the shell.

use crate::error::{ConvertError, FileRole};
use crate::format::SerializedDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether `path` has one of `extensions` (without the dot), compared case-insensitively.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Ensure `path` exists, or fail with [`ConvertError::FileNotFound`] for `role`.
pub fn require_existing(path: &Path, role: FileRole) -> Result<(), ConvertError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConvertError::FileNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}

/// Replace the extension of `input` with `extension`.
///
/// `report.docx` → `report.md`, `notes.markdown` → `notes.pdf`.
pub fn derive_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Resolve the single output path of a request.
///
/// Without an explicit output the path is derived from the input. An explicit output gets its
/// parent directory created.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    extension: &str,
) -> Result<PathBuf, ConvertError> {
    match output {
        None => Ok(derive_output_path(input, extension)),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
                }
            }
            Ok(path.to_path_buf())
        }
    }
}

/// Write the artifact, replacing any existing file.
pub fn write_output(path: &Path, document: SerializedDocument) -> Result<(), ConvertError> {
    fs::write(path, document.into_bytes()).map_err(|e| ConvertError::io(path, e))
}
