//! User path resolution
//!
//! Paths typed on the command line or written in a config file may start with `~`. Relative
//! command-line paths are taken from the working directory, relative config paths from the
//! directory of the config file. The library only ever sees absolute paths.

use std::fs;
use std::path::{Path, PathBuf};

/// Expand a leading `~` and make the path absolute.
///
/// Existing paths are canonicalized (symlinks resolved); paths that do not exist yet, such as
/// an output file, are made absolute against the current directory.
pub fn resolve_user_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    absolutize(Path::new(expanded.as_ref()))
}

/// Like [`resolve_user_path`], but a relative path is joined onto `config_dir`.
pub fn resolve_config_path(raw: &str, config_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = Path::new(expanded.as_ref());
    if path.is_relative() {
        absolutize(&config_dir.join(path))
    } else {
        absolutize(path)
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.exists() {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    } else {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
