//! PDF rendering through headless Chrome.
//!
//! The HTML document is written to a temporary directory together with its `<base>` and
//! `<style>` elements, then a Chrome/Chromium binary running in headless mode prints it to
//! PDF. Relative references in the Markdown (images, links) resolve against the base URL,
//! which points at the directory of the source file.

use crate::error::ConvertError;
use crate::format::PdfRenderer;
use crate::formats::html::html_escape;
use crate::stylesheet::Stylesheet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;
use tracing::debug;
use url::Url;
use which::which;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// [`PdfRenderer`] that shells out to Chrome/Chromium.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    binary: Option<PathBuf>,
}

impl ChromeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this binary instead of searching the environment and `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }

    fn chrome(&self) -> Result<PathBuf, ConvertError> {
        match &self.binary {
            Some(path) => Ok(path.clone()),
            None => resolve_chrome_binary(),
        }
    }
}

impl PdfRenderer for ChromeRenderer {
    fn render_pdf(
        &self,
        html: &str,
        base_url: &Url,
        stylesheets: &[Stylesheet],
    ) -> Result<Vec<u8>, ConvertError> {
        let chrome = self.chrome()?;
        let document = inject_head(html, base_url, stylesheets);
        let bytes = render_html_to_pdf(&chrome, &document)?;
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ConvertError::Render(format!(
                "{} did not produce a PDF document",
                chrome.display()
            )));
        }
        debug!(bytes = bytes.len(), chrome = %chrome.display(), "PDF rendered");
        Ok(bytes)
    }
}

/// Insert `<base href>` and one `<style>` per stylesheet right before `</head>`.
pub fn inject_head(html: &str, base_url: &Url, stylesheets: &[Stylesheet]) -> String {
    let mut head = format!("<base href=\"{}\" />\n", html_escape(base_url.as_str()));
    for sheet in stylesheets {
        head.push_str("<style>\n");
        head.push_str(sheet.text());
        head.push_str("\n</style>\n");
    }

    match html.find("</head>") {
        Some(idx) => {
            let mut output = String::with_capacity(html.len() + head.len());
            output.push_str(&html[..idx]);
            output.push_str(&head);
            output.push_str(&html[idx..]);
            output
        }
        None => format!("{head}{html}"),
    }
}

fn render_html_to_pdf(chrome: &Path, html: &str) -> Result<Vec<u8>, ConvertError> {
    let temp_dir =
        tempdir().map_err(|e| ConvertError::Render(format!("temp dir error: {e}")))?;
    let html_path = temp_dir.path().join("document.html");
    fs::write(&html_path, html).map_err(|e| ConvertError::io(&html_path, e))?;

    let pdf_path = temp_dir.path().join("document.pdf");
    let file_url = Url::from_file_path(&html_path).map_err(|_| {
        ConvertError::Render("failed to construct file:// URL for HTML input".to_string())
    })?;

    debug!(chrome = %chrome.display(), url = %file_url, "launching headless Chrome");
    let output = Command::new(chrome)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--print-to-pdf-no-header")
        .arg(format!("--print-to-pdf={}", pdf_path.display()))
        .arg(file_url.as_str())
        .output()
        .map_err(|e| {
            ConvertError::Render(format!(
                "failed to launch Chrome ({}): {e}",
                chrome.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().rev().find(|l| !l.trim().is_empty());
        return Err(ConvertError::Render(match detail {
            Some(line) => format!("Chrome exited with {}: {}", output.status, line.trim()),
            None => format!("Chrome exited with {}", output.status),
        }));
    }

    fs::read(&pdf_path).map_err(|e| {
        ConvertError::Render(format!("Chrome did not write {}: {e}", pdf_path.display()))
    })
}

fn resolve_chrome_binary() -> Result<PathBuf, ConvertError> {
    for var in ["DOCS_CHROME_BIN", "GOOGLE_CHROME_BIN", "CHROME_BIN"] {
        if let Some(path) = env::var_os(var) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    for candidate in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
        "msedge",
    ] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    #[cfg(target_os = "macos")]
    {
        let candidates = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let candidates = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
        ];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    Err(ConvertError::Render(
        "unable to locate a Chrome/Chromium binary; set DOCS_CHROME_BIN or convert.pdf.chrome"
            .to_string(),
    ))
}
