//! Markdown → PDF with a stub renderer and, on Unix, a stub Chrome binary.

use docs_babel::{
    ConversionRequest, ConvertError, FileRole, MarkdownToPdf, PdfRenderer, Pipeline, Stylesheet,
};
use std::fs;
use tempfile::tempdir;
use url::Url;

struct PanickingRenderer;

impl PdfRenderer for PanickingRenderer {
    fn render_pdf(&self, _: &str, _: &Url, _: &[Stylesheet]) -> Result<Vec<u8>, ConvertError> {
        panic!("renderer must not run");
    }
}

#[test]
fn test_missing_css_is_reported_before_rendering() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Notes\n").unwrap();

    let err = MarkdownToPdf::with_renderer(Box::new(PanickingRenderer))
        .convert(&ConversionRequest::new(&input).with_css(dir.path().join("missing.css")))
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::FileNotFound {
            role: FileRole::Stylesheet,
            ..
        }
    ));
}

#[test]
fn test_missing_input_is_reported_first() {
    let dir = tempdir().unwrap();
    let err = MarkdownToPdf::with_renderer(Box::new(PanickingRenderer))
        .convert(
            &ConversionRequest::new(dir.path().join("absent.md"))
                .with_css(dir.path().join("missing.css")),
        )
        .unwrap_err();
    assert!(err.to_string().starts_with("Input file not found: "));
}

#[cfg(all(unix, feature = "native-export"))]
mod unix {
    use super::*;
    use docs_babel::default_css;
    use docs_babel::formats::ChromeRenderer;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Stub that writes a minimal PDF and keeps a copy of the HTML it was asked to print.
    fn write_stub_chrome(dir: &Path, html_copy: &Path) -> PathBuf {
        let script_path = dir.join("fake-chrome.sh");
        let script = format!(
            r#"#!/bin/sh
OUTPUT=""
for arg in "$@"; do
  case $arg in
    --print-to-pdf=*)
      OUTPUT="${{arg#*=}}"
      ;;
    file://*)
      cp "${{arg#file://}}" "{copy}"
      ;;
  esac
done
if [ -z "$OUTPUT" ]; then
  echo "missing output" >&2
  exit 1
fi
printf '%%PDF-1.7\n%%%%EOF\n' > "$OUTPUT"
exit 0
"#,
            copy = html_copy.display()
        );
        fs::write(&script_path, script).unwrap();
        let mut perms = fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script_path, perms).unwrap();
        script_path
    }

    fn pipeline(chrome: &Path) -> MarkdownToPdf {
        MarkdownToPdf::with_renderer(Box::new(ChromeRenderer::with_binary(chrome)))
    }

    #[test]
    fn test_default_stylesheet_only() {
        let dir = tempdir().unwrap();
        let html_copy = dir.path().join("printed.html");
        let chrome = write_stub_chrome(dir.path(), &html_copy);
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n\n| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();

        let conversion = pipeline(&chrome)
            .convert(&ConversionRequest::new(&input))
            .unwrap();

        assert_eq!(conversion.output, dir.path().join("notes.pdf"));
        let pdf = fs::read(&conversion.output).unwrap();
        assert!(!pdf.is_empty());
        assert!(pdf.starts_with(b"%PDF-"));

        let printed = fs::read_to_string(&html_copy).unwrap();
        assert_eq!(printed.matches("<style>").count(), 1);
        assert!(printed.contains(default_css()));
        assert!(printed.contains("<title>notes</title>"));
        assert!(printed.contains("<base href=\"file://"));
        assert!(printed.contains("<table>"));
    }

    #[test]
    fn test_user_stylesheet_only() {
        let dir = tempdir().unwrap();
        let html_copy = dir.path().join("printed.html");
        let chrome = write_stub_chrome(dir.path(), &html_copy);
        let input = dir.path().join("notes.markdown");
        let css = dir.path().join("print.css");
        fs::write(&input, "Hello\n").unwrap();
        fs::write(&css, "body { font-family: serif; }\n").unwrap();

        let output = dir.path().join("build/out.pdf");
        let conversion = pipeline(&chrome)
            .convert(
                &ConversionRequest::new(&input)
                    .with_output(&output)
                    .with_css(&css),
            )
            .unwrap();

        assert_eq!(conversion.output, output);
        assert!(fs::read(&output).unwrap().starts_with(b"%PDF-"));
        let printed = fs::read_to_string(&html_copy).unwrap();
        assert_eq!(printed.matches("<style>").count(), 1);
        assert!(printed.contains("body { font-family: serif; }"));
        assert!(!printed.contains("@page { size: A4"));
    }

    #[test]
    fn test_failing_chrome_is_render_error() {
        let dir = tempdir().unwrap();
        let chrome = dir.path().join("broken-chrome.sh");
        fs::write(&chrome, "#!/bin/sh\necho 'no display' >&2\nexit 3\n").unwrap();
        fs::set_permissions(&chrome, fs::Permissions::from_mode(0o755)).unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "text\n").unwrap();

        let err = pipeline(&chrome)
            .convert(&ConversionRequest::new(&input))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Render(_)));
        assert!(err.to_string().contains("no display"));
        assert!(!dir.path().join("notes.pdf").exists());
    }
}
