//! Minimal DOCX packages for CLI tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
</w:styles>"#;

/// Paragraph XML: `Some(style)` for a styled paragraph, `None` for body text.
pub fn paragraph(style: Option<&str>, text: &str) -> String {
    let props = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p>{props}<w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn write_docx(path: &Path, paragraphs: &[String]) {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("word/document.xml", options).unwrap();
    write!(
        zip,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        paragraphs.concat()
    )
    .unwrap();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(STYLES.as_bytes()).unwrap();

    let bytes = zip.finish().unwrap().into_inner();
    std::fs::write(path, bytes).unwrap();
}

pub fn sample_docx(path: &Path) {
    write_docx(
        path,
        &[
            paragraph(Some("Heading1"), "Report"),
            paragraph(None, "First paragraph."),
            paragraph(Some("Heading2"), "Details"),
            paragraph(None, "Second paragraph."),
        ],
    );
}
