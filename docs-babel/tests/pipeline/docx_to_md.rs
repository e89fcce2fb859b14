//! End-to-end DOCX → Markdown through the real transducers.

use crate::common::DocxBuilder;
use docs_babel::{ConversionRequest, ConvertError, DocxToMarkdown, Pipeline, PipelineRegistry};
use insta::assert_snapshot;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use tempfile::tempdir;

static HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6}) \S").unwrap());

fn heading_levels(markdown: &str) -> Vec<usize> {
    HEADING_LINE
        .captures_iter(markdown)
        .map(|c| c[1].len())
        .collect()
}

#[test]
fn test_report_document() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.docx");
    DocxBuilder::new()
        .heading(1, "Quarterly Report")
        .paragraph("Revenue grew.")
        .bold_paragraph("Total: ", "42")
        .bullet(0, "North")
        .bullet(1, "Oslo")
        .bullet(0, "South")
        .link("Details", "https://example.com/q3")
        .table(&[&["Region", "Sales"], &["North", "10"]])
        .write_to(&input);

    let conversion = DocxToMarkdown::default()
        .convert(&ConversionRequest::new(&input))
        .unwrap();

    assert_eq!(conversion.output, dir.path().join("report.md"));
    assert!(conversion.warnings.is_empty());
    assert_snapshot!(fs::read_to_string(&conversion.output).unwrap(), @r###"
    # Quarterly Report

    Revenue grew.

    Total: **42**

    * North
      * Oslo
    * South

    [Details](<https://example.com/q3>)

    | Region | Sales |
    | --- | --- |
    | North | 10 |
    "###);
}

#[test]
fn test_headings_map_one_to_one() {
    let levels = [1u8, 2, 3, 2, 4, 5, 6, 1];
    let mut builder = DocxBuilder::new();
    for (i, level) in levels.iter().enumerate() {
        builder = builder
            .heading(*level, &format!("Section {i}"))
            .paragraph("Body text.");
    }

    let dir = tempdir().unwrap();
    let input = dir.path().join("outline.docx");
    builder.write_to(&input);

    let conversion = DocxToMarkdown::default()
        .convert(&ConversionRequest::new(&input))
        .unwrap();
    let markdown = fs::read_to_string(conversion.output).unwrap();

    let expected: Vec<usize> = levels.iter().map(|l| *l as usize).collect();
    assert_eq!(heading_levels(&markdown), expected);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.docx");
    let output = dir.path().join("out/notes.md");
    DocxBuilder::new()
        .heading(2, "Notes")
        .numbered(0, "one")
        .numbered(0, "two")
        .write_to(&input);

    let pipeline = DocxToMarkdown::default();
    let request = ConversionRequest::new(&input).with_output(&output);
    pipeline.convert(&request).unwrap();
    let first = fs::read(&output).unwrap();
    pipeline.convert(&request).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(second).unwrap(),
        "## Notes\n\n1.  one\n2.  two\n"
    );
}

#[test]
fn test_warnings_are_returned_in_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("styled.docx");
    DocxBuilder::new()
        .styled_paragraph("Title", "Title", "Cover")
        .styled_paragraph("Quote", "Quote", "Cited")
        .styled_paragraph("Title", "Title", "Again")
        .write_to(&input);

    let conversion = DocxToMarkdown::default()
        .convert(&ConversionRequest::new(&input))
        .unwrap();
    let messages: Vec<_> = conversion.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "warning: Unrecognised paragraph style: 'Title' (Style ID: Title)",
            "warning: Unrecognised paragraph style: 'Quote' (Style ID: Quote)",
        ]
    );
    assert_eq!(
        fs::read_to_string(conversion.output).unwrap(),
        "Cover\n\nCited\n\nAgain\n"
    );
}

#[test]
fn test_text_input_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.txt");
    fs::write(&input, "plain").unwrap();

    let registry = PipelineRegistry::default();
    let err = registry
        .get("docx-to-md")
        .unwrap()
        .convert(&ConversionRequest::new(&input))
        .unwrap_err();
    assert!(matches!(err, ConvertError::InvalidFormat(_)));
}

#[test]
fn test_corrupt_docx_is_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.docx");
    fs::write(&input, "not a zip").unwrap();

    let err = DocxToMarkdown::default()
        .convert(&ConversionRequest::new(&input))
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid DOCX: file is not a ZIP archive");
    assert!(!dir.path().join("broken.md").exists());
}
