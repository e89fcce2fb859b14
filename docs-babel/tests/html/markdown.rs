//! HTML → Markdown on the kind of markup the DOCX reader emits.

use docs_babel::formats::{HtmlMarkdownFormat, MarkdownOptions};
use docs_babel::HtmlToMarkdown;
use comrak::nodes::NodeValue;
use comrak::{parse_document, Arena, ComrakOptions};
use insta::assert_snapshot;

fn to_markdown(html: &str) -> String {
    HtmlMarkdownFormat::default().html_to_markdown(html).unwrap()
}

#[test]
fn test_reader_style_document() {
    let html = "<h1>Quarterly Report</h1><p>Revenue <em>grew</em> by <strong>12%</strong>.</p>\
                <ul><li>North<ul><li>Oslo</li></ul></li><li>South</li></ul>\
                <p><a href=\"https://example.com/q3\">Details</a></p>\
                <table><tr><td><p>Region</p></td><td><p>Sales</p></td></tr>\
                <tr><td><p>North</p></td><td><p>10</p></td></tr></table>";

    assert_snapshot!(to_markdown(html), @r###"
    # Quarterly Report

    Revenue *grew* by **12%**.

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
fn test_full_document_head_is_dropped() {
    let html = "<!DOCTYPE html><html><head><title>Ignored</title><style>p{}</style></head>\
                <body><p>Kept</p></body></html>";
    assert_eq!(to_markdown(html), "Kept\n");
}

#[test]
fn test_protected_links_survive_wrapping() {
    let options = MarkdownOptions {
        body_width: 30,
        ..MarkdownOptions::default()
    };
    let html = "<p>Read the <a href=\"https://example.com/a/very/long/path\">full quarterly report</a> today</p>";
    let markdown = HtmlMarkdownFormat::new(options)
        .html_to_markdown(html)
        .unwrap();

    assert!(markdown.contains("(<https://example.com/a/very/long/path>)"));
    assert!(markdown.lines().count() > 1);
}

#[test]
fn test_conversion_is_deterministic() {
    let html = "<h2>A</h2><ol><li>x</li><li>y</li></ol><p>tail</p>";
    assert_eq!(to_markdown(html), to_markdown(html));
}

#[test]
fn test_markdown_syntax_in_text_stays_literal() {
    let html = "<p>Price is *not* final; ask _legal_ before `quoting` it. \
                <strong>x</strong>[1](y)</p>";
    let markdown = to_markdown(html);

    let arena = Arena::new();
    let root = parse_document(&arena, &markdown, &ComrakOptions::default());
    let kinds: Vec<_> = root
        .descendants()
        .map(|n| n.data.borrow().value.clone())
        .collect();

    assert!(!kinds.iter().any(|v| matches!(v, NodeValue::Emph)));
    assert!(!kinds.iter().any(|v| matches!(v, NodeValue::Link(_))));
    assert!(!kinds.iter().any(|v| matches!(v, NodeValue::Code(_))));
    assert_eq!(
        kinds
            .iter()
            .filter(|v| matches!(v, NodeValue::Strong))
            .count(),
        1
    );

    let text: String = root
        .descendants()
        .filter_map(|n| match &n.data.borrow().value {
            NodeValue::Text(t) => Some(t.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        text,
        "Price is *not* final; ask _legal_ before `quoting` it. x[1](y)"
    );
}
