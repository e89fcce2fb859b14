//! HTML DOM → comrak AST → Markdown
//!
//! The html5ever tree is mapped onto comrak nodes and printed with `format_commonmark`, so
//! escaping, list markers, tables and wrapping are comrak's. Our own code only decides which
//! nodes to build: whitespace collapsing, dropped elements, link and image filtering, and the
//! `<href>` form of protected links.

use super::dom::{attr, tag_name, text_content};
use super::MarkdownOptions;
use crate::error::ConvertError;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeLink,
    NodeList, NodeTable, NodeValue, TableAlignment,
};
use comrak::{format_commonmark, Arena, ComrakOptions, ListStyleType};
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;

const SKIPPED: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

const BLOCKS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

fn is_block(tag: &str) -> bool {
    BLOCKS.contains(&tag)
}

pub(crate) fn write_markdown(
    root: &Handle,
    options: &MarkdownOptions,
) -> Result<String, ConvertError> {
    let arena = Arena::new();
    let builder = AstBuilder {
        arena: &arena,
        options,
    };
    let document = builder.alloc(NodeValue::Document);
    builder.blocks(root, document);
    if document.first_child().is_none() {
        return Ok(String::new());
    }

    let mut output = Vec::new();
    format_commonmark(document, &comrak_options(options), &mut output)
        .map_err(|e| ConvertError::Markdown(format!("Comrak serialization failed: {e}")))?;
    let markdown = String::from_utf8(output)
        .map_err(|e| ConvertError::Markdown(format!("UTF-8 conversion failed: {e}")))?;

    // Comrak separates adjacent lists with an HTML comment
    Ok(markdown.replace("<!-- end list -->\n\n", ""))
}

fn comrak_options(options: &MarkdownOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = true;
    comrak.extension.strikethrough = true;
    comrak.render.width = options.body_width;
    comrak.render.list_style = ListStyleType::Star;
    comrak.render.prefer_fenced = true;
    comrak
}

struct AstBuilder<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    options: &'o MarkdownOptions,
}

impl<'a> AstBuilder<'a, '_> {
    fn alloc(&self, value: NodeValue) -> &'a AstNode<'a> {
        self.arena
            .alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
    }

    fn text(&self, text: &str) -> &'a AstNode<'a> {
        self.alloc(NodeValue::Text(text.to_string()))
    }

    fn html(&self, literal: &str) -> &'a AstNode<'a> {
        self.alloc(NodeValue::HtmlInline(literal.to_string()))
    }

    /// Block children of `node`; loose inline content is gathered into paragraphs.
    fn blocks(&self, node: &Handle, parent: &'a AstNode<'a>) {
        let mut paragraph: Option<&'a AstNode<'a>> = None;
        for child in node.children.borrow().iter() {
            match tag_name(child) {
                Some(tag) if SKIPPED.contains(&tag.as_str()) => {}
                Some(tag) if is_block(&tag) => {
                    close_inline_block(paragraph.take());
                    self.block(child, &tag, parent);
                }
                _ => {
                    let target = *paragraph.get_or_insert_with(|| {
                        let p = self.alloc(NodeValue::Paragraph);
                        parent.append(p);
                        p
                    });
                    self.inline(child, target);
                }
            }
        }
        close_inline_block(paragraph.take());
    }

    fn block(&self, node: &Handle, tag: &str, parent: &'a AstNode<'a>) {
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                let heading = self.alloc(NodeValue::Heading(NodeHeading {
                    level,
                    setext: false,
                }));
                parent.append(heading);
                self.children_inline(node, heading);
                self.flatten_breaks(heading);
                close_inline_block(Some(heading));
            }
            "ul" | "ol" => self.list(node, tag == "ol", parent),
            "li" => {
                let list = self.alloc(NodeValue::List(list_meta(false, 1)));
                let item = self.alloc(NodeValue::Item(list_meta(false, 1)));
                parent.append(list);
                list.append(item);
                self.blocks(node, item);
            }
            "pre" => parent.append(self.code_block(node)),
            "blockquote" => {
                let quote = self.alloc(NodeValue::BlockQuote);
                parent.append(quote);
                self.blocks(node, quote);
                if quote.first_child().is_none() {
                    quote.detach();
                }
            }
            "table" => self.table(node, parent),
            "hr" => parent.append(self.alloc(NodeValue::ThematicBreak)),
            _ => self.blocks(node, parent),
        }
    }

    fn inline(&self, node: &Handle, parent: &'a AstNode<'a>) {
        match &node.data {
            NodeData::Text { contents } => parent.append(self.text(&collapse(&contents.borrow()))),
            NodeData::Element { .. } => {
                let tag = tag_name(node).unwrap_or_default();
                match tag.as_str() {
                    t if SKIPPED.contains(&t) => {}
                    "br" => parent.append(self.alloc(NodeValue::LineBreak)),
                    "strong" | "b" => self.span(node, NodeValue::Strong, parent),
                    "em" | "i" => self.span(node, NodeValue::Emph, parent),
                    "s" | "del" | "strike" => self.span(node, NodeValue::Strikethrough, parent),
                    "sup" => self.raw_span(node, "<sup>", "</sup>", parent),
                    "sub" => self.raw_span(node, "<sub>", "</sub>", parent),
                    "code" | "kbd" | "samp" | "tt" => {
                        let code = collapse(&text_content(node));
                        let code = code.trim();
                        if !code.is_empty() {
                            parent.append(self.alloc(NodeValue::Code(NodeCode {
                                num_backticks: 1,
                                literal: code.to_string(),
                            })));
                        }
                    }
                    "a" => self.link(node, parent),
                    "img" => self.image(node, parent),
                    _ => self.children_inline(node, parent),
                }
            }
            _ => {}
        }
    }

    fn children_inline(&self, node: &Handle, parent: &'a AstNode<'a>) {
        for child in node.children.borrow().iter() {
            self.inline(child, parent);
        }
    }

    /// Emphasis-like container; edge spaces are moved outside the delimiters.
    fn span(&self, node: &Handle, value: NodeValue, parent: &'a AstNode<'a>) {
        let span = self.alloc(value);
        parent.append(span);
        self.children_inline(node, span);
        self.hoist_edge_spaces(span);
        if !has_content(span) {
            span.detach();
        }
    }

    /// `<sup>`/`<sub>` have no Markdown form and stay as inline HTML around their content.
    fn raw_span(&self, node: &Handle, open: &str, close: &str, parent: &'a AstNode<'a>) {
        parent.append(self.html(open));
        self.children_inline(node, parent);
        parent.append(self.html(close));
    }

    fn link(&self, node: &Handle, parent: &'a AstNode<'a>) {
        let href = attr(node, "href").filter(|h| !h.trim().is_empty());
        let href = match href {
            Some(href) if !self.options.ignore_links => href,
            _ => {
                self.children_inline(node, parent);
                return;
            }
        };

        let link = self.alloc(NodeValue::Link(NodeLink {
            url: href.clone(),
            title: String::new(),
        }));
        parent.append(link);
        self.children_inline(node, link);
        self.hoist_edge_spaces(link);
        if !has_content(link) {
            for child in link.children().collect::<Vec<_>>() {
                child.detach();
            }
            link.append(self.text(&href));
        }

        if self.options.protect_links {
            // Comrak has no `<href>` destination form; the label stays escaped text.
            link.insert_before(self.html("["));
            for child in link.children().collect::<Vec<_>>() {
                link.insert_before(child);
            }
            link.insert_before(self.html(&format!("](<{href}>)")));
            link.detach();
        }
    }

    fn image(&self, node: &Handle, parent: &'a AstNode<'a>) {
        let alt = collapse(&attr(node, "alt").unwrap_or_default());
        let alt = alt.trim();
        let src = attr(node, "src").unwrap_or_default();

        if self.options.ignore_images || src.is_empty() {
            parent.append(self.text(alt));
            return;
        }
        let image = self.alloc(NodeValue::Image(NodeLink {
            url: src,
            title: String::new(),
        }));
        image.append(self.text(alt));
        parent.append(image);
    }

    fn list(&self, node: &Handle, ordered: bool, parent: &'a AstNode<'a>) {
        let start = attr(node, "start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let list = self.alloc(NodeValue::List(list_meta(ordered, start)));
        parent.append(list);

        let mut number = start;
        let mut last_item: Option<&'a AstNode<'a>> = None;
        for child in node.children.borrow().iter() {
            match tag_name(child).as_deref() {
                Some("li") => {
                    let item = self.alloc(NodeValue::Item(list_meta(ordered, number)));
                    number += 1;
                    list.append(item);
                    self.blocks(child, item);
                    last_item = Some(item);
                }
                Some(tag @ ("ul" | "ol")) => {
                    // A list directly inside a list nests under the previous item.
                    let item = match last_item {
                        Some(item) => item,
                        None => {
                            let item = self.alloc(NodeValue::Item(list_meta(ordered, number)));
                            number += 1;
                            list.append(item);
                            last_item = Some(item);
                            item
                        }
                    };
                    self.list(child, tag == "ol", item);
                }
                _ => {}
            }
        }

        if list.first_child().is_none() {
            list.detach();
        }
    }

    fn code_block(&self, node: &Handle) -> &'a AstNode<'a> {
        let mut literal = text_content(node);
        while literal.ends_with('\n') {
            literal.pop();
        }
        literal.push('\n');

        let info = node
            .children
            .borrow()
            .iter()
            .find(|c| tag_name(c).as_deref() == Some("code"))
            .and_then(|c| attr(c, "class"))
            .and_then(|class| {
                class
                    .split_whitespace()
                    .find_map(|token| token.strip_prefix("language-").map(str::to_string))
            })
            .unwrap_or_default();

        self.alloc(NodeValue::CodeBlock(NodeCodeBlock {
            fenced: true,
            fence_char: b'`',
            fence_length: 3,
            fence_offset: 0,
            info,
            literal,
        }))
    }

    fn table(&self, node: &Handle, parent: &'a AstNode<'a>) {
        let mut rows: Vec<Vec<Handle>> = Vec::new();
        collect_rows(node, &mut rows);

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return;
        }

        let table = self.alloc(NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; width],
            num_columns: width,
            num_rows: rows.len(),
            num_nonempty_cells: 0,
        }));
        parent.append(table);

        let mut nonempty = 0;
        for (i, row) in rows.iter().enumerate() {
            let row_node = self.alloc(NodeValue::TableRow(i == 0));
            table.append(row_node);
            for index in 0..width {
                let cell = self.alloc(NodeValue::TableCell);
                row_node.append(cell);
                if let Some(source) = row.get(index) {
                    self.cell_inline(source, cell);
                    self.flatten_breaks(cell);
                    trim_spaces(cell);
                    if has_content(cell) {
                        nonempty += 1;
                    }
                }
            }
        }

        if let NodeValue::Table(ref mut meta) = table.data.borrow_mut().value {
            meta.num_nonempty_cells = nonempty;
        }
    }

    /// Cell content flattened to one line; paragraphs are joined by a space.
    fn cell_inline(&self, node: &Handle, cell: &'a AstNode<'a>) {
        for child in node.children.borrow().iter() {
            match tag_name(child) {
                Some(tag) if SKIPPED.contains(&tag.as_str()) => {}
                Some(tag) if is_block(&tag) => {
                    cell.append(self.text(" "));
                    self.cell_inline(child, cell);
                }
                _ => self.inline(child, cell),
            }
        }
    }

    /// Headings and table cells are single-line.
    fn flatten_breaks(&self, node: &'a AstNode<'a>) {
        for descendant in node.descendants() {
            let mut ast = descendant.data.borrow_mut();
            if matches!(ast.value, NodeValue::LineBreak) {
                ast.value = NodeValue::Text(" ".to_string());
            }
        }
    }

    fn hoist_edge_spaces(&self, span: &'a AstNode<'a>) {
        let texts: Vec<_> = span
            .descendants()
            .filter(|n| matches!(n.data.borrow().value, NodeValue::Text(_)))
            .collect();
        let (Some(first), Some(last)) = (texts.first(), texts.last()) else {
            return;
        };

        if strip_text(first, |t| t.strip_prefix(' ')) {
            span.insert_before(self.text(" "));
        }
        if strip_text(last, |t| t.strip_suffix(' ')) {
            span.insert_after(self.text(" "));
        }
    }
}

fn list_meta(ordered: bool, start: usize) -> NodeList {
    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start,
        delimiter: ListDelimType::Period,
        bullet_char: b'*',
        tight: true,
    }
}

fn collect_rows(node: &Handle, rows: &mut Vec<Vec<Handle>>) {
    for child in node.children.borrow().iter() {
        match tag_name(child).as_deref() {
            Some("tr") => rows.push(
                child
                    .children
                    .borrow()
                    .iter()
                    .filter(|c| matches!(tag_name(c).as_deref(), Some("td") | Some("th")))
                    .cloned()
                    .collect(),
            ),
            Some("thead") | Some("tbody") | Some("tfoot") => collect_rows(child, rows),
            _ => {}
        }
    }
}

/// HTML whitespace rules: any run of whitespace becomes one space.
fn collapse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_whitespace() && ch != '\u{a0}' {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Apply `strip` to a text node; true when `strip` matched.
fn strip_text<'a>(node: &'a AstNode<'a>, strip: impl Fn(&str) -> Option<&str>) -> bool {
    let mut ast = node.data.borrow_mut();
    if let NodeValue::Text(ref mut text) = ast.value {
        if let Some(rest) = strip(text).map(str::to_string) {
            *text = rest;
            return true;
        }
    }
    false
}

fn has_content<'a>(node: &'a AstNode<'a>) -> bool {
    node.descendants().skip(1).any(|n| match &n.data.borrow().value {
        NodeValue::Text(text) => !text.trim().is_empty(),
        NodeValue::Code(_) | NodeValue::Image(_) | NodeValue::HtmlInline(_) => true,
        _ => false,
    })
}

/// Finish a paragraph or heading; an empty one is removed.
fn close_inline_block<'a>(block: Option<&'a AstNode<'a>>) {
    let Some(block) = block else {
        return;
    };
    trim_spaces(block);
    if !has_content(block) {
        block.detach();
    }
}

/// Drop spaces the browser would not render: at the start and end of the block, after
/// another space, and around hard breaks.
fn trim_spaces<'a>(block: &'a AstNode<'a>) {
    let mut after_space = true;
    let mut last_text: Option<&'a AstNode<'a>> = None;
    for node in block.descendants() {
        let is_break = {
            let mut ast = node.data.borrow_mut();
            match ast.value {
                NodeValue::Text(ref mut text) => {
                    if after_space {
                        *text = text.trim_start_matches(' ').to_string();
                    }
                    if !text.is_empty() {
                        after_space = text.ends_with(' ');
                        last_text = Some(node);
                    }
                    false
                }
                NodeValue::LineBreak => true,
                NodeValue::Code(_) | NodeValue::Image(_) | NodeValue::HtmlInline(_) => {
                    after_space = false;
                    last_text = None;
                    false
                }
                _ => false,
            }
        };
        if is_break {
            if let Some(text) = last_text.take() {
                strip_text(text, |t| Some(t.trim_end_matches(' ')));
            }
            after_space = true;
        }
    }
    if let Some(text) = last_text {
        strip_text(text, |t| Some(t.trim_end_matches(' ')));
    }
}
