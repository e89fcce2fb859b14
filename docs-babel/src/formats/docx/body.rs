//! WordprocessingML body → HTML DOM
//!
//! Walks `w:body` once, building RcDom nodes directly. Block-level state is limited to the
//! stack of open lists; everything else is decided per paragraph or per run.

use super::package::{numbering_props, wml, wml_val, DocxPackage, DML_NS, REL_NS, VML_NS, WML_NS, WPD_NS};
use crate::format::ConversionWarning;
use crate::formats::html::{append, create_element, create_text, tag_name};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use markup5ever_rcdom::Handle;
use roxmltree::Node;
use std::collections::HashSet;

const OFFICE_NS: &str = "urn:schemas-microsoft-com:office:office";

/// Image types browsers render without plugins.
const BROWSER_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/gif",
    "image/jpeg",
    "image/svg+xml",
    "image/tiff",
    "image/bmp",
    "image/webp",
];

/// Character styles that carry no meaning of their own.
const SILENT_RUN_STYLES: &[&str] = &["DefaultParagraphFont", "Hyperlink"];

/// An open `<ul>`/`<ol>` and the item new sub-lists attach to.
struct ListFrame {
    level: u32,
    ordered: bool,
    list: Handle,
    last_item: Option<Handle>,
}

pub(crate) struct BodyConverter<'p> {
    package: &'p DocxPackage,
    warnings: Vec<ConversionWarning>,
}

impl<'p> BodyConverter<'p> {
    pub fn new(package: &'p DocxPackage) -> Self {
        Self {
            package,
            warnings: Vec::new(),
        }
    }

    /// Convert `w:body` into a detached container element plus deduplicated warnings.
    pub fn convert(mut self, body: Node) -> (Handle, Vec<ConversionWarning>) {
        let container = create_element("div", vec![]);
        self.blocks(body, &container);

        let mut seen = HashSet::new();
        let warnings = self
            .warnings
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();
        (container, warnings)
    }

    fn blocks(&mut self, parent: Node, container: &Handle) {
        let mut lists = Vec::new();
        self.blocks_into(parent, container, &mut lists);
    }

    fn blocks_into(&mut self, parent: Node, container: &Handle, lists: &mut Vec<ListFrame>) {
        for node in parent
            .children()
            .filter(|n| n.tag_name().namespace() == Some(WML_NS))
        {
            match node.tag_name().name() {
                "p" => self.paragraph(node, container, lists),
                "tbl" => {
                    lists.clear();
                    self.table(node, container);
                }
                "sdt" => {
                    if let Some(content) = wml(node, "sdtContent") {
                        self.blocks_into(content, container, lists);
                    }
                }
                "ins" | "customXml" | "smartTag" => self.blocks_into(node, container, lists),
                _ => {}
            }
        }
    }

    fn paragraph(&mut self, node: Node, container: &Handle, lists: &mut Vec<ListFrame>) {
        let props = wml(node, "pPr");
        let style_id = props.and_then(|p| wml_val(p, "pStyle"));
        let style = style_id.and_then(|id| self.package.style(id));
        let is_heading = style_id
            .is_some_and(|id| heading_level(id, style.and_then(|s| s.name.as_deref())).is_some());

        // Direct numbering wins over the style's; numId 0 switches numbering off.
        let numbering = props
            .and_then(numbering_props)
            .or_else(|| style.and_then(|s| s.numbering.clone()))
            .filter(|(num_id, _)| num_id != "0");

        match numbering {
            Some((num_id, level)) if !is_heading => {
                let item = create_element("li", vec![]);
                self.inlines(node, &item);
                if item.children.borrow().is_empty() {
                    return;
                }
                let ordered = self.package.numbering.is_ordered(&num_id, level);
                push_list_item(container, lists, level, ordered, item);
            }
            _ => {
                let element = create_element(&self.paragraph_tag(style_id), vec![]);
                self.inlines(node, &element);
                if element.children.borrow().is_empty() {
                    return;
                }
                lists.clear();
                append(container, element);
            }
        }
    }

    fn paragraph_tag(&mut self, style_id: Option<&str>) -> String {
        let Some(id) = style_id else {
            return "p".to_string();
        };
        let name = self.package.style(id).and_then(|s| s.name.as_deref());
        if let Some(level) = heading_level(id, name) {
            return format!("h{level}");
        }
        let known = ["Normal", "ListParagraph"].contains(&id)
            || name.is_some_and(|n| {
                n.eq_ignore_ascii_case("normal") || n.eq_ignore_ascii_case("list paragraph")
            });
        if !known {
            self.warnings
                .push(ConversionWarning::warning(unrecognised("paragraph", id, name)));
        }
        "p".to_string()
    }

    fn inlines(&mut self, parent: Node, target: &Handle) {
        for node in parent
            .children()
            .filter(|n| n.tag_name().namespace() == Some(WML_NS))
        {
            match node.tag_name().name() {
                "r" => self.run(node, target),
                "hyperlink" => self.hyperlink(node, target),
                "ins" | "smartTag" | "customXml" | "fldSimple" | "dir" | "bdo" => {
                    self.inlines(node, target)
                }
                "sdt" => {
                    if let Some(content) = wml(node, "sdtContent") {
                        self.inlines(content, target);
                    }
                }
                // w:del, bookmarks, proofing marks, paragraph properties
                _ => {}
            }
        }
    }

    fn hyperlink(&mut self, node: Node, target: &Handle) {
        let anchor = node.attribute((WML_NS, "anchor"));
        let href = match node.attribute((REL_NS, "id")) {
            Some(rid) => self.package.relationships.get(rid).map(|rel| match anchor {
                Some(anchor) => format!("{}#{anchor}", rel.target),
                None => rel.target.clone(),
            }),
            None => anchor.map(|a| format!("#{a}")),
        };

        let Some(href) = href else {
            self.inlines(node, target);
            return;
        };
        let link = create_element("a", vec![("href", &href)]);
        self.inlines(node, &link);
        if !link.children.borrow().is_empty() {
            append(target, link);
        }
    }

    fn run(&mut self, node: Node, target: &Handle) {
        let mut tags = Vec::new();
        if let Some(props) = wml(node, "rPr") {
            let strong_style = self.run_style_is_strong(props);
            if toggle(props, "b") || strong_style {
                tags.push("strong");
            }
            if toggle(props, "i") {
                tags.push("em");
            }
            if toggle(props, "strike") || toggle(props, "dstrike") {
                tags.push("s");
            }
            match wml_val(props, "vertAlign") {
                Some("superscript") => tags.push("sup"),
                Some("subscript") => tags.push("sub"),
                _ => {}
            }
        }

        let content = self.run_content(node);
        if !content.is_empty() {
            append_formatted(target, &tags, content);
        }
    }

    /// Checks `w:rStyle`, warning about character styles we do not map.
    fn run_style_is_strong(&mut self, props: Node) -> bool {
        let Some(id) = wml_val(props, "rStyle") else {
            return false;
        };
        let name = self.package.style(id).and_then(|s| s.name.as_deref());
        if id == "Strong" || name.is_some_and(|n| n.eq_ignore_ascii_case("strong")) {
            return true;
        }
        if !SILENT_RUN_STYLES.contains(&id) {
            self.warnings
                .push(ConversionWarning::warning(unrecognised("run", id, name)));
        }
        false
    }

    fn run_content(&mut self, run: Node) -> Vec<Handle> {
        let mut out = Vec::new();
        let mut text = String::new();

        for child in run
            .children()
            .filter(|n| n.tag_name().namespace() == Some(WML_NS))
        {
            match child.tag_name().name() {
                "t" => text.push_str(child.text().unwrap_or("")),
                "tab" => text.push('\t'),
                "noBreakHyphen" => text.push('-'),
                "br" => {
                    if matches!(child.attribute((WML_NS, "type")), None | Some("textWrapping")) {
                        flush_text(&mut text, &mut out);
                        out.push(create_element("br", vec![]));
                    }
                }
                "cr" => {
                    flush_text(&mut text, &mut out);
                    out.push(create_element("br", vec![]));
                }
                "drawing" | "pict" | "object" => {
                    flush_text(&mut text, &mut out);
                    out.extend(self.images(child));
                }
                _ => {}
            }
        }
        flush_text(&mut text, &mut out);
        out
    }

    fn images(&mut self, node: Node) -> Vec<Handle> {
        let mut images = Vec::new();

        let alt = node
            .descendants()
            .find(|n| n.has_tag_name((WPD_NS, "docPr")))
            .and_then(|n| n.attribute("descr").or_else(|| n.attribute("title")))
            .unwrap_or("");
        for blip in node
            .descendants()
            .filter(|n| n.has_tag_name((DML_NS, "blip")))
        {
            let rid = blip
                .attribute((REL_NS, "embed"))
                .or_else(|| blip.attribute((REL_NS, "link")));
            if let Some(img) = rid.and_then(|rid| self.image(rid, alt)) {
                images.push(img);
            }
        }

        for data in node
            .descendants()
            .filter(|n| n.has_tag_name((VML_NS, "imagedata")))
        {
            let alt = data.attribute((OFFICE_NS, "title")).unwrap_or("");
            if let Some(img) = data
                .attribute((REL_NS, "id"))
                .and_then(|rid| self.image(rid, alt))
            {
                images.push(img);
            }
        }
        images
    }

    fn image(&mut self, rid: &str, alt: &str) -> Option<Handle> {
        let package = self.package;
        let Some(rel) = package.relationships.get(rid) else {
            self.warnings.push(ConversionWarning::error(format!(
                "Could not find image relationship: {rid}"
            )));
            return None;
        };

        let src = if rel.external {
            rel.target.clone()
        } else {
            let mime = image_mime(&rel.target);
            if !BROWSER_IMAGE_TYPES.contains(&mime) {
                self.warnings.push(ConversionWarning::warning(format!(
                    "Image of type {mime} is unlikely to display in web browsers"
                )));
            }
            let Some(data) = package.media(&rel.target) else {
                self.warnings.push(ConversionWarning::error(format!(
                    "Could not find image file: {}",
                    rel.target
                )));
                return None;
            };
            format!("data:{mime};base64,{}", STANDARD.encode(data))
        };

        let mut attrs = vec![("src", src.as_str())];
        if !alt.is_empty() {
            attrs.push(("alt", alt));
        }
        Some(create_element("img", attrs))
    }

    fn table(&mut self, node: Node, container: &Handle) {
        let table = create_element("table", vec![]);
        for row in node.children().filter(|n| n.has_tag_name((WML_NS, "tr"))) {
            let header = wml(row, "trPr").and_then(|p| wml(p, "tblHeader")).is_some();
            let tr = create_element("tr", vec![]);
            for cell in row.children().filter(|n| n.has_tag_name((WML_NS, "tc"))) {
                let cell_el = create_element(if header { "th" } else { "td" }, vec![]);
                self.blocks(cell, &cell_el);
                append(&tr, cell_el);
            }
            append(&table, tr);
        }
        append(container, table);
    }
}

/// Attach `item` at `level`, opening or closing lists so nesting follows `w:ilvl`.
fn push_list_item(
    container: &Handle,
    lists: &mut Vec<ListFrame>,
    level: u32,
    ordered: bool,
    item: Handle,
) {
    while lists.last().is_some_and(|f| f.level > level) {
        lists.pop();
    }
    if lists
        .last()
        .is_some_and(|f| f.level == level && f.ordered != ordered)
    {
        lists.pop();
    }

    if lists.last().map_or(true, |f| f.level < level) {
        let list = create_element(if ordered { "ol" } else { "ul" }, vec![]);
        match lists.last().and_then(|f| f.last_item.clone()) {
            Some(parent_item) => append(&parent_item, list.clone()),
            None => append(container, list.clone()),
        }
        lists.push(ListFrame {
            level,
            ordered,
            list,
            last_item: None,
        });
    }

    if let Some(frame) = lists.last_mut() {
        append(&frame.list, item.clone());
        frame.last_item = Some(item);
    }
}

/// Wrap `content` in `tags` (outermost first), reusing a trailing wrapper left by the
/// previous run so `<strong>a</strong><strong>b</strong>` comes out as one element.
fn append_formatted(parent: &Handle, tags: &[&str], content: Vec<Handle>) {
    let Some((tag, rest)) = tags.split_first() else {
        parent.children.borrow_mut().extend(content);
        return;
    };

    let reuse = parent
        .children
        .borrow()
        .last()
        .filter(|last| tag_name(last).as_deref() == Some(*tag))
        .cloned();
    let wrapper = match reuse {
        Some(existing) => existing,
        None => {
            let created = create_element(tag, vec![]);
            append(parent, created.clone());
            created
        }
    };
    append_formatted(&wrapper, rest, content);
}

fn flush_text(text: &mut String, out: &mut Vec<Handle>) {
    if !text.is_empty() {
        out.push(create_text(text));
        text.clear();
    }
}

/// On/off run property: present without `w:val`, or with anything but an off value.
fn toggle(props: Node, name: &str) -> bool {
    wml(props, name).is_some_and(|n| {
        !matches!(
            n.attribute((WML_NS, "val")),
            Some("0") | Some("false") | Some("none")
        )
    })
}

fn heading_level(id: &str, name: Option<&str>) -> Option<u32> {
    let from_name = name.and_then(|n| {
        n.to_ascii_lowercase()
            .strip_prefix("heading ")
            .and_then(|level| level.trim().parse().ok())
    });
    let from_id = id.strip_prefix("Heading").and_then(|l| l.parse().ok());
    from_name.or(from_id).filter(|level| (1..=6).contains(level))
}

fn unrecognised(kind: &str, id: &str, name: Option<&str>) -> String {
    format!(
        "Unrecognised {kind} style: '{}' (Style ID: {id})",
        name.unwrap_or(id)
    )
}

fn image_mime(target: &str) -> &'static str {
    let ext = target
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}
