//! DOCX package loading
//!
//! A DOCX file is a ZIP container of XML parts. We load the parts the body walk needs up
//! front: the main document, style names, list numbering, relationships and the media the
//! relationships point at.

use crate::error::ConvertError;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const WPD_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const VML_NS: &str = "urn:schemas-microsoft-com:vml";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleType {
    Paragraph,
    Character,
    Other,
}

#[derive(Debug, Clone)]
pub(crate) struct Style {
    pub kind: StyleType,
    pub name: Option<String>,
    /// `(numId, ilvl)` from the style's own `w:pPr/w:numPr`
    pub numbering: Option<(String, u32)>,
}

#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub target: String,
    pub external: bool,
}

/// `numId` → abstract definition → per-level format.
#[derive(Debug, Default)]
pub(crate) struct Numbering {
    abstract_levels: HashMap<String, HashMap<u32, String>>,
    num_to_abstract: HashMap<String, String>,
}

impl Numbering {
    /// Whether level `ilvl` of list `num_id` is numbered (anything but bullets).
    pub fn is_ordered(&self, num_id: &str, ilvl: u32) -> bool {
        self.num_to_abstract
            .get(num_id)
            .and_then(|abs| self.abstract_levels.get(abs))
            .and_then(|levels| levels.get(&ilvl))
            .map(|fmt| fmt != "bullet" && fmt != "none")
            .unwrap_or(false)
    }
}

pub(crate) struct DocxPackage {
    pub document: String,
    pub styles: HashMap<String, Style>,
    pub numbering: Numbering,
    pub relationships: HashMap<String, Relationship>,
    /// Zip entry name → bytes, for every internal relationship target that exists
    pub media: HashMap<String, Vec<u8>>,
}

impl DocxPackage {
    pub fn open(bytes: &[u8]) -> Result<Self, ConvertError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|_| ConvertError::Docx("file is not a ZIP archive".to_string()))?;

        let document = read_text(&mut zip, "word/document.xml")?.ok_or_else(|| {
            ConvertError::Docx("missing word/document.xml (is this a DOCX file?)".to_string())
        })?;

        let styles = match read_text(&mut zip, "word/styles.xml")? {
            Some(xml) => parse_styles(&xml)?,
            None => HashMap::new(),
        };
        let numbering = match read_text(&mut zip, "word/numbering.xml")? {
            Some(xml) => parse_numbering(&xml)?,
            None => Numbering::default(),
        };
        let relationships = match read_text(&mut zip, "word/_rels/document.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let mut media = HashMap::new();
        for rel in relationships.values().filter(|r| !r.external) {
            let entry = entry_name(&rel.target);
            if media.contains_key(&entry) {
                continue;
            }
            if let Some(data) = read_entry(&mut zip, &entry)? {
                media.insert(entry, data);
            }
        }

        Ok(Self {
            document,
            styles,
            numbering,
            relationships,
            media,
        })
    }

    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Bytes of an internal relationship target (`media/image1.png`).
    pub fn media(&self, target: &str) -> Option<&[u8]> {
        self.media.get(&entry_name(target)).map(Vec::as_slice)
    }
}

/// Relationship targets are relative to `word/` unless absolute within the package.
pub(crate) fn entry_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{target}"),
    }
}

fn read_entry<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, ConvertError> {
    let mut file = match zip.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ConvertError::Docx(format!("{name}: {e}"))),
    };
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| ConvertError::Docx(format!("{name}: {e}")))?;
    Ok(Some(buf))
}

fn read_text<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ConvertError> {
    match read_entry(zip, name)? {
        None => Ok(None),
        Some(bytes) => {
            let text = String::from_utf8(bytes)
                .map_err(|e| ConvertError::Docx(format!("{name}: {e}")))?;
            Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
        }
    }
}

fn parse_xml<'a>(xml: &'a str, part: &str) -> Result<roxmltree::Document<'a>, ConvertError> {
    roxmltree::Document::parse(xml).map_err(|e| ConvertError::Docx(format!("{part}: {e}")))
}

pub(crate) fn wml<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_val<'a>(node: roxmltree::Node<'a, '_>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// `(numId, ilvl)` of a `w:pPr` element; `ilvl` defaults to 0.
pub(crate) fn numbering_props(props: roxmltree::Node<'_, '_>) -> Option<(String, u32)> {
    let num_pr = wml(props, "numPr")?;
    let num_id = wml_val(num_pr, "numId")?;
    let level = wml_val(num_pr, "ilvl")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    Some((num_id.to_string(), level))
}

fn parse_styles(xml: &str) -> Result<HashMap<String, Style>, ConvertError> {
    let doc = parse_xml(xml, "word/styles.xml")?;
    let mut styles = HashMap::new();
    for node in doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((WML_NS, "style")))
    {
        let Some(id) = node.attribute((WML_NS, "styleId")) else {
            continue;
        };
        let kind = match node.attribute((WML_NS, "type")) {
            Some("paragraph") => StyleType::Paragraph,
            Some("character") => StyleType::Character,
            _ => StyleType::Other,
        };
        let name = wml_val(node, "name").map(str::to_string);
        let numbering = wml(node, "pPr").and_then(numbering_props);
        styles.insert(
            id.to_string(),
            Style {
                kind,
                name,
                numbering,
            },
        );
    }
    Ok(styles)
}

fn parse_numbering(xml: &str) -> Result<Numbering, ConvertError> {
    let doc = parse_xml(xml, "word/numbering.xml")?;
    let mut numbering = Numbering::default();
    for node in doc.root_element().children().filter(|n| n.is_element()) {
        if node.has_tag_name((WML_NS, "abstractNum")) {
            let Some(abs_id) = node.attribute((WML_NS, "abstractNumId")) else {
                continue;
            };
            let levels = node
                .children()
                .filter(|n| n.has_tag_name((WML_NS, "lvl")))
                .filter_map(|lvl| {
                    let ilvl = lvl.attribute((WML_NS, "ilvl"))?.parse::<u32>().ok()?;
                    let fmt = wml_val(lvl, "numFmt").unwrap_or("decimal");
                    Some((ilvl, fmt.to_string()))
                })
                .collect();
            numbering
                .abstract_levels
                .insert(abs_id.to_string(), levels);
        } else if node.has_tag_name((WML_NS, "num")) {
            let Some(num_id) = node.attribute((WML_NS, "numId")) else {
                continue;
            };
            if let Some(abs_id) = wml_val(node, "abstractNumId") {
                numbering
                    .num_to_abstract
                    .insert(num_id.to_string(), abs_id.to_string());
            }
        }
    }
    Ok(numbering)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, Relationship>, ConvertError> {
    let doc = parse_xml(xml, "word/_rels/document.xml.rels")?;
    let mut rels = HashMap::new();
    for node in doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((PKG_REL_NS, "Relationship")))
    {
        let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) else {
            continue;
        };
        rels.insert(
            id.to_string(),
            Relationship {
                target: target.to_string(),
                external: node.attribute("TargetMode") == Some("External"),
            },
        );
    }
    Ok(rels)
}
