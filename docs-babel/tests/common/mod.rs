//! In-test DOCX fixtures.
//!
//! Builds minimal but well-formed WordprocessingML packages with `zip::ZipWriter`, so tests
//! never depend on binary files checked into the repository.

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const HYPERLINK_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const IMAGE_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// numId 1 is a bullet list, numId 2 a decimal list; both define levels 0-2.
const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/></w:lvl>
    <w:lvl w:ilvl="2"><w:numFmt w:val="bullet"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="lowerLetter"/></w:lvl>
    <w:lvl w:ilvl="2"><w:numFmt w:val="lowerRoman"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

#[derive(Default)]
pub struct DocxBuilder {
    body: String,
    styles: Vec<(String, String, &'static str, String)>,
    relationships: Vec<(String, &'static str, String, bool)>,
    media: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(self, level: u8, text: &str) -> Self {
        self.styled_paragraph(&format!("Heading{level}"), &format!("heading {level}"), text)
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body
            .push_str(&format!("<w:p>{}</w:p>", run(text, "")));
        self
    }

    pub fn styled_paragraph(mut self, style_id: &str, style_name: &str, text: &str) -> Self {
        self.add_style(style_id, style_name, "paragraph");
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>{}</w:p>"#,
            run(text, "")
        ));
        self
    }

    /// Paragraph whose list numbering comes from its style's `w:pPr`.
    pub fn style_numbered_paragraph(
        mut self,
        style_id: &str,
        style_name: &str,
        num_id: u8,
        text: &str,
    ) -> Self {
        self.styles.retain(|(existing, ..)| existing != style_id);
        self.styles.push((
            style_id.to_string(),
            style_name.to_string(),
            "paragraph",
            format!(r#"<w:pPr><w:numPr><w:numId w:val="{num_id}"/></w:numPr></w:pPr>"#),
        ));
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>{}</w:p>"#,
            run(text, "")
        ));
        self
    }

    pub fn bold_paragraph(mut self, plain: &str, bold: &str) -> Self {
        self.body.push_str(&format!(
            "<w:p>{}{}</w:p>",
            run(plain, ""),
            run(bold, "<w:b/>")
        ));
        self
    }

    pub fn bullet(self, level: u8, text: &str) -> Self {
        self.list_item(1, level, text)
    }

    pub fn numbered(self, level: u8, text: &str) -> Self {
        self.list_item(2, level, text)
    }

    fn list_item(mut self, num_id: u8, level: u8, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr>{}</w:p>"#,
            run(text, "")
        ));
        self
    }

    pub fn link(mut self, text: &str, url: &str) -> Self {
        let id = format!("rId{}", self.relationships.len() + 100);
        self.body.push_str(&format!(
            r#"<w:p><w:hyperlink r:id="{id}">{}</w:hyperlink></w:p>"#,
            run(text, r#"<w:rStyle w:val="Hyperlink"/>"#)
        ));
        self.relationships
            .push((id, HYPERLINK_TYPE, url.to_string(), true));
        self
    }

    pub fn image(mut self, file_name: &str, data: &[u8], description: &str) -> Self {
        let id = format!("rId{}", self.relationships.len() + 100);
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:docPr id="1" name="Picture" descr="{description}"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:blipFill><a:blip r:embed="{id}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
        ));
        self.relationships
            .push((id, IMAGE_TYPE, format!("media/{file_name}"), false));
        self.media
            .push((format!("word/media/{file_name}"), data.to_vec()));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.body.push_str("<w:tbl>");
        for row in rows {
            self.body.push_str("<w:tr>");
            for cell in row.iter() {
                self.body
                    .push_str(&format!("<w:tc><w:p>{}</w:p></w:tc>", run(cell, "")));
            }
            self.body.push_str("</w:tr>");
        }
        self.body.push_str("</w:tbl>");
        self
    }

    fn add_style(&mut self, id: &str, name: &str, kind: &'static str) {
        if !self.styles.iter().any(|(existing, ..)| existing == id) {
            self.styles
                .push((id.to_string(), name.to_string(), kind, String::new()));
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut put = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        put("[Content_Types].xml", CONTENT_TYPES.as_bytes());
        put("_rels/.rels", PACKAGE_RELS.as_bytes());
        put(
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
                self.body
            )
            .as_bytes(),
        );
        put("word/styles.xml", self.styles_xml().as_bytes());
        put("word/numbering.xml", NUMBERING.as_bytes());
        put(
            "word/_rels/document.xml.rels",
            self.relationships_xml().as_bytes(),
        );
        for (name, data) in &self.media {
            put(name, data);
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }

    fn styles_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>
<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/></w:style>
"#
        );
        for (id, name, kind, props) in &self.styles {
            xml.push_str(&format!(
                r#"<w:style w:type="{kind}" w:styleId="{id}"><w:name w:val="{name}"/>{props}</w:style>"#
            ));
        }
        xml.push_str("</w:styles>");
        xml
    }

    fn relationships_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, kind, target, external) in &self.relationships {
            let mode = if *external {
                r#" TargetMode="External""#
            } else {
                ""
            };
            let target = escape(target).replace('"', "&quot;");
            xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"{mode}/>"#
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn run(text: &str, props: &str) -> String {
    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#, escape(text))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;
