//! WordprocessingML part writers.
//!
//! Each function returns the complete XML bytes of one package part, written
//! through `quick_xml::Writer`. Element order inside `w:pPr`, `w:rPr` and
//! `w:lvl` follows the schema sequence; Word rejects files that reorder them.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::docx::model::{Document, NumberingDefinition, NumberingLevel, Paragraph, Run};
use crate::docx::packer::PackError;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const PKG_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_RELS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

type PartResult = Result<Vec<u8>, PackError>;

/// Drops characters outside the XML 1.0 `Char` production (C0 controls other
/// than tab/newline/carriage return, surrogates, U+FFFE, U+FFFF). Escaping of
/// markup characters is left to quick-xml.
pub fn xml_chars(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(
            c,
            '\t' | '\n'
                | '\r'
                | '\u{20}'..='\u{D7FF}'
                | '\u{E000}'..='\u{FFFD}'
                | '\u{10000}'..='\u{10FFFF}'
        )
    }
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

/// Thin wrapper over `quick_xml::Writer` for element-at-a-time output.
struct PartWriter {
    writer: Writer<Vec<u8>>,
}

impl PartWriter {
    fn new() -> Result<Self, PackError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(PartWriter { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), PackError> {
        self.writer.write_event(Event::Start(element(name, attrs)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), PackError> {
        self.writer.write_event(Event::Empty(element(name, attrs)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), PackError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), PackError> {
        self.start(name, attrs)?;
        let text = xml_chars(text);
        if !text.is_empty() {
            self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        }
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attrs {
        // Attribute values are escaped by quick-xml's `From<(&str, &str)>`.
        start.push_attribute((key, &*xml_chars(value)));
    }
    start
}

// ────────────────────────────────────────────────────────────────────────────
// Package plumbing
// ────────────────────────────────────────────────────────────────────────────

pub fn content_types_xml() -> PartResult {
    const OVERRIDES: [(&str, &str); 5] = [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/numbering.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];

    let mut w = PartWriter::new()?;
    w.start(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )?;
    w.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    w.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in OVERRIDES {
        w.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    w.end("Types")?;
    Ok(w.finish())
}

fn relationships_xml(rels: &[(&str, &str, &str)]) -> PartResult {
    let mut w = PartWriter::new()?;
    w.start("Relationships", &[("xmlns", PKG_RELS_NS)])?;
    for &(id, kind, target) in rels {
        w.empty(
            "Relationship",
            &[("Id", id), ("Type", kind), ("Target", target)],
        )?;
    }
    w.end("Relationships")?;
    Ok(w.finish())
}

pub fn package_rels_xml() -> PartResult {
    let office_document = format!("{OFFICE_RELS}/officeDocument");
    let extended = format!("{OFFICE_RELS}/extended-properties");
    relationships_xml(&[
        ("rId1", office_document.as_str(), "word/document.xml"),
        (
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        ("rId3", extended.as_str(), "docProps/app.xml"),
    ])
}

pub fn document_rels_xml() -> PartResult {
    let styles = format!("{OFFICE_RELS}/styles");
    let numbering = format!("{OFFICE_RELS}/numbering");
    relationships_xml(&[
        ("rId1", styles.as_str(), "styles.xml"),
        ("rId2", numbering.as_str(), "numbering.xml"),
    ])
}

pub fn core_props_xml(doc: &Document) -> PartResult {
    let created = doc.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut w = PartWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(title) = &doc.title {
        w.text_element("dc:title", &[], title)?;
    }
    if let Some(creator) = &doc.creator {
        w.text_element("dc:creator", &[], creator)?;
    }
    w.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    w.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    w.end("cp:coreProperties")?;
    Ok(w.finish())
}

pub fn app_props_xml() -> PartResult {
    let mut w = PartWriter::new()?;
    w.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    w.text_element("Application", &[], env!("CARGO_PKG_NAME"))?;
    w.end("Properties")?;
    Ok(w.finish())
}

pub fn styles_xml() -> PartResult {
    let mut w = PartWriter::new()?;
    w.start("w:styles", &[("xmlns:w", W_NS)])?;
    w.start("w:docDefaults", &[])?;
    w.start("w:rPrDefault", &[])?;
    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[
            ("w:ascii", "Calibri"),
            ("w:hAnsi", "Calibri"),
            ("w:eastAsia", "Calibri"),
            ("w:cs", "Calibri"),
        ],
    )?;
    w.empty("w:sz", &[("w:val", "22")])?;
    w.empty("w:szCs", &[("w:val", "22")])?;
    w.end("w:rPr")?;
    w.end("w:rPrDefault")?;
    w.start("w:pPrDefault", &[])?;
    w.empty("w:pPr", &[])?;
    w.end("w:pPrDefault")?;
    w.end("w:docDefaults")?;

    w.start(
        "w:style",
        &[
            ("w:type", "paragraph"),
            ("w:default", "1"),
            ("w:styleId", "Normal"),
        ],
    )?;
    w.empty("w:name", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;
    w.end("w:style")?;
    w.end("w:styles")?;
    Ok(w.finish())
}

// ────────────────────────────────────────────────────────────────────────────
// Numbering part
// ────────────────────────────────────────────────────────────────────────────

/// Writes `word/numbering.xml`. Definition `i` becomes abstract id `i` and
/// concrete id `i + 1`; the packer resolves references with the same rule.
pub fn numbering_xml(definitions: &[NumberingDefinition]) -> PartResult {
    let mut w = PartWriter::new()?;
    w.start("w:numbering", &[("xmlns:w", W_NS)])?;

    for (abstract_id, def) in definitions.iter().enumerate() {
        w.start(
            "w:abstractNum",
            &[("w:abstractNumId", abstract_id.to_string().as_str())],
        )?;
        w.empty("w:multiLevelType", &[("w:val", "hybridMultilevel")])?;
        for level in &def.levels {
            write_level(&mut w, level)?;
        }
        w.end("w:abstractNum")?;
    }

    // Every abstractNum must precede the first num.
    for abstract_id in 0..definitions.len() {
        w.start("w:num", &[("w:numId", (abstract_id + 1).to_string().as_str())])?;
        w.empty("w:abstractNumId", &[("w:val", abstract_id.to_string().as_str())])?;
        w.end("w:num")?;
    }

    w.end("w:numbering")?;
    Ok(w.finish())
}

fn write_level(w: &mut PartWriter, level: &NumberingLevel) -> Result<(), PackError> {
    w.start("w:lvl", &[("w:ilvl", level.level.to_string().as_str())])?;
    w.empty("w:start", &[("w:val", "1")])?;
    w.empty("w:numFmt", &[("w:val", "bullet")])?;
    w.empty("w:lvlText", &[("w:val", level.glyph.as_str())])?;
    w.empty("w:lvlJc", &[("w:val", "left")])?;
    if level.font.is_some() || level.size.is_some() {
        w.start("w:rPr", &[])?;
        if let Some(font) = &level.font {
            w.empty(
                "w:rFonts",
                &[
                    ("w:ascii", font.as_str()),
                    ("w:hAnsi", font.as_str()),
                    ("w:cs", font.as_str()),
                    ("w:hint", "default"),
                ],
            )?;
        }
        if let Some(size) = level.size {
            let size = size.to_string();
            w.empty("w:sz", &[("w:val", size.as_str())])?;
            w.empty("w:szCs", &[("w:val", size.as_str())])?;
        }
        w.end("w:rPr")?;
    }
    w.end("w:lvl")
}

// ────────────────────────────────────────────────────────────────────────────
// Main document part
// ────────────────────────────────────────────────────────────────────────────

/// Writes `word/document.xml`. `num_ids` maps numbering references to the
/// concrete ids emitted by [`numbering_xml`].
pub fn document_xml(doc: &Document, num_ids: &HashMap<&str, usize>) -> PartResult {
    let mut w = PartWriter::new()?;
    w.start("w:document", &[("xmlns:w", W_NS), ("xmlns:r", OFFICE_RELS)])?;
    w.start("w:body", &[])?;

    for paragraph in &doc.blocks {
        write_paragraph(&mut w, paragraph, num_ids)?;
    }

    let page = &doc.page;
    w.start("w:sectPr", &[])?;
    w.empty(
        "w:pgSz",
        &[
            ("w:w", page.width.to_string().as_str()),
            ("w:h", page.height.to_string().as_str()),
        ],
    )?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", page.margin_top.to_string().as_str()),
            ("w:right", page.margin_right.to_string().as_str()),
            ("w:bottom", page.margin_bottom.to_string().as_str()),
            ("w:left", page.margin_left.to_string().as_str()),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")?;

    w.end("w:body")?;
    w.end("w:document")?;
    Ok(w.finish())
}

fn has_paragraph_properties(p: &Paragraph) -> bool {
    p.numbering.is_some()
        || p.border_bottom.is_some()
        || !p.tab_stops.is_empty()
        || p.spacing_after.is_some()
        || p.indent.is_some()
        || p.alignment.is_some()
}

fn write_paragraph(
    w: &mut PartWriter,
    p: &Paragraph,
    num_ids: &HashMap<&str, usize>,
) -> Result<(), PackError> {
    w.start("w:p", &[])?;

    if has_paragraph_properties(p) {
        w.start("w:pPr", &[])?;
        if let Some(numbering) = &p.numbering {
            if let Some(num_id) = num_ids.get(numbering.reference.as_str()) {
                w.start("w:numPr", &[])?;
                w.empty("w:ilvl", &[("w:val", numbering.level.to_string().as_str())])?;
                w.empty("w:numId", &[("w:val", num_id.to_string().as_str())])?;
                w.end("w:numPr")?;
            }
        }
        if let Some(border) = &p.border_bottom {
            w.start("w:pBdr", &[])?;
            w.empty(
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", border.size.to_string().as_str()),
                    ("w:space", border.space.to_string().as_str()),
                    ("w:color", border.color.as_str()),
                ],
            )?;
            w.end("w:pBdr")?;
        }
        if !p.tab_stops.is_empty() {
            w.start("w:tabs", &[])?;
            for tab in &p.tab_stops {
                w.empty(
                    "w:tab",
                    &[("w:val", "right"), ("w:pos", tab.position.to_string().as_str())],
                )?;
            }
            w.end("w:tabs")?;
        }
        if let Some(after) = p.spacing_after {
            w.empty("w:spacing", &[("w:after", after.to_string().as_str())])?;
        }
        if let Some(indent) = p.indent {
            w.empty(
                "w:ind",
                &[
                    ("w:left", indent.left.to_string().as_str()),
                    ("w:hanging", indent.hanging.to_string().as_str()),
                ],
            )?;
        }
        if let Some(alignment) = p.alignment {
            w.empty("w:jc", &[("w:val", alignment.as_xml())])?;
        }
        w.end("w:pPr")?;
    }

    for run in &p.runs {
        write_run(w, run)?;
    }

    w.end("w:p")
}

fn write_run(w: &mut PartWriter, run: &Run) -> Result<(), PackError> {
    w.start("w:r", &[])?;

    if run.bold || run.italics || run.underline || run.size.is_some() {
        w.start("w:rPr", &[])?;
        if run.bold {
            w.empty("w:b", &[])?;
            w.empty("w:bCs", &[])?;
        }
        if run.italics {
            w.empty("w:i", &[])?;
            w.empty("w:iCs", &[])?;
        }
        if let Some(size) = run.size {
            let size = size.to_string();
            w.empty("w:sz", &[("w:val", size.as_str())])?;
            w.empty("w:szCs", &[("w:val", size.as_str())])?;
        }
        if run.underline {
            w.empty("w:u", &[("w:val", "single")])?;
        }
        w.end("w:rPr")?;
    }

    for (i, segment) in run.text.split('\t').enumerate() {
        if i > 0 {
            w.empty("w:tab", &[])?;
        }
        if !segment.is_empty() {
            w.text_element("w:t", &[("xml:space", "preserve")], segment)?;
        }
    }

    w.end("w:r")
}
