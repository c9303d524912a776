//! Packs a [`Document`] into a `.docx` (OOXML zip) byte buffer.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::docx::model::Document;
use crate::docx::xml;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("paragraph {block} references undefined numbering '{reference}'")]
    UnknownNumbering { block: usize, reference: String },

    #[error("paragraph {block} references level {level} missing from numbering '{reference}'")]
    UnknownNumberingLevel {
        block: usize,
        reference: String,
        level: u8,
    },

    #[error("numbering '{0}' is defined more than once")]
    DuplicateNumbering(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes the document into an in-memory OOXML package.
///
/// Numbering references are checked before anything is written, so a
/// malformed document never yields a partial buffer.
pub fn pack(doc: &Document) -> Result<Vec<u8>, PackError> {
    let num_ids = resolve_numbering(doc)?;

    let parts: [(&str, Vec<u8>); 8] = [
        ("[Content_Types].xml", xml::content_types_xml()?),
        ("_rels/.rels", xml::package_rels_xml()?),
        ("docProps/core.xml", xml::core_props_xml(doc)?),
        ("docProps/app.xml", xml::app_props_xml()?),
        ("word/_rels/document.xml.rels", xml::document_rels_xml()?),
        ("word/styles.xml", xml::styles_xml()?),
        ("word/numbering.xml", xml::numbering_xml(&doc.numbering)?),
        ("word/document.xml", xml::document_xml(doc, &num_ids)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, body) in &parts {
        zip.start_file(*name, options)?;
        zip.write_all(body)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Maps each numbering reference to its concrete `w:numId` and verifies that
/// every numbered paragraph points at a defined reference and level.
fn resolve_numbering(doc: &Document) -> Result<HashMap<&str, usize>, PackError> {
    let mut num_ids = HashMap::with_capacity(doc.numbering.len());
    for (index, def) in doc.numbering.iter().enumerate() {
        if num_ids.insert(def.reference.as_str(), index + 1).is_some() {
            return Err(PackError::DuplicateNumbering(def.reference.clone()));
        }
    }

    for (block, paragraph) in doc.blocks.iter().enumerate() {
        let Some(numbering) = &paragraph.numbering else {
            continue;
        };
        let Some(&num_id) = num_ids.get(numbering.reference.as_str()) else {
            return Err(PackError::UnknownNumbering {
                block,
                reference: numbering.reference.clone(),
            });
        };
        if doc.numbering[num_id - 1].level(numbering.level).is_none() {
            return Err(PackError::UnknownNumberingLevel {
                block,
                reference: numbering.reference.clone(),
                level: numbering.level,
            });
        }
    }

    Ok(num_ids)
}
