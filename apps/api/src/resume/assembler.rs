//! Resume → Word document assembly.
//!
//! Layout rules:
//! - Title (name) and contact line always come first.
//! - Sections follow in a fixed order: EDUCATION, WORK EXPERIENCE,
//!   HONORS AND AWARDS, SKILLS. Key order in the payload is irrelevant.
//! - A section is rendered only when its key is present. HONORS AND AWARDS is
//!   additionally dropped when every entry is blank.
//! - All bulleted lists share the single `bullet-list` numbering definition.

use thiserror::Error;
use tracing::{debug, error};

use crate::docx::{
    pack, Alignment, BorderLine, Document, NumberingDefinition, NumberingLevel, PageSetup,
    Paragraph, Run,
};
use crate::models::resume::{EducationEntry, HonorEntry, ResumeRecord, WorkEntry};
use crate::resume::dates::format_date_range;

// ────────────────────────────────────────────────────────────────────────────
// Layout constants
// ────────────────────────────────────────────────────────────────────────────

/// Numbering reference shared by every bulleted list.
pub const BULLET_LIST: &str = "bullet-list";
const BULLET_GLYPH: &str = "•";
const BULLET_FONT: &str = "Arial";

/// Half-points: 11pt body, 20pt name.
const BODY_SIZE: u32 = 22;
const NAME_SIZE: u32 = 40;

/// Twips.
const PAGE_MARGIN: u32 = 720;
const BULLET_INDENT_LEFT: u32 = 720;
const BULLET_INDENT_HANGING: u32 = 360;
const SPACING_TIGHT: u32 = 50;
const SPACING_LOOSE: u32 = 100;

const CONTACT_SEPARATOR: &str = " | ";
const PROFILE_LINKS_PLACEHOLDER: &str = "GitHub/LinkedIn";

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Education,
    WorkExperience,
    HonorsAndAwards,
    Skills,
}

impl SectionKind {
    /// Render order, independent of payload key order.
    pub const ORDER: [SectionKind; 4] = [
        SectionKind::Education,
        SectionKind::WorkExperience,
        SectionKind::HonorsAndAwards,
        SectionKind::Skills,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Education => "EDUCATION",
            SectionKind::WorkExperience => "WORK EXPERIENCE",
            SectionKind::HonorsAndAwards => "HONORS AND AWARDS",
            SectionKind::Skills => "SKILLS",
        }
    }
}

/// Raised when the document cannot be serialized. The cause is logged, never
/// returned, so callers can surface the message as-is.
#[derive(Debug, Error)]
#[error("Failed to generate resume document")]
pub struct GenerationError;

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Builds and packs the resume into `.docx` bytes.
pub fn assemble(record: &ResumeRecord) -> Result<Vec<u8>, GenerationError> {
    let document = build_document(record);
    pack(&document).map_err(|e| {
        error!(error = %e, "Error generating resume");
        GenerationError
    })
}

/// Maps the record onto the block sequence of a single-section document.
pub fn build_document(record: &ResumeRecord) -> Document {
    let page = PageSetup::a4_with_margins(PAGE_MARGIN);
    // Right tab stop on the right margin, so dates end flush with the text.
    let date_tab = page.text_width();

    let mut document = Document::new(page)
        .title(format!("{} Resume", record.name))
        .creator(record.name.clone())
        .add_numbering(bullet_numbering())
        .add_paragraph(title_block(&record.name))
        .add_paragraph(contact_block(record));

    let sections = &record.sections;
    for kind in SectionKind::ORDER {
        let body = match kind {
            SectionKind::Education => sections
                .education
                .as_deref()
                .map(|entries| education_blocks(entries, date_tab)),
            SectionKind::WorkExperience => sections
                .work_experience
                .as_deref()
                .map(|entries| work_blocks(entries, date_tab)),
            SectionKind::HonorsAndAwards => sections
                .honors_and_awards
                .as_deref()
                .and_then(|entries| honor_blocks(entries, date_tab)),
            SectionKind::Skills => sections.skills.as_deref().map(|skills| vec![skills_block(skills)]),
        };

        if let Some(body) = body {
            debug!(section = kind.title(), blocks = body.len(), "Rendering section");
            document = document
                .add_paragraph(section_header(kind.title()))
                .add_paragraphs(body);
        }
    }

    debug!(blocks = document.blocks.len(), "Assembled resume document");
    document
}

// ────────────────────────────────────────────────────────────────────────────
// Block builders
// ────────────────────────────────────────────────────────────────────────────

fn bullet_numbering() -> NumberingDefinition {
    NumberingDefinition {
        reference: BULLET_LIST.to_string(),
        levels: vec![NumberingLevel {
            level: 0,
            glyph: BULLET_GLYPH.to_string(),
            font: Some(BULLET_FONT.to_string()),
            size: Some(BODY_SIZE),
        }],
    }
}

fn title_block(name: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new(name).bold().size(NAME_SIZE))
        .align(Alignment::Center)
        .spacing_after(SPACING_TIGHT)
}

fn contact_block(record: &ResumeRecord) -> Paragraph {
    let contact = &record.contact;
    Paragraph::new()
        .add_run(Run::new(contact.address.as_str()).size(BODY_SIZE))
        .add_run(Run::new(format!("{CONTACT_SEPARATOR}{}", contact.phone)).size(BODY_SIZE))
        .add_run(Run::new(format!("{CONTACT_SEPARATOR}{}", contact.email)).size(BODY_SIZE))
        .add_run(
            Run::new(format!("{CONTACT_SEPARATOR}{PROFILE_LINKS_PLACEHOLDER}")).size(BODY_SIZE),
        )
        .align(Alignment::Center)
        .spacing_after(SPACING_LOOSE)
        .border_bottom(BorderLine {
            size: 6,
            color: "000000".to_string(),
            space: 6,
        })
}

fn section_header(title: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new(title).bold().underline().size(BODY_SIZE))
        .spacing_after(SPACING_TIGHT)
}

/// Label on the left, dates pushed to the right margin by a right tab stop.
fn position_header(label: &str, dates: &str, date_tab: u32) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new(label).bold().size(BODY_SIZE))
        .add_run(Run::new(format!("\t{dates}")).bold().size(BODY_SIZE))
        .add_right_tab(date_tab)
        .spacing_after(SPACING_TIGHT)
}

fn italic_line(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new(text).italics().size(BODY_SIZE))
        .spacing_after(SPACING_TIGHT)
}

/// One paragraph per item; the last one gets the looser trailing space.
fn bullet_points(items: &[&str]) -> Vec<Paragraph> {
    let last = items.len().saturating_sub(1);
    items
        .iter()
        .enumerate()
        .map(|(index, text)| {
            Paragraph::new()
                .add_run(Run::new(*text).size(BODY_SIZE))
                .numbering(BULLET_LIST, 0)
                .indent(BULLET_INDENT_LEFT, BULLET_INDENT_HANGING)
                .spacing_after(if index == last {
                    SPACING_LOOSE
                } else {
                    SPACING_TIGHT
                })
        })
        .collect()
}

fn education_blocks(entries: &[EducationEntry], date_tab: u32) -> Vec<Paragraph> {
    entries
        .iter()
        .flat_map(|edu| {
            [
                position_header(
                    &format!("{}, GPA – {}", edu.degree, edu.gpa),
                    &format_date_range(edu.from_date, edu.to_date),
                    date_tab,
                ),
                italic_line(&edu.institution),
            ]
        })
        .collect()
}

/// Responsibilities are listed verbatim, empty strings included.
fn work_blocks(entries: &[WorkEntry], date_tab: u32) -> Vec<Paragraph> {
    let mut blocks = Vec::new();
    for work in entries {
        blocks.push(position_header(
            &work.title,
            &format_date_range(work.from_date, work.to_date),
            date_tab,
        ));
        blocks.push(italic_line(&work.location));
        let items: Vec<&str> = work.responsibilities.iter().map(String::as_str).collect();
        blocks.extend(bullet_points(&items));
    }
    blocks
}

/// Returns `None` when no entry has content, suppressing the section header.
fn honor_blocks(entries: &[HonorEntry], date_tab: u32) -> Option<Vec<Paragraph>> {
    let mut blocks = Vec::new();
    for honor in entries.iter().filter(|h| h.has_content()) {
        blocks.push(position_header(&honor.title, &honor.dates, date_tab));
        blocks.push(italic_line(&honor.institution));
        blocks.extend(bullet_points(&honor.listed_achievements()));
    }
    (!blocks.is_empty()).then_some(blocks)
}

fn skills_block(skills: &[String]) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new(skills.join(", ")).size(BODY_SIZE))
        .spacing_after(SPACING_LOOSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Contact, Sections};
    use chrono::NaiveDate;
    use std::io::{Cursor, Read};

    fn minimal() -> ResumeRecord {
        ResumeRecord {
            name: "A".to_string(),
            contact: Contact {
                address: "x".to_string(),
                phone: "y".to_string(),
                email: "z".to_string(),
            },
            sections: Sections::default(),
        }
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.blocks.iter().map(Paragraph::text).collect()
    }

    fn headers(doc: &Document) -> Vec<String> {
        doc.blocks
            .iter()
            .filter(|p| p.runs.len() == 1 && p.runs[0].underline)
            .map(Paragraph::text)
            .collect()
    }

    fn bullets(doc: &Document) -> Vec<String> {
        doc.blocks
            .iter()
            .filter(|p| p.numbering.is_some())
            .map(Paragraph::text)
            .collect()
    }

    fn work(title: &str, responsibilities: &[&str]) -> WorkEntry {
        WorkEntry {
            title: title.to_string(),
            from_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            to_date: None,
            location: "Remote".to_string(),
            responsibilities: responsibilities.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_minimal_record_has_title_and_contact_only() {
        let doc = build_document(&minimal());
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(
            texts(&doc),
            vec!["A".to_string(), "x | y | z | GitHub/LinkedIn".to_string()]
        );
        assert!(headers(&doc).is_empty());
    }

    #[test]
    fn test_title_and_contact_styling() {
        let doc = build_document(&minimal());
        let title = &doc.blocks[0];
        assert_eq!(title.alignment, Some(Alignment::Center));
        assert!(title.runs[0].bold);
        assert_eq!(title.runs[0].size, Some(NAME_SIZE));

        let contact = &doc.blocks[1];
        assert_eq!(contact.alignment, Some(Alignment::Center));
        assert_eq!(contact.runs.len(), 4);
        let border = contact.border_bottom.as_ref().unwrap();
        assert_eq!(border.size, 6);
        assert_eq!(border.color, "000000");
    }

    #[test]
    fn test_document_geometry() {
        let doc = build_document(&minimal());
        assert_eq!(doc.page.margin_top, PAGE_MARGIN);
        assert_eq!(doc.page.margin_left, PAGE_MARGIN);
        assert_eq!(doc.numbering.len(), 1);
        assert_eq!(doc.numbering[0].reference, BULLET_LIST);
        assert_eq!(doc.numbering[0].levels[0].glyph, "•");
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        // Deserialize from JSON with keys in reverse so payload order is exercised.
        let record: ResumeRecord = serde_json::from_str(
            r#"{
                "name": "A",
                "contact": {"address": "x", "phone": "y", "email": "z"},
                "sections": {
                    "SKILLS": ["Rust"],
                    "HONORS AND AWARDS": [{"title": "Prize", "dates": "2021", "institution": "ACM", "achievements": []}],
                    "WORK EXPERIENCE": [{"title": "Dev", "location": "Remote", "responsibilities": ["Built"]}],
                    "EDUCATION": [{"degree": "BSc", "gpa": "4.0", "institution": "MIT"}]
                }
            }"#,
        )
        .unwrap();
        let doc = build_document(&record);
        assert_eq!(
            headers(&doc),
            vec!["EDUCATION", "WORK EXPERIENCE", "HONORS AND AWARDS", "SKILLS"]
        );
    }

    #[test]
    fn test_education_position_header() {
        let mut record = minimal();
        record.sections.education = Some(vec![EducationEntry {
            degree: "BSc Computer Science".to_string(),
            gpa: "3.8".to_string(),
            from_date: NaiveDate::from_ymd_opt(2016, 9, 1),
            to_date: NaiveDate::from_ymd_opt(2020, 6, 1),
            institution: "State University".to_string(),
        }]);
        let doc = build_document(&record);

        let header = &doc.blocks[3];
        assert_eq!(header.text(), "BSc Computer Science, GPA – 3.8\tSep 2016 - Jun 2020");
        assert_eq!(header.tab_stops.len(), 1);
        assert_eq!(header.tab_stops[0].position, doc.page.text_width());
        assert!(header.runs.iter().all(|r| r.bold));

        let institution = &doc.blocks[4];
        assert_eq!(institution.text(), "State University");
        assert!(institution.runs[0].italics);
        assert_eq!(doc.blocks.len(), 5);
    }

    #[test]
    fn test_work_dates_open_ended() {
        let mut record = minimal();
        record.sections.work_experience = Some(vec![work("Engineer", &["Shipped"])]);
        let doc = build_document(&record);
        assert_eq!(doc.blocks[3].text(), "Engineer\tJan 2020 - Present");
        assert_eq!(doc.blocks[4].text(), "Remote");
    }

    #[test]
    fn test_work_missing_dates() {
        let mut record = minimal();
        let mut entry = work("Engineer", &[]);
        entry.from_date = None;
        record.sections.work_experience = Some(vec![entry]);
        let doc = build_document(&record);
        assert_eq!(doc.blocks[3].text(), "Engineer\t - Present");
    }

    #[test]
    fn test_responsibilities_pass_through_including_empties() {
        let mut record = minimal();
        record.sections.work_experience = Some(vec![
            work("One", &["a", "", "b"]),
            work("Two", &["c"]),
        ]);
        let doc = build_document(&record);
        assert_eq!(bullets(&doc), vec!["a", "", "b", "c"]);
    }

    #[test]
    fn test_bullet_spacing_and_geometry() {
        let mut record = minimal();
        record.sections.work_experience = Some(vec![work("One", &["a", "b", "c"])]);
        let doc = build_document(&record);
        let list: Vec<&Paragraph> = doc.blocks.iter().filter(|p| p.numbering.is_some()).collect();

        let spacing: Vec<Option<u32>> = list.iter().map(|p| p.spacing_after).collect();
        assert_eq!(
            spacing,
            vec![Some(SPACING_TIGHT), Some(SPACING_TIGHT), Some(SPACING_LOOSE)]
        );
        for p in list {
            let numbering = p.numbering.as_ref().unwrap();
            assert_eq!(numbering.reference, BULLET_LIST);
            assert_eq!(numbering.level, 0);
            let indent = p.indent.unwrap();
            assert_eq!((indent.left, indent.hanging), (720, 360));
        }
    }

    #[test]
    fn test_single_bullet_gets_loose_spacing() {
        let mut record = minimal();
        record.sections.work_experience = Some(vec![work("One", &["only"])]);
        let doc = build_document(&record);
        let bullet = doc.blocks.iter().find(|p| p.numbering.is_some()).unwrap();
        assert_eq!(bullet.spacing_after, Some(SPACING_LOOSE));
    }

    #[test]
    fn test_blank_honors_suppress_section() {
        let mut record = minimal();
        record.sections.honors_and_awards = Some(vec![
            HonorEntry::default(),
            HonorEntry {
                achievements: vec![String::new()],
                ..Default::default()
            },
        ]);
        let doc = build_document(&record);
        assert_eq!(doc.blocks.len(), 2);
        assert!(headers(&doc).is_empty());
    }

    #[test]
    fn test_empty_honors_list_suppresses_section() {
        let mut record = minimal();
        record.sections.honors_and_awards = Some(vec![]);
        assert_eq!(build_document(&record).blocks.len(), 2);
    }

    #[test]
    fn test_honors_filter_blank_entries_and_empty_achievements() {
        let mut record = minimal();
        record.sections.honors_and_awards = Some(vec![
            HonorEntry::default(),
            HonorEntry {
                title: "Dean's List".to_string(),
                dates: "2019, 2020".to_string(),
                institution: "State University".to_string(),
                achievements: vec!["Top 5%".to_string(), String::new(), "Twice".to_string()],
            },
        ]);
        let doc = build_document(&record);

        assert_eq!(headers(&doc), vec!["HONORS AND AWARDS"]);
        assert_eq!(doc.blocks[3].text(), "Dean's List\t2019, 2020");
        assert_eq!(doc.blocks[4].text(), "State University");
        assert_eq!(bullets(&doc), vec!["Top 5%", "Twice"]);
        // header + position + institution + 2 bullets
        assert_eq!(doc.blocks.len(), 2 + 5);
    }

    #[test]
    fn test_skills_joined() {
        let mut record = minimal();
        record.sections.skills = Some(vec!["Go".into(), "Rust".into(), "TypeScript".into()]);
        let doc = build_document(&record);
        assert_eq!(headers(&doc), vec!["SKILLS"]);
        assert_eq!(doc.blocks[3].text(), "Go, Rust, TypeScript");
        assert_eq!(doc.blocks[3].spacing_after, Some(SPACING_LOOSE));
    }

    #[test]
    fn test_present_but_empty_education_keeps_header() {
        let mut record = minimal();
        record.sections.education = Some(vec![]);
        let doc = build_document(&record);
        assert_eq!(headers(&doc), vec!["EDUCATION"]);
        assert_eq!(doc.blocks.len(), 3);
    }

    fn document_xml(bytes: Vec<u8>) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_assemble_minimal_produces_package() {
        let xml = document_xml(assemble(&minimal()).unwrap());
        assert_eq!(xml.matches("<w:p>").count(), 2);
        assert!(xml.contains("GitHub/LinkedIn"));
        assert!(!xml.contains("<w:u "));
    }

    #[test]
    fn test_assemble_escapes_user_text() {
        let mut record = minimal();
        record.name = "Tom & Jerry <Inc>".to_string();
        let xml = document_xml(assemble(&record).unwrap());
        assert!(xml.contains("Tom &amp; Jerry &lt;Inc&gt;"));
    }

    #[test]
    fn test_assemble_strips_noncharacters_from_name() {
        let mut record = minimal();
        record.name = "Ada\u{FFFF} Lovelace\u{FFFE}".to_string();
        let xml = document_xml(assemble(&record).unwrap());
        assert!(!xml.contains('\u{FFFF}'));
        assert!(!xml.contains('\u{FFFE}'));
        assert!(xml.contains("Ada Lovelace"));
    }
}
