//! In-memory WordprocessingML document model.
//!
//! Units follow the file format: font sizes are half-points (22 = 11pt),
//! spacing, indents, tab positions and page geometry are twips (1/20 pt),
//! border widths are eighths of a point.

use chrono::{DateTime, Utc};

// ────────────────────────────────────────────────────────────────────────────
// Text runs
// ────────────────────────────────────────────────────────────────────────────

/// A contiguous span of text sharing one character style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// Raw text. A `\t` is written as a tab element, not a literal character.
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    pub underline: bool,
    /// Font size in half-points.
    pub size: Option<u32>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italics(mut self) -> Self {
        self.italics = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph properties
// ────────────────────────────────────────────────────────────────────────────

/// Paragraph justification. Unaligned paragraphs inherit the left default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
}

impl Alignment {
    pub fn as_xml(self) -> &'static str {
        match self {
            Alignment::Center => "center",
        }
    }
}

/// A right-aligned tab stop: text after the tab ends at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    /// Position from the left text margin, in twips.
    pub position: u32,
}

/// A single-line bottom border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderLine {
    /// Line width in eighths of a point.
    pub size: u32,
    /// Hex RGB without the leading `#`.
    pub color: String,
    /// Gap between text and border, in points.
    pub space: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub left: u32,
    pub hanging: u32,
}

/// Binds a paragraph to a level of a numbering definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingRef {
    pub reference: String,
    pub level: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph (block)
// ────────────────────────────────────────────────────────────────────────────

/// A paragraph-level block of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
    /// Space after the paragraph, in twips.
    pub spacing_after: Option<u32>,
    pub tab_stops: Vec<TabStop>,
    pub border_bottom: Option<BorderLine>,
    pub indent: Option<Indent>,
    pub numbering: Option<NumberingRef>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn spacing_after(mut self, twips: u32) -> Self {
        self.spacing_after = Some(twips);
        self
    }

    pub fn add_right_tab(mut self, position: u32) -> Self {
        self.tab_stops.push(TabStop { position });
        self
    }

    pub fn border_bottom(mut self, border: BorderLine) -> Self {
        self.border_bottom = Some(border);
        self
    }

    pub fn indent(mut self, left: u32, hanging: u32) -> Self {
        self.indent = Some(Indent { left, hanging });
        self
    }

    pub fn numbering(mut self, reference: impl Into<String>, level: u8) -> Self {
        self.numbering = Some(NumberingRef {
            reference: reference.into(),
            level,
        });
        self
    }

    /// Concatenated text of all runs, tabs included.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Numbering
// ────────────────────────────────────────────────────────────────────────────

/// One level of a bullet list: a left-aligned glyph in its own font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingLevel {
    pub level: u8,
    pub glyph: String,
    pub font: Option<String>,
    /// Glyph size in half-points.
    pub size: Option<u32>,
}

/// A named list style that paragraphs opt into via [`NumberingRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingDefinition {
    pub reference: String,
    pub levels: Vec<NumberingLevel>,
}

impl NumberingDefinition {
    pub fn level(&self, level: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.level == level)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page + document
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margins for the single document section, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

impl PageSetup {
    /// A4 portrait with the same margin on every edge.
    pub fn a4_with_margins(margin: u32) -> Self {
        PageSetup {
            width: 11906,
            height: 16838,
            margin_top: margin,
            margin_right: margin,
            margin_bottom: margin,
            margin_left: margin,
        }
    }

    /// Width between the left and right margins. Right tab stops placed here
    /// land on the right margin.
    pub fn text_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4_with_margins(1440)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub page: PageSetup,
    pub numbering: Vec<NumberingDefinition>,
    pub blocks: Vec<Paragraph>,
}

impl Document {
    pub fn new(page: PageSetup) -> Self {
        Document {
            title: None,
            creator: None,
            created_at: Utc::now(),
            page,
            numbering: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn add_numbering(mut self, definition: NumberingDefinition) -> Self {
        self.numbering.push(definition);
        self
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.blocks.push(paragraph);
        self
    }

    pub fn add_paragraphs(mut self, paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        self.blocks.extend(paragraphs);
        self
    }
}
