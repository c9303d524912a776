// Minimal WordprocessingML writer: a paragraph/run document model plus a
// packer that emits the OOXML zip package.

pub mod model;
pub mod packer;
pub mod xml;

pub use model::{
    Alignment, BorderLine, Document, NumberingDefinition, NumberingLevel, PageSetup, Paragraph,
    Run,
};
pub use packer::pack;
