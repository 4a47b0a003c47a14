//! # Tagged Output Parser
//!
//! The four stages behind [`parse`](crate::parse), each usable on its own.
//! Data flows strictly forward:
//! raw text → normalized text → node tree → captures → flat result.
//!
//! | Stage | Function | Fails with |
//! |-------|----------|------------|
//! | Preprocess | [`preprocess`] | [`FormatError`](crate::FormatError) |
//! | Structural scan | [`parse_tree`] | [`FormatError`](crate::FormatError) |
//! | Extraction | [`extract`] | never |
//! | Validation/assembly | [`validate`] | [`StructureError`](crate::StructureError) |

pub mod capture;
pub mod extract;
pub mod validate;
pub mod xml;

pub use capture::{extract, Capture, Extraction, FieldCaptures};
pub use extract::{preprocess, strip_comments};
pub use validate::validate;
pub use xml::{parse_tree, Content, Document, Node, ROOT_NAME};
