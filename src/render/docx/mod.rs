//! DOCX renderers built directly on the OOXML package format.

mod field_list;
mod package;
mod submission;
pub(crate) mod xml;

pub use field_list::FieldListDocxRenderer;
pub use submission::SubmissionDocxRenderer;
