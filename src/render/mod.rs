//! Document renderers.
//!
//! Every renderer implements [`DocumentRenderer`]. The schema-driven renderers
//! take a [`FieldDocument`]; the submission questionnaire takes its own fixed
//! input and never sees a template.

pub mod docx;
pub mod xlsx;

pub use docx::{FieldListDocxRenderer, SubmissionDocxRenderer};
pub use xlsx::XlsxRenderer;

use crate::mapping::FieldValueMap;
use crate::record::FieldValue;
use crate::template::{FieldType, OutputFormat, TemplateDefinition};
use std::any::Any;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize document XML: {0}")]
    Xml(String),

    #[error("failed to write document package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("i/o error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid logo image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("{0}")]
    Other(String),

    #[error("renderer panicked: {0}")]
    Panicked(String),
}

impl RenderError {
    pub(crate) fn xml(error: impl std::fmt::Display) -> Self {
        RenderError::Xml(error.to_string())
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        RenderError::Panicked(message)
    }
}

/// A strategy that turns some input into the bytes of one document format.
pub trait DocumentRenderer: Send + Sync {
    type Input: ?Sized;

    fn output_format(&self) -> OutputFormat;

    fn render(&self, input: &Self::Input) -> Result<Vec<u8>, RenderError>;

    fn mime_type(&self) -> &'static str {
        self.output_format().mime_type()
    }
}

/// Renderer for schema-driven field documents, as stored by the export engine.
pub type BoxedFieldRenderer = Box<dyn DocumentRenderer<Input = FieldDocument>>;

/// One field of a template that has a value to show.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub value: FieldValue,
}

/// Template title plus its present fields, in declared order.
///
/// Fields without a value in the map are already left out; renderers apply
/// any further omission (the DOCX renderer also skips empty strings).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDocument {
    pub template_id: String,
    pub title: String,
    pub rows: Vec<FieldRow>,
}

impl FieldDocument {
    pub fn new(template: &TemplateDefinition, values: &FieldValueMap) -> Self {
        let rows = template
            .fields
            .iter()
            .filter_map(|field| {
                values.get(&field.name).map(|value| FieldRow {
                    name: field.name.clone(),
                    label: field.label.clone(),
                    field_type: field.field_type,
                    value: value.clone(),
                })
            })
            .collect();
        Self {
            template_id: template.id.clone(),
            title: template.name.clone(),
            rows,
        }
    }
}
