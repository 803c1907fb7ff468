//! Errors surfaced by the export engine.
//!
//! Every variant maps onto the flat message list carried by
//! [`GenerationResult`](crate::export::GenerationResult) via
//! [`ExportError::messages`].

use crate::render::RenderError;
use crate::template::OutputFormat;
use crate::validation::{TEMPLATE_NOT_FOUND, ValidationResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Template not found")]
    TemplateNotFound { template_id: String },

    #[error("validation failed with {} violation(s)", .0.violation_count())]
    ValidationFailed(ValidationResult),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(OutputFormat),

    #[error(transparent)]
    Rendering(#[from] RenderError),
}

impl ExportError {
    /// Error strings as reported to callers, in order.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ExportError::TemplateNotFound { .. } => vec![TEMPLATE_NOT_FOUND.to_string()],
            ExportError::ValidationFailed(result) => result.messages(),
            ExportError::UnsupportedFormat(_) | ExportError::Rendering(_) => {
                vec![self.to_string()]
            }
        }
    }

    /// Stable tag for logs.
    pub fn category(&self) -> &'static str {
        match self {
            ExportError::TemplateNotFound { .. } => "template_not_found",
            ExportError::ValidationFailed(_) => "validation_failed",
            ExportError::UnsupportedFormat(_) => "unsupported_format",
            ExportError::Rendering(_) => "rendering_failure",
        }
    }
}
