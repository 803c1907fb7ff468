//! Export orchestration.
//!
//! [`ExportEngine`] ties the pieces together: look up the template, validate
//! the record, map fields, pick a renderer by output format and name the
//! resulting file. Validation failures stop the pipeline before any renderer
//! runs.

use crate::error::ExportError;
use crate::mapping::{FieldOverrides, FieldValueMap, map_fields};
use crate::naming::{Clock, FileNamer, FileNaming, SystemClock, sanitize_stem};
use crate::render::{
    BoxedFieldRenderer, DocumentRenderer, FieldDocument, FieldListDocxRenderer, RenderError,
    SubmissionDocxRenderer, XlsxRenderer,
};
use crate::submission::SubmissionExport;
use crate::template::{OutputFormat, TemplateDefinition, TemplateRegistry};
use crate::validation::{ValidationResult, Validator, validate_template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_SLOW_RENDER_MS: u64 = 500;
const MATTER_FALLBACK_STEM: &str = "matter";
const SUBMISSION_FALLBACK_STEM: &str = "submission";

// ============================================================================
// REQUEST / RESULT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub matter_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_overrides: Option<FieldOverrides>,
}

impl GenerateRequest {
    pub fn new(matter_data: Value) -> Self {
        Self {
            matter_data,
            field_overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: FieldOverrides) -> Self {
        self.field_overrides = Some(overrides);
        self
    }
}

/// A rendered document ready to hand to storage or a download response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub buffer: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Never-failing outcome of a generation call.
///
/// The buffer is left out of serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip)]
    pub buffer: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl GenerationResult {
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            buffer: None,
            file_name: None,
            mime_type: None,
            errors: Some(errors),
        }
    }

    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}

impl From<GeneratedDocument> for GenerationResult {
    fn from(doc: GeneratedDocument) -> Self {
        Self {
            success: true,
            buffer: Some(doc.buffer),
            file_name: Some(doc.file_name),
            mime_type: Some(doc.mime_type.to_string()),
            errors: None,
        }
    }
}

impl From<ExportError> for GenerationResult {
    fn from(err: ExportError) -> Self {
        Self::failure(err.messages())
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Stateless export pipeline over a shared, read-only template registry.
pub struct ExportEngine {
    registry: Arc<TemplateRegistry>,
    renderers: HashMap<OutputFormat, BoxedFieldRenderer>,
    submission_renderer: SubmissionDocxRenderer,
    namer: FileNamer,
    clock: Arc<dyn Clock>,
    slow_render_ms: u64,
}

impl std::fmt::Debug for ExportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats = self.renderers.keys().map(|k| k.as_ref()).collect::<Vec<_>>();
        formats.sort_unstable();
        f.debug_struct("ExportEngine")
            .field("templates", &self.registry.len())
            .field("formats", &formats)
            .field("file_naming", &self.namer.strategy())
            .field("slow_render_ms", &self.slow_render_ms)
            .finish()
    }
}

impl ExportEngine {
    /// Engine with the DOCX field-list and XLSX renderers installed.
    pub fn new(registry: Arc<TemplateRegistry>) -> Self {
        Self {
            registry,
            renderers: HashMap::new(),
            submission_renderer: SubmissionDocxRenderer::new(),
            namer: FileNamer::default(),
            clock: Arc::new(SystemClock),
            slow_render_ms: DEFAULT_SLOW_RENDER_MS,
        }
        .with_renderer(FieldListDocxRenderer::new())
        .with_renderer(XlsxRenderer::new())
    }

    /// Installs `renderer` for its output format, replacing any previous one.
    pub fn with_renderer<R>(mut self, renderer: R) -> Self
    where
        R: DocumentRenderer<Input = FieldDocument> + 'static,
    {
        self.renderers
            .insert(renderer.output_format(), Box::new(renderer));
        self
    }

    pub fn without_renderer(mut self, format: OutputFormat) -> Self {
        self.renderers.remove(&format);
        self
    }

    pub fn with_file_naming(mut self, strategy: FileNaming) -> Self {
        self.namer = FileNamer::new(strategy);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_slow_render_threshold(mut self, millis: u64) -> Self {
        self.slow_render_ms = millis;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn supports(&self, format: OutputFormat) -> bool {
        self.renderers.contains_key(&format)
    }

    pub fn validate(&self, template_id: &str, record: &Value) -> ValidationResult {
        Validator::new(&self.registry).validate(template_id, record)
    }

    /// Validated field values without rendering, e.g. to prefill a form.
    pub fn preview(
        &self,
        template_id: &str,
        request: &GenerateRequest,
    ) -> Result<FieldValueMap, ExportError> {
        let template = self.checked_template(template_id, &request.matter_data)?;
        Ok(map_fields(
            template,
            &request.matter_data,
            request.field_overrides.as_ref(),
        ))
    }

    pub fn try_generate(
        &self,
        template_id: &str,
        request: &GenerateRequest,
    ) -> Result<GeneratedDocument, ExportError> {
        let template = self.checked_template(template_id, &request.matter_data)?;
        let format = template.output_format;
        let span = crate::logging::export_span(template_id, format.as_ref());
        let _enter = span.enter();

        let values = map_fields(
            template,
            &request.matter_data,
            request.field_overrides.as_ref(),
        );
        // the record's own title names the file; overrides never rename it
        let title = request
            .matter_data
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let stem = sanitize_stem(title, MATTER_FALLBACK_STEM);
        let now = self.clock.now_millis();

        let renderer = self
            .renderers
            .get(&format)
            .ok_or(ExportError::UnsupportedFormat(format))?;

        let doc = FieldDocument::new(template, &values);
        let buffer = self.timed_render(template_id, || renderer.render(&doc))?;

        let file_name = self.namer.file_name(
            &stem,
            template.template_type.as_ref(),
            format.extension(),
            now,
            &buffer,
        );
        span.record("file_name", file_name.as_str());
        span.record("bytes", buffer.len());
        tracing::info!(fields = values.len(), "document generated");

        Ok(GeneratedDocument {
            buffer,
            file_name,
            mime_type: renderer.mime_type(),
        })
    }

    pub fn generate(&self, template_id: &str, request: &GenerateRequest) -> GenerationResult {
        match self.try_generate(template_id, request) {
            Ok(doc) => doc.into(),
            Err(err) => {
                tracing::warn!(
                    template_id,
                    category = err.category(),
                    error = %err,
                    "document generation failed"
                );
                err.into()
            }
        }
    }

    /// Renders the fixed submission questionnaire.
    pub fn try_export_submission(
        &self,
        export: &SubmissionExport,
    ) -> Result<GeneratedDocument, ExportError> {
        let kind = format!("{}_submission", export.directory);
        let span = crate::logging::export_span(&kind, OutputFormat::Docx.as_ref());
        let _enter = span.enter();

        let stem = sanitize_stem(&export.firm.name, SUBMISSION_FALLBACK_STEM);
        let now = self.clock.now_millis();
        let buffer = self.timed_render(&kind, || self.submission_renderer.render(export))?;
        let file_name = self.namer.file_name(
            &stem,
            &kind,
            OutputFormat::Docx.extension(),
            now,
            &buffer,
        );
        span.record("file_name", file_name.as_str());
        span.record("bytes", buffer.len());
        tracing::info!("submission generated");

        Ok(GeneratedDocument {
            buffer,
            file_name,
            mime_type: self.submission_renderer.mime_type(),
        })
    }

    pub fn export_submission(&self, export: &SubmissionExport) -> GenerationResult {
        match self.try_export_submission(export) {
            Ok(doc) => doc.into(),
            Err(err) => {
                tracing::warn!(
                    directory = %export.directory,
                    category = err.category(),
                    error = %err,
                    "submission export failed"
                );
                err.into()
            }
        }
    }

    fn checked_template(
        &self,
        template_id: &str,
        record: &Value,
    ) -> Result<&TemplateDefinition, ExportError> {
        let template =
            self.registry
                .get(template_id)
                .ok_or_else(|| ExportError::TemplateNotFound {
                    template_id: template_id.to_string(),
                })?;
        let validation = validate_template(template, record);
        if !validation.valid {
            return Err(ExportError::ValidationFailed(validation));
        }
        Ok(template)
    }

    /// Runs a renderer, turning panics into errors and reporting slow renders.
    fn timed_render<F>(&self, label: &str, render: F) -> Result<Vec<u8>, RenderError>
    where
        F: FnOnce() -> Result<Vec<u8>, RenderError>,
    {
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(render)).unwrap_or_else(|payload| {
            Err(RenderError::from_panic(payload))
        });
        crate::log_slow_operation!(
            started.elapsed(),
            self.slow_render_ms,
            operation = label,
            ok = outcome.is_ok(),
            "render finished"
        );
        outcome
    }
}
