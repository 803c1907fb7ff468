mod support;

use assert_matches::assert_matches;
use directory_export::{
    DocumentRenderer, ExportError, FieldDocument, FieldOverrides, FieldValue, FileNaming,
    GenerateRequest, OutputFormat, RenderError, TemplateDefinition, TemplateField,
    TemplateRegistry, TemplateType,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use support::{FIXED_MILLIS, document_xml, engine, engine_with, matter};

struct CountingRenderer {
    calls: Arc<AtomicUsize>,
}

impl DocumentRenderer for CountingRenderer {
    type Input = FieldDocument;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn render(&self, _doc: &FieldDocument) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(b"counted".to_vec())
    }
}

struct PanickingRenderer;

impl DocumentRenderer for PanickingRenderer {
    type Input = FieldDocument;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn render(&self, _doc: &FieldDocument) -> Result<Vec<u8>, RenderError> {
        panic!("sheet exploded")
    }
}

struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    type Input = FieldDocument;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn render(&self, _doc: &FieldDocument) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Other("template engine offline".into()))
    }
}

#[test]
fn complete_record_generates_named_docx() {
    let result = engine().generate("chambers-2024", &GenerateRequest::new(matter()));

    assert!(result.success, "errors: {:?}", result.errors());
    assert_eq!(
        result.file_name.as_deref(),
        Some(format!("AcquisitionofBetaLtdbyAcme_chambers_{FIXED_MILLIS}.docx").as_str())
    );
    assert_eq!(
        result.mime_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    );
    let xml = document_xml(result.buffer.as_deref().unwrap());
    assert!(xml.contains("Chambers and Partners 2024 Matter Submission"));
    assert!(xml.contains("Acme Corp, Gamma Holdings"));
    assert!(xml.contains("Closed in six weeks, Secured regulatory approval"));
    assert!(result.errors.is_none());
}

#[test]
fn file_name_shape_holds_for_any_title() {
    let mut record = matter();
    record["title"] = json!("עסקת מיזוג !!! $$$ 2024 ".repeat(5));
    let result = engine().generate("chambers-2024", &GenerateRequest::new(record));
    let name = result.file_name.unwrap();
    let (stem, rest) = name.split_once('_').unwrap();
    assert!((1..=50).contains(&stem.len()));
    assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(rest, format!("chambers_{FIXED_MILLIS}.docx"));
}

#[test]
fn title_override_keeps_record_title_in_file_name() {
    let request = GenerateRequest::new(matter())
        .with_overrides(FieldOverrides::new().with("title", "Edited Title"));
    let result = engine().generate("chambers-2024", &request);

    assert!(result.success, "errors: {:?}", result.errors());
    assert_eq!(
        result.file_name.as_deref(),
        Some(format!("AcquisitionofBetaLtdbyAcme_chambers_{FIXED_MILLIS}.docx").as_str())
    );
    assert!(document_xml(result.buffer.as_deref().unwrap()).contains("Edited Title"));
}

#[test]
fn missing_required_field_is_reported() {
    let mut record = matter();
    record.as_object_mut().unwrap().remove("clientName");
    let result = engine().generate("chambers-2024", &GenerateRequest::new(record));

    assert!(!result.success);
    assert_eq!(result.errors(), ["Missing required field: clientName"]);
    assert!(result.buffer.is_none());
    assert!(result.file_name.is_none());
}

#[test]
fn over_long_description_is_invalid() {
    let mut record = matter();
    record["synthesizedData"]["description"] = json!("x".repeat(2001));
    let engine = engine();

    let validation = engine.validate("chambers-2024", &record);
    assert!(!validation.valid);
    assert!(validation.missing_fields.is_empty());
    assert_eq!(validation.invalid_fields.len(), 1);
    assert_eq!(validation.invalid_fields[0].field, "description");
    assert_eq!(
        validation.invalid_fields[0].reason,
        "Exceeds maximum length of 2000"
    );

    let result = engine.generate("chambers-2024", &GenerateRequest::new(record));
    assert_eq!(result.errors(), ["description: Exceeds maximum length of 2000"]);
}

#[test]
fn overrides_win_over_record_values() {
    let mut record = matter();
    record["clientName"] = json!("Beta");
    let request =
        GenerateRequest::new(record).with_overrides(FieldOverrides::new().with("clientName", "Acme"));

    let values = engine().preview("chambers-2024", &request).unwrap();
    assert_eq!(values.get("clientName"), Some(&FieldValue::from("Acme")));

    let result = engine().generate("chambers-2024", &request);
    let xml = document_xml(result.buffer.as_deref().unwrap());
    assert!(xml.contains(">Acme<"));
}

#[test]
fn pdf_templates_are_unsupported() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(
            TemplateDefinition::new("firm-pdf", "Firm PDF", TemplateType::Custom, OutputFormat::Pdf)
                .field(TemplateField::text("title", "Title").required().mapped_from("title")),
        )
        .unwrap();
    let engine = engine_with(registry);

    let result = engine.generate("firm-pdf", &GenerateRequest::new(matter()));
    assert_eq!(result.errors(), ["Unsupported format: pdf"]);
    assert_matches!(
        engine.try_generate("firm-pdf", &GenerateRequest::new(matter())),
        Err(ExportError::UnsupportedFormat(OutputFormat::Pdf))
    );
}

#[test]
fn null_deal_value_is_omitted_not_zero() {
    let mut record = matter();
    record["dealValue"] = serde_json::Value::Null;
    let engine = engine();

    let values = engine
        .preview("chambers-2024", &GenerateRequest::new(record.clone()))
        .unwrap();
    assert!(!values.contains("dealValue"));
    assert!(!values.contains("currency"));

    let result = engine.generate("chambers-2024", &GenerateRequest::new(record));
    let xml = document_xml(result.buffer.as_deref().unwrap());
    assert!(!xml.contains("Deal Value"));
    assert!(!xml.contains(">null<"));
}

#[test]
fn unknown_template_fails_without_rendering() {
    let result = engine().generate("nope", &GenerateRequest::new(matter()));
    assert_eq!(result.errors(), ["Template not found"]);

    let validation = engine().validate("nope", &matter());
    assert!(!validation.valid);
    assert_eq!(validation.invalid_fields[0].field, "template");
    assert_eq!(validation.invalid_fields[0].reason, "Template not found");
}

#[test]
fn invalid_records_never_reach_the_renderer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine().with_renderer(CountingRenderer {
        calls: Arc::clone(&calls),
    });

    let result = engine.generate("chambers-2024", &GenerateRequest::new(json!({})));
    assert_eq!(
        result.errors(),
        [
            "Missing required field: title",
            "Missing required field: clientName"
        ]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let result = engine.generate("chambers-2024", &GenerateRequest::new(matter()));
    assert!(result.success);
    assert_eq!(result.buffer.as_deref(), Some(&b"counted"[..]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn renderer_panics_become_failures() {
    let record = json!({ "title": "T", "clientName": "C", "leadPartner": "P" });
    let engine = engine().with_renderer(PanickingRenderer);
    let result = engine.generate("duns100-2024", &GenerateRequest::new(record));
    assert!(!result.success);
    assert_eq!(result.errors(), ["renderer panicked: sheet exploded"]);
}

#[test]
fn renderer_errors_are_the_sole_message() {
    let engine = engine().with_renderer(FailingRenderer);
    let result = engine.generate("legal500-2024", &GenerateRequest::new(matter()));
    assert_eq!(result.errors(), ["template engine offline"]);
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let engine = engine();
    let a = engine.generate("legal500-2024", &GenerateRequest::new(matter()));
    let b = engine.generate("legal500-2024", &GenerateRequest::new(matter()));
    assert_eq!(a.buffer, b.buffer);
    assert_eq!(a.file_name, b.file_name);
}

#[test]
fn sequenced_names_are_unique_within_an_engine() {
    let engine = engine().with_file_naming(FileNaming::Sequenced);
    let names = (0..3)
        .map(|_| {
            engine
                .generate("chambers-2024", &GenerateRequest::new(matter()))
                .file_name
                .unwrap()
        })
        .collect::<Vec<_>>();
    assert_eq!(
        names[2],
        format!("AcquisitionofBetaLtdbyAcme_chambers_{FIXED_MILLIS}-0003.docx")
    );
    assert_ne!(names[0], names[1]);
}

#[test]
fn content_hash_names_track_the_buffer() {
    let engine = engine().with_file_naming(FileNaming::ContentHash);
    let a = engine.generate("chambers-2024", &GenerateRequest::new(matter()));
    let mut other = matter();
    other["leadPartner"] = json!("Someone Else");
    let b = engine.generate("chambers-2024", &GenerateRequest::new(other));

    let name_a = a.file_name.unwrap();
    let name_b = b.file_name.unwrap();
    assert_ne!(name_a, name_b);
    let hash = name_a
        .strip_prefix("AcquisitionofBetaLtdbyAcme_chambers_")
        .and_then(|rest| rest.strip_suffix(".docx"))
        .unwrap();
    assert_eq!(hash.len(), 12);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn untitled_matters_fall_back_to_matter_stem() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(
            TemplateDefinition::new("notes", "Notes", TemplateType::Custom, OutputFormat::Docx)
                .field(TemplateField::text("note", "Note").mapped_from("note")),
        )
        .unwrap();
    let result = engine_with(registry).generate("notes", &GenerateRequest::new(json!({})));
    assert_eq!(
        result.file_name.as_deref(),
        Some(format!("matter_custom_{FIXED_MILLIS}.docx").as_str())
    );
}

#[test]
fn engine_serves_concurrent_callers() {
    let engine = Arc::new(engine().with_file_naming(FileNaming::Sequenced));
    let handles = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                engine
                    .generate("legal500-2024", &GenerateRequest::new(matter()))
                    .file_name
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();
    let mut names = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Vec<_>>();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 4);
}
