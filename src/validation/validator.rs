use crate::record::{FieldValue, resolve};
use crate::template::{TemplateDefinition, TemplateRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TEMPLATE_NOT_FOUND: &str = "Template not found";

/// One field that is present but violates a constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidField {
    pub field: String,
    pub reason: String,
}

/// Full report of a validation run; never stops at the first violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub missing_fields: Vec<String>,
    pub invalid_fields: Vec<InvalidField>,
}

impl ValidationResult {
    fn from_violations(missing_fields: Vec<String>, invalid_fields: Vec<InvalidField>) -> Self {
        Self {
            valid: missing_fields.is_empty() && invalid_fields.is_empty(),
            missing_fields,
            invalid_fields,
        }
    }

    pub fn template_not_found() -> Self {
        Self::from_violations(
            Vec::new(),
            vec![InvalidField {
                field: "template".to_string(),
                reason: TEMPLATE_NOT_FOUND.to_string(),
            }],
        )
    }

    /// Human-readable messages: missing fields first, then invalid ones.
    pub fn messages(&self) -> Vec<String> {
        self.missing_fields
            .iter()
            .map(|name| format!("Missing required field: {name}"))
            .chain(
                self.invalid_fields
                    .iter()
                    .map(|f| format!("{}: {}", f.field, f.reason)),
            )
            .collect()
    }

    pub fn violation_count(&self) -> usize {
        self.missing_fields.len() + self.invalid_fields.len()
    }
}

/// Validates records against templates held in a registry
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn validate(&self, template_id: &str, record: &Value) -> ValidationResult {
        match self.registry.get(template_id) {
            Some(template) => validate_template(template, record),
            None => ValidationResult::template_not_found(),
        }
    }
}

/// Checks every field of `template` against `record`.
///
/// Each field reads `mappedFrom`, or the field name when no source is
/// declared. A missing required field is not length-checked as well.
pub fn validate_template(template: &TemplateDefinition, record: &Value) -> ValidationResult {
    let mut missing_fields = Vec::new();
    let mut invalid_fields = Vec::new();

    for field in &template.fields {
        let value = resolve(record, &field.source_path());

        if field.required && value.as_ref().is_none_or(FieldValue::is_empty) {
            missing_fields.push(field.name.clone());
            continue;
        }

        if let (Some(FieldValue::Text(text)), Some(max)) = (&value, field.max_length)
            && text.chars().count() > max
        {
            invalid_fields.push(InvalidField {
                field: field.name.clone(),
                reason: format!("Exceeds maximum length of {max}"),
            });
        }
    }

    let result = ValidationResult::from_violations(missing_fields, invalid_fields);
    if !result.valid {
        tracing::debug!(
            template_id = %template.id,
            missing = result.missing_fields.len(),
            invalid = result.invalid_fields.len(),
            "record failed template validation"
        );
    }
    result
}
