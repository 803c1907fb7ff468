//! Declarative template schemas.
//!
//! A [`TemplateDefinition`] describes one exportable document type as an ordered
//! list of [`TemplateField`]s. Definitions are plain values; they are checked
//! for self-consistency once, when registered (see [`TemplateDefinition::check`]).

use crate::record::FieldPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Problems found in a template definition at registration time
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("template id cannot be empty")]
    EmptyId,

    #[error("template '{template}' declares a field with an empty name")]
    EmptyFieldName { template: String },

    #[error("template '{template}' declares field '{field}' more than once")]
    DuplicateField { template: String, field: String },

    #[error("select field '{field}' in template '{template}' has no options")]
    SelectWithoutOptions { template: String, field: String },

    #[error("number field '{field}' in template '{template}' cannot declare maxLength")]
    MaxLengthOnNumber { template: String, field: String },

    #[error("field '{field}' in template '{template}' has malformed source path '{path}'")]
    InvalidPath {
        template: String,
        field: String,
        path: String,
    },
}

// ============================================================================
// ENUMS
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Textarea,
}

impl FieldType {
    /// Whether values of this type are strings subject to `maxLength`.
    pub fn is_textual(&self) -> bool {
        !matches!(self, FieldType::Number)
    }
}

/// The directory (or custom target) a template exports for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum TemplateType {
    #[serde(rename = "duns_100")]
    #[strum(serialize = "duns_100")]
    Duns100,
    #[serde(rename = "chambers")]
    #[strum(serialize = "chambers")]
    Chambers,
    #[serde(rename = "legal_500")]
    #[strum(serialize = "legal_500")]
    Legal500,
    #[serde(rename = "custom")]
    #[strum(serialize = "custom")]
    Custom,
}

impl TemplateType {
    /// Publication name as printed on documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateType::Duns100 => "Dun's 100",
            TemplateType::Chambers => "Chambers and Partners",
            TemplateType::Legal500 => "The Legal 500",
            TemplateType::Custom => "Custom",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Xlsx,
    /// Declared for catalog compatibility; no renderer ships for it.
    Pdf,
}

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_MIME_TYPE: &str = "application/pdf";

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => DOCX_MIME_TYPE,
            OutputFormat::Xlsx => XLSX_MIME_TYPE,
            OutputFormat::Pdf => PDF_MIME_TYPE,
        }
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// One declared field of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Source path into the record; without one the value must come from an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_from: Option<FieldPath>,
}

impl TemplateField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            max_length: None,
            options: None,
            mapped_from: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Text)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Textarea)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn mapped_from(mut self, path: &str) -> Self {
        self.mapped_from = Some(FieldPath::dotted(path));
        self
    }

    /// Path the validator reads: the declared source, else the field name.
    pub fn source_path(&self) -> FieldPath {
        self.mapped_from
            .clone()
            .unwrap_or_else(|| FieldPath::dotted(&self.name))
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// A named, versioned export template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    #[serde(default)]
    pub description: String,
    pub output_format: OutputFormat,
    #[serde(default)]
    pub version: String,
    pub fields: Vec<TemplateField>,
}

impl TemplateDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template_type: TemplateType,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template_type,
            description: String::new(),
            output_format,
            version: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn field(mut self, field: TemplateField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TemplateField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Checks the definition is internally consistent.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::EmptyId);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    template: self.id.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    template: self.id.clone(),
                    field: field.name.clone(),
                });
            }
            if field.field_type == FieldType::Select
                && field.options.as_ref().is_none_or(|o| o.is_empty())
            {
                return Err(SchemaError::SelectWithoutOptions {
                    template: self.id.clone(),
                    field: field.name.clone(),
                });
            }
            if !field.field_type.is_textual() && field.max_length.is_some() {
                return Err(SchemaError::MaxLengthOnNumber {
                    template: self.id.clone(),
                    field: field.name.clone(),
                });
            }
            if let Some(path) = &field.mapped_from
                && !path.is_well_formed()
            {
                return Err(SchemaError::InvalidPath {
                    template: self.id.clone(),
                    field: field.name.clone(),
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TemplateDefinition {
        TemplateDefinition::new("t", "T", TemplateType::Custom, OutputFormat::Docx)
    }

    #[test]
    fn type_tags_use_wire_names() {
        assert_eq!(TemplateType::Duns100.to_string(), "duns_100");
        assert_eq!(TemplateType::Legal500.to_string(), "legal_500");
        assert_eq!(
            serde_json::to_string(&TemplateType::Duns100).unwrap(),
            "\"duns_100\""
        );
        assert_eq!(OutputFormat::Xlsx.extension(), "xlsx");
        assert_eq!(OutputFormat::Docx.extension(), "docx");
        assert_eq!(OutputFormat::Pdf.extension(), OutputFormat::Pdf.to_string());
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
    }

    #[test]
    fn check_rejects_duplicate_names() {
        let def = base()
            .field(TemplateField::text("a", "A"))
            .field(TemplateField::text("a", "A again"));
        assert!(matches!(
            def.check(),
            Err(SchemaError::DuplicateField { field, .. }) if field == "a"
        ));
    }

    #[test]
    fn check_rejects_select_without_options() {
        let def = base().field(TemplateField::new("s", "S", FieldType::Select));
        assert!(matches!(def.check(), Err(SchemaError::SelectWithoutOptions { .. })));

        let def = base().field(
            TemplateField::new("s", "S", FieldType::Select).options(Vec::<String>::new()),
        );
        assert!(def.check().is_err());

        let def = base().field(TemplateField::new("s", "S", FieldType::Select).options(["x"]));
        assert!(def.check().is_ok());
    }

    #[test]
    fn check_rejects_max_length_on_numbers_and_bad_paths() {
        let def = base().field(TemplateField::new("n", "N", FieldType::Number).max_length(3));
        assert!(matches!(def.check(), Err(SchemaError::MaxLengthOnNumber { .. })));

        let def = base().field(TemplateField::text("p", "P").mapped_from("a..b"));
        assert!(matches!(def.check(), Err(SchemaError::InvalidPath { .. })));
    }

    #[test]
    fn source_path_falls_back_to_name() {
        let field = TemplateField::text("clientName", "Client");
        assert_eq!(field.source_path().to_string(), "clientName");
        let dotted = TemplateField::text("client.name", "Client");
        assert_eq!(dotted.source_path().segments(), ["client", "name"]);
        let field = field.mapped_from("client.name");
        assert_eq!(field.source_path().to_string(), "client.name");
    }

    #[test]
    fn definitions_deserialize_from_camel_case() {
        let def: TemplateDefinition = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": "X",
            "type": "legal_500",
            "outputFormat": "xlsx",
            "fields": [
                { "name": "title", "label": "Title", "type": "text", "required": true,
                  "maxLength": 10, "mappedFrom": "matter.title" }
            ]
        }))
        .unwrap();
        assert_eq!(def.template_type, TemplateType::Legal500);
        assert_eq!(def.fields[0].max_length, Some(10));
        assert_eq!(
            def.fields[0].mapped_from.as_ref().map(|p| p.to_string()),
            Some("matter.title".to_string())
        );
    }
}
