pub mod catalog;
pub mod registry;
pub mod schema;

pub use catalog::{builtin_templates, load_catalog_file};
pub use registry::TemplateRegistry;
pub use schema::{
    DOCX_MIME_TYPE, FieldType, OutputFormat, PDF_MIME_TYPE, SchemaError, TemplateDefinition,
    TemplateField, TemplateType, XLSX_MIME_TYPE,
};
