pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod mapping;
pub mod naming;
pub mod record;
pub mod render;
pub mod submission;
pub mod template;
pub mod utils;
pub mod validation;

pub use cli::{build_engine, build_registry, run_command};
pub use config::{CliArgs, Command, ExportConfig};
pub use error::ExportError;
pub use export::{ExportEngine, GenerateRequest, GeneratedDocument, GenerationResult};
pub use logging::{LoggingConfig, init_logging};
pub use mapping::{FieldOverrides, FieldValueMap, map_fields};
pub use naming::{Clock, FileNaming, FixedClock, SystemClock};
pub use record::{FieldPath, FieldValue, resolve};
pub use render::{DocumentRenderer, FieldDocument, RenderError};
pub use submission::SubmissionExport;
pub use template::{
    OutputFormat, TemplateDefinition, TemplateField, TemplateRegistry, TemplateType,
};
pub use validation::{ValidationResult, Validator};
