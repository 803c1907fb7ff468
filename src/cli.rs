//! Command execution for the `directory-export` binary.

use crate::config::{Command, ExportConfig, load_structured_file};
use crate::export::{ExportEngine, GenerateRequest, GenerationResult};
use crate::mapping::FieldOverrides;
use crate::submission::{LogoImage, SubmissionExport};
use crate::template::{TemplateRegistry, load_catalog_file};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Built-in templates plus the configured catalog file, if any.
pub fn build_registry(config: &ExportConfig) -> Result<TemplateRegistry> {
    let mut registry = TemplateRegistry::with_builtin_templates();
    if let Some(path) = config.templates_file.as_ref() {
        let defs = load_catalog_file(path)?;
        let count = defs.len();
        registry
            .register_all(defs)
            .with_context(|| format!("invalid template in catalog {:?}", path))?;
        tracing::info!(path = %path.display(), templates = count, "template catalog loaded");
    }
    Ok(registry)
}

pub fn build_engine(config: &ExportConfig) -> Result<ExportEngine> {
    let registry = build_registry(config)?;
    Ok(ExportEngine::new(Arc::new(registry))
        .with_file_naming(config.file_naming)
        .with_slow_render_threshold(config.slow_render_ms))
}

/// Runs one subcommand, writing its report to `out`.
///
/// Returns `false` when the command completed but the outcome was negative
/// (invalid record, failed generation).
pub fn run_command<W: Write>(
    config: &ExportConfig,
    command: &Command,
    out: &mut W,
) -> Result<bool> {
    let engine = build_engine(config)?;

    match command {
        Command::Templates => {
            for def in engine.registry().list() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    def.id, def.template_type, def.output_format, def.version, def.name
                )?;
            }
            Ok(true)
        }
        Command::Validate { template, input } => {
            let record: Value = load_structured_file(input)?;
            let result = engine.validate(template, &record);
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            Ok(result.valid)
        }
        Command::Generate {
            template,
            input,
            overrides,
        } => {
            let mut request = GenerateRequest::new(load_structured_file(input)?);
            if let Some(path) = overrides {
                request = request.with_overrides(load_structured_file::<FieldOverrides>(path)?);
            }
            let result = engine.generate(template, &request);
            report(config, result, out)
        }
        Command::Submission { input, .. } => {
            let mut export: SubmissionExport = load_structured_file(input)?;
            if let Some(path) = config.logo.as_ref() {
                let bytes =
                    fs::read(path).with_context(|| format!("failed to read logo {:?}", path))?;
                export.logo = Some(LogoImage(bytes));
            }
            let result = engine.export_submission(&export);
            report(config, result, out)
        }
    }
}

fn report<W: Write>(
    config: &ExportConfig,
    result: GenerationResult,
    out: &mut W,
) -> Result<bool> {
    let mut summary = serde_json::to_value(&result)?;
    if let (Some(buffer), Some(file_name)) = (result.buffer.as_ref(), result.file_name.as_ref()) {
        let path = write_output(config, file_name, buffer)?;
        summary["path"] = Value::String(path.display().to_string());
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(result.success)
}

fn write_output(config: &ExportConfig, file_name: &str, buffer: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create output dir {:?}", config.output_dir))?;
    let path = config.output_dir.join(file_name);
    fs::write(&path, buffer).with_context(|| format!("failed to write {:?}", path))?;
    tracing::info!(path = %path.display(), bytes = buffer.len(), "document written");
    Ok(path)
}
