use crate::export::DEFAULT_SLOW_RENDER_MS;
use crate::naming::FileNaming;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub file_naming: FileNaming,
    pub templates_file: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    pub slow_render_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_naming: FileNaming::default(),
            templates_file: None,
            logo: None,
            slow_render_ms: DEFAULT_SLOW_RENDER_MS,
        }
    }
}

impl ExportConfig {
    /// Command-line flags win over the config file, which wins over defaults.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let file_config = if let Some(path) = args.config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            output_dir: file_output_dir,
            file_naming: file_file_naming,
            templates_file: file_templates_file,
            logo: file_logo,
            slow_render_ms: file_slow_render_ms,
        } = file_config;

        let cli_logo = match &args.command {
            Command::Submission { logo, .. } => logo.clone(),
            _ => None,
        };

        Ok(Self {
            output_dir: args
                .output_dir
                .clone()
                .or(file_output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            file_naming: args
                .file_naming
                .or(file_file_naming)
                .unwrap_or_default(),
            templates_file: args.templates_file.clone().or(file_templates_file),
            logo: cli_logo.or(file_logo),
            slow_render_ms: args
                .slow_render_ms
                .or(file_slow_render_ms)
                .unwrap_or(DEFAULT_SLOW_RENDER_MS),
        })
    }

    /// Fails fast on referenced files that are missing.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = self.templates_file.as_ref() {
            anyhow::ensure!(
                path.is_file(),
                "templates file {:?} does not exist or is not a file",
                path
            );
        }
        if let Some(path) = self.logo.as_ref() {
            anyhow::ensure!(
                path.is_file(),
                "logo {:?} does not exist or is not a file",
                path
            );
        }
        if self.output_dir.exists() {
            anyhow::ensure!(
                self.output_dir.is_dir(),
                "output dir {:?} is not a directory",
                self.output_dir
            );
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "directory-export",
    about = "Render legal-directory submissions to DOCX and XLSX",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML, JSON or TOML)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "out-dir",
        env = "DIRECTORY_EXPORT_OUTPUT_DIR",
        value_name = "DIR",
        help = "Directory generated documents are written to",
        global = true
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "DIRECTORY_EXPORT_FILE_NAMING",
        value_enum,
        value_name = "STRATEGY",
        help = "Filename strategy: timestamp, sequenced or content_hash",
        global = true
    )]
    pub file_naming: Option<FileNaming>,

    #[arg(
        long,
        env = "DIRECTORY_EXPORT_TEMPLATES",
        value_name = "FILE",
        help = "Extra template catalog registered after the built-in one",
        global = true
    )]
    pub templates_file: Option<PathBuf>,

    #[arg(
        long,
        env = "DIRECTORY_EXPORT_SLOW_RENDER_MS",
        value_name = "MS",
        help = "Warn when a render takes longer than this",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub slow_render_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered templates
    Templates,
    /// Validate a record against a template and print the result
    Validate {
        #[arg(long, value_name = "ID")]
        template: String,
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Render a record with a template
    Generate {
        #[arg(long, value_name = "ID")]
        template: String,
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,
    },
    /// Render the fixed submission questionnaire
    Submission {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, env = "DIRECTORY_EXPORT_LOGO", value_name = "PNG")]
        logo: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    output_dir: Option<PathBuf>,
    file_naming: Option<FileNaming>,
    templates_file: Option<PathBuf>,
    logo: Option<PathBuf>,
    slow_render_ms: Option<u64>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    load_structured_file(path)
}

/// Reads YAML, JSON or TOML, picked by file extension.
pub fn load_structured_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON {:?}", path))?,
        "toml" => {
            toml::from_str(&contents).with_context(|| format!("failed to parse TOML {:?}", path))?
        }
        other => anyhow::bail!("unsupported file extension: {other}"),
    };
    Ok(parsed)
}
