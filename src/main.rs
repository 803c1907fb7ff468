use clap::Parser;
use directory_export::{CliArgs, ExportConfig, LoggingConfig, init_logging, run_command};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let config = ExportConfig::from_args(&cli)?;

    // fail fast on missing files before doing any work
    config.validate()?;

    let ok = run_command(&config, &cli.command, &mut std::io::stdout().lock())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
