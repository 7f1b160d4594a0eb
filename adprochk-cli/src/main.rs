mod config;

use adprochk_core::adapters::{FsArchiveSource, FsWritePort};
use adprochk_core::pipeline::{build_report, run_check};
use adprochk_core::settings::CheckSettings;
use adprochk_render::render_report_text;
use adprochk_types::report::ToolInfo;
use adprochk_types::{CheckStatus, FatalError};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "adprochk",
    version,
    about = "Consistency checker and repair tool for Productivity Suite project archives."
)]
struct Cli {
    /// The .adpro file to check.
    projfile: Utf8PathBuf,

    /// Logging level: trace, debug, info, warning, error or critical.
    #[arg(short = 'l', long, default_value = "warning")]
    loglevel: String,

    /// Write a repaired archive to this path when problems are found.
    #[arg(long, value_name = "OUT")]
    fix: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Config file (default: ./adprochk.toml when present).
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(CheckStatus::INVALID_INVOCATION.exit_code())
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(if e.use_stderr() {
                ExitCode::from(CheckStatus::INVALID_INVOCATION.exit_code())
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    let level = filter_directive(&cli.loglevel);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.as_ref().map_or("warn", |l| *l))),
        )
        .with_writer(std::io::stderr)
        .init();

    let started_at = Utc::now();
    let mut settings = CheckSettings::new(cli.projfile.clone());
    settings.fix_output = cli.fix.clone();

    let result = level
        .and_then(|_| configure(&cli, &mut settings))
        .and_then(|()| run_check(&settings, &FsArchiveSource, &FsWritePort));

    if let Err(err) = &result {
        error!(status = %err.status(), "{err}");
    }

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let report = build_report(&settings, &result, tool, started_at);
    debug!(status = %report.status, exit_code = report.exit_code, "run finished");

    match cli.format {
        OutputFormat::Text => print!("{}", render_report_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }

    Ok(ExitCode::from(report.exit_code))
}

/// Map a `--loglevel` name onto a tracing filter directive.
fn filter_directive(level: &str) -> Result<&'static str, FatalError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "critical" => Ok("error"),
        other => Err(FatalError::InvalidInvocation {
            message: format!("unknown log level '{other}'"),
        }),
    }
}

fn configure(cli: &Cli, settings: &mut CheckSettings) -> Result<(), FatalError> {
    let file_config = config::load_or_default(cli.config.as_deref(), Utf8Path::new("."))
        .map_err(|e| FatalError::InvalidInvocation {
            message: format!("{e:#}"),
        })?;
    file_config.apply_to(settings);
    debug!(?settings, "effective settings");
    Ok(())
}
