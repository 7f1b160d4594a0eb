//! Check and repair pipeline, extracted from the CLI.
//!
//! I/O-agnostic: reading the input and writing the repaired archive go through
//! the port traits. Everything in between happens in memory.

use crate::ports::{ArchiveSource, WritePort};
use crate::settings::CheckSettings;
use adprochk_archive::{LoadedProject, ProjectArchive, load_project, rebuild};
use adprochk_domain::{check_project, plan_repair};
use adprochk_edit::repair_project;
use adprochk_types::report::{CheckReport, RepairReport, RunInfo, ToolInfo};
use adprochk_types::{CheckStatus, FatalError, ProjectErrors, ProjectIds, schema};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

/// Outcome of a run that got as far as reconciling the archive.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub ids: ProjectIds,
    pub errors: ProjectErrors,
    /// Findings bits, plus the fatal bit of `fatal` if repair failed.
    pub status: CheckStatus,
    pub repair: Option<RepairReport>,
    /// Failure during repair; no output was written.
    pub fatal: Option<FatalError>,
}

/// Check one archive and, when requested and needed, repair it.
///
/// Errors loading the input are returned as `Err`. A failure while repairing is
/// recorded in [`CheckOutcome::fatal`] so the findings are still reported.
pub fn run_check(
    settings: &CheckSettings,
    source: &dyn ArchiveSource,
    writer: &dyn WritePort,
) -> Result<CheckOutcome, FatalError> {
    let bytes = source
        .read_archive(&settings.input)
        .map_err(|e| FatalError::ArchiveUnreadable {
            path: settings.input.to_string(),
            message: format!("{e:#}"),
        })?;
    let mut archive = ProjectArchive::from_bytes(settings.input.as_str(), bytes)?;
    let project = load_project(&mut archive, &settings.load)?;

    let ids = project.ids();
    let errors = check_project(&ids);
    let mut status = errors.status();
    info!(input = %settings.input, status = %status, "checked project");

    let mut repair = None;
    let mut fatal = None;
    match &settings.fix_output {
        Some(output) if !status.is_clean() => {
            match repair_archive(settings, output, archive, project, &ids, &errors, writer) {
                Ok(report) => repair = Some(report),
                Err(err) => {
                    error!(output = %output, error = %err, "repair failed; no output written");
                    status |= err.status();
                    fatal = Some(err);
                }
            }
        }
        Some(output) => {
            info!(output = %output, "project is consistent; nothing to repair");
        }
        None => {}
    }

    Ok(CheckOutcome {
        ids,
        errors,
        status,
        repair,
        fatal,
    })
}

fn repair_archive(
    settings: &CheckSettings,
    output: &Utf8Path,
    mut archive: ProjectArchive,
    project: LoadedProject,
    ids: &ProjectIds,
    errors: &ProjectErrors,
    writer: &dyn WritePort,
) -> Result<RepairReport, FatalError> {
    let plan = plan_repair(ids, errors);
    let LoadedProject {
        mut manifest,
        mut programs,
    } = project;
    let outcome = repair_project(&mut manifest, &mut programs, &plan, &settings.repair)?;

    let output_failed = |message: String| FatalError::OutputFailed {
        path: output.to_string(),
        message,
    };

    let bytes = rebuild(&mut archive, outcome.patches).map_err(|e| output_failed(format!("{e:#}")))?;
    let residual = verify_rebuilt(settings, output, bytes.clone())
        .map_err(|e| output_failed(format!("rebuilt archive does not load: {e}")))?;
    if !residual.is_clean() {
        warn!(
            output = %output,
            residual = %residual.status(),
            "rebuilt archive still has findings"
        );
    }

    let output_sha256 = sha256_hex(&bytes);
    writer
        .write_file(output, &bytes)
        .map_err(|e| output_failed(format!("{e:#}")))?;
    info!(output = %output, bytes = bytes.len(), sha256 = %output_sha256, "wrote repaired archive");

    Ok(RepairReport {
        output: output.to_string(),
        output_bytes: bytes.len() as u64,
        output_sha256,
        summary: outcome.summary,
        residual: Some(residual),
    })
}

/// Load the rebuilt bytes as a fresh archive and reconcile them again.
fn verify_rebuilt(
    settings: &CheckSettings,
    output: &Utf8Path,
    bytes: Vec<u8>,
) -> Result<ProjectErrors, FatalError> {
    let mut archive = ProjectArchive::from_bytes(output.as_str(), bytes)?;
    let project = load_project(&mut archive, &settings.load)?;
    let residual = check_project(&project.ids());
    debug!(output = %output, residual = %residual.status(), "verified rebuilt archive");
    Ok(residual)
}

/// Assemble the serializable report for a finished run.
pub fn build_report(
    settings: &CheckSettings,
    result: &Result<CheckOutcome, FatalError>,
    tool: ToolInfo,
    started_at: DateTime<Utc>,
) -> CheckReport {
    let (status, ids, findings, repair, fatal) = match result {
        Ok(outcome) => (
            outcome.status,
            Some(outcome.ids.clone()),
            Some(outcome.errors.clone()),
            outcome.repair.clone(),
            outcome.fatal.as_ref().map(ToString::to_string),
        ),
        Err(err) => (err.status(), None, None, None, Some(err.to_string())),
    };

    CheckReport {
        schema: schema::ADPROCHK_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            started_at,
            ended_at: Some(Utc::now()),
        },
        input: settings.input.to_string(),
        status,
        status_labels: status.labels().into_iter().map(str::to_string).collect(),
        exit_code: status.exit_code(),
        ids,
        findings,
        repair,
        fatal,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
