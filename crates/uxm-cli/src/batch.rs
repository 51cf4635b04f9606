//! # Batch Validator
//!
//! Runs the full component validator (or, with `--screens`, the screen
//! validator) over every `*.uxm` file in a directory against one compiled
//! schema, and aggregates the reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use uxm_core::{discover_components, discover_components_recursive};
use uxm_schema::{SchemaValidationError, SchemaValidator};

use crate::report::{validate_with, Issue, ValidationReport};
use crate::screen::validate_screen_with;
use crate::{EXIT_INVALID, EXIT_MISCONFIGURED, EXIT_OK};

/// Errors listed per failed file in human output.
const MAX_ERRORS_PER_FILE: usize = 2;

/// Arguments for `validate_batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing component records.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// JSON Schema (Draft 7) for component records.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Print the aggregate report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Descend into subdirectories.
    #[arg(long, short)]
    pub recursive: bool,

    /// Validate the files as screens.
    #[arg(long)]
    pub screens: bool,

    /// Components directory for screen references. Defaults to each
    /// screen's project `fluxwing/components`. Only used with `--screens`.
    #[arg(long, value_name = "DIR", env = "UXM_COMPONENTS_DIR")]
    pub components_dir: Option<PathBuf>,
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: String,
    pub id: String,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub error_details: Vec<Issue>,
    pub warning_details: Vec<Issue>,
}

/// Aggregate outcome for a directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub files: Vec<FileResult>,
}

impl BatchReport {
    pub fn all_valid(&self) -> bool {
        self.failed == 0
    }
}

/// Validate each of `files` with `check`, in the given order.
pub fn validate_batch(
    files: &[PathBuf],
    check: impl Fn(&Path) -> ValidationReport,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in files {
        let result = check(path);
        let id = result.stats.id.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        tracing::debug!(file = %path.display(), valid = result.valid, "validated");

        if result.valid {
            report.passed += 1;
        } else {
            report.failed += 1;
        }
        report.warnings += result.warnings.len();
        report.files.push(FileResult {
            file: path.display().to_string(),
            id,
            valid: result.valid,
            errors: result.errors.len(),
            warnings: result.warnings.len(),
            error_details: result.errors,
            warning_details: result.warnings,
        });
    }

    report.total = report.files.len();
    report
}

/// Execute the batch validator.
///
/// Returns exit code: 0 if every file is valid (or there are none), 1 if
/// any file is invalid or the schema cannot be read, 2 if the schema does
/// not compile.
pub fn run_batch(args: &BatchArgs, out: &mut dyn Write) -> Result<u8> {
    let validator = match SchemaValidator::from_file(&args.schema) {
        Ok(v) => v,
        Err(e @ SchemaValidationError::ValidatorBuildError { .. }) => {
            eprintln!("✗ Schema Error: {e}");
            return Ok(EXIT_MISCONFIGURED);
        }
        Err(e) => {
            writeln!(out, "✗ Invalid Schema: {}", args.schema.display())?;
            writeln!(out, "  Error: {e}")?;
            return Ok(EXIT_INVALID);
        }
    };

    let files = list_files(&args.dir, args.recursive)?;
    if files.is_empty() {
        writeln!(out, "No .uxm files found in {}", args.dir.display())?;
        return Ok(EXIT_OK);
    }

    let report = if args.screens {
        let components_dir = args.components_dir.as_deref();
        validate_batch(&files, |path| {
            validate_screen_with(path, &validator, components_dir)
        })
    } else {
        validate_batch(&files, |path| validate_with(path, &validator))
    };
    tracing::info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        "batch validation finished"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize batch report")?;
        writeln!(out, "{json}")?;
    } else {
        render_human(&report, out)?;
    }

    Ok(if report.all_valid() { EXIT_OK } else { EXIT_INVALID })
}

fn list_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let files = if recursive {
        discover_components_recursive(dir)
    } else {
        discover_components(dir)
    };
    files.with_context(|| format!("failed to list directory: {}", dir.display()))
}

/// Human-readable rendering: totals, then failed files, files that passed
/// with warnings, and files that passed cleanly.
pub fn render_human(report: &BatchReport, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Batch Validation Results")?;
    writeln!(out)?;
    writeln!(out, "Total files: {}", report.total)?;
    writeln!(out, "Passed: {}", report.passed)?;
    if report.failed > 0 {
        writeln!(out, "Failed: {}", report.failed)?;
    }
    if report.warnings > 0 {
        writeln!(out, "Total warnings: {}", report.warnings)?;
    }
    writeln!(out)?;

    let failed: Vec<_> = report.files.iter().filter(|f| !f.valid).collect();
    if !failed.is_empty() {
        writeln!(out, "Failed Files:")?;
        writeln!(out)?;
        for file in failed {
            writeln!(out, "  ✗ {} ({})", file.id, file.file)?;
            writeln!(out, "    Errors: {}", file.errors)?;
            for (i, e) in file.error_details.iter().take(MAX_ERRORS_PER_FILE).enumerate() {
                writeln!(out, "      {}. {}", i + 1, e.message)?;
            }
            if file.errors > MAX_ERRORS_PER_FILE {
                writeln!(
                    out,
                    "      ... and {} more errors",
                    file.errors - MAX_ERRORS_PER_FILE
                )?;
            }
            writeln!(out)?;
        }
    }

    let warned: Vec<_> = report
        .files
        .iter()
        .filter(|f| f.valid && f.warnings > 0)
        .collect();
    if !warned.is_empty() {
        writeln!(out, "Passed with Warnings:")?;
        writeln!(out)?;
        for file in warned {
            writeln!(out, "  ✓ {} ({} warnings)", file.id, file.warnings)?;
        }
        writeln!(out)?;
    }

    let clean: Vec<_> = report
        .files
        .iter()
        .filter(|f| f.valid && f.warnings == 0)
        .collect();
    if !clean.is_empty() {
        writeln!(out, "Fully Passed:")?;
        writeln!(out)?;
        for file in clean {
            writeln!(out, "  ✓ {}", file.id)?;
        }
    }
    Ok(())
}
