//! # Screen Validator
//!
//! A screen is a component record composed from other components. It gets
//! the full component report plus two warning-level checks:
//!
//! - a rendered example `<stem>.rendered.md` should sit next to the screen
//!   (`missing_rendered`);
//! - every referenced component (`extends`, `slots.*.component`,
//!   `slots.*.components`, `{{component:<id>}}` in the template) should
//!   exist as `<id>.uxm` in the project's components directory
//!   (`missing_component`).
//!
//! The components directory is `fluxwing/components` under the nearest
//! ancestor of the screen that contains a `fluxwing/` directory, falling
//! back to the working directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use uxm_core::{
    companion_path, extract_component_refs, read_json_document, ComponentView,
    COMPONENT_EXTENSION,
};
use uxm_schema::{SchemaValidationError, SchemaValidator};

use crate::report::{
    render_human, validate_component, validate_with, Issue, IssueKind, ValidationReport,
};
use crate::{EXIT_INVALID, EXIT_MISCONFIGURED, EXIT_OK};

/// Project directory that marks a project root.
const PROJECT_DIR: &str = "fluxwing";

/// Arguments for `validate_screen`.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Screen record to validate (*.uxm).
    #[arg(value_name = "SCREEN")]
    pub screen: PathBuf,

    /// JSON Schema (Draft 7) for component records.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Print the JSON report instead of the human-readable summary.
    #[arg(long)]
    pub json: bool,

    /// Directory holding the project's components. Defaults to
    /// `fluxwing/components` under the screen's project root.
    #[arg(long, value_name = "DIR", env = "UXM_COMPONENTS_DIR")]
    pub components_dir: Option<PathBuf>,
}

/// Nearest ancestor of `start` containing a `fluxwing/` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Components directory for the screen at `screen`.
pub fn default_components_dir(screen: &Path) -> PathBuf {
    let start = screen
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let root = find_project_root(&start)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    root.join(PROJECT_DIR).join("components")
}

/// Path of the rendered example for a screen file.
pub fn rendered_path(screen: &Path) -> PathBuf {
    screen.with_extension("rendered.md")
}

/// Ids referenced by the screen document and its template.
pub fn referenced_components(screen: &Path, doc: &Value) -> Vec<String> {
    let view = ComponentView::new(doc);
    let mut refs = view.component_refs();

    let template = match view.template_file() {
        Some(file) => screen.parent().unwrap_or(Path::new("")).join(file),
        None => companion_path(screen),
    };
    match std::fs::read_to_string(&template) {
        Ok(text) => refs.extend(extract_component_refs(&text)),
        Err(e) => {
            tracing::debug!(path = %template.display(), error = %e, "no screen template to scan")
        }
    }

    refs.into_iter().collect()
}

/// Append the screen-only warnings for a parsed screen document.
pub fn check_screen(
    screen: &Path,
    doc: &Value,
    components_dir: &Path,
    warnings: &mut Vec<Issue>,
) {
    let rendered = rendered_path(screen);
    if !rendered.exists() {
        warnings.push(Issue::new(
            &["screen"],
            format!(
                "Rendered example file recommended for screens: {}",
                rendered.display()
            ),
            IssueKind::MissingRendered,
        ));
    }

    for id in referenced_components(screen, doc) {
        let expected = components_dir.join(format!("{id}.{COMPONENT_EXTENSION}"));
        if !expected.exists() {
            warnings.push(Issue::new(
                &["composed"],
                format!(
                    "Referenced component not found: {id} (expected at {})",
                    expected.display()
                ),
                IssueKind::MissingComponent,
            ));
        }
    }
}

fn with_screen_checks(
    mut report: ValidationReport,
    screen: &Path,
    components_dir: Option<&Path>,
) -> ValidationReport {
    // Load failures were already reported as fatal.
    let Ok(doc) = read_json_document(screen) else {
        return report;
    };
    let dir = components_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_components_dir(screen));
    check_screen(screen, &doc, &dir, &mut report.warnings);
    report
}

/// Validate a screen against the schema at `schema`.
///
/// # Errors
///
/// As for [`validate_component`]: only a schema that does not compile is
/// an error.
pub fn validate_screen(
    screen: &Path,
    schema: &Path,
    components_dir: Option<&Path>,
) -> Result<ValidationReport, SchemaValidationError> {
    let report = validate_component(screen, schema)?;
    Ok(with_screen_checks(report, screen, components_dir))
}

/// Validate a screen with an already compiled schema.
pub fn validate_screen_with(
    screen: &Path,
    validator: &SchemaValidator,
    components_dir: Option<&Path>,
) -> ValidationReport {
    with_screen_checks(validate_with(screen, validator), screen, components_dir)
}

/// Execute the screen validator.
///
/// Returns exit code: 0 if valid, 1 if not, 2 if the schema does not
/// compile.
pub fn run_screen(args: &ScreenArgs, out: &mut dyn Write) -> Result<u8> {
    let report = match validate_screen(&args.screen, &args.schema, args.components_dir.as_deref())
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Schema Error: {e}");
            return Ok(EXIT_MISCONFIGURED);
        }
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        writeln!(out, "{json}")?;
    } else {
        render_human(&report, out)?;
    }

    Ok(if report.valid { EXIT_OK } else { EXIT_INVALID })
}
