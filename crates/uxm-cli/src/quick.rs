//! # Quick Validator
//!
//! Terse pass/fail validation for authoring workflows. Prints at most the
//! first three schema violations, checks that the companion template
//! exists, and on success prints a one-screen summary of the component.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use uxm_core::{companion_path, read_json_document, ComponentView, UxmError};
use uxm_schema::{SchemaValidationError, SchemaValidator};

use crate::{EXIT_INVALID, EXIT_MISCONFIGURED, EXIT_OK};

/// Number of schema violations shown before summarizing the rest.
const MAX_SHOWN_ERRORS: usize = 3;

/// Arguments for `quick_validate`.
#[derive(Args, Debug)]
pub struct QuickArgs {
    /// Component record to validate (*.uxm).
    #[arg(value_name = "COMPONENT")]
    pub component: PathBuf,

    /// JSON Schema (Draft 7) for component records.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// Execute the quick validator.
///
/// Returns exit code: 0 if valid, 1 on any input problem, 2 if the schema
/// does not compile.
pub fn run_quick(args: &QuickArgs, out: &mut dyn Write) -> Result<u8> {
    quick_validate(&args.component, &args.schema, out)
}

/// Validate one component and print the verdict to `out`.
pub fn quick_validate(component: &Path, schema: &Path, out: &mut dyn Write) -> Result<u8> {
    let doc = match read_json_document(component) {
        Ok(doc) => doc,
        Err(e) => return report_load_error(&e, out),
    };

    let validator = match SchemaValidator::from_file(schema) {
        Ok(v) => v,
        Err(SchemaValidationError::SchemaLoadError(e)) => return report_load_error(&e, out),
        Err(e @ SchemaValidationError::ValidatorBuildError { .. }) => {
            writeln!(out, "✗ Schema Error: {e}")?;
            writeln!(out, "  The schema could not be compiled; check {}", schema.display())?;
            return Ok(EXIT_MISCONFIGURED);
        }
        Err(e) => {
            writeln!(out, "✗ Invalid Schema: {}", schema.display())?;
            writeln!(out, "  Error: {e}")?;
            return Ok(EXIT_INVALID);
        }
    };

    let violations = validator.violations(&doc);
    if !violations.is_empty() {
        tracing::info!(
            component = %component.display(),
            count = violations.len(),
            "schema validation failed"
        );
        writeln!(out, "✗ Validation Failed: {}", component.display())?;
        writeln!(out)?;
        for (i, v) in violations.iter().take(MAX_SHOWN_ERRORS).enumerate() {
            writeln!(out, "  Error {}: {}", i + 1, v.message)?;
            writeln!(out, "  Location: {}", v.dotted_path())?;
            writeln!(out)?;
        }
        if violations.len() > MAX_SHOWN_ERRORS {
            writeln!(
                out,
                "  ... and {} more errors",
                violations.len() - MAX_SHOWN_ERRORS
            )?;
        }
        return Ok(EXIT_INVALID);
    }

    let md_path = companion_path(component);
    if !md_path.exists() {
        writeln!(out, "✗ Missing ASCII File: {}", md_path.display())?;
        writeln!(
            out,
            "  Component .uxm is valid, but .md template file not found"
        )?;
        return Ok(EXIT_INVALID);
    }

    let view = ComponentView::new(&doc);
    let (Some(name), Some(id), Some(kind)) = (view.name(), view.id(), view.kind()) else {
        writeln!(
            out,
            "✗ Unexpected Error: component is missing id, type, or metadata.name"
        )?;
        return Ok(EXIT_INVALID);
    };

    let md_name = md_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    writeln!(out, "✓ Valid: {name} ({id})")?;
    writeln!(out, "  Type: {kind}")?;
    writeln!(out, "  States: {}", view.state_count())?;
    writeln!(out, "  Props: {}", view.prop_count())?;
    writeln!(out, "  Files: {} + {md_name}", component.display())?;

    Ok(EXIT_OK)
}

fn report_load_error(err: &UxmError, out: &mut dyn Write) -> Result<u8> {
    match err {
        UxmError::FileNotFound { path } => {
            writeln!(out, "✗ File Not Found: {}", path.display())?;
        }
        UxmError::Json { path, source } => {
            writeln!(out, "✗ Invalid JSON: {}", path.display())?;
            let message = err
                .json_syntax_message()
                .unwrap_or_else(|| source.to_string());
            writeln!(out, "  Error: {message}")?;
        }
        other => {
            writeln!(out, "✗ Unexpected Error: {other}")?;
        }
    }
    Ok(EXIT_INVALID)
}
