//! # Full Validator
//!
//! Produces a structured report `{valid, errors, warnings, stats}` for one
//! component. Load failures (missing file, malformed JSON) are fatal and
//! short-circuit; every other rule runs independently and accumulates:
//!
//! | Rule | Level | `type` |
//! |------|-------|--------|
//! | Schema conformance | error | `schema_violation` |
//! | Companion template exists | error | `missing_file` |
//! | Template placeholders are declared in `ascii.variables` | warning | `variable_mismatch` |
//! | Interactive components declare `role` and `focusable` | warning | `accessibility` |
//! | `ascii.width` ≤ 120, `ascii.height` ≤ 50 | warning | `dimensions` |
//! | Every state declares `properties` | warning | `incomplete_state` |

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use uxm_core::{
    companion_path, extract_variables, is_truthy, read_json_document, ComponentView, UxmError,
};
use uxm_schema::{dotted_path, PathSegment, SchemaValidationError, SchemaValidator};

use crate::{EXIT_INVALID, EXIT_MISCONFIGURED, EXIT_OK};

/// Recommended maximum rendering width, in columns.
pub const MAX_ASCII_WIDTH: f64 = 120.0;
/// Recommended maximum rendering height, in lines.
pub const MAX_ASCII_HEIGHT: f64 = 50.0;

/// Errors shown by the human-readable renderer before summarizing.
const MAX_SHOWN_ERRORS: usize = 5;

/// Arguments for `validate_component`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Component record to validate (*.uxm).
    #[arg(value_name = "COMPONENT")]
    pub component: PathBuf,

    /// JSON Schema (Draft 7) for component records.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Print a human-readable summary instead of the JSON report.
    #[arg(long)]
    pub human: bool,
}

/// Category of a report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    JsonError,
    FileNotFound,
    SchemaViolation,
    MissingFile,
    VariableMismatch,
    Accessibility,
    Dimensions,
    IncompleteState,
    MissingRendered,
    MissingComponent,
}

/// One error or warning.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

impl Issue {
    pub(crate) fn new(path: &[&str], message: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.iter().map(|s| PathSegment::Key(s.to_string())).collect(),
            message: message.into(),
            kind,
        }
    }

    /// Path joined with dots, or `root` when empty.
    pub fn location(&self) -> String {
        dotted_path(&self.path)
    }
}

/// Summary figures for a component, filled with defaults when the
/// document is missing or incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentStats {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    pub states: usize,
    pub props: usize,
    pub interactive: bool,
    pub has_accessibility: bool,
}

impl ComponentStats {
    pub fn from_document(doc: &Value) -> Self {
        let view = ComponentView::new(doc);
        Self {
            id: view.id().map(str::to_string),
            kind: view.kind().map(str::to_string),
            version: view.version().map(str::to_string),
            states: view.state_count(),
            props: view.prop_count(),
            interactive: view.interactive(),
            has_accessibility: view.has_accessibility(),
        }
    }
}

/// The full validator's result.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub stats: ComponentStats,
}

impl ValidationReport {
    fn fatal(error: Issue, stats: ComponentStats) -> Self {
        Self {
            valid: false,
            errors: vec![error],
            warnings: Vec::new(),
            stats,
        }
    }

    /// Errors of the given kind.
    pub fn errors_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.errors.iter().filter(move |i| i.kind == kind)
    }

    /// Warnings of the given kind.
    pub fn warnings_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.warnings.iter().filter(move |i| i.kind == kind)
    }
}

fn load_issue(err: &UxmError, what: &str) -> Issue {
    match err {
        UxmError::FileNotFound { path } => Issue::new(
            &[],
            format!("{what} file not found: {}", path.display()),
            IssueKind::FileNotFound,
        ),
        UxmError::Json { source, .. } => Issue::new(
            &[],
            format!(
                "Invalid JSON: {}",
                err.json_syntax_message()
                    .unwrap_or_else(|| source.to_string())
            ),
            IssueKind::JsonError,
        ),
        UxmError::Io { path, source } => Issue::new(
            &[],
            format!("{what} file could not be read: {}: {source}", path.display()),
            IssueKind::FileNotFound,
        ),
        UxmError::Malformed(reason) => Issue::new(&[], reason.clone(), IssueKind::JsonError),
    }
}

/// Validate the component at `component` against the schema at `schema`.
///
/// Load failures become a single fatal entry in the report.
///
/// # Errors
///
/// Returns [`SchemaValidationError::ValidatorBuildError`] when the schema
/// loads but does not compile; that is a tooling problem, not a report.
pub fn validate_component(
    component: &Path,
    schema: &Path,
) -> Result<ValidationReport, SchemaValidationError> {
    let doc = match read_json_document(component) {
        Ok(doc) => doc,
        Err(e) => {
            return Ok(ValidationReport::fatal(
                load_issue(&e, "Component"),
                ComponentStats::default(),
            ))
        }
    };

    let validator = match SchemaValidator::from_file(schema) {
        Ok(v) => v,
        Err(SchemaValidationError::SchemaLoadError(e)) => {
            return Ok(ValidationReport::fatal(
                load_issue(&e, "Schema"),
                ComponentStats::from_document(&doc),
            ))
        }
        Err(e @ SchemaValidationError::YamlError { .. }) => {
            return Ok(ValidationReport::fatal(
                Issue::new(&[], e.to_string(), IssueKind::JsonError),
                ComponentStats::from_document(&doc),
            ))
        }
        Err(e) => return Err(e),
    };

    Ok(check_document(component, &doc, &validator))
}

/// Validate the component at `component` with an already compiled schema.
pub fn validate_with(component: &Path, validator: &SchemaValidator) -> ValidationReport {
    match read_json_document(component) {
        Ok(doc) => check_document(component, &doc, validator),
        Err(e) => ValidationReport::fatal(load_issue(&e, "Component"), ComponentStats::default()),
    }
}

/// Run every non-fatal rule on a parsed document. `component` locates the
/// companion template.
pub fn check_document(
    component: &Path,
    doc: &Value,
    validator: &SchemaValidator,
) -> ValidationReport {
    let view = ComponentView::new(doc);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for v in validator.violations(doc) {
        errors.push(Issue {
            path: v.path,
            message: v.message,
            kind: IssueKind::SchemaViolation,
        });
    }

    check_template(component, &view, &mut errors, &mut warnings);
    check_accessibility(&view, &mut warnings);
    check_dimensions(&view, &mut warnings);
    check_states(&view, &mut warnings);

    tracing::debug!(
        component = %component.display(),
        errors = errors.len(),
        warnings = warnings.len(),
        "component checked"
    );

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        stats: ComponentStats::from_document(doc),
    }
}

fn check_template(
    component: &Path,
    view: &ComponentView<'_>,
    errors: &mut Vec<Issue>,
    warnings: &mut Vec<Issue>,
) {
    let md_path = companion_path(component);
    let text = match std::fs::read_to_string(&md_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %md_path.display(), error = %e, "companion template unreadable");
            let message = match e.kind() {
                std::io::ErrorKind::NotFound => {
                    format!("ASCII template file not found: {}", md_path.display())
                }
                _ => format!(
                    "ASCII template file could not be read: {}: {e}",
                    md_path.display()
                ),
            };
            errors.push(Issue::new(
                &["ascii", "templateFile"],
                message,
                IssueKind::MissingFile,
            ));
            return;
        }
    };

    let declared = view.declared_variables();
    let missing: Vec<String> = extract_variables(&text)
        .into_iter()
        .filter(|v| !declared.contains(v))
        .collect();

    if !missing.is_empty() {
        warnings.push(Issue::new(
            &["ascii", "variables"],
            format!(
                "Variables in .md but not defined in .uxm: {}",
                missing.join(", ")
            ),
            IssueKind::VariableMismatch,
        ));
    }
}

fn check_accessibility(view: &ComponentView<'_>, warnings: &mut Vec<Issue>) {
    if !view.interactive() {
        return;
    }
    let accessibility = view.accessibility();
    let declares = |key: &str| accessibility.and_then(|a| a.get(key)).is_some_and(is_truthy);

    if !declares("role") {
        warnings.push(Issue::new(
            &["accessibility", "role"],
            "Interactive component should have ARIA role",
            IssueKind::Accessibility,
        ));
    }
    if !declares("focusable") {
        warnings.push(Issue::new(
            &["accessibility", "focusable"],
            "Interactive component should be focusable",
            IssueKind::Accessibility,
        ));
    }
}

fn check_dimensions(view: &ComponentView<'_>, warnings: &mut Vec<Issue>) {
    let limits = [
        ("width", "Width", MAX_ASCII_WIDTH),
        ("height", "Height", MAX_ASCII_HEIGHT),
    ];
    for (key, label, max) in limits {
        let Some(value) = view.ascii_dimension(key) else {
            continue;
        };
        if value.as_f64().is_some_and(|v| v > max) {
            warnings.push(Issue::new(
                &["ascii", key],
                format!("{label} {value} exceeds recommended max of {max}"),
                IssueKind::Dimensions,
            ));
        }
    }
}

fn check_states(view: &ComponentView<'_>, warnings: &mut Vec<Issue>) {
    for state in view.states() {
        if state.has_properties() {
            continue;
        }
        let name = state.name().unwrap_or("unknown");
        warnings.push(Issue::new(
            &["behavior", "states", name],
            format!("State '{name}' has no properties defined"),
            IssueKind::IncompleteState,
        ));
    }
}

/// Execute the full validator.
///
/// Returns exit code: 0 if valid, 1 if not, 2 if the schema does not
/// compile.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let report = match validate_component(&args.component, &args.schema) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Schema Error: {e}");
            return Ok(EXIT_MISCONFIGURED);
        }
    };

    if args.human {
        render_human(&report, out)?;
    } else {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        writeln!(out, "{json}")?;
    }

    Ok(if report.valid { EXIT_OK } else { EXIT_INVALID })
}

/// Human-readable rendering of a report.
pub fn render_human(report: &ValidationReport, out: &mut dyn Write) -> std::io::Result<()> {
    let stats = &report.stats;
    if report.valid {
        writeln!(out, "✓ Valid: {}", stats.id.as_deref().unwrap_or("unknown"))?;
        writeln!(out, "  Type: {}", stats.kind.as_deref().unwrap_or("unknown"))?;
        writeln!(
            out,
            "  Version: {}",
            stats.version.as_deref().unwrap_or("unknown")
        )?;
        writeln!(out, "  States: {}", stats.states)?;
        writeln!(out, "  Props: {}", stats.props)?;

        if !report.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "  Warnings: {}", report.warnings.len())?;
            for (i, w) in report.warnings.iter().enumerate() {
                writeln!(out, "    {}. {}", i + 1, w.message)?;
                writeln!(out, "       Location: {}", w.location())?;
            }
        }
    } else {
        writeln!(out, "✗ Validation Failed")?;
        writeln!(out)?;
        for (i, e) in report.errors.iter().take(MAX_SHOWN_ERRORS).enumerate() {
            writeln!(out, "  Error {}: {}", i + 1, e.message)?;
            writeln!(out, "  Location: {}", e.location())?;
            writeln!(out)?;
        }
        if report.errors.len() > MAX_SHOWN_ERRORS {
            writeln!(
                out,
                "  ... and {} more errors",
                report.errors.len() - MAX_SHOWN_ERRORS
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use serde_json::json;

    fn report_for(doc: &Value, md: Option<&str>) -> ValidationReport {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let component = write_component(dir.path(), "subject", doc, md);
        validate_component(&component, &schema).unwrap()
    }

    #[test]
    fn clean_component_has_no_errors_or_warnings() {
        let report = report_for(&button(), Some(BUTTON_MD));
        assert!(report.valid, "{report:?}");
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.stats.id.as_deref(), Some("primary-button"));
        assert_eq!(report.stats.states, 2);
        assert_eq!(report.stats.props, 1);
        assert!(report.stats.interactive);
        assert!(report.stats.has_accessibility);
    }

    #[test]
    fn malformed_json_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let component = dir.path().join("broken.uxm");
        std::fs::write(&component, "{ not json").unwrap();

        let report = validate_component(&component, &schema).unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::JsonError);
        assert!(report.errors[0].message.contains("at line 1, column"));
        assert_eq!(report.errors[0].message.matches("line").count(), 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats, ComponentStats::default());
    }

    #[test]
    fn missing_files_short_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let report = validate_component(&dir.path().join("ghost.uxm"), &schema).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::FileNotFound);
        assert!(report.errors[0].message.starts_with("Component file not found"));

        let component = write_component(dir.path(), "b", &button(), Some(BUTTON_MD));
        let report = validate_component(&component, &dir.path().join("ghost.json")).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::FileNotFound);
        assert!(report.errors[0].message.starts_with("Schema file not found"));
        assert_eq!(report.stats.id.as_deref(), Some("primary-button"));
    }

    #[test]
    fn missing_required_field_is_schema_violation_on_that_path() {
        let mut doc = button();
        doc.as_object_mut().unwrap().remove("version");
        let report = report_for(&doc, Some(BUTTON_MD));
        assert!(!report.valid);
        let violation = report
            .errors_of(IssueKind::SchemaViolation)
            .find(|e| e.path == vec![PathSegment::Key("version".to_string())]);
        assert!(violation.is_some(), "{:?}", report.errors);
        assert_eq!(report.stats.version, None);
    }

    #[test]
    fn missing_template_is_error_but_other_rules_still_run() {
        let mut doc = button();
        doc["accessibility"] = json!({});
        doc["ascii"]["width"] = json!(200);
        let report = report_for(&doc, None);
        assert!(!report.valid);
        assert_eq!(report.errors_of(IssueKind::MissingFile).count(), 1);
        assert_eq!(report.warnings_of(IssueKind::Accessibility).count(), 2);
        assert_eq!(report.warnings_of(IssueKind::Dimensions).count(), 1);
    }

    #[test]
    fn unreadable_template_is_not_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let component = write_component(dir.path(), "subject", &button(), None);
        std::fs::write(dir.path().join("subject.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let report = validate_component(&component, &schema).unwrap();
        let errors: Vec<_> = report.errors_of(IssueKind::MissingFile).collect();
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].message.starts_with("ASCII template file could not be read"),
            "{}",
            errors[0].message
        );
        assert_eq!(errors[0].location(), "ascii.templateFile");
    }

    #[test]
    fn missing_template_message_names_the_file() {
        let report = report_for(&button(), None);
        let errors: Vec<_> = report.errors_of(IssueKind::MissingFile).collect();
        assert!(errors[0].message.starts_with("ASCII template file not found"));
        assert!(errors[0].message.ends_with("subject.md"));
    }

    #[test]
    fn undeclared_placeholders_produce_one_sorted_warning() {
        let md = "```\n{{zeta}} {{text}} {{alpha}} {{zeta}}\n```";
        let report = report_for(&button(), Some(md));
        assert!(report.valid);
        let mismatches: Vec<_> = report.warnings_of(IssueKind::VariableMismatch).collect();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(
            mismatches[0].message,
            "Variables in .md but not defined in .uxm: alpha, zeta"
        );
        assert_eq!(mismatches[0].location(), "ascii.variables");
    }

    #[test]
    fn declared_variables_accept_mapping_shape() {
        let mut doc = button();
        doc["ascii"]["variables"] = json!([{"name": "text", "type": "string"}]);
        let report = report_for(&doc, Some(BUTTON_MD));
        assert_eq!(report.warnings_of(IssueKind::VariableMismatch).count(), 0);
    }

    #[test]
    fn interactive_button_without_accessibility_warns_twice() {
        let mut doc = button();
        doc.as_object_mut().unwrap().remove("accessibility");
        let report = report_for(&doc, Some(BUTTON_MD));
        assert!(report.valid);
        assert!(report.errors.is_empty());
        let a11y: Vec<_> = report.warnings_of(IssueKind::Accessibility).collect();
        assert_eq!(a11y.len(), 2);
        assert_eq!(a11y[0].location(), "accessibility.role");
        assert_eq!(a11y[1].location(), "accessibility.focusable");
        assert!(!report.stats.has_accessibility);
    }

    #[test]
    fn non_interactive_component_skips_accessibility() {
        let mut doc = button();
        doc["behavior"]["interactive"] = json!(false);
        doc.as_object_mut().unwrap().remove("accessibility");
        let report = report_for(&doc, Some(BUTTON_MD));
        assert_eq!(report.warnings_of(IssueKind::Accessibility).count(), 0);
    }

    #[test]
    fn oversized_rendering_warns() {
        let mut doc = button();
        doc["ascii"]["width"] = json!(121);
        doc["ascii"]["height"] = json!(51);
        let report = report_for(&doc, Some(BUTTON_MD));
        let dims: Vec<_> = report.warnings_of(IssueKind::Dimensions).collect();
        assert_eq!(dims.len(), 2);
        assert_eq!(dims[0].message, "Width 121 exceeds recommended max of 120");
        assert_eq!(dims[1].message, "Height 51 exceeds recommended max of 50");
    }

    #[test]
    fn boundary_and_missing_dimensions_do_not_warn() {
        let mut doc = button();
        doc["ascii"] = json!({"width": 120, "variables": ["text"]});
        let report = report_for(&doc, Some(BUTTON_MD));
        assert_eq!(report.warnings_of(IssueKind::Dimensions).count(), 0);
    }

    #[test]
    fn states_without_properties_warn_by_name() {
        let mut doc = button();
        doc["behavior"]["states"] = json!([
            {"name": "default", "properties": {}},
            {"name": "hover"},
            "pressed",
            {"duration": 2}
        ]);
        let report = report_for(&doc, Some(BUTTON_MD));
        let incomplete: Vec<_> = report
            .warnings_of(IssueKind::IncompleteState)
            .map(Issue::location)
            .collect();
        assert_eq!(
            incomplete,
            vec![
                "behavior.states.hover",
                "behavior.states.pressed",
                "behavior.states.unknown"
            ]
        );
        assert_eq!(report.stats.states, 4);
    }

    #[test]
    fn malformed_state_entries_still_warn_as_unknown() {
        let mut doc = button();
        doc["behavior"]["states"] = json!([{"name": 5}, 7]);
        let report = report_for(&doc, Some(BUTTON_MD));
        let incomplete: Vec<_> = report
            .warnings_of(IssueKind::IncompleteState)
            .map(Issue::location)
            .collect();
        assert_eq!(
            incomplete,
            vec!["behavior.states.unknown", "behavior.states.unknown"]
        );
    }

    #[test]
    fn report_serializes_with_type_keys() {
        let mut doc = button();
        doc.as_object_mut().unwrap().remove("accessibility");
        let report = report_for(&doc, Some(BUTTON_MD));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["valid"], json!(true));
        assert_eq!(value["warnings"][0]["type"], json!("accessibility"));
        assert_eq!(
            value["warnings"][0]["path"],
            json!(["accessibility", "role"])
        );
        assert_eq!(value["stats"]["type"], json!("button"));
        assert_eq!(value["stats"]["has_accessibility"], json!(false));
    }

    #[test]
    fn run_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path());
        let good = write_component(dir.path(), "good", &button(), Some(BUTTON_MD));
        let bad = write_component(dir.path(), "bad", &json!({"id": 3}), Some(""));

        let mut buf = Vec::new();
        let args = ValidateArgs {
            component: good,
            schema: schema.clone(),
            human: false,
        };
        assert_eq!(run_validate(&args, &mut buf).unwrap(), EXIT_OK);
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["valid"], json!(true));

        let mut buf = Vec::new();
        let args = ValidateArgs {
            component: bad,
            schema,
            human: true,
        };
        assert_eq!(run_validate(&args, &mut buf).unwrap(), EXIT_INVALID);
        assert!(output(buf).contains("✗ Validation Failed"));
    }

    #[test]
    fn run_validate_uncompilable_schema_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("bad.schema.json");
        std::fs::write(&schema, r#"{"type": 12}"#).unwrap();
        let component = write_component(dir.path(), "b", &button(), Some(BUTTON_MD));

        let mut buf = Vec::new();
        let args = ValidateArgs {
            component,
            schema,
            human: false,
        };
        assert_eq!(run_validate(&args, &mut buf).unwrap(), EXIT_MISCONFIGURED);
        assert!(buf.is_empty());
    }

    #[test]
    fn human_rendering_lists_warnings() {
        let mut doc = button();
        doc.as_object_mut().unwrap().remove("accessibility");
        let report = report_for(&doc, Some(BUTTON_MD));
        let mut buf = Vec::new();
        render_human(&report, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("✓ Valid: primary-button"));
        assert!(text.contains("Warnings: 2"));
        assert!(text.contains("Location: accessibility.role"));
    }
}
