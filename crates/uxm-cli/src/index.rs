//! # Template Index Builder
//!
//! Scans a template library directory and writes one aggregated JSON index:
//! a summary per template plus `by_type` and `by_tag` lookup tables.
//!
//! The index is a derived artifact, regenerated from scratch on every run.
//! Files are processed in file-name order and every map and tag set is
//! ordered, so two runs over the same directory differ only in the
//! `generated` timestamp. A template that fails to load is reported and
//! skipped; it never aborts the run.
//!
//! File references in the index are symbolic: a path token prefix
//! (default `{SKILL_ROOT}/../uxscii-component-creator/templates/`) plus
//! the file name. The token is emitted literally and never resolved.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};

use uxm_core::{
    companion_path, discover_components, infer_tags, read_json_document, read_preview, Component,
    UxmError, PREVIEW_MAX_LINES,
};

use crate::{EXIT_INVALID, EXIT_OK};

/// Format version of the index document.
pub const INDEX_VERSION: &str = "1.0.0";

/// Default symbolic prefix for file references in the index.
pub const DEFAULT_PATH_TOKEN: &str = "{SKILL_ROOT}/../uxscii-component-creator/templates/";

/// Arguments for `build_index`.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory of component templates. Defaults to `../templates` next to
    /// the executable.
    #[arg(value_name = "TEMPLATES_DIR", env = "UXM_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Index file to write. Defaults to `../data/template-index.json` next
    /// to the executable.
    #[arg(value_name = "OUTPUT_FILE", env = "UXM_INDEX_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Symbolic prefix for file references written into the index.
    #[arg(long, env = "UXM_PATH_TOKEN", default_value = DEFAULT_PATH_TOKEN)]
    pub path_token: String,
}

/// Summary of one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub file: String,
    pub md_file: String,
    pub states: Vec<String>,
    pub props: Vec<String>,
    pub tags: Vec<String>,
    pub preview: String,
    pub interactive: bool,
    pub has_accessibility: bool,
}

/// The aggregated index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateIndex {
    pub version: String,
    pub generated: String,
    pub template_count: usize,
    pub bundled_templates: Vec<TemplateEntry>,
    pub by_type: BTreeMap<String, Vec<String>>,
    pub by_tag: BTreeMap<String, Vec<String>>,
}

impl TemplateIndex {
    /// Empty index stamped with `generated`.
    pub fn new(generated: impl Into<String>) -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            generated: generated.into(),
            template_count: 0,
            bundled_templates: Vec::new(),
            by_type: BTreeMap::new(),
            by_tag: BTreeMap::new(),
        }
    }

    /// Append a template and register it in the lookup tables.
    pub fn push(&mut self, entry: TemplateEntry) {
        self.by_type
            .entry(entry.kind.clone())
            .or_default()
            .push(entry.id.clone());
        for tag in &entry.tags {
            self.by_tag
                .entry(tag.clone())
                .or_default()
                .push(entry.id.clone());
        }
        self.bundled_templates.push(entry);
        self.template_count = self.bundled_templates.len();
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn generated_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the index entry for one component file.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or lacks `id`, `type`,
/// `metadata.name`, or a name on any mapping-shaped state.
pub fn index_entry(path: &Path, path_token: &str) -> Result<TemplateEntry, UxmError> {
    let component = Component::from_value(read_json_document(path)?)?;
    let states = component.state_names()?;
    let md_path = companion_path(path);

    Ok(TemplateEntry {
        file: format!("{path_token}{}", file_name(path)),
        md_file: format!("{path_token}{}", file_name(&md_path)),
        states,
        props: component.prop_names(),
        tags: infer_tags(&component).into_iter().collect(),
        preview: read_preview(&md_path, PREVIEW_MAX_LINES),
        interactive: component.behavior.interactive,
        has_accessibility: component.has_accessibility(),
        description: component.metadata.description.clone().unwrap_or_default(),
        name: component.metadata.name,
        kind: component.kind,
        id: component.id,
    })
}

/// Index every component in `templates_dir`.
///
/// Per-file failures are written to `out` and skipped. Returns `None`, after
/// writing a warning, when the directory holds no component files.
///
/// # Errors
///
/// Fails if the directory cannot be listed or `out` cannot be written.
pub fn build_index(
    templates_dir: &Path,
    path_token: &str,
    generated: &str,
    out: &mut dyn Write,
) -> Result<Option<TemplateIndex>> {
    let files = discover_components(templates_dir).with_context(|| {
        format!(
            "failed to list templates directory: {}",
            templates_dir.display()
        )
    })?;

    if files.is_empty() {
        tracing::warn!(dir = %templates_dir.display(), "no component files found");
        writeln!(
            out,
            "⚠ Warning: No .uxm files found in {}",
            templates_dir.display()
        )?;
        return Ok(None);
    }

    let mut index = TemplateIndex::new(generated);
    for path in &files {
        match index_entry(path, path_token) {
            Ok(entry) => {
                tracing::debug!(id = %entry.id, "indexed template");
                index.push(entry);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping template");
                writeln!(out, "✗ Error processing {}: {e}", file_name(path))?;
            }
        }
    }

    Ok(Some(index))
}

/// Write the index as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Fails if the directories or the file cannot be written.
pub fn write_index(index: &TemplateIndex, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let json = serde_json::to_string_pretty(index).context("failed to serialize index")?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write index: {}", output.display()))
}

/// Default templates directory and output file, relative to the
/// executable's own location.
pub fn default_paths() -> (PathBuf, PathBuf) {
    let base = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    (
        base.join("..").join("templates"),
        base.join("..").join("data").join("template-index.json"),
    )
}

/// Execute the index builder.
///
/// Returns exit code: 0 on success (including an empty directory), 1 if
/// the templates directory does not exist.
pub fn run_build_index(args: &IndexArgs, out: &mut dyn Write) -> Result<u8> {
    let (default_templates, default_output) = default_paths();
    let templates_dir = args.templates_dir.clone().unwrap_or(default_templates);
    let output = args.output.clone().unwrap_or(default_output);

    if !templates_dir.is_dir() {
        writeln!(
            out,
            "✗ Error: Templates directory not found: {}",
            templates_dir.display()
        )?;
        return Ok(EXIT_INVALID);
    }

    writeln!(out, "Building index from: {}", templates_dir.display())?;

    let Some(index) = build_index(&templates_dir, &args.path_token, &generated_now(), out)? else {
        return Ok(EXIT_OK);
    };

    write_index(&index, &output)?;
    tracing::info!(
        output = %output.display(),
        templates = index.template_count,
        "index written"
    );

    let types: Vec<&str> = index.by_type.keys().map(String::as_str).collect();
    let tags: Vec<&str> = index.by_tag.keys().map(String::as_str).collect();
    writeln!(out, "✓ Built index with {} templates", index.template_count)?;
    writeln!(out, "  Types: {} ({})", types.len(), types.join(", "))?;
    writeln!(out, "  Tags: {} ({})", tags.len(), tags.join(", "))?;
    writeln!(out, "  Output: {}", output.display())?;

    Ok(EXIT_OK)
}
