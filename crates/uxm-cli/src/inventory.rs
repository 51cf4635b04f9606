//! # Inventory
//!
//! Lists the `*.uxm` records available to a project:
//!
//! - components: `fluxwing/components`, then `fluxwing/library` under the
//!   project root, then the bundled templates directory;
//! - screens: `fluxwing/screens` under the project root.
//!
//! An id found in more than one source is kept only from the first, so
//! project files shadow bundled ones. Records that fail to parse are
//! skipped with a warning.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use regex::Regex;
use serde::{Serialize, Serializer};

use uxm_core::{discover_components, read_json_document, ComponentView, UxmError};

use crate::index::default_paths;
use crate::{EXIT_INVALID, EXIT_OK};

/// Nothing matched.
pub const EXIT_NONE_FOUND: u8 = 2;
/// A search directory could not be listed.
pub const EXIT_SCAN_ERROR: u8 = 3;

/// What to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum InventoryKind {
    #[default]
    Components,
    Screens,
}

impl InventoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryKind::Components => "components",
            InventoryKind::Screens => "screens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where an entry was found, in shadowing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Components,
    Library,
    Bundled,
    Screens,
}

impl Source {
    pub fn key(self) -> &'static str {
        match self {
            Source::Components => "components",
            Source::Library => "library",
            Source::Bundled => "bundled",
            Source::Screens => "screens",
        }
    }
}

/// Arguments for `inventory`.
#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Kind of records to list.
    #[arg(long = "type", value_enum, default_value_t = InventoryKind::Components)]
    pub kind: InventoryKind,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Keep only ids matching this regular expression.
    #[arg(long, value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Keep only records of this component type.
    #[arg(long, value_name = "TYPE")]
    pub component_type: Option<String>,

    /// Project root holding `fluxwing/`. Defaults to the working directory.
    #[arg(long, value_name = "DIR", env = "UXM_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Bundled templates directory. Defaults to `../templates` next to the
    /// executable.
    #[arg(long, value_name = "DIR", env = "UXM_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,
}

/// One listed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryEntry {
    pub path: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl InventoryEntry {
    /// Read the listing fields of the record at `path`, defaulting the id
    /// to the file stem, the type to `unknown` and the version to `0.0.0`.
    pub fn read(path: &Path) -> Result<Self, UxmError> {
        let doc = read_json_document(path)?;
        let view = ComponentView::new(&doc);
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);

        Ok(Self {
            path: path.display().to_string(),
            id: non_empty(view.id()).unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            }),
            kind: non_empty(view.kind()).unwrap_or_else(|| "unknown".to_string()),
            version: non_empty(view.version()).unwrap_or_else(|| "0.0.0".to_string()),
        })
    }
}

/// Entries grouped by source, in shadowing order. Serializes as a map
/// from source key to entry list.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub sections: Vec<(Source, Vec<InventoryEntry>)>,
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sections.iter().map(|(source, entries)| (source.key(), entries)))
    }
}

impl Inventory {
    pub fn total(&self) -> usize {
        self.sections.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn count(&self, source: Source) -> usize {
        self.sections
            .iter()
            .filter(|(s, _)| *s == source)
            .map(|(_, entries)| entries.len())
            .sum()
    }

    /// Keep only entries accepted by `filter`.
    pub fn filtered(mut self, filter: &Filter) -> Self {
        for (_, entries) in &mut self.sections {
            entries.retain(|entry| filter.matches(entry));
        }
        self
    }

    /// Drop every entry whose id already appeared in an earlier section or
    /// earlier in the same section.
    pub fn deduplicated(mut self) -> Self {
        let mut seen = HashSet::new();
        for (_, entries) in &mut self.sections {
            entries.retain(|entry| seen.insert(entry.id.clone()));
        }
        self
    }
}

/// Id pattern and component type constraints.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub id_pattern: Option<Regex>,
    pub kind: Option<String>,
}

impl Filter {
    pub fn matches(&self, entry: &InventoryEntry) -> bool {
        self.id_pattern
            .as_ref()
            .map_or(true, |re| re.is_match(&entry.id))
            && self.kind.as_ref().map_or(true, |kind| *kind == entry.kind)
    }
}

/// Directories searched for `kind`, in shadowing order.
pub fn search_paths(
    kind: InventoryKind,
    project_root: &Path,
    templates_dir: &Path,
) -> Vec<(Source, PathBuf)> {
    let project = project_root.join("fluxwing");
    match kind {
        InventoryKind::Components => vec![
            (Source::Components, project.join("components")),
            (Source::Library, project.join("library")),
            (Source::Bundled, templates_dir.to_path_buf()),
        ],
        InventoryKind::Screens => vec![(Source::Screens, project.join("screens"))],
    }
}

/// Read every record directly inside each search directory. Missing
/// directories yield empty sections.
///
/// # Errors
///
/// Fails if an existing directory cannot be listed.
pub fn scan(paths: &[(Source, PathBuf)]) -> Result<Inventory> {
    let mut inventory = Inventory::default();

    for (source, dir) in paths {
        let mut entries = Vec::new();
        if dir.is_dir() {
            let files = discover_components(dir)
                .with_context(|| format!("failed to scan {}", dir.display()))?;
            for path in files {
                match InventoryEntry::read(&path) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unparseable record")
                    }
                }
            }
        } else {
            tracing::debug!(dir = %dir.display(), "search directory absent");
        }
        inventory.sections.push((*source, entries));
    }

    Ok(inventory)
}

/// Count summary for text output.
pub fn render_text(
    inventory: &Inventory,
    kind: InventoryKind,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    match kind {
        InventoryKind::Components => {
            writeln!(out, "Component Inventory:")?;
            writeln!(out, "  Bundled Templates:  {}", inventory.count(Source::Bundled))?;
            writeln!(out, "  Project Components: {}", inventory.count(Source::Components))?;
            writeln!(out, "  Project Library:    {}", inventory.count(Source::Library))?;
            writeln!(out, "  Total:              {}", inventory.total())
        }
        InventoryKind::Screens => {
            writeln!(out, "Screen Inventory:")?;
            writeln!(out, "  Project Screens: {}", inventory.count(Source::Screens))
        }
    }
}

/// Execute the inventory.
///
/// Returns exit code: 0 when something is listed, 1 for an invalid filter
/// pattern, 2 when nothing matched, 3 when a directory cannot be listed.
pub fn run_inventory(args: &InventoryArgs, out: &mut dyn Write) -> Result<u8> {
    let id_pattern = match args.filter.as_deref().map(Regex::new).transpose() {
        Ok(re) => re,
        Err(e) => {
            eprintln!("✗ Error: Invalid filter pattern: {e}");
            return Ok(EXIT_INVALID);
        }
    };
    let filter = Filter {
        id_pattern,
        kind: args.component_type.clone(),
    };

    let project_root = match &args.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let templates_dir = args
        .templates_dir
        .clone()
        .unwrap_or_else(|| default_paths().0);

    let paths = search_paths(args.kind, &project_root, &templates_dir);
    let inventory = match scan(&paths) {
        Ok(inventory) => inventory.filtered(&filter).deduplicated(),
        Err(e) => {
            eprintln!("✗ Error: {e:#}");
            return Ok(EXIT_SCAN_ERROR);
        }
    };
    tracing::info!(kind = args.kind.as_str(), total = inventory.total(), "inventory built");

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&inventory)
                .context("failed to serialize inventory")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text if inventory.total() == 0 => {
            writeln!(out, "No {} found.", args.kind.as_str())?;
        }
        OutputFormat::Text => render_text(&inventory, args.kind, out)?,
    }

    Ok(if inventory.total() == 0 {
        EXIT_NONE_FOUND
    } else {
        EXIT_OK
    })
}
