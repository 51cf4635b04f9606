//! # uxm-cli — uxscii Component Tools
//!
//! Command-line tools over uxscii component pairs (`*.uxm` record plus
//! `*.md` companion template). Each tool is its own binary:
//!
//! - `quick_validate` — terse pass/fail for authoring workflows.
//! - `validate_component` — structured JSON report of errors, warnings,
//!   and stats.
//! - `validate_batch` — the full validator over every component in a
//!   directory.
//! - `validate_screen` — the full validator plus rendered-example and
//!   component-reference checks for a screen.
//! - `build_index` — aggregated, searchable index of a template library.
//! - `inventory` — components or screens available to a project.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success / component valid |
//! | 1 | Input invalid (bad JSON, missing file, schema violations) |
//! | 2 | Tooling misconfiguration (schema does not compile) |
//!
//! `inventory` has its own codes: 2 when nothing matched, 3 when a search
//! directory cannot be listed.
//!
//! ## Crate Policy
//!
//! - Handlers write their report to a caller-supplied writer and return
//!   an exit code; binaries only parse arguments and set up logging.
//! - Logs go to stderr so stdout carries only the report.

pub mod batch;
pub mod index;
pub mod inventory;
pub mod logging;
pub mod quick;
pub mod report;
pub mod screen;

/// Component is valid, or the tool completed.
pub const EXIT_OK: u8 = 0;
/// Input is invalid.
pub const EXIT_INVALID: u8 = 1;
/// The schema could not be turned into a validator.
pub const EXIT_MISCONFIGURED: u8 = 2;
