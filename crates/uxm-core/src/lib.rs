//! # uxm-core — Foundational Types for uxscii Component Tooling
//!
//! A uxscii component is a pair of sibling files: a JSON component record
//! (`*.uxm`) and a companion text template (`*.md`) that renders the
//! component using `{{name}}` placeholders. This crate defines the shared
//! vocabulary every tool in the workspace speaks.
//!
//! ## Modules
//!
//! - [`component`] — The component record, in two forms: a strict typed
//!   [`Component`] for consumers that need required fields, and a lenient
//!   [`ComponentView`] over raw JSON for consumers that must keep going
//!   when fields are missing or malformed.
//! - [`template`] — Companion-file path derivation, placeholder and
//!   embedded-component extraction, and preview extraction from fenced
//!   code blocks.
//! - [`tags`] — Descriptive tag inference used by the template index.
//! - [`discover`] — Locating component files in a directory.
//! - [`error`] — Structured error types.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `uxm-*` crates (this is the leaf of the DAG).
//! - Component inputs are never mutated; every accessor borrows.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod component;
pub mod discover;
pub mod error;
pub mod tags;
pub mod template;

pub use component::{
    is_truthy, read_json_document, Component, ComponentView, StateDescriptor, VariableDecl,
    COMPONENT_EXTENSION,
};
pub use discover::{discover_components, discover_components_recursive};
pub use error::UxmError;
pub use tags::{infer_tags, tags_for};
pub use template::{
    companion_path, extract_component_refs, extract_preview, extract_variables, read_preview,
    PREVIEW_MAX_LINES, TEMPLATE_EXTENSION,
};
