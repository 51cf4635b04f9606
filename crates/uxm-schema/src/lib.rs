//! # uxm-schema — Component Schema Validation
//!
//! Validates uxscii component documents against a JSON Schema using the
//! `jsonschema` crate with Draft 7 semantics, including `format`
//! assertions.
//!
//! - [`SchemaValidator::from_file`] loads a JSON or YAML schema and
//!   compiles it once.
//! - [`SchemaValidator::violations`] returns every violation with a
//!   segment path (`["metadata", "name"]`) and the validator's message.
//! - [`dotted_path`] renders a segment path for display.
//!
//! ## Crate Policy
//!
//! - Depends only on `uxm-core` internally.
//! - Validation is offline: `$ref`s resolve against sibling files only.
//! - A schema that fails to compile is a distinct error
//!   ([`SchemaValidationError::ValidatorBuildError`]) from a document that
//!   fails validation, so tools can tell misconfiguration from bad input.

pub mod validate;

pub use validate::{
    dotted_path, load_schema_document, PathSegment, SchemaValidationError, SchemaValidator,
    Violation,
};
