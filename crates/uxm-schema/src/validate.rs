//! # Schema Validation
//!
//! Runtime validation of component documents against a JSON Schema
//! (Draft 7), collecting every violation rather than stopping at the
//! first.
//!
//! ## Violation Paths
//!
//! Each [`Violation`] carries the location of the offending value as a
//! list of segments (object keys and array indices) in addition to the
//! raw JSON Pointer. For `required` failures the missing property name is
//! appended, so the path names the field that is absent rather than its
//! parent.
//!
//! ## Schema Resolution
//!
//! External `$ref`s are resolved offline against the `*.json` files that
//! sit next to the schema, by full `$id` or by file name. Anything still
//! unresolved resolves to the permissive schema `{}`, so validation never
//! touches the network.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use uxm_core::{read_json_document, UxmError};

/// Local retriever that resolves `$ref` URIs to sibling schema files.
struct LocalSchemaRetriever {
    /// Map from `$id` URI or bare filename to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl LocalSchemaRetriever {
    fn from_dir(dir: Option<&Path>) -> Self {
        let mut schemas_by_uri = HashMap::new();
        let Some(dir) = dir else {
            return Self { schemas_by_uri };
        };

        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "no sibling schemas");
                return Self { schemas_by_uri };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".json") {
                continue;
            }
            match read_json_document(&path) {
                Ok(value) => {
                    if let Some(id) = value.get("$id").and_then(Value::as_str) {
                        schemas_by_uri.insert(id.to_string(), value.clone());
                    }
                    schemas_by_uri.insert(name.to_string(), value);
                }
                Err(e) => tracing::debug!(error = %e, "skipping sibling schema"),
            }
        }

        Self { schemas_by_uri }
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        // Draft metaschemas and anything else unknown: accept everything.
        tracing::debug!(uri = uri_str, "unresolved $ref, using permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// Error while loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema document could not be read or is not valid JSON.
    #[error("schema load error: {0}")]
    SchemaLoadError(#[from] UxmError),

    /// The schema document is YAML and could not be parsed.
    #[error("schema load error for '{schema_name}': invalid YAML: {reason}")]
    YamlError {
        /// Schema filename.
        schema_name: String,
        /// Parser message.
        reason: String,
    },

    /// The schema parsed but could not be compiled into a validator.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// One step of a violation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object property name.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Segments joined with dots, or `root` for the document itself.
pub fn dotted_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// A single schema violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Location of the violating value, plus the missing property for
    /// `required` failures.
    pub path: Vec<PathSegment>,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    pub fn dotted_path(&self) -> String {
        dotted_path(&self.path)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dotted_path(), self.message)
    }
}

/// Load a schema document from disk. `.yaml`/`.yml` files are parsed as
/// YAML, everything else as JSON.
///
/// # Errors
///
/// Returns [`SchemaValidationError::SchemaLoadError`] for missing files and
/// JSON syntax errors, and [`SchemaValidationError::YamlError`] for YAML
/// syntax errors.
pub fn load_schema_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => UxmError::FileNotFound {
                    path: path.to_path_buf(),
                },
                _ => UxmError::Io {
                    path: path.to_path_buf(),
                    source: e,
                },
            })?;
            serde_yaml::from_str(&content).map_err(|e| SchemaValidationError::YamlError {
                schema_name: schema_name(path),
                reason: e.to_string(),
            })
        }
        _ => Ok(read_json_document(path)?),
    }
}

fn schema_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A compiled Draft-7 validator for one component schema.
///
/// Compilation happens once at construction; [`SchemaValidator::violations`]
/// can then be called for any number of documents.
pub struct SchemaValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Load and compile the schema at `path`. Sibling `*.json` files in the
    /// same directory are available for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Load errors as for [`load_schema_document`], or
    /// [`SchemaValidationError::ValidatorBuildError`] if the schema does not
    /// compile.
    pub fn from_file(path: &Path) -> Result<Self, SchemaValidationError> {
        let schema = load_schema_document(path)?;
        Self::from_value(&schema, &schema_name(path), path.parent())
    }

    /// Compile an already-parsed schema. `ref_dir`, if given, is searched
    /// for schemas referenced by `$ref`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidatorBuildError`] if the schema
    /// does not compile.
    pub fn from_value(
        schema: &Value,
        schema_name: &str,
        ref_dir: Option<&Path>,
    ) -> Result<Self, SchemaValidationError> {
        let validator = build_options(ref_dir).build(schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!(schema = schema_name, "compiled component schema");
        Ok(Self { validator })
    }

    /// Every violation of the schema by `instance`, in validator order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| {
                let mut path = pointer_segments(&e.instance_path.to_string(), instance);
                if let ValidationErrorKind::Required {
                    property: Value::String(property),
                } = &e.kind
                {
                    path.push(PathSegment::Key(property.clone()));
                }
                Violation {
                    path,
                    message: e.to_string(),
                }
            })
            .collect()
    }
}

fn build_options(ref_dir: Option<&Path>) -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.should_validate_formats(true);
    opts.with_retriever(LocalSchemaRetriever::from_dir(ref_dir));
    opts
}

/// Split a JSON Pointer into segments, using the instance to tell array
/// indices from object keys.
fn pointer_segments(pointer: &str, instance: &Value) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut cursor = Some(instance);

    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        match cursor {
            Some(Value::Array(items)) => match token.parse::<usize>() {
                Ok(i) => {
                    cursor = items.get(i);
                    segments.push(PathSegment::Index(i));
                }
                Err(_) => {
                    cursor = None;
                    segments.push(PathSegment::Key(token));
                }
            },
            Some(Value::Object(map)) => {
                cursor = map.get(&token);
                segments.push(PathSegment::Key(token));
            }
            _ => {
                cursor = None;
                segments.push(PathSegment::Key(token));
            }
        }
    }

    segments
}
