//! # Component Records
//!
//! A component record is the JSON half of a uxscii component: identity
//! (`id`, `type`, `version`), descriptive `metadata`, `props`, `behavior`
//! (interactivity and an ordered list of states), optional
//! `accessibility`, and `ascii` rendering metadata for the companion
//! template.
//!
//! Two views are provided:
//!
//! - [`Component`] deserializes the fields the template index needs and
//!   fails when a required one (`id`, `type`, `metadata.name`) is absent.
//! - [`ComponentView`] borrows an arbitrary JSON value and answers
//!   questions with defaults, so validators can still report stats for a
//!   document that failed schema validation.
//!
//! States and template variables are each accepted in two shapes, a plain
//! name or a mapping carrying a `name`. Both are modeled as untagged enums
//! ([`StateDescriptor`], [`VariableDecl`]) rather than branching on raw JSON.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::UxmError;

/// File extension of component records.
pub const COMPONENT_EXTENSION: &str = "uxm";

/// One entry of `behavior.states`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateDescriptor {
    /// `"hover"`
    Named(String),
    /// `{"name": "hover", "properties": {...}}`
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        properties: Option<Value>,
    },
}

impl StateDescriptor {
    /// The state's name, if it declares one.
    pub fn name(&self) -> Option<&str> {
        match self {
            StateDescriptor::Named(name) => Some(name),
            StateDescriptor::Detailed { name, .. } => name.as_deref(),
        }
    }

    /// Whether the state declares a `properties` field. A bare name never does.
    pub fn has_properties(&self) -> bool {
        matches!(
            self,
            StateDescriptor::Detailed {
                properties: Some(_),
                ..
            }
        )
    }
}

/// One entry of `ascii.variables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableDecl {
    /// `"label"`
    Name(String),
    /// `{"name": "label", "type": "string", ...}`
    Declared { name: String },
}

impl VariableDecl {
    pub fn name(&self) -> &str {
        match self {
            VariableDecl::Name(name) => name,
            VariableDecl::Declared { name } => name,
        }
    }
}

/// Descriptive metadata block of a component.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Behavior block of a component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Behavior {
    /// Any truthy JSON value counts as interactive.
    #[serde(default, deserialize_with = "truthy")]
    pub interactive: bool,
    #[serde(default)]
    pub states: Vec<StateDescriptor>,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| is_truthy(&v))
}

/// Strictly typed component record.
///
/// Only the fields consumed by the template index are modeled; unknown
/// fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub accessibility: Option<Value>,
}

impl Component {
    /// Interpret a parsed JSON document as a component record.
    ///
    /// # Errors
    ///
    /// Returns [`UxmError::Malformed`] when a required field is missing or
    /// has the wrong type.
    pub fn from_value(value: Value) -> Result<Self, UxmError> {
        serde_json::from_value(value).map_err(|e| UxmError::Malformed(e.to_string()))
    }

    /// Names of all declared states, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`UxmError::Malformed`] if a mapping-shaped state has no name.
    pub fn state_names(&self) -> Result<Vec<String>, UxmError> {
        self.behavior
            .states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                state.name().map(str::to_string).ok_or_else(|| {
                    UxmError::Malformed(format!("behavior.states[{i}] has no name"))
                })
            })
            .collect()
    }

    /// Keys of the `props` mapping, in document order.
    pub fn prop_names(&self) -> Vec<String> {
        self.props.keys().cloned().collect()
    }

    pub fn has_accessibility(&self) -> bool {
        self.accessibility.as_ref().is_some_and(is_truthy)
    }
}

/// Lenient, borrowed view over a component document.
///
/// Every accessor falls back to an empty or zero value when the field is
/// missing or of an unexpected type.
#[derive(Debug, Clone, Copy)]
pub struct ComponentView<'a> {
    doc: &'a Value,
}

impl<'a> ComponentView<'a> {
    pub fn new(doc: &'a Value) -> Self {
        Self { doc }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.doc.get("id").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&'a str> {
        self.doc.get("type").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&'a str> {
        self.doc.get("version").and_then(Value::as_str)
    }

    /// `metadata.name`
    pub fn name(&self) -> Option<&'a str> {
        self.doc.pointer("/metadata/name").and_then(Value::as_str)
    }

    pub fn interactive(&self) -> bool {
        self.doc
            .pointer("/behavior/interactive")
            .is_some_and(is_truthy)
    }

    /// Raw `behavior.states` entries, whatever their shape.
    pub fn raw_states(&self) -> &'a [Value] {
        self.doc
            .pointer("/behavior/states")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn state_count(&self) -> usize {
        self.raw_states().len()
    }

    /// One descriptor per `behavior.states` entry. An entry of neither
    /// accepted shape reads as an unnamed state without properties.
    pub fn states(&self) -> Vec<StateDescriptor> {
        self.raw_states()
            .iter()
            .map(|s| {
                StateDescriptor::deserialize(s).unwrap_or(StateDescriptor::Detailed {
                    name: None,
                    properties: None,
                })
            })
            .collect()
    }

    pub fn prop_count(&self) -> usize {
        self.doc
            .get("props")
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }

    /// The `accessibility` mapping, if present and a mapping.
    pub fn accessibility(&self) -> Option<&'a Map<String, Value>> {
        self.doc.get("accessibility").and_then(Value::as_object)
    }

    pub fn has_accessibility(&self) -> bool {
        self.doc.get("accessibility").is_some_and(is_truthy)
    }

    /// Numeric `ascii.<key>` such as `width` or `height`.
    pub fn ascii_dimension(&self, key: &str) -> Option<&'a Number> {
        self.doc
            .get("ascii")
            .and_then(|a| a.get(key))
            .and_then(|v| match v {
                Value::Number(n) => Some(n),
                _ => None,
            })
    }

    /// Ids of other components this one is composed from: `extends`, and
    /// `component` / `components` of every entry in `slots`.
    pub fn component_refs(&self) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();
        if let Some(parent) = self.doc.get("extends").and_then(Value::as_str) {
            refs.insert(parent.to_string());
        }
        let slots = self.doc.get("slots").and_then(Value::as_object);
        for slot in slots.into_iter().flat_map(Map::values) {
            if let Some(id) = slot.get("component").and_then(Value::as_str) {
                refs.insert(id.to_string());
            }
            let many = slot.get("components").and_then(Value::as_array);
            refs.extend(
                many.into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            );
        }
        refs
    }

    /// `ascii.templateFile`, if declared.
    pub fn template_file(&self) -> Option<&'a str> {
        self.doc.pointer("/ascii/templateFile").and_then(Value::as_str)
    }

    /// Names declared in `ascii.variables`, in either accepted shape.
    pub fn declared_variables(&self) -> BTreeSet<String> {
        self.doc
            .pointer("/ascii/variables")
            .and_then(Value::as_array)
            .map(|vars| {
                vars.iter()
                    .filter_map(|v| VariableDecl::deserialize(v).ok())
                    .map(|v| v.name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero, and empty
/// strings, arrays, and objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Read and parse a JSON document from disk.
///
/// # Errors
///
/// - [`UxmError::FileNotFound`] if the path does not exist.
/// - [`UxmError::Json`] if the content is not valid JSON.
/// - [`UxmError::Io`] for any other read failure.
pub fn read_json_document(path: &Path) -> Result<Value, UxmError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => UxmError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => UxmError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_str(&content).map_err(|e| UxmError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn button() -> Value {
        json!({
            "id": "primary-button",
            "type": "button",
            "version": "1.0.0",
            "metadata": {"name": "Primary Button", "tags": ["cta"]},
            "props": {"text": {"type": "string"}, "disabled": {"type": "boolean"}},
            "behavior": {
                "interactive": true,
                "states": [
                    {"name": "default", "properties": {"border": "solid"}},
                    "hover"
                ]
            },
            "accessibility": {"role": "button", "focusable": true},
            "ascii": {"width": 20, "height": 3, "variables": ["text"]}
        })
    }

    #[test]
    fn state_descriptor_accepts_both_shapes() {
        let named: StateDescriptor = serde_json::from_value(json!("hover")).unwrap();
        assert_eq!(named.name(), Some("hover"));
        assert!(!named.has_properties());

        let detailed: StateDescriptor =
            serde_json::from_value(json!({"name": "focus", "properties": {}})).unwrap();
        assert_eq!(detailed.name(), Some("focus"));
        assert!(detailed.has_properties());

        let unnamed: StateDescriptor = serde_json::from_value(json!({"duration": 3})).unwrap();
        assert_eq!(unnamed.name(), None);
        assert!(!unnamed.has_properties());
    }

    #[test]
    fn variable_decl_accepts_both_shapes() {
        let plain: VariableDecl = serde_json::from_value(json!("label")).unwrap();
        let declared: VariableDecl =
            serde_json::from_value(json!({"name": "label", "type": "string"})).unwrap();
        assert_eq!(plain.name(), "label");
        assert_eq!(declared.name(), "label");
    }

    #[test]
    fn component_from_value_reads_index_fields() {
        let component = Component::from_value(button()).unwrap();
        assert_eq!(component.id, "primary-button");
        assert_eq!(component.kind, "button");
        assert_eq!(component.metadata.name, "Primary Button");
        assert_eq!(component.state_names().unwrap(), vec!["default", "hover"]);
        assert_eq!(component.prop_names(), vec!["text", "disabled"]);
        assert!(component.behavior.interactive);
        assert!(component.has_accessibility());
    }

    #[test]
    fn component_from_value_requires_metadata_name() {
        let mut doc = button();
        doc["metadata"] = json!({"description": "no name"});
        let err = Component::from_value(doc).unwrap_err();
        assert!(matches!(err, UxmError::Malformed(_)));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn unnamed_mapping_state_is_rejected_for_state_names() {
        let mut doc = button();
        doc["behavior"]["states"] = json!([{"properties": {}}]);
        let component = Component::from_value(doc).unwrap();
        assert!(component.state_names().is_err());
    }

    #[test]
    fn truthy_interactive_values_are_accepted() {
        let mut doc = button();
        doc["behavior"]["interactive"] = json!(1);
        assert!(Component::from_value(doc.clone()).unwrap().behavior.interactive);

        doc["behavior"]["interactive"] = json!("");
        assert!(!Component::from_value(doc.clone()).unwrap().behavior.interactive);

        doc["behavior"] = json!({"states": []});
        assert!(!Component::from_value(doc).unwrap().behavior.interactive);
    }

    #[test]
    fn unparseable_states_read_as_unnamed() {
        let doc = json!({"behavior": {"states": [{"name": 5}, 7, "idle"]}});
        let states = ComponentView::new(&doc).states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].name(), None);
        assert!(!states[0].has_properties());
        assert_eq!(states[1].name(), None);
        assert_eq!(states[2].name(), Some("idle"));
    }

    #[test]
    fn component_refs_collect_extends_and_slots() {
        let doc = json!({
            "extends": "base-layout",
            "slots": {
                "header": {"component": "nav-bar"},
                "body": {"components": ["info-card", "primary-button", 3]},
                "footer": {"text": "plain"}
            },
            "ascii": {"templateFile": "login.md"}
        });
        let view = ComponentView::new(&doc);
        assert_eq!(
            view.component_refs().into_iter().collect::<Vec<_>>(),
            vec!["base-layout", "info-card", "nav-bar", "primary-button"]
        );
        assert_eq!(view.template_file(), Some("login.md"));
        assert!(ComponentView::new(&json!({})).component_refs().is_empty());
    }

    #[test]
    fn empty_accessibility_mapping_does_not_count() {
        let mut doc = button();
        doc["accessibility"] = json!({});
        let component = Component::from_value(doc.clone()).unwrap();
        assert!(!component.has_accessibility());
        assert!(!ComponentView::new(&doc).has_accessibility());
    }

    #[test]
    fn view_defaults_on_empty_document() {
        let doc = json!({});
        let view = ComponentView::new(&doc);
        assert_eq!(view.id(), None);
        assert_eq!(view.state_count(), 0);
        assert_eq!(view.prop_count(), 0);
        assert!(!view.interactive());
        assert!(!view.has_accessibility());
        assert!(view.ascii_dimension("width").is_none());
        assert!(view.declared_variables().is_empty());
    }

    #[test]
    fn view_reads_populated_document() {
        let doc = button();
        let view = ComponentView::new(&doc);
        assert_eq!(view.id(), Some("primary-button"));
        assert_eq!(view.kind(), Some("button"));
        assert_eq!(view.version(), Some("1.0.0"));
        assert_eq!(view.name(), Some("Primary Button"));
        assert_eq!(view.state_count(), 2);
        assert_eq!(view.prop_count(), 2);
        assert!(view.interactive());
        assert_eq!(view.ascii_dimension("width").and_then(Number::as_u64), Some(20));
        assert_eq!(
            view.declared_variables().into_iter().collect::<Vec<_>>(),
            vec!["text"]
        );
    }

    #[test]
    fn view_declared_variables_from_mappings() {
        let doc = json!({"ascii": {"variables": [
            {"name": "label", "type": "string"},
            {"name": "count"},
            {"type": "orphan"}
        ]}});
        let vars = ComponentView::new(&doc).declared_variables();
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec!["count", "label"]);
    }

    #[test]
    fn truthiness_matches_json_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!("button")));
        assert!(is_truthy(&json!({"role": "button"})));
    }

    #[test]
    fn read_json_document_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json_document(&dir.path().join("absent.uxm")).unwrap_err();
        assert!(matches!(err, UxmError::FileNotFound { .. }));
    }

    #[test]
    fn read_json_document_reports_syntax_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.uxm");
        std::fs::write(&path, "{\n  \"id\": \"x\",\n  oops\n}").unwrap();
        let err = read_json_document(&path).unwrap_err();
        let message = err.json_syntax_message().unwrap();
        assert!(message.contains(" at line 3, column "), "{message}");
        assert_eq!(message.matches("line").count(), 1, "{message}");
        assert!(UxmError::Malformed("x".into()).json_syntax_message().is_none());
    }
}
