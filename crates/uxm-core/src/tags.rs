//! # Tag Inference
//!
//! Derives the searchable tag set of a component for the template index.
//! The component's `type` is always a tag; category tags are added from
//! fixed type families, and explicit `metadata.tags` are merged in.
//! The result is a set: duplicates collapse and order carries no meaning.

use std::collections::BTreeSet;

use crate::component::Component;

/// Types tagged `form`.
pub const FORM_TYPES: &[&str] = &["input", "button", "form", "checkbox", "radio", "select"];

/// Types tagged `navigation`.
pub const NAVIGATION_TYPES: &[&str] = &["navigation", "breadcrumb", "pagination", "tabs"];

/// Types tagged `container`.
pub const CONTAINER_TYPES: &[&str] = &["card", "modal", "panel", "container"];

/// Infer the tag set of a component.
pub fn infer_tags(component: &Component) -> BTreeSet<String> {
    tags_for(
        &component.kind,
        component.behavior.interactive,
        &component.metadata.tags,
    )
}

/// Infer tags from the raw inputs: component type, interactivity, and
/// explicit metadata tags.
pub fn tags_for(kind: &str, interactive: bool, explicit: &[String]) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    tags.insert(kind.to_string());

    if interactive {
        tags.insert("interactive".to_string());
    }

    let families = [
        ("form", FORM_TYPES),
        ("navigation", NAVIGATION_TYPES),
        ("container", CONTAINER_TYPES),
    ];
    for (tag, members) in families {
        if members.contains(&kind) {
            tags.insert(tag.to_string());
        }
    }

    tags.extend(explicit.iter().cloned());
    tags
}
