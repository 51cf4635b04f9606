//! # Companion Templates
//!
//! Every component record `foo.uxm` has a sibling text template `foo.md`
//! that renders the component with `{{name}}` placeholders and usually one
//! or more fenced code blocks showing the rendering per state.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// File extension of companion text templates.
pub const TEMPLATE_EXTENSION: &str = "md";

/// Maximum number of lines kept in an index preview.
pub const PREVIEW_MAX_LINES: usize = 5;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex is valid"))
}

fn component_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{component:([a-z0-9-]+)\}\}").expect("component ref regex is valid")
    })
}

fn default_state_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)## Default State.*?```(.*?)```").expect("default state regex is valid")
    })
}

fn any_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(.*?)```").expect("code block regex is valid"))
}

/// Path of the companion template for a component file: same base name,
/// template extension.
pub fn companion_path(component_path: &Path) -> PathBuf {
    component_path.with_extension(TEMPLATE_EXTENSION)
}

/// Every distinct `{{identifier}}` placeholder name in `text`.
pub fn extract_variables(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Ids of components embedded in a screen template as
/// `{{component:<id>}}`.
pub fn extract_component_refs(text: &str) -> BTreeSet<String> {
    component_ref_regex()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Preview of a template: the first fenced code block after a
/// "Default State" heading, else the first fenced block anywhere, trimmed
/// and cut to at most `max_lines` lines. Empty when there is no block.
pub fn extract_preview(text: &str, max_lines: usize) -> String {
    let block = default_state_block_regex()
        .captures(text)
        .or_else(|| any_block_regex().captures(text))
        .and_then(|c| c.get(1));

    match block {
        Some(m) => m
            .as_str()
            .trim()
            .split('\n')
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

/// Read the template at `path` and extract its preview. A missing or
/// unreadable template yields an empty preview.
pub fn read_preview(path: &Path, max_lines: usize) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => extract_preview(&text, max_lines),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no template preview");
            String::new()
        }
    }
}
