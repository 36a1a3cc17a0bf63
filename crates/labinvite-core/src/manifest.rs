//! Manifest parsing — raw pasted or uploaded text into [`InviteTarget`]s.
//!
//! Detection is attempted in order, first match wins:
//!
//! 1. empty input yields nothing;
//! 2. text that parses as a JSON **array** is mapped element by element;
//! 3. everything else is read as delimited lines (CSV, semicolons, or one bare
//!    email per line) with an optional header row.
//!
//! Parsing never fails. Malformed records are dropped and the only observable
//! signal is a shorter result. Duplicate emails are passed through as-is.

use std::sync::LazyLock;

use serde_json::Value;

use crate::normalizer::normalize_target;
use crate::schema::ManifestSchema;
use crate::types::InviteTarget;

static DEFAULT_SCHEMA: LazyLock<ManifestSchema> = LazyLock::new(ManifestSchema::default);

/// Which branch of the detection policy a manifest takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Empty,
    JsonArray,
    Delimited,
}

impl std::fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestFormat::Empty => write!(f, "empty"),
            ManifestFormat::JsonArray => write!(f, "json"),
            ManifestFormat::Delimited => write!(f, "delimited"),
        }
    }
}

/// Report which branch `text` would be parsed with. Purely diagnostic.
pub fn detect_format(text: &str) -> ManifestFormat {
    if text.trim().is_empty() {
        ManifestFormat::Empty
    } else if json_array(text).is_some() {
        ManifestFormat::JsonArray
    } else {
        ManifestFormat::Delimited
    }
}

/// Parse `text` with the built-in [`ManifestSchema`].
pub fn parse_manifest(text: &str) -> Vec<InviteTarget> {
    parse_manifest_with(text, &DEFAULT_SCHEMA)
}

/// Parse `text` with an explicit schema.
pub fn parse_manifest_with(text: &str, schema: &ManifestSchema) -> Vec<InviteTarget> {
    if text.is_empty() {
        return Vec::new();
    }
    match json_array(text) {
        Some(elements) => parse_json_elements(&elements, schema),
        None => parse_delimited(text, schema),
    }
}

fn json_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(elements)) => Some(elements),
        _ => None,
    }
}

fn parse_json_elements(elements: &[Value], schema: &ManifestSchema) -> Vec<InviteTarget> {
    let targets: Vec<InviteTarget> = elements
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|object| normalize_target(&schema.resolve_object(object), schema))
        .collect();

    tracing::debug!(
        elements = elements.len(),
        kept = targets.len(),
        dropped = elements.len() - targets.len(),
        "parsed JSON manifest"
    );
    targets
}

fn parse_delimited(text: &str, schema: &ManifestSchema) -> Vec<InviteTarget> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty()).peekable();

    if lines.peek().is_some_and(|first| schema.is_header(first)) {
        tracing::trace!("skipping manifest header row");
        lines.next();
    }

    let mut targets = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        match parse_line(line, schema) {
            Some(target) => targets.push(target),
            None => {
                tracing::trace!(line, "dropped manifest line");
                dropped += 1;
            }
        }
    }

    tracing::debug!(kept = targets.len(), dropped, "parsed delimited manifest");
    targets
}

fn parse_line(line: &str, schema: &ManifestSchema) -> Option<InviteTarget> {
    let cells = schema.split_cells(line);
    match cells.as_slice() {
        [single] if single.contains('@') => Some(InviteTarget::from_email(*single)),
        [_] => None,
        _ if line.contains('@') => normalize_target(&schema.resolve_row(&cells), schema),
        _ => None,
    }
}
