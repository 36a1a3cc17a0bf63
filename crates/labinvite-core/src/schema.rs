//! Manifest schema — the static, injectable tables that drive normalization.
//!
//! A [`ManifestSchema`] carries everything the normalizer would otherwise
//! hard-code: the positional column order for delimited text, one ordered
//! synonym list per [`Field`], the boolean token sets, the field delimiters,
//! and the header keywords. [`ManifestSchema::default`] is the built-in table;
//! tests and the `[manifest]` config section can supply alternates.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::Field;

/// Field values resolved from one raw record, keyed by logical field.
///
/// Produced by [`ManifestSchema::resolve_object`] for JSON objects and by
/// [`ManifestSchema::resolve_row`] for delimited lines; consumed by
/// [`normalize_target`](crate::normalizer::normalize_target).
pub type FieldBag = BTreeMap<Field, Value>;

const DEFAULT_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Email, &["email", "Email", "EMAIL"]),
    (Field::Name, &["name", "Name"]),
    (
        Field::ImpervaAccountId,
        &["imperva_account_id", "impervaAccountId", "impervaId", "impervaID"],
    ),
    (Field::Org, &["org", "organization"]),
    (
        Field::IsSubAccount,
        &["is_sub_account", "isSubAccount", "subAccount", "SubAccount"],
    ),
    (Field::ScenarioId, &["scenario_id", "scenarioId", "scenario"]),
    (
        Field::DurationMinutes,
        &["duration_minutes", "durationMinutes", "duration"],
    ),
];

const DEFAULT_TRUTHY: &[&str] = &["y", "yes", "true", "1"];
const DEFAULT_FALSY: &[&str] = &["n", "no", "false", "0"];
const DEFAULT_DELIMITERS: &[char] = &[',', ';'];
const DEFAULT_HEADER_KEYWORDS: &[&str] = &["email", "name"];

/// Token sets used to read free-text booleans. Tokens are compared against the
/// trimmed, lower-cased input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanTokens {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
}

impl Default for BooleanTokens {
    fn default() -> Self {
        Self {
            truthy: DEFAULT_TRUTHY.iter().map(|s| s.to_string()).collect(),
            falsy: DEFAULT_FALSY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BooleanTokens {
    /// `Some(true)` / `Some(false)` for a recognised token, `None` otherwise.
    pub fn classify(&self, token: &str) -> Option<bool> {
        let token = token.trim().to_lowercase();
        if self.truthy.iter().any(|t| *t == token) {
            Some(true)
        } else if self.falsy.iter().any(|t| *t == token) {
            Some(false)
        } else {
            None
        }
    }
}

/// The full set of tables consulted while parsing a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSchema {
    /// Positional column order for delimited lines. Extra trailing cells are
    /// ignored; missing trailing cells leave their field absent.
    pub columns: Vec<Field>,
    /// Ordered key spellings accepted for each field in JSON objects.
    pub synonyms: BTreeMap<Field, Vec<String>>,
    pub booleans: BooleanTokens,
    /// Characters that separate cells in a delimited line.
    pub delimiters: Vec<char>,
    /// Lower-case substrings that mark the first line as a header row.
    pub header_keywords: Vec<String>,
}

impl Default for ManifestSchema {
    fn default() -> Self {
        Self {
            columns: Field::ALL.to_vec(),
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(field, keys)| (*field, keys.iter().map(|k| k.to_string()).collect()))
                .collect(),
            booleans: BooleanTokens::default(),
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            header_keywords: DEFAULT_HEADER_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ManifestSchema {
    /// Key spellings for `field`, in lookup order. A field with no configured
    /// synonyms falls back to its canonical snake_case key.
    pub fn synonyms_for(&self, field: Field) -> Vec<&str> {
        match self.synonyms.get(&field) {
            Some(keys) if !keys.is_empty() => keys.iter().map(String::as_str).collect(),
            _ => vec![field.key()],
        }
    }

    /// Walk the synonym table for `field`: the first key present with a
    /// non-null value wins, even if that value later trims to nothing. Email
    /// also passes over empty strings.
    pub fn lookup<'a>(&self, object: &'a Map<String, Value>, field: Field) -> Option<&'a Value> {
        self.synonyms_for(field)
            .into_iter()
            .filter_map(|key| object.get(key))
            .find(|value| !skipped(field, value))
    }

    /// Resolve a JSON object into a [`FieldBag`] through the synonym tables.
    pub fn resolve_object(&self, object: &Map<String, Value>) -> FieldBag {
        Field::ALL
            .iter()
            .filter_map(|&field| self.lookup(object, field).map(|v| (field, v.clone())))
            .collect()
    }

    /// Resolve the cells of one delimited line positionally.
    pub fn resolve_row(&self, cells: &[&str]) -> FieldBag {
        self.columns
            .iter()
            .zip(cells)
            .map(|(&field, cell)| (field, Value::String(cell.to_string())))
            .collect()
    }

    /// Split a delimited line into trimmed cells.
    pub fn split_cells<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(self.delimiters.as_slice()).map(str::trim).collect()
    }

    /// Heuristic header check for the first non-blank line: it must mention a
    /// header keyword (case-insensitive) and contain a delimiter.
    pub fn is_header(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.header_keywords.iter().any(|k| lower.contains(k.as_str()))
            && lower.contains(self.delimiters.as_slice())
    }

    /// Apply `[manifest]` config overrides on top of this schema.
    pub fn with_overrides(mut self, overrides: &ManifestOverrides) -> Self {
        if let Some(columns) = &overrides.columns {
            self.columns = columns.clone();
        }
        for (field, keys) in &overrides.synonyms {
            self.synonyms.insert(*field, keys.clone());
        }
        if let Some(truthy) = &overrides.truthy {
            self.booleans.truthy = truthy.iter().map(|t| t.to_lowercase()).collect();
        }
        if let Some(falsy) = &overrides.falsy {
            self.booleans.falsy = falsy.iter().map(|t| t.to_lowercase()).collect();
        }
        if let Some(delimiters) = &overrides.delimiters {
            if !delimiters.is_empty() {
                self.delimiters = delimiters.chars().collect();
            }
        }
        if let Some(keywords) = &overrides.header_keywords {
            self.header_keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
        }
        self
    }
}

/// `[manifest]` section of `config.toml`. Every key is optional; synonym lists
/// replace the built-in list for that field only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestOverrides {
    #[serde(default)]
    pub columns: Option<Vec<Field>>,
    #[serde(default)]
    pub synonyms: BTreeMap<Field, Vec<String>>,
    #[serde(default)]
    pub truthy: Option<Vec<String>>,
    #[serde(default)]
    pub falsy: Option<Vec<String>>,
    /// Every character of the string is a delimiter, e.g. `",;\t"`.
    #[serde(default)]
    pub delimiters: Option<String>,
    #[serde(default)]
    pub header_keywords: Option<Vec<String>>,
}

fn skipped(field: Field, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => field == Field::Email && s.is_empty(),
        _ => false,
    }
}
