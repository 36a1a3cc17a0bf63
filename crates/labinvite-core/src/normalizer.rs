//! Normalizer — turns a resolved [`FieldBag`] into an [`InviteTarget`].
//!
//! Every helper here is total: unrecognised shapes become `None` rather than
//! errors. A record is rejected as a whole only when it has no usable email.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::schema::{BooleanTokens, FieldBag, ManifestSchema};
use crate::types::{Field, InviteTarget};

static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*m$").expect("minutes pattern must compile"));
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*h$").expect("hours pattern must compile")
});
static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("bare minutes pattern must compile"));

/// Build a target from resolved field values. Returns `None` when the email is
/// missing or lacks an `@`.
pub fn normalize_target(bag: &FieldBag, schema: &ManifestSchema) -> Option<InviteTarget> {
    let email = bag.get(&Field::Email).and_then(scalar_text)?;
    if !email.contains('@') {
        return None;
    }

    let text = |field: Field| bag.get(&field).and_then(scalar_text);

    Some(InviteTarget {
        email,
        name: text(Field::Name),
        imperva_account_id: text(Field::ImpervaAccountId),
        org: text(Field::Org),
        is_sub_account: bag
            .get(&Field::IsSubAccount)
            .and_then(|v| normalize_boolean(v, &schema.booleans)),
        scenario_id: text(Field::ScenarioId),
        duration_minutes: bag.get(&Field::DurationMinutes).and_then(normalize_duration_minutes),
    })
}

/// Trimmed text form of a JSON scalar; blank strings, arrays, objects and
/// `null` are absent.
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

// Whole floats print without a fraction, so `1.0` reads as `1`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 => format!("{f}"),
        _ => n.to_string(),
    }
}

/// Booleans pass through; other scalars are matched against the token sets.
pub fn normalize_boolean(value: &Value, tokens: &BooleanTokens) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => scalar_text(other).and_then(|s| tokens.classify(&s)),
    }
}

/// Accepts JSON numbers (floored, clamped to `0..=u32::MAX`) and the text
/// notations `240`, `240m`, `4h` and `4.5h`.
pub fn normalize_duration_minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().and_then(clamp_minutes),
        Value::String(s) => parse_duration_text(s),
        _ => None,
    }
}

fn parse_duration_text(raw: &str) -> Option<u32> {
    let s = raw.trim().to_lowercase();

    if let Some(caps) = MINUTES_RE.captures(&s) {
        return Some(saturating_minutes(&caps[1]));
    }
    if let Some(caps) = HOURS_RE.captures(&s) {
        return caps[1].parse::<f64>().ok().and_then(|h| clamp_minutes(h * 60.0));
    }
    if BARE_RE.is_match(&s) {
        return Some(saturating_minutes(&s));
    }
    None
}

fn clamp_minutes(minutes: f64) -> Option<u32> {
    if !minutes.is_finite() {
        return None;
    }
    Some(minutes.floor().clamp(0.0, f64::from(u32::MAX)) as u32)
}

// Digits only; the sole parse failure left is overflow.
fn saturating_minutes(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
