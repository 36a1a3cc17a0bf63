//! Core types for labinvite-core.
//!
//! This module defines the normalised [`InviteTarget`] produced by the manifest
//! normalizer, the [`Field`] discriminant used by the synonym tables, and the
//! system-wide [`Defaults`] applied when a target leaves a field unspecified.

use serde::{Deserialize, Serialize};

/// A normalised invitee record, ready to be handed to the bulk-invite call.
///
/// Only `email` is mandatory. Every optional field is `None` when the manifest
/// did not provide it; an absent field means "unspecified" (the remote side
/// applies its own default), never an empty string or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteTarget {
    /// Trimmed address; always contains `@`.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imperva_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sub_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl InviteTarget {
    /// A target carrying only an email address.
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            imperva_account_id: None,
            org: None,
            is_sub_account: None,
            scenario_id: None,
            duration_minutes: None,
        }
    }

    /// Scenario the lab will be provisioned with once system defaults apply.
    pub fn effective_scenario<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        self.scenario_id.as_deref().unwrap_or(&defaults.scenario_id)
    }

    /// Session length in minutes once system defaults apply.
    pub fn effective_duration_minutes(&self, defaults: &Defaults) -> u32 {
        self.duration_minutes.unwrap_or(defaults.duration_minutes)
    }
}

/// Logical manifest field. Each variant owns one synonym list in the
/// [`ManifestSchema`](crate::schema::ManifestSchema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    ImpervaAccountId,
    Org,
    IsSubAccount,
    ScenarioId,
    DurationMinutes,
}

impl Field {
    /// All fields in canonical (positional CSV) order.
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Email,
        Field::ImpervaAccountId,
        Field::Org,
        Field::IsSubAccount,
        Field::ScenarioId,
        Field::DurationMinutes,
    ];

    /// Canonical snake_case key, as sent to the bulk-invite endpoint.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::ImpervaAccountId => "imperva_account_id",
            Field::Org => "org",
            Field::IsSubAccount => "is_sub_account",
            Field::ScenarioId => "scenario_id",
            Field::DurationMinutes => "duration_minutes",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// System defaults for fields a target leaves unspecified.
///
/// These are display-side only: the normalizer never writes them into an
/// [`InviteTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_scenario_id")]
    pub scenario_id: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

fn default_scenario_id() -> String { "air".to_string() }
fn default_duration_minutes() -> u32 { 240 }

impl Default for Defaults {
    fn default() -> Self {
        Self {
            scenario_id: default_scenario_id(),
            duration_minutes: default_duration_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_fields_are_omitted_when_serialized() {
        let target = InviteTarget::from_email("a@b.com");
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "a@b.com" }));
    }

    #[test]
    fn effective_values_fall_back_to_defaults() {
        let defaults = Defaults::default();
        let mut target = InviteTarget::from_email("a@b.com");
        assert_eq!(target.effective_scenario(&defaults), "air");
        assert_eq!(target.effective_duration_minutes(&defaults), 240);

        target.scenario_id = Some("api".to_string());
        target.duration_minutes = Some(90);
        assert_eq!(target.effective_scenario(&defaults), "api");
        assert_eq!(target.effective_duration_minutes(&defaults), 90);
    }

    #[test]
    fn field_keys_follow_canonical_order() {
        let keys: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            [
                "name",
                "email",
                "imperva_account_id",
                "org",
                "is_sub_account",
                "scenario_id",
                "duration_minutes"
            ]
        );
    }
}
