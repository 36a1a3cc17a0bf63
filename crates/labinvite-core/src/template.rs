//! Starter manifests offered to operators.
//!
//! Both templates parse to valid targets with the built-in schema, so an
//! operator can download one, edit it, and feed it straight back in.

/// Header row plus two example participants.
pub const CSV_TEMPLATE: &str = "\
Name,Email,ImpervaAccountId,Org,IsSubAccount(YES/NO),ScenarioId,DurationMinutes
John Doe,john@cyber.net,12345,Acme Corp,YES,air,240
Jane Smith,jane@cyber.net,67890,Beta Inc,NO,api,120";

/// A JSON array with one fully-populated participant.
pub const JSON_TEMPLATE: &str = r#"[
  {
    "name": "John Doe",
    "email": "john@cyber.net",
    "imperva_account_id": "12345",
    "org": "Acme Corp",
    "is_sub_account": true,
    "scenario_id": "air",
    "duration_minutes": 240
  }
]"#;

/// Suggested filename when the CSV template is saved to disk.
pub const CSV_TEMPLATE_FILENAME: &str = "participant-invite-template.csv";

/// Suggested filename when the JSON template is saved to disk.
pub const JSON_TEMPLATE_FILENAME: &str = "participant-invite-template.json";
