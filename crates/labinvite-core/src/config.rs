//! Configuration types for labinvite.
//!
//! [`Config::load`] reads `~/.config/labinvite/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem or the environment
//! (useful in tests). [`Config::fallback`] is what to use when the file
//! cannot be loaded.
//!
//! The `LABINVITE_TOKEN` environment variable, when set, overrides
//! `api.token` on every path except [`Config::defaults`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::schema::{ManifestOverrides, ManifestSchema};
use crate::types::Defaults;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[api]
base_url         = "http://localhost:8000/api/v1"
bulk_invite_path = "/admin/participants/invite-bulk"
timeout_secs     = 30

[defaults]
scenario_id      = "air"
duration_minutes = 240

# [manifest]
# columns    = ["name", "email", "imperva_account_id", "org", "is_sub_account", "scenario_id", "duration_minutes"]
# delimiters = ",;"
# truthy     = ["y", "yes", "true", "1"]
# falsy      = ["n", "no", "false", "0"]
#
# [manifest.synonyms]
# org = ["org", "organization", "company"]
"#;

const TOKEN_ENV: &str = "LABINVITE_TOKEN";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/labinvite/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub manifest: ManifestOverrides,
}

/// `[api]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_bulk_invite_path")]
    pub bulk_invite_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token for the admin API.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String { "http://localhost:8000/api/v1".to_string() }
fn default_bulk_invite_path() -> String { "/admin/participants/invite-bulk".to_string() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bulk_invite_path: default_bulk_invite_path(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Full URL of the bulk-invite endpoint.
    pub fn bulk_invite_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bulk_invite_path.trim_start_matches('/')
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/labinvite/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file, layered on top of the built-in defaults.
    /// A missing file is an error here; only [`Config::load`] creates one.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .set_override_option("api.token", std::env::var(TOKEN_ENV).ok())?
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        Self::builtin(None)
    }

    /// Built-in defaults with the `LABINVITE_TOKEN` override applied, for when
    /// the config file cannot be loaded.
    pub fn fallback() -> Self {
        Self::builtin(std::env::var(TOKEN_ENV).ok())
    }

    fn builtin(token: Option<String>) -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .set_override_option("api.token", token)
            .expect("api.token must be a valid override key")
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// The manifest schema with any `[manifest]` overrides applied.
    pub fn schema(&self) -> ManifestSchema {
        ManifestSchema::default().with_overrides(&self.manifest)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("labinvite")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
