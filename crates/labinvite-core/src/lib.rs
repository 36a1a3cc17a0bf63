//! labinvite-core — manifest ingestion for bulk lab invites.
//!
//! This crate turns free-form operator input (a JSON array, CSV or
//! semicolon-delimited rows, or one bare email per line) into an ordered list
//! of [`InviteTarget`]s ready for the bulk-invite call.
//!
//! # Pipeline
//!
//! ```text
//! raw text ──► detect format ──► resolve fields (schema) ──► normalize ──► Vec<InviteTarget>
//! ```
//!
//! Everything here is synchronous and pure: the same text always yields the
//! same targets, and no input ever produces an error.

pub mod config;
pub mod manifest;
pub mod normalizer;
pub mod schema;
pub mod template;
pub mod types;

pub use manifest::{detect_format, parse_manifest, parse_manifest_with, ManifestFormat};
pub use schema::ManifestSchema;
pub use types::{Defaults, Field, InviteTarget};
