//! labinvite — bulk-invite manifest ingestion for lab training environments.
//!
//! The binary is a thin shell over two library crates:
//!
//! ```text
//! raw text ──► labinvite-core (parse + normalize) ──► Vec<InviteTarget>
//!                                                         │
//!                                  labinvite-client ◄─────┘ (bulk invite)
//! ```
//!
//! This crate holds the command-line surface and the command handlers so
//! integration tests can drive them without spawning a process.

pub mod cli;
pub mod commands;

pub use labinvite_core::{parse_manifest, InviteTarget};
