//! Shared test utilities for labinvite integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod fake_invite_api;
pub mod fixtures;

pub use assertions::*;
pub use fake_invite_api::*;
pub use fixtures::*;
