//! labinvite-client — the bulk-invite API seam.
//!
//! The remote service owns validation, persistence and email delivery. This
//! crate only describes the call ([`BulkInvite`]), its wire types, an HTTP
//! implementation ([`http::HttpBulkInvite`]), and how a response collapses
//! into the single aggregated [`Outcome`] shown to the operator.

pub mod http;

use std::future::Future;
use std::time::Duration;

use labinvite_core::InviteTarget;
use serde::{Deserialize, Serialize};

pub use http::HttpBulkInvite;

/// Message shown when the service reports failure without any detail.
pub const GENERIC_FAILURE: &str = "Deployment failed. Check logs for details.";

/// Anything that can submit a batch of targets to the bulk-invite endpoint.
pub trait BulkInvite {
    fn bulk_invite(
        &self,
        targets: &[InviteTarget],
    ) -> impl Future<Output = Result<BulkInviteResponse, InviteError>> + Send;
}

/// Request body: `{"participants": [...]}`.
#[derive(Debug, Serialize)]
pub struct BulkInviteRequest<'a> {
    pub participants: &'a [InviteTarget],
}

/// Response body of the bulk-invite endpoint. Every key is optional on the
/// wire; `success` defaults to `true` and a missing `count` is filled in with
/// the number of targets sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkInviteResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub count: Option<u64>,
    /// One message per target the service rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails_sent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_requested: Option<u64>,
}

fn default_success() -> bool { true }

impl BulkInviteResponse {
    /// The response assumed for an empty 2xx body.
    pub fn assumed(sent: usize) -> Self {
        Self {
            success: true,
            count: Some(sent as u64),
            errors: None,
            error_count: None,
            emails_sent: None,
            total_requested: None,
        }
    }

    /// Per-target rejection messages, possibly empty.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}

/// Errors raised while submitting a batch.
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("manifest contains no valid targets")]
    EmptyManifest,
    #[error("invalid bulk-invite URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build bulk-invite request: {0}")]
    Request(String),
    #[error("bulk-invite request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read bulk-invite response: {0}")]
    Body(#[from] hyper::Error),
    #[error("bulk-invite request timed out after {0:?}")]
    Timeout(Duration),
    /// Non-2xx status; `message` is the service's `detail`/`message` or `HTTP <status>`.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("malformed bulk-invite payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// The operator-facing result of one bulk-invite call: complete or failed,
/// nothing in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Complete {
        count: u64,
        emails_sent: Option<u64>,
        /// Individual rejections the service still reported.
        errors: Vec<String>,
    },
    Failed(String),
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Complete { count, emails_sent, errors } => {
                write!(f, "invited {count} participant(s)")?;
                if let Some(sent) = emails_sent {
                    write!(f, ", {sent} email(s) sent")?;
                }
                if !errors.is_empty() {
                    write!(f, ", {} rejected", errors.len())?;
                }
                Ok(())
            }
            Outcome::Failed(message) => f.write_str(message),
        }
    }
}

/// Collapse a response into a single [`Outcome`].
pub fn summarize(response: &BulkInviteResponse) -> Outcome {
    if response.success {
        return Outcome::Complete {
            count: response.count.unwrap_or_default(),
            emails_sent: response.emails_sent,
            errors: response.errors().to_vec(),
        };
    }
    match response.errors() {
        [] => Outcome::Failed(GENERIC_FAILURE.to_string()),
        errors => Outcome::Failed(format!("Failed: {}", errors.join(", "))),
    }
}

/// Submit `targets` and summarise the result. An empty batch is refused
/// before any call is made; call failures become [`Outcome::Failed`].
pub async fn submit<B: BulkInvite>(api: &B, targets: &[InviteTarget]) -> Result<Outcome, InviteError> {
    if targets.is_empty() {
        return Err(InviteError::EmptyManifest);
    }
    match api.bulk_invite(targets).await {
        Ok(response) => Ok(summarize(&response)),
        Err(err) => {
            tracing::warn!(error = %err, "bulk invite failed");
            Ok(Outcome::Failed(err.to_string()))
        }
    }
}
