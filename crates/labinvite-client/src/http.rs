//! HTTP implementation of [`BulkInvite`] over a pooled `hyper` client.
//!
//! Speaks plain HTTP only; put the admin API behind a local proxy or tunnel
//! when it is served over TLS.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use labinvite_core::config::ApiConfig;
use labinvite_core::InviteTarget;

use crate::{BulkInvite, BulkInviteRequest, BulkInviteResponse, InviteError};

/// Posts batches to `POST {base_url}{bulk_invite_path}` with an optional
/// bearer token.
pub struct HttpBulkInvite {
    client: Client<HttpConnector, Full<Bytes>>,
    url: Uri,
    token: Option<String>,
    timeout: Duration,
}

impl HttpBulkInvite {
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> Result<Self, InviteError> {
        let url = url.parse::<Uri>().map_err(|e| InviteError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { client, url, token, timeout })
    }

    /// Build from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self, InviteError> {
        Self::new(
            &api.bulk_invite_url(),
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    pub fn url(&self) -> &Uri {
        &self.url
    }
}

impl BulkInvite for HttpBulkInvite {
    async fn bulk_invite(&self, targets: &[InviteTarget]) -> Result<BulkInviteResponse, InviteError> {
        let body = serde_json::to_vec(&BulkInviteRequest { participants: targets })?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| InviteError::Request(e.to_string()))?;

        tracing::debug!(url = %self.url, targets = targets.len(), "sending bulk invite");

        let exchange = async {
            let response = self.client.request(request).await?;
            let status = response.status();
            let bytes = response.into_body().collect().await?.to_bytes();
            Ok::<_, InviteError>((status, bytes))
        };
        let (status, bytes) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| InviteError::Timeout(self.timeout))??;

        tracing::debug!(%status, bytes = bytes.len(), "bulk invite answered");
        decode_response(status, &bytes, targets.len())
    }
}

/// Interpret a raw response. Non-2xx statuses become [`InviteError::Rejected`];
/// an empty 2xx body counts as full success.
pub fn decode_response(
    status: StatusCode,
    body: &[u8],
    sent: usize,
) -> Result<BulkInviteResponse, InviteError> {
    if !status.is_success() {
        return Err(InviteError::Rejected {
            status: status.as_u16(),
            message: rejection_message(status, body),
        });
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BulkInviteResponse::assumed(sent));
    }

    let mut response: BulkInviteResponse = serde_json::from_slice(body)?;
    response.count.get_or_insert(sent as u64);
    Ok(response)
}

// `detail` (FastAPI-style) first, then `message`, then the bare status.
fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("message")))
        .filter(|v| !v.is_null())
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
