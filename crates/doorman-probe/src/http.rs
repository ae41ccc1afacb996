//! HTTP implementation of the status probe.
//!
//! Issues `GET <endpoint>` with `Authorization: Bearer <token>` against the
//! backend's "current identity's profile" resource. The transport layer owns
//! TLS, the per-request timeout, and error classification; the
//! status→outcome mapping is a pure function so the contract can be tested
//! without a network.

use crate::{ProbeError, Provisioning, StatusProbe};
use async_trait::async_trait;
use doorman_types::BearerToken;
use std::time::Duration;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum accepted profile body size (256 KiB).
///
/// A profile is a small document; anything larger is not the resource this
/// probe asked for.
const MAX_PROFILE_BODY_BYTES: u64 = 256 * 1024;

/// Probe backed by a shared `reqwest` client.
///
/// # Example
///
/// ```no_run
/// use doorman_probe::HttpStatusProbe;
/// use std::time::Duration;
///
/// let probe = HttpStatusProbe::with_timeout(
///     "https://api.example.com/users/me",
///     Duration::from_secs(10),
/// )?;
/// # Ok::<(), doorman_probe::ProbeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpStatusProbe {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpStatusProbe {
    /// Builds a probe for the given profile endpoint with the default
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] if the HTTP client cannot be
    /// initialized (TLS backend failure).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProbeError> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Builds a probe with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] if the HTTP client cannot be
    /// initialized.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Transport {
                detail: format!("http client init: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Returns the profile endpoint URL this probe targets.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusProbe for HttpStatusProbe {
    async fn check(&self, token: &BearerToken) -> Result<Provisioning, ProbeError> {
        tracing::debug!(endpoint = %self.endpoint, "Checking account status");

        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token.reveal())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status().as_u16();
        match classify_status(status) {
            StatusClass::NotFound => Ok(Provisioning::Incomplete),
            StatusClass::Unexpected => Err(ProbeError::Server { status }),
            StatusClass::Success => confirm_profile_body(response).await,
        }
    }
}

/// How an HTTP status maps onto the probe contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    /// Success family; a profile body must follow.
    Success,
    /// The one status that means "definitively not provisioned".
    NotFound,
    /// Everything else: provisioning state unknown.
    Unexpected,
}

fn classify_status(status: u16) -> StatusClass {
    match status {
        404 => StatusClass::NotFound,
        200..=299 => StatusClass::Success,
        _ => StatusClass::Unexpected,
    }
}

/// A success status only counts as `Complete` when it carries a profile.
async fn confirm_profile_body(response: reqwest::Response) -> Result<Provisioning, ProbeError> {
    if let Some(length) = response.content_length() {
        if length > MAX_PROFILE_BODY_BYTES {
            return Err(ProbeError::Payload {
                detail: format!("profile body of {length} bytes exceeds limit"),
            });
        }
    }

    let body: serde_json::Value = response.json().await.map_err(|e| ProbeError::Payload {
        detail: format!("profile body unreadable: {e}"),
    })?;

    if body.is_null() {
        return Err(ProbeError::Payload {
            detail: "success response carried no profile".into(),
        });
    }

    Ok(Provisioning::Complete)
}

fn classify_transport(error: reqwest::Error) -> ProbeError {
    let detail = if error.is_timeout() {
        format!("timeout: {error}")
    } else if error.is_connect() {
        format!("connect: {error}")
    } else if error.is_request() {
        format!("request: {error}")
    } else {
        error.to_string()
    };
    ProbeError::Transport { detail }
}
