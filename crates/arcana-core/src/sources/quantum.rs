//! Remote quantum random numbers (ANU QRNG JSON API).
//!
//! One GET per call, no retries. Fallback is the orchestrator's job; this
//! module only classifies what went wrong.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::conditioning::verification_seal;
use crate::error::{EntropyError, RemoteFailure, Result};

/// Largest `length` the service accepts.
pub const MAX_QUANTUM_VALUES: usize = 1024;

#[derive(Debug, Deserialize)]
struct QrngResponse {
    #[serde(rename = "type", default)]
    value_type: String,
    #[serde(default)]
    length: usize,
    #[serde(default)]
    data: Vec<u16>,
    success: bool,
}

/// Values returned by one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumDraw {
    pub numbers: Vec<u16>,
    /// SHA-256 of the comma-joined values, shown to users as an audit trail.
    pub seal: String,
}

pub struct QuantumEntropySource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl QuantumEntropySource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `count` unsigned 16-bit values. `count` must be in
    /// `1..=MAX_QUANTUM_VALUES`; it is checked before any I/O.
    pub async fn fetch(&self, count: usize) -> Result<QuantumDraw> {
        if !(1..=MAX_QUANTUM_VALUES).contains(&count) {
            return Err(EntropyError::InvalidParameter(format!(
                "quantum length must be between 1 and {MAX_QUANTUM_VALUES}, got {count}"
            )));
        }

        let url = Url::parse_with_params(
            &self.base_url,
            &[("length", count.to_string()), ("type", "uint16".to_string())],
        )
        .map_err(|e| RemoteFailure::InvalidUrl(e.to_string()))?;

        debug!("requesting {count} quantum values from {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RemoteFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteFailure::HttpStatus(status.as_u16()).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteFailure::Transport(e.to_string()))?;
        let parsed: QrngResponse =
            serde_json::from_slice(&body).map_err(|e| RemoteFailure::Decode(e.to_string()))?;

        if !parsed.success {
            return Err(RemoteFailure::ApiFailure.into());
        }
        if parsed.data.is_empty() {
            return Err(RemoteFailure::EmptyPayload.into());
        }
        if parsed.data.len() != count {
            debug!(
                "asked for {count} values, service sent {} (length field {}, type {:?})",
                parsed.data.len(),
                parsed.length,
                parsed.value_type
            );
        }

        let seal = verification_seal(&parsed.data);
        debug!("received {} quantum values, seal {seal}", parsed.data.len());
        Ok(QuantumDraw {
            numbers: parsed.data,
            seal,
        })
    }
}
