//! Error taxonomy for reading generation.
//!
//! Only two kinds are ever fatal to a reading: [`EntropyError::InvalidParameter`]
//! and [`EntropyError::AssemblyInconsistency`]. Remote and sensor failures are
//! recovered inside the engine (fallback and partial data respectively).

use thiserror::Error;

/// Why a call to the remote random-number service failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("undecodable response body: {0}")]
    Decode(String),

    #[error("service reported success=false")]
    ApiFailure,

    #[error("service returned no values")]
    EmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntropyError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("remote entropy unavailable: {0}")]
    RemoteUnavailable(#[from] RemoteFailure),

    #[error("sensor entropy unavailable: {0}")]
    SensorUnavailable(String),

    #[error("assembly inconsistency: {0}")]
    AssemblyInconsistency(String),
}

impl EntropyError {
    /// Whether the engine absorbs this failure instead of reporting it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_) | Self::SensorUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, EntropyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(EntropyError::RemoteUnavailable(RemoteFailure::HttpStatus(503)).is_recoverable());
        assert!(EntropyError::SensorUnavailable("no gyro".into()).is_recoverable());
        assert!(!EntropyError::InvalidParameter("length".into()).is_recoverable());
        assert!(!EntropyError::AssemblyInconsistency("spread".into()).is_recoverable());
    }

    #[test]
    fn test_remote_failure_converts() {
        let err: EntropyError = RemoteFailure::ApiFailure.into();
        assert_eq!(err, EntropyError::RemoteUnavailable(RemoteFailure::ApiFailure));
        assert_eq!(
            err.to_string(),
            "remote entropy unavailable: service reported success=false"
        );
    }

    #[test]
    fn test_http_status_message() {
        assert_eq!(RemoteFailure::HttpStatus(500).to_string(), "HTTP status 500");
    }
}
