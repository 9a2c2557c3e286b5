pub mod bias;
pub mod deck;
pub mod draw;
pub mod history;
pub mod server;
pub mod spreads;
pub mod verify;

use arcana_core::{ConfigError, EngineConfig};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Engine configuration from `--config`, or the defaults.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(p) => EngineConfig::from_path(p),
        None => Ok(EngineConfig::default()),
    }
}

/// Single-use runtime for commands that drive the async engine.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::MotionBackend;

    // -----------------------------------------------------------------------
    // load_config tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_config_default() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("engine.json");
        std::fs::write(&path, r#"{"qrng_timeout_ms": 250, "motion": "none"}"#).unwrap();
        let cfg = load_config(path.to_str()).unwrap();
        assert_eq!(cfg.qrng_timeout_ms, 250);
        assert_eq!(cfg.motion, MotionBackend::None);
        assert_eq!(cfg.sample_interval_ms, 10);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some("/nonexistent/arcana.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
