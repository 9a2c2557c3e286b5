use std::path::Path;

use log::warn;

use arcana_core::{ReadingHistory, VerificationReport, verify_reading};

pub fn run(path: &str) -> super::CliResult {
    let report = verify_file(path)?;

    println!("{report}");
    println!("  recorded: {:?}", report.actual_ids);
    println!("  derived:  {:?}", report.expected_ids);
    if report.is_valid() {
        println!("✓ card order reproduced from the recorded entropy");
        Ok(())
    } else {
        Err(format!("reading {} failed verification", report.reading_id).into())
    }
}

/// Load a saved reading and re-derive it.
pub fn verify_file(
    path: impl AsRef<Path>,
) -> Result<VerificationReport, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let reading = ReadingHistory::load(path)?;
    let report = verify_reading(&reading)?;
    if !report.is_valid() {
        warn!("{} does not match its entropy record: {report}", path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::{
        EngineConfig, MotionBackend, RandomMode, ReadingAssembler, ReadingConfiguration,
    };

    fn saved_reading(dir: &Path) -> std::path::PathBuf {
        let engine = EngineConfig {
            motion: MotionBackend::None,
            location: None,
            ..Default::default()
        };
        let config = ReadingConfiguration {
            mode: RandomMode::Cosmic,
            ..Default::default()
        };
        let reading = super::super::runtime()
            .unwrap()
            .block_on(ReadingAssembler::from_config(&engine).assemble(&config))
            .unwrap();
        ReadingHistory::open(dir).unwrap().save(&reading).unwrap()
    }

    #[test]
    fn test_saved_reading_verifies() {
        let tmp = tempfile::tempdir().unwrap();
        let path = saved_reading(tmp.path());
        assert!(verify_file(&path).unwrap().is_valid());
        assert!(run(path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_tampered_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = saved_reading(tmp.path());
        let mut reading = ReadingHistory::load(&path).unwrap();
        reading.cards.swap(0, 1);
        std::fs::write(&path, serde_json::to_string(&reading).unwrap()).unwrap();

        let report = verify_file(&path).unwrap();
        assert!(!report.order_matches);
        assert!(run(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(verify_file("/nonexistent/reading.json").is_err());
    }
}
