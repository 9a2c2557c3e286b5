//! Reading history on disk.
//!
//! # Storage Format
//!
//! One pretty-printed JSON file per reading, named
//! `<created_at>-<id>.json` with colons removed from the timestamp so names
//! are portable and sort chronologically.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::reading::Reading;
use crate::snapshot::EntropyMode;
use crate::spread::SpreadType;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path} is not a reading: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> HistoryError + '_ {
    move |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Summary row for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub id: Uuid,
    pub created_at: String,
    pub spread: SpreadType,
    pub mode: EntropyMode,
    pub cards: Vec<u8>,
}

/// A directory of saved readings.
pub struct ReadingHistory {
    dir: PathBuf,
}

impl ReadingHistory {
    /// Open (creating if needed) a history directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name a reading is stored under.
    pub fn file_name(reading: &Reading) -> String {
        format!("{}-{}.json", reading.created_at.replace(':', ""), reading.id)
    }

    pub fn save(&self, reading: &Reading) -> Result<PathBuf, HistoryError> {
        let path = self.dir.join(Self::file_name(reading));
        let json = serde_json::to_string_pretty(reading).map_err(|source| HistoryError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_err(&path))?;
        debug!("saved reading {} to {}", reading.id, path.display());
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Reading, HistoryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(io_err(path))?;
        serde_json::from_str(&text).map_err(|source| HistoryError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All readings in the directory, newest first. Files that do not parse
    /// are skipped with a warning.
    pub fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = Vec::new();
        for item in fs::read_dir(&self.dir).map_err(io_err(&self.dir))? {
            let path = item.map_err(io_err(&self.dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::load(&path) {
                Ok(reading) => entries.push(HistoryEntry {
                    cards: reading.card_ids(),
                    path,
                    id: reading.id,
                    created_at: reading.created_at,
                    spread: reading.configuration.spread,
                    mode: reading.entropy.mode,
                }),
                Err(e) => warn!("skipping {e}"),
            }
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DeckType, deck};
    use crate::reading::{ReadingConfiguration, build_reading};
    use crate::snapshot::ObtainedEntropy;
    use crate::sources::QuantumDraw;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reading(created_at: &str, seed: u16) -> Reading {
        let config = ReadingConfiguration {
            deck: DeckType::MajorOnly,
            ..Default::default()
        };
        let numbers = vec![seed, seed.wrapping_mul(3), 999];
        let mut r = build_reading(
            &config,
            &deck(config.deck),
            &config.spread.descriptor(config.language),
            ObtainedEntropy::quantum(QuantumDraw {
                seal: crate::conditioning::verification_seal(&numbers),
                numbers,
            }),
            &mut StdRng::seed_from_u64(seed as u64),
        )
        .unwrap();
        r.created_at = created_at.to_string();
        r
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let history = ReadingHistory::open(tmp.path().join("readings")).unwrap();
        let r = reading("2026-03-01T10:00:00.000Z", 1);
        let path = history.save(&r).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("2026-03-01T100000.000Z-"));
        assert!(name.ends_with(".json"));
        assert_eq!(ReadingHistory::load(&path).unwrap(), r);
    }

    #[test]
    fn test_list_newest_first_and_skips_junk() {
        let tmp = tempfile::tempdir().unwrap();
        let history = ReadingHistory::open(tmp.path()).unwrap();
        history.save(&reading("2026-01-01T00:00:00.000Z", 1)).unwrap();
        history.save(&reading("2026-05-01T00:00:00.000Z", 2)).unwrap();
        history.save(&reading("2026-03-01T00:00:00.000Z", 3)).unwrap();
        fs::write(tmp.path().join("broken.json"), "{").unwrap();
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();

        let list = history.list().unwrap();
        let stamps: Vec<&str> = list.iter().map(|e| e.created_at.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "2026-05-01T00:00:00.000Z",
                "2026-03-01T00:00:00.000Z",
                "2026-01-01T00:00:00.000Z"
            ]
        );
        assert!(list.iter().all(|e| e.cards.len() == 3));
    }

    #[test]
    fn test_load_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            ReadingHistory::load(tmp.path().join("missing.json")),
            Err(HistoryError::Io { .. })
        ));
        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "[]").unwrap();
        assert!(matches!(
            ReadingHistory::load(&bad),
            Err(HistoryError::Json { .. })
        ));
    }
}
