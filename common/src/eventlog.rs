use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Reading, StationError};

/// The local append-only record of every reading.
///
/// The file is opened, appended to and closed again for every reading, so
/// each row is on disk before the next iteration starts. No header row is
/// written; columns follow [`crate::reading::COLUMNS`].
#[derive(Clone, Debug)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub const DEFAULT_PATH: &'static str = "event.csv";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, reading: &Reading) -> Result<(), StationError> {
        let map_err = |source| StationError::EventLog {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(map_err)?;
        writeln!(file, "{}", reading.csv_row()).map_err(map_err)?;
        file.flush().map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(moisture: f64) -> Reading {
        Reading {
            temperature: Some(20.0),
            humidity: None,
            moisture,
            time: "2024-03-01 10:00:00.000000".into(),
            ambient_light: Some(5.25),
            pressure: Some(100.0),
        }
    }

    #[test]
    fn test_append_creates_and_grows_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("event.csv"));

        log.append(&reading(1.0)).unwrap();
        log.append(&reading(2.5)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(
            rows,
            [
                "20.0,,1.0,2024-03-01 10:00:00.000000,5.25,100.0",
                "20.0,,2.5,2024-03-01 10:00:00.000000,5.25,100.0",
            ]
        );
    }

    #[test]
    fn test_append_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.csv");
        std::fs::write(&path, "old row\n").unwrap();

        EventLog::new(&path).append(&reading(3.0)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("old row\n"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("missing").join("event.csv"));

        assert!(matches!(
            log.append(&reading(0.0)),
            Err(StationError::EventLog { .. })
        ));
    }
}
