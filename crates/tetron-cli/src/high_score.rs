use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

const FILE_NAME: &str = "high_score.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "tetron_highscore")]
    score: usize,
}

/// Persistent best score, stored as `{"tetron_highscore": <n>}`.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored score. A missing file counts as zero.
    pub fn load(&self) -> anyhow::Result<usize> {
        match util::read_json_file::<HighScoreRecord, _>("high score", &self.path) {
            Ok(record) => Ok(record.score),
            Err(err) if is_not_found(&err) => Ok(0),
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, score: usize) -> anyhow::Result<()> {
        Output::create(self.path.clone())?.write_json(&HighScoreRecord { score })
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|err| err.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("tetron-{name}-{}", process::id()));
        _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_zero() {
        let store = HighScoreStore::new(&temp_dir("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = temp_dir("save");
        let store = HighScoreStore::new(&dir);
        store.save(4200).unwrap();
        assert_eq!(store.load().unwrap(), 4200);

        let json = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tetron_highscore"], 4200);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let store = HighScoreStore::new(&dir);
        fs::write(store.path(), "not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("high score"));
        fs::remove_dir_all(dir).unwrap();
    }
}
