//! Submission of recorded games

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::GameRecord;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write-only sink for finished games.
#[async_trait]
pub trait GameRecorder: Send + Sync {
    async fn submit(&self, record: GameRecord) -> Result<(), RecordError>;
}

/// Stores each game as `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRecorder {
    dir: PathBuf,
}

impl JsonFileRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, record: &GameRecord) -> PathBuf {
        self.dir.join(format!("{}.json", record.id))
    }

    /// Load a previously stored record
    pub async fn load(path: &Path) -> Result<GameRecord, RecordError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(GameRecord::from_json(&contents)?)
    }
}

#[async_trait]
impl GameRecorder for JsonFileRecorder {
    async fn submit(&self, record: GameRecord) -> Result<(), RecordError> {
        let json = record.to_json()?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&record);
        tokio::fs::write(&path, json).await?;
        debug!(id = %record.id, path = %path.display(), "game recorded");
        Ok(())
    }
}

/// Submit without waiting for the result; failures are only logged.
pub fn submit_detached(
    recorder: Arc<dyn GameRecorder>,
    record: GameRecord,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let id = record.id;
        if let Err(e) = recorder.submit(record).await {
            warn!(%id, error = %e, "failed to submit game record");
        }
    })
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod recorder_tests;
