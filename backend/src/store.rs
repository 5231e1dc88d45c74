use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::info;

use shared::constants::{SPIN_FILE_NAME, STATE_FILE_NAME};
use shared::validation::clamp_prize_probabilities;
use shared::wheel::{now_millis, now_secs, SpinSignal, SyncUpdate, SyncedState};

use crate::error::Error;

/// Durable JSON document store backing the gateway: one file for the
/// synced wheel state, one for the current spin signal. Writes land in a
/// temp file first and are renamed into place, so a concurrent reader
/// never observes a half-written document. An in-process mutex serializes
/// read-modify-write cycles.
pub struct JsonStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE_NAME)
    }

    fn spin_path(&self) -> PathBuf {
        self.dir.join(SPIN_FILE_NAME)
    }

    /// Reads the synced state, creating the seed document on first access.
    pub async fn load_state(&self) -> Result<SyncedState, Error> {
        match tokio::fs::read(self.state_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let _guard = self.write_lock.lock().await;
                let state = SyncedState::seed();
                self.write_json(&self.state_path(), &state).await?;
                info!("Initialized {} with seed data", STATE_FILE_NAME);
                Ok(state)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Merges the provided fields into the stored document and stamps a
    /// strictly newer `last_updated`, so every accepted write is visible
    /// to a strict-greater-than poller.
    pub async fn apply_update(&self, update: SyncUpdate) -> Result<SyncedState, Error> {
        let _guard = self.write_lock.lock().await;

        let mut state = match tokio::fs::read(self.state_path()).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SyncedState::seed(),
            Err(e) => return Err(e.into()),
        };

        if let Some(mut prizes) = update.prizes {
            clamp_prize_probabilities(&mut prizes);
            state.prizes = prizes;
        }
        if let Some(config) = update.config {
            state.config = config;
        }
        if let Some(is_visible) = update.is_visible {
            state.is_visible = is_visible;
        }

        state.last_updated = now_millis().max(state.last_updated + 1);
        self.write_json(&self.state_path(), &state).await?;

        Ok(state)
    }

    /// Overwrites the signal slot with a freshly stamped command.
    pub async fn write_signal(&self, winner_index: Option<i64>) -> Result<SpinSignal, Error> {
        let _guard = self.write_lock.lock().await;
        let signal = SpinSignal::issued_at(now_secs(), winner_index);
        self.write_json(&self.spin_path(), &signal).await?;
        Ok(signal)
    }

    /// Reads the signal slot. Missing or unreadable files degrade to
    /// `None`; the poll endpoint must never fail.
    pub async fn read_signal(&self) -> Option<SpinSignal> {
        let bytes = tokio::fs::read(self.spin_path()).await.ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}
