//! Single-file JSON store.
//!
//! The whole state is kept in memory and rewritten on every mutation: the new
//! contents go to a temporary file next to the target, which is then renamed
//! over it. In-memory state only changes after the rename succeeds.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mythilens_core::{ContributionRecord, ContributionStatus, UserReputationProfile};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::StoreError;
use crate::backend::{
    ContributionBuilder, ContributionStore, ContributionUpdate, ProfileStore, ProfileUpdate,
};
use crate::snapshot::Snapshot;

pub struct JsonStore {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl JsonStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), "opened json store");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the state, persist it, then commit.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Snapshot) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();
        let out = mutate(&mut next)?;

        let bytes = serde_json::to_vec_pretty(&next)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes)).await??;
        debug!(path = %self.path.display(), "json store flushed");

        *guard = next;
        Ok(out)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[async_trait]
impl ProfileStore for JsonStore {
    async fn profile(&self, user_id: &str) -> Result<Option<UserReputationProfile>, StoreError> {
        Ok(self.state.lock().await.profiles.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate<'_>,
    ) -> Result<UserReputationProfile, StoreError> {
        self.commit(|s| s.update_profile(user_id, update)).await
    }

    async fn profiles(&self) -> Result<Vec<UserReputationProfile>, StoreError> {
        Ok(self.state.lock().await.profiles.values().cloned().collect())
    }
}

#[async_trait]
impl ContributionStore for JsonStore {
    async fn insert_contribution(
        &self,
        submitter: &str,
        build: ContributionBuilder<'_>,
    ) -> Result<(ContributionRecord, UserReputationProfile), StoreError> {
        self.commit(|s| s.insert_contribution(submitter, build)).await
    }

    async fn update_contribution(
        &self,
        id: u64,
        update: ContributionUpdate<'_>,
    ) -> Result<ContributionRecord, StoreError> {
        self.commit(|s| s.update_contribution(id, update)).await
    }

    async fn contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionRecord>, StoreError> {
        Ok(self.state.lock().await.contributions(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythilens_core::{ActionKind, CoreError};

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("state.json")).await.unwrap();
        assert!(store.profiles().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = JsonStore::open(&path).await.unwrap();
            store
                .update_profile(
                    "asha",
                    Box::new(|p| {
                        p.award(ActionKind::PathCompletion);
                        p.grant_badge("Temple Trail");
                        Ok(())
                    }),
                )
                .await
                .unwrap();
        }

        let reopened = JsonStore::open(&path).await.unwrap();
        let p = reopened.profile("asha").await.unwrap().unwrap();
        assert_eq!(p.points(), 50);
        assert!(p.badges().contains("Temple Trail"));
    }

    #[tokio::test]
    async fn failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonStore::open(&path).await.unwrap();

        let result = store
            .update_profile("u", Box::new(|p| p.set_reputation(-1.0)))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Core(CoreError::InvalidReputation(_)))
        ));
        assert!(!path.exists());
        assert!(store.profile("u").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            JsonStore::open(&path).await,
            Err(StoreError::Json(_))
        ));
    }
}
