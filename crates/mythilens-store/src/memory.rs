use async_trait::async_trait;
use mythilens_core::{ContributionRecord, ContributionStatus, UserReputationProfile};
use tokio::sync::Mutex;

use crate::StoreError;
use crate::backend::{
    ContributionBuilder, ContributionStore, ContributionUpdate, ProfileStore, ProfileUpdate,
};
use crate::snapshot::Snapshot;

/// Process-local store. Every operation holds one lock for its duration.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Snapshot::new()),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, user_id: &str) -> Result<Option<UserReputationProfile>, StoreError> {
        Ok(self.state.lock().await.profiles.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate<'_>,
    ) -> Result<UserReputationProfile, StoreError> {
        self.state.lock().await.update_profile(user_id, update)
    }

    async fn profiles(&self) -> Result<Vec<UserReputationProfile>, StoreError> {
        Ok(self.state.lock().await.profiles.values().cloned().collect())
    }
}

#[async_trait]
impl ContributionStore for MemoryStore {
    async fn insert_contribution(
        &self,
        submitter: &str,
        build: ContributionBuilder<'_>,
    ) -> Result<(ContributionRecord, UserReputationProfile), StoreError> {
        self.state.lock().await.insert_contribution(submitter, build)
    }

    async fn update_contribution(
        &self,
        id: u64,
        update: ContributionUpdate<'_>,
    ) -> Result<ContributionRecord, StoreError> {
        self.state.lock().await.update_contribution(id, update)
    }

    async fn contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionRecord>, StoreError> {
        Ok(self.state.lock().await.contributions(status))
    }
}
