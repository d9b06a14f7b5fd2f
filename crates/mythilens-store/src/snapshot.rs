use std::collections::BTreeMap;

use mythilens_core::{ContributionRecord, ContributionStatus, UserReputationProfile};
use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::backend::{ContributionBuilder, ContributionUpdate, ProfileUpdate};

/// Whole-store state shared by the memory and JSON backends.
///
/// Mutators work on the snapshot they are called on; backends apply them to
/// a copy and swap it in once the change is durable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub profiles: BTreeMap<String, UserReputationProfile>,
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
    #[serde(default = "first_id")]
    pub next_contribution_id: u64,
}

fn first_id() -> u64 {
    1
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            next_contribution_id: first_id(),
            ..Default::default()
        }
    }

    fn profile_or_default(&self, user_id: &str) -> UserReputationProfile {
        self.profiles
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| UserReputationProfile::new(user_id))
    }

    pub fn update_profile(
        &mut self,
        user_id: &str,
        update: ProfileUpdate<'_>,
    ) -> Result<UserReputationProfile, StoreError> {
        let mut profile = self.profile_or_default(user_id);
        update(&mut profile)?;
        self.profiles.insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    pub fn insert_contribution(
        &mut self,
        submitter: &str,
        build: ContributionBuilder<'_>,
    ) -> Result<(ContributionRecord, UserReputationProfile), StoreError> {
        let id = self.next_contribution_id;
        let mut profile = self.profile_or_default(submitter);
        let mut record = build(id, &mut profile)?;
        record.id = id;
        self.next_contribution_id += 1;
        self.contributions.push(record.clone());
        self.profiles.insert(submitter.to_string(), profile.clone());
        Ok((record, profile))
    }

    pub fn update_contribution(
        &mut self,
        id: u64,
        update: ContributionUpdate<'_>,
    ) -> Result<ContributionRecord, StoreError> {
        let record = self
            .contributions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ContributionNotFound(id))?;
        let mut updated = record.clone();
        update(&mut updated)?;
        *record = updated.clone();
        Ok(updated)
    }

    pub fn contributions(&self, status: Option<ContributionStatus>) -> Vec<ContributionRecord> {
        self.contributions
            .iter()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect()
    }
}
