//! Storage traits injected into the gamification and contribution services.

use async_trait::async_trait;
use mythilens_core::{ContributionRecord, ContributionStatus, CoreError, UserReputationProfile};

use crate::StoreError;

/// Mutation applied to a profile inside the store's critical section.
pub type ProfileUpdate<'a> =
    Box<dyn FnOnce(&mut UserReputationProfile) -> Result<(), CoreError> + Send + 'a>;

/// Mutation applied to a contribution inside the store's critical section.
pub type ContributionUpdate<'a> =
    Box<dyn FnOnce(&mut ContributionRecord) -> Result<(), CoreError> + Send + 'a>;

/// Builds a record from the id the store assigns to it and the submitter's
/// profile, which it may update in the same step.
pub type ContributionBuilder<'a> = Box<
    dyn FnOnce(u64, &mut UserReputationProfile) -> Result<ContributionRecord, CoreError>
        + Send
        + 'a,
>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<Option<UserReputationProfile>, StoreError>;

    /// Read-modify-write a profile as one atomic step, creating a default
    /// profile first if the user has none. Returns the profile as stored.
    ///
    /// If `update` fails nothing is written.
    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate<'_>,
    ) -> Result<UserReputationProfile, StoreError>;

    async fn profiles(&self) -> Result<Vec<UserReputationProfile>, StoreError>;
}

/// Contributions share a store with profiles so a submission and the
/// submitter's credit are committed together.
#[async_trait]
pub trait ContributionStore: ProfileStore {
    /// Assign the next id and store the record built for it, together with
    /// the submitter's profile as `build` left it.
    ///
    /// If `build` fails nothing is written.
    async fn insert_contribution(
        &self,
        submitter: &str,
        build: ContributionBuilder<'_>,
    ) -> Result<(ContributionRecord, UserReputationProfile), StoreError>;

    async fn update_contribution(
        &self,
        id: u64,
        update: ContributionUpdate<'_>,
    ) -> Result<ContributionRecord, StoreError>;

    /// All contributions in insertion order, optionally filtered by status.
    async fn contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionRecord>, StoreError>;
}
