//! Points, badges and reputation applied against a [`ProfileStore`].

use std::sync::Arc;

use mythilens_core::{
    ActionKind, LeaderboardEntry, PathProgress, StepReward, UserReputationProfile, leaderboard,
    rank_of,
};
use tracing::{info, warn};

use crate::StoreError;
use crate::backend::ProfileStore;

#[derive(Clone)]
pub struct Gamification {
    store: Arc<dyn ProfileStore>,
}

impl Gamification {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Award points for `action`, returning the user's new total.
    pub async fn award(&self, user_id: &str, action: ActionKind) -> Result<u64, StoreError> {
        let profile = self
            .store
            .update_profile(
                user_id,
                Box::new(move |p| {
                    p.award(action);
                    Ok(())
                }),
            )
            .await?;
        info!(user = user_id, %action, points = profile.points(), "points awarded");
        Ok(profile.points())
    }

    /// Award by action name. Unknown names are refused before touching the store.
    pub async fn award_named(&self, user_id: &str, action: &str) -> Result<u64, StoreError> {
        let action: ActionKind = action.parse()?;
        self.award(user_id, action).await
    }

    /// Grant a badge. Returns `false` if the user already held it.
    pub async fn grant_badge(&self, user_id: &str, badge: &str) -> Result<bool, StoreError> {
        let mut granted = false;
        self.store
            .update_profile(
                user_id,
                Box::new(|p| {
                    granted = p.grant_badge(badge);
                    Ok(())
                }),
            )
            .await?;
        if granted {
            info!(user = user_id, badge, "badge granted");
        } else {
            warn!(user = user_id, badge, "badge already held");
        }
        Ok(granted)
    }

    pub async fn set_reputation(&self, user_id: &str, score: f64) -> Result<(), StoreError> {
        self.store
            .update_profile(user_id, Box::new(move |p| p.set_reputation(score)))
            .await?;
        info!(user = user_id, score, "reputation updated");
        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserReputationProfile, StoreError> {
        self.store
            .profile(user_id)
            .await?
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }

    /// Reputation used for gating; users without a profile get the default.
    pub async fn reputation(&self, user_id: &str) -> Result<f64, StoreError> {
        Ok(self
            .store
            .profile(user_id)
            .await?
            .map(|p| p.reputation_score())
            .unwrap_or(mythilens_core::profile::DEFAULT_REPUTATION))
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let profiles = self.store.profiles().await?;
        Ok(leaderboard(&profiles, limit))
    }

    /// The user's 1-based place among all profiles, if they have one.
    pub async fn rank_of(&self, user_id: &str) -> Result<Option<usize>, StoreError> {
        let profiles = self.store.profiles().await?;
        Ok(rank_of(&profiles, user_id))
    }

    /// Record a quiz answer on `progress`, awarding points when correct.
    ///
    /// `progress` only changes once the award is stored.
    pub async fn answer_quiz(
        &self,
        progress: &mut PathProgress,
        correct: bool,
    ) -> Result<u64, StoreError> {
        let mut next = progress.clone();
        let points = match next.answer_quiz(correct, chrono::Utc::now())? {
            Some(action) => self.award(&next.user_id, action).await?,
            None => self.current_points(&next.user_id).await?,
        };
        *progress = next;
        Ok(points)
    }

    /// Finish the current step of `progress` and pay out its reward in one update.
    ///
    /// `progress` only changes once the reward is stored, so a failed write
    /// can be retried.
    pub async fn advance_path(
        &self,
        progress: &mut PathProgress,
    ) -> Result<StepReward, StoreError> {
        let mut next = progress.clone();
        let reward = next.advance(chrono::Utc::now())?;
        let action = reward.action;
        let badge = reward.badge.clone();
        let profile = self
            .store
            .update_profile(
                &next.user_id,
                Box::new(move |p| {
                    p.award(action);
                    if let Some(badge) = badge {
                        p.grant_badge(badge);
                    }
                    Ok(())
                }),
            )
            .await?;
        info!(
            user = %next.user_id,
            path = %next.path_id,
            step = next.current_step,
            completed = next.completed,
            points = profile.points(),
            "path step finished"
        );
        *progress = next;
        Ok(reward)
    }

    async fn current_points(&self, user_id: &str) -> Result<u64, StoreError> {
        Ok(self
            .store
            .profile(user_id)
            .await?
            .map(|p| p.points())
            .unwrap_or(0))
    }
}
