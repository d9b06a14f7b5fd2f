//! Per-user gamification state.

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::points::{ActionKind, BadgeSet, award};

/// Reputation assigned to users with no history.
pub const DEFAULT_REPUTATION: f64 = 50.0;

fn default_reputation() -> f64 {
    DEFAULT_REPUTATION
}

/// Points, reputation and badges for one user.
///
/// Points only grow through [`award`](Self::award); reputation is set from
/// outside but always stays within [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReputationProfile {
    user_id: String,
    #[serde(default)]
    points: u64,
    #[serde(default = "default_reputation")]
    reputation_score: f64,
    #[serde(default)]
    badges: BadgeSet,
}

impl UserReputationProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            points: 0,
            reputation_score: DEFAULT_REPUTATION,
            badges: BadgeSet::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn reputation_score(&self) -> f64 {
        self.reputation_score
    }

    pub fn badges(&self) -> &BadgeSet {
        &self.badges
    }

    /// Apply the point table for `action`, returning the new total.
    pub fn award(&mut self, action: ActionKind) -> u64 {
        self.points = award(self.points, action);
        self.points
    }

    /// Grant a badge. Returns `false` if the user already had it.
    pub fn grant_badge(&mut self, badge: impl Into<String>) -> bool {
        self.badges.insert(badge)
    }

    pub fn set_reputation(&mut self, score: f64) -> Result<(), CoreError> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(CoreError::InvalidReputation(score));
        }
        self.reputation_score = score;
        Ok(())
    }
}
