//! Auto-publish gate for community contributions.
//!
//! Trusted contributors are published as soon as the objective quality scores
//! clear the bar; everyone else additionally needs the moderation model to
//! recommend approval. Nothing here ever rejects: rejection is a manual review
//! action (see [`ContributionRecord::review`](crate::ContributionRecord::review)).
//!
//! Scores are taken as given. Range validation (0-10 for accuracy and
//! sentiment, 0-100 for reputation) belongs to whoever produced them; feeding
//! unvalidated scores in here silently skews the outcome.

use serde::{Deserialize, Serialize};

/// Minimum accuracy and sentiment score for auto-publication.
pub const QUALITY_THRESHOLD: f64 = 7.0;
/// Reputation at which a contributor no longer needs the model's approval.
pub const TRUSTED_REPUTATION: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Pending,
    Approved,
}

/// Decide whether a contribution is published immediately or held for review.
pub fn decide(
    accuracy_score: f64,
    sentiment_score: f64,
    ai_recommends_approval: bool,
    reputation_score: f64,
) -> GateDecision {
    let quality_ok = accuracy_score >= QUALITY_THRESHOLD && sentiment_score >= QUALITY_THRESHOLD;
    let trusted = reputation_score >= TRUSTED_REPUTATION;

    if quality_ok && (trusted || ai_recommends_approval) {
        GateDecision::Approved
    } else {
        GateDecision::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_user_bypasses_model_opinion() {
        assert_eq!(decide(9.0, 9.0, false, 85.0), GateDecision::Approved);
    }

    #[test]
    fn untrusted_user_needs_model_approval() {
        assert_eq!(decide(9.0, 9.0, false, 50.0), GateDecision::Pending);
        assert_eq!(decide(9.0, 9.0, true, 50.0), GateDecision::Approved);
    }

    #[test]
    fn low_accuracy_blocks_trusted_user() {
        assert_eq!(decide(5.0, 9.0, true, 90.0), GateDecision::Pending);
    }

    #[test]
    fn low_sentiment_blocks_everyone() {
        assert_eq!(decide(9.0, 6.9, true, 100.0), GateDecision::Pending);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(decide(7.0, 7.0, false, 80.0), GateDecision::Approved);
        assert_eq!(decide(7.0, 7.0, true, 0.0), GateDecision::Approved);
        assert_eq!(decide(7.0, 7.0, false, 79.99), GateDecision::Pending);
    }

    #[test]
    fn nan_scores_never_approve() {
        assert_eq!(decide(f64::NAN, 9.0, true, 100.0), GateDecision::Pending);
    }
}
