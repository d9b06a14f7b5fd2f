//! Community contribution records and their review lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::gate::{GateDecision, decide};
use crate::geo::Coordinate;

/// Moderation scores live on a 0-10 scale.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GateDecision> for ContributionStatus {
    fn from(d: GateDecision) -> Self {
        match d {
            GateDecision::Pending => Self::Pending,
            GateDecision::Approved => Self::Approved,
        }
    }
}

/// Outcome of a manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approve,
    Reject,
}

/// What the user submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPayload {
    /// heritage_site, story, photo, correction, ...
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location_name: Option<String>,
    /// Where the contribution was made, if the contributor shared it.
    #[serde(default)]
    pub location: Option<Coordinate>,
}

/// Externally produced moderation scores for one submission.
///
/// Build through [`new`](Self::new) to have the scores range-checked; records
/// check them again when gated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationScores {
    pub accuracy_score: f64,
    pub sentiment_score: f64,
    pub ai_recommends_approval: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ModerationScores {
    pub fn new(
        accuracy_score: f64,
        sentiment_score: f64,
        ai_recommends_approval: bool,
        feedback: Option<String>,
    ) -> Result<Self, CoreError> {
        let scores = Self {
            accuracy_score,
            sentiment_score,
            ai_recommends_approval,
            feedback,
        };
        scores.validate()?;
        Ok(scores)
    }

    /// Both scores must be finite and within [`MIN_SCORE`, `MAX_SCORE`].
    pub fn validate(&self) -> Result<(), CoreError> {
        check_score("accuracy_score", self.accuracy_score)?;
        check_score("sentiment_score", self.sentiment_score)
    }
}

fn check_score(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidScore {
            field: field.to_string(),
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub id: u64,
    pub submitter: String,
    pub payload: ContributionPayload,
    pub accuracy_score: f64,
    pub sentiment_score: f64,
    pub status: ContributionStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContributionRecord {
    /// Create a record whose status is settled by the gate at creation time.
    ///
    /// Out-of-range scores are refused rather than stored.
    pub fn gated(
        id: u64,
        submitter: impl Into<String>,
        payload: ContributionPayload,
        scores: ModerationScores,
        reputation_score: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        scores.validate()?;
        let decision = decide(
            scores.accuracy_score,
            scores.sentiment_score,
            scores.ai_recommends_approval,
            reputation_score,
        );
        Ok(Self {
            id,
            submitter: submitter.into(),
            payload,
            accuracy_score: scores.accuracy_score,
            sentiment_score: scores.sentiment_score,
            status: decision.into(),
            feedback: scores.feedback,
            created_at,
        })
    }

    /// Resolve a pending record. Approved and rejected records are final.
    pub fn review(&mut self, outcome: ReviewOutcome) -> Result<ContributionStatus, CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                from: self.status.to_string(),
                action: "review".into(),
            });
        }
        self.status = match outcome {
            ReviewOutcome::Approve => ContributionStatus::Approved,
            ReviewOutcome::Reject => ContributionStatus::Rejected,
        };
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ContributionPayload {
        ContributionPayload {
            kind: "story".into(),
            title: "The Stepwell Legend".into(),
            description: "Local account of the stepwell's construction.".into(),
            location_name: Some("Abhaneri".into()),
            location: Some(Coordinate::new(27.007, 76.607).unwrap()),
        }
    }

    fn scores(accuracy: f64, sentiment: f64, ai: bool) -> ModerationScores {
        ModerationScores::new(accuracy, sentiment, ai, Some("Looks accurate.".into())).unwrap()
    }

    fn record(id: u64, scores: ModerationScores, reputation: f64) -> ContributionRecord {
        ContributionRecord::gated(id, "u", payload(), scores, reputation, Utc::now()).unwrap()
    }

    #[test]
    fn gated_record_takes_gate_decision() {
        let trusted = record(1, scores(9.0, 9.0, false), 85.0);
        assert_eq!(trusted.status, ContributionStatus::Approved);

        let newcomer = record(2, scores(9.0, 9.0, false), 50.0);
        assert_eq!(newcomer.status, ContributionStatus::Pending);
        assert_eq!(newcomer.feedback.as_deref(), Some("Looks accurate."));
    }

    #[test]
    fn scores_outside_the_scale_are_refused() {
        assert!(matches!(
            ModerationScores::new(f64::NAN, 8.0, true, None),
            Err(CoreError::InvalidScore { ref field, .. }) if field == "accuracy_score"
        ));
        assert_eq!(
            ModerationScores::new(8.0, 10.5, true, None),
            Err(CoreError::InvalidScore {
                field: "sentiment_score".into(),
                value: 10.5
            })
        );
        assert!(ModerationScores::new(-0.1, 5.0, false, None).is_err());
        assert!(ModerationScores::new(0.0, 10.0, false, None).is_ok());
    }

    #[test]
    fn gating_rechecks_hand_built_scores() {
        let raw = ModerationScores {
            accuracy_score: 42.0,
            sentiment_score: 1e9,
            ai_recommends_approval: true,
            feedback: None,
        };
        let err = ContributionRecord::gated(1, "u", payload(), raw, 90.0, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidScore { .. }));
    }

    #[test]
    fn payload_location_is_validated_on_load() {
        let json = r#"{"kind": "photo", "title": "t", "description": "d",
                       "location": {"lat": 95.0, "lng": 10.0}}"#;
        assert!(serde_json::from_str::<ContributionPayload>(json).is_err());

        let json = r#"{"kind": "photo", "title": "t", "description": "d"}"#;
        let p: ContributionPayload = serde_json::from_str(json).unwrap();
        assert!(p.location.is_none());
    }

    #[test]
    fn pending_can_be_reviewed_once() {
        let mut r = record(1, scores(3.0, 9.0, false), 50.0);
        assert_eq!(r.review(ReviewOutcome::Reject), Ok(ContributionStatus::Rejected));
        let err = r.review(ReviewOutcome::Approve).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: "rejected".into(),
                action: "review".into()
            }
        );
        assert_eq!(r.status, ContributionStatus::Rejected);
    }

    #[test]
    fn approved_is_terminal() {
        let mut r = record(1, scores(9.0, 9.0, true), 50.0);
        assert!(r.review(ReviewOutcome::Reject).is_err());
        assert_eq!(r.status, ContributionStatus::Approved);
    }
}
