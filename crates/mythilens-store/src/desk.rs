//! Contribution intake: gate at submission, manual review afterwards.

use std::sync::Arc;

use chrono::Utc;
use mythilens_core::{
    ActionKind, ContributionPayload, ContributionRecord, ContributionStatus, ModerationScores,
    ReviewOutcome,
};
use tracing::info;

use crate::StoreError;
use crate::backend::ContributionStore;

#[derive(Clone)]
pub struct ContributionDesk {
    store: Arc<dyn ContributionStore>,
}

impl ContributionDesk {
    pub fn new(store: Arc<dyn ContributionStore>) -> Self {
        Self { store }
    }

    /// Store a new contribution, settling its status from the submitter's
    /// reputation and the moderation scores, and award contribution points
    /// in the same commit.
    ///
    /// Points are paid for every submission, whether it was published or held.
    /// Scores outside the 0-10 scale are refused and nothing is stored.
    pub async fn submit(
        &self,
        submitter: &str,
        payload: ContributionPayload,
        scores: ModerationScores,
    ) -> Result<ContributionRecord, StoreError> {
        scores.validate()?;
        let (record, profile) = self
            .store
            .insert_contribution(
                submitter,
                Box::new(move |id, profile| {
                    let record = ContributionRecord::gated(
                        id,
                        submitter,
                        payload,
                        scores,
                        profile.reputation_score(),
                        Utc::now(),
                    )?;
                    profile.award(ActionKind::Contribution);
                    Ok(record)
                }),
            )
            .await?;
        info!(
            id = record.id,
            submitter,
            reputation = profile.reputation_score(),
            accuracy = record.accuracy_score,
            sentiment = record.sentiment_score,
            status = %record.status,
            points = profile.points(),
            "contribution submitted"
        );
        Ok(record)
    }

    /// Resolve a pending contribution by hand.
    pub async fn review(
        &self,
        id: u64,
        outcome: ReviewOutcome,
    ) -> Result<ContributionRecord, StoreError> {
        let record = self
            .store
            .update_contribution(
                id,
                Box::new(move |r| {
                    r.review(outcome)?;
                    Ok(())
                }),
            )
            .await?;
        info!(id, status = %record.status, "contribution reviewed");
        Ok(record)
    }

    pub async fn list(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionRecord>, StoreError> {
        self.store.contributions(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::Gamification;
    use crate::{JsonStore, MemoryStore, ProfileStore};
    use mythilens_core::CoreError;

    fn desk() -> (ContributionDesk, Gamification) {
        let store = Arc::new(MemoryStore::new());
        (ContributionDesk::new(store.clone()), Gamification::new(store))
    }

    fn payload(title: &str) -> ContributionPayload {
        ContributionPayload {
            kind: "heritage_site".into(),
            title: title.into(),
            description: "Rock-cut shrine above the village tank.".into(),
            location_name: None,
            location: None,
        }
    }

    fn scores(accuracy: f64, sentiment: f64, ai: bool) -> ModerationScores {
        ModerationScores::new(accuracy, sentiment, ai, None).unwrap()
    }

    fn unchecked(accuracy: f64, sentiment: f64) -> ModerationScores {
        ModerationScores {
            accuracy_score: accuracy,
            sentiment_score: sentiment,
            ai_recommends_approval: true,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn newcomer_without_model_approval_is_held() {
        let (desk, g) = desk();
        let r = desk.submit("new", payload("Shrine"), scores(9.0, 9.0, false)).await.unwrap();
        assert_eq!(r.status, ContributionStatus::Pending);
        assert_eq!(r.id, 1);
        assert_eq!(g.profile("new").await.unwrap().points(), 25);
    }

    #[tokio::test]
    async fn trusted_user_is_published() {
        let (desk, g) = desk();
        g.set_reputation("elder", 85.0).await.unwrap();
        let r = desk.submit("elder", payload("Shrine"), scores(9.0, 9.0, false)).await.unwrap();
        assert_eq!(r.status, ContributionStatus::Approved);
    }

    #[tokio::test]
    async fn ids_increase_and_lists_filter() {
        let (desk, _) = desk();
        let a = desk.submit("u", payload("A"), scores(9.0, 9.0, true)).await.unwrap();
        let b = desk.submit("u", payload("B"), scores(2.0, 9.0, true)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let pending = desk.list(Some(ContributionStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].payload.title, "B");
        assert_eq!(desk.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn review_resolves_pending_once() {
        let (desk, _) = desk();
        let r = desk.submit("u", payload("A"), scores(2.0, 9.0, true)).await.unwrap();
        let reviewed = desk.review(r.id, ReviewOutcome::Reject).await.unwrap();
        assert_eq!(reviewed.status, ContributionStatus::Rejected);

        let err = desk.review(r.id, ReviewOutcome::Approve).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidTransition { .. })
        ));
        let stored = desk.list(None).await.unwrap();
        assert_eq!(stored[0].status, ContributionStatus::Rejected);
    }

    #[tokio::test]
    async fn out_of_scale_scores_are_refused() {
        let (desk, g) = desk();
        for bad in [unchecked(42.0, 1e9), unchecked(f64::NAN, 8.0), unchecked(8.0, 10.5)] {
            let err = desk.submit("u", payload("A"), bad).await.unwrap_err();
            assert!(matches!(err, StoreError::Core(CoreError::InvalidScore { .. })));
        }
        assert!(desk.list(None).await.unwrap().is_empty());
        assert!(matches!(
            g.profile("u").await,
            Err(StoreError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn refused_scores_keep_json_store_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let desk = ContributionDesk::new(Arc::new(JsonStore::open(&path).await.unwrap()));
        desk.submit("u", payload("A"), scores(8.0, 8.0, true)).await.unwrap();
        assert!(desk.submit("u", payload("B"), unchecked(f64::NAN, 8.0)).await.is_err());

        let reopened = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.contributions(None).await.unwrap().len(), 1);
        assert_eq!(reopened.profile("u").await.unwrap().unwrap().points(), 25);
    }

    #[tokio::test]
    async fn failed_write_stores_neither_record_nor_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("state.json");
        let store = Arc::new(JsonStore::open(&path).await.unwrap());
        let desk = ContributionDesk::new(store.clone());

        let err = desk.submit("u", payload("A"), scores(9.0, 9.0, true)).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.contributions(None).await.unwrap().is_empty());
        assert!(store.profile("u").await.unwrap().is_none());
    }
}
