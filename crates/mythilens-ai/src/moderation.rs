//! Model-backed moderation of community contributions.

use std::sync::Arc;

use mythilens_core::ContributionPayload;
use tracing::{info, warn};

use crate::AiError;
use crate::client::{GenerateRequest, ModelClient};
use crate::prompts::{MODERATION_SYSTEM_PROMPT, moderation_prompt};
use crate::response::{ModerationVerdict, Recommendation, parse_verdict};

pub struct Moderator {
    client: Arc<dyn ModelClient>,
    max_tokens: u32,
}

impl Moderator {
    /// A verdict is one small JSON object.
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;

    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Score a submission. Fails if the model's reply is missing any score.
    pub async fn assess(
        &self,
        payload: &ContributionPayload,
    ) -> Result<ModerationVerdict, AiError> {
        let response = self
            .client
            .generate(GenerateRequest {
                system_prompt: Some(MODERATION_SYSTEM_PROMPT.to_string()),
                user_prompt: moderation_prompt(payload),
                max_tokens: self.max_tokens,
                temperature: 0.0,
            })
            .await?;

        let verdict = parse_verdict(&response.text).inspect_err(|e| {
            warn!(
                error = %e,
                raw = %response.text.chars().take(200).collect::<String>(),
                "moderation reply rejected"
            );
        })?;
        info!(
            title = %payload.title,
            accuracy = verdict.accuracy_score,
            sentiment = verdict.sentiment_score,
            approve = verdict.recommendation == Recommendation::Approve,
            tokens = response.tokens_used,
            "submission assessed"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    fn payload() -> ContributionPayload {
        ContributionPayload {
            kind: "story".into(),
            title: "Stepwell of Chand Baori".into(),
            description: "Thirteen storeys of symmetrical steps.".into(),
            location_name: Some("Abhaneri".into()),
            location: None,
        }
    }

    #[tokio::test]
    async fn assess_returns_validated_scores() {
        let model = Arc::new(ScriptedModel::new(
            r#"{"accuracy_score": 9, "sentiment_score": 8, "approval_recommendation": "reject"}"#,
        ));
        let verdict = Moderator::new(model.clone()).assess(&payload()).await.unwrap();
        assert_eq!(verdict.recommendation, Recommendation::Reject);
        assert!(!verdict.scores().ai_recommends_approval);

        let request = &model.requests()[0];
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, Moderator::DEFAULT_MAX_TOKENS);
        assert!(request.user_prompt.contains("Title: Stepwell of Chand Baori"));
    }

    #[tokio::test]
    async fn assess_refuses_incomplete_reply() {
        let model = Arc::new(ScriptedModel::new(r#"{"approval_recommendation": "approve"}"#));
        assert!(matches!(
            Moderator::new(model).assess(&payload()).await,
            Err(AiError::InvalidResponse(_))
        ));
    }
}
