//! Model-backed site discovery, ranked locally.

use std::sync::Arc;

use mythilens_core::{Coordinate, DiscoveryConfig, RankedSite, Site, rank};
use tracing::info;

use crate::AiError;
use crate::client::{GenerateRequest, ModelClient};
use crate::prompts::{DISCOVERY_SYSTEM_PROMPT, Interest, discovery_prompt};
use crate::response::parse_sites;

pub struct Recommender {
    client: Arc<dyn ModelClient>,
    config: DiscoveryConfig,
    max_tokens: u32,
}

impl Recommender {
    /// Room for 10-20 described sites.
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    pub fn new(client: Arc<dyn ModelClient>, config: DiscoveryConfig) -> Self {
        Self {
            client,
            config,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask the model for candidates around `user` without ranking them.
    pub async fn suggest(
        &self,
        user: Coordinate,
        interests: &[Interest],
    ) -> Result<Vec<Site>, AiError> {
        let response = self
            .client
            .generate(GenerateRequest {
                system_prompt: Some(DISCOVERY_SYSTEM_PROMPT.to_string()),
                user_prompt: discovery_prompt(user, self.config.search_radius, interests),
                max_tokens: self.max_tokens,
                temperature: 0.3,
            })
            .await?;
        let sites = parse_sites(&response.text)?;
        info!(
            suggested = sites.len(),
            tokens = response.tokens_used,
            "discovery suggestions received"
        );
        Ok(sites)
    }

    /// Suggest and rank by proximity and popularity.
    pub async fn discover(
        &self,
        user: Coordinate,
        interests: &[Interest],
    ) -> Result<Vec<RankedSite>, AiError> {
        let sites = self.suggest(user, interests).await?;
        let ranked = rank(user, &sites, self.config.search_radius);
        info!(
            suggested = sites.len(),
            ranked = ranked.len(),
            radius_km = self.config.search_radius.km(),
            "discovery ranked"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use mythilens_core::SearchRadius;

    const REPLY: &str = r#"```json
{"sites": [
  {"name": "Lotus Mahal", "latitude": 15.318, "longitude": 76.472, "type": "palace", "popularity_score": 6},
  {"name": "Vittala Temple", "latitude": 15.342, "longitude": 76.475, "type": "temple", "popularity_score": 10},
  {"name": "Lost Shrine", "popularity_score": 9}
]}
```"#;

    fn user() -> Coordinate {
        Coordinate::new(15.335, 76.46).unwrap()
    }

    #[tokio::test]
    async fn discover_ranks_and_drops_unplaceable() {
        let model = Arc::new(ScriptedModel::new(REPLY));
        let recommender = Recommender::new(model.clone(), DiscoveryConfig::default());

        let ranked = recommender.discover(user(), &[]).await.unwrap();
        let names: Vec<_> = ranked.iter().map(|r| r.site.name.as_str()).collect();
        assert_eq!(names, vec!["Vittala Temple", "Lotus Mahal"]);

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user_prompt.contains("Search within: 10 km"));
        assert_eq!(requests[0].max_tokens, Recommender::DEFAULT_MAX_TOKENS);
    }

    #[tokio::test]
    async fn token_budget_can_be_lowered() {
        let model = Arc::new(ScriptedModel::new(r#"{"sites": []}"#));
        let recommender =
            Recommender::new(model.clone(), DiscoveryConfig::default()).with_max_tokens(512);
        recommender.suggest(user(), &[]).await.unwrap();
        assert_eq!(model.requests()[0].max_tokens, 512);
    }

    #[tokio::test]
    async fn radius_comes_from_config() {
        let model = Arc::new(ScriptedModel::new(r#"{"sites": []}"#));
        let config = DiscoveryConfig {
            search_radius: SearchRadius::new(25.0).unwrap(),
        };
        let recommender = Recommender::new(model.clone(), config);
        assert!(recommender.discover(user(), &[]).await.unwrap().is_empty());
        assert!(model.requests()[0].user_prompt.contains("Search within: 50 km"));
    }

    #[tokio::test]
    async fn invalid_reply_fails_the_call() {
        let model = Arc::new(ScriptedModel::new(r#"{"sites": [{"name": "X"}]}"#));
        let recommender = Recommender::new(model, DiscoveryConfig::default());
        assert!(matches!(
            recommender.discover(user(), &[]).await,
            Err(AiError::InvalidResponse(_))
        ));
    }
}
