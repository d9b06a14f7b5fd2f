//! Strict validation of model output.
//!
//! Model JSON is parsed into typed structs before anything downstream sees
//! it. Scores must be present, finite and within 0-10, and approval must be
//! exactly `approve` or `reject`; anything else fails the whole response
//! rather than defaulting. Missing coordinates are tolerated: the site is kept
//! but cannot be placed, and the ranker drops it.

pub use mythilens_core::contribution::{MAX_SCORE, MIN_SCORE};
use mythilens_core::{ModerationScores, Site};
use serde::Deserialize;

use crate::AiError;

/// Pull the JSON object out of a model reply that may be wrapped in a
/// markdown fence or surrounded by prose.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn check_score(field: &str, owner: &str, value: Option<f64>) -> Result<f64, AiError> {
    let value =
        value.ok_or_else(|| AiError::InvalidResponse(format!("{owner}: missing {field}")))?;
    if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(AiError::InvalidResponse(format!(
            "{owner}: {field} {value} outside [{MIN_SCORE}, {MAX_SCORE}]"
        )));
    }
    Ok(value)
}

// ── Discovery ──

#[derive(Debug, Deserialize)]
struct DiscoveryReply {
    #[serde(default)]
    sites: Vec<SiteSuggestion>,
}

#[derive(Debug, Deserialize)]
struct SiteSuggestion {
    name: Option<String>,
    description: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    popularity_score: Option<f64>,
    mythology_connection: Option<String>,
    recommended_reason: Option<String>,
}

/// Parse a discovery reply into candidate sites, in the order the model gave.
pub fn parse_sites(text: &str) -> Result<Vec<Site>, AiError> {
    let reply: DiscoveryReply = serde_json::from_str(extract_json(text))?;
    reply
        .sites
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let name = s
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| AiError::InvalidResponse(format!("site #{i}: missing name")))?;
            let popularity = check_score("popularity_score", &name, s.popularity_score)?;
            Ok(Site {
                id: format!("{i}-{}", slug(&name)),
                name,
                latitude: s.latitude,
                longitude: s.longitude,
                popularity,
                category: s.kind.unwrap_or_else(|| "heritage site".to_string()),
                description: s.description,
                mythology_connection: s.mythology_connection,
                recommended_reason: s.recommended_reason,
            })
        })
        .collect()
}

fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// ── Moderation ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
struct VerdictReply {
    accuracy_score: Option<f64>,
    sentiment_score: Option<f64>,
    approval_recommendation: Option<Recommendation>,
    feedback: Option<String>,
    sentiment_notes: Option<String>,
    improvements: Option<String>,
}

/// A validated moderation assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationVerdict {
    pub accuracy_score: f64,
    pub sentiment_score: f64,
    pub recommendation: Recommendation,
    pub feedback: Option<String>,
    pub sentiment_notes: Option<String>,
    pub improvements: Option<String>,
}

impl ModerationVerdict {
    pub fn scores(&self) -> ModerationScores {
        ModerationScores {
            accuracy_score: self.accuracy_score,
            sentiment_score: self.sentiment_score,
            ai_recommends_approval: self.recommendation == Recommendation::Approve,
            feedback: self.feedback.clone(),
        }
    }
}

pub fn parse_verdict(text: &str) -> Result<ModerationVerdict, AiError> {
    let reply: VerdictReply = serde_json::from_str(extract_json(text))?;
    Ok(ModerationVerdict {
        accuracy_score: check_score("accuracy_score", "verdict", reply.accuracy_score)?,
        sentiment_score: check_score("sentiment_score", "verdict", reply.sentiment_score)?,
        recommendation: reply.approval_recommendation.ok_or_else(|| {
            AiError::InvalidResponse("verdict: missing approval_recommendation".into())
        })?,
        feedback: reply.feedback,
        sentiment_notes: reply.sentiment_notes,
        improvements: reply.improvements,
    })
}
