//! Prompt templates for discovery and moderation.

use mythilens_core::{ContributionPayload, Coordinate, SearchRadius};

// ── Discovery ──

pub const DISCOVERY_SYSTEM_PROMPT: &str = "\
You recommend real, existing heritage sites (temples, monuments, forts, \
archaeological sites) to travellers.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"sites\": [
    {
      \"name\": \"official site name\",
      \"description\": \"one or two sentences of cultural or historical significance\",
      \"latitude\": decimal degrees,
      \"longitude\": decimal degrees,
      \"type\": \"temple\" | \"monument\" | \"fort\" | \"archaeological site\",
      \"popularity_score\": number from 1 to 10 reflecting significance,
      \"mythology_connection\": \"related myths or legends\" or null,
      \"recommended_reason\": \"why this site suits the traveller\"
    }
  ]
}

Give 10 to 20 varied sites. Only include places you are confident exist, with accurate coordinates.";

/// A site the user saved earlier, used to steer recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct Interest {
    pub title: String,
    pub kind: String,
}

/// Build the discovery prompt. The model is asked to search twice the
/// ranking radius so that popular sites just outside it can still compete.
pub fn discovery_prompt(user: Coordinate, radius: SearchRadius, interests: &[Interest]) -> String {
    let mut prompt = format!(
        "Location: {lat:.5}, {lng:.5}\n\
         Search within: {window} km\n",
        lat = user.lat(),
        lng = user.lng(),
        window = radius.km() * 2.0,
    );

    if !interests.is_empty() {
        prompt.push_str("\nPreviously saved sites:\n");
        for i in interests {
            prompt.push_str(&format!("- {} ({})\n", i.title, i.kind));
        }
        prompt.push_str(
            "\nFavour sites sharing architectural style, mythology or cultural themes with these.\n",
        );
    }

    prompt.push_str(
        "\nRank by proximity, popularity and cultural significance, \
         similarity to saved sites and mythological connections.",
    );
    prompt
}

// ── Moderation ──

pub const MODERATION_SYSTEM_PROMPT: &str = "\
You moderate community submissions to a heritage archive.

Assess the submission for historical accuracy, relevance to heritage and culture, \
quality of writing, and tone. Flag disrespectful, biased, inflammatory or culturally \
insensitive content.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"accuracy_score\": number from 0 to 10 (how accurate and verifiable),
  \"sentiment_score\": number from 0 to 10 (10 = fully respectful, 0 = offensive),
  \"approval_recommendation\": \"approve\" or \"reject\",
  \"feedback\": \"short explanation of the assessment\",
  \"sentiment_notes\": \"concerns about tone, bias or respect\" or null,
  \"improvements\": \"suggestions when either score is below 7\" or null
}";

pub fn moderation_prompt(payload: &ContributionPayload) -> String {
    format!(
        "Type: {kind}\n\
         Title: {title}\n\
         Location: {location}\n\
         \n\
         Description:\n\
         {description}",
        kind = payload.kind,
        title = payload.title,
        location = describe_location(payload),
        description = payload.description,
    )
}

fn describe_location(payload: &ContributionPayload) -> String {
    let name = payload.location_name.as_deref();
    match (name, payload.location) {
        (Some(name), Some(at)) => format!("{name} ({:.4}, {:.4})", at.lat(), at.lng()),
        (Some(name), None) => name.to_string(),
        (None, Some(at)) => format!("{:.4}, {:.4}", at.lat(), at.lng()),
        (None, None) => "not given".to_string(),
    }
}
