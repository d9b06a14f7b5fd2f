//! HTTP client for an Anthropic-style messages endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AiError;
use crate::client::{GenerateRequest, GenerateResponse, ModelClient, ModelConfig};

const API_VERSION: &str = "2023-06-01";

pub struct HttpModelClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl HttpModelClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        }
    }
}

impl MessagesResponse {
    fn into_generate_response(self) -> GenerateResponse {
        let text = self
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");
        GenerateResponse {
            text,
            tokens_used: self.usage.input_tokens + self.usage.output_tokens,
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.user_prompt,
            }],
        };

        debug!(url = %url, model = %self.model, "sending generate request");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = resp.json().await?;
        let response = parsed.into_generate_response();
        info!(tokens = response.tokens_used, "generate complete");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let mut config = ModelConfig::new("key");
        config.base_url = "http://localhost:8080/".into();
        let client = HttpModelClient::new(config);
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn request_omits_missing_system_prompt() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            temperature: 0.0,
            system: None,
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn response_joins_text_blocks_and_sums_usage() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "{\"sites\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": " []}"}
            ],
            "usage": {"input_tokens": 120, "output_tokens": 30}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        let response = parsed.into_generate_response();
        assert_eq!(response.text, "{\"sites\": []}");
        assert_eq!(response.tokens_used, 150);
    }
}
