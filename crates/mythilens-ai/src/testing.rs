use std::sync::Mutex;

use async_trait::async_trait;

use crate::AiError;
use crate::client::{GenerateRequest, GenerateResponse, ModelClient};

/// Replies with a fixed text and remembers every request it saw.
pub(crate) struct ScriptedModel {
    reply: String,
    seen: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        self.seen.lock().unwrap().push(request);
        Ok(GenerateResponse {
            text: self.reply.clone(),
            tokens_used: 42,
        })
    }
}
