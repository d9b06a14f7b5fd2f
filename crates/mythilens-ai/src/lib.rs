//! AI layer: prompts, strict validation of model replies, and the discovery
//! and moderation services built on an injected [`ModelClient`].

mod error;
pub use error::AiError;

pub mod client;
pub use client::{GenerateRequest, GenerateResponse, ModelClient, ModelConfig};

pub mod prompts;
pub use prompts::Interest;

pub mod response;
pub use response::{ModerationVerdict, Recommendation};

mod discovery;
pub use discovery::Recommender;

mod moderation;
pub use moderation::Moderator;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::HttpModelClient;

#[cfg(test)]
mod testing;
