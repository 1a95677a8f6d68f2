mod client;
mod types;

pub use client::LlmClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::LlmResult;

/// A chat model that can answer with text or tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: ChatRequest) -> LlmResult<ChatResponse>;
}
