mod google;
mod prompt;

pub use google::GeminiProvider;
pub use prompt::{build_prompt, dietary_constraints};

use crate::error::AnalysisError;
use async_trait::async_trait;

/// A generative model that turns a prompt into text
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send one prompt and return the generated text.
    ///
    /// Implementations issue exactly one request and never retry.
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}
