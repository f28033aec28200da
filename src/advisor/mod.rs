pub mod gemini;

use crate::model::AdvisorError;

pub use gemini::GeminiAdvisor;

/// Turns an analyst prompt into narrative commentary.
#[async_trait::async_trait]
pub trait NarrativeAdvisor: Send + Sync {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisorError>;
}
