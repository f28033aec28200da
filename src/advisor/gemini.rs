use crate::advisor::NarrativeAdvisor;
use crate::config::AppConfig;
use crate::model::AdvisorError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<OutgoingPart<'a>>,
}

#[derive(Debug, Serialize)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Debug, Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini `generateContent` client.
pub struct GeminiAdvisor {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiAdvisor {
    pub fn new(config: &AppConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.genai_api_key.clone(),
        })
    }

    /// Endpoint without the key; the key goes in the query string.
    fn build_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, AdvisorError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(AdvisorError::EmptyResponse)?;
    if let Some(reason) = candidate.finish_reason.as_deref() {
        info!("Gemini finish reason: {}", reason);
    }
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AdvisorError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait::async_trait]
impl NarrativeAdvisor for GeminiAdvisor {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = self.build_url();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![OutgoingPart { text: prompt }],
            }],
        };
        info!("🤖 Sending prompt to {} ({} chars)", self.model, prompt.len());

        let response = match self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                warn!("❌ Gemini send() failed: {}", e);
                return Err(AdvisorError::ApiError(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("❌ Gemini API responded [{}]: {}", status, body);
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| e.without_url())?;
        let text = extract_text(parsed)?;
        info!("✅ Gemini analysis received ({} chars)", text.len());
        Ok(text)
    }
}
