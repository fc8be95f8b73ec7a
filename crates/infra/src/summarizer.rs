//! HTTP adapter for the external summarization service.
//!
//! Speaks the generateContent wire shape: the prompt goes out as
//! `{"contents":[{"parts":[{"text":...}]}]}` with the API key as a query
//! parameter, and the analysis comes back under
//! `candidates[0].content.parts[0].text`. Request timeouts sit on the
//! client so one stuck upstream call cannot pin a handler.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use shopfloor_insight::{Summarizer, SummaryError};
use tracing::instrument;

/// Request timeout the owning application should put on the client it
/// hands to [`HttpSummarizer::new`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Instructional preamble prepended to every digest.
const PROMPT_PREAMBLE: &str = "You are an AI Logistics Manager for a retail inventory system.\n\
Analyze the following inventory and transaction data, then provide:\n\n\
1. **Key Insights**: What patterns do you see? (2-3 bullet points)\n\
2. **Urgent Actions**: What needs immediate attention? (1-2 items)\n\
3. **Optimization Tips**: How can they reduce waste and improve stock flow? (2-3 tips)\n\
4. **Predictions**: Based on current trends, what should they prepare for?\n\n\
Keep your response concise, actionable, and professional. Use bullet points.\n\n\
DATA:\n";

const PROMPT_SUFFIX: &str = "\n\nRespond in plain text format with clear sections.";

/// [`Summarizer`] implementation backed by an HTTP generateContent
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpSummarizer {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    #[instrument(skip(self, digest), fields(digest_bytes = digest.len()), err)]
    async fn summarize(&self, digest: &str) -> Result<String, SummaryError> {
        let prompt = format!("{PROMPT_PREAMBLE}{digest}{PROMPT_SUFFIX}");
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .client
            .post(format!("{}?key={}", self.endpoint, self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryError::Transport(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| SummaryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body: payload,
            });
        }

        extract_analysis(&payload)
    }
}

/// Pull the generated text out of a generateContent response body.
fn extract_analysis(payload: &str) -> Result<String, SummaryError> {
    let root: Value = serde_json::from_str(payload)
        .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

    root.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SummaryError::MalformedResponse(
                "no candidates[0].content.parts[0].text in response".to_string(),
            )
        })
}
