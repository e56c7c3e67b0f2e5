//! Generation collaborator: one blocking-per-query call to a local
//! Ollama-style `/api/generate` endpoint. The response body is
//! newline-delimited JSON; each line optionally carries a `response` text
//! fragment, and the answer is the fragments joined in stream order.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use codebook_core::error::{Error, Result};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/api/generate", base_url.trim_end_matches('/'));
        Ok(Self { http, endpoint, model: model.to_string(), timeout_secs: timeout.as_secs() })
    }

    /// One generation call. Timeouts, transport failures and non-200
    /// statuses map to their own error kinds; the caller renders each to a
    /// user-facing string.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(endpoint = %self.endpoint, model = %self.model, "generation request");
        let request = GenerateRequest { model: &self.model, prompt };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(Error::GenerationApi { status: status.as_u16(), body });
        }
        Ok(collect_stream_fragments(&body))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::GenerationTimeout(self.timeout_secs)
        } else {
            Error::GenerationConnection(e.to_string())
        }
    }
}

/// Join the `response` fragments of a newline-delimited JSON stream with
/// single spaces, in stream order. Lines that are not valid JSON, or valid
/// JSON without a string `response` field, are skipped silently.
pub fn collect_stream_fragments(body: &str) -> String {
    let mut fragments = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        if let Some(fragment) = value.get("response").and_then(|r| r.as_str()) {
            fragments.push(fragment.to_string());
        }
    }
    fragments.join(" ")
}

/// The instruction frame handed to the generation model: the retrieved text
/// and table context, then the user's query.
pub fn build_prompt(text_context: &str, table_context: &str, query: &str) -> String {
    format!(
        "I will provide you content. Please use that content only to answer my query. \
         Text: {text_context}, Table:{table_context} Query: {query}"
    )
}
