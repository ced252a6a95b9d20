//! Chat-completion client — one non-streaming call per request.
//!
//! Provider request/response shapes:
//!   - Anthropic Messages API: key in `x-api-key` header, text in
//!     `content[i].text` where `content[i].type == "text"`
//!   - Gemini generateContent: key in URL query param, text in
//!     `candidates[0].content.parts[*].text`
//!
//! Every request is bounded by `REQUEST_TIMEOUT`. Failures are terminal;
//! the user re-triggers the action to try again.

use base64::Engine;
use std::future::Future;

use super::provider::{Provider, ANTHROPIC_URL, ANTHROPIC_VERSION, GEMINI_BASE_URL, REQUEST_TIMEOUT};
use crate::error::{GlintError, Result};

pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// One prompt pair, optionally with a PNG for visual tasks.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub image_png: Option<Vec<u8>>,
    pub max_tokens: u32,
    /// Ask the provider to enforce a JSON response where it can (Gemini).
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn text(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            image_png: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_output: true,
        }
    }

    pub fn with_image(mut self, png: Vec<u8>) -> Self {
        self.image_png = Some(png);
        self
    }

    pub fn plain_text_output(mut self) -> Self {
        self.json_output = false;
        self
    }
}

/// The seam between prompt logic and the network.
///
/// Returns the model's free-form text; callers extract JSON from it.
pub trait ModelClient: Send + Sync {
    fn complete(
        &self,
        provider: Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<T: ModelClient> ModelClient for std::sync::Arc<T> {
    fn complete(
        &self,
        provider: Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).complete(provider, api_key, request)
    }
}

/// `reqwest`-backed client for the cloud providers.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    http: reqwest::Client,
}

impl HttpModelClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    async fn complete_anthropic(&self, api_key: &str, request: &CompletionRequest) -> Result<String> {
        let content = match &request.image_png {
            Some(png) => serde_json::json!([
                {
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": "image/png",
                        "data": encode_png(png),
                    }
                },
                { "type": "text", "text": request.user }
            ]),
            None => serde_json::Value::String(request.user.clone()),
        };

        let resp = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": Provider::Anthropic.model(),
                "max_tokens": request.max_tokens,
                "system": request.system,
                "messages": [{ "role": "user", "content": content }]
            }))
            .send()
            .await?;

        let body = read_success_body(resp).await?;
        extract_anthropic_text(&body).ok_or_else(|| GlintError::MalformedResponse {
            reason: "no text block in Anthropic response".to_string(),
            raw: body.clone(),
            cleaned: String::new(),
        })
    }

    async fn complete_gemini(&self, api_key: &str, request: &CompletionRequest) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL,
            Provider::Gemini.model(),
            api_key
        );

        let mut parts = Vec::new();
        if let Some(png) = &request.image_png {
            parts.push(serde_json::json!({
                "inline_data": { "mime_type": "image/png", "data": encode_png(png) }
            }));
        }
        parts.push(serde_json::json!({ "text": request.user }));

        let mut generation_config = serde_json::json!({
            "maxOutputTokens": request.max_tokens,
            "temperature": 0.2,
        });
        if request.json_output {
            generation_config["responseMimeType"] = serde_json::json!("application/json");
        }

        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "contents": [{ "role": "user", "parts": parts }],
                "systemInstruction": { "parts": [{ "text": request.system }] },
                "generationConfig": generation_config,
            }))
            .send()
            .await?;

        let body = read_success_body(resp).await?;
        extract_gemini_text(&body).ok_or_else(|| GlintError::MalformedResponse {
            reason: "no candidate text in Gemini response".to_string(),
            raw: body.clone(),
            cleaned: String::new(),
        })
    }
}

impl ModelClient for HttpModelClient {
    fn complete(
        &self,
        provider: Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send {
        async move {
            log::info!("[LLM] Provider: {} ({})", provider, provider.model());
            let start = std::time::Instant::now();
            let text = match provider {
                Provider::Anthropic => self.complete_anthropic(api_key, request).await?,
                Provider::Gemini => self.complete_gemini(api_key, request).await?,
                Provider::Local => return Err(GlintError::UnsupportedProvider { provider }),
            };
            log::info!(
                "[LLM] Response in {}ms, {} chars",
                start.elapsed().as_millis(),
                text.len()
            );
            Ok(text)
        }
    }
}

fn encode_png(png: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(png)
}

/// Read the body, turning a non-2xx status into a transport error.
async fn read_success_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        log::error!("[LLM] API returned {}: {}", status, truncate(&body, 200));
        return Err(GlintError::Transport(format!(
            "API error ({}): {}",
            status,
            truncate(&body, 500)
        )));
    }
    Ok(body)
}

/// Truncate on a char boundary for log/error output.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Extract the first text block from an Anthropic Messages API response.
fn extract_anthropic_text(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let content = parsed.get("content")?.as_array()?;
    content
        .iter()
        .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        .and_then(|block| block.get("text")?.as_str().map(str::to_string))
}

/// Concatenate the text parts of Gemini's first candidate.
fn extract_gemini_text(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let parts = parsed
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
