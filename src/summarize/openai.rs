//! OpenAI-compatible chat completion client

use super::{SummarizeError, Summarizer};
use crate::config::SummarizerConfig;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Prompt asking the model for a post-sized summary of a caption
pub fn summarize_prompt(caption: &str, max_length: usize) -> String {
    format!(
        "Summarize the following Instagram caption into a tweet of maximum {max_length} characters. \
         Preserve the key information and tone. Do not use hashtags unless they're crucial to the message.\n\n\
         INSTAGRAM CAPTION:\n{caption}\n\n\
         TWEET SUMMARY:"
    )
}

/// Summarizer calling `{base_url}/chat/completions`
pub struct LlmSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl LlmSummarizer {
    pub fn new(api_key: &str, config: &SummarizerConfig) -> Result<Self, SummarizeError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, SummarizeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| SummarizeError::InvalidApiKey)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, SummarizeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let prompt = summarize_prompt(text, max_length);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
            max_tokens: max_length,
        };

        tracing::debug!(model = %self.model, chars = text.chars().count(), "Requesting chat completion");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizeError::EmptyCompletion)
    }
}
