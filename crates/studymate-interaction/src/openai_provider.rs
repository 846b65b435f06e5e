//! OpenAiCompletionProvider - chat completions over an OpenAI-compatible REST API.
//!
//! Configuration comes from the `[completion]` table; the API key is read
//! from the environment variable it names (default `OPENAI_API_KEY`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studymate_core::config::CompletionConfig;
use studymate_core::error::{Result, StudyError};
use studymate_core::prompt::PromptBook;
use studymate_core::{CompletionProvider, Message, Subject};

/// Provider implementation that talks to an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiCompletionProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    prompts: PromptBook,
}

impl OpenAiCompletionProvider {
    /// Creates a provider for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudyError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(base_url),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            prompts: PromptBook::default(),
        })
    }

    /// Builds a provider from configuration, reading the API key from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key variable is unset or empty.
    pub fn from_config(config: &CompletionConfig, prompts: PromptBook) -> Result<Self> {
        Self::from_config_with(config, prompts, |key| std::env::var(key).ok())
    }

    fn from_config_with(
        config: &CompletionConfig,
        prompts: PromptBook,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_key = lookup(&config.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                StudyError::config(format!(
                    "{} is not set; export your API key to chat",
                    config.api_key_env
                ))
            })?;

        let mut provider = Self::new(
            &config.base_url,
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        provider.max_tokens = config.max_tokens;
        provider.prompts = prompts;
        Ok(provider)
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_request(&self, messages: &[Message]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().filter_map(to_chat_message).collect(),
            max_tokens: self.max_tokens,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        tracing::info!(
            "Sending {} messages to {} ({})",
            body.messages.len(),
            self.endpoint,
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| StudyError::Completion {
                message: format!("Completion request failed: {err}"),
                status_code: None,
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!("Completion API returned {}: {}", status, body_text);
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| StudyError::completion(format!("Failed to parse response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn send_chat(&self, messages: &[Message]) -> Result<String> {
        let request = self.build_request(messages);
        if request.messages.is_empty() {
            return Err(StudyError::completion("Nothing to send to the model"));
        }
        self.send_request(&request).await
    }

    async fn translate_text(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let messages = [
            Message::system(self.prompts.system_prompt(Some(&Subject::Translate))),
            Message::user(self.prompts.translate_request(text, from, to), None),
        ];
        self.send_chat(&messages).await
    }

    fn system_prompt(&self, subject: Option<&Subject>) -> String {
        self.prompts.system_prompt(subject)
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn to_chat_message(message: &Message) -> Option<ChatMessage> {
    if message.is_loading {
        return None;
    }
    let role = message.role.api_name()?;
    let mut content = Vec::new();

    if !message.content.trim().is_empty() {
        content.push(MessageContent::Text {
            text: message.content.clone(),
        });
    }
    if let Some(url) = &message.image_url {
        content.push(MessageContent::ImageUrl {
            image_url: ImageUrl { url: url.clone() },
        });
    }

    if content.is_empty() {
        return None;
    }
    Some(ChatMessage {
        role: role.to_string(),
        content,
    })
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| StudyError::completion("The model returned an empty reply"))
}

fn map_http_error(status: StatusCode, body: &str) -> StudyError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    StudyError::Completion {
        message,
        status_code: Some(status.as_u16()),
        is_retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use studymate_core::config::CompletionConfig;

    fn provider() -> OpenAiCompletionProvider {
        OpenAiCompletionProvider::new(
            "https://api.example.com/v1/",
            "sk-test",
            "gpt-test",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(provider().endpoint, "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![
            Message::date_marker("March 4, 2026"),
            Message::system("Be helpful"),
            Message::user("Solve this", Some("data:image/jpeg;base64,AAAA".to_string())),
            Message::placeholder(),
        ];
        let request = provider().with_max_tokens(256).build_request(&messages);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "gpt-test",
                "max_tokens": 256,
                "messages": [
                    {"role": "system", "content": [{"type": "text", "text": "Be helpful"}]},
                    {"role": "user", "content": [
                        {"type": "text", "text": "Solve this"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AAAA"}}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn test_image_only_message_keeps_image_part() {
        let message = Message::user("", Some("data:image/jpeg;base64,AAAA".to_string()));
        let chat = to_chat_message(&message).unwrap();
        assert_eq!(chat.content.len(), 1);
    }

    #[test]
    fn test_extract_text_response() {
        let parsed: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "x = 2"}}]
        }))
        .unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "x = 2");

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            extract_text_response(empty),
            Err(StudyError::Completion { .. })
        ));
    }

    #[test]
    fn test_map_http_error_reads_error_body() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#,
        );
        assert_eq!(
            err,
            StudyError::Completion {
                message: "Rate limit reached".to_string(),
                status_code: Some(429),
                is_retryable: true,
            }
        );

        let err = map_http_error(StatusCode::BAD_REQUEST, "plain failure");
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "plain failure");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = CompletionConfig::default();
        let err = OpenAiCompletionProvider::from_config_with(&config, PromptBook::default(), |_| None)
            .err()
            .unwrap();
        assert!(matches!(err, StudyError::Config(_)));

        let provider = OpenAiCompletionProvider::from_config_with(
            &CompletionConfig {
                max_tokens: Some(64),
                ..CompletionConfig::default()
            },
            PromptBook::default(),
            |key| (key == "OPENAI_API_KEY").then(|| "sk-live".to_string()),
        )
        .unwrap();
        assert_eq!(provider.api_key, "sk-live");
        assert_eq!(provider.max_tokens, Some(64));
    }

    #[test]
    fn test_system_prompt_uses_configured_book() {
        let book = PromptBook {
            default_system: "custom".to_string(),
            ..PromptBook::default()
        };
        let provider = OpenAiCompletionProvider::from_config_with(
            &CompletionConfig::default(),
            book,
            |_| Some("sk".to_string()),
        )
        .unwrap();
        assert_eq!(provider.system_prompt(None), "custom");
    }
}
