use std::time::Duration;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;

/// Client for OpenAI-compatible chat-completions endpoints
#[derive(Debug)]
pub struct ChatClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Endpoint base URL (e.g. `https://api.openai.com/v1`)
    endpoint: String,
    /// Model name sent with every request
    model: String,
    /// Generation temperature
    temperature: f32,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; the first one carries the translation
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Complete a chat request
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_url = format!(
            "{}/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Chat API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract the completion text from a response
    pub fn extract_text(response: &ChatResponse) -> Option<String> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl Provider for ChatClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        context: &str,
    ) -> Result<String, ProviderError> {
        let language_name = language_utils::display_name(target_language);

        let system_prompt = format!(
            "You are a professional translator specializing in technical documentation. \
             Translate content to {} while preserving all formatting, code, and links.",
            language_name
        );
        let user_prompt = format!(
            "Translate the following text to {}.\n{}\n\
             Preserve all markdown formatting, code blocks, links, and special characters exactly as they are.\n\
             Only translate the text content, not the markdown syntax or URLs.\n\n\
             Text to translate:\n{}",
            language_name, context, text
        );

        let request = ChatRequest::new(&self.model)
            .add_message("system", system_prompt)
            .add_message("user", user_prompt)
            .temperature(self.temperature);

        let response = self.complete(request).await?;
        Self::extract_text(&response).ok_or(ProviderError::EmptyResponse)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ChatRequest::new(&self.model).add_message("user", "Hello");
        self.complete(request).await?;
        Ok(())
    }
}
