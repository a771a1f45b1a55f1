use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{OutputSchema, StructuredGenerator};
use super::LlmError;
use crate::config::PipelineConfig;

/// Ollama HTTP client using schema-constrained chat completion.
pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: &str,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, LlmError> {
        Self::new(
            &config.ollama_url,
            &config.model,
            config.temperature,
            config.timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Names of the models the Ollama instance has pulled.
    pub fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    /// Fail early when the configured model has not been pulled.
    pub fn ensure_model_available(&self) -> Result<(), LlmError> {
        let models = self.list_models()?;
        if models.iter().any(|m| model_matches(m, &self.model)) {
            Ok(())
        } else {
            Err(LlmError::NoModelAvailable(self.model.clone()))
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }
}

/// `medgemma` matches `medgemma` and any tag of it (`medgemma:latest`), not
/// `medgemma2:4b`. A tagged name must match exactly.
fn model_matches(installed: &str, model: &str) -> bool {
    installed == model
        || installed
            .strip_prefix(model)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    format: &'a Value,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

/// Interpret the message content of a structured chat reply.
/// Blank or literal `null` content is the service declining to answer.
fn parse_content(content: &str) -> Result<Option<Value>, LlmError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
    Ok(match value {
        Value::Null => None,
        other => Some(other),
    })
}

impl StructuredGenerator for OllamaClient {
    fn generate(
        &self,
        system: &str,
        user: &str,
        schema: &OutputSchema,
    ) -> Result<Option<Value>, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            format: &schema.schema,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(
            model = %self.model,
            schema = schema.name,
            system_len = system.len(),
            user_len = user.len(),
            "Sending structured generation request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parse_content(&parsed.message.content)
    }
}

/// What a `MockGenerator` answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Value(Value),
    Null,
    /// Fails with `LlmError::HttpClient` carrying this message.
    Failure(String),
}

/// A prompt pair the mock was called with.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub schema_name: &'static str,
}

/// Mock generator for testing. Answers every call the same way and records
/// the prompts it was given.
pub struct MockGenerator {
    response: MockResponse,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(value: Value) -> Self {
        Self::new(MockResponse::Value(value))
    }

    pub fn null() -> Self {
        Self::new(MockResponse::Null)
    }

    pub fn failing(message: &str) -> Self {
        Self::new(MockResponse::Failure(message.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl StructuredGenerator for MockGenerator {
    fn generate(
        &self,
        system: &str,
        user: &str,
        schema: &OutputSchema,
    ) -> Result<Option<Value>, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.to_string(),
                user: user.to_string(),
                schema_name: schema.name,
            });
        }

        match &self.response {
            MockResponse::Value(value) => Ok(Some(value.clone())),
            MockResponse::Null => Ok(None),
            MockResponse::Failure(message) => Err(LlmError::HttpClient(message.clone())),
        }
    }
}
