//! Model providers.
//!
//! [`GraphModel`] is the seam between synthesis and the network. The
//! shipped implementation talks to any OpenAI-compatible chat-completions
//! endpoint that supports `json_schema` response formats.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{Result, SynthError};
use crate::schema::SCHEMA_NAME;

/// One schema-constrained completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    /// Credential for the provider; already checked for shape.
    pub credential: &'a str,

    /// Prompt text.
    pub prompt: &'a str,

    /// JSON Schema the reply must follow.
    pub schema: &'a Value,
}

/// A generative model that answers with schema-shaped JSON text.
#[async_trait]
pub trait GraphModel: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Run one completion and return the raw reply text.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

/// OpenAI-compatible chat-completions provider.
pub struct OpenAiChatModel {
    config: ModelConfig,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Create a provider from configuration.
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn request_body(&self, prompt: &str, schema: &Value) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": schema,
                    "strict": true
                }
            }
        });

        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }
}

#[async_trait]
impl GraphModel for OpenAiChatModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        debug!(
            "Requesting graph from model {} ({} prompt chars)",
            self.config.model,
            request.prompt.chars().count()
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", request.credential))
            .header("Content-Type", "application/json")
            .json(&self.request_body(request.prompt, request.schema))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &error_text));
        }

        let body = response.text().await?;
        let completion: ChatCompletion = serde_json::from_str(&body)
            .map_err(|e| SynthError::InvalidResponse(format!("unreadable envelope: {e}")))?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| SynthError::InvalidResponse("no choices in response".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(SynthError::InvalidResponse(format!("model refused: {refusal}")));
        }

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SynthError::InvalidResponse("empty completion".to_string()))?;

        info!("Received {} chars from model", content.len());
        Ok(content)
    }
}

/// Map a non-success reply to a typed error.
pub(crate) fn classify_failure(status: u16, body: &str) -> SynthError {
    let message = error_message(body);
    let lowered = message.to_lowercase();

    if status == 401
        || status == 403
        || lowered.contains("api key")
        || lowered.contains("api_key")
    {
        SynthError::InvalidCredential(message)
    } else if lowered.contains("response_format")
        || lowered.contains("json_schema")
        || lowered.contains("structured output")
    {
        SynthError::UnsupportedResponseFormat(message)
    } else {
        SynthError::Api { status, message }
    }
}

/// Pull `error.message` out of an OpenAI-style error body, or fall back to
/// the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_failure(401, r#"{"error": {"message": "Incorrect token"}}"#);
        assert!(matches!(err, SynthError::InvalidCredential(ref m) if m == "Incorrect token"));
    }

    #[test]
    fn test_classify_api_key_message() {
        let err = classify_failure(400, r#"{"error": {"message": "Invalid API key provided"}}"#);
        assert!(err.is_credential());
    }

    #[test]
    fn test_classify_response_format() {
        let err = classify_failure(
            400,
            r#"{"error": {"message": "Invalid parameter: 'response_format' of type 'json_schema' is not supported with this model."}}"#,
        );
        assert!(matches!(err, SynthError::UnsupportedResponseFormat(_)));
    }

    #[test]
    fn test_classify_other() {
        let err = classify_failure(500, "upstream exploded");
        match err {
            SynthError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_request_body() {
        let model = OpenAiChatModel::new(
            ModelConfig::default()
                .with_model("test-model")
                .with_temperature(0.5),
        )
        .unwrap();
        let schema = json!({"type": "object"});
        let body = model.request_body("hello", &schema);

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["schema"], schema);
        assert_eq!(body["temperature"], 0.5);
    }
}
