//! HTTP client for the narrative analysis service
//!
//! Speaks the Anthropic Messages wire format. Requests are sent once;
//! errors are returned to the caller unchanged.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::prompt::{build_prompt, NarrativeRequest};
use crate::config::NarrativeConfig;
use crate::models::LogReport;

/// Messages API version header value
const API_VERSION: &str = "2023-06-01";

/// Errors that can occur while requesting a narrative
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("No API key configured (set `narrative.api_key` or ${0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned no text content")]
    EmptyResponse,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the external text-generation service
pub struct NarrativeClient {
    config: NarrativeConfig,
    client: Client,
    api_key: String,
}

impl NarrativeClient {
    /// Create a client, resolving the API key from config or environment
    pub fn new(config: NarrativeConfig) -> Result<Self, NarrativeError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| NarrativeError::MissingApiKey(config.api_key_env.clone()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(NarrativeClient {
            config,
            client,
            api_key,
        })
    }

    /// Request a markdown narrative for a report
    pub async fn analyze(&self, report: &LogReport) -> Result<String, NarrativeError> {
        self.complete(&build_prompt(report)).await
    }

    /// Send a prompt pair and return the generated markdown
    pub async fn complete(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        log::info!("Requesting narrative analysis from {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::warn!("Narrative service returned non-success status: {}", status);
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: error_message(&text),
            });
        }

        parse_response(&text)
    }
}

/// Concatenate the text blocks of a successful response
fn parse_response(body: &str) -> Result<String, NarrativeError> {
    let response: MessagesResponse = serde_json::from_str(body)?;

    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.trim().is_empty() {
        Err(NarrativeError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Service error message if the body carries one, otherwise the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_log;

    fn test_config(endpoint: &str) -> NarrativeConfig {
        NarrativeConfig {
            enabled: true,
            endpoint: endpoint.to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..NarrativeConfig::default()
        }
    }

    #[test]
    fn test_missing_api_key() {
        let config = NarrativeConfig {
            api_key: None,
            api_key_env: "HONEYPY_TEST_MISSING_KEY".to_string(),
            ..NarrativeConfig::default()
        };

        match NarrativeClient::new(config) {
            Err(NarrativeError::MissingApiKey(var)) => assert_eq!(var, "HONEYPY_TEST_MISSING_KEY"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("client should not be created without a key"),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = NarrativeRequest {
            system: "sys".to_string(),
            prompt: "metrics".to_string(),
        };
        let body = MessagesRequest {
            model: "model-x",
            max_tokens: 512,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "model-x");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "metrics");
    }

    #[test]
    fn test_parse_response_joins_text_blocks() {
        let body = r###"{
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "text", "text": "## Summary"},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "1. Block the sources"}
            ]
        }"###;

        assert_eq!(
            parse_response(body).unwrap(),
            "## Summary\n\n1. Block the sources"
        );
    }

    #[test]
    fn test_parse_response_empty() {
        let body = r#"{"content": []}"#;
        assert!(matches!(parse_response(body), Err(NarrativeError::EmptyResponse)));

        assert!(matches!(
            parse_response("not json"),
            Err(NarrativeError::Serialization(_))
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#;
        assert_eq!(error_message(body), "invalid x-api-key");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_surfaced() {
        // nothing listens on port 1
        let client = NarrativeClient::new(test_config("http://127.0.0.1:1/v1/messages")).unwrap();
        let report = analyze_log("10.0.0.1 $ ls", "cmd_audits.log");

        let result = client.analyze(&report).await;
        assert!(matches!(
            result,
            Err(NarrativeError::Http(_)) | Err(NarrativeError::Status { .. })
        ));

        // the analyzer is unaffected by the failed request
        assert_eq!(analyze_log("10.0.0.1 $ ls", "cmd_audits.log"), report);
    }
}
