use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Why a chat exchange produced no reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The assistant answered with a non-success status
    #[error("Server error {status}: {body}")]
    Http { status: u16, body: String },
    /// The request never completed
    #[error("Failed to reach the assistant: {0}")]
    Transport(String),
    /// Success status, but the body had no `response` string
    #[error("Unexpected response from the assistant: {0}")]
    Malformed(String),
}

impl ExchangeError {
    fn http(status: StatusCode, body: String) -> Self {
        ExchangeError::Http {
            status: status.as_u16(),
            body,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport(err.to_string())
    }
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    /// Send one message and return the assistant's raw reply text.
    pub async fn send(&self, message: &str) -> Result<String, ExchangeError> {
        let url = self.endpoint();
        tracing::debug!(%url, chars = message.chars().count(), "sending chat message");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::http(status, body));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::Malformed(e.to_string()))?;
        tracing::debug!(%status, chars = chat_response.response.chars().count(), "received reply");
        Ok(chat_response.response)
    }
}
