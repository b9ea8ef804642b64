// Type definitions and enums

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::models::ErrorResponse;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum LLMProvider {
    OpenAI,
    OpenRouter,
}

impl LLMProvider {
    /// Default chat-completions base URL for the provider
    pub fn default_api_base(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            other => Err(AppError::Internal(format!("Unsupported provider: {}", other))),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("LLM API error: {0}")]
    Generation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("{0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Extraction(_) | AppError::UnsupportedType(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Generation(_) | AppError::Render(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Server errors carry the underlying text
    /// only when `verbose` is set.
    pub fn client_message(&self, verbose: bool) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR if verbose => format!("An error occurred: {}", self),
            StatusCode::INTERNAL_SERVER_ERROR => "An error occurred while processing your file.".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn into_response_with(self, verbose: bool) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }
        let body = ErrorResponse {
            error: self.client_message(verbose),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(true)
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
