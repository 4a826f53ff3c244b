//! Unified error types for the Search Console MCP Server.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token request failed with status {status}: {body}")]
    TokenRequestFailed { status: StatusCode, body: String },

    #[error("Token parse error: {0}")]
    TokenParse(String),

    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("No token available")]
    NoToken,

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("Google API error [{code}]: {message}")]
    Google {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// Caller input that fails an operation's declared shape or domain rules.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid dimension '{value}'. Valid dimensions: {}", .allowed.join(", "))]
    InvalidDimension {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid filter dimension '{value}'. Valid dimensions: {}", .allowed.join(", "))]
    InvalidFilterDimension {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid search_type '{value}'. Valid types: {}", .allowed.join(", "))]
    InvalidSearchType {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{field} is required")]
    MissingRequired { field: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Every way a single tool invocation can fail.
///
/// The dispatcher renders the `Display` text of this error into the
/// `{"error": ...}` payload of the response envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Backend(#[from] ApiError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}
