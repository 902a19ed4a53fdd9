use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why an extraction failed: a required field was missing from the page,
/// or the page itself could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    MissingField,
    Transport,
}

impl fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionKind::MissingField => write!(f, "missing field"),
            ExtractionKind::Transport => write!(f, "transport"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("extraction failed ({kind}): {message}")]
    Extraction {
        kind: ExtractionKind,
        message: String,
    },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("marketplace not initialized at {0}")]
    NotInitialized(PathBuf),

    #[error("marketplace already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn missing_field(message: impl Into<String>) -> Self {
        ConvertError::Extraction {
            kind: ExtractionKind::MissingField,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ConvertError::Extraction {
            kind: ExtractionKind::Transport,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedUrl(_) => StatusCode::BAD_REQUEST,
            Self::PluginNotFound(_) | Self::NotInitialized(_) => StatusCode::NOT_FOUND,
            Self::AlreadyInitialized(_) => StatusCode::CONFLICT,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::Extraction {
                kind: ExtractionKind::Transport,
                ..
            } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl(_) => "UNSUPPORTED_URL",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::NotInitialized(_) => "NOT_INITIALIZED",
            Self::AlreadyInitialized(_) => "ALREADY_INITIALIZED",
            Self::PluginNotFound(_) => "PLUGIN_NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.error_code(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ConvertError::UnsupportedUrl("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ConvertError::PluginNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ConvertError::AlreadyInitialized(PathBuf::from("/tmp")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ConvertError::transport("timeout").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ConvertError::missing_field("name").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ConvertError::NotInitialized(PathBuf::from(".")).error_code(),
            "NOT_INITIALIZED"
        );
        assert_eq!(
            ConvertError::missing_field("name").error_code(),
            "EXTRACTION_ERROR"
        );
    }
}
