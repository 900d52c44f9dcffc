use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebtoolsError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),
    #[error("template rendering failed: {0}")]
    Template(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl WebtoolsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::UnknownLayout(_) => ErrorCode::NotFound,
            Self::Template(_) | Self::Config(_) => ErrorCode::Internal,
        }
    }
}

impl From<WebtoolsError> for ApiError {
    fn from(value: WebtoolsError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
