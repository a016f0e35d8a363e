//! Client error types

use ivgk_editor::StoreError;
use reqwest::StatusCode;
use shared::ErrorCode;
use std::collections::BTreeMap;
use thiserror::Error;

pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection, timeout, TLS
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Form failed client-side validation; nothing was sent
    #[error("Validation failed: {} field(s)", fields.len())]
    Validation { fields: BTreeMap<String, String> },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session store could not be read or written
    #[error("Session store error: {0}")]
    Session(String),
}

impl ClientError {
    /// HTTP status when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Backend-provided message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Workspace error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api { status, .. } => StatusCode::from_u16(*status)
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::Unknown),
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(e) => e
                .status()
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::NetworkError),
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Session(_) => ErrorCode::SessionStoreError,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// One line suitable for a banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Validation { fields } => fields
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            _ if self.code() == ErrorCode::NotAuthenticated => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Backend message or the caller's fallback
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            fields: shared::forms::field_errors(&errors),
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => StoreError::Rejected { status, message },
            other => StoreError::Transport(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
