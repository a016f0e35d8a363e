//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::PlanLimitReached => StatusCode::PAYMENT_REQUIRED,
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedFileFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 503 Service Unavailable (transient errors)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError
            | Self::InvalidFormat
            | Self::RenderFailed
            | Self::SessionStoreError
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            Self::ValidationFailed | Self::InvalidRequest | Self::InvalidDataUrl => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Map an HTTP status returned by the backend onto the closest error code
    pub fn from_http_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => Self::ValidationFailed,
            401 => Self::NotAuthenticated,
            402 => Self::PlanLimitReached,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::AlreadyExists,
            413 => Self::FileTooLarge,
            415 => Self::UnsupportedFileFormat,
            408 | 504 => Self::TimeoutError,
            502 | 503 => Self::NetworkError,
            s if (200..300).contains(&s) => Self::Success,
            s if s >= 500 => Self::InternalError,
            _ => Self::Unknown,
        }
    }
}
