//! Shared types for the IVGK workspace
//!
//! API models, the error code taxonomy, response envelopes and client-side
//! form validation used by the client, editor, renderer and preview studio.

pub mod error;
pub mod forms;
pub mod models;
pub mod response;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
