//! API Response types
//!
//! Envelopes returned by the IVGK backend. Success bodies are the resource
//! itself; list endpoints wrap items with offset pagination, and error
//! bodies carry an optional `message` (a string or a list of strings).

use serde::{Deserialize, Serialize};

/// Offset-paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub take: u64,
}

impl<T> ListResponse<T> {
    /// Number of pages at the current page size
    pub fn total_pages(&self) -> u64 {
        if self.take == 0 {
            0
        } else {
            self.total.div_ceil(self.take)
        }
    }

    /// 1-based page number of this slice
    pub fn page(&self) -> u64 {
        if self.take == 0 {
            1
        } else {
            self.skip / self.take + 1
        }
    }
}

/// `message` field of an error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    /// Flatten to one line; list entries are joined with ", "
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Single(s) => s,
            Self::Many(list) => list
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Error body as sent by the backend; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<ErrorMessage>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Extract the human-readable message from a raw error body, if any
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .and_then(ErrorMessage::into_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_paging() {
        let list = ListResponse::<u8> {
            items: vec![],
            total: 45,
            skip: 20,
            take: 10,
        };
        assert_eq!(list.total_pages(), 5);
        assert_eq!(list.page(), 3);
    }

    #[test]
    fn extracts_string_message() {
        assert_eq!(
            extract_error_message(r#"{"statusCode":409,"message":"Alias taken"}"#).as_deref(),
            Some("Alias taken")
        );
    }

    #[test]
    fn extracts_list_message() {
        assert_eq!(
            extract_error_message(r#"{"message":["email must be an email","password too short"]}"#)
                .as_deref(),
            Some("email must be an email, password too short")
        );
    }

    #[test]
    fn missing_or_malformed_message_is_none() {
        assert_eq!(extract_error_message(r#"{"error":"Bad Request"}"#), None);
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"message":"  "}"#), None);
    }
}
