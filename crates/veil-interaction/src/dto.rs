//! Wire types of the steganography service.
//!
//! Every response field is optional: a missing field is reported as a
//! normalized failure by the gateway instead of a deserialization error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EncodeResponse {
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecodeResponse {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Error body, e.g. `{"detail": "Invalid credentials"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<ErrorDetail>,
}

/// `detail` is a plain string for handled errors and a list of
/// `{loc, msg, type}` objects for request validation errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    msg: String,
}

/// Extracts a user-facing message from an error response body.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let message = match parsed.detail? {
        ErrorDetail::Message(message) => message,
        ErrorDetail::Items(items) => items
            .into_iter()
            .map(|item| item.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };
    let message = message.trim().to_string();
    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        assert_eq!(
            error_detail(br#"{"detail":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
    }

    #[test]
    fn test_list_detail_is_joined() {
        let body = br#"{"detail":[{"loc":["body","message"],"msg":"field required","type":"missing"},{"msg":"too large"}]}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("field required; too large")
        );
    }

    #[test]
    fn test_unusable_bodies() {
        assert_eq!(error_detail(b"Internal Server Error"), None);
        assert_eq!(error_detail(b"{}"), None);
        assert_eq!(error_detail(br#"{"detail":"  "}"#), None);
        assert_eq!(error_detail(br#"{"detail":42}"#), None);
        assert_eq!(error_detail(b""), None);
    }

    #[test]
    fn test_decode_response_type_field() {
        let parsed: DecodeResponse =
            serde_json::from_str(r#"{"success":true,"type":"TEXT","message":"hello"}"#).unwrap();
        assert_eq!(parsed.kind.as_deref(), Some("TEXT"));
        assert_eq!(parsed.message.as_deref(), Some("hello"));
        assert!(parsed.download_url.is_none());
    }
}
