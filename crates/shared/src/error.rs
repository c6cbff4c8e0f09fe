use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Conflict,
    Internal,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Error body returned by the backend on non-success responses.
///
/// The backend is inconsistent about which fields it fills, so every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default, alias = "error")]
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parses an error body, returning `None` when it carries no message.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ApiError>(body)
            .ok()
            .filter(|err| !err.message.trim().is_empty())
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_from_either_field_name() {
        let err = ApiError::from_body(br#"{"message":"City not found"}"#).expect("error body");
        assert_eq!(err.message, "City not found");
        assert_eq!(err.code, ErrorCode::Unknown);

        let err = ApiError::from_body(br#"{"error":"duplicate pincode","code":"conflict"}"#)
            .expect("error body");
        assert_eq!(err.message, "duplicate pincode");
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn ignores_bodies_without_message() {
        assert!(ApiError::from_body(b"<html>502</html>").is_none());
        assert!(ApiError::from_body(br#"{"message":"  "}"#).is_none());
    }

    #[test]
    fn converts_into_displayable_exception() {
        let exception: ApiException = ApiError::new(ErrorCode::NotFound, "no such bus").into();
        assert_eq!(exception.to_string(), "NotFound: no such bus");
    }
}
