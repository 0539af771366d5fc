use serde::{Deserialize, Serialize};

/// Represents an error response from the API.
///
/// Depending on the endpoint the server reports failures under an `error`
/// or a `message` field; both are accepted and [`ErrorResponse::text`]
/// picks whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ErrorResponse {
    /// The main error message, when reported under `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The main error message, when reported under `message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Optional additional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with just a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
            details: None,
        }
    }

    /// Creates a new error response with message and details.
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
            details: Some(details.into()),
        }
    }

    /// The best human-readable message this response carries.
    #[must_use]
    pub fn text(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("request failed")
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.text(), details),
            None => write!(f, "{}", self.text()),
        }
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_is_preferred() {
        let error = ErrorResponse {
            error: Some("Invalid credentials".to_string()),
            message: Some("ignored".to_string()),
            details: None,
        };
        assert_eq!(error.text(), "Invalid credentials");
    }

    #[test]
    fn test_message_field_fallback() {
        let json = r#"{"message":"Email not verified"}"#;
        let error: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(error.text(), "Email not verified");
    }

    #[test]
    fn test_empty_body_has_placeholder_text() {
        let error = ErrorResponse::default();
        assert_eq!(error.text(), "request failed");
    }

    #[test]
    fn test_error_response_display() {
        let plain = ErrorResponse::new("Validation error");
        assert_eq!(format!("{plain}"), "Validation error");

        let detailed = ErrorResponse::with_details("Validation error", "email is required");
        assert_eq!(format!("{detailed}"), "Validation error: email is required");
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"error":"Email already registered"}"#;
        let error: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(error.error, Some("Email already registered".to_string()));
        assert_eq!(error.message, None);
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_error_response_as_error() {
        let error = ErrorResponse::new("boom");
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.to_string().contains("boom"));
    }
}
