use serde::{Deserialize, Serialize};

use super::user::User;

/// Request to authenticate with email and password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// The user's email address.
    pub email: String,

    /// The user's password.
    pub password: String,
}

/// Request to register a new account.
///
/// Registration never issues a session; the email address must be verified
/// before the first login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RegisterRequest {
    /// The user's chosen display name.
    pub username: String,

    /// The user's email address.
    pub email: String,

    /// The user's password.
    pub password: String,

    /// The user's given name.
    #[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// The user's family name.
    #[serde(rename = "lastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Successful credential exchange: the issued bearer token and its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Opaque bearer token to attach to authenticated requests.
    pub access_token: String,

    /// The authenticated user.
    pub user: User,
}

/// Message-only response body used by endpoints that issue no session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable outcome description.
    pub message: String,
}

/// Request to start the password reset flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForgotPasswordRequest {
    /// The email address the reset link should be sent to.
    pub email: String,
}

/// Request to complete the password reset flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    /// Single-use reset token from the emailed link.
    pub token: String,

    /// The new password.
    pub password: String,
}

/// Google ID token to exchange for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleAuthRequest {
    /// The ID token issued by Google.
    pub token: String,
}

/// GitHub authorization code to exchange for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubAuthRequest {
    /// The authorization code issued by GitHub.
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serialization() {
        let request = LoginRequest {
            email: "jdoe@example.com".to_string(),
            password: "hunter2".to_string(),
        };

        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(
            serialized,
            r#"{"email":"jdoe@example.com","password":"hunter2"}"#
        );
    }

    #[test]
    fn test_register_request_optional_names() {
        let request = RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "hunter2".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
        };

        let serialized = serde_json::to_string(&request).unwrap();
        assert!(serialized.contains("\"firstName\":\"Jane\""));
        assert!(!serialized.contains("lastName"));
    }

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "abc.def.ghi",
            "user": {"id": 1, "username": "jdoe", "email": "jdoe@example.com"}
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.access_token, "abc.def.ghi");
        assert_eq!(response.user.username, "jdoe");
    }

    #[test]
    fn test_message_response_roundtrip() {
        let response = MessageResponse {
            message: "Registration successful! Please verify your email.".to_string(),
        };
        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: MessageResponse = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, response);
    }

    #[test]
    fn test_provider_request_bodies() {
        let google = serde_json::to_string(&GoogleAuthRequest {
            token: "id-token".to_string(),
        })
        .unwrap();
        assert_eq!(google, r#"{"token":"id-token"}"#);

        let github = serde_json::to_string(&GithubAuthRequest {
            code: "oauth-code".to_string(),
        })
        .unwrap();
        assert_eq!(github, r#"{"code":"oauth-code"}"#);
    }

    #[test]
    fn test_reset_password_request_serialization() {
        let request = ResetPasswordRequest {
            token: "reset-token".to_string(),
            password: "new-password".to_string(),
        };
        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(
            serialized,
            r#"{"token":"reset-token","password":"new-password"}"#
        );
    }
}
