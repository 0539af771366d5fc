//! OAuth redirect-callback payload decoding.
//!
//! After a third-party provider authenticates the user, the server
//! redirects back to the client with the result encoded in the URL query:
//! `token`, `provider`, and `user` (base64-encoded JSON), or `message`
//! when the provider flow failed. The payload is attacker-reachable, so
//! decoding is defensive throughout; a malformed payload is an error, not
//! a panic.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use blog_shared::models::User;

use super::error::AuthError;

/// Credential obtained from a third-party identity provider, to be
/// exchanged for a session through the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCredential {
    /// Google ID token.
    Google {
        /// The ID token issued by Google.
        token: String,
    },
    /// GitHub authorization code.
    Github {
        /// The authorization code issued by GitHub.
        code: String,
    },
}

/// Decoded OAuth redirect payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthLogin {
    /// The bearer token issued server-side before the redirect.
    pub token: String,

    /// The authenticated user.
    pub user: User,

    /// Name of the provider that authenticated the user, for UI messaging.
    pub provider: String,
}

impl OAuthLogin {
    /// Decode the query string delivered by the OAuth redirect.
    ///
    /// Accepts a bare query string, optionally prefixed with `?`, or a full
    /// URL. A `message` parameter is a server-reported provider failure and
    /// surfaces as [`AuthError::Validation`]; anything undecodable is
    /// [`AuthError::MalformedCallback`].
    pub fn from_query(query: &str) -> Result<Self, AuthError> {
        let query = query.rsplit_once('?').map_or(query, |(_, rest)| rest);
        let query = query.split_once('#').map_or(query, |(head, _)| head);

        let mut token = None;
        let mut provider = None;
        let mut user_encoded = None;
        let mut message = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "provider" => provider = Some(value.into_owned()),
                "user" => user_encoded = Some(value.into_owned()),
                "message" => message = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(message) = message {
            return Err(AuthError::Validation(message));
        }

        let (Some(token), Some(user_encoded)) = (token, user_encoded) else {
            return Err(AuthError::MalformedCallback(
                "missing token or user parameter".to_string(),
            ));
        };

        let user = decode_user(&user_encoded)?;

        Ok(Self {
            token,
            user,
            provider: provider.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

fn decode_user(encoded: &str) -> Result<User, AuthError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| AuthError::MalformedCallback(format!("invalid base64: {err}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|err| AuthError::MalformedCallback(format!("invalid utf-8: {err}")))?;
    serde_json::from_str(&json)
        .map_err(|err| AuthError::MalformedCallback(format!("invalid user json: {err}")))
}
