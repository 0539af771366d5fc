use thiserror::Error;

/// Errors produced by the authentication subsystem.
///
/// Login-class failures are returned to the caller after the session has
/// already transitioned to its failure state, so UI code can match on the
/// kind for messaging without worrying about cleanup.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The remote collaborator was unreachable or returned an unusable
    /// response.
    #[error("network failure: {0}")]
    Network(String),

    /// The server rejected the supplied credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login was refused because the account's email address has not been
    /// verified yet. Callers should direct the user to re-verify instead
    /// of retrying.
    #[error("email not verified")]
    EmailNotVerified,

    /// The server rejected the request with a message, e.g. a failed
    /// registration.
    #[error("request rejected: {0}")]
    Validation(String),

    /// The OAuth redirect carried a payload that could not be decoded.
    #[error("malformed oauth callback: {0}")]
    MalformedCallback(String),

    /// Persisted session data could not be parsed.
    #[error("stored session data corrupted: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
