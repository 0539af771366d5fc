//! HTTP client for the blog platform's authentication API.

use async_trait::async_trait;
use blog_shared::models::{
    ErrorResponse, ForgotPasswordRequest, GithubAuthRequest, GoogleAuthRequest, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest, TokenResponse, User,
};
use once_cell::unsync::OnceCell;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

use crate::config::FrontendConfig;
use crate::session::{AuthApi, AuthError, ProviderCredential};

/// Distinguished `403` message the server sends when the account's email
/// address has not been verified.
const EMAIL_NOT_VERIFIED_MESSAGE: &str = "Email not verified";

thread_local! {
    static SHARED_CLIENT: OnceCell<BlogApiClient> = OnceCell::new();
}

/// Lightweight API client for the blog platform's remote endpoints.
///
/// Holds the current bearer token and attaches it as `Authorization:
/// Bearer <token>` to authenticated requests. The token slot is populated
/// on successful login and cleared on logout; a restored session can seed
/// it through [`BlogApiClient::set_bearer_token`].
#[derive(Clone, Debug)]
pub struct BlogApiClient {
    base_url: String,
    client: Client,
    bearer_token: Arc<Mutex<Option<String>>>,
}

impl BlogApiClient {
    /// Create a new API client with the provided base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            bearer_token: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an API client whose bearer slot is seeded with an already
    /// issued token, as held by a session restored from durable storage.
    #[must_use]
    pub fn with_token(base_url: &str, token: &str) -> Self {
        let client = Self::new(base_url);
        client.set_bearer_token(Some(token.to_owned()));
        client
    }

    /// Process-wide client instance configured from [`FrontendConfig`].
    #[must_use]
    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| {
            cell.get_or_init(|| Self::new(FrontendConfig::default().api_base_url()))
                .clone()
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Replace the bearer token attached to authenticated requests.
    pub fn set_bearer_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.bearer_token.lock() {
            *guard = token;
        }
    }

    /// The bearer token currently attached to authenticated requests.
    #[must_use]
    pub fn current_bearer_token(&self) -> Option<String> {
        self.bearer_token
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.current_bearer_token() {
            request.bearer_auth(token)
        } else {
            request
        }
    }

    /// Retrieve the authenticated user's profile.
    pub async fn me(&self) -> Result<User, AuthError> {
        let response = self
            .apply_auth(self.client.get(self.api_url("auth/me")))
            .send()
            .await?;
        parse(response).await
    }

    /// Complete the password reset flow with an emailed token.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let response = self
            .client
            .post(self.api_url("auth/reset-password"))
            .json(request)
            .send()
            .await?;
        parse(response).await
    }
}

#[async_trait(?Send)]
impl AuthApi for BlogApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(self.api_url("auth/login"))
            .json(request)
            .send()
            .await?;
        let grant: TokenResponse = parse(response).await?;
        self.set_bearer_token(Some(grant.access_token.clone()));
        Ok(grant)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, AuthError> {
        let response = self
            .client
            .post(self.api_url("auth/register"))
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let response = self
            .apply_auth(self.client.post(self.api_url("auth/logout")))
            .send()
            .await?;
        self.set_bearer_token(None);
        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_failure(response).await)
        }
    }

    async fn login_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<TokenResponse, AuthError> {
        let response = match credential {
            ProviderCredential::Google { token } => {
                self.client
                    .post(self.api_url("auth/google"))
                    .json(&GoogleAuthRequest {
                        token: token.clone(),
                    })
                    .send()
                    .await?
            }
            ProviderCredential::Github { code } => {
                self.client
                    .post(self.api_url("auth/github"))
                    .json(&GithubAuthRequest { code: code.clone() })
                    .send()
                    .await?
            }
        };
        let grant: TokenResponse = parse(response).await?;
        self.set_bearer_token(Some(grant.access_token.clone()));
        Ok(grant)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.api_url("auth/forgot-password"))
            .json(&ForgotPasswordRequest {
                email: email.to_owned(),
            })
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_failure(response).await)
        }
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(classify_failure(response).await)
    }
}

async fn classify_failure(response: Response) -> AuthError {
    let status = response.status();
    let body = response.json::<ErrorResponse>().await.ok();
    classify(status, body.as_ref())
}

fn classify(status: StatusCode, body: Option<&ErrorResponse>) -> AuthError {
    match status {
        StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
        StatusCode::FORBIDDEN if body.is_some_and(|b| b.text() == EMAIL_NOT_VERIFIED_MESSAGE) => {
            AuthError::EmailNotVerified
        }
        status if status.is_client_error() => AuthError::Validation(
            body.map_or_else(|| status.to_string(), |b| b.text().to_owned()),
        ),
        status => AuthError::Network(
            body.map_or_else(|| status.to_string(), |b| b.text().to_owned()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_cleanly() {
        let client = BlogApiClient::new("http://localhost:5000/api/");
        assert_eq!(
            client.api_url("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            client.api_url("auth/login"),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn with_token_attaches_restored_token_to_requests() {
        use crate::session::{AUTH_TOKEN_KEY, MemorySessionStore, SessionStore, USER_KEY};

        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "persisted-token");
        store.set(
            USER_KEY,
            r#"{"id":1,"username":"jdoe","email":"jdoe@example.com"}"#,
        );

        let token = store.get(AUTH_TOKEN_KEY).unwrap();
        let client = BlogApiClient::with_token("http://localhost:5000/api", &token);
        assert_eq!(
            client.current_bearer_token().as_deref(),
            Some("persisted-token")
        );

        let request = client
            .apply_auth(client.client.get(client.api_url("auth/me")))
            .build()
            .unwrap();
        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer persisted-token");
    }

    #[test]
    fn bearer_token_roundtrip() {
        let client = BlogApiClient::new("http://localhost:5000/api");
        assert_eq!(client.current_bearer_token(), None);

        client.set_bearer_token(Some("tok".to_string()));
        assert_eq!(client.current_bearer_token().as_deref(), Some("tok"));

        client.set_bearer_token(None);
        assert_eq!(client.current_bearer_token(), None);
    }

    #[test]
    fn unauthorized_maps_to_invalid_credentials() {
        let body = ErrorResponse::new("Invalid credentials");
        let err = classify(StatusCode::UNAUTHORIZED, Some(&body));
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn forbidden_with_distinguished_message_maps_to_email_not_verified() {
        let body = ErrorResponse::new(EMAIL_NOT_VERIFIED_MESSAGE);
        let err = classify(StatusCode::FORBIDDEN, Some(&body));
        assert!(matches!(err, AuthError::EmailNotVerified));
    }

    #[test]
    fn forbidden_with_other_message_is_validation() {
        let body = ErrorResponse::new("Account suspended");
        let err = classify(StatusCode::FORBIDDEN, Some(&body));
        match err {
            AuthError::Validation(message) => assert_eq!(message, "Account suspended"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn message_field_also_triggers_email_not_verified() {
        let body = ErrorResponse {
            error: None,
            message: Some(EMAIL_NOT_VERIFIED_MESSAGE.to_string()),
            details: None,
        };
        let err = classify(StatusCode::FORBIDDEN, Some(&body));
        assert!(matches!(err, AuthError::EmailNotVerified));
    }

    #[test]
    fn server_errors_map_to_network_failure() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert!(matches!(err, AuthError::Network(_)));
    }

    #[test]
    fn client_errors_carry_server_message() {
        let body = ErrorResponse::new("Email already registered");
        let err = classify(StatusCode::BAD_REQUEST, Some(&body));
        match err {
            AuthError::Validation(message) => assert_eq!(message, "Email already registered"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
