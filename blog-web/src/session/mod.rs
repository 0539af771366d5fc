//! Authentication session state machine and token lifecycle.
//!
//! [`SessionManager`] exclusively owns the client-local session. Views
//! receive a read-only [`Session`] projection and trigger transitions
//! through the operations below; the remote API and the durable store are
//! injected so both can be faked in tests.


pub mod error;
pub mod oauth;
pub mod store;

pub use error::AuthError;
pub use oauth::{OAuthLogin, ProviderCredential};
pub use store::{AUTH_TOKEN_KEY, MemorySessionStore, SessionStore, USER_KEY};

#[cfg(target_arch = "wasm32")]
pub use store::LocalSessionStore;

use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use blog_shared::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse, User};
use tracing::{debug, warn};

/// Remote authentication API consumed by the session manager.
///
/// Implemented by [`crate::api::BlogApiClient`]; tests substitute a
/// scripted fake. Futures are not `Send` on wasm, hence `?Send`.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Exchange email/password credentials for a session.
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError>;

    /// Create a new account. No session is issued; the email address must
    /// be verified first.
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, AuthError>;

    /// Invalidate the current session server-side.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Exchange a third-party provider credential for a session.
    async fn login_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<TokenResponse, AuthError>;

    /// Ask the server to send a password reset link.
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;
}

#[async_trait(?Send)]
impl<A: AuthApi + ?Sized> AuthApi for Rc<A> {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        (**self).login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, AuthError> {
        (**self).register(request).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        (**self).logout().await
    }

    async fn login_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<TokenResponse, AuthError> {
        (**self).login_provider(credential).await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        (**self).forgot_password(email).await
    }
}

/// Closed set of authentication states.
///
/// A user and token only ever exist together, so a half-authenticated
/// session is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No credentials held.
    Anonymous,
    /// A credential-acquiring operation is in flight.
    Authenticating,
    /// A user and bearer token are held.
    Authenticated {
        /// The authenticated user.
        user: User,
        /// The bearer token proving it.
        token: String,
    },
}

/// Read-only projection of the session handed to views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// The authenticated user, if any.
    pub user: Option<User>,
    /// The bearer token, if any.
    pub token: Option<String>,
    /// True iff a user and token are held.
    pub is_authenticated: bool,
    /// True while an authentication operation is in flight. Advisory only;
    /// overlapping operations resolve last-write-wins.
    pub is_loading: bool,
}

/// Owns the session state machine and mediates every credential-acquiring
/// operation.
///
/// Constructed once at process start; construction attempts an optimistic
/// restore from the durable store without contacting the server.
#[derive(Debug)]
pub struct SessionManager<A, S> {
    api: A,
    store: S,
    state: Mutex<SessionState>,
}

impl<A: AuthApi, S: SessionStore> SessionManager<A, S> {
    /// Create a manager, restoring a persisted session when one exists.
    ///
    /// Both the token and a parseable user record must be present to
    /// restore; a corrupted or half-present pair is cleared and the
    /// session starts anonymous.
    pub fn new(api: A, store: S) -> Self {
        let state = Mutex::new(restore(&store));
        Self { api, store, state }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        match &*self.lock() {
            SessionState::Anonymous => Session::default(),
            SessionState::Authenticating => Session {
                is_loading: true,
                ..Session::default()
            },
            SessionState::Authenticated { user, token } => Session {
                user: Some(user.clone()),
                token: Some(token.clone()),
                is_authenticated: true,
                is_loading: false,
            },
        }
    }

    /// Whether a user and token are currently held.
    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.lock(), SessionState::Authenticated { .. })
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        match &*self.lock() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    /// The current user, if any.
    pub fn current_user(&self) -> Option<User> {
        match &*self.lock() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    /// Authenticate with email and password.
    ///
    /// On failure the session returns to anonymous with persisted state
    /// cleared, and the error is handed back so the caller can
    /// distinguish [`AuthError::EmailNotVerified`] from
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.begin();
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        match self.api.login(&request).await {
            Ok(grant) => {
                self.commit(grant.user, grant.access_token);
                Ok(())
            }
            Err(err) => {
                self.fail();
                Err(err)
            }
        }
    }

    /// Register a new account.
    ///
    /// Always ends anonymous: email verification is required before the
    /// first login. Success carries the server's "check your email"
    /// message for the caller to display.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<MessageResponse, AuthError> {
        self.begin();
        let result = self.api.register(request).await;
        self.fail();
        result
    }

    /// End the session.
    ///
    /// Remote invalidation is best-effort; local and persisted state are
    /// cleared unconditionally, since the goal is to end the local session
    /// regardless of server reachability.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            debug!("remote logout failed, clearing local session anyway: {err}");
        }
        self.fail();
    }

    /// Sync an updated user record into the session and the store.
    ///
    /// Local-only: callers perform the remote profile update separately.
    /// Never changes authentication status, and is idempotent.
    pub fn update_user(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(err) => warn!("failed to serialize user record: {err}"),
        }
        let mut state = self.lock();
        if let SessionState::Authenticated { user: current, .. } = &mut *state {
            *current = user;
        }
    }

    /// Authenticate through a third-party provider credential. Same
    /// contract as [`SessionManager::login`].
    pub async fn login_with_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<(), AuthError> {
        self.begin();
        match self.api.login_provider(credential).await {
            Ok(grant) => {
                self.commit(grant.user, grant.access_token);
                Ok(())
            }
            Err(err) => {
                self.fail();
                Err(err)
            }
        }
    }

    /// Commit an externally obtained token and user pair, as used by the
    /// OAuth redirect flow. No network call is made; the exchange already
    /// happened server-side before the redirect.
    pub fn set_auth_from_token(&self, token: String, user: User) {
        self.commit(user, token);
    }

    /// Decode an OAuth redirect query and commit the session it carries.
    ///
    /// A malformed payload fails without touching persisted state; the
    /// redirect never entered an in-flight operation, so there is nothing
    /// to roll back.
    pub fn complete_oauth_callback(&self, query: &str) -> Result<OAuthLogin, AuthError> {
        let login = OAuthLogin::from_query(query)?;
        self.commit(login.user.clone(), login.token.clone());
        Ok(login)
    }

    /// Ask the server to send a password reset link.
    ///
    /// Fire-and-forget: the caller sees the same outcome whether or not
    /// the address is registered, so account existence is never revealed.
    pub async fn request_password_reset(&self, email: &str) {
        if let Err(err) = self.api.forgot_password(email).await {
            debug!("password reset request failed: {err}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        *self.lock() = SessionState::Authenticating;
    }

    fn commit(&self, user: User, token: String) {
        match serde_json::to_string(&user) {
            Ok(json) => {
                self.store.set(AUTH_TOKEN_KEY, &token);
                self.store.set(USER_KEY, &json);
            }
            Err(err) => warn!("failed to persist user record: {err}"),
        }
        *self.lock() = SessionState::Authenticated { user, token };
    }

    fn fail(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_KEY);
        *self.lock() = SessionState::Anonymous;
    }
}

fn restore<S: SessionStore>(store: &S) -> SessionState {
    match (store.get(AUTH_TOKEN_KEY), store.get(USER_KEY)) {
        (Some(token), Some(json)) => match decode_stored_user(&json) {
            Ok(user) => SessionState::Authenticated { user, token },
            Err(err) => {
                warn!("discarding corrupted persisted session: {err}");
                store.remove(AUTH_TOKEN_KEY);
                store.remove(USER_KEY);
                SessionState::Anonymous
            }
        },
        (None, None) => SessionState::Anonymous,
        // Token and user are written together; a half-present pair is
        // treated the same as a corrupted one.
        _ => {
            store.remove(AUTH_TOKEN_KEY);
            store.remove(USER_KEY);
            SessionState::Anonymous
        }
    }
}

fn decode_stored_user(json: &str) -> Result<User, AuthError> {
    serde_json::from_str(json).map_err(|err| AuthError::Decode(err.to_string()))
}
