#![cfg_attr(not(test), forbid(unsafe_code))]

//! Browser-side client for the blog platform.
//!
//! The crate centers on [`session::SessionManager`], which owns the
//! authentication state machine and token lifecycle. [`api::BlogApiClient`]
//! talks to the remote authentication API, and the durable store behind the
//! session is injected through [`session::SessionStore`].

pub mod api;
pub mod config;
pub mod session;

pub use api::BlogApiClient;
pub use config::FrontendConfig;
pub use session::{
    AuthApi, AuthError, MemorySessionStore, OAuthLogin, ProviderCredential, Session,
    SessionManager, SessionState, SessionStore,
};
