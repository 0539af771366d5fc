pub mod auth;
pub mod errors;
pub mod user;

pub use auth::{
    ForgotPasswordRequest, GithubAuthRequest, GoogleAuthRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, TokenResponse,
};
pub use errors::ErrorResponse;
pub use user::{User, UserRole};
