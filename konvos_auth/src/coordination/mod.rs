mod auth;
mod errors;

pub use auth::{AuthOptions, AuthResponse, AuthService, LoginRequest, RegisterRequest};
pub use errors::AuthError;
