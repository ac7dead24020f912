//! Error types for the auth coordination layer

use thiserror::Error;

use crate::password::PasswordError;
use crate::provider::ProviderError;
use crate::userdb::UserError;

/// Everything register/login can fail with.
///
/// Unknown ids and wrong passwords both become [`AuthError::InvalidCredentials`].
#[derive(Error, Debug)]
pub enum AuthError {
    /// A required field was missing or blank
    #[error("{0}")]
    Validation(String),

    /// The normalized id is already registered
    #[error("User already exists")]
    Conflict,

    /// Unknown id or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credential store failure
    #[error("Database error: {0}")]
    Store(UserError),

    /// Chat provider upsert/query/token failure
    #[error("{message}: {source}")]
    Provider {
        message: &'static str,
        source: ProviderError,
    },

    /// Hashing or verification failure
    #[error("Password error: {0}")]
    Password(PasswordError),
}

impl AuthError {
    pub(crate) fn provider(message: &'static str, source: ProviderError) -> Self {
        let error = Self::Provider { message, source };
        tracing::error!("{}", error);
        error
    }

    /// The message shown to clients
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Conflict => "User already exists".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Store(_) => "Database error".to_string(),
            Self::Provider { message, .. } => message.to_string(),
            Self::Password(_) => "Password processing failed".to_string(),
        }
    }

    /// Diagnostic detail for server-side failures
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Store(err) => Some(err.to_string()),
            Self::Provider { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Provider { .. } | Self::Password(_)
        )
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::AlreadyExists(id) => {
                tracing::info!("Registration conflict for {}", id);
                Self::Conflict
            }
            err => {
                let error = Self::Store(err);
                tracing::error!("{}", error);
                error
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        let error = Self::Password(err);
        tracing::error!("{}", error);
        error
    }
}
