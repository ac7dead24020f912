use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Chat provider credentials not configured")]
    NotConfigured,

    #[error("Chat provider request failed: {0}")]
    Request(String),

    #[error("Chat provider returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Token error: {0}")]
    Token(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Chat provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ProviderError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Token(err.to_string())
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> Self {
        Self::Request(format!("Invalid provider URL: {err}"))
    }
}
