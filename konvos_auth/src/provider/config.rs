//! Chat provider configuration

use std::{env, fmt, str::FromStr, sync::LazyLock};

use crate::provider::errors::ProviderError;

static CHAT_PROVIDER_TYPE: LazyLock<String> =
    LazyLock::new(|| env::var("CHAT_PROVIDER_TYPE").unwrap_or_else(|_| "stream".to_string()));

static STREAM_API_KEY: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty_var("STREAM_API_KEY"));

static STREAM_API_SECRET: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty_var("STREAM_API_SECRET"));

static STREAM_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("STREAM_BASE_URL").unwrap_or_else(|_| "https://chat.stream-io-api.com".to_string())
});

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Which [`ChatProvider`](super::ChatProvider) backs the auth service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProviderType {
    Stream,
    Memory,
}

impl ChatProviderType {
    /// Read `CHAT_PROVIDER_TYPE` (default `stream`)
    pub fn from_env() -> Result<Self, ProviderError> {
        CHAT_PROVIDER_TYPE.parse()
    }
}

impl FromStr for ChatProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "memory" => Ok(Self::Memory),
            t => Err(ProviderError::Unavailable(format!(
                "Unsupported chat provider type: {t}. Supported types are 'stream' and 'memory'"
            ))),
        }
    }
}

/// Credentials and endpoint for the Stream Chat server API.
///
/// Missing credentials are not an error until the first provider call.
#[derive(Clone)]
pub struct StreamConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
}

impl StreamConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: STREAM_API_KEY.clone(),
            api_secret: STREAM_API_SECRET.clone(),
            base_url: STREAM_BASE_URL.clone(),
        }
    }

    /// Both halves of the credential pair, or [`ProviderError::NotConfigured`]
    pub(super) fn credentials(&self) -> Result<(&str, &str), ProviderError> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) => Ok((key, secret)),
            _ => Err(ProviderError::NotConfigured),
        }
    }
}

impl fmt::Debug for StreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
