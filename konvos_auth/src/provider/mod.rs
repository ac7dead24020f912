mod config;
mod errors;
mod memory;
mod stream;
mod types;

use std::sync::Arc;

pub use config::{ChatProviderType, StreamConfig};
pub use errors::ProviderError;
pub use memory::InMemoryChatProvider;
pub use stream::StreamChatProvider;
pub use types::ChatProvider;

/// Build the provider selected by `CHAT_PROVIDER_TYPE`
pub fn provider_from_env() -> Result<Arc<dyn ChatProvider>, ProviderError> {
    let provider: Arc<dyn ChatProvider> = match ChatProviderType::from_env()? {
        ChatProviderType::Stream => Arc::new(StreamChatProvider::from_env()),
        ChatProviderType::Memory => {
            tracing::warn!("Using in-memory chat provider; tokens are not valid for Stream");
            Arc::new(InMemoryChatProvider::new())
        }
    };
    Ok(provider)
}
