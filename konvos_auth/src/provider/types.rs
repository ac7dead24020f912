use async_trait::async_trait;

use crate::provider::errors::ProviderError;
use crate::userdb::{NormalizedId, PublicUser};

/// The external chat service that owns identities and mints bearer tokens.
///
/// Implementations must not retry; callers surface failures as-is.
#[async_trait]
pub trait ChatProvider: Send + Sync + 'static {
    /// Create or replace the provider's copy of a user profile.
    async fn upsert_user(&self, profile: &PublicUser) -> Result<(), ProviderError>;

    /// Mint a session token the client can connect with.
    async fn create_token(&self, user_id: &NormalizedId) -> Result<String, ProviderError>;

    /// Look up an identity known to the provider.
    async fn query_user(&self, user_id: &NormalizedId)
    -> Result<Option<PublicUser>, ProviderError>;
}
