//! Shared setup for unit tests that need a credential store and a provider

use std::sync::Arc;

use crate::coordination::AuthService;
use crate::provider::InMemoryChatProvider;
use crate::storage::{DataStoreConfig, connect_data_store};
use crate::userdb::UserStore;

/// Fresh in-memory SQLite credential store
pub(crate) async fn memory_user_store() -> UserStore {
    let data_store = connect_data_store(&DataStoreConfig::sqlite_in_memory())
        .await
        .expect("Failed to open in-memory database");
    UserStore::new(data_store)
        .await
        .expect("Failed to initialize UserStore")
}

/// Auth service over an in-memory store and provider, with provider sync on login enabled
pub(crate) async fn memory_service() -> (AuthService, Arc<InMemoryChatProvider>) {
    let provider = Arc::new(InMemoryChatProvider::new());
    let service = AuthService::new(memory_user_store().await, provider.clone()).with_options(
        crate::coordination::AuthOptions {
            provider_sync_on_login: true,
        },
    );
    (service, provider)
}
