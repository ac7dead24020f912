//! konvos_auth - Credential store and chat-provider token issuance for Konvos
//!
//! Users register and log in against a local credential table; on success the
//! configured chat provider (Stream Chat by default) receives the user's
//! profile and mints the token the web client connects with.

pub mod client;
mod config;
mod coordination;
mod password;
pub mod provider;
mod storage;
mod userdb;

#[cfg(test)]
mod test_utils;

pub use coordination::{
    AuthError, AuthOptions, AuthResponse, AuthService, LoginRequest, RegisterRequest,
};

pub use config::KONVOS_ROUTE_PREFIX;

pub use password::PasswordError;

pub use provider::{ChatProvider, ProviderError, provider_from_env};

pub use storage::{DataStore, DataStoreConfig, DataStoreType, StorageError, connect_data_store};

pub use userdb::{NormalizedId, PublicUser, UserError, UserRecord, UserStore};
