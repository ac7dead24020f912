use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use ring::rand::{SecureRandom, SystemRandom};
use tokio::sync::Mutex;

use crate::provider::{errors::ProviderError, types::ChatProvider};
use crate::userdb::{NormalizedId, PublicUser};

/// Process-local [`ChatProvider`] for development and tests.
///
/// Tokens are random and only meaningful to this instance. Failures can be
/// switched on to exercise the error paths of the auth service.
#[derive(Default)]
pub struct InMemoryChatProvider {
    users: Mutex<HashMap<String, PublicUser>>,
    fail_upserts: AtomicBool,
    fail_tokens: AtomicBool,
    fail_queries: AtomicBool,
    upsert_calls: AtomicUsize,
    token_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl InMemoryChatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity as if it had been created directly with the provider
    pub async fn seed_user(&self, profile: PublicUser) {
        self.users.lock().await.insert(profile.id.clone(), profile);
    }

    pub async fn get_user(&self, id: &str) -> Option<PublicUser> {
        self.users.lock().await.get(id).cloned()
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_tokens(&self, fail: bool) {
        self.fail_tokens.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Total number of calls made to the provider
    pub fn total_calls(&self) -> usize {
        self.upsert_calls() + self.token_calls() + self.query_calls()
    }
}

fn random_hex(len: usize) -> Result<String, ProviderError> {
    let mut bytes = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| ProviderError::Token("Failed to generate random token".to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

#[async_trait]
impl ChatProvider for InMemoryChatProvider {
    async fn upsert_user(&self, profile: &PublicUser) -> Result<(), ProviderError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("upsert rejected".to_string()));
        }

        self.users
            .lock()
            .await
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn create_token(&self, user_id: &NormalizedId) -> Result<String, ProviderError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tokens.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("token minting rejected".to_string()));
        }

        Ok(format!("memory.{}.{}", user_id, random_hex(16)?))
    }

    async fn query_user(
        &self,
        user_id: &NormalizedId,
    ) -> Result<Option<PublicUser>, ProviderError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("query rejected".to_string()));
        }

        Ok(self.get_user(user_id.as_str()).await)
    }
}
