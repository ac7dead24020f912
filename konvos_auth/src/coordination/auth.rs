use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::KONVOS_PROVIDER_SYNC_ON_LOGIN;
use crate::password::{hash_password, verify_password};
use crate::provider::ChatProvider;
use crate::userdb::{NormalizedId, PublicUser, UserError, UserRecord, UserStore};

use super::errors::AuthError;

const MISSING_FIELDS: &str = "Missing required fields";
const MISSING_CREDENTIALS: &str = "Missing credentials";

/// Body of `POST /api/register`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful register/login payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthOptions {
    /// Let login create a local record for an identity that only the chat provider knows
    pub provider_sync_on_login: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            provider_sync_on_login: *KONVOS_PROVIDER_SYNC_ON_LOGIN,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Register/login against the credential store, with the chat provider as
/// the token issuer.
///
/// Local writes and provider calls are two separate phases. When the
/// provider fails after a local insert, the record stays and the caller
/// gets a server error; nothing is rolled back.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    provider: Arc<dyn ChatProvider>,
    options: AuthOptions,
}

impl AuthService {
    pub fn new(users: UserStore, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            users,
            provider,
            options: AuthOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AuthOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> AuthOptions {
        self.options
    }

    /// Create a local account, publish its profile to the provider and mint a token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let (Some(id), Some(name), Some(password)) = (
            request.id.as_deref().and_then(NormalizedId::new),
            non_empty(request.name),
            non_empty(request.password),
        ) else {
            return Err(AuthError::Validation(MISSING_FIELDS.to_string()));
        };

        tracing::debug!(user_id = %id, "Registering user");

        // Early out only; the insert below is what actually decides uniqueness.
        if self.users.get_user(&id).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(password).await?;
        let record = self
            .users
            .insert_user(UserRecord::new(
                id.clone(),
                name,
                password_hash,
                non_empty(request.image),
            ))
            .await?;

        let user = record.to_public();
        let token = self
            .publish_and_issue(&id, &user, "Failed to create user in chat provider")
            .await
            .inspect_err(|_| {
                tracing::warn!(
                    user_id = %id,
                    "Local user created but chat provider sync failed; record kept"
                );
            })?;

        tracing::info!(user_id = %id, "User registered");
        Ok(AuthResponse { user, token })
    }

    /// Verify credentials and mint a token.
    ///
    /// A missing local record may be filled in from the provider's copy of the
    /// identity when [`AuthOptions::provider_sync_on_login`] is set.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let (Some(id), Some(password)) = (
            request.id.as_deref().and_then(NormalizedId::new),
            non_empty(request.password),
        ) else {
            return Err(AuthError::Validation(MISSING_CREDENTIALS.to_string()));
        };

        tracing::debug!(user_id = %id, "Login attempt");

        match self.users.get_user(&id).await? {
            Some(record) => self.login_existing(&id, record, password).await,
            None if self.options.provider_sync_on_login => {
                self.login_from_provider(&id, password).await
            }
            None => {
                tracing::info!(user_id = %id, "Login failed - unknown user");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn login_existing(
        &self,
        id: &NormalizedId,
        record: UserRecord,
        password: String,
    ) -> Result<AuthResponse, AuthError> {
        if !verify_password(password, record.password_hash.clone()).await? {
            tracing::info!(user_id = %id, "Login failed - password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let user = record.to_public();
        let token = self
            .publish_and_issue(id, &user, "Failed to generate token")
            .await?;

        tracing::info!(user_id = %id, "User logged in");
        Ok(AuthResponse { user, token })
    }

    /// First login of an account that was created directly with the provider
    async fn login_from_provider(
        &self,
        id: &NormalizedId,
        password: String,
    ) -> Result<AuthResponse, AuthError> {
        let Some(remote) = self
            .provider
            .query_user(id)
            .await
            .map_err(|e| AuthError::provider("Failed to look up user with chat provider", e))?
        else {
            tracing::info!(user_id = %id, "Login failed - unknown to store and provider");
            return Err(AuthError::InvalidCredentials);
        };

        let password_hash = hash_password(password.clone()).await?;
        let name = if remote.name.is_empty() {
            id.to_string()
        } else {
            remote.name
        };
        let record = UserRecord::new(
            id.clone(),
            name,
            password_hash,
            non_empty(Some(remote.image)),
        );

        let record = match self.users.insert_user(record).await {
            Ok(record) => record,
            Err(UserError::AlreadyExists(_)) => {
                // Someone registered this id while we were talking to the provider.
                let Some(winner) = self.users.get_user(id).await? else {
                    return Err(AuthError::InvalidCredentials);
                };
                return self.login_existing(id, winner, password).await;
            }
            Err(e) => return Err(e.into()),
        };

        let token = self
            .provider
            .create_token(id)
            .await
            .map_err(|e| AuthError::provider("Failed to generate token", e))?;

        tracing::info!(user_id = %id, "Local user created from chat provider identity");
        Ok(AuthResponse {
            user: record.to_public(),
            token,
        })
    }

    async fn publish_and_issue(
        &self,
        id: &NormalizedId,
        user: &PublicUser,
        failure_message: &'static str,
    ) -> Result<String, AuthError> {
        self.provider
            .upsert_user(user)
            .await
            .map_err(|e| AuthError::provider(failure_message, e))?;

        self.provider
            .create_token(id)
            .await
            .map_err(|e| AuthError::provider(failure_message, e))
    }
}
