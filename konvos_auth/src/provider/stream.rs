//! Stream Chat server-side client: token signing and user upsert/query

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::provider::{config::StreamConfig, errors::ProviderError, types::ChatProvider};
use crate::userdb::{NormalizedId, PublicUser};

/// Claims of a user token, the same shape the provider's server SDKs produce
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UserTokenClaims {
    pub(crate) user_id: String,
}

/// Claims of the server-side token that authorizes REST calls
#[derive(Debug, Serialize, Deserialize)]
struct ServerTokenClaims {
    server: bool,
}

#[derive(Debug, Deserialize)]
struct QueryUsersResponse {
    #[serde(default)]
    users: Vec<StreamUser>,
}

#[derive(Debug, Deserialize)]
struct StreamUser {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<StreamUser> for PublicUser {
    fn from(user: StreamUser) -> Self {
        let name = user
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| user.id.clone());
        Self {
            id: user.id,
            name,
            image: user.image.unwrap_or_default(),
        }
    }
}

/// [`ChatProvider`] backed by the Stream Chat REST API
#[derive(Debug, Clone)]
pub struct StreamChatProvider {
    config: StreamConfig,
    client: reqwest::Client,
}

impl StreamChatProvider {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            client: get_client(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(StreamConfig::from_env())
    }

    fn users_url(&self) -> Result<Url, ProviderError> {
        let base = if self.config.base_url.ends_with('/') {
            self.config.base_url.clone()
        } else {
            format!("{}/", self.config.base_url)
        };
        Ok(Url::parse(&base)?.join("users")?)
    }

    fn server_token(secret: &str) -> Result<String, ProviderError> {
        Ok(encode(
            &Header::default(),
            &ServerTokenClaims { server: true },
            &EncodingKey::from_secret(secret.as_bytes()),
        )?)
    }
}

fn get_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default reqwest client: {}", e);
            reqwest::Client::new()
        })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Stream error response: {} {}", status, body);
    Err(ProviderError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatProvider for StreamChatProvider {
    #[tracing::instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn upsert_user(&self, profile: &PublicUser) -> Result<(), ProviderError> {
        let (api_key, api_secret) = self.config.credentials()?;

        let mut users = serde_json::Map::new();
        users.insert(
            profile.id.clone(),
            json!({
                "id": profile.id,
                "name": profile.name,
                "image": profile.image,
            }),
        );
        let body = json!({ "users": users });

        let response = self
            .client
            .post(self.users_url()?)
            .query(&[("api_key", api_key)])
            .header(AUTHORIZATION, Self::server_token(api_secret)?)
            .header("stream-auth-type", "jwt")
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        tracing::debug!("Upserted user with Stream");
        Ok(())
    }

    async fn create_token(&self, user_id: &NormalizedId) -> Result<String, ProviderError> {
        let (_, api_secret) = self.config.credentials()?;

        let claims = UserTokenClaims {
            user_id: user_id.to_string(),
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(api_secret.as_bytes()),
        )?)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn query_user(
        &self,
        user_id: &NormalizedId,
    ) -> Result<Option<PublicUser>, ProviderError> {
        let (api_key, api_secret) = self.config.credentials()?;

        let payload = json!({
            "filter_conditions": { "id": { "$eq": user_id.as_str() } },
            "limit": 1,
        })
        .to_string();

        let response = self
            .client
            .get(self.users_url()?)
            .query(&[("api_key", api_key), ("payload", payload.as_str())])
            .header(AUTHORIZATION, Self::server_token(api_secret)?)
            .header("stream-auth-type", "jwt")
            .send()
            .await?;

        let body: QueryUsersResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let found = body
            .users
            .into_iter()
            .find(|u| u.id == user_id.as_str())
            .map(PublicUser::from);

        tracing::debug!(found = found.is_some(), "Queried Stream for user");
        Ok(found)
    }
}
