use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::cache::{Session, SessionCache};
use crate::client::errors::ClientError;
use crate::coordination::AuthResponse;
use crate::userdb::{NormalizedId, PublicUser};

const DEV_AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

#[derive(Serialize)]
struct LoginBody<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    id: &'a str,
    name: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the register/login endpoints, with a local session cache.
///
/// When the backend cannot be reached at all, login and register succeed with
/// an unverified dev-mode session instead of failing.
#[derive(Debug, Clone)]
pub struct KonvosClient {
    api_url: String,
    http: reqwest::Client,
    cache: SessionCache,
}

impl KonvosClient {
    /// `api_url` is the mount point of the auth routes, e.g. `http://localhost:3000/api`
    pub fn new(api_url: impl Into<String>, cache: SessionCache) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default reqwest client: {}", e);
                reqwest::Client::new()
            });
        Self {
            api_url,
            http,
            cache,
        }
    }

    pub async fn login(&self, id: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginBody { id, password };
        self.authenticate("login", &body, id, None).await
    }

    pub async fn register(
        &self,
        id: &str,
        name: &str,
        password: &str,
        image: Option<&str>,
    ) -> Result<Session, ClientError> {
        let body = RegisterBody {
            id,
            name,
            password,
            image,
        };
        self.authenticate("register", &body, id, Some(name)).await
    }

    /// The session left by a previous login, if any
    pub async fn restore(&self) -> Result<Option<Session>, ClientError> {
        self.cache.load().await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.cache.clear().await
    }

    async fn authenticate<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        id: &str,
        name: Option<&str>,
    ) -> Result<Session, ClientError> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = match self.http.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!("Backend unreachable at {}, using dev mode: {}", url, e);
                return self.dev_session(id, name).await;
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let auth: AuthResponse = response.json().await?;
        let session = Session {
            user: auth.user,
            token: Some(auth.token),
            dev_mode: false,
        };
        self.cache.store(&session).await?;
        Ok(session)
    }

    async fn dev_session(&self, id: &str, name: Option<&str>) -> Result<Session, ClientError> {
        let id = NormalizedId::new(id).ok_or(ClientError::MissingCredentials)?;
        let session = Session {
            user: dev_user(&id, name),
            token: None,
            dev_mode: true,
        };
        self.cache.store(&session).await?;
        Ok(session)
    }
}

fn dev_user(id: &NormalizedId, name: Option<&str>) -> PublicUser {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(id.as_str());
    PublicUser {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("{}{}", DEV_AVATAR_BASE, urlencoding::encode(id.as_str())),
    }
}
