use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::errors::ClientError;
use crate::userdb::PublicUser;

/// What the client remembers between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: PublicUser,
    /// Chat provider token; `None` for dev-mode sessions
    #[serde(default)]
    pub token: Option<String>,
    /// Set when the backend was unreachable and the password was never checked
    #[serde(default)]
    pub dev_mode: bool,
}

/// A single session persisted as a JSON file
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached session.
    ///
    /// A file that no longer parses is deleted and treated as empty.
    pub async fn load(&self) -> Result<Option<Session>, ClientError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(
                    "Discarding corrupt session cache {}: {}",
                    self.path.display(),
                    e
                );
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn store(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> SessionCache {
        let path = std::env::temp_dir()
            .join(format!("konvos-cache-{}", uuid::Uuid::new_v4()))
            .join("konvos_user.json");
        SessionCache::new(path)
    }

    fn session() -> Session {
        Session {
            user: PublicUser {
                id: "dana".to_string(),
                name: "Dana".to_string(),
                image: String::new(),
            },
            token: Some("tok".to_string()),
            dev_mode: false,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_loads_none() {
        let cache = temp_cache();
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let cache = temp_cache();
        cache.store(&session()).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(session()));
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_removed() {
        let cache = temp_cache();
        cache.store(&session()).await.unwrap();
        tokio::fs::write(cache.path(), b"{not json").await.unwrap();

        assert_eq!(cache.load().await.unwrap(), None);
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let cache = temp_cache();
        cache.store(&session()).await.unwrap();

        cache.clear().await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.load().await.unwrap(), None);
    }
}
