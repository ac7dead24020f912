use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user identifier after trimming surrounding whitespace and lower-casing.
///
/// Every store read and write goes through this type, so `"Bob "`, `"bob"` and
/// `"BOB"` always address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedId(String);

impl NormalizedId {
    /// Normalize a raw identifier. Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The profile shape shared with clients and the chat provider.
///
/// Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// A row of the credential table
#[derive(Clone, FromRow, PartialEq)]
pub struct UserRecord {
    /// Normalized identifier (primary key)
    pub id: String,
    /// Display name, not unique
    pub name: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Avatar URL, empty when unset
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        id: NormalizedId,
        name: String,
        password_hash: String,
        image: Option<String>,
    ) -> Self {
        Self {
            id: id.into_inner(),
            name,
            password_hash,
            image: image.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("image", &self.image)
            .field("created_at", &self.created_at)
            .finish()
    }
}
