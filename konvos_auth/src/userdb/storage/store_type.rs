use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    types::{NormalizedId, UserRecord},
};

use super::postgres::*;
use super::sqlite::*;

/// The credential table.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct UserStore {
    data_store: Arc<dyn DataStore>,
}

impl UserStore {
    /// Wrap a connected data store, creating and validating the users table
    pub async fn new(data_store: Arc<dyn DataStore>) -> Result<Self, UserError> {
        let store = Self { data_store };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), UserError> {
        match (self.data_store.as_sqlite(), self.data_store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Get a user by normalized id
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &NormalizedId) -> Result<Option<UserRecord>, UserError> {
        let result = if let Some(pool) = self.data_store.as_sqlite() {
            get_user_sqlite(pool, id.as_str()).await
        } else if let Some(pool) = self.data_store.as_postgres() {
            get_user_postgres(pool, id.as_str()).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => {
                tracing::info!(found = true, "User lookup completed");
            }
            Ok(None) => {
                tracing::info!(found = false, "User lookup completed - not found");
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
            }
        }

        result
    }

    /// Insert a user if no record owns its id yet.
    ///
    /// The table's primary key decides races between concurrent inserts; the
    /// loser gets [`UserError::AlreadyExists`].
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn insert_user(&self, user: UserRecord) -> Result<UserRecord, UserError> {
        if NormalizedId::new(&user.id).is_none_or(|id| id.as_str() != user.id) {
            return Err(UserError::InvalidData(format!(
                "User id is not normalized: {:?}",
                user.id
            )));
        }

        let inserted = if let Some(pool) = self.data_store.as_sqlite() {
            insert_user_sqlite(pool, &user).await
        } else if let Some(pool) = self.data_store.as_postgres() {
            insert_user_postgres(pool, &user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        if !inserted {
            tracing::info!("User insert skipped - id already taken");
            return Err(UserError::AlreadyExists(user.id));
        }

        tracing::info!("User inserted");
        Ok(user)
    }
}
