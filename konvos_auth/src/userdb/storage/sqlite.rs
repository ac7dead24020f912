use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{errors::UserError, types::UserRecord};

use super::config::DB_TABLE_USERS;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            image TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("id", "TEXT"),
        ("name", "TEXT"),
        ("password_hash", "TEXT"),
        ("image", "TEXT"),
        ("created_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<UserRecord>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, UserRecord>(&format!(
        r#"
        SELECT id, name, password_hash, image, created_at FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(UserError::from)
}

/// Insert a new user unless the id is taken.
///
/// Returns `false` when another row already owns the id.
pub(super) async fn insert_user_sqlite(
    pool: &Pool<Sqlite>,
    user: &UserRecord,
) -> Result<bool, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, name, password_hash, image, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (id) DO NOTHING
        "#
    ))
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(&user.image)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
