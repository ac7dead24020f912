use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::{errors::UserError, types::UserRecord};

use super::config::DB_TABLE_USERS;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            image TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("id", "text"),
        ("name", "text"),
        ("password_hash", "text"),
        ("image", "text"),
        ("created_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_user_postgres(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<Option<UserRecord>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, UserRecord>(&format!(
        r#"
        SELECT id, name, password_hash, image, created_at FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(UserError::from)
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    user: &UserRecord,
) -> Result<bool, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, name, password_hash, image, created_at)
        VALUES ($1, $2, $3, $4, $5)
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
