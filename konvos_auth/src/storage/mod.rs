mod data_store;
mod errors;
mod schema_validation;

pub use data_store::{DataStore, DataStoreConfig, DataStoreType, connect_data_store};
pub use errors::StorageError;

pub(crate) use data_store::DB_TABLE_PREFIX;
pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
