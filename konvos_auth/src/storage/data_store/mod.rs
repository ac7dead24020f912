mod config;
mod types;

pub(crate) use config::DB_TABLE_PREFIX;
pub use config::{DataStoreConfig, DataStoreType, connect_data_store};
pub use types::DataStore;
