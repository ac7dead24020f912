mod server;

use konvos_auth::{AuthService, DataStoreConfig, UserStore, connect_data_store, provider_from_env};
use konvos_auth_axum::konvos_app;

use server::{init_tracing, port_from_env, serve_http};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("konvos_server");

    let store_config = DataStoreConfig::from_env()?;
    tracing::info!(
        "Connecting to {:?} credential store",
        store_config.store_type
    );
    let data_store = connect_data_store(&store_config).await?;
    let users = UserStore::new(data_store).await?;

    let provider = provider_from_env()?;
    let service = AuthService::new(users, provider);
    tracing::info!(
        provider_sync_on_login = service.options().provider_sync_on_login,
        "Auth service ready"
    );

    let port = port_from_env()?;
    serve_http(port, konvos_app(service)).await?;
    Ok(())
}
