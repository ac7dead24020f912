use std::sync::Arc;

use tokio::task::JoinHandle;

use konvos_auth::provider::InMemoryChatProvider;
use konvos_auth::{AuthOptions, AuthService, DataStoreConfig, UserStore, connect_data_store};
use konvos_auth_axum::konvos_app_with_prefix;

/// The full backend on an ephemeral port, backed by in-memory SQLite and an in-memory provider
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
    pub provider: Arc<InMemoryChatProvider>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_options(AuthOptions {
            provider_sync_on_login: true,
        })
        .await
    }

    pub async fn start_with_options(options: AuthOptions) -> Self {
        let data_store = connect_data_store(&DataStoreConfig::sqlite_in_memory())
            .await
            .expect("Failed to open in-memory database");
        let users = UserStore::new(data_store)
            .await
            .expect("Failed to initialize UserStore");
        let provider = Arc::new(InMemoryChatProvider::new());
        let service = AuthService::new(users, provider.clone()).with_options(options);

        let app = konvos_app_with_prefix(service, "/api");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            server_handle,
            base_url: format!("http://{addr}"),
            provider,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request should reach the test server")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}
