//! The client session helper against a live backend
mod common;

use common::TestServer;
use konvos_auth::client::{ClientError, KonvosClient, SessionCache};

fn client_for(server: &TestServer) -> KonvosClient {
    let cache = SessionCache::new(
        std::env::temp_dir().join(format!("konvos-session-{}.json", uuid::Uuid::new_v4())),
    );
    KonvosClient::new(server.url("/api"), cache)
}

#[tokio::test]
async fn test_register_caches_verified_session() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    let session = client
        .register("Gina", "Gina", "pw", None)
        .await
        .expect("registration should succeed");

    assert!(!session.dev_mode);
    assert!(session.token.is_some());
    assert_eq!(session.user.id, "gina");
    assert_eq!(client.restore().await.unwrap(), Some(session));
}

#[tokio::test]
async fn test_backend_error_message_is_verbatim() {
    let server = TestServer::start().await;
    let client = client_for(&server);
    client.register("gina", "Gina", "pw", None).await.unwrap();
    client.logout().await.unwrap();

    let err = client.login("gina", "nope").await.unwrap_err();
    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // A rejected login leaves no session behind
    assert_eq!(client.restore().await.unwrap(), None);

    let err = client.register("GINA", "G", "pw", None).await.unwrap_err();
    assert_eq!(err.to_string(), "User already exists");
}
