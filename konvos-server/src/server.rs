use std::net::SocketAddr;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

/// Listen port from `PORT`, default 3000
pub(crate) fn port_from_env() -> Result<u16, String> {
    parse_port(std::env::var("PORT").ok().as_deref())
}

fn parse_port(value: Option<&str>) -> Result<u16, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v.parse().map_err(|e| format!("Invalid PORT '{v}': {e}")),
    }
}

pub(crate) async fn serve_http(port: u16, app: Router) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Konvos backend listening on {}", addr);
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
}

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("konvos_auth_axum=debug,konvos_auth=debug,{app_name}=debug,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Set RUST_LOG to change verbosity, e.g. RUST_LOG=konvos_auth=trace");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_port_default() {
        assert_eq!(parse_port(None), Ok(3000));
        assert_eq!(parse_port(Some("  ")), Ok(3000));
    }

    #[test]
    fn test_port_custom() {
        assert_eq!(parse_port(Some("8080")), Ok(8080));
    }

    #[test]
    fn test_port_invalid() {
        assert!(parse_port(Some("http")).is_err());
        assert!(parse_port(Some("70000")).is_err());
    }

    #[test]
    #[serial]
    fn test_port_from_env() {
        unsafe { std::env::set_var("PORT", "4100") };
        assert_eq!(port_from_env(), Ok(4100));

        unsafe { std::env::remove_var("PORT") };
        assert_eq!(port_from_env(), Ok(3000));
    }
}
