//! Central configuration for the konvos_auth crate

use std::sync::LazyLock;

/// Route prefix for the register/login endpoints
///
/// Default: "/api"
pub static KONVOS_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("KONVOS_ROUTE_PREFIX").unwrap_or_else(|_| "/api".to_string()));

/// Whether login may create a local record for an identity only the chat provider knows
///
/// Default: true. Any value other than "false" (case-insensitive) enables it.
pub(crate) static KONVOS_PROVIDER_SYNC_ON_LOGIN: LazyLock<bool> = LazyLock::new(|| {
    parse_flag(
        std::env::var("KONVOS_PROVIDER_SYNC_ON_LOGIN").ok().as_deref(),
        true,
    )
});

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    value
        .map(|val| val.trim().to_lowercase() != "false")
        .unwrap_or(default)
}
