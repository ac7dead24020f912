//! konvos_auth_axum - Axum handlers and routers for the Konvos auth backend

mod auth;
mod error;
mod router;

pub use error::ErrorBody;
pub use router::{
    konvos_app, konvos_app_with_prefix, konvos_auth_router, konvos_auth_router_no_trace, liveness,
};

pub use konvos_auth::{AuthService, KONVOS_ROUTE_PREFIX};
