//! Client side of the auth endpoints: login/register over HTTP plus a cached session

mod cache;
mod errors;
mod session;

pub use cache::{Session, SessionCache};
pub use errors::ClientError;
pub use session::KonvosClient;
