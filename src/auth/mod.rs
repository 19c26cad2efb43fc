//! Authentication
//!
//! Auth schemes applied by the transport to outgoing requests:
//! API key (header or query), Basic, Bearer, OAuth2 client-credentials
//! and refresh-token flows with token caching, and JWT assertion auth.

mod authenticator;
mod types;

#[cfg(test)]
mod tests;

pub use authenticator::Authenticator;
pub use types::{AuthScheme, CachedToken, Location};
