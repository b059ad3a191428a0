//! # zonegen-provider
//!
//! Read-only access to Amazon Route 53 for discovering the live state of
//! hosted zones: zones, resource record sets, tags and reusable delegation
//! sets.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonegen_provider::{DnsProvider, Route53Credentials, Route53Provider, ZoneScope};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Route53Provider::new(Route53Credentials::from_env()?)?;
//!
//!     // Pagination is followed transparently; private zones are dropped.
//!     let zones = provider.list_zones(&ZoneScope::All).await?;
//!     for zone in &zones {
//!         let records = provider.list_records(&zone.id).await?;
//!         println!("{} ({}): {} record sets", zone.name, zone.id, records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] / [`ProviderError::PermissionDenied`]: fatal, never retried
//! - [`ProviderError::DomainNotFound`] / [`ProviderError::AmbiguousDomain`]: single-domain scope did not resolve
//! - [`ProviderError::RateLimited`]: API throttling (retryable)
//! - [`ProviderError::NetworkError`]: network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are automatically
//! retried with exponential backoff. See [`ProviderError`] for the full list.

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    AliasTarget, DelegationSet, GeoLocation, HostedZone, Page, RecordCursor, RecordSet, Tags,
    Visibility, ZoneDetail, ZoneScope,
};

// Re-export concrete provider
pub use providers::{DEFAULT_ENDPOINT, Route53Credentials, Route53Provider, Route53ProviderBuilder};
