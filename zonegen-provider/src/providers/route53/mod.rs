//! Amazon Route 53 DNS Provider

mod error;
mod http;
mod provider;
mod sign;
/// Route 53 API-specific XML response types.
pub(crate) mod types;

use std::fmt;

use reqwest::{Client, Url};

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;

/// Global Route 53 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
/// Route 53 REST API version path segment.
pub(crate) const API_VERSION: &str = "2013-04-01";
/// Signing region of the global endpoint.
pub(crate) const GLOBAL_SIGNING_REGION: &str = "us-east-1";
/// SigV4 service name.
pub(crate) const SERVICE_NAME: &str = "route53";

const DEFAULT_MAX_RETRIES: u32 = 4;

// ============ Credentials ============

/// AWS access key credentials used to sign Route 53 requests.
#[derive(Clone)]
pub struct Route53Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Session token of temporary credentials.
    pub session_token: Option<String>,
    /// Region from the environment; only used as signing region for a custom endpoint.
    pub region: String,
}

impl fmt::Debug for Route53Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route53Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

impl Route53Credentials {
    /// Static credentials in the default region.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            region: GLOBAL_SIGNING_REGION.to_string(),
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Load credentials from the standard AWS environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    ///
    /// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, the optional
    /// `AWS_SESSION_TOKEN`, and `AWS_REGION` / `AWS_DEFAULT_REGION`.
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let missing = |key: &str| ProviderError::InvalidCredentials {
            provider: SERVICE_NAME.to_string(),
            raw_message: Some(format!("{key} is not set")),
        };

        let access_key_id = get("AWS_ACCESS_KEY_ID").ok_or_else(|| missing("AWS_ACCESS_KEY_ID"))?;
        let secret_access_key =
            get("AWS_SECRET_ACCESS_KEY").ok_or_else(|| missing("AWS_SECRET_ACCESS_KEY"))?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: get("AWS_SESSION_TOKEN"),
            region: get("AWS_REGION")
                .or_else(|| get("AWS_DEFAULT_REGION"))
                .unwrap_or_else(|| GLOBAL_SIGNING_REGION.to_string()),
        })
    }
}

// ============ Provider ============

/// Route 53 provider implementation.
///
/// Read-only: lists hosted zones, record sets, tags and reusable
/// delegation sets. Requests are signed with AWS Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use zonegen_provider::{Route53Credentials, Route53Provider};
///
/// # fn main() -> zonegen_provider::Result<()> {
/// let provider = Route53Provider::builder(Route53Credentials::from_env()?)
///     .max_retries(2)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Route53Provider {
    pub(crate) client: Client,
    pub(crate) credentials: Route53Credentials,
    /// Endpoint without trailing slash.
    pub(crate) endpoint: String,
    /// `host[:port]` of the endpoint, signed as the `host` header.
    pub(crate) host: String,
    pub(crate) signing_region: String,
    pub(crate) max_retries: u32,
}

/// Builder for [`Route53Provider`].
pub struct Route53ProviderBuilder {
    credentials: Route53Credentials,
    endpoint: Option<String>,
    max_retries: u32,
}

impl Route53ProviderBuilder {
    fn new(credentials: Route53Credentials) -> Self {
        Self {
            credentials,
            endpoint: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the API endpoint (default: the global Route 53 endpoint).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 4).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`Route53Provider`] instance.
    pub fn build(self) -> Result<Route53Provider> {
        let custom = self.endpoint.is_some();
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let url = Url::parse(&endpoint).map_err(|e| ProviderError::InvalidParameter {
            provider: SERVICE_NAME.to_string(),
            param: "endpoint".to_string(),
            detail: format!("{endpoint}: {e}"),
        })?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(ProviderError::InvalidParameter {
                    provider: SERVICE_NAME.to_string(),
                    param: "endpoint".to_string(),
                    detail: format!("{endpoint}: missing host"),
                });
            }
        };

        let signing_region = if custom {
            self.credentials.region.clone()
        } else {
            GLOBAL_SIGNING_REGION.to_string()
        };

        Ok(Route53Provider {
            client: create_http_client(SERVICE_NAME)?,
            credentials: self.credentials,
            endpoint,
            host,
            signing_region,
            max_retries: self.max_retries,
        })
    }
}

impl Route53Provider {
    /// Creates a provider against the global endpoint with default settings.
    pub fn new(credentials: Route53Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(credentials: Route53Credentials) -> Route53ProviderBuilder {
        Route53ProviderBuilder::new(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn credentials_from_lookup_reads_standard_variables() {
        let creds = Route53Credentials::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("AWS_SESSION_TOKEN", "TOKEN"),
            ("AWS_DEFAULT_REGION", "eu-west-1"),
        ]))
        .unwrap();
        assert_eq!(creds.access_key_id, "AKID");
        assert_eq!(creds.session_token.as_deref(), Some("TOKEN"));
        assert_eq!(creds.region, "eu-west-1");
    }

    #[test]
    fn credentials_region_defaults_to_us_east_1() {
        let creds = Route53Credentials::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
        ]))
        .unwrap();
        assert_eq!(creds.region, "us-east-1");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn credentials_missing_secret_is_invalid_credentials() {
        let result = Route53Credentials::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "  "),
        ]));
        assert!(
            matches!(&result, Err(ProviderError::InvalidCredentials { raw_message: Some(m), .. }) if m.contains("AWS_SECRET_ACCESS_KEY")),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds = Route53Credentials::new("AKID", "SECRET").with_session_token("TOKEN");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("SECRET"));
        assert!(!debug.contains("TOKEN"));
    }

    #[test]
    fn builder_global_endpoint_signs_in_us_east_1() {
        let mut creds = Route53Credentials::new("AKID", "SECRET");
        creds.region = "ap-southeast-2".to_string();
        let provider = Route53Provider::new(creds).unwrap();
        assert_eq!(provider.host, "route53.amazonaws.com");
        assert_eq!(provider.signing_region, "us-east-1");
        assert_eq!(provider.max_retries, 4);
    }

    #[test]
    fn builder_custom_endpoint_keeps_port_and_region() {
        let mut creds = Route53Credentials::new("AKID", "SECRET");
        creds.region = "us-west-2".to_string();
        let provider = Route53Provider::builder(creds)
            .endpoint("http://127.0.0.1:4566/")
            .max_retries(0)
            .build()
            .unwrap();
        assert_eq!(provider.endpoint, "http://127.0.0.1:4566");
        assert_eq!(provider.host, "127.0.0.1:4566");
        assert_eq!(provider.signing_region, "us-west-2");
        assert_eq!(provider.max_retries, 0);
    }

    #[test]
    fn builder_rejects_bad_endpoint() {
        let result = Route53Provider::builder(Route53Credentials::new("A", "B"))
            .endpoint("not a url")
            .build();
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { ref param, .. }) if param == "endpoint"
        ));
    }
}
