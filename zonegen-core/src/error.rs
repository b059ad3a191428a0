//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zonegen_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Invalid invocation or configuration, detected before any provider call.
    #[error("Usage error: {0}")]
    Usage(String),

    /// A record set that cannot be expressed as configuration; only that record is skipped.
    #[error("Malformed record '{name}' ({record_type}) in {zone}: {reason}")]
    MalformedRecord {
        zone: String,
        name: String,
        record_type: String,
        reason: String,
    },

    /// The zone artifact already exists and overwriting was not requested.
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: String },

    /// Writing an output file failed.
    #[error("Failed to write {path}: {detail}")]
    WriteFailed { path: String, detail: String },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Usage(_) | Self::MalformedRecord { .. } | Self::AlreadyExists { .. } => true,
            Self::Provider(e) => e.is_expected(),
            Self::WriteFailed { .. } => false,
        }
    }

    /// Whether the whole run has to stop (authorization failures).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_fatal())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_message() {
        let e: CoreError = ProviderError::HostedZoneNotFound {
            provider: "route53".to_string(),
            zone_id: "Z1".to_string(),
            raw_message: None,
        }
        .into();
        assert_eq!(e.to_string(), "[route53] Hosted zone 'Z1' not found");
        assert!(e.is_expected());
        assert!(!e.is_fatal());
    }

    #[test]
    fn authorization_failures_are_fatal() {
        let e = CoreError::Provider(ProviderError::PermissionDenied {
            provider: "route53".to_string(),
            raw_message: Some("not authorized to perform route53:ListHostedZones".to_string()),
        });
        assert!(e.is_fatal());

        let skip = CoreError::AlreadyExists {
            path: "zones/a.com.tf".to_string(),
        };
        assert!(!skip.is_fatal());
        assert_eq!(
            skip.to_string(),
            "zones/a.com.tf already exists (use --force to overwrite)"
        );
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = CoreError::MalformedRecord {
            zone: "a.com".to_string(),
            name: "x.a.com".to_string(),
            record_type: "HTTPS".to_string(),
            reason: "unsupported record type".to_string(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "MalformedRecord");
        assert_eq!(json["details"]["record_type"], "HTTPS");
    }
}
