//! AWS Signature Version 4

use std::fmt::Write;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;
use crate::utils::log_sanitizer::{mask_secret, redact_canonical_request, truncate_for_log};

use super::{Route53Credentials, Route53Provider, SERVICE_NAME};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Everything about a request that goes into its signature.
pub(crate) struct SigningInput<'a> {
    pub method: &'a str,
    /// `host[:port]`.
    pub host: &'a str,
    /// Absolute path, already URI-safe.
    pub path: &'a str,
    /// Canonical query string (see [`canonical_query_string`]).
    pub query: &'a str,
    pub payload: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Header values produced by signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignedHeaders {
    pub authorization: String,
    /// Value of `x-amz-date`.
    pub amz_date: String,
}

/// Encode and sort query parameters into canonical form.
///
/// Keys and values are percent-encoded (RFC 3986 unreserved characters kept)
/// and pairs are ordered by encoded key, then encoded value. The same string
/// is used for the request URL so the signed and sent query never diverge.
pub(crate) fn canonical_query_string(params: &[(&str, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl Route53Provider {
    /// Sign a Route 53 request.
    pub(crate) fn sign(&self, input: &SigningInput<'_>) -> SignedHeaders {
        sign_v4(&self.credentials, &self.signing_region, SERVICE_NAME, input)
    }
}

/// Compute the SigV4 `Authorization` header for a request.
///
/// Signed headers are `host`, `x-amz-date` and, for temporary credentials,
/// `x-amz-security-token`.
pub(crate) fn sign_v4(
    credentials: &Route53Credentials,
    region: &str,
    service: &str,
    input: &SigningInput<'_>,
) -> SignedHeaders {
    let amz_date = input.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = input.timestamp.format("%Y%m%d").to_string();

    // 1. Canonical headers, sorted by lowercase name
    let mut headers: Vec<(&str, &str)> = vec![("host", input.host), ("x-amz-date", &amz_date)];
    if let Some(token) = credentials.session_token.as_deref() {
        headers.push(("x-amz-security-token", token));
    }
    headers.sort_by(|a, b| a.0.cmp(b.0));

    let canonical_headers = headers.iter().fold(String::new(), |mut acc, (k, v)| {
        let _ = writeln!(acc, "{k}:{}", v.trim());
        acc
    });
    let signed_headers = headers
        .iter()
        .map(|(k, _)| *k)
        .collect::<Vec<_>>()
        .join(";");

    // 2. Canonical request
    let hashed_payload = hex::encode(Sha256::digest(input.payload.as_bytes()));
    let canonical_request = format!(
        "{}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}",
        input.method, input.path, input.query
    );

    log::debug!(
        "CanonicalRequest:\n{}",
        truncate_for_log(&redact_canonical_request(&canonical_request))
    );

    // 3. String to sign
    let credential_scope = format!("{date_stamp}/{region}/{service}/aws4_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    log::debug!(
        "StringToSign ({}):\n{string_to_sign}",
        mask_secret(&credentials.access_key_id)
    );

    // 4. Derived signing key
    let k_date = hmac_sha256(
        format!("AWS4{}", credentials.secret_access_key).as_bytes(),
        date_stamp.as_bytes(),
    );
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    let k_signing = hmac_sha256(&k_service, b"aws4_request");
    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    SignedHeaders {
        authorization: format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id
        ),
        amz_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credentials() -> Route53Credentials {
        Route53Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn input<'a>(method: &'a str, path: &'a str, query: &'a str) -> SigningInput<'a> {
        SigningInput {
            method,
            host: "example.amazonaws.com",
            path,
            query,
            payload: "",
            timestamp: timestamp(),
        }
    }

    /// Extract the value of the Signature field from the signature result
    fn extract_signature(auth: &str) -> Option<&str> {
        auth.split("Signature=").nth(1)
    }

    /// Extract the value of the `SignedHeaders` field from the signature result
    fn extract_signed_headers(auth: &str) -> Option<&str> {
        auth.split("SignedHeaders=")
            .nth(1)
            .and_then(|s| s.split(',').next())
    }

    // ============ Known answer ============

    #[test]
    fn sign_matches_aws_get_vanilla_vector() {
        let signed = sign_v4(
            &example_credentials(),
            "us-east-1",
            "service",
            &input("GET", "/", ""),
        );
        assert_eq!(signed.amz_date, "20150830T123600Z");
        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    // ============ Canonical query ============

    #[test]
    fn canonical_query_sorts_and_encodes() {
        let query = canonical_query_string(&[
            ("type", "A".to_string()),
            ("name", "\\052.example.com.".to_string()),
            ("identifier", "us east".to_string()),
        ]);
        assert_eq!(
            query,
            "identifier=us%20east&name=%5C052.example.com.&type=A"
        );
    }

    #[test]
    fn canonical_query_empty() {
        assert_eq!(canonical_query_string(&[]), "");
    }

    #[test]
    fn sign_is_independent_of_parameter_order() {
        let creds = example_credentials();
        let a = canonical_query_string(&[("b", "2".to_string()), ("a", "1".to_string())]);
        let b = canonical_query_string(&[("a", "1".to_string()), ("b", "2".to_string())]);
        let sig_a = sign_v4(&creds, "us-east-1", "route53", &input("GET", "/", &a));
        let sig_b = sign_v4(&creds, "us-east-1", "route53", &input("GET", "/", &b));
        assert_eq!(sig_a, sig_b);
    }

    // ============ Session token ============

    #[test]
    fn session_token_is_signed() {
        let creds = example_credentials().with_session_token("token-value");
        let signed = sign_v4(&creds, "us-east-1", "route53", &input("GET", "/", ""));
        assert_eq!(
            extract_signed_headers(&signed.authorization),
            Some("host;x-amz-date;x-amz-security-token")
        );
    }

    // ============ Sensitivity ============

    #[test]
    fn sign_different_path_changes_signature() {
        let creds = example_credentials();
        let zones = sign_v4(
            &creds,
            "us-east-1",
            "route53",
            &input("GET", "/2013-04-01/hostedzone", ""),
        );
        let sets = sign_v4(
            &creds,
            "us-east-1",
            "route53",
            &input("GET", "/2013-04-01/delegationset", ""),
        );
        assert_ne!(
            extract_signature(&zones.authorization),
            extract_signature(&sets.authorization)
        );
    }

    #[test]
    fn sign_different_region_changes_scope() {
        let creds = example_credentials();
        let signed = sign_v4(&creds, "cn-north-1", "route53", &input("GET", "/", ""));
        assert!(
            signed
                .authorization
                .contains("/20150830/cn-north-1/route53/aws4_request")
        );
    }
}
