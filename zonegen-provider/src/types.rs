use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_domain_name;

// ============ Pagination ============

/// One page of a provider listing.
///
/// `next` carries the provider's continuation cursor and is `None` on the
/// last page. Callers outside this crate normally use the flattened
/// listings on [`DnsProvider`](crate::DnsProvider) and never see a cursor.
#[derive(Debug, Clone)]
pub struct Page<T, C = String> {
    /// Items on this page, in provider order.
    pub items: Vec<T>,
    /// Cursor for the following page.
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Continuation cursor for record-set listings.
///
/// Route 53 resumes a record listing at a (name, type, set identifier) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCursor {
    /// Record name to resume at, in provider form.
    pub name: String,
    /// Record type to resume at.
    pub record_type: String,
    /// Set identifier to resume at, for routing-policy records.
    pub identifier: Option<String>,
}

// ============ Hosted zones ============

/// Whether a hosted zone answers on the public internet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Internet-facing zone.
    Public,
    /// VPC-scoped zone.
    Private,
}

/// A hosted zone as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Bare zone identifier (no `/hostedzone/` prefix).
    pub id: String,
    /// Domain name without the trailing dot.
    pub name: String,
    /// Zone comment, empty when none is set.
    pub comment: String,
    /// Public or private.
    pub visibility: Visibility,
    /// Number of record sets the provider reports for the zone.
    pub record_count: u64,
}

/// A hosted zone together with its authoritative nameservers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDetail {
    /// The zone itself.
    pub zone: HostedZone,
    /// Nameservers assigned to the zone, in provider order.
    pub name_servers: Vec<String>,
    /// Bare reusable delegation set identifier, if the zone uses one.
    pub delegation_set_id: Option<String>,
}

/// A reusable delegation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationSet {
    /// Bare delegation set identifier (no `/delegationset/` prefix).
    pub id: String,
    /// Caller reference supplied when the set was created.
    pub caller_reference: Option<String>,
    /// Nameservers in the set, in provider order.
    pub name_servers: Vec<String>,
}

/// Resource tags, sorted by key.
pub type Tags = BTreeMap<String, String>;

// ============ Record sets ============

/// Alias target of a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Hosted zone id of the alias target.
    pub hosted_zone_id: String,
    /// Target DNS name without the trailing dot.
    pub dns_name: String,
    /// Whether Route 53 evaluates the target's health.
    pub evaluate_target_health: bool,
}

/// Geolocation selector of a geolocation routing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub continent_code: Option<String>,
    pub country_code: Option<String>,
    pub subdivision_code: Option<String>,
}

/// A resource record set exactly as the provider reports it.
///
/// No classification happens here; routing-policy markers and alias/value
/// fields are carried through as optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Fully-qualified name without the trailing dot, escapes untouched.
    pub name: String,
    /// Record type as reported (`A`, `TXT`, ...).
    pub record_type: String,
    pub set_identifier: Option<String>,
    pub weight: Option<u64>,
    pub region: Option<String>,
    pub geo_location: Option<GeoLocation>,
    /// `PRIMARY` or `SECONDARY`.
    pub failover: Option<String>,
    pub multi_value_answer: Option<bool>,
    pub ttl: Option<u32>,
    /// Plain record values, in provider order.
    pub values: Vec<String>,
    pub alias_target: Option<AliasTarget>,
    pub health_check_id: Option<String>,
}

// ============ Scope ============

/// Which hosted zones a run targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneScope {
    /// Every public zone in the account.
    All,
    /// The single public zone with this domain name.
    Single(String),
}

impl ZoneScope {
    /// Narrow a public zone listing down to this scope.
    ///
    /// A single-domain scope must match exactly one zone: no match yields
    /// [`ProviderError::DomainNotFound`], several yield
    /// [`ProviderError::AmbiguousDomain`].
    pub fn select(&self, zones: &[HostedZone], provider: &str) -> Result<Vec<HostedZone>> {
        match self {
            Self::All => Ok(zones.to_vec()),
            Self::Single(domain) => {
                let wanted = normalize_domain_name(domain).to_ascii_lowercase();
                let matches: Vec<HostedZone> = zones
                    .iter()
                    .filter(|z| z.name.eq_ignore_ascii_case(&wanted))
                    .cloned()
                    .collect();

                match matches.len() {
                    0 => Err(ProviderError::DomainNotFound {
                        provider: provider.to_string(),
                        domain: wanted,
                        raw_message: None,
                    }),
                    1 => Ok(matches),
                    _ => Err(ProviderError::AmbiguousDomain {
                        provider: provider.to_string(),
                        domain: wanted,
                        zone_ids: matches.into_iter().map(|z| z.id).collect(),
                    }),
                }
            }
        }
    }
}
