use serde::Serialize;
use zonegen_provider::{Tags, Visibility};

/// A public hosted zone as modelled for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Bare hosted zone id.
    pub id: String,
    /// Domain name without the trailing dot.
    pub name: String,
    /// Live comment, empty when none is set.
    pub comment: String,
    /// Live tags.
    pub tags: Tags,
    /// Reusable delegation set the zone uses, if any.
    pub delegation_set_id: Option<String>,
    /// Authoritative nameservers, in provider order.
    pub name_servers: Vec<String>,
    pub visibility: Visibility,
    pub record_count: u64,
}
