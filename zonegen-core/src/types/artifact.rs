use serde::Serialize;
use zonegen_provider::Tags;

use super::Record;

/// Reusable delegation set module of a delegated zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationSetBlock {
    pub module: String,
    /// Map key and reference name of the set: the delegated zone's name.
    pub reference_name: String,
}

/// Zone module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBlock {
    pub module: String,
    pub zone_name: String,
    pub comment: String,
    pub tags: Tags,
    /// Delegation set module the zone is attached to.
    pub delegation_set_module: Option<String>,
}

/// Records module targeting one zone by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsBlock {
    pub module: String,
    pub zone_name: String,
    pub records: Vec<Record>,
}

/// Everything generated for one zone.
///
/// Rendered with [`GeneratedArtifact::to_hcl`] into `<zone>.tf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub zone_name: String,
    /// Sanitized zone name; names the zone's outputs.
    pub output_name: String,
    /// Version constraint of the registry modules.
    pub module_version: String,
    pub delegation_set: Option<DelegationSetBlock>,
    pub zone: ZoneBlock,
    /// Omitted when the zone has no managed records.
    pub records: Option<RecordsBlock>,
    /// NS record delegating this zone from its parent.
    pub parent_ns: Option<RecordsBlock>,
}

impl GeneratedArtifact {
    pub fn is_delegated(&self) -> bool {
        self.parent_ns.is_some()
    }

    /// Number of records in the zone's own records module.
    pub fn record_count(&self) -> usize {
        self.records.as_ref().map_or(0, |r| r.records.len())
    }
}
