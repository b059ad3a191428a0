//! Domain model builder
//!
//! Turns raw provider listings into a [`Zone`] and its classified
//! [`Record`]s. Apex NS and SOA sets are provider-managed and never enter the
//! model; record sets that cannot be classified are skipped and reported.

mod names;

pub use names::{ModuleNames, decode_escapes, relative_name, sanitize_module_name};
pub(crate) use names::strip_zone_suffix;

use zonegen_provider::{RecordSet, Tags, ZoneDetail};

use crate::error::CoreError;
use crate::types::{FailoverRole, Record, RecordBody, RecordType, RoutingPolicy, Zone};

/// Result of modelling one zone.
#[derive(Debug)]
pub struct ZoneModel {
    pub zone: Zone,
    /// Managed records, in provider order.
    pub records: Vec<Record>,
    /// One [`CoreError::MalformedRecord`] per skipped record set.
    pub malformed: Vec<CoreError>,
}

/// Domain model builder
pub struct ModelBuilder;

impl ModelBuilder {
    /// Build the model of one zone from its details, record sets and tags.
    pub fn build(detail: &ZoneDetail, raw_records: Vec<RecordSet>, tags: Tags) -> ZoneModel {
        let zone = Zone {
            id: detail.zone.id.clone(),
            name: detail.zone.name.clone(),
            comment: detail.zone.comment.clone(),
            tags,
            delegation_set_id: detail.delegation_set_id.clone(),
            name_servers: detail.name_servers.clone(),
            visibility: detail.zone.visibility,
            record_count: detail.zone.record_count,
        };

        let mut records = Vec::with_capacity(raw_records.len());
        let mut malformed = Vec::new();

        for raw in raw_records {
            if is_provider_managed(&raw, &zone.name) {
                continue;
            }
            match classify(&zone.name, raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Skipping record: {e}");
                    malformed.push(e);
                }
            }
        }

        ZoneModel {
            zone,
            records,
            malformed,
        }
    }
}

/// Apex NS and SOA sets.
fn is_provider_managed(raw: &RecordSet, zone_name: &str) -> bool {
    (raw.record_type.eq_ignore_ascii_case("NS") || raw.record_type.eq_ignore_ascii_case("SOA"))
        && raw.name.eq_ignore_ascii_case(zone_name)
}

fn classify(zone_name: &str, raw: RecordSet) -> Result<Record, CoreError> {
    let malformed = |reason: &str| CoreError::MalformedRecord {
        zone: zone_name.to_string(),
        name: raw.name.clone(),
        record_type: raw.record_type.clone(),
        reason: reason.to_string(),
    };

    let record_type: RecordType = raw
        .record_type
        .parse()
        .map_err(|_| malformed("unsupported record type"))?;
    let routing = routing_policy(&raw).map_err(malformed)?;

    let body = match (&raw.alias_target, raw.values.is_empty(), raw.ttl) {
        (Some(_), false, _) => return Err(malformed("carries both an alias target and values")),
        (Some(alias), true, _) => RecordBody::Alias(alias.clone()),
        (None, false, Some(ttl)) => RecordBody::Values {
            ttl,
            values: raw.values.clone(),
        },
        (None, false, None) => return Err(malformed("value record without TTL")),
        (None, true, _) => return Err(malformed("neither values nor an alias target")),
    };

    Ok(Record {
        name: relative_name(&raw.name, zone_name),
        fqdn: raw.name,
        record_type,
        set_identifier: raw.set_identifier,
        routing,
        body,
        health_check_id: raw.health_check_id,
    })
}

/// Exactly one policy marker must accompany a set identifier, and none may
/// appear without one.
fn routing_policy(raw: &RecordSet) -> Result<RoutingPolicy, &'static str> {
    let mut policies = Vec::new();
    if let Some(weight) = raw.weight {
        policies.push(RoutingPolicy::Weighted { weight });
    }
    if let Some(region) = &raw.region {
        policies.push(RoutingPolicy::Latency {
            region: region.clone(),
        });
    }
    if let Some(failover) = &raw.failover {
        let role = match failover.to_ascii_uppercase().as_str() {
            "PRIMARY" => FailoverRole::Primary,
            "SECONDARY" => FailoverRole::Secondary,
            _ => return Err("unknown failover role"),
        };
        policies.push(RoutingPolicy::Failover { role });
    }
    if let Some(location) = &raw.geo_location {
        policies.push(RoutingPolicy::Geolocation {
            location: location.clone(),
        });
    }
    if raw.multi_value_answer == Some(true) {
        policies.push(RoutingPolicy::Multivalue);
    }

    match (raw.set_identifier.is_some(), policies.len()) {
        (false, 0) => Ok(RoutingPolicy::Simple),
        (false, _) => Err("routing policy without set identifier"),
        (true, 0) => Err("set identifier without a supported routing policy"),
        (true, 1) => Ok(policies.swap_remove(0)),
        (true, _) => Err("conflicting routing policies"),
    }
}
