//! Delegation resolver
//!
//! A zone is delegated from another zone of the same run when its name ends
//! in `.` + the other zone's name (label aligned, so `notexample.com` is not
//! below `example.com`). The most specific parent wins.

use std::collections::BTreeMap;

use zonegen_provider::HostedZone;

use crate::model::strip_zone_suffix;
use crate::types::{Record, RecordType, RoutingPolicy};

/// A parent/child pair of zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationLink {
    pub parent: String,
    pub parent_id: String,
    pub child: String,
    pub child_id: String,
    /// Child name relative to the parent (`sub` for `sub.example.com`).
    pub label: String,
}

/// Delegation relationships between the zones of one run.
#[derive(Debug, Clone, Default)]
pub struct DelegationMap {
    /// Keyed by lowercase child name.
    by_child: BTreeMap<String, DelegationLink>,
}

/// Relationships of a single zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationContext<'a> {
    pub parent: Option<&'a DelegationLink>,
    pub children: Vec<&'a DelegationLink>,
}

/// Classify every zone as root or delegated.
///
/// Zones sharing a name must be removed beforehand; if any remain, the first
/// one listed is used as parent.
pub fn resolve(zones: &[HostedZone]) -> DelegationMap {
    let mut by_child = BTreeMap::new();

    for child in zones {
        let parent = zones
            .iter()
            .filter(|p| !p.name.eq_ignore_ascii_case(&child.name))
            .filter_map(|p| strip_zone_suffix(&child.name, &p.name).map(|label| (p, label)))
            .fold(None::<(&HostedZone, &str)>, |best, candidate| match best {
                Some(b) if b.0.name.len() >= candidate.0.name.len() => Some(b),
                _ => Some(candidate),
            });

        if let Some((parent, label)) = parent {
            log::debug!("{} is delegated from {}", child.name, parent.name);
            by_child.insert(
                child.name.to_ascii_lowercase(),
                DelegationLink {
                    parent: parent.name.clone(),
                    parent_id: parent.id.clone(),
                    child: child.name.clone(),
                    child_id: child.id.clone(),
                    label: label.to_string(),
                },
            );
        }
    }

    DelegationMap { by_child }
}

impl DelegationMap {
    /// The zone this zone is delegated from.
    pub fn parent_of(&self, zone: &str) -> Option<&DelegationLink> {
        self.by_child.get(&zone.to_ascii_lowercase())
    }

    /// Zones delegated directly from this zone, sorted by name.
    pub fn children_of(&self, zone: &str) -> Vec<&DelegationLink> {
        self.by_child
            .values()
            .filter(|link| link.parent.eq_ignore_ascii_case(zone))
            .collect()
    }

    pub fn context_for(&self, zone: &str) -> DelegationContext<'_> {
        DelegationContext {
            parent: self.parent_of(zone),
            children: self.children_of(zone),
        }
    }

    pub fn is_delegated(&self, zone: &str) -> bool {
        self.parent_of(zone).is_some()
    }
}

// ============ Per-zone delegation facts ============

/// Parent-side facts of a delegated zone, gathered from live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentDelegation {
    pub parent_zone: String,
    pub parent_zone_id: String,
    /// Child name relative to the parent.
    pub label: String,
    /// TTL of the live NS record in the parent, or the default.
    pub ttl: u32,
    /// Whether the parent already holds the NS record (and so can be imported).
    pub live_record: bool,
    /// Live reusable delegation set of the child, if it has one.
    pub delegation_set_id: Option<String>,
}

/// Everything synthesis and import planning need to know about a zone's
/// place in the delegation graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDelegation {
    /// Set for a delegated zone.
    pub parent: Option<ParentDelegation>,
    /// Labels of zones delegated from this one.
    pub child_labels: Vec<String>,
}

/// TTL of a parent NS record that does not exist yet.
pub const DEFAULT_DELEGATION_TTL: u32 = 300;

impl ZoneDelegation {
    /// A root zone without delegated children.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether the zone's own records module manages `record`.
    ///
    /// The simple NS record at a delegated child's label belongs to the
    /// child's artifact instead.
    pub fn owns(&self, record: &Record) -> bool {
        !(record.record_type == RecordType::Ns
            && record.routing == RoutingPolicy::Simple
            && self
                .child_labels
                .iter()
                .any(|label| label.eq_ignore_ascii_case(&record.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordBody;
    use zonegen_provider::Visibility;

    fn zone(id: &str, name: &str) -> HostedZone {
        HostedZone {
            id: id.to_string(),
            name: name.to_string(),
            comment: String::new(),
            visibility: Visibility::Public,
            record_count: 2,
        }
    }

    #[test]
    fn detects_direct_child() {
        let zones = vec![
            zone("Z1", "test-zone.com"),
            zone("Z2", "subdomain.test-zone.com"),
        ];
        let map = resolve(&zones);

        assert!(map.parent_of("test-zone.com").is_none());
        let link = map.parent_of("subdomain.test-zone.com").unwrap();
        assert_eq!(link.parent, "test-zone.com");
        assert_eq!(link.parent_id, "Z1");
        assert_eq!(link.label, "subdomain");

        let children = map.children_of("test-zone.com");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child, "subdomain.test-zone.com");
    }

    #[test]
    fn string_suffix_is_not_delegation() {
        let zones = vec![zone("Z1", "example.com"), zone("Z2", "notexample.com")];
        let map = resolve(&zones);
        assert!(!map.is_delegated("notexample.com"));
        assert!(map.children_of("example.com").is_empty());
    }

    #[test]
    fn most_specific_parent_wins() {
        let zones = vec![
            zone("Z3", "a.b.example.com"),
            zone("Z1", "example.com"),
            zone("Z2", "b.example.com"),
        ];
        let map = resolve(&zones);

        let grandchild = map.parent_of("a.b.example.com").unwrap();
        assert_eq!(grandchild.parent, "b.example.com");
        assert_eq!(grandchild.label, "a");

        let child = map.parent_of("b.example.com").unwrap();
        assert_eq!(child.parent, "example.com");

        let ctx = map.context_for("b.example.com");
        assert_eq!(ctx.parent.map(|l| l.parent.as_str()), Some("example.com"));
        assert_eq!(ctx.children.len(), 1);
        assert_eq!(ctx.children[0].child, "a.b.example.com");
        assert_eq!(map.children_of("example.com").len(), 1);
    }

    #[test]
    fn multi_label_child_without_intermediate_zone() {
        let zones = vec![zone("Z1", "example.com"), zone("Z2", "x.y.example.com")];
        let map = resolve(&zones);
        assert_eq!(map.parent_of("x.y.example.com").unwrap().label, "x.y");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let zones = vec![zone("Z1", "example.com"), zone("Z2", "sub.example.com")];
        let map = resolve(&zones);
        assert!(map.is_delegated("SUB.example.com"));
        assert_eq!(map.children_of("Example.com").len(), 1);
    }

    fn ns(name: &str, routing: RoutingPolicy) -> Record {
        Record {
            fqdn: format!("{name}.example.com"),
            name: name.to_string(),
            record_type: RecordType::Ns,
            set_identifier: None,
            routing,
            body: RecordBody::Values {
                ttl: 300,
                values: vec!["ns-1.awsdns-01.org.".to_string()],
            },
            health_check_id: None,
        }
    }

    #[test]
    fn delegated_ns_is_owned_by_child() {
        let delegation = ZoneDelegation {
            parent: None,
            child_labels: vec!["sub".to_string()],
        };
        assert!(!delegation.owns(&ns("sub", RoutingPolicy::Simple)));
        assert!(delegation.owns(&ns("other", RoutingPolicy::Simple)));
        assert!(delegation.owns(&ns("sub", RoutingPolicy::Multivalue)));
        assert!(ZoneDelegation::root().owns(&ns("sub", RoutingPolicy::Simple)));
    }
}
