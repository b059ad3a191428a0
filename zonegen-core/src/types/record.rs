use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use zonegen_provider::{AliasTarget, GeoLocation};

// ============ Record type ============

/// Record types the generator manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Ds,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Soa,
    Spf,
    Srv,
    Txt,
}

impl RecordType {
    /// Every supported type.
    pub const ALL: [Self; 13] = [
        Self::A,
        Self::Aaaa,
        Self::Caa,
        Self::Cname,
        Self::Ds,
        Self::Mx,
        Self::Naptr,
        Self::Ns,
        Self::Ptr,
        Self::Soa,
        Self::Spf,
        Self::Srv,
        Self::Txt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Ds => "DS",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Spf => "SPF",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }

    /// Types whose values are character-strings stored with surrounding quotes.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Txt | Self::Spf)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`RecordType::from_str`] for types outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnsupportedRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedRecordType(s.to_string()))
    }
}

// ============ Routing ============

/// Failover role of a failover routing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FailoverRole {
    Primary,
    Secondary,
}

impl FailoverRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
        }
    }
}

/// How Route 53 chooses between record sets sharing a name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum RoutingPolicy {
    /// No policy; the record set is unique for its name and type.
    Simple,
    Weighted { weight: u64 },
    Latency { region: String },
    Failover { role: FailoverRole },
    Geolocation { location: GeoLocation },
    Multivalue,
}

// ============ Record ============

/// Payload of a record: plain values or an alias target, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordBody {
    Values { ttl: u32, values: Vec<String> },
    Alias(AliasTarget),
}

/// A classified record of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Fully-qualified name as the provider reports it, without the trailing
    /// dot and with octal escapes untouched.
    pub fqdn: String,
    /// Name relative to the zone with escapes decoded; empty at the apex.
    pub name: String,
    pub record_type: RecordType,
    /// Present exactly when `routing` is not [`RoutingPolicy::Simple`].
    pub set_identifier: Option<String>,
    pub routing: RoutingPolicy,
    pub body: RecordBody,
    pub health_check_id: Option<String>,
}

impl Record {
    /// Key of the record inside a records module: `"<name> <TYPE>"`, followed
    /// by the set identifier for routing-policy records.
    pub fn key(&self) -> String {
        match &self.set_identifier {
            Some(id) => format!("{} {} {id}", self.name, self.record_type),
            None => format!("{} {}", self.name, self.record_type),
        }
    }

    /// Provider import id: `<zoneId>_<fqdn>_<TYPE>[_<set identifier>]`.
    pub fn import_id(&self, zone_id: &str) -> String {
        let mut id = format!("{zone_id}_{}_{}", self.fqdn, self.record_type);
        if let Some(set) = &self.set_identifier {
            id.push('_');
            id.push_str(set);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, set_identifier: Option<&str>) -> Record {
        Record {
            fqdn: if name.is_empty() {
                "example.com".to_string()
            } else {
                format!("{name}.example.com")
            },
            name: name.to_string(),
            record_type: RecordType::A,
            set_identifier: set_identifier.map(str::to_string),
            routing: set_identifier.map_or(RoutingPolicy::Simple, |_| RoutingPolicy::Weighted {
                weight: 10,
            }),
            body: RecordBody::Values {
                ttl: 60,
                values: vec!["192.0.2.1".to_string()],
            },
            health_check_id: None,
        }
    }

    #[test]
    fn record_type_parses_allow_list_only() {
        assert_eq!("aaaa".parse::<RecordType>(), Ok(RecordType::Aaaa));
        assert_eq!("TXT".parse::<RecordType>(), Ok(RecordType::Txt));
        assert_eq!(
            "HTTPS".parse::<RecordType>(),
            Err(UnsupportedRecordType("HTTPS".to_string()))
        );
        for t in RecordType::ALL {
            assert_eq!(t.as_str().parse::<RecordType>(), Ok(t));
        }
    }

    #[test]
    fn key_includes_set_identifier() {
        assert_eq!(record("", None).key(), " A");
        assert_eq!(record("www", None).key(), "www A");
        assert_eq!(record("api", Some("blue")).key(), "api A blue");
    }

    #[test]
    fn import_id_uses_raw_fqdn() {
        assert_eq!(record("", None).import_id("Z1"), "Z1_example.com_A");
        assert_eq!(
            record("api", Some("blue")).import_id("Z1"),
            "Z1_api.example.com_A_blue"
        );
    }
}
