//! Route 53 `DnsProvider` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::{normalize_domain_name, strip_resource_prefix};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    AliasTarget, DelegationSet, GeoLocation, HostedZone, Page, RecordCursor, RecordSet, Tags,
    Visibility, ZoneDetail,
};

use super::Route53Provider;
use super::types::{
    GetHostedZoneResponse, ListDelegationSetsResponse, ListHostedZonesResponse,
    ListResourceRecordSetsResponse, ListTagsForResourceResponse, XmlDelegationSet, XmlHostedZone,
    XmlResourceRecordSet,
};

const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";
const DELEGATION_SET_PREFIX: &str = "/delegationset/";

impl Route53Provider {
    fn convert_zone(zone: XmlHostedZone) -> HostedZone {
        let (comment, private) = zone
            .config
            .map_or((String::new(), false), |c| {
                (c.comment.unwrap_or_default(), c.private_zone)
            });

        HostedZone {
            id: strip_resource_prefix(&zone.id, HOSTED_ZONE_PREFIX).to_string(),
            name: normalize_domain_name(&zone.name),
            comment,
            visibility: if private {
                Visibility::Private
            } else {
                Visibility::Public
            },
            record_count: zone.resource_record_set_count.unwrap_or(0),
        }
    }

    /// 仅可复用的 delegation set 带有 Id
    fn convert_delegation_set(set: XmlDelegationSet) -> Option<DelegationSet> {
        let id = set.id?;
        Some(DelegationSet {
            id: strip_resource_prefix(&id, DELEGATION_SET_PREFIX).to_string(),
            caller_reference: set.caller_reference,
            name_servers: set.name_servers.unwrap_or_default().items,
        })
    }

    fn convert_record_set(set: XmlResourceRecordSet) -> RecordSet {
        RecordSet {
            name: normalize_domain_name(&set.name),
            record_type: set.record_type,
            set_identifier: set.set_identifier,
            weight: set.weight,
            region: set.region,
            geo_location: set.geo_location.map(|g| GeoLocation {
                continent_code: g.continent_code,
                country_code: g.country_code,
                subdivision_code: g.subdivision_code,
            }),
            failover: set.failover,
            multi_value_answer: set.multi_value_answer,
            ttl: set.ttl,
            values: set
                .resource_records
                .unwrap_or_default()
                .items
                .into_iter()
                .map(|r| r.value)
                .collect(),
            alias_target: set.alias_target.map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id,
                dns_name: normalize_domain_name(&a.dns_name),
                evaluate_target_health: a.evaluate_target_health,
            }),
            health_check_id: set.health_check_id,
        }
    }

    /// A truncated page must name where to continue.
    fn next_marker(&self, is_truncated: bool, marker: Option<String>) -> Result<Option<String>> {
        match (is_truncated, marker) {
            (false, _) => Ok(None),
            (true, Some(m)) => Ok(Some(m)),
            (true, None) => Err(self.parse_error("truncated listing without NextMarker")),
        }
    }

    fn zone_context(zone_id: &str) -> ErrorContext {
        ErrorContext {
            zone_id: Some(zone_id.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    fn id(&self) -> &'static str {
        self.provider_name()
    }

    async fn list_zones_page(&self, marker: Option<&str>) -> Result<Page<HostedZone>> {
        let mut params = Vec::new();
        if let Some(m) = marker {
            params.push(("marker", m.to_string()));
        }
        let ctx = ErrorContext {
            param: Some("marker".to_string()),
            ..Default::default()
        };

        let response: ListHostedZonesResponse = self
            .get(&Self::api_path("hostedzone"), &params, ctx)
            .await?;

        Ok(Page {
            next: self.next_marker(response.is_truncated, response.next_marker)?,
            items: response
                .hosted_zones
                .unwrap_or_default()
                .items
                .into_iter()
                .map(Self::convert_zone)
                .collect(),
        })
    }

    async fn list_records_page(
        &self,
        zone_id: &str,
        cursor: Option<&RecordCursor>,
    ) -> Result<Page<RecordSet, RecordCursor>> {
        let mut params = Vec::new();
        if let Some(c) = cursor {
            params.push(("name", c.name.clone()));
            params.push(("type", c.record_type.clone()));
            if let Some(identifier) = &c.identifier {
                params.push(("identifier", identifier.clone()));
            }
        }

        let path = Self::api_path(&format!("hostedzone/{zone_id}/rrset"));
        let response: ListResourceRecordSetsResponse =
            self.get(&path, &params, Self::zone_context(zone_id)).await?;

        let next = if response.is_truncated {
            match (response.next_record_name, response.next_record_type) {
                (Some(name), Some(record_type)) => Some(RecordCursor {
                    name,
                    record_type,
                    identifier: response.next_record_identifier,
                }),
                _ => {
                    return Err(
                        self.parse_error("truncated record listing without NextRecordName/Type")
                    );
                }
            }
        } else {
            None
        };

        Ok(Page {
            items: response
                .resource_record_sets
                .unwrap_or_default()
                .items
                .into_iter()
                .map(Self::convert_record_set)
                .collect(),
            next,
        })
    }

    async fn list_delegation_sets_page(
        &self,
        marker: Option<&str>,
    ) -> Result<Page<DelegationSet>> {
        let mut params = Vec::new();
        if let Some(m) = marker {
            params.push(("marker", m.to_string()));
        }
        let ctx = ErrorContext {
            param: Some("marker".to_string()),
            ..Default::default()
        };

        let response: ListDelegationSetsResponse = self
            .get(&Self::api_path("delegationset"), &params, ctx)
            .await?;

        Ok(Page {
            next: self.next_marker(response.is_truncated, response.next_marker)?,
            items: response
                .delegation_sets
                .unwrap_or_default()
                .items
                .into_iter()
                .filter_map(Self::convert_delegation_set)
                .collect(),
        })
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail> {
        let path = Self::api_path(&format!("hostedzone/{zone_id}"));
        let response: GetHostedZoneResponse =
            self.get(&path, &[], Self::zone_context(zone_id)).await?;

        let (name_servers, delegation_set_id) = match response.delegation_set {
            Some(set) => (
                set.name_servers.unwrap_or_default().items,
                set.id
                    .map(|id| strip_resource_prefix(&id, DELEGATION_SET_PREFIX).to_string()),
            ),
            None => (Vec::new(), None),
        };

        Ok(ZoneDetail {
            zone: Self::convert_zone(response.hosted_zone),
            name_servers,
            delegation_set_id,
        })
    }

    async fn list_tags(&self, zone_id: &str) -> Result<Tags> {
        let path = Self::api_path(&format!("tags/hostedzone/{zone_id}"));
        let response: ListTagsForResourceResponse =
            self.get(&path, &[], Self::zone_context(zone_id)).await?;

        Ok(response
            .resource_tag_set
            .tags
            .unwrap_or_default()
            .items
            .into_iter()
            .map(|t| (t.key, t.value.unwrap_or_default()))
            .collect())
    }
}
