//! Route 53 API XML response types
//!
//! Field names follow the `2013-04-01` API documents. List wrappers are
//! optional so that both missing and empty elements decode.

use serde::Deserialize;

// ============ Hosted zones ============

/// Response payload for `ListHostedZones`.
#[derive(Debug, Deserialize)]
pub struct ListHostedZonesResponse {
    #[serde(rename = "HostedZones")]
    pub hosted_zones: Option<HostedZoneList>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker")]
    pub next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HostedZoneList {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<XmlHostedZone>,
}

/// Hosted zone element shared by list and get responses.
#[derive(Debug, Deserialize)]
pub struct XmlHostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Config")]
    pub config: Option<HostedZoneConfig>,
    #[serde(rename = "ResourceRecordSetCount")]
    pub resource_record_set_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct HostedZoneConfig {
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone", default)]
    pub private_zone: bool,
}

/// Response payload for `GetHostedZone`.
#[derive(Debug, Deserialize)]
pub struct GetHostedZoneResponse {
    #[serde(rename = "HostedZone")]
    pub hosted_zone: XmlHostedZone,
    #[serde(rename = "DelegationSet")]
    pub delegation_set: Option<XmlDelegationSet>,
}

// ============ Delegation sets ============

/// Delegation set element. `Id` is only present for reusable sets.
#[derive(Debug, Deserialize)]
pub struct XmlDelegationSet {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "CallerReference")]
    pub caller_reference: Option<String>,
    #[serde(rename = "NameServers")]
    pub name_servers: Option<NameServerList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameServerList {
    #[serde(rename = "NameServer", default)]
    pub items: Vec<String>,
}

/// Response payload for `ListReusableDelegationSets`.
#[derive(Debug, Deserialize)]
pub struct ListDelegationSetsResponse {
    #[serde(rename = "DelegationSets")]
    pub delegation_sets: Option<DelegationSetList>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker")]
    pub next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DelegationSetList {
    #[serde(rename = "DelegationSet", default)]
    pub items: Vec<XmlDelegationSet>,
}

// ============ Record sets ============

/// Response payload for `ListResourceRecordSets`.
#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    pub resource_record_sets: Option<ResourceRecordSetList>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextRecordName")]
    pub next_record_name: Option<String>,
    #[serde(rename = "NextRecordType")]
    pub next_record_type: Option<String>,
    #[serde(rename = "NextRecordIdentifier")]
    pub next_record_identifier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordSetList {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<XmlResourceRecordSet>,
}

#[derive(Debug, Deserialize)]
pub struct XmlResourceRecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "SetIdentifier")]
    pub set_identifier: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<u64>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "GeoLocation")]
    pub geo_location: Option<XmlGeoLocation>,
    #[serde(rename = "Failover")]
    pub failover: Option<String>,
    #[serde(rename = "MultiValueAnswer")]
    pub multi_value_answer: Option<bool>,
    #[serde(rename = "TTL")]
    pub ttl: Option<u32>,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: Option<ResourceRecordList>,
    #[serde(rename = "AliasTarget")]
    pub alias_target: Option<XmlAliasTarget>,
    #[serde(rename = "HealthCheckId")]
    pub health_check_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordList {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<XmlResourceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct XmlResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct XmlAliasTarget {
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth", default)]
    pub evaluate_target_health: bool,
}

#[derive(Debug, Deserialize)]
pub struct XmlGeoLocation {
    #[serde(rename = "ContinentCode")]
    pub continent_code: Option<String>,
    #[serde(rename = "CountryCode")]
    pub country_code: Option<String>,
    #[serde(rename = "SubdivisionCode")]
    pub subdivision_code: Option<String>,
}

// ============ Tags ============

/// Response payload for `ListTagsForResource`.
#[derive(Debug, Deserialize)]
pub struct ListTagsForResourceResponse {
    #[serde(rename = "ResourceTagSet")]
    pub resource_tag_set: ResourceTagSet,
}

#[derive(Debug, Deserialize)]
pub struct ResourceTagSet {
    #[serde(rename = "Tags")]
    pub tags: Option<TagList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagList {
    #[serde(rename = "Tag", default)]
    pub items: Vec<XmlTag>,
}

#[derive(Debug, Deserialize)]
pub struct XmlTag {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

// ============ Errors ============

/// Error payload returned by the Route 53 API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpUtils;

    #[test]
    fn decode_list_hosted_zones() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListHostedZonesResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <HostedZones>
    <HostedZone>
      <Id>/hostedzone/Z111</Id>
      <Name>example.com.</Name>
      <CallerReference>ref-1</CallerReference>
      <Config><Comment>main zone</Comment><PrivateZone>false</PrivateZone></Config>
      <ResourceRecordSetCount>5</ResourceRecordSetCount>
    </HostedZone>
    <HostedZone>
      <Id>/hostedzone/Z222</Id>
      <Name>internal.example.com.</Name>
      <CallerReference>ref-2</CallerReference>
      <Config><PrivateZone>true</PrivateZone></Config>
      <ResourceRecordSetCount>2</ResourceRecordSetCount>
    </HostedZone>
  </HostedZones>
  <IsTruncated>true</IsTruncated>
  <NextMarker>Z333</NextMarker>
  <MaxItems>2</MaxItems>
</ListHostedZonesResponse>"#;
        let resp: ListHostedZonesResponse = HttpUtils::parse_xml(xml, "test").unwrap();
        let zones = resp.hosted_zones.unwrap_or_default().items;
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, "/hostedzone/Z111");
        let config = zones[0].config.as_ref().unwrap();
        assert_eq!(config.comment.as_deref(), Some("main zone"));
        assert!(!config.private_zone);
        assert!(zones[1].config.as_ref().unwrap().private_zone);
        assert!(resp.is_truncated);
        assert_eq!(resp.next_marker.as_deref(), Some("Z333"));
    }

    #[test]
    fn decode_empty_zone_listing() {
        let xml = r"<ListHostedZonesResponse><HostedZones/><IsTruncated>false</IsTruncated></ListHostedZonesResponse>";
        let resp: ListHostedZonesResponse = HttpUtils::parse_xml(xml, "test").unwrap();
        assert!(resp.hosted_zones.unwrap_or_default().items.is_empty());
        assert!(!resp.is_truncated);
    }

    #[test]
    fn decode_record_sets_with_alias_and_routing() {
        let xml = r#"<ListResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ResourceRecordSets>
    <ResourceRecordSet>
      <Name>example.com.</Name>
      <Type>MX</Type>
      <TTL>300</TTL>
      <ResourceRecords>
        <ResourceRecord><Value>10 mail1.example.com</Value></ResourceRecord>
        <ResourceRecord><Value>20 mail2.example.com</Value></ResourceRecord>
      </ResourceRecords>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>api.example.com.</Name>
      <Type>A</Type>
      <SetIdentifier>eu</SetIdentifier>
      <GeoLocation><ContinentCode>EU</ContinentCode></GeoLocation>
      <AliasTarget>
        <HostedZoneId>Z2FDTNDATAQYW2</HostedZoneId>
        <DNSName>d111.cloudfront.net.</DNSName>
        <EvaluateTargetHealth>true</EvaluateTargetHealth>
      </AliasTarget>
      <HealthCheckId>hc-1</HealthCheckId>
    </ResourceRecordSet>
  </ResourceRecordSets>
  <IsTruncated>true</IsTruncated>
  <NextRecordName>b.example.com.</NextRecordName>
  <NextRecordType>A</NextRecordType>
  <NextRecordIdentifier>blue</NextRecordIdentifier>
  <MaxItems>2</MaxItems>
</ListResourceRecordSetsResponse>"#;
        let resp: ListResourceRecordSetsResponse = HttpUtils::parse_xml(xml, "test").unwrap();
        let sets = resp.resource_record_sets.unwrap_or_default().items;
        assert_eq!(sets.len(), 2);

        let mx = &sets[0];
        assert_eq!(mx.ttl, Some(300));
        let values: Vec<_> = mx
            .resource_records
            .as_ref()
            .unwrap()
            .items
            .iter()
            .map(|r| r.value.as_str())
            .collect();
        assert_eq!(values, ["10 mail1.example.com", "20 mail2.example.com"]);

        let alias = &sets[1];
        assert!(alias.ttl.is_none());
        assert_eq!(alias.set_identifier.as_deref(), Some("eu"));
        assert_eq!(
            alias.geo_location.as_ref().unwrap().continent_code.as_deref(),
            Some("EU")
        );
        let target = alias.alias_target.as_ref().unwrap();
        assert_eq!(target.dns_name, "d111.cloudfront.net.");
        assert!(target.evaluate_target_health);
        assert_eq!(alias.health_check_id.as_deref(), Some("hc-1"));

        assert_eq!(resp.next_record_name.as_deref(), Some("b.example.com."));
        assert_eq!(resp.next_record_identifier.as_deref(), Some("blue"));
    }

    #[test]
    fn decode_get_hosted_zone_with_reusable_set() {
        let xml = r"<GetHostedZoneResponse>
  <HostedZone>
    <Id>/hostedzone/Z111</Id>
    <Name>sub.example.com.</Name>
    <Config><PrivateZone>false</PrivateZone></Config>
  </HostedZone>
  <DelegationSet>
    <Id>/delegationset/N1</Id>
    <NameServers>
      <NameServer>ns-1.awsdns-01.org</NameServer>
      <NameServer>ns-2.awsdns-02.com</NameServer>
    </NameServers>
  </DelegationSet>
</GetHostedZoneResponse>";
        let resp: GetHostedZoneResponse = HttpUtils::parse_xml(xml, "test").unwrap();
        let set = resp.delegation_set.unwrap();
        assert_eq!(set.id.as_deref(), Some("/delegationset/N1"));
        assert_eq!(
            set.name_servers.unwrap_or_default().items,
            ["ns-1.awsdns-01.org", "ns-2.awsdns-02.com"]
        );
    }

    #[test]
    fn decode_tags_and_error() {
        let xml = r"<ListTagsForResourceResponse>
  <ResourceTagSet>
    <ResourceType>hostedzone</ResourceType>
    <ResourceId>Z111</ResourceId>
    <Tags>
      <Tag><Key>Purpose</Key><Value>testing</Value></Tag>
      <Tag><Key>Owner</Key></Tag>
    </Tags>
  </ResourceTagSet>
</ListTagsForResourceResponse>";
        let resp: ListTagsForResourceResponse = HttpUtils::parse_xml(xml, "test").unwrap();
        let tags = resp.resource_tag_set.tags.unwrap_or_default().items;
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].key, "Purpose");
        assert!(tags[1].value.is_none());

        let err = r"<ErrorResponse><Error><Type>Sender</Type><Code>Throttling</Code><Message>Rate exceeded</Message></Error><RequestId>r-1</RequestId></ErrorResponse>";
        let resp: ErrorResponse = HttpUtils::parse_xml(err, "test").unwrap();
        assert_eq!(resp.error.code.as_deref(), Some("Throttling"));
        assert_eq!(resp.error.message.as_deref(), Some("Rate exceeded"));
    }
}
