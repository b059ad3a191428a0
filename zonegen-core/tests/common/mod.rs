//! 测试辅助模块
//!
//! In-memory provider with call recording, plus record-set fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use zonegen_provider::{
    DelegationSet, DnsProvider, HostedZone, Page, ProviderError, RecordCursor, RecordSet, Result,
    Tags, Visibility, ZoneDetail,
};

const PROVIDER: &str = "mock";

// ===== Fixtures =====

/// One hosted zone served by [`MockProvider`].
#[derive(Debug, Clone)]
pub struct ZoneFixture {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub name_servers: Vec<String>,
    pub delegation_set_id: Option<String>,
    pub tags: Tags,
    pub records: Vec<RecordSet>,
}

impl ZoneFixture {
    /// A public zone holding only its apex NS and SOA records.
    pub fn new(id: &str, name: &str) -> Self {
        let name_servers = vec![
            format!("ns-{}.awsdns-01.org", id.to_ascii_lowercase()),
            format!("ns-{}.awsdns-02.com", id.to_ascii_lowercase()),
        ];
        let records = vec![
            record(name, "NS", 172_800, &[&name_servers[0], &name_servers[1]]),
            record(
                name,
                "SOA",
                900,
                &["ns-1.awsdns-01.org. awsdns-hostmaster.amazon.com. 1 7200 900 1209600 86400"],
            ),
        ];
        Self {
            id: id.to_string(),
            name: name.to_string(),
            comment: String::new(),
            name_servers,
            delegation_set_id: None,
            tags: Tags::new(),
            records,
        }
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn delegation_set(mut self, id: &str) -> Self {
        self.delegation_set_id = Some(id.to_string());
        self
    }

    pub fn record(mut self, record: RecordSet) -> Self {
        self.records.push(record);
        self
    }

    fn hosted_zone(&self) -> HostedZone {
        HostedZone {
            id: self.id.clone(),
            name: self.name.clone(),
            comment: self.comment.clone(),
            visibility: Visibility::Public,
            record_count: self.records.len() as u64,
        }
    }
}

/// A simple record set.
pub fn record(name: &str, record_type: &str, ttl: u32, values: &[&str]) -> RecordSet {
    RecordSet {
        name: name.to_string(),
        record_type: record_type.to_string(),
        ttl: Some(ttl),
        values: values.iter().map(|v| (*v).to_string()).collect(),
        ..Default::default()
    }
}

// ===== MockProvider =====

pub struct MockProvider {
    zones: Vec<ZoneFixture>,
    delegation_sets: Vec<DelegationSet>,
    /// Errors to return, keyed by `"<call> <zone id>"` or by the bare call name.
    failures: Mutex<HashMap<String, ProviderError>>,
    calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(zones: Vec<ZoneFixture>) -> Self {
        Self {
            zones,
            delegation_sets: Vec::new(),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delegation_set(mut self, id: &str, name_servers: &[&str]) -> Self {
        self.delegation_sets.push(DelegationSet {
            id: id.to_string(),
            caller_reference: Some(format!("ref-{id}")),
            name_servers: name_servers.iter().map(|n| (*n).to_string()).collect(),
        });
        self
    }

    /// Make `call` (optionally for one zone) fail with `error`.
    pub fn fail(self, call: &str, zone_id: Option<&str>, error: ProviderError) -> Self {
        let key = zone_id.map_or_else(|| call.to_string(), |id| format!("{call} {id}"));
        self.failures.lock().unwrap().insert(key, error);
        self
    }

    /// Recorded calls, in order, as `"<call> <zone id>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn enter(&self, call: &str, zone_id: Option<&str>) -> Result<()> {
        let key = zone_id.map_or_else(|| call.to_string(), |id| format!("{call} {id}"));
        self.calls.lock().unwrap().push(key.clone());
        let failures = self.failures.lock().unwrap();
        match failures.get(&key).or_else(|| failures.get(call)) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn zone(&self, zone_id: &str) -> Result<&ZoneFixture> {
        self.zones
            .iter()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| ProviderError::HostedZoneNotFound {
                provider: PROVIDER.to_string(),
                zone_id: zone_id.to_string(),
                raw_message: None,
            })
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn list_zones_page(&self, _marker: Option<&str>) -> Result<Page<HostedZone>> {
        self.enter("list_zones", None)?;
        Ok(Page::last(
            self.zones.iter().map(ZoneFixture::hosted_zone).collect(),
        ))
    }

    async fn list_records_page(
        &self,
        zone_id: &str,
        _cursor: Option<&RecordCursor>,
    ) -> Result<Page<RecordSet, RecordCursor>> {
        self.enter("list_records", Some(zone_id))?;
        Ok(Page::last(self.zone(zone_id)?.records.clone()))
    }

    async fn list_delegation_sets_page(
        &self,
        _marker: Option<&str>,
    ) -> Result<Page<DelegationSet>> {
        self.enter("list_delegation_sets", None)?;
        Ok(Page::last(self.delegation_sets.clone()))
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail> {
        self.enter("get_zone", Some(zone_id))?;
        let zone = self.zone(zone_id)?;
        Ok(ZoneDetail {
            zone: zone.hosted_zone(),
            name_servers: zone.name_servers.clone(),
            delegation_set_id: zone.delegation_set_id.clone(),
        })
    }

    async fn list_tags(&self, zone_id: &str) -> Result<Tags> {
        self.enter("list_tags", Some(zone_id))?;
        Ok(self.zone(zone_id)?.tags.clone())
    }
}

pub fn invalid_credentials() -> ProviderError {
    ProviderError::InvalidCredentials {
        provider: PROVIDER.to_string(),
        raw_message: Some("The security token included in the request is invalid".to_string()),
    }
}
