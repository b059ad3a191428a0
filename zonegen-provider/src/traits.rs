use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    DelegationSet, HostedZone, Page, RecordCursor, RecordSet, Tags, Visibility, ZoneDetail,
    ZoneScope,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Hosted zone id (用于 `HostedZoneNotFound`)
    pub zone_id: Option<String>,
    /// 请求参数名（用于 `InvalidParameter`）
    pub param: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Read-only DNS provider.
///
/// Implementors supply the page-level calls; the flattened listings are
/// provided and follow continuation cursors until exhaustion, so nothing
/// above this trait ever handles a cursor.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// One page of hosted zones, private zones included.
    async fn list_zones_page(&self, marker: Option<&str>) -> Result<Page<HostedZone>>;

    /// One page of record sets of a zone.
    async fn list_records_page(
        &self,
        zone_id: &str,
        cursor: Option<&RecordCursor>,
    ) -> Result<Page<RecordSet, RecordCursor>>;

    /// One page of reusable delegation sets.
    async fn list_delegation_sets_page(&self, marker: Option<&str>)
    -> Result<Page<DelegationSet>>;

    /// Zone details including nameservers and delegation set.
    async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail>;

    /// Tags attached to a hosted zone.
    async fn list_tags(&self, zone_id: &str) -> Result<Tags>;

    /// All public hosted zones within `scope`, in listing order.
    async fn list_zones(&self, scope: &ZoneScope) -> Result<Vec<HostedZone>> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_zones_page(marker.as_deref()).await?;
            zones.extend(page.items);
            match page.next {
                Some(next) if marker.as_deref() == Some(next.as_str()) => {
                    return Err(stalled_cursor(self.id(), "marker"));
                }
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        let total = zones.len();
        zones.retain(|z| z.visibility == Visibility::Public);
        if zones.len() < total {
            log::debug!(
                "[{}] Ignoring {} private zone(s)",
                self.id(),
                total - zones.len()
            );
        }

        scope.select(&zones, self.id())
    }

    /// Every record set of a zone, in listing order.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let mut records = Vec::new();
        let mut cursor: Option<RecordCursor> = None;

        loop {
            let page = self.list_records_page(zone_id, cursor.as_ref()).await?;
            records.extend(page.items);
            match page.next {
                Some(next) if cursor.as_ref() == Some(&next) => {
                    return Err(stalled_cursor(self.id(), "record cursor"));
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Every reusable delegation set in the account.
    async fn list_delegation_sets(&self) -> Result<Vec<DelegationSet>> {
        let mut sets = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_delegation_sets_page(marker.as_deref()).await?;
            sets.extend(page.items);
            match page.next {
                Some(next) if marker.as_deref() == Some(next.as_str()) => {
                    return Err(stalled_cursor(self.id(), "marker"));
                }
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(sets)
    }
}

fn stalled_cursor(provider: &str, what: &str) -> ProviderError {
    ProviderError::ParseError {
        provider: provider.to_string(),
        detail: format!("pagination {what} did not advance"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves fixed pages and records the cursors it was asked for.
    struct PagedProvider {
        zone_pages: Vec<Page<HostedZone>>,
        record_pages: Vec<Page<RecordSet, RecordCursor>>,
        seen_markers: Mutex<Vec<Option<String>>>,
    }

    fn zone(id: &str, name: &str, visibility: Visibility) -> HostedZone {
        HostedZone {
            id: id.to_string(),
            name: name.to_string(),
            comment: String::new(),
            visibility,
            record_count: 0,
        }
    }

    fn record(name: &str) -> RecordSet {
        RecordSet {
            name: name.to_string(),
            record_type: "A".to_string(),
            ttl: Some(300),
            values: vec!["192.0.2.1".to_string()],
            ..Default::default()
        }
    }

    #[async_trait]
    impl DnsProvider for PagedProvider {
        fn id(&self) -> &'static str {
            "paged"
        }

        async fn list_zones_page(&self, marker: Option<&str>) -> Result<Page<HostedZone>> {
            if let Ok(mut seen) = self.seen_markers.lock() {
                seen.push(marker.map(str::to_string));
            }
            let index = marker.map_or(0, |m| m.parse::<usize>().unwrap_or(0));
            Ok(self.zone_pages[index].clone())
        }

        async fn list_records_page(
            &self,
            _zone_id: &str,
            cursor: Option<&RecordCursor>,
        ) -> Result<Page<RecordSet, RecordCursor>> {
            let index = cursor.map_or(0, |c| c.name.parse::<usize>().unwrap_or(0));
            Ok(self.record_pages[index].clone())
        }

        async fn list_delegation_sets_page(
            &self,
            _marker: Option<&str>,
        ) -> Result<Page<DelegationSet>> {
            Ok(Page::last(Vec::new()))
        }

        async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail> {
            Err(ProviderError::HostedZoneNotFound {
                provider: "paged".to_string(),
                zone_id: zone_id.to_string(),
                raw_message: None,
            })
        }

        async fn list_tags(&self, _zone_id: &str) -> Result<Tags> {
            Ok(Tags::new())
        }
    }

    fn provider() -> PagedProvider {
        PagedProvider {
            zone_pages: vec![
                Page {
                    items: vec![
                        zone("Z1", "a.com", Visibility::Public),
                        zone("Z2", "internal.a.com", Visibility::Private),
                    ],
                    next: Some("1".to_string()),
                },
                Page::last(vec![zone("Z3", "b.com", Visibility::Public)]),
            ],
            record_pages: vec![
                Page {
                    items: vec![record("a.com"), record("www.a.com")],
                    next: Some(RecordCursor {
                        name: "1".to_string(),
                        record_type: "A".to_string(),
                        identifier: None,
                    }),
                },
                Page::last(vec![record("zz.a.com")]),
            ],
            seen_markers: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn list_zones_follows_markers_and_drops_private() {
        let p = provider();
        let zones = p.list_zones(&ZoneScope::All).await.unwrap();
        let ids: Vec<_> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, ["Z1", "Z3"]);

        let seen = p.seen_markers.lock().unwrap().clone();
        assert_eq!(seen, vec![None, Some("1".to_string())]);
    }

    #[tokio::test]
    async fn list_zones_private_zone_is_not_selectable() {
        let p = provider();
        let result = p
            .list_zones(&ZoneScope::Single("internal.a.com".to_string()))
            .await;
        assert!(matches!(result, Err(ProviderError::DomainNotFound { .. })));
    }

    #[tokio::test]
    async fn list_records_preserves_order_across_pages() {
        let p = provider();
        let records = p.list_records("Z1").await.unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a.com", "www.a.com", "zz.a.com"]);
    }

    #[tokio::test]
    async fn list_zones_stalled_marker_is_an_error() {
        let p = PagedProvider {
            zone_pages: vec![
                Page {
                    items: vec![],
                    next: Some("1".to_string()),
                },
                Page {
                    items: vec![],
                    next: Some("1".to_string()),
                },
            ],
            record_pages: vec![],
            seen_markers: Mutex::new(Vec::new()),
        };
        let result = p.list_zones(&ZoneScope::All).await;
        assert!(matches!(result, Err(ProviderError::ParseError { .. })));
    }
}
