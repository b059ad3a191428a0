//! 共享测试工具和辅助函数

#![allow(dead_code)]

use wiremock::MockServer;
use zonegen_provider::{Route53Credentials, Route53Provider};

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Route 53 XML namespace used in every response body.
pub const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// Provider pointed at the mock server.
pub fn provider(server: &MockServer, max_retries: u32) -> Route53Provider {
    let credentials = Route53Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
    match Route53Provider::builder(credentials)
        .endpoint(server.uri())
        .max_retries(max_retries)
        .build()
    {
        Ok(p) => p,
        Err(e) => panic!("failed to build provider: {e}"),
    }
}

/// `<HostedZone>` element.
pub fn hosted_zone_xml(id: &str, name: &str, private: bool) -> String {
    format!(
        "<HostedZone><Id>/hostedzone/{id}</Id><Name>{name}.</Name><CallerReference>ref-{id}</CallerReference>\
         <Config><Comment>{name} zone</Comment><PrivateZone>{private}</PrivateZone></Config>\
         <ResourceRecordSetCount>3</ResourceRecordSetCount></HostedZone>"
    )
}

/// `ListHostedZonesResponse` body.
pub fn zones_page(zones: &[String], next_marker: Option<&str>) -> String {
    let tail = next_marker.map_or_else(
        || "<IsTruncated>false</IsTruncated>".to_string(),
        |m| format!("<IsTruncated>true</IsTruncated><NextMarker>{m}</NextMarker>"),
    );
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ListHostedZonesResponse xmlns="{XMLNS}"><HostedZones>{}</HostedZones>{tail}<MaxItems>100</MaxItems></ListHostedZonesResponse>"#,
        zones.concat()
    )
}

/// `ErrorResponse` body.
pub fn error_body(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><ErrorResponse xmlns="{XMLNS}"><Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error><RequestId>req-1</RequestId></ErrorResponse>"#
    )
}
