//! Route 53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//!
//! ## 错误码分类
//!
//! - **限流 (4)**：Throttling, ThrottlingException, PriorRequestNotComplete, RequestLimitExceeded
//! - **认证错误 (6)**：InvalidClientTokenId, SignatureDoesNotMatch, ExpiredToken,
//!   IncompleteSignature, MissingAuthenticationToken, UnrecognizedClientException
//! - **权限拒绝 (2)**：AccessDenied, AccessDeniedException
//! - **Zone 不存在 (1)**：NoSuchHostedZone
//! - **参数错误 (2)**：InvalidInput, InvalidPaginationToken
//! - **服务端错误 (2)**：InternalFailure, ServiceUnavailable
//!
//! 只读 API 不会出现的写操作错误码（InvalidChangeBatch 等）fallback 到 Unknown。

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{Route53Provider, SERVICE_NAME};

impl ProviderErrorMapper for Route53Provider {
    fn provider_name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 限流 ============
            Some(
                "Throttling"
                | "ThrottlingException"
                | "PriorRequestNotComplete"
                | "RequestLimitExceeded",
            ) => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // ============ 认证错误 ============
            Some(
                "InvalidClientTokenId"
                | "SignatureDoesNotMatch"
                | "ExpiredToken"
                | "IncompleteSignature"
                | "MissingAuthenticationToken"
                | "UnrecognizedClientException",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 权限拒绝 ============
            Some("AccessDenied" | "AccessDeniedException") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ Zone 不存在 ============
            Some("NoSuchHostedZone") => ProviderError::HostedZoneNotFound {
                provider: self.provider_name().to_string(),
                zone_id: context.zone_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 参数无效 ============
            Some("InvalidInput" | "InvalidPaginationToken") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.param.unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            // ============ 服务端错误 ============
            Some("InternalFailure" | "ServiceUnavailable") => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            // ============ 其他错误 fallback ============
            _ => self.unknown_error(raw),
        }
    }
}
