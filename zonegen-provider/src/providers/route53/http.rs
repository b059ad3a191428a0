//! Route 53 HTTP 请求方法

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::sign::{SigningInput, canonical_query_string};
use super::types::ErrorResponse;
use super::{API_VERSION, Route53Provider};

impl Route53Provider {
    // ==================== 辅助方法 ====================

    /// 统一处理 Route 53 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: &ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 尝试解析结构化错误
        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            return Err(self.map_error(
                RawApiError::with_code(
                    error.error.code.unwrap_or_default(),
                    error.error.message.unwrap_or_default(),
                ),
                ctx.clone(),
            ));
        }

        // 回退到通用错误
        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {status}: {}",
            truncate_for_log(response_text)
        ))))
    }

    /// Full API path for a resource below the version segment.
    pub(crate) fn api_path(resource: &str) -> String {
        format!("/{API_VERSION}/{resource}")
    }

    // ==================== 公开 API 方法 ====================

    /// 执行签名 GET 请求并解析 XML 响应
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let query = canonical_query_string(params);
        let signed = self.sign(&SigningInput {
            method: "GET",
            host: &self.host,
            path,
            query: &query,
            payload: "",
            timestamp: Utc::now(),
        });

        let url = if query.is_empty() {
            format!("{}{path}", self.endpoint)
        } else {
            format!("{}{path}?{query}", self.endpoint)
        };

        let mut request = self
            .client
            .get(&url)
            .header("Host", &self.host)
            .header("X-Amz-Date", &signed.amz_date)
            .header("Authorization", signed.authorization);
        if let Some(token) = &self.credentials.session_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let (_, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            &url,
            self.max_retries,
            |status, body| self.handle_response_error(status, body, &ctx),
        )
        .await?;

        HttpUtils::parse_xml(&response_text, self.provider_name())
    }
}
