//! # 换脸接口客户端
//!
//! ## 设计思路
//!
//! 只负责“一个请求体 → 一次 POST → 图片字节”。源图必须已经是公网地址，
//! 内联数据在这里直接拒绝，避免把大体积 Base64 发给远端。
//!
//! ## 实现思路
//!
//! - 请求体按远端字段名序列化为 JSON，key 放在 `x-api-key` 头（标记为敏感）。
//! - 非 2xx：正文若是带 `error` 字符串的 JSON 则透传，否则回退通用文案。
//! - 成功：整段响应体即图片；MIME 优先取响应头，其次按签名识别。

use std::future::Future;
use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use serde::Deserialize;

use super::codec;
use super::source::{TransformRequest, TransformResult};
use super::{SwapConfig, SwapError};

pub const TRANSFORM_FAILED_MESSAGE: &str = "Failed to perform face swap";

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// 换脸服务抽象。
pub trait FaceSwapApi {
    fn swap(
        &self,
        request: &TransformRequest,
    ) -> impl Future<Output = Result<TransformResult, SwapError>> + Send;
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Segmind faceswap 客户端。
#[derive(Debug, Clone)]
pub struct SegmindClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: HeaderValue,
}

impl SegmindClient {
    pub fn new(config: &SwapConfig) -> Result<Self, SwapError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SwapError::from_reqwest)?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: reqwest::Client, config: &SwapConfig) -> Result<Self, SwapError> {
        let endpoint = config.transform_endpoint_url()?;
        let mut api_key = HeaderValue::from_str(config.require_transform_key()?)
            .map_err(|_| SwapError::Config("Face swap API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl FaceSwapApi for SegmindClient {
    async fn swap(&self, request: &TransformRequest) -> Result<TransformResult, SwapError> {
        if request.has_inline_source() {
            return Err(SwapError::Unexpected(
                "Source image must be uploaded before requesting a face swap".to_string(),
            ));
        }

        let started = Instant::now();
        log::info!(
            "🎅 发起换脸请求 - 目标: {} 修复模型: {}",
            request.target_img,
            request.face_restore
        );
        log::debug!("换脸请求体: {:?}", request);

        let body = serde_json::to_vec(request)
            .map_err(|e| SwapError::Unexpected(format!("Could not encode request: {}", e)))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, self.api_key.clone())
            .body(body)
            .send()
            .await
            .map_err(SwapError::from_reqwest)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
        let payload = response.bytes().await.map_err(SwapError::from_reqwest)?;

        if !status.is_success() {
            let message = remote_error_message(&payload)
                .unwrap_or_else(|| TRANSFORM_FAILED_MESSAGE.to_string());
            log::warn!("⚠️ 换脸接口返回 HTTP {}：{}", status.as_u16(), message);
            return Err(SwapError::Transform(message));
        }

        let mime = result_mime(content_type.as_deref(), &payload);
        log::info!(
            "✅ 换脸接口返回 - mime: {} 大小: {}KB 耗时: {}ms",
            mime,
            payload.len() / 1024,
            started.elapsed().as_millis()
        );

        Ok(TransformResult::new(payload, mime))
    }
}

/// 远端错误体中的 `error` 字段；缺失、为空或正文不是 JSON 时返回 `None`。
fn remote_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<RemoteErrorBody>(body)
        .ok()?
        .error
        .filter(|message| !message.trim().is_empty())
}

fn result_mime(content_type: Option<&str>, payload: &Bytes) -> String {
    match content_type {
        Some(ct) if ct.starts_with("image/") => ct.to_string(),
        _ => codec::sniff_mime(payload).to_string(),
    }
}
