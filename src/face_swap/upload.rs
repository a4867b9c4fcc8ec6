//! # 图床上传客户端
//!
//! ## 设计思路
//!
//! 换脸接口只接受公网可访问的源图地址，因此先把内联图片上传到图床换取 URL。
//! 对外通过 `ImageHost` trait 暴露，方便替换图床或在测试中注入替身。
//!
//! ## 实现思路
//!
//! - data URL 还原为字节后，以单字段 multipart（`image`）POST 到固定端点。
//! - 图床 key 作为 `key` 查询参数拼在端点上；日志输出时隐去查询串。
//! - 非 2xx 统一映射为 `SwapError::Upload`，成功时取 `data.url`。
//! - 不重试、不额外设置超时，也不校验返回地址是否可达。

use std::future::Future;
use std::time::Instant;

use serde::Deserialize;

use super::codec;
use super::{SwapConfig, SwapError};

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image";

/// 图床抽象：上传内联图片，返回公网地址。
pub trait ImageHost {
    fn upload(&self, data_url: &str) -> impl Future<Output = Result<String, SwapError>> + Send;
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

/// ImgBB 上传客户端。
#[derive(Debug, Clone)]
pub struct ImgbbUploader {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ImgbbUploader {
    /// 按配置构建客户端；缺少 key 或端点非法时直接失败。
    pub fn new(config: &SwapConfig) -> Result<Self, SwapError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SwapError::from_reqwest)?;
        Self::with_client(client, config)
    }

    /// 复用外部传入的 HTTP 客户端。
    pub fn with_client(client: reqwest::Client, config: &SwapConfig) -> Result<Self, SwapError> {
        let key = config.require_upload_key()?;
        let mut endpoint = config.upload_endpoint_url()?;
        endpoint.query_pairs_mut().append_pair("key", key);

        Ok(Self { client, endpoint })
    }
}

impl ImageHost for ImgbbUploader {
    async fn upload(&self, data_url: &str) -> Result<String, SwapError> {
        let started = Instant::now();
        let decoded = codec::decode_data_url(data_url)?;
        log::info!(
            "🌐 开始上传图片 - 端点: {} 大小: {}KB",
            redact_url_for_log(self.endpoint.as_str()),
            decoded.bytes.len() / 1024
        );

        let file_name = format!("image.{}", codec::extension_for_mime(&decoded.mime));
        let part = reqwest::multipart::Part::bytes(decoded.bytes)
            .file_name(file_name)
            .mime_str(&decoded.mime)
            .map_err(SwapError::from_reqwest)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(SwapError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("⚠️ 图床返回 HTTP {}", status.as_u16());
            return Err(SwapError::Upload(UPLOAD_FAILED_MESSAGE.to_string()));
        }

        let body = response.bytes().await.map_err(SwapError::from_reqwest)?;
        let envelope: UploadEnvelope = serde_json::from_slice(&body)
            .map_err(|e| SwapError::Unexpected(format!("Unexpected upload response: {}", e)))?;

        log::info!(
            "✅ 图片上传完成 - 地址: {} 耗时: {}ms",
            redact_url_for_log(&envelope.data.url),
            started.elapsed().as_millis()
        );
        Ok(envelope.data.url)
    }
}

/// 去掉查询串与片段，避免 key 出现在日志里。
pub(crate) fn redact_url_for_log(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_swap::test_support::{find, serve_once};

    fn config_for(base: &str) -> SwapConfig {
        let mut config = SwapConfig::default();
        config.upload_endpoint = format!("{}/1/upload", base);
        config.upload_api_key = Some("test-key".to_string());
        config
    }

    #[tokio::test]
    async fn returns_nested_url_from_envelope() {
        let (base, server) = serve_once(
            "200 OK",
            "application/json",
            br#"{"data":{"url":"https://x/y.jpg"},"success":true,"status":200}"#.to_vec(),
        );

        let uploader = ImgbbUploader::new(&config_for(&base)).expect("uploader init failed");
        let payload = b"\x89PNG\r\n\x1a\nfake-png-body".to_vec();
        let url = uploader
            .upload(&codec::encode_data_url(&payload))
            .await
            .expect("upload should succeed");

        let request = server.join().expect("server thread failed");

        assert_eq!(url, "https://x/y.jpg");
        assert!(request.request_line().starts_with("POST /1/upload?key=test-key "));
        assert!(
            request
                .header("content-type")
                .is_some_and(|ct| ct.starts_with("multipart/form-data"))
        );
        assert!(find(&request.body, b"name=\"image\"").is_some());
        assert!(find(&request.body, &payload).is_some());
    }

    #[tokio::test]
    async fn non_success_status_is_upload_error() {
        let (base, server) = serve_once(
            "400 Bad Request",
            "application/json",
            br#"{"error":{"message":"Invalid API v1 key."}}"#.to_vec(),
        );

        let uploader = ImgbbUploader::new(&config_for(&base)).expect("uploader init failed");
        let result = uploader.upload("data:image/png;base64,iVBORw0KGgo=").await;

        server.join().expect("server thread failed");

        assert_eq!(result, Err(SwapError::Upload(UPLOAD_FAILED_MESSAGE.to_string())));
    }

    #[tokio::test]
    async fn malformed_envelope_is_unexpected() {
        let (base, server) = serve_once("200 OK", "application/json", br#"{"data":{}}"#.to_vec());

        let uploader = ImgbbUploader::new(&config_for(&base)).expect("uploader init failed");
        let result = uploader.upload("data:image/png;base64,iVBORw0KGgo=").await;

        server.join().expect("server thread failed");

        assert!(matches!(result, Err(SwapError::Unexpected(_))));
    }

    #[tokio::test]
    async fn invalid_data_url_fails_before_any_request() {
        let uploader =
            ImgbbUploader::new(&config_for("http://127.0.0.1:9")).expect("uploader init failed");

        let result = uploader.upload("data:image/png;base64,%%%").await;

        assert!(matches!(result, Err(SwapError::Conversion(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_unexpected_and_hides_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind failed");
        let addr = listener.local_addr().expect("local addr failed");
        drop(listener);

        let mut config = config_for(&format!("http://{}", addr));
        config.upload_api_key = Some("SECRETKEY".to_string());
        let uploader = ImgbbUploader::new(&config).expect("uploader init failed");

        let result = uploader.upload("data:image/png;base64,aGVsbG8=").await;

        match result {
            Err(SwapError::Unexpected(message)) => {
                assert!(!message.is_empty());
                assert!(!message.contains("SECRETKEY"), "key leaked: {}", message);
            }
            other => panic!("expected unexpected error, got {:?}", other),
        }
    }

    #[test]
    fn missing_key_fails_construction() {
        let mut config = SwapConfig::default();
        config.upload_api_key = None;

        assert!(matches!(ImgbbUploader::new(&config), Err(SwapError::Config(_))));
    }

    #[test]
    fn redact_url_for_log_removes_query_and_fragment() {
        let redacted = redact_url_for_log("https://api.imgbb.com/1/upload?key=abc123#hash");

        assert_eq!(redacted, "https://api.imgbb.com/1/upload");
    }
}
