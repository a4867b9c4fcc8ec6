//! # 编解码模块
//!
//! ## 设计思路
//!
//! 原图在内存中以 data URL（`data:<mime>;base64,<payload>`）流转，
//! 既可直接预览，也可在上传前还原成字节。
//!
//! ## 实现思路
//!
//! - MIME 通过 `infer` 按文件签名识别，识别不了就用 `application/octet-stream`。
//! - 这里不做体积与类型限制，选图即接受。
//! - 解析同时兼容标准 data URL 与纯 Base64 字符串。

use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;

use super::SwapError;
use super::source::SelectedImage;

const FALLBACK_MIME: &str = "application/octet-stream";
const BASE64_MARKER: &str = ";base64,";

/// data URL 解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 按文件签名识别 MIME。
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// MIME 对应的文件扩展名，未知类型统一为 `bin`。
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/avif" => "avif",
        _ => "bin",
    }
}

/// 将字节编码为 data URL。
pub fn encode_data_url(bytes: &[u8]) -> String {
    format!(
        "data:{}{}{}",
        sniff_mime(bytes),
        BASE64_MARKER,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// 将 data URL（或纯 Base64）还原为字节。
pub fn decode_data_url(data: &str) -> Result<DecodedDataUrl, SwapError> {
    let normalized = data.trim();

    if let Some(rest) = normalized.strip_prefix("data:") {
        let marker = rest
            .find(BASE64_MARKER)
            .ok_or_else(|| SwapError::Conversion("Image data is missing its base64 marker".to_string()))?;
        let declared = &rest[..marker];
        let payload = &rest[marker + BASE64_MARKER.len()..];

        let bytes = decode_payload(payload)?;
        let mime = if declared.is_empty() {
            sniff_mime(&bytes).to_string()
        } else {
            declared.to_string()
        };
        return Ok(DecodedDataUrl { mime, bytes });
    }

    let bytes = decode_payload(normalized)?;
    Ok(DecodedDataUrl {
        mime: sniff_mime(&bytes).to_string(),
        bytes,
    })
}

/// 与浏览器一致：解码前剔除 ASCII 空白（折行的 Base64）。
fn decode_payload(payload: &str) -> Result<Vec<u8>, SwapError> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| SwapError::Conversion(format!("Could not decode image data: {}", e)))
}

/// 由内存字节构造选中图片。
pub fn selected_image_from_bytes(bytes: impl Into<Bytes>) -> SelectedImage {
    let bytes = bytes.into();
    let mime = sniff_mime(&bytes).to_string();
    let data_url = encode_data_url(&bytes);
    SelectedImage {
        bytes,
        mime,
        data_url,
    }
}

/// 读取本地图片文件并转成内联表示。
pub async fn read_image_file(path: impl AsRef<Path>) -> Result<SelectedImage, SwapError> {
    let path = path.as_ref();
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        SwapError::Conversion(format!("Could not read image file '{}': {}", path.display(), e))
    })?;

    let image = selected_image_from_bytes(bytes);
    log::debug!(
        "图片已转为 data URL - mime: {} 大小: {}KB",
        image.mime,
        image.bytes.len() / 1024
    );
    Ok(image)
}
