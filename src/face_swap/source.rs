//! # 数据模型
//!
//! ## 设计思路
//!
//! 将链路各阶段的数据显式建模：
//! - `SelectedImage`：用户选中的原图（字节 + MIME + data URL），仅存于内存
//! - `TargetReference`：固定候选集中的一项
//! - `TransformRequest`：单次提交的请求体，发送后不再修改
//! - `TransformResult`：换脸接口返回的图片字节

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// 用户选中的原图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub(crate) bytes: Bytes,
    pub(crate) mime: String,
    pub(crate) data_url: String,
}

impl SelectedImage {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// 内联表示，用于预览与提交。
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// 目标候选图的定位信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReference {
    pub index: usize,
    pub label: String,
    pub url: String,
}

/// 换脸请求体，字段名即远端 JSON 字段名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub source_img: String,
    pub target_img: String,
    pub input_faces_index: u32,
    pub source_faces_index: u32,
    pub face_restore: String,
    pub base64: bool,
}

impl TransformRequest {
    /// 以已上传的公网地址替换内联源图，得到实际发给远端的请求。
    pub fn with_hosted_source(&self, hosted_url: String) -> Self {
        Self {
            source_img: hosted_url,
            base64: false,
            ..self.clone()
        }
    }

    pub(crate) fn has_inline_source(&self) -> bool {
        self.source_img.trim_start().starts_with("data:")
    }
}

/// 换脸结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub(crate) bytes: Bytes,
    pub(crate) mime: String,
}

impl TransformResult {
    pub fn new(bytes: Bytes, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 根据 MIME 推断落盘扩展名。
    pub fn extension(&self) -> &'static str {
        super::codec::extension_for_mime(&self.mime)
    }

    /// 读取图片头部尺寸；非图片或格式不支持时返回 `None`。
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(std::io::Cursor::new(self.bytes.as_ref()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_remote_field_names() {
        let request = TransformRequest {
            source_img: "https://x/y.jpg".to_string(),
            target_img: "https://cdn/t.jpg".to_string(),
            input_faces_index: 0,
            source_faces_index: 0,
            face_restore: "codeformer-v0.1.0.pth".to_string(),
            base64: false,
        };

        let value = serde_json::to_value(&request).expect("serialize failed");
        assert_eq!(
            value,
            serde_json::json!({
                "source_img": "https://x/y.jpg",
                "target_img": "https://cdn/t.jpg",
                "input_faces_index": 0,
                "source_faces_index": 0,
                "face_restore": "codeformer-v0.1.0.pth",
                "base64": false
            })
        );
    }

    #[test]
    fn hosted_source_replaces_inline_data() {
        let request = TransformRequest {
            source_img: "data:image/png;base64,AAAA".to_string(),
            target_img: "https://cdn/t.jpg".to_string(),
            input_faces_index: 1,
            source_faces_index: 2,
            face_restore: "m".to_string(),
            base64: true,
        };
        assert!(request.has_inline_source());

        let hosted = request.with_hosted_source("https://x/y.jpg".to_string());
        assert!(!hosted.has_inline_source());
        assert!(!hosted.base64);
        assert_eq!(hosted.source_img, "https://x/y.jpg");
        assert_eq!(hosted.target_img, request.target_img);
        assert_eq!(hosted.input_faces_index, 1);
        assert_eq!(hosted.source_faces_index, 2);
    }

    #[test]
    fn result_extension_follows_mime() {
        let png = TransformResult::new(Bytes::from_static(b"x"), "image/png");
        let unknown = TransformResult::new(Bytes::from_static(b"x"), "application/octet-stream");

        assert_eq!(png.extension(), "png");
        assert_eq!(unknown.extension(), "bin");
        assert_eq!(unknown.dimensions(), None);
    }
}
