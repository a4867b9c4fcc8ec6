//! # 配置模块
//!
//! ## 设计思路
//!
//! 所有可调项集中在 `SwapConfig`：换脸端点、修复模型、图床端点与两个 API key。
//! API key 只允许在编译期（`option_env!`）或运行期环境变量注入，代码中不出现明文。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的端点与模型，key 取编译期注入值。
//! - `from_env` 在默认值之上叠加运行期环境变量。
//! - `transform_endpoint_url` / `upload_endpoint_url` 负责端点校验，客户端构造时调用。

use std::fmt;

use super::SwapError;

pub const DEFAULT_TRANSFORM_ENDPOINT: &str = "https://api.segmind.com/v1/faceswap-v2";
pub const DEFAULT_FACE_RESTORE_MODEL: &str = "codeformer-v0.1.0.pth";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// 换脸接口 key 的环境变量名（编译期与运行期共用）。
pub const TRANSFORM_API_KEY_ENV: &str = "SANTIFY_SEGMIND_API_KEY";
/// 图床 key 的环境变量名（编译期与运行期共用）。
pub const UPLOAD_API_KEY_ENV: &str = "SANTIFY_IMGBB_API_KEY";

const TRANSFORM_ENDPOINT_ENV: &str = "SANTIFY_TRANSFORM_ENDPOINT";
const UPLOAD_ENDPOINT_ENV: &str = "SANTIFY_UPLOAD_ENDPOINT";
const FACE_RESTORE_MODEL_ENV: &str = "SANTIFY_FACE_RESTORE_MODEL";

/// 换脸链路配置。
#[derive(Clone, PartialEq, Eq)]
pub struct SwapConfig {
    /// 换脸接口地址。
    pub transform_endpoint: String,
    /// 人脸修复模型标识，原样透传给 `face_restore` 字段。
    pub face_restore_model: String,
    /// 换脸接口 key，放在 `x-api-key` 头里。
    pub transform_api_key: Option<String>,
    /// 图床上传地址。
    pub upload_endpoint: String,
    /// 图床 key，作为 `key` 查询参数拼进上传地址。
    pub upload_api_key: Option<String>,
    /// 目标图中被替换的人脸序号。
    pub input_faces_index: u32,
    /// 源图中取用的人脸序号。
    pub source_faces_index: u32,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            transform_endpoint: DEFAULT_TRANSFORM_ENDPOINT.to_string(),
            face_restore_model: DEFAULT_FACE_RESTORE_MODEL.to_string(),
            transform_api_key: build_time_key(option_env!("SANTIFY_SEGMIND_API_KEY")),
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            upload_api_key: build_time_key(option_env!("SANTIFY_IMGBB_API_KEY")),
            input_faces_index: 0,
            source_faces_index: 0,
        }
    }
}

// key 不进日志
impl fmt::Debug for SwapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapConfig")
            .field("transform_endpoint", &self.transform_endpoint)
            .field("face_restore_model", &self.face_restore_model)
            .field("transform_api_key", &self.transform_api_key.as_ref().map(|_| "<redacted>"))
            .field("upload_endpoint", &self.upload_endpoint)
            .field("upload_api_key", &self.upload_api_key.as_ref().map(|_| "<redacted>"))
            .field("input_faces_index", &self.input_faces_index)
            .field("source_faces_index", &self.source_faces_index)
            .finish()
    }
}

fn build_time_key(value: Option<&'static str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl SwapConfig {
    /// 默认配置叠加运行期环境变量。
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// 按给定的查找函数覆盖字段，空值忽略。
    pub(crate) fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = non_empty(TRANSFORM_API_KEY_ENV) {
            self.transform_api_key = Some(key);
        }
        if let Some(key) = non_empty(UPLOAD_API_KEY_ENV) {
            self.upload_api_key = Some(key);
        }
        if let Some(endpoint) = non_empty(TRANSFORM_ENDPOINT_ENV) {
            self.transform_endpoint = endpoint;
        }
        if let Some(endpoint) = non_empty(UPLOAD_ENDPOINT_ENV) {
            self.upload_endpoint = endpoint;
        }
        if let Some(model) = non_empty(FACE_RESTORE_MODEL_ENV) {
            self.face_restore_model = model;
        }
    }

    /// 校验并解析换脸端点。
    pub fn transform_endpoint_url(&self) -> Result<reqwest::Url, SwapError> {
        parse_endpoint(&self.transform_endpoint, "transform")
    }

    /// 校验并解析图床端点。
    pub fn upload_endpoint_url(&self) -> Result<reqwest::Url, SwapError> {
        parse_endpoint(&self.upload_endpoint, "upload")
    }

    pub(crate) fn require_transform_key(&self) -> Result<&str, SwapError> {
        self.transform_api_key.as_deref().ok_or_else(|| {
            SwapError::Config(format!(
                "Face swap API key is not configured (set {} at build or run time)",
                TRANSFORM_API_KEY_ENV
            ))
        })
    }

    pub(crate) fn require_upload_key(&self) -> Result<&str, SwapError> {
        self.upload_api_key.as_deref().ok_or_else(|| {
            SwapError::Config(format!(
                "Image upload API key is not configured (set {} at build or run time)",
                UPLOAD_API_KEY_ENV
            ))
        })
    }
}

fn parse_endpoint(raw: &str, which: &str) -> Result<reqwest::Url, SwapError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| SwapError::Config(format!("Invalid {} endpoint '{}': {}", which, raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SwapError::Config(format!(
            "Unsupported {} endpoint scheme: {}",
            which, other
        ))),
    }
}
