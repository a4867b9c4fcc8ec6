//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 换脸链路（读取 → 上传 → 换脸）中的所有失败统一收敛到 `SwapError`。
//! 通过 `thiserror` 保持可读文案，调用侧仍可按分支匹配；
//! `code()` / `stage()` 给日志与前端展示提供稳定的机器可读标识。

/// 换脸链路统一错误类型。
///
/// `Display` 输出即为面向用户的文案（见 `classify` 模块）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    /// 本地图片无法读取或 data URL 格式错误。
    #[error("{0}")]
    Conversion(String),

    /// 图床上传返回非成功状态。
    #[error("{0}")]
    Upload(String),

    /// 换脸接口返回非成功状态，文案优先取远端 `error` 字段。
    #[error("{0}")]
    Transform(String),

    /// 配置缺失或非法（API key、端点地址、设置文件）。
    #[error("{0}")]
    Config(String),

    /// 其它无法归类的失败，包括网络层错误。
    #[error("{0}")]
    Unexpected(String),
}

impl SwapError {
    /// 稳定错误码，供日志与快照输出使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "conversion_error",
            Self::Upload(_) => "upload_error",
            Self::Transform(_) => "transform_error",
            Self::Config(_) => "config_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "codec",
            Self::Upload(_) => "upload",
            Self::Transform(_) => "transform",
            Self::Config(_) => "config",
            Self::Unexpected(_) => "unknown",
        }
    }

    /// 将 reqwest 错误映射为业务错误，日志中隐去 URL 查询串（含图床 key）。
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        let message = match error.url() {
            Some(url) => {
                let redacted = super::upload::redact_url_for_log(url.as_str());
                error.to_string().replace(url.as_str(), &redacted)
            }
            None => error.to_string(),
        };

        if error.is_connect() {
            Self::Unexpected(format!("Could not reach the server: {}", message))
        } else {
            Self::Unexpected(message)
        }
    }
}

impl From<SwapError> for String {
    fn from(error: SwapError) -> Self {
        error.to_string()
    }
}
