//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError`，覆盖换脸链路、文件读写与设置文件解析，
//! 供二进制入口与外部调用方统一处理。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `SwapError` / `SubmitRejected` / `std::io::Error` 提供 `From` 转换。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 交给前端。

use serde::Serialize;

use crate::face_swap::{SubmitRejected, SwapError};

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 换脸链路错误（读取 / 上传 / 换脸 / 配置）
    #[error("{0}")]
    Swap(#[from] SwapError),

    /// 提交前置条件不满足
    #[error("{0}")]
    Rejected(#[from] SubmitRejected),

    /// 会话中记录的、已归一化的失败文案
    #[error("{0}")]
    Flow(String),

    /// 文件系统 I/O 错误
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// 设置文件无法读取或解析
    #[error("Invalid settings file: {0}")]
    Settings(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = AppError::from(SwapError::Transform("face not found".to_string()));

        let json = serde_json::to_string(&err).expect("serialize failed");

        assert_eq!(json, "\"face not found\"");
    }

    #[test]
    fn rejection_keeps_its_message() {
        let err = AppError::from(SubmitRejected::MissingImage);
        assert_eq!(err.to_string(), "Please upload a photo first");
    }
}
