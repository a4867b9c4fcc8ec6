//! # 错误归类
//!
//! 将任意失败归一为一条可直接展示给用户的文案。

use std::error::Error;

use super::SwapError;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// 已知错误直接取其文案，空文案回退到通用提示。
pub fn user_message(error: &SwapError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// 归类任意错误：沿 `source()` 链优先识别 `SwapError`，其次沿用错误自身文案。
pub fn classify(error: &(dyn Error + 'static)) -> String {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(swap) = err.downcast_ref::<SwapError>() {
            return user_message(swap);
        }
        current = err.source();
    }

    let message = error.to_string();
    if message.trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
