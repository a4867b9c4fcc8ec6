//! # 会话编排模块
//!
//! ## 设计思路
//!
//! `SwapSession` 即页面状态本身：选中的原图、选中的目标、结果、加载标记与错误文案，
//! 全部作为显式字段由会话持有，不使用全局状态，便于测试。
//!
//! 状态迁移：
//!
//! ```text
//! Idle ──选图──▶ Loading ──完成──▶ Idle
//!   │                    └─读取失败─▶ Error
//!   └──提交──▶ Loading ──成功──▶ ResultReady
//!                      └─失败──▶ Error（文案经 classify 归一）
//! ResultReady ──换目标 / 清空原图──▶ Idle
//! Error ──关闭提示──▶ 保留其余状态不变
//! ```
//!
//! ## 实现思路
//!
//! - 提交拆为 `begin_submit` / `finish_submit` 两步，`submit` 串起二者并调用提供方。
//! - `submit(&mut self)` 在整条链路期间独占会话，加载标记再兜住拆分调用的场景。
//! - 新一轮提交开始时释放上一次的结果。

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use super::catalog::ImageCatalog;
use super::classify;
use super::codec;
use super::provider::TransformProvider;
use super::source::{SelectedImage, TargetReference, TransformRequest, TransformResult};
use super::{SwapConfig, SwapError};

/// 可观测的会话状态。优先级：Loading > Error > ResultReady > Idle。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Loading,
    Error,
    ResultReady,
}

/// 提交被拒绝的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("Please upload a photo first")]
    MissingImage,
    #[error("Please choose a character first")]
    MissingTarget,
    #[error("A face swap is already in progress")]
    Busy,
}

/// 会话的可序列化视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub has_image: bool,
    pub image_mime: Option<String>,
    pub target: Option<TargetReference>,
    pub error: Option<String>,
    pub result_mime: Option<String>,
    pub result_bytes: Option<usize>,
    pub can_submit: bool,
}

/// 一次页面会话。
pub struct SwapSession<P, C> {
    provider: P,
    catalog: C,
    face_restore_model: String,
    input_faces_index: u32,
    source_faces_index: u32,
    image: Option<SelectedImage>,
    target: Option<TargetReference>,
    result: Option<TransformResult>,
    loading: bool,
    error: Option<String>,
}

impl<P, C> SwapSession<P, C>
where
    P: TransformProvider,
    C: ImageCatalog,
{
    pub fn new(provider: P, catalog: C, config: &SwapConfig) -> Self {
        Self {
            provider,
            catalog,
            face_restore_model: config.face_restore_model.clone(),
            input_faces_index: config.input_faces_index,
            source_faces_index: config.source_faces_index,
            image: None,
            target: None,
            result: None,
            loading: false,
            error: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn target(&self) -> Option<&TargetReference> {
        self.target.as_ref()
    }

    pub fn result(&self) -> Option<&TransformResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Loading
        } else if self.error.is_some() {
            SessionStatus::Error
        } else if self.result.is_some() {
            SessionStatus::ResultReady
        } else {
            SessionStatus::Idle
        }
    }

    /// 从本地文件选图；读取失败进入 Error。
    pub async fn select_image(&mut self, path: impl AsRef<Path>) {
        let was_loading = self.loading;
        self.loading = true;

        match codec::read_image_file(path).await {
            Ok(image) => self.image = Some(image),
            Err(err) => self.record_error(&err),
        }

        self.loading = was_loading;
    }

    /// 直接以内存字节选图（拖拽、剪贴板等来源）。
    pub fn select_image_bytes(&mut self, bytes: impl Into<Bytes>) {
        self.image = Some(codec::selected_image_from_bytes(bytes));
    }

    /// 移除原图，同时清掉已展示的结果。
    pub fn clear_image(&mut self) {
        self.image = None;
        self.result = None;
    }

    /// 选择目标候选；已展示的结果随之失效，原图不变。
    pub fn select_target(&mut self, index: usize) -> Result<&TargetReference, SwapError> {
        let target = self
            .catalog
            .get(index)
            .cloned()
            .ok_or_else(|| SwapError::Unexpected(format!("Unknown target candidate: {}", index)))?;

        log::debug!("选择目标图 - {} ({})", target.label, target.url);
        self.result = None;
        Ok(self.target.insert(target))
    }

    /// 关闭错误提示，其余状态保持不变。
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn can_submit(&self) -> bool {
        self.image.is_some() && self.target.is_some() && !self.loading
    }

    /// 校验前置条件并进入 Loading，返回本次要发送的请求。
    pub fn begin_submit(&mut self) -> Result<TransformRequest, SubmitRejected> {
        if self.loading {
            return Err(SubmitRejected::Busy);
        }
        let image = self.image.as_ref().ok_or(SubmitRejected::MissingImage)?;
        let target = self.target.as_ref().ok_or(SubmitRejected::MissingTarget)?;

        let request = TransformRequest {
            source_img: image.data_url.clone(),
            target_img: target.url.clone(),
            input_faces_index: self.input_faces_index,
            source_faces_index: self.source_faces_index,
            face_restore: self.face_restore_model.clone(),
            base64: true,
        };

        self.loading = true;
        self.error = None;
        self.result = None;
        Ok(request)
    }

    /// 结束提交：成功进入 ResultReady，失败进入 Error。
    ///
    /// 不在 Loading 时收到的结果直接丢弃。
    pub fn finish_submit(&mut self, outcome: Result<TransformResult, SwapError>) {
        if !self.loading {
            log::warn!("⚠️ 收到过期的换脸结果，已丢弃");
            return;
        }
        self.loading = false;

        match outcome {
            Ok(result) => {
                log::info!(
                    "✅ 换脸成功 - mime: {} 大小: {}KB",
                    result.mime,
                    result.len() / 1024
                );
                self.result = Some(result);
            }
            Err(err) => self.record_error(&err),
        }
    }

    /// 完整提交流程：校验 → 调用提供方 → 落状态。
    pub async fn submit(&mut self) -> Result<(), SubmitRejected> {
        let request = self.begin_submit()?;
        let outcome = self.provider.transform(request).await;
        self.finish_submit(outcome);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            has_image: self.image.is_some(),
            image_mime: self.image.as_ref().map(|image| image.mime.clone()),
            target: self.target.clone(),
            error: self.error.clone(),
            result_mime: self.result.as_ref().map(|result| result.mime.clone()),
            result_bytes: self.result.as_ref().map(TransformResult::len),
            can_submit: self.can_submit(),
        }
    }

    fn record_error(&mut self, err: &SwapError) {
        log::warn!("❌ 换脸流程失败 [{}@{}]: {}", err.code(), err.stage(), err);
        self.error = Some(classify::user_message(err));
    }
}
