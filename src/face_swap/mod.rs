//! # 换脸模块（face_swap）
//!
//! ## 设计思路
//!
//! 该模块将“选图 → 上传图床 → 调用换脸接口 → 展示结果/错误”按职责拆分为多个子模块。
//! 真正的人脸检测与替换完全交给远端服务，这里只负责编排与状态管理。
//!
//! - `session`：会话状态机，持有原图、目标、结果与错误
//! - `provider`：换脸能力抽象，默认实现为“先上传再换脸”
//! - `upload`：图床客户端（multipart）
//! - `swap`：换脸接口客户端（JSON）
//! - `catalog`：固定的目标图候选集
//! - `codec`：字节 ↔ data URL
//! - `classify`：错误 → 展示文案
//! - `config/error/source`：配置、错误、数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 调用方（CLI / 前端）
//!    ↓
//! session.rs（状态机：select_image / select_target / submit / dismiss_error）
//!    ↓
//! provider.rs（TransformProvider）
//!    ├─ upload.rs（data URL → 图床 URL）
//!    └─ swap.rs（请求体 → 结果图片字节）
//!    ↓
//! 失败经 classify.rs 归一为一条文案写回会话
//! ```

pub mod catalog;
pub mod classify;
pub mod codec;
mod config;
mod error;
pub mod provider;
pub mod session;
mod source;
pub mod swap;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{FESTIVE_TARGETS, ImageCatalog, StaticCatalog};
pub use config::{
    DEFAULT_FACE_RESTORE_MODEL, DEFAULT_TRANSFORM_ENDPOINT, DEFAULT_UPLOAD_ENDPOINT, SwapConfig,
    TRANSFORM_API_KEY_ENV, UPLOAD_API_KEY_ENV,
};
pub use error::SwapError;
pub use provider::{HostedFaceSwap, TransformProvider};
pub use session::{SessionSnapshot, SessionStatus, SubmitRejected, SwapSession};
pub use source::{SelectedImage, TargetReference, TransformRequest, TransformResult};
pub use swap::{FaceSwapApi, SegmindClient};
pub use upload::{ImageHost, ImgbbUploader};
