//! # Santify — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               调用方 (CLI / 前端页面)                     │
//! │   选图 ── 选目标 ── 提交 ── 展示结果 / 关闭错误提示        │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ SwapSession (状态即页面)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            santify (Rust)                        │
//! │                                                          │
//! │  ┌─ error ─────── AppError (统一错误类型)                 │
//! │  ├─ settings ──── JSON 设置文件 → SwapConfig              │
//! │  └─ face_swap                                            │
//! │      ├─ session     状态机 Idle/Loading/Error/ResultReady │
//! │      ├─ provider    上传 → 换脸                           │
//! │      ├─ upload      图床 multipart 上传                   │
//! │      ├─ swap        换脸接口 JSON 请求                    │
//! │      ├─ catalog     目标图候选集                          │
//! │      ├─ codec       字节 ↔ data URL                       │
//! │      └─ classify    错误 → 展示文案                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`settings`] | 设置文件加载与配置合成 |
//! | [`face_swap`] | 换脸链路：编解码、上传、换脸、会话状态 |

pub mod error;
pub mod face_swap;
pub mod settings;
