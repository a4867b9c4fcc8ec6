//! 设置文件
//!
//! 可选的 JSON 设置文件，只覆盖非敏感项（端点、修复模型、人脸序号、候选图）。
//! API key 不允许写进设置文件，出现未知字段直接报错。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::face_swap::{StaticCatalog, SwapConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    pub transform_endpoint: Option<String>,
    pub upload_endpoint: Option<String>,
    pub face_restore_model: Option<String>,
    pub input_faces_index: Option<u32>,
    pub source_faces_index: Option<u32>,
    /// 自定义目标图地址；为空时使用默认节日候选集。
    pub targets: Option<Vec<String>>,
}

impl AppSettings {
    /// 将设置叠加到配置上。
    pub fn apply_to(&self, config: &mut SwapConfig) {
        if let Some(endpoint) = &self.transform_endpoint {
            config.transform_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.upload_endpoint {
            config.upload_endpoint = endpoint.clone();
        }
        if let Some(model) = &self.face_restore_model {
            config.face_restore_model = model.clone();
        }
        if let Some(index) = self.input_faces_index {
            config.input_faces_index = index;
        }
        if let Some(index) = self.source_faces_index {
            config.source_faces_index = index;
        }
    }

    pub fn catalog(&self) -> StaticCatalog {
        match &self.targets {
            Some(urls) if !urls.is_empty() => StaticCatalog::from_urls("Character", urls.clone()),
            _ => StaticCatalog::festive(),
        }
    }
}

pub fn load_settings(path: &Path) -> Result<AppSettings, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))
}

/// 组合最终配置：默认值 → 环境变量 → 设置文件。
pub fn resolve(path: Option<&Path>) -> Result<(SwapConfig, StaticCatalog), AppError> {
    let mut config = SwapConfig::from_env();
    let settings = match path {
        Some(path) => load_settings(path)?,
        None => AppSettings::default(),
    };

    settings.apply_to(&mut config);
    log::debug!("生效配置: {:?}", config);
    Ok((config, settings.catalog()))
}
