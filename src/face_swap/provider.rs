//! # 换脸服务提供方
//!
//! ## 设计思路
//!
//! 会话层只依赖 `TransformProvider`，不关心背后是“先上传再换脸”还是别的实现。
//! 默认实现 `HostedFaceSwap` 组合 `ImageHost` 与 `FaceSwapApi`：
//!
//! ```text
//! TransformRequest(source = data URL)
//!    ↓ ImageHost::upload
//! TransformRequest(source = 公网 URL, base64 = false)
//!    ↓ FaceSwapApi::swap
//! TransformResult
//! ```

use std::future::Future;
use std::time::Instant;

use super::source::{TransformRequest, TransformResult};
use super::swap::{FaceSwapApi, SegmindClient};
use super::upload::{ImageHost, ImgbbUploader};
use super::{SwapConfig, SwapError};

/// 换脸能力抽象。
pub trait TransformProvider {
    fn transform(
        &self,
        request: TransformRequest,
    ) -> impl Future<Output = Result<TransformResult, SwapError>> + Send;
}

/// 上传到图床后再调用换脸接口。
#[derive(Debug, Clone)]
pub struct HostedFaceSwap<H, A> {
    host: H,
    api: A,
}

impl<H, A> HostedFaceSwap<H, A> {
    pub fn new(host: H, api: A) -> Self {
        Self { host, api }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl HostedFaceSwap<ImgbbUploader, SegmindClient> {
    /// 按配置构建默认链路，两个客户端共用同一个连接池。
    pub fn from_config(config: &SwapConfig) -> Result<Self, SwapError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SwapError::from_reqwest)?;

        Ok(Self::new(
            ImgbbUploader::with_client(client.clone(), config)?,
            SegmindClient::with_client(client, config)?,
        ))
    }
}

impl<H, A> TransformProvider for HostedFaceSwap<H, A>
where
    H: ImageHost + Sync,
    A: FaceSwapApi + Sync,
{
    async fn transform(&self, request: TransformRequest) -> Result<TransformResult, SwapError> {
        let total_start = Instant::now();

        let upload_start = Instant::now();
        let hosted = if request.has_inline_source() {
            let url = self.host.upload(&request.source_img).await?;
            request.with_hosted_source(url)
        } else {
            request
        };
        let upload_elapsed = upload_start.elapsed();

        let transform_start = Instant::now();
        let result = self.api.swap(&hosted).await?;
        let transform_elapsed = transform_start.elapsed();

        log::info!(
            "✅ 换脸链路完成 - upload={}ms transform={}ms total={}ms",
            upload_elapsed.as_millis(),
            transform_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(result)
    }
}
