//! 抽取服务客户端
//!
//! 抽取引擎作为独立服务部署（浏览器自动化在它那一侧），本库把
//! schema 和目标 URL 交给它，拿回一份 JSON 文档。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use super::schema::ExtractionSchema;
use crate::env::{extraction, EnvVar};

/// 抽取错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 目标地址不是合法 URL
    #[error("无效的目标 URL: {0}")]
    InvalidUrl(String),

    /// 引擎报告抽取未成功
    #[error("抽取未成功: {0}")]
    Failed(String),

    /// 引擎返回的负载不是合法 JSON
    #[error("抽取结果负载损坏: {0}")]
    MalformedPayload(String),

    /// 网络层错误
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// 页面抽取协作方
#[async_trait]
pub trait Extractor: Send + Sync {
    /// 按 schema 抽取一个页面
    ///
    /// 返回单个 JSON 文档或文档数组；`wait_for` 是返回 HTML 前的
    /// 等待秒数，越小越快、越大越稳。
    async fn extract(
        &self,
        schema: &ExtractionSchema,
        url: &str,
        wait_for: u64,
    ) -> ExtractionResult<Value>;
}

#[derive(Serialize)]
struct ExtractRequestBody<'a> {
    url: &'a str,
    wait_for: u64,
    schema: &'a ExtractionSchema,
}

/// 引擎侧的结果信封
#[derive(Deserialize)]
struct ExtractResponseBody {
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    /// 抽取内容为 JSON 字符串编码
    #[serde(default)]
    extracted_content: Option<String>,
}

/// 通过 HTTP 访问抽取服务
pub struct HttpExtractor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// 端点取自 `OVERSEA_EXTRACTOR_URL`
    pub fn from_env() -> Self {
        Self::new(extraction::Endpoint::get_or("http://localhost:8090/extract".to_string()))
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(
        &self,
        schema: &ExtractionSchema,
        url: &str,
        wait_for: u64,
    ) -> ExtractionResult<Value> {
        Url::parse(url).map_err(|_| ExtractionError::InvalidUrl(url.to_string()))?;

        let body = ExtractRequestBody {
            url,
            wait_for,
            schema,
        };
        tracing::debug!("提交抽取请求: {} (wait_for={}s)", url, wait_for);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Failed(format!("HTTP {status}: {detail}")));
        }

        let raw = response.text().await?;
        let envelope: ExtractResponseBody = serde_json::from_str(&raw)
            .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;

        if !envelope.success {
            return Err(ExtractionError::Failed(
                envelope
                    .error_message
                    .unwrap_or_else(|| "引擎未给出原因".to_string()),
            ));
        }

        let content = envelope.extracted_content.unwrap_or_default();
        if content.is_empty() {
            // 页面上没有匹配到任何字段
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&content).map_err(|e| ExtractionError::MalformedPayload(e.to_string()))
    }
}
