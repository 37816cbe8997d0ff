use std::error::Error;
use std::fmt;

use serde_json::Value;

use crate::extraction::Extractor;
use crate::pipelines;
use crate::translation::{self, ProgressSink, TranslationBackend, TranslationConfig};

/// Represents errors that can occur during oversea processing
///
/// This error type encapsulates all possible errors that can occur
/// when running a product pipeline with the oversea library.
#[derive(Debug)]
pub struct OverseaError {
    details: String,
}

impl OverseaError {
    /// Creates a new OverseaError with the given message
    ///
    /// # Arguments
    ///
    /// * `msg` - The error message describing what went wrong
    ///
    /// # Returns
    ///
    /// A new OverseaError instance
    pub fn new(msg: &str) -> OverseaError {
        OverseaError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for OverseaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for OverseaError {
    fn description(&self) -> &str {
        &self.details
    }
}

/// Configuration options for a single pipeline run
///
/// This struct contains the options that control which pipeline is
/// executed and whether the extracted document is translated afterwards.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub pipeline: String,
    pub translate: bool,
    pub wait_for: u64,
    pub silent: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pipeline: "alibaba_1688".to_string(),
            translate: false,
            wait_for: 2,
            silent: false,
        }
    }
}

/// 运行站点管道：抽取 → 后处理 →（可选）翻译
///
/// 这是库的主入口，CLI 和 Web 服务都通过它执行完整流程。
/// 翻译阶段的部分失败不会让整个运行失败：协调器总是返回
/// 结构完整的文档，翻译完整度通过进度事件和状态上报。
pub async fn run_product_pipeline<E, B>(
    extractor: &E,
    backend: &B,
    config: &TranslationConfig,
    options: &RunOptions,
    url: &str,
) -> Result<Value, OverseaError>
where
    E: Extractor + ?Sized,
    B: TranslationBackend + ?Sized,
{
    let pipeline = pipelines::find(&options.pipeline).ok_or_else(|| {
        OverseaError::new(&format!(
            "Pipeline '{}' not found. Available pipelines: {:?}",
            options.pipeline,
            pipelines::names()
        ))
    })?;

    tracing::info!("运行管道 '{}': {}", pipeline.name(), url);

    let data = pipeline
        .run(extractor, url, options.wait_for)
        .await
        .map_err(|e| OverseaError::new(&format!("抽取失败: {e}")))?;

    if !options.translate {
        return Ok(data);
    }

    let sink = if options.silent {
        ProgressSink::Null
    } else {
        ProgressSink::logging()
    };

    translation::translate_product_data(&data, config, backend, &sink)
        .await
        .map_err(|e| OverseaError::new(&format!("翻译失败: {e}")))
}
