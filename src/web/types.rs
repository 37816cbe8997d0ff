//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::RunOptions;
use crate::extraction::Extractor;
use crate::translation::{TranslationBackend, TranslationConfig};
use crate::web::jobs::{JobStatus, JobStore};

/// 应用状态
///
/// 两个协作方客户端在全部请求间共享；任务存储只增不删。
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn Extractor>,
    pub translator: Arc<dyn TranslationBackend>,
    pub translation_config: TranslationConfig,
    pub run_options: RunOptions,
    pub jobs: JobStore,
}

fn default_pipeline() -> String {
    "alibaba_1688".to_string()
}

fn default_wait_for() -> u64 {
    2
}

/// `/api/extract` 的查询参数
#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    /// 商品页 URL
    pub url: String,
    /// 管道名称
    #[serde(default = "default_pipeline")]
    pub pipeline_name: String,
    /// 是否翻译
    #[serde(default)]
    pub translate: bool,
    /// 返回 HTML 前的等待秒数，越小越快但越不稳定
    #[serde(default = "default_wait_for")]
    pub wait_for: u64,
}

/// 创建任务请求
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub url: String,
    pub pipeline: Option<String>,
    #[serde(default)]
    pub translate: bool,
    pub wait_for: Option<u64>,
}

/// 创建任务响应
#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub id: String,
    pub status: JobStatus,
}
