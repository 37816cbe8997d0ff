//! 任务生命周期管理
//!
//! 一个任务对应一次后台的抽取（+ 可选翻译）运行。状态机：
//! queued → extracting → extracted → translating → completed，
//! 任何一步失败进入 failed。任务由后台 worker 独占修改，轮询方只读；
//! 进程存活期内任务从不删除。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::core::RunOptions;
use crate::pipelines;
use crate::translation::{self, ProgressEvent, ProgressSink};
use crate::web::types::AppState;

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Extracting,
    Extracted,
    Translating,
    Completed,
    Failed,
}

/// 一次抽取（+ 可选翻译）任务
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_data: Option<Value>,
    /// 最近一次翻译进度事件
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static JOB_SEQ: AtomicU64 = AtomicU64::new(1);

/// 进程内任务存储
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个新任务
    pub async fn create(&self, url: &str) -> Job {
        let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let job = Job {
            id: format!("job-{}-{}", now.timestamp_millis(), seq),
            status: JobStatus::Queued,
            url: url.to_string(),
            data: None,
            translated_data: None,
            progress: None,
            error: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        job
    }

    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn update<F: FnOnce(&mut Job)>(&self, id: &str, mutate: F) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            mutate(job);
            job.updated_at = Utc::now();
        }
    }
}

/// 派生后台 worker 执行一个任务
pub fn spawn_job(state: Arc<AppState>, job_id: String, url: String, options: RunOptions) {
    tokio::spawn(async move {
        if let Err(message) = run_job(&state, &job_id, &url, &options).await {
            tracing::error!("任务 {} 失败: {}", job_id, message);
            state
                .jobs
                .update(&job_id, |job| {
                    job.status = JobStatus::Failed;
                    job.error = Some(message);
                })
                .await;
        }
    });
}

async fn run_job(
    state: &Arc<AppState>,
    job_id: &str,
    url: &str,
    options: &RunOptions,
) -> Result<(), String> {
    let pipeline = pipelines::find(&options.pipeline)
        .ok_or_else(|| format!("Pipeline '{}' not found", options.pipeline))?;

    state
        .jobs
        .update(job_id, |job| job.status = JobStatus::Extracting)
        .await;

    let data = pipeline
        .run(state.extractor.as_ref(), url, options.wait_for)
        .await
        .map_err(|e| e.to_string())?;

    let extracted = data.clone();
    state
        .jobs
        .update(job_id, |job| {
            job.data = Some(extracted);
            job.status = JobStatus::Extracted;
        })
        .await;

    if !options.translate {
        state
            .jobs
            .update(job_id, |job| job.status = JobStatus::Completed)
            .await;
        return Ok(());
    }

    state
        .jobs
        .update(job_id, |job| job.status = JobStatus::Translating)
        .await;

    // 进度事件经有界通道流入任务状态，由独立消费任务落盘
    let (sink, mut events) = ProgressSink::channel();
    let consumer = {
        let store = state.jobs.clone();
        let id = job_id.to_string();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                store
                    .update(&id, |job: &mut Job| job.progress = Some(event))
                    .await;
            }
        })
    };

    let result = translation::translate_product_data(
        &data,
        &state.translation_config,
        state.translator.as_ref(),
        &sink,
    )
    .await;

    // 关闭发送端并等消费任务排空：最终的 completed 事件
    // 必须先于任务完成状态被观察到
    drop(sink);
    let _ = consumer.await;

    let translated = result.map_err(|e| e.to_string())?;
    state
        .jobs
        .update(job_id, |job| {
            job.translated_data = Some(translated);
            job.status = JobStatus::Completed;
        })
        .await;

    Ok(())
}
