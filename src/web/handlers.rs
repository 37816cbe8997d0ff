//! HTTP 处理器

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::core::{run_product_pipeline, RunOptions};
use crate::pipelines;
use crate::web::jobs::{self, Job};
use crate::web::types::{AppState, CreateJobRequest, CreateJobResponse, ExtractQuery};

type ApiError = (StatusCode, Json<Value>);

fn not_found(detail: String) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"detail": detail})))
}

fn internal_error(detail: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": detail})),
    )
}

fn unknown_pipeline(name: &str) -> ApiError {
    not_found(format!(
        "Pipeline '{}' not found. Available pipelines: {:?}",
        name,
        pipelines::names()
    ))
}

/// 欢迎页
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to 1Click Oversea API. Use /api/extract to extract product data."
    }))
}

/// 同步抽取端点：抽取 →（可选）翻译，完成后一次性返回
pub async fn extract_product(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExtractQuery>,
) -> Result<Json<Value>, ApiError> {
    if pipelines::find(&query.pipeline_name).is_none() {
        return Err(unknown_pipeline(&query.pipeline_name));
    }

    tracing::info!("处理抽取请求: {} (翻译: {})", query.url, query.translate);

    let options = RunOptions {
        pipeline: query.pipeline_name.clone(),
        translate: query.translate,
        wait_for: query.wait_for,
        silent: true,
    };

    run_product_pipeline(
        state.extractor.as_ref(),
        state.translator.as_ref(),
        &state.translation_config,
        &options,
        &query.url,
    )
    .await
    .map(Json)
    .map_err(|e| internal_error(format!("An error occurred: {e}")))
}

/// 创建后台任务
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), ApiError> {
    let pipeline = request
        .pipeline
        .unwrap_or_else(|| state.run_options.pipeline.clone());
    if pipelines::find(&pipeline).is_none() {
        return Err(unknown_pipeline(&pipeline));
    }

    let job = state.jobs.create(&request.url).await;
    let options = RunOptions {
        pipeline,
        translate: request.translate,
        wait_for: request.wait_for.unwrap_or(state.run_options.wait_for),
        silent: true,
    };

    tracing::info!("任务 {} 入队: {}", job.id, request.url);
    jobs::spawn_job(state.clone(), job.id.clone(), request.url, options);

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateJobResponse {
            id: job.id,
            status: job.status,
        }),
    ))
}

/// 轮询任务状态
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state
        .jobs
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(format!("Job '{id}' not found")))
}
