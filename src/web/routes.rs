//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{create_job, extract_product, get_job, index};
use crate::web::types::AppState;

/// 创建路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/extract", get(extract_product))
        .route("/api/jobs", post(create_job))
        .route("/api/jobs/:id", get(get_job))
}
