//! Web 服务器模块
//!
//! 把抽取 + 翻译流程暴露为 HTTP API：同步的 `/api/extract` 和
//! 异步的任务接口 `/api/jobs`。

pub mod config;
pub mod handlers;
pub mod jobs;
pub mod routes;
pub mod types;

pub use config::WebConfig;
pub use jobs::{Job, JobStatus, JobStore};
pub use routes::create_routes;
pub use types::AppState;

use std::sync::Arc;

use tower_http::cors::CorsLayer;

use crate::core::OverseaError;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> Result<(), OverseaError> {
        let app = create_routes()
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(format!(
            "{}:{}",
            self.config.bind_addr, self.config.port
        ))
        .await
        .map_err(|e| OverseaError::new(&format!("Failed to bind server: {}", e)))?;

        tracing::info!(
            "Web server starting at http://{}:{}",
            self.config.bind_addr,
            self.config.port
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| OverseaError::new(&format!("Server error: {}", e)))?;

        Ok(())
    }
}
