//! Web 服务器配置

use crate::env::{web, EnvVar};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 监听地址
    pub bind_addr: String,
    /// 监听端口
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: web::BindAddr::get_or(defaults.bind_addr),
            port: web::Port::get_or(defaults.port),
        }
    }
}
