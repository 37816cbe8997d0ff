//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持配置文件、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{TranslationError, TranslationResult};

/// 配置常量
pub mod constants {
    /// 每批最多提交的叶子数量
    pub const DEFAULT_BATCH_SIZE: usize = 50;
    /// 重试轮次上限
    pub const DEFAULT_MAX_PASSES: usize = 3;
    /// 单次请求超时（秒）
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
    /// 进度通道容量
    pub const PROGRESS_CHANNEL_CAPACITY: usize = 64;

    /// 默认 API 设置
    pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "oversea.toml",
        ".oversea.toml",
        "/etc/oversea/config.toml",
    ];
}

/// 翻译子系统配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// 文本生成服务端点（OpenAI 兼容）
    pub api_url: String,
    /// 服务密钥，无鉴权部署可留空
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// 每批最多提交的叶子数量
    pub batch_size: usize,
    /// 重试轮次上限
    pub max_passes: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: None,
            model: constants::DEFAULT_MODEL.to_string(),
            batch_size: constants::DEFAULT_BATCH_SIZE,
            max_passes: constants::DEFAULT_MAX_PASSES,
            request_timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TranslationConfig {
    /// 加载配置：默认值 → 配置文件 → 环境变量
    pub fn load() -> TranslationResult<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> TranslationResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取 {} 失败: {e}", path.display())))?;
        let config = toml::from_str(&raw)?;
        tracing::debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    fn find_config_file() -> Option<std::path::PathBuf> {
        constants::CONFIG_PATHS
            .iter()
            .map(std::path::PathBuf::from)
            .find(|p| p.exists())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{translation, EnvVar};

        if let Ok(api_url) = translation::ApiUrl::get() {
            self.api_url = api_url;
            tracing::debug!("环境变量覆盖 API URL: {}", self.api_url);
        }
        if let Ok(api_key) = translation::ApiKey::get() {
            self.api_key = Some(api_key);
        }
        if let Ok(model) = translation::Model::get() {
            self.model = model;
        }
        if let Ok(batch_size) = translation::BatchSize::get() {
            self.batch_size = batch_size;
        }
        if let Ok(max_passes) = translation::MaxPasses::get() {
            self.max_passes = max_passes;
        }
        if let Ok(timeout) = translation::TimeoutSecs::get() {
            self.request_timeout_secs = timeout;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.batch_size == 0 {
            return Err(TranslationError::ConfigError("批次大小不能为0".to_string()));
        }
        if self.max_passes == 0 {
            return Err(TranslationError::ConfigError("重试轮次不能为0".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(TranslationError::ConfigError("API 地址不能为空".to_string()));
        }
        Ok(())
    }

    /// 请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
