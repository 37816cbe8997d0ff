//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置加载时统一走这里

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Environment variable '{}': {}",
            self.variable, self.message
        )
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn default() -> Option<T> {
        None
    }

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default().ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    fn get_or(fallback: T) -> T {
        Self::get().unwrap_or(fallback)
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> EnvResult<T> {
    value.trim().parse().map_err(|_| EnvError {
        variable: name.to_string(),
        message: format!("Invalid numeric value '{value}'"),
    })
}

/// 核心环境变量
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "OVERSEA_LOG_LEVEL";

        fn default() -> Option<String> {
            Some("info".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{value}'. Use: trace, debug, info, warn, error"
                    ),
                }),
            }
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 文本生成服务地址（OpenAI 兼容 chat completions 端点）
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "OVERSEA_LLM_API_URL";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }

    /// 文本生成服务密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "OVERSEA_LLM_API_KEY";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }

    /// 模型名称
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "OVERSEA_LLM_MODEL";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }

    /// 每批最多提交的叶子数量
    pub struct BatchSize;
    impl EnvVar<usize> for BatchSize {
        const NAME: &'static str = "OVERSEA_BATCH_SIZE";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_number(value, Self::NAME)
        }
    }

    /// 重试轮次上限
    pub struct MaxPasses;
    impl EnvVar<usize> for MaxPasses {
        const NAME: &'static str = "OVERSEA_MAX_PASSES";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_number(value, Self::NAME)
        }
    }

    /// 单次请求超时（秒）
    pub struct TimeoutSecs;
    impl EnvVar<u64> for TimeoutSecs {
        const NAME: &'static str = "OVERSEA_LLM_TIMEOUT_SECS";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_number(value, Self::NAME)
        }
    }
}

/// 抽取服务相关环境变量
pub mod extraction {
    use super::*;

    /// 抽取服务端点
    pub struct Endpoint;
    impl EnvVar<String> for Endpoint {
        const NAME: &'static str = "OVERSEA_EXTRACTOR_URL";

        fn default() -> Option<String> {
            Some("http://localhost:8090/extract".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }
}

/// Web 服务器相关环境变量
pub mod web {
    use super::*;

    /// 监听地址
    pub struct BindAddr;
    impl EnvVar<String> for BindAddr {
        const NAME: &'static str = "OVERSEA_WEB_BIND";

        fn default() -> Option<String> {
            Some("127.0.0.1".to_string())
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }

    /// 监听端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "OVERSEA_WEB_PORT";

        fn default() -> Option<u16> {
            Some(8000)
        }

        fn parse(value: &str) -> EnvResult<u16> {
            parse_number(value, Self::NAME)
        }
    }
}
