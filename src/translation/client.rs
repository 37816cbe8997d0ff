//! 文本生成服务客户端
//!
//! 对接 OpenAI 兼容的 chat completions 端点，把批次项渲染进指令模板，
//! 解析结构化 JSON 响应。代理走 reqwest 对 `http_proxy`/`https_proxy`
//! 环境变量的内置支持。

use async_trait::async_trait;
use serde_json::Value;

use super::backend::{BatchItem, BatchTranslation, TranslationBackend};
use super::config::TranslationConfig;
use super::error::{TranslationError, TranslationResult};
use super::prompts;

/// 基于 LLM 的翻译协作方实现
pub struct LlmTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
}

impl LlmTranslator {
    /// 创建客户端，配置非法时报致命错误
    pub fn new(config: TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("构建 HTTP 客户端失败: {e}")))?;
        Ok(Self { client, config })
    }

    /// 从默认来源加载配置并创建客户端
    pub fn from_env() -> TranslationResult<Self> {
        Self::new(TranslationConfig::load()?)
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }
}

#[async_trait]
impl TranslationBackend for LlmTranslator {
    async fn translate_batch(&self, items: &[BatchItem]) -> TranslationResult<BatchTranslation> {
        let payload = serde_json::to_string_pretty(items)?;
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0.1,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": prompts::TRANSLATE_SYSTEM},
                {"role": "user", "content": prompts::user_prompt(&payload)},
            ],
        });

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TranslationError::ServiceError(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let envelope: Value = response.json().await?;
        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TranslationError::ParseError(
                    "响应缺少 choices[0].message.content".to_string(),
                )
            })?;

        let cleaned = strip_code_fences(content);
        let batch: BatchTranslation = serde_json::from_str(cleaned)
            .map_err(|e| TranslationError::ParseError(format!("结构化响应解析失败: {e}")))?;

        tracing::debug!(
            "批次请求: 提交 {} 项, 返回 {} 项",
            items.len(),
            batch.translations.len()
        );
        Ok(batch)
    }
}

/// 去掉模型偶尔包裹的 Markdown 代码围栏
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 围栏行可能带语言标注（```json）
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(
            strip_code_fences("```json\n{\"translations\":[]}\n```"),
            "{\"translations\":[]}"
        );
        assert_eq!(
            strip_code_fences("{\"translations\":[]}"),
            "{\"translations\":[]}"
        );
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = TranslationConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            LlmTranslator::new(config),
            Err(TranslationError::ConfigError(_))
        ));
    }
}
