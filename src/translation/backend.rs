//! 文本生成协作方接口
//!
//! 协调器只依赖这里的 trait，不做任何全局查找；具体实现通过构造参数
//! 显式注入。响应的完整性不在契约内：条目可以缺失、乱序、甚至多出
//! 请求里没有的路径，对账是协调器的职责。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TranslationResult;
use super::flatten::FlatLeaf;

/// 提交给服务的单个批次项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub path: String,
    pub text: String,
}

impl From<&FlatLeaf> for BatchItem {
    fn from(leaf: &FlatLeaf) -> Self {
        Self {
            path: leaf.path.clone(),
            text: leaf.text.clone(),
        }
    }
}

/// 服务返回的单个条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedItem {
    pub path: String,
    pub original_text: String,
    pub should_translate: bool,
    /// `should_translate` 为 false 时服务端约定返回 null
    #[serde(default)]
    pub translated_text: Option<String>,
}

/// 一次批量请求的结构化响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchTranslation {
    #[serde(default)]
    pub translations: Vec<TranslatedItem>,
}

/// 文本生成协作方
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 翻译一个批次
    ///
    /// 返回错误表示本次请求整体不可用（超时、网络、负载格式坏掉），
    /// 协调器会把整个批次排进下一轮重试。
    async fn translate_batch(&self, items: &[BatchItem]) -> TranslationResult<BatchTranslation>;
}
