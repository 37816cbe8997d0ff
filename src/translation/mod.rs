//! 翻译子系统
//!
//! 把商品文档里的中文字段翻译为英文的完整链路：
//!
//! - **partition**: 把文档拆成可翻译 / 不可翻译两部分
//! - **flatten**: 把可翻译部分展平为有序的 (path, text) 叶子序列
//! - **coordinator**: 分批提交、对账、多轮重试的核心状态机
//! - **rebuild**: 把终态文本写回原嵌套结构
//! - **backend / client**: 文本生成协作方接口及其 LLM 实现
//! - **progress**: 批次 / 轮次粒度的进度事件
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use oversea::translation::{
//!     translate_product_data, LlmTranslator, ProgressSink, TranslationConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::load()?;
//! let translator = LlmTranslator::new(config.clone())?;
//! let document = serde_json::json!({"title": "红色T恤", "url": "http://x"});
//!
//! let translated =
//!     translate_product_data(&document, &config, &translator, &ProgressSink::logging()).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod flatten;
pub mod partition;
pub mod paths;
pub mod progress;
pub mod prompts;
pub mod rebuild;

pub use backend::{BatchItem, BatchTranslation, TranslatedItem, TranslationBackend};
pub use client::LlmTranslator;
pub use config::{constants, TranslationConfig};
pub use coordinator::{BatchTranslationCoordinator, ResolvedLeaf, TranslationStatus};
pub use error::{TranslationError, TranslationResult};
pub use flatten::{flatten, FlatLeaf};
pub use partition::{merge_product_data, split_product_data};
pub use progress::{ProgressEvent, ProgressSink, ProgressStatus};
pub use rebuild::rebuild;

use serde_json::Value;

/// 翻译整个商品文档
///
/// 顶层入口：拆分 → 展平 → 分批翻译 → 重建 → 合并。协作方的瞬时
/// 失败在内部按轮次重试消化，耗尽后对应叶子保留原文；返回的文档
/// 永远结构完整。只有配置类的致命错误才会让这里返回 `Err`。
pub async fn translate_product_data<B>(
    document: &Value,
    config: &TranslationConfig,
    backend: &B,
    sink: &ProgressSink,
) -> TranslationResult<Value>
where
    B: TranslationBackend + ?Sized,
{
    let (translatable, non_translatable) = split_product_data(document);
    let leaves = flatten(&translatable);
    tracing::info!("展平得到 {} 个可翻译叶子", leaves.len());

    let coordinator = BatchTranslationCoordinator::new(backend, config)?;
    let resolved = coordinator.translate(&leaves, sink).await;

    let translated = resolved
        .iter()
        .filter(|leaf| leaf.status == TranslationStatus::Translated)
        .count();
    let missed = resolved
        .iter()
        .filter(|leaf| leaf.status == TranslationStatus::Missed)
        .count();
    tracing::info!(
        "翻译收尾: {} 条译文, {} 条无需翻译, {} 条未获响应",
        translated,
        resolved.len() - translated - missed,
        missed
    );

    let rebuilt = rebuild(&translatable, &resolved);
    Ok(merge_product_data(rebuilt, non_translatable))
}
