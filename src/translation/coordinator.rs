//! 批量翻译协调器
//!
//! 翻译子系统的核心状态机：把展平后的叶子序列切成有界批次，逐批提交
//! 给文本生成协作方，对账返回条目与请求条目，未覆盖的条目排进下一轮，
//! 直到全部落定或轮次预算耗尽。无论协作方行为多糟糕，输出序列与输入
//! 序列的长度、路径集合、顺序都严格一致——重建阶段依赖这个不变量。

use std::collections::{HashMap, HashSet};

use super::backend::{BatchItem, TranslationBackend};
use super::config::TranslationConfig;
use super::error::TranslationResult;
use super::flatten::FlatLeaf;
use super::progress::{ProgressEvent, ProgressSink};

/// 叶子的终态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationStatus {
    /// 服务判定需要翻译并给出了译文
    Translated,
    /// 服务返回了该条目但判定无需翻译（或声明翻译却没给文本），保留原文
    NotNeeded,
    /// 轮次预算耗尽仍无响应，保留原文
    Missed,
}

/// 终态叶子，与输入的 FlatLeaf 序列一一对应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLeaf {
    pub path: String,
    /// 最终文本：译文或原文
    pub text: String,
    pub status: TranslationStatus,
}

/// 批量翻译协调器
///
/// 协作方通过构造参数显式注入。单次 `translate` 调用独占自己的全部
/// 状态，多个并发调用之间不共享任何可变数据。
pub struct BatchTranslationCoordinator<'a, B: TranslationBackend + ?Sized> {
    backend: &'a B,
    batch_size: usize,
    max_passes: usize,
}

impl<'a, B: TranslationBackend + ?Sized> BatchTranslationCoordinator<'a, B> {
    /// 创建协调器，配置非法属于致命错误，向调用方传播
    pub fn new(backend: &'a B, config: &TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            batch_size: config.batch_size,
            max_passes: config.max_passes,
        })
    }

    /// 解析整个叶子序列
    ///
    /// 协作方的调用失败按"本批次无响应"处理、排队重试，从不向上抛出；
    /// 轮次耗尽后剩余条目以 `Missed` 收尾。因此这里总能返回完整结果，
    /// 最坏情况是整个序列都保留原文。
    pub async fn translate(&self, leaves: &[FlatLeaf], sink: &ProgressSink) -> Vec<ResolvedLeaf> {
        let total = leaves.len();
        let mut resolved: HashMap<String, String> = HashMap::with_capacity(total);
        let mut status: HashMap<String, TranslationStatus> = HashMap::with_capacity(total);

        sink.emit(ProgressEvent::started(total)).await;

        let mut pending: Vec<&FlatLeaf> = leaves.iter().collect();
        let mut pass = 0;

        while !pending.is_empty() && pass < self.max_passes {
            pass += 1;
            let chunk_total = pending.len().div_ceil(self.batch_size);
            tracing::debug!(
                "第 {} 轮: {} 个待解析条目, {} 个批次",
                pass,
                pending.len(),
                chunk_total
            );

            let mut requeued: Vec<&FlatLeaf> = Vec::new();

            for (chunk, batch) in pending.chunks(self.batch_size).enumerate() {
                let items: Vec<BatchItem> = batch.iter().map(|leaf| BatchItem::from(*leaf)).collect();

                match self.backend.translate_batch(&items).await {
                    Ok(response) => {
                        let by_path: HashMap<&str, &FlatLeaf> =
                            batch.iter().map(|leaf| (leaf.path.as_str(), *leaf)).collect();
                        let mut seen: HashSet<String> = HashSet::with_capacity(batch.len());

                        for item in response.translations {
                            let Some(leaf) = by_path.get(item.path.as_str()) else {
                                // 模型幻觉出的路径：忽略，不制造新叶子
                                tracing::debug!("忽略批次外的路径: {}", item.path);
                                continue;
                            };
                            seen.insert(item.path.clone());

                            match (item.should_translate, item.translated_text) {
                                (true, Some(text)) if !text.is_empty() => {
                                    resolved.insert(item.path, text);
                                    status.insert(leaf.path.clone(), TranslationStatus::Translated);
                                }
                                _ => {
                                    resolved.insert(item.path, leaf.text.clone());
                                    status.insert(leaf.path.clone(), TranslationStatus::NotNeeded);
                                }
                            }
                        }

                        // 模型悄悄吞掉的条目排进下一轮
                        for leaf in batch {
                            if !seen.contains(leaf.path.as_str()) {
                                requeued.push(leaf);
                            }
                        }
                    }
                    Err(e) => {
                        // 整批重试，不做批内局部重试
                        tracing::warn!(
                            "第 {} 轮批次 {}/{} 失败, 整批排队重试 (可重试: {}): {}",
                            pass,
                            chunk + 1,
                            chunk_total,
                            e.is_retryable(),
                            e
                        );
                        requeued.extend(batch.iter().copied());
                    }
                }

                sink.emit(ProgressEvent::batch(
                    pass,
                    chunk + 1,
                    chunk_total,
                    resolved.len(),
                    total,
                ))
                .await;
            }

            pending = requeued;
            sink.emit(ProgressEvent::pass_completed(pass, resolved.len(), total))
                .await;
        }

        if !pending.is_empty() {
            tracing::warn!("{} 个条目在 {} 轮内未获响应, 保留原文", pending.len(), pass);
        }
        for leaf in &pending {
            resolved.insert(leaf.path.clone(), leaf.text.clone());
            status.insert(leaf.path.clone(), TranslationStatus::Missed);
        }

        sink.emit(ProgressEvent::completed(total)).await;

        // 按原始输入顺序产出，基数与路径集合严格等于输入
        leaves
            .iter()
            .map(|leaf| ResolvedLeaf {
                path: leaf.path.clone(),
                text: resolved
                    .get(&leaf.path)
                    .cloned()
                    .unwrap_or_else(|| leaf.text.clone()),
                status: status
                    .get(&leaf.path)
                    .copied()
                    .unwrap_or(TranslationStatus::Missed),
            })
            .collect()
    }
}
