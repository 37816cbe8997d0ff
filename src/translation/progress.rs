//! 翻译进度上报
//!
//! 协调器在每个批次和每轮结束后发出进度事件。事件是单向的
//! fire-and-forget 旁路：回调接收器同步调用，通道接收器把事件投递到
//! 有界队列由独立消费任务处理。需要保证"完成事件先于连接关闭被观察到"
//! 时，调用方在协调器返回后等待消费任务结束即可（发送端随协调器一起
//! 析构，消费端自然排空）。

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::config::constants::PROGRESS_CHANNEL_CAPACITY;

/// 进度阶段状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Started,
    InProgress,
    PassCompleted,
    Completed,
}

/// 翻译进度事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 所处阶段，目前固定为 `translating`
    pub stage: String,
    pub status: ProgressStatus,
    /// 轮次编号，1 起
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<usize>,
    /// 本轮内的批次编号，1 起
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    /// 本轮批次总数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_total: Option<usize>,
    pub total_items: usize,
    /// 已有终态的叶子数量（累计）
    pub processed_items: usize,
    pub percent: f64,
}

impl ProgressEvent {
    fn new(status: ProgressStatus, processed_items: usize, total_items: usize) -> Self {
        let percent = if total_items == 0 {
            100.0
        } else {
            (processed_items as f64 / total_items as f64 * 1000.0).round() / 10.0
        };
        Self {
            stage: "translating".to_string(),
            status,
            pass: None,
            chunk_index: None,
            chunk_total: None,
            total_items,
            processed_items,
            percent,
        }
    }

    pub fn started(total_items: usize) -> Self {
        Self::new(ProgressStatus::Started, 0, total_items)
    }

    pub fn batch(
        pass: usize,
        chunk_index: usize,
        chunk_total: usize,
        processed_items: usize,
        total_items: usize,
    ) -> Self {
        let mut event = Self::new(ProgressStatus::InProgress, processed_items, total_items);
        event.pass = Some(pass);
        event.chunk_index = Some(chunk_index);
        event.chunk_total = Some(chunk_total);
        event
    }

    pub fn pass_completed(pass: usize, processed_items: usize, total_items: usize) -> Self {
        let mut event = Self::new(ProgressStatus::PassCompleted, processed_items, total_items);
        event.pass = Some(pass);
        event
    }

    pub fn completed(total_items: usize) -> Self {
        Self::new(ProgressStatus::Completed, total_items, total_items)
    }
}

/// 进度接收器
pub enum ProgressSink {
    /// 丢弃全部事件
    Null,
    /// 同步回调
    Callback(Box<dyn Fn(&ProgressEvent) + Send + Sync>),
    /// 有界通道，消费端由调用方持有
    Channel(mpsc::Sender<ProgressEvent>),
}

impl ProgressSink {
    /// 把事件打进日志的回调接收器，CLI 默认用它
    pub fn logging() -> Self {
        ProgressSink::Callback(Box::new(|event| match event.status {
            ProgressStatus::Started => {
                tracing::info!("翻译开始: 共 {} 个叶子", event.total_items);
            }
            ProgressStatus::InProgress => {
                tracing::info!(
                    "第 {} 轮 批次 {}/{}: {}/{} ({:.1}%)",
                    event.pass.unwrap_or(0),
                    event.chunk_index.unwrap_or(0),
                    event.chunk_total.unwrap_or(0),
                    event.processed_items,
                    event.total_items,
                    event.percent
                );
            }
            ProgressStatus::PassCompleted => {
                tracing::info!(
                    "第 {} 轮结束: {}/{} ({:.1}%)",
                    event.pass.unwrap_or(0),
                    event.processed_items,
                    event.total_items,
                    event.percent
                );
            }
            ProgressStatus::Completed => {
                tracing::info!("翻译完成: 共 {} 个叶子", event.total_items);
            }
        }))
    }

    /// 回调接收器
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        ProgressSink::Callback(Box::new(f))
    }

    /// 通道接收器，返回消费端
    pub fn channel() -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        (ProgressSink::Channel(tx), rx)
    }

    /// 投递一个事件
    ///
    /// 通道消费端已关闭时事件直接丢弃，进度旁路永远不让翻译失败。
    pub async fn emit(&self, event: ProgressEvent) {
        match self {
            ProgressSink::Null => {}
            ProgressSink::Callback(f) => f(&event),
            ProgressSink::Channel(tx) => {
                if tx.send(event).await.is_err() {
                    tracing::debug!("进度消费端已关闭，事件丢弃");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_rounded_to_one_decimal() {
        let event = ProgressEvent::batch(1, 1, 3, 1, 3);
        assert_eq!(event.percent, 33.3);
        let done = ProgressEvent::completed(3);
        assert_eq!(done.percent, 100.0);
    }

    #[test]
    fn empty_input_reports_full_progress() {
        let event = ProgressEvent::started(0);
        assert_eq!(event.percent, 100.0);
    }

    #[tokio::test]
    async fn channel_sink_delivers_in_order() {
        let (sink, mut rx) = ProgressSink::channel();
        sink.emit(ProgressEvent::started(2)).await;
        sink.emit(ProgressEvent::completed(2)).await;
        drop(sink);

        let first = rx.recv().await.expect("should receive started");
        assert_eq!(first.status, ProgressStatus::Started);
        let second = rx.recv().await.expect("should receive completed");
        assert_eq!(second.status, ProgressStatus::Completed);
        assert!(rx.recv().await.is_none());
    }
}
