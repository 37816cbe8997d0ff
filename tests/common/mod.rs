//! 集成测试共享工具
//!
//! 提供接近真实形状的商品文档样本和脚本化的文本生成协作方。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use oversea::translation::{
    BatchItem, BatchTranslation, TranslatedItem, TranslationBackend, TranslationConfig,
    TranslationError, TranslationResult,
};

/// 一份接近真实形状的 1688 商品文档
pub fn sample_product_document() -> Value {
    json!({
        "product_title_main": "多功能无线充电插座",
        "product_title_second": "带线接线板",
        "full_title": "多功能无线充电插座带线接线板",
        "price": "¥31.80~¥51.80",
        "sales_count": "1000+",
        "logistics": "浙江 宁波",
        "spec_variants": [
            {"型号": "K36-0.8米-黑", "价格": "¥31.80", "image_url": "https://img/1.jpg"},
            {"型号": "K36-1.6米-白", "价格": "¥51.80"},
        ],
        "head_attributes": [
            {"name": "材质", "value": "阻燃PC"},
            {"name": "额定电压", "value": "220V"},
        ],
        "product_images": [
            {"url": "https://img/a.jpg", "index": "0", "is_video": false},
            {"url": "https://img/b.jpg", "index": "1", "is_video": true},
        ],
        "product_details": {
            "title": "产品详情",
            "images": [{"url": "https://img/d1.jpg"}],
        },
        "url": "https://detail.1688.com/offer/764286652699.html",
    })
}

/// 测试用翻译配置
pub fn test_config(batch_size: usize, max_passes: usize) -> TranslationConfig {
    TranslationConfig {
        batch_size,
        max_passes,
        ..Default::default()
    }
}

/// 脚本化协作方的应答方式
pub enum MockBehavior {
    /// 词典里有的给译文，其余判不需要翻译
    Dictionary(HashMap<String, String>),
    /// 全部判不需要翻译
    PassThrough,
    /// 永远返回空的 translations 数组
    Silent,
    /// 永远不响应指定路径，其余判不需要翻译
    DropPaths(Vec<String>),
    /// 前 N 次调用整体报错，之后全部判不需要翻译
    FailFirst(usize),
    /// 只有第 N 次调用整体报错，其余全部判不需要翻译
    FailNth(usize),
}

/// 脚本化的文本生成协作方
pub struct MockBackend {
    behavior: MockBehavior,
    calls: AtomicUsize,
    /// 每次调用收到的批次大小
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl MockBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn dictionary(pairs: &[(&str, &str)]) -> Self {
        let dict = pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self::new(MockBehavior::Dictionary(dict))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn pass_through(items: &[BatchItem]) -> BatchTranslation {
        BatchTranslation {
            translations: items
                .iter()
                .map(|item| TranslatedItem {
                    path: item.path.clone(),
                    original_text: item.text.clone(),
                    should_translate: false,
                    translated_text: None,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_batch(&self, items: &[BatchItem]) -> TranslationResult<BatchTranslation> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.batch_sizes.lock().unwrap().push(items.len());

        match &self.behavior {
            MockBehavior::Dictionary(dict) => Ok(BatchTranslation {
                translations: items
                    .iter()
                    .map(|item| match dict.get(&item.text) {
                        Some(translated) => TranslatedItem {
                            path: item.path.clone(),
                            original_text: item.text.clone(),
                            should_translate: true,
                            translated_text: Some(translated.clone()),
                        },
                        None => TranslatedItem {
                            path: item.path.clone(),
                            original_text: item.text.clone(),
                            should_translate: false,
                            translated_text: None,
                        },
                    })
                    .collect(),
            }),
            MockBehavior::PassThrough => Ok(Self::pass_through(items)),
            MockBehavior::Silent => Ok(BatchTranslation::default()),
            MockBehavior::DropPaths(paths) => {
                let mut batch = Self::pass_through(items);
                batch
                    .translations
                    .retain(|item| !paths.contains(&item.path));
                Ok(batch)
            }
            MockBehavior::FailFirst(failures) => {
                if call <= *failures {
                    Err(TranslationError::NetworkError(format!(
                        "simulated outage on call {call}"
                    )))
                } else {
                    Ok(Self::pass_through(items))
                }
            }
            MockBehavior::FailNth(n) => {
                if call == *n {
                    Err(TranslationError::TimeoutError(format!(
                        "simulated timeout on call {call}"
                    )))
                } else {
                    Ok(Self::pass_through(items))
                }
            }
        }
    }
}
