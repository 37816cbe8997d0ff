//! 站点管道
//!
//! 一个管道 = 一份抽取 schema + 各字段的后处理器 + 文档级后处理器。
//! 管道通过显式构造函数创建、按名称查找，不使用全局可变注册表。

pub mod alibaba_1688;

use serde_json::{Map, Value};

use crate::extraction::{ExtractionResult, ExtractionSchema, Extractor};

/// 字段后处理器：把引擎抽出来的原始形状整理成干净结构
///
/// 返回 `Value::Null` 表示该字段没有可用数据。
pub type FieldProcessor = fn(&Value) -> Value;

/// 文档级后处理器：跨字段的整理（如标题拼接）
pub type DocumentProcessor = fn(Value) -> Value;

/// 一个站点的抽取 + 整理管道
pub struct Pipeline {
    name: &'static str,
    schema: ExtractionSchema,
    field_processors: Vec<(&'static str, FieldProcessor)>,
    post_processor: Option<DocumentProcessor>,
}

impl Pipeline {
    pub fn new(
        name: &'static str,
        schema: ExtractionSchema,
        field_processors: Vec<(&'static str, FieldProcessor)>,
        post_processor: Option<DocumentProcessor>,
    ) -> Self {
        Self {
            name,
            schema,
            field_processors,
            post_processor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    fn field_processor(&self, name: &str) -> Option<FieldProcessor> {
        self.field_processors
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, processor)| *processor)
    }

    /// 把抽取结果过一遍字段后处理器
    ///
    /// schema 里声明的字段逐个输出（缺失补 null），`keep_keys` 为 true
    /// 时保留 schema 之外的键（例如注入的 `url`）。
    pub fn process_data(&self, data: Value, keep_keys: bool) -> Value {
        let input = match data {
            Value::Object(map) => map,
            other => return other,
        };

        let mut result = Map::new();
        for field in &self.schema.fields {
            let value = input.get(&field.name).cloned().unwrap_or(Value::Null);
            let processed = match self.field_processor(&field.name) {
                Some(processor) if !value.is_null() => processor(&value),
                _ => value,
            };
            result.insert(field.name.clone(), processed);
        }

        if keep_keys {
            for (key, value) in input {
                if !result.contains_key(&key) {
                    result.insert(key, value);
                }
            }
        }

        Value::Object(result)
    }

    /// 对一个 URL 执行完整管道：抽取 → 注入 url → 字段整理 → 文档整理
    pub async fn run<E>(&self, extractor: &E, url: &str, wait_for: u64) -> ExtractionResult<Value>
    where
        E: Extractor + ?Sized,
    {
        let extracted = extractor.extract(&self.schema, url, wait_for).await?;

        let processed = match extracted {
            Value::Array(pages) => {
                let mut latest = Value::Null;
                for page in pages {
                    latest = self.apply(page, url);
                }
                latest
            }
            other => self.apply(other, url),
        };

        Ok(processed)
    }

    fn apply(&self, mut page: Value, url: &str) -> Value {
        if let Value::Object(map) = &mut page {
            map.insert("url".to_string(), Value::String(url.to_string()));
        }
        let mut processed = self.process_data(page, true);
        if let Some(post) = self.post_processor {
            processed = post(processed);
        }
        processed
    }
}

/// 按名称查找内置管道
pub fn find(name: &str) -> Option<Pipeline> {
    match name {
        "alibaba_1688" => Some(alibaba_1688::pipeline()),
        _ => None,
    }
}

/// 内置管道名称列表
pub fn names() -> Vec<&'static str> {
    vec!["alibaba_1688"]
}
