//! 抽取协作方接口
//!
//! 页面抓取与选择器求值由外部抽取引擎负责，这里只定义它消费的
//! 声明式 schema 和本库消费的客户端接口。

pub mod client;
pub mod schema;

pub use client::{ExtractionError, ExtractionResult, Extractor, HttpExtractor};
pub use schema::{ExtractionSchema, FieldConfig, FieldKind};
