//! 声明式抽取 schema
//!
//! 描述"从页面上取哪些字段、怎么取"的静态配置，序列化后交给抽取
//! 引擎执行。字段可以是标量选择器、属性选择器，或带子字段的嵌套 /
//! 列表结构，与引擎的 JSON-CSS 抽取格式一一对应。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 字段抽取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// 元素文本
    Text,
    /// 元素属性值
    Attribute,
    /// 单个嵌套结构
    Nested,
    /// 标量列表
    List,
    /// 结构列表
    NestedList,
}

/// 单个字段的抽取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
}

impl FieldConfig {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            selector: None,
            kind,
            attribute: None,
            default: None,
            fields: Vec::new(),
        }
    }

    pub fn text(name: &str, selector: &str) -> Self {
        Self::new(name, FieldKind::Text).selector(selector)
    }

    pub fn attribute(name: &str, selector: &str, attribute: &str) -> Self {
        let mut field = Self::new(name, FieldKind::Attribute).selector(selector);
        field.attribute = Some(attribute.to_string());
        field
    }

    pub fn nested(name: &str, selector: &str, fields: Vec<FieldConfig>) -> Self {
        Self::new(name, FieldKind::Nested).selector(selector).fields(fields)
    }

    pub fn list(name: &str, selector: &str, fields: Vec<FieldConfig>) -> Self {
        Self::new(name, FieldKind::List).selector(selector).fields(fields)
    }

    pub fn nested_list(name: &str, selector: &str, fields: Vec<FieldConfig>) -> Self {
        Self::new(name, FieldKind::NestedList)
            .selector(selector)
            .fields(fields)
    }

    pub fn selector(mut self, selector: &str) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn attr(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }

    pub fn fields(mut self, fields: Vec<FieldConfig>) -> Self {
        self.fields = fields;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// 一个站点管道的完整抽取 schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSchema {
    pub name: String,
    pub base_selector: String,
    pub fields: Vec<FieldConfig>,
}

impl ExtractionSchema {
    pub fn new(name: &str, base_selector: &str, fields: Vec<FieldConfig>) -> Self {
        Self {
            name: name.to_string(),
            base_selector: base_selector.to_string(),
            fields,
        }
    }

    /// 收集 schema 里的全部 CSS 选择器
    ///
    /// 嵌套字段的选择器与父选择器拼接为后代选择器，供调用方做
    /// 页面高亮之类的辅助处理。
    pub fn selectors(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_selectors(&self.fields, "", &mut out);
        out
    }
}

fn collect_selectors(fields: &[FieldConfig], parent: &str, out: &mut Vec<String>) {
    for field in fields {
        let combined = field.selector.as_ref().map(|selector| {
            if parent.is_empty() {
                selector.clone()
            } else {
                format!("{parent} {selector}")
            }
        });
        if let Some(selector) = &combined {
            out.push(selector.clone());
        }
        if !field.fields.is_empty() {
            let next_parent = combined.as_deref().unwrap_or(parent);
            collect_selectors(&field.fields, next_parent, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_serializes_to_engine_format() {
        let schema = ExtractionSchema::new(
            "demo",
            "body",
            vec![
                FieldConfig::text("title", ".title-text"),
                FieldConfig::attribute("cover", ".cover img", "src").default_value(""),
            ],
        );
        let wire = serde_json::to_value(&schema).expect("should serialize");
        assert_eq!(
            wire,
            json!({
                "name": "demo",
                "baseSelector": "body",
                "fields": [
                    {"name": "title", "selector": ".title-text", "type": "text"},
                    {"name": "cover", "selector": ".cover img", "type": "attribute",
                     "attribute": "src", "default": ""},
                ],
            })
        );
    }

    #[test]
    fn selectors_combine_with_parents() {
        let schema = ExtractionSchema::new(
            "demo",
            "body",
            vec![FieldConfig::nested(
                "block",
                ".outer",
                vec![
                    FieldConfig::text("label", ".label"),
                    FieldConfig::new("bare", FieldKind::Text),
                    FieldConfig::new("group", FieldKind::Nested)
                        .fields(vec![FieldConfig::text("inner", ".inner")]),
                ],
            )],
        );
        assert_eq!(
            schema.selectors(),
            vec![".outer", ".outer .label", ".outer .inner"]
        );
    }
}
