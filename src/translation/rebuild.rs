//! 结构重建
//!
//! 把协调器产出的终态文本写回原文档，骨架（键、顺序、嵌套、非叶子值）
//! 原样保留。

use std::collections::HashMap;

use serde_json::Value;

use super::coordinator::ResolvedLeaf;
use super::paths::{leaf_text, visit_leaves_mut};

/// 用终态叶子重建文档
///
/// 深拷贝原文档后按与展平完全相同的寻址规则重走一遍；路径命中查找表
/// 的叶子用最终文本覆盖。文本与原值的字面形式相同时保持原值不动，
/// 数字、布尔叶子不会退化成字符串。查找表里找不到对应结构的路径
/// （文档形状变了）静默忽略，不算错误。
pub fn rebuild(original: &Value, resolved: &[ResolvedLeaf]) -> Value {
    let lookup: HashMap<&str, &str> = resolved
        .iter()
        .map(|leaf| (leaf.path.as_str(), leaf.text.as_str()))
        .collect();

    let mut document = original.clone();
    visit_leaves_mut(&mut document, &mut |path, value| {
        if let Some(text) = lookup.get(path) {
            if leaf_text(value) != **text {
                *value = Value::String((*text).to_string());
            }
        }
    });
    document
}
