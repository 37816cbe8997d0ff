//! 文档展平
//!
//! 把任意嵌套的商品文档展平为有序的 (path, text) 叶子序列，
//! 作为分批翻译的输入。

use serde_json::Value;

use super::paths::{leaf_text, visit_leaves};

/// 一个待翻译的标量叶子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLeaf {
    /// 叶子在原文档中的唯一地址，如 `a.b[2].c`
    pub path: String,
    /// 叶子的文本内容
    pub text: String,
}

/// 展平文档
///
/// 输出顺序等于文档的前序遍历顺序（映射插入顺序、序列下标顺序），
/// 这个顺序在整条翻译链路上保持不变。null 叶子不产出。
pub fn flatten(document: &Value) -> Vec<FlatLeaf> {
    let mut leaves = Vec::new();
    visit_leaves(document, &mut |path, value| {
        leaves.push(FlatLeaf {
            path: path.to_string(),
            text: leaf_text(value),
        });
    });
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_addresses_sequence_elements() {
        // 整数叶子被字符串化，中文叶子保持原文，路径语法为 a.b[1]
        let doc = json!({"a": {"b": [1, "草"]}});
        let leaves = flatten(&doc);
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].path, "a.b[0]");
        assert_eq!(leaves[0].text, "1");
        assert_eq!(leaves[1].path, "a.b[1]");
        assert_eq!(leaves[1].text, "草");
    }

    #[test]
    fn flatten_preserves_insertion_order() {
        let doc = json!({
            "z_last_key": "1",
            "a_first_key": "2",
            "nested": {"x": ["a", "b"], "y": "c"},
        });
        let paths: Vec<_> = flatten(&doc).into_iter().map(|l| l.path).collect();
        assert_eq!(
            paths,
            vec!["z_last_key", "a_first_key", "nested.x[0]", "nested.x[1]", "nested.y"]
        );
    }

    #[test]
    fn flatten_empty_containers_yield_nothing() {
        assert!(flatten(&json!({})).is_empty());
        assert!(flatten(&json!([])).is_empty());
        assert!(flatten(&json!({"a": {}, "b": [], "c": null})).is_empty());
    }
}
