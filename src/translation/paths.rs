//! 叶子路径寻址
//!
//! 展平与重建共用同一套寻址规则：映射字段用 `.` 连接，序列元素用
//! `[index]` 标注，例如 `spec_variants.values[0][1]`。两侧的遍历顺序
//! 必须完全一致，这是"每个输入恰有一个输出"契约的基础。

use serde_json::Value;

/// 可增长的叶子路径
///
/// 深度优先遍历期间复用同一个缓冲区，进入子节点时 push，
/// 回溯时 pop 恢复到父路径。
#[derive(Debug, Default, Clone)]
pub struct LeafPath {
    buf: String,
    marks: Vec<usize>,
}

impl LeafPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入映射字段：`parent.key`，根层直接用 `key`
    pub fn push_key(&mut self, key: &str) {
        self.marks.push(self.buf.len());
        if !self.buf.is_empty() {
            self.buf.push('.');
        }
        self.buf.push_str(key);
    }

    /// 进入序列元素：`parent[index]`
    pub fn push_index(&mut self, index: usize) {
        self.marks.push(self.buf.len());
        self.buf.push('[');
        self.buf.push_str(&index.to_string());
        self.buf.push(']');
    }

    /// 回溯到父路径
    pub fn pop(&mut self) {
        let mark = self.marks.pop().unwrap_or(0);
        self.buf.truncate(mark);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// 标量叶子的文本形式
///
/// 字符串取原值，数字与布尔取其 JSON 字面形式。null 不会走到这里，
/// 遍历阶段就跳过了。
pub fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 按展平顺序访问每个标量叶子
///
/// 前序遍历：映射按插入顺序，序列按下标顺序。null 叶子跳过。
pub fn visit_leaves<F>(value: &Value, f: &mut F)
where
    F: FnMut(&str, &Value),
{
    let mut path = LeafPath::new();
    walk(value, &mut path, f);
}

fn walk<F>(value: &Value, path: &mut LeafPath, f: &mut F)
where
    F: FnMut(&str, &Value),
{
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push_key(key);
                walk(child, path, f);
                path.pop();
            }
        }
        Value::Array(seq) => {
            for (index, child) in seq.iter().enumerate() {
                path.push_index(index);
                walk(child, path, f);
                path.pop();
            }
        }
        Value::Null => {}
        leaf => f(path.as_str(), leaf),
    }
}

/// 可变版本，重建阶段用它把译文写回叶子
pub fn visit_leaves_mut<F>(value: &mut Value, f: &mut F)
where
    F: FnMut(&str, &mut Value),
{
    let mut path = LeafPath::new();
    walk_mut(value, &mut path, f);
}

fn walk_mut<F>(value: &mut Value, path: &mut LeafPath, f: &mut F)
where
    F: FnMut(&str, &mut Value),
{
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                path.push_key(key);
                walk_mut(child, path, f);
                path.pop();
            }
        }
        Value::Array(seq) => {
            for (index, child) in seq.iter_mut().enumerate() {
                path.push_index(index);
                walk_mut(child, path, f);
                path.pop();
            }
        }
        Value::Null => {}
        leaf => f(path.as_str(), leaf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_building_round_trip() {
        let mut path = LeafPath::new();
        path.push_key("spec_variants");
        path.push_key("values");
        path.push_index(0);
        path.push_index(1);
        assert_eq!(path.as_str(), "spec_variants.values[0][1]");

        path.pop();
        path.pop();
        assert_eq!(path.as_str(), "spec_variants.values");
        path.pop();
        path.pop();
        assert_eq!(path.as_str(), "");
    }

    #[test]
    fn visit_order_is_pre_order() {
        let doc = json!({
            "a": {"b": [1, "草"]},
            "c": "x",
        });
        let mut seen = Vec::new();
        visit_leaves(&doc, &mut |path, value| {
            seen.push((path.to_string(), leaf_text(value)));
        });
        assert_eq!(
            seen,
            vec![
                ("a.b[0]".to_string(), "1".to_string()),
                ("a.b[1]".to_string(), "草".to_string()),
                ("c".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn null_leaves_are_skipped() {
        let doc = json!({"a": null, "b": {"c": null, "d": true}});
        let mut seen = Vec::new();
        visit_leaves(&doc, &mut |path, value| {
            seen.push((path.to_string(), leaf_text(value)));
        });
        assert_eq!(seen, vec![("b.d".to_string(), "true".to_string())]);
    }
}
