//! 商品文档拆分与合并
//!
//! 翻译前把文档拆成"需要翻译"和"不需要翻译"两部分，翻译后再合回去。
//! 两个函数都是纯函数，从不修改输入。

use serde_json::{Map, Value};

/// 整体跳过翻译的顶层键
pub const NON_TRANSLATABLE_KEYS: &[&str] = &["product_images", "url"];

/// 需要按子字段拆分的复合键
pub const PRODUCT_DETAILS_KEY: &str = "product_details";

/// 拆分商品文档
///
/// - `product_images`、`url` 原样进入不翻译侧，永远不会提交给翻译服务
/// - `product_details` 为映射时按子字段拆分：`images` 进不翻译侧，
///   其余子字段（含 `title`）进翻译侧；其他形状整体进翻译侧，不报错
/// - 其余顶层键全部进翻译侧
pub fn split_product_data(document: &Value) -> (Value, Value) {
    let map = match document.as_object() {
        Some(map) => map,
        // 非映射输入：整体视为可翻译，保持不崩溃
        None => return (document.clone(), Value::Object(Map::new())),
    };

    let mut translatable = Map::new();
    let mut non_translatable = Map::new();

    for (key, value) in map {
        if NON_TRANSLATABLE_KEYS.contains(&key.as_str()) {
            non_translatable.insert(key.clone(), value.clone());
        } else if key == PRODUCT_DETAILS_KEY {
            match value.as_object() {
                Some(details) => {
                    let mut translatable_detail = Map::new();
                    let mut non_translatable_detail = Map::new();

                    for (sub_key, sub_value) in details {
                        if sub_key == "images" {
                            non_translatable_detail.insert(sub_key.clone(), sub_value.clone());
                        } else {
                            translatable_detail.insert(sub_key.clone(), sub_value.clone());
                        }
                    }

                    let keep_translatable_side =
                        !translatable_detail.is_empty() || non_translatable_detail.is_empty();
                    if !non_translatable_detail.is_empty() {
                        non_translatable
                            .insert(key.clone(), Value::Object(non_translatable_detail));
                    }
                    if keep_translatable_side {
                        translatable.insert(key.clone(), Value::Object(translatable_detail));
                    }
                }
                None => {
                    translatable.insert(key.clone(), value.clone());
                }
            }
        } else {
            translatable.insert(key.clone(), value.clone());
        }
    }

    (Value::Object(translatable), Value::Object(non_translatable))
}

/// 合并译文与不翻译侧
///
/// 以译文为基底：不翻译侧里译文没有的键直接插入；`product_details`
/// 两侧都有时按子字段合并，译文侧的子字段永远不被覆盖；其余冲突键
/// 以译文侧为准。
pub fn merge_product_data(translated: Value, non_translatable: Value) -> Value {
    let mut merged = match translated {
        Value::Object(map) => map,
        other => return other,
    };

    if let Value::Object(extra) = non_translatable {
        for (key, value) in extra {
            if !merged.contains_key(&key) {
                merged.insert(key, value);
                continue;
            }
            if key == PRODUCT_DETAILS_KEY {
                if let (Some(Value::Object(dst)), Value::Object(src)) =
                    (merged.get_mut(&key), value)
                {
                    for (sub_key, sub_value) in src {
                        if !dst.contains_key(&sub_key) {
                            dst.insert(sub_key, sub_value);
                        }
                    }
                }
            }
            // 其余冲突：译文侧优先，不翻译侧丢弃
        }
    }

    Value::Object(merged)
}
