//! 1688 商品页抽取管道
//!
//! 阿里巴巴 1688 批发站商品页的字段配置与后处理器。抽取引擎按
//! schema 取回原始形状，这里把表格、图集、SKU 选项等整理成干净结构。

use regex::Regex;
use serde_json::{Map, Value};

use super::Pipeline;
use crate::extraction::{ExtractionSchema, FieldConfig, FieldKind};

/// 从 style 属性里取出 background-image 的 URL
fn style_url(style: &str) -> Option<String> {
    let re = Regex::new(r#"url\(["']?(.*?)["']?\)"#).ok()?;
    re.captures(style)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// 规格表：headers + rows 压成「表头 → 单元格值」的变体列表
fn process_spec_variants(data: &Value) -> Value {
    let (Some(headers), Some(rows)) = (
        data.get("headers").and_then(Value::as_array),
        data.get("rows").and_then(Value::as_array),
    ) else {
        return Value::Null;
    };

    let header_names: Vec<String> = headers
        .iter()
        .map(|header| {
            header
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        })
        .collect();

    let mut processed = Vec::new();
    for row in rows {
        let mut variant = Map::new();

        if let Some(style) = row.get("image_url").and_then(Value::as_str) {
            if let Some(url) = style_url(style) {
                variant.insert("image_url".to_string(), Value::String(url));
            }
        }

        let cells = row.get("cells").and_then(Value::as_array);
        for (index, header) in header_names.iter().enumerate() {
            let value = cells
                .and_then(|cells| cells.get(index))
                .and_then(|cell| cell.get("value"))
                .and_then(Value::as_str)
                .unwrap_or("");
            variant.insert(header.clone(), Value::String(value.to_string()));
        }

        processed.push(Value::Object(variant));
    }

    Value::Array(processed)
}

/// 主图集：抽出 URL 与序号，按序号排序，标记视频项
fn process_product_images(data: &Value) -> Value {
    let Some(images) = data.get("images").and_then(Value::as_array) else {
        return Value::Null;
    };

    let mut image_list: Vec<Value> = Vec::new();
    for wrapper in images {
        let mut info = Map::new();

        if let Some(url) = wrapper.get("image_url") {
            info.insert("url".to_string(), url.clone());
        }
        if let Some(index) = wrapper.get("index") {
            info.insert("index".to_string(), index.clone());
        }

        let is_video = wrapper
            .get("video_icon_src")
            .and_then(Value::as_str)
            .is_some_and(|src| !src.is_empty());
        info.insert("is_video".to_string(), Value::Bool(is_video));

        image_list.push(Value::Object(info));
    }

    image_list.sort_by_key(|info| {
        info.get("index")
            .and_then(Value::as_str)
            .and_then(|index| index.parse::<i64>().ok())
            .unwrap_or(0)
    });

    Value::Array(image_list)
}

/// 详情块：过滤懒加载占位图，保留实际图片 URL 与标题
fn process_product_details(data: &Value) -> Value {
    let mut result = Map::new();

    if let Some(detail_images) = data.get("detail_images").and_then(Value::as_array) {
        if !detail_images.is_empty() {
            let mut images = Vec::new();
            for image in detail_images {
                let actual = image
                    .get("actual_image_src")
                    .and_then(Value::as_str)
                    .filter(|src| !src.is_empty());
                let placeholder = image
                    .get("placeholder_src")
                    .and_then(Value::as_str)
                    .filter(|src| !src.is_empty() && !src.contains("lazyload.png"));

                let Some(url) = actual.or(placeholder) else {
                    continue;
                };
                let mut info = Map::new();
                info.insert("url".to_string(), Value::String(url.to_string()));
                images.push(Value::Object(info));
            }
            result.insert("images".to_string(), Value::Array(images));
        }
    }

    if let Some(title) = data.get("title") {
        result.insert("title".to_string(), title.clone());
    }

    Value::Object(result)
}

/// 筛选区：把选项对象列表折叠成纯文本列表
fn process_filter_data(data: &Value) -> Value {
    let mut result = data.clone();

    if let Some(filters) = result.get_mut("filters").and_then(|f| f.as_array_mut()) {
        for category in filters {
            let Some(options) = category.get("options").and_then(Value::as_array) else {
                continue;
            };
            let values: Vec<Value> = options
                .iter()
                .filter_map(|option| option.get("option").cloned())
                .collect();
            category["options"] = Value::Array(values);
        }
    }

    result
}

/// SKU 选项：兼容「颜色图片」与「规格价格库存」两种表样式
fn process_sku_options(data: &Value) -> Value {
    let Some(sku_tables) = data.as_array() else {
        return Value::Null;
    };
    if sku_tables.is_empty() {
        return Value::Null;
    }

    let mut result = Vec::new();
    for sku_data in sku_tables {
        let category_name = sku_data.get("category_name").cloned().unwrap_or(Value::Null);
        let mut options = Vec::new();

        let image_style_options = sku_data
            .get("options")
            .and_then(Value::as_array)
            .filter(|list| {
                list.first()
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.contains_key("image_style"))
            });

        if let Some(list) = image_style_options {
            // 样式一：颜色 / 图片
            for option in list {
                let mut opt = Map::new();
                if let Some(title) = option.get("title") {
                    opt.insert("title".to_string(), title.clone());
                }
                if let Some(url) = option
                    .get("image_style")
                    .and_then(Value::as_str)
                    .and_then(style_url)
                {
                    opt.insert("image_url".to_string(), Value::String(url));
                }
                options.push(Value::Object(opt));
            }
        } else if let Some(list) = sku_data.get("sku_item_options").and_then(Value::as_array) {
            // 样式二：规格 / 价格 / 库存
            for option in list {
                let mut opt = Map::new();
                if let Some(name) = option.get("name") {
                    opt.insert("title".to_string(), name.clone());
                }
                if let Some(price) = option.get("price") {
                    opt.insert("price".to_string(), price.clone());
                }
                if let Some(stock) = option.get("stock") {
                    opt.insert("stock".to_string(), stock.clone());
                }
                options.push(Value::Object(opt));
            }
        }

        let mut table = Map::new();
        table.insert("category_name".to_string(), category_name);
        table.insert("options".to_string(), Value::Array(options));
        result.push(Value::Object(table));
    }

    Value::Array(result)
}

/// 物流包装表：headers + rows 压成行字典列表
fn process_package_details(data: &Value) -> Value {
    let (Some(headers), Some(rows)) = (
        data.get("headers").and_then(Value::as_array),
        data.get("rows").and_then(Value::as_array),
    ) else {
        return Value::Null;
    };

    let header_names: Vec<String> = headers
        .iter()
        .map(|header| {
            header
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        })
        .collect();

    let mut processed = Vec::new();
    for row in rows {
        let cells = row.get("cells").and_then(Value::as_array);
        let mut row_map = Map::new();
        for (index, header) in header_names.iter().enumerate() {
            let value = cells
                .and_then(|cells| cells.get(index))
                .and_then(|cell| cell.get("value"))
                .and_then(Value::as_str)
                .unwrap_or("");
            row_map.insert(header.clone(), Value::String(value.to_string()));
        }
        processed.push(Value::Object(row_map));
    }

    Value::Array(processed)
}

/// 文档级整理：主副标题都在时拼出完整标题
fn merge_title(data: Value) -> Value {
    let mut result = data;
    if let Value::Object(map) = &mut result {
        let main = map.get("product_title_main").and_then(Value::as_str);
        let second = map.get("product_title_second").and_then(Value::as_str);
        if let (Some(main), Some(second)) = (main, second) {
            let full = format!("{main}{second}");
            map.insert("full_title".to_string(), Value::String(full));
        }
    }
    result
}

/// 1688 商品页的完整字段配置
pub fn schema() -> ExtractionSchema {
    ExtractionSchema::new(
        "Alibaba1688ProductPipeline",
        "body",
        vec![
            FieldConfig::text("product_title_main", ".title-first-column .title-text"),
            FieldConfig::text("product_title_second", ".title-second-column .title-text"),
            FieldConfig::text("sales_count", ".title-sale-column .title-info-number"),
            FieldConfig::text("evaluation_count", ".title-info-number[data-real-number]"),
            FieldConfig::text("price", ".price-content .price-column"),
            FieldConfig::text("logistics", ".logistics-city"),
            FieldConfig::nested_list(
                "sku_options",
                ".sku-module-wrapper",
                vec![
                    FieldConfig::text("category_name", ".sku-prop-module-name").default_value(""),
                    // 样式一：颜色/图片
                    FieldConfig::nested_list(
                        "options",
                        ".prop-item-wrapper .prop-item",
                        vec![
                            FieldConfig::text("title", ".prop-name").default_value(""),
                            FieldConfig::attribute("image_style", ".prop-img", "style")
                                .default_value(""),
                        ],
                    ),
                    // 样式二：规格/价格/库存
                    FieldConfig::nested_list(
                        "sku_item_options",
                        ".sku-item-wrapper",
                        vec![
                            FieldConfig::text("name", ".sku-item-name").default_value(""),
                            FieldConfig::text("price", ".discountPrice-price").default_value(""),
                            FieldConfig::text("stock", ".sku-item-sale-num").default_value(""),
                        ],
                    ),
                ],
            ),
            FieldConfig::nested_list(
                "head_attributes",
                ".cpv-item",
                vec![
                    FieldConfig::text("name", ".cpv-item-info-subtitle"),
                    FieldConfig::text("value", ".cpv-item-info-title"),
                ],
            ),
            FieldConfig::nested(
                "filter_data",
                ".filters",
                vec![
                    FieldConfig::nested(
                        "search",
                        ".search-wrapper",
                        vec![
                            FieldConfig::text("label", ".label"),
                            FieldConfig::attribute("placeholder", "input", "placeholder"),
                            FieldConfig::text("button_text", ".next-search-btn-text"),
                        ],
                    ),
                    FieldConfig::nested_list(
                        "filters",
                        ".radio-selector-bar",
                        vec![
                            FieldConfig::text("category", ".label-content"),
                            FieldConfig::list(
                                "options",
                                ".btn-selector-item .next-btn-helper",
                                vec![FieldConfig::new("option", FieldKind::Text)],
                            ),
                            FieldConfig::text("default_selected", ".selected .next-btn-helper"),
                        ],
                    ),
                    FieldConfig::nested_list(
                        "other_specs",
                        ".radio-props-list-item",
                        vec![
                            FieldConfig::text("spec_name", "spn"),
                            FieldConfig::text("spec_value", "span"),
                        ],
                    ),
                ],
            ),
            FieldConfig::nested(
                "spec_variants",
                ".selector-table",
                vec![
                    FieldConfig::list(
                        "headers",
                        "th.next-table-header-node",
                        vec![FieldConfig::new("name", FieldKind::Text)],
                    ),
                    FieldConfig::nested_list(
                        "rows",
                        ".next-table-body tr",
                        vec![
                            FieldConfig::attribute(
                                "image_url",
                                "td:first-child .od-gyp-pc-sku-selection-sku",
                                "style",
                            )
                            .default_value(""),
                            FieldConfig::list(
                                "cells",
                                "td",
                                vec![FieldConfig::new("value", FieldKind::Text)],
                            ),
                        ],
                    ),
                ],
            ),
            FieldConfig::nested(
                "body_attributes",
                ".od-pc-attribute",
                vec![
                    FieldConfig::attribute("title", ".offer-title-wrapper", "data-title"),
                    FieldConfig::nested_list(
                        "attributes",
                        ".offer-attr-item",
                        vec![
                            FieldConfig::text("name", ".offer-attr-item-name"),
                            FieldConfig::text("value", ".offer-attr-item-value"),
                        ],
                    ),
                ],
            ),
            FieldConfig::nested(
                "product_images",
                ".img-list-wrapper",
                vec![FieldConfig::nested_list(
                    "images",
                    ".detail-gallery-turn-wrapper",
                    vec![
                        FieldConfig::attribute("image_url", ".detail-gallery-img", "src"),
                        FieldConfig::attribute("index", ".detail-gallery-img", "ind"),
                        FieldConfig::attribute("video_icon_src", ".video-icon", "src")
                            .default_value(""),
                    ],
                )],
            ),
            FieldConfig::nested(
                "product_details",
                ".detail-desc-module",
                vec![
                    FieldConfig::attribute("title", ".offer-title-wrapper", "data-title")
                        .default_value(""),
                    FieldConfig::nested_list(
                        "detail_images",
                        "img.desc-img-no-load, img.desc-img-loaded",
                        vec![
                            FieldConfig::new("placeholder_src", FieldKind::Attribute).attr("src"),
                            FieldConfig::new("actual_image_src", FieldKind::Attribute)
                                .attr("data-lazyload-src"),
                        ],
                    ),
                ],
            ),
            FieldConfig::nested(
                "package_details",
                ".od-pc-offer-cross .od-pc-offer-table table",
                vec![
                    FieldConfig::list(
                        "headers",
                        "thead th",
                        vec![FieldConfig::new("name", FieldKind::Text)],
                    ),
                    FieldConfig::nested_list(
                        "rows",
                        "tbody tr",
                        vec![FieldConfig::list(
                            "cells",
                            "td",
                            vec![FieldConfig::new("value", FieldKind::Text)],
                        )],
                    ),
                ],
            ),
        ],
    )
}

/// 创建 1688 管道
pub fn pipeline() -> Pipeline {
    Pipeline::new(
        "alibaba_1688",
        schema(),
        vec![
            ("sku_options", process_sku_options),
            ("filter_data", process_filter_data),
            ("spec_variants", process_spec_variants),
            ("product_images", process_product_images),
            ("product_details", process_product_details),
            ("package_details", process_package_details),
        ],
        Some(merge_title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_variants_zip_headers_with_cells() {
        let raw = json!({
            "headers": [{"name": "型号"}, {"name": "价格"}],
            "rows": [
                {
                    "image_url": "background-image: url(\"https://img/1.jpg\");",
                    "cells": [{"value": "K36-0.8米-黑"}, {"value": "¥31.80"}],
                },
                {"image_url": "", "cells": [{"value": "K36-1.6米-白"}]},
            ],
        });
        let processed = process_spec_variants(&raw);
        assert_eq!(
            processed,
            json!([
                {"image_url": "https://img/1.jpg", "型号": "K36-0.8米-黑", "价格": "¥31.80"},
                {"型号": "K36-1.6米-白", "价格": ""},
            ])
        );
    }

    #[test]
    fn spec_variants_without_table_are_null() {
        assert_eq!(process_spec_variants(&json!({"headers": []})), Value::Null);
        assert_eq!(process_spec_variants(&json!("散文本")), Value::Null);
    }

    #[test]
    fn product_images_sort_by_index_and_flag_videos() {
        let raw = json!({
            "images": [
                {"image_url": "https://img/b.jpg", "index": "2", "video_icon_src": ""},
                {"image_url": "https://img/a.jpg", "index": "0", "video_icon_src": "https://img/play.png"},
                {"image_url": "https://img/c.jpg", "index": "bogus"},
            ],
        });
        let processed = process_product_images(&raw);
        assert_eq!(
            processed,
            json!([
                {"url": "https://img/a.jpg", "index": "0", "is_video": true},
                {"url": "https://img/c.jpg", "index": "bogus", "is_video": false},
                {"url": "https://img/b.jpg", "index": "2", "is_video": false},
            ])
        );
    }

    #[test]
    fn product_details_skip_lazyload_placeholders() {
        let raw = json!({
            "title": "产品详情",
            "detail_images": [
                {"placeholder_src": "https://img/lazyload.png", "actual_image_src": "https://img/real1.jpg"},
                {"placeholder_src": "https://img/lazyload.png", "actual_image_src": ""},
                {"placeholder_src": "https://img/real2.jpg", "actual_image_src": ""},
            ],
        });
        let processed = process_product_details(&raw);
        assert_eq!(
            processed,
            json!({
                "images": [{"url": "https://img/real1.jpg"}, {"url": "https://img/real2.jpg"}],
                "title": "产品详情",
            })
        );
    }

    #[test]
    fn sku_options_handle_both_table_styles() {
        let raw = json!([
            {
                "category_name": "颜色",
                "options": [
                    {"title": "黑色", "image_style": "background-image: url('https://img/black.jpg');"},
                    {"title": "白色", "image_style": ""},
                ],
            },
            {
                "category_name": "规格",
                "sku_item_options": [
                    {"name": "0.8米", "price": "¥31.80", "stock": "999"},
                ],
            },
        ]);
        let processed = process_sku_options(&raw);
        assert_eq!(
            processed,
            json!([
                {
                    "category_name": "颜色",
                    "options": [
                        {"title": "黑色", "image_url": "https://img/black.jpg"},
                        {"title": "白色"},
                    ],
                },
                {
                    "category_name": "规格",
                    "options": [{"title": "0.8米", "price": "¥31.80", "stock": "999"}],
                },
            ])
        );
    }

    #[test]
    fn filter_options_collapse_to_plain_values() {
        let raw = json!({
            "search": {"label": "搜索", "placeholder": "请输入"},
            "filters": [
                {"category": "发货地", "options": [{"option": "浙江"}, {"option": "广东"}, {"bad": 1}]},
            ],
        });
        let processed = process_filter_data(&raw);
        assert_eq!(
            processed["filters"][0]["options"],
            json!(["浙江", "广东"])
        );
        // 其余字段原样保留
        assert_eq!(processed["search"], raw["search"]);
    }

    #[test]
    fn package_details_zip_rows() {
        let raw = json!({
            "headers": [{"name": "重量"}, {"name": "体积"}],
            "rows": [{"cells": [{"value": "0.5kg"}]}],
        });
        assert_eq!(
            process_package_details(&raw),
            json!([{"重量": "0.5kg", "体积": ""}])
        );
    }

    #[test]
    fn merge_title_concatenates_both_parts() {
        let data = json!({
            "product_title_main": "多功能无线充电插座",
            "product_title_second": "带线接线板",
        });
        let merged = merge_title(data);
        assert_eq!(merged["full_title"], json!("多功能无线充电插座带线接线板"));

        let partial = merge_title(json!({"product_title_main": "单标题"}));
        assert!(partial.get("full_title").is_none());
    }

    #[test]
    fn schema_declares_all_product_fields() {
        let schema = schema();
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "product_title_main",
                "product_title_second",
                "sales_count",
                "evaluation_count",
                "price",
                "logistics",
                "sku_options",
                "head_attributes",
                "filter_data",
                "spec_variants",
                "body_attributes",
                "product_images",
                "product_details",
                "package_details",
            ]
        );
        assert!(!schema.selectors().is_empty());
    }
}
