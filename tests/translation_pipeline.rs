//! 翻译管道集成测试
//!
//! 覆盖展平 → 分批翻译 → 重建 → 合并整条链路的可测性质。

use serde_json::json;

use oversea::translation::{
    flatten, merge_product_data, rebuild, split_product_data, translate_product_data,
    BatchTranslationCoordinator, ProgressSink, ProgressStatus, TranslationStatus,
};

mod common;

use common::{sample_product_document, test_config, MockBackend, MockBehavior};

/// 往返基数：无论协作方行为如何，输出与输入的长度、路径集合、顺序一致
#[tokio::test]
async fn round_trip_cardinality_holds_for_any_backend() {
    let doc = sample_product_document();
    let leaves = flatten(&doc);

    for backend in [
        MockBackend::new(MockBehavior::PassThrough),
        MockBackend::new(MockBehavior::Silent),
        MockBackend::dictionary(&[("多功能无线充电插座", "Multifunctional Socket")]),
    ] {
        let coordinator = BatchTranslationCoordinator::new(&backend, &test_config(3, 2))
            .expect("valid config");
        let resolved = coordinator.translate(&leaves, &ProgressSink::Null).await;

        assert_eq!(resolved.len(), leaves.len());
        let input_paths: Vec<_> = leaves.iter().map(|l| l.path.as_str()).collect();
        let output_paths: Vec<_> = resolved.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(input_paths, output_paths);
    }
}

/// 全量"无需翻译"时重建结果与原文档深度相等
#[tokio::test]
async fn rebuild_is_identity_when_nothing_needs_translation() {
    let doc = sample_product_document();
    let leaves = flatten(&doc);
    let backend = MockBackend::new(MockBehavior::PassThrough);
    let coordinator =
        BatchTranslationCoordinator::new(&backend, &test_config(10, 3)).expect("valid config");

    let resolved = coordinator.translate(&leaves, &ProgressSink::Null).await;
    let rebuilt = rebuild(&doc, &resolved);

    assert_eq!(rebuilt, doc);
}

/// 协作方永远不响应某个路径时，该路径保留原文且状态为 Missed
#[tokio::test]
async fn unanswered_path_degrades_to_missed() {
    let doc = json!({"title": "红色T恤", "price": "¥31.80", "note": "现货"});
    let leaves = flatten(&doc);
    let backend = MockBackend::new(MockBehavior::DropPaths(vec!["price".to_string()]));
    let coordinator =
        BatchTranslationCoordinator::new(&backend, &test_config(10, 3)).expect("valid config");

    let resolved = coordinator.translate(&leaves, &ProgressSink::Null).await;

    let price = resolved
        .iter()
        .find(|leaf| leaf.path == "price")
        .expect("price leaf must survive");
    assert_eq!(price.text, "¥31.80");
    assert_eq!(price.status, TranslationStatus::Missed);

    // 被丢弃的路径每轮都会重试：首轮全量，后两轮只剩 price
    assert_eq!(backend.call_count(), 3);
    assert_eq!(*backend.batch_sizes.lock().unwrap(), vec![3, 1, 1]);

    let others_resolved = resolved
        .iter()
        .filter(|leaf| leaf.path != "price")
        .all(|leaf| leaf.status == TranslationStatus::NotNeeded);
    assert!(others_resolved);
}

/// 拆分与合并互逆
#[test]
fn split_then_merge_is_identity() {
    let doc = sample_product_document();
    let (translatable, non_translatable) = split_product_data(&doc);
    let merged = merge_product_data(translatable, non_translatable);
    assert_eq!(merged, doc);
}

/// 路径寻址：`{"a": {"b": [1, "草"]}}` 中的中文叶子地址为 `a.b[1]`
#[test]
fn path_addressing_matches_contract() {
    let leaves = flatten(&json!({"a": {"b": [1, "草"]}}));
    // 非空标量全部展平：整数叶子字符串化为 "1"
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].path, "a.b[0]");
    assert_eq!(leaves[0].text, "1");
    assert_eq!(leaves[1].path, "a.b[1]");
    assert_eq!(leaves[1].text, "草");
}

/// 批次边界：batch_size=2、5 个待解析条目 → 第一轮三个批次 [2,2,1]
#[tokio::test]
async fn batch_boundaries_are_contiguous() {
    let doc = json!({"items": ["一", "二", "三", "四", "五"]});
    let leaves = flatten(&doc);
    assert_eq!(leaves.len(), 5);

    let backend = MockBackend::new(MockBehavior::PassThrough);
    let coordinator =
        BatchTranslationCoordinator::new(&backend, &test_config(2, 3)).expect("valid config");
    let _ = coordinator.translate(&leaves, &ProgressSink::Null).await;

    assert_eq!(*backend.batch_sizes.lock().unwrap(), vec![2, 2, 1]);
}

/// 端到端：标题被翻译，url 不经过协作方、原样保留
#[tokio::test]
async fn end_to_end_red_t_shirt() {
    let doc = json!({"title": "红色T恤", "url": "http://x"});
    let backend = MockBackend::dictionary(&[("红色T恤", "Red T-shirt")]);
    let config = test_config(50, 3);

    let translated = translate_product_data(&doc, &config, &backend, &ProgressSink::Null)
        .await
        .expect("translation should succeed");

    assert_eq!(translated, json!({"title": "Red T-shirt", "url": "http://x"}));

    // url 从未出现在提交给协作方的批次里
    assert_eq!(*backend.batch_sizes.lock().unwrap(), vec![1]);
}

/// 进度事件：started → 批次事件 → pass_completed → completed，
/// 完成事件在协调器返回前全部可被消费端观察到
#[tokio::test]
async fn progress_events_stream_in_order() {
    let doc = sample_product_document();
    let backend = MockBackend::new(MockBehavior::PassThrough);
    let config = test_config(4, 3);

    let (sink, mut rx) = ProgressSink::channel();
    let consumer = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let _ = translate_product_data(&doc, &config, &backend, &sink)
        .await
        .expect("translation should succeed");
    drop(sink);

    let events = consumer.await.expect("consumer should finish");
    assert!(events.len() >= 3);
    assert_eq!(events.first().unwrap().status, ProgressStatus::Started);
    assert_eq!(events.last().unwrap().status, ProgressStatus::Completed);
    assert_eq!(events.last().unwrap().percent, 100.0);

    // 批次事件携带轮次与批次编号，处理计数单调不减
    let mut processed = 0;
    for event in &events {
        assert_eq!(event.stage, "translating");
        assert!(event.processed_items >= processed);
        processed = event.processed_items;
        if event.status == ProgressStatus::InProgress {
            assert!(event.pass.is_some());
            assert!(event.chunk_index.is_some());
            assert!(event.chunk_total.is_some());
        }
    }
}

/// 翻译整文档：词典命中的叶子被替换，其余结构原样保留
#[tokio::test]
async fn full_document_translation_preserves_structure() {
    let doc = sample_product_document();
    let backend = MockBackend::dictionary(&[
        ("多功能无线充电插座", "Multifunctional Wireless Charging Socket"),
        ("带线接线板", "Wired Power Strip"),
        ("K36-0.8米-黑", "K36-0.8m-Black"),
        ("阻燃PC", "Flame-retardant PC"),
    ]);
    let config = test_config(50, 3);

    let translated = translate_product_data(&doc, &config, &backend, &ProgressSink::Null)
        .await
        .expect("translation should succeed");

    assert_eq!(
        translated["product_title_main"],
        json!("Multifunctional Wireless Charging Socket")
    );
    assert_eq!(
        translated["spec_variants"][0]["型号"],
        json!("K36-0.8m-Black")
    );
    assert_eq!(
        translated["head_attributes"][0]["value"],
        json!("Flame-retardant PC")
    );
    // 词典没命中的保留原文
    assert_eq!(translated["price"], doc["price"]);
    // 不翻译侧原样回来，包括 product_details 的 images
    assert_eq!(translated["url"], doc["url"]);
    assert_eq!(translated["product_images"], doc["product_images"]);
    assert_eq!(
        translated["product_details"]["images"],
        doc["product_details"]["images"]
    );
    // 键集合一致
    let doc_keys: Vec<_> = doc.as_object().unwrap().keys().collect();
    let translated_keys: Vec<_> = translated.as_object().unwrap().keys().collect();
    assert_eq!(doc_keys.len(), translated_keys.len());
}
