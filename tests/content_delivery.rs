// 内容分发服务集成测试
//
// 覆盖同日幂等、译本切换、经文缺失、刷新、获取失败后的恢复和并发读取。

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::*;

use std::sync::Arc;

use verse_cycle::{Clock, ContentError};

#[tokio::test]
async fn test_same_day_reads_are_idempotent() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let first = service.get_selection_for_today("kjv").await.expect("首次读取应成功");
    let writes_after_first = env.store.write_count();

    let unit = env.corpus.get(first.unit_index as usize).unwrap();
    assert_eq!(first.canonical_reference, unit.canonical_reference);
    assert_eq!(
        first.rendered_text.as_deref(),
        Some(verse_text("kjv", &unit.canonical_reference).as_str())
    );
    assert_eq!(first.translation_id.as_deref(), Some("kjv"));
    assert_eq!(first.selection_date, env.clock.today());
    assert_eq!(first.progress_numerator, 1);
    assert_eq!(first.progress_denominator, 71);

    for _ in 0..3 {
        let again = service.get_selection_for_today("kjv").await.unwrap();
        assert_eq!(again, first);
    }

    // 后续读取不写存储也不访问来源
    assert_eq!(env.store.write_count(), writes_after_first);
    assert_eq!(env.source.total_calls(), 1);
    assert_eq!(service.get_stats().served_from_record, 3);
}

#[tokio::test]
async fn test_translation_switch_keeps_position() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let kjv = service.get_selection_for_today("kjv").await.unwrap();
    let web = service.get_selection_for_today("web").await.unwrap();

    assert_eq!(web.unit_index, kjv.unit_index);
    assert_eq!(web.cursor_at_selection, kjv.cursor_at_selection);
    assert_eq!(web.progress_numerator, kjv.progress_numerator);
    assert_eq!(web.canonical_reference, kjv.canonical_reference);
    assert_eq!(web.translation_id.as_deref(), Some("web"));
    assert_eq!(
        web.rendered_text.as_deref(),
        Some(verse_text("web", &kjv.canonical_reference).as_str())
    );
    assert_eq!(service.get_progress().await.unwrap().current, 1);

    // 切回 kjv：文本从内存缓存取得
    let back = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(back.rendered_text, kjv.rendered_text);
    assert_eq!(env.source.calls_for("kjv"), 1);
    assert_eq!(env.source.calls_for("web"), 1);
    assert_eq!(service.get_stats().rerenders, 2);

    // 第二天只前进一格
    env.clock.next_day();
    let tomorrow = service.get_selection_for_today("web").await.unwrap();
    assert_eq!(tomorrow.cursor_at_selection, 1);
    assert_eq!(tomorrow.progress_numerator, 2);
    assert_ne!(tomorrow.unit_index, kjv.unit_index);
}

#[tokio::test]
async fn test_missing_unit_reports_content_unavailable() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let kjv = service.get_selection_for_today("kjv").await.unwrap();
    env.source.set_document(
        "web",
        document_without(&env.corpus, "web", kjv.unit_index as usize),
    );

    let result = service.get_selection_for_today("web").await;
    match result {
        Err(ContentError::ContentUnavailable {
            reference,
            translation_id,
        }) => {
            assert_eq!(reference, kjv.canonical_reference);
            assert_eq!(translation_id, "web");
        }
        other => panic!("应返回 ContentUnavailable，实际为 {:?}", other),
    }

    // 不会替换成别的经文，原记录保持不变
    let still = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(still, kjv);
    assert_eq!(service.get_progress().await.unwrap().current, 1);
    assert_eq!(service.get_stats().unavailable, 1);
}

#[tokio::test]
async fn test_unknown_translation_is_rejected() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let result = service.get_selection_for_today("niv").await;
    assert!(matches!(result, Err(ContentError::UnknownTranslation(_))));

    // 位置已占用，换成已知译本后呈现同一节
    let record = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(record.cursor_at_selection, 0);
    assert_eq!(service.get_progress().await.unwrap().current, 1);
}

#[tokio::test]
async fn test_fetch_failure_then_recovery() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();
    env.source.set_failing(true);

    let result = service.get_selection_for_today("kjv").await;
    assert!(matches!(result, Err(ContentError::FetchFailed { .. })));
    assert!(result.unwrap_err().is_retryable());
    assert_eq!(service.get_progress().await.unwrap().current, 1);

    env.source.set_failing(false);
    let record = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(record.cursor_at_selection, 0);
    assert!(record.rendered_text.is_some());
    assert_eq!(service.get_progress().await.unwrap().current, 1);
}

#[tokio::test]
async fn test_refresh_uses_preference() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let kjv = service.get_selection_for_today("kjv").await.unwrap();

    env.preference.set("web");
    let refreshed = service.refresh(false).await.unwrap();
    assert_eq!(refreshed.unit_index, kjv.unit_index);
    assert_eq!(refreshed.translation_id.as_deref(), Some("web"));

    let forced = service.refresh(true).await.unwrap();
    assert_ne!(forced.unit_index, kjv.unit_index);
    assert_eq!(forced.cursor_at_selection, 1);
    assert_eq!(forced.selection_date, env.clock.today());
    assert_eq!(forced.translation_id.as_deref(), Some("web"));
    assert_eq!(service.get_progress().await.unwrap().current, 2);

    // 强制刷新后当天的读取返回新记录
    let again = service.get_selection_for_today("web").await.unwrap();
    assert_eq!(again, forced);
}

#[tokio::test]
async fn test_reset_and_clear_cache() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    service.get_selection_for_today("kjv").await.unwrap();
    service.get_selection_for_today("web").await.unwrap();

    assert_eq!(service.clear_translation_cache().await.unwrap(), 2);
    assert!(service.cache().cached_translations().await.unwrap().is_empty());

    service.reset_cycle().await.unwrap();
    let progress = service.get_progress().await.unwrap();
    assert_eq!((progress.current, progress.total), (0, 71));

    let record = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(record.cursor_at_selection, 0);
    assert_eq!(env.source.calls_for("kjv"), 2);

    let stats = service.rotation_stats().await.unwrap();
    assert_eq!(stats.cycle_count, 1);
    assert_eq!(stats.used, 1);
    assert_eq!(stats.remaining, 70);
}

#[tokio::test]
async fn test_record_survives_service_restart() {
    let env = TestEnvironment::new(SMALL);

    let first = env.service().get_selection_for_today("kjv").await.unwrap();

    // 新实例：内存缓存为空，但记录已持久化
    let restarted = env.service_with_seed(1234);
    let again = restarted.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(again, first);
    assert_eq!(env.source.total_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_readers_get_the_same_record() {
    let env = TestEnvironment::new(SMALL);
    let service = Arc::new(env.service());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get_selection_for_today("kjv").await })
        })
        .collect();

    let mut records = Vec::new();
    for handle in handles {
        records.push(handle.await.expect("并发任务应完成").unwrap());
    }

    assert!(records.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(env.source.calls_for("kjv"), 1);
    assert_eq!(service.get_progress().await.unwrap().current, 1);
}

#[tokio::test]
async fn test_full_cycle_through_service() {
    let env = TestEnvironment::new(FIVE);
    let service = env.service();

    let mut references = Vec::new();
    for _ in 0..5 {
        let record = service.get_selection_for_today("kjv").await.unwrap();
        references.push(record.canonical_reference);
        env.clock.next_day();
    }
    references.sort();
    assert_eq!(
        references,
        vec!["Jude 1:1", "Jude 1:2", "Jude 1:3", "Jude 1:4", "Jude 1:5"]
    );

    let wrapped = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(wrapped.progress_numerator, 1);
    assert_eq!(service.rotation_stats().await.unwrap().cycle_count, 2);
    // 整个周期只获取过一次译本
    assert_eq!(env.source.calls_for("kjv"), 1);
}

#[tokio::test]
async fn test_translation_id_case_is_ignored() {
    let env = TestEnvironment::new(SMALL);
    let service = env.service();

    let upper = service.get_selection_for_today("KJV").await.unwrap();
    assert_eq!(upper.translation_id.as_deref(), Some("kjv"));

    let lower = service.get_selection_for_today("kjv").await.unwrap();
    assert_eq!(lower, upper);
    assert_eq!(env.source.total_calls(), 1);
    assert_eq!(service.get_stats().served_from_record, 1);
}
