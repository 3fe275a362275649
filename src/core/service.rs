//! 内容分发服务
//!
//! 对外的唯一入口：取今日经文、刷新、查询进度、重置周期、清空译本缓存。
//!
//! ## 主要组件
//!
//! - `ContentDeliveryService`: 协调轮换引擎、译本缓存与引用解析
//! - `ServiceStats`: 线程安全的统计信息收集器
//!
//! ## 使用示例
//!
//! ```no_run
//! use verse_cycle::config::ServiceConfig;
//! use verse_cycle::core::ContentDeliveryService;
//!
//! # async fn run() -> verse_cycle::error::ContentResult<()> {
//! let service = ContentDeliveryService::from_config(&ServiceConfig::default())?;
//! let record = service.get_selection_for_today("kjv").await?;
//! println!("{}: {:?}", record.canonical_reference, record.rendered_text);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::corpus::{CorpusIndex, ReferenceResolver};
use crate::error::{helpers, ContentError, ContentResult};
use crate::network::{HttpTranslationSource, TranslationSource};
use crate::registry::{
    normalize_translation_id, PreferenceSource, SharedPreference, TranslationRegistry,
};
use crate::rotation::{DailySelectionRecord, Progress, RotationEngine, RotationStats};
use crate::storage::{CacheConfig, CacheStats, KeyValueStore, RedbStore, TranslationCache};

/// 今日记录被并发替换时的最大重试次数
const MAX_RENDER_ATTEMPTS: usize = 3;

/// 内容分发服务
///
/// 组合以下子系统：
///
/// - **轮换引擎**: 决定今天是哪节经文，并持久化周期状态
/// - **译本缓存**: 内存与持久两级缓存整份译本文档
/// - **引用解析**: 把经文地址转换为文档查找路径
/// - **偏好来源**: 提供刷新时使用的译本
///
/// 所有字段都可以跨任务共享，统计信息使用原子计数。
pub struct ContentDeliveryService {
    /// 轮换引擎，独占 `rotation_state` 与 `daily_selection` 两个键
    engine: Arc<RotationEngine>,

    /// 译本缓存
    cache: Arc<TranslationCache>,

    corpus: Arc<CorpusIndex>,

    /// 用户偏好（只读）
    preferences: Arc<dyn PreferenceSource>,

    clock: Arc<dyn Clock>,

    /// 服务统计信息
    stats: ServiceStats,
}

/// 服务构建器
pub struct ServiceBuilder {
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn TranslationSource>,
    preferences: Option<Arc<dyn PreferenceSource>>,
    clock: Arc<dyn Clock>,
    corpus: Option<Arc<CorpusIndex>>,
    cache_config: CacheConfig,
    seed: Option<u64>,
}

impl ServiceBuilder {
    pub fn preferences(mut self, preferences: Arc<dyn PreferenceSource>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 替换经文索引（默认使用完整正典）
    pub fn corpus(mut self, corpus: Arc<CorpusIndex>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// 固定排列的随机种子
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> ContentResult<ContentDeliveryService> {
        let corpus = match self.corpus {
            Some(corpus) => corpus,
            None => CorpusIndex::global()?,
        };

        let engine = match self.seed {
            Some(seed) => RotationEngine::with_seed(
                Arc::clone(&self.store),
                Arc::clone(&corpus),
                Arc::clone(&self.clock),
                seed,
            ),
            None => RotationEngine::new(
                Arc::clone(&self.store),
                Arc::clone(&corpus),
                Arc::clone(&self.clock),
            ),
        };

        let cache = TranslationCache::new(
            self.store,
            self.source,
            Arc::clone(&self.clock),
            self.cache_config,
        );

        let preferences = self.preferences.unwrap_or_else(|| {
            Arc::new(SharedPreference::new(
                crate::config::constants::DEFAULT_TRANSLATION,
            ))
        });

        Ok(ContentDeliveryService {
            engine: Arc::new(engine),
            cache: Arc::new(cache),
            corpus,
            preferences,
            clock: self.clock,
            stats: ServiceStats::default(),
        })
    }
}

impl ContentDeliveryService {
    /// 以存储和译本来源开始构建，其余部分有默认值
    pub fn builder(store: Arc<dyn KeyValueStore>, source: Arc<dyn TranslationSource>) -> ServiceBuilder {
        ServiceBuilder {
            store,
            source,
            preferences: None,
            clock: Arc::new(SystemClock),
            corpus: None,
            cache_config: CacheConfig::default(),
            seed: None,
        }
    }

    /// 按配置组装：redb 存储、HTTP 来源、配置中的默认译本
    pub fn from_config(config: &ServiceConfig) -> ContentResult<Self> {
        let registry: Arc<dyn TranslationRegistry> = Arc::new(config.registry());
        let store = RedbStore::open(config.expanded_store_path())?;
        let source = HttpTranslationSource::new(&config.base_url, registry, config.fetch_timeout())?;

        Self::builder(Arc::new(store), Arc::new(source))
            .preferences(Arc::new(SharedPreference::new(
                config.default_translation.clone(),
            )))
            .cache_config(config.cache_config())
            .build()
    }

    /// 取今日经文，并确保以指定译本呈现
    ///
    /// 今天已有该译本的记录时直接返回；译本不同时只重写文本，经文位置不变；
    /// 今天还没有记录时推进轮换。呈现失败时错误原样返回，位置已被占用。
    pub async fn get_selection_for_today(
        &self,
        preferred_translation_id: &str,
    ) -> ContentResult<DailySelectionRecord> {
        let today = self.clock.today();
        let translation_id = normalize_translation_id(preferred_translation_id);
        let preferred_translation_id = translation_id.as_str();

        for attempt in 1..=MAX_RENDER_ATTEMPTS {
            let record = match self.engine.today_record(today).await? {
                Some(record) => record,
                None => {
                    self.stats.inc_advances();
                    self.engine.select_for_today(today).await?
                }
            };

            if record.is_rendered_in(preferred_translation_id) {
                self.stats.inc_served_from_record();
                return Ok(record);
            }

            let text = self.render(&record, preferred_translation_id).await?;
            if record.rendered_text.is_some() {
                self.stats.inc_rerenders();
                tracing::info!(
                    "切换译本重新呈现 {}: {:?} -> {}",
                    record.canonical_reference,
                    record.translation_id,
                    preferred_translation_id
                );
            }

            match self
                .engine
                .update_rendering(today, record.cursor_at_selection, preferred_translation_id, text)
                .await?
            {
                Some(updated) => {
                    self.stats.inc_rendered();
                    return Ok(updated);
                }
                None => {
                    tracing::warn!("今日记录在呈现期间被替换，重试 ({}/{})", attempt, MAX_RENDER_ATTEMPTS);
                }
            }
        }

        Err(ContentError::PersistenceFailed(
            "今日记录持续被并发替换，放弃呈现".to_string(),
        ))
    }

    /// 刷新今日经文；`force` 为真时放弃今天的经文并推进一格
    pub async fn refresh(&self, force: bool) -> ContentResult<DailySelectionRecord> {
        let preferred = self.preferences.preferred_translation();
        if force {
            self.stats.inc_advances();
            self.engine.force_advance(self.clock.today()).await?;
        }
        self.get_selection_for_today(&preferred).await
    }

    pub async fn get_progress(&self) -> ContentResult<Progress> {
        self.engine.progress().await
    }

    pub async fn reset_cycle(&self) -> ContentResult<()> {
        self.engine.reset_cycle().await
    }

    /// 清空译本缓存，返回持久层删除的条目数
    pub async fn clear_translation_cache(&self) -> ContentResult<usize> {
        self.cache.clear_all().await
    }

    pub async fn rotation_stats(&self) -> ContentResult<RotationStats> {
        self.engine.stats().await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn corpus(&self) -> &Arc<CorpusIndex> {
        &self.corpus
    }

    pub fn get_stats(&self) -> ServiceStatsSnapshot {
        self.stats.snapshot()
    }

    /// 在指定译本中查找记录对应的经文
    async fn render(&self, record: &DailySelectionRecord, translation_id: &str) -> ContentResult<String> {
        let unit = self.corpus.get(record.unit_index as usize).ok_or_else(|| {
            helpers::persistence_error(format!("今日记录的位置越界: {}", record.unit_index))
        })?;

        let document = self.cache.get(translation_id).await?;
        let path = ReferenceResolver::to_lookup_path(unit);

        match document.lookup(&path) {
            Some(text) => Ok(text.trim().to_string()),
            None => {
                let missing = ContentError::MissingUnit {
                    reference: unit.canonical_reference.clone(),
                    translation_id: translation_id.to_string(),
                };
                tracing::warn!("{}", missing);
                self.stats.inc_unavailable();
                Err(ContentError::ContentUnavailable {
                    reference: unit.canonical_reference.clone(),
                    translation_id: translation_id.to_string(),
                })
            }
        }
    }
}

/// 服务统计信息
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 轮换推进次数（含强制推进）
    pub advances: AtomicUsize,

    /// 直接返回已有记录的次数
    pub served_from_record: AtomicUsize,

    /// 成功写入文本的次数
    pub rendered: AtomicUsize,

    /// 因译本切换而重写文本的次数
    pub rerenders: AtomicUsize,

    /// 译本中缺少经文的次数
    pub unavailable: AtomicUsize,
}

impl ServiceStats {
    pub fn inc_advances(&self) {
        self.advances.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_served_from_record(&self) {
        self.served_from_record.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rendered(&self) {
        self.rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rerenders(&self) {
        self.rerenders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取统计数据快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            advances: self.advances.load(Ordering::Relaxed),
            served_from_record: self.served_from_record.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
            rerenders: self.rerenders.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
        }
    }
}

/// 服务统计数据的快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatsSnapshot {
    pub advances: usize,
    pub served_from_record: usize,
    pub rendered: usize,
    pub rerenders: usize,
    pub unavailable: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::document::Document;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    /// 只含创世记第 1 章前 3 节的译本
    struct GenesisOnly;

    #[async_trait]
    impl TranslationSource for GenesisOnly {
        async fn fetch(&self, translation_id: &str) -> ContentResult<Document> {
            let mut doc = Document::new();
            for verse in 1..=3 {
                doc.insert("Genesis", 1, verse, format!("[{}] Genesis 1:{} ", translation_id, verse));
            }
            Ok(doc)
        }
    }

    fn service(store: Arc<MemoryStore>) -> ContentDeliveryService {
        ContentDeliveryService::builder(store, Arc::new(GenesisOnly))
            .clock(Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap(),
            )))
            .seed(3)
            .build()
            .unwrap()
    }

    /// 预置一个从指定位置开始的排列
    async fn seed_permutation(store: &MemoryStore, first: u32) {
        let mut permutation: Vec<u32> = (0..31_102).collect();
        permutation.swap(0, first as usize);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = crate::rotation::RotationState {
            permutation,
            cursor: 0,
            cycle_count: 1,
            created_at: now,
            last_reset: now,
        };
        store
            .put(
                crate::rotation::ROTATION_STATE_KEY,
                serde_json::to_vec(&state).unwrap(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_renders_with_trimmed_text() {
        let store = Arc::new(MemoryStore::new());
        seed_permutation(&store, 1).await;
        let service = service(store);

        let record = service.get_selection_for_today("kjv").await.unwrap();
        assert_eq!(record.canonical_reference, "Genesis 1:2");
        assert_eq!(record.rendered_text.as_deref(), Some("[kjv] Genesis 1:2"));
        assert_eq!(record.translation_id.as_deref(), Some("kjv"));
    }

    #[tokio::test]
    async fn test_missing_unit_surfaces_as_content_unavailable() {
        let store = Arc::new(MemoryStore::new());
        seed_permutation(&store, 31_101).await;
        let service = service(store);

        let err = service.get_selection_for_today("kjv").await.unwrap_err();
        assert_eq!(
            err,
            ContentError::ContentUnavailable {
                reference: "Revelation 22:21".to_string(),
                translation_id: "kjv".to_string(),
            }
        );
        assert_eq!(service.get_stats().unavailable, 1);
        // 位置已被占用
        assert_eq!(service.get_progress().await.unwrap().current, 1);
    }

    #[tokio::test]
    async fn test_progress_before_first_selection() {
        let service = service(Arc::new(MemoryStore::new()));
        let progress = service.get_progress().await.unwrap();
        assert_eq!(progress, Progress::new(0, 31_102));
    }
}
