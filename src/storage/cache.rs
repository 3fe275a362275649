//! 两级译本缓存
//!
//! 内存 LRU 层不检查过期；持久层按获取时间检查 TTL，命中后回填内存层；
//! 两层都未命中时从来源获取一次，解析成功后先写持久层再写内存层。
//! 同一译本的并发未命中共享同一次获取。

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::kv::{to_json_bytes, KeyValueStore};
use crate::clock::Clock;
use crate::config::constants;
use crate::document::Document;
use crate::error::{ContentError, ContentResult};
use crate::network::TranslationSource;
use crate::registry::normalize_translation_id;

/// 持久层键前缀
pub const CACHE_KEY_PREFIX: &str = "translation_cache:";

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub translation_id: String,
    pub fetched_at: DateTime<Utc>,
    pub document: Arc<Document>,
}

impl CacheEntry {
    /// 距获取时间已满 TTL 即视为过期
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.fetched_at >= ttl
    }
}

/// 持久层记录格式
#[derive(Deserialize)]
struct StoredEntry {
    document: Document,
    fetched_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct StoredEntryRef<'a> {
    document: &'a Document,
    fetched_at: DateTime<Utc>,
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// 内存层最多保留的译本数
    pub volatile_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: constants::DEFAULT_CACHE_TTL,
            volatile_capacity: constants::DEFAULT_VOLATILE_CAPACITY,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub volatile_hits: u64,
    pub durable_hits: u64,
    pub fetches: u64,
    pub fetch_failures: u64,
    pub expired: u64,
    /// 加入已有获取的请求数
    pub coalesced: u64,
}

impl CacheStats {
    /// 命中率（两层合计）
    pub fn hit_rate(&self) -> f32 {
        let hits = self.volatile_hits + self.durable_hits;
        let total = hits + self.fetches + self.fetch_failures;
        if total > 0 {
            hits as f32 / total as f32
        } else {
            0.0
        }
    }
}

/// 缓存信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub volatile_entries: usize,
    pub durable_entries: usize,
    pub in_flight: usize,
}

#[derive(Debug, Default)]
struct CacheCounters {
    volatile_hits: AtomicU64,
    durable_hits: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    expired: AtomicU64,
    coalesced: AtomicU64,
}

impl CacheCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            volatile_hits: self.volatile_hits.load(Ordering::Relaxed),
            durable_hits: self.durable_hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// 缓存层
// ============================================================================

/// 缓存层
#[async_trait]
pub trait CacheTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self, translation_id: &str) -> ContentResult<Option<CacheEntry>>;

    async fn store(&self, entry: &CacheEntry) -> ContentResult<()>;

    /// 清空本层，返回清除的条目数
    async fn clear(&self) -> ContentResult<usize>;

    async fn len(&self) -> ContentResult<usize>;
}

/// 内存 LRU 层
pub struct VolatileTier {
    cache: RwLock<LruCache<String, CacheEntry>>,
}

impl VolatileTier {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl CacheTier for VolatileTier {
    fn name(&self) -> &'static str {
        "volatile"
    }

    async fn load(&self, translation_id: &str) -> ContentResult<Option<CacheEntry>> {
        // LRU 的 get 会更新访问顺序，需要写锁
        let mut cache = self.cache.write().await;
        Ok(cache.get(translation_id).cloned())
    }

    async fn store(&self, entry: &CacheEntry) -> ContentResult<()> {
        let mut cache = self.cache.write().await;
        cache.put(entry.translation_id.clone(), entry.clone());
        Ok(())
    }

    async fn clear(&self) -> ContentResult<usize> {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        Ok(count)
    }

    async fn len(&self) -> ContentResult<usize> {
        Ok(self.cache.read().await.len())
    }
}

/// 持久层，条目以 JSON 写入键值存储
pub struct DurableTier {
    store: Arc<dyn KeyValueStore>,
}

impl DurableTier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(translation_id: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, translation_id)
    }

    /// 持久层中已缓存的译本 ID
    pub async fn translation_ids(&self) -> ContentResult<Vec<String>> {
        let keys = self.store.keys_with_prefix(CACHE_KEY_PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(CACHE_KEY_PREFIX).map(str::to_string))
            .collect())
    }
}

#[async_trait]
impl CacheTier for DurableTier {
    fn name(&self) -> &'static str {
        "durable"
    }

    async fn load(&self, translation_id: &str) -> ContentResult<Option<CacheEntry>> {
        let key = Self::key(translation_id);
        let Some(bytes) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_slice::<StoredEntry>(&bytes) {
            Ok(stored) => Ok(Some(CacheEntry {
                translation_id: translation_id.to_string(),
                fetched_at: stored.fetched_at,
                document: Arc::new(stored.document),
            })),
            Err(e) => {
                // 损坏的条目当作未命中，下次获取时覆盖
                tracing::warn!("缓存条目 {} 已损坏，丢弃: {}", key, e);
                self.store.delete(&key).await?;
                Ok(None)
            }
        }
    }

    async fn store(&self, entry: &CacheEntry) -> ContentResult<()> {
        let bytes = to_json_bytes(&StoredEntryRef {
            document: &entry.document,
            fetched_at: entry.fetched_at,
        })?;
        self.store.put(&Self::key(&entry.translation_id), bytes).await
    }

    async fn clear(&self) -> ContentResult<usize> {
        self.store.delete_prefix(CACHE_KEY_PREFIX).await
    }

    async fn len(&self) -> ContentResult<usize> {
        Ok(self.store.keys_with_prefix(CACHE_KEY_PREFIX).await?.len())
    }
}

// ============================================================================
// 译本缓存
// ============================================================================

type SharedFetch = Shared<BoxFuture<'static, ContentResult<Arc<Document>>>>;

struct CacheInner {
    volatile: VolatileTier,
    durable: DurableTier,
    source: Arc<dyn TranslationSource>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    counters: CacheCounters,
}

/// 译本缓存
pub struct TranslationCache {
    inner: Arc<CacheInner>,
    /// (译本 ID, 是否强制刷新) → 进行中的获取
    in_flight: DashMap<(String, bool), SharedFetch>,
}

impl TranslationCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn TranslationSource>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        let ttl = chrono::Duration::from_std(config.ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            inner: Arc::new(CacheInner {
                volatile: VolatileTier::new(config.volatile_capacity),
                durable: DurableTier::new(store),
                source,
                clock,
                ttl,
                counters: CacheCounters::default(),
            }),
            in_flight: DashMap::new(),
        }
    }

    /// 获取译本文档，ID 不区分大小写
    pub async fn get(&self, translation_id: &str) -> ContentResult<Arc<Document>> {
        let translation_id = normalize_translation_id(translation_id);
        let translation_id = translation_id.as_str();
        if let Some(entry) = self.inner.volatile.load(translation_id).await? {
            CacheCounters::bump(&self.inner.counters.volatile_hits);
            tracing::debug!("内存缓存命中: {}", translation_id);
            return Ok(entry.document);
        }

        self.load_shared(translation_id, false).await
    }

    /// 跳过两层缓存重新获取
    pub async fn force_refresh(&self, translation_id: &str) -> ContentResult<Arc<Document>> {
        self.load_shared(&normalize_translation_id(translation_id), true)
            .await
    }

    /// 清空两层缓存，返回持久层删除的条目数
    pub async fn clear_all(&self) -> ContentResult<usize> {
        let volatile = self.inner.volatile.clear().await?;
        let durable = self.inner.durable.clear().await?;
        tracing::info!("已清空译本缓存: 内存 {} 项, 持久 {} 项", volatile, durable);
        Ok(durable)
    }

    /// 持久层中已缓存的译本 ID
    pub async fn cached_translations(&self) -> ContentResult<Vec<String>> {
        self.inner.durable.translation_ids().await
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    pub async fn cache_info(&self) -> ContentResult<CacheInfo> {
        Ok(CacheInfo {
            volatile_entries: self.inner.volatile.len().await?,
            durable_entries: self.inner.durable.len().await?,
            in_flight: self.in_flight.len(),
        })
    }

    async fn load_shared(&self, translation_id: &str, force: bool) -> ContentResult<Arc<Document>> {
        let key = (translation_id.to_string(), force);
        let fetch = match self.in_flight.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                CacheCounters::bump(&self.inner.counters.coalesced);
                tracing::debug!("加入进行中的获取: {}", translation_id);
                existing.get().clone()
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let inner = Arc::clone(&self.inner);
                let id = translation_id.to_string();
                let fetch = async move { inner.resolve(&id, force).await }
                    .boxed()
                    .shared();
                slot.insert(fetch.clone());
                fetch
            }
        };

        let result = fetch.clone().await;
        self.in_flight.remove_if(&key, |_, current| current.ptr_eq(&fetch));
        result
    }
}

impl CacheInner {
    async fn resolve(&self, translation_id: &str, force: bool) -> ContentResult<Arc<Document>> {
        if !force {
            // 排队期间可能已被另一次获取填充
            if let Some(entry) = self.volatile.load(translation_id).await? {
                return Ok(entry.document);
            }

            match self.durable.load(translation_id).await? {
                Some(entry) if !entry.is_expired(self.clock.now(), self.ttl) => {
                    CacheCounters::bump(&self.counters.durable_hits);
                    tracing::debug!("持久缓存命中: {}", translation_id);
                    self.volatile.store(&entry).await?;
                    return Ok(entry.document);
                }
                Some(entry) => {
                    CacheCounters::bump(&self.counters.expired);
                    tracing::warn!(
                        "译本缓存已过期: {} (获取于 {})",
                        translation_id,
                        entry.fetched_at
                    );
                }
                None => {}
            }
        }

        tracing::info!("从来源获取译本: {}", translation_id);
        let document = match self.source.fetch(translation_id).await {
            Ok(document) => Arc::new(document),
            Err(e) => {
                CacheCounters::bump(&self.counters.fetch_failures);
                tracing::warn!("获取译本 {} 失败: {}", translation_id, e);
                return Err(e);
            }
        };

        let entry = CacheEntry {
            translation_id: translation_id.to_string(),
            fetched_at: self.clock.now(),
            document,
        };
        self.durable.store(&entry).await.map_err(|e| {
            e.with_context(format!("写入译本缓存 {}", translation_id))
        })?;
        self.volatile.store(&entry).await?;
        CacheCounters::bump(&self.counters.fetches);

        Ok(entry.document)
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("ttl", &self.inner.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}
