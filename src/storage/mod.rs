//! 存储层
//!
//! - `kv` - 键值存储抽象与内存实现
//! - `redb_store` - 基于 redb 的磁盘实现
//! - `cache` - 两级译本缓存

pub mod cache;
pub mod kv;
pub mod redb_store;

pub use cache::{
    CacheConfig, CacheEntry, CacheInfo, CacheStats, CacheTier, DurableTier, TranslationCache,
    VolatileTier, CACHE_KEY_PREFIX,
};
pub use kv::{KeyValueStore, MemoryStore};
pub use redb_store::RedbStore;
