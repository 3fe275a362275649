//! 键值存储抽象
//!
//! 轮换状态、今日记录和译本缓存都以 JSON 字节写入同一个本地键值存储。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{ContentError, ContentResult};

/// 异步键值存储
///
/// 所有失败都以 `PersistenceFailed` 返回。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ContentResult<Option<Vec<u8>>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> ContentResult<()> {
        self.put_many(vec![(key.to_string(), value)]).await
    }

    /// 原子地写入多个键：要么全部可见，要么全部不可见
    async fn put_many(&self, entries: Vec<(String, Vec<u8>)>) -> ContentResult<()>;

    /// 删除键，返回键是否存在
    async fn delete(&self, key: &str) -> ContentResult<bool>;

    async fn keys_with_prefix(&self, prefix: &str) -> ContentResult<Vec<String>>;

    /// 删除某前缀下的全部键，返回删除数量
    async fn delete_prefix(&self, prefix: &str) -> ContentResult<usize>;
}

/// 读取并解码 JSON 值
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> ContentResult<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            ContentError::PersistenceFailed(format!("记录 {} 已损坏: {}", key, e))
        }),
        None => Ok(None),
    }
}

/// 编码为 JSON 字节
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> ContentResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// 内存存储
///
/// 进程退出即丢失；可注入读写故障用于测试错误传播。
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 成功提交的写批次数
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_read(&self) -> ContentResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ContentError::PersistenceFailed("模拟读取失败".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> ContentResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ContentError::PersistenceFailed("模拟写入失败".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> ContentResult<Option<Vec<u8>>> {
        self.check_read()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put_many(&self, entries: Vec<(String, Vec<u8>)>) -> ContentResult<()> {
        self.check_write()?;
        let mut map = self.entries.write().await;
        map.extend(entries);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> ContentResult<bool> {
        self.check_write()?;
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> ContentResult<Vec<String>> {
        self.check_read()?;
        let map = self.entries.read().await;
        Ok(map
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn delete_prefix(&self, prefix: &str) -> ContentResult<usize> {
        self.check_write()?;
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|k, _| !k.starts_with(prefix));
        Ok(before - map.len())
    }
}
