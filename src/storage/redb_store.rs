//! redb 磁盘存储
//!
//! 单表 `&str → &[u8]`；redb 是同步 API，所有调用都放到阻塞线程池执行。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use super::kv::KeyValueStore;
use crate::error::ContentResult;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("verse_cycle");

/// 基于 redb 的持久化存储
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbStore {
    /// 打开或创建存储文件
    pub fn open(path: impl AsRef<Path>) -> ContentResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(&path)?;
        let txn = db.begin_write()?;
        {
            txn.open_table(TABLE)?;
        }
        txn.commit()?;

        tracing::info!("已打开持久化存储: {}", path.display());
        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<T, F>(&self, op: F) -> ContentResult<T>
    where
        F: FnOnce(&Database) -> ContentResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db)).await?
    }
}

#[async_trait]
impl KeyValueStore for RedbStore {
    async fn get(&self, key: &str) -> ContentResult<Option<Vec<u8>>> {
        let key = key.to_string();
        self.run(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(TABLE)?;
            let value = table.get(key.as_str())?.map(|guard| guard.value().to_vec());
            Ok(value)
        })
        .await
    }

    async fn put_many(&self, entries: Vec<(String, Vec<u8>)>) -> ContentResult<()> {
        self.run(move |db| {
            let txn = db.begin_write()?;
            {
                let mut table = txn.open_table(TABLE)?;
                for (key, value) in &entries {
                    table.insert(key.as_str(), value.as_slice())?;
                }
            }
            txn.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> ContentResult<bool> {
        let key = key.to_string();
        self.run(move |db| {
            let txn = db.begin_write()?;
            let existed = {
                let mut table = txn.open_table(TABLE)?;
                let removed = table.remove(key.as_str())?;
                removed.is_some()
            };
            txn.commit()?;
            Ok(existed)
        })
        .await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> ContentResult<Vec<String>> {
        let prefix = prefix.to_string();
        self.run(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(TABLE)?;
            collect_prefixed(&table, &prefix)
        })
        .await
    }

    async fn delete_prefix(&self, prefix: &str) -> ContentResult<usize> {
        let prefix = prefix.to_string();
        self.run(move |db| {
            let txn = db.begin_write()?;
            let removed = {
                let mut table = txn.open_table(TABLE)?;
                let keys = collect_prefixed(&table, &prefix)?;
                for key in &keys {
                    table.remove(key.as_str())?;
                }
                keys.len()
            };
            txn.commit()?;
            Ok(removed)
        })
        .await
    }
}

fn collect_prefixed<T>(table: &T, prefix: &str) -> ContentResult<Vec<String>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let mut keys = Vec::new();
    for item in table.range::<&str>(prefix..)? {
        let (key, _) = item?;
        let key = key.value();
        if !key.starts_with(prefix) {
            break;
        }
        keys.push(key.to_string());
    }
    Ok(keys)
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}
