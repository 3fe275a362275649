// 集成测试公共模块
//
// 提供可计数的假译本来源、小型经文表、手动时钟和服务构建辅助。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use verse_cycle::corpus::{BookSpec, CorpusIndex, ReferenceResolver, Testament};
use verse_cycle::error::helpers;
use verse_cycle::network::TranslationSource;
use verse_cycle::storage::{CacheConfig, KeyValueStore, MemoryStore, TranslationCache};
use verse_cycle::{
    ContentDeliveryService, ContentError, ContentResult, Document, ManualClock, SharedPreference,
};

/// 五节经文（犹大书 1:1-5）
pub static FIVE: &[BookSpec] = &[BookSpec {
    id: "jude",
    name: "Jude",
    testament: Testament::New,
    aliases: &["jud"],
    verses: &[5],
}];

/// 三卷书共 71 节
pub static SMALL: &[BookSpec] = &[
    BookSpec {
        id: "obadiah",
        name: "Obadiah",
        testament: Testament::Old,
        aliases: &["obad"],
        verses: &[21],
    },
    BookSpec {
        id: "philemon",
        name: "Philemon",
        testament: Testament::New,
        aliases: &["phlm"],
        verses: &[25],
    },
    BookSpec {
        id: "jude",
        name: "Jude",
        testament: Testament::New,
        aliases: &["jud"],
        verses: &[25],
    },
];

pub fn corpus_of(books: &'static [BookSpec]) -> Arc<CorpusIndex> {
    Arc::new(CorpusIndex::build_from(books).expect("测试经文表应合法"))
}

/// 2024-03-01 08:00 UTC
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_instant()))
}

/// 经文文本形如 `[tag] Jude 1:3`
pub fn verse_text(tag: &str, reference: &str) -> String {
    format!("[{}] {}", tag, reference)
}

/// 覆盖整个经文表的文档，每节文本带尾部空白
pub fn full_document(corpus: &CorpusIndex, tag: &str) -> Document {
    let mut document = Document::new();
    for unit in corpus.iter() {
        let path = ReferenceResolver::to_lookup_path(unit);
        document.insert(
            path.book,
            path.chapter,
            path.verse,
            format!("{}  \n", verse_text(tag, &unit.canonical_reference)),
        );
    }
    document
}

/// 去掉指定经文后的文档
pub fn document_without(corpus: &CorpusIndex, tag: &str, missing_index: usize) -> Document {
    let mut document = Document::new();
    for (index, unit) in corpus.iter().enumerate() {
        if index == missing_index {
            continue;
        }
        let path = ReferenceResolver::to_lookup_path(unit);
        document.insert(
            path.book,
            path.chapter,
            path.verse,
            verse_text(tag, &unit.canonical_reference),
        );
    }
    document
}

/// 可计数的假译本来源
///
/// 支持按译本设置文档、切换失败以及人为延迟。
#[derive(Default)]
pub struct FixtureSource {
    documents: Mutex<HashMap<String, Document>>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, translation_id: &str, document: Document) -> Self {
        self.set_document(translation_id, document);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn set_document(&self, translation_id: &str, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert(translation_id.to_string(), document);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, translation_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(translation_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl TranslationSource for FixtureSource {
    async fn fetch(&self, translation_id: &str) -> ContentResult<Document> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(translation_id.to_string())
            .or_insert(0) += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(helpers::fetch_failed(translation_id, "模拟网络故障"));
        }

        self.documents
            .lock()
            .unwrap()
            .get(translation_id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownTranslation(translation_id.to_string()))
    }
}

/// 测试环境：内存存储、假来源、手动时钟和可变偏好
pub struct TestEnvironment {
    pub corpus: Arc<CorpusIndex>,
    pub store: Arc<MemoryStore>,
    pub source: Arc<FixtureSource>,
    pub clock: Arc<ManualClock>,
    pub preference: Arc<SharedPreference>,
}

impl TestEnvironment {
    /// 预置 kjv 和 web 两个完整译本
    pub fn new(books: &'static [BookSpec]) -> Self {
        let corpus = corpus_of(books);
        let source = FixtureSource::new()
            .with_document("kjv", full_document(&corpus, "kjv"))
            .with_document("web", full_document(&corpus, "web"));
        Self {
            corpus,
            store: Arc::new(MemoryStore::new()),
            source: Arc::new(source),
            clock: manual_clock(),
            preference: Arc::new(SharedPreference::new("kjv")),
        }
    }

    pub fn service(&self) -> ContentDeliveryService {
        self.service_with_seed(42)
    }

    /// 同一存储上的新服务实例，相当于进程重启
    pub fn service_with_seed(&self, seed: u64) -> ContentDeliveryService {
        ContentDeliveryService::builder(
            Arc::clone(&self.store) as Arc<dyn KeyValueStore>,
            Arc::clone(&self.source) as Arc<dyn TranslationSource>,
        )
        .corpus(Arc::clone(&self.corpus))
        .clock(Arc::clone(&self.clock) as _)
        .preferences(Arc::clone(&self.preference) as _)
        .seed(seed)
        .build()
        .expect("服务构建应成功")
    }

    /// 同一存储上的新缓存实例（内存层为空）
    pub fn cache(&self) -> TranslationCache {
        TranslationCache::new(
            Arc::clone(&self.store) as Arc<dyn KeyValueStore>,
            Arc::clone(&self.source) as Arc<dyn TranslationSource>,
            Arc::clone(&self.clock) as _,
            CacheConfig::default(),
        )
    }
}
