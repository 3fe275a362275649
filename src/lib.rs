//! # verse-cycle
//!
//! 每日经文轮换与译本缓存库。
//!
//! ## 模块组织
//!
//! - `corpus` - 正典表、经文索引与引用解析
//! - `document` - 译本文档模型
//! - `registry` - 译本注册表与用户偏好
//! - `network` - 译本获取
//! - `storage` - 键值存储与两级译本缓存
//! - `rotation` - 每日轮换引擎
//! - `core` - 对外的内容分发服务
//! - `config` / `env` - 配置文件与环境变量

pub mod clock;
pub mod config;
pub mod core;
pub mod corpus;
pub mod document;
pub mod env;
pub mod error;
pub mod network;
pub mod registry;
pub mod rotation;
pub mod storage;

// Re-export commonly used items for convenience
pub use crate::core::{ContentDeliveryService, ServiceBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use corpus::{CorpusIndex, ReferenceResolver, UnitAddress};
pub use document::Document;
pub use error::{ContentError, ContentResult};
pub use registry::{PreferenceSource, SharedPreference, StaticRegistry, TranslationInfo, TranslationRegistry};
pub use rotation::{DailySelectionRecord, Progress, RotationEngine};
pub use storage::{KeyValueStore, MemoryStore, RedbStore, TranslationCache};
