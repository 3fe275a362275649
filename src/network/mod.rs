//! 网络获取
//!
//! 按译本 ID 获取完整译本文档。

pub mod source;

pub use source::HttpTranslationSource;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::ContentResult;

/// 译本来源
#[async_trait]
pub trait TranslationSource: Send + Sync {
    /// 获取并解析整份译本，失败时返回 `FetchFailed` 或 `UnknownTranslation`
    async fn fetch(&self, translation_id: &str) -> ContentResult<Document>;
}
