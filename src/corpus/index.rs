//! 经文索引
//!
//! 把正典表展开成按正典顺序排列的经文地址列表，下标即经文的全局位置。

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use super::canon::{BookSpec, CANON};
use super::resolver::canonical_reference;
use crate::error::{ContentError, ContentResult};

/// 单节经文的地址，构建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitAddress {
    pub book_id: &'static str,
    pub book_display_name: &'static str,
    pub chapter: u16,
    pub verse: u16,
    /// 形如 `John 3:16`
    pub canonical_reference: String,
}

/// 有序经文索引
#[derive(Debug)]
pub struct CorpusIndex {
    books: &'static [BookSpec],
    /// 每卷书第一节经文在 `units` 中的位置
    book_offsets: Vec<usize>,
    units: Vec<UnitAddress>,
}

static GLOBAL_INDEX: OnceLock<Result<Arc<CorpusIndex>, ContentError>> = OnceLock::new();

impl CorpusIndex {
    /// 从内置正典表构建索引
    pub fn build() -> ContentResult<Self> {
        Self::build_from(CANON)
    }

    /// 进程级共享索引，只构建一次
    pub fn global() -> ContentResult<Arc<CorpusIndex>> {
        GLOBAL_INDEX
            .get_or_init(|| Self::build().map(Arc::new))
            .clone()
    }

    /// 从任意书卷表构建索引
    pub fn build_from(books: &'static [BookSpec]) -> ContentResult<Self> {
        if books.is_empty() {
            return Err(ContentError::CorpusBuildFailed("书卷表为空".to_string()));
        }

        let mut seen = HashSet::new();
        let mut book_offsets = Vec::with_capacity(books.len());
        let mut units = Vec::new();

        for book in books {
            if book.id.trim().is_empty() || book.name.trim().is_empty() {
                return Err(ContentError::CorpusBuildFailed(format!(
                    "书卷 ID 或名称为空: {:?}",
                    book.id
                )));
            }
            if !seen.insert(book.id) {
                return Err(ContentError::CorpusBuildFailed(format!(
                    "重复的书卷 ID: {}",
                    book.id
                )));
            }
            if book.verses.is_empty() {
                return Err(ContentError::CorpusBuildFailed(format!(
                    "书卷 {} 没有任何章",
                    book.id
                )));
            }
            if book.verses.len() > u16::MAX as usize {
                return Err(ContentError::CorpusBuildFailed(format!(
                    "书卷 {} 章数过多",
                    book.id
                )));
            }

            book_offsets.push(units.len());
            for (chapter_idx, &verse_count) in book.verses.iter().enumerate() {
                let chapter = chapter_idx as u16 + 1;
                if verse_count == 0 {
                    return Err(ContentError::CorpusBuildFailed(format!(
                        "{} 第 {} 章没有经文",
                        book.id, chapter
                    )));
                }
                for verse in 1..=verse_count {
                    units.push(UnitAddress {
                        book_id: book.id,
                        book_display_name: book.name,
                        chapter,
                        verse,
                        canonical_reference: canonical_reference(book.name, chapter, verse),
                    });
                }
            }
        }

        if units.len() > u32::MAX as usize {
            return Err(ContentError::CorpusBuildFailed("经文数量超出范围".to_string()));
        }

        tracing::debug!("经文索引构建完成: {} 卷, {} 节", books.len(), units.len());

        Ok(Self {
            books,
            book_offsets,
            units,
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&UnitAddress> {
        self.units.get(index)
    }

    pub fn units(&self) -> &[UnitAddress] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitAddress> {
        self.units.iter()
    }

    pub fn books(&self) -> &'static [BookSpec] {
        self.books
    }

    /// 按书卷 ID 查找书卷
    pub fn book(&self, book_id: &str) -> Option<&'static BookSpec> {
        self.books.iter().find(|b| b.id == book_id)
    }

    /// 某一章的全部经文
    pub fn chapter(&self, book_id: &str, chapter: u16) -> Option<&[UnitAddress]> {
        let (start, len) = self.chapter_span(book_id, chapter)?;
        self.units.get(start..start + len)
    }

    /// 经文地址在索引中的位置
    pub fn position_of(&self, unit: &UnitAddress) -> Option<usize> {
        let (start, len) = self.chapter_span(unit.book_id, unit.chapter)?;
        if unit.verse == 0 || unit.verse as usize > len {
            return None;
        }

        let position = start + unit.verse as usize - 1;
        (self.units[position] == *unit).then_some(position)
    }

    /// 章首经文位置与该章经文数
    fn chapter_span(&self, book_id: &str, chapter: u16) -> Option<(usize, usize)> {
        let book_idx = self.books.iter().position(|b| b.id == book_id)?;
        let verses = self.books[book_idx].verses;
        if chapter == 0 || chapter as usize > verses.len() {
            return None;
        }
        let preceding: usize = verses[..chapter as usize - 1]
            .iter()
            .map(|&v| v as usize)
            .sum();
        Some((
            self.book_offsets[book_idx] + preceding,
            verses[chapter as usize - 1] as usize,
        ))
    }
}
