//! 引用解析
//!
//! 经文地址与译本文档路径、可读引用（`John 3:16`）之间的互相转换，
//! 以及书名别名的归一化。

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::canon::BookSpec;
use super::index::{CorpusIndex, UnitAddress};

/// 译本文档中的查找路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupPath {
    /// 文档中使用的书名
    pub book: &'static str,
    pub chapter: u16,
    pub verse: u16,
}

/// 生成可读引用
pub fn canonical_reference(book_display_name: &str, chapter: u16, verse: u16) -> String {
    format!("{} {}:{}", book_display_name, chapter, verse)
}

/// 别名归一化：小写，去掉空白和下划线
fn normalize_alias(alias: &str) -> String {
    alias
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 引用解析器
pub struct ReferenceResolver {
    corpus: Arc<CorpusIndex>,
    /// 归一化别名 → 书卷
    aliases: HashMap<String, &'static BookSpec>,
    reference_pattern: OnceLock<Option<Regex>>,
}

impl ReferenceResolver {
    pub fn new(corpus: Arc<CorpusIndex>) -> Self {
        let mut aliases = HashMap::new();
        for book in corpus.books() {
            let names = [book.id, book.name]
                .into_iter()
                .chain(book.aliases.iter().copied());
            for name in names {
                aliases.entry(normalize_alias(name)).or_insert(book);
            }
        }

        Self {
            corpus,
            aliases,
            reference_pattern: OnceLock::new(),
        }
    }

    /// 经文地址 → 文档查找路径
    pub fn to_lookup_path(unit: &UnitAddress) -> LookupPath {
        LookupPath {
            book: unit.book_display_name,
            chapter: unit.chapter,
            verse: unit.verse,
        }
    }

    /// 经文地址 → 可读引用
    pub fn to_canonical_reference(unit: &UnitAddress) -> String {
        canonical_reference(unit.book_display_name, unit.chapter, unit.verse)
    }

    /// 书卷 ID、书名或缩写 → 书卷
    pub fn resolve_book(&self, alias: &str) -> Option<&'static BookSpec> {
        self.aliases.get(&normalize_alias(alias)).copied()
    }

    /// 解析 `Book chapter:verse` 形式的引用
    pub fn parse_reference(&self, reference: &str) -> Option<&UnitAddress> {
        let pattern = self
            .reference_pattern
            .get_or_init(|| Regex::new(r"^\s*(.+?)\s+(\d+)\s*:\s*(\d+)\s*$").ok())
            .as_ref()?;

        let captures = pattern.captures(reference)?;
        let book = self.resolve_book(&captures[1])?;
        let chapter: u16 = captures[2].parse().ok()?;
        let verse: u16 = captures[3].parse().ok()?;

        let unit = self
            .corpus
            .chapter(book.id, chapter)?
            .get(usize::from(verse).checked_sub(1)?)?;
        Some(unit)
    }

    pub fn corpus(&self) -> &Arc<CorpusIndex> {
        &self.corpus
    }
}
