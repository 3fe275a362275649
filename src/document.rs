//! 译本文档模型
//!
//! 远端译本是一份三层嵌套的 JSON：书名 → 章号 → 节号 → 经文。
//! 章节号在 JSON 中是字符串键，解析时转为数字。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::resolver::LookupPath;

/// 一章：节号 → 经文
pub type Chapter = BTreeMap<u16, String>;

/// 一卷书：章号 → 章
pub type Book = BTreeMap<u16, Chapter>;

/// 完整译本文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    books: BTreeMap<String, Book>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 字节解析文档
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// 插入一节经文
    pub fn insert(&mut self, book: impl Into<String>, chapter: u16, verse: u16, text: impl Into<String>) {
        self.books
            .entry(book.into())
            .or_default()
            .entry(chapter)
            .or_default()
            .insert(verse, text.into());
    }

    /// 按路径查找经文，缺失时返回 `None`
    pub fn lookup(&self, path: &LookupPath) -> Option<&str> {
        self.books
            .get(path.book)?
            .get(&path.chapter)?
            .get(&path.verse)
            .map(String::as_str)
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.get(name)
    }

    pub fn book_names(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 文档中经文总数
    pub fn verse_count(&self) -> usize {
        self.books
            .values()
            .flat_map(|book| book.values())
            .map(|chapter| chapter.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_json() {
        let json = br#"{
            "Genesis": {"1": {"1": "In the beginning God created the heaven and the earth.", "2": "And the earth was without form"}},
            "Song of Solomon": {"2": {"1": "I am the rose of Sharon"}}
        }"#;
        let doc = Document::from_slice(json).unwrap();

        assert_eq!(doc.verse_count(), 3);
        let path = LookupPath {
            book: "Song of Solomon",
            chapter: 2,
            verse: 1,
        };
        assert_eq!(doc.lookup(&path), Some("I am the rose of Sharon"));

        let missing = LookupPath {
            book: "Genesis",
            chapter: 1,
            verse: 3,
        };
        assert_eq!(doc.lookup(&missing), None);
    }

    #[test]
    fn test_rejects_non_numeric_keys() {
        let json = br#"{"Genesis": {"one": {"1": "text"}}}"#;
        assert!(Document::from_slice(json).is_err());
    }

    #[test]
    fn test_serialize_back_to_string_keys() {
        let mut doc = Document::new();
        doc.insert("Jude", 1, 5, "I will therefore put you in remembrance");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"Jude":{"1":{"5":"I will therefore put you in remembrance"}}}"#);
    }
}
