//! 译本注册表与用户偏好
//!
//! 注册表把译本 ID 映射到远端资源文件名；偏好来源只读地提供用户选择的译本 ID。

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

/// 译本 ID 的规范形式：去掉首尾空白并转小写
pub fn normalize_translation_id(translation_id: &str) -> String {
    translation_id.trim().to_lowercase()
}

/// 译本描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationInfo {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    /// 相对于基础地址的资源文件名
    pub resource: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub is_default: bool,
}

fn default_available() -> bool {
    true
}

impl TranslationInfo {
    pub fn new(id: &str, name: &str, resource: &str) -> Self {
        Self {
            id: normalize_translation_id(id),
            name: name.to_string(),
            abbreviation: id.trim().to_uppercase(),
            resource: resource.to_string(),
            available: true,
            is_default: false,
        }
    }

    fn builtin(id: &str, name: &str, available: bool, is_default: bool) -> Self {
        Self {
            available,
            is_default,
            ..Self::new(id, name, &format!("{}.json", id))
        }
    }
}

/// 译本注册表
pub trait TranslationRegistry: Send + Sync {
    /// 查找可用译本；未知或暂不可用时返回 `UnknownTranslation`
    fn lookup(&self, translation_id: &str) -> ContentResult<TranslationInfo>;

    /// 全部已登记译本（含暂不可用的）
    fn list(&self) -> Vec<TranslationInfo>;

    fn default_translation(&self) -> Option<TranslationInfo> {
        self.list().into_iter().find(|t| t.is_default && t.available)
    }
}

/// 静态注册表
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Vec<TranslationInfo>,
}

impl StaticRegistry {
    pub fn new(entries: Vec<TranslationInfo>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry = registry.with(entry);
        }
        registry
    }

    /// 内置译本列表，目前只有 KJV 可用
    pub fn builtin() -> Self {
        Self::new(vec![
            TranslationInfo::builtin("kjv", "King James Version", true, true),
            TranslationInfo::builtin("niv", "New International Version", false, false),
            TranslationInfo::builtin("nkjv", "New King James Version", false, false),
            TranslationInfo::builtin("esv", "English Standard Version", false, false),
            TranslationInfo::builtin("nlt", "New Living Translation", false, false),
            TranslationInfo::builtin("msg", "The Message", false, false),
        ])
    }

    /// 添加或替换一个译本（按 ID）
    pub fn with(mut self, mut entry: TranslationInfo) -> Self {
        entry.id = normalize_translation_id(&entry.id);
        if entry.is_default {
            for existing in &mut self.entries {
                existing.is_default = false;
            }
        }
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }
}

impl TranslationRegistry for StaticRegistry {
    fn lookup(&self, translation_id: &str) -> ContentResult<TranslationInfo> {
        let id = normalize_translation_id(translation_id);
        match self.entries.iter().find(|e| e.id == id) {
            Some(entry) if entry.available => Ok(entry.clone()),
            Some(_) => Err(ContentError::UnknownTranslation(format!(
                "{} (暂不可用)",
                translation_id
            ))),
            None => Err(ContentError::UnknownTranslation(translation_id.to_string())),
        }
    }

    fn list(&self) -> Vec<TranslationInfo> {
        self.entries.clone()
    }
}

/// 用户偏好来源（只读）
pub trait PreferenceSource: Send + Sync {
    fn preferred_translation(&self) -> String;
}

/// 可在运行时切换的偏好
#[derive(Debug)]
pub struct SharedPreference {
    translation_id: RwLock<String>,
}

impl SharedPreference {
    pub fn new(translation_id: impl Into<String>) -> Self {
        Self {
            translation_id: RwLock::new(translation_id.into()),
        }
    }

    pub fn set(&self, translation_id: impl Into<String>) {
        let mut guard = self
            .translation_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = translation_id.into();
    }
}

impl PreferenceSource for SharedPreference {
    fn preferred_translation(&self) -> String {
        self.translation_id
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
