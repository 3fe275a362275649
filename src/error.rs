//! 统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 内容服务错误类型
///
/// 需要 `Clone`：同一译本的并发请求共享一次获取，结果（包括错误）会交给每个等待者。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// 译本获取或解析失败
    #[error("译本获取失败 [{translation_id}]: {message}")]
    FetchFailed {
        translation_id: String,
        message: String,
    },

    /// 译本文档中缺少某节经文
    #[error("译本 {translation_id} 中缺少经文 {reference}")]
    MissingUnit {
        reference: String,
        translation_id: String,
    },

    /// 今日经文在所选译本中无法呈现
    #[error("经文 {reference} 在译本 {translation_id} 中不可用")]
    ContentUnavailable {
        reference: String,
        translation_id: String,
    },

    /// 持久化读写失败
    #[error("持久化错误: {0}")]
    PersistenceFailed(String),

    /// 经文索引构建失败
    #[error("经文索引构建失败: {0}")]
    CorpusBuildFailed(String),

    /// 未知或暂不可用的译本
    #[error("未知译本: {0}")]
    UnknownTranslation(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl ContentError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            ContentError::FetchFailed { .. } => true,
            ContentError::PersistenceFailed(_) => true,
            ContentError::MissingUnit { .. } => false,
            ContentError::ContentUnavailable { .. } => false,
            ContentError::CorpusBuildFailed(_) => false,
            ContentError::UnknownTranslation(_) => false,
            ContentError::ConfigError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContentError::FetchFailed { .. } => ErrorSeverity::Warning,
            ContentError::MissingUnit { .. } => ErrorSeverity::Warning,
            ContentError::ContentUnavailable { .. } => ErrorSeverity::Warning,
            ContentError::UnknownTranslation(_) => ErrorSeverity::Info,
            ContentError::PersistenceFailed(_) => ErrorSeverity::Error,
            ContentError::ConfigError(_) => ErrorSeverity::Critical,
            ContentError::CorpusBuildFailed(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContentError::FetchFailed { .. } => ErrorCategory::Network,
            ContentError::UnknownTranslation(_) => ErrorCategory::Network,
            ContentError::MissingUnit { .. } => ErrorCategory::Content,
            ContentError::ContentUnavailable { .. } => ErrorCategory::Content,
            ContentError::PersistenceFailed(_) => ErrorCategory::Persistence,
            ContentError::CorpusBuildFailed(_) => ErrorCategory::Internal,
            ContentError::ConfigError(_) => ErrorCategory::Configuration,
        }
    }

    /// 创建带上下文的错误
    ///
    /// 只有携带自由文本的变体会被改写，经文定位类错误原样返回。
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            ContentError::FetchFailed { message, .. } => {
                *message = format!("{} (上下文: {})", message, context);
            }
            ContentError::PersistenceFailed(msg)
            | ContentError::CorpusBuildFailed(msg)
            | ContentError::ConfigError(msg) => {
                *msg = format!("{} (上下文: {})", msg, context);
            }
            ContentError::MissingUnit { .. }
            | ContentError::ContentUnavailable { .. }
            | ContentError::UnknownTranslation(_) => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Content,
    Persistence,
    Internal,
}

/// 标准错误转换
impl From<std::io::Error> for ContentError {
    fn from(error: std::io::Error) -> Self {
        ContentError::PersistenceFailed(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(error: serde_json::Error) -> Self {
        ContentError::PersistenceFailed(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for ContentError {
    fn from(error: toml::de::Error) -> Self {
        ContentError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<tokio::task::JoinError> for ContentError {
    fn from(error: tokio::task::JoinError) -> Self {
        ContentError::PersistenceFailed(format!("后台存储任务异常退出: {}", error))
    }
}

macro_rules! redb_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ContentError {
                fn from(error: $ty) -> Self {
                    ContentError::PersistenceFailed(format!("redb: {}", error))
                }
            }
        )+
    };
}

redb_error!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// 错误结果类型别名
pub type ContentResult<T> = Result<T, ContentError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 记录并返回错误
    pub fn log_error<T>(error: ContentError) -> ContentResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("内容服务信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("内容服务警告: {}", error),
            ErrorSeverity::Error => tracing::error!("内容服务错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("内容服务严重错误: {}", error),
        }

        Err(error)
    }

    /// 创建获取失败错误
    pub fn fetch_failed<T: fmt::Display>(translation_id: &str, msg: T) -> ContentError {
        ContentError::FetchFailed {
            translation_id: translation_id.to_string(),
            message: msg.to_string(),
        }
    }

    /// 创建持久化错误
    pub fn persistence_error<T: fmt::Display>(msg: T) -> ContentError {
        ContentError::PersistenceFailed(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> ContentError {
        ContentError::ConfigError(msg.to_string())
    }
}
