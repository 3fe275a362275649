//! 配置管理模块
//!
//! 提供统一的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, ServiceConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    /// 译本资源默认地址
    pub const DEFAULT_BASE_URL: &str =
        "https://raw.githubusercontent.com/arron-taylor/bible-versions/main/";

    pub const DEFAULT_TRANSLATION: &str = "kjv";

    pub const DEFAULT_STORE_PATH: &str = "~/.local/share/verse-cycle/store.redb";

    // 缓存设置
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 3600); // 30天
    pub const DEFAULT_VOLATILE_CAPACITY: usize = 4;

    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "verse-cycle.toml",
        ".verse-cycle.toml",
        "verse-cycle.json",
        "~/.config/verse-cycle/config.toml",
        "/etc/verse-cycle/config.toml",
    ];
}
