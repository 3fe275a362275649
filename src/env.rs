//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    /// 仅在变量被显式设置时返回值
    fn get_explicit() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 通用环境变量
pub mod general {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "VERSE_CYCLE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 持久化存储文件路径
    pub struct StorePath;
    impl EnvVar<String> for StorePath {
        const NAME: &'static str = "VERSE_CYCLE_STORE_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the on-disk store file (redb)";

        fn parse(value: &str) -> EnvResult<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Store path must not be empty".to_string(),
                });
            }
            Ok(trimmed.to_string())
        }
    }

    /// 默认译本
    pub struct Translation;
    impl EnvVar<String> for Translation {
        const NAME: &'static str = "VERSE_CYCLE_TRANSLATION";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Preferred translation id (e.g. kjv)";

        fn parse(value: &str) -> EnvResult<String> {
            let id = value.trim().to_lowercase();
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid translation id '{}'", value),
                });
            }
            Ok(id)
        }
    }
}

/// 网络相关环境变量
pub mod network {
    use super::*;

    /// 译本资源基础地址
    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "VERSE_CYCLE_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Base URL translation resources are fetched from";

        fn parse(value: &str) -> EnvResult<String> {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "URL must start with http:// or https://".to_string(),
                });
            }

            url::Url::parse(value).map_err(|e| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("Invalid URL format: {}", e),
            })?;

            Ok(value.to_string())
        }
    }

    /// 获取超时时间
    pub struct FetchTimeout;
    impl EnvVar<Duration> for FetchTimeout {
        const NAME: &'static str = "VERSE_CYCLE_FETCH_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Translation fetch timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 600)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 内存层容量（译本个数）
    pub struct VolatileCapacity;
    impl EnvVar<usize> for VolatileCapacity {
        const NAME: &'static str = "VERSE_CYCLE_VOLATILE_CAPACITY";
        const DEFAULT: Option<usize> = Some(4);
        const DESCRIPTION: &'static str = "Number of translation documents kept in memory";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 64)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "VERSE_CYCLE_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30 * 24 * 3600));
        const DESCRIPTION: &'static str = "Durable translation cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds < 60 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too short (minimum 60 seconds)".to_string(),
                });
            }

            if seconds > 86400 * 365 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too long (maximum 365 days)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 辅助函数
fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,
    pub store_path: Option<String>,
    pub translation: Option<String>,
    pub base_url: Option<String>,
    pub fetch_timeout: Duration,
    pub volatile_capacity: usize,
    pub cache_ttl: Duration,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: general::LogLevel::get()?,
            store_path: general::StorePath::get_explicit().transpose()?,
            translation: general::Translation::get_explicit().transpose()?,
            base_url: network::BaseUrl::get_explicit().transpose()?,
            fetch_timeout: network::FetchTimeout::get()?,
            volatile_capacity: cache::VolatileCapacity::get()?,
            cache_ttl: cache::Ttl::get()?,
        })
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Log Level: {}", self.log_level);
        println!(
            "  Store: {}",
            self.store_path.as_deref().unwrap_or("[config file / default]")
        );
        println!(
            "  Translation: {}",
            self.translation.as_deref().unwrap_or("[config file / default]")
        );
        println!("  Cache TTL: {}s", self.cache_ttl.as_secs());
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## General\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: \"info\")\n",
        general::LogLevel::NAME,
        general::LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        general::StorePath::NAME,
        general::StorePath::DESCRIPTION,
        general::StorePath::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        general::Translation::NAME,
        general::Translation::DESCRIPTION,
        general::Translation::DEFAULT
    ));

    docs.push_str("\n## Network\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::BaseUrl::NAME,
        network::BaseUrl::DESCRIPTION,
        network::BaseUrl::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::FetchTimeout::NAME,
        network::FetchTimeout::DESCRIPTION,
        network::FetchTimeout::DEFAULT
    ));

    docs.push_str("\n## Cache\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::VolatileCapacity::NAME,
        cache::VolatileCapacity::DESCRIPTION,
        cache::VolatileCapacity::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::Ttl::NAME,
        cache::Ttl::DESCRIPTION,
        cache::Ttl::DEFAULT
    ));

    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(general::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(general::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_translation_id_parsing() {
        assert_eq!(general::Translation::parse(" KJV ").unwrap(), "kjv");
        assert!(general::Translation::parse("").is_err());
        assert!(general::Translation::parse("../etc").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(network::BaseUrl::parse("http://localhost:8080/bibles/").is_ok());
        assert!(network::BaseUrl::parse("https://raw.githubusercontent.com/x/y/main/").is_ok());

        assert!(network::BaseUrl::parse("ftp://example.com").is_err());
        assert!(network::BaseUrl::parse("not-a-url").is_err());
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(cache::Ttl::parse("3600").unwrap(), Duration::from_secs(3600));
        assert!(cache::Ttl::parse("10").is_err());
        assert!(cache::Ttl::parse("abc").is_err());

        assert_eq!(cache::VolatileCapacity::parse("8").unwrap(), 8);
        assert!(cache::VolatileCapacity::parse("0").is_err());
        assert!(network::FetchTimeout::parse("601").is_err());
    }

    #[test]
    fn test_env_config_loading() {
        env::set_var("VERSE_CYCLE_VOLATILE_CAPACITY", "6");
        env::set_var("VERSE_CYCLE_FETCH_TIMEOUT", "12");

        let config = EnvConfig::from_env().unwrap();
        assert_eq!(config.volatile_capacity, 6);
        assert_eq!(config.fetch_timeout, Duration::from_secs(12));

        env::remove_var("VERSE_CYCLE_VOLATILE_CAPACITY");
        env::remove_var("VERSE_CYCLE_FETCH_TIMEOUT");
    }

    #[test]
    fn test_env_docs_lists_every_variable() {
        let docs = generate_env_docs();
        for name in [
            general::LogLevel::NAME,
            general::StorePath::NAME,
            general::Translation::NAME,
            network::BaseUrl::NAME,
            network::FetchTimeout::NAME,
            cache::VolatileCapacity::NAME,
            cache::Ttl::NAME,
        ] {
            assert!(docs.contains(name), "missing {}", name);
        }
    }
}
