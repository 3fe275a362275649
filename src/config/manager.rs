//! 配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::EnvVar;
use crate::error::{ContentError, ContentResult};
use crate::registry::{StaticRegistry, TranslationInfo};
use crate::storage::CacheConfig;

/// 服务配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    // 存储
    pub store_path: String,

    // 网络
    pub base_url: String,
    pub fetch_timeout_secs: u64,

    // 缓存
    pub cache_ttl_secs: u64,
    pub volatile_capacity: usize,

    /// 未设置偏好时使用的译本
    pub default_translation: String,

    /// 追加或覆盖内置译本
    pub translations: Vec<TranslationInfo>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_path: constants::DEFAULT_STORE_PATH.to_string(),
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            fetch_timeout_secs: constants::DEFAULT_FETCH_TIMEOUT.as_secs(),
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),
            volatile_capacity: constants::DEFAULT_VOLATILE_CAPACITY,
            default_translation: constants::DEFAULT_TRANSLATION.to_string(),
            translations: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// 验证配置
    pub fn validate(&self) -> ContentResult<()> {
        if self.store_path.trim().is_empty() {
            return Err(ContentError::ConfigError("存储路径不能为空".to_string()));
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| ContentError::ConfigError(format!("基础地址无效: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ContentError::ConfigError(format!(
                "基础地址必须是 http 或 https: {}",
                self.base_url
            )));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ContentError::ConfigError("缓存TTL不能为0".to_string()));
        }

        if self.volatile_capacity == 0 {
            return Err(ContentError::ConfigError("内存缓存容量不能为0".to_string()));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(ContentError::ConfigError("获取超时不能为0".to_string()));
        }

        if self.default_translation.trim().is_empty() {
            return Err(ContentError::ConfigError("默认译本不能为空".to_string()));
        }

        if let Some(entry) = self
            .translations
            .iter()
            .find(|t| t.id.trim().is_empty() || t.resource.trim().is_empty())
        {
            return Err(ContentError::ConfigError(format!(
                "译本配置缺少 ID 或资源名: {:?}",
                entry.name
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 已设置但无法解析的变量记录警告后忽略，保留文件或默认值。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, general, network};

        if let Some(path) = env_override::<general::StorePath, _>() {
            self.store_path = path;
        }

        if let Some(translation) = env_override::<general::Translation, _>() {
            self.default_translation = translation;
        }

        if let Some(base_url) = env_override::<network::BaseUrl, _>() {
            self.base_url = base_url;
            tracing::info!("环境变量覆盖基础地址: {}", self.base_url);
        }

        if let Some(timeout) = env_override::<network::FetchTimeout, _>() {
            self.fetch_timeout_secs = timeout.as_secs();
        }

        if let Some(ttl) = env_override::<cache::Ttl, _>() {
            self.cache_ttl_secs = ttl.as_secs();
        }

        if let Some(capacity) = env_override::<cache::VolatileCapacity, _>() {
            self.volatile_capacity = capacity;
        }
    }

    /// 展开 `~` 后的存储路径
    pub fn expanded_store_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.store_path).as_ref())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl(),
            volatile_capacity: self.volatile_capacity,
        }
    }

    /// 内置译本加上配置中的译本
    pub fn registry(&self) -> StaticRegistry {
        self.translations
            .iter()
            .cloned()
            .fold(StaticRegistry::builtin(), StaticRegistry::with)
    }
}

/// 显式设置的环境变量值；无法解析时记录警告并返回 `None`
fn env_override<V: EnvVar<T>, T>() -> Option<T> {
    match V::get_explicit()? {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("忽略无效的环境变量: {}", e);
            None
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: ServiceConfig,
}

impl ConfigManager {
    /// 搜索配置文件并应用环境变量
    pub fn new() -> ContentResult<Self> {
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 从指定文件加载，再应用环境变量
    pub fn from_file(path: impl AsRef<Path>) -> ContentResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: ServiceConfig) -> ContentResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    pub fn get_config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn into_config(self) -> ServiceConfig {
        self.config
    }

    fn load_config() -> ContentResult<ServiceConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(ServiceConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> ContentResult<ServiceConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ContentError::ConfigError(format!("读取配置文件失败 {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .map_err(|e| ContentError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: impl AsRef<Path>) -> ContentResult<()> {
        let content = toml::to_string_pretty(&ServiceConfig::default())
            .map_err(|e| ContentError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ContentError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
