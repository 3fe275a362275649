//! HTTP 译本来源

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::TranslationSource;
use crate::document::Document;
use crate::error::{helpers, ContentError, ContentResult};
use crate::registry::TranslationRegistry;

/// 通过 `GET <base>/<resource>` 获取译本
pub struct HttpTranslationSource {
    client: Client,
    base_url: Url,
    registry: Arc<dyn TranslationRegistry>,
}

impl HttpTranslationSource {
    pub fn new(
        base_url: &str,
        registry: Arc<dyn TranslationRegistry>,
        timeout: Duration,
    ) -> ContentResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| helpers::config_error(format!("无效的基础地址 {}: {}", base_url, e)))?;
        // 没有尾部斜杠时 join 会替换掉最后一段路径
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("verse-cycle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| helpers::config_error(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            registry,
        })
    }

    /// 资源文件的完整地址
    pub fn resource_url(&self, resource: &str) -> ContentResult<Url> {
        self.base_url
            .join(resource)
            .map_err(|e| helpers::config_error(format!("无效的资源名 {}: {}", resource, e)))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl TranslationSource for HttpTranslationSource {
    async fn fetch(&self, translation_id: &str) -> ContentResult<Document> {
        let info = self.registry.lookup(translation_id)?;
        let url = self.resource_url(&info.resource)?;
        tracing::info!("获取译本 {}: {}", info.id, url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| helpers::fetch_failed(&info.id, format!("请求失败: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(helpers::fetch_failed(&info.id, format!("HTTP {} ({})", status, url)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| helpers::fetch_failed(&info.id, format!("读取响应失败: {}", e)))?;

        let document = Document::from_slice(&body)
            .map_err(|e| helpers::fetch_failed(&info.id, format!("解析译本失败: {}", e)))?;
        if document.is_empty() {
            return Err(ContentError::FetchFailed {
                translation_id: info.id,
                message: "译本文档为空".to_string(),
            });
        }

        tracing::debug!("译本 {} 解析完成: {} 节", info.id, document.verse_count());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{StaticRegistry, TranslationInfo};

    fn source(base: &str) -> HttpTranslationSource {
        let registry = StaticRegistry::builtin().with(TranslationInfo::new(
            "web",
            "World English Bible",
            "World English Bible.json",
        ));
        HttpTranslationSource::new(base, Arc::new(registry), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_resource_url_joining() {
        let src = source("https://raw.githubusercontent.com/arron-taylor/bible-versions/main");
        assert_eq!(
            src.resource_url("kjv.json").unwrap().as_str(),
            "https://raw.githubusercontent.com/arron-taylor/bible-versions/main/kjv.json"
        );
        assert_eq!(
            src.resource_url("World English Bible.json").unwrap().as_str(),
            "https://raw.githubusercontent.com/arron-taylor/bible-versions/main/World%20English%20Bible.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTranslationSource::new(
            "not a url",
            Arc::new(StaticRegistry::builtin()),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(ContentError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_unknown_translation_never_hits_network() {
        let src = source("http://127.0.0.1:9/");
        let result = src.fetch("vulgate").await;
        assert!(matches!(result, Err(ContentError::UnknownTranslation(_))));
    }
}
