//! 简化的配置管理器
//!
//! 默认值 → 配置文件 → `.env` → 环境变量，后者覆盖前者

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{constants, is_valid_language_code};
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译服务提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// DeepLX 兼容接口
    #[default]
    Deeplx,
    /// Google 网页翻译接口
    Google,
}

impl ProviderKind {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Deeplx => constants::DEFAULT_API_URL,
            ProviderKind::Google => constants::GOOGLE_API_URL,
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deeplx" => Ok(ProviderKind::Deeplx),
            "google" => Ok(ProviderKind::Google),
            other => Err(TranslationError::ConfigError(format!(
                "未知的翻译服务: {}",
                other
            ))),
        }
    }
}

/// 原文与译文的排版方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderLayout {
    /// 原文在上，译文在下
    #[default]
    Stacked,
    /// 原文与译文左右并排
    SideBySide,
}

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 基础配置
    pub enabled: bool,
    pub target_lang: String,
    pub source_lang: String,
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    // 请求与节奏
    pub request_timeout_secs: u64,
    pub unit_delay_ms: u64,

    // 文本单元选择
    pub min_text_length: usize,

    // 缓存配置
    pub cache_enabled: bool,
    pub local_cache_size: usize,

    // 渲染
    pub layout: RenderLayout,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            source_lang: constants::AUTO_DETECT.to_string(),
            provider: ProviderKind::default(),
            api_url: None,

            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            unit_delay_ms: constants::DEFAULT_UNIT_DELAY_MS,

            min_text_length: constants::MIN_TEXT_LENGTH,

            cache_enabled: true,
            local_cache_size: constants::DEFAULT_LOCAL_CACHE_SIZE,

            layout: RenderLayout::default(),
        }
    }
}

impl TranslationConfig {
    /// 创建带指定语言的默认配置
    pub fn default_with_lang(target_lang: &str, api_url: Option<&str>) -> Self {
        Self {
            target_lang: target_lang.to_string(),
            api_url: api_url.map(str::to_string),
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if !is_valid_language_code(&self.target_lang) {
            return Err(TranslationError::ConfigError(format!(
                "目标语言无效: {}",
                self.target_lang
            )));
        }

        if self.source_lang != constants::AUTO_DETECT && !is_valid_language_code(&self.source_lang)
        {
            return Err(TranslationError::ConfigError(format!(
                "源语言无效: {}",
                self.source_lang
            )));
        }

        if let Some(url) = &self.api_url {
            url::Url::parse(url)
                .map_err(|e| TranslationError::ConfigError(format!("API地址无效: {}", e)))?;
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时不能为0".to_string()));
        }

        if self.min_text_length == 0 {
            return Err(TranslationError::ConfigError("最小文本长度不能为0".to_string()));
        }

        if self.cache_enabled && self.local_cache_size == 0 {
            return Err(TranslationError::ConfigError(
                "启用缓存时缓存大小不能为0".to_string(),
            ));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 未设置的变量保持原值；已设置但无法解析的变量视为配置错误。
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{cache, translation, EnvVar};

        if let Some(enabled) = translation::Enabled::get_set()? {
            self.enabled = enabled;
        }

        if let Some(target_lang) = translation::TargetLang::get_set()? {
            self.target_lang = target_lang;
        }

        if let Some(source_lang) = translation::SourceLang::get_set()? {
            self.source_lang = source_lang;
        }

        if let Some(provider) = translation::Provider::get_set()? {
            self.provider = provider.parse()?;
        }

        if let Some(api_url) = translation::ApiUrl::get_set()? {
            tracing::info!("环境变量覆盖 API URL: {}", api_url);
            self.api_url = Some(api_url);
        }

        if let Some(timeout) = translation::RequestTimeout::get_set()? {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(delay) = translation::UnitDelay::get_set()? {
            self.unit_delay_ms = delay;
        }

        if let Some(min_len) = translation::MinTextLength::get_set()? {
            self.min_text_length = min_len;
        }

        if let Some(cache_enabled) = cache::Enabled::get_set()? {
            self.cache_enabled = cache_enabled;
        }

        if let Some(cache_size) = cache::LocalCacheSize::get_set()? {
            self.local_cache_size = cache_size;
        }

        Ok(())
    }

    /// 实际使用的翻译接口地址
    pub fn endpoint(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn unit_delay(&self) -> Duration {
        Duration::from_millis(self.unit_delay_ms)
    }
}

/// 简化的配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: TranslationConfig,
    config_path: Option<String>,
}

impl ConfigManager {
    /// 按默认搜索路径加载配置
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config_path = None;
        let mut config = TranslationConfig::default();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                config = Self::load_from_file(&expanded_path)?;
                config_path = Some(expanded_path.into_owned());
                break;
            }
        }

        if config_path.is_none() {
            tracing::debug!("未找到配置文件，使用默认配置");
        }

        Self::finish(config, config_path)
    }

    /// 从指定文件加载配置
    pub fn from_path(path: &str) -> TranslationResult<Self> {
        Self::load_dotenv();

        let expanded_path = shellexpand::tilde(path).into_owned();
        let config = Self::load_from_file(&expanded_path)?;
        Self::finish(config, Some(expanded_path))
    }

    fn finish(mut config: TranslationConfig, config_path: Option<String>) -> TranslationResult<Self> {
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 取出配置
    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 实际加载的配置文件路径
    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    /// 解析配置文件内容，`.json` 按 JSON 解析，其余按 TOML 解析
    pub fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default_with_lang(
            constants::DEFAULT_TARGET_LANG,
            Some(constants::DEFAULT_API_URL),
        );
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TranslationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint(), constants::DEFAULT_API_URL);
        assert_eq!(config.unit_delay(), Duration::from_millis(100));
    }

    #[test]
    fn endpoint_follows_provider() {
        let config = TranslationConfig {
            provider: ProviderKind::Google,
            ..TranslationConfig::default()
        };
        assert_eq!(config.endpoint(), constants::GOOGLE_API_URL);

        let config = TranslationConfig::default_with_lang("es", Some("http://127.0.0.1:9/t"));
        assert_eq!(config.endpoint(), "http://127.0.0.1:9/t");
        assert_eq!(config.target_lang, "es");
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = TranslationConfig::default();
        config.target_lang = "??".to_string();
        assert!(config.validate().is_err());

        let mut config = TranslationConfig::default();
        config.api_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = TranslationConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: TranslationConfig = toml::from_str(
            r#"
            target_lang = "es"
            provider = "google"
            layout = "side_by_side"
            unit_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.target_lang, "es");
        assert_eq!(config.provider, ProviderKind::Google);
        assert_eq!(config.layout, RenderLayout::SideBySide);
        assert_eq!(config.unit_delay_ms, 0);
        assert_eq!(config.local_cache_size, constants::DEFAULT_LOCAL_CACHE_SIZE);
    }

    #[test]
    fn provider_from_str() {
        assert_eq!("DeepLX".parse::<ProviderKind>().unwrap(), ProviderKind::Deeplx);
        assert!("bing".parse::<ProviderKind>().is_err());
    }
}
