//! 翻译客户端
//!
//! `Translator` 是翻译服务提供方的抽象；`TranslationClient` 在其之上
//! 提供超时、失败回退、结果缓存和统计。客户端永远返回字符串：
//! 任何失败都会回退为原文，不会中断整个翻译过程。

pub mod deeplx;
pub mod google;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};

pub use deeplx::DeeplxTranslator;
pub use google::GoogleTranslator;

use crate::parsers::html::get_document_language;
use crate::translation::config::{
    constants, is_valid_language_code, ProviderKind, TranslationConfig,
};
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译服务提供方
#[async_trait]
pub trait Translator: Send + Sync {
    /// 翻译一段文本
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;

    /// 提供方名称，用于日志
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        (**self).translate(text, source_lang, target_lang).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// 根据配置创建翻译服务提供方
pub fn create_translator(config: &TranslationConfig) -> TranslationResult<Box<dyn Translator>> {
    let endpoint = config.endpoint();
    let timeout = config.request_timeout();

    Ok(match config.provider {
        ProviderKind::Deeplx => Box::new(DeeplxTranslator::new(endpoint, timeout)?),
        ProviderKind::Google => Box::new(GoogleTranslator::new(endpoint, timeout)?),
    })
}

/// 读取文档声明的源语言
///
/// 取 `<html lang>` 的前两个字符并转为小写；未声明或不是合法语言代码时返回自动检测标记。
pub fn detect_source_language(document: &Handle) -> String {
    get_document_language(document)
        .map(|lang| lang.chars().take(2).collect::<String>().to_lowercase())
        .filter(|code| is_valid_language_code(code))
        .unwrap_or_else(|| constants::AUTO_DETECT.to_string())
}

/// 单次翻译的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// 是否因失败回退为原文
    pub fell_back: bool,
}

impl Translation {
    fn translated(text: String) -> Self {
        Self {
            text,
            fell_back: false,
        }
    }

    fn fallback(original: &str) -> Self {
        Self {
            text: original.to_string(),
            fell_back: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_lang: String,
    target_lang: String,
    text: String,
}

/// 客户端统计
#[derive(Debug, Default)]
pub struct ClientStats {
    requests: AtomicUsize,
    failures: AtomicUsize,
    cache_hits: AtomicUsize,
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatsSnapshot {
    pub requests: usize,
    pub failures: usize,
    pub cache_hits: usize,
}

impl ClientStats {
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }
}

/// 带回退策略的翻译客户端
pub struct TranslationClient {
    translator: Box<dyn Translator>,
    timeout: Duration,
    cache: Option<Mutex<LruCache<CacheKey, String>>>,
    stats: ClientStats,
}

impl TranslationClient {
    pub fn new(translator: Box<dyn Translator>, config: &TranslationConfig) -> Self {
        let cache = if config.cache_enabled {
            NonZeroUsize::new(config.local_cache_size).map(|size| Mutex::new(LruCache::new(size)))
        } else {
            None
        };

        Self {
            translator,
            timeout: config.request_timeout(),
            cache,
            stats: ClientStats::default(),
        }
    }

    /// 按配置创建 HTTP 翻译客户端
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Ok(Self::new(create_translator(config)?, config))
    }

    pub fn provider_name(&self) -> &str {
        self.translator.provider_name()
    }

    pub fn stats(&self) -> ClientStatsSnapshot {
        self.stats.snapshot()
    }

    /// 翻译文本，失败时返回原文
    pub async fn translate(&self, text: &str, target_lang: &str, source_lang: &str) -> String {
        self.translate_detailed(text, target_lang, source_lang)
            .await
            .text
    }

    /// 翻译文本并报告是否发生回退
    pub async fn translate_detailed(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: &str,
    ) -> Translation {
        if text.trim().is_empty() {
            return Translation::translated(text.to_string());
        }

        let key = CacheKey {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            text: text.to_string(),
        };

        if let Some(cached) = self.cache_get(&key) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Translation::translated(cached);
        }

        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        match self.request(text, source_lang, target_lang).await {
            Ok(translated) => {
                self.cache_put(key, &translated);
                Translation::translated(translated)
            }
            Err(err) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    "{} 翻译失败，使用原文: {}",
                    self.translator.provider_name(),
                    err
                );
                Translation::fallback(text)
            }
        }
    }

    async fn request(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let translated = tokio::time::timeout(
            self.timeout,
            self.translator.translate(text, source_lang, target_lang),
        )
        .await??;

        if translated.trim().is_empty() {
            return Err(TranslationError::ParseError("翻译结果为空".to_string()));
        }

        Ok(translated)
    }

    fn cache_get(&self, key: &CacheKey) -> Option<String> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.lock().ok()?;
        cache.get(key).cloned()
    }

    fn cache_put(&self, key: CacheKey, translated: &str) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key, translated.to_string());
            }
        }
    }
}
