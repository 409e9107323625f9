//! 翻译控制器
//!
//! 接收 `translate` / `clear` 命令，驱动提取、翻译和渲染三个步骤。
//! 文本单元放入显式队列，由单个消费循环逐个翻译并立即渲染，
//! 同一时间只有一个翻译请求在进行。

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use markup5ever_rcdom::{Handle, RcDom};
use serde::{Deserialize, Serialize};

use crate::parsers::html::{get_body, is_frameset, is_translation_disabled, serialize_document};
use crate::translation::client::{detect_source_language, TranslationClient};
use crate::translation::command::{Ack, Command};
use crate::translation::config::{constants, is_valid_language_code, TranslationConfig};
use crate::translation::error::{helpers::log_error, TranslationError, TranslationResult};
use crate::translation::pipeline::{TextExtractor, TextUnit};
use crate::translation::render::Renderer;
use crate::translation::session::Session;

/// 一次翻译的结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub target_lang: String,
    pub source_lang: String,
    /// 提取到的文本单元数
    pub found: usize,
    /// 成功渲染的数量
    pub rendered: usize,
    /// 渲染失败被跳过的数量
    pub failed: usize,
    /// 翻译失败回退为原文的数量
    pub fallbacks: usize,
    pub elapsed_ms: u64,
}

/// 翻译控制器
pub struct Controller {
    dom: RcDom,
    client: TranslationClient,
    extractor: TextExtractor,
    renderer: Renderer,
    session: Session,
    config: TranslationConfig,
}

impl Controller {
    pub fn new(dom: RcDom, client: TranslationClient, config: TranslationConfig) -> Self {
        Self {
            dom,
            client,
            extractor: TextExtractor::from_config(&config),
            renderer: Renderer::from_config(&config),
            session: Session::new(),
            config,
        }
    }

    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &TranslationClient {
        &self.client
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_dom(self) -> RcDom {
        self.dom
    }

    /// 翻译整个文档
    ///
    /// 已有翻译在运行时立即返回 `Busy`，不排队也不取消正在进行的翻译。
    pub async fn translate(&self, target_lang: &str) -> TranslationResult<PassReport> {
        let _guard = self.session.try_start()?;

        let target_lang = target_lang.trim();
        if !is_valid_language_code(target_lang) {
            return Err(TranslationError::InvalidInput(format!(
                "目标语言无效: {}",
                target_lang
            )));
        }

        if !self.config.enabled {
            return Err(TranslationError::ConfigError("翻译功能已禁用".to_string()));
        }

        self.check_context()?;

        let source_lang = if self.config.source_lang == constants::AUTO_DETECT {
            detect_source_language(self.document())
        } else {
            self.config.source_lang.clone()
        };

        let started = Instant::now();
        let mut queue: VecDeque<TextUnit> = self.extractor.extract(self.document()).into();

        let mut report = PassReport {
            target_lang: target_lang.to_string(),
            source_lang: source_lang.clone(),
            found: queue.len(),
            ..PassReport::default()
        };

        tracing::info!(
            "开始翻译: {} 个文本单元, {} -> {}, 服务: {}",
            report.found,
            source_lang,
            target_lang,
            self.client.provider_name()
        );

        let delay = self.config.unit_delay();

        while let Some(unit) = queue.pop_front() {
            let translation = self
                .client
                .translate_detailed(&unit.text, target_lang, &source_lang)
                .await;

            if translation.fell_back {
                report.fallbacks += 1;
            }

            let applied = {
                let mut registry = self.session.registry_mut();
                self.renderer.apply(
                    self.document(),
                    &mut registry,
                    &unit,
                    &translation,
                    target_lang,
                )
            };

            match applied {
                Ok(id) => {
                    report.rendered += 1;
                    tracing::debug!("已渲染 <{}> #{} ({} 字符)", unit.tag, id, unit.char_count());
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!("跳过文本单元 <{}>: {}", unit.tag, err);
                }
            }

            if !queue.is_empty() && delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            "翻译完成: 渲染 {}, 失败 {}, 回退 {}, 耗时 {}ms",
            report.rendered,
            report.failed,
            report.fallbacks,
            report.elapsed_ms
        );

        Ok(report)
    }

    /// 清除全部译文，返回恢复的元素数量
    ///
    /// 无论是否有翻译在运行都会执行，可重复调用。
    pub fn clear(&self) -> usize {
        let mut registry = self.session.registry_mut();
        let restored = self.renderer.clear(self.document(), &mut registry);

        if restored > 0 {
            tracing::info!("已清除 {} 处译文", restored);
        }

        restored
    }

    /// 序列化当前文档
    pub fn snapshot(&self) -> TranslationResult<String> {
        let bytes = serialize_document(&self.dom, "")?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 处理一条命令
    pub async fn handle(&self, command: Command) -> Ack {
        match command {
            Command::Translate { target_lang } => {
                let target_lang = target_lang.unwrap_or_else(|| self.config.target_lang.clone());
                match self.translate(&target_lang).await {
                    Ok(report) => Ack {
                        report: Some(report),
                        ..Ack::ok()
                    },
                    Err(err) => {
                        log_error(&err);
                        Ack::failure(&err)
                    }
                }
            }
            Command::Clear => Ack {
                cleared: Some(self.clear()),
                ..Ack::ok()
            },
            Command::Snapshot => match self.snapshot() {
                Ok(html) => Ack {
                    html: Some(html),
                    ..Ack::ok()
                },
                Err(err) => Ack::failure(&err),
            },
        }
    }

    /// 检查文档是否允许被改写
    fn check_context(&self) -> TranslationResult<()> {
        let document = self.document();

        if is_frameset(document) {
            return Err(TranslationError::UnsupportedContext(
                "frameset 文档".to_string(),
            ));
        }

        if is_translation_disabled(document) {
            return Err(TranslationError::UnsupportedContext(
                "文档声明不允许翻译".to_string(),
            ));
        }

        if get_body(document).is_none() {
            return Err(TranslationError::UnsupportedContext(
                "文档缺少 <body>".to_string(),
            ));
        }

        Ok(())
    }
}
