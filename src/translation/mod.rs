//! 段落翻译管道
//!
//! 把文档中的块级文本逐段翻译，并以原文/译文对照的形式就地渲染：
//! - **pipeline**: 文本单元提取（只读）
//! - **client**: 翻译客户端，失败时回退为原文
//! - **render**: 包装节点的渲染与撤销，唯一修改文档树的模块
//! - **session**: 运行标记与译文记录表
//! - **controller**: 接收命令并驱动上述步骤
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use interlinear::parsers::html_to_dom;
//! use interlinear::translation::{Controller, TranslationClient, TranslationConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::default_with_lang("es", None);
//! let client = TranslationClient::from_config(&config)?;
//! let dom = html_to_dom(b"<p>Hello world</p>", "utf-8")?;
//!
//! let controller = Controller::new(dom, client, config);
//! let report = controller.translate("es").await?;
//! println!("{} 段已翻译", report.rendered);
//!
//! controller.clear();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod session;

pub use client::{
    create_translator, detect_source_language, ClientStatsSnapshot, DeeplxTranslator,
    GoogleTranslator, Translation, TranslationClient, Translator,
};
pub use command::{Ack, Command, Request};
pub use config::{ConfigManager, ProviderKind, RenderLayout, TranslationConfig};
pub use controller::{Controller, PassReport};
pub use error::{TranslationError, TranslationResult};
pub use pipeline::{TextExtractor, TextUnit};
pub use render::{Registry, Renderer, TranslationRecord};
pub use session::Session;

/// 读取配置并翻译一段 HTML，返回翻译后的 HTML
///
/// 适合一次性的调用场景；需要撤销或多次操作时直接使用 [`Controller`]。
pub async fn translate_html(
    html: &str,
    target_lang: &str,
    config: TranslationConfig,
) -> TranslationResult<(String, PassReport)> {
    let client = TranslationClient::from_config(&config)?;
    let dom = crate::parsers::html_to_dom(html.as_bytes(), "utf-8")?;

    let controller = Controller::new(dom, client, config);
    let report = controller.translate(target_lang).await?;
    let output = controller.snapshot()?;

    Ok((output, report))
}
