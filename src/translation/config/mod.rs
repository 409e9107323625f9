//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持配置文件、`.env`、环境变量和默认值

pub mod manager;

pub use manager::{ConfigManager, ProviderKind, RenderLayout, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 文本单元选择
    pub const MIN_TEXT_LENGTH: usize = 3;

    /// 候选块级元素，按优先级排列
    pub const BLOCK_ELEMENTS: &[&str] = &[
        "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "td", "th", "blockquote", "figcaption",
        "caption", "label", "div",
    ];

    /// 不参与翻译的元素，连同其子孙一起跳过
    pub const SKIP_ELEMENTS: &[&str] = &[
        "script", "style", "noscript", "template", "code", "pre", "svg", "math", "textarea",
        "head",
    ];

    /// 只能出现在表格结构中的单元，渲染时保留原标签作为外壳
    pub const TABLE_CONTEXT_ELEMENTS: &[&str] = &["td", "th", "caption"];

    /// 带有该类名的元素不翻译
    pub const NO_TRANSLATE_CLASS: &str = "notranslate";

    // 源语言自动检测标记
    pub const AUTO_DETECT: &str = "auto";

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://localhost:1188/translate";
    pub const GOOGLE_API_URL: &str = "https://translate.googleapis.com/translate_a/single";
    pub const DEFAULT_TARGET_LANG: &str = "zh";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_UNIT_DELAY_MS: u64 = 100;
    pub const DEFAULT_LOCAL_CACHE_SIZE: usize = 1000;

    // 渲染标记
    pub const WRAPPER_CLASS: &str = "interlinear-wrapper";
    pub const ORIGINAL_CLASS: &str = "interlinear-original";
    pub const TRANSLATION_CLASS: &str = "interlinear-translation";
    pub const WRAPPER_ID_ATTR: &str = "data-interlinear-id";
    pub const ACTIVE_ATTR: &str = "data-interlinear-active";
    pub const STYLE_ELEMENT_ID: &str = "interlinear-style";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "interlinear.toml",
        ".interlinear.toml",
        "interlinear.json",
        "~/.config/interlinear/config.toml",
    ];

    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];
}

/// 检查语言代码格式：ASCII 字母数字，可含 `-` / `_`，长度 2 到 12
pub fn is_valid_language_code(code: &str) -> bool {
    (2..=12).contains(&code.len())
        && code.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
