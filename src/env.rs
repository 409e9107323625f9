//! 统一的环境变量管理系统
//!
//! 类型安全、可验证的环境变量访问，所有变量都以 `INTERLINEAR_` 为前缀

use std::env;
use std::fmt;
use std::time::Duration;

use crate::translation::config::is_valid_language_code;

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
///
/// 未设置且没有默认值时 `get` 返回错误，调用方据此决定是否覆盖配置。
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 只在变量被显式设置时返回值，解析失败视为错误
    fn get_set() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "INTERLINEAR_LOG_LEVEL";
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

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 翻译功能启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "INTERLINEAR_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable translation functionality";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 目标语言
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "INTERLINEAR_TARGET_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Target language code (e.g. 'es', 'zh-CN')";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim().to_string();
            if !is_valid_language_code(&lang) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid language code '{}'", value),
                });
            }
            Ok(lang)
        }
    }

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "INTERLINEAR_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Source language code ('auto' to read <html lang> or let the provider detect)";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim().to_lowercase();
            if lang == "auto" || is_valid_language_code(&lang) {
                Ok(lang)
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Language code must be 'auto' or a valid code".to_string(),
                })
            }
        }
    }

    /// 翻译服务提供方
    pub struct Provider;
    impl EnvVar<String> for Provider {
        const NAME: &'static str = "INTERLINEAR_PROVIDER";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation provider: deeplx, google";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                p @ ("deeplx" | "google") => Ok(p.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Unknown provider '{}'. Use: deeplx, google", value),
                }),
            }
        }
    }

    /// API URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "INTERLINEAR_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 单次翻译请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "INTERLINEAR_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Translation request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > 300 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 300 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// 相邻两个文本单元之间的间隔
    pub struct UnitDelay;
    impl EnvVar<u64> for UnitDelay {
        const NAME: &'static str = "INTERLINEAR_UNIT_DELAY_MS";
        const DEFAULT: Option<u64> = Some(100);
        const DESCRIPTION: &'static str = "Pause between consecutive unit translations (ms)";

        fn parse(value: &str) -> EnvResult<u64> {
            let millis = parse_positive_usize(value, Self::NAME, 0, 60_000)?;
            Ok(millis as u64)
        }
    }

    /// 最小可翻译文本长度
    pub struct MinTextLength;
    impl EnvVar<usize> for MinTextLength {
        const NAME: &'static str = "INTERLINEAR_MIN_TEXT_LENGTH";
        const DEFAULT: Option<usize> = Some(3);
        const DESCRIPTION: &'static str = "Minimum characters of direct text for a unit";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1000)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "INTERLINEAR_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Memoize successful translations in memory";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 本地缓存大小
    pub struct LocalCacheSize;
    impl EnvVar<usize> for LocalCacheSize {
        const NAME: &'static str = "INTERLINEAR_CACHE_LOCAL_SIZE";
        const DEFAULT: Option<usize> = Some(1000);
        const DESCRIPTION: &'static str = "Local cache size (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
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

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    fn line<T: fmt::Debug>(name: &str, description: &str, default: Option<T>) -> String {
        match default {
            Some(default) => format!("- `{}`: {} (default: {:?})\n", name, description, default),
            None => format!("- `{}`: {}\n", name, description),
        }
    }

    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core\n\n");
    docs.push_str(&line(
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        Some("info"),
    ));
    docs.push_str(&line(
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT,
    ));

    docs.push_str("\n## Translation\n\n");
    docs.push_str(&line(
        translation::Enabled::NAME,
        translation::Enabled::DESCRIPTION,
        translation::Enabled::DEFAULT,
    ));
    docs.push_str(&line::<String>(
        translation::TargetLang::NAME,
        translation::TargetLang::DESCRIPTION,
        None,
    ));
    docs.push_str(&line::<String>(
        translation::SourceLang::NAME,
        translation::SourceLang::DESCRIPTION,
        None,
    ));
    docs.push_str(&line::<String>(
        translation::Provider::NAME,
        translation::Provider::DESCRIPTION,
        None,
    ));
    docs.push_str(&line::<String>(
        translation::ApiUrl::NAME,
        translation::ApiUrl::DESCRIPTION,
        None,
    ));
    docs.push_str(&line(
        translation::RequestTimeout::NAME,
        translation::RequestTimeout::DESCRIPTION,
        translation::RequestTimeout::DEFAULT,
    ));
    docs.push_str(&line(
        translation::UnitDelay::NAME,
        translation::UnitDelay::DESCRIPTION,
        translation::UnitDelay::DEFAULT,
    ));
    docs.push_str(&line(
        translation::MinTextLength::NAME,
        translation::MinTextLength::DESCRIPTION,
        translation::MinTextLength::DEFAULT,
    ));

    docs.push_str("\n## Cache\n\n");
    docs.push_str(&line(
        cache::Enabled::NAME,
        cache::Enabled::DESCRIPTION,
        cache::Enabled::DEFAULT,
    ));
    docs.push_str(&line(
        cache::LocalCacheSize::NAME,
        cache::LocalCacheSize::DESCRIPTION,
        cache::LocalCacheSize::DEFAULT,
    ));

    docs
}
