//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

use crate::core::InterlinearError;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 解析错误（翻译接口返回了无法识别的响应）
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 已有翻译任务正在运行
    #[error("翻译任务正在进行中")]
    Busy,

    /// 文档不允许被改写
    #[error("不支持的页面: {0}")]
    UnsupportedContext(String),

    /// 单个文本单元的DOM改写失败
    #[error("DOM操作失败: {0}")]
    DomMutation(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::Busy => true, // 等当前任务结束后可以再次提交
            TranslationError::IoError(_) => true,
            TranslationError::ConfigError(_) => false,
            TranslationError::ParseError(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::UnsupportedContext(_) => false,
            TranslationError::DomMutation(_) => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::ParseError(_) => ErrorSeverity::Warning,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::Busy => ErrorSeverity::Info,
            TranslationError::UnsupportedContext(_) => ErrorSeverity::Error,
            TranslationError::DomMutation(_) => ErrorSeverity::Warning,
            TranslationError::IoError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::Busy => ErrorCategory::Concurrency,
            TranslationError::UnsupportedContext(_) => ErrorCategory::Input,
            TranslationError::DomMutation(_) => ErrorCategory::Rendering,
            TranslationError::IoError(_) => ErrorCategory::Io,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let new_msg = |msg: &str| format!("{} (上下文: {})", msg, context);

        match &mut self {
            TranslationError::ConfigError(msg)
            | TranslationError::NetworkError(msg)
            | TranslationError::TimeoutError(msg)
            | TranslationError::ParseError(msg)
            | TranslationError::InvalidInput(msg)
            | TranslationError::UnsupportedContext(msg)
            | TranslationError::DomMutation(msg)
            | TranslationError::IoError(msg)
            | TranslationError::InternalError(msg) => {
                let updated = new_msg(msg.as_str());
                *msg = updated;
            }
            TranslationError::Busy => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Timeout,
    Parsing,
    Input,
    Concurrency,
    Rendering,
    Io,
    Internal,
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else if error.is_decode() {
            TranslationError::ParseError(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

/// 转换为InterlinearError
impl From<TranslationError> for InterlinearError {
    fn from(error: TranslationError) -> Self {
        InterlinearError::new(&error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }
}
