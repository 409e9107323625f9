//! 命令接口
//!
//! 每条命令是一个 JSON 对象，例如：
//!
//! ```json
//! {"id": 1, "command": "translate", "target_lang": "es"}
//! {"command": "clear"}
//! {"command": "snapshot"}
//! ```
//!
//! 每条命令得到一个 `Ack`，请求中的 `id` 会原样带回。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::translation::error::TranslationError;

/// 控制命令
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// 翻译文档，未指定目标语言时使用配置中的默认值
    Translate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_lang: Option<String>,
    },
    /// 清除全部译文
    Clear,
    /// 返回当前文档的 HTML
    Snapshot,
}

/// 带编号的命令
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, TranslationError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// 命令应答
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub busy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<super::controller::PassReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(error: &TranslationError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            busy: matches!(error, TranslationError::Busy),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: Option<Value>) -> Self {
        self.id = id;
        self
    }
}
