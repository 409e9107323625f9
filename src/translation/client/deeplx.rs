//! DeepLX 兼容接口

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// DeepLX 请求体
#[derive(Debug, Serialize)]
struct DeeplxRequest<'a> {
    text: &'a str,
    source_lang: String,
    target_lang: String,
}

/// DeepLX 响应体
#[derive(Debug, Deserialize)]
struct DeeplxResponse {
    code: i64,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// DeepLX 翻译服务
#[derive(Debug, Clone)]
pub struct DeeplxTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl DeeplxTranslator {
    pub fn new(api_url: &str, timeout: Duration) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Translator for DeeplxTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let request = DeeplxRequest {
            text,
            source_lang: provider_lang_code(source_lang),
            target_lang: provider_lang_code(target_lang),
        };

        let response = self.client.post(&self.api_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::NetworkError(format!(
                "DeepLX 返回状态码 {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_response(&body)
    }

    fn provider_name(&self) -> &str {
        "deeplx"
    }
}

/// DeepLX 使用大写语言代码，自动检测标记保持原样
pub fn provider_lang_code(code: &str) -> String {
    if code.eq_ignore_ascii_case(constants::AUTO_DETECT) {
        constants::AUTO_DETECT.to_string()
    } else {
        code.to_uppercase()
    }
}

/// 解析 DeepLX 响应，`code` 必须为 200 且 `data` 为字符串
pub fn parse_response(body: &str) -> TranslationResult<String> {
    let response: DeeplxResponse = serde_json::from_str(body)?;

    if response.code != 200 {
        return Err(TranslationError::ParseError(format!(
            "DeepLX 返回错误码 {}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }

    response
        .data
        .ok_or_else(|| TranslationError::ParseError("DeepLX 响应缺少 data 字段".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes() {
        assert_eq!(provider_lang_code("es"), "ES");
        assert_eq!(provider_lang_code("zh-cn"), "ZH-CN");
        assert_eq!(provider_lang_code("AUTO"), "auto");
    }

    #[test]
    fn parses_success() {
        let body = r#"{"code":200,"id":1,"data":"Hola","alternatives":[]}"#;
        assert_eq!(parse_response(body).unwrap(), "Hola");
    }

    #[test]
    fn rejects_error_codes_and_garbage() {
        assert!(matches!(
            parse_response(r#"{"code":429,"message":"Too Many Requests"}"#),
            Err(TranslationError::ParseError(_))
        ));
        assert!(parse_response(r#"{"code":200}"#).is_err());
        assert!(parse_response("<html>oops</html>").is_err());
    }

    #[test]
    fn request_body_shape() {
        let request = DeeplxRequest {
            text: "Hello",
            source_lang: provider_lang_code("en"),
            target_lang: provider_lang_code("es"),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"text":"Hello","source_lang":"EN","target_lang":"ES"}"#
        );
    }
}
