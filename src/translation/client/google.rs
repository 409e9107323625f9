//! Google 网页翻译接口（`client=gtx`）

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::Translator;
use crate::translation::error::{TranslationError, TranslationResult};

/// Google 翻译服务
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(api_url: &str, timeout: Duration) -> TranslationResult<Self> {
        Url::parse(api_url)
            .map_err(|e| TranslationError::ConfigError(format!("API地址无效: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    /// 构造带查询参数的请求地址
    pub fn request_url(&self, text: &str, source_lang: &str, target_lang: &str) -> TranslationResult<Url> {
        Url::parse_with_params(
            &self.api_url,
            &[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| TranslationError::ConfigError(format!("API地址无效: {}", e)))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let url = self.request_url(text, source_lang, target_lang)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::NetworkError(format!(
                "Google 翻译返回状态码 {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_response(&body)
    }

    fn provider_name(&self) -> &str {
        "google"
    }
}

/// 解析 gtx 响应：拼接第一个数组中每个片段的第一个元素
pub fn parse_response(body: &str) -> TranslationResult<String> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    let segments = json
        .get(0)
        .and_then(|segments| segments.as_array())
        .ok_or_else(|| TranslationError::ParseError("响应缺少翻译片段".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|text| text.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslationError::ParseError("翻译结果为空".to_string()));
    }

    Ok(translated)
}
