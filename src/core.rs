use chrono::{SecondsFormat, Utc};
use encoding_rs::Encoding;
use markup5ever_rcdom::RcDom;
use std::error::Error;
use std::fmt;

use crate::parsers::html::{get_charset, get_title, html_to_dom, serialize_document};
use crate::translation::{
    Controller, PassReport, RenderLayout, TranslationClient, TranslationConfig,
};

/// Represents errors that can occur while translating a document
#[derive(Debug)]
pub struct InterlinearError {
    details: String,
}

impl InterlinearError {
    /// Creates a new InterlinearError with the given message
    pub fn new(msg: &str) -> InterlinearError {
        InterlinearError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for InterlinearError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for InterlinearError {
    fn description(&self) -> &str {
        &self.details
    }
}

impl From<std::io::Error> for InterlinearError {
    fn from(error: std::io::Error) -> Self {
        InterlinearError::new(&error.to_string())
    }
}

/// Per-invocation overrides layered on top of the loaded configuration
///
/// Every `None` keeps the value coming from files and environment.
#[derive(Default, Clone, Debug)]
pub struct InterlinearOptions {
    pub target_lang: Option<String>,
    pub source_lang: Option<String>,
    pub api_url: Option<String>,
    pub provider: Option<String>,
    pub unit_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub layout: Option<RenderLayout>,
    pub input_encoding: Option<String>,
    pub output_encoding: Option<String>,
    pub no_cache: bool,
}

impl InterlinearOptions {
    /// 把命令行参数覆盖到配置上，并重新验证
    pub fn apply_to(&self, config: &mut TranslationConfig) -> Result<(), InterlinearError> {
        if let Some(target_lang) = &self.target_lang {
            config.target_lang = target_lang.clone();
        }
        if let Some(source_lang) = &self.source_lang {
            config.source_lang = source_lang.to_lowercase();
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.parse()?;
        }
        if let Some(delay) = self.unit_delay_ms {
            config.unit_delay_ms = delay;
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if self.no_cache {
            config.cache_enabled = false;
        }

        config.validate()?;
        Ok(())
    }
}

/// Parses a document, re-parsing it with its declared charset when that differs
pub fn parse_document(
    input_data: &[u8],
    input_encoding: Option<&str>,
) -> Result<(RcDom, String), InterlinearError> {
    let mut document_encoding = input_encoding.unwrap_or("utf-8").to_string();

    if Encoding::for_label(document_encoding.as_bytes()).is_none() {
        return Err(InterlinearError::new(&format!(
            "unknown encoding: {}",
            document_encoding
        )));
    }

    let mut dom = html_to_dom(input_data, &document_encoding)?;

    // 显式指定编码时不再根据文档声明重新解析
    if input_encoding.is_none() {
        if let Some(html_charset) = get_charset(&dom.document) {
            if let Some(document_charset) =
                Encoding::for_label_no_replacement(html_charset.as_bytes())
            {
                if document_charset.name() != "UTF-8" {
                    document_encoding = html_charset;
                    dom = html_to_dom(input_data, document_charset.name())?;
                }
            }
        }
    }

    Ok((dom, document_encoding))
}

/// Runs one translation pass over raw HTML data
///
/// Returns the serialized bilingual document, the document title and the pass report.
pub async fn translate_document(
    input_data: &[u8],
    options: &InterlinearOptions,
    config: TranslationConfig,
) -> Result<(Vec<u8>, Option<String>, PassReport), InterlinearError> {
    let (dom, document_encoding) = parse_document(input_data, options.input_encoding.as_deref())?;
    let document_title = get_title(&dom.document);

    let client = TranslationClient::from_config(&config)?;
    let target_lang = config.target_lang.clone();
    let controller = Controller::new(dom, client, config);

    let report = controller.translate(&target_lang).await?;

    let output_encoding = options
        .output_encoding
        .clone()
        .unwrap_or(document_encoding);
    let result = serialize_document(&controller.into_dom(), &output_encoding)?;

    Ok((result, document_title, report))
}

/// Expands `%timestamp%`, `%title%`, `%lang%` and `%extension%` in an output path
pub fn format_output_path(path: &str, document_title: Option<&str>, target_lang: &str) -> String {
    let datetime: &str = &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = document_title.unwrap_or("");

    path.replace("%timestamp%", &datetime.replace(':', "_"))
        .replace(
            "%title%",
            title
                .replace(['/', '\\'], "_")
                .replace('<', "[")
                .replace('>', "]")
                .replace(':', " - ")
                .replace('\"', "")
                .replace('|', "-")
                .replace('?', "")
                .trim_start_matches('.'),
        )
        .replace("%lang%", &target_lang.replace(['/', '\\'], "_"))
        .replace("%extension%", "html")
        .replace("%ext%", "htm")
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
}
