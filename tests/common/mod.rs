// 集成测试公共模块
//
// 提供模拟翻译服务和 HTML 辅助工具

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use markup5ever_rcdom::RcDom;

use interlinear::parsers::html::{get_body, html_to_dom, serialize_document};
use interlinear::translation::{
    Controller, TranslationClient, TranslationConfig, TranslationError, TranslationResult,
    Translator,
};

/// 模拟翻译行为
#[derive(Debug, Clone)]
pub enum MockMode {
    /// "Hello" → "Hello-ES"
    Suffix,
    /// 所有请求都失败
    Fail,
    /// 包含指定文本的请求失败，其余按 Suffix 处理
    FailOn(String),
}

/// 模拟翻译服务，记录调用次数
pub struct MockTranslator {
    mode: MockMode,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    /// 每次请求前等待 `delay`
    pub fn slow(mode: MockMode, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            mode,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}-{}", text, target_lang.to_uppercase())),
            MockMode::Fail => Err(TranslationError::NetworkError(
                "simulated endpoint failure".to_string(),
            )),
            MockMode::FailOn(needle) if text.contains(needle.as_str()) => Err(
                TranslationError::ParseError("simulated malformed response".to_string()),
            ),
            MockMode::FailOn(_) => Ok(format!("{}-{}", text, target_lang.to_uppercase())),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// 不带节奏延迟的测试配置
pub fn test_config() -> TranslationConfig {
    TranslationConfig {
        unit_delay_ms: 0,
        ..TranslationConfig::default()
    }
}

/// 用模拟翻译服务创建控制器
pub fn controller_with(html: &str, translator: Arc<MockTranslator>, config: TranslationConfig) -> Controller {
    let client = TranslationClient::new(Box::new(translator), &config);
    Controller::new(create_test_dom(html), client, config)
}

pub fn suffix_controller(html: &str) -> (Controller, Arc<MockTranslator>) {
    let translator = MockTranslator::new(MockMode::Suffix);
    (controller_with(html, translator.clone(), test_config()), translator)
}

pub fn create_test_dom(html: &str) -> RcDom {
    html_to_dom(html.as_bytes(), "utf-8").expect("parse test html")
}

pub fn to_html(dom: &RcDom) -> String {
    String::from_utf8(serialize_document(dom, "").expect("serialize")).expect("utf-8")
}

/// 包装节点中原文与译文的文本对，按文档顺序
pub fn rendered_pairs(html: &str) -> Vec<(String, String)> {
    let dom = create_test_dom(html);
    let body = get_body(&dom.document).expect("body");

    let mut pairs = Vec::new();
    collect_pairs(&body, &mut pairs);
    pairs
}

fn collect_pairs(node: &markup5ever_rcdom::Handle, pairs: &mut Vec<(String, String)>) {
    use interlinear::parsers::html::{get_node_name, has_class};

    if get_node_name(node) == Some("div") && has_class(node, "interlinear-wrapper") {
        let children = node.children.borrow();
        let original = children
            .iter()
            .find(|c| has_class(c, "interlinear-original"))
            .map(text_content)
            .unwrap_or_default();
        let translated = children
            .iter()
            .find(|c| has_class(c, "interlinear-translation"))
            .map(text_content)
            .unwrap_or_default();
        pairs.push((original, translated));
        return;
    }

    for child in node.children.borrow().iter() {
        collect_pairs(child, pairs);
    }
}

fn text_content(node: &markup5ever_rcdom::Handle) -> String {
    match &node.data {
        markup5ever_rcdom::NodeData::Text { contents } => contents.borrow().to_string(),
        _ => node.children.borrow().iter().map(text_content).collect(),
    }
}

pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn three_paragraphs() -> &'static str {
        "<!DOCTYPE html><html lang=\"en\"><head><title>Test</title></head>\
         <body><p>Hello</p><p>World</p><p></p></body></html>"
    }

    pub fn article_page() -> &'static str {
        r#"<!DOCTYPE html>
<html lang="en-GB">
<head>
    <meta charset="utf-8">
    <title>Article</title>
    <style>p { color: black; }</style>
</head>
<body>
    <header><h1>Welcome to the article</h1></header>
    <nav><ul><li>Home page</li><li>About us</li></ul></nav>
    <main>
        <p>This is the <em>first</em> paragraph of the article.</p>
        <div>A container with <span>some</span> direct text.
            <p>A nested paragraph inside the container.</p>
        </div>
        <figure><img src="chart.png" alt="Chart"><figcaption>Quarterly results chart</figcaption></figure>
        <p>See <img src="icon.png"> the icon for details.</p>
        <pre><code>fn main() {}</code></pre>
        <p class="notranslate">BrandName</p>
        <table><tr><th>Name header</th><td>Value cell</td></tr></table>
        <blockquote>A famous quotation goes here.</blockquote>
    </main>
    <script>console.log("not translated");</script>
</body>
</html>"#
    }
}
