//! 渲染与撤销
//!
//! 这是唯一会修改文档树的模块：把文本单元就地替换为包装节点，
//! 并能根据记录表把原始元素原样放回。

pub mod registry;
pub mod wrapper;

use markup5ever_rcdom::Handle;

pub use registry::{Registry, TranslationRecord};
pub use wrapper::{build_replacement, build_wrapper};

use crate::parsers::html::{
    append_child, create_element, create_text, detach_node, get_body, get_head, get_node_attr,
    get_node_name, get_parent_node, replace_node, set_node_attr,
};
use crate::translation::client::Translation;
use crate::translation::config::{constants, RenderLayout, TranslationConfig};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::TextUnit;

const BASE_STYLE: &str = "\
.interlinear-wrapper{margin:0 0 1em}\
.interlinear-translation{color:#4a5568;margin-top:.25em}";

const STACKED_STYLE: &str = "\
.interlinear-translation{border-left:3px solid #a0aec0;padding-left:.5em}";

const SIDE_BY_SIDE_STYLE: &str = "\
.interlinear-wrapper{display:flex;gap:1em}\
.interlinear-wrapper>div{flex:1 1 0}\
.interlinear-translation{margin-top:0}";

/// 渲染器
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    layout: RenderLayout,
}

impl Renderer {
    pub fn new(layout: RenderLayout) -> Self {
        Self { layout }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.layout)
    }

    pub fn layout(&self) -> RenderLayout {
        self.layout
    }

    /// 用包装节点替换文本单元，并登记到记录表
    pub fn apply(
        &self,
        document: &Handle,
        registry: &mut Registry,
        unit: &TextUnit,
        translation: &Translation,
        target_lang: &str,
    ) -> TranslationResult<u64> {
        if get_parent_node(&unit.node).is_none() {
            return Err(TranslationError::DomMutation(format!(
                "<{}> 已脱离文档",
                unit.tag
            )));
        }

        let id = registry.allocate_id();
        let replacement = build_replacement(id, unit, &translation.text, target_lang);

        replace_node(&unit.node, &replacement).ok_or_else(|| {
            TranslationError::DomMutation(format!("无法替换 <{}> 元素", unit.tag))
        })?;

        registry.insert(TranslationRecord {
            id,
            original_text: unit.text.clone(),
            translated_text: translation.text.clone(),
            target_lang: target_lang.to_string(),
            fell_back: translation.fell_back,
            original: unit.node.clone(),
            replacement,
        });

        self.ensure_presentation(document, target_lang);

        Ok(id)
    }

    /// 清除全部包装节点，返回恢复的元素数量
    ///
    /// 记录表为空时不做任何修改。
    pub fn clear(&self, document: &Handle, registry: &mut Registry) -> usize {
        if registry.is_empty() {
            return 0;
        }

        let mut restored = 0;
        for record in registry.drain() {
            if replace_node(&record.replacement, &record.original).is_some() {
                restored += 1;
            } else {
                tracing::warn!("译文 #{} 已不在文档中，丢弃记录", record.id);
            }
        }

        self.remove_presentation(document);

        restored
    }

    /// 注入样式并标记 `<body>`
    fn ensure_presentation(&self, document: &Handle, target_lang: &str) {
        if let Some(head) = get_head(document) {
            if find_style_element(&head).is_none() {
                let css = match self.layout {
                    RenderLayout::Stacked => format!("{}{}", BASE_STYLE, STACKED_STYLE),
                    RenderLayout::SideBySide => format!("{}{}", BASE_STYLE, SIDE_BY_SIDE_STYLE),
                };
                let style = create_element("style", &[("id", constants::STYLE_ELEMENT_ID)]);
                append_child(&style, &create_text(&css));
                append_child(&head, &style);
            }
        }

        if let Some(body) = get_body(document) {
            set_node_attr(&body, constants::ACTIVE_ATTR, Some(target_lang.to_string()));
        }
    }

    fn remove_presentation(&self, document: &Handle) {
        if let Some(style) = get_head(document).and_then(|head| find_style_element(&head)) {
            detach_node(&style);
        }

        if let Some(body) = get_body(document) {
            set_node_attr(&body, constants::ACTIVE_ATTR, None);
        }
    }
}

fn find_style_element(head: &Handle) -> Option<Handle> {
    head.children
        .borrow()
        .iter()
        .find(|child| {
            get_node_name(child) == Some("style")
                && get_node_attr(child, "id").as_deref() == Some(constants::STYLE_ELEMENT_ID)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{html_to_dom, serialize_document};
    use crate::translation::pipeline::TextExtractor;
    use markup5ever_rcdom::RcDom;

    fn translated(text: &str) -> Translation {
        Translation {
            text: format!("{}-ES", text),
            fell_back: false,
        }
    }

    fn render_all(dom: &RcDom, renderer: &Renderer, registry: &mut Registry) {
        for unit in TextExtractor::default().extract(&dom.document) {
            renderer
                .apply(&dom.document, registry, &unit, &translated(&unit.text), "es")
                .unwrap();
        }
    }

    fn html(dom: &RcDom) -> String {
        String::from_utf8(serialize_document(dom, "").unwrap()).unwrap()
    }

    #[test]
    fn apply_then_clear_restores_document() {
        let source = "<!DOCTYPE html><html><head><title>T</title></head><body>\
                      <h1>Heading text</h1><p>Hello <a href=\"/x\">link</a> world</p>\
                      <ul><li>One item</li></ul><p>Picture <img src=\"a.png\"> here</p>\
                      </body></html>";
        let dom = html_to_dom(source.as_bytes(), "utf-8").unwrap();
        let before = html(&dom);

        let renderer = Renderer::default();
        let mut registry = Registry::new();
        render_all(&dom, &renderer, &mut registry);

        let during = html(&dom);
        assert_eq!(registry.len(), 4);
        assert!(during.contains("interlinear-wrapper"));
        assert!(during.contains("<style id=\"interlinear-style\">"));
        assert!(during.contains("data-interlinear-active=\"es\""));

        assert_eq!(renderer.clear(&dom.document, &mut registry), 4);
        assert!(registry.is_empty());
        assert_eq!(html(&dom), before);
    }

    #[test]
    fn clear_on_empty_registry_is_noop() {
        let dom = html_to_dom(b"<p>Hello</p>", "utf-8").unwrap();
        let before = html(&dom);

        let mut registry = Registry::new();
        assert_eq!(Renderer::default().clear(&dom.document, &mut registry), 0);
        assert_eq!(html(&dom), before);
    }

    #[test]
    fn style_is_injected_once() {
        let dom = html_to_dom(b"<p>First para</p><p>Second para</p>", "utf-8").unwrap();
        let mut registry = Registry::new();
        render_all(&dom, &Renderer::new(RenderLayout::SideBySide), &mut registry);

        let out = html(&dom);
        assert_eq!(out.matches("interlinear-style").count(), 1);
        assert!(out.contains("display:flex"));
    }

    #[test]
    fn detached_unit_fails_without_side_effects() {
        let dom = html_to_dom(b"<p>Hello there</p>", "utf-8").unwrap();
        let unit = TextExtractor::default().extract(&dom.document).remove(0);
        detach_node(&unit.node);

        let mut registry = Registry::new();
        let result = Renderer::default().apply(
            &dom.document,
            &mut registry,
            &unit,
            &translated(&unit.text),
            "es",
        );

        assert!(matches!(result, Err(TranslationError::DomMutation(_))));
        assert!(registry.is_empty());
        assert!(!html(&dom).contains("interlinear-style"));
    }

    #[test]
    fn clear_drops_wrappers_removed_by_others() {
        let dom = html_to_dom(b"<p>First para</p><p>Second para</p>", "utf-8").unwrap();
        let renderer = Renderer::default();
        let mut registry = Registry::new();
        render_all(&dom, &renderer, &mut registry);

        let first = registry.iter().next().unwrap().replacement.clone();
        detach_node(&first);

        assert_eq!(renderer.clear(&dom.document, &mut registry), 1);
        assert!(registry.is_empty());
        assert!(!html(&dom).contains("interlinear"));
    }
}
