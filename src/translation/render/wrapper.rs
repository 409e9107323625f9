//! 包装节点构建
//!
//! ```html
//! <div class="interlinear-wrapper" data-interlinear-id="1">
//!   <div class="interlinear-original">原文或保留的原始结构</div>
//!   <div class="interlinear-translation" lang="es">译文</div>
//! </div>
//! ```
//!
//! 表格单元格（`td` / `th` / `caption`）不能直接替换为 `<div>`，
//! 否则重新解析时包装会被移出表格；这类单元保留原标签和属性作为外壳，
//! 包装放在外壳内部。

use markup5ever_rcdom::Handle;

use crate::parsers::html::{append_child, create_element, create_text, shallow_clone};
use crate::translation::config::constants;
use crate::translation::pipeline::TextUnit;

/// 构建替换文本单元的节点：普通单元即包装节点，表格单元为包含包装的外壳
pub fn build_replacement(id: u64, unit: &TextUnit, translated: &str, target_lang: &str) -> Handle {
    let wrapper = build_wrapper(id, unit, translated, target_lang);

    if !constants::TABLE_CONTEXT_ELEMENTS.contains(&unit.tag.as_str()) {
        return wrapper;
    }

    let shell = shallow_clone(&unit.node);
    append_child(&shell, &wrapper);
    shell
}

/// 构建替换文本单元的包装节点
pub fn build_wrapper(id: u64, unit: &TextUnit, translated: &str, target_lang: &str) -> Handle {
    let id = id.to_string();
    let wrapper = create_element(
        "div",
        &[
            ("class", constants::WRAPPER_CLASS),
            (constants::WRAPPER_ID_ATTR, id.as_str()),
        ],
    );

    let original = create_element("div", &[("class", constants::ORIGINAL_CLASS)]);
    match &unit.structure {
        Some(children) => {
            for child in children {
                append_child(&original, child);
            }
        }
        None => append_child(&original, &create_text(&unit.text)),
    }

    let translation = create_element(
        "div",
        &[
            ("class", constants::TRANSLATION_CLASS),
            ("lang", target_lang),
        ],
    );
    append_child(&translation, &create_text(translated));

    append_child(&wrapper, &original);
    append_child(&wrapper, &translation);

    wrapper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{html_to_dom, serialize_node};
    use crate::translation::pipeline::TextExtractor;

    #[test]
    fn plain_text_wrapper() {
        let dom = html_to_dom(b"<p>Hello <b>x</b> there</p>", "utf-8").unwrap();
        let unit = TextExtractor::default().extract(&dom.document).remove(0);

        let wrapper = build_wrapper(7, &unit, "Hola allí", "es");
        assert_eq!(
            serialize_node(&wrapper).unwrap(),
            "<div class=\"interlinear-wrapper\" data-interlinear-id=\"7\">\
             <div class=\"interlinear-original\">Hello there</div>\
             <div class=\"interlinear-translation\" lang=\"es\">Hola allí</div></div>"
        );
    }

    #[test]
    fn media_wrapper_keeps_structure() {
        let dom = html_to_dom(b"<p>A cat <img src=\"cat.png\"> sleeping</p>", "utf-8").unwrap();
        let unit = TextExtractor::default().extract(&dom.document).remove(0);

        let wrapper = build_wrapper(1, &unit, "Un gato durmiendo", "es");
        let html = serialize_node(&wrapper).unwrap();
        assert!(html.contains(
            "<div class=\"interlinear-original\">A cat <img src=\"cat.png\"> sleeping</div>"
        ));
    }

    #[test]
    fn table_cell_keeps_its_shell() {
        let dom = html_to_dom(
            b"<table><tr><td class=\"num\" colspan=\"2\">Cell text</td></tr></table>",
            "utf-8",
        )
        .unwrap();
        let unit = TextExtractor::default().extract(&dom.document).remove(0);

        let replacement = build_replacement(3, &unit, "Texto", "es");
        assert_eq!(
            serialize_node(&replacement).unwrap(),
            "<td class=\"num\" colspan=\"2\">\
             <div class=\"interlinear-wrapper\" data-interlinear-id=\"3\">\
             <div class=\"interlinear-original\">Cell text</div>\
             <div class=\"interlinear-translation\" lang=\"es\">Texto</div></div></td>"
        );
    }

    #[test]
    fn paragraph_replacement_is_the_wrapper() {
        let dom = html_to_dom(b"<p>Hello there</p>", "utf-8").unwrap();
        let unit = TextExtractor::default().extract(&dom.document).remove(0);

        let replacement = build_replacement(1, &unit, "Hola", "es");
        assert!(serialize_node(&replacement)
            .unwrap()
            .starts_with("<div class=\"interlinear-wrapper\""));
    }
}
