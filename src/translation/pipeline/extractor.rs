//! 文本单元提取器
//!
//! 按固定优先级扫描块级元素，选出互不嵌套的文本单元。
//! 提取过程只读取文档树，不做任何修改。

use markup5ever_rcdom::Handle;

use crate::parsers::html::{deep_clone, get_node_name};
use crate::translation::config::{constants, TranslationConfig};
use crate::translation::pipeline::filters::{
    blocks_subtree, contains_media, direct_text, has_enough_text, is_render_wrapper,
};

/// 一个待翻译的文本单元
#[derive(Debug, Clone)]
pub struct TextUnit {
    /// 文档树中的元素
    pub node: Handle,
    /// 元素标签名
    pub tag: String,
    /// 提取时的原始文本
    pub text: String,
    /// 含嵌入媒体时保存的子节点副本
    pub structure: Option<Vec<Handle>>,
    /// 文档顺序中的位置
    pub position: usize,
}

impl TextUnit {
    pub fn has_structure(&self) -> bool {
        self.structure.is_some()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 先序展开后的节点
struct FlatNode {
    handle: Handle,
    tag: Option<String>,
    /// 子树结束位置（不含）
    end: usize,
    /// 自身或祖先被排除
    blocked: bool,
    /// 已渲染的包装节点
    wrapper: bool,
}

/// 文本单元提取器
#[derive(Debug, Clone)]
pub struct TextExtractor {
    min_text_length: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(constants::MIN_TEXT_LENGTH)
    }
}

impl TextExtractor {
    pub fn new(min_text_length: usize) -> Self {
        Self {
            min_text_length: min_text_length.max(1),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.min_text_length)
    }

    /// 从文档中提取文本单元，结果按文档顺序排列
    pub fn extract(&self, document: &Handle) -> Vec<TextUnit> {
        let mut nodes = Vec::new();
        flatten(document, false, &mut nodes);

        let mut covered = vec![false; nodes.len()];
        // 已有的包装节点视为已选中，其祖先不能再成为文本单元
        let mut accepted: Vec<bool> = nodes.iter().map(|node| node.wrapper).collect();
        let mut units = Vec::new();

        for &kind in constants::BLOCK_ELEMENTS {
            for index in 0..nodes.len() {
                let node = &nodes[index];
                if node.tag.as_deref() != Some(kind) || node.blocked || covered[index] {
                    continue;
                }

                // 已选中的子孙元素会与当前元素重叠
                if accepted[index + 1..node.end].iter().any(|&a| a) {
                    continue;
                }

                let text = direct_text(&node.handle);
                if !has_enough_text(&text, self.min_text_length) {
                    continue;
                }

                let structure = contains_media(&node.handle).then(|| {
                    node.handle
                        .children
                        .borrow()
                        .iter()
                        .map(deep_clone)
                        .collect::<Vec<_>>()
                });

                accepted[index] = true;
                covered[index..node.end].iter_mut().for_each(|c| *c = true);

                units.push(TextUnit {
                    node: node.handle.clone(),
                    tag: kind.to_string(),
                    text,
                    structure,
                    position: index,
                });
            }
        }

        units.sort_by_key(|unit| unit.position);

        tracing::debug!("提取到 {} 个文本单元（共 {} 个节点）", units.len(), nodes.len());

        units
    }
}

fn flatten(node: &Handle, blocked: bool, nodes: &mut Vec<FlatNode>) {
    let blocked = blocked || blocks_subtree(node);
    let index = nodes.len();

    nodes.push(FlatNode {
        handle: node.clone(),
        tag: get_node_name(node).map(str::to_string),
        end: index + 1,
        blocked,
        wrapper: is_render_wrapper(node),
    });

    for child in node.children.borrow().iter() {
        flatten(child, blocked, nodes);
    }

    nodes[index].end = nodes.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{get_parent_node, html_to_dom};
    use std::rc::Rc;

    fn extract(html: &str) -> Vec<TextUnit> {
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        TextExtractor::default().extract(&dom.document)
    }

    fn texts(units: &[TextUnit]) -> Vec<&str> {
        units.iter().map(|unit| unit.text.as_str()).collect()
    }

    fn is_ancestor(ancestor: &Handle, node: &Handle) -> bool {
        let mut current = get_parent_node(node);
        while let Some(parent) = current {
            if Rc::ptr_eq(&parent, ancestor) {
                return true;
            }
            current = get_parent_node(&parent);
        }
        false
    }

    #[test]
    fn skips_short_paragraphs() {
        let units = extract("<p>Hello</p><p>World</p><p></p><p>ok</p>");
        assert_eq!(texts(&units), vec!["Hello", "World"]);
    }

    #[test]
    fn paragraph_wins_over_container() {
        let units = extract("<div><p>Inside paragraph</p></div>");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].tag, "p");
    }

    #[test]
    fn empty_container_defers_to_list_items() {
        // div 本身没有直接文本，里面的 li 被选中
        let units = extract("<div><ul><li>First item</li><li>Second item</li></ul></div>");
        assert_eq!(texts(&units), vec!["First item", "Second item"]);
    }

    #[test]
    fn no_unit_is_nested_in_another() {
        let units = extract(
            "<div>Outer text here<p>Inner text here</p></div>\
             <blockquote>Quote text<p>nested para</p></blockquote>\
             <table><tr><td>Cell text<div>inner div text</div></td></tr></table>\
             <ul><li>Item text<ul><li>Sub item</li></ul></li></ul>",
        );

        assert!(!units.is_empty());
        for a in &units {
            for b in &units {
                assert!(!is_ancestor(&a.node, &b.node), "{} contains {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn results_follow_document_order() {
        let units = extract("<h1>Title text</h1><div>Lead text</div><p>Body text</p><li>List text</li>");
        assert_eq!(
            texts(&units),
            vec!["Title text", "Lead text", "Body text", "List text"]
        );
        assert!(units.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn skips_scripts_code_and_opt_outs() {
        let units = extract(
            "<pre><p>code para</p></pre>\
             <div class='notranslate'><p>Brand name</p></div>\
             <p translate='no'>Keep this</p>\
             <noscript><p>Enable JS</p></noscript>\
             <p>Translate me</p>",
        );
        assert_eq!(texts(&units), vec!["Translate me"]);
    }

    #[test]
    fn skips_existing_wrappers() {
        let units = extract(
            "<div class='interlinear-wrapper'><div class='interlinear-original'>Old text</div>\
             <div class='interlinear-translation'>Viejo texto</div></div><p>New text</p>",
        );
        assert_eq!(texts(&units), vec!["New text"]);
    }

    #[test]
    fn ancestors_of_existing_wrappers_are_skipped() {
        let units = extract(
            "<div>Outer text here<div class='interlinear-wrapper'>\
             <div class='interlinear-original'>Inner paragraph</div></div></div>\
             <p>Fresh text</p>",
        );
        assert_eq!(texts(&units), vec!["Fresh text"]);
    }

    #[test]
    fn captures_structure_for_media() {
        let units = extract("<p>Look <img src='cat.png'> at this</p><p>Plain text</p>");
        assert_eq!(units.len(), 2);

        let structure = units[0].structure.as_ref().expect("structure");
        assert_eq!(structure.len(), 3);
        assert!(units[0].has_structure());
        assert!(!units[1].has_structure());
        assert_eq!(units[0].text, "Look at this");
    }

    #[test]
    fn respects_custom_threshold() {
        let dom = html_to_dom(b"<p>Hi</p><p>Hello there</p>", "utf-8").unwrap();
        let units = TextExtractor::new(1).extract(&dom.document);
        assert_eq!(texts(&units), vec!["Hi", "Hello there"]);
    }
}
