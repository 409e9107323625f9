//! 文本单元过滤规则
//!
//! 判断元素是否可以作为文本单元，以及如何取出元素的直接文本

use markup5ever_rcdom::{Handle, NodeData};

use crate::parsers::html::{
    collapse_whitespace, get_node_attr, get_node_name, has_class, is_media_element,
};
use crate::translation::config::constants;

/// 检查元素是否为不参与翻译的元素（脚本、样式、代码块等）
pub fn is_skip_element(tag_name: &str) -> bool {
    constants::SKIP_ELEMENTS.contains(&tag_name)
}

/// 检查元素是否显式声明不翻译
///
/// 支持 `translate="no"` 属性和 `notranslate` 类名。
pub fn is_opted_out(node: &Handle) -> bool {
    let attr_opt_out = get_node_attr(node, "translate")
        .map(|value| value.trim().eq_ignore_ascii_case("no"))
        .unwrap_or(false);

    attr_opt_out || has_class(node, constants::NO_TRANSLATE_CLASS)
}

/// 检查元素是否为已渲染的译文包装
pub fn is_render_wrapper(node: &Handle) -> bool {
    has_class(node, constants::WRAPPER_CLASS)
}

/// 检查元素及其子孙是否整体被排除
pub fn blocks_subtree(node: &Handle) -> bool {
    match get_node_name(node) {
        Some(name) => is_skip_element(name) || is_opted_out(node) || is_render_wrapper(node),
        None => false,
    }
}

/// 取出元素的直接文本
///
/// 唯一子节点是文本节点时使用该节点的完整文本；
/// 否则只拼接直接文本子节点，子元素中的文本不计入。
pub fn direct_text(node: &Handle) -> String {
    let children = node.children.borrow();

    if let [only_child] = children.as_slice() {
        if let NodeData::Text { contents } = &only_child.data {
            return collapse_whitespace(&contents.borrow());
        }
    }

    children
        .iter()
        .filter_map(|child| match &child.data {
            NodeData::Text { contents } => Some(collapse_whitespace(&contents.borrow())),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 文本是否达到最小长度（按字符计）
pub fn has_enough_text(text: &str, min_length: usize) -> bool {
    text.chars().count() >= min_length
}

/// 检查元素子孙中是否包含嵌入媒体
pub fn contains_media(node: &Handle) -> bool {
    node.children.borrow().iter().any(|child| {
        get_node_name(child).map_or(false, is_media_element) || contains_media(child)
    })
}
