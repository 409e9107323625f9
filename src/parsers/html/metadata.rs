//! 文档元数据处理
//!
//! 读取标题、字符集、声明语言，并判断文档是否允许被改写。

use markup5ever_rcdom::{Handle, NodeData};

use super::dom::{find_nodes, get_node_attr};

/// 获取文档标题
///
/// 只返回第一个 `<title>` 的第一段文本。
pub fn get_title(node: &Handle) -> Option<String> {
    for title_node in find_nodes(node, &["html", "head", "title"]).iter() {
        for child_node in title_node.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child_node.data {
                return Some(contents.borrow().trim().to_string());
            }
        }
    }

    None
}

/// 获取文档声明的字符集
///
/// 同时支持 `<meta charset>` 和 `<meta http-equiv="content-type">` 两种写法。
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(charset) = get_node_attr(meta_node, "charset") {
            return Some(charset.trim().to_string());
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(content) = get_node_attr(meta_node, "content") {
                return parse_charset(&content);
            }
        }
    }

    None
}

/// 从 content-type 字符串中取出 charset 参数
pub fn parse_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
        .filter(|charset| !charset.is_empty())
}

/// 获取 `<html lang>` 声明的语言，已去除首尾空白
pub fn get_document_language(document: &Handle) -> Option<String> {
    find_nodes(document, &["html"])
        .first()
        .and_then(|html| get_node_attr(html, "lang"))
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
}

/// 获取 `<body>` 元素
pub fn get_body(document: &Handle) -> Option<Handle> {
    find_nodes(document, &["html", "body"]).into_iter().next()
}

/// 获取 `<head>` 元素
pub fn get_head(document: &Handle) -> Option<Handle> {
    find_nodes(document, &["html", "head"]).into_iter().next()
}

/// 检查文档是否为 frameset 文档
pub fn is_frameset(document: &Handle) -> bool {
    !find_nodes(document, &["html", "frameset"]).is_empty()
}

/// 检查文档是否整体声明了不允许翻译
///
/// 识别 `<html translate="no">` 与 `<meta name="google" content="notranslate">`。
pub fn is_translation_disabled(document: &Handle) -> bool {
    let html_opt_out = find_nodes(document, &["html"]).first().map_or(false, |html| {
        get_node_attr(html, "translate")
            .map(|value| value.trim().eq_ignore_ascii_case("no"))
            .unwrap_or(false)
    });

    let meta_opt_out = find_nodes(document, &["html", "head", "meta"])
        .iter()
        .any(|meta| {
            get_node_attr(meta, "name")
                .map(|name| name.eq_ignore_ascii_case("google"))
                .unwrap_or(false)
                && get_node_attr(meta, "content")
                    .map(|content| content.trim().eq_ignore_ascii_case("notranslate"))
                    .unwrap_or(false)
        });

    html_opt_out || meta_opt_out
}
