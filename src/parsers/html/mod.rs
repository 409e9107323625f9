//! HTML解析和处理模块
//!
//! - `utils`: 基础常量与文本工具
//! - `dom`: 基础DOM操作（查找、属性、节点替换、深拷贝）
//! - `metadata`: 文档元数据处理
//! - `serializer`: 序列化功能

pub mod dom;
pub mod metadata;
pub mod serializer;
pub mod utils;

pub use dom::{
    append_child, create_element, create_text, deep_clone, detach_node, find_nodes,
    get_node_attr, get_node_name, get_parent_node, has_class, html_to_dom, replace_node,
    set_node_attr, shallow_clone,
};
pub use metadata::{
    get_body, get_charset, get_document_language, get_head, get_title, is_frameset,
    is_translation_disabled,
};
pub use serializer::{serialize_document, serialize_node};
pub use utils::{collapse_whitespace, is_media_element, MEDIA_ELEMENTS, WHITESPACES};
