//! # 解析器模块
//!
//! HTML文档解析、DOM操作、元数据读取与序列化。

pub mod html;

pub use html::{get_charset, get_title, html_to_dom, serialize_document};
