//! # Interlinear Library
//!
//! 把 HTML 文档中的段落逐段翻译，并以原文/译文对照的形式就地渲染，
//! 随时可以撤销恢复原文档。
//!
//! ## 模块组织
//!
//! - `core` - 文档读取、整体翻译流程和输出路径
//! - `env` - 类型安全的环境变量
//! - `parsers` - HTML 解析、DOM 操作与序列化
//! - `serve` - 基于标准输入输出的命令循环
//! - `translation` - 段落翻译管道

pub mod core;
pub mod env;
pub mod parsers;
pub mod serve;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::*;
pub use crate::parsers::*;
