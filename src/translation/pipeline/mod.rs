//! 文本处理管道
//!
//! - `filters`: 元素过滤与直接文本规则
//! - `extractor`: 文本单元提取

pub mod extractor;
pub mod filters;

pub use extractor::{TextExtractor, TextUnit};
