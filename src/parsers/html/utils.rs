/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 带嵌入媒体的元素：包含这些元素的文本单元需要保留原始结构
pub const MEDIA_ELEMENTS: &[&str] = &[
    "img", "picture", "video", "audio", "svg", "canvas", "iframe", "embed", "object",
];

/// 去除首尾 ASCII 空白并把内部连续空白折叠为单个空格
pub fn collapse_whitespace(text: &str) -> String {
    text.split(WHITESPACES)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 检查是否为媒体元素
pub fn is_media_element(tag_name: &str) -> bool {
    MEDIA_ELEMENTS.contains(&tag_name)
}
