//! 译文记录表
//!
//! 以包装节点编号为键，保存每个已渲染文本单元的原文、译文和原始元素。

use std::collections::BTreeMap;

use markup5ever_rcdom::Handle;

/// 一条译文记录
#[derive(Debug, Clone)]
pub struct TranslationRecord {
    pub id: u64,
    pub original_text: String,
    pub translated_text: String,
    pub target_lang: String,
    /// 翻译失败时译文即原文
    pub fell_back: bool,
    /// 被替换下来的原始元素，清除时放回原处
    pub original: Handle,
    /// 文档中替换原始元素的节点（包装节点，或包含包装的表格单元格外壳）
    pub replacement: Handle,
}

/// 译文记录表
#[derive(Debug, Default)]
pub struct Registry {
    records: BTreeMap<u64, TranslationRecord>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配一个新的包装节点编号
    pub fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert(&mut self, record: TranslationRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: u64) -> Option<&TranslationRecord> {
        self.records.get(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<TranslationRecord> {
        self.records.remove(&id)
    }

    /// 取出全部记录，按编号顺序
    pub fn drain(&mut self) -> Vec<TranslationRecord> {
        std::mem::take(&mut self.records).into_values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{create_element, create_text};

    fn record(registry: &mut Registry, text: &str) -> u64 {
        let id = registry.allocate_id();
        registry.insert(TranslationRecord {
            id,
            original_text: text.to_string(),
            translated_text: format!("{}-ES", text),
            target_lang: "es".to_string(),
            fell_back: false,
            original: create_text(text),
            replacement: create_element("div", &[]),
        });
        id
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut registry = Registry::new();
        let a = record(&mut registry, "a");
        let b = record(&mut registry, "b");

        assert!(a < b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(b).unwrap().translated_text, "b-ES");

        let drained: Vec<u64> = registry.drain().iter().map(|r| r.id).collect();
        assert_eq!(drained, vec![a, b]);
        assert!(registry.is_empty());

        // 清空后编号不回收
        assert!(record(&mut registry, "c") > b);
    }

    #[test]
    fn remove_single_record() {
        let mut registry = Registry::new();
        let id = record(&mut registry, "a");

        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
    }
}
