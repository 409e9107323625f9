use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// 将 HTML 字节转换为 DOM
///
/// `document_encoding` 为空或无法识别时按 UTF-8 解码（非法字节会被替换）。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> io::Result<RcDom> {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => encoding.decode(data).0.into_owned(),
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
}

/// 查找指定路径的DOM节点
pub fn find_nodes(node: &Handle, node_names: &[&str]) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    let Some((&node_name, rest)) = node_names.split_first() else {
        return found_nodes;
    };

    let name_matches = get_node_name(node) == Some(node_name);

    if name_matches && rest.is_empty() {
        found_nodes.push(node.clone());
    } else if name_matches {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, rest));
        }
        return found_nodes;
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_names));
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取父节点
///
/// 节点已脱离文档树（或父节点已被释放）时返回 `None`。
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 设置节点属性，`attr_value` 为 `None` 时删除该属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();

        match attr_value {
            Some(attr_value) => {
                if let Some(existing) = attrs_mut
                    .iter_mut()
                    .find(|attr| &*attr.name.local == attr_name)
                {
                    existing.value = StrTendril::from(attr_value);
                } else {
                    attrs_mut.push(Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                        value: format_tendril!("{}", attr_value),
                    });
                }
            }
            None => attrs_mut.retain(|attr| &*attr.name.local != attr_name),
        }
    };
}

/// 检查元素的 class 属性是否包含指定类名
pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// 创建 HTML 命名空间下的元素节点
pub fn create_element(tag_name: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: StrTendril::from(*value),
        })
        .collect();

    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(tag_name)),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// 创建文本节点
pub fn create_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

/// 追加子节点并维护父指针
pub fn append_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// 在父节点中用 `new` 替换 `old`
///
/// 返回 `old` 原来所在的位置；`old` 不在树中时返回 `None` 且不做任何修改。
pub fn replace_node(old: &Handle, new: &Handle) -> Option<usize> {
    let parent = get_parent_node(old)?;
    let index = {
        let mut children = parent.children.borrow_mut();
        let index = children.iter().position(|child| Rc::ptr_eq(child, old))?;
        children[index] = new.clone();
        index
    };

    new.parent.set(Some(Rc::downgrade(&parent)));
    old.parent.set(None);

    Some(index)
}

/// 将节点从父节点中移除
pub fn detach_node(node: &Handle) -> bool {
    let Some(parent) = get_parent_node(node) else {
        return false;
    };

    let mut children = parent.children.borrow_mut();
    let before = children.len();
    children.retain(|child| !Rc::ptr_eq(child, node));
    let removed = children.len() != before;
    drop(children);

    node.parent.set(None);
    removed
}

/// 拷贝节点本身（元素保留标签和属性），不含子节点
pub fn shallow_clone(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_clone)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => {
            NodeData::ProcessingInstruction {
                target: target.clone(),
                contents: contents.clone(),
            }
        }
    };

    Node::new(data)
}

/// 深拷贝节点及其全部子孙节点，拷贝结果不挂在任何父节点上
pub fn deep_clone(node: &Handle) -> Handle {
    let copy = shallow_clone(node);
    for child in node.children.borrow().iter() {
        append_child(&copy, &deep_clone(child));
    }
    copy
}
