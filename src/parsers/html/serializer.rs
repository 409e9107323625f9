use std::io;

use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

/// 序列化文档
///
/// `document_encoding` 非空且可识别时，输出会被转码为该编码。
pub fn serialize_document(dom: &RcDom, document_encoding: &str) -> io::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    if !document_encoding.is_empty() {
        if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    Ok(buf)
}

/// 序列化单个节点（包括节点本身）
pub fn serialize_node(node: &Handle) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = node.clone().into();
    serialize(
        &mut buf,
        &serializable,
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
