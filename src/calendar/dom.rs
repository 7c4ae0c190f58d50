// DOM helpers over the html5ever reference-counted tree.
// Parsing, lookups, attribute edits, node grafting and serialization.

use std::rc::Rc;

use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{LocalName, Namespace};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::Result;

/// Parse a full page or a loose fragment into a document tree.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Parse a fragment and detach the nodes it produced, ready to be appended elsewhere.
pub fn parse_fragment_nodes(html: &str) -> Vec<Handle> {
    let dom = parse_html(html);
    let body = find_first(&dom.document, &|node: &Handle| {
        get_node_name(node) == Some("body")
    });
    let Some(body) = body else {
        return Vec::new();
    };

    let children: Vec<Handle> = body.children.borrow_mut().drain(..).collect();
    for child in &children {
        child.parent.set(None);
    }
    children
}

/// Get the local name of an element node.
pub fn get_node_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Get an attribute value.
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

/// Set an attribute, or remove it completely when `attr_value` is None.
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<&str>) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();

    match attr_value {
        None => attrs.retain(|attr| &*attr.name.local != attr_name),
        Some(value) => {
            if let Some(existing) = attrs.iter_mut().find(|attr| &*attr.name.local == attr_name) {
                existing.value = StrTendril::from(value);
            } else {
                attrs.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(attr_name)),
                    value: StrTendril::from(value),
                });
            }
        }
    }
}

/// Check whether an element carries a class.
pub fn has_class(node: &Handle, class: &str) -> bool {
    get_node_attr(node, "class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Depth-first search for the first descendant (or the node itself) matching `pred`.
pub fn find_first(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    if pred(node) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_first(child, pred))
}

/// Collect every descendant (and the node itself) matching `pred`, in document order.
pub fn find_all(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Vec<Handle> {
    let mut found = Vec::new();
    collect(node, pred, &mut found);
    found
}

fn collect(node: &Handle, pred: &dyn Fn(&Handle) -> bool, found: &mut Vec<Handle>) {
    if pred(node) {
        found.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        collect(child, pred, found);
    }
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: &Handle, text: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        text.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        push_text(child, text);
    }
}

/// Get the parent of a node without unlinking it.
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    child.parent.set(weak);
    parent
}

/// Check whether any ancestor of `node` (not the node itself) matches `pred`.
pub fn has_ancestor(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> bool {
    let mut current = get_parent_node(node);
    while let Some(parent) = current {
        if pred(&parent) {
            return true;
        }
        current = get_parent_node(&parent);
    }
    false
}

/// Unlink a node from its parent. No-op for a root node.
pub fn detach(node: &Handle) {
    let Some(parent) = node.parent.take().and_then(|w| w.upgrade()) else {
        return;
    };
    parent
        .children
        .borrow_mut()
        .retain(|child| !Rc::ptr_eq(child, node));
}

/// Append a detached node as the last child of `parent`.
pub fn append_child(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Replace all children of `parent` with the nodes parsed from `html`.
pub fn replace_children_with_html(parent: &Handle, html: &str) {
    let old: Vec<Handle> = parent.children.borrow_mut().drain(..).collect();
    for child in old {
        child.parent.set(None);
    }
    for node in parse_fragment_nodes(html) {
        append_child(parent, node);
    }
}

/// Serialize the children of a node (the browser's `innerHTML`).
pub fn inner_html(node: &Handle) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut buf, &serializable, opts)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
