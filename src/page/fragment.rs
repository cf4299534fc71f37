use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// Their content is never part of the page text.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Owned copy of a parsed subtree, detached from the parser's
/// reference-counted nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::page) enum Parsed {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Parsed>,
    },
    Text(String),
}

fn collect(handle: &Handle, out: &mut Vec<Parsed>) {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            match out.last_mut() {
                Some(Parsed::Text(previous)) => previous.push_str(&text),
                _ => out.push(Parsed::Text(text)),
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            let mut children = Vec::new();
            if !RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                for child in handle.children.borrow().iter() {
                    collect(child, &mut children);
                }
            }
            out.push(Parsed::Element {
                tag,
                attrs,
                children,
            });
        }
        _ => {}
    }
}

fn children_of(handle: &Handle) -> Vec<Parsed> {
    let mut out = Vec::new();
    for child in handle.children.borrow().iter() {
        collect(child, &mut out);
    }
    out
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Parses markup meant to become the content of a `context` element, the
/// way `innerHTML` does: `<td>` is kept under a `tr`, `<option>` under a
/// `select`.
pub(in crate::page) fn parse_inner(context: &str, markup: &str) -> Vec<Parsed> {
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(context),
    );
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
        .one(markup);
    // The fragment parser hangs everything under a synthetic <html> root.
    let root = dom.document.children.borrow().first().cloned();
    match root {
        Some(root) => children_of(&root),
        None => Vec::new(),
    }
}

/// Parses a whole page and returns the content of its `<body>`.
pub(in crate::page) fn parse_body(markup: &str) -> Vec<Parsed> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    match find_element(&dom.document, "body") {
        Some(body) => children_of(&body),
        None => Vec::new(),
    }
}
