mod fragment;

use std::collections::HashMap;

use self::fragment::Parsed;

const TEXT_TAG: &str = "#text";

/// Handle to a node of a [`Page`]. Slots of removed nodes are reused, so a
/// handle also carries the generation of the slot it was issued for; a
/// stale handle never resolves to the node that took its place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    /// Character data; only set on text nodes.
    pub text: String,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    pub selected: bool,
    pub display: Option<String>,
    pub background: Option<String>,
    pub tabindex: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn element(tag: String, attrs: Vec<(String, String)>) -> Self {
        let mut node = Node {
            tag,
            ..Default::default()
        };
        for (name, value) in attrs {
            match name.as_str() {
                "id" => node.id = Some(value).filter(|v| !v.is_empty()),
                "class" => {
                    node.classes = value.split_whitespace().map(|c| c.to_string()).collect();
                }
                "value" => node.value = value,
                "checked" => node.checked = true,
                "disabled" => node.disabled = true,
                "selected" => node.selected = true,
                "tabindex" => node.tabindex = Some(value),
                "style" => {
                    node.display = style_property(&value, "display");
                    node.background = style_property(&value, "background");
                    node.attrs.insert(name, value);
                }
                _ => {
                    node.attrs.insert(name, value);
                }
            }
        }
        node
    }

    fn text_node(text: &str) -> Self {
        Node {
            tag: TEXT_TAG.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_hidden(&self) -> bool {
        self.display.as_deref() == Some("none")
    }
}

fn style_property(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(property) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// In-memory document the handlers read from and repaint into. Markup is
/// parsed with html5ever, so server fragments land in the tree the way a
/// browser would place them, entities included.
#[derive(Clone, Debug)]
pub struct Page {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let body = Node {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(body),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    /// Builds a page from a full document (or a bare snippet, which the
    /// parser wraps in a body).
    pub fn from_markup(markup: &str) -> Self {
        let mut page = Self::new();
        let body = page.body();
        let parsed = fragment::parse_body(markup);
        page.import(body, parsed);
        page
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn get(&self, node: NodeId) -> Option<&Node> {
        self.slots
            .get(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Body and everything attached below it, in document order.
    fn live(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .filter_map(|id| self.get(id).map(|n| (id, n)))
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.live()
            .find(|(_, n)| n.id.as_deref() == Some(id))
            .map(|(i, _)| i)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.by_id(id).and_then(|n| self.get(n))
    }

    pub fn node_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        let node = self.by_id(id)?;
        self.get_mut(node)
    }

    /// Nodes carrying every class in `classes`, in document order.
    pub fn with_classes(&self, classes: &[&str]) -> Vec<NodeId> {
        self.live()
            .filter(|(_, n)| classes.iter().all(|c| n.has_class(c)))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.with_classes(&[class])
    }

    /// Nodes whose `class` attribute is exactly `class`.
    pub fn with_exact_class(&self, tag: &str, class: &str) -> Vec<NodeId> {
        self.live()
            .filter(|(_, n)| n.tag == tag && n.classes.len() == 1 && n.classes[0] == class)
            .map(|(i, _)| i)
            .collect()
    }

    /// Every node below `node`, text nodes included, in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(node) {
            Some(n) => n.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(n) = self.get(current) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn text_content(&self, node: NodeId) -> String {
        match self.get(node) {
            Some(n) if n.is_text() => n.text.clone(),
            Some(_) => self
                .descendants(node)
                .into_iter()
                .filter_map(|d| self.get(d))
                .filter(|n| n.is_text())
                .map(|n| n.text.as_str())
                .collect(),
            None => String::new(),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, node: NodeId) {
        if let Some(slot) = self
            .slots
            .get_mut(node.index)
            .filter(|s| s.generation == node.generation && s.node.is_some())
        {
            slot.node = None;
            self.free.push(node.index);
        }
    }

    /// Attaches `node` as the last child of `parent`. Nothing is attached
    /// when `parent` is gone.
    pub fn append_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        self.get(parent)?;
        node.parent = Some(parent);
        node.children.clear();
        let id = self.alloc(node);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    fn import(&mut self, parent: NodeId, parsed: Vec<Parsed>) -> Vec<NodeId> {
        let mut top_level = Vec::new();
        for item in parsed {
            let id = match item {
                Parsed::Text(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    self.append_child(parent, Node::text_node(&text))
                }
                Parsed::Element {
                    tag,
                    attrs,
                    children,
                } => {
                    let id = self.append_child(parent, Node::element(tag, attrs));
                    if let Some(id) = id {
                        self.import_children(id, children);
                    }
                    id
                }
            };
            top_level.extend(id);
        }
        top_level
    }

    fn import_children(&mut self, parent: NodeId, parsed: Vec<Parsed>) {
        for item in parsed {
            match item {
                Parsed::Text(text) => {
                    self.append_child(parent, Node::text_node(&text));
                }
                Parsed::Element {
                    tag,
                    attrs,
                    children,
                } => {
                    if let Some(id) = self.append_child(parent, Node::element(tag, attrs)) {
                        self.import_children(id, children);
                    }
                }
            }
        }
    }

    /// Parses `markup` as content of `parent` and appends the result.
    /// Returns the top-level nodes created.
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let context = match self.get(parent) {
            Some(n) if !n.is_text() => n.tag.clone(),
            _ => return Vec::new(),
        };
        let parsed = fragment::parse_inner(&context, markup);
        self.import(parent, parsed)
    }

    /// Replaces the content of `node` with the parsed `markup`.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        self.clear_children(node);
        self.append_markup(node, markup);
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            self.append_child(node, Node::text_node(text));
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        for d in self.descendants(node) {
            self.release(d);
        }
        if let Some(n) = self.get_mut(node) {
            n.children.clear();
        }
    }

    /// Detaches `node` and everything below it. The body cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body || self.get(node).is_none() {
            return;
        }
        self.clear_children(node);
        let parent = self.get(node).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != node);
        }
        self.release(node);
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
