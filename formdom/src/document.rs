use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dom::{FormDom, ScopeKind};
use crate::element::{Element, Tag};
use crate::event::{CustomEvent, DispatchedEvent, Listener};
use crate::selector::Selector;
use crate::validity::{self, ValidityState};

/// Handle to a node of a [`Document`]. Handles are indices in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Node {
    /// Attributes and state; `children` is always empty here.
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    custom_message: String,
}

/// An in-memory element tree with native constraint validation and
/// synchronous event dispatch.
pub struct Document {
    nodes: Vec<Node>,
    listeners: HashMap<NodeId, Vec<(String, Listener)>>,
    dispatched: Vec<DispatchedEvent>,
    /// Parsed selectors by source text; `None` for ones that failed to parse.
    selectors: RefCell<HashMap<String, Option<Rc<Selector>>>>,
}

impl Document {
    /// Load an element tree. The root gets `NodeId` 0 and the rest follow in
    /// document order.
    pub fn new(root: Element) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            listeners: HashMap::new(),
            dispatched: Vec::new(),
            selectors: RefCell::new(HashMap::new()),
        };
        doc.insert(root, None);
        doc
    }

    fn insert(&mut self, mut element: Element, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = std::mem::take(&mut element.children);
        self.nodes.push(Node {
            element,
            parent,
            children: Vec::with_capacity(children.len()),
            custom_message: String::new(),
        });

        for child in children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }

        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attributes of a node. Panics if `node` belongs to another document.
    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0].element
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.element.id == id)
            .map(NodeId)
    }

    /// First node in document order with the given `name`.
    pub fn by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.element.name == name)
            .map(NodeId)
    }

    /// All nodes matching `selector`, in document order. Returns an empty list
    /// if the selector does not parse.
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match self.selector(selector) {
            Some(sel) => (0..self.nodes.len())
                .map(NodeId)
                .filter(|n| sel.matches(self, *n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Parse `selector` once and reuse it for later lookups. A selector that
    /// does not parse is logged the first time and never matches.
    fn selector(&self, selector: &str) -> Option<Rc<Selector>> {
        if let Some(cached) = self.selectors.borrow().get(selector) {
            return cached.clone();
        }

        let parsed = match Selector::parse(selector) {
            Ok(sel) => Some(Rc::new(sel)),
            Err(e) => {
                log::warn!("selector {selector:?} never matches: {e}");
                None
            }
        };
        self.selectors
            .borrow_mut()
            .insert(selector.to_string(), parsed.clone());
        parsed
    }

    /// Number of distinct selectors parsed so far.
    pub fn parsed_selectors(&self) -> usize {
        self.selectors.borrow().len()
    }

    // Tree navigation

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// Descendants in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Disabled either directly or through a disabled ancestor fieldset.
    pub fn is_disabled(&self, node: NodeId) -> bool {
        let el = self.element(node);
        if !el.tag.is_listed() {
            return false;
        }
        el.disabled
            || self.ancestors(node).any(|a| {
                let anc = self.element(a);
                anc.tag == Tag::Fieldset && anc.disabled
            })
    }

    // Mutation

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.nodes[node.0].element.value = value.into();
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.nodes[node.0].element.disabled = disabled;
    }

    pub fn set_required(&mut self, node: NodeId, required: bool) {
        self.nodes[node.0].element.required = required;
    }

    /// The message last passed to `set_custom_validity`.
    pub fn custom_message(&self, node: NodeId) -> &str {
        &self.nodes[node.0].custom_message
    }

    // Events

    /// Register a listener for `event_type` on `node`.
    pub fn add_listener<F>(&mut self, node: NodeId, event_type: impl Into<String>, listener: F)
    where
        F: FnMut(&DispatchedEvent, NodeId) + 'static,
    {
        self.listeners
            .entry(node)
            .or_default()
            .push((event_type.into(), Box::new(listener)));
    }

    /// Every event dispatched so far, oldest first.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.dispatched
    }

    /// Drain the dispatched-event log.
    pub fn take_events(&mut self) -> Vec<DispatchedEvent> {
        std::mem::take(&mut self.dispatched)
    }

    fn call_listeners(&mut self, current: NodeId, dispatched: &DispatchedEvent) {
        if let Some(listeners) = self.listeners.get_mut(&current) {
            for (event_type, listener) in listeners.iter_mut() {
                if *event_type == dispatched.event.event_type {
                    listener(dispatched, current);
                }
            }
        }
    }
}

impl FormDom for Document {
    type Node = NodeId;

    fn scope_kind(&self, node: NodeId) -> ScopeKind {
        match self.element(node).tag {
            Tag::Form => ScopeKind::Form,
            Tag::Fieldset => ScopeKind::Fieldset,
            _ => ScopeKind::Field,
        }
    }

    fn name(&self, node: NodeId) -> &str {
        &self.element(node).name
    }

    fn value(&self, node: NodeId) -> &str {
        &self.element(node).value
    }

    fn input_type(&self, node: NodeId) -> &str {
        self.element(node).effective_type()
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        Document::is_disabled(self, node)
    }

    fn is_required(&self, node: NodeId) -> bool {
        self.element(node).required
    }

    fn will_validate(&self, node: NodeId) -> bool {
        let el = self.element(node);
        let barred = match el.tag {
            Tag::Input => {
                el.readonly || matches!(el.effective_type(), "hidden" | "button" | "reset")
            }
            Tag::Button => matches!(el.effective_type(), "button" | "reset"),
            Tag::Textarea => el.readonly,
            Tag::Select => false,
            Tag::Form | Tag::Fieldset | Tag::Div => true,
        };
        !barred && !self.is_disabled(node)
    }

    fn validity(&self, node: NodeId) -> ValidityState {
        let n = &self.nodes[node.0];
        validity::compute(&n.element, self.is_disabled(node), &n.custom_message)
    }

    fn validation_message(&self, node: NodeId) -> String {
        if !self.will_validate(node) {
            return String::new();
        }
        let custom = self.custom_message(node);
        if !custom.is_empty() {
            return custom.to_string();
        }
        self.validity(node)
            .first_violation()
            .map(|c| c.default_message().to_string())
            .unwrap_or_default()
    }

    fn set_custom_validity(&mut self, node: NodeId, message: &str) {
        self.nodes[node.0].custom_message = message.to_string();
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.selector(selector)
            .is_some_and(|sel| sel.matches(self, node))
    }

    fn elements(&self, container: NodeId) -> Vec<NodeId> {
        let listed = self.scope_kind(container).is_container();
        self.descendants(container)
            .into_iter()
            .filter(|n| {
                let tag = self.element(*n).tag;
                if listed { tag.is_listed() } else { tag.is_control() }
            })
            .collect()
    }

    fn fieldsets(&self, container: NodeId) -> Vec<NodeId> {
        self.descendants(container)
            .into_iter()
            .filter(|n| self.element(*n).tag == Tag::Fieldset)
            .collect()
    }

    fn closest_fieldset(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|a| self.element(*a).tag == Tag::Fieldset)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    fn dispatch(&mut self, node: NodeId, event: CustomEvent) {
        log::trace!("dispatch '{}' on {:?}", event.event_type, node);

        let path: Vec<NodeId> = if event.bubbles {
            std::iter::once(node).chain(self.ancestors(node)).collect()
        } else {
            vec![node]
        };
        let dispatched = DispatchedEvent {
            target: node,
            event,
        };

        for current in path {
            self.call_listeners(current, &dispatched);
        }

        self.dispatched.push(dispatched);
    }
}
