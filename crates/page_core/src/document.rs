//! In-memory [`ViewTree`] for headless hosts and tests.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use tracing::{debug, warn};

use crate::view::{
    EventContext, EventKind, EventResponse, Listener, NodeId, ObserverId, ScrollBehavior,
    Selector, ViewTree, VisibilityCallback, VisibilityContext, VisibilityEntry,
};

/// Markup for one element handed to [`Document::append`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub listeners_run: usize,
}

struct Element {
    spec: ElementSpec,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(EventKind, Listener)>,
}

impl Element {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Class(class) => self.spec.classes.iter().any(|c| c == class),
            Selector::Id(id) => self.spec.id.as_deref() == Some(id.as_str()),
            Selector::Tag(tag) => self.spec.tag.eq_ignore_ascii_case(tag),
            Selector::FragmentAnchor => {
                self.spec.tag == "a"
                    && self
                        .spec
                        .attributes
                        .get("href")
                        .is_some_and(|href| href.starts_with('#'))
            }
        }
    }
}

struct Observer {
    callback: VisibilityCallback,
    targets: BTreeSet<NodeId>,
}

#[derive(Default)]
struct DocumentState {
    next_node: u64,
    next_observer: u64,
    elements: HashMap<NodeId, Element>,
    roots: Vec<NodeId>,
    observers: BTreeMap<ObserverId, Observer>,
    scrolls: Vec<(NodeId, ScrollBehavior)>,
    alerts: Vec<String>,
    console: Vec<String>,
}

impl DocumentState {
    /// Pre-order walk from `start`, or from the document roots.
    fn walk(&self, start: Option<NodeId>) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = match start {
            Some(node) => vec![node],
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(node) = stack.pop() {
            let Some(element) = self.elements.get(&node) else {
                continue;
            };
            order.push(node);
            stack.extend(element.children.iter().rev().copied());
        }
        order
    }
}

pub struct Document {
    this: Weak<Document>,
    state: Mutex<DocumentState>,
}

impl Document {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            state: Mutex::new(DocumentState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self) -> Option<Arc<dyn ViewTree>> {
        self.this
            .upgrade()
            .map(|document| document as Arc<dyn ViewTree>)
    }

    /// Inserts an element as the last child of `parent`, or at the top level.
    /// An unknown `parent` is treated as the top level.
    pub fn append(&self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        let mut state = self.state();
        state.next_node += 1;
        let node = NodeId(state.next_node);
        let parent = parent.filter(|p| state.elements.contains_key(p));

        match parent {
            Some(p) => {
                if let Some(parent_el) = state.elements.get_mut(&p) {
                    parent_el.children.push(node);
                }
            }
            None => state.roots.push(node),
        }
        state.elements.insert(
            node,
            Element {
                spec,
                parent,
                children: Vec::new(),
                listeners: Vec::new(),
            },
        );
        node
    }

    /// Delivers an event to `target` and, for bubbling kinds, its ancestors.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> DispatchOutcome {
        let listeners: Vec<(NodeId, Listener)> = {
            let state = self.state();
            if !state.elements.contains_key(&target) {
                return DispatchOutcome {
                    default_prevented: false,
                    listeners_run: 0,
                };
            }

            let mut path = vec![target];
            if kind.bubbles() {
                let mut current = state.elements.get(&target).and_then(|el| el.parent);
                while let Some(node) = current {
                    path.push(node);
                    current = state.elements.get(&node).and_then(|el| el.parent);
                }
            }

            let mut matching = Vec::new();
            for node in &path {
                let Some(element) = state.elements.get(node) else {
                    continue;
                };
                for (listener_kind, listener) in &element.listeners {
                    if *listener_kind == kind {
                        matching.push((*node, listener.clone()));
                    }
                }
            }
            matching
        };

        let Some(view) = self.handle() else {
            return DispatchOutcome {
                default_prevented: false,
                listeners_run: 0,
            };
        };

        let mut default_prevented = false;
        for (current, listener) in &listeners {
            let ctx = EventContext {
                view: view.clone(),
                current: *current,
                target,
                kind,
            };
            if listener(&ctx) == EventResponse::PreventDefault {
                default_prevented = true;
            }
        }
        debug!(%target, ?kind, listeners = listeners.len(), default_prevented, "event dispatched");

        DispatchOutcome {
            default_prevented,
            listeners_run: listeners.len(),
        }
    }

    /// Reports a viewport intersection change for `node` to its observers.
    pub fn set_visibility(&self, node: NodeId, visible: bool) {
        let callbacks: Vec<(ObserverId, VisibilityCallback)> = {
            let state = self.state();
            let matching: Vec<_> = state
                .observers
                .iter()
                .filter(|(_, observer)| observer.targets.contains(&node))
                .map(|(id, observer)| (*id, observer.callback.clone()))
                .collect();
            matching
        };
        let Some(view) = self.handle() else {
            return;
        };

        for (observer, callback) in callbacks {
            callback(&VisibilityContext {
                view: view.clone(),
                observer,
                entries: vec![VisibilityEntry {
                    target: node,
                    is_intersecting: visible,
                }],
            });
        }
    }

    /// Simulates the user editing a form control.
    pub fn set_value(&self, node: NodeId, value: &str) {
        if let Some(element) = self.state().elements.get_mut(&node) {
            element.spec.value = Some(value.to_string());
        }
    }

    pub fn scrolls(&self) -> Vec<(NodeId, ScrollBehavior)> {
        self.state().scrolls.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state().alerts.clone()
    }

    pub fn console_errors(&self) -> Vec<String> {
        self.state().console.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.state().observers.len()
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.state()
            .elements
            .get(&node)
            .map_or(0, |element| element.listeners.len())
    }
}

impl ViewTree for Document {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let state = self.state();
        state
            .walk(None)
            .into_iter()
            .filter(|node| {
                state
                    .elements
                    .get(node)
                    .is_some_and(|element| element.matches(selector))
            })
            .collect()
    }

    fn query_within(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        let state = self.state();
        state.walk(Some(root)).into_iter().skip(1).find(|node| {
            state
                .elements
                .get(node)
                .is_some_and(|element| element.matches(selector))
        })
    }

    fn contains(&self, node: NodeId) -> bool {
        self.state().elements.contains_key(&node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let state = self.state();
        let element = state.elements.get(&node)?;
        match name {
            "id" => element.spec.id.clone(),
            "class" => Some(element.spec.classes.join(" ")),
            _ => element.spec.attributes.get(name).cloned(),
        }
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.state().elements.get_mut(&node) {
            element
                .spec
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(element) = self.state().elements.get_mut(&node) {
            element.spec.attributes.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.state()
            .elements
            .get(&node)
            .is_some_and(|element| element.spec.classes.iter().any(|c| c == class))
    }

    fn toggle_class(&self, node: NodeId, class: &str, present: bool) {
        let mut state = self.state();
        let Some(element) = state.elements.get_mut(&node) else {
            return;
        };
        let classes = &mut element.spec.classes;
        let has = classes.iter().any(|c| c == class);
        if present && !has {
            classes.push(class.to_string());
        } else if !present && has {
            classes.retain(|c| c != class);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.state()
            .elements
            .get(&node)
            .and_then(|element| element.spec.styles.get(property).cloned())
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        let mut state = self.state();
        let Some(element) = state.elements.get_mut(&node) else {
            return;
        };
        if value.is_empty() {
            element.spec.styles.remove(property);
        } else {
            element
                .spec
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.state()
            .elements
            .get(&node)
            .and_then(|element| element.spec.text.clone())
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.state().elements.get_mut(&node) {
            element.spec.text = Some(text.to_string());
        }
    }

    fn value(&self, node: NodeId) -> Option<String> {
        self.state()
            .elements
            .get(&node)
            .and_then(|element| element.spec.value.clone())
    }

    fn remove(&self, node: NodeId) {
        let mut state = self.state();
        let Some(parent) = state.elements.get(&node).map(|element| element.parent) else {
            return;
        };
        let detached = parent
            .and_then(|p| state.elements.get_mut(&p))
            .map(|parent_el| parent_el.children.retain(|child| *child != node))
            .is_some();
        if !detached {
            state.roots.retain(|root| *root != node);
        }

        let subtree = state.walk(Some(node));
        for removed in &subtree {
            state.elements.remove(removed);
        }
        for observer in state.observers.values_mut() {
            for removed in &subtree {
                observer.targets.remove(removed);
            }
        }
        debug!(%node, removed = subtree.len(), "element removed");
    }

    fn add_listener(&self, node: NodeId, kind: EventKind, listener: Listener) {
        match self.state().elements.get_mut(&node) {
            Some(element) => element.listeners.push((kind, listener)),
            None => warn!(%node, ?kind, "listener registered on detached element"),
        }
    }

    fn observe_visibility(&self, node: NodeId, callback: VisibilityCallback) -> ObserverId {
        let mut state = self.state();
        state.next_observer += 1;
        let id = ObserverId(state.next_observer);
        state.observers.insert(
            id,
            Observer {
                callback,
                targets: BTreeSet::from([node]),
            },
        );
        id
    }

    fn unobserve(&self, observer: ObserverId, node: NodeId) {
        let mut state = self.state();
        let now_empty = match state.observers.get_mut(&observer) {
            Some(entry) => {
                entry.targets.remove(&node);
                entry.targets.is_empty()
            }
            None => false,
        };
        if now_empty {
            state.observers.remove(&observer);
        }
    }

    fn scroll_into_view(&self, node: NodeId, behavior: ScrollBehavior) {
        let mut state = self.state();
        if state.elements.contains_key(&node) {
            state.scrolls.push((node, behavior));
        }
    }

    fn alert(&self, message: &str) {
        self.state().alerts.push(message.to_string());
    }

    fn console_error(&self, message: &str) {
        self.state().console.push(message.to_string());
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
