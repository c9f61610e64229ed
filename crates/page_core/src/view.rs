//! View-tree handle: the page capabilities the interaction layer consumes.
//!
//! A host such as the in-memory [`Document`](crate::document::Document)
//! implements [`ViewTree`]. The page behaviors only ever talk to this trait.

use std::{fmt, str::FromStr, sync::Arc};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    PointerEnter,
    PointerLeave,
}

impl EventKind {
    /// Whether the event propagates from the target to its ancestors.
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::Submit)
    }
}

/// What a listener asks the host to do with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Proceed,
    PreventDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector '{0}'")]
    Unsupported(String),
}

/// The subset of CSS selectors the page markup relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Class(String),
    Id(String),
    Tag(String),
    /// `a[href^="#"]`: anchors pointing into the current page.
    FragmentAnchor,
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::Id(name.into())
    }

    /// Resolves a same-page `href` such as `#about` to the element selector
    /// it references. `None` for a bare `#` or a non-fragment href.
    pub fn fragment_target(href: &str) -> Option<Self> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self::Id(id.to_string()))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }
        if raw == r##"a[href^="#"]"## || raw == "a[href^='#']" {
            return Ok(Self::FragmentAnchor);
        }

        let is_ident = |s: &str| {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if let Some(class) = raw.strip_prefix('.') {
            if is_ident(class) {
                return Ok(Self::Class(class.to_string()));
            }
        } else if let Some(id) = raw.strip_prefix('#') {
            if is_ident(id) {
                return Ok(Self::Id(id.to_string()));
            }
        } else if is_ident(raw) {
            return Ok(Self::Tag(raw.to_ascii_lowercase()));
        }
        Err(SelectorError::Unsupported(raw.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Tag(name) => f.write_str(name),
            Self::FragmentAnchor => f.write_str(r##"a[href^="#"]"##),
        }
    }
}

pub struct EventContext {
    pub view: Arc<dyn ViewTree>,
    /// The element the listener was registered on.
    pub current: NodeId,
    /// The element the event was dispatched to.
    pub target: NodeId,
    pub kind: EventKind,
}

pub type Listener = Arc<dyn Fn(&EventContext) -> EventResponse + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

pub struct VisibilityContext {
    pub view: Arc<dyn ViewTree>,
    pub observer: ObserverId,
    pub entries: Vec<VisibilityEntry>,
}

pub type VisibilityCallback = Arc<dyn Fn(&VisibilityContext) + Send + Sync>;

/// Handle to a rendered page.
///
/// Lookups on a node that is no longer attached return `None`/empty and
/// mutations on it are no-ops.
pub trait ViewTree: Send + Sync {
    /// Matching elements in document order.
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: NodeId, selector: &Selector) -> Option<NodeId>;

    fn contains(&self, node: NodeId) -> bool;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn toggle_class(&self, node: NodeId, class: &str, present: bool);

    /// Inline style property, e.g. `width`.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    /// An empty `value` clears the property.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    /// The node's own text, excluding children.
    fn text(&self, node: NodeId) -> Option<String>;
    fn set_text(&self, node: NodeId, text: &str);

    /// Current value of a form control.
    fn value(&self, node: NodeId) -> Option<String>;

    /// Detaches the node and its subtree.
    fn remove(&self, node: NodeId);

    fn add_listener(&self, node: NodeId, kind: EventKind, listener: Listener);

    fn observe_visibility(&self, node: NodeId, callback: VisibilityCallback) -> ObserverId;
    fn unobserve(&self, observer: ObserverId, node: NodeId);

    fn scroll_into_view(&self, node: NodeId, behavior: ScrollBehavior);

    /// Blocking, user-facing notice.
    fn alert(&self, message: &str);

    /// Developer diagnostics channel.
    fn console_error(&self, message: &str);
}
