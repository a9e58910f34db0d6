//! Child nodes passed to components, and classification by component kind.

use std::any::{TypeId, type_name};
use std::fmt;
use std::rc::Rc;

/// Identifies the component type a child node was created from.
#[derive(Clone, Copy)]
pub struct ComponentKind {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Short type name, for logs.
    pub fn name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentKind {}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A child passed to a component
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: ComponentKind,
    key: Option<String>,
    text: Option<String>,
}

impl Node {
    pub fn new<T: 'static>() -> Self {
        Self::of_kind(ComponentKind::of::<T>())
    }

    pub fn of_kind(kind: ComponentKind) -> Self {
        Self {
            kind,
            key: None,
            text: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn key_str(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn text_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.kind == ComponentKind::of::<T>()
    }
}

/// A shared child sequence. Two `Children` are the same input only if they
/// point at the same allocation.
pub type Children = Rc<[Node]>;

/// Build a [`Children`] sequence from nodes.
pub fn children(nodes: impl IntoIterator<Item = Node>) -> Children {
    nodes.into_iter().collect()
}

/// Split `children` into `(unmatched, matched)` by component kind.
///
/// Both partitions keep the original relative order.
pub fn pick_child(children: &[Node], target: ComponentKind) -> (Vec<Node>, Vec<Node>) {
    let (matched, unmatched): (Vec<Node>, Vec<Node>) = children
        .iter()
        .cloned()
        .partition(|child| child.kind == target);
    (unmatched, matched)
}
