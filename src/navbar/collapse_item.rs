use crate::children::{ComponentKind, Node};

/// An entry of the navbar's collapse panel.
///
/// The collapse panel picks these out of its children; everything else is
/// passed through untouched.
#[derive(Debug, Clone, Copy)]
pub struct NavbarCollapseItem;

impl NavbarCollapseItem {
    pub fn kind() -> ComponentKind {
        ComponentKind::of::<NavbarCollapseItem>()
    }
}

/// A collapse item node with `label` as its text.
pub fn navbar_collapse_item(label: impl Into<String>) -> Node {
    Node::new::<NavbarCollapseItem>().text(label)
}
