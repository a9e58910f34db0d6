//! ElementRef: a reactive slot holding at most one element.
//!
//! Components hand an `ElementRef` to the renderer, which attaches the node it
//! creates. Reading the slot through [`ElementRef::get`] inside an effect
//! re-runs that effect when the node is attached or detached.

use crate::reactive::{Signal, create_signal};

use super::node::Element;

/// A handle to an element that may or may not be attached yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementRef {
    slot: Signal<Option<Element>>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self {
            slot: create_signal(None),
        }
    }

    /// The attached element, without tracking.
    pub fn current(&self) -> Option<Element> {
        self.slot.get_untracked()
    }

    /// The attached element, tracked by the running effect.
    pub fn get(&self) -> Option<Element> {
        self.slot.get()
    }

    pub fn is_attached(&self) -> bool {
        self.slot.with_untracked(Option::is_some)
    }

    /// Run `f` against the attached element, if any.
    pub fn with_current<R>(&self, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.slot.with_untracked(|element| element.as_ref().map(f))
    }

    pub fn attach(&self, element: Element) {
        self.slot.set(Some(element));
    }

    pub fn detach(&self) {
        self.slot.set(None);
    }
}

impl Default for ElementRef {
    fn default() -> Self {
        Self::new()
    }
}

/// Create an empty element ref.
pub fn create_element_ref() -> ElementRef {
    ElementRef::new()
}

/// Resolve the ref a component should use: the one its caller forwarded, or a
/// fresh local one.
pub fn use_dom_ref(forwarded: Option<ElementRef>) -> ElementRef {
    forwarded.unwrap_or_else(create_element_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::reset_reactive;

    #[test]
    fn test_attach_and_detach() {
        reset_reactive();
        let dom_ref = create_element_ref();
        assert!(!dom_ref.is_attached());

        let element = Element::new("panel");
        dom_ref.attach(element.clone());
        assert_eq!(dom_ref.current(), Some(element));

        dom_ref.detach();
        assert_eq!(dom_ref.current(), None);
    }

    #[test]
    fn test_with_current_is_none_when_detached() {
        reset_reactive();
        let dom_ref = create_element_ref();
        assert_eq!(dom_ref.with_current(|el| el.client_height()), None);

        dom_ref.attach(Element::new("panel").height(12.0));
        assert_eq!(dom_ref.with_current(|el| el.client_height()), Some(12.0));
    }

    #[test]
    fn test_use_dom_ref_keeps_forwarded_handle() {
        reset_reactive();
        let forwarded = create_element_ref();
        assert_eq!(use_dom_ref(Some(forwarded)), forwarded);
        assert_ne!(use_dom_ref(None), forwarded);
    }
}
