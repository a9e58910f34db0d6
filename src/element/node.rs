use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::reactive::{ChangeFlags, mark_changed};

/// Box edge sizes (padding, border, margin)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Top and bottom set to `vertical`, left and right to `horizontal`
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BoxMetrics {
    height: f32,
    padding: Edges,
    border: Edges,
    margin: Edges,
    /// Full content extent; `None` means the content fits.
    scroll_height: Option<f32>,
}

impl BoxMetrics {
    fn client_height(&self) -> f32 {
        self.height + self.padding.vertical()
    }

    fn offset_height(&self) -> f32 {
        self.client_height() + self.border.vertical()
    }

    fn scroll_height(&self) -> f32 {
        self.scroll_height
            .map_or(self.client_height(), |extent| extent.max(self.client_height()))
    }

    fn max_scroll_top(&self) -> f32 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }
}

/// Identifies a registered listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Dispatched after an element's scroll offset changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub scroll_top: f32,
    pub previous_scroll_top: f32,
}

/// Dispatched after an element's client height changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    pub client_height: f32,
    pub previous_client_height: f32,
}

type Listener<E> = Rc<dyn Fn(&E)>;

struct ListenerList<E> {
    entries: RefCell<Vec<(ListenerId, Listener<E>)>>,
    next_id: Cell<u64>,
}

impl<E> ListenerList<E> {
    fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    fn add(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Listeners may add or remove listeners while being dispatched to; the
    /// set notified is the one registered when dispatch started.
    fn dispatch(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

struct ElementInner {
    id: String,
    metrics: Cell<BoxMetrics>,
    scroll_top: Cell<f32>,
    scroll_listeners: ListenerList<ScrollEvent>,
    resize_listeners: ListenerList<ResizeEvent>,
}

/// A node in the in-memory element tree.
///
/// `Element` is a cheap, cloneable handle; clones refer to the same node and
/// compare equal. The node tracks its box metrics and vertical scroll offset,
/// and dispatches scroll and resize events synchronously.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                id: id.into(),
                metrics: Cell::new(BoxMetrics::default()),
                scroll_top: Cell::new(0.0),
                scroll_listeners: ListenerList::new(),
                resize_listeners: ListenerList::new(),
            }),
        }
    }

    /// Set the content height without dispatching a resize event.
    pub fn height(self, height: f32) -> Self {
        self.modify_metrics(|m| m.height = height);
        self
    }

    /// Set the padding without dispatching a resize event.
    pub fn padding(self, padding: Edges) -> Self {
        self.modify_metrics(|m| m.padding = padding);
        self
    }

    pub fn border(self, border: Edges) -> Self {
        self.modify_metrics(|m| m.border = border);
        self
    }

    pub fn margin(self, margin: Edges) -> Self {
        self.modify_metrics(|m| m.margin = margin);
        self
    }

    /// Set the scrollable content extent without dispatching a resize event.
    pub fn scroll_height(self, extent: f32) -> Self {
        self.modify_metrics(|m| m.scroll_height = Some(extent));
        self
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Height of the padding box: content height plus vertical padding.
    /// Border and margin are excluded.
    pub fn client_height(&self) -> f32 {
        self.inner.metrics.get().client_height()
    }

    /// Height including border, excluding margin.
    pub fn offset_height(&self) -> f32 {
        self.inner.metrics.get().offset_height()
    }

    pub fn margin_box_height(&self) -> f32 {
        let metrics = self.inner.metrics.get();
        metrics.offset_height() + metrics.margin.vertical()
    }

    pub fn content_extent(&self) -> f32 {
        self.inner.metrics.get().scroll_height()
    }

    pub fn max_scroll_top(&self) -> f32 {
        self.inner.metrics.get().max_scroll_top()
    }

    pub fn scroll_top(&self) -> f32 {
        self.inner.scroll_top.get()
    }

    /// Scroll so that `top` is the vertical offset, clamped to the scrollable range.
    ///
    /// Scroll listeners run only if the offset actually changed.
    pub fn scroll_to(&self, top: f32) {
        let target = if top.is_finite() { top } else { 0.0 };
        let clamped = target.clamp(0.0, self.max_scroll_top());
        let previous = self.inner.scroll_top.replace(clamped);
        if previous == clamped {
            return;
        }
        log::trace!("{}: scroll {previous} -> {clamped}", self.inner.id);
        mark_changed(ChangeFlags::NEEDS_PAINT);
        self.inner.scroll_listeners.dispatch(&ScrollEvent {
            scroll_top: clamped,
            previous_scroll_top: previous,
        });
    }

    pub fn scroll_by(&self, delta: f32) {
        self.scroll_to(self.scroll_top() + delta);
    }

    pub fn set_height(&self, height: f32) {
        self.resize_with(|m| m.height = height);
    }

    pub fn set_padding(&self, padding: Edges) {
        self.resize_with(|m| m.padding = padding);
    }

    pub fn set_scroll_height(&self, extent: f32) {
        self.resize_with(|m| m.scroll_height = Some(extent));
    }

    pub fn add_scroll_listener(&self, listener: impl Fn(&ScrollEvent) + 'static) -> ListenerId {
        self.inner.scroll_listeners.add(Rc::new(listener))
    }

    /// Returns `false` if no listener with this id was registered.
    pub fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        self.inner.scroll_listeners.remove(id)
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.inner.scroll_listeners.len()
    }

    pub fn add_resize_listener(&self, listener: impl Fn(&ResizeEvent) + 'static) -> ListenerId {
        self.inner.resize_listeners.add(Rc::new(listener))
    }

    pub fn remove_resize_listener(&self, id: ListenerId) -> bool {
        self.inner.resize_listeners.remove(id)
    }

    pub fn resize_listener_count(&self) -> usize {
        self.inner.resize_listeners.len()
    }

    /// Attach a scroll listener that stays registered until the returned guard is dropped.
    pub fn on_scroll(&self, listener: impl Fn(&ScrollEvent) + 'static) -> ScrollSubscription {
        ScrollSubscription {
            element: Rc::downgrade(&self.inner),
            id: self.add_scroll_listener(listener),
        }
    }

    /// Attach a resize listener that stays registered until the returned guard is dropped.
    pub fn on_resize(&self, listener: impl Fn(&ResizeEvent) + 'static) -> ResizeSubscription {
        ResizeSubscription {
            element: Rc::downgrade(&self.inner),
            id: self.add_resize_listener(listener),
        }
    }

    fn modify_metrics(&self, f: impl FnOnce(&mut BoxMetrics)) {
        let mut metrics = self.inner.metrics.get();
        f(&mut metrics);
        self.inner.metrics.set(metrics);
    }

    fn resize_with(&self, f: impl FnOnce(&mut BoxMetrics)) {
        let previous = self.client_height();
        self.modify_metrics(f);

        // Shrinking can leave the offset past the new end.
        let max = self.max_scroll_top();
        if self.scroll_top() > max {
            self.scroll_to(max);
        }

        let client_height = self.client_height();
        if client_height == previous {
            return;
        }
        log::trace!("{}: resize {previous} -> {client_height}", self.inner.id);
        mark_changed(ChangeFlags::NEEDS_LAYOUT);
        self.inner.resize_listeners.dispatch(&ResizeEvent {
            client_height,
            previous_client_height: previous,
        });
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("client_height", &self.client_height())
            .field("scroll_top", &self.scroll_top())
            .finish()
    }
}

/// Guard for a scroll listener; dropping it removes the listener.
///
/// The guard does not keep the element alive.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct ScrollSubscription {
    element: Weak<ElementInner>,
    id: ListenerId,
}

impl ScrollSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.element.upgrade() {
            inner.scroll_listeners.remove(self.id);
        }
    }
}

/// Guard for a resize listener; dropping it removes the listener.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct ResizeSubscription {
    element: Weak<ElementInner>,
    id: ListenerId,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.element.upgrade() {
            inner.resize_listeners.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn scrollable() -> Element {
        Element::new("panel")
            .height(100.0)
            .padding(Edges::symmetric(10.0, 4.0))
            .scroll_height(400.0)
    }

    #[test]
    fn test_client_height_includes_padding_only() {
        let element = Element::new("box")
            .height(50.0)
            .padding(Edges::all(5.0))
            .border(Edges::all(2.0))
            .margin(Edges::all(7.0));
        assert_eq!(element.client_height(), 60.0);
        assert_eq!(element.offset_height(), 64.0);
        assert_eq!(element.margin_box_height(), 78.0);
    }

    #[test]
    fn test_scroll_to_clamps_to_range() {
        let element = scrollable();
        assert_eq!(element.content_extent(), 400.0);
        assert_eq!(element.max_scroll_top(), 280.0);

        element.scroll_to(1000.0);
        assert_eq!(element.scroll_top(), 280.0);
        element.scroll_to(-5.0);
        assert_eq!(element.scroll_top(), 0.0);
        element.scroll_to(f32::NAN);
        assert_eq!(element.scroll_top(), 0.0);
    }

    #[test]
    fn test_content_that_fits_does_not_scroll() {
        let element = Element::new("fits").height(100.0);
        assert_eq!(element.content_extent(), element.client_height());
        element.scroll_to(20.0);
        assert_eq!(element.scroll_top(), 0.0);
    }

    #[test]
    fn test_scroll_dispatches_only_on_change() {
        let element = scrollable();
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        element.add_scroll_listener(move |event| log.borrow_mut().push(event.scroll_top));

        element.scroll_to(30.0);
        element.scroll_to(30.0);
        element.scroll_by(-10.0);
        assert_eq!(*events.borrow(), vec![30.0, 20.0]);
    }

    #[test]
    fn test_remove_listener() {
        let element = scrollable();
        let id = element.add_scroll_listener(|_| {});
        assert_eq!(element.scroll_listener_count(), 1);
        assert!(element.remove_scroll_listener(id));
        assert!(!element.remove_scroll_listener(id));
        assert_eq!(element.scroll_listener_count(), 0);
    }

    #[test]
    fn test_subscription_removes_listener_on_drop() {
        let element = scrollable();
        let subscription = element.on_scroll(|_| {});
        assert_eq!(element.scroll_listener_count(), 1);
        drop(subscription);
        assert_eq!(element.scroll_listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_element_is_harmless() {
        let subscription = scrollable().on_resize(|_| {});
        drop(subscription);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let element = scrollable();
        let slot: Rc<RefCell<Option<ScrollSubscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let (inner_slot, inner_hits) = (slot.clone(), hits.clone());
        let subscription = element.on_scroll(move |_| {
            inner_hits.set(inner_hits.get() + 1);
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        element.scroll_to(10.0);
        element.scroll_to(20.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(element.scroll_listener_count(), 0);
    }

    #[test]
    fn test_resize_dispatches_new_client_height() {
        let element = scrollable();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        element.add_resize_listener(move |event| log.borrow_mut().push(event.client_height));

        element.set_height(200.0);
        element.set_height(200.0);
        element.set_padding(Edges::all(0.0));
        assert_eq!(*seen.borrow(), vec![220.0, 200.0]);
    }

    #[test]
    fn test_shrinking_clamps_scroll_offset() {
        let element = scrollable();
        element.scroll_to(280.0);
        element.set_scroll_height(200.0);
        assert_eq!(element.scroll_top(), 80.0);
    }

    #[test]
    fn test_clones_are_equal() {
        let a = scrollable();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, scrollable());
    }
}
