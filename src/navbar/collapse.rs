//! Collapse panel controller.
//!
//! [`NavbarCollapse`] holds the presentation state of the navbar's collapse
//! panel and hands it to a renderer as a [`UseNavbarCollapseReturn`]:
//!
//! - closing the panel scrolls it back to the top and clears `has_scrolled`
//! - a scroll listener flips `has_scrolled` the first time the panel is
//!   scrolled away from the top
//! - the panel's `max_height` follows the navbar container's client height,
//!   unless the caller's style sets one
//! - collapse items are picked out of the children
//!
//! Everything the controller subscribes to lives in its owner scope and is
//! released when the controller is dropped.

use std::rc::Rc;

use crate::SignalFields;
use crate::children::{Children, Node, pick_child};
use crate::element::{ElementRef, observe_client_height, use_dom_ref};
use crate::reactive::{
    self, Memo, OwnerId, Signal, create_effect, create_memo, create_signal, dispose_owner, on_cleanup,
    with_owner,
};
use crate::style::{MAX_HEIGHT, Style, StyleValue, merge_styles};

use super::collapse_item::NavbarCollapseItem;
use super::context::{NavbarState, use_navbar_context};

/// Inputs of the collapse panel
#[derive(Debug, Clone)]
pub struct CollapseProps {
    pub style: Style,
    pub children: Children,
    /// Forwarded ref; a local one is created when absent.
    pub dom_ref: Option<ElementRef>,
    pub class_name: Option<String>,
    /// Attributes passed through to the rendered element untouched
    pub other_props: Vec<(String, String)>,
}

impl CollapseProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn children(mut self, children: Children) -> Self {
        self.children = children;
        self
    }

    pub fn dom_ref(mut self, dom_ref: ElementRef) -> Self {
        self.dom_ref = Some(dom_ref);
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.other_props.push((name.into(), value.into()));
        self
    }
}

impl Default for CollapseProps {
    fn default() -> Self {
        Self {
            style: Style::new(),
            children: Rc::from(Vec::new()),
            dom_ref: None,
            class_name: None,
            other_props: Vec::new(),
        }
    }
}

/// Per-panel state
#[derive(Debug, Clone, Default, PartialEq, SignalFields)]
pub struct PanelState {
    /// The panel was scrolled away from the top since it was last closed.
    pub has_scrolled: bool,
}

/// Everything a renderer needs to draw the collapse panel
#[derive(Debug, Clone, PartialEq)]
pub struct UseNavbarCollapseReturn {
    /// The caller's style, unchanged
    pub style: Style,
    pub dom_ref: ElementRef,
    pub children: Children,
    /// Collapse items, in child order
    pub items: Vec<Node>,
    /// The style to apply to the panel element
    pub collapse_style: Style,
    pub is_open: bool,
    pub has_scrolled: bool,
    pub class_name: Option<String>,
    pub other_props: Vec<(String, String)>,
}

pub struct NavbarCollapse {
    scope: OwnerId,
    navbar: NavbarState,
    dom_ref: ElementRef,
    panel: PanelStateSignals,
    style: Signal<Style>,
    collapse_style: Memo<Style>,
    children: Signal<Children>,
    items: Memo<Vec<Node>>,
    class_name: Option<String>,
    other_props: Vec<(String, String)>,
}

impl NavbarCollapse {
    pub fn new(props: CollapseProps, navbar: &NavbarState) -> Self {
        let CollapseProps {
            style,
            children,
            dom_ref,
            class_name,
            other_props,
        } = props;

        let ((dom_ref, panel, style, collapse_style, children, items), scope) = with_owner(|| {
            let dom_ref = use_dom_ref(dom_ref);
            let panel = PanelStateSignals::new(PanelState::default());
            watch_open_state(navbar.is_collapse_open, dom_ref, panel);

            let style = create_signal(style);
            let parent_height = match navbar.parent_ref {
                Some(parent_ref) => observe_client_height(parent_ref),
                None => create_signal(None),
            };
            let collapse_style = create_memo(move || {
                let parent_height = parent_height.get();
                style.with(|style| derive_collapse_style(style, parent_height))
            });

            let children = create_signal(children);
            let items = create_memo(move || children.with(|children| collapse_items(children)));

            (dom_ref, panel, style, collapse_style, children, items)
        });

        log::debug!(
            "collapse panel created with {} of {} children as items",
            items.get_untracked().len(),
            children.with_untracked(|children| children.len())
        );

        Self {
            scope,
            navbar: *navbar,
            dom_ref,
            panel,
            style,
            collapse_style,
            children,
            items,
            class_name,
            other_props,
        }
    }

    pub fn dom_ref(&self) -> ElementRef {
        self.dom_ref
    }

    pub fn is_open(&self) -> bool {
        self.navbar.is_collapse_open.get()
    }

    pub fn has_scrolled(&self) -> bool {
        self.panel.has_scrolled.get()
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.get()
    }

    pub fn collapse_style(&self) -> Style {
        self.collapse_style.get()
    }

    pub fn items(&self) -> Vec<Node> {
        self.items.get()
    }

    pub fn set_style(&self, style: Style) {
        self.style.set(style);
    }

    /// Replace the children. Items are re-picked only if `children` is a
    /// different sequence from the current one.
    pub fn set_children(&self, children: Children) {
        if self.children.with_untracked(|current| Rc::ptr_eq(current, &children)) {
            return;
        }
        self.children.update(|current| *current = children);
    }

    /// Snapshot for the renderer. Reads are tracked, so a renderer running in
    /// an effect re-runs when any of them change.
    pub fn state(&self) -> UseNavbarCollapseReturn {
        UseNavbarCollapseReturn {
            style: self.style.get(),
            dom_ref: self.dom_ref,
            children: self.children.get(),
            items: self.items.get(),
            collapse_style: self.collapse_style.get(),
            is_open: self.is_open(),
            has_scrolled: self.has_scrolled(),
            class_name: self.class_name.clone(),
            other_props: self.other_props.clone(),
        }
    }
}

impl Drop for NavbarCollapse {
    fn drop(&mut self) {
        // At thread exit the scope went away with the thread-local arenas.
        if !reactive::is_available() {
            return;
        }
        log::debug!("collapse panel disposed");
        dispose_owner(self.scope);
    }
}

/// Build a collapse panel controller from the navbar provided as context.
///
/// Returns `None` outside a navbar.
pub fn use_navbar_collapse(props: CollapseProps) -> Option<NavbarCollapse> {
    let Some(navbar) = use_navbar_context() else {
        log::warn!("use_navbar_collapse called without a navbar context");
        return None;
    };
    Some(NavbarCollapse::new(props, &navbar))
}

/// React to the panel opening and closing, and keep one scroll listener on
/// the panel element.
///
/// The effect tracks the open flag and the attached element. Each run first
/// releases the previous run's listener (owner cleanup), then:
/// - when closed, scrolls the element to the top and clears `has_scrolled`
/// - attaches a fresh listener that sets `has_scrolled` on the first scroll
///   past the top
fn watch_open_state(is_open: Signal<bool>, dom_ref: ElementRef, panel: PanelStateSignals) {
    create_effect(move || {
        let open = is_open.get();
        let element = dom_ref.get();

        if !open {
            if let Some(element) = &element {
                log::trace!("collapse closed, scrolling {} to top", element.id());
                element.scroll_to(0.0);
            }
            panel.has_scrolled.set(false);
        }

        let Some(element) = element else {
            return;
        };

        let has_scrolled = panel.has_scrolled;
        let subscription = element.on_scroll(move |event| {
            // Read the live flag; a value captured at subscribe time goes stale.
            if event.scroll_top > 0.0 && !has_scrolled.get_untracked() {
                log::trace!("collapse panel scrolled to {}", event.scroll_top);
                has_scrolled.set(true);
            }
        });
        on_cleanup(move || drop(subscription));
    });
}

fn derive_collapse_style(style: &Style, parent_height: Option<f32>) -> Style {
    match parent_height {
        Some(height) => {
            let bounds = Style::new().set(MAX_HEIGHT, StyleValue::Px(height));
            merge_styles([&bounds, style])
        }
        None => style.clone(),
    }
}

fn collapse_items(children: &[Node]) -> Vec<Node> {
    let (_, items) = pick_child(children, NavbarCollapseItem::kind());
    items
}
