use crate::element::ElementRef;
use crate::reactive::{Signal, create_signal, provide_context, use_context};

/// Shared navbar state, owned by the navbar and read by its collapse panel.
///
/// All fields are reactive handles, so the struct is `Copy` and can be handed
/// to any number of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarState {
    pub is_collapse_open: Signal<bool>,
    /// The navbar's container; bounds the collapse panel's height.
    pub parent_ref: Option<ElementRef>,
}

impl NavbarState {
    /// A closed navbar without a container ref.
    pub fn new() -> Self {
        Self {
            is_collapse_open: create_signal(false),
            parent_ref: None,
        }
    }

    pub fn with_parent(parent_ref: ElementRef) -> Self {
        Self {
            parent_ref: Some(parent_ref),
            ..Self::new()
        }
    }

    pub fn is_collapse_open(&self) -> bool {
        self.is_collapse_open.get()
    }

    pub fn set_collapse_open(&self, open: bool) {
        log::debug!("navbar collapse {}", if open { "opened" } else { "closed" });
        self.is_collapse_open.set(open);
    }

    pub fn open_collapse(&self) {
        self.set_collapse_open(true);
    }

    pub fn close_collapse(&self) {
        self.set_collapse_open(false);
    }

    pub fn toggle_collapse(&self) {
        self.set_collapse_open(!self.is_collapse_open.get_untracked());
    }

    /// Plain-value view of the state as it is right now.
    pub fn snapshot(&self) -> NavbarContext {
        NavbarContext {
            is_collapse_open: self.is_collapse_open.get_untracked(),
            parent_ref: self.parent_ref,
        }
    }
}

impl Default for NavbarState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`NavbarState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarContext {
    pub is_collapse_open: bool,
    pub parent_ref: Option<ElementRef>,
}

/// Make `state` available to descendants through [`use_navbar_context`].
pub fn provide_navbar_context(state: NavbarState) {
    provide_context(state);
}

pub fn use_navbar_context() -> Option<NavbarState> {
    use_context::<NavbarState>()
}
